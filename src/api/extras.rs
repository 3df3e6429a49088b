use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::api::blogs::{body_or_default, MessageResponse};
use crate::app::AppState;
use crate::auth::middleware::ManagerUser;
use crate::error::AppError;

/// Request body for `POST /updateYtList`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReplaceListRequest {
    #[serde(default)]
    pub list: Option<Vec<Value>>,
}

/// Response for `GET /getYtList`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CarouselListResponse {
    pub message: String,
    pub list: Vec<Value>,
}

/// `GET /getYtList`
///
/// A missing carousel entry is not an error: the list is reported empty.
pub async fn get_yt_list_handler(
    State(state): State<AppState>,
) -> Result<Json<CarouselListResponse>, AppError> {
    let response = match state.extras.get_list().await? {
        Some(list) => CarouselListResponse {
            message: "List found.".to_string(),
            list,
        },
        None => CarouselListResponse {
            message: "List not found.".to_string(),
            list: Vec::new(),
        },
    };
    Ok(Json(response))
}

/// `POST /updateYtList`
pub async fn update_yt_list_handler(
    State(state): State<AppState>,
    _manager: ManagerUser,
    payload: Result<Json<ReplaceListRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let request = body_or_default(payload);
    state.extras.replace_list(request.list).await?;

    Ok(Json(MessageResponse::new("List Updated.")))
}
