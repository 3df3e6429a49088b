use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::error::AppError;

const GENERIC_FAILURE: &str = "Something went wrong";
const UPDATE_MISMATCH: &str = "Update went wrong.";

impl AppError {
    /// HTTP status for this error.
    ///
    /// Only the identity gate distinguishes itself; every catalog failure is a 400.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Auth(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            _ => StatusCode::BAD_REQUEST,
        }
    }

    /// Message shown to the caller. Store and internal details are never exposed.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Validation(msg)
            | AppError::NotFound(msg)
            | AppError::Auth(msg)
            | AppError::Forbidden(msg) => msg.clone(),
            AppError::UpdateMismatch { .. } => UPDATE_MISMATCH.to_string(),
            AppError::Database(_) | AppError::Internal(_) => GENERIC_FAILURE.to_string(),
        }
    }
}

/// Converts AppError into a JSON `{ "message": ... }` response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Database(_) | AppError::Internal(_) => {
                tracing::error!(error = %self, "Request failed");
            }
            AppError::UpdateMismatch { .. } => {
                tracing::warn!(error = %self, "Update did not apply");
            }
            _ => {}
        }

        let body = serde_json::json!({
            "message": self.public_message()
        });

        (self.status_code(), axum::Json(body)).into_response()
    }
}
