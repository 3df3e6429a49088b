use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::app::AppState;
use crate::auth::middleware::ManagerUser;
use crate::db::models::{Blog, BlogId};
use crate::error::AppError;

/// Request body for `POST /create-blog`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateBlogRequest {
    /// Arbitrary post fields; must be a non-empty object.
    #[serde(rename = "blogDetails", default)]
    pub blog_details: Option<Value>,
}

/// Request body for `POST /updateBlog`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBlogRequest {
    #[serde(rename = "blogId", default)]
    pub blog_id: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub status: Option<bool>,
}

/// Request body for `POST /deleteBlog`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteBlogRequest {
    #[serde(rename = "blogId", default)]
    pub blog_id: Option<String>,
}

/// Request body for `POST /searchBlogs`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: Option<String>,
}

/// Store acknowledgment of an insert.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsertAck {
    pub acknowledged: bool,
    pub inserted_id: BlogId,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBlogResponse {
    pub message: String,
    #[serde(rename = "newBlog")]
    pub new_blog: InsertAck,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogResponse {
    pub message: String,
    pub blog: Blog,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogListResponse {
    pub message: String,
    pub result: Vec<Blog>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

fn list(message: &str, result: Vec<Blog>) -> Json<BlogListResponse> {
    Json(BlogListResponse {
        message: message.to_string(),
        result,
    })
}

/// Unwrap a JSON body, treating an unreadable one as empty.
///
/// The operation then reports its own "missing fields" message instead of
/// axum's default rejection status.
pub(crate) fn body_or_default<T: Default>(payload: Result<Json<T>, JsonRejection>) -> T {
    match payload {
        Ok(Json(body)) => body,
        Err(rejection) => {
            tracing::debug!(%rejection, "Unreadable request body");
            T::default()
        }
    }
}

/// `POST /create-blog`
pub async fn create_blog_handler(
    State(state): State<AppState>,
    _manager: ManagerUser,
    payload: Result<Json<CreateBlogRequest>, JsonRejection>,
) -> Result<Json<CreateBlogResponse>, AppError> {
    let request = body_or_default(payload);
    let blog = state.catalog.create(request.blog_details).await?;

    Ok(Json(CreateBlogResponse {
        message: "Successfully created blog".to_string(),
        new_blog: InsertAck {
            acknowledged: true,
            inserted_id: blog.id,
        },
    }))
}

/// `GET /getBlogById/{id}`
pub async fn get_blog_by_id_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<BlogResponse>, AppError> {
    let blog = state.catalog.get_by_id(&id).await?;

    Ok(Json(BlogResponse {
        message: "Found blog with this id.".to_string(),
        blog,
    }))
}

/// `GET /getRecent`
pub async fn get_recent_handler(
    State(state): State<AppState>,
) -> Result<Json<BlogListResponse>, AppError> {
    let blogs = state.catalog.get_recent().await?;
    Ok(list("Found blogs.", blogs))
}

/// `GET /getBlogsByTag/{tag}`
pub async fn get_blogs_by_tag_handler(
    State(state): State<AppState>,
    Path(tag): Path<String>,
) -> Result<Json<BlogListResponse>, AppError> {
    let blogs = state.catalog.get_by_tag(&tag).await?;
    Ok(list("Found blogs with this tag.", blogs))
}

/// `POST /getAllBlogs`
pub async fn get_all_blogs_handler(
    State(state): State<AppState>,
    _manager: ManagerUser,
) -> Result<Json<BlogListResponse>, AppError> {
    let blogs = state.catalog.list_all().await?;
    Ok(list("Found blogs.", blogs))
}

/// `POST /updateBlog`
pub async fn update_blog_handler(
    State(state): State<AppState>,
    _manager: ManagerUser,
    payload: Result<Json<UpdateBlogRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let request = body_or_default(payload);
    state
        .catalog
        .update(request.blog_id.as_deref(), request.status, request.tags)
        .await?;

    Ok(Json(MessageResponse::new("Blog Updated.")))
}

/// `POST /deleteBlog`
pub async fn delete_blog_handler(
    State(state): State<AppState>,
    _manager: ManagerUser,
    payload: Result<Json<DeleteBlogRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let request = body_or_default(payload);
    state.catalog.delete(request.blog_id.as_deref()).await?;

    Ok(Json(MessageResponse::new("Blog Deleted.")))
}

/// `POST /searchBlogs`
pub async fn search_blogs_handler(
    State(state): State<AppState>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<BlogListResponse>, AppError> {
    let request = body_or_default(payload);
    let blogs = state.catalog.search(request.query.as_deref()).await?;
    Ok(list("Found blogs.", blogs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_request_false_status_is_present() {
        let json = r###"{ "blogId": "abc", "tags": [], "status": false }"###;
        let req: UpdateBlogRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.status, Some(false));
        assert_eq!(req.tags, Some(vec![]));
    }

    #[test]
    fn test_update_request_missing_fields() {
        let req: UpdateBlogRequest = serde_json::from_str("{}").unwrap();
        assert!(req.blog_id.is_none());
        assert!(req.status.is_none());
        assert!(req.tags.is_none());
    }

    #[test]
    fn test_create_response_shape() {
        let id = BlogId::new();
        let resp = CreateBlogResponse {
            message: "Successfully created blog".to_string(),
            new_blog: InsertAck {
                acknowledged: true,
                inserted_id: id,
            },
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["newBlog"]["acknowledged"], true);
        assert_eq!(json["newBlog"]["insertedId"], id.to_string());
    }
}
