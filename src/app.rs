use std::sync::Arc;

use axum::extract::FromRef;
use axum::routing::{get, post};
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::api;
use crate::auth::token::TokenVerifier;
use crate::catalog::CatalogService;
use crate::db::extras_repository::ExtrasRepository;
use crate::db::repository::BlogRepository;
use crate::extras::ExtrasService;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub catalog: CatalogService,
    pub extras: ExtrasService,
    pub verifier: Arc<dyn TokenVerifier>,
}

impl AppState {
    /// Wire the services over the given stores and identity verifier.
    pub fn new(
        blogs: Arc<dyn BlogRepository>,
        extras: Arc<dyn ExtrasRepository>,
        verifier: Arc<dyn TokenVerifier>,
    ) -> Self {
        Self {
            catalog: CatalogService::new(blogs),
            extras: ExtrasService::new(extras),
            verifier,
        }
    }
}

impl FromRef<AppState> for Arc<dyn TokenVerifier> {
    fn from_ref(state: &AppState) -> Self {
        state.verifier.clone()
    }
}

/// Build the HTTP router for the catalog API.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/create-blog", post(api::blogs::create_blog_handler))
        .route("/getBlogById/{id}", get(api::blogs::get_blog_by_id_handler))
        .route("/getRecent", get(api::blogs::get_recent_handler))
        .route(
            "/getBlogsByTag/{tag}",
            get(api::blogs::get_blogs_by_tag_handler),
        )
        .route("/getAllBlogs", post(api::blogs::get_all_blogs_handler))
        .route("/updateBlog", post(api::blogs::update_blog_handler))
        .route("/deleteBlog", post(api::blogs::delete_blog_handler))
        .route("/searchBlogs", post(api::blogs::search_blogs_handler))
        .route("/getYtList", get(api::extras::get_yt_list_handler))
        .route("/updateYtList", post(api::extras::update_yt_list_handler))
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Mount the catalog router under `base_path`, or at the root when it is empty.
pub fn mount(router: Router, base_path: &str) -> Router {
    let base_path = base_path.trim_end_matches('/');
    if base_path.is_empty() {
        router
    } else {
        Router::new().nest(base_path, router)
    }
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}
