use std::sync::Arc;

use axum::Router;
use serde_json::Value;

use newsroom::app::{self, AppState};
use newsroom::auth::token::{JwtVerifier, TokenVerifier};
use newsroom::db::extras_repository::ExtrasRepository;
use newsroom::db::memory::{InMemoryBlogRepository, InMemoryExtrasRepository};
use newsroom::db::models::{Blog, BlogId, ExtrasEntry, YT_CAROUSEL_TITLE};
use newsroom::db::repository::BlogRepository;

pub const TEST_SECRET: &str = "integration-test-secret";

/// In-memory stores wired into the full API router.
pub struct TestEnv {
    pub router: Router,
    pub blogs: Arc<InMemoryBlogRepository>,
    pub jwt: Arc<JwtVerifier>,
}

impl TestEnv {
    /// Build a router over empty stores with the carousel entry present.
    pub fn start() -> Self {
        Self::with_extras(InMemoryExtrasRepository::with_entry(ExtrasEntry {
            title: YT_CAROUSEL_TITLE.to_string(),
            list: Vec::new(),
        }))
    }

    /// Build a router over an extras store that lacks the carousel entry.
    pub fn without_carousel() -> Self {
        Self::with_extras(InMemoryExtrasRepository::new())
    }

    fn with_extras(extras: InMemoryExtrasRepository) -> Self {
        let blogs = Arc::new(InMemoryBlogRepository::new());
        let jwt = Arc::new(JwtVerifier::new(TEST_SECRET, None));

        let blog_repo: Arc<dyn BlogRepository> = blogs.clone();
        let extras_repo: Arc<dyn ExtrasRepository> = Arc::new(extras);
        let verifier: Arc<dyn TokenVerifier> = jwt.clone();

        let router = app::router(AppState::new(blog_repo, extras_repo, verifier));

        Self { router, blogs, jwt }
    }

    /// Build an `axum_test::TestServer` that expects success by default.
    pub fn server(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .expect_success_by_default()
            .build(self.router.clone())
    }

    /// Build a `TestServer` that does NOT expect success by default (for error tests).
    pub fn server_permissive(&self) -> axum_test::TestServer {
        axum_test::TestServer::builder()
            .build(self.router.clone())
    }

    pub fn manager_token(&self) -> String {
        self.token(&["manager"])
    }

    pub fn reader_token(&self) -> String {
        self.token(&["reader"])
    }

    fn token(&self, roles: &[&str]) -> String {
        let roles: Vec<String> = roles.iter().map(|r| r.to_string()).collect();
        self.jwt
            .issue("test-user", &roles, chrono::Duration::hours(1))
            .expect("Failed to issue token")
    }

    /// Helper: create a post via the API and return its id.
    pub async fn create_blog(&self, server: &axum_test::TestServer, details: Value) -> String {
        let response = server
            .post("/create-blog")
            .authorization_bearer(self.manager_token())
            .json(&serde_json::json!({ "blogDetails": details }))
            .await;
        let body: Value = response.json();
        body["newBlog"]["insertedId"]
            .as_str()
            .expect("insertedId missing")
            .to_string()
    }

    /// Helper: store a post directly, bypassing creation defaults.
    pub fn seed(&self, status: bool, tags: &[&str], heading: &str, created_at: i64) -> BlogId {
        let id = BlogId::new();
        self.blogs
            .seed(Blog {
                id,
                status,
                tags: Some(tags.iter().map(|t| t.to_string()).collect()),
                heading: Some(heading.to_string()),
                sub_heading: None,
                text_section_1: None,
                text_section_2: None,
                created_at,
                updated_at: created_at,
                extra: Default::default(),
            })
            .expect("Failed to seed blog");
        id
    }
}

/// Headings of a `{ result: [...] }` list response, in order.
pub fn headings(body: &Value) -> Vec<String> {
    body["result"]
        .as_array()
        .expect("result is not an array")
        .iter()
        .map(|b| b["heading"].as_str().unwrap_or_default().to_string())
        .collect()
}
