mod common;

use serde_json::{json, Value};

#[tokio::test]
async fn create_tag_hide_delete_flow() {
    let env = common::TestEnv::start();
    let server = env.server();

    let id = env
        .create_blog(
            &server,
            json!({ "heading": "Budget 2024", "tags": ["business"] }),
        )
        .await;

    // Published and visible by tag
    let body: Value = server.get("/getBlogsByTag/business").await.json();
    assert_eq!(body["message"], "Found blogs with this tag.");
    assert_eq!(common::headings(&body), vec!["Budget 2024"]);
    assert_eq!(body["result"][0]["_id"], id.as_str());
    assert_eq!(body["result"][0]["status"], true);

    // Hide it
    let body: Value = server
        .post("/updateBlog")
        .authorization_bearer(env.manager_token())
        .json(&json!({ "blogId": id, "tags": ["business"], "status": false }))
        .await
        .json();
    assert_eq!(body["message"], "Blog Updated.");

    let body: Value = server.get("/getBlogsByTag/business").await.json();
    assert!(common::headings(&body).is_empty());

    // Still listed for managers
    let body: Value = server
        .post("/getAllBlogs")
        .authorization_bearer(env.manager_token())
        .await
        .json();
    assert_eq!(body["result"][0]["_id"], id.as_str());
    assert_eq!(body["result"][0]["status"], false);

    // Delete it
    let body: Value = server
        .post("/deleteBlog")
        .authorization_bearer(env.manager_token())
        .json(&json!({ "blogId": id }))
        .await
        .json();
    assert_eq!(body["message"], "Blog Deleted.");

    let permissive = env.server_permissive();
    let response = permissive.get(&format!("/getBlogById/{id}")).await;
    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["message"], "Blog does not exist.");
}

#[tokio::test]
async fn create_returns_insert_acknowledgment() {
    let env = common::TestEnv::start();
    let server = env.server();

    let body: Value = server
        .post("/create-blog")
        .authorization_bearer(env.manager_token())
        .json(&json!({ "blogDetails": { "heading": "Hello", "author": "Asha" } }))
        .await
        .json();

    assert_eq!(body["message"], "Successfully created blog");
    assert_eq!(body["newBlog"]["acknowledged"], true);
    let id = body["newBlog"]["insertedId"].as_str().unwrap();
    assert_eq!(id.len(), 24);

    let body: Value = server.get(&format!("/getBlogById/{id}")).await.json();
    assert_eq!(body["message"], "Found blog with this id.");
    assert_eq!(body["blog"]["heading"], "Hello");
    assert_eq!(body["blog"]["author"], "Asha");
    assert_eq!(body["blog"]["status"], true);
    assert!(body["blog"]["createdAt"].as_i64().unwrap() > 0);
    assert_eq!(body["blog"]["createdAt"], body["blog"]["updatedAt"]);
}

#[tokio::test]
async fn create_ignores_caller_supplied_status_and_timestamps() {
    let env = common::TestEnv::start();
    let server = env.server();

    let id = env
        .create_blog(
            &server,
            json!({ "heading": "Sneaky", "status": false, "createdAt": 1 }),
        )
        .await;

    let body: Value = server.get(&format!("/getBlogById/{id}")).await.json();
    assert_eq!(body["blog"]["status"], true);
    assert!(body["blog"]["createdAt"].as_i64().unwrap() > 1);
}

#[tokio::test]
async fn create_passes_wrong_typed_fields_through() {
    let env = common::TestEnv::start();
    let server = env.server();

    let id = env
        .create_blog(&server, json!({ "heading": 42, "subHeading": "Scores" }))
        .await;

    let body: Value = server.get(&format!("/getBlogById/{id}")).await.json();
    assert_eq!(body["blog"]["heading"], 42);
    assert_eq!(body["blog"]["subHeading"], "Scores");

    let body: Value = server
        .post("/searchBlogs")
        .json(&json!({ "query": "Scores" }))
        .await
        .json();
    assert_eq!(body["result"][0]["_id"], id.as_str());
}

#[tokio::test]
async fn create_without_details_is_rejected() {
    let env = common::TestEnv::start();
    let server = env.server_permissive();

    for payload in [json!({}), json!({ "blogDetails": {} })] {
        let response = server
            .post("/create-blog")
            .authorization_bearer(env.manager_token())
            .json(&payload)
            .await;
        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["message"], "Missing fields for creating blog.");
    }
}

#[tokio::test]
async fn get_by_id_hides_unpublished_and_malformed() {
    let env = common::TestEnv::start();
    let server = env.server_permissive();
    let hidden = env.seed(false, &["crime"], "Hidden", 10);

    for path in [format!("/getBlogById/{hidden}"), "/getBlogById/not-an-id".to_string()] {
        let response = server.get(&path).await;
        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["message"], "Blog does not exist.");
    }
}

#[tokio::test]
async fn recent_returns_five_newest_published() {
    let env = common::TestEnv::start();
    let server = env.server();

    for n in 1..=6 {
        env.seed(true, &["national"], &format!("post-{n}"), n * 100);
    }
    env.seed(false, &["national"], "hidden-newest", 10_000);

    let body: Value = server.get("/getRecent").await.json();
    assert_eq!(body["message"], "Found blogs.");
    assert_eq!(
        common::headings(&body),
        vec!["post-6", "post-5", "post-4", "post-3", "post-2"]
    );
}

#[tokio::test]
async fn tag_filter_sorts_newest_first() {
    let env = common::TestEnv::start();
    let server = env.server();

    env.seed(true, &["sports"], "older", 100);
    env.seed(true, &["sports", "viral"], "newer", 200);
    env.seed(true, &["health"], "other", 300);

    let body: Value = server.get("/getBlogsByTag/sports").await.json();
    assert_eq!(common::headings(&body), vec!["newer", "older"]);
}

#[tokio::test]
async fn unknown_tag_is_rejected() {
    let env = common::TestEnv::start();
    let server = env.server_permissive();

    for tag in ["weather", "Sports"] {
        let response = server.get(&format!("/getBlogsByTag/{tag}")).await;
        response.assert_status_bad_request();
        let body: Value = response.json();
        assert_eq!(body["message"], "Use Correct tag.");
    }
}

#[tokio::test]
async fn update_that_changes_nothing_fails() {
    let env = common::TestEnv::start();
    let server = env.server_permissive();
    let id = env.seed(true, &["media"], "Same", 10);

    let response = server
        .post("/updateBlog")
        .authorization_bearer(env.manager_token())
        .json(&json!({ "blogId": id.to_string(), "tags": ["media"], "status": true }))
        .await;
    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["message"], "Update went wrong.");
}

#[tokio::test]
async fn update_validates_fields_and_existence() {
    let env = common::TestEnv::start();
    let server = env.server_permissive();

    let response = server
        .post("/updateBlog")
        .authorization_bearer(env.manager_token())
        .json(&json!({ "blogId": "0123456789abcdef01234567", "tags": [] }))
        .await;
    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["message"], "Missing fields for updating blog.");

    let response = server
        .post("/updateBlog")
        .authorization_bearer(env.manager_token())
        .json(&json!({ "blogId": "0123456789abcdef01234567", "tags": [], "status": false }))
        .await;
    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["message"], "Blog does not exist.");
}

#[tokio::test]
async fn update_can_republish() {
    let env = common::TestEnv::start();
    let server = env.server();
    let id = env.seed(false, &[], "Draft", 10);

    server
        .post("/updateBlog")
        .authorization_bearer(env.manager_token())
        .json(&json!({ "blogId": id.to_string(), "tags": ["state"], "status": true }))
        .await;

    let body: Value = server.get("/getBlogsByTag/state").await.json();
    assert_eq!(common::headings(&body), vec!["Draft"]);
}

#[tokio::test]
async fn delete_errors() {
    let env = common::TestEnv::start();
    let server = env.server_permissive();

    let response = server
        .post("/deleteBlog")
        .authorization_bearer(env.manager_token())
        .json(&json!({}))
        .await;
    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["message"], "Missing fields for deleting blog.");

    let response = server
        .post("/deleteBlog")
        .authorization_bearer(env.manager_token())
        .json(&json!({ "blogId": "0123456789abcdef01234567" }))
        .await;
    response.assert_status_bad_request();
    let body: Value = response.json();
    assert_eq!(body["message"], "Blog does not exist.");
}

#[tokio::test]
async fn health_is_public() {
    let env = common::TestEnv::start();
    let server = env.server();

    let body: Value = server.get("/health").await.json();
    assert_eq!(body["status"], "ok");
}
