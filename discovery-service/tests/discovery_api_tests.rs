mod common;

use common::TestApp;
use reqwest::StatusCode;
use serde_json::json;
use uuid::Uuid;

#[tokio::test]
async fn test_listing_requires_authentication() {
    let app = TestApp::spawn().await;

    let response = app
        .get("/api/discoveries")
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_sets_author_and_publication() {
    let app = TestApp::spawn().await;
    let (token, user_id) = app
        .register_user("nova", "nova@example.com", "pass_word!")
        .await;

    let response = app
        .post_authenticated("/api/discoveries", &token)
        .json(&json!({
            "title": "A supernova remnant",
            "content_md": "a faint shell of ionized gas",
            "status": "published"
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::CREATED);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["author_id"], user_id.as_str());
    assert_eq!(body["data"]["status"], "published");
    assert!(body["data"]["published_at"].is_string());
    assert!(body["data"]["slug"]
        .as_str()
        .unwrap()
        .starts_with("a-supernova-remnant-"));
}

#[tokio::test]
async fn test_draft_is_not_published() {
    let app = TestApp::spawn().await;
    let (token, _) = app
        .register_user("nova", "nova@example.com", "pass_word!")
        .await;

    let id = app.create_discovery(&token, "A quiet draft", "draft").await;

    // drafts never appear in the published listing
    let response = app
        .get_authenticated("/api/discoveries", &token)
        .send()
        .await
        .expect("Failed to execute request");
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 0);

    // but are directly reachable
    let response = app
        .get_authenticated(&format!("/api/discoveries/{}", id), &token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_list_published_honors_limit() {
    let app = TestApp::spawn().await;
    let (token, _) = app
        .register_user("nova", "nova@example.com", "pass_word!")
        .await;

    for i in 0..3 {
        app.create_discovery(&token, &format!("Remnant number {}", i), "published")
            .await;
    }

    let response = app
        .get_authenticated("/api/discoveries?limit=2", &token)
        .send()
        .await
        .expect("Failed to execute request");
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    // an oversized limit is clamped rather than rejected
    let response = app
        .get_authenticated("/api/discoveries?limit=5000", &token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_detail_includes_author_summary() {
    let app = TestApp::spawn().await;
    let (token, user_id) = app
        .register_user("nova", "nova@example.com", "pass_word!")
        .await;

    let id = app
        .create_discovery(&token, "A supernova remnant", "published")
        .await;

    let response = app
        .get_authenticated(&format!("/api/discoveries/{}", id), &token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["author"]["id"], user_id.as_str());
    assert_eq!(body["data"]["author"]["username"], "nova");
    assert_eq!(body["data"]["author"]["email"], "nova@example.com");
}

#[tokio::test]
async fn test_foreign_user_cannot_mutate() {
    let app = TestApp::spawn().await;
    let (owner_token, _) = app
        .register_user("nova", "nova@example.com", "pass_word!")
        .await;
    let (stranger_token, _) = app
        .register_user("vega", "vega@example.com", "pass_word!")
        .await;

    let id = app
        .create_discovery(&owner_token, "A supernova remnant", "published")
        .await;

    let response = app
        .put_authenticated(&format!("/api/discoveries/{}", id), &stranger_token)
        .json(&json!({ "title": "Hijacked title" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .delete_authenticated(&format!("/api/discoveries/{}", id), &stranger_token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // the denial changed nothing
    let response = app
        .get_authenticated(&format!("/api/discoveries/{}", id), &owner_token)
        .send()
        .await
        .expect("Failed to execute request");
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["title"], "A supernova remnant");
}

#[tokio::test]
async fn test_owner_and_admin_can_mutate() {
    let app = TestApp::spawn().await;
    let (owner_token, _) = app
        .register_user("nova", "nova@example.com", "pass_word!")
        .await;
    let admin_token = app.seed_admin("admin", "admin@example.com", "admin_pass!").await;

    let id = app
        .create_discovery(&owner_token, "A supernova remnant", "published")
        .await;

    // owner updates their own post
    let response = app
        .put_authenticated(&format!("/api/discoveries/{}", id), &owner_token)
        .json(&json!({ "title": "An updated remnant" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    // admin deletes a post they do not own
    let response = app
        .delete_authenticated(&format!("/api/discoveries/{}", id), &admin_token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .get_authenticated(&format!("/api/discoveries/{}", id), &owner_token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // owner deletes their own post
    let second = app
        .create_discovery(&owner_token, "A second remnant", "published")
        .await;
    let response = app
        .delete_authenticated(&format!("/api/discoveries/{}", second), &owner_token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_missing_discovery_is_not_found_for_everyone() {
    let app = TestApp::spawn().await;
    let (token, _) = app
        .register_user("nova", "nova@example.com", "pass_word!")
        .await;

    // a random id yields 404, never 403, regardless of who asks
    let response = app
        .delete_authenticated(&format!("/api/discoveries/{}", Uuid::new_v4()), &token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // a malformed id is a plain bad request
    let response = app
        .get_authenticated("/api/discoveries/not-a-uuid", &token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_first_publication_stamps_timestamp_once() {
    let app = TestApp::spawn().await;
    let (token, _) = app
        .register_user("nova", "nova@example.com", "pass_word!")
        .await;

    let id = app.create_discovery(&token, "A quiet draft", "draft").await;

    let response = app
        .put_authenticated(&format!("/api/discoveries/{}", id), &token)
        .json(&json!({ "status": "published" }))
        .send()
        .await
        .expect("Failed to execute request");
    let body: serde_json::Value = response.json().await.unwrap();
    let published_at = body["data"]["published_at"].as_str().unwrap().to_string();

    // archive and publish again; the original timestamp survives
    app.put_authenticated(&format!("/api/discoveries/{}", id), &token)
        .json(&json!({ "status": "archived" }))
        .send()
        .await
        .expect("Failed to execute request");
    let response = app
        .put_authenticated(&format!("/api/discoveries/{}", id), &token)
        .json(&json!({ "status": "published" }))
        .send()
        .await
        .expect("Failed to execute request");
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["published_at"].as_str().unwrap(), published_at);
}

#[tokio::test]
async fn test_admin_listing_sees_all_statuses() {
    let app = TestApp::spawn().await;
    let (token, _) = app
        .register_user("nova", "nova@example.com", "pass_word!")
        .await;
    let admin_token = app.seed_admin("admin", "admin@example.com", "admin_pass!").await;

    app.create_discovery(&token, "A quiet draft", "draft").await;
    app.create_discovery(&token, "A supernova remnant", "published")
        .await;

    let response = app
        .get_authenticated("/api/admin/discoveries", &admin_token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    // plain users are denied by role, not by authentication
    let response = app
        .get_authenticated("/api/admin/discoveries", &token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_update_validation() {
    let app = TestApp::spawn().await;
    let (token, _) = app
        .register_user("nova", "nova@example.com", "pass_word!")
        .await;

    let id = app
        .create_discovery(&token, "A supernova remnant", "published")
        .await;

    let response = app
        .put_authenticated(&format!("/api/discoveries/{}", id), &token)
        .json(&json!({ "status": "deleted" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = app
        .put_authenticated(&format!("/api/discoveries/{}", id), &token)
        .json(&json!({ "image_url": "ftp://example.com/x.png" }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}
