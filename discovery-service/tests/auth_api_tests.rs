mod common;

use auth::Authenticator;
use auth::Role;
use chrono::Duration;
use common::TestApp;
use common::TEST_SECRET;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn test_register_then_login_round_trip() {
    let app = TestApp::spawn().await;

    let (register_token, user_id) = app
        .register_user("nova", "nova@example.com", "pass_word!")
        .await;
    assert!(!register_token.is_empty());

    let response = app
        .post("/api/auth/login")
        .json(&json!({
            "email": "nova@example.com",
            "password": "pass_word!"
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["data"]["user"]["id"], user_id.as_str());
    assert_eq!(body["data"]["user"]["role"], "user");

    // the issued token resolves back to the same subject
    let token = body["data"]["token"].as_str().unwrap();
    let header = format!("Bearer {}", token);
    let principal = app.authenticator.resolve_bearer(Some(&header)).unwrap();
    assert_eq!(principal.subject_id, user_id);
    assert_eq!(principal.role, Role::User);
}

#[tokio::test]
async fn test_login_normalizes_email() {
    let app = TestApp::spawn().await;
    app.register_user("nova", "nova@example.com", "pass_word!")
        .await;

    let response = app
        .post("/api/auth/login")
        .json(&json!({
            "email": "  NOVA@Example.com ",
            "password": "pass_word!"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_wrong_password_and_unknown_email_are_indistinguishable() {
    let app = TestApp::spawn().await;
    app.register_user("nova", "nova@example.com", "pass_word!")
        .await;

    let wrong_password = app
        .post("/api/auth/login")
        .json(&json!({
            "email": "nova@example.com",
            "password": "wrong_password"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    let unknown_email = app
        .post("/api/auth/login")
        .json(&json!({
            "email": "ghost@example.com",
            "password": "wrong_password"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_email.status(), StatusCode::UNAUTHORIZED);

    // identical response bodies: no user-enumeration signal
    let wrong_body: serde_json::Value = wrong_password.json().await.unwrap();
    let unknown_body: serde_json::Value = unknown_email.json().await.unwrap();
    assert_eq!(wrong_body, unknown_body);
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let app = TestApp::spawn().await;
    app.register_user("nova", "nova@example.com", "pass_word!")
        .await;

    let response = app
        .post("/api/auth/register")
        .json(&json!({
            "username": "nova2",
            "email": "nova@example.com",
            "password": "pass_word!"
        }))
        .send()
        .await
        .expect("Failed to execute request");

    assert_eq!(response.status(), StatusCode::CONFLICT);

    let body: serde_json::Value = response.json().await.unwrap();
    assert!(body["data"]["message"]
        .as_str()
        .unwrap()
        .contains("already exists"));
}

#[tokio::test]
async fn test_register_validation() {
    let app = TestApp::spawn().await;

    let response = app
        .post("/api/auth/register")
        .json(&json!({
            "username": "n",
            "email": "nova@example.com",
            "password": "pass_word!"
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let response = app
        .post("/api/auth/register")
        .json(&json!({
            "username": "nova",
            "email": "not-an-email",
            "password": "pass_word!"
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_missing_token_is_rejected_without_side_effect() {
    let app = TestApp::spawn().await;
    let admin_token = app.seed_admin("admin", "admin@example.com", "admin_pass!").await;

    // no Authorization header at all
    let response = app
        .post("/api/discoveries")
        .json(&json!({
            "title": "A supernova remnant",
            "content_md": "a faint shell of ionized gas"
        }))
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // the handler never ran: nothing was stored
    let response = app
        .get_authenticated("/api/admin/discoveries", &admin_token)
        .send()
        .await
        .expect("Failed to execute request");
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_malformed_and_tampered_tokens_are_rejected() {
    let app = TestApp::spawn().await;
    let (token, _) = app
        .register_user("nova", "nova@example.com", "pass_word!")
        .await;

    // garbage token
    let response = app
        .get_authenticated("/api/discoveries", "not.a.token")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // flip one character of a valid token
    let mut tampered = token.into_bytes();
    let last = tampered.len() - 1;
    tampered[last] = if tampered[last] == b'A' { b'B' } else { b'A' };
    let tampered = String::from_utf8(tampered).unwrap();

    let response = app
        .get_authenticated("/api/discoveries", &tampered)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // wrong scheme
    let response = app
        .get("/api/discoveries")
        .header("Authorization", "Token abc")
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_expired_token_is_rejected() {
    let app = TestApp::spawn().await;
    let (_, user_id) = app
        .register_user("nova", "nova@example.com", "pass_word!")
        .await;

    // same secret, negative ttl: the token is already expired when issued
    let expired_issuer =
        Authenticator::new(TEST_SECRET, 2, Duration::seconds(-1)).unwrap();
    let expired_token = expired_issuer.issue_token(&user_id, Role::User).unwrap();

    let response = app
        .get_authenticated("/api/discoveries", &expired_token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_promotion_requires_admin() {
    let app = TestApp::spawn().await;
    let (user_token, user_id) = app
        .register_user("nova", "nova@example.com", "pass_word!")
        .await;
    let (_, other_id) = app
        .register_user("vega", "vega@example.com", "pass_word!")
        .await;

    // a plain user cannot promote anyone
    let response = app
        .put_authenticated(&format!("/api/auth/promote/{}", other_id), &user_token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // an admin can
    let admin_token = app.seed_admin("admin", "admin@example.com", "admin_pass!").await;
    let response = app
        .put_authenticated(&format!("/api/auth/promote/{}", user_id), &admin_token)
        .send()
        .await
        .expect("Failed to execute request");
    assert_eq!(response.status(), StatusCode::OK);

    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["data"]["role"], "admin");

    // the promoted account logs in with admin claims
    let response = app
        .post("/api/auth/login")
        .json(&json!({
            "email": "nova@example.com",
            "password": "pass_word!"
        }))
        .send()
        .await
        .expect("Failed to execute request");
    let body: serde_json::Value = response.json().await.unwrap();
    let header = format!("Bearer {}", body["data"]["token"].as_str().unwrap());
    let principal = app.authenticator.resolve_bearer(Some(&header)).unwrap();
    assert_eq!(principal.role, Role::Admin);
}
