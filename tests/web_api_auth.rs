//! Web API authentication tests.
//!
//! Integration tests for registration, login and token verification.

mod common;

use axum::http::StatusCode;
use serde_json::{json, Value};
use uuid::Uuid;

use common::{create_test_server, login_user, register_user};

// ============================================================================
// Registration
// ============================================================================

#[tokio::test]
async fn test_register_success() {
    let (server, _ctx) = create_test_server().await;

    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "name": "Alice",
            "email": "alice@example.com",
            "password": "password123"
        }))
        .await;

    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["message"], "User registered successfully");
    // The password hash never appears in responses.
    assert!(body.get("password_hash").is_none());
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let (server, _ctx) = create_test_server().await;
    register_user(&server, "Alice", "alice@example.com", "password123").await;

    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "name": "Other Alice",
            "email": "alice@example.com",
            "password": "password456"
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
    let body: Value = response.json();
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_register_invalid_email_rejected() {
    let (server, _ctx) = create_test_server().await;

    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "name": "Alice",
            "email": "not-an-email",
            "password": "password123"
        }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = response.json();
    assert!(body["error"]["details"]["email"].is_array());
}

#[tokio::test]
async fn test_register_short_password_rejected() {
    let (server, _ctx) = create_test_server().await;

    let response = server
        .post("/api/auth/register")
        .json(&json!({
            "name": "Alice",
            "email": "alice@example.com",
            "password": "short"
        }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

// ============================================================================
// Login
// ============================================================================

#[tokio::test]
async fn test_login_success() {
    let (server, _ctx) = create_test_server().await;
    register_user(&server, "Alice", "alice@example.com", "password123").await;

    let response = server
        .post("/api/auth/login")
        .json(&json!({
            "email": "alice@example.com",
            "password": "password123"
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert!(body["access_token"].is_string());
    assert_eq!(body["token_type"], "bearer");
}

#[tokio::test]
async fn test_login_wrong_password_unauthorized() {
    let (server, _ctx) = create_test_server().await;
    register_user(&server, "Alice", "alice@example.com", "password123").await;

    let response = server
        .post("/api/auth/login")
        .json(&json!({
            "email": "alice@example.com",
            "password": "wrong-password"
        }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.header("www-authenticate").to_str().unwrap(),
        "Bearer"
    );
}

#[tokio::test]
async fn test_login_unknown_email_unauthorized() {
    let (server, _ctx) = create_test_server().await;

    let response = server
        .post("/api/auth/login")
        .json(&json!({
            "email": "nobody@example.com",
            "password": "password123"
        }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Token verification
// ============================================================================

#[tokio::test]
async fn test_me_with_valid_token() {
    let (server, _ctx) = create_test_server().await;
    register_user(&server, "Alice", "alice@example.com", "password123").await;
    let token = login_user(&server, "alice@example.com", "password123").await;

    let response = server
        .get("/api/auth/me")
        .authorization_bearer(&token)
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["email"], "alice@example.com");
}

#[tokio::test]
async fn test_me_without_token_unauthorized() {
    let (server, _ctx) = create_test_server().await;

    let response = server.get("/api/auth/me").await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    assert_eq!(
        response.header("www-authenticate").to_str().unwrap(),
        "Bearer"
    );
}

#[tokio::test]
async fn test_me_with_tampered_token_unauthorized() {
    let (server, _ctx) = create_test_server().await;
    register_user(&server, "Alice", "alice@example.com", "password123").await;
    let token = login_user(&server, "alice@example.com", "password123").await;

    // Flip a character in the signature segment
    let mut tampered = token.clone();
    let last = tampered.pop().unwrap();
    tampered.push(if last == 'a' { 'b' } else { 'a' });

    let response = server
        .get("/api/auth/me")
        .authorization_bearer(&tampered)
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_with_expired_token_unauthorized() {
    let (server, ctx) = create_test_server().await;
    register_user(&server, "Alice", "alice@example.com", "password123").await;

    let me = server
        .get("/api/auth/me")
        .authorization_bearer(&login_user(&server, "alice@example.com", "password123").await)
        .await;
    let user_id: Uuid = me.json::<Value>()["id"]
        .as_str()
        .unwrap()
        .parse()
        .unwrap();

    let expired = ctx.signer.issue_with_ttl(user_id, -5).unwrap();

    let response = server
        .get("/api/auth/me")
        .authorization_bearer(&expired)
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_for_unknown_account_unauthorized() {
    let (server, ctx) = create_test_server().await;

    // Well-formed token whose subject was never registered.
    let token = ctx.signer.issue(Uuid::new_v4()).unwrap();

    let response = server
        .get("/api/auth/me")
        .authorization_bearer(&token)
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}
