//! Web API authentication tests.
//!
//! Integration tests for registration, login, token refresh, logout, and
//! the bearer-protected routes.

mod common;

use axum::http::header::AUTHORIZATION;
use axum::http::StatusCode;
use serde_json::{json, Value};

use common::{create_test_server, login_user, register_user};

// ============================================================================
// Registration Tests
// ============================================================================

#[tokio::test]
async fn test_register_success() {
    let (server, _db) = create_test_server().await;

    let response = server
        .post("/api/v1/auth/register")
        .json(&json!({
            "name": "Ana",
            "email": "ana@x.com",
            "password": "secret1"
        }))
        .await;

    response.assert_status(StatusCode::CREATED);

    let body: Value = response.json();
    assert_eq!(body["success"], true);
    assert!(body["data"]["token"].is_string());
    assert!(body["data"]["refreshToken"].is_string());
    assert_eq!(body["data"]["user"]["email"], "ana@x.com");
    assert_eq!(body["data"]["user"]["name"], "Ana");
    assert_eq!(body["data"]["user"]["role"], "user");
    assert_eq!(body["data"]["user"]["isEmailVerified"], false);
}

#[tokio::test]
async fn test_register_response_contains_no_credential_material() {
    let (server, _db) = create_test_server().await;

    let body = register_user(&server, "Ana", "ana@x.com", "secret1").await;

    let user = body["data"]["user"].as_object().unwrap();
    assert!(!user.contains_key("password"));
    assert!(!user.contains_key("refreshToken"));
    assert!(!user.contains_key("refresh_token"));
    assert!(!user.contains_key("passwordResetToken"));
    assert!(!user.contains_key("emailVerificationToken"));
}

#[tokio::test]
async fn test_register_duplicate_email() {
    let (server, _db) = create_test_server().await;

    register_user(&server, "Ana", "ana@x.com", "secret1").await;

    let response = server
        .post("/api/v1/auth/register")
        .json(&json!({
            "name": "Another",
            "email": "ana@x.com",
            "password": "secret2"
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);

    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_register_duplicate_email_case_insensitive() {
    let (server, _db) = create_test_server().await;

    register_user(&server, "Ana", "ana@x.com", "secret1").await;

    let response = server
        .post("/api/v1/auth/register")
        .json(&json!({
            "name": "Another",
            "email": "ANA@X.COM",
            "password": "secret2"
        }))
        .await;

    response.assert_status(StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_register_invalid_email() {
    let (server, _db) = create_test_server().await;

    let response = server
        .post("/api/v1/auth/register")
        .json(&json!({
            "name": "Ana",
            "email": "not-an-email",
            "password": "secret1"
        }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert!(body["errors"]["email"].is_array());
}

#[tokio::test]
async fn test_register_short_password() {
    let (server, _db) = create_test_server().await;

    let response = server
        .post("/api/v1/auth/register")
        .json(&json!({
            "name": "Ana",
            "email": "ana@x.com",
            "password": "12345"
        }))
        .await;

    response.assert_status(StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_register_persists_verification_token_hash() {
    let (server, db) = create_test_server().await;

    register_user(&server, "Ana", "ana@x.com", "secret1").await;

    let repo = accountd::UserRepository::new(db.pool());
    let user = repo.find_by_email("ana@x.com").await.unwrap().unwrap();

    // A verification token hash and expiry were stored at registration
    assert!(user.email_verification_token.is_some());
    assert!(user.email_verification_expires_at.is_some());
    assert_eq!(user.email_verification_token.unwrap().len(), 64);
}

// ============================================================================
// Login Tests
// ============================================================================

#[tokio::test]
async fn test_login_success() {
    let (server, _db) = create_test_server().await;

    register_user(&server, "Ana", "ana@x.com", "secret1").await;

    let response = server
        .post("/api/v1/auth/login")
        .json(&json!({
            "email": "ana@x.com",
            "password": "secret1"
        }))
        .await;

    response.assert_status_ok();

    let body: Value = response.json();
    assert!(body["data"]["token"].is_string());
    assert!(body["data"]["refreshToken"].is_string());
    assert_eq!(body["data"]["user"]["email"], "ana@x.com");
}

#[tokio::test]
async fn test_login_issues_fresh_token_pair() {
    let (server, _db) = create_test_server().await;

    let registration = register_user(&server, "Ana", "ana@x.com", "secret1").await;
    let login = login_user(&server, "ana@x.com", "secret1").await;

    // The login pair is distinct from the registration pair
    assert_ne!(
        registration["data"]["refreshToken"].as_str().unwrap(),
        login["data"]["refreshToken"].as_str().unwrap()
    );
}

#[tokio::test]
async fn test_login_wrong_password_and_unknown_email_same_response() {
    let (server, _db) = create_test_server().await;

    register_user(&server, "Ana", "ana@x.com", "secret1").await;

    let wrong_password = server
        .post("/api/v1/auth/login")
        .json(&json!({
            "email": "ana@x.com",
            "password": "wrong1"
        }))
        .await;

    let unknown_email = server
        .post("/api/v1/auth/login")
        .json(&json!({
            "email": "ghost@x.com",
            "password": "secret1"
        }))
        .await;

    wrong_password.assert_status(StatusCode::UNAUTHORIZED);
    unknown_email.assert_status(StatusCode::UNAUTHORIZED);

    // Identical generic message in both cases
    let a: Value = wrong_password.json();
    let b: Value = unknown_email.json();
    assert_eq!(a["message"], b["message"]);
}

#[tokio::test]
async fn test_login_case_insensitive_email() {
    let (server, _db) = create_test_server().await;

    register_user(&server, "Ana", "ana@x.com", "secret1").await;

    let response = server
        .post("/api/v1/auth/login")
        .json(&json!({
            "email": "ANA@X.COM",
            "password": "secret1"
        }))
        .await;

    response.assert_status_ok();
}

// ============================================================================
// Token Refresh Tests
// ============================================================================

#[tokio::test]
async fn test_refresh_token_success() {
    let (server, _db) = create_test_server().await;

    let body = register_user(&server, "Ana", "ana@x.com", "secret1").await;
    let refresh_token = body["data"]["refreshToken"].as_str().unwrap();

    let response = server
        .post("/api/v1/auth/refresh-token")
        .json(&json!({
            "refreshToken": refresh_token
        }))
        .await;

    response.assert_status_ok();

    let body: Value = response.json();
    assert!(body["data"]["token"].is_string());
}

#[tokio::test]
async fn test_refresh_token_invalid() {
    let (server, _db) = create_test_server().await;

    let response = server
        .post("/api/v1/auth/refresh-token")
        .json(&json!({
            "refreshToken": "invalid-token"
        }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_refresh_token_superseded_by_later_login() {
    let (server, _db) = create_test_server().await;

    register_user(&server, "Ana", "ana@x.com", "secret1").await;

    let first = login_user(&server, "ana@x.com", "secret1").await;
    let first_refresh = first["data"]["refreshToken"].as_str().unwrap();

    // A second login rotates the stored refresh token
    let second = login_user(&server, "ana@x.com", "secret1").await;
    let second_refresh = second["data"]["refreshToken"].as_str().unwrap();

    let stale = server
        .post("/api/v1/auth/refresh-token")
        .json(&json!({ "refreshToken": first_refresh }))
        .await;
    stale.assert_status(StatusCode::UNAUTHORIZED);

    let current = server
        .post("/api/v1/auth/refresh-token")
        .json(&json!({ "refreshToken": second_refresh }))
        .await;
    current.assert_status_ok();
}

#[tokio::test]
async fn test_access_token_rejected_as_refresh_token() {
    let (server, _db) = create_test_server().await;

    let body = register_user(&server, "Ana", "ana@x.com", "secret1").await;
    let access_token = body["data"]["token"].as_str().unwrap();

    // Signed with the access secret, so the refresh verifier rejects it
    let response = server
        .post("/api/v1/auth/refresh-token")
        .json(&json!({ "refreshToken": access_token }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Logout Tests
// ============================================================================

#[tokio::test]
async fn test_logout_invalidates_refresh_token() {
    let (server, _db) = create_test_server().await;

    let body = register_user(&server, "Ana", "ana@x.com", "secret1").await;
    let access_token = body["data"]["token"].as_str().unwrap();
    let refresh_token = body["data"]["refreshToken"].as_str().unwrap();

    let response = server
        .post("/api/v1/auth/logout")
        .add_header(AUTHORIZATION, format!("Bearer {}", access_token))
        .await;
    response.assert_status_ok();

    // The cleared refresh token no longer refreshes
    let refresh = server
        .post("/api/v1/auth/refresh-token")
        .json(&json!({ "refreshToken": refresh_token }))
        .await;
    refresh.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_requires_bearer_token() {
    let (server, _db) = create_test_server().await;

    let response = server.post("/api/v1/auth/logout").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Me (Current User) Tests
// ============================================================================

#[tokio::test]
async fn test_me_success() {
    let (server, _db) = create_test_server().await;

    let body = register_user(&server, "Ana", "ana@x.com", "secret1").await;
    let access_token = body["data"]["token"].as_str().unwrap();
    let user_id = body["data"]["user"]["id"].as_i64().unwrap();

    let response = server
        .get("/api/v1/auth/me")
        .add_header(AUTHORIZATION, format!("Bearer {}", access_token))
        .await;

    response.assert_status_ok();

    let body: Value = response.json();
    assert_eq!(body["data"]["user"]["id"], user_id);
    assert_eq!(body["data"]["user"]["email"], "ana@x.com");
}

#[tokio::test]
async fn test_me_without_token() {
    let (server, _db) = create_test_server().await;

    let response = server.get("/api/v1/auth/me").await;
    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_with_invalid_token() {
    let (server, _db) = create_test_server().await;

    let response = server
        .get("/api/v1/auth/me")
        .add_header(AUTHORIZATION, "Bearer invalid-token")
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_me_with_deactivated_account() {
    let (server, db) = create_test_server().await;

    let body = register_user(&server, "Ana", "ana@x.com", "secret1").await;
    let access_token = body["data"]["token"].as_str().unwrap();
    let user_id = body["data"]["user"]["id"].as_i64().unwrap();

    // Deactivate the account; the still-valid token must stop working
    let repo = accountd::UserRepository::new(db.pool());
    repo.update(user_id, &accountd::UserUpdate::new().is_active(false))
        .await
        .unwrap();

    let response = server
        .get("/api/v1/auth/me")
        .add_header(AUTHORIZATION, format!("Bearer {}", access_token))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Change Password Tests
// ============================================================================

#[tokio::test]
async fn test_change_password_flow() {
    let (server, _db) = create_test_server().await;

    let body = register_user(&server, "Ana", "ana@x.com", "secret1").await;
    let access_token = body["data"]["token"].as_str().unwrap();

    let response = server
        .post("/api/v1/auth/change-password")
        .add_header(AUTHORIZATION, format!("Bearer {}", access_token))
        .json(&json!({
            "currentPassword": "secret1",
            "newPassword": "secret2"
        }))
        .await;
    response.assert_status_ok();

    // Old password fails, new password works
    let old = server
        .post("/api/v1/auth/login")
        .json(&json!({ "email": "ana@x.com", "password": "secret1" }))
        .await;
    old.assert_status(StatusCode::UNAUTHORIZED);

    let new = server
        .post("/api/v1/auth/login")
        .json(&json!({ "email": "ana@x.com", "password": "secret2" }))
        .await;
    new.assert_status_ok();
}

#[tokio::test]
async fn test_change_password_wrong_current() {
    let (server, _db) = create_test_server().await;

    let body = register_user(&server, "Ana", "ana@x.com", "secret1").await;
    let access_token = body["data"]["token"].as_str().unwrap();

    let response = server
        .post("/api/v1/auth/change-password")
        .add_header(AUTHORIZATION, format!("Bearer {}", access_token))
        .json(&json!({
            "currentPassword": "wrong1",
            "newPassword": "secret2"
        }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_change_password_requires_auth() {
    let (server, _db) = create_test_server().await;

    let response = server
        .post("/api/v1/auth/change-password")
        .json(&json!({
            "currentPassword": "secret1",
            "newPassword": "secret2"
        }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

// ============================================================================
// Envelope and Infrastructure Tests
// ============================================================================

#[tokio::test]
async fn test_health_endpoint() {
    let (server, _db) = create_test_server().await;

    let response = server.get("/health").await;
    response.assert_status_ok();
    assert_eq!(response.text(), "OK");
}

#[tokio::test]
async fn test_error_body_carries_request_id() {
    let (server, _db) = create_test_server().await;

    let response = server
        .post("/api/v1/auth/login")
        .add_header("x-request-id", "test-req-42")
        .json(&json!({ "email": "ghost@x.com", "password": "secret1" }))
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);

    let body: Value = response.json();
    assert_eq!(body["success"], false);
    assert_eq!(body["requestId"], "test-req-42");
    assert!(body["timestamp"].is_string());
}

#[tokio::test]
async fn test_request_id_generated_when_absent() {
    let (server, _db) = create_test_server().await;

    let response = server.get("/api/v1/auth/me").await;
    response.assert_status(StatusCode::UNAUTHORIZED);

    // A request id is generated and included in the error body
    let body: Value = response.json();
    assert!(!body["requestId"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn test_access_token_claims_shape() {
    let (server, _db) = create_test_server().await;

    let body = register_user(&server, "Ana", "ana@x.com", "secret1").await;
    let access_token = body["data"]["token"].as_str().unwrap();
    let user_id = body["data"]["user"]["id"].as_i64().unwrap();

    let parts: Vec<&str> = access_token.split('.').collect();
    assert_eq!(parts.len(), 3, "JWT should have 3 parts");

    use base64::Engine;
    let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
    let payload = engine.decode(parts[1]).expect("Failed to decode JWT payload");
    let claims: Value = serde_json::from_slice(&payload).expect("Failed to parse claims");

    assert_eq!(claims["sub"].as_i64().unwrap(), user_id);
    assert!(claims["iat"].is_number());
    assert!(claims["exp"].is_number());
    assert!(claims["jti"].is_string());
}
