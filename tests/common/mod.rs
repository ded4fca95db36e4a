//! Shared helpers for Web API integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use axum_test::TestServer;
use serde_json::{json, Value};

use accountd::auth::{AuthService, TokenService};
use accountd::config::AuthConfig;
use accountd::web::handlers::AppState;
use accountd::web::router::{create_health_router, create_router};
use accountd::{Database, MailService};

/// Authentication configuration used by the test server.
pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        access_token_secret: "test-access-secret-for-testing-only".to_string(),
        access_token_expiry_secs: 900,
        refresh_token_secret: "test-refresh-secret-for-testing-only".to_string(),
        refresh_token_expiry_secs: 7 * 24 * 60 * 60,
        password_reset_expiry_secs: 600,
        email_verification_expiry_secs: 86400,
    }
}

/// Create a test server with an in-memory database.
pub async fn create_test_server() -> (TestServer, Database) {
    let db = Database::open_in_memory()
        .await
        .expect("Failed to create test database");

    let tokens = Arc::new(TokenService::new(&test_auth_config()));
    let auth = AuthService::new(db.clone(), tokens, MailService::disabled());
    let app_state = Arc::new(AppState::new(db.clone(), auth));

    let router = create_router(app_state, &[]).merge(create_health_router());

    let server = TestServer::new(router).expect("Failed to create test server");

    (server, db)
}

/// Register a user and return the response body.
pub async fn register_user(server: &TestServer, name: &str, email: &str, password: &str) -> Value {
    let response = server
        .post("/api/v1/auth/register")
        .json(&json!({
            "name": name,
            "email": email,
            "password": password
        }))
        .await;

    response.json::<Value>()
}

/// Log in and return the response body.
pub async fn login_user(server: &TestServer, email: &str, password: &str) -> Value {
    let response = server
        .post("/api/v1/auth/login")
        .json(&json!({
            "email": email,
            "password": password
        }))
        .await;

    response.json::<Value>()
}
