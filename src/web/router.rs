//! Router configuration for the Web API.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::db::Role;

use super::handlers::{
    change_password, forgot_password, list_users, login, logout, me, refresh_token, register,
    resend_verification, reset_password, verify_email, AppState,
};
use super::middleware::{auth_gate, create_cors_layer, request_id, require_role};

/// Roles allowed on the user-administration routes.
const ADMIN_ROLES: &[Role] = &[Role::Admin];

/// Create the main API router.
pub fn create_router(app_state: Arc<AppState>, cors_origins: &[String]) -> Router {
    // Public auth routes
    let auth_public_routes = Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/refresh-token", post(refresh_token))
        .route("/forgot-password", post(forgot_password))
        .route("/reset-password", post(reset_password))
        .route("/verify-email/:token", get(verify_email))
        .route("/resend-verification", post(resend_verification));

    // Bearer-protected auth routes (the extractor enforces authentication)
    let auth_protected_routes = Router::new()
        .route("/logout", post(logout))
        .route("/me", get(me))
        .route("/change-password", post(change_password));

    let auth_routes = Router::new()
        .merge(auth_public_routes)
        .merge(auth_protected_routes);

    // Admin-only user administration
    let user_routes = Router::new()
        .route("/", get(list_users))
        .route_layer(middleware::from_fn(|req, next| {
            require_role(ADMIN_ROLES, req, next)
        }));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/users", user_routes);

    // Clone app_state for the middleware closure
    let gate_state = app_state.clone();

    Router::new()
        .nest("/api/v1", api_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(middleware::from_fn(request_id))
                .layer(create_cors_layer(cors_origins))
                .layer(middleware::from_fn(move |req, next| {
                    let state = gate_state.clone();
                    auth_gate(state, req, next)
                })),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
