//! Authentication handlers.
//!
//! Thin HTTP adapters over [`AuthService`]; all policy lives in the
//! workflow layer.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::web::dto::{
    AccountResponse, ApiResponse, AuthResponse, ChangePasswordRequest, ForgotPasswordRequest,
    LoginRequest, MeResponse, RefreshResponse, RefreshTokenRequest, RegisterRequest,
    ResendVerificationRequest, ResetPasswordRequest, ValidatedJson,
};
use crate::web::error::ApiError;
use crate::web::middleware::AuthUser;

use super::AppState;

/// POST /api/v1/auth/register - Register a new account.
pub async fn register(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), ApiError> {
    let (user, pair) = state
        .auth
        .register(&req.name, &req.email, &req.password)
        .await?;

    let response = AuthResponse {
        user: AccountResponse::from(&user),
        token: pair.token,
        refresh_token: pair.refresh_token,
    };

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(response, "User registered successfully")),
    ))
}

/// POST /api/v1/auth/login - Log in with email and password.
pub async fn login(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<Json<ApiResponse<AuthResponse>>, ApiError> {
    let (user, pair) = state.auth.login(&req.email, &req.password).await?;

    let response = AuthResponse {
        user: AccountResponse::from(&user),
        token: pair.token,
        refresh_token: pair.refresh_token,
    };

    Ok(Json(ApiResponse::new(response, "Login successful")))
}

/// POST /api/v1/auth/refresh-token - Exchange a refresh token for a new
/// access token.
pub async fn refresh_token(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<RefreshTokenRequest>,
) -> Result<Json<ApiResponse<RefreshResponse>>, ApiError> {
    let token = state.auth.refresh_access_token(&req.refresh_token).await?;

    Ok(Json(ApiResponse::new(
        RefreshResponse { token },
        "Token refreshed successfully",
    )))
}

/// POST /api/v1/auth/logout - Log out the authenticated account.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state.auth.logout(user.id).await?;

    Ok(Json(ApiResponse::message_only("Logged out successfully")))
}

/// POST /api/v1/auth/forgot-password - Start the password-reset flow.
pub async fn forgot_password(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<ForgotPasswordRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let message = state.auth.forgot_password(&req.email).await?;

    Ok(Json(ApiResponse::message_only(message)))
}

/// POST /api/v1/auth/reset-password - Complete the password-reset flow.
pub async fn reset_password(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<ResetPasswordRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let message = state.auth.reset_password(&req.token, &req.password).await?;

    Ok(Json(ApiResponse::message_only(message)))
}

/// GET /api/v1/auth/verify-email/:token - Verify an email address.
pub async fn verify_email(
    State(state): State<Arc<AppState>>,
    Path(token): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let message = state.auth.verify_email(&token).await?;

    Ok(Json(ApiResponse::message_only(message)))
}

/// POST /api/v1/auth/resend-verification - Reissue the verification email.
pub async fn resend_verification(
    State(state): State<Arc<AppState>>,
    ValidatedJson(req): ValidatedJson<ResendVerificationRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let message = state.auth.resend_verification_email(&req.email).await?;

    Ok(Json(ApiResponse::message_only(message)))
}

/// POST /api/v1/auth/change-password - Change the password of the
/// authenticated account.
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    AuthUser(user): AuthUser,
    ValidatedJson(req): ValidatedJson<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let message = state
        .auth
        .change_password(user.id, &req.current_password, &req.new_password)
        .await?;

    Ok(Json(ApiResponse::message_only(message)))
}

/// GET /api/v1/auth/me - Get the authenticated account.
pub async fn me(AuthUser(user): AuthUser) -> Result<Json<ApiResponse<MeResponse>>, ApiError> {
    let response = MeResponse {
        user: AccountResponse::from(&user),
    };

    Ok(Json(ApiResponse::new(response, "User retrieved successfully")))
}
