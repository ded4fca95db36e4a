//! Request DTOs for the Web API.

use serde::Deserialize;
use validator::Validate;

use super::validation::not_blank;

/// User registration request.
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Display name.
    #[validate(
        length(min = 1, max = 50, message = "Name must be 1-50 characters"),
        custom(function = not_blank)
    )]
    pub name: String,
    /// Email address.
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 6, max = 128, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Login request.
#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address.
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,
    /// Password.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Token refresh request.
#[derive(Debug, Deserialize, Validate)]
pub struct RefreshTokenRequest {
    /// Refresh token.
    #[serde(rename = "refreshToken")]
    #[validate(length(min = 1, message = "Refresh token is required"))]
    pub refresh_token: String,
}

/// Forgot-password request.
#[derive(Debug, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    /// Email address.
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,
}

/// Reset-password request.
#[derive(Debug, Deserialize, Validate)]
pub struct ResetPasswordRequest {
    /// Raw reset token from the email link.
    #[validate(length(min = 1, message = "Token is required"))]
    pub token: String,
    /// New password.
    #[validate(length(min = 6, max = 128, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Resend-verification request.
#[derive(Debug, Deserialize, Validate)]
pub struct ResendVerificationRequest {
    /// Email address.
    #[validate(email(message = "Please provide a valid email"))]
    pub email: String,
}

/// Change-password request.
#[derive(Debug, Deserialize, Validate)]
pub struct ChangePasswordRequest {
    /// Current password.
    #[serde(rename = "currentPassword")]
    #[validate(length(min = 1, message = "Current password is required"))]
    pub current_password: String,
    /// New password.
    #[serde(rename = "newPassword")]
    #[validate(length(min = 6, max = 128, message = "Password must be at least 6 characters"))]
    pub new_password: String,
}

/// Pagination query for listings.
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    /// Page number (1-based).
    #[serde(default = "default_page")]
    pub page: u32,
    /// Items per page.
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_page() -> u32 {
    1
}

fn default_limit() -> u32 {
    10
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: default_page(),
            limit: default_limit(),
        }
    }
}
