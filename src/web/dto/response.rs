//! Response DTOs for the Web API.
//!
//! Every success body uses the `{success, message, data, timestamp}`
//! envelope. Account representations are sanitized here: credential
//! material never leaves the process.

use serde::Serialize;

use crate::db::{Role, User};

// ============================================================================
// Generic Response Wrappers
// ============================================================================

/// Generic API response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Always true for success responses.
    pub success: bool,
    /// Human-readable message.
    pub message: String,
    /// Response data.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Response timestamp (RFC 3339).
    pub timestamp: String,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a success response with data.
    pub fn new(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: Some(data),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

impl ApiResponse<()> {
    /// Create a success response carrying only a message.
    pub fn message_only(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            data: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Pagination metadata.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    /// Current page number (1-based).
    pub page: u32,
    /// Items per page.
    pub limit: u32,
    /// Total number of items.
    pub total: u64,
    /// Total number of pages.
    pub pages: u64,
    /// Whether a next page exists.
    pub has_next: bool,
    /// Whether a previous page exists.
    pub has_prev: bool,
}

impl PaginationMeta {
    /// Build pagination metadata from page, limit, and total count.
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        let pages = if limit == 0 {
            0
        } else {
            total.div_ceil(limit as u64)
        };
        Self {
            page,
            limit,
            total,
            pages,
            has_next: (page as u64) < pages,
            has_prev: page > 1,
        }
    }
}

/// Paginated listing payload.
#[derive(Debug, Serialize)]
pub struct PaginatedData<T: Serialize> {
    /// Page items.
    pub items: Vec<T>,
    /// Pagination metadata.
    pub pagination: PaginationMeta,
}

// ============================================================================
// Account DTOs
// ============================================================================

/// Sanitized account representation.
///
/// Excludes the password hash, refresh token, and recovery-token hashes.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    /// Account ID.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// Role.
    pub role: Role,
    /// Whether the account is active.
    pub is_active: bool,
    /// Whether the email has been verified.
    pub is_email_verified: bool,
    /// Creation timestamp.
    pub created_at: String,
    /// Last update timestamp.
    pub updated_at: String,
}

impl From<&User> for AccountResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
            is_active: user.is_active,
            is_email_verified: user.is_email_verified,
            created_at: user.created_at.clone(),
            updated_at: user.updated_at.clone(),
        }
    }
}

/// Registration and login response payload.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    /// Sanitized account.
    pub user: AccountResponse,
    /// Signed access token.
    pub token: String,
    /// Signed refresh token.
    pub refresh_token: String,
}

/// Token refresh response payload.
#[derive(Debug, Serialize)]
pub struct RefreshResponse {
    /// New access token.
    pub token: String,
}

/// Current-user response payload.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    /// Sanitized account.
    pub user: AccountResponse,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: 1,
            name: "Ana".to_string(),
            email: "ana@x.com".to_string(),
            password: "$argon2id$hash".to_string(),
            role: Role::User,
            is_active: true,
            is_email_verified: false,
            email_verification_token: Some("vhash".to_string()),
            email_verification_expires_at: Some("2099-01-01 00:00:00".to_string()),
            password_reset_token: Some("rhash".to_string()),
            password_reset_expires_at: Some("2099-01-01 00:00:00".to_string()),
            refresh_token: Some("refresh-jwt".to_string()),
            created_at: "2024-01-01 00:00:00".to_string(),
            updated_at: "2024-01-01 00:00:00".to_string(),
        }
    }

    #[test]
    fn test_account_response_excludes_credentials() {
        let user = sample_user();
        let response = AccountResponse::from(&user);
        let json = serde_json::to_string(&response).unwrap();

        assert!(json.contains("ana@x.com"));
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("refresh-jwt"));
        assert!(!json.contains("vhash"));
        assert!(!json.contains("rhash"));
        // No field named password at all
        assert!(!json.contains("password"));
    }

    #[test]
    fn test_api_response_envelope() {
        let response = ApiResponse::new(42, "Success");
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Success");
        assert_eq!(json["data"], 42);
        assert!(json["timestamp"].is_string());
    }

    #[test]
    fn test_message_only_envelope_omits_data() {
        let response = ApiResponse::message_only("Done");
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["success"], true);
        assert!(json.get("data").is_none());
    }

    #[test]
    fn test_pagination_meta() {
        let meta = PaginationMeta::new(2, 10, 25);
        assert_eq!(meta.pages, 3);
        assert!(meta.has_next);
        assert!(meta.has_prev);

        let first = PaginationMeta::new(1, 10, 25);
        assert!(!first.has_prev);
        assert!(first.has_next);

        let last = PaginationMeta::new(3, 10, 25);
        assert!(!last.has_next);

        let empty = PaginationMeta::new(1, 10, 0);
        assert_eq!(empty.pages, 0);
        assert!(!empty.has_next);
    }

    #[test]
    fn test_auth_response_field_names() {
        let user = sample_user();
        let response = AuthResponse {
            user: AccountResponse::from(&user),
            token: "access".to_string(),
            refresh_token: "refresh".to_string(),
        };
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["token"], "access");
        assert_eq!(json["refreshToken"], "refresh");
        assert_eq!(json["user"]["email"], "ana@x.com");
        assert_eq!(json["user"]["isEmailVerified"], false);
    }
}
