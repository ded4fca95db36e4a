//! Token issuance and verification.
//!
//! Two token families live here:
//!
//! - Signed, expiring JWTs: short-lived access tokens and longer-lived
//!   refresh tokens, signed with *separate* secrets so that compromise of
//!   the access secret cannot forge refresh tokens.
//! - Opaque recovery tokens for password reset and email verification:
//!   32 bytes of OS randomness, hex-encoded. Only the SHA-256 digest of the
//!   raw value is ever stored; lookups go through the digest.

use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand_core::{OsRng, RngCore};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::config::AuthConfig;
use crate::datetime::timestamp_after_secs;

/// Token-related errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum TokenError {
    /// Token is past its expiry.
    #[error("token expired")]
    Expired,

    /// Signature or structure is invalid.
    #[error("invalid token")]
    Invalid,

    /// Token could not be signed.
    #[error("token encoding failed: {0}")]
    Encode(String),
}

/// JWT claims carried by access and refresh tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (account ID).
    pub sub: i64,
    /// Issued at (unix seconds).
    pub iat: u64,
    /// Expiration (unix seconds).
    pub exp: u64,
    /// Unique token identifier.
    pub jti: String,
}

/// An access/refresh token pair.
///
/// Ephemeral value object; callers persist only the refresh member on the
/// account for rotation checks.
#[derive(Debug, Clone)]
pub struct TokenPair {
    /// Signed access token.
    pub token: String,
    /// Signed refresh token.
    pub refresh_token: String,
}

/// A freshly issued recovery token.
///
/// `raw` is returned to the caller (and mailed) exactly once; only `hashed`
/// is persisted, together with the absolute expiry.
#[derive(Debug, Clone)]
pub struct RecoveryToken {
    /// Raw hex token handed to the user.
    pub raw: String,
    /// SHA-256 hex digest stored on the account.
    pub hashed: String,
    /// Absolute expiry as a storage timestamp.
    pub expires_at: String,
}

/// Issues and verifies all token kinds. Pure computation, no I/O.
pub struct TokenService {
    access_encoding: EncodingKey,
    access_decoding: DecodingKey,
    refresh_encoding: EncodingKey,
    refresh_decoding: DecodingKey,
    access_expiry_secs: u64,
    refresh_expiry_secs: u64,
    reset_expiry_secs: u64,
    verification_expiry_secs: u64,
    validation: Validation,
}

impl TokenService {
    /// Create a token service from the authentication configuration.
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::default();
        validation.validate_exp = true;

        Self {
            access_encoding: EncodingKey::from_secret(config.access_token_secret.as_bytes()),
            access_decoding: DecodingKey::from_secret(config.access_token_secret.as_bytes()),
            refresh_encoding: EncodingKey::from_secret(config.refresh_token_secret.as_bytes()),
            refresh_decoding: DecodingKey::from_secret(config.refresh_token_secret.as_bytes()),
            access_expiry_secs: config.access_token_expiry_secs,
            refresh_expiry_secs: config.refresh_token_expiry_secs,
            reset_expiry_secs: config.password_reset_expiry_secs,
            verification_expiry_secs: config.email_verification_expiry_secs,
            validation,
        }
    }

    fn issue(&self, account_id: i64, key: &EncodingKey, ttl_secs: u64) -> Result<String, TokenError> {
        let now = chrono::Utc::now().timestamp() as u64;
        let claims = Claims {
            sub: account_id,
            iat: now,
            exp: now + ttl_secs,
            jti: uuid::Uuid::new_v4().to_string(),
        };

        encode(&Header::default(), &claims, key).map_err(|e| TokenError::Encode(e.to_string()))
    }

    fn verify(&self, token: &str, key: &DecodingKey) -> Result<Claims, TokenError> {
        decode::<Claims>(token, key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => TokenError::Expired,
                _ => TokenError::Invalid,
            })
    }

    /// Issue a signed access token for an account.
    pub fn issue_access_token(&self, account_id: i64) -> Result<String, TokenError> {
        self.issue(account_id, &self.access_encoding, self.access_expiry_secs)
    }

    /// Issue a signed refresh token for an account.
    pub fn issue_refresh_token(&self, account_id: i64) -> Result<String, TokenError> {
        self.issue(account_id, &self.refresh_encoding, self.refresh_expiry_secs)
    }

    /// Issue an access/refresh pair.
    ///
    /// The caller is responsible for persisting the refresh token on the
    /// account.
    pub fn issue_token_pair(&self, account_id: i64) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            token: self.issue_access_token(account_id)?,
            refresh_token: self.issue_refresh_token(account_id)?,
        })
    }

    /// Verify an access token and return its claims.
    pub fn verify_access_token(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify(token, &self.access_decoding)
    }

    /// Verify a refresh token and return its claims.
    pub fn verify_refresh_token(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify(token, &self.refresh_decoding)
    }

    /// Issue a password-reset recovery token.
    pub fn issue_reset_token(&self) -> RecoveryToken {
        issue_recovery_token(self.reset_expiry_secs)
    }

    /// Issue an email-verification recovery token.
    pub fn issue_verification_token(&self) -> RecoveryToken {
        issue_recovery_token(self.verification_expiry_secs)
    }

    /// Access token lifetime in seconds.
    pub fn access_expiry_secs(&self) -> u64 {
        self.access_expiry_secs
    }
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("access_expiry_secs", &self.access_expiry_secs)
            .field("refresh_expiry_secs", &self.refresh_expiry_secs)
            .finish()
    }
}

/// Generate a recovery token with the given lifetime.
pub fn issue_recovery_token(ttl_secs: u64) -> RecoveryToken {
    let mut bytes = [0u8; 32];
    OsRng.fill_bytes(&mut bytes);
    let raw = hex::encode(bytes);
    let hashed = hash_recovery_token(&raw);

    RecoveryToken {
        raw,
        hashed,
        expires_at: timestamp_after_secs(ttl_secs),
    }
}

/// Hash a raw recovery token for storage or lookup.
pub fn hash_recovery_token(raw: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    hex::encode(hasher.finalize())
}
