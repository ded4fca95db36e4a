//! Account authentication workflows.
//!
//! Orchestrates registration, login, token refresh, logout, and the
//! credential-recovery flows over the token service, password hasher,
//! user repository, and mail service.
//!
//! Security posture: login failures (unknown email, inactive account,
//! wrong password) are collapsed into one indistinguishable error, and
//! forgot-password always answers with the same generic message, so that
//! responses do not reveal whether an email is registered. Email delivery
//! is best-effort in every flow: a send failure is logged and the issued
//! recovery token stays valid until its natural expiry (the resend
//! endpoint covers lost mail).

use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};

use crate::db::{Database, NewUser, User, UserRepository};
use crate::mail::MailService;
use crate::ServiceError;

use super::password::{hash_password, verify_password, PasswordError};
use super::token::{hash_recovery_token, TokenPair, TokenService};

/// Generic reply for forgot-password, independent of account existence.
const FORGOT_PASSWORD_MESSAGE: &str = "If the email exists, a password reset link has been sent";

/// Authentication workflow errors.
///
/// A closed set; the HTTP boundary maps each variant to a status code and
/// a safe client message.
#[derive(Error, Debug)]
pub enum AuthError {
    /// Registration attempted with an email that is already taken.
    #[error("user already exists with this email")]
    EmailTaken,

    /// Login failed: unknown email, inactive account, or wrong password.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Refresh token failed verification or did not match the stored one.
    #[error("invalid or expired refresh token")]
    InvalidRefreshToken,

    /// Password-reset token unknown or expired.
    #[error("invalid or expired reset token")]
    InvalidResetToken,

    /// Email-verification token unknown or expired.
    #[error("invalid or expired verification token")]
    InvalidVerificationToken,

    /// Account does not exist (authenticated flows).
    #[error("user not found")]
    AccountNotFound,

    /// Email address is already verified.
    #[error("email already verified")]
    AlreadyVerified,

    /// Current password did not verify on password change.
    #[error("current password is incorrect")]
    WrongPassword,

    /// New password fails the password rules.
    #[error("{0}")]
    WeakPassword(#[from] PasswordError),

    /// Unexpected failure; detail is logged, not shown to clients.
    #[error("internal error: {0}")]
    Internal(String),
}

impl From<ServiceError> for AuthError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::Conflict(_) => AuthError::EmailTaken,
            other => AuthError::Internal(other.to_string()),
        }
    }
}

/// Service for account authentication operations.
#[derive(Clone)]
pub struct AuthService {
    db: Database,
    tokens: Arc<TokenService>,
    mail: MailService,
}

impl AuthService {
    /// Create a new authentication service.
    pub fn new(db: Database, tokens: Arc<TokenService>, mail: MailService) -> Self {
        Self { db, tokens, mail }
    }

    /// Access the token service.
    pub fn tokens(&self) -> &TokenService {
        &self.tokens
    }

    fn repo(&self) -> UserRepository<'_> {
        UserRepository::new(self.db.pool())
    }

    /// Register a new account.
    ///
    /// Persists the account with a hashed password, issues an
    /// email-verification token and a token pair, stores the refresh token,
    /// and sends the verification email best-effort.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<(User, TokenPair), AuthError> {
        let email = normalize_email(email);
        let repo = self.repo();

        if repo.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = hash_password(password)?;
        let user = repo
            .create(&NewUser::new(name.trim(), &email, password_hash))
            .await?;

        let verification = self.tokens.issue_verification_token();
        repo.set_verification_token(user.id, &verification.hashed, &verification.expires_at)
            .await?;

        let pair = self
            .tokens
            .issue_token_pair(user.id)
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        repo.set_refresh_token(user.id, &pair.refresh_token).await?;

        if let Err(e) = self
            .mail
            .send_email_verification(&user.email, &verification.raw)
            .await
        {
            // Registration still succeeds; the user can request a resend
            error!(email = %user.email, error = %e, "Verification email could not be sent");
        } else {
            info!(email = %user.email, "Verification email sent");
        }

        info!(user_id = user.id, email = %user.email, "User registered");

        let user = self.reload(user.id).await?;
        Ok((user, pair))
    }

    /// Log in with email and password.
    ///
    /// Issues and persists a fresh token pair; any previously stored
    /// refresh token is overwritten and thereby invalidated.
    pub async fn login(&self, email: &str, password: &str) -> Result<(User, TokenPair), AuthError> {
        let email = normalize_email(email);
        let repo = self.repo();

        let user = match repo.find_by_email(&email).await? {
            Some(u) => u,
            None => {
                warn!(email = %email, "Login failed: unknown email");
                return Err(AuthError::InvalidCredentials);
            }
        };

        if !user.is_active {
            warn!(user_id = user.id, "Login failed: account inactive");
            return Err(AuthError::InvalidCredentials);
        }

        if !verify_password(password, &user.password) {
            warn!(user_id = user.id, "Login failed: wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let pair = self
            .tokens
            .issue_token_pair(user.id)
            .map_err(|e| AuthError::Internal(e.to_string()))?;
        repo.set_refresh_token(user.id, &pair.refresh_token).await?;

        info!(user_id = user.id, email = %user.email, "User logged in");

        let user = self.reload(user.id).await?;
        Ok((user, pair))
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// The presented token must verify under the refresh secret and match
    /// the account's stored refresh token byte for byte; a token superseded
    /// by a later login is rejected. The refresh token itself is not
    /// rotated here.
    pub async fn refresh_access_token(&self, refresh_token: &str) -> Result<String, AuthError> {
        let claims = self
            .tokens
            .verify_refresh_token(refresh_token)
            .map_err(|_| AuthError::InvalidRefreshToken)?;

        let user = self
            .repo()
            .find_by_id(claims.sub)
            .await?
            .ok_or(AuthError::InvalidRefreshToken)?;

        if user.refresh_token.as_deref() != Some(refresh_token) {
            warn!(user_id = user.id, "Refresh rejected: token superseded");
            return Err(AuthError::InvalidRefreshToken);
        }

        self.tokens
            .issue_access_token(user.id)
            .map_err(|e| AuthError::Internal(e.to_string()))
    }

    /// Log out an account by clearing its stored refresh token. Idempotent.
    pub async fn logout(&self, account_id: i64) -> Result<(), AuthError> {
        self.repo().clear_refresh_token(account_id).await?;
        info!(user_id = account_id, "User logged out");
        Ok(())
    }

    /// Start the password-reset flow.
    ///
    /// Always returns the same generic message, whether or not the account
    /// exists.
    pub async fn forgot_password(&self, email: &str) -> Result<String, AuthError> {
        let email = normalize_email(email);
        let repo = self.repo();

        let user = match repo.find_by_email(&email).await? {
            Some(u) => u,
            None => return Ok(FORGOT_PASSWORD_MESSAGE.to_string()),
        };

        let reset = self.tokens.issue_reset_token();
        repo.set_reset_token(user.id, &reset.hashed, &reset.expires_at)
            .await?;

        if let Err(e) = self.mail.send_password_reset(&user.email, &reset.raw).await {
            // Token stays valid until expiry; the flow stays unobservable
            error!(email = %user.email, error = %e, "Password reset email could not be sent");
        } else {
            info!(email = %user.email, "Password reset email sent");
        }

        Ok(FORGOT_PASSWORD_MESSAGE.to_string())
    }

    /// Complete the password-reset flow with a raw reset token.
    pub async fn reset_password(
        &self,
        raw_token: &str,
        new_password: &str,
    ) -> Result<String, AuthError> {
        let repo = self.repo();

        let user = repo
            .find_by_reset_token(&hash_recovery_token(raw_token))
            .await?
            .ok_or(AuthError::InvalidResetToken)?;

        let password_hash = hash_password(new_password)?;
        repo.reset_password(user.id, &password_hash).await?;

        info!(user_id = user.id, "Password reset successful");

        Ok("Password reset successfully".to_string())
    }

    /// Verify an email address with a raw verification token.
    pub async fn verify_email(&self, raw_token: &str) -> Result<String, AuthError> {
        let repo = self.repo();

        let user = repo
            .find_by_verification_token(&hash_recovery_token(raw_token))
            .await?
            .ok_or(AuthError::InvalidVerificationToken)?;

        repo.mark_email_verified(user.id).await?;

        info!(user_id = user.id, email = %user.email, "Email verified");

        Ok("Email verified successfully".to_string())
    }

    /// Reissue and resend the verification email.
    pub async fn resend_verification_email(&self, email: &str) -> Result<String, AuthError> {
        let email = normalize_email(email);
        let repo = self.repo();

        let user = repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        if user.is_email_verified {
            return Err(AuthError::AlreadyVerified);
        }

        let verification = self.tokens.issue_verification_token();
        repo.set_verification_token(user.id, &verification.hashed, &verification.expires_at)
            .await?;

        if let Err(e) = self
            .mail
            .send_email_verification(&user.email, &verification.raw)
            .await
        {
            error!(email = %user.email, error = %e, "Verification email could not be sent");
        } else {
            info!(email = %user.email, "Verification email resent");
        }

        Ok("Verification email sent".to_string())
    }

    /// Change the password of an authenticated account.
    ///
    /// Outstanding refresh tokens are not revoked by this operation.
    pub async fn change_password(
        &self,
        account_id: i64,
        current_password: &str,
        new_password: &str,
    ) -> Result<String, AuthError> {
        let repo = self.repo();

        let user = repo
            .find_by_id(account_id)
            .await?
            .ok_or(AuthError::AccountNotFound)?;

        if !verify_password(current_password, &user.password) {
            return Err(AuthError::WrongPassword);
        }

        let password_hash = hash_password(new_password)?;
        repo.set_password(user.id, &password_hash).await?;

        info!(user_id = user.id, "Password changed");

        Ok("Password changed successfully".to_string())
    }

    async fn reload(&self, id: i64) -> Result<User, AuthError> {
        self.repo()
            .find_by_id(id)
            .await?
            .ok_or(AuthError::AccountNotFound)
    }
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService").finish()
    }
}

/// Normalize an email for storage and lookup.
fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
