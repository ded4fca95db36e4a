//! Configuration module for accountd.
//!
//! Configuration is read once at startup from a TOML file, with environment
//! overrides for secrets and mail credentials. The resulting [`Config`] is
//! immutable and passed into the services that need it.

use serde::Deserialize;
use std::path::Path;

use crate::{Result, ServiceError};

/// Server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind.
    #[serde(default = "default_host")]
    pub host: String,
    /// Port number to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Allowed CORS origins. Empty means permissive (development mode).
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_origins: Vec::new(),
        }
    }
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Connection URL (e.g. `sqlite://data/accountd.db`).
    #[serde(default = "default_db_url")]
    pub url: String,
}

fn default_db_url() -> String {
    "sqlite://data/accountd.db".to_string()
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_db_url(),
        }
    }
}

/// Authentication configuration: token secrets and lifetimes.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthConfig {
    /// Secret used to sign access tokens.
    #[serde(default = "default_access_secret")]
    pub access_token_secret: String,
    /// Access token lifetime in seconds.
    ///
    /// The default of 7 days mirrors the reference deployment; hardened
    /// deployments should configure a much shorter lifetime here.
    #[serde(default = "default_access_expiry")]
    pub access_token_expiry_secs: u64,
    /// Secret used to sign refresh tokens. Must differ from the access
    /// secret so that one compromised key cannot forge the other kind.
    #[serde(default = "default_refresh_secret")]
    pub refresh_token_secret: String,
    /// Refresh token lifetime in seconds.
    #[serde(default = "default_refresh_expiry")]
    pub refresh_token_expiry_secs: u64,
    /// Password-reset token lifetime in seconds.
    #[serde(default = "default_reset_expiry")]
    pub password_reset_expiry_secs: u64,
    /// Email-verification token lifetime in seconds.
    #[serde(default = "default_verification_expiry")]
    pub email_verification_expiry_secs: u64,
}

fn default_access_secret() -> String {
    "change-me-access-secret".to_string()
}

fn default_access_expiry() -> u64 {
    7 * 24 * 60 * 60
}

fn default_refresh_secret() -> String {
    "change-me-refresh-secret".to_string()
}

fn default_refresh_expiry() -> u64 {
    30 * 24 * 60 * 60
}

fn default_reset_expiry() -> u64 {
    10 * 60
}

fn default_verification_expiry() -> u64 {
    24 * 60 * 60
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_token_secret: default_access_secret(),
            access_token_expiry_secs: default_access_expiry(),
            refresh_token_secret: default_refresh_secret(),
            refresh_token_expiry_secs: default_refresh_expiry(),
            password_reset_expiry_secs: default_reset_expiry(),
            email_verification_expiry_secs: default_verification_expiry(),
        }
    }
}

/// Outbound mail configuration.
///
/// Mail is delivered through an HTTP provider API. When `enabled` is false
/// the service logs messages instead of sending them.
#[derive(Debug, Clone, Deserialize)]
pub struct MailConfig {
    /// Whether outbound mail is enabled.
    #[serde(default)]
    pub enabled: bool,
    /// Provider API endpoint for sending messages.
    #[serde(default = "default_mail_api_url")]
    pub api_url: String,
    /// Provider API key.
    #[serde(default)]
    pub api_key: String,
    /// From address for all outbound mail.
    #[serde(default = "default_mail_from")]
    pub from: String,
    /// Base URL of the frontend, used to build reset/verification links.
    #[serde(default = "default_frontend_url")]
    pub frontend_url: String,
}

fn default_mail_api_url() -> String {
    "https://api.resend.com/emails".to_string()
}

fn default_mail_from() -> String {
    "noreply@example.com".to_string()
}

fn default_frontend_url() -> String {
    "http://localhost:3000".to_string()
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            api_url: default_mail_api_url(),
            api_key: String::new(),
            from: default_mail_from(),
            frontend_url: default_frontend_url(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Path to the log file.
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_file() -> String {
    "logs/accountd.log".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: default_log_file(),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Server settings.
    #[serde(default)]
    pub server: ServerConfig,
    /// Database settings.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Authentication settings.
    #[serde(default)]
    pub auth: AuthConfig,
    /// Outbound mail settings.
    #[serde(default)]
    pub mail: MailConfig,
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from a TOML file and apply environment overrides.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let mut config: Config = toml::from_str(&content)
            .map_err(|e| ServiceError::Config(format!("failed to parse config: {e}")))?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment overrides for secrets and credentials.
    ///
    /// Secrets should not live in the config file in production; these
    /// variables take precedence when set.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(v) = std::env::var("ACCOUNTD_DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = std::env::var("ACCOUNTD_ACCESS_TOKEN_SECRET") {
            self.auth.access_token_secret = v;
        }
        if let Ok(v) = std::env::var("ACCOUNTD_REFRESH_TOKEN_SECRET") {
            self.auth.refresh_token_secret = v;
        }
        if let Ok(v) = std::env::var("ACCOUNTD_MAIL_API_KEY") {
            self.mail.api_key = v;
        }
    }
}
