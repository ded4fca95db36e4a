//! accountd - User account and authentication service.
//!
//! Registration, login, token refresh, password reset, and email
//! verification over HTTP, with JWT-based sessions.

pub mod auth;
pub mod config;
pub mod datetime;
pub mod db;
pub mod error;
pub mod logging;
pub mod mail;
pub mod web;

pub use auth::{
    hash_password, hash_recovery_token, validate_password, verify_password, AuthError,
    AuthService, Claims, PasswordError, RecoveryToken, TokenError, TokenPair, TokenService,
    MAX_PASSWORD_LENGTH, MIN_PASSWORD_LENGTH,
};
pub use config::Config;
pub use db::{Database, NewUser, Role, User, UserRepository, UserUpdate};
pub use error::{Result, ServiceError};
pub use mail::MailService;
pub use web::WebServer;
