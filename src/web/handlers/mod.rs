//! Request handlers for the Web API.

pub mod auth;
pub mod users;

pub use auth::{
    change_password, forgot_password, login, logout, me, refresh_token, register,
    resend_verification, reset_password, verify_email,
};
pub use users::list_users;

use crate::auth::AuthService;
use crate::db::Database;

/// Application state shared across handlers and middleware.
#[derive(Clone)]
pub struct AppState {
    /// Database handle.
    pub db: Database,
    /// Authentication workflows.
    pub auth: AuthService,
}

impl AppState {
    /// Create the application state.
    pub fn new(db: Database, auth: AuthService) -> Self {
        Self { db, auth }
    }
}
