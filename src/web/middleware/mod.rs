//! Middleware for the Web API.

pub mod auth;
pub mod cors;
pub mod request_id;

pub use auth::{auth_gate, require_role, AuthUser, OptionalAuthUser};
pub use cors::create_cors_layer;
pub use request_id::{current_request_id, request_id, RequestId, REQUEST_ID_HEADER};
