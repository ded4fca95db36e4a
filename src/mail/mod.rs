//! Outbound mail for accountd.

mod message;
mod service;

pub use message::{email_verification_email, password_reset_email, OutboundEmail};
pub use service::{MailError, MailService};
