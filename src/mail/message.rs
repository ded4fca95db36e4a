//! Outbound email messages and templates.

/// An outbound email message.
#[derive(Debug, Clone, serde::Serialize)]
pub struct OutboundEmail {
    /// Sender address.
    pub from: String,
    /// Recipient address.
    pub to: String,
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub text: String,
    /// HTML body.
    pub html: String,
}

/// Build the password-reset email.
///
/// `reset_url` is the frontend reset page; the raw token is appended as a
/// path segment.
pub fn password_reset_email(from: &str, to: &str, reset_url: &str, raw_token: &str) -> OutboundEmail {
    let link = format!("{reset_url}/{raw_token}");

    let text = format!(
        "You requested a password reset. Open the following link to choose a new password:\n\
         {link}\n\n\
         This link will expire in 10 minutes.\n\n\
         If you did not request this, please ignore this email.\n"
    );

    let html = format!(
        "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\
         <h2>Password Reset Request</h2>\
         <p>You requested a password reset. Click the button below to choose a new password:</p>\
         <a href=\"{link}\" style=\"display: inline-block; padding: 10px 20px; \
         background-color: #007bff; color: white; text-decoration: none; border-radius: 5px;\">\
         Reset Password</a>\
         <p>This link will expire in 10 minutes.</p>\
         <p>If you did not request this, please ignore this email.</p>\
         </div>"
    );

    OutboundEmail {
        from: from.to_string(),
        to: to.to_string(),
        subject: "Password Reset Request".to_string(),
        text,
        html,
    }
}

/// Build the email-verification email.
pub fn email_verification_email(
    from: &str,
    to: &str,
    verification_url: &str,
    raw_token: &str,
) -> OutboundEmail {
    let link = format!("{verification_url}/{raw_token}");

    let text = format!(
        "Please verify your email address by opening the following link:\n\
         {link}\n\n\
         This link will expire in 24 hours.\n"
    );

    let html = format!(
        "<div style=\"font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto;\">\
         <h2>Email Verification</h2>\
         <p>Please verify your email address by clicking the button below:</p>\
         <a href=\"{link}\" style=\"display: inline-block; padding: 10px 20px; \
         background-color: #28a745; color: white; text-decoration: none; border-radius: 5px;\">\
         Verify Email</a>\
         <p>This link will expire in 24 hours.</p>\
         </div>"
    );

    OutboundEmail {
        from: from.to_string(),
        to: to.to_string(),
        subject: "Email Verification".to_string(),
        text,
        html,
    }
}
