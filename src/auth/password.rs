//! Password hashing and validation.
//!
//! Argon2id with fixed cost parameters. Verification fails closed: a
//! malformed stored hash behaves exactly like a wrong password, and no
//! error ever surfaces to callers.

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2, Params,
};
use rand_core::OsRng;
use thiserror::Error;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Maximum password length.
pub const MAX_PASSWORD_LENGTH: usize = 128;

// Fixed Argon2id cost: 64 MiB memory, 3 iterations, 4 lanes.
const ARGON2_M_COST_KIB: u32 = 65536;
const ARGON2_T_COST: u32 = 3;
const ARGON2_P_COST: u32 = 4;

/// Password-related errors.
#[derive(Error, Debug)]
pub enum PasswordError {
    /// Password is shorter than [`MIN_PASSWORD_LENGTH`].
    #[error("password must be {MIN_PASSWORD_LENGTH} characters or longer")]
    TooShort,

    /// Password is longer than [`MAX_PASSWORD_LENGTH`].
    #[error("password must be {MAX_PASSWORD_LENGTH} characters or shorter")]
    TooLong,

    /// Hashing itself failed.
    #[error("password hashing failed: {0}")]
    HashError(String),
}

fn hasher() -> Argon2<'static> {
    let params = Params::new(ARGON2_M_COST_KIB, ARGON2_T_COST, ARGON2_P_COST, None)
        .expect("valid Argon2 params");
    Argon2::new(argon2::Algorithm::Argon2id, argon2::Version::V0x13, params)
}

/// Hash a password with Argon2id and a fresh random salt.
///
/// The PHC output string embeds the salt and cost parameters, so hashing
/// the same password twice yields different strings.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    validate_password(password)?;

    let salt = SaltString::generate(&mut OsRng);
    let hashed = hasher()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| PasswordError::HashError(e.to_string()))?;

    Ok(hashed.to_string())
}

/// Verify a password against a stored PHC hash string.
///
/// Returns `true` iff the password matches. An unparsable stored hash
/// returns `false`; this function never errors.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored) else {
        return false;
    };

    // Cost parameters come from the parsed hash, not from hasher()
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

/// Validate password length requirements.
pub fn validate_password(password: &str) -> Result<(), PasswordError> {
    match password.len() {
        n if n < MIN_PASSWORD_LENGTH => Err(PasswordError::TooShort),
        n if n > MAX_PASSWORD_LENGTH => Err(PasswordError::TooLong),
        _ => Ok(()),
    }
}
