//! # Authentication Module
//!
//! Password hashing and verification for coach and parent logins, plus the
//! shared write key required on mutating coach endpoints. Passwords are
//! hashed with Argon2; the legacy system stored them in plaintext spreadsheet
//! cells and compared them client-side, which is not preserved here.

use argon2::{
    Argon2, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::http::HeaderMap;
use classtrack_core::errors::TrackError;
use eyre::Result;

use crate::ApiState;
use crate::middleware::error_handling::AppError;

/// Header carrying the shared write key. The legacy gateway took the same
/// secret as a `key` form field on mutating actions.
pub const WRITE_KEY_HEADER: &str = "x-api-key";

/// Hashes a password with a fresh random salt, returning the PHC string.
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let password_hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| eyre::eyre!("Error hashing password: {}", e))?
        .to_string();

    Ok(password_hash)
}

/// Verifies a password against a stored PHC hash string.
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = argon2::PasswordHash::new(hash)
        .map_err(|e| eyre::eyre!("Invalid password hash: {}", e))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Rejects the request unless it carries the configured write key.
///
/// When no key is configured, writes are open — the same stance as a legacy
/// deployment without the webhook secret set.
pub fn require_write_key(state: &ApiState, headers: &HeaderMap) -> Result<(), AppError> {
    let Some(expected) = &state.write_key else {
        return Ok(());
    };

    let provided = headers
        .get(WRITE_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    if provided == expected {
        Ok(())
    } else {
        Err(AppError(TrackError::Authorization(
            "Missing or invalid write key".to_string(),
        )))
    }
}
