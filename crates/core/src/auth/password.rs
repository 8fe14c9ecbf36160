//! Password hashing with Argon2id.
//!
//! The work factor maps onto Argon2's iteration count; memory and parallelism
//! stay at the crate defaults.

use argon2::{
    Algorithm, Argon2, Params, PasswordHash, Version,
    password_hash::{PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use thiserror::Error;

/// Errors that can occur during password operations.
#[derive(Debug, Error)]
pub enum PasswordError {
    /// Failed to hash password.
    #[error("failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password.
    #[error("failed to verify password: {0}")]
    VerifyError(String),

    /// Invalid password hash format.
    #[error("invalid password hash format")]
    InvalidHash,

    /// Work factor outside what Argon2 accepts.
    #[error("invalid work factor: {0}")]
    InvalidCost(u32),
}

/// Hashes a password with Argon2id at an explicit work factor (iteration count).
///
/// # Errors
///
/// Returns `PasswordError::InvalidCost` for a zero cost and
/// `PasswordError::HashError` if hashing fails.
///
/// # Example
///
/// ```
/// use hrm_core::auth::hash_password_with_cost;
///
/// let hash = hash_password_with_cost("my_secure_password", 2).unwrap();
/// assert!(hash.starts_with("$argon2id$"));
/// ```
pub fn hash_password_with_cost(password: &str, cost: u32) -> Result<String, PasswordError> {
    let params = Params::new(Params::DEFAULT_M_COST, cost, Params::DEFAULT_P_COST, None)
        .map_err(|_| PasswordError::InvalidCost(cost))?;
    let salt = SaltString::generate(&mut OsRng);
    Argon2::new(Algorithm::Argon2id, Version::V0x13, params)
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::HashError(e.to_string()))
}

/// Verifies a password against a PHC-format hash.
///
/// Parameters embedded in the hash are honoured, so hashes created with any
/// work factor verify here.
///
/// # Errors
///
/// Returns `PasswordError::InvalidHash` if the hash format is invalid.
/// Returns `PasswordError::VerifyError` if verification fails unexpectedly.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| PasswordError::InvalidHash)?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(PasswordError::VerifyError(e.to_string())),
    }
}
