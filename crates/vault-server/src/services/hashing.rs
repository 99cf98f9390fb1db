//! Account password hashing

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};

use crate::error::ApiError;

/// Hash a password into an Argon2id PHC string
///
/// Runs on the blocking pool; Argon2 is deliberately slow.
pub async fn hash_password(password: String) -> Result<String, ApiError> {
    tokio::task::spawn_blocking(move || {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| ApiError::Hashing(e.to_string()))
    })
    .await
    .map_err(|e| ApiError::Hashing(e.to_string()))?
}

/// Check a password against a stored PHC string
pub async fn verify_password(password: String, stored: String) -> Result<bool, ApiError> {
    tokio::task::spawn_blocking(move || -> Result<bool, ApiError> {
        let parsed = PasswordHash::new(&stored).map_err(|e| ApiError::Hashing(e.to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    })
    .await
    .map_err(|e| ApiError::Hashing(e.to_string()))?
}
