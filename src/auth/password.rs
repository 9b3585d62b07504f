//! Password hashing and verification (argon2id)
//!
//! Hashes are PHC strings carrying their own salt and cost parameters, so
//! verification needs nothing but the stored string.

use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use rand::rngs::OsRng;
use std::sync::OnceLock;

use crate::error::{Result, RustyCredsError};

/// Hash a plaintext password with a fresh random salt
pub fn hash_password(plain: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| RustyCredsError::HashError(format!("Failed to hash password: {}", e)))
}

/// Verify a plaintext password against a stored hash
///
/// A stored value that is not a valid PHC string never verifies.
pub fn verify_password(plain: &str, hashed: &str) -> bool {
    let parsed = match PasswordHash::new(hashed) {
        Ok(parsed) => parsed,
        Err(e) => {
            log::warn!("Stored password hash could not be parsed: {}", e);
            return false;
        }
    };

    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .is_ok()
}

/// Burn one verification's worth of CPU for a login attempt on an unknown email
///
/// Keeps the unknown-email path as slow as the wrong-password path.
pub(crate) fn verify_against_dummy(plain: &str) {
    static DUMMY_HASH: OnceLock<Option<String>> = OnceLock::new();

    let dummy = DUMMY_HASH.get_or_init(|| hash_password("dummy-password-never-matches").ok());
    if let Some(hash) = dummy {
        let _ = verify_password(plain, hash);
    }
}
