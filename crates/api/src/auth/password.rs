//! Password hashing for creator accounts.
//!
//! Hashes are Argon2id in PHC string form, so parameters and salt travel
//! inside the stored value and can be upgraded without a schema change.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

/// Shortest password accepted at signup.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Hash a plaintext password with a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Check a plaintext password against a stored PHC hash.
///
/// A mismatch is `Ok(false)`, not an error; errors mean the stored hash
/// itself is unusable.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

/// Reject passwords shorter than [`MIN_PASSWORD_LENGTH`].
///
/// The `Err` payload is the user-facing message.
pub fn validate_password_strength(password: &str) -> Result<(), String> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "Password must be at least {MIN_PASSWORD_LENGTH} characters long"
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_correct_password_verifies() {
        let hash = hash_password("rain-barrel-47").expect("hashing should succeed");
        assert!(hash.starts_with("$argon2id$"), "expected a PHC argon2id string");
        assert!(verify_password("rain-barrel-47", &hash).expect("verify should succeed"));
    }

    #[test]
    fn test_wrong_password_is_false_not_error() {
        let hash = hash_password("rain-barrel-47").expect("hashing should succeed");
        let verified = verify_password("rain-barrel-48", &hash).expect("verify should succeed");
        assert!(!verified);
    }

    #[test]
    fn test_same_password_hashes_differently() {
        // Fresh salt per hash; equal inputs must not produce equal hashes.
        let a = hash_password("rain-barrel-47").expect("hashing should succeed");
        let b = hash_password("rain-barrel-47").expect("hashing should succeed");
        assert_ne!(a, b);
    }

    #[test]
    fn test_garbage_stored_hash_is_an_error() {
        assert!(verify_password("whatever", "not-a-phc-string").is_err());
    }

    #[test]
    fn test_short_password_rejected_with_message() {
        let msg = validate_password_strength("seven77").unwrap_err();
        assert!(msg.contains("at least 8 characters"));
    }

    #[test]
    fn test_minimum_length_boundary() {
        assert!(validate_password_strength("eight888").is_ok());
        assert!(validate_password_strength("seven77").is_err());
    }
}
