//! Creator-platform profile shape shared by the API and the client cache.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// The creator profile as cached client-side and returned by the API.
///
/// Never carries the password hash; the database row type does, and the
/// conversion lives next to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatorProfile {
    pub id: DbId,
    pub name: String,
    pub phone: String,
    pub email: String,
    pub bio: Option<String>,
    pub created_at: Timestamp,
}

fn phone_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\+?[0-9]{7,15}$").expect("phone regex is valid"))
}

/// Validate a phone number: optional leading `+`, then 7 to 15 digits.
pub fn validate_phone(phone: &str) -> Result<(), CoreError> {
    if phone_regex().is_match(phone) {
        Ok(())
    } else {
        Err(CoreError::validation(
            "Phone number must be 7 to 15 digits, optionally prefixed with +",
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plausible_phone_numbers_accepted() {
        assert!(validate_phone("+14155551234").is_ok());
        assert!(validate_phone("08012345678").is_ok());
        assert!(validate_phone("1234567").is_ok());
    }

    #[test]
    fn malformed_phone_numbers_rejected() {
        assert!(validate_phone("").is_err());
        assert!(validate_phone("+").is_err());
        assert!(validate_phone("123456").is_err());
        assert!(validate_phone("1234567890123456").is_err());
        assert!(validate_phone("555-1234").is_err());
        assert!(validate_phone("call me").is_err());
        assert!(validate_phone("+1 415 555 1234").is_err());
    }
}
