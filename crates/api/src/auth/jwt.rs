//! Access-token issuance and verification for creator accounts.
//!
//! The HS256 JWT minted here is the exact string clients persist under
//! their `authToken` key, so its lifetime is deliberately long for a
//! browser app (an hour by default). Refresh tokens are opaque UUIDs of
//! which only a SHA-256 digest ever touches the database; a leaked
//! creators table cannot be replayed as live sessions.

use canopy_core::types::DbId;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::env_parse;

/// Role claim stamped into every creator token.
pub const CREATOR_ROLE: &str = "creator";

/// Claims carried by an access token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Creator's database id.
    pub sub: DbId,
    /// Role name; always [`CREATOR_ROLE`] for tokens minted here.
    pub role: String,
    /// Expiry, seconds since the Unix epoch.
    pub exp: i64,
    /// Issue time, seconds since the Unix epoch.
    pub iat: i64,
    /// Per-token UUID, available for audit and revocation lists.
    pub jti: String,
}

/// Signing material and lifetimes for token issuance.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    /// Shared HMAC secret for signing and verification.
    pub secret: String,
    /// Access-token lifetime in minutes.
    pub access_token_expiry_mins: i64,
    /// Refresh-token lifetime in days.
    pub refresh_token_expiry_days: i64,
}

impl JwtConfig {
    /// Load JWT settings from the environment.
    ///
    /// | Env Var                    | Required | Default |
    /// |----------------------------|----------|---------|
    /// | `JWT_SECRET`               | **yes**  | --      |
    /// | `JWT_ACCESS_EXPIRY_MINS`   | no       | `60`    |
    /// | `JWT_REFRESH_EXPIRY_DAYS`  | no       | `30`    |
    ///
    /// # Panics
    ///
    /// Panics when `JWT_SECRET` is unset or empty; a server that signs
    /// tokens with a default secret must not come up at all.
    pub fn from_env() -> Self {
        let secret =
            std::env::var("JWT_SECRET").expect("JWT_SECRET must be set in the environment");
        assert!(!secret.is_empty(), "JWT_SECRET must not be empty");

        Self {
            secret,
            access_token_expiry_mins: env_parse("JWT_ACCESS_EXPIRY_MINS", 60),
            refresh_token_expiry_days: env_parse("JWT_REFRESH_EXPIRY_DAYS", 30),
        }
    }
}

/// Mint an HS256 access token for a creator.
pub fn generate_access_token(
    creator_id: DbId,
    role: &str,
    config: &JwtConfig,
) -> Result<String, jsonwebtoken::errors::Error> {
    let issued_at = chrono::Utc::now();
    let expires_at = issued_at + chrono::Duration::minutes(config.access_token_expiry_mins);

    let claims = Claims {
        sub: creator_id,
        role: role.to_string(),
        exp: expires_at.timestamp(),
        iat: issued_at.timestamp(),
        jti: Uuid::new_v4().to_string(),
    };

    // Header::default() selects HS256.
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Verify a token's signature and expiry, returning its [`Claims`].
pub fn validate_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

/// Mint a refresh token as `(plaintext, sha256_hex)`.
///
/// The plaintext goes to the client once; only the digest may be stored.
pub fn generate_refresh_token() -> (String, String) {
    let plaintext = Uuid::new_v4().to_string();
    let digest = hash_refresh_token(&plaintext);
    (plaintext, digest)
}

/// SHA-256 hex digest of a refresh token, for storage and comparison.
pub fn hash_refresh_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_secret(secret: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.to_string(),
            access_token_expiry_mins: 60,
            refresh_token_expiry_days: 30,
        }
    }

    #[test]
    fn test_token_round_trip() {
        let config = config_with_secret("a-long-enough-hmac-secret-for-tests");
        let token = generate_access_token(42, CREATOR_ROLE, &config)
            .expect("token generation should succeed");

        let claims = validate_token(&token, &config).expect("token validation should succeed");
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role, CREATOR_ROLE);
        assert_eq!(claims.exp - claims.iat, 60 * 60, "lifetime honors the config");
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn test_expired_token_rejected() {
        let config = config_with_secret("a-long-enough-hmac-secret-for-tests");

        // Sign claims that expired far beyond the 60-second default leeway.
        let now = chrono::Utc::now().timestamp();
        let stale = Claims {
            sub: 7,
            role: CREATOR_ROLE.to_string(),
            exp: now - 600,
            iat: now - 1200,
            jti: Uuid::new_v4().to_string(),
        };
        let token = encode(
            &Header::default(),
            &stale,
            &EncodingKey::from_secret(config.secret.as_bytes()),
        )
        .expect("encoding should succeed");

        assert!(validate_token(&token, &config).is_err());
    }

    #[test]
    fn test_foreign_secret_rejected() {
        let ours = config_with_secret("secret-used-for-signing");
        let theirs = config_with_secret("some-other-deployment");

        let token = generate_access_token(1, CREATOR_ROLE, &ours)
            .expect("token generation should succeed");
        assert!(validate_token(&token, &theirs).is_err());
    }

    #[test]
    fn test_tampered_token_rejected() {
        let config = config_with_secret("a-long-enough-hmac-secret-for-tests");
        let token = generate_access_token(1, CREATOR_ROLE, &config)
            .expect("token generation should succeed");

        // Flip a char in the payload segment.
        let mut tampered = token.into_bytes();
        let mid = tampered.len() / 2;
        tampered[mid] = if tampered[mid] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(tampered).expect("still utf8");

        assert!(validate_token(&tampered, &config).is_err());
    }

    #[test]
    fn test_refresh_digest_is_stable_hex() {
        let (plaintext, digest) = generate_refresh_token();

        assert_eq!(digest, hash_refresh_token(&plaintext));
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
        // The plaintext itself must never equal its stored form.
        assert_ne!(plaintext, digest);
    }
}
