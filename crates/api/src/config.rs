//! Environment-driven server configuration.

use std::collections::HashSet;
use std::str::FromStr;

use canopy_core::advisory::{Feature, DEFAULT_MAX_IMAGE_BYTES};

use crate::auth::jwt::JwtConfig;

const DEFAULT_ADVISORY_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_ADVISORY_MODEL: &str = "gemini-1.5-flash";

/// Everything the server reads from the environment, gathered at startup.
///
/// Defaults target local development; deployments override per variable.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address. `HOST`, default `0.0.0.0`.
    pub host: String,
    /// Bind port. `PORT`, default `3000`.
    pub port: u16,
    /// CORS origin allowlist. Comma-separated `CORS_ORIGINS`, default
    /// `http://localhost:5173`.
    pub cors_origins: Vec<String>,
    /// Per-request timeout in seconds. `REQUEST_TIMEOUT_SECS`, default `30`.
    pub request_timeout_secs: u64,
    /// Drain budget on shutdown in seconds. `SHUTDOWN_TIMEOUT_SECS`,
    /// default `30`.
    #[allow(dead_code)]
    pub shutdown_timeout_secs: u64,
    /// Token signing settings; see [`JwtConfig::from_env`].
    pub jwt: JwtConfig,
    /// Upstream generative-language settings; see [`AdvisoryConfig::from_env`].
    pub advisory: AdvisoryConfig,
}

impl ServerConfig {
    /// Read every variable. Values that fail to parse panic, naming the
    /// variable.
    pub fn from_env() -> Self {
        Self {
            host: env_or("HOST", "0.0.0.0"),
            port: env_parse("PORT", 3000u16),
            cors_origins: split_csv(&env_or("CORS_ORIGINS", "http://localhost:5173")),
            request_timeout_secs: env_parse("REQUEST_TIMEOUT_SECS", 30u64),
            shutdown_timeout_secs: env_parse("SHUTDOWN_TIMEOUT_SECS", 30u64),
            jwt: JwtConfig::from_env(),
            advisory: AdvisoryConfig::from_env(),
        }
    }
}

/// Upstream generative-language configuration.
#[derive(Debug, Clone)]
pub struct AdvisoryConfig {
    /// API key. `ADVISORY_API_KEY`; `None` keeps the server up, the
    /// advisory endpoints then answer with a configuration error.
    pub api_key: Option<String>,
    /// Base URL of the upstream service. `ADVISORY_API_URL`.
    pub api_url: String,
    /// Model identifier placed in the request path. `ADVISORY_MODEL`.
    pub model: String,
    /// Features forced to answer 410 Gone. `ADVISORY_DISABLED_FEATURES`,
    /// comma-separated kebab-case names, default empty.
    pub disabled_features: HashSet<Feature>,
    /// Decoded-image size cap in bytes. `ADVISORY_MAX_IMAGE_BYTES`,
    /// default 4 MiB.
    pub max_image_bytes: usize,
}

impl AdvisoryConfig {
    /// Read the `ADVISORY_*` variables.
    ///
    /// An empty `ADVISORY_API_KEY` counts as unset. An unknown name in
    /// `ADVISORY_DISABLED_FEATURES` panics; a typo must not leave a
    /// feature silently enabled.
    pub fn from_env() -> Self {
        let api_key = std::env::var("ADVISORY_API_KEY")
            .ok()
            .filter(|key| !key.is_empty());

        let disabled_raw = std::env::var("ADVISORY_DISABLED_FEATURES").unwrap_or_default();
        let disabled_features = split_csv(&disabled_raw)
            .into_iter()
            .map(|name| {
                name.parse().unwrap_or_else(|e| {
                    panic!("Invalid ADVISORY_DISABLED_FEATURES entry '{name}': {e}")
                })
            })
            .collect();

        Self {
            api_key,
            api_url: env_or("ADVISORY_API_URL", DEFAULT_ADVISORY_URL),
            model: env_or("ADVISORY_MODEL", DEFAULT_ADVISORY_MODEL),
            disabled_features,
            max_image_bytes: env_parse("ADVISORY_MAX_IMAGE_BYTES", DEFAULT_MAX_IMAGE_BYTES),
        }
    }
}

// ---------------------------------------------------------------------------
// Env helpers
// ---------------------------------------------------------------------------

fn env_or(var: &str, default: &str) -> String {
    std::env::var(var).unwrap_or_else(|_| default.to_string())
}

/// Parse `var` into `T`, falling back to `default` when the variable is
/// unset. A set-but-unparseable value panics.
pub(crate) fn env_parse<T: FromStr>(var: &str, default: T) -> T {
    match std::env::var(var) {
        Ok(raw) => raw.parse().unwrap_or_else(|_| {
            panic!("{var} must be a valid {}", std::any::type_name::<T>())
        }),
        Err(_) => default,
    }
}

/// Split a comma-separated value into trimmed, non-empty entries.
fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
