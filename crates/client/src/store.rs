//! Persisted client credentials.
//!
//! The creator app keeps exactly two keys across restarts: the cached
//! profile under `currentCreator` and the bearer token under `authToken`.
//! Each key is one file in the store directory. There is no expiry and no
//! integrity check beyond parseability: a profile that no longer parses
//! is cleared and reported as absent, so one bad write can never wedge
//! startup into a crash loop.

use std::fs;
use std::io;
use std::path::PathBuf;

use canopy_core::creator::CreatorProfile;

/// Key holding the cached profile JSON.
pub const CREATOR_KEY: &str = "currentCreator";

/// Key holding the bearer token string.
pub const TOKEN_KEY: &str = "authToken";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Credential store I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("Could not serialize profile: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// File-backed store for the two credential keys.
pub struct CredentialStore {
    dir: PathBuf,
}

impl CredentialStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Cache the profile under [`CREATOR_KEY`].
    pub fn save_creator(&self, profile: &CreatorProfile) -> Result<(), StoreError> {
        self.write_key(CREATOR_KEY, &serde_json::to_vec(profile)?)
    }

    /// Load the cached profile.
    ///
    /// A missing key is `None`. A key that fails to parse is cleared and
    /// also reported as `None` -- the caller re-authenticates, it never
    /// sees the corrupt blob.
    pub fn load_creator(&self) -> Result<Option<CreatorProfile>, StoreError> {
        let Some(bytes) = self.read_key(CREATOR_KEY)? else {
            return Ok(None);
        };
        match serde_json::from_slice(&bytes) {
            Ok(profile) => Ok(Some(profile)),
            Err(e) => {
                tracing::warn!(error = %e, "Cached creator profile unreadable; clearing it");
                self.clear_key(CREATOR_KEY)?;
                Ok(None)
            }
        }
    }

    /// Persist the bearer token under [`TOKEN_KEY`].
    pub fn save_token(&self, token: &str) -> Result<(), StoreError> {
        self.write_key(TOKEN_KEY, token.as_bytes())
    }

    /// Load the bearer token, if any.
    pub fn load_token(&self) -> Result<Option<String>, StoreError> {
        match self.read_key(TOKEN_KEY)? {
            Some(bytes) => Ok(Some(String::from_utf8_lossy(&bytes).into_owned())),
            None => Ok(None),
        }
    }

    /// Remove both keys (logout).
    pub fn clear(&self) -> Result<(), StoreError> {
        self.clear_key(CREATOR_KEY)?;
        self.clear_key(TOKEN_KEY)?;
        Ok(())
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }

    /// Write via a temp file and rename so readers never see a torn key.
    fn write_key(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        fs::create_dir_all(&self.dir)?;
        let tmp = self.dir.join(format!(".{key}.tmp"));
        fs::write(&tmp, bytes)?;
        fs::rename(&tmp, self.key_path(key))?;
        Ok(())
    }

    fn read_key(&self, key: &str) -> Result<Option<Vec<u8>>, StoreError> {
        match fs::read(self.key_path(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn clear_key(&self, key: &str) -> Result<(), StoreError> {
        match fs::remove_file(self.key_path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
