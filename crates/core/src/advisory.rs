//! Advisory feature catalogue and upload constraints.
//!
//! The advisory dashboard exposes a fixed set of generative features, each
//! of which can be switched off by configuration. Image-bearing features
//! share a single payload shape and a strict decode path; the ordering of
//! checks inside [`ImagePayload::decode`] is what the HTTP status contract
//! hangs off, so treat it as load-bearing.

use std::fmt;
use std::str::FromStr;

use base64::Engine;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Feature catalogue
// ---------------------------------------------------------------------------

/// One advisory feature. Wire and config names are kebab-case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Feature {
    Chat,
    DiseaseDiagnosis,
    PlantDiagnosis,
    CreditScoring,
}

impl Feature {
    /// All features, in route order.
    pub const ALL: [Feature; 4] = [
        Feature::Chat,
        Feature::DiseaseDiagnosis,
        Feature::PlantDiagnosis,
        Feature::CreditScoring,
    ];

    /// Kebab-case name used in routes and the disabled-features config.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::DiseaseDiagnosis => "disease-diagnosis",
            Self::PlantDiagnosis => "plant-diagnosis",
            Self::CreditScoring => "credit-scoring",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raised when a config value names a feature that does not exist.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown advisory feature: '{0}'")]
pub struct UnknownFeature(pub String);

impl FromStr for Feature {
    type Err = UnknownFeature;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chat" => Ok(Self::Chat),
            "disease-diagnosis" => Ok(Self::DiseaseDiagnosis),
            "plant-diagnosis" => Ok(Self::PlantDiagnosis),
            "credit-scoring" => Ok(Self::CreditScoring),
            other => Err(UnknownFeature(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Image payloads
// ---------------------------------------------------------------------------

/// MIME types accepted for diagnosis uploads.
pub const ALLOWED_IMAGE_MIME: &[&str] = &["image/jpeg", "image/png", "image/webp"];

/// Default upper bound for a decoded diagnosis image (4 MiB).
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 4 * 1024 * 1024;

/// An uploaded image as it arrives on the wire.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePayload {
    /// Base64-encoded image bytes, standard alphabet, no data-URL prefix.
    pub data: String,
    /// Declared MIME type (e.g. `"image/png"`).
    pub mime_type: String,
}

/// Why an uploaded image was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageError {
    #[error("Image data is not valid base64")]
    InvalidBase64,

    #[error("Image exceeds the maximum size of {limit} bytes")]
    TooLarge { limit: usize },

    #[error("Unsupported image type: {0}")]
    UnsupportedType(String),

    #[error("Image content does not match its declared type")]
    ContentMismatch,
}

impl ImagePayload {
    /// Decode and verify the payload against `max_bytes`.
    ///
    /// Checks run in the order the API maps them to statuses: declared MIME
    /// type (415), size (413, with a cheap pre-decode estimate so oversized
    /// uploads are never decoded at all), base64 validity (400), and finally
    /// a magic-byte sniff of the decoded content so a renamed file cannot
    /// smuggle another format past the allowlist (415).
    pub fn decode(&self, max_bytes: usize) -> Result<Vec<u8>, ImageError> {
        if !ALLOWED_IMAGE_MIME.contains(&self.mime_type.as_str()) {
            return Err(ImageError::UnsupportedType(self.mime_type.clone()));
        }

        // Base64 inflates by 4/3, so this bound cannot false-positive.
        let estimated = self.data.len() / 4 * 3;
        if estimated > max_bytes {
            return Err(ImageError::TooLarge { limit: max_bytes });
        }

        let bytes = base64::engine::general_purpose::STANDARD
            .decode(self.data.trim())
            .map_err(|_| ImageError::InvalidBase64)?;
        if bytes.len() > max_bytes {
            return Err(ImageError::TooLarge { limit: max_bytes });
        }

        let sniffed = match image::guess_format(&bytes) {
            Ok(image::ImageFormat::Jpeg) => "image/jpeg",
            Ok(image::ImageFormat::Png) => "image/png",
            Ok(image::ImageFormat::WebP) => "image/webp",
            _ => return Err(ImageError::ContentMismatch),
        };
        if sniffed != self.mime_type {
            return Err(ImageError::ContentMismatch);
        }

        Ok(bytes)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
