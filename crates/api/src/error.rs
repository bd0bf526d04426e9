//! HTTP error types for the two API surfaces.
//!
//! The creator endpoints answer with [`AppError`]'s `{error, code}` body;
//! the advisory endpoints answer with [`AdvisoryError`]'s
//! `{success: false, error}` envelope. Neither lets internal detail reach a
//! 5xx body -- that goes to the logs.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use canopy_advisory::AdvisoryApiError;
use canopy_core::advisory::{Feature, ImageError};
use canopy_core::error::CoreError;
use serde_json::json;

// ---------------------------------------------------------------------------
// AppError -- creator endpoints
// ---------------------------------------------------------------------------

/// Error type for the creator HTTP handlers.
///
/// Domain errors arrive as [`CoreError`]; database errors as `sqlx::Error`.
/// Both convert with `?` via `#[from]`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Request rejected before touching the domain (e.g. neither login
    /// identifier supplied).
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => map_core_error(core),
            AppError::Database(err) => classify_sqlx_error(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                internal_error()
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

/// Status, code, and user-facing message for a domain error.
fn map_core_error(core: &CoreError) -> (StatusCode, &'static str, String) {
    match core {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            internal_error()
        }
    }
}

/// Status, code, and message for a sqlx error.
///
/// `RowNotFound` is a 404. A Postgres 23505 on one of our `uq_`-prefixed
/// unique indexes is a 409 with a per-constraint message. Anything else is
/// a sanitized 500.
fn classify_sqlx_error(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    if matches!(err, sqlx::Error::RowNotFound) {
        return (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            "Resource not found".to_string(),
        );
    }

    if let sqlx::Error::Database(db_err) = err {
        if db_err.code().as_deref() == Some("23505") {
            if let Some(constraint) = db_err.constraint().filter(|c| c.starts_with("uq_")) {
                return (StatusCode::CONFLICT, "CONFLICT", conflict_message(constraint));
            }
        }
    }

    tracing::error!(error = %err, "Database error");
    internal_error()
}

/// Conflict text keyed by the violated unique index.
fn conflict_message(constraint: &str) -> String {
    match constraint {
        "uq_creators_phone" => "A creator with this phone number already exists".to_string(),
        "uq_creators_email" => "A creator with this email address already exists".to_string(),
        other => format!("Duplicate value violates unique constraint: {other}"),
    }
}

fn internal_error() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

// ---------------------------------------------------------------------------
// AdvisoryError -- advisory endpoints
// ---------------------------------------------------------------------------

/// Error type for the advisory HTTP handlers.
///
/// The dashboard frontend branches on these status codes, so each variant
/// pins exactly one.
#[derive(Debug, thiserror::Error)]
pub enum AdvisoryError {
    /// The feature is switched off by configuration. Always 410, checked
    /// before the request body is even parsed.
    #[error("This feature is currently disabled")]
    FeatureDisabled(Feature),

    /// Request body failed parsing or field validation. 400.
    #[error("{0}")]
    Validation(String),

    /// Image payload rejected; the inner variant selects 400, 413, or 415.
    #[error(transparent)]
    Image(#[from] ImageError),

    /// The server has no upstream API key. 500.
    #[error("AI service configuration error")]
    Configuration,

    /// The upstream call failed. 502 with a generic message; detail logged.
    #[error("Advisory service request failed: {0}")]
    Upstream(#[from] AdvisoryApiError),
}

pub type AdvisoryResult<T> = Result<T, AdvisoryError>;

impl IntoResponse for AdvisoryError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AdvisoryError::FeatureDisabled(feature) => {
                tracing::debug!(feature = %feature, "Rejected request for disabled feature");
                // Distinct body shape: clients key off `feature_disabled`.
                let body = json!({
                    "success": false,
                    "feature_disabled": true,
                    "error": self.to_string(),
                });
                return (StatusCode::GONE, axum::Json(body)).into_response();
            }

            AdvisoryError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),

            AdvisoryError::Image(image_err) => {
                let status = match image_err {
                    ImageError::InvalidBase64 => StatusCode::BAD_REQUEST,
                    ImageError::TooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
                    ImageError::UnsupportedType(_) | ImageError::ContentMismatch => {
                        StatusCode::UNSUPPORTED_MEDIA_TYPE
                    }
                };
                (status, image_err.to_string())
            }

            AdvisoryError::Configuration => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "AI service configuration error".to_string(),
            ),

            AdvisoryError::Upstream(err) => {
                tracing::error!(error = %err, "Advisory upstream call failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "The advisory service is currently unavailable. Please try again.".to_string(),
                )
            }
        };

        let body = json!({
            "success": false,
            "error": message,
        });

        (status, axum::Json(body)).into_response()
    }
}
