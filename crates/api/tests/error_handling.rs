//! Tests for the `AppError` and `AdvisoryError` HTTP response mapping.
//!
//! These verify that each error variant produces the correct HTTP status
//! code and body shape. They do NOT need an HTTP server -- they call
//! `IntoResponse` directly on error values.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use http_body_util::BodyExt;

use canopy_advisory::AdvisoryApiError;
use canopy_api::error::{AdvisoryError, AppError};
use canopy_core::advisory::{Feature, ImageError};
use canopy_core::error::CoreError;

/// Helper: convert a response into its status code and parsed JSON body.
async fn status_and_body(response: Response) -> (StatusCode, serde_json::Value) {
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    (status, json)
}

// ---------------------------------------------------------------------------
// Test: AppError mapping (creator endpoints, {error, code} body)
// ---------------------------------------------------------------------------

#[tokio::test]
async fn not_found_error_returns_404() {
    let err = AppError::Core(CoreError::NotFound {
        entity: "Creator",
        id: 42,
    });

    let (status, json) = status_and_body(err.into_response()).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["error"], "Creator with id 42 not found");
}

#[tokio::test]
async fn validation_error_returns_400() {
    let err = AppError::Core(CoreError::Validation("Name is required".into()));

    let (status, json) = status_and_body(err.into_response()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "Name is required");
}

#[tokio::test]
async fn unauthorized_error_returns_401() {
    let err = AppError::Core(CoreError::Unauthorized("Invalid credentials".into()));

    let (status, json) = status_and_body(err.into_response()).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["code"], "UNAUTHORIZED");
    assert_eq!(json["error"], "Invalid credentials");
}

#[tokio::test]
async fn forbidden_error_returns_403() {
    let err = AppError::Core(CoreError::Forbidden("Account is deactivated".into()));

    let (status, json) = status_and_body(err.into_response()).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["code"], "FORBIDDEN");
}

#[tokio::test]
async fn conflict_error_returns_409() {
    let err = AppError::Core(CoreError::Conflict("duplicate phone".into()));

    let (status, json) = status_and_body(err.into_response()).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "CONFLICT");
}

#[tokio::test]
async fn row_not_found_maps_to_404() {
    let err = AppError::Database(sqlx::Error::RowNotFound);

    let (status, json) = status_and_body(err.into_response()).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn internal_error_returns_500_and_sanitizes_message() {
    let err = AppError::InternalError("secret database credentials leaked".into());

    let (status, json) = status_and_body(err.into_response()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["code"], "INTERNAL_ERROR");

    // The response body must NOT contain the original error details.
    let body_text = json.to_string();
    assert!(
        !body_text.contains("secret"),
        "Internal error response must not leak sensitive details"
    );
    assert_eq!(json["error"], "An internal error occurred");
}

// ---------------------------------------------------------------------------
// Test: AdvisoryError mapping ({success: false, error} body)
// ---------------------------------------------------------------------------

#[tokio::test]
async fn feature_disabled_returns_410_with_flag() {
    let err = AdvisoryError::FeatureDisabled(Feature::Chat);

    let (status, json) = status_and_body(err.into_response()).await;

    assert_eq!(status, StatusCode::GONE);
    assert_eq!(json["success"], false);
    assert_eq!(json["feature_disabled"], true);
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn advisory_validation_returns_400() {
    let err = AdvisoryError::Validation("Message is required".into());

    let (status, json) = status_and_body(err.into_response()).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Message is required");
}

#[tokio::test]
async fn image_errors_map_to_400_413_415() {
    let cases = [
        (ImageError::InvalidBase64, StatusCode::BAD_REQUEST),
        (
            ImageError::TooLarge { limit: 4_194_304 },
            StatusCode::PAYLOAD_TOO_LARGE,
        ),
        (
            ImageError::UnsupportedType("image/gif".into()),
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
        ),
        (ImageError::ContentMismatch, StatusCode::UNSUPPORTED_MEDIA_TYPE),
    ];

    for (image_err, expected) in cases {
        let err = AdvisoryError::Image(image_err.clone());
        let (status, json) = status_and_body(err.into_response()).await;
        assert_eq!(status, expected, "wrong status for {image_err:?}");
        assert_eq!(json["success"], false);
    }
}

#[tokio::test]
async fn configuration_error_returns_500_with_fixed_message() {
    let err = AdvisoryError::Configuration;

    let (status, json) = status_and_body(err.into_response()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "AI service configuration error");
}

#[tokio::test]
async fn upstream_error_returns_502_and_hides_detail() {
    let err = AdvisoryError::Upstream(AdvisoryApiError::MalformedResponse(
        "candidates array missing in reply from internal-host:9443".into(),
    ));

    let (status, json) = status_and_body(err.into_response()).await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["success"], false);
    assert!(
        !json.to_string().contains("internal-host"),
        "upstream detail must not reach the client"
    );
}
