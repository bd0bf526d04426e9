//! Shared response envelope types for API handlers.
//!
//! The creator endpoints use the `{ "data": ... }` envelope; the advisory
//! endpoints use `{ "success": true, "data": ... }` to match what their
//! dashboard client branches on. Use these instead of ad-hoc
//! `serde_json::json!` blobs to get compile-time type safety and consistent
//! serialization.

use serde::Serialize;

/// Standard `{ "data": T }` response envelope for creator endpoints.
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// Advisory `{ "success": true, "data": T }` response envelope.
///
/// `success` is always `true` here; failures go through `AdvisoryError`,
/// which renders `{ "success": false, "error": ... }`.
#[derive(Debug, Serialize)]
pub struct AdvisoryResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> AdvisoryResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}
