//! Client for the hosted generative-language service backing the advisory
//! endpoints (PRD-17).
//!
//! Wraps the REST `generateContent` call behind [`api::AdvisoryApi`] so the
//! HTTP handlers never assemble upstream payloads themselves. Text-only and
//! image-carrying requests share one code path; the caller supplies prompts
//! and already-validated image data.

pub mod api;

pub use api::{AdvisoryApi, AdvisoryApiError};
