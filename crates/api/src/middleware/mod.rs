//! Authentication middleware extractors.
//!
//! - [`auth::AuthCreator`] -- Extracts the authenticated creator from a JWT Bearer token.

pub mod auth;
