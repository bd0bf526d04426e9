//! Shared domain types, errors, and pure validation logic for the Canopy
//! workspace. Nothing in this crate performs I/O; everything is directly
//! unit-testable.

pub mod advisory;
pub mod campaign;
pub mod creator;
pub mod error;
pub mod token;
pub mod types;
