//! Request handlers.
//!
//! - [`advisory`] -- generative-AI feature endpoints with their strict
//!   status-code contract.
//! - [`creators`] -- creator signup, login, and profile management.

pub mod advisory;
pub mod creators;
