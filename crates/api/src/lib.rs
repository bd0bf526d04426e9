//! Canopy API server library.
//!
//! Everything the binary wires together lives here as public modules, so
//! the integration tests can assemble the same router without spawning a
//! separate process.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
