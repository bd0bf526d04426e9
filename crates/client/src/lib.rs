//! Page orchestration for the Canopy front ends (PRD-3, PRD-11).
//!
//! Every screen in the original apps repeats one pattern: fetch something
//! remote into `{data, loading, error}`, guard a submit button while an
//! action runs, flash a transient notice, and gate pages on a wallet or
//! login session. This crate is that pattern, once:
//!
//! - [`ResourceController`] tracks one remote resource per view, observable
//!   as [`ResourceState`] through a `tokio::sync::watch` channel.
//! - [`ActionDispatcher`] keeps at most one action in flight per view.
//! - [`Notifier`] owns transient notices with a fixed 5 second lifetime,
//!   expired by a single background task.
//! - [`SessionGate`] handles wallet connect/disconnect and cached balances.
//! - [`flows`] composes the multi-step campaign actions (fund, create,
//!   withdraw) from the pieces above.
//! - [`CredentialStore`] persists the two durable keys of the creator app.

pub mod dispatch;
pub mod flows;
pub mod notify;
pub mod resource;
pub mod session;
pub mod store;

pub use dispatch::{ActionDispatcher, Triggered};
pub use notify::{Notice, Notifier, Severity, NOTICE_TTL};
pub use resource::{ResourceController, ResourceState};
pub use session::{SessionGate, SessionState};
pub use store::{CredentialStore, StoreError};
