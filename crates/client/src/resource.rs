//! Remote resource state for a single view.
//!
//! A [`ResourceController`] owns the lifecycle of one fetched resource --
//! the campaign list, one campaign, a dashboard reply -- and publishes
//! every transition over a `tokio::sync::watch` channel so any number of
//! views can render the current state. There is deliberately no caching,
//! no retry, and no request de-duplication: every load runs its call
//! exactly once and the latest completed load wins.

use std::fmt;
use std::future::Future;

use tokio::sync::watch;

/// Message shown for any failed load. The concrete error never reaches
/// the user; it goes to the logs.
pub const LOAD_FAILED_MESSAGE: &str = "Could not load data";

/// Where a view's remote data stands.
#[derive(Debug, Clone, PartialEq)]
pub enum ResourceState<T> {
    /// No load attempted yet.
    Idle,
    Loading,
    Ready(T),
    /// The backend answered and the record does not exist.
    NotFound,
    /// The call failed; the payload is the user-facing message.
    Failed(String),
}

impl<T> ResourceState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    /// The loaded value, if any.
    pub fn ready(&self) -> Option<&T> {
        match self {
            Self::Ready(value) => Some(value),
            _ => None,
        }
    }
}

/// Owns one remote resource and broadcasts its state to views.
pub struct ResourceController<T> {
    state: watch::Sender<ResourceState<T>>,
}

impl<T: Clone> ResourceController<T> {
    pub fn new() -> Self {
        let (state, _) = watch::channel(ResourceState::Idle);
        Self { state }
    }

    /// Receiver for rendering; resolves whenever the state changes.
    pub fn subscribe(&self) -> watch::Receiver<ResourceState<T>> {
        self.state.subscribe()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> ResourceState<T> {
        self.state.borrow().clone()
    }

    /// Run one fetch: `Loading`, then exactly one terminal state.
    ///
    /// A second concurrent `load` is not prevented; it runs its own call
    /// and whichever finishes last determines the final state, matching
    /// the refetch-on-every-visit behavior of the original pages.
    pub async fn load<E, Fut>(&self, fetch: Fut)
    where
        E: fmt::Display,
        Fut: Future<Output = Result<T, E>>,
    {
        self.state.send_replace(ResourceState::Loading);
        match fetch.await {
            Ok(value) => {
                self.state.send_replace(ResourceState::Ready(value));
            }
            Err(e) => {
                tracing::warn!(error = %e, "Resource load failed");
                self.state
                    .send_replace(ResourceState::Failed(LOAD_FAILED_MESSAGE.to_string()));
            }
        }
    }

    /// Like [`load`](Self::load), for lookups that may legitimately find
    /// nothing. `Ok(None)` lands in `NotFound`, which views render as a
    /// quiet empty screen rather than an error.
    pub async fn load_optional<E, Fut>(&self, fetch: Fut)
    where
        E: fmt::Display,
        Fut: Future<Output = Result<Option<T>, E>>,
    {
        self.state.send_replace(ResourceState::Loading);
        match fetch.await {
            Ok(Some(value)) => {
                self.state.send_replace(ResourceState::Ready(value));
            }
            Ok(None) => {
                self.state.send_replace(ResourceState::NotFound);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Resource load failed");
                self.state
                    .send_replace(ResourceState::Failed(LOAD_FAILED_MESSAGE.to_string()));
            }
        }
    }

    /// Apply an optimistic local delta to a `Ready` value.
    ///
    /// No-op in any other state. Deltas are never merged with server
    /// state: the next successful load replaces the value wholesale, so a
    /// wrong guess is corrected by the next fetch rather than reconciled.
    pub fn patch(&self, apply: impl FnOnce(&mut T)) {
        self.state.send_if_modified(|state| {
            if let ResourceState::Ready(value) = state {
                apply(value);
                true
            } else {
                false
            }
        });
    }
}

impl<T: Clone> Default for ResourceController<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
