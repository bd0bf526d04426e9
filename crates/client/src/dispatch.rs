//! Single-flight action dispatch (PRD-11).
//!
//! Every submit button in the original apps disables itself while its
//! action runs. The busy flag here is not just view state, though: the
//! dispatcher itself refuses a second trigger, so even a bypassed disable
//! attribute cannot start a concurrent external call.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};

/// Outcome of a trigger attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Triggered<T> {
    /// The action ran to completion.
    Completed(T),
    /// Another action was in flight; nothing was started.
    Busy,
}

impl<T> Triggered<T> {
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Busy)
    }

    /// The action's result, if it ran.
    pub fn completed(self) -> Option<T> {
        match self {
            Self::Completed(value) => Some(value),
            Self::Busy => None,
        }
    }
}

/// Guards one view's actions: at most one in flight at a time.
#[derive(Debug, Default)]
pub struct ActionDispatcher {
    busy: AtomicBool,
}

impl ActionDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an action is currently in flight (drives button disabling).
    pub fn busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    /// Run `action` unless another action is already in flight.
    ///
    /// On contention this returns [`Triggered::Busy`] without even
    /// constructing the action future. The flag clears when the action
    /// finishes or its future is dropped, so a view unmounted mid-action
    /// cannot wedge the dispatcher. Rejected triggers are not queued.
    pub async fn trigger<T, F, Fut>(&self, action: F) -> Triggered<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = T>,
    {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Triggered::Busy;
        }
        let _reset = BusyReset(&self.busy);
        Triggered::Completed(action().await)
    }
}

/// Clears the busy flag when the trigger future completes or is dropped.
struct BusyReset<'a>(&'a AtomicBool);

impl Drop for BusyReset<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
