//! Wallet session gate.
//!
//! Pages that spend tokens render behind this gate: connected or not,
//! which principal, and the last fetched balances. The gate is a
//! capability check, not a route guard -- disconnected pages still render,
//! they just cannot act.

use std::sync::Arc;

use tokio::sync::watch;

use canopy_core::token::TokenBalance;
use canopy_ledger::wallet::WalletProvider;

use crate::notify::Notifier;

/// Message shown when any step of connecting fails.
pub const CONNECT_FAILED_MESSAGE: &str = "Could not connect wallet";

/// Observable session snapshot.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionState {
    pub connected: bool,
    /// Principal text of the connected identity.
    pub principal: Option<String>,
    /// Last fetched balances; empty until a refresh succeeds.
    pub balances: Vec<TokenBalance>,
}

/// Connect/disconnect orchestration over the wallet capability.
pub struct SessionGate {
    provider: WalletProvider,
    notifier: Arc<Notifier>,
    state: watch::Sender<SessionState>,
}

impl SessionGate {
    pub fn new(provider: WalletProvider, notifier: Arc<Notifier>) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            provider,
            notifier,
            state,
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn is_connected(&self) -> bool {
        self.state.borrow().connected
    }

    /// Connect through the wallet extension.
    ///
    /// Absence of the extension and any connect or identity failure all
    /// collapse into one generic notice; the session stays disconnected.
    /// A balance failure after identity is established is different: the
    /// session still counts as connected, balances are just empty until
    /// the next refresh. Returns whether the session is now connected.
    pub async fn connect(&self) -> bool {
        let wallet = match self.provider.get() {
            Ok(wallet) => wallet,
            Err(_) => {
                tracing::warn!("Wallet connect requested but no extension is available");
                self.notifier.error(CONNECT_FAILED_MESSAGE);
                return false;
            }
        };

        if let Err(e) = wallet.request_connect().await {
            tracing::warn!(error = %e, "Wallet connect failed");
            self.notifier.error(CONNECT_FAILED_MESSAGE);
            return false;
        }

        let principal = match wallet.principal().await {
            Ok(principal) => principal,
            Err(e) => {
                tracing::warn!(error = %e, "Wallet identity lookup failed");
                self.notifier.error(CONNECT_FAILED_MESSAGE);
                return false;
            }
        };

        let balances = match wallet.request_balance().await {
            Ok(balances) => balances,
            Err(e) => {
                // Identity is established; the balance is only a cache.
                tracing::warn!(error = %e, "Balance fetch failed after connect");
                Vec::new()
            }
        };

        self.state.send_replace(SessionState {
            connected: true,
            principal: Some(principal),
            balances,
        });
        true
    }

    /// Local reset only. The wallet extension keeps its own session; we
    /// just stop presenting it.
    pub fn disconnect(&self) {
        self.state.send_replace(SessionState::default());
    }

    /// Re-read balances for an already connected session.
    pub async fn refresh_balance(&self) {
        if !self.is_connected() {
            return;
        }
        let Ok(wallet) = self.provider.get() else {
            return;
        };
        match wallet.request_balance().await {
            Ok(balances) => {
                self.state.send_if_modified(|state| {
                    if state.balances == balances {
                        return false;
                    }
                    state.balances = balances;
                    true
                });
            }
            Err(e) => {
                tracing::warn!(error = %e, "Balance refresh failed");
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use canopy_core::token::TokenAmount;
    use canopy_ledger::memory::MemoryWallet;

    use super::*;

    fn icp(e8s: u64) -> TokenBalance {
        TokenBalance {
            symbol: "ICP".to_string(),
            amount: TokenAmount::from_e8s(e8s),
        }
    }

    #[tokio::test]
    async fn connect_establishes_identity_and_balances() {
        let wallet = MemoryWallet::new("w7x7r-cok77-xa").with_balances(vec![icp(250_000_000)]);
        let notifier = Arc::new(Notifier::spawn());
        let gate = SessionGate::new(WalletProvider::Available(Arc::new(wallet)), notifier);

        assert!(gate.connect().await);
        let state = gate.state();
        assert!(state.connected);
        assert_eq!(state.principal.as_deref(), Some("w7x7r-cok77-xa"));
        assert_eq!(state.balances, vec![icp(250_000_000)]);
    }

    #[tokio::test]
    async fn missing_extension_publishes_generic_notice() {
        let notifier = Arc::new(Notifier::spawn());
        let gate = SessionGate::new(WalletProvider::Unavailable, Arc::clone(&notifier));
        let mut notices = notifier.subscribe();

        assert!(!gate.connect().await);
        assert!(!gate.is_connected());

        notices.changed().await.expect("notice snapshot");
        let published = notices.borrow().clone();
        assert_eq!(published.len(), 1);
        assert_eq!(published[0].message, CONNECT_FAILED_MESSAGE);
        assert_eq!(published[0].severity, crate::notify::Severity::Error);
    }

    #[tokio::test]
    async fn declined_connect_stays_disconnected() {
        let wallet = MemoryWallet::new("w7x7r-cok77-xa").decline_connect();
        let notifier = Arc::new(Notifier::spawn());
        let gate = SessionGate::new(
            WalletProvider::Available(Arc::new(wallet)),
            Arc::clone(&notifier),
        );
        let mut notices = notifier.subscribe();

        assert!(!gate.connect().await);
        assert!(!gate.is_connected());
        notices.changed().await.expect("notice snapshot");
        assert_eq!(notices.borrow()[0].message, CONNECT_FAILED_MESSAGE);
    }

    #[tokio::test]
    async fn balance_failure_still_connects() {
        let wallet = MemoryWallet::new("w7x7r-cok77-xa").fail_balances();
        let notifier = Arc::new(Notifier::spawn());
        let gate = SessionGate::new(
            WalletProvider::Available(Arc::new(wallet)),
            Arc::clone(&notifier),
        );

        assert!(gate.connect().await);
        let state = gate.state();
        assert!(state.connected, "identity survives a balance failure");
        assert!(state.balances.is_empty());
        // No notice either; this failure is log-only.
        tokio::task::yield_now().await;
        assert!(notifier.current().is_empty());
    }

    #[tokio::test]
    async fn disconnect_resets_locally() {
        let wallet = MemoryWallet::new("w7x7r-cok77-xa").with_balances(vec![icp(1)]);
        let notifier = Arc::new(Notifier::spawn());
        let gate = SessionGate::new(WalletProvider::Available(Arc::new(wallet)), notifier);

        assert!(gate.connect().await);
        gate.disconnect();
        assert_eq!(gate.state(), SessionState::default());
    }
}
