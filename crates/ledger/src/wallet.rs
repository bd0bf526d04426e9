//! The browser wallet capability.
//!
//! The wallet is an extension the user may not have installed, so it is
//! modeled as a capability that is either present or absent, checked once
//! per call site through [`WalletProvider`]. No call here retries; the
//! wallet has its own UI and its own timeouts.

use std::sync::Arc;

use async_trait::async_trait;
use canopy_core::token::{TokenAmount, TokenBalance};

/// Errors from wallet calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WalletError {
    /// No wallet extension is present in this environment.
    #[error("No wallet extension available")]
    Unavailable,

    /// The user dismissed the wallet's own confirmation dialog.
    #[error("Wallet request was declined")]
    Declined,

    /// Anything else the extension reports.
    #[error("Wallet call failed: {0}")]
    Failed(String),
}

/// A transfer the user asked the wallet to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferRequest {
    /// Destination account (treasury principal for campaign funding).
    pub to: String,
    pub amount: TokenAmount,
    /// Token symbol the transfer is denominated in.
    pub token: String,
}

/// What the wallet reports back after a transfer attempt.
///
/// A `None` transaction id means the wallet went through its flow but did
/// not produce a ledger transaction; callers must treat that as failure
/// and must not record anything against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferReceipt {
    pub transaction_id: Option<u64>,
}

/// Call surface of the wallet extension.
#[async_trait]
pub trait Wallet: Send + Sync {
    /// Ask the wallet to connect this app (may pop the extension's UI).
    async fn request_connect(&self) -> Result<(), WalletError>;

    /// Principal text of the connected identity.
    async fn principal(&self) -> Result<String, WalletError>;

    /// Balances for every token the wallet tracks, in minor units.
    async fn request_balance(&self) -> Result<Vec<TokenBalance>, WalletError>;

    /// Ask the wallet to move tokens. The wallet shows its own
    /// confirmation UI; a decline surfaces as [`WalletError::Declined`].
    async fn request_transfer(&self, request: TransferRequest)
        -> Result<TransferReceipt, WalletError>;

    /// Whether the wallet considers this app connected.
    async fn is_connected(&self) -> bool;
}

/// Presence or absence of the wallet extension, decided once at startup.
#[derive(Clone)]
pub enum WalletProvider {
    Available(Arc<dyn Wallet>),
    Unavailable,
}

impl WalletProvider {
    /// The wallet, or [`WalletError::Unavailable`] when none is installed.
    pub fn get(&self) -> Result<&Arc<dyn Wallet>, WalletError> {
        match self {
            Self::Available(wallet) => Ok(wallet),
            Self::Unavailable => Err(WalletError::Unavailable),
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available(_))
    }
}
