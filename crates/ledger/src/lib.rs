//! Seams to the crowdfunding app's two external collaborators (PRD-3):
//!
//! - [`LedgerActor`] is the remote canister that stores campaign records.
//! - [`Wallet`] is the browser wallet extension that moves tokens, reached
//!   through [`WalletProvider`] since the extension may not be installed.
//! - [`memory`] holds in-process implementations of both, used by tests and
//!   local development.
//!
//! Both collaborators stay opaque: this crate defines the call surface and
//! error vocabulary, never their internals.

pub mod actor;
pub mod memory;
pub mod wallet;

pub use actor::{LedgerActor, LedgerError};
pub use memory::{MemoryLedger, MemoryWallet};
pub use wallet::{TransferReceipt, TransferRequest, Wallet, WalletError, WalletProvider};
