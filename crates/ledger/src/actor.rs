//! The ledger canister call surface.
//!
//! Every method is a remote call: the canister holds the authoritative
//! campaign records and this process never caches them beyond what the
//! resource layer holds for the current page.

use async_trait::async_trait;
use canopy_core::campaign::Campaign;
use canopy_core::token::TokenAmount;
use canopy_core::types::DbId;

/// Errors from ledger calls.
///
/// `Unreachable` covers transport-level failures (the canister could not be
/// reached at all); `Rejected` covers calls the canister received and turned
/// down. Callers rarely distinguish the two -- both collapse into a generic
/// user-facing message -- but logs keep the split.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("Ledger unreachable: {0}")]
    Unreachable(String),

    #[error("Ledger rejected the call: {0}")]
    Rejected(String),
}

/// Remote interface of the campaign ledger.
#[async_trait]
pub trait LedgerActor: Send + Sync {
    /// Fetch every campaign, newest first.
    async fn list_projects(&self) -> Result<Vec<Campaign>, LedgerError>;

    /// Fetch one campaign. `Ok(None)` means the id does not exist; that is
    /// an ordinary outcome, not an error.
    async fn get_project(&self, id: DbId) -> Result<Option<Campaign>, LedgerError>;

    /// Create a campaign owned by the calling identity, returning its id.
    async fn create_project(
        &self,
        title: String,
        description: String,
        goal: TokenAmount,
    ) -> Result<DbId, LedgerError>;

    /// Record a completed transfer against a campaign. Returns `false` when
    /// the ledger declines (unknown id, withdrawn campaign).
    async fn fund_project(&self, id: DbId, amount: TokenAmount) -> Result<bool, LedgerError>;

    /// Mark a campaign's funds withdrawn. Returns `false` when there is
    /// nothing to withdraw (unknown id or already withdrawn).
    async fn withdraw_funds(&self, id: DbId) -> Result<bool, LedgerError>;
}
