//! Campaign action flows: fund, create, withdraw.
//!
//! Each flow is a full button-press: local validation first, then the
//! dispatcher guard, then the external calls in order, then a notice and
//! an optimistic patch of the page's resource. Local validation runs
//! before the guard so a rejected form never counts as a busy action and
//! never touches the wallet or the ledger.

use std::sync::Arc;

use canopy_core::campaign::{self, Campaign, NewCampaign};
use canopy_core::error::CoreError;
use canopy_core::token::TokenAmount;
use canopy_core::types::DbId;
use canopy_ledger::actor::LedgerActor;
use canopy_ledger::wallet::{TransferRequest, WalletProvider};

use crate::dispatch::{ActionDispatcher, Triggered};
use crate::notify::Notifier;
use crate::resource::ResourceController;

/// Message shown when a campaign action fails for any external reason.
pub const ACTION_FAILED_MESSAGE: &str = "Something went wrong. Please try again.";

/// Why a fund attempt did not complete.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FundError {
    /// Rejected locally before any external call.
    #[error("{0}")]
    Invalid(String),

    /// The wallet did not produce a transaction.
    #[error("Transfer did not complete")]
    TransferFailed,

    /// The transfer went through but the ledger did not record it. There
    /// is no compensating transaction; the id is surfaced so the
    /// discrepancy can be chased by hand.
    #[error("Transfer {transaction_id} completed but was not recorded")]
    RecordFailed { transaction_id: u64 },
}

/// Why a create attempt did not complete.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CreateError {
    #[error("{0}")]
    Invalid(String),

    #[error("Campaign could not be created")]
    Failed,
}

/// Shared collaborators of every campaign flow.
pub struct CampaignFlows {
    actor: Arc<dyn LedgerActor>,
    provider: WalletProvider,
    notifier: Arc<Notifier>,
    /// Account transfers are sent to.
    treasury: String,
    /// Token symbol transfers are denominated in.
    token: String,
}

impl CampaignFlows {
    pub fn new(
        actor: Arc<dyn LedgerActor>,
        provider: WalletProvider,
        notifier: Arc<Notifier>,
        treasury: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            actor,
            provider,
            notifier,
            treasury: treasury.into(),
            token: token.into(),
        }
    }

    /// Fund a campaign with a user-entered amount.
    ///
    /// Order of operations: parse and validate locally, guard through the
    /// dispatcher, transfer through the wallet, and only on a confirmed
    /// transaction record the contribution on the ledger. On success the
    /// page's campaign is patched optimistically (`raised += amount`);
    /// the next fetch replaces it with the ledger's own numbers.
    pub async fn fund_campaign(
        &self,
        dispatcher: &ActionDispatcher,
        resource: &ResourceController<Campaign>,
        target: &Campaign,
        amount_text: &str,
    ) -> Triggered<Result<(), FundError>> {
        // Local gate: no wallet or ledger call for bad input.
        let amount = match TokenAmount::parse(amount_text) {
            Ok(amount) => amount,
            Err(e) => {
                self.notifier.error(e.to_string());
                return Triggered::Completed(Err(FundError::Invalid(e.to_string())));
            }
        };
        if let Err(e) = campaign::validate_funding(target) {
            self.notifier.error("This campaign is closed");
            return Triggered::Completed(Err(FundError::Invalid(e.to_string())));
        }

        let campaign_id = target.id;
        let outcome = dispatcher
            .trigger(|| self.run_fund(campaign_id, amount))
            .await;

        match &outcome {
            Triggered::Busy => {}
            Triggered::Completed(Ok(())) => {
                resource.patch(|c| {
                    if let Some(raised) = c.raised.checked_add(amount) {
                        c.raised = raised;
                    }
                });
                self.notifier.success("Thank you for your contribution!");
            }
            Triggered::Completed(Err(e)) => {
                tracing::warn!(campaign_id, error = %e, "Funding failed");
                match e {
                    FundError::RecordFailed { transaction_id } => {
                        self.notifier.error(format!(
                            "Payment sent but not recorded (transaction {transaction_id}). \
                             Please contact support."
                        ));
                    }
                    _ => self.notifier.error(ACTION_FAILED_MESSAGE),
                }
            }
        }
        outcome
    }

    async fn run_fund(&self, campaign_id: DbId, amount: TokenAmount) -> Result<(), FundError> {
        let wallet = self
            .provider
            .get()
            .map_err(|_| FundError::TransferFailed)?;

        let receipt = wallet
            .request_transfer(TransferRequest {
                to: self.treasury.clone(),
                amount,
                token: self.token.clone(),
            })
            .await
            .map_err(|e| {
                tracing::warn!(campaign_id, error = %e, "Wallet transfer failed");
                FundError::TransferFailed
            })?;

        // A receipt without a transaction id means the wallet flow ended
        // without moving tokens; nothing may be recorded against it.
        let Some(transaction_id) = receipt.transaction_id else {
            return Err(FundError::TransferFailed);
        };

        match self.actor.fund_project(campaign_id, amount).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(FundError::RecordFailed { transaction_id }),
            Err(e) => {
                tracing::error!(
                    campaign_id,
                    transaction_id,
                    error = %e,
                    "Transfer completed but recording it failed"
                );
                Err(FundError::RecordFailed { transaction_id })
            }
        }
    }

    /// Create a campaign and return its new id for navigation.
    ///
    /// There is deliberately no read-after-write check: the caller
    /// navigates straight to the detail view, whose own fetch may land in
    /// `NotFound` if the ledger has not caught up.
    pub async fn create_campaign(
        &self,
        dispatcher: &ActionDispatcher,
        input: NewCampaign,
    ) -> Triggered<Result<DbId, CreateError>> {
        if let Err(e) = campaign::validate_new_campaign(&input) {
            let message = match &e {
                CoreError::Validation(m) => m.clone(),
                other => other.to_string(),
            };
            self.notifier.error(message.clone());
            return Triggered::Completed(Err(CreateError::Invalid(message)));
        }

        let outcome = dispatcher
            .trigger(|| async {
                self.actor
                    .create_project(input.title.clone(), input.description.clone(), input.goal)
                    .await
                    .map_err(|e| {
                        tracing::warn!(error = %e, "Campaign creation failed");
                        CreateError::Failed
                    })
            })
            .await;

        match &outcome {
            Triggered::Completed(Ok(id)) => {
                tracing::info!(campaign_id = id, "Campaign created");
                self.notifier.success("Campaign created!");
            }
            Triggered::Completed(Err(_)) => {
                self.notifier.error(ACTION_FAILED_MESSAGE);
            }
            Triggered::Busy => {}
        }
        outcome
    }

    /// Withdraw a campaign's funds. Returns whether the ledger accepted.
    ///
    /// `false` covers both an unknown id and a campaign already
    /// withdrawn; the ledger does not distinguish and neither do we.
    pub async fn withdraw_funds(
        &self,
        dispatcher: &ActionDispatcher,
        resource: &ResourceController<Campaign>,
        campaign_id: DbId,
    ) -> Triggered<bool> {
        let outcome = dispatcher
            .trigger(|| async {
                match self.actor.withdraw_funds(campaign_id).await {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        tracing::warn!(campaign_id, error = %e, "Withdrawal failed");
                        false
                    }
                }
            })
            .await;

        match outcome {
            Triggered::Completed(true) => {
                resource.patch(|c| c.withdrawn = true);
                self.notifier.success("Funds withdrawn");
            }
            Triggered::Completed(false) => {
                self.notifier.error("Withdrawal failed");
            }
            Triggered::Busy => {}
        }
        outcome
    }
}
