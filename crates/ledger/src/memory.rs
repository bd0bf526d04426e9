//! In-memory ledger and wallet.
//!
//! Used by the client crate's tests and by local development where neither
//! a canister nor a wallet extension exists. Both fakes count their calls
//! so tests can assert that validation failures never reach the network,
//! and the wallet's results can be scripted per scenario.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use canopy_core::campaign::Campaign;
use canopy_core::token::{TokenAmount, TokenBalance};
use canopy_core::types::DbId;

use crate::actor::{LedgerActor, LedgerError};
use crate::wallet::{TransferReceipt, TransferRequest, Wallet, WalletError};

// ---------------------------------------------------------------------------
// MemoryLedger
// ---------------------------------------------------------------------------

struct LedgerState {
    campaigns: Vec<Campaign>,
    next_id: DbId,
    fail_next: Option<LedgerError>,
}

/// In-process [`LedgerActor`] holding campaigns in a `Vec`.
pub struct MemoryLedger {
    owner: String,
    state: Mutex<LedgerState>,
    calls: AtomicUsize,
}

impl MemoryLedger {
    pub fn new(owner: &str) -> Self {
        Self {
            owner: owner.to_string(),
            state: Mutex::new(LedgerState {
                campaigns: Vec::new(),
                next_id: 1,
                fail_next: None,
            }),
            calls: AtomicUsize::new(0),
        }
    }

    /// Seed a campaign directly, bypassing the remote-call counter.
    pub fn seed_campaign(&self, title: &str, goal: TokenAmount) -> DbId {
        let mut state = self.state.lock().expect("ledger state poisoned");
        let id = state.next_id;
        state.next_id += 1;
        state.campaigns.push(Campaign {
            id,
            owner: self.owner.clone(),
            title: title.to_string(),
            description: String::new(),
            goal,
            raised: TokenAmount::from_e8s(0),
            created_at: chrono::Utc::now(),
            milestones: vec![],
            withdrawn: false,
        });
        id
    }

    /// Mark a seeded campaign withdrawn without counting a call.
    pub fn seed_withdrawn(&self, id: DbId) {
        let mut state = self.state.lock().expect("ledger state poisoned");
        if let Some(campaign) = state.campaigns.iter_mut().find(|c| c.id == id) {
            campaign.withdrawn = true;
        }
    }

    /// Make the next remote call return the given error.
    pub fn fail_next_call(&self, err: LedgerError) {
        self.state.lock().expect("ledger state poisoned").fail_next = Some(err);
    }

    /// Number of remote calls observed so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Current state of a campaign without counting a remote call, for
    /// seeding targets and asserting outcomes.
    pub fn snapshot(&self, id: DbId) -> Option<Campaign> {
        let state = self.state.lock().expect("ledger state poisoned");
        state.campaigns.iter().find(|c| c.id == id).cloned()
    }

    fn begin_call(&self) -> Result<(), LedgerError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let mut state = self.state.lock().expect("ledger state poisoned");
        match state.fail_next.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl LedgerActor for MemoryLedger {
    async fn list_projects(&self) -> Result<Vec<Campaign>, LedgerError> {
        self.begin_call()?;
        let state = self.state.lock().expect("ledger state poisoned");
        Ok(state.campaigns.iter().rev().cloned().collect())
    }

    async fn get_project(&self, id: DbId) -> Result<Option<Campaign>, LedgerError> {
        self.begin_call()?;
        let state = self.state.lock().expect("ledger state poisoned");
        Ok(state.campaigns.iter().find(|c| c.id == id).cloned())
    }

    async fn create_project(
        &self,
        title: String,
        description: String,
        goal: TokenAmount,
    ) -> Result<DbId, LedgerError> {
        self.begin_call()?;
        let mut state = self.state.lock().expect("ledger state poisoned");
        let id = state.next_id;
        state.next_id += 1;
        let owner = self.owner.clone();
        state.campaigns.push(Campaign {
            id,
            owner,
            title,
            description,
            goal,
            raised: TokenAmount::from_e8s(0),
            created_at: chrono::Utc::now(),
            milestones: vec![],
            withdrawn: false,
        });
        Ok(id)
    }

    async fn fund_project(&self, id: DbId, amount: TokenAmount) -> Result<bool, LedgerError> {
        self.begin_call()?;
        let mut state = self.state.lock().expect("ledger state poisoned");
        let Some(campaign) = state.campaigns.iter_mut().find(|c| c.id == id) else {
            return Ok(false);
        };
        if campaign.withdrawn {
            return Ok(false);
        }
        campaign.raised = campaign
            .raised
            .checked_add(amount)
            .ok_or_else(|| LedgerError::Rejected("raised amount overflow".to_string()))?;
        Ok(true)
    }

    async fn withdraw_funds(&self, id: DbId) -> Result<bool, LedgerError> {
        self.begin_call()?;
        let mut state = self.state.lock().expect("ledger state poisoned");
        let Some(campaign) = state.campaigns.iter_mut().find(|c| c.id == id) else {
            return Ok(false);
        };
        if campaign.withdrawn {
            return Ok(false);
        }
        campaign.withdrawn = true;
        Ok(true)
    }
}

// ---------------------------------------------------------------------------
// MemoryWallet
// ---------------------------------------------------------------------------

/// In-process [`Wallet`] with scriptable results.
///
/// Defaults to the happy path: connect succeeds, balances are empty,
/// every transfer yields a receipt with a fresh transaction id. Builders
/// override individual behaviors per scenario.
pub struct MemoryWallet {
    principal: String,
    connected: AtomicBool,
    connect_result: Mutex<Result<(), WalletError>>,
    balance_result: Mutex<Result<Vec<TokenBalance>, WalletError>>,
    /// Scripted transfer outcomes, consumed front-first; empty falls back
    /// to an auto-generated success receipt.
    transfer_script: Mutex<Vec<Result<TransferReceipt, WalletError>>>,
    transfer_delay: Option<Duration>,
    next_transaction_id: AtomicU64,
    connect_calls: AtomicUsize,
    balance_calls: AtomicUsize,
    transfer_calls: AtomicUsize,
}

impl MemoryWallet {
    pub fn new(principal: &str) -> Self {
        Self {
            principal: principal.to_string(),
            connected: AtomicBool::new(false),
            connect_result: Mutex::new(Ok(())),
            balance_result: Mutex::new(Ok(Vec::new())),
            transfer_script: Mutex::new(Vec::new()),
            transfer_delay: None,
            next_transaction_id: AtomicU64::new(9000),
            connect_calls: AtomicUsize::new(0),
            balance_calls: AtomicUsize::new(0),
            transfer_calls: AtomicUsize::new(0),
        }
    }

    /// Balances reported after a successful connect.
    pub fn with_balances(self, balances: Vec<TokenBalance>) -> Self {
        *self.balance_result.lock().expect("wallet state poisoned") = Ok(balances);
        self
    }

    /// Make `request_connect` fail as if the user dismissed the dialog.
    pub fn decline_connect(self) -> Self {
        *self.connect_result.lock().expect("wallet state poisoned") =
            Err(WalletError::Declined);
        self
    }

    /// Make `request_balance` fail while connect still succeeds.
    pub fn fail_balances(self) -> Self {
        *self.balance_result.lock().expect("wallet state poisoned") =
            Err(WalletError::Failed("balance query failed".to_string()));
        self
    }

    /// Queue explicit transfer outcomes, consumed in order.
    pub fn with_transfer_results(
        self,
        results: Vec<Result<TransferReceipt, WalletError>>,
    ) -> Self {
        *self.transfer_script.lock().expect("wallet state poisoned") = results;
        self
    }

    /// Hold every transfer for `delay` before resolving. Combined with a
    /// paused test clock this keeps a transfer in flight deterministically.
    pub fn with_transfer_delay(mut self, delay: Duration) -> Self {
        self.transfer_delay = Some(delay);
        self
    }

    pub fn transfer_count(&self) -> usize {
        self.transfer_calls.load(Ordering::SeqCst)
    }

    /// Total wallet extension calls of any kind.
    pub fn call_count(&self) -> usize {
        self.connect_calls.load(Ordering::SeqCst)
            + self.balance_calls.load(Ordering::SeqCst)
            + self.transfer_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Wallet for MemoryWallet {
    async fn request_connect(&self) -> Result<(), WalletError> {
        self.connect_calls.fetch_add(1, Ordering::SeqCst);
        let result = self.connect_result.lock().expect("wallet state poisoned").clone();
        if result.is_ok() {
            self.connected.store(true, Ordering::SeqCst);
        }
        result
    }

    async fn principal(&self) -> Result<String, WalletError> {
        if !self.connected.load(Ordering::SeqCst) {
            return Err(WalletError::Failed("not connected".to_string()));
        }
        Ok(self.principal.clone())
    }

    async fn request_balance(&self) -> Result<Vec<TokenBalance>, WalletError> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        self.balance_result.lock().expect("wallet state poisoned").clone()
    }

    async fn request_transfer(
        &self,
        _request: TransferRequest,
    ) -> Result<TransferReceipt, WalletError> {
        self.transfer_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.transfer_delay {
            tokio::time::sleep(delay).await;
        }
        let scripted = {
            let mut script = self.transfer_script.lock().expect("wallet state poisoned");
            if script.is_empty() {
                None
            } else {
                Some(script.remove(0))
            }
        };
        match scripted {
            Some(result) => result,
            None => Ok(TransferReceipt {
                transaction_id: Some(self.next_transaction_id.fetch_add(1, Ordering::SeqCst)),
            }),
        }
    }

    async fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
