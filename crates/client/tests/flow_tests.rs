//! Integration tests for the campaign flows (PRD-3, PRD-11).
//!
//! Exercises fund, create, and withdraw end to end over the in-memory
//! ledger and wallet, asserting the two properties the flows exist for:
//! invalid input never reaches the network, and at most one external call
//! chain runs at a time.

use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;
use canopy_client::flows::{CampaignFlows, CreateError, FundError};
use canopy_client::notify::{Notifier, Severity};
use canopy_client::resource::{ResourceController, ResourceState};
use canopy_client::{ActionDispatcher, Triggered};
use canopy_core::campaign::{Campaign, NewCampaign};
use canopy_core::token::TokenAmount;
use canopy_ledger::memory::{MemoryLedger, MemoryWallet};
use canopy_ledger::wallet::{TransferReceipt, Wallet, WalletProvider};
use canopy_ledger::{LedgerActor, LedgerError};

const OWNER: &str = "aaaaa-aa";
const TREASURY: &str = "treasury-principal";

struct Harness {
    ledger: Arc<MemoryLedger>,
    wallet: Arc<MemoryWallet>,
    notifier: Arc<Notifier>,
    flows: CampaignFlows,
    dispatcher: ActionDispatcher,
    resource: ResourceController<Campaign>,
}

fn harness_with_wallet(wallet: MemoryWallet) -> Harness {
    let ledger = Arc::new(MemoryLedger::new(OWNER));
    let wallet = Arc::new(wallet);
    let notifier = Arc::new(Notifier::spawn());
    let flows = CampaignFlows::new(
        Arc::clone(&ledger) as Arc<dyn LedgerActor>,
        WalletProvider::Available(Arc::clone(&wallet) as Arc<dyn Wallet>),
        Arc::clone(&notifier),
        TREASURY,
        "ICP",
    );
    Harness {
        ledger,
        wallet,
        notifier,
        flows,
        dispatcher: ActionDispatcher::new(),
        resource: ResourceController::new(),
    }
}

fn harness() -> Harness {
    harness_with_wallet(MemoryWallet::new("w7x7r-cok77-xa"))
}

/// Let the notifier's owning task drain its queued commands.
async fn settle() {
    tokio::task::yield_now().await;
    tokio::task::yield_now().await;
}

// ---------------------------------------------------------------------------
// Test: local validation happens before any network call
// ---------------------------------------------------------------------------

#[tokio::test]
async fn bad_amounts_never_reach_wallet_or_ledger() {
    let h = harness();
    let id = h.ledger.seed_campaign("Drip irrigation", TokenAmount::from_e8s(10_000_000_000));
    let target = h.ledger.snapshot(id).expect("seeded campaign");

    for input in ["", "abc", "-5", "0", "0.000000001"] {
        let outcome = h
            .flows
            .fund_campaign(&h.dispatcher, &h.resource, &target, input)
            .await;
        assert_matches!(
            outcome,
            Triggered::Completed(Err(FundError::Invalid(_))),
            "input {input:?} must be rejected locally"
        );
    }

    assert_eq!(h.wallet.call_count(), 0, "no wallet call for invalid input");
    assert_eq!(h.ledger.call_count(), 0, "no ledger call for invalid input");

    settle().await;
    let notices = h.notifier.current();
    assert_eq!(notices.len(), 5, "each rejection publishes its own notice");
    assert!(notices.iter().all(|n| n.severity == Severity::Error));
}

#[tokio::test]
async fn withdrawn_campaign_is_rejected_locally() {
    let h = harness();
    let id = h.ledger.seed_campaign("Closed drive", TokenAmount::from_e8s(1_000));
    h.ledger.seed_withdrawn(id);
    let target = h.ledger.snapshot(id).expect("seeded campaign");

    let outcome = h
        .flows
        .fund_campaign(&h.dispatcher, &h.resource, &target, "1")
        .await;

    assert_matches!(outcome, Triggered::Completed(Err(FundError::Invalid(_))));
    assert_eq!(h.wallet.call_count(), 0);
    assert_eq!(h.ledger.call_count(), 0);
}

// ---------------------------------------------------------------------------
// Test: the happy path patches optimistically and notifies
// ---------------------------------------------------------------------------

#[tokio::test]
async fn funding_transfers_records_and_patches() {
    let h = harness();
    let id = h.ledger.seed_campaign("Drip irrigation", TokenAmount::from_e8s(10_000_000_000));
    let target = h.ledger.snapshot(id).expect("seeded campaign");
    h.resource.load(async { Ok::<_, LedgerError>(target.clone()) }).await;

    let outcome = h
        .flows
        .fund_campaign(&h.dispatcher, &h.resource, &target, "2.5")
        .await;
    assert_matches!(outcome, Triggered::Completed(Ok(())));

    // One transfer, one recording.
    assert_eq!(h.wallet.transfer_count(), 1);
    let on_ledger = h.ledger.snapshot(id).expect("campaign still there");
    assert_eq!(on_ledger.raised, TokenAmount::from_e8s(250_000_000));

    // The page's copy was patched without a refetch.
    match h.resource.state() {
        ResourceState::Ready(campaign) => {
            assert_eq!(campaign.raised, TokenAmount::from_e8s(250_000_000));
        }
        other => panic!("expected Ready, got {other:?}"),
    }

    settle().await;
    let notices = h.notifier.current();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].severity, Severity::Success);
}

// ---------------------------------------------------------------------------
// Test: transfer outcomes that must not be recorded
// ---------------------------------------------------------------------------

#[tokio::test]
async fn null_transaction_id_records_nothing() {
    let wallet = MemoryWallet::new("w7x7r-cok77-xa")
        .with_transfer_results(vec![Ok(TransferReceipt { transaction_id: None })]);
    let h = harness_with_wallet(wallet);
    let id = h.ledger.seed_campaign("Drip irrigation", TokenAmount::from_e8s(10_000_000_000));
    let target = h.ledger.snapshot(id).expect("seeded campaign");
    h.resource.load(async { Ok::<_, LedgerError>(target.clone()) }).await;

    let outcome = h
        .flows
        .fund_campaign(&h.dispatcher, &h.resource, &target, "1")
        .await;

    assert_matches!(outcome, Triggered::Completed(Err(FundError::TransferFailed)));
    assert_eq!(h.wallet.transfer_count(), 1);
    assert_eq!(h.ledger.call_count(), 0, "nothing may be recorded without a transaction id");

    // No optimistic patch either.
    let campaign = h.resource.state();
    assert_eq!(campaign.ready().expect("still ready").raised, TokenAmount::from_e8s(0));
}

#[tokio::test]
async fn record_failure_surfaces_the_transaction_id() {
    let h = harness();
    let id = h.ledger.seed_campaign("Drip irrigation", TokenAmount::from_e8s(10_000_000_000));
    let target = h.ledger.snapshot(id).expect("seeded campaign");
    h.resource.load(async { Ok::<_, LedgerError>(target.clone()) }).await;
    h.ledger
        .fail_next_call(LedgerError::Unreachable("canister offline".to_string()));

    let outcome = h
        .flows
        .fund_campaign(&h.dispatcher, &h.resource, &target, "1")
        .await;

    let err = outcome.completed().expect("flow ran").unwrap_err();
    let FundError::RecordFailed { transaction_id } = err else {
        panic!("expected RecordFailed, got {err:?}");
    };

    // The raised amount stays stale until the next fetch.
    assert_eq!(
        h.resource.state().ready().expect("still ready").raised,
        TokenAmount::from_e8s(0)
    );

    settle().await;
    let notices = h.notifier.current();
    assert_eq!(notices.len(), 1);
    assert!(
        notices[0].message.contains(&transaction_id.to_string()),
        "the notice must carry the orphaned transaction id"
    );
}

#[tokio::test]
async fn ledger_decline_after_transfer_is_a_record_failure() {
    let h = harness();
    let id = h.ledger.seed_campaign("Stale view", TokenAmount::from_e8s(1_000_000_000));
    let target = h.ledger.snapshot(id).expect("seeded campaign");

    // The campaign closes on the ledger after the page loaded it.
    h.ledger.seed_withdrawn(id);

    let outcome = h
        .flows
        .fund_campaign(&h.dispatcher, &h.resource, &target, "1")
        .await;

    assert_matches!(
        outcome,
        Triggered::Completed(Err(FundError::RecordFailed { .. })),
        "the transfer happened, so the decline is a recording gap"
    );
    assert_eq!(h.wallet.transfer_count(), 1);
}

// ---------------------------------------------------------------------------
// Test: one action in flight per dispatcher
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn concurrent_fund_attempts_make_one_transfer() {
    let wallet =
        MemoryWallet::new("w7x7r-cok77-xa").with_transfer_delay(Duration::from_secs(1));
    let h = harness_with_wallet(wallet);
    let id = h.ledger.seed_campaign("Drip irrigation", TokenAmount::from_e8s(10_000_000_000));
    let target = h.ledger.snapshot(id).expect("seeded campaign");
    h.resource.load(async { Ok::<_, LedgerError>(target.clone()) }).await;

    let first = h
        .flows
        .fund_campaign(&h.dispatcher, &h.resource, &target, "1");
    let second = h
        .flows
        .fund_campaign(&h.dispatcher, &h.resource, &target, "2");

    let (first, second) = futures::join!(first, second);

    assert_matches!(first, Triggered::Completed(Ok(())));
    assert!(second.is_busy(), "the second press must be a no-op");
    assert_eq!(h.wallet.transfer_count(), 1, "exactly one transfer may run");
    assert_eq!(
        h.ledger.snapshot(id).expect("campaign").raised,
        TokenAmount::from_e8s(100_000_000),
        "only the first press reaches the ledger"
    );
}

// ---------------------------------------------------------------------------
// Test: create returns a navigable id
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_returns_id_the_caller_navigates_with() {
    let h = harness();

    let outcome = h
        .flows
        .create_campaign(
            &h.dispatcher,
            NewCampaign {
                title: "Solar dryer".to_string(),
                description: "Shared dryer for the co-op".to_string(),
                goal: TokenAmount::parse("40").expect("goal parses"),
            },
        )
        .await;

    let id = outcome.completed().expect("flow ran").expect("create succeeded");
    let created = h.ledger.snapshot(id).expect("campaign exists under the returned id");
    assert_eq!(created.title, "Solar dryer");
    assert_eq!(created.owner, OWNER);
    assert!(!created.withdrawn);
}

#[tokio::test]
async fn create_with_blank_title_is_rejected_locally() {
    let h = harness();

    let outcome = h
        .flows
        .create_campaign(
            &h.dispatcher,
            NewCampaign {
                title: "  ".to_string(),
                description: String::new(),
                goal: TokenAmount::from_e8s(100),
            },
        )
        .await;

    assert_matches!(outcome, Triggered::Completed(Err(CreateError::Invalid(_))));
    assert_eq!(h.ledger.call_count(), 0);

    settle().await;
    let notices = h.notifier.current();
    assert_eq!(notices.len(), 1);
    assert!(notices[0].message.contains("title is required"));
}

// ---------------------------------------------------------------------------
// Test: withdrawal is terminal
// ---------------------------------------------------------------------------

#[tokio::test]
async fn withdraw_succeeds_once_then_reports_failure() {
    let h = harness();
    let id = h.ledger.seed_campaign("Finished drive", TokenAmount::from_e8s(1_000));
    let target = h.ledger.snapshot(id).expect("seeded campaign");
    h.resource.load(async { Ok::<_, LedgerError>(target) }).await;

    let first = h.flows.withdraw_funds(&h.dispatcher, &h.resource, id).await;
    assert_eq!(first, Triggered::Completed(true));
    assert!(h.resource.state().ready().expect("ready").withdrawn);

    let second = h.flows.withdraw_funds(&h.dispatcher, &h.resource, id).await;
    assert_eq!(second, Triggered::Completed(false));

    settle().await;
    let notices = h.notifier.current();
    assert_eq!(notices.len(), 2);
    assert_eq!(notices[0].severity, Severity::Success);
    assert_eq!(notices[1].severity, Severity::Error);
}

// ---------------------------------------------------------------------------
// Test: detail pages distinguish missing from failed
// ---------------------------------------------------------------------------

#[tokio::test]
async fn missing_campaign_renders_not_found() {
    let h = harness();
    let actor: Arc<dyn LedgerActor> = h.ledger.clone();

    h.resource.load_optional(actor.get_project(404)).await;
    assert_eq!(h.resource.state(), ResourceState::NotFound);
}

#[tokio::test]
async fn unreachable_ledger_renders_generic_failure() {
    let h = harness();
    h.ledger
        .fail_next_call(LedgerError::Unreachable("connection refused".to_string()));
    let actor: Arc<dyn LedgerActor> = h.ledger.clone();

    h.resource.load_optional(actor.get_project(1)).await;
    match h.resource.state() {
        ResourceState::Failed(message) => {
            assert!(!message.contains("connection refused"), "raw errors stay in logs");
        }
        other => panic!("expected Failed, got {other:?}"),
    }
}
