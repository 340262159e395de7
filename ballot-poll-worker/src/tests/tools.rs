// Copyright (c) 2022 MASSA LABS <info@massa.net>

use crate::start_poll_controller;
use async_trait::async_trait;
use ballot_models::address::Address;
use ballot_models::poll::{NewPoll, PollId, PollInfo};
use ballot_models::tx::TxReceipt;
use ballot_poll_exports::{PollConfig, PollController, PollDraft, ViewKind};
use ballot_session_exports::test_exports::{test_address, InMemoryChain};
use ballot_session_exports::{
    CallResult, SessionController, SessionManager, SessionResult, VotingContract, WalletEvent,
    WalletProvider, WhitelistContract,
};
use ballot_session_worker::start_session_controller;
use ballot_time::{BallotTime, UtcOffset};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{broadcast, Notify};

pub(super) fn owner() -> Address {
    test_address(1)
}

pub(super) fn voter() -> Address {
    test_address(2)
}

pub(super) struct PollTest {
    pub chain: InMemoryChain,
    pub session_manager: Box<dyn SessionManager>,
    pub session: Box<dyn SessionController>,
    pub polls: Box<dyn PollController>,
}

/// Connect `account` to a fresh chain and start a view-model for `view`
pub(super) async fn poll_test(account: Address, view: ViewKind) -> PollTest {
    let chain = InMemoryChain::new(owner());
    chain.set_accounts(vec![owner(), voter(), test_address(3)]);
    chain.whitelist(voter());
    poll_test_with(chain.clone(), Arc::new(chain), account, view).await
}

pub(super) async fn poll_test_with(
    chain: InMemoryChain,
    wallet: Arc<dyn WalletProvider>,
    account: Address,
    view: ViewKind,
) -> PollTest {
    let (session_manager, session) = start_session_controller(chain.session_config(), wallet);
    session.connect(Some(account)).await.unwrap();
    let polls = start_poll_controller(PollConfig::default(), view, session.clone());
    PollTest {
        chain,
        session_manager,
        session,
        polls,
    }
}

/// Draft of a poll opening in one day and lasting two hours
pub(super) fn future_draft(title: &str) -> PollDraft {
    let start = BallotTime::now().unwrap().saturating_add(BallotTime::from_secs(86_400));
    // form inputs have minute precision
    let start = BallotTime::from_secs(start.to_secs() / 60 * 60);
    let end = start.saturating_add(BallotTime::from_secs(7_200));
    let (start_date, start_time) = start.to_form_input(UtcOffset::UTC).unwrap();
    let (end_date, end_time) = end.to_form_input(UtcOffset::UTC).unwrap();
    PollDraft {
        title: title.to_string(),
        description: format!("{} description", title),
        start_date,
        start_time,
        end_date,
        end_time,
        options: vec!["Yes".into(), "No".into(), " ".into()],
    }
}

/// Poll whose window is open right now
pub(super) fn open_poll(title: &str, options: &[&str]) -> PollInfo {
    let now = BallotTime::now().unwrap();
    PollInfo {
        title: title.to_string(),
        description: String::new(),
        start_time: now.saturating_sub(BallotTime::from_secs(3_600)),
        end_time: now.saturating_add(BallotTime::from_secs(3_600)),
        is_active: true,
        options: options.iter().map(|o| o.to_string()).collect(),
    }
}

/// Blocks the first `getPollsCount` call until released
#[derive(Default)]
pub(super) struct Gate {
    armed: AtomicBool,
    release: Notify,
}

impl Gate {
    pub(super) fn arm(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }

    pub(super) fn release(&self) {
        self.release.notify_one();
    }
}

/// Wallet whose voting handles wait on a gate
pub(super) struct GatedWallet {
    pub chain: InMemoryChain,
    pub gate: Arc<Gate>,
}

#[async_trait]
impl WalletProvider for GatedWallet {
    async fn request_accounts(&self) -> SessionResult<Vec<Address>> {
        self.chain.request_accounts().await
    }

    async fn chain_id(&self) -> CallResult<u64> {
        self.chain.chain_id().await
    }

    async fn get_code(&self, address: Address) -> CallResult<Vec<u8>> {
        self.chain.get_code(address).await
    }

    fn whitelist_contract(
        &self,
        address: Address,
        signer: Option<Address>,
    ) -> Arc<dyn WhitelistContract> {
        self.chain.whitelist_contract(address, signer)
    }

    fn voting_contract(&self, address: Address, signer: Option<Address>) -> Arc<dyn VotingContract> {
        Arc::new(GatedVoting {
            inner: self.chain.voting_contract(address, signer),
            gate: self.gate.clone(),
        })
    }

    fn subscribe(&self) -> broadcast::Receiver<WalletEvent> {
        self.chain.subscribe()
    }
}

struct GatedVoting {
    inner: Arc<dyn VotingContract>,
    gate: Arc<Gate>,
}

#[async_trait]
impl VotingContract for GatedVoting {
    fn address(&self) -> Address {
        self.inner.address()
    }

    async fn get_polls_count(&self) -> CallResult<u64> {
        if self.gate.armed.swap(false, Ordering::SeqCst) {
            self.gate.release.notified().await;
        }
        self.inner.get_polls_count().await
    }

    async fn get_poll_info(&self, poll_id: PollId) -> CallResult<PollInfo> {
        self.inner.get_poll_info(poll_id).await
    }

    async fn get_poll_results(&self, poll_id: PollId) -> CallResult<Vec<u64>> {
        self.inner.get_poll_results(poll_id).await
    }

    async fn has_voted(&self, poll_id: PollId, voter: Address) -> CallResult<bool> {
        self.inner.has_voted(poll_id, voter).await
    }

    async fn create_poll(&self, poll: NewPoll) -> CallResult<TxReceipt> {
        self.inner.create_poll(poll).await
    }

    async fn end_poll(&self, poll_id: PollId) -> CallResult<TxReceipt> {
        self.inner.end_poll(poll_id).await
    }

    async fn vote(&self, poll_id: PollId, option_index: u64) -> CallResult<TxReceipt> {
        self.inner.vote(poll_id, option_index).await
    }
}
