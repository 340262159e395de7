// Copyright (c) 2022 MASSA LABS <info@massa.net>

use async_trait::async_trait;
use ballot_logging::ballot_trace;
use ballot_models::address::Address;
use ballot_models::poll::{PollId, PollRecord};
use ballot_models::tx::TxReceipt;
use ballot_poll_exports::{
    LoadOutcome, PollConfig, PollController, PollDraft, PollError, PollResult, ValidationError,
    ViewKind,
};
use ballot_session_exports::{ContractHandles, SessionController};
use ballot_time::BallotTime;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Default)]
struct PollState {
    polls: Vec<PollRecord>,
    selections: HashMap<PollId, usize>,
    whitelisted: Vec<Address>,
}

/// Poll view-model over the handles of the current session
#[derive(Clone)]
pub(crate) struct PollViewModel {
    config: PollConfig,
    view: ViewKind,
    session: Box<dyn SessionController>,
    state: Arc<RwLock<PollState>>,
    /// incremented by each load, only the newest one may publish
    generation: Arc<AtomicU64>,
}

/// Start a view-model for one panel. Nothing is loaded until `load_polls`.
pub fn start_poll_controller(
    config: PollConfig,
    view: ViewKind,
    session: Box<dyn SessionController>,
) -> Box<dyn PollController> {
    Box::new(PollViewModel {
        config,
        view,
        session,
        state: Arc::new(RwLock::new(PollState::default())),
        generation: Arc::new(AtomicU64::new(0)),
    })
}

impl PollViewModel {
    fn connected(&self) -> PollResult<(Address, ContractHandles)> {
        let session = self.session.session();
        match (session.account, session.contracts.as_ref()) {
            (Some(account), Some(contracts)) => Ok((account, contracts.clone())),
            _ => Err(PollError::NotConnected),
        }
    }

    async fn fetch_polls(
        &self,
        account: Address,
        contracts: &ContractHandles,
    ) -> PollResult<Vec<PollRecord>> {
        let voting = &contracts.voting_reader;
        let count = voting.get_polls_count().await?;
        let mut polls = Vec::new();
        for poll_id in 0..count {
            let info = voting.get_poll_info(poll_id).await?;
            let mut record = PollRecord::from_info(poll_id, info);
            if self.view == ViewKind::Voter {
                let results = voting.get_poll_results(poll_id).await?;
                let has_voted = voting.has_voted(poll_id, account).await?;
                record = record.with_voter_view(results, has_voted)?;
            }
            polls.push(record);
        }
        Ok(polls)
    }

    /// Reload after a mined transaction. The transaction stands even if the reload fails.
    async fn refresh_after(&self, action: &str) {
        if let Err(err) = self.load_polls().await {
            warn!("could not reload polls after {}: {}", action, err);
        }
    }

    async fn refresh_whitelist_after(&self, action: &str) {
        if let Err(err) = self.load_whitelist().await {
            warn!("could not reload the whitelist after {}: {}", action, err);
        }
    }
}

fn log_receipt(action: &str, receipt: &TxReceipt) {
    info!(
        "{}: transaction {} mined in block {}",
        action,
        receipt.hash,
        receipt
            .block_number
            .map(|b| b.to_string())
            .unwrap_or_else(|| "?".to_string())
    );
}

#[async_trait]
impl PollController for PollViewModel {
    fn view(&self) -> ViewKind {
        self.view
    }

    fn polls(&self) -> Vec<PollRecord> {
        self.state.read().polls.clone()
    }

    async fn load_polls(&self) -> PollResult<LoadOutcome> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let (account, contracts) = self.connected()?;
        let polls = match self.fetch_polls(account, &contracts).await {
            Ok(polls) => polls,
            Err(err) => {
                warn!("failed to load polls: {}", err);
                return Err(err);
            }
        };

        let mut state = self.state.write();
        if self.generation.load(Ordering::SeqCst) != generation {
            debug!("dropping superseded poll load #{}", generation);
            return Ok(LoadOutcome::Superseded);
        }
        state.selections.retain(|poll_id, option_index| {
            polls
                .iter()
                .any(|p| p.id == *poll_id && *option_index < p.options.len())
        });
        let count = polls.len();
        state.polls = polls;
        ballot_trace!("polls.loaded", { "generation": generation, "count": count });
        Ok(LoadOutcome::Loaded(count))
    }

    async fn create_poll(&self, draft: &PollDraft) -> PollResult<TxReceipt> {
        let (_, contracts) = self.connected()?;
        let poll = draft.validate(BallotTime::now()?, self.config.utc_offset)?;
        debug!(
            "creating poll {:?} starting at {} for {}s with {} options",
            poll.title,
            poll.start_time,
            poll.duration,
            poll.options.len()
        );
        let receipt = contracts.voting.create_poll(poll).await?;
        log_receipt("poll created", &receipt);
        self.refresh_after("poll creation").await;
        Ok(receipt)
    }

    async fn end_poll(&self, poll_id: PollId) -> PollResult<TxReceipt> {
        let (_, contracts) = self.connected()?;
        let receipt = contracts.voting.end_poll(poll_id).await?;
        log_receipt("poll ended", &receipt);
        self.refresh_after("ending a poll").await;
        Ok(receipt)
    }

    fn select_option(&self, poll_id: PollId, option_index: usize) -> PollResult<()> {
        let mut state = self.state.write();
        let options = state
            .polls
            .iter()
            .find(|p| p.id == poll_id)
            .map(|p| p.options.len())
            .ok_or(PollError::UnknownPoll(poll_id))?;
        if option_index >= options {
            return Err(ValidationError::NoSuchOption(option_index).into());
        }
        state.selections.insert(poll_id, option_index);
        Ok(())
    }

    fn selected_option(&self, poll_id: PollId) -> Option<usize> {
        self.state.read().selections.get(&poll_id).copied()
    }

    async fn vote(&self, poll_id: PollId) -> PollResult<TxReceipt> {
        let option_index = self
            .selected_option(poll_id)
            .ok_or(PollError::NoSelectedOption(poll_id))?;
        let (_, contracts) = self.connected()?;
        ballot_trace!("polls.vote", { "poll_id": poll_id, "option": option_index });
        let receipt = contracts.voting.vote(poll_id, option_index as u64).await?;
        log_receipt("vote cast", &receipt);
        self.state.write().selections.remove(&poll_id);
        self.refresh_after("voting").await;
        Ok(receipt)
    }

    fn whitelisted(&self) -> Vec<Address> {
        self.state.read().whitelisted.clone()
    }

    async fn load_whitelist(&self) -> PollResult<Vec<Address>> {
        let (_, contracts) = self.connected()?;
        let addresses = contracts.whitelist_reader.get_whitelisted_addresses().await?;
        debug!("{} whitelisted addresses", addresses.len());
        self.state.write().whitelisted = addresses.clone();
        Ok(addresses)
    }

    async fn add_to_whitelist(&self, address: &str) -> PollResult<TxReceipt> {
        let address = Address::from_str(address.trim())
            .map_err(|_| ValidationError::InvalidAddress(address.trim().to_string()))?;
        let (_, contracts) = self.connected()?;
        let receipt = contracts.whitelist.add_to_whitelist(address).await?;
        log_receipt("address whitelisted", &receipt);
        self.refresh_whitelist_after("whitelisting").await;
        Ok(receipt)
    }

    async fn remove_from_whitelist(&self, address: Address) -> PollResult<TxReceipt> {
        let (_, contracts) = self.connected()?;
        let receipt = contracts.whitelist.remove_from_whitelist(address).await?;
        log_receipt("address removed from whitelist", &receipt);
        self.refresh_whitelist_after("removal from the whitelist").await;
        Ok(receipt)
    }

    fn clone_box(&self) -> Box<dyn PollController> {
        Box::new(self.clone())
    }
}
