// Copyright (c) 2022 MASSA LABS <info@massa.net>

use crate::config::SessionConfig;
use crate::error::{CallError, CallResult, SessionError, SessionResult};
use crate::provider_traits::{VotingContract, WalletEvent, WalletProvider, WhitelistContract};
use async_trait::async_trait;
use ballot_models::address::Address;
use ballot_models::config::LOCAL_DEV_CHAIN_ID;
use ballot_models::poll::{NewPoll, PollId, PollInfo};
use ballot_models::tx::{TxHash, TxReceipt};
use ballot_time::BallotTime;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::broadcast;

/// Test address whose bytes are all `n`
pub fn test_address(n: u8) -> Address {
    Address::from_bytes([n; 20])
}

struct ChainPoll {
    info: PollInfo,
    votes: Vec<u64>,
    voters: HashSet<Address>,
}

struct ChainState {
    wallet_available: bool,
    accounts: Vec<Address>,
    chain_id: u64,
    code: HashMap<Address, Vec<u8>>,
    whitelist_address: Address,
    voting_address: Address,
    owner: Address,
    whitelisted: Vec<Address>,
    polls: Vec<ChainPoll>,
    now: Option<BallotTime>,
    block_number: u64,
    failures: HashMap<String, CallError>,
    calls: HashMap<String, usize>,
}

impl ChainState {
    fn now(&self) -> BallotTime {
        self.now
            .unwrap_or_else(|| BallotTime::now().unwrap_or_default())
    }

    /// Bookkeeping shared by every contract call
    fn enter(&mut self, method: &str, contract: Address, expected: Address) -> CallResult<()> {
        *self.calls.entry(method.to_string()).or_default() += 1;
        if let Some(err) = self.failures.remove(method) {
            return Err(err);
        }
        let deployed = self
            .code
            .get(&contract)
            .map(|code| !code.is_empty())
            .unwrap_or(false);
        if !deployed || contract != expected {
            return Err(CallError::new(format!(
                "call to non-contract account {}",
                contract
            )));
        }
        Ok(())
    }

    fn mine(&mut self) -> TxReceipt {
        self.block_number += 1;
        let mut hash = [0u8; 32];
        hash[24..].copy_from_slice(&self.block_number.to_be_bytes());
        TxReceipt {
            hash: TxHash::from_bytes(hash),
            block_number: Some(self.block_number),
            contract_address: None,
        }
    }

    fn poll_mut(&mut self, poll_id: PollId) -> CallResult<&mut ChainPoll> {
        usize::try_from(poll_id)
            .ok()
            .and_then(|index| self.polls.get_mut(index))
            .ok_or_else(|| CallError::reverted("Poll does not exist"))
    }

    fn poll(&self, poll_id: PollId) -> CallResult<&ChainPoll> {
        usize::try_from(poll_id)
            .ok()
            .and_then(|index| self.polls.get(index))
            .ok_or_else(|| CallError::reverted("Poll does not exist"))
    }
}

/// In-memory stand-in for a wallet connected to a chain where both contracts
/// are deployed. Contract rules mirror the deployed `Whitelist` and `Voting`.
///
/// The deployer (`owner`) is the only exposed account and is whitelisted,
/// as after running the deploy script.
#[derive(Clone)]
pub struct InMemoryChain {
    state: Arc<Mutex<ChainState>>,
    events: broadcast::Sender<WalletEvent>,
}

impl InMemoryChain {
    /// Chain with both contracts deployed by `owner`
    pub fn new(owner: Address) -> Self {
        let whitelist_address = test_address(0xa1);
        let voting_address = test_address(0xa2);
        let mut code = HashMap::new();
        code.insert(whitelist_address, vec![0x60, 0x80, 0x60, 0x40]);
        code.insert(voting_address, vec![0x60, 0x80, 0x60, 0x40]);
        InMemoryChain {
            state: Arc::new(Mutex::new(ChainState {
                wallet_available: true,
                accounts: vec![owner],
                chain_id: LOCAL_DEV_CHAIN_ID,
                code,
                whitelist_address,
                voting_address,
                owner,
                whitelisted: vec![owner],
                polls: Vec::new(),
                now: None,
                block_number: 0,
                failures: HashMap::new(),
                calls: HashMap::new(),
            })),
            events: broadcast::channel(16).0,
        }
    }

    /// Session configuration pointing at the deployed contracts
    pub fn session_config(&self) -> SessionConfig {
        let state = self.state.lock();
        SessionConfig {
            whitelist_address: state.whitelist_address.to_string(),
            voting_address: state.voting_address.to_string(),
            account: None,
        }
    }

    /// address of the whitelist contract
    pub fn whitelist_address(&self) -> Address {
        self.state.lock().whitelist_address
    }

    /// address of the voting contract
    pub fn voting_address(&self) -> Address {
        self.state.lock().voting_address
    }

    /// Replace the exposed accounts without notifying listeners
    pub fn set_accounts(&self, accounts: Vec<Address>) {
        self.state.lock().accounts = accounts;
    }

    /// Replace the exposed accounts and notify listeners
    pub fn switch_accounts(&self, accounts: Vec<Address>) {
        self.state.lock().accounts = accounts.clone();
        let _ = self.events.send(WalletEvent::AccountsChanged(accounts));
    }

    /// Switch network and notify listeners
    pub fn switch_chain(&self, chain_id: u64) {
        self.state.lock().chain_id = chain_id;
        let _ = self.events.send(WalletEvent::ChainChanged(chain_id));
    }

    /// Simulate a missing or refusing wallet
    pub fn set_wallet_available(&self, available: bool) {
        self.state.lock().wallet_available = available;
    }

    /// Wipe the code at an address
    pub fn remove_code(&self, address: Address) {
        self.state.lock().code.remove(&address);
    }

    /// Whitelist an account directly
    pub fn whitelist(&self, account: Address) {
        let mut state = self.state.lock();
        if !state.whitelisted.contains(&account) {
            state.whitelisted.push(account);
        }
    }

    /// Insert a poll directly, bypassing the contract checks
    pub fn add_poll(&self, info: PollInfo) -> PollId {
        let mut state = self.state.lock();
        let votes = vec![0; info.options.len()];
        state.polls.push(ChainPoll {
            info,
            votes,
            voters: HashSet::new(),
        });
        (state.polls.len() - 1) as PollId
    }

    /// Record a vote directly, bypassing the contract checks
    pub fn add_vote(&self, poll_id: PollId, option_index: usize, voter: Address) {
        let mut state = self.state.lock();
        if let Ok(poll) = state.poll_mut(poll_id) {
            poll.votes[option_index] += 1;
            poll.voters.insert(voter);
        }
    }

    /// Freeze the contract clock. Unset, the contracts use the system time.
    pub fn set_now(&self, now: BallotTime) {
        self.state.lock().now = Some(now);
    }

    /// Make the next call of `method` fail with `err`
    pub fn fail_next(&self, method: &str, err: CallError) {
        self.state.lock().failures.insert(method.to_string(), err);
    }

    /// Number of calls to a contract method so far
    pub fn call_count(&self, method: &str) -> usize {
        self.state.lock().calls.get(method).copied().unwrap_or(0)
    }

    /// Number of mined transactions
    pub fn block_number(&self) -> u64 {
        self.state.lock().block_number
    }
}

#[async_trait]
impl WalletProvider for InMemoryChain {
    async fn request_accounts(&self) -> SessionResult<Vec<Address>> {
        let state = self.state.lock();
        if !state.wallet_available {
            return Err(SessionError::WalletUnavailable(
                "no wallet found".to_string(),
            ));
        }
        Ok(state.accounts.clone())
    }

    async fn chain_id(&self) -> CallResult<u64> {
        Ok(self.state.lock().chain_id)
    }

    async fn get_code(&self, address: Address) -> CallResult<Vec<u8>> {
        Ok(self
            .state
            .lock()
            .code
            .get(&address)
            .cloned()
            .unwrap_or_default())
    }

    fn whitelist_contract(
        &self,
        address: Address,
        signer: Option<Address>,
    ) -> Arc<dyn WhitelistContract> {
        Arc::new(ChainWhitelist {
            chain: self.clone(),
            address,
            signer,
        })
    }

    fn voting_contract(
        &self,
        address: Address,
        signer: Option<Address>,
    ) -> Arc<dyn VotingContract> {
        Arc::new(ChainVoting {
            chain: self.clone(),
            address,
            signer,
        })
    }

    fn subscribe(&self) -> broadcast::Receiver<WalletEvent> {
        self.events.subscribe()
    }
}

struct ChainWhitelist {
    chain: InMemoryChain,
    address: Address,
    signer: Option<Address>,
}

impl ChainWhitelist {
    fn read<T>(&self, method: &str, f: impl FnOnce(&ChainState) -> T) -> CallResult<T> {
        let mut state = self.chain.state.lock();
        let expected = state.whitelist_address;
        state.enter(method, self.address, expected)?;
        Ok(f(&state))
    }

    fn write(
        &self,
        method: &str,
        f: impl FnOnce(&mut ChainState, Address) -> CallResult<()>,
    ) -> CallResult<TxReceipt> {
        let mut state = self.chain.state.lock();
        let expected = state.whitelist_address;
        state.enter(method, self.address, expected)?;
        let signer = self.signer.ok_or_else(CallError::no_signer)?;
        if signer != state.owner {
            return Err(CallError::reverted("Ownable: caller is not the owner"));
        }
        f(&mut state, signer)?;
        Ok(state.mine())
    }

    fn add(&self, method: &str, account: Address) -> CallResult<TxReceipt> {
        self.write(method, |state, _| {
            if state.whitelisted.contains(&account) {
                return Err(CallError::reverted("Address already whitelisted"));
            }
            state.whitelisted.push(account);
            Ok(())
        })
    }
}

#[async_trait]
impl WhitelistContract for ChainWhitelist {
    fn address(&self) -> Address {
        self.address
    }

    async fn is_whitelisted(&self, account: Address) -> CallResult<bool> {
        self.read("isWhitelisted", |state| state.whitelisted.contains(&account))
    }

    async fn owner(&self) -> CallResult<Address> {
        self.read("owner", |state| state.owner)
    }

    async fn get_whitelisted_addresses(&self) -> CallResult<Vec<Address>> {
        self.read("getWhitelistedAddresses", |state| state.whitelisted.clone())
    }

    async fn add_to_whitelist(&self, account: Address) -> CallResult<TxReceipt> {
        self.add("addToWhitelist", account)
    }

    async fn add_whitelisted(&self, account: Address) -> CallResult<TxReceipt> {
        self.add("addWhitelisted", account)
    }

    async fn remove_from_whitelist(&self, account: Address) -> CallResult<TxReceipt> {
        self.write("removeFromWhitelist", |state, _| {
            let position = state
                .whitelisted
                .iter()
                .position(|a| *a == account)
                .ok_or_else(|| CallError::reverted("Address not whitelisted"))?;
            state.whitelisted.remove(position);
            Ok(())
        })
    }
}

struct ChainVoting {
    chain: InMemoryChain,
    address: Address,
    signer: Option<Address>,
}

impl ChainVoting {
    fn read<T>(
        &self,
        method: &str,
        f: impl FnOnce(&ChainState) -> CallResult<T>,
    ) -> CallResult<T> {
        let mut state = self.chain.state.lock();
        let expected = state.voting_address;
        state.enter(method, self.address, expected)?;
        f(&state)
    }

    fn write(
        &self,
        method: &str,
        f: impl FnOnce(&mut ChainState, Address) -> CallResult<()>,
    ) -> CallResult<TxReceipt> {
        let mut state = self.chain.state.lock();
        let expected = state.voting_address;
        state.enter(method, self.address, expected)?;
        let signer = self.signer.ok_or_else(CallError::no_signer)?;
        f(&mut state, signer)?;
        Ok(state.mine())
    }
}

#[async_trait]
impl VotingContract for ChainVoting {
    fn address(&self) -> Address {
        self.address
    }

    async fn get_polls_count(&self) -> CallResult<u64> {
        self.read("getPollsCount", |state| Ok(state.polls.len() as u64))
    }

    async fn get_poll_info(&self, poll_id: PollId) -> CallResult<PollInfo> {
        self.read("getPollInfo", |state| Ok(state.poll(poll_id)?.info.clone()))
    }

    async fn get_poll_results(&self, poll_id: PollId) -> CallResult<Vec<u64>> {
        self.read("getPollResults", |state| Ok(state.poll(poll_id)?.votes.clone()))
    }

    async fn has_voted(&self, poll_id: PollId, voter: Address) -> CallResult<bool> {
        self.read("hasVoted", |state| {
            Ok(state.poll(poll_id)?.voters.contains(&voter))
        })
    }

    async fn create_poll(&self, poll: NewPoll) -> CallResult<TxReceipt> {
        self.write("createPoll", |state, signer| {
            if signer != state.owner {
                return Err(CallError::reverted("Only admin can perform this action"));
            }
            if poll.start_time <= state.now() {
                return Err(CallError::reverted("Start time must be in the future"));
            }
            if poll.duration.to_secs() == 0 {
                return Err(CallError::reverted("Duration must be positive"));
            }
            if poll.options.len() < 2 {
                return Err(CallError::reverted("At least two options required"));
            }
            let end_time = poll
                .start_time
                .checked_add(poll.duration)
                .map_err(|_| CallError::reverted("Duration overflow"))?;
            let votes = vec![0; poll.options.len()];
            state.polls.push(ChainPoll {
                info: PollInfo {
                    title: poll.title,
                    description: poll.description,
                    start_time: poll.start_time,
                    end_time,
                    is_active: true,
                    options: poll.options,
                },
                votes,
                voters: HashSet::new(),
            });
            Ok(())
        })
    }

    async fn end_poll(&self, poll_id: PollId) -> CallResult<TxReceipt> {
        self.write("endPoll", |state, signer| {
            if signer != state.owner {
                return Err(CallError::reverted("Only admin can perform this action"));
            }
            let poll = state.poll_mut(poll_id)?;
            if !poll.info.is_active {
                return Err(CallError::reverted("Poll already ended"));
            }
            poll.info.is_active = false;
            Ok(())
        })
    }

    async fn vote(&self, poll_id: PollId, option_index: u64) -> CallResult<TxReceipt> {
        self.write("vote", |state, signer| {
            if !state.whitelisted.contains(&signer) {
                return Err(CallError::reverted("Not whitelisted"));
            }
            let now = state.now();
            let poll = state.poll_mut(poll_id)?;
            if !poll.info.is_active || now < poll.info.start_time || now > poll.info.end_time {
                return Err(CallError::reverted("Poll is not active"));
            }
            if poll.voters.contains(&signer) {
                return Err(CallError::reverted("Already voted"));
            }
            let index = usize::try_from(option_index)
                .ok()
                .filter(|index| *index < poll.votes.len())
                .ok_or_else(|| CallError::reverted("Invalid option"))?;
            poll.votes[index] += 1;
            poll.voters.insert(signer);
            Ok(())
        })
    }
}
