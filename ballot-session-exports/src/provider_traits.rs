// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! Interfaces of the external collaborators: the wallet and the two contracts.

use crate::error::{CallResult, SessionResult};
use async_trait::async_trait;
use ballot_models::address::Address;
use ballot_models::poll::{NewPoll, PollId, PollInfo};
use ballot_models::tx::TxReceipt;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Notification pushed by the wallet
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletEvent {
    /// the set (or order) of exposed accounts changed
    AccountsChanged(Vec<Address>),
    /// the wallet switched to another network
    ChainChanged(u64),
}

/// The wallet: account access, chain queries and contract handle construction.
#[cfg_attr(any(test, feature = "test-exports"), mockall::automock)]
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Ask the wallet for the accounts it exposes.
    /// Fails with `SessionError::WalletUnavailable` when there is no wallet or the user refused.
    async fn request_accounts(&self) -> SessionResult<Vec<Address>>;

    /// Chain id of the network the wallet is connected to
    async fn chain_id(&self) -> CallResult<u64>;

    /// Deployed code at an address, empty when nothing is deployed there
    async fn get_code(&self, address: Address) -> CallResult<Vec<u8>>;

    /// Handle on the whitelist contract.
    /// Without a signer the handle is read-only and every write fails.
    fn whitelist_contract(
        &self,
        address: Address,
        signer: Option<Address>,
    ) -> Arc<dyn WhitelistContract>;

    /// Handle on the voting contract.
    /// Without a signer the handle is read-only and every write fails.
    fn voting_contract(&self, address: Address, signer: Option<Address>)
        -> Arc<dyn VotingContract>;

    /// Subscribe to account and network changes
    fn subscribe(&self) -> broadcast::Receiver<WalletEvent>;
}

/// `Whitelist` contract.
/// Writes return once the transaction is mined.
#[cfg_attr(any(test, feature = "test-exports"), mockall::automock)]
#[async_trait]
pub trait WhitelistContract: Send + Sync {
    /// address of the contract
    fn address(&self) -> Address;

    /// `isWhitelisted(address) -> bool`
    async fn is_whitelisted(&self, account: Address) -> CallResult<bool>;

    /// `owner() -> address`
    async fn owner(&self) -> CallResult<Address>;

    /// `getWhitelistedAddresses() -> address[]`
    async fn get_whitelisted_addresses(&self) -> CallResult<Vec<Address>>;

    /// `addToWhitelist(address)`
    async fn add_to_whitelist(&self, account: Address) -> CallResult<TxReceipt>;

    /// `addWhitelisted(address)`, the entry point used by the whitelisting script
    async fn add_whitelisted(&self, account: Address) -> CallResult<TxReceipt>;

    /// `removeFromWhitelist(address)`
    async fn remove_from_whitelist(&self, account: Address) -> CallResult<TxReceipt>;
}

/// `Voting` contract.
/// Writes return once the transaction is mined.
#[cfg_attr(any(test, feature = "test-exports"), mockall::automock)]
#[async_trait]
pub trait VotingContract: Send + Sync {
    /// address of the contract
    fn address(&self) -> Address;

    /// `getPollsCount() -> uint`
    async fn get_polls_count(&self) -> CallResult<u64>;

    /// `getPollInfo(uint) -> (string, string, uint, uint, bool, string[])`
    async fn get_poll_info(&self, poll_id: PollId) -> CallResult<PollInfo>;

    /// `getPollResults(uint) -> uint[]`
    async fn get_poll_results(&self, poll_id: PollId) -> CallResult<Vec<u64>>;

    /// `hasVoted(uint, address) -> bool`
    async fn has_voted(&self, poll_id: PollId, voter: Address) -> CallResult<bool>;

    /// `createPoll(string, string, uint, uint, string[])`
    async fn create_poll(&self, poll: NewPoll) -> CallResult<TxReceipt>;

    /// `endPoll(uint)`
    async fn end_poll(&self, poll_id: PollId) -> CallResult<TxReceipt>;

    /// `vote(uint, uint)`
    async fn vote(&self, poll_id: PollId, option_index: u64) -> CallResult<TxReceipt>;
}
