// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! This module exports generic traits representing interfaces for interacting
//! with the poll view-model.

use crate::draft::PollDraft;
use crate::error::PollResult;
use crate::types::{LoadOutcome, ViewKind};
use async_trait::async_trait;
use ballot_models::address::Address;
use ballot_models::poll::{PollId, PollRecord};
use ballot_models::tx::TxReceipt;

/// Interface of the poll view-model.
///
/// Every write waits for the transaction to be mined, then reloads what it
/// changed. A failed operation leaves the local state as it was.
#[async_trait]
pub trait PollController: Send + Sync {
    /// panel this view-model feeds
    fn view(&self) -> ViewKind;

    /// Polls of the last successful load, in contract order
    fn polls(&self) -> Vec<PollRecord>;

    /// Fetch every poll from the contract and replace the local list.
    /// The voter view also fetches results and the caller's vote flag.
    async fn load_polls(&self) -> PollResult<LoadOutcome>;

    /// Validate the draft and submit `createPoll`
    async fn create_poll(&self, draft: &PollDraft) -> PollResult<TxReceipt>;

    /// Submit `endPoll`
    async fn end_poll(&self, poll_id: PollId) -> PollResult<TxReceipt>;

    /// Remember the option picked for a poll
    fn select_option(&self, poll_id: PollId, option_index: usize) -> PollResult<()>;

    /// Option picked for a poll, if any
    fn selected_option(&self, poll_id: PollId) -> Option<usize>;

    /// Submit a vote for the selected option of a poll
    async fn vote(&self, poll_id: PollId) -> PollResult<TxReceipt>;

    /// Whitelisted addresses of the last successful load
    fn whitelisted(&self) -> Vec<Address>;

    /// Fetch the whitelisted addresses
    async fn load_whitelist(&self) -> PollResult<Vec<Address>>;

    /// Parse then whitelist an address
    async fn add_to_whitelist(&self, address: &str) -> PollResult<TxReceipt>;

    /// Remove an address from the whitelist
    async fn remove_from_whitelist(&self, address: Address) -> PollResult<TxReceipt>;

    /// Returns a boxed clone of self.
    /// Useful to allow cloning `Box<dyn PollController>`.
    fn clone_box(&self) -> Box<dyn PollController>;
}

/// Allow cloning `Box<dyn PollController>`
/// Uses `PollController::clone_box` internally
impl Clone for Box<dyn PollController> {
    fn clone(&self) -> Box<dyn PollController> {
        self.clone_box()
    }
}

/// Handle on the periodic refresh task
pub trait RefreshManager: Send {
    /// Stop refreshing. Idempotent.
    fn stop(&mut self);
}
