// Copyright (c) 2022 MASSA LABS <info@massa.net>

use crate::start_session_controller;
use async_trait::async_trait;
use ballot_models::address::Address;
use ballot_session_exports::test_exports::{test_address, InMemoryChain};
use ballot_session_exports::{
    CallResult, Session, SessionController, SessionManager, SessionResult, VotingContract,
    WalletEvent, WalletProvider, WhitelistContract,
};
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, watch};

pub(super) fn owner() -> ballot_models::address::Address {
    test_address(1)
}

/// Start a session worker over a fresh in-memory chain deployed by `owner()`
pub(super) fn session_test() -> (
    InMemoryChain,
    Box<dyn SessionManager>,
    Box<dyn SessionController>,
) {
    let chain = InMemoryChain::new(owner());
    let (manager, controller) =
        start_session_controller(chain.session_config(), Arc::new(chain.clone()));
    (chain, manager, controller)
}

/// Wait until a published session satisfies `predicate`
pub(super) async fn wait_for_session(
    rx: &mut watch::Receiver<Arc<Session>>,
    predicate: impl Fn(&Session) -> bool,
) -> Arc<Session> {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            let current = rx.borrow_and_update().clone();
            if predicate(&current) {
                return current;
            }
            if rx.changed().await.is_err() {
                panic!("session channel closed");
            }
        }
    })
    .await
    .expect("timed out waiting for the session")
}

/// Wallet over `chain` that switches accounts right after handing out the
/// current ones, the first time it is asked
pub(super) struct SwitchingWallet {
    pub chain: InMemoryChain,
    pub switch_to: Mutex<Option<Vec<Address>>>,
}

#[async_trait]
impl WalletProvider for SwitchingWallet {
    async fn request_accounts(&self) -> SessionResult<Vec<Address>> {
        let accounts = self.chain.request_accounts().await?;
        if let Some(next) = self.switch_to.lock().take() {
            self.chain.switch_accounts(next);
        }
        Ok(accounts)
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
        self.chain.voting_contract(address, signer)
    }

    fn subscribe(&self) -> broadcast::Receiver<WalletEvent> {
        self.chain.subscribe()
    }
}
