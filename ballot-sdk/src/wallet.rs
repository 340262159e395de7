// Copyright (c) 2022 MASSA LABS <info@massa.net>

use crate::config::RpcConfig;
use crate::contracts::{RpcVoting, RpcWhitelist};
use crate::error::SdkResult;
use crate::rpc::RpcClient;
use async_trait::async_trait;
use ballot_models::address::Address;
use ballot_session_exports::{
    CallResult, SessionError, SessionResult, VotingContract, WalletEvent, WalletProvider,
    WhitelistContract,
};
use std::sync::Arc;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info};

const EVENT_CHANNEL_SIZE: usize = 16;

/// Wallet backed by a node holding unlocked accounts.
///
/// Nodes do not push account or network changes, so a background task polls
/// `eth_accounts` and `eth_chainId` and broadcasts what changed.
pub struct JsonRpcWallet {
    rpc: Arc<RpcClient>,
    events: broadcast::Sender<WalletEvent>,
    watcher: Option<JoinHandle<()>>,
}

impl JsonRpcWallet {
    /// Wallet over `config.url`. Must be called within a tokio runtime.
    pub fn new(config: RpcConfig) -> SdkResult<JsonRpcWallet> {
        let rpc = Arc::new(RpcClient::new(config)?);
        let (events, _) = broadcast::channel(EVENT_CHANNEL_SIZE);
        let watcher = tokio::spawn(watch_wallet(rpc.clone(), events.clone()));
        Ok(JsonRpcWallet {
            rpc,
            events,
            watcher: Some(watcher),
        })
    }

    /// underlying node client
    pub fn rpc(&self) -> Arc<RpcClient> {
        self.rpc.clone()
    }
}

impl Drop for JsonRpcWallet {
    fn drop(&mut self) {
        if let Some(watcher) = self.watcher.take() {
            watcher.abort();
        }
    }
}

async fn watch_wallet(rpc: Arc<RpcClient>, events: broadcast::Sender<WalletEvent>) {
    let period = rpc.config().event_poll_interval;
    let mut accounts = rpc.accounts().await.ok();
    let mut chain_id = rpc.chain_id().await.ok();
    loop {
        tokio::time::sleep(period).await;
        if let Ok(current) = rpc.accounts().await {
            if accounts.as_ref() != Some(&current) {
                if accounts.is_some() {
                    info!("wallet accounts changed");
                    let _ = events.send(WalletEvent::AccountsChanged(current.clone()));
                }
                accounts = Some(current);
            }
        }
        if let Ok(current) = rpc.chain_id().await {
            if chain_id != Some(current) {
                if chain_id.is_some() {
                    info!("wallet switched to chain {}", current);
                    let _ = events.send(WalletEvent::ChainChanged(current));
                }
                chain_id = Some(current);
            }
        }
    }
}

#[async_trait]
impl WalletProvider for JsonRpcWallet {
    async fn request_accounts(&self) -> SessionResult<Vec<Address>> {
        let accounts = self
            .rpc
            .accounts()
            .await
            .map_err(|err| SessionError::WalletUnavailable(err.to_string()))?;
        debug!("wallet exposes {} accounts", accounts.len());
        Ok(accounts)
    }

    async fn chain_id(&self) -> CallResult<u64> {
        self.rpc.chain_id().await
    }

    async fn get_code(&self, address: Address) -> CallResult<Vec<u8>> {
        let code = self.rpc.get_code(address).await?;
        debug!("{} bytes of code at {}", code.len(), address);
        Ok(code)
    }

    fn whitelist_contract(
        &self,
        address: Address,
        signer: Option<Address>,
    ) -> Arc<dyn WhitelistContract> {
        Arc::new(RpcWhitelist::new(self.rpc.clone(), address, signer))
    }

    fn voting_contract(
        &self,
        address: Address,
        signer: Option<Address>,
    ) -> Arc<dyn VotingContract> {
        Arc::new(RpcVoting::new(self.rpc.clone(), address, signer))
    }

    fn subscribe(&self) -> broadcast::Receiver<WalletEvent> {
        self.events.subscribe()
    }
}
