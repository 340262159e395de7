// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! Connection state machine and wallet event listener.

use crate::controller::SessionControllerImpl;
use crate::manager::SessionManagerImpl;
use ballot_logging::ballot_trace;
use ballot_models::address::Address;
use ballot_session_exports::{
    ContractHandles, Session, SessionConfig, SessionController, SessionError, SessionManager,
    SessionResult, WalletProvider,
};
use parking_lot::Mutex;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// State shared by the controller clones and the listener task
pub(crate) struct SessionWorker {
    config: SessionConfig,
    wallet: Arc<dyn WalletProvider>,
    session_tx: watch::Sender<Arc<Session>>,
    /// bumped by every connect, reload and disconnect; a connection attempt
    /// only publishes if nothing else started since
    epoch: AtomicU64,
    /// account asked for by the last explicit connect
    account_request: Mutex<Option<Address>>,
    listener: Mutex<Option<JoinHandle<()>>>,
    /// serializes connection attempts
    connect_lock: tokio::sync::Mutex<()>,
}

impl SessionWorker {
    pub(crate) fn session(&self) -> Arc<Session> {
        self.session_tx.borrow().clone()
    }

    pub(crate) fn watch(&self) -> watch::Receiver<Arc<Session>> {
        self.session_tx.subscribe()
    }

    pub(crate) async fn connect(
        self: &Arc<Self>,
        account: Option<Address>,
    ) -> SessionResult<Arc<Session>> {
        let _guard = self.connect_lock.lock().await;
        self.stop_listener();
        *self.account_request.lock() = account;
        let epoch = self.teardown();
        ballot_trace!("session.connect", { "account": account.map(|a| a.to_string()) });
        // events fired while establishing must still trigger a reload
        let events = self.wallet.subscribe();

        match self.establish(account).await {
            Ok(session) => {
                let session = Arc::new(session);
                if !self.publish(epoch, session.clone()) {
                    debug!("connection superseded by a disconnect");
                    return Err(SessionError::NotConnected);
                }
                self.start_listener(events);
                info!(
                    "connected {} as {}",
                    session.account.map(|a| a.to_string()).unwrap_or_default(),
                    session.role()
                );
                Ok(session)
            }
            Err(err) => {
                warn!("could not connect: {}", err);
                Err(err)
            }
        }
    }

    pub(crate) async fn reload(self: &Arc<Self>) -> SessionResult<Arc<Session>> {
        let account = *self.account_request.lock();
        self.connect(account).await
    }

    pub(crate) fn disconnect(&self) {
        self.stop_listener();
        self.teardown();
        ballot_trace!("session.disconnect", {});
        debug!("session cleared");
    }

    /// Invalidate in-flight attempts and publish the empty session
    fn teardown(&self) -> u64 {
        let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
        self.session_tx.send_replace(Arc::new(Session::default()));
        epoch
    }

    fn publish(&self, epoch: u64, session: Arc<Session>) -> bool {
        self.session_tx.send_if_modified(|current| {
            if self.epoch.load(Ordering::SeqCst) != epoch {
                return false;
            }
            *current = session;
            true
        })
    }

    /// Teardown and connect again, keeping the listener in place
    async fn reestablish(&self) {
        let _guard = self.connect_lock.lock().await;
        let account = *self.account_request.lock();
        let epoch = self.teardown();
        match self.establish(account).await {
            Ok(session) => {
                info!("session reloaded as {}", session.role());
                self.publish(epoch, Arc::new(session));
            }
            Err(err) => warn!("session reload failed: {}", err),
        }
    }

    async fn establish(&self, requested: Option<Address>) -> SessionResult<Session> {
        let accounts = self.wallet.request_accounts().await?;
        let account = match requested.or(self.config.account) {
            Some(wanted) => accounts.iter().copied().find(|a| *a == wanted).ok_or_else(|| {
                SessionError::WalletUnavailable(format!(
                    "account {} is not available in the wallet",
                    wanted
                ))
            })?,
            None => accounts.first().copied().ok_or_else(|| {
                SessionError::WalletUnavailable("the wallet exposes no account".to_string())
            })?,
        };

        let whitelist_address = parse_contract_address("whitelist", &self.config.whitelist_address)?;
        let voting_address = parse_contract_address("voting", &self.config.voting_address)?;

        let chain_id = self.wallet.chain_id().await?;
        for address in [whitelist_address, voting_address] {
            if self.wallet.get_code(address).await?.is_empty() {
                return Err(SessionError::DeploymentError(address));
            }
        }

        let contracts = ContractHandles {
            whitelist_reader: self.wallet.whitelist_contract(whitelist_address, None),
            whitelist: self.wallet.whitelist_contract(whitelist_address, Some(account)),
            voting_reader: self.wallet.voting_contract(voting_address, None),
            voting: self.wallet.voting_contract(voting_address, Some(account)),
        };
        let is_whitelisted = contracts.whitelist_reader.is_whitelisted(account).await?;
        let owner = contracts.whitelist_reader.owner().await?;
        ballot_trace!("session.established", {
            "account": account.to_string(),
            "chain_id": chain_id,
            "owner": owner.to_string(),
            "is_whitelisted": is_whitelisted
        });

        Ok(Session {
            account: Some(account),
            chain_id: Some(chain_id),
            is_admin: owner == account,
            is_whitelisted,
            contracts: Some(contracts),
        })
    }

    fn start_listener(
        self: &Arc<Self>,
        events: broadcast::Receiver<ballot_session_exports::WalletEvent>,
    ) {
        let handle = tokio::spawn(run_listener(Arc::downgrade(self), events));
        if let Some(previous) = self.listener.lock().replace(handle) {
            previous.abort();
        }
    }

    fn stop_listener(&self) {
        if let Some(handle) = self.listener.lock().take() {
            handle.abort();
        }
    }
}

impl Drop for SessionWorker {
    fn drop(&mut self) {
        self.stop_listener();
    }
}

fn parse_contract_address(name: &str, value: &str) -> SessionResult<Address> {
    if value.trim().is_empty() {
        return Err(SessionError::InvalidConfiguration(format!(
            "{} contract address is not configured",
            name
        )));
    }
    let address = Address::from_str(value.trim()).map_err(|err| {
        SessionError::InvalidConfiguration(format!("{} contract address: {}", name, err))
    })?;
    if address.is_zero() {
        return Err(SessionError::InvalidConfiguration(format!(
            "{} contract address is the zero address",
            name
        )));
    }
    Ok(address)
}

/// Every wallet event triggers a full reload
async fn run_listener(
    worker: std::sync::Weak<SessionWorker>,
    mut events: broadcast::Receiver<ballot_session_exports::WalletEvent>,
) {
    loop {
        match events.recv().await {
            Ok(event) => {
                debug!("wallet event: {:?}", event);
                ballot_trace!("session.wallet_event", { "event": format!("{:?}", event) });
            }
            Err(RecvError::Lagged(missed)) => {
                debug!("missed {} wallet events", missed);
            }
            Err(RecvError::Closed) => {
                debug!("wallet event stream closed");
                break;
            }
        }
        match worker.upgrade() {
            Some(worker) => worker.reestablish().await,
            None => break,
        }
    }
}

/// Start the session worker.
///
/// Returns the manager, used to stop it, and the controller, used to connect.
/// Nothing is connected until `SessionController::connect` is called.
pub fn start_session_controller(
    config: SessionConfig,
    wallet: Arc<dyn WalletProvider>,
) -> (Box<dyn SessionManager>, Box<dyn SessionController>) {
    let (session_tx, _) = watch::channel(Arc::new(Session::default()));
    let worker = Arc::new(SessionWorker {
        config,
        wallet,
        session_tx,
        epoch: AtomicU64::new(0),
        account_request: Mutex::new(None),
        listener: Mutex::new(None),
        connect_lock: tokio::sync::Mutex::new(()),
    });
    let controller = SessionControllerImpl {
        worker: worker.clone(),
    };
    let manager = SessionManagerImpl {
        worker: Some(worker),
    };
    (Box::new(manager), Box::new(controller))
}
