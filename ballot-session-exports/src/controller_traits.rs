// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! This module exports generic traits representing interfaces for interacting
//! with the session worker.

use crate::error::SessionResult;
use crate::session::Session;
use async_trait::async_trait;
use ballot_models::address::Address;
use std::sync::Arc;
use tokio::sync::watch;

/// interface that communicates with the session worker
#[async_trait]
pub trait SessionController: Send + Sync {
    /// Connect the wallet, check the contracts and derive the role.
    /// `account` overrides the configured account.
    /// On failure the session is left empty.
    async fn connect(&self, account: Option<Address>) -> SessionResult<Arc<Session>>;

    /// Full teardown then connect again with the same account request
    async fn reload(&self) -> SessionResult<Arc<Session>>;

    /// Reset the session to the empty state and stop listening to the wallet.
    /// Idempotent.
    fn disconnect(&self);

    /// Current session snapshot
    fn session(&self) -> Arc<Session>;

    /// Receiver notified each time a new session is published
    fn watch(&self) -> watch::Receiver<Arc<Session>>;

    /// Returns a boxed clone of self.
    /// Useful to allow cloning `Box<dyn SessionController>`.
    fn clone_box(&self) -> Box<dyn SessionController>;
}

/// Allow cloning `Box<dyn SessionController>`
/// Uses `SessionController::clone_box` internally
impl Clone for Box<dyn SessionController> {
    fn clone(&self) -> Box<dyn SessionController> {
        self.clone_box()
    }
}

/// Session manager used to stop the wallet listener
pub trait SessionManager {
    /// Stop the wallet listener and clear the session
    fn stop(&mut self);
}
