// Copyright (c) 2022 MASSA LABS <info@massa.net>

use crate::worker::SessionWorker;
use async_trait::async_trait;
use ballot_models::address::Address;
use ballot_session_exports::{Session, SessionController, SessionResult};
use std::sync::Arc;
use tokio::sync::watch;

/// Implementation of the session controller.
/// Cheap to clone, every clone drives the same session.
#[derive(Clone)]
pub(crate) struct SessionControllerImpl {
    pub(crate) worker: Arc<SessionWorker>,
}

#[async_trait]
impl SessionController for SessionControllerImpl {
    async fn connect(&self, account: Option<Address>) -> SessionResult<Arc<Session>> {
        self.worker.connect(account).await
    }

    async fn reload(&self) -> SessionResult<Arc<Session>> {
        self.worker.reload().await
    }

    fn disconnect(&self) {
        self.worker.disconnect()
    }

    fn session(&self) -> Arc<Session> {
        self.worker.session()
    }

    fn watch(&self) -> watch::Receiver<Arc<Session>> {
        self.worker.watch()
    }

    fn clone_box(&self) -> Box<dyn SessionController> {
        Box::new(self.clone())
    }
}
