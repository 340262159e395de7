// Copyright (c) 2022 MASSA LABS <info@massa.net>

use crate::worker::SessionWorker;
use ballot_session_exports::SessionManager;
use std::sync::Arc;
use tracing::info;

/// Implementation of the session manager.
/// Allows stopping the wallet listener.
pub(crate) struct SessionManagerImpl {
    pub(crate) worker: Option<Arc<SessionWorker>>,
}

impl SessionManager for SessionManagerImpl {
    fn stop(&mut self) {
        if let Some(worker) = self.worker.take() {
            info!("stopping session worker...");
            worker.disconnect();
            info!("session worker stopped");
        }
    }
}
