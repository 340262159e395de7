// Copyright (c) 2022 MASSA LABS <info@massa.net>

use ballot_poll_exports::{PollController, RefreshManager};
use ballot_time::BallotTime;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, warn};

/// Stops the refresh task on `stop` or drop
pub(crate) struct RefreshManagerImpl {
    handle: Option<JoinHandle<()>>,
}

impl RefreshManager for RefreshManagerImpl {
    fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            debug!("poll refresh stopped");
        }
    }
}

impl Drop for RefreshManagerImpl {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Reload the polls every `period`, starting one period from now.
/// Failed reloads are logged and the next tick tries again.
pub fn start_refresh_task(
    controller: Box<dyn PollController>,
    period: BallotTime,
) -> Box<dyn RefreshManager> {
    let period = period.to_duration().max(Duration::from_secs(1));
    let handle = tokio::spawn(async move {
        let mut ticks = interval_at(Instant::now() + period, period);
        ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            ticks.tick().await;
            debug!("periodic poll refresh");
            if let Err(err) = controller.load_polls().await {
                warn!("periodic poll refresh failed: {}", err);
            }
        }
    });
    Box::new(RefreshManagerImpl {
        handle: Some(handle),
    })
}
