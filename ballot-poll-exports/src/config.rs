// Copyright (c) 2022 MASSA LABS <info@massa.net>

use ballot_models::config::VOTER_REFRESH_INTERVAL;
use ballot_time::{BallotTime, UtcOffset};

/// Poll view-model configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// period of the automatic refresh of the voter view
    pub voter_refresh_interval: BallotTime,
    /// offset at which form dates are read and poll times displayed
    pub utc_offset: UtcOffset,
}

impl Default for PollConfig {
    fn default() -> Self {
        PollConfig {
            voter_refresh_interval: VOTER_REFRESH_INTERVAL,
            utc_offset: UtcOffset::UTC,
        }
    }
}
