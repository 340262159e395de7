// Copyright (c) 2022 MASSA LABS <info@massa.net>

use ballot_time::BallotTime;

/// Interval between two automatic refreshes of the voter view
pub const VOTER_REFRESH_INTERVAL: BallotTime = BallotTime::from_secs(30);
/// Minimum number of non-empty options a poll must have
pub const MIN_POLL_OPTIONS: usize = 2;
/// Number of option fields a blank poll draft starts with
pub const DEFAULT_DRAFT_OPTIONS: usize = 2;
/// Chain id of a local development node
pub const LOCAL_DEV_CHAIN_ID: u64 = 1337;
