// Copyright (c) 2022 MASSA LABS <info@massa.net>

use ballot_models::address::Address;
use serde::{Deserialize, Serialize};

/// Session configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SessionConfig {
    /// whitelist contract address, as configured (validated at connect time)
    pub whitelist_address: String,
    /// voting contract address, as configured (validated at connect time)
    pub voting_address: String,
    /// account to use when the wallet exposes several, the first one otherwise
    pub account: Option<Address>,
}
