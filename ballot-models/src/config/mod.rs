// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! Constants and settings loading shared by the binaries.

mod ballot_settings;
/// default values and limits
pub mod constants;

pub use ballot_settings::build_ballot_settings;
pub use constants::*;
