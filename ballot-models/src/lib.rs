// Copyright (c) 2022 MASSA LABS <info@massa.net>
//! All the structures that are used everywhere
//!
#![warn(missing_docs)]
#![warn(unused_crate_dependencies)]

pub use error::{ModelsError, ModelsResult};

/// account and contract addresses
pub mod address;
/// constants and settings loading
pub mod config;
/// models error
pub mod error;
/// poll outcome
pub mod outcome;
/// poll snapshots
pub mod poll;
/// transactions
pub mod tx;
