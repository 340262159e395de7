// Copyright (c) 2022 MASSA LABS <info@massa.net>
//! Wallet connection and session: shared types, traits and errors.
//!
//! The contracts (`Whitelist`, `Voting`) and the wallet are external
//! collaborators. They are reached only through the traits of
//! `provider_traits`, so that the session and poll workers can run against the
//! JSON-RPC implementation of `ballot_sdk` or against the in-memory chain of
//! `test_exports`.
#![warn(missing_docs)]
#![warn(unused_crate_dependencies)]

mod config;
mod controller_traits;
mod error;
mod provider_traits;
mod revert;
mod session;

pub use config::SessionConfig;
pub use controller_traits::{SessionController, SessionManager};
pub use error::{CallError, CallResult, SessionError, SessionResult};
pub use provider_traits::{VotingContract, WalletEvent, WalletProvider, WhitelistContract};
pub use revert::extract_revert_reason;
pub use session::{ContractHandles, Role, Session};

#[cfg(any(test, feature = "test-exports"))]
pub use provider_traits::{MockVotingContract, MockWalletProvider, MockWhitelistContract};

/// Test utils
#[cfg(any(test, feature = "test-exports"))]
pub mod test_exports;
