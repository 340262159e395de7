// Copyright (c) 2022 MASSA LABS <info@massa.net>
//! Session worker: connects the wallet, checks the contracts, derives the
//! role of the connected account and follows wallet events.
//!
//! See `ballot-session-exports` for the interfaces.

#![warn(missing_docs)]
#![warn(unused_crate_dependencies)]

mod controller;
mod manager;
mod worker;

pub use worker::start_session_controller;

#[cfg(test)]
mod tests;
