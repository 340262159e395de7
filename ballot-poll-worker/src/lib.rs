// Copyright (c) 2022 MASSA LABS <info@massa.net>
//! Poll view-model worker.
//!
//! See `ballot-poll-exports` for the interfaces.

#![warn(missing_docs)]
#![warn(unused_crate_dependencies)]

mod controller;
mod refresh;

pub use controller::start_poll_controller;
pub use refresh::start_refresh_task;

#[cfg(test)]
mod tests;
