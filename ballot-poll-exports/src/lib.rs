// Copyright (c) 2022 MASSA LABS <info@massa.net>
//! Poll view-model: shared types, traits and errors.
//!
//! The view-model keeps the local list of polls in sync with the voting
//! contract, validates poll drafts and submits transactions through the
//! handles of the current session.

#![warn(missing_docs)]
#![warn(unused_crate_dependencies)]

mod config;
mod controller_traits;
mod draft;
mod error;
mod types;

pub use config::PollConfig;
pub use controller_traits::{PollController, RefreshManager};
pub use draft::PollDraft;
pub use error::{PollError, PollResult, ValidationError};
pub use types::{LoadOutcome, ViewKind};
