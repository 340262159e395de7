// Copyright (c) 2022 MASSA LABS <info@massa.net>

use ballot_models::poll::PollId;
use ballot_models::ModelsError;
use ballot_session_exports::{CallError, SessionError};
use ballot_time::TimeError;
use displaydoc::Display;
use thiserror::Error;

/// poll result
pub type PollResult<T, E = PollError> = core::result::Result<T, E>;

/// Rejected form input. Nothing is submitted.
#[non_exhaustive]
#[derive(Display, Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Poll title is required
    EmptyTitle,
    /// Poll description is required
    EmptyDescription,
    /// Invalid {0} date or time: {1}
    InvalidDateTime(&'static str, TimeError),
    /// Start time must be in the future
    StartNotInFuture,
    /// End time must be after start time
    EndNotAfterStart,
    /// Poll must have at least 2 non-empty options
    NotEnoughOptions,
    /// A poll needs at least 2 option fields
    CannotRemoveOption,
    /// No option at index {0}
    NoSuchOption(usize),
    /// Invalid address: {0}
    InvalidAddress(String),
}

/// poll view-model error
#[non_exhaustive]
#[derive(Display, Error, Debug, Clone, PartialEq, Eq)]
pub enum PollError {
    /// {0}
    Validation(#[from] ValidationError),
    /// {0}
    Session(#[from] SessionError),
    /// {0}
    ContractCall(#[from] CallError),
    /// Please select an option for poll {0}
    NoSelectedOption(PollId),
    /// Unknown poll {0}
    UnknownPoll(PollId),
    /// Wallet not connected
    NotConnected,
    /// inconsistent contract data: {0}
    Models(#[from] ModelsError),
    /// time error: {0}
    Time(#[from] TimeError),
}
