// Copyright (c) 2022 MASSA LABS <info@massa.net>

use displaydoc::Display;
use thiserror::Error;

/// models result
pub type ModelsResult<T, E = ModelsError> = core::result::Result<T, E>;

/// models error
#[non_exhaustive]
#[derive(Display, Error, Debug, Clone, PartialEq, Eq)]
pub enum ModelsError {
    /// address parsing error: {0}
    AddressParseError(String),
    /// transaction hash parsing error: {0}
    TxHashParseError(String),
    /// {options} options but {results} results
    ResultsMismatch {
        /// number of options of the poll
        options: usize,
        /// number of vote counts returned
        results: usize,
    },
    /// Time error {0}
    TimeError(#[from] ballot_time::TimeError),
}
