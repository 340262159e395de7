// Copyright (c) 2022 MASSA LABS <info@massa.net>

use displaydoc::Display;
use thiserror::Error;

/// time error
#[non_exhaustive]
#[derive(Display, Error, Debug, Clone, PartialEq, Eq)]
pub enum TimeError {
    /// Error converting
    ConversionError,
    /// Time overflow error
    TimeOverflowError,
    /// invalid date `{0}`: expected DD/MM/YYYY
    InvalidDate(String),
    /// invalid time `{0}`: expected HH:MM
    InvalidTime(String),
    /// invalid UTC offset: {0} minutes
    InvalidOffset(i32),
}
