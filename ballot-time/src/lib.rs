// Copyright (c) 2022 MASSA LABS <info@massa.net>
//! Unsigned time management.
//! Contracts store poll windows as unix timestamps in seconds,
//! so `BallotTime` counts seconds, not milliseconds.
#![warn(missing_docs)]
#![warn(unused_crate_dependencies)]

mod error;
pub use error::TimeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};
use time::macros::format_description;
use time::{Date, Month, OffsetDateTime, Time};

pub use time::UtcOffset;

/// Time structure used everywhere.
/// seconds since 01/01/1970.
#[derive(
    Debug, Default, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BallotTime(u64);

impl fmt::Display for BallotTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_secs())
    }
}

impl BallotTime {
    /// Conversion from `u64`, representing seconds.
    pub const fn from_secs(value: u64) -> Self {
        BallotTime(value)
    }

    /// Gets current UNIX timestamp (resolution: seconds).
    ///
    /// ```
    /// # use std::time::{SystemTime, UNIX_EPOCH};
    /// # use ballot_time::*;
    /// let before = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs();
    /// let now = BallotTime::now().unwrap().to_secs();
    /// assert!(now >= before && now - before <= 1);
    /// ```
    pub fn now() -> Result<Self, TimeError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| TimeError::TimeOverflowError)?
            .as_secs();
        Ok(BallotTime(now))
    }

    /// Conversion to `std::time::Duration`.
    pub fn to_duration(&self) -> Duration {
        Duration::from_secs(self.0)
    }

    /// Conversion to `u64`, representing seconds.
    pub const fn to_secs(&self) -> u64 {
        self.0
    }

    /// ```
    /// # use ballot_time::*;
    /// let time_1 = BallotTime::from_secs(42);
    /// let time_2 = BallotTime::from_secs(7);
    /// assert_eq!(time_1.saturating_sub(time_2), BallotTime::from_secs(35));
    /// assert_eq!(time_2.saturating_sub(time_1), BallotTime::from_secs(0));
    /// ```
    #[must_use]
    pub fn saturating_sub(self, t: BallotTime) -> Self {
        BallotTime(self.0.saturating_sub(t.0))
    }

    /// ```
    /// # use ballot_time::*;
    /// let time_1 = BallotTime::from_secs(42);
    /// let time_2 = BallotTime::from_secs(7);
    /// assert_eq!(time_1.saturating_add(time_2), BallotTime::from_secs(49));
    /// ```
    #[must_use]
    pub fn saturating_add(self, t: BallotTime) -> Self {
        BallotTime(self.0.saturating_add(t.0))
    }

    /// ```
    /// # use ballot_time::*;
    /// let time_1 = BallotTime::from_secs(42);
    /// let time_2 = BallotTime::from_secs(7);
    /// assert_eq!(time_1.checked_add(time_2).unwrap(), BallotTime::from_secs(49));
    /// assert!(BallotTime::from_secs(u64::MAX).checked_add(time_2).is_err());
    /// ```
    pub fn checked_add(self, t: BallotTime) -> Result<Self, TimeError> {
        self.0
            .checked_add(t.0)
            .ok_or(TimeError::TimeOverflowError)
            .map(BallotTime)
    }

    /// Long human readable form used when listing polls.
    /// ```
    /// # use ballot_time::*;
    /// let ballot_time = BallotTime::from_secs(1_644_101_440);
    /// assert_eq!(
    ///     ballot_time.format_long(time::UtcOffset::UTC).unwrap(),
    ///     String::from("February 5, 2022, 10:50 PM")
    /// )
    /// ```
    pub fn format_long(&self, offset: UtcOffset) -> Result<String, TimeError> {
        let format = format_description!(
            "[month repr:long] [day padding:none], [year], [hour repr:12]:[minute] [period]"
        );
        self.to_offset_date_time(offset)?
            .format(&format)
            .map_err(|_| TimeError::ConversionError)
    }

    /// Builds a time from form inputs: a `DD/MM/YYYY` date and a `HH:MM` time,
    /// read at the given UTC offset.
    /// ```
    /// # use ballot_time::*;
    /// let ballot_time = BallotTime::from_form_input("05/02/2022", "22:50", time::UtcOffset::UTC).unwrap();
    /// assert_eq!(ballot_time.to_secs(), 1_644_101_400)
    /// ```
    pub fn from_form_input(date: &str, time: &str, offset: UtcOffset) -> Result<Self, TimeError> {
        let date = parse_form_date(date)?;
        let time = parse_form_time(time)?;
        let timestamp = date.with_time(time).assume_offset(offset).unix_timestamp();
        Ok(BallotTime(
            u64::try_from(timestamp).map_err(|_| TimeError::TimeOverflowError)?,
        ))
    }

    /// Inverse of `from_form_input`: returns the (`DD/MM/YYYY`, `HH:MM`) pair.
    /// ```
    /// # use ballot_time::*;
    /// let ballot_time = BallotTime::from_secs(1_644_101_440);
    /// let (date, time) = ballot_time.to_form_input(time::UtcOffset::UTC).unwrap();
    /// assert_eq!(date, "05/02/2022");
    /// assert_eq!(time, "22:50");
    /// ```
    pub fn to_form_input(&self, offset: UtcOffset) -> Result<(String, String), TimeError> {
        let date_time = self.to_offset_date_time(offset)?;
        let date = date_time
            .format(format_description!("[day]/[month]/[year]"))
            .map_err(|_| TimeError::ConversionError)?;
        let time = date_time
            .format(format_description!("[hour]:[minute]"))
            .map_err(|_| TimeError::ConversionError)?;
        Ok((date, time))
    }

    fn to_offset_date_time(self, offset: UtcOffset) -> Result<OffsetDateTime, TimeError> {
        let secs = i64::try_from(self.0).map_err(|_| TimeError::TimeOverflowError)?;
        Ok(OffsetDateTime::from_unix_timestamp(secs)
            .map_err(|_| TimeError::TimeOverflowError)?
            .to_offset(offset))
    }

}

/// Builds a `UtcOffset` from a number of minutes east of UTC.
/// ```
/// # use ballot_time::*;
/// assert_eq!(utc_offset_from_minutes(120).unwrap().whole_hours(), 2);
/// assert!(utc_offset_from_minutes(24 * 60).is_err());
/// ```
pub fn utc_offset_from_minutes(minutes: i32) -> Result<UtcOffset, TimeError> {
    minutes
        .checked_mul(60)
        .and_then(|secs| UtcOffset::from_whole_seconds(secs).ok())
        .ok_or(TimeError::InvalidOffset(minutes))
}

fn parse_form_date(input: &str) -> Result<Date, TimeError> {
    let invalid = || TimeError::InvalidDate(input.to_string());
    let mut parts = input.trim().split('/');
    let (Some(day), Some(month), Some(year), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(invalid());
    };
    let day: u8 = day.parse().map_err(|_| invalid())?;
    let month: u8 = month.parse().map_err(|_| invalid())?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let month = Month::try_from(month).map_err(|_| invalid())?;
    Date::from_calendar_date(year, month, day).map_err(|_| invalid())
}

fn parse_form_time(input: &str) -> Result<Time, TimeError> {
    let invalid = || TimeError::InvalidTime(input.to_string());
    let (hours, minutes) = input.trim().split_once(':').ok_or_else(invalid)?;
    let hours: u8 = hours.parse().map_err(|_| invalid())?;
    let minutes: u8 = minutes.parse().map_err(|_| invalid())?;
    Time::from_hms(hours, minutes, 0).map_err(|_| invalid())
}
