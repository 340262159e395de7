// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! Poll creation form.

use crate::error::ValidationError;
use ballot_models::config::{DEFAULT_DRAFT_OPTIONS, MIN_POLL_OPTIONS};
use ballot_models::poll::NewPoll;
use ballot_time::{BallotTime, UtcOffset};
use serde::{Deserialize, Serialize};

/// Raw form input of a poll being created.
/// Dates are `DD/MM/YYYY`, times `HH:MM`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollDraft {
    /// title
    pub title: String,
    /// description
    pub description: String,
    /// start date
    pub start_date: String,
    /// start time of day
    pub start_time: String,
    /// end date
    pub end_date: String,
    /// end time of day
    pub end_time: String,
    /// option fields, possibly blank
    pub options: Vec<String>,
}

impl Default for PollDraft {
    fn default() -> Self {
        PollDraft {
            title: String::new(),
            description: String::new(),
            start_date: String::new(),
            start_time: String::new(),
            end_date: String::new(),
            end_time: String::new(),
            options: vec![String::new(); DEFAULT_DRAFT_OPTIONS],
        }
    }
}

impl PollDraft {
    /// Append a blank option field
    pub fn add_option(&mut self) {
        self.options.push(String::new());
    }

    /// Set the text of an option field
    pub fn update_option(
        &mut self,
        index: usize,
        value: impl Into<String>,
    ) -> Result<(), ValidationError> {
        let option = self
            .options
            .get_mut(index)
            .ok_or(ValidationError::NoSuchOption(index))?;
        *option = value.into();
        Ok(())
    }

    /// Remove an option field. The form never goes below two fields.
    pub fn remove_option(&mut self, index: usize) -> Result<(), ValidationError> {
        if index >= self.options.len() {
            return Err(ValidationError::NoSuchOption(index));
        }
        if self.options.len() <= MIN_POLL_OPTIONS {
            return Err(ValidationError::CannotRemoveOption);
        }
        self.options.remove(index);
        Ok(())
    }

    /// Non-blank options as typed, in form order
    pub fn filled_options(&self) -> Vec<String> {
        self.options
            .iter()
            .filter(|option| !option.trim().is_empty())
            .cloned()
            .collect()
    }

    /// Check the form against `now` and build the `createPoll` arguments.
    ///
    /// Checks in order: title, description, dates, start in the future,
    /// end after start, at least two filled options.
    /// Blank means empty once trimmed, but the fields are submitted as typed.
    pub fn validate(&self, now: BallotTime, offset: UtcOffset) -> Result<NewPoll, ValidationError> {
        if self.title.trim().is_empty() {
            return Err(ValidationError::EmptyTitle);
        }
        if self.description.trim().is_empty() {
            return Err(ValidationError::EmptyDescription);
        }
        let start = BallotTime::from_form_input(&self.start_date, &self.start_time, offset)
            .map_err(|err| ValidationError::InvalidDateTime("start", err))?;
        let end = BallotTime::from_form_input(&self.end_date, &self.end_time, offset)
            .map_err(|err| ValidationError::InvalidDateTime("end", err))?;
        if start <= now {
            return Err(ValidationError::StartNotInFuture);
        }
        if end <= start {
            return Err(ValidationError::EndNotAfterStart);
        }
        let options = self.filled_options();
        if options.len() < MIN_POLL_OPTIONS {
            return Err(ValidationError::NotEnoughOptions);
        }
        Ok(NewPoll {
            title: self.title.clone(),
            description: self.description.clone(),
            start_time: start,
            duration: end.saturating_sub(start),
            options,
        })
    }
}
