// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! Local snapshots of on-chain polls and the status derived from them.

use crate::error::{ModelsError, ModelsResult};
use crate::outcome::PollOutcome;
use ballot_time::BallotTime;
use serde::{Deserialize, Serialize};

/// Ordinal index of a poll in the voting contract
pub type PollId = u64;

/// What `getPollInfo` returns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollInfo {
    /// title
    pub title: String,
    /// description
    pub description: String,
    /// opening of the voting window
    pub start_time: BallotTime,
    /// closing of the voting window
    pub end_time: BallotTime,
    /// contract-side flag, cleared by `endPoll`
    pub is_active: bool,
    /// option labels, in contract order
    pub options: Vec<String>,
}

/// Arguments of a `createPoll` transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPoll {
    /// title
    pub title: String,
    /// description
    pub description: String,
    /// opening of the voting window
    pub start_time: BallotTime,
    /// length of the voting window
    pub duration: BallotTime,
    /// non-empty option labels
    pub options: Vec<String>,
}

/// Status shown next to a poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PollStatus {
    /// closed by an `endPoll` transaction
    Ended,
    /// window not open yet
    NotStarted,
    /// window closed but nobody ended the poll
    TimeExpired,
    /// open for votes
    Active,
}

impl std::fmt::Display for PollStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let label = match self {
            PollStatus::Ended => "Ended",
            PollStatus::NotStarted => "Not Started",
            PollStatus::TimeExpired => "Time Expired",
            PollStatus::Active => "Active",
        };
        write!(f, "{}", label)
    }
}

/// Snapshot of one poll at fetch time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollRecord {
    /// index in the contract
    pub id: PollId,
    /// title
    pub title: String,
    /// description
    pub description: String,
    /// opening of the voting window
    pub start_time: BallotTime,
    /// closing of the voting window
    pub end_time: BallotTime,
    /// contract-side flag
    pub is_active: bool,
    /// option labels
    pub options: Vec<String>,
    /// vote counts aligned with `options`, only fetched for voters
    pub results: Option<Vec<u64>>,
    /// whether the connected account voted, only fetched for voters
    pub has_voted: Option<bool>,
}

impl PollRecord {
    /// Record built from the poll info alone (admin view)
    pub fn from_info(id: PollId, info: PollInfo) -> Self {
        PollRecord {
            id,
            title: info.title,
            description: info.description,
            start_time: info.start_time,
            end_time: info.end_time,
            is_active: info.is_active,
            options: info.options,
            results: None,
            has_voted: None,
        }
    }

    /// Attach the voter-only fields.
    /// Fails if the contract returned a vote count per option that does not line up.
    pub fn with_voter_view(mut self, results: Vec<u64>, has_voted: bool) -> ModelsResult<Self> {
        if results.len() != self.options.len() {
            return Err(ModelsError::ResultsMismatch {
                options: self.options.len(),
                results: results.len(),
            });
        }
        self.results = Some(results);
        self.has_voted = Some(has_voted);
        Ok(self)
    }

    /// Contract flag and wall-clock window are independent: both must agree.
    pub fn is_active_at(&self, now: BallotTime) -> bool {
        self.is_active && self.start_time <= now && now <= self.end_time
    }

    /// Ended manually or by time.
    pub fn is_ended_at(&self, now: BallotTime) -> bool {
        !self.is_active || now > self.end_time
    }

    /// Status, by priority: manual end, then not started, then expired.
    pub fn status_at(&self, now: BallotTime) -> PollStatus {
        if !self.is_active {
            PollStatus::Ended
        } else if now < self.start_time {
            PollStatus::NotStarted
        } else if now > self.end_time {
            PollStatus::TimeExpired
        } else {
            PollStatus::Active
        }
    }

    /// Whether the connected voter can still vote
    pub fn can_vote_at(&self, now: BallotTime) -> bool {
        self.is_active_at(now) && !self.has_voted.unwrap_or(false)
    }

    /// Whether the admin view offers to end this poll
    pub fn can_be_ended_at(&self, now: BallotTime) -> bool {
        matches!(
            self.status_at(now),
            PollStatus::Active | PollStatus::TimeExpired
        )
    }

    /// Sum of all vote counts, 0 when results were not fetched
    pub fn total_votes(&self) -> u64 {
        self.results
            .as_ref()
            .map(|results| results.iter().sum())
            .unwrap_or(0)
    }

    /// Share of the votes for one option, in percent
    pub fn vote_percentage(&self, option_index: usize) -> f64 {
        let total = self.total_votes();
        if total == 0 {
            return 0.0;
        }
        let votes = self
            .results
            .as_ref()
            .and_then(|results| results.get(option_index))
            .copied()
            .unwrap_or(0);
        votes as f64 / total as f64 * 100.0
    }

    /// Final result of the poll
    pub fn outcome(&self) -> PollOutcome {
        PollOutcome::compute(&self.options, self.results.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(is_active: bool, start: u64, end: u64) -> PollRecord {
        PollRecord::from_info(
            0,
            PollInfo {
                title: "Budget".into(),
                description: "Q3 budget".into(),
                start_time: BallotTime::from_secs(start),
                end_time: BallotTime::from_secs(end),
                is_active,
                options: vec!["Yes".into(), "No".into()],
            },
        )
    }

    #[test]
    fn test_status_priority() {
        let poll = record(true, 100, 200);
        assert_eq!(poll.status_at(BallotTime::from_secs(50)), PollStatus::NotStarted);
        assert_eq!(poll.status_at(BallotTime::from_secs(100)), PollStatus::Active);
        assert_eq!(poll.status_at(BallotTime::from_secs(200)), PollStatus::Active);
        assert_eq!(poll.status_at(BallotTime::from_secs(201)), PollStatus::TimeExpired);

        let ended = record(false, 100, 200);
        for now in [0, 50, 100, 150, 200, 250] {
            assert_eq!(ended.status_at(BallotTime::from_secs(now)), PollStatus::Ended);
        }
    }

    #[test]
    fn test_is_active_matches_definition() {
        for is_active in [true, false] {
            let poll = record(is_active, 100, 200);
            for now in [0, 99, 100, 101, 199, 200, 201, 10_000] {
                let now = BallotTime::from_secs(now);
                assert_eq!(
                    poll.is_active_at(now),
                    is_active && poll.start_time <= now && now <= poll.end_time
                );
                assert_eq!(
                    poll.is_active_at(now),
                    poll.status_at(now) == PollStatus::Active
                );
            }
        }
    }

    #[test]
    fn test_status_labels() {
        assert_eq!(PollStatus::Ended.to_string(), "Ended");
        assert_eq!(PollStatus::NotStarted.to_string(), "Not Started");
        assert_eq!(PollStatus::TimeExpired.to_string(), "Time Expired");
        assert_eq!(PollStatus::Active.to_string(), "Active");
    }

    #[test]
    fn test_voter_view_requires_aligned_results() {
        let poll = record(true, 100, 200);
        assert_eq!(
            poll.clone().with_voter_view(vec![1, 2, 3], false),
            Err(ModelsError::ResultsMismatch {
                options: 2,
                results: 3
            })
        );
        let poll = poll.with_voter_view(vec![3, 1], true).unwrap();
        assert_eq!(poll.total_votes(), 4);
        assert_eq!(poll.vote_percentage(0), 75.0);
        assert_eq!(poll.vote_percentage(5), 0.0);
        assert!(!poll.can_vote_at(BallotTime::from_secs(150)));
    }

    #[test]
    fn test_end_action_availability() {
        let poll = record(true, 100, 200);
        assert!(!poll.can_be_ended_at(BallotTime::from_secs(50)));
        assert!(poll.can_be_ended_at(BallotTime::from_secs(150)));
        assert!(poll.can_be_ended_at(BallotTime::from_secs(250)));
        assert!(poll.is_ended_at(BallotTime::from_secs(250)));
        assert!(!record(false, 100, 200).can_be_ended_at(BallotTime::from_secs(150)));
    }
}
