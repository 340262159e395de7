// Copyright (c) 2022 MASSA LABS <info@massa.net>

use serde::{Deserialize, Serialize};

/// Final result of a poll, computed from its vote counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PollOutcome {
    /// results were not fetched or are empty
    NoData,
    /// every option has zero votes
    NoVotes,
    /// several options share the highest count
    Tie {
        /// tied option labels, in option order
        options: Vec<String>,
        /// votes of each tied option
        votes: u64,
    },
    /// one option has strictly more votes than every other
    Winner {
        /// winning option label
        option: String,
        /// its vote count
        votes: u64,
    },
}

impl PollOutcome {
    /// Compute the outcome from option labels and the aligned vote counts.
    /// ```
    /// # use ballot_models::outcome::PollOutcome;
    /// let options = vec!["A".to_string(), "B".to_string(), "C".to_string()];
    /// assert_eq!(
    ///     PollOutcome::compute(&options, Some(&[5, 5, 3])).to_string(),
    ///     "Tie between A and B with 5 votes each"
    /// );
    /// ```
    pub fn compute(options: &[String], results: Option<&[u64]>) -> PollOutcome {
        let results = match results {
            Some(results) if !results.is_empty() => results,
            _ => return PollOutcome::NoData,
        };
        let max_votes = results.iter().copied().max().unwrap_or(0);
        if max_votes == 0 {
            return PollOutcome::NoVotes;
        }
        let mut leaders: Vec<String> = results
            .iter()
            .enumerate()
            .filter(|(_, votes)| **votes == max_votes)
            .map(|(index, _)| option_label(options, index))
            .collect();
        if leaders.len() > 1 {
            PollOutcome::Tie {
                options: leaders,
                votes: max_votes,
            }
        } else {
            PollOutcome::Winner {
                option: leaders.remove(0),
                votes: max_votes,
            }
        }
    }
}

fn option_label(options: &[String], index: usize) -> String {
    options
        .get(index)
        .cloned()
        .unwrap_or_else(|| format!("option #{}", index))
}

impl std::fmt::Display for PollOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            PollOutcome::NoData => write!(f, "No results available"),
            PollOutcome::NoVotes => write!(f, "No votes cast"),
            PollOutcome::Tie { options, votes } => write!(
                f,
                "Tie between {} with {} votes each",
                options.join(" and "),
                votes
            ),
            PollOutcome::Winner { option, votes } => {
                write!(f, "{} won with {} votes", option, votes)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels(labels: &[&str]) -> Vec<String> {
        labels.iter().map(|l| l.to_string()).collect()
    }

    #[test]
    fn test_reference_outcomes() {
        assert_eq!(
            PollOutcome::compute(&labels(&["A", "B", "C"]), Some(&[5, 5, 3])).to_string(),
            "Tie between A and B with 5 votes each"
        );
        assert_eq!(
            PollOutcome::compute(&labels(&["A", "B"]), Some(&[0, 0])).to_string(),
            "No votes cast"
        );
        assert_eq!(
            PollOutcome::compute(&labels(&["A"]), Some(&[7])).to_string(),
            "A won with 7 votes"
        );
    }

    #[test]
    fn test_missing_results() {
        assert_eq!(PollOutcome::compute(&labels(&["A"]), None), PollOutcome::NoData);
        assert_eq!(PollOutcome::compute(&labels(&["A"]), Some(&[])), PollOutcome::NoData);
        assert_eq!(PollOutcome::compute(&[], None), PollOutcome::NoData);
    }

    #[test]
    fn test_relabeling_invariance() {
        let options = labels(&["A", "B", "C", "D"]);
        let results = [4u64, 9, 9, 1];
        let reference = PollOutcome::compute(&options, Some(&results));

        // rotate options and results together
        for shift in 0..options.len() {
            let mut rotated_options = options.clone();
            let mut rotated_results = results.to_vec();
            rotated_options.rotate_left(shift);
            rotated_results.rotate_left(shift);
            let outcome = PollOutcome::compute(&rotated_options, Some(&rotated_results));
            match (&reference, outcome) {
                (
                    PollOutcome::Tie { options: expected, votes: expected_votes },
                    PollOutcome::Tie { mut options, votes },
                ) => {
                    options.sort();
                    assert_eq!(&options, expected);
                    assert_eq!(votes, *expected_votes);
                }
                (expected, outcome) => panic!("expected {:?}, got {:?}", expected, outcome),
            }
        }

        let single = PollOutcome::compute(&labels(&["X", "Y"]), Some(&[2, 3]));
        let swapped = PollOutcome::compute(&labels(&["Y", "X"]), Some(&[3, 2]));
        assert_eq!(single, swapped);
    }
}
