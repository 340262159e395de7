// Copyright (c) 2022 MASSA LABS <info@massa.net>

use ballot_models::address::Address;
use ballot_models::outcome::PollOutcome;
use ballot_models::poll::{PollRecord, PollStatus};
use ballot_models::tx::TxReceipt;
use ballot_poll_exports::{PollDraft, ViewKind};
use ballot_session_exports::Role;
use ballot_time::{BallotTime, UtcOffset};
use console::style;
use erased_serde::{Serialize, Serializer};

#[macro_export]
macro_rules! ballot_banner {
    () => {
        println!(
            "{}\n{}\n",
            console::style("Ballot: whitelisted on-chain polls").color256(81).bold(),
            console::style("==================================").color256(239)
        );
    };
}

#[macro_export]
/// print a yellow warning
macro_rules! client_warning {
    ($e:expr) => {
        println!("{}: {}", console::style("WARNING").yellow(), $e)
    };
}

/// Shown instead of a panel to connected accounts that are neither owner nor whitelisted
pub(crate) const UNAUTHORIZED_MESSAGE: &str =
    "Your address is not whitelisted. Please contact the administrator.";
pub(crate) const VOTED_MESSAGE: &str =
    "You have voted in this poll. Results will be available after the poll ends.";
pub(crate) const CANNOT_VOTE_MESSAGE: &str =
    "You cannot vote in this poll. Results will be available after the poll ends.";

pub enum Style {
    /// Any information that identifies an element
    Id,
    /// If a process is ongoing, not final, will change in the future
    Pending,
    /// If a process is finished, fixed, and won't evolve in the future
    Finished,
    /// Good things in general, success of an operation
    Good,
    /// Bad things in general, failure of an operation
    Bad,
    /// For any information that is unknown
    Unknown,
    /// Vote counts and percentages
    Votes,
    /// For any information related to the wallet, addresses or chains
    Wallet,
    /// To separate some informations on the screen by barely visible characters
    Separator,
    /// When displaying a timestamp or date
    Time,
}

impl Style {
    pub(crate) fn style<T: ToString>(&self, msg: T) -> console::StyledObject<std::string::String> {
        style(msg.to_string()).color256(match self {
            Style::Id => 218,        // #ffafd7
            Style::Pending => 172,   // #d78700
            Style::Finished => 81,   // #5fd7ff
            Style::Good => 112,      // #87d700
            Style::Bad => 160,       // #d70000
            Style::Unknown => 248,   // #a8a8a8
            Style::Votes => 141,     // #af87ff
            Style::Wallet => 213,    // #ff87ff
            Style::Separator => 239, // #4e4e4e
            Style::Time => 117,      // #87d7ff
        })
    }
}

pub trait Output: Serialize {
    fn pretty_print(&self);
}

impl dyn Output {
    pub(crate) fn stdout_json(&self) -> anyhow::Result<()> {
        let json = &mut serde_json::Serializer::new(std::io::stdout());
        let mut format: Box<dyn Serializer> = Box::new(<dyn Serializer>::erase(json));
        self.erased_serialize(&mut format)?;
        println!();
        Ok(())
    }
}

impl Output for () {
    fn pretty_print(&self) {}
}

impl Output for String {
    fn pretty_print(&self) {
        println!("{}", self);
    }
}

impl Output for &str {
    fn pretty_print(&self) {
        println!("{}", self)
    }
}

impl Output for Vec<Address> {
    fn pretty_print(&self) {
        if self.is_empty() {
            println!("{}", Style::Unknown.style("No whitelisted address"));
        }
        for addr in self {
            println!("{}", Style::Wallet.style(addr));
        }
    }
}

fn role_style(role: Role) -> Style {
    match role {
        Role::Admin => Style::Good,
        Role::Voter => Style::Finished,
        Role::Unauthorized => Style::Bad,
        Role::Disconnected => Style::Unknown,
    }
}

/// Connection state shown after `connect`, `reload` and `status`
#[derive(Debug, Clone, serde::Serialize)]
pub(crate) struct SessionStatus {
    pub account: Option<Address>,
    pub chain_id: Option<u64>,
    #[serde(serialize_with = "serialize_display")]
    pub role: Role,
    /// message shown in place of a panel, or why the panel could not load
    pub notice: Option<String>,
}

fn serialize_display<T: std::fmt::Display, S: serde::Serializer>(
    value: &T,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

impl SessionStatus {
    pub(crate) fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        match self.account {
            Some(account) => {
                lines.push(format!("Connected: {}", Style::Wallet.style(account.short())));
                if let Some(chain_id) = self.chain_id {
                    lines.push(format!("Chain id: {}", Style::Id.style(chain_id)));
                }
            }
            None => lines.push(format!("{}", Style::Unknown.style("Wallet not connected"))),
        }
        lines.push(format!("Status: {}", role_style(self.role).style(self.role)));
        if let Some(notice) = &self.notice {
            lines.push(format!("{}", Style::Pending.style(notice)));
        }
        lines
    }
}

impl Output for SessionStatus {
    fn pretty_print(&self) {
        for line in self.lines() {
            println!("{}", line);
        }
    }
}

/// A submitted transaction, once mined
#[derive(Debug, Clone, serde::Serialize)]
pub(crate) struct TxOutcome {
    pub action: String,
    pub receipt: TxReceipt,
}

impl Output for TxOutcome {
    fn pretty_print(&self) {
        println!("{}", Style::Good.style(&self.action));
        println!("Transaction: {}", Style::Id.style(self.receipt.hash));
        if let Some(block) = self.receipt.block_number {
            println!("Block: {}", Style::Finished.style(block));
        }
    }
}

/// One poll of a listing with what the panel derives from it
#[derive(Debug, Clone, serde::Serialize)]
pub(crate) struct PollEntry {
    #[serde(flatten)]
    pub record: PollRecord,
    pub status: PollStatus,
    pub selected_option: Option<usize>,
    /// only computed for the voter panel, once the poll is ended
    pub outcome: Option<PollOutcome>,
}

impl PollEntry {
    pub(crate) fn new(
        record: PollRecord,
        view: ViewKind,
        now: BallotTime,
        selected_option: Option<usize>,
    ) -> Self {
        let outcome = match view {
            ViewKind::Voter if record.is_ended_at(now) => Some(record.outcome()),
            _ => None,
        };
        PollEntry {
            status: record.status_at(now),
            record,
            selected_option,
            outcome,
        }
    }
}

/// Polls of the current panel
#[derive(Debug, Clone, serde::Serialize)]
pub(crate) struct PollListing {
    #[serde(skip)]
    pub view: ViewKind,
    #[serde(skip)]
    pub now: BallotTime,
    #[serde(skip)]
    pub utc_offset: UtcOffset,
    pub polls: Vec<PollEntry>,
}

fn status_style(status: PollStatus) -> Style {
    match status {
        PollStatus::Active => Style::Good,
        PollStatus::NotStarted => Style::Pending,
        PollStatus::TimeExpired => Style::Bad,
        PollStatus::Ended => Style::Finished,
    }
}

impl PollListing {
    fn time(&self, time: BallotTime) -> String {
        time.format_long(self.utc_offset)
            .unwrap_or_else(|_| time.to_string())
    }

    fn header(&self, entry: &PollEntry) -> Vec<String> {
        let poll = &entry.record;
        vec![
            format!("[{}] {}", Style::Id.style(poll.id), style(&poll.title).bold()),
            format!("    {}", poll.description),
            format!("    Status: {}", status_style(entry.status).style(entry.status)),
            format!(
                "    Time: {} - {}",
                Style::Time.style(self.time(poll.start_time)),
                Style::Time.style(self.time(poll.end_time))
            ),
        ]
    }

    pub(crate) fn admin_lines(&self, entry: &PollEntry) -> Vec<String> {
        let poll = &entry.record;
        let mut lines = self.header(entry);
        lines.push(format!("    Options: {}", poll.options.join(", ")));
        if poll.can_be_ended_at(self.now) {
            let action = match entry.status {
                PollStatus::TimeExpired => "close the expired poll",
                _ => "end the poll",
            };
            lines.push(format!(
                "    {}",
                Style::Unknown.style(format!("use 'end_poll {}' to {}", poll.id, action))
            ));
        }
        lines
    }

    pub(crate) fn voter_lines(&self, entry: &PollEntry) -> Vec<String> {
        let poll = &entry.record;
        let mut lines = self.header(entry);
        let ended = poll.is_ended_at(self.now);
        if poll.can_vote_at(self.now) {
            for (index, option) in poll.options.iter().enumerate() {
                let marker = if entry.selected_option == Some(index) {
                    "(x)"
                } else {
                    "( )"
                };
                lines.push(format!("    {} {} {}", marker, Style::Id.style(index), option));
            }
            lines.push(format!(
                "    {}",
                Style::Unknown.style(format!("use 'vote {} <option>' to cast your vote", poll.id))
            ));
        } else if poll.has_voted == Some(true) && !ended {
            lines.push(format!("    {}", Style::Good.style(VOTED_MESSAGE)));
        } else if ended {
            lines.push("    Poll Results".to_string());
            let results = poll.results.as_deref().unwrap_or_default();
            for (index, option) in poll.options.iter().enumerate() {
                let votes = results.get(index).copied().unwrap_or(0);
                lines.push(format!(
                    "    {} - {} ({})",
                    option,
                    Style::Votes.style(format!("{} votes", votes)),
                    Style::Votes.style(format!("{:.1}%", poll.vote_percentage(index)))
                ));
            }
            lines.push(format!("    Total votes: {}", poll.total_votes()));
            let outcome = entry.outcome.clone().unwrap_or_else(|| poll.outcome());
            lines.push(format!("    Final Result: {}", Style::Good.style(outcome)));
        } else {
            lines.push(format!("    {}", Style::Pending.style(CANNOT_VOTE_MESSAGE)));
        }
        lines
    }

    pub(crate) fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if self.polls.is_empty() {
            lines.push(format!("{}", Style::Unknown.style("No polls yet")));
        }
        for entry in &self.polls {
            lines.extend(match self.view {
                ViewKind::Admin => self.admin_lines(entry),
                ViewKind::Voter => self.voter_lines(entry),
            });
            lines.push(format!("{}", Style::Separator.style("-----")));
        }
        lines
    }
}

impl Output for PollListing {
    fn pretty_print(&self) {
        let heading = match self.view {
            ViewKind::Admin => "Polls",
            ViewKind::Voter => "Available Polls",
        };
        println!("{}", style(heading).bold());
        for line in self.lines() {
            println!("{}", line);
        }
    }
}

impl Output for PollDraft {
    fn pretty_print(&self) {
        fn field(value: &str) -> console::StyledObject<String> {
            if value.is_empty() {
                Style::Unknown.style("<empty>")
            } else {
                style(value.to_string())
            }
        }
        println!("title:       {}", field(&self.title));
        println!("description: {}", field(&self.description));
        println!(
            "start:       {} {}",
            field(&self.start_date),
            field(&self.start_time)
        );
        println!("end:         {} {}", field(&self.end_date), field(&self.end_time));
        for (index, option) in self.options.iter().enumerate() {
            println!("option {}:    {}", Style::Id.style(index), field(option));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballot_models::poll::PollInfo;

    const START: u64 = 1_644_098_400; // February 5, 2022, 10:00 PM UTC
    const END: u64 = START + 3600;

    fn record(is_active: bool, results: Option<Vec<u64>>, has_voted: bool) -> PollRecord {
        let record = PollRecord::from_info(
            3,
            PollInfo {
                title: "Lunch".into(),
                description: "Where do we eat".into(),
                start_time: BallotTime::from_secs(START),
                end_time: BallotTime::from_secs(END),
                is_active,
                options: vec!["Pizza".into(), "Sushi".into()],
            },
        );
        match results {
            Some(results) => record.with_voter_view(results, has_voted).unwrap(),
            None => record,
        }
    }

    fn listing(view: ViewKind, now: u64, record: PollRecord, selected: Option<usize>) -> Vec<String> {
        let now = BallotTime::from_secs(now);
        let listing = PollListing {
            view,
            now,
            utc_offset: UtcOffset::UTC,
            polls: vec![PollEntry::new(record, view, now, selected)],
        };
        listing
            .lines()
            .iter()
            .map(|line| console::strip_ansi_codes(line).to_string())
            .collect()
    }

    #[test]
    fn test_admin_lines() {
        let lines = listing(ViewKind::Admin, START + 60, record(true, None, false), None);
        assert_eq!(lines[0], "[3] Lunch");
        assert_eq!(lines[2], "    Status: Active");
        assert_eq!(
            lines[3],
            "    Time: February 5, 2022, 10:00 PM - February 5, 2022, 11:00 PM"
        );
        assert_eq!(lines[4], "    Options: Pizza, Sushi");
        assert_eq!(lines[5], "    use 'end_poll 3' to end the poll");

        let lines = listing(ViewKind::Admin, END + 1, record(true, None, false), None);
        assert_eq!(lines[2], "    Status: Time Expired");
        assert!(lines[5].ends_with("to close the expired poll"));

        // nothing to end before the start or once ended
        let lines = listing(ViewKind::Admin, START - 1, record(true, None, false), None);
        assert!(!lines.iter().any(|line| line.contains("end_poll")));
        let lines = listing(ViewKind::Admin, START + 60, record(false, None, false), None);
        assert_eq!(lines[2], "    Status: Ended");
        assert!(!lines.iter().any(|line| line.contains("end_poll")));
    }

    #[test]
    fn test_voter_lines_while_open() {
        let lines = listing(ViewKind::Voter, START + 60, record(true, Some(vec![1, 0]), false), Some(1));
        assert_eq!(lines[4], "    ( ) 0 Pizza");
        assert_eq!(lines[5], "    (x) 1 Sushi");
        assert_eq!(lines[6], "    use 'vote 3 <option>' to cast your vote");

        let lines = listing(ViewKind::Voter, START + 60, record(true, Some(vec![1, 0]), true), None);
        assert_eq!(lines[4], format!("    {}", VOTED_MESSAGE));
        // results stay hidden until the end
        assert!(!lines.iter().any(|line| line.contains("votes")));

        let lines = listing(ViewKind::Voter, START - 60, record(true, Some(vec![0, 0]), false), None);
        assert_eq!(lines[4], format!("    {}", CANNOT_VOTE_MESSAGE));
    }

    #[test]
    fn test_voter_lines_once_ended() {
        let lines = listing(ViewKind::Voter, START + 60, record(false, Some(vec![2, 1]), true), None);
        assert_eq!(lines[4], "    Poll Results");
        assert_eq!(lines[5], "    Pizza - 2 votes (66.7%)");
        assert_eq!(lines[6], "    Sushi - 1 votes (33.3%)");
        assert_eq!(lines[7], "    Total votes: 3");
        assert_eq!(lines[8], "    Final Result: Pizza won with 2 votes");

        // expired by time with nobody voting
        let lines = listing(ViewKind::Voter, END + 60, record(true, Some(vec![0, 0]), false), None);
        assert_eq!(lines[5], "    Pizza - 0 votes (0.0%)");
        assert_eq!(lines[8], "    Final Result: No votes cast");
    }

    #[test]
    fn test_outcome_only_for_ended_voter_polls() {
        let now = BallotTime::from_secs(START + 60);
        let open = PollEntry::new(record(true, Some(vec![1, 1]), false), ViewKind::Voter, now, None);
        assert_eq!(open.outcome, None);
        let ended = PollEntry::new(record(false, Some(vec![1, 1]), false), ViewKind::Voter, now, None);
        assert_eq!(
            ended.outcome.as_ref().map(|outcome| outcome.to_string()),
            Some("Tie between Pizza and Sushi with 1 votes each".to_string())
        );
        let admin = PollEntry::new(record(false, None, false), ViewKind::Admin, now, None);
        assert_eq!(admin.outcome, None);

        let json = serde_json::to_value(&ended).unwrap();
        assert_eq!(json["title"], "Lunch");
        assert_eq!(json["status"], "Ended");
    }

    #[test]
    fn test_session_status_lines() {
        let account = Address::from_bytes([0xab; 20]);
        let status = SessionStatus {
            account: Some(account),
            chain_id: Some(1337),
            role: Role::Unauthorized,
            notice: Some(UNAUTHORIZED_MESSAGE.to_string()),
        };
        let lines: Vec<String> = status
            .lines()
            .iter()
            .map(|line| console::strip_ansi_codes(line).to_string())
            .collect();
        assert_eq!(
            lines,
            vec![
                format!("Connected: {}", account.short()),
                "Chain id: 1337".to_string(),
                "Status: Not Whitelisted".to_string(),
                UNAUTHORIZED_MESSAGE.to_string(),
            ]
        );
        let json = serde_json::to_value(&status).unwrap();
        assert_eq!(json["role"], "Not Whitelisted");
    }
}
