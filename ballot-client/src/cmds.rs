// Copyright (c) 2022 MASSA LABS <info@massa.net>

use crate::app::App;
use crate::display::{Output, TxOutcome};
use anyhow::{anyhow, bail, Result};
use ballot_models::address::Address;
use ballot_models::poll::PollId;
use ballot_poll_exports::PollDraft;
use console::style;
use dialoguer::Confirm;
use std::fmt::Display;
use std::str::FromStr;
use strum::{EnumMessage, EnumProperty, IntoEnumIterator};
use strum_macros::{Display, EnumIter, EnumMessage, EnumProperty, EnumString};

#[allow(non_camel_case_types)]
#[derive(Debug, PartialEq, Eq, Clone, Copy, EnumIter, EnumMessage, EnumString, EnumProperty, Display)]
pub enum Command {
    #[strum(ascii_case_insensitive, message = "exit the client gracefully")]
    exit,

    #[strum(ascii_case_insensitive, message = "display this help")]
    help,

    #[strum(
        ascii_case_insensitive,
        props(args = "[Address]"),
        message = "connect the wallet, with the given account or the configured one"
    )]
    connect,

    #[strum(ascii_case_insensitive, message = "disconnect the wallet")]
    disconnect,

    #[strum(
        ascii_case_insensitive,
        message = "reconnect the wallet with the same account"
    )]
    reload,

    #[strum(
        ascii_case_insensitive,
        message = "show the connected account and its role"
    )]
    status,

    #[strum(ascii_case_insensitive, message = "show the polls of the current panel")]
    polls,

    #[strum(
        ascii_case_insensitive,
        message = "fetch the polls again (and the whitelist for the admin)"
    )]
    refresh,

    #[strum(
        ascii_case_insensitive,
        props(args = "PollId OptionIndex"),
        message = "select an option of a poll before voting"
    )]
    select,

    #[strum(
        ascii_case_insensitive,
        props(args = "PollId [OptionIndex]"),
        message = "vote for the selected option, or for the given one"
    )]
    vote,

    #[strum(
        ascii_case_insensitive,
        props(args = "PollId", admin = ""),
        message = "end a poll"
    )]
    end_poll,

    #[strum(
        ascii_case_insensitive,
        props(admin = ""),
        message = "show the whitelisted addresses"
    )]
    whitelist_list,

    #[strum(
        ascii_case_insensitive,
        props(args = "Address", admin = ""),
        message = "add an address to the whitelist"
    )]
    whitelist_add,

    #[strum(
        ascii_case_insensitive,
        props(args = "Address", admin = ""),
        message = "remove an address from the whitelist"
    )]
    whitelist_remove,

    #[strum(
        ascii_case_insensitive,
        props(admin = ""),
        message = "show the poll being written"
    )]
    draft_show,

    #[strum(
        ascii_case_insensitive,
        props(
            args = "title|description|start_date|start_time|end_date|end_time Value",
            admin = ""
        ),
        message = "set a field of the poll being written (dates DD/MM/YYYY, times HH:MM)"
    )]
    draft_set,

    #[strum(
        ascii_case_insensitive,
        props(args = "[Text]", admin = ""),
        message = "add an option to the poll being written"
    )]
    draft_add_option,

    #[strum(
        ascii_case_insensitive,
        props(args = "OptionIndex Text", admin = ""),
        message = "set the text of an option of the poll being written"
    )]
    draft_set_option,

    #[strum(
        ascii_case_insensitive,
        props(args = "OptionIndex", admin = ""),
        message = "remove an option of the poll being written (at least 2 remain)"
    )]
    draft_remove_option,

    #[strum(
        ascii_case_insensitive,
        props(admin = ""),
        message = "start the poll being written over"
    )]
    draft_clear,

    #[strum(
        ascii_case_insensitive,
        props(
            args = "[Title Description StartDate StartTime EndDate EndTime Option1 Option2 ...]",
            admin = ""
        ),
        message = "submit the poll being written, or the poll given as arguments"
    )]
    create_poll,
}

/// Fields of the poll draft settable with `draft_set`
#[allow(non_camel_case_types)]
#[derive(Debug, PartialEq, Eq, EnumString, Display)]
enum DraftField {
    #[strum(ascii_case_insensitive)]
    title,
    #[strum(ascii_case_insensitive)]
    description,
    #[strum(ascii_case_insensitive)]
    start_date,
    #[strum(ascii_case_insensitive)]
    start_time,
    #[strum(ascii_case_insensitive)]
    end_date,
    #[strum(ascii_case_insensitive)]
    end_time,
}

impl DraftField {
    fn set(&self, draft: &mut PollDraft, value: String) {
        let field = match self {
            DraftField::title => &mut draft.title,
            DraftField::description => &mut draft.description,
            DraftField::start_date => &mut draft.start_date,
            DraftField::start_time => &mut draft.start_time,
            DraftField::end_date => &mut draft.end_date,
            DraftField::end_time => &mut draft.end_time,
        };
        *field = value;
    }
}

macro_rules! output {
    ($expr: expr) => {
        Ok(Box::new($expr))
    };
}

/// Parse the parameter at `index`
fn parse_param<T>(parameters: &[String], index: usize, name: &str) -> Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    let raw = parameters
        .get(index)
        .ok_or_else(|| anyhow!("missing parameter {}", name))?;
    raw.parse::<T>()
        .map_err(|err| anyhow!("invalid {} {:?}: {}", name, raw, err))
}

/// Parse the parameter at `index` if present
fn parse_optional_param<T>(parameters: &[String], index: usize, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: Display,
{
    if parameters.len() > index {
        parse_param(parameters, index, name).map(Some)
    } else {
        Ok(None)
    }
}

/// Draft from `Title Description StartDate StartTime EndDate EndTime Option1 Option2 ...`
fn draft_from_parameters(parameters: &[String]) -> Result<PollDraft> {
    if parameters.len() < 8 {
        bail!(
            "expected Title Description StartDate StartTime EndDate EndTime and at least two options, got {} parameters",
            parameters.len()
        );
    }
    Ok(PollDraft {
        title: parameters[0].clone(),
        description: parameters[1].clone(),
        start_date: parameters[2].clone(),
        start_time: parameters[3].clone(),
        end_date: parameters[4].clone(),
        end_time: parameters[5].clone(),
        options: parameters[6..].to_vec(),
    })
}

pub(crate) fn help() {
    println!("HELP of Ballot client (list of available commands):");
    for command in Command::iter() {
        command.help();
    }
}

impl Command {
    pub(crate) fn help(&self) {
        println!(
            "- {} {}: {}{}",
            style(self.to_string()).green(),
            if self.get_str("args").is_some() {
                style(self.get_str("args").unwrap_or("")).yellow()
            } else {
                style("no args").color256(8).italic() // grey
            },
            if self.get_str("admin").is_some() {
                style("[admin] ").color256(172)
            } else {
                style("")
            },
            self.get_message().unwrap_or_default()
        )
    }

    /// Whether the wallet must be connected before running the command
    /// in non-interactive mode
    pub(crate) fn needs_session(&self) -> bool {
        !matches!(
            self,
            Command::exit
                | Command::help
                | Command::connect
                | Command::disconnect
                | Command::reload
                | Command::draft_show
                | Command::draft_set
                | Command::draft_add_option
                | Command::draft_set_option
                | Command::draft_remove_option
                | Command::draft_clear
        )
    }

    /// Run the command.
    /// `interactive` enables confirmation prompts.
    pub(crate) async fn run(
        &self,
        app: &mut App,
        parameters: &[String],
        interactive: bool,
    ) -> Result<Box<dyn Output>> {
        match self {
            Command::exit => {
                app.stop();
                std::process::exit(0)
            }

            Command::help => {
                if !parameters.is_empty() {
                    if let Ok(c) = parameters[0].parse::<Command>() {
                        c.help();
                    } else {
                        println!("Command not found!\ntype \"help\" to get the list of commands");
                    }
                } else {
                    help();
                }
                output!(())
            }

            Command::connect => {
                let account = parse_optional_param::<Address>(parameters, 0, "Address")?;
                output!(app.connect(account).await?)
            }

            Command::disconnect => output!(app.disconnect()),

            Command::reload => output!(app.reload().await?),

            Command::status => output!(app.status(None)),

            Command::polls => output!(app.listing()?),

            Command::refresh => output!(app.refresh().await?),

            Command::select => {
                let poll_id = parse_param::<PollId>(parameters, 0, "PollId")?;
                let option = parse_param::<usize>(parameters, 1, "OptionIndex")?;
                app.voter()?.select_option(poll_id, option)?;
                output!(format!("Option {} selected in poll {}", option, poll_id))
            }

            Command::vote => {
                let poll_id = parse_param::<PollId>(parameters, 0, "PollId")?;
                let option = parse_optional_param::<usize>(parameters, 1, "OptionIndex")?;
                let voter = app.voter()?;
                if let Some(option) = option {
                    voter.select_option(poll_id, option)?;
                }
                let receipt = voter.vote(poll_id).await?;
                output!(TxOutcome {
                    action: "Vote cast successfully".to_string(),
                    receipt,
                })
            }

            Command::end_poll => {
                let poll_id = parse_param::<PollId>(parameters, 0, "PollId")?;
                let admin = app.admin()?;
                if interactive
                    && !Confirm::new()
                        .with_prompt(format!("End poll {}? This cannot be undone", poll_id))
                        .default(false)
                        .interact()?
                {
                    return output!("Poll left open");
                }
                let receipt = admin.end_poll(poll_id).await?;
                output!(TxOutcome {
                    action: "Poll ended successfully".to_string(),
                    receipt,
                })
            }

            Command::whitelist_list => output!(app.admin()?.load_whitelist().await?),

            Command::whitelist_add => {
                let address = parameters
                    .first()
                    .ok_or_else(|| anyhow!("missing parameter Address"))?;
                let receipt = app.admin()?.add_to_whitelist(address).await?;
                output!(TxOutcome {
                    action: "Address added to whitelist".to_string(),
                    receipt,
                })
            }

            Command::whitelist_remove => {
                let address = parse_param::<Address>(parameters, 0, "Address")?;
                let receipt = app.admin()?.remove_from_whitelist(address).await?;
                output!(TxOutcome {
                    action: "Address removed from whitelist".to_string(),
                    receipt,
                })
            }

            Command::draft_show => output!(app.draft.clone()),

            Command::draft_set => {
                let field = parse_param::<DraftField>(parameters, 0, "field")?;
                if parameters.len() < 2 {
                    bail!("missing parameter Value");
                }
                field.set(&mut app.draft, parameters[1..].join(" "));
                output!(app.draft.clone())
            }

            Command::draft_add_option => {
                app.draft.add_option();
                if !parameters.is_empty() {
                    let index = app.draft.options.len() - 1;
                    app.draft.update_option(index, parameters.join(" "))?;
                }
                output!(app.draft.clone())
            }

            Command::draft_set_option => {
                let index = parse_param::<usize>(parameters, 0, "OptionIndex")?;
                app.draft.update_option(index, parameters[1..].join(" "))?;
                output!(app.draft.clone())
            }

            Command::draft_remove_option => {
                let index = parse_param::<usize>(parameters, 0, "OptionIndex")?;
                app.draft.remove_option(index)?;
                output!(app.draft.clone())
            }

            Command::draft_clear => {
                app.draft = PollDraft::default();
                output!(app.draft.clone())
            }

            Command::create_poll => {
                let from_parameters = !parameters.is_empty();
                let draft = if from_parameters {
                    draft_from_parameters(parameters)?
                } else {
                    app.draft.clone()
                };
                let receipt = app.admin()?.create_poll(&draft).await?;
                if !from_parameters {
                    app.draft = PollDraft::default();
                }
                output!(TxOutcome {
                    action: "Poll created successfully".to_string(),
                    receipt,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ballot_poll_exports::PollConfig;
    use ballot_session_exports::test_exports::{test_address, InMemoryChain};
    use ballot_session_worker::start_session_controller;
    use ballot_time::{BallotTime, UtcOffset};
    use std::sync::Arc;

    fn params(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|p| p.to_string()).collect()
    }

    fn app(chain: &InMemoryChain) -> App {
        let (manager, session) =
            start_session_controller(chain.session_config(), Arc::new(chain.clone()));
        App::new(manager, session, PollConfig::default())
    }

    #[test]
    fn test_commands_parse_case_insensitively() {
        assert_eq!("Create_Poll".parse::<Command>().unwrap(), Command::create_poll);
        assert_eq!("VOTE".parse::<Command>().unwrap(), Command::vote);
        assert!("unknown".parse::<Command>().is_err());
        assert!(Command::iter().all(|c| c.get_message().is_some()));
        assert!(!Command::draft_set.needs_session());
        assert!(Command::vote.needs_session());
    }

    #[tokio::test]
    async fn test_draft_then_create_poll() {
        let owner = test_address(1);
        let chain = InMemoryChain::new(owner);
        let mut app = app(&chain);
        Command::connect.run(&mut app, &[], false).await.unwrap();

        let start = BallotTime::now()
            .unwrap()
            .saturating_add(BallotTime::from_secs(86_400));
        let end = start.saturating_add(BallotTime::from_secs(3_600));
        let (start_date, start_time) = start.to_form_input(UtcOffset::UTC).unwrap();
        let (end_date, end_time) = end.to_form_input(UtcOffset::UTC).unwrap();
        for (field, value) in [
            ("title", "Lunch".to_string()),
            ("description", "Where do we eat".to_string()),
            ("start_date", start_date),
            ("start_time", start_time),
            ("end_date", end_date),
            ("end_time", end_time),
        ] {
            Command::draft_set
                .run(&mut app, &params(&[field, &value]), false)
                .await
                .unwrap();
        }
        Command::draft_set_option
            .run(&mut app, &params(&["0", "Pizza"]), false)
            .await
            .unwrap();
        let err = Command::create_poll.run(&mut app, &[], false).await.err().unwrap();
        assert_eq!(err.to_string(), "Poll must have at least 2 non-empty options");
        assert_eq!(chain.call_count("createPoll"), 0);

        Command::draft_add_option
            .run(&mut app, &params(&["Sushi", "bar"]), false)
            .await
            .unwrap();
        assert_eq!(app.draft.options, vec!["Pizza", "", "Sushi bar"]);
        let err = Command::draft_remove_option
            .run(&mut app, &params(&["5"]), false)
            .await
            .err().unwrap();
        assert!(err.to_string().contains('5'));

        Command::create_poll.run(&mut app, &[], false).await.unwrap();
        assert_eq!(app.draft, PollDraft::default());
        let listing = app.listing().unwrap();
        assert_eq!(listing.polls.len(), 1);
        assert_eq!(listing.polls[0].record.options, vec!["Pizza", "Sushi bar"]);
        app.stop();
    }

    #[tokio::test]
    async fn test_role_checks_and_vote() {
        let owner = test_address(1);
        let voter = test_address(2);
        let chain = InMemoryChain::new(owner);
        chain.set_accounts(vec![owner, voter]);
        chain.whitelist(voter);
        let now = BallotTime::now().unwrap();
        chain.add_poll(ballot_models::poll::PollInfo {
            title: "Lunch".into(),
            description: "Where do we eat".into(),
            start_time: now.saturating_sub(BallotTime::from_secs(60)),
            end_time: now.saturating_add(BallotTime::from_secs(3_600)),
            is_active: true,
            options: vec!["Pizza".into(), "Sushi".into()],
        });
        let mut app = app(&chain);
        Command::connect
            .run(&mut app, &params(&[&voter.to_string()]), false)
            .await
            .unwrap();

        let err = Command::end_poll
            .run(&mut app, &params(&["0"]), false)
            .await
            .err().unwrap();
        assert_eq!(err.to_string(), "Only the admin can do this");
        let err = Command::vote.run(&mut app, &params(&["0"]), false).await.err().unwrap();
        assert_eq!(err.to_string(), "Please select an option for poll 0");
        let err = Command::vote.run(&mut app, &params(&["x"]), false).await.err().unwrap();
        assert!(err.to_string().starts_with("invalid PollId"));

        Command::vote
            .run(&mut app, &params(&["0", "1"]), false)
            .await
            .unwrap();
        assert_eq!(app.listing().unwrap().polls[0].record.results, Some(vec![0, 1]));
        let err = Command::vote
            .run(&mut app, &params(&["0", "0"]), false)
            .await
            .err().unwrap();
        assert_eq!(err.to_string(), "Already voted");
        app.stop();
    }

    #[test]
    fn test_draft_from_parameters() {
        let draft = draft_from_parameters(&params(&[
            "Lunch",
            "Where do we eat",
            "01/01/2030",
            "10:00",
            "01/01/2030",
            "12:00",
            "Pizza",
            "Sushi",
        ]))
        .unwrap();
        assert_eq!(draft.title, "Lunch");
        assert_eq!(draft.end_time, "12:00");
        assert_eq!(draft.options, vec!["Pizza", "Sushi"]);
        assert!(draft_from_parameters(&params(&["Lunch"])).is_err());
    }
}
