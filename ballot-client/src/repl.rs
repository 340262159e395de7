// Copyright (c) 2022 MASSA LABS <info@massa.net>

use crate::app::App;
use crate::ballot_banner;
use crate::cmds::Command;
use crate::display::Output;
use crate::settings::ClientSettings;
use anyhow::Result;
use console::style;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::validate::MatchingBracketValidator;
use rustyline::{CompletionType, Config, Editor};
use rustyline_derive::{Completer, Helper, Highlighter, Hinter, Validator};
use strum::IntoEnumIterator;
use strum::ParseError;

/// Join the words of quoted parameters: `'a b'` and `"a b"` become one parameter
fn group_parameters(parameters: Vec<String>) -> Vec<String> {
    let mut new_parameters = Vec::new();
    let mut has_opening_simple_quote = false;
    let mut temp_simple_quote = String::new();
    let mut has_opening_double_quote = false;
    let mut temp_double_quote = String::new();
    for param in parameters {
        let mut chars = param.chars();
        match chars.next() {
            Some('\'') if !has_opening_double_quote && !has_opening_simple_quote => {
                has_opening_simple_quote = true;
                temp_simple_quote = param.clone();
                temp_simple_quote.remove(0);
            }
            Some('"') if !has_opening_simple_quote && !has_opening_double_quote => {
                has_opening_double_quote = true;
                temp_double_quote = param.clone();
                temp_double_quote.remove(0);
            }
            Some(_) if has_opening_simple_quote => {
                temp_simple_quote.push(' ');
                temp_simple_quote.push_str(&param);
            }
            Some(_) if has_opening_double_quote => {
                temp_double_quote.push(' ');
                temp_double_quote.push_str(&param);
            }
            Some(_) => new_parameters.push(param.clone()),
            None => continue,
        };
        match param.chars().last() {
            Some('\'') if has_opening_simple_quote && temp_simple_quote.ends_with('\'') => {
                has_opening_simple_quote = false;
                let mut to_add = temp_simple_quote.clone();
                to_add.pop();
                new_parameters.push(to_add);
            }
            Some('"') if has_opening_double_quote && temp_double_quote.ends_with('"') => {
                has_opening_double_quote = false;
                let mut to_add = temp_double_quote.clone();
                to_add.pop();
                new_parameters.push(to_add);
            }
            Some(_) => continue,
            None => continue,
        }
    }
    // unterminated quote: keep what was typed
    if has_opening_simple_quote {
        new_parameters.push(temp_simple_quote);
    }
    if has_opening_double_quote {
        new_parameters.push(temp_double_quote);
    }
    new_parameters
}

#[derive(Helper, Completer, Hinter, Validator, Highlighter)]
struct BallotHelper {
    #[rustyline(Completer)]
    completer: BallotCompleter,
    #[rustyline(Validator)]
    validator: MatchingBracketValidator,
}

pub(crate) async fn run(app: &mut App, settings: &ClientSettings) -> Result<()> {
    ballot_banner!();
    println!("Use 'exit' or 'CTRL+D or CTRL+C' to quit the prompt");
    println!("Use the Up/Down arrows to scroll through history");
    println!("Use the Right arrow or Tab to complete your command");
    println!("Use the Enter key to execute your command");
    println!("Use 'connect' to connect your wallet");
    crate::cmds::help();
    let h = BallotHelper {
        completer: BallotCompleter,
        validator: MatchingBracketValidator::new(),
    };
    let config = Config::builder()
        .auto_add_history(true)
        .completion_prompt_limit(100)
        .completion_type(CompletionType::List)
        .max_history_size(settings.history)?
        .build();
    let mut rl: Editor<BallotHelper, DefaultHistory> = Editor::with_config(config)?;
    rl.set_helper(Some(h));
    if rl.load_history(&settings.history_file_path).is_err() {
        println!("No previous history.");
    }

    loop {
        let readline = rl.readline("command > ");
        match readline {
            Ok(line) => {
                if line.trim().is_empty() {
                    continue;
                }
                let input: Vec<String> =
                    group_parameters(line.split_whitespace().map(|x| x.to_string()).collect());
                let cmd: Result<Command, ParseError> = input[0].parse();
                let parameters = input[1..].to_vec();
                // the wallet may have switched account or network since the last command
                if let Some(status) = app.sync().await {
                    println!("{}", style("Wallet changed").yellow());
                    status.pretty_print();
                }
                // Print result of evaluated command
                match cmd {
                    Ok(Command::exit) => break,
                    Ok(command) => match command.run(app, &parameters, true).await {
                        Ok(output) => output.pretty_print(),
                        Err(e) => println!("{}", style(format!("Error: {}", e)).red()),
                    },
                    Err(_) => {
                        println!("Command not found!\ntype \"help\" to get the list of commands")
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                break;
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                println!("Error: {err:?}");
                break;
            }
        }
    }
    if let Some(parent) = settings.history_file_path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    rl.save_history(&settings.history_file_path)?;
    Ok(())
}

struct BallotCompleter;

impl Completer for BallotCompleter {
    type Candidate = Pair;
    fn complete(
        &self,
        line: &str,
        _pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Self::Candidate>)> {
        if line.contains(' ') {
            return Ok((0, Vec::new()));
        }
        let candidates = Command::iter()
            .map(|cmd| cmd.to_string())
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.clone(),
                replacement: cmd,
            })
            .collect();
        Ok((0, candidates))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(line: &str) -> Vec<String> {
        group_parameters(line.split_whitespace().map(|x| x.to_string()).collect())
    }

    #[test]
    fn test_group_parameters() {
        assert_eq!(
            split("draft_set title \"Team lunch\""),
            vec!["draft_set", "title", "Team lunch"]
        );
        assert_eq!(
            split("create_poll 'Where to' \"eat today\" 01/01/2030"),
            vec!["create_poll", "Where to", "eat today", "01/01/2030"]
        );
        assert_eq!(split("draft_set_option 0 'Pizza'"), vec!["draft_set_option", "0", "Pizza"]);
        assert_eq!(split("draft_set title \"it's\""), vec!["draft_set", "title", "it's"]);
        assert_eq!(split("draft_set title \"open"), vec!["draft_set", "title", "open"]);
    }

    #[test]
    fn test_completion_candidates() {
        let history = DefaultHistory::new();
        let ctx = rustyline::Context::new(&history);
        let (start, candidates) = BallotCompleter.complete("draft_s", 7, &ctx).unwrap();
        assert_eq!(start, 0);
        let names: Vec<String> = candidates.into_iter().map(|c| c.replacement).collect();
        assert_eq!(names, vec!["draft_show", "draft_set", "draft_set_option"]);
        let (_, candidates) = BallotCompleter.complete("vote 1", 6, &ctx).unwrap();
        assert!(candidates.is_empty());
    }
}
