// Copyright (c) 2022 MASSA LABS <info@massa.net>
//! Ballot terminal client
#![warn(missing_docs)]
#![warn(unused_crate_dependencies)]
use crate::app::App;
use crate::settings::Settings;
use anyhow::Result;
use ballot_models::address::Address;
use ballot_sdk::JsonRpcWallet;
use ballot_session_worker::start_session_controller;
use clap::Parser;
use cmds::Command;
use console::style;
use display::Output;
use is_terminal::IsTerminal;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;

mod app;
mod cmds;
mod display;
mod repl;
mod settings;

#[derive(Parser)]
#[command(version, about)]
struct Args {
    /// Command that client would execute (non-interactive mode)
    #[arg(value_name = "COMMAND", default_value = "help")]
    command: Command,
    /// Optional command parameters
    #[arg(value_name = "PARAMETERS")]
    parameters: Vec<String>,
    /// Account to connect with, overrides `client.account`
    #[arg(short = 'a', long = "account")]
    account: Option<Address>,
    /// Enable a mode where input/output are serialized as JSON
    #[arg(short = 'j', long = "json")]
    json: bool,
}

#[derive(Serialize)]
struct JsonError {
    error: String,
}

/// Logs go to stderr so that json outputs stay parsable
fn setup_logging(level: usize) {
    let filter = match level {
        0 => LevelFilter::ERROR,
        1 => LevelFilter::WARN,
        2 => LevelFilter::INFO,
        3 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };
    let tracing_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(filter);
    tracing_subscriber::registry().with(tracing_layer).init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let tokio_rt = tokio::runtime::Builder::new_multi_thread()
        .thread_name_fn(|| {
            static ATOMIC_ID: AtomicUsize = AtomicUsize::new(0);
            let id = ATOMIC_ID.fetch_add(1, Ordering::SeqCst);
            format!("tokio-client-{}", id)
        })
        .enable_all()
        .build()?;

    tokio_rt.block_on(run(args))
}

async fn run(args: Args) -> Result<()> {
    let mut settings = Settings::load()?;
    setup_logging(settings.logging.level);
    if args.account.is_some() {
        settings.client.account = args.account;
    }

    // Setup panic handlers,
    // and when a panic occurs,
    // run default handler,
    // and then shutdown.
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        default_panic(info);
        std::process::exit(1);
    }));

    let wallet = JsonRpcWallet::new(settings.rpc_config())?;
    info!("using node {}", settings.rpc.url);
    let (session_manager, session) =
        start_session_controller(settings.session_config(), Arc::new(wallet));
    let mut app = App::new(session_manager, session, settings.poll_config()?);

    if std::io::stdout().is_terminal() && args.command == Command::help && !args.json {
        // Interactive mode
        repl::run(&mut app, &settings.client).await?;
    } else {
        // Non-Interactive mode
        let result: Result<Box<dyn Output>> = async {
            if args.command.needs_session() {
                app.connect(None).await?;
            }
            args.command
                .run(&mut app, &args.parameters, false)
                .await
        }
        .await;
        match result {
            Ok(output) => {
                if args.json {
                    output.stdout_json()?;
                } else {
                    output.pretty_print();
                }
            }
            Err(e) => {
                if args.json {
                    let error = serde_json::to_string(&JsonError {
                        error: format!("{:?}", e),
                    })?;
                    println!("{}", error);
                } else {
                    println!("{}", style(format!("Error: {}", e)).red());
                }
            }
        }
    }
    app.stop();
    Ok(())
}
