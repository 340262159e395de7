// Copyright (c) 2022 MASSA LABS <info@massa.net>
//! Deployment and whitelisting scripts for the ballot contracts
#![warn(missing_docs)]
#![warn(unused_crate_dependencies)]
use crate::scripts::{print_whitelist_outcome, DeployArgs};
use crate::settings::Settings;
use anyhow::{Context, Result};
use ballot_models::address::Address;
use ballot_sdk::{RpcClient, RpcWhitelist};
use clap::{Parser, Subcommand};
use console::style;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::prelude::*;

mod persist;
mod scripts;
mod settings;

#[derive(Parser)]
#[command(version, about)]
struct Args {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Deploy the Whitelist and Voting contracts and whitelist the deployer
    Deploy {
        /// Whitelist creation bytecode (compiler artifact or hex file)
        #[arg(long, value_name = "FILE")]
        whitelist_bytecode: PathBuf,
        /// Voting creation bytecode (compiler artifact or hex file)
        #[arg(long, value_name = "FILE")]
        voting_bytecode: PathBuf,
        /// Write the deployed addresses into the `[contracts]` table of this file
        #[arg(long, value_name = "CONFIG_TOML")]
        persist: Option<PathBuf>,
        /// Deploying account, the first account of the node by default
        #[arg(long)]
        from: Option<Address>,
    },
    /// Add an address to the whitelist
    Whitelist {
        /// Address to whitelist
        address: Address,
        /// Whitelist contract, `contracts.whitelist` by default
        #[arg(long)]
        contract: Option<Address>,
        /// Admin account, the first account of the node by default
        #[arg(long)]
        from: Option<Address>,
    },
}

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

fn main() -> Result<()> {
    let args = Args::parse();
    let tokio_rt = tokio::runtime::Builder::new_current_thread()
        .thread_name("tokio-deploy")
        .enable_all()
        .build()?;

    if let Err(e) = tokio_rt.block_on(run(args)) {
        eprintln!("{}", style(format!("Error: {:#}", e)).red());
        std::process::exit(1);
    }
    Ok(())
}

async fn run(args: Args) -> Result<()> {
    let settings = Settings::load()?;
    setup_logging(settings.logging.level);
    let rpc = Arc::new(RpcClient::new(settings.rpc_config())?);
    info!("using node {}", settings.rpc.url);

    match args.command {
        Commands::Deploy {
            whitelist_bytecode,
            voting_bytecode,
            persist,
            from,
        } => {
            let deployment = scripts::deploy(
                rpc,
                DeployArgs {
                    whitelist_bytecode,
                    voting_bytecode,
                    persist,
                    from,
                },
            )
            .await?;
            println!();
            println!("Deployer: {}", deployment.deployer);
            println!("Whitelist: {}", deployment.whitelist);
            println!("Voting: {}", deployment.voting);
        }
        Commands::Whitelist {
            address,
            contract,
            from,
        } => {
            let contract = match contract {
                Some(contract) => contract,
                None => Address::from_str(settings.contracts.whitelist.trim()).context(
                    "no whitelist contract configured, use --contract or run 'deploy --persist' first",
                )?,
            };
            let admin = scripts::pick_account(&rpc, from).await?;
            println!("Whitelisting {} with the account: {}", address, admin);
            let handle = RpcWhitelist::new(rpc, contract, Some(admin));
            let outcome = scripts::whitelist(&handle, address).await?;
            print_whitelist_outcome(address, &outcome);
        }
    }
    Ok(())
}
