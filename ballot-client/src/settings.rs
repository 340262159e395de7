// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! Build here the client settings from the configuration files and environment
use anyhow::{Context, Result};
use ballot_models::address::Address;
use ballot_models::config::build_ballot_settings;
use ballot_poll_exports::PollConfig;
use ballot_sdk::RpcConfig;
use ballot_session_exports::SessionConfig;
use ballot_time::{utc_offset_from_minutes, BallotTime};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub(crate) struct LoggingSettings {
    pub level: usize,
}

/// Durations in milliseconds
#[derive(Debug, Deserialize, Clone)]
pub(crate) struct RpcSettings {
    pub url: String,
    pub request_timeout: u64,
    pub confirmation_poll_interval: u64,
    pub confirmation_timeout: u64,
    pub event_poll_interval: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub(crate) struct ContractsSettings {
    pub whitelist: String,
    pub voting: String,
}

#[derive(Debug, Deserialize, Clone)]
pub(crate) struct PollsSettings {
    /// seconds
    pub voter_refresh_interval: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub(crate) struct DisplaySettings {
    pub utc_offset_minutes: i32,
}

#[derive(Debug, Deserialize, Clone)]
pub(crate) struct ClientSettings {
    pub account: Option<Address>,
    pub history: usize,
    pub history_file_path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub(crate) struct Settings {
    pub logging: LoggingSettings,
    pub rpc: RpcSettings,
    pub contracts: ContractsSettings,
    pub polls: PollsSettings,
    pub display: DisplaySettings,
    pub client: ClientSettings,
}

impl Settings {
    pub(crate) fn load() -> Result<Settings> {
        build_ballot_settings("ballot-client", "BALLOT_CLIENT")
            .context("could not load the client settings")
    }

    pub(crate) fn rpc_config(&self) -> RpcConfig {
        RpcConfig {
            url: self.rpc.url.clone(),
            request_timeout: Duration::from_millis(self.rpc.request_timeout),
            confirmation_poll_interval: Duration::from_millis(self.rpc.confirmation_poll_interval),
            confirmation_timeout: Duration::from_millis(self.rpc.confirmation_timeout),
            event_poll_interval: Duration::from_millis(self.rpc.event_poll_interval),
        }
    }

    pub(crate) fn session_config(&self) -> SessionConfig {
        SessionConfig {
            whitelist_address: self.contracts.whitelist.clone(),
            voting_address: self.contracts.voting.clone(),
            account: self.client.account,
        }
    }

    pub(crate) fn poll_config(&self) -> Result<PollConfig> {
        Ok(PollConfig {
            voter_refresh_interval: BallotTime::from_secs(self.polls.voter_refresh_interval),
            utc_offset: utc_offset_from_minutes(self.display.utc_offset_minutes)
                .context("invalid display.utc_offset_minutes")?,
        })
    }
}
