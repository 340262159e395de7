// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! Build here the deploy script settings from the configuration files and environment
use anyhow::{Context, Result};
use ballot_models::config::build_ballot_settings;
use ballot_sdk::RpcConfig;
use serde::Deserialize;
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
}

#[derive(Debug, Deserialize, Clone)]
pub(crate) struct Settings {
    pub logging: LoggingSettings,
    pub rpc: RpcSettings,
    pub contracts: ContractsSettings,
}

impl Settings {
    pub(crate) fn load() -> Result<Settings> {
        build_ballot_settings("ballot-deploy", "BALLOT_DEPLOY")
            .context("could not load the deploy settings")
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
}
