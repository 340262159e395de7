// Copyright (c) 2022 MASSA LABS <info@massa.net>

use std::time::Duration;

/// JSON-RPC connection settings
#[derive(Debug, Clone)]
pub struct RpcConfig {
    /// node url, `http://127.0.0.1:8545` for a local development chain
    pub url: String,
    /// timeout of a single request
    pub request_timeout: Duration,
    /// delay between two receipt queries while waiting for a transaction
    pub confirmation_poll_interval: Duration,
    /// give up waiting for a receipt after this long
    pub confirmation_timeout: Duration,
    /// delay between two checks of the accounts and chain id
    pub event_poll_interval: Duration,
}

impl Default for RpcConfig {
    fn default() -> Self {
        RpcConfig {
            url: "http://127.0.0.1:8545".to_string(),
            request_timeout: Duration::from_secs(30),
            confirmation_poll_interval: Duration::from_millis(500),
            confirmation_timeout: Duration::from_secs(120),
            event_poll_interval: Duration::from_secs(2),
        }
    }
}
