// Copyright (c) 2022 MASSA LABS <info@massa.net>

use crate::revert::extract_revert_reason;
use ballot_models::address::Address;
use displaydoc::Display;
use thiserror::Error;

/// contract call result
pub type CallResult<T, E = CallError> = core::result::Result<T, E>;

/// session result
pub type SessionResult<T, E = SessionError> = core::result::Result<T, E>;

/// A reverted or failed contract call, or an RPC failure around it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub struct CallError {
    /// raw error message
    pub message: String,
    /// human readable revert reason, when one could be extracted
    pub reason: Option<String>,
}

impl CallError {
    /// Build an error from a raw message, extracting the revert reason if present
    pub fn new(message: impl Into<String>) -> Self {
        let message = message.into();
        let reason = extract_revert_reason(&message, None);
        CallError { message, reason }
    }

    /// Build an error from a raw message and the revert payload returned by the node
    pub fn with_data(message: impl Into<String>, data: Option<&[u8]>) -> Self {
        let message = message.into();
        let reason = extract_revert_reason(&message, data);
        CallError { message, reason }
    }

    /// A revert with a known reason
    pub fn reverted(reason: impl Into<String>) -> Self {
        let reason = reason.into();
        CallError {
            message: format!("execution reverted: reason=\"{}\"", reason),
            reason: Some(reason),
        }
    }

    /// A write attempted through a read-only handle
    pub fn no_signer() -> Self {
        CallError {
            message: "contract handle has no signer".to_string(),
            reason: None,
        }
    }

    /// What to show the user: the revert reason when known, the raw message otherwise
    pub fn user_message(&self) -> &str {
        self.reason.as_deref().unwrap_or(&self.message)
    }

    /// `true` when the contract rejected the call, with or without a decodable reason
    pub fn is_revert(&self) -> bool {
        self.reason.is_some() || self.message.to_lowercase().contains("revert")
    }
}

impl std::fmt::Display for CallError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.user_message())
    }
}

/// session error
#[non_exhaustive]
#[derive(Display, Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// wallet unavailable: {0}
    WalletUnavailable(String),
    /// invalid configuration: {0}
    InvalidConfiguration(String),
    /// no contract deployed at {0}
    DeploymentError(Address),
    /// contract call failed: {0}
    ContractCallError(#[from] CallError),
    /// not connected
    NotConnected,
}
