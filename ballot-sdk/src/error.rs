// Copyright (c) 2022 MASSA LABS <info@massa.net>

use ballot_models::tx::TxHash;
use ballot_session_exports::CallError;
use displaydoc::Display;
use thiserror::Error;

/// sdk result
pub type SdkResult<T, E = SdkError> = core::result::Result<T, E>;

/// sdk error
#[non_exhaustive]
#[derive(Display, Error, Debug, Clone)]
pub enum SdkError {
    /// cannot build the RPC client: {0}
    ClientBuild(String),
    /// RPC error: {0}
    Rpc(#[from] CallError),
    /// invalid node response: {0}
    InvalidResponse(String),
    /// ABI error: {0}
    Abi(String),
    /// transaction {0} was not mined in time
    ConfirmationTimeout(TxHash),
    /// invalid bytecode: {0}
    Bytecode(String),
}

impl From<SdkError> for CallError {
    fn from(err: SdkError) -> Self {
        match err {
            SdkError::Rpc(err) => err,
            other => CallError::new(other.to_string()),
        }
    }
}
