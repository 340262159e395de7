// Copyright (c) 2022 MASSA LABS <info@massa.net>
//! Ethereum JSON-RPC implementation of the wallet and contract interfaces.

#![warn(missing_docs)]
#![warn(unused_crate_dependencies)]

pub mod abi;
mod config;
mod contracts;
mod deploy;
mod error;
mod rpc;
mod wallet;

pub use config::RpcConfig;
pub use contracts::{RpcVoting, RpcWhitelist};
pub use deploy::{deploy_contract, load_bytecode};
pub use error::{SdkError, SdkResult};
pub use rpc::RpcClient;
pub use wallet::JsonRpcWallet;
