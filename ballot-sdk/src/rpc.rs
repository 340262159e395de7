// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! Ethereum JSON-RPC calls used by the client.

use crate::config::RpcConfig;
use crate::error::{SdkError, SdkResult};
use ballot_logging::ballot_trace;
use ballot_models::address::Address;
use ballot_models::tx::{TxHash, TxReceipt};
use ballot_session_exports::{CallError, CallResult};
use jsonrpsee::core::client::{ClientT, Error as ClientError};
use jsonrpsee::http_client::{HttpClient, HttpClientBuilder};
use jsonrpsee::rpc_params;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::str::FromStr;
use tokio::time::{sleep, Instant};
use tracing::debug;

/// Receipt fields we read
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RpcReceipt {
    block_number: Option<String>,
    contract_address: Option<String>,
    status: Option<String>,
}

/// JSON-RPC client bound to a node
pub struct RpcClient {
    client: HttpClient,
    config: RpcConfig,
}

impl RpcClient {
    /// Build a client for `config.url`. No request is sent.
    pub fn new(config: RpcConfig) -> SdkResult<RpcClient> {
        let client = HttpClientBuilder::default()
            .request_timeout(config.request_timeout)
            .build(&config.url)
            .map_err(|err| SdkError::ClientBuild(err.to_string()))?;
        Ok(RpcClient { client, config })
    }

    /// settings of this client
    pub fn config(&self) -> &RpcConfig {
        &self.config
    }

    async fn request<R: DeserializeOwned>(
        &self,
        method: &str,
        params: jsonrpsee::core::params::ArrayParams,
    ) -> CallResult<R> {
        self.client
            .request(method, params)
            .await
            .map_err(|err| call_error(method, err))
    }

    /// `eth_requestAccounts`, falling back to `eth_accounts` on nodes
    /// that only expose unlocked accounts
    pub async fn accounts(&self) -> CallResult<Vec<Address>> {
        let raw: Vec<String> = match self.request("eth_requestAccounts", rpc_params![]).await {
            Ok(raw) => raw,
            Err(err) => {
                debug!("eth_requestAccounts failed ({}), trying eth_accounts", err);
                self.request("eth_accounts", rpc_params![]).await?
            }
        };
        raw.iter()
            .map(|a| {
                Address::from_str(a)
                    .map_err(|err| CallError::new(format!("node returned {}", err)))
            })
            .collect()
    }

    /// `eth_chainId`
    pub async fn chain_id(&self) -> CallResult<u64> {
        let raw: String = self.request("eth_chainId", rpc_params![]).await?;
        parse_quantity(&raw)
    }

    /// `eth_getCode` at the latest block
    pub async fn get_code(&self, address: Address) -> CallResult<Vec<u8>> {
        let raw: String = self
            .request("eth_getCode", rpc_params![address.to_lowercase_string(), "latest"])
            .await?;
        parse_data(&raw)
    }

    /// `eth_call` at the latest block
    pub async fn call(
        &self,
        from: Option<Address>,
        to: Address,
        data: &[u8],
    ) -> CallResult<Vec<u8>> {
        let mut tx = json!({
            "to": to.to_lowercase_string(),
            "data": format!("0x{}", hex::encode(data)),
        });
        if let Some(from) = from {
            tx["from"] = Value::String(from.to_lowercase_string());
        }
        let raw: String = self.request("eth_call", rpc_params![tx, "latest"]).await?;
        parse_data(&raw)
    }

    /// `eth_sendTransaction` signed by the node, then wait for the receipt.
    /// `to == None` deploys `data` as a contract.
    pub async fn transact(
        &self,
        from: Address,
        to: Option<Address>,
        data: &[u8],
    ) -> CallResult<TxReceipt> {
        let mut tx = json!({
            "from": from.to_lowercase_string(),
            "data": format!("0x{}", hex::encode(data)),
        });
        if let Some(to) = to {
            tx["to"] = Value::String(to.to_lowercase_string());
        }
        let raw: String = self.request("eth_sendTransaction", rpc_params![tx]).await?;
        let hash = TxHash::from_str(&raw)
            .map_err(|err| CallError::new(format!("node returned {}", err)))?;
        debug!("transaction {} sent by {}", hash, from);
        ballot_trace!("sdk.transact", { "hash": hash.to_string(), "from": from.to_string() });

        let receipt = self.wait_for_receipt(hash).await?;
        if receipt.status.as_deref() == Some("0x0") {
            // replay the call to recover the revert reason
            if let Some(to) = to {
                self.call(Some(from), to, data).await?;
            }
            return Err(CallError::new(format!("transaction {} reverted", hash)));
        }
        let block_number = receipt
            .block_number
            .as_deref()
            .map(parse_quantity)
            .transpose()?;
        let contract_address = receipt
            .contract_address
            .as_deref()
            .map(|a| {
                Address::from_str(a)
                    .map_err(|err| CallError::new(format!("node returned {}", err)))
            })
            .transpose()?;
        Ok(TxReceipt {
            hash,
            block_number,
            contract_address,
        })
    }

    async fn wait_for_receipt(&self, hash: TxHash) -> CallResult<RpcReceipt> {
        let deadline = Instant::now() + self.config.confirmation_timeout;
        loop {
            let receipt: Option<RpcReceipt> = self
                .request("eth_getTransactionReceipt", rpc_params![hash.to_string()])
                .await?;
            if let Some(receipt) = receipt {
                if receipt.block_number.is_some() {
                    return Ok(receipt);
                }
            }
            if Instant::now() >= deadline {
                return Err(SdkError::ConfirmationTimeout(hash).into());
            }
            sleep(self.config.confirmation_poll_interval).await;
        }
    }
}

/// Map a JSON-RPC failure, keeping the revert payload when the node sent one
pub(crate) fn call_error(method: &str, err: ClientError) -> CallError {
    match err {
        ClientError::Call(obj) => {
            let data = obj
                .data()
                .and_then(|raw| serde_json::from_str::<Value>(raw.get()).ok())
                .and_then(|value| revert_data(&value));
            CallError::with_data(obj.message().to_string(), data.as_deref())
        }
        other => CallError::new(format!("{} failed: {}", method, other)),
    }
}

/// Nodes put the revert payload either directly in `data` or in `data.data`
fn revert_data(value: &Value) -> Option<Vec<u8>> {
    match value {
        Value::String(s) => parse_data(s).ok(),
        Value::Object(map) => map.get("data").and_then(revert_data),
        _ => None,
    }
}

/// `0x`-prefixed hex quantity
pub(crate) fn parse_quantity(raw: &str) -> CallResult<u64> {
    let digits = raw
        .strip_prefix("0x")
        .ok_or_else(|| CallError::new(format!("invalid quantity {:?}", raw)))?;
    u64::from_str_radix(digits, 16)
        .map_err(|_| CallError::new(format!("invalid quantity {:?}", raw)))
}

/// `0x`-prefixed hex data
pub(crate) fn parse_data(raw: &str) -> CallResult<Vec<u8>> {
    let digits = raw
        .strip_prefix("0x")
        .ok_or_else(|| CallError::new(format!("invalid data {:?}", raw)))?;
    hex::decode(digits).map_err(|_| CallError::new(format!("invalid data {:?}", raw)))
}
