// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! Contract deployment.

use crate::abi::{encode, Token};
use crate::error::{SdkError, SdkResult};
use crate::rpc::RpcClient;
use ballot_models::address::Address;
use ballot_models::tx::TxReceipt;
use serde_json::Value;
use tracing::info;

/// Creation bytecode from a compiler artifact or a raw hex file.
///
/// Accepts a JSON artifact with a `bytecode` field (either a hex string or an
/// object with an `object` field) or a plain hex string, with or without `0x`.
pub fn load_bytecode(contents: &str) -> SdkResult<Vec<u8>> {
    let contents = contents.trim();
    let hex_code = if contents.starts_with('{') {
        let artifact: Value = serde_json::from_str(contents)
            .map_err(|err| SdkError::Bytecode(format!("invalid artifact: {}", err)))?;
        match &artifact["bytecode"] {
            Value::String(code) => code.clone(),
            Value::Object(obj) => obj
                .get("object")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| SdkError::Bytecode("artifact has no bytecode.object".into()))?,
            _ => return Err(SdkError::Bytecode("artifact has no bytecode".into())),
        }
    } else {
        contents.to_string()
    };
    let digits = hex_code.strip_prefix("0x").unwrap_or(&hex_code);
    let code = hex::decode(digits).map_err(|err| SdkError::Bytecode(err.to_string()))?;
    if code.is_empty() {
        return Err(SdkError::Bytecode("empty bytecode".into()));
    }
    Ok(code)
}

/// Deploy `bytecode` with ABI encoded constructor arguments, signed by `from`.
/// The returned receipt carries the contract address.
pub async fn deploy_contract(
    rpc: &RpcClient,
    from: Address,
    bytecode: &[u8],
    constructor_args: &[Token],
) -> SdkResult<TxReceipt> {
    let mut data = bytecode.to_vec();
    data.extend(encode(constructor_args));
    let receipt = rpc.transact(from, None, &data).await?;
    match receipt.contract_address {
        Some(address) => {
            info!("contract deployed at {} ({})", address, receipt);
            Ok(receipt)
        }
        None => Err(SdkError::InvalidResponse(format!(
            "no contract address in the receipt of {}",
            receipt.hash
        ))),
    }
}
