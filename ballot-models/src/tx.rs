// Copyright (c) 2022 MASSA LABS <info@massa.net>

use crate::error::ModelsError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Size of a transaction hash, in bytes
pub const TX_HASH_SIZE_BYTES: usize = 32;

/// Transaction hash
#[derive(Clone, Copy, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TxHash([u8; TX_HASH_SIZE_BYTES]);

impl TxHash {
    /// Build a hash from its raw bytes
    pub const fn from_bytes(bytes: [u8; TX_HASH_SIZE_BYTES]) -> Self {
        TxHash(bytes)
    }

    /// Raw bytes of the hash
    pub fn to_bytes(&self) -> &[u8; TX_HASH_SIZE_BYTES] {
        &self.0
    }
}

impl std::fmt::Display for TxHash {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl std::fmt::Debug for TxHash {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

impl FromStr for TxHash {
    type Err = ModelsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ModelsError::TxHashParseError(s.to_string());
        let body = s.strip_prefix("0x").ok_or_else(err)?;
        let mut bytes = [0u8; TX_HASH_SIZE_BYTES];
        hex::decode_to_slice(body, &mut bytes).map_err(|_| err())?;
        Ok(TxHash(bytes))
    }
}

impl Serialize for TxHash {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for TxHash {
    fn deserialize<D: serde::Deserializer<'de>>(d: D) -> Result<TxHash, D::Error> {
        let s = String::deserialize(d)?;
        TxHash::from_str(&s).map_err(serde::de::Error::custom)
    }
}

/// Confirmation of a mined transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxReceipt {
    /// hash of the transaction
    pub hash: TxHash,
    /// block that included it
    pub block_number: Option<u64>,
    /// address of the created contract, for deployments
    pub contract_address: Option<crate::address::Address>,
}

impl std::fmt::Display for TxReceipt {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.block_number {
            Some(block) => write!(f, "transaction {} mined in block {}", self.hash, block),
            None => write!(f, "transaction {} mined", self.hash),
        }
    }
}
