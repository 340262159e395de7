// Copyright (c) 2022 MASSA LABS <info@massa.net>

use crate::error::ModelsError;
use sha3::{Digest, Keccak256};
use std::str::FromStr;

/// Size of an account or contract address, in bytes
pub const ADDRESS_SIZE_BYTES: usize = 20;

const ADDRESS_PREFIX: &str = "0x";

/// Account or contract address (20 bytes).
/// Displayed with the mixed-case checksum.
#[derive(Clone, Copy, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Address([u8; ADDRESS_SIZE_BYTES]);

impl Address {
    /// Build an address from its raw bytes
    pub const fn from_bytes(bytes: [u8; ADDRESS_SIZE_BYTES]) -> Self {
        Address(bytes)
    }

    /// Raw bytes of the address
    pub fn to_bytes(&self) -> &[u8; ADDRESS_SIZE_BYTES] {
        &self.0
    }

    /// `true` for `0x0000000000000000000000000000000000000000`
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// Shortened form for display: `0x1234...abcd`
    pub fn short(&self) -> String {
        let full = self.to_string();
        format!("{}...{}", &full[..6], &full[full.len() - 4..])
    }

    /// Lowercase hex form, without checksum
    pub fn to_lowercase_string(&self) -> String {
        format!("{}{}", ADDRESS_PREFIX, hex::encode(self.0))
    }

    fn checksummed(&self) -> String {
        let lower = hex::encode(self.0);
        let digest = Keccak256::digest(lower.as_bytes());
        let mut out = String::with_capacity(ADDRESS_PREFIX.len() + lower.len());
        out.push_str(ADDRESS_PREFIX);
        for (i, c) in lower.chars().enumerate() {
            let nibble = (digest[i / 2] >> (if i % 2 == 0 { 4 } else { 0 })) & 0x0f;
            if c.is_ascii_alphabetic() && nibble >= 8 {
                out.push(c.to_ascii_uppercase());
            } else {
                out.push(c);
            }
        }
        out
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.checksummed())
    }
}

impl std::fmt::Debug for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self)
    }
}

impl FromStr for Address {
    type Err = ModelsError;

    /// Accepts all-lowercase and all-uppercase hex.
    /// Mixed case must carry a valid checksum.
    /// ```
    /// # use ballot_models::address::Address;
    /// # use std::str::FromStr;
    /// let address = Address::from_str("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap();
    /// assert_eq!(address.to_string(), "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed");
    /// assert!(Address::from_str("0x5AAeb6053F3E94C9b9A09f33669435E7Ef1BeAed").is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ModelsError::AddressParseError(s.to_string());
        let body = s
            .strip_prefix(ADDRESS_PREFIX)
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(err)?;
        if body.len() != ADDRESS_SIZE_BYTES * 2 {
            return Err(err());
        }
        let mut bytes = [0u8; ADDRESS_SIZE_BYTES];
        hex::decode_to_slice(body, &mut bytes).map_err(|_| err())?;
        let address = Address(bytes);
        let has_lower = body.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = body.chars().any(|c| c.is_ascii_uppercase());
        if has_lower && has_upper && address.checksummed()[ADDRESS_PREFIX.len()..] != *body {
            return Err(err());
        }
        Ok(address)
    }
}

impl ::serde::Serialize for Address {
    fn serialize<S: ::serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        if s.is_human_readable() {
            s.collect_str(&self.to_string())
        } else {
            s.serialize_bytes(self.to_bytes())
        }
    }
}

impl<'de> ::serde::Deserialize<'de> for Address {
    fn deserialize<D: ::serde::Deserializer<'de>>(d: D) -> Result<Address, D::Error> {
        if d.is_human_readable() {
            struct AddressVisitor;

            impl<'de> ::serde::de::Visitor<'de> for AddressVisitor {
                type Value = Address;

                fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                    formatter.write_str("0x + hex::encode(20 bytes)")
                }

                fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
                where
                    E: ::serde::de::Error,
                {
                    Address::from_str(v).map_err(E::custom)
                }
            }
            d.deserialize_str(AddressVisitor)
        } else {
            struct BytesVisitor;

            impl<'de> ::serde::de::Visitor<'de> for BytesVisitor {
                type Value = Address;

                fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
                    formatter.write_str("20 address bytes")
                }

                fn visit_bytes<E>(self, v: &[u8]) -> Result<Self::Value, E>
                where
                    E: ::serde::de::Error,
                {
                    let bytes: [u8; ADDRESS_SIZE_BYTES] = v
                        .try_into()
                        .map_err(|_| E::invalid_length(v.len(), &self))?;
                    Ok(Address(bytes))
                }
            }
            d.deserialize_bytes(BytesVisitor)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checksum_vectors() {
        for expected in [
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
            "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
            "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
        ] {
            let address = Address::from_str(expected).unwrap();
            assert_eq!(address.to_string(), expected);
            assert_eq!(
                Address::from_str(&expected.to_lowercase()).unwrap(),
                address
            );
        }
    }

    #[test]
    fn test_malformed_addresses() {
        for bad in [
            "",
            "0x",
            "5aaeb6053f3e94c9b9a09f33669435e7ef1beaed",
            "0x5aaeb6053f3e94c9b9a09f33669435e7ef1bea",
            "0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaedaa",
            "0xzzaeb6053f3e94c9b9a09f33669435e7ef1beaed",
        ] {
            assert!(Address::from_str(bad).is_err(), "{bad} should not parse");
        }
    }

    #[test]
    fn test_short_and_zero() {
        let address = Address::from_str("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").unwrap();
        assert_eq!(address.short(), "0x5aAe...eAed");
        assert!(!address.is_zero());
        assert!(Address::default().is_zero());
    }

    #[test]
    fn test_serde_json_round_trip() {
        let address = Address::from_str("0xfb6916095ca1df60bb79ce92ce3ea74c37c5d359").unwrap();
        let json = serde_json::to_string(&address).unwrap();
        assert_eq!(json, "\"0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359\"");
        assert_eq!(serde_json::from_str::<Address>(&json).unwrap(), address);
    }
}
