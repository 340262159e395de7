// Copyright (c) 2022 MASSA LABS <info@massa.net>

//! Minimal contract ABI codec: the static and dynamic types used by the
//! `Whitelist` and `Voting` contracts.

use crate::error::SdkError;
use ballot_models::address::{Address, ADDRESS_SIZE_BYTES};
use sha3::{Digest, Keccak256};

const WORD: usize = 32;

/// Function selector: first 4 bytes of the Keccak-256 of the signature
pub fn selector(signature: &str) -> [u8; 4] {
    let digest = Keccak256::digest(signature.as_bytes());
    let mut out = [0u8; 4];
    out.copy_from_slice(&digest[..4]);
    out
}

/// Argument value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// `address`
    Address(Address),
    /// `uint256`, restricted to values fitting in 64 bits
    Uint(u64),
    /// `bool`
    Bool(bool),
    /// `string`
    String(String),
    /// `string[]`
    StringArray(Vec<String>),
}

impl Token {
    fn is_dynamic(&self) -> bool {
        matches!(self, Token::String(_) | Token::StringArray(_))
    }
}

/// Calldata of a function call
pub fn encode_call(signature: &str, args: &[Token]) -> Vec<u8> {
    let mut out = selector(signature).to_vec();
    out.extend(encode(args));
    out
}

/// Encode a sequence of values as a tuple
pub fn encode(tokens: &[Token]) -> Vec<u8> {
    let head_len = tokens.len() * WORD;
    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();
    for token in tokens {
        if token.is_dynamic() {
            head.extend(uint_word((head_len + tail.len()) as u64));
            tail.extend(encode_dynamic(token));
        } else {
            head.extend(encode_static(token));
        }
    }
    head.extend(tail);
    head
}

fn encode_static(token: &Token) -> [u8; WORD] {
    match token {
        Token::Address(address) => {
            let mut word = [0u8; WORD];
            word[WORD - ADDRESS_SIZE_BYTES..].copy_from_slice(address.to_bytes());
            word
        }
        Token::Uint(value) => uint_word(*value),
        Token::Bool(value) => uint_word(u64::from(*value)),
        Token::String(_) | Token::StringArray(_) => [0u8; WORD],
    }
}

fn encode_dynamic(token: &Token) -> Vec<u8> {
    match token {
        Token::String(value) => encode_bytes(value.as_bytes()),
        Token::StringArray(values) => {
            let mut out = uint_word(values.len() as u64).to_vec();
            let items: Vec<Token> = values.iter().cloned().map(Token::String).collect();
            out.extend(encode(&items));
            out
        }
        _ => encode_static(token).to_vec(),
    }
}

fn encode_bytes(bytes: &[u8]) -> Vec<u8> {
    let mut out = uint_word(bytes.len() as u64).to_vec();
    out.extend_from_slice(bytes);
    out.resize(out.len() + (WORD - bytes.len() % WORD) % WORD, 0);
    out
}

fn uint_word(value: u64) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[WORD - 8..].copy_from_slice(&value.to_be_bytes());
    word
}

/// Reads return data. Offsets of dynamic values are relative to the start
/// of the enclosing tuple.
pub struct AbiReader<'a> {
    data: &'a [u8],
}

impl<'a> AbiReader<'a> {
    /// Reader over a returned tuple
    pub fn new(data: &'a [u8]) -> Self {
        AbiReader { data }
    }

    fn word(&self, at: usize) -> Result<&'a [u8], SdkError> {
        at.checked_add(WORD)
            .and_then(|end| self.data.get(at..end))
            .ok_or_else(|| SdkError::Abi(format!("return data too short for a word at {}", at)))
    }

    fn uint_at(&self, at: usize) -> Result<u64, SdkError> {
        let word = self.word(at)?;
        if word[..WORD - 8].iter().any(|b| *b != 0) {
            return Err(SdkError::Abi(format!("integer at {} overflows 64 bits", at)));
        }
        let mut buf = [0u8; 8];
        buf.copy_from_slice(&word[WORD - 8..]);
        Ok(u64::from_be_bytes(buf))
    }

    fn usize_at(&self, at: usize) -> Result<usize, SdkError> {
        usize::try_from(self.uint_at(at)?)
            .map_err(|_| SdkError::Abi(format!("offset at {} overflows", at)))
    }

    fn address_at(&self, at: usize) -> Result<Address, SdkError> {
        let word = self.word(at)?;
        if word[..WORD - ADDRESS_SIZE_BYTES].iter().any(|b| *b != 0) {
            return Err(SdkError::Abi(format!("invalid address word at {}", at)));
        }
        let mut bytes = [0u8; ADDRESS_SIZE_BYTES];
        bytes.copy_from_slice(&word[WORD - ADDRESS_SIZE_BYTES..]);
        Ok(Address::from_bytes(bytes))
    }

    fn string_at(&self, at: usize) -> Result<String, SdkError> {
        let len = self.usize_at(at)?;
        let start = at + WORD;
        let bytes = start
            .checked_add(len)
            .and_then(|end| self.data.get(start..end))
            .ok_or_else(|| SdkError::Abi(format!("string at {} is truncated", at)))?;
        String::from_utf8(bytes.to_vec())
            .map_err(|_| SdkError::Abi(format!("string at {} is not utf-8", at)))
    }

    /// Sub-reader positioned at the dynamic value referenced by head slot `index`
    fn tail(&self, index: usize) -> Result<AbiReader<'a>, SdkError> {
        let offset = self.usize_at(index * WORD)?;
        let data = self
            .data
            .get(offset..)
            .ok_or_else(|| SdkError::Abi(format!("offset {} out of bounds", offset)))?;
        Ok(AbiReader { data })
    }

    /// `uint256` in head slot `index`
    pub fn uint(&self, index: usize) -> Result<u64, SdkError> {
        self.uint_at(index * WORD)
    }

    /// `bool` in head slot `index`
    pub fn bool(&self, index: usize) -> Result<bool, SdkError> {
        match self.uint_at(index * WORD)? {
            0 => Ok(false),
            1 => Ok(true),
            other => Err(SdkError::Abi(format!("invalid bool value {}", other))),
        }
    }

    /// `address` in head slot `index`
    pub fn address(&self, index: usize) -> Result<Address, SdkError> {
        self.address_at(index * WORD)
    }

    /// `string` referenced by head slot `index`
    pub fn string(&self, index: usize) -> Result<String, SdkError> {
        self.tail(index)?.string_at(0)
    }

    /// `uint256[]` referenced by head slot `index`
    pub fn uint_array(&self, index: usize) -> Result<Vec<u64>, SdkError> {
        let array = self.tail(index)?;
        let len = array.usize_at(0)?;
        let items = array.items();
        (0..len).map(|i| items.uint(i)).collect()
    }

    /// `address[]` referenced by head slot `index`
    pub fn address_array(&self, index: usize) -> Result<Vec<Address>, SdkError> {
        let array = self.tail(index)?;
        let len = array.usize_at(0)?;
        let items = array.items();
        (0..len).map(|i| items.address(i)).collect()
    }

    /// `string[]` referenced by head slot `index`
    pub fn string_array(&self, index: usize) -> Result<Vec<String>, SdkError> {
        let array = self.tail(index)?;
        let len = array.usize_at(0)?;
        let items = array.items();
        (0..len).map(|i| items.string(i)).collect()
    }

    /// elements of an array start after its length word
    fn items(&self) -> AbiReader<'a> {
        AbiReader {
            data: self.data.get(WORD..).unwrap_or_default(),
        }
    }
}
