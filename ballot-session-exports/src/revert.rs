// Copyright (c) 2022 MASSA LABS <info@massa.net>

use lazy_static::lazy_static;
use regex::Regex;

/// Selector of the standard `Error(string)` revert payload
const ERROR_STRING_SELECTOR: [u8; 4] = [0x08, 0xc3, 0x79, 0xa0];

lazy_static! {
    static ref REASON_ATTRIBUTE: Regex =
        Regex::new(r#"reason="([^"]+)""#).expect("invalid revert reason regex");
    static ref REASON_STRING: Regex =
        Regex::new(r"reverted with reason string '([^']+)'").expect("invalid revert reason regex");
    static ref EXECUTION_REVERTED: Regex =
        Regex::new(r"execution reverted: (.+)$").expect("invalid revert reason regex");
}

/// Extract a human readable revert reason from a node error.
///
/// Looks, in order, for `reason="..."` in the message, a
/// `reverted with reason string '...'` message, a `execution reverted: ...`
/// message, then an ABI encoded `Error(string)` payload in `data`.
pub fn extract_revert_reason(message: &str, data: Option<&[u8]>) -> Option<String> {
    for re in [&*REASON_ATTRIBUTE, &*REASON_STRING, &*EXECUTION_REVERTED] {
        if let Some(reason) = re.captures(message).and_then(|c| c.get(1)) {
            let reason = reason.as_str().trim();
            if !reason.is_empty() {
                return Some(reason.to_string());
            }
        }
    }
    data.and_then(decode_error_string)
}

fn decode_error_string(data: &[u8]) -> Option<String> {
    let payload = data.strip_prefix(&ERROR_STRING_SELECTOR[..])?;
    let offset = read_word_as_usize(payload, 0)?;
    let len = read_word_as_usize(payload, offset)?;
    let start = offset.checked_add(32)?;
    let bytes = payload.get(start..start.checked_add(len)?)?;
    String::from_utf8(bytes.to_vec()).ok()
}

fn read_word_as_usize(data: &[u8], at: usize) -> Option<usize> {
    let word = data.get(at..at.checked_add(32)?)?;
    // values above usize are never valid offsets or lengths
    if word[..24].iter().any(|b| *b != 0) {
        return None;
    }
    let mut buf = [0u8; 8];
    buf.copy_from_slice(&word[24..]);
    usize::try_from(u64::from_be_bytes(buf)).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_error_string(reason: &str) -> Vec<u8> {
        let mut out = ERROR_STRING_SELECTOR.to_vec();
        let mut word = [0u8; 32];
        word[31] = 0x20;
        out.extend_from_slice(&word);
        let mut word = [0u8; 32];
        word[24..].copy_from_slice(&(reason.len() as u64).to_be_bytes());
        out.extend_from_slice(&word);
        out.extend_from_slice(reason.as_bytes());
        out.resize(out.len() + (32 - reason.len() % 32) % 32, 0);
        out
    }

    #[test]
    fn test_reason_attribute() {
        assert_eq!(
            extract_revert_reason(
                r#"execution reverted (action="estimateGas", data="0x08c3", reason="Poll has ended", transaction={})"#,
                None
            ),
            Some("Poll has ended".to_string())
        );
    }

    #[test]
    fn test_node_messages() {
        assert_eq!(
            extract_revert_reason(
                "VM Exception while processing transaction: reverted with reason string 'Not whitelisted'",
                None
            ),
            Some("Not whitelisted".to_string())
        );
        assert_eq!(
            extract_revert_reason("execution reverted: Already voted", None),
            Some("Already voted".to_string())
        );
        assert_eq!(extract_revert_reason("execution reverted", None), None);
        assert_eq!(extract_revert_reason("nonce too low", None), None);
    }

    #[test]
    fn test_error_string_payload() {
        let data = encode_error_string("Invalid option");
        assert_eq!(
            extract_revert_reason("execution reverted", Some(&data)),
            Some("Invalid option".to_string())
        );
        assert_eq!(extract_revert_reason("execution reverted", Some(&data[..40])), None);
        assert_eq!(extract_revert_reason("execution reverted", Some(&[0xde, 0xad])), None);
    }
}
