//! Deterministic hashes for audit entries.

use claimgate_kernel::report::ScientificReport;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::RunLogError;

/// SHA-256 of the raw input text, lowercase hex.
pub fn input_hash(input: &str) -> String {
    hex_lower(&Sha256::digest(input.as_bytes()))
}

/// Digest of a report's canonical JSON form (sorted keys, no whitespace).
///
/// Two reports with the same content digest identically regardless of the
/// key order they arrived in.
pub fn report_digest(report: &ScientificReport) -> Result<String, RunLogError> {
    let value =
        serde_json::to_value(report).map_err(|e| RunLogError::Serialize(e.to_string()))?;
    let hash = Sha256::digest(canonical_json_bytes(&value)?);
    Ok(format!("report1_{}", hex_lower(&hash)))
}

fn canonical_json_bytes(value: &Value) -> Result<Vec<u8>, RunLogError> {
    let bytes = match value {
        Value::Null => b"null".to_vec(),
        Value::Bool(true) => b"true".to_vec(),
        Value::Bool(false) => b"false".to_vec(),
        Value::Number(n) => n.to_string().into_bytes(),
        Value::String(_) => {
            serde_json::to_vec(value).map_err(|e| RunLogError::Serialize(e.to_string()))?
        }
        Value::Array(items) => {
            let mut out = vec![b'['];
            for (idx, item) in items.iter().enumerate() {
                if idx > 0 {
                    out.push(b',');
                }
                out.extend(canonical_json_bytes(item)?);
            }
            out.push(b']');
            out
        }
        Value::Object(map) => {
            let mut entries = map.iter().collect::<Vec<_>>();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));

            let mut out = vec![b'{'];
            for (idx, (key, item)) in entries.into_iter().enumerate() {
                if idx > 0 {
                    out.push(b',');
                }
                out.extend(
                    serde_json::to_vec(key).map_err(|e| RunLogError::Serialize(e.to_string()))?,
                );
                out.push(b':');
                out.extend(canonical_json_bytes(item)?);
            }
            out.push(b'}');
            out
        }
    };
    Ok(bytes)
}

fn hex_lower(bytes: &[u8]) -> String {
    const HEX: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push(HEX[(byte >> 4) as usize] as char);
        out.push(HEX[(byte & 0x0f) as usize] as char);
    }
    out
}
