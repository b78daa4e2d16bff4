//! The UVM-27 program description format.
//!
//! A source program is a JSON array of entries:
//!
//! ```json
//! [
//!   {"op": "load", "arg": 3},
//!   {"op": "load", "arg": 9},
//!   {"op": "write"}
//! ]
//! ```
//!
//! Mnemonics are case-insensitive and `arg` is optional (defaults to 0).

use std::path::Path;
use serde::{Serialize, Deserialize};
use thiserror::Error;

/// One entry of a program description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceEntry {
    /// Mnemonic: one of `load`, `read`, `write`, `eq` (any case).
    pub op: String,
    /// Optional operand. Missing means 0; WRITE ignores it entirely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arg: Option<u64>,
}

impl SourceEntry {
    /// Shorthand constructor, mostly for tests and tooling.
    pub fn new(op: &str, arg: Option<u64>) -> Self {
        Self { op: op.to_string(), arg }
    }
}

/// Load a program description from a JSON file.
pub fn load_source<P: AsRef<Path>>(path: P) -> Result<Vec<SourceEntry>, SourceError> {
    let text = std::fs::read_to_string(path.as_ref())
        .map_err(|e| SourceError::IoError(e.to_string()))?;
    parse_source(&text)
}

/// Parse a program description from JSON text.
pub fn parse_source(text: &str) -> Result<Vec<SourceEntry>, SourceError> {
    serde_json::from_str(text).map_err(|e| SourceError::ParseError(e.to_string()))
}

/// Errors that can occur while loading a program description.
#[derive(Debug, Clone, Error)]
pub enum SourceError {
    #[error("I/O error: {0}")]
    IoError(String),

    #[error("parse error: {0}")]
    ParseError(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_source() {
        let text = r#"[
            {"op": "load", "arg": 3},
            {"op": "write"}
        ]"#;

        let entries = parse_source(text).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], SourceEntry::new("load", Some(3)));
        assert_eq!(entries[1], SourceEntry::new("write", None));
    }

    #[test]
    fn test_parse_rejects_non_array() {
        assert!(parse_source(r#"{"op": "load"}"#).is_err());
        assert!(parse_source("not json").is_err());
    }

    #[test]
    fn test_parse_rejects_negative_arg() {
        // `arg` is a non-negative integer by contract.
        assert!(parse_source(r#"[{"op": "load", "arg": -1}]"#).is_err());
    }
}
