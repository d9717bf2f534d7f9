//! Audit logging for claimgate runs.
//!
//! Entries are appended to JSONL files in a log directory:
//!
//! - `claim_extraction.jsonl`: input hash, length, and the drafts produced
//! - `finalization.jsonl`: report digest, gate outcome, reasons, support counts
//!
//! The kernel never calls into this crate. Callers log after deciding.

pub mod digest;
pub mod entry;
pub mod logger;

use std::path::Path;

pub use digest::{input_hash, report_digest};
pub use entry::{ExtractionEntry, FinalizationEntry};
pub use logger::{EXTRACTION_LOG_FILE, FINALIZATION_LOG_FILE, RunLogger, read_entries};

/// Errors from audit log operations.
#[derive(Debug, thiserror::Error)]
pub enum RunLogError {
    #[error("{path}: I/O error: {message}")]
    Io { path: String, message: String },

    #[error("line {line}: parse error: {message}")]
    Parse { line: usize, message: String },

    #[error("serialization error: {0}")]
    Serialize(String),
}

impl RunLogError {
    pub(crate) fn io(path: &Path, error: std::io::Error) -> Self {
        RunLogError::Io {
            path: path.display().to_string(),
            message: error.to_string(),
        }
    }
}
