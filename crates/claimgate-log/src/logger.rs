//! Append-only JSONL writer for a run's audit trail.

use crate::RunLogError;
use chrono::Utc;
use claimgate_extract::ClaimDraft;
use claimgate_kernel::gate::GateDecision;
use claimgate_kernel::report::ScientificReport;
use claimgate_kernel::structure::StructureReport;
use serde::Serialize;
use serde_json::Value;
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use crate::entry::{ExtractionEntry, FinalizationEntry};

pub const EXTRACTION_LOG_FILE: &str = "claim_extraction.jsonl";
pub const FINALIZATION_LOG_FILE: &str = "finalization.jsonl";

/// Writes audit entries under one log directory, tagged with an optional run id.
#[derive(Debug, Clone)]
pub struct RunLogger {
    log_dir: PathBuf,
    run_id: Option<String>,
}

impl RunLogger {
    pub fn new(log_dir: impl Into<PathBuf>, run_id: Option<String>) -> Self {
        Self {
            log_dir: log_dir.into(),
            run_id,
        }
    }

    pub fn log_dir(&self) -> &Path {
        &self.log_dir
    }

    pub fn extraction_log_path(&self) -> PathBuf {
        self.log_dir.join(EXTRACTION_LOG_FILE)
    }

    pub fn finalization_log_path(&self) -> PathBuf {
        self.log_dir.join(FINALIZATION_LOG_FILE)
    }

    /// Record an extraction run. Returns the input hash.
    pub fn log_extraction(
        &self,
        input: &str,
        drafts: &[ClaimDraft],
    ) -> Result<String, RunLogError> {
        let entry = ExtractionEntry::new(Utc::now(), self.run_id.as_deref(), input, drafts);
        append_line(&self.extraction_log_path(), &entry)?;
        info!(
            input_hash = %entry.input_hash,
            claims = entry.claim_count,
            "logged claim extraction"
        );
        Ok(entry.input_hash)
    }

    /// Record a finalization decision. Returns the report digest.
    pub fn log_finalization(
        &self,
        report: &ScientificReport,
        structure: &StructureReport,
        decision: &GateDecision,
    ) -> Result<String, RunLogError> {
        let entry = FinalizationEntry::new(
            Utc::now(),
            self.run_id.as_deref(),
            report,
            structure,
            decision,
        )?;
        append_line(&self.finalization_log_path(), &entry)?;
        info!(
            report_digest = %entry.report_digest,
            can_finalize = entry.can_finalize,
            "logged finalization check"
        );
        Ok(entry.report_digest)
    }
}

fn append_line(path: &Path, entry: &impl Serialize) -> Result<(), RunLogError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|e| RunLogError::io(parent, e))?;
    }
    let line = serde_json::to_string(entry).map_err(|e| RunLogError::Serialize(e.to_string()))?;
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| RunLogError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    writeln!(writer, "{line}").map_err(|e| RunLogError::io(path, e))?;
    writer.flush().map_err(|e| RunLogError::io(path, e))?;
    debug!(path = %path.display(), bytes = line.len() + 1, "appended audit entry");
    Ok(())
}

/// Read every entry of a JSONL audit file. Blank lines are skipped.
pub fn read_entries(path: impl AsRef<Path>) -> Result<Vec<Value>, RunLogError> {
    let path = path.as_ref();
    let file = fs::File::open(path).map_err(|e| RunLogError::io(path, e))?;
    let mut entries = Vec::new();
    for (line_no, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|e| RunLogError::io(path, e))?;
        if line.trim().is_empty() {
            continue;
        }
        let entry = serde_json::from_str(&line).map_err(|e| RunLogError::Parse {
            line: line_no + 1,
            message: e.to_string(),
        })?;
        entries.push(entry);
    }
    Ok(entries)
}
