//! Audit entry shapes. One JSON object per line.

use chrono::{DateTime, Utc};
use claimgate_extract::ClaimDraft;
use claimgate_kernel::gate::{GateDecision, support_summary};
use claimgate_kernel::report::ScientificReport;
use claimgate_kernel::structure::StructureReport;
use serde::Serialize;

use crate::RunLogError;
use crate::digest::{input_hash, report_digest};

pub const EVENT_CLAIM_EXTRACTION: &str = "claim_extraction";
pub const EVENT_FINALIZATION_CHECK: &str = "finalization_check";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionEntry<'a> {
    pub timestamp: DateTime<Utc>,
    pub event: &'static str,
    pub run_id: Option<&'a str>,
    pub input_hash: String,
    /// Length of the input in characters.
    pub input_length: usize,
    pub claim_count: usize,
    pub extracted_claims: &'a [ClaimDraft],
}

impl<'a> ExtractionEntry<'a> {
    pub fn new(
        timestamp: DateTime<Utc>,
        run_id: Option<&'a str>,
        input: &str,
        drafts: &'a [ClaimDraft],
    ) -> Self {
        Self {
            timestamp,
            event: EVENT_CLAIM_EXTRACTION,
            run_id,
            input_hash: input_hash(input),
            input_length: input.chars().count(),
            claim_count: drafts.len(),
            extracted_claims: drafts,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinalizationEntry<'a> {
    pub timestamp: DateTime<Utc>,
    pub event: &'static str,
    pub run_id: Option<&'a str>,
    pub report_id: Option<&'a str>,
    pub report_digest: String,
    pub can_finalize: bool,
    pub reasons: &'a [String],
    pub failure_classes: &'a [String],
    pub total_claims: usize,
    pub non_speculative_claims: usize,
    pub unsupported_claims: usize,
    pub unsupported_claim_rate: f64,
}

impl<'a> FinalizationEntry<'a> {
    pub fn new(
        timestamp: DateTime<Utc>,
        run_id: Option<&'a str>,
        report: &'a ScientificReport,
        structure: &'a StructureReport,
        decision: &'a GateDecision,
    ) -> Result<Self, RunLogError> {
        let support = support_summary(report);
        Ok(Self {
            timestamp,
            event: EVENT_FINALIZATION_CHECK,
            run_id,
            report_id: report.report_id().map(|id| id.as_str()),
            report_digest: report_digest(report)?,
            can_finalize: decision.is_final_eligible(),
            reasons: decision.reasons(),
            failure_classes: &structure.failure_classes,
            total_claims: support.total_claims,
            non_speculative_claims: support.non_speculative,
            unsupported_claims: support.unsupported.len(),
            unsupported_claim_rate: support.rate(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use claimgate_extract::extract_claims;
    use claimgate_kernel::gate::{GatePolicy, decide};
    use claimgate_kernel::structure::validate;
    use claimgate_kernel::wire::parse_report;
    use serde_json::json;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap()
    }

    #[test]
    fn extraction_entry_records_hash_and_drafts() {
        let input = "Thus, the force equals mass times acceleration.";
        let drafts = extract_claims(input, &["$$F = ma$$"]);
        let entry = ExtractionEntry::new(fixed_time(), Some("run-7"), input, &drafts);
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["timestamp"], "2026-01-02T03:04:05Z");
        assert_eq!(value["event"], EVENT_CLAIM_EXTRACTION);
        assert_eq!(value["runId"], "run-7");
        assert_eq!(value["inputHash"], input_hash(input));
        assert_eq!(value["inputLength"], 47);
        assert_eq!(value["claimCount"], 2);
        assert_eq!(value["extractedClaims"][0]["suggestedLabel"], "DERIVED");
    }

    #[test]
    fn finalization_entry_summarizes_decision() {
        let report = parse_report(&json!({
            "report_id": "r-1",
            "claims": [
                {"claim_id": "c-1", "statement": "x = 1", "claim_label": "DERIVED", "evidence_ids": []},
                {"claim_id": "c-2", "statement": "maybe", "claim_label": "SPECULATIVE", "evidence_ids": [], "verify_falsify": "test it"}
            ],
            "steps": [{"step_id": "s-1", "claim_ids": ["c-1", "c-2"], "step_status": "UNCHECKED", "depends_on": []}],
            "evidence": []
        }))
        .unwrap();
        let structure = validate(&report);
        let decision = decide(&report, &structure, &GatePolicy::default());
        let entry =
            FinalizationEntry::new(fixed_time(), None, &report, &structure, &decision).unwrap();
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["event"], EVENT_FINALIZATION_CHECK);
        assert_eq!(value["runId"], serde_json::Value::Null);
        assert_eq!(value["reportId"], "r-1");
        assert_eq!(value["canFinalize"], false);
        assert_eq!(value["failureClasses"], json!(["missing-evidence"]));
        assert_eq!(value["totalClaims"], 2);
        assert_eq!(value["nonSpeculativeClaims"], 1);
        assert_eq!(value["unsupportedClaims"], 1);
        assert_eq!(value["unsupportedClaimRate"], 1.0);
        assert_eq!(
            value["reasons"][0],
            "[missing-evidence] claim c-1 (label=DERIVED) must have at least one evidence_id"
        );
    }
}
