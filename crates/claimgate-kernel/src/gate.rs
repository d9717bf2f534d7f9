//! Finalization gate: may this report be marked FINAL?
//!
//! The gate only classifies. It never mutates the report and never drops a
//! reason: structural findings come first, then the empty-report checklist,
//! then the unsupported-claim block.

use crate::claim::Claim;
use crate::report::ScientificReport;
use crate::structure::{StructureReport, validate};
use serde::Serialize;
use tracing::debug;

pub const DEFAULT_UNSUPPORTED_SAMPLE_LIMIT: usize = 5;
const STATEMENT_PREVIEW_CHARS: usize = 80;

const EMPTY_REPORT_CHECKLIST: [&str; 6] = [
    "No claims extracted - cannot finalize",
    "Checklist:",
    "  - Provide derivation steps with explicit claims",
    "  - OR provide equations/identities to verify",
    "  - OR provide source attributions/citations",
    "  - OR explicitly state 'no derivation possible yet' with explanation",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GatePolicy {
    /// How many unsupported claims are listed individually in the reasons.
    pub unsupported_sample_limit: usize,
}

impl Default for GatePolicy {
    fn default() -> Self {
        Self {
            unsupported_sample_limit: DEFAULT_UNSUPPORTED_SAMPLE_LIMIT,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GateDecision {
    FinalEligible,
    Blocked { reasons: Vec<String> },
}

impl GateDecision {
    pub fn is_final_eligible(&self) -> bool {
        matches!(self, GateDecision::FinalEligible)
    }

    pub fn reasons(&self) -> &[String] {
        match self {
            GateDecision::FinalEligible => &[],
            GateDecision::Blocked { reasons } => reasons,
        }
    }

    pub fn into_reasons(self) -> Vec<String> {
        match self {
            GateDecision::FinalEligible => Vec::new(),
            GateDecision::Blocked { reasons } => reasons,
        }
    }
}

/// Which non-speculative claims lack resolvable evidence.
#[derive(Debug, Clone)]
pub struct SupportSummary<'a> {
    pub total_claims: usize,
    pub non_speculative: usize,
    pub unsupported: Vec<&'a Claim>,
}

impl SupportSummary<'_> {
    /// `unsupported / non_speculative`, or 0.0 with no non-speculative claims.
    pub fn rate(&self) -> f64 {
        if self.non_speculative == 0 {
            0.0
        } else {
            self.unsupported.len() as f64 / self.non_speculative as f64
        }
    }
}

/// A non-speculative claim is supported only if at least one of its
/// evidence ids resolves to an evidence object in the report.
pub fn support_summary(report: &ScientificReport) -> SupportSummary<'_> {
    let resolves = |claim: &Claim| {
        claim
            .evidence_ids()
            .iter()
            .any(|id| report.evidence_object(id).is_some())
    };
    let non_speculative = report
        .claims()
        .iter()
        .filter(|c| !c.is_speculative())
        .collect::<Vec<_>>();
    let unsupported = non_speculative
        .iter()
        .copied()
        .filter(|&claim| !resolves(claim))
        .collect();
    SupportSummary {
        total_claims: report.claims().len(),
        non_speculative: non_speculative.len(),
        unsupported,
    }
}

pub fn unsupported_claim_rate(report: &ScientificReport) -> f64 {
    support_summary(report).rate()
}

pub fn decide(
    report: &ScientificReport,
    structure: &StructureReport,
    policy: &GatePolicy,
) -> GateDecision {
    let mut reasons = structure
        .findings
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>();

    if report.is_empty() {
        reasons.extend(EMPTY_REPORT_CHECKLIST.iter().map(|line| line.to_string()));
    }

    let support = support_summary(report);
    if !support.unsupported.is_empty() {
        reasons.extend(unsupported_block(&support, policy));
    }

    debug!(
        findings = structure.findings.len(),
        unsupported = support.unsupported.len(),
        reasons = reasons.len(),
        "finalization decision"
    );
    if reasons.is_empty() {
        GateDecision::FinalEligible
    } else {
        GateDecision::Blocked { reasons }
    }
}

fn unsupported_block(support: &SupportSummary<'_>, policy: &GatePolicy) -> Vec<String> {
    let count = support.unsupported.len();
    let mut lines = vec![
        format!("Found {count} unsupported non-SPECULATIVE claim(s)"),
        format!(
            "Unsupported claim rate: {count}/{} = {:.2}%",
            support.non_speculative,
            support.rate() * 100.0
        ),
    ];
    let limit = policy.unsupported_sample_limit;
    for claim in support.unsupported.iter().take(limit) {
        let preview = claim
            .statement()
            .chars()
            .take(STATEMENT_PREVIEW_CHARS)
            .collect::<String>();
        lines.push(format!("  - [{}] {preview}...", claim.claim_label()));
    }
    if count > limit {
        lines.push(format!("  ... and {} more", count - limit));
    }
    lines
}

/// Validate and decide with the default policy.
pub fn can_finalize(report: &ScientificReport) -> (bool, Vec<String>) {
    let structure = validate(report);
    let decision = decide(report, &structure, &GatePolicy::default());
    (decision.is_final_eligible(), decision.into_reasons())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::parse_report;
    use serde_json::json;

    fn report(wire: serde_json::Value) -> ScientificReport {
        parse_report(&wire).expect("fixture report must parse")
    }

    #[test]
    fn empty_report_is_blocked_with_checklist() {
        let (allowed, reasons) =
            can_finalize(&report(json!({"claims": [], "steps": [], "evidence": []})));
        assert!(!allowed);
        insta::assert_snapshot!(reasons.join("\n"), @r"
        No claims extracted - cannot finalize
        Checklist:
          - Provide derivation steps with explicit claims
          - OR provide equations/identities to verify
          - OR provide source attributions/citations
          - OR explicitly state 'no derivation possible yet' with explanation
        ");
    }

    #[test]
    fn supported_report_is_final_eligible() {
        let (allowed, reasons) = can_finalize(&report(json!({
            "claims": [{"claim_id": "c-1", "statement": "x = 1", "claim_label": "DERIVED", "evidence_ids": ["ev-1"]}],
            "steps": [{"step_id": "s-1", "claim_ids": ["c-1"], "step_status": "CHECKED", "depends_on": []}],
            "evidence": [{
                "evidence_id": "ev-1",
                "evidence_type": "derivation",
                "source": {"kind": "step_id", "value": "s-1"},
                "status": "pass",
                "payload_ref": {"kind": "log_id", "value": "log-1"}
            }]
        })));
        assert!(allowed);
        assert!(reasons.is_empty());
    }

    #[test]
    fn dangling_evidence_counts_as_unsupported() {
        let document = report(json!({
            "claims": [
                {"claim_id": "c-1", "statement": "x = 1", "claim_label": "DERIVED", "evidence_ids": ["ev-gone"]},
                {"claim_id": "c-2", "statement": "maybe", "claim_label": "SPECULATIVE", "evidence_ids": [], "verify_falsify": "check it"}
            ],
            "steps": [{"step_id": "s-1", "claim_ids": ["c-1", "c-2"], "step_status": "CHECKED", "depends_on": []}],
            "evidence": []
        }));
        let support = support_summary(&document);
        assert_eq!(support.non_speculative, 1);
        assert_eq!(support.unsupported.len(), 1);
        assert_eq!(unsupported_claim_rate(&document), 1.0);

        let (allowed, reasons) = can_finalize(&document);
        assert!(!allowed);
        assert_eq!(
            reasons,
            vec![
                "[dangling-evidence-id] claim c-1 references non-existent evidence_id: ev-gone",
                "Found 1 unsupported non-SPECULATIVE claim(s)",
                "Unsupported claim rate: 1/1 = 100.00%",
                "  - [DERIVED] x = 1...",
            ]
        );
    }

    #[test]
    fn rate_is_zero_without_non_speculative_claims() {
        let document = report(json!({
            "claims": [{"claim_id": "c-1", "statement": "maybe", "claim_label": "SPECULATIVE", "evidence_ids": [], "verify_falsify": "check it"}],
            "steps": [{"step_id": "s-1", "claim_ids": ["c-1"], "step_status": "UNCHECKED", "depends_on": []}],
            "evidence": []
        }));
        assert_eq!(unsupported_claim_rate(&document), 0.0);
        assert!(can_finalize(&document).0);
    }

    #[test]
    fn unsupported_samples_respect_policy_limit_and_truncate() {
        let long = "a".repeat(100);
        let claims = (0..4)
            .map(|i| {
                json!({
                    "claim_id": format!("c-{i}"),
                    "statement": long,
                    "claim_label": "COMPUTED",
                    "evidence_ids": []
                })
            })
            .collect::<Vec<_>>();
        let document = report(json!({
            "claims": claims,
            "steps": [{"step_id": "s-1", "claim_ids": ["c-0", "c-1", "c-2", "c-3"], "step_status": "CHECKED", "depends_on": []}],
            "evidence": []
        }));
        let structure = validate(&document);
        let decision = decide(
            &document,
            &structure,
            &GatePolicy {
                unsupported_sample_limit: 2,
            },
        );
        let reasons = decision.reasons();
        let tail = &reasons[reasons.len() - 5..];
        assert_eq!(tail[0], "Found 4 unsupported non-SPECULATIVE claim(s)");
        assert_eq!(tail[1], "Unsupported claim rate: 4/4 = 100.00%");
        assert_eq!(tail[2], format!("  - [COMPUTED] {}...", "a".repeat(80)));
        assert_eq!(tail[4], "  ... and 2 more");
    }

    #[test]
    fn decision_serializes_with_outcome_tag() {
        let blocked = GateDecision::Blocked {
            reasons: vec!["[orphan-claim] x".to_string()],
        };
        assert_eq!(
            serde_json::to_value(&blocked).unwrap(),
            json!({"outcome": "BLOCKED", "reasons": ["[orphan-claim] x"]})
        );
        assert_eq!(
            serde_json::to_value(GateDecision::FinalEligible).unwrap(),
            json!({"outcome": "FINAL_ELIGIBLE"})
        );
    }
}
