//! Graph-level validation across claims, steps, and evidence.
//!
//! Every rule runs over the whole report and every violation becomes a
//! [`Finding`]; nothing stops at the first. Findings are ordered by rule,
//! then by document order within a rule, so output is stable for a given
//! input.
//!
//! Cycles in `depends_on` are not detected. Only dangling dependencies are.

use crate::report::ScientificReport;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

pub const STRUCTURE_CHECK_KIND: &str = "claimgate.structure.check.v1";

pub const FAILURE_CLASS_MISSING_EVIDENCE: &str = "missing-evidence";
pub const FAILURE_CLASS_MISSING_VERIFY_FALSIFY: &str = "missing-verify-falsify";
pub const FAILURE_CLASS_DANGLING_EVIDENCE_ID: &str = "dangling-evidence-id";
pub const FAILURE_CLASS_DANGLING_CLAIM_ID: &str = "dangling-claim-id";
pub const FAILURE_CLASS_ORPHAN_CLAIM: &str = "orphan-claim";
pub const FAILURE_CLASS_DUPLICATE_CLAIM_OWNER: &str = "duplicate-claim-owner";
pub const FAILURE_CLASS_DANGLING_STEP_DEPENDENCY: &str = "dangling-step-dependency";

/// Rule order; also the order findings are emitted in.
pub const RULES: [&str; 7] = [
    FAILURE_CLASS_MISSING_EVIDENCE,
    FAILURE_CLASS_MISSING_VERIFY_FALSIFY,
    FAILURE_CLASS_DANGLING_EVIDENCE_ID,
    FAILURE_CLASS_DANGLING_CLAIM_ID,
    FAILURE_CLASS_ORPHAN_CLAIM,
    FAILURE_CLASS_DUPLICATE_CLAIM_OWNER,
    FAILURE_CLASS_DANGLING_STEP_DEPENDENCY,
];

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub category: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claim_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub evidence_id: Option<String>,
}

impl Finding {
    fn new(category: &str, message: String) -> Self {
        Self {
            category: category.to_string(),
            message,
            claim_id: None,
            step_id: None,
            evidence_id: None,
        }
    }

    fn claim(mut self, claim_id: &str) -> Self {
        self.claim_id = Some(claim_id.to_string());
        self
    }

    fn step(mut self, step_id: &str) -> Self {
        self.step_id = Some(step_id.to_string());
        self
    }

    fn evidence(mut self, evidence_id: &str) -> Self {
        self.evidence_id = Some(evidence_id.to_string());
        self
    }
}

impl std::fmt::Display for Finding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.category, self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureSummary {
    pub claim_count: usize,
    pub step_count: usize,
    pub evidence_count: usize,
    pub finding_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureReport {
    pub check_kind: String,
    pub result: String,
    pub failure_classes: Vec<String>,
    pub findings: Vec<Finding>,
    pub summary: StructureSummary,
}

impl StructureReport {
    pub fn is_valid(&self) -> bool {
        self.result == "accepted"
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.failure_classes.iter().any(|c| c == class)
    }
}

pub fn validate(report: &ScientificReport) -> StructureReport {
    let mut findings = Vec::new();
    check_evidence_requirement(report, &mut findings);
    check_speculative_requirement(report, &mut findings);
    check_evidence_resolution(report, &mut findings);
    check_claim_references(report, &mut findings);
    check_orphans(report, &mut findings);
    check_unique_ownership(report, &mut findings);
    check_step_dependencies(report, &mut findings);

    let failure_classes = findings
        .iter()
        .map(|f| f.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect::<Vec<_>>();
    let result = if findings.is_empty() {
        "accepted"
    } else {
        "rejected"
    };
    let summary = StructureSummary {
        claim_count: report.claims().len(),
        step_count: report.steps().len(),
        evidence_count: report.evidence().len(),
        finding_count: findings.len(),
    };
    debug!(
        result,
        findings = summary.finding_count,
        claims = summary.claim_count,
        steps = summary.step_count,
        "structure check complete"
    );

    StructureReport {
        check_kind: STRUCTURE_CHECK_KIND.to_string(),
        result: result.to_string(),
        failure_classes,
        findings,
        summary,
    }
}

fn check_evidence_requirement(report: &ScientificReport, findings: &mut Vec<Finding>) {
    for claim in report.claims() {
        if !claim.is_speculative() && claim.evidence_ids().is_empty() {
            findings.push(
                Finding::new(
                    FAILURE_CLASS_MISSING_EVIDENCE,
                    format!(
                        "claim {} (label={}) must have at least one evidence_id",
                        claim.claim_id(),
                        claim.claim_label()
                    ),
                )
                .claim(claim.claim_id()),
            );
        }
    }
}

fn check_speculative_requirement(report: &ScientificReport, findings: &mut Vec<Finding>) {
    for claim in report.claims() {
        let has_test = claim
            .verify_falsify()
            .is_some_and(|text| !text.trim().is_empty());
        if claim.is_speculative() && !has_test {
            findings.push(
                Finding::new(
                    FAILURE_CLASS_MISSING_VERIFY_FALSIFY,
                    format!(
                        "claim {} (label=SPECULATIVE) must have a non-empty verify_falsify",
                        claim.claim_id()
                    ),
                )
                .claim(claim.claim_id()),
            );
        }
    }
}

fn check_evidence_resolution(report: &ScientificReport, findings: &mut Vec<Finding>) {
    for claim in report.claims() {
        for evidence_id in claim.evidence_ids() {
            if report.evidence_object(evidence_id).is_none() {
                findings.push(
                    Finding::new(
                        FAILURE_CLASS_DANGLING_EVIDENCE_ID,
                        format!(
                            "claim {} references non-existent evidence_id: {}",
                            claim.claim_id(),
                            evidence_id
                        ),
                    )
                    .claim(claim.claim_id())
                    .evidence(evidence_id),
                );
            }
        }
    }
}

fn check_claim_references(report: &ScientificReport, findings: &mut Vec<Finding>) {
    for step in report.steps() {
        for claim_id in step.claim_ids() {
            if report.claim(claim_id).is_none() {
                findings.push(
                    Finding::new(
                        FAILURE_CLASS_DANGLING_CLAIM_ID,
                        format!(
                            "step {} references non-existent claim_id: {}",
                            step.step_id(),
                            claim_id
                        ),
                    )
                    .step(step.step_id())
                    .claim(claim_id),
                );
            }
        }
    }
}

fn check_orphans(report: &ScientificReport, findings: &mut Vec<Finding>) {
    let referenced = report
        .steps()
        .iter()
        .flat_map(|s| s.claim_ids().iter().map(|c| c.as_str()))
        .collect::<BTreeSet<_>>();
    for claim in report.claims() {
        if !referenced.contains(claim.claim_id().as_str()) {
            findings.push(
                Finding::new(
                    FAILURE_CLASS_ORPHAN_CLAIM,
                    format!("claim {} is not referenced by any step", claim.claim_id()),
                )
                .claim(claim.claim_id()),
            );
        }
    }
}

fn check_unique_ownership(report: &ScientificReport, findings: &mut Vec<Finding>) {
    // claim_id -> owning step ids, keyed in order of first appearance.
    let mut first_seen = Vec::new();
    let mut owners: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for step in report.steps() {
        for claim_id in step.claim_ids() {
            let entry = owners.entry(claim_id.as_str()).or_default();
            if entry.is_empty() {
                first_seen.push(claim_id.as_str());
            }
            entry.push(step.step_id().as_str());
        }
    }
    for claim_id in first_seen {
        let steps = &owners[claim_id];
        if steps.len() > 1 {
            findings.push(
                Finding::new(
                    FAILURE_CLASS_DUPLICATE_CLAIM_OWNER,
                    format!(
                        "claim {claim_id} is owned by multiple steps: {}",
                        steps.join(", ")
                    ),
                )
                .claim(claim_id),
            );
        }
    }
}

fn check_step_dependencies(report: &ScientificReport, findings: &mut Vec<Finding>) {
    for step in report.steps() {
        for dependency in step.depends_on() {
            if report.step(dependency).is_none() {
                findings.push(
                    Finding::new(
                        FAILURE_CLASS_DANGLING_STEP_DEPENDENCY,
                        format!(
                            "step {} depends on non-existent step_id: {}",
                            step.step_id(),
                            dependency
                        ),
                    )
                    .step(step.step_id()),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::parse_report;
    use serde_json::json;

    fn report(wire: serde_json::Value) -> ScientificReport {
        parse_report(&wire).expect("fixture report must parse")
    }

    fn evidence(id: &str, step_id: &str) -> serde_json::Value {
        json!({
            "evidence_id": id,
            "evidence_type": "derivation",
            "source": {"kind": "step_id", "value": step_id},
            "status": "pass",
            "payload_ref": {"kind": "log_id", "value": format!("log-{id}")}
        })
    }

    #[test]
    fn clean_report_is_accepted() {
        let checked = validate(&report(json!({
            "claims": [{"claim_id": "c-1", "statement": "x = 1", "claim_label": "DERIVED", "evidence_ids": ["ev-1"]}],
            "steps": [{"step_id": "s-1", "claim_ids": ["c-1"], "step_status": "CHECKED", "depends_on": []}],
            "evidence": [evidence("ev-1", "s-1")]
        })));
        assert!(checked.is_valid());
        assert!(checked.findings.is_empty());
        assert!(checked.failure_classes.is_empty());
        assert_eq!(checked.check_kind, STRUCTURE_CHECK_KIND);
    }

    #[test]
    fn duplicate_owner_is_a_finding_not_a_parse_error() {
        let checked = validate(&report(json!({
            "claims": [{"claim_id": "claim-1", "statement": "x = 1", "claim_label": "DERIVED", "evidence_ids": ["ev-1"]}],
            "steps": [
                {"step_id": "A", "claim_ids": ["claim-1"], "step_status": "CHECKED", "depends_on": []},
                {"step_id": "B", "claim_ids": ["claim-1"], "step_status": "CHECKED", "depends_on": ["A"]}
            ],
            "evidence": [evidence("ev-1", "A")]
        })));
        assert!(!checked.is_valid());
        assert_eq!(
            checked.failure_classes,
            vec![FAILURE_CLASS_DUPLICATE_CLAIM_OWNER.to_string()]
        );
        let finding = &checked.findings[0];
        assert_eq!(finding.claim_id.as_deref(), Some("claim-1"));
        assert_eq!(
            finding.message,
            "claim claim-1 is owned by multiple steps: A, B"
        );
    }

    #[test]
    fn speculative_claim_without_evidence_is_clean() {
        let checked = validate(&report(json!({
            "claims": [{
                "claim_id": "c-1",
                "statement": "the series probably converges",
                "claim_label": "SPECULATIVE",
                "evidence_ids": [],
                "verify_falsify": "compute partial sums to n = 10^6"
            }],
            "steps": [{"step_id": "s-1", "claim_ids": ["c-1"], "step_status": "UNCHECKED", "depends_on": []}],
            "evidence": []
        })));
        assert!(checked.is_valid(), "{:?}", checked.findings);
        assert!(!checked.has_class(FAILURE_CLASS_MISSING_EVIDENCE));
    }

    #[test]
    fn every_independent_violation_is_reported() {
        let checked = validate(&report(json!({
            "claims": [
                {"claim_id": "c-1", "statement": "x = 1", "claim_label": "COMPUTED", "evidence_ids": []},
                {"claim_id": "c-2", "statement": "maybe y", "claim_label": "SPECULATIVE", "evidence_ids": []},
                {"claim_id": "c-3", "statement": "z = 3", "claim_label": "CITED", "evidence_ids": ["ev-missing"]},
                {"claim_id": "c-4", "statement": "w = 4", "claim_label": "DERIVED", "evidence_ids": ["ev-1"]}
            ],
            "steps": [
                {"step_id": "s-1", "claim_ids": ["c-1", "c-ghost"], "step_status": "CHECKED", "depends_on": ["s-ghost"]},
                {"step_id": "s-2", "claim_ids": ["c-1", "c-2", "c-3"], "step_status": "CHECKED", "depends_on": ["s-1"]}
            ],
            "evidence": [evidence("ev-1", "s-1")]
        })));

        let categories = checked
            .findings
            .iter()
            .map(|f| f.category.as_str())
            .collect::<Vec<_>>();
        assert_eq!(categories, RULES.to_vec());
        assert_eq!(checked.summary.finding_count, 7);
        assert_eq!(checked.failure_classes.len(), 7);
        assert_eq!(checked.findings[4].claim_id.as_deref(), Some("c-4"));
        assert_eq!(
            checked.findings[2].evidence_id.as_deref(),
            Some("ev-missing")
        );
    }

    #[test]
    fn validation_is_deterministic() {
        let document = report(json!({
            "claims": [
                {"claim_id": "c-1", "statement": "x = 1", "claim_label": "DERIVED", "evidence_ids": ["ev-a", "ev-b"]}
            ],
            "steps": [],
            "evidence": []
        }));
        let first = validate(&document);
        let second = validate(&document);
        assert_eq!(first, second);
        assert_eq!(first.summary.finding_count, 3);
    }

    #[test]
    fn finding_display_is_bracketed_category_then_message() {
        let finding = Finding::new(
            FAILURE_CLASS_ORPHAN_CLAIM,
            "claim c-9 is not referenced by any step".to_string(),
        );
        assert_eq!(
            finding.to_string(),
            "[orphan-claim] claim c-9 is not referenced by any step"
        );
    }
}
