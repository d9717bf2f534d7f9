//! The report document: sole owner of its claims, steps, and evidence.

use crate::claim::Claim;
use crate::error::{ModelError, duplicate_values};
use crate::evidence::EvidenceObject;
use crate::step::DerivationStep;
use crate::token::Token;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScientificReport {
    #[serde(skip_serializing_if = "Option::is_none")]
    report_id: Option<Token>,
    claims: Vec<Claim>,
    steps: Vec<DerivationStep>,
    evidence: Vec<EvidenceObject>,
}

impl ScientificReport {
    /// Build a report, rejecting id collisions within each collection.
    ///
    /// Collections are checked in the order claims, steps, evidence; the
    /// first colliding collection is reported with every repeated id.
    pub fn new(
        claims: Vec<Claim>,
        steps: Vec<DerivationStep>,
        evidence: Vec<EvidenceObject>,
        report_id: Option<Token>,
    ) -> Result<Self, ModelError> {
        check_unique("claim_id", claims.iter().map(|c| c.claim_id().as_str()))?;
        check_unique("step_id", steps.iter().map(|s| s.step_id().as_str()))?;
        check_unique(
            "evidence_id",
            evidence.iter().map(|e| e.evidence_id().as_str()),
        )?;
        Ok(Self {
            report_id,
            claims,
            steps,
            evidence,
        })
    }

    pub fn report_id(&self) -> Option<&Token> {
        self.report_id.as_ref()
    }

    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    pub fn steps(&self) -> &[DerivationStep] {
        &self.steps
    }

    pub fn evidence(&self) -> &[EvidenceObject] {
        &self.evidence
    }

    pub fn claim(&self, claim_id: &str) -> Option<&Claim> {
        self.claims
            .iter()
            .find(|c| c.claim_id().as_str() == claim_id)
    }

    pub fn step(&self, step_id: &str) -> Option<&DerivationStep> {
        self.steps.iter().find(|s| s.step_id().as_str() == step_id)
    }

    pub fn evidence_object(&self, evidence_id: &str) -> Option<&EvidenceObject> {
        self.evidence
            .iter()
            .find(|e| e.evidence_id().as_str() == evidence_id)
    }

    pub fn is_empty(&self) -> bool {
        self.claims.is_empty()
    }
}

fn check_unique<'a>(
    field: &'static str,
    ids: impl IntoIterator<Item = &'a str>,
) -> Result<(), ModelError> {
    let duplicates = duplicate_values(ids);
    if duplicates.is_empty() {
        Ok(())
    } else {
        Err(ModelError::IdCollision { field, duplicates })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::claim::{ClaimFields, ClaimLabel};
    use crate::evidence::{
        EvidenceFields, EvidenceSource, EvidenceStatus, EvidenceType, PayloadKind, PayloadRef,
        SourceKind,
    };
    use crate::step::{StepFields, StepStatus};

    fn token(s: &str) -> Token {
        Token::parse(s).unwrap()
    }

    fn claim(id: &str) -> Claim {
        Claim::new(ClaimFields {
            claim_id: token(id),
            statement: format!("statement of {id}"),
            claim_label: ClaimLabel::Speculative,
            step_id: None,
            evidence_ids: Vec::new(),
            verify_falsify: Some("check numerically".to_string()),
            claim_span: None,
        })
        .unwrap()
    }

    fn step(id: &str, claim_ids: &[&str]) -> DerivationStep {
        DerivationStep::new(StepFields {
            step_id: token(id),
            claim_ids: claim_ids.iter().map(|c| token(c)).collect(),
            step_status: StepStatus::Unchecked,
            depends_on: Vec::new(),
            status_reason: None,
        })
        .unwrap()
    }

    fn evidence(id: &str, step_id: &str) -> EvidenceObject {
        EvidenceObject::new(EvidenceFields {
            evidence_id: token(id),
            evidence_type: EvidenceType::Derivation,
            source: EvidenceSource::new(SourceKind::StepId, token(step_id)),
            status: EvidenceStatus::Pass,
            payload_ref: PayloadRef::new(PayloadKind::LogId, token("log-1")),
            status_reason: None,
            notes: None,
        })
        .unwrap()
    }

    #[test]
    fn rejects_claim_id_collision() {
        let err = ScientificReport::new(
            vec![claim("c-1"), claim("c-2"), claim("c-1")],
            Vec::new(),
            Vec::new(),
            None,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ModelError::IdCollision {
                field: "claim_id",
                duplicates: vec!["c-1".to_string()],
            }
        );
        assert_eq!(err.category(), "id-collision");
    }

    #[test]
    fn rejects_step_id_collision() {
        let err = ScientificReport::new(
            vec![claim("c-1"), claim("c-2")],
            vec![step("s-1", &["c-1"]), step("s-1", &["c-2"])],
            Vec::new(),
            None,
        )
        .unwrap_err();
        assert!(err.to_string().contains("duplicate step_id values"));
    }

    #[test]
    fn rejects_evidence_id_collision() {
        let err = ScientificReport::new(
            vec![claim("c-1")],
            vec![step("s-1", &["c-1"]), step("s-2", &["c-1"])],
            vec![evidence("ev-1", "s-1"), evidence("ev-1", "s-2")],
            None,
        )
        .unwrap_err();
        assert_eq!(
            err,
            ModelError::IdCollision {
                field: "evidence_id",
                duplicates: vec!["ev-1".to_string()],
            }
        );
    }

    #[test]
    fn lookups_resolve_by_id() {
        let report = ScientificReport::new(
            vec![claim("c-1")],
            vec![step("s-1", &["c-1"])],
            vec![evidence("ev-1", "s-1")],
            Some(token("r-1")),
        )
        .unwrap();
        assert_eq!(report.report_id().map(Token::as_str), Some("r-1"));
        assert!(report.claim("c-1").is_some());
        assert!(report.step("s-1").is_some());
        assert!(report.evidence_object("ev-1").is_some());
        assert!(report.evidence_object("ev-2").is_none());
        assert!(!report.is_empty());
    }
}
