//! Claim drafts: extraction output that has not been admitted to a report.

use claimgate_kernel::claim::{Claim, ClaimLabel, ClaimSpan};
use claimgate_kernel::error::ModelError;
use claimgate_kernel::token::Token;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DraftError {
    #[error("claim draft statement must be non-empty after trimming whitespace")]
    BlankStatement,
}

/// A candidate claim with a suggested label. Becomes a [`Claim`] only
/// through [`ClaimDraft::to_claim`], which runs the kernel constructor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClaimDraft {
    statement: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    claim_span: Option<ClaimSpan>,
    suggested_label: ClaimLabel,
}

impl ClaimDraft {
    pub fn new(
        statement: impl Into<String>,
        claim_span: Option<ClaimSpan>,
        suggested_label: ClaimLabel,
    ) -> Result<Self, DraftError> {
        let statement = statement.into();
        if statement.trim().is_empty() {
            return Err(DraftError::BlankStatement);
        }
        Ok(Self {
            statement,
            claim_span,
            suggested_label,
        })
    }

    pub fn statement(&self) -> &str {
        &self.statement
    }

    pub fn claim_span(&self) -> Option<ClaimSpan> {
        self.claim_span
    }

    pub fn suggested_label(&self) -> ClaimLabel {
        self.suggested_label
    }

    /// Promote to a claim with a generated id and no evidence attached.
    pub fn to_claim(&self, step_id: Option<Token>) -> Result<Claim, ModelError> {
        Claim::create(
            self.statement.clone(),
            self.suggested_label,
            step_id,
            self.claim_span,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_statement() {
        assert_eq!(
            ClaimDraft::new(" \n", None, ClaimLabel::Derived).unwrap_err(),
            DraftError::BlankStatement
        );
    }

    #[test]
    fn to_claim_carries_label_span_and_step() {
        let draft = ClaimDraft::new("F = ma", Some((2, 8)), ClaimLabel::Derived).unwrap();
        let step = Token::parse("step-1").unwrap();
        let claim = draft.to_claim(Some(step.clone())).unwrap();
        assert_eq!(claim.statement(), "F = ma");
        assert_eq!(claim.claim_label(), ClaimLabel::Derived);
        assert_eq!(claim.claim_span(), Some((2, 8)));
        assert_eq!(claim.step_id(), Some(&step));
        assert!(claim.evidence_ids().is_empty());
    }

    #[test]
    fn serializes_camel_case() {
        let draft = ClaimDraft::new("x = 1", None, ClaimLabel::Speculative).unwrap();
        assert_eq!(
            serde_json::to_value(&draft).unwrap(),
            serde_json::json!({"statement": "x = 1", "suggestedLabel": "SPECULATIVE"})
        );
    }
}
