//! Derivation steps: the units that own claims and depend on each other.

use crate::error::{ModelError, duplicate_values};
use crate::token::{Token, is_blank};
use serde::Serialize;

crate::wire::wire_enum! {
    /// Verification state of a step.
    pub enum StepStatus ("step_status", "invalid-step-status") {
        Unchecked => "UNCHECKED",
        Checked => "CHECKED",
        Failed => "FAILED",
        /// Inconclusive; requires a status_reason.
        Indeterminate => "INDETERMINATE",
    }
}

#[derive(Debug, Clone)]
pub struct StepFields {
    pub step_id: Token,
    pub claim_ids: Vec<Token>,
    pub step_status: StepStatus,
    pub depends_on: Vec<Token>,
    pub status_reason: Option<String>,
}

/// A validated derivation step.
///
/// `claim_ids` are back-references by id; the report owns the claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DerivationStep {
    step_id: Token,
    claim_ids: Vec<Token>,
    step_status: StepStatus,
    depends_on: Vec<Token>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status_reason: Option<String>,
}

impl DerivationStep {
    pub fn new(fields: StepFields) -> Result<Self, ModelError> {
        let StepFields {
            step_id,
            claim_ids,
            step_status,
            depends_on,
            status_reason,
        } = fields;

        if claim_ids.is_empty() {
            return Err(ModelError::EmptyClaimIds {
                step_id: step_id.to_string(),
            });
        }
        let duplicates = duplicate_values(claim_ids.iter().map(Token::as_str));
        if !duplicates.is_empty() {
            return Err(ModelError::DuplicateEntries {
                owner: format!("step {step_id}"),
                field: "claim_ids",
                duplicates,
            });
        }
        if step_status == StepStatus::Indeterminate
            && status_reason.as_deref().is_none_or(is_blank)
        {
            return Err(ModelError::MissingStatusReason {
                owner: format!("step {step_id}"),
                status: step_status.as_str(),
            });
        }

        Ok(Self {
            step_id,
            claim_ids,
            step_status,
            depends_on,
            status_reason,
        })
    }

    /// Build an UNCHECKED step with a generated id.
    pub fn create(claim_ids: Vec<Token>, depends_on: Vec<Token>) -> Result<Self, ModelError> {
        Self::new(StepFields {
            step_id: Token::generate(),
            claim_ids,
            step_status: StepStatus::Unchecked,
            depends_on,
            status_reason: None,
        })
    }

    pub fn step_id(&self) -> &Token {
        &self.step_id
    }

    pub fn claim_ids(&self) -> &[Token] {
        &self.claim_ids
    }

    pub fn step_status(&self) -> StepStatus {
        self.step_status
    }

    pub fn depends_on(&self) -> &[Token] {
        &self.depends_on
    }

    pub fn status_reason(&self) -> Option<&str> {
        self.status_reason.as_deref()
    }
}
