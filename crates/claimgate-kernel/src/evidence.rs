//! Evidence objects and their tagged-union references.

use crate::error::ModelError;
use crate::token::{Token, is_blank};
use serde::Serialize;

crate::wire::wire_enum! {
    pub enum EvidenceType ("evidence_type", "invalid-evidence-type") {
        Derivation => "derivation",
        Computation => "computation",
        Citation => "citation",
    }
}

crate::wire::wire_enum! {
    pub enum EvidenceStatus ("status", "invalid-evidence-status") {
        Pass => "pass",
        Fail => "fail",
        Indeterminate => "indeterminate",
    }
}

crate::wire::wire_enum! {
    /// Why an evidence check came back indeterminate.
    pub enum IndeterminateReason ("status_reason", "invalid-status-reason") {
        Unsupported => "unsupported",
        Domain => "domain",
        Singularity => "singularity",
        Timeout => "timeout",
        /// Missing boundary or initial conditions.
        MissingBcIc => "missing_bc_ic",
        ToolError => "tool_error",
    }
}

crate::wire::wire_enum! {
    pub enum SourceKind ("source.kind", "invalid-source-kind") {
        StepId => "step_id",
        ToolRunId => "tool_run_id",
        CitationId => "citation_id",
    }
}

crate::wire::wire_enum! {
    pub enum PayloadKind ("payload_ref.kind", "invalid-payload-kind") {
        LogId => "log_id",
        SnippetRef => "snippet_ref",
        ExpressionRef => "expression_ref",
    }
}

impl EvidenceType {
    /// The only source kind each evidence type may cite.
    pub fn expected_source_kind(self) -> SourceKind {
        match self {
            EvidenceType::Derivation => SourceKind::StepId,
            EvidenceType::Computation => SourceKind::ToolRunId,
            EvidenceType::Citation => SourceKind::CitationId,
        }
    }
}

/// Where a piece of evidence came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum EvidenceSource {
    StepId(Token),
    ToolRunId(Token),
    CitationId(Token),
}

impl EvidenceSource {
    pub fn new(kind: SourceKind, value: Token) -> Self {
        match kind {
            SourceKind::StepId => EvidenceSource::StepId(value),
            SourceKind::ToolRunId => EvidenceSource::ToolRunId(value),
            SourceKind::CitationId => EvidenceSource::CitationId(value),
        }
    }

    pub fn kind(&self) -> SourceKind {
        match self {
            EvidenceSource::StepId(_) => SourceKind::StepId,
            EvidenceSource::ToolRunId(_) => SourceKind::ToolRunId,
            EvidenceSource::CitationId(_) => SourceKind::CitationId,
        }
    }

    pub fn value(&self) -> &Token {
        match self {
            EvidenceSource::StepId(v)
            | EvidenceSource::ToolRunId(v)
            | EvidenceSource::CitationId(v) => v,
        }
    }
}

/// Where the evidence payload can be found. Opaque to the kernel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PayloadRef {
    LogId(Token),
    SnippetRef(Token),
    ExpressionRef(Token),
}

impl PayloadRef {
    pub fn new(kind: PayloadKind, value: Token) -> Self {
        match kind {
            PayloadKind::LogId => PayloadRef::LogId(value),
            PayloadKind::SnippetRef => PayloadRef::SnippetRef(value),
            PayloadKind::ExpressionRef => PayloadRef::ExpressionRef(value),
        }
    }

    pub fn kind(&self) -> PayloadKind {
        match self {
            PayloadRef::LogId(_) => PayloadKind::LogId,
            PayloadRef::SnippetRef(_) => PayloadKind::SnippetRef,
            PayloadRef::ExpressionRef(_) => PayloadKind::ExpressionRef,
        }
    }

    pub fn value(&self) -> &Token {
        match self {
            PayloadRef::LogId(v) | PayloadRef::SnippetRef(v) | PayloadRef::ExpressionRef(v) => v,
        }
    }
}

#[derive(Debug, Clone)]
pub struct EvidenceFields {
    pub evidence_id: Token,
    pub evidence_type: EvidenceType,
    pub source: EvidenceSource,
    pub status: EvidenceStatus,
    pub payload_ref: PayloadRef,
    pub status_reason: Option<IndeterminateReason>,
    pub notes: Option<String>,
}

/// A validated evidence object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EvidenceObject {
    evidence_id: Token,
    evidence_type: EvidenceType,
    source: EvidenceSource,
    status: EvidenceStatus,
    payload_ref: PayloadRef,
    #[serde(skip_serializing_if = "Option::is_none")]
    status_reason: Option<IndeterminateReason>,
    #[serde(skip_serializing_if = "Option::is_none")]
    notes: Option<String>,
}

impl EvidenceObject {
    /// Smart constructor: type/source-kind alignment, status/reason pairing,
    /// and non-blank notes.
    pub fn new(fields: EvidenceFields) -> Result<Self, ModelError> {
        let EvidenceFields {
            evidence_id,
            evidence_type,
            source,
            status,
            payload_ref,
            status_reason,
            notes,
        } = fields;

        let expected = evidence_type.expected_source_kind();
        if source.kind() != expected {
            return Err(ModelError::SourceKindMismatch {
                evidence_id: evidence_id.to_string(),
                evidence_type: evidence_type.as_str(),
                expected: expected.as_str(),
                found: source.kind().as_str(),
            });
        }
        match (status, status_reason) {
            (EvidenceStatus::Indeterminate, None) => {
                return Err(ModelError::MissingStatusReason {
                    owner: format!("evidence {evidence_id}"),
                    status: status.as_str(),
                });
            }
            (EvidenceStatus::Pass | EvidenceStatus::Fail, Some(_)) => {
                return Err(ModelError::UnexpectedStatusReason {
                    owner: format!("evidence {evidence_id}"),
                    status: status.as_str(),
                });
            }
            _ => {}
        }
        if notes.as_deref().is_some_and(is_blank) {
            return Err(ModelError::BlankNotes {
                evidence_id: evidence_id.to_string(),
            });
        }

        Ok(Self {
            evidence_id,
            evidence_type,
            source,
            status,
            payload_ref,
            status_reason,
            notes,
        })
    }

    pub fn evidence_id(&self) -> &Token {
        &self.evidence_id
    }

    pub fn evidence_type(&self) -> EvidenceType {
        self.evidence_type
    }

    pub fn source(&self) -> &EvidenceSource {
        &self.source
    }

    pub fn status(&self) -> EvidenceStatus {
        self.status
    }

    pub fn payload_ref(&self) -> &PayloadRef {
        &self.payload_ref
    }

    pub fn status_reason(&self) -> Option<IndeterminateReason> {
        self.status_reason
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}
