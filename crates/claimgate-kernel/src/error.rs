//! Error types for the two immediate-failure tiers: wire parsing and
//! entity construction. Structural findings are not errors; see
//! [`crate::structure`].

use crate::token::TokenFault;
use serde_json::Value;
use std::collections::BTreeSet;

pub const CATEGORY_WRONG_TYPE: &str = "wrong-type";
pub const CATEGORY_MISSING_FIELD: &str = "missing-field";
pub const CATEGORY_UNKNOWN_FIELD: &str = "unknown-field";
pub const CATEGORY_DUPLICATE_ENTRY: &str = "duplicate-entry";
pub const CATEGORY_INVALID_CLAIM_SPAN: &str = "invalid-claim-span";

/// A local invariant that prevented an entity from being constructed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    #[error("claim {claim_id}: statement must be non-empty after trimming whitespace")]
    BlankStatement { claim_id: String },

    #[error("claim {claim_id}: verify_falsify, when present, must be non-blank")]
    BlankVerifyFalsify { claim_id: String },

    /// Repeated ids inside one list (`evidence_ids` of a claim, `claim_ids` of a step).
    #[error("{owner}: duplicate {field} entries: {duplicates:?}")]
    DuplicateEntries {
        owner: String,
        field: &'static str,
        duplicates: Vec<String>,
    },

    #[error("step {step_id}: claim_ids cannot be empty")]
    EmptyClaimIds { step_id: String },

    #[error("{owner}: status {status} requires a non-blank status_reason")]
    MissingStatusReason { owner: String, status: &'static str },

    #[error("{owner}: status_reason is forbidden unless status is indeterminate (status={status})")]
    UnexpectedStatusReason { owner: String, status: &'static str },

    #[error(
        "evidence {evidence_id}: evidence_type={evidence_type} requires source.kind={expected}, got {found}"
    )]
    SourceKindMismatch {
        evidence_id: String,
        evidence_type: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("evidence {evidence_id}: notes, when present, must be non-blank")]
    BlankNotes { evidence_id: String },

    /// Repeated ids across a report collection.
    #[error("report: duplicate {field} values: {duplicates:?}")]
    IdCollision {
        field: &'static str,
        duplicates: Vec<String>,
    },
}

impl ModelError {
    /// Stable category code.
    pub fn category(&self) -> &'static str {
        match self {
            ModelError::BlankStatement { .. } => "blank-statement",
            ModelError::BlankVerifyFalsify { .. } => "blank-verify-falsify",
            ModelError::DuplicateEntries { .. } => CATEGORY_DUPLICATE_ENTRY,
            ModelError::EmptyClaimIds { .. } => "empty-claim-ids",
            ModelError::MissingStatusReason { .. } => "missing-status-reason",
            ModelError::UnexpectedStatusReason { .. } => "unexpected-status-reason",
            ModelError::SourceKindMismatch { .. } => "source-kind-mismatch",
            ModelError::BlankNotes { .. } => "blank-notes",
            ModelError::IdCollision { .. } => "id-collision",
        }
    }
}

/// A wire value rejected at the boundary.
///
/// Every variant names the field and renders the offending value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    /// The value failed the token grammar.
    #[error("invalid {field}: {found} {fault}")]
    Token {
        field: &'static str,
        found: String,
        fault: TokenFault,
    },

    /// A well-formed token that is not a member of a closed set.
    #[error(
        "invalid {field}: {found} (must be one of: {expected}, case-sensitive){}",
        hint_suffix(.hint)
    )]
    NotAMember {
        field: &'static str,
        category: &'static str,
        found: String,
        expected: String,
        hint: Option<&'static str>,
    },

    /// Tagged union with a missing, mistyped, or unrecognized `kind`.
    #[error("invalid {field} kind: {found} (must be one of: {expected})")]
    UnknownKind {
        field: &'static str,
        category: &'static str,
        found: String,
        expected: String,
    },

    /// Tagged union whose `value` failed the token grammar.
    #[error("invalid {field} value: {found} {fault}")]
    MalformedValue {
        field: &'static str,
        category: &'static str,
        found: String,
        fault: TokenFault,
    },

    #[error("invalid {field}: expected {expected}, got {found}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
        found: &'static str,
    },

    #[error("invalid {field}: missing required field `{key}`")]
    MissingField {
        field: &'static str,
        key: &'static str,
    },

    #[error("invalid {field}: unknown field `{key}`")]
    UnknownField { field: &'static str, key: String },

    #[error("invalid {field}: duplicate entries found: {duplicates:?}")]
    DuplicateEntries {
        field: &'static str,
        duplicates: Vec<String>,
    },

    #[error("invalid claim_span: {found} (expected [start, end] of two non-negative integers)")]
    InvalidClaimSpan { found: String },

    /// Context wrapper: where inside a list or object the failure happened.
    #[error("{path}: {source}")]
    At {
        path: String,
        #[source]
        source: Box<WireError>,
    },

    #[error(transparent)]
    Model(#[from] ModelError),
}

impl WireError {
    pub(crate) fn token(field: &'static str, wire: &Value, fault: TokenFault) -> Self {
        WireError::Token {
            field,
            found: render(wire),
            fault,
        }
    }

    pub(crate) fn at(path: impl Into<String>, source: WireError) -> Self {
        WireError::At {
            path: path.into(),
            source: Box::new(source),
        }
    }

    /// Stable category code of the innermost failure.
    pub fn category(&self) -> &'static str {
        match self {
            WireError::Token { fault, .. } => fault.code(),
            WireError::NotAMember { category, .. }
            | WireError::UnknownKind { category, .. }
            | WireError::MalformedValue { category, .. } => category,
            WireError::WrongType { .. } => CATEGORY_WRONG_TYPE,
            WireError::MissingField { .. } => CATEGORY_MISSING_FIELD,
            WireError::UnknownField { .. } => CATEGORY_UNKNOWN_FIELD,
            WireError::DuplicateEntries { .. } => CATEGORY_DUPLICATE_ENTRY,
            WireError::InvalidClaimSpan { .. } => CATEGORY_INVALID_CLAIM_SPAN,
            WireError::At { source, .. } => source.category(),
            WireError::Model(model) => model.category(),
        }
    }

    /// The token-grammar fault behind this error, if any.
    pub fn token_fault(&self) -> Option<&TokenFault> {
        match self {
            WireError::Token { fault, .. } | WireError::MalformedValue { fault, .. } => Some(fault),
            WireError::At { source, .. } => source.token_fault(),
            _ => None,
        }
    }

    /// Dotted/indexed location of the innermost failure, if wrapped.
    pub fn path(&self) -> Option<String> {
        let WireError::At { path, source } = self else {
            return None;
        };
        match source.path() {
            Some(inner) => Some(format!("{path}.{inner}")),
            None => Some(path.clone()),
        }
    }
}

fn hint_suffix(hint: &Option<&'static str>) -> String {
    match hint {
        Some(canonical) => format!("; did you mean {canonical}?"),
        None => String::new(),
    }
}

/// Render a wire value for an error message without altering it.
pub(crate) fn render(wire: &Value) -> String {
    match wire {
        Value::String(s) => format!("{s:?}"),
        other => other.to_string(),
    }
}

/// Values that occur more than once, in order of first repetition.
pub(crate) fn duplicate_values<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = BTreeSet::new();
    let mut reported = BTreeSet::new();
    let mut duplicates = Vec::new();
    for value in values {
        if !seen.insert(value) && reported.insert(value) {
            duplicates.push(value.to_string());
        }
    }
    duplicates
}
