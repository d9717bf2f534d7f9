//! Claim: one assertion in a report, labeled by how it is supported.

use crate::error::{ModelError, duplicate_values};
use crate::token::{Token, is_blank};
use serde::Serialize;

crate::wire::wire_enum! {
    /// How a claim is supported. Exactly four labels, case-sensitive.
    pub enum ClaimLabel ("claim_label", "invalid-label") {
        /// Derived through logical/mathematical steps.
        Derived => "DERIVED",
        /// Verified through computation or simulation.
        Computed => "COMPUTED",
        /// Attributed to an external source.
        Cited => "CITED",
        /// Not yet verified; must say how it could be verified or falsified.
        Speculative => "SPECULATIVE",
    }
}

/// Character offsets `(start, end)` of a claim in its source text.
pub type ClaimSpan = (usize, usize);

/// Plain field values for [`Claim::new`]. Carries no invariants itself.
#[derive(Debug, Clone)]
pub struct ClaimFields {
    pub claim_id: Token,
    pub statement: String,
    pub claim_label: ClaimLabel,
    pub step_id: Option<Token>,
    pub evidence_ids: Vec<Token>,
    pub verify_falsify: Option<String>,
    pub claim_span: Option<ClaimSpan>,
}

/// A validated claim. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Claim {
    claim_id: Token,
    statement: String,
    claim_label: ClaimLabel,
    #[serde(skip_serializing_if = "Option::is_none")]
    step_id: Option<Token>,
    evidence_ids: Vec<Token>,
    #[serde(skip_serializing_if = "Option::is_none")]
    verify_falsify: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    claim_span: Option<ClaimSpan>,
}

impl Claim {
    /// Smart constructor. Rejects a blank statement, duplicate evidence ids,
    /// and a present-but-blank `verify_falsify`.
    ///
    /// Whether a claim carries the evidence or `verify_falsify` its label
    /// demands is a report-level finding (see [`crate::structure`]), so that
    /// every unsupported claim in a report is reported at once.
    pub fn new(fields: ClaimFields) -> Result<Self, ModelError> {
        let ClaimFields {
            claim_id,
            statement,
            claim_label,
            step_id,
            evidence_ids,
            verify_falsify,
            claim_span,
        } = fields;

        if is_blank(&statement) {
            return Err(ModelError::BlankStatement {
                claim_id: claim_id.to_string(),
            });
        }
        let duplicates = duplicate_values(evidence_ids.iter().map(Token::as_str));
        if !duplicates.is_empty() {
            return Err(ModelError::DuplicateEntries {
                owner: format!("claim {claim_id}"),
                field: "evidence_ids",
                duplicates,
            });
        }
        if verify_falsify.as_deref().is_some_and(is_blank) {
            return Err(ModelError::BlankVerifyFalsify {
                claim_id: claim_id.to_string(),
            });
        }

        Ok(Self {
            claim_id,
            statement,
            claim_label,
            step_id,
            evidence_ids,
            verify_falsify,
            claim_span,
        })
    }

    /// Build a claim with a generated id and no evidence attached yet.
    pub fn create(
        statement: impl Into<String>,
        claim_label: ClaimLabel,
        step_id: Option<Token>,
        claim_span: Option<ClaimSpan>,
    ) -> Result<Self, ModelError> {
        Self::new(ClaimFields {
            claim_id: Token::generate(),
            statement: statement.into(),
            claim_label,
            step_id,
            evidence_ids: Vec::new(),
            verify_falsify: None,
            claim_span,
        })
    }

    pub fn claim_id(&self) -> &Token {
        &self.claim_id
    }

    pub fn statement(&self) -> &str {
        &self.statement
    }

    pub fn claim_label(&self) -> ClaimLabel {
        self.claim_label
    }

    pub fn step_id(&self) -> Option<&Token> {
        self.step_id.as_ref()
    }

    pub fn evidence_ids(&self) -> &[Token] {
        &self.evidence_ids
    }

    pub fn verify_falsify(&self) -> Option<&str> {
        self.verify_falsify.as_deref()
    }

    pub fn claim_span(&self) -> Option<ClaimSpan> {
        self.claim_span
    }

    pub fn is_speculative(&self) -> bool {
        self.claim_label == ClaimLabel::Speculative
    }

    /// Speculative claims are self-supporting; all others need evidence ids.
    pub fn is_supported(&self) -> bool {
        self.is_speculative() || !self.evidence_ids.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(s: &str) -> Token {
        Token::parse(s).unwrap()
    }

    fn fields(statement: &str, label: ClaimLabel) -> ClaimFields {
        ClaimFields {
            claim_id: token("c-1"),
            statement: statement.to_string(),
            claim_label: label,
            step_id: None,
            evidence_ids: vec![token("ev-1")],
            verify_falsify: None,
            claim_span: None,
        }
    }

    #[test]
    fn rejects_blank_statements() {
        for blank in ["", "   ", "\t\t\t", "\n\n"] {
            let err = Claim::new(fields(blank, ClaimLabel::Derived)).unwrap_err();
            assert_eq!(err.category(), "blank-statement");
            assert!(
                err.to_string()
                    .contains("statement must be non-empty after trimming whitespace")
            );
        }
    }

    #[test]
    fn keeps_statement_verbatim() {
        let claim = Claim::new(fields("  E = mc^2 ", ClaimLabel::Derived)).unwrap();
        assert_eq!(claim.statement(), "  E = mc^2 ");
    }

    #[test]
    fn rejects_duplicate_evidence_ids_naming_each() {
        let mut f = fields("x = 1", ClaimLabel::Computed);
        f.evidence_ids = vec![token("a"), token("b"), token("a"), token("b")];
        assert_eq!(
            Claim::new(f).unwrap_err(),
            ModelError::DuplicateEntries {
                owner: "claim c-1".to_string(),
                field: "evidence_ids",
                duplicates: vec!["a".to_string(), "b".to_string()],
            }
        );
    }

    #[test]
    fn rejects_blank_verify_falsify() {
        let mut f = fields("maybe x = 1", ClaimLabel::Speculative);
        f.evidence_ids.clear();
        f.verify_falsify = Some("  ".to_string());
        assert_eq!(
            Claim::new(f).unwrap_err().category(),
            "blank-verify-falsify"
        );
    }

    #[test]
    fn support_depends_on_label() {
        let mut f = fields("x = 1", ClaimLabel::Derived);
        f.evidence_ids.clear();
        assert!(!Claim::new(f.clone()).unwrap().is_supported());
        f.claim_label = ClaimLabel::Speculative;
        assert!(Claim::new(f).unwrap().is_supported());
    }

    #[test]
    fn create_generates_canonical_ids() {
        let a = Claim::create("x = 1", ClaimLabel::Speculative, None, Some((0, 5))).unwrap();
        let b = Claim::create("x = 1", ClaimLabel::Speculative, None, None).unwrap();
        assert_ne!(a.claim_id(), b.claim_id());
        assert!(crate::token::is_valid_token(a.claim_id()));
        assert_eq!(a.claim_span(), Some((0, 5)));
    }

    #[test]
    fn label_display_is_canonical_spelling() {
        assert_eq!(ClaimLabel::Speculative.to_string(), "SPECULATIVE");
        assert_eq!(ClaimLabel::ALL.len(), 4);
    }
}
