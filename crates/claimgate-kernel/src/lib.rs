//! # Claimgate Kernel
//!
//! Fail-closed validation of scientific-report claim graphs: claims,
//! the derivation steps that own them, and the evidence they cite.
//!
//! Nothing is inferred and nothing is normalized. A wire string that is not
//! already canonical is rejected, never trimmed or case-folded; a report
//! with any structural finding is never eligible for FINAL.
//!
//! ## Architecture
//!
//! ```text
//! serde_json::Value      ← untrusted wire input
//!     │
//! token                  ← grammar: ASCII, exact, no invisible/boundary whitespace
//!     │
//! wire                   ← one parser per field kind; the only way in
//!     │
//! claim / step /         ← smart constructors re-check local invariants
//! evidence / report
//!     │
//! structure              ← graph-wide rules, every finding collected
//!     │
//! gate                   ← FINAL-ELIGIBLE | BLOCKED(reasons)
//! ```
//!
//! Data flows one way; no stage mutates the report.

pub mod claim;
pub mod error;
pub mod evidence;
pub mod gate;
pub mod report;
pub mod step;
pub mod structure;
pub mod token;
pub mod wire;

pub use claim::{Claim, ClaimFields, ClaimLabel, ClaimSpan};
pub use error::{ModelError, WireError};
pub use evidence::{
    EvidenceFields, EvidenceObject, EvidenceSource, EvidenceStatus, EvidenceType,
    IndeterminateReason, PayloadKind, PayloadRef, SourceKind,
};
pub use gate::{GateDecision, GatePolicy, SupportSummary, can_finalize, decide, support_summary};
pub use report::ScientificReport;
pub use step::{DerivationStep, StepFields, StepStatus};
pub use structure::{Finding, StructureReport, validate};
pub use token::{Token, TokenClass, TokenFault, is_valid_token};
pub use wire::{WireEnum, parse_report};
