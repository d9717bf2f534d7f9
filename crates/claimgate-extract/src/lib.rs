//! Claim-candidate extraction for claimgate.
//!
//! Turns prose and LaTeX into [`ClaimDraft`]s with a suggested label. Drafts
//! carry no evidence; promoting one goes through the kernel's `Claim`
//! constructor like any other claim.

pub mod draft;
pub mod extractor;

pub use draft::{ClaimDraft, DraftError};
pub use extractor::{LEAK_PHRASES, extract_claims, extract_from_latex, extract_from_text};
