//! Heuristic extraction of claim candidates from LaTeX and prose.
//!
//! These are keyword and pattern heuristics, not language understanding.
//! They propose drafts; the kernel decides what is admissible.

use crate::draft::ClaimDraft;
use claimgate_kernel::claim::{ClaimLabel, ClaimSpan};
use regex::Regex;
use std::sync::OnceLock;
use tracing::debug;

/// Phrases that assert without showing work. A sentence containing one is
/// drafted as SPECULATIVE whatever else it says.
pub const LEAK_PHRASES: [&str; 14] = [
    "obviously",
    "clearly",
    "trivially",
    "well-known",
    "well known",
    "by symmetry",
    "by inspection",
    "it is easy to see",
    "it follows that",
    "without loss of generality",
    "WLOG",
    "straightforward",
    "immediate",
    "evident",
];

const DEFINITION_MARKERS: [&str; 7] = [
    "let",
    "define",
    "we define",
    "denote",
    "we denote",
    "set",
    "we set",
];

// Split order matters: ", and " never matches after " and " has split.
const CONJUNCTIONS: [&str; 4] = [" and ", " while ", " whereas ", ", and "];

const DERIVED_KEYWORDS: [&str; 6] = [
    "therefore",
    "thus",
    "hence",
    "implies",
    "follows",
    "derive",
];
const COMPUTED_KEYWORDS: [&str; 5] = [
    "compute",
    "calculate",
    "evaluate",
    "numerical",
    "simulate",
];
/// Regex alternatives for verbs and markers that make a sentence assert something.
const ASSERTION_WORDS: [&str; 19] = [
    "is",
    "are",
    "equals?",
    "becomes?",
    "satisfies?",
    "obeys?",
    "follows?",
    "implies?",
    "yields?",
    "gives?",
    "therefore",
    "thus",
    "hence",
    "so",
    "to be",
    "theorem",
    "lemma",
    "proposition",
    "corollary",
];

const CITED_KEYWORDS: [&str; 7] = [
    "theorem",
    "lemma",
    "proposition",
    "according to",
    "from ref",
    "cite",
    "citation",
];

fn equation_res() -> &'static [Regex] {
    static RES: OnceLock<Vec<Regex>> = OnceLock::new();
    RES.get_or_init(|| {
        [
            r"\$\$[^$]+\$\$",
            r"(?s)\\begin\{equation\}.*?\\end\{equation\}",
            r"(?s)\\begin\{align\}.*?\\end\{align\}",
            r"(?s)\\begin\{eqnarray\}.*?\\end\{eqnarray\}",
            r"\\\[[^\]]+\\\]",
            r"\$[^$]+\$",
        ]
        .iter()
        .map(|pattern| Regex::new(pattern).expect("equation regex must compile"))
        .collect()
    })
}

fn leak_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let alternatives = LEAK_PHRASES
            .iter()
            .map(|phrase| regex::escape(phrase))
            .collect::<Vec<_>>()
            .join("|");
        Regex::new(&format!(r"(?i)\b({alternatives})\b")).expect("leak-phrase regex must compile")
    })
}

fn sentence_break_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.!?]\s+[A-Z]").expect("sentence-break regex must compile"))
}

fn assertion_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        let words = ASSERTION_WORDS.join("|");
        let pattern = format!(r"(?i)\b({words})\b|[=<>≤≥≠≈∝]");
        Regex::new(&pattern).expect("assertion regex must compile")
    })
}

fn relation_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[=<>≤≥≠≈∝]").expect("relation regex must compile"))
}

fn naming_verb_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(be|equal|denote)\b").expect("naming-verb regex must compile"))
}

fn consequence_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\b(then|thus|therefore|hence|so)\b").expect("consequence regex must compile")
    })
}

/// Drafts from every LaTeX block (in order), then from the prose.
pub fn extract_claims<S: AsRef<str>>(text: &str, latex_blocks: &[S]) -> Vec<ClaimDraft> {
    let mut drafts = Vec::new();
    for block in latex_blocks {
        drafts.extend(extract_from_latex(block.as_ref()));
    }
    let latex_count = drafts.len();
    drafts.extend(extract_from_text(text));
    debug!(
        latex = latex_count,
        prose = drafts.len() - latex_count,
        "claim extraction complete"
    );
    drafts
}

/// Equation drafts from one LaTeX block. Patterns run in priority order and
/// a match overlapping an already-consumed span is skipped. Spans are
/// character offsets into the block.
pub fn extract_from_latex(block: &str) -> Vec<ClaimDraft> {
    let mut drafts = Vec::new();
    let mut consumed: Vec<(usize, usize)> = Vec::new();
    for re in equation_res() {
        for m in re.find_iter(block) {
            let (start, end) = (m.start(), m.end());
            if consumed.iter().any(|&(cs, ce)| start < ce && end > cs) {
                continue;
            }
            let equation = m.as_str().trim();
            if !is_substantive_equation(equation) {
                continue;
            }
            let span = char_span(block, start, end);
            if let Some(draft) = draft(equation, Some(span), ClaimLabel::Derived) {
                drafts.push(draft);
                consumed.push((start, end));
            }
        }
    }
    drafts
}

pub fn extract_from_text(text: &str) -> Vec<ClaimDraft> {
    split_sentences(text)
        .into_iter()
        .flat_map(extract_from_sentence)
        .collect()
}

fn extract_from_sentence(sentence: &str) -> Vec<ClaimDraft> {
    if is_question(sentence) || is_pure_definition(sentence) {
        return Vec::new();
    }
    if leak_re().is_match(sentence) {
        return draft(sentence, None, ClaimLabel::Speculative)
            .into_iter()
            .collect();
    }
    if !assertion_re().is_match(sentence) {
        return Vec::new();
    }
    split_multi_claim_sentence(sentence)
        .into_iter()
        .filter_map(|part| draft(part, None, infer_label(part)))
        .collect()
}

/// Split on terminal punctuation followed by whitespace and a capital letter.
fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    for m in sentence_break_re().find_iter(text) {
        // Punctuation and the capital are both single-byte ASCII.
        sentences.push(&text[start..m.start() + 1]);
        start = m.end() - 1;
    }
    sentences.push(&text[start..]);
    sentences
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

fn is_question(sentence: &str) -> bool {
    sentence.trim().ends_with('?')
}

fn is_pure_definition(sentence: &str) -> bool {
    let lower = sentence.trim().to_lowercase();
    DEFINITION_MARKERS.iter().any(|marker| {
        lower.starts_with(&format!("{marker} "))
            && (!relation_re().is_match(sentence)
                || (naming_verb_re().is_match(&lower) && !consequence_re().is_match(&lower)))
    })
}

fn split_multi_claim_sentence(sentence: &str) -> Vec<&str> {
    if sentence.to_lowercase().contains("according to") {
        return vec![sentence];
    }
    let mut parts = vec![sentence];
    for conjunction in CONJUNCTIONS {
        parts = parts
            .into_iter()
            .flat_map(|part| part.split(conjunction))
            .collect();
    }
    let substantive = parts
        .into_iter()
        .map(|part| part.trim().trim_end_matches([',', ';']))
        .filter(|part| is_substantive_claim(part))
        .collect::<Vec<_>>();
    if substantive.is_empty() {
        vec![sentence]
    } else {
        substantive
    }
}

fn is_substantive_claim(text: &str) -> bool {
    text.split_whitespace().count() >= 3 && assertion_re().is_match(text)
}

fn is_substantive_equation(equation: &str) -> bool {
    equation.trim().chars().count() >= 3 && equation.contains('=')
}

/// First matching keyword family wins; no keyword means SPECULATIVE.
fn infer_label(statement: &str) -> ClaimLabel {
    let lower = statement.to_lowercase();
    let mentions = |keywords: &[&str]| keywords.iter().any(|k| lower.contains(k));
    if mentions(&DERIVED_KEYWORDS) {
        ClaimLabel::Derived
    } else if mentions(&COMPUTED_KEYWORDS) {
        ClaimLabel::Computed
    } else if mentions(&CITED_KEYWORDS) {
        ClaimLabel::Cited
    } else {
        ClaimLabel::Speculative
    }
}

fn char_span(text: &str, start: usize, end: usize) -> ClaimSpan {
    let start_chars = text[..start].chars().count();
    (start_chars, start_chars + text[start..end].chars().count())
}

fn draft(statement: &str, span: Option<ClaimSpan>, label: ClaimLabel) -> Option<ClaimDraft> {
    ClaimDraft::new(statement, span, label).ok()
}
