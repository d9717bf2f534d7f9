//! Token grammar: what counts as an atomic identifier at the wire boundary.
//!
//! A token is a wire string that survived every check below, verbatim.
//! Nothing is trimmed, case-folded, or normalized. Checks run in a fixed
//! order so that the same input always yields the same fault:
//!
//! 1. not a string            → `wrong-type`
//! 2. empty                   → `empty`
//! 3. deny-listed invisible   → `invisible-character`
//! 4. whitespace only         → `whitespace-only`
//! 5. boundary whitespace     → `boundary-whitespace`
//! 6. outside printable ASCII → `non-ascii`
//! 7. internal whitespace     → `internal-whitespace` (identifiers only)
//!
//! Invisibles are checked before whitespace because NO-BREAK SPACE is both.

use serde::Serialize;
use serde_json::Value;
use std::borrow::Borrow;
use std::fmt::{Display, Formatter};
use std::ops::Deref;

/// Code points rejected anywhere in a token.
pub const INVISIBLE_CHARS: [char; 6] = [
    '\u{200B}', // ZERO WIDTH SPACE
    '\u{00A0}', // NO-BREAK SPACE
    '\u{FEFF}', // BYTE ORDER MARK
    '\u{2060}', // WORD JOINER
    '\u{200C}', // ZERO WIDTH NON-JOINER
    '\u{200D}', // ZERO WIDTH JOINER
];

/// ASCII whitespace that may never lead or trail a token.
pub const BOUNDARY_WHITESPACE: [char; 4] = [' ', '\t', '\r', '\n'];

/// Which grammar a token is held to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenClass {
    /// Identifiers (claim/step/evidence ids, tagged-union values): all seven checks.
    Identifier,
    /// Closed-set spellings. Internal whitespace is left to the membership check.
    Enumerant,
}

/// Why a wire value is not a token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TokenFault {
    #[error("expected string, got {found}")]
    WrongType { found: &'static str },

    #[error("empty string")]
    Empty,

    #[error("contains invisible unicode character U+{code_point:04X}")]
    InvisibleCharacter { code_point: u32 },

    #[error("is whitespace-only")]
    WhitespaceOnly,

    #[error("has leading/trailing whitespace (whitespace variants are rejected, never trimmed)")]
    BoundaryWhitespace,

    #[error("contains non-ASCII or non-printable character U+{code_point:04X}")]
    NonAscii { code_point: u32 },

    #[error("contains internal whitespace")]
    InternalWhitespace,
}

impl TokenFault {
    /// Stable category code.
    pub fn code(&self) -> &'static str {
        match self {
            TokenFault::WrongType { .. } => "wrong-type",
            TokenFault::Empty => "empty",
            TokenFault::InvisibleCharacter { .. } => "invisible-character",
            TokenFault::WhitespaceOnly => "whitespace-only",
            TokenFault::BoundaryWhitespace => "boundary-whitespace",
            TokenFault::NonAscii { .. } => "non-ascii",
            TokenFault::InternalWhitespace => "internal-whitespace",
        }
    }
}

/// JSON type name used in wrong-type messages.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

/// Run the grammar over a wire value, returning the string untouched on success.
pub fn classify_token(wire: &Value, class: TokenClass) -> Result<&str, TokenFault> {
    let Value::String(s) = wire else {
        return Err(TokenFault::WrongType {
            found: json_type_name(wire),
        });
    };
    check_token(s, class)?;
    Ok(s.as_str())
}

/// Run checks (2)-(7) over a string already known to be a string.
pub fn check_token(s: &str, class: TokenClass) -> Result<(), TokenFault> {
    if s.is_empty() {
        return Err(TokenFault::Empty);
    }
    if let Some(c) = s.chars().find(|c| INVISIBLE_CHARS.contains(c)) {
        return Err(TokenFault::InvisibleCharacter {
            code_point: c as u32,
        });
    }
    if s.chars().all(char::is_whitespace) {
        return Err(TokenFault::WhitespaceOnly);
    }
    if s.starts_with(BOUNDARY_WHITESPACE) || s.ends_with(BOUNDARY_WHITESPACE) {
        return Err(TokenFault::BoundaryWhitespace);
    }
    if let Some(c) = s
        .chars()
        .find(|c| !is_printable_ascii(*c) && !BOUNDARY_WHITESPACE.contains(c))
    {
        return Err(TokenFault::NonAscii {
            code_point: c as u32,
        });
    }
    if class == TokenClass::Identifier && s.chars().any(|c| BOUNDARY_WHITESPACE.contains(&c)) {
        return Err(TokenFault::InternalWhitespace);
    }
    Ok(())
}

fn is_printable_ascii(c: char) -> bool {
    (' '..='~').contains(&c)
}

/// Whether `s` is a valid identifier-class token.
pub fn is_valid_token(s: &str) -> bool {
    check_token(s, TokenClass::Identifier).is_ok()
}

/// Empty after trimming whitespace.
pub(crate) fn is_blank(text: &str) -> bool {
    text.trim().is_empty()
}

/// An identifier proven canonical by the grammar.
///
/// There is no `Deserialize` impl: the only way in is [`Token::parse`] or
/// [`Token::from_wire`].
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Token(String);

impl Token {
    pub fn parse(s: &str) -> Result<Self, TokenFault> {
        check_token(s, TokenClass::Identifier)?;
        Ok(Self(s.to_string()))
    }

    pub fn from_wire(wire: &Value) -> Result<Self, TokenFault> {
        classify_token(wire, TokenClass::Identifier).map(|s| Self(s.to_string()))
    }

    /// A fresh random identifier (hyphenated UUIDv4).
    pub fn generate() -> Self {
        let id = uuid::Uuid::new_v4().hyphenated().to_string();
        Self::parse(&id).expect("hyphenated uuid is a canonical token")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Deref for Token {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Token {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
