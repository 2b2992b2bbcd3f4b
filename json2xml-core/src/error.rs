//! Conversion errors.
//!
//! Every error is fatal to the conversion it came from. Structural
//! conditions (`InvalidKey`, `InvalidToken`, `UnknownToken`, `Truncated`)
//! can be raised by the converter or by the JSON reader, whichever sees
//! the problem first; the same variant is reported either way.

use std::fmt;

use crate::tag::TypeTag;
use crate::token::TokenKind;

/// Result alias used throughout the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Error codes for malformed JSON text.
///
/// Using an enum instead of String keeps the error small and avoids
/// allocating for messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SyntaxErrorCode {
    /// Input ended inside a string, number or keyword
    UnexpectedEof = 0,
    /// Expected ':' after an object key
    ExpectedColon,
    /// Expected ',' or ']' after an array element
    ExpectedArrayCommaOrEnd,
    /// Expected ',' or '}' after an object member
    ExpectedObjectCommaOrEnd,
    /// Expected a value
    ExpectedValue,
    /// ',' directly before a closing delimiter
    TrailingComma,
    /// Unescaped control character inside a string
    ControlCharacter,
    /// Unknown escape sequence
    InvalidEscape,
    /// Malformed `\u` escape
    InvalidUnicodeEscape,
    /// Lead surrogate without trail, or trail without lead
    UnpairedSurrogate,
    /// String bytes are not UTF-8
    InvalidUtf8,
    /// Number does not follow the JSON grammar
    InvalidNumber,
    /// Number overflows f64
    NumberOutOfRange,
    /// Nesting exceeds the configured maximum depth
    DepthLimitExceeded,
}

impl SyntaxErrorCode {
    /// Get a human-readable message for this error code.
    pub fn message(self) -> &'static str {
        match self {
            Self::UnexpectedEof => "unexpected end of input",
            Self::ExpectedColon => "expected ':'",
            Self::ExpectedArrayCommaOrEnd => "expected ',' or ']'",
            Self::ExpectedObjectCommaOrEnd => "expected ',' or '}'",
            Self::ExpectedValue => "expected value",
            Self::TrailingComma => "trailing comma",
            Self::ControlCharacter => "control character in string",
            Self::InvalidEscape => "invalid escape",
            Self::InvalidUnicodeEscape => "invalid unicode escape",
            Self::UnpairedSurrogate => "unpaired surrogate",
            Self::InvalidUtf8 => "invalid utf-8",
            Self::InvalidNumber => "invalid number",
            Self::NumberOutOfRange => "number out of range",
            Self::DepthLimitExceeded => "nesting too deep",
        }
    }
}

impl fmt::Display for SyntaxErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Everything that can stop a conversion.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid key: object keys must be strings, found {found}")]
    InvalidKey { found: TokenKind },

    #[error("invalid token: unexpected {found} {}", open_context(.open))]
    InvalidToken {
        found: TokenKind,
        open: Option<TypeTag>,
    },

    #[error("unknown token {found:?} at byte {offset}")]
    UnknownToken { found: String, offset: u64 },

    #[error("{code} at byte {offset}")]
    Syntax { code: SyntaxErrorCode, offset: u64 },

    #[error("truncated input: stream ended with {depth} unclosed element(s)")]
    Truncated { depth: usize },

    #[error("converter used after a failed conversion")]
    Poisoned,

    #[error("read failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("write failed: {0}")]
    Write(#[source] quick_xml::Error),
}

fn open_context(open: &Option<TypeTag>) -> String {
    match open {
        Some(tag) => format!("inside {tag}"),
        None => "with no open container".to_string(),
    }
}
