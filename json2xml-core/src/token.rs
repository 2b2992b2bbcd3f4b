//! Tokens on both sides of the converter.
//!
//! The input side is a SAX-style JSON token stream: containers are
//! represented by start/end token pairs, scalars by a single token.
//! Object keys are ordinary `String` tokens that appear immediately
//! before their value while the object is open.
//!
//! For `{"a": [1, null]}` a token source yields:
//! ```text
//! ObjectStart
//! String("a")
//! ArrayStart
//! Number(Verbatim("1"))
//! Null
//! ArrayEnd
//! ObjectEnd
//! ```
//!
//! The output side is an XML token stream, one token per converter call:
//! ```text
//! Start { tag: Object, name: None }
//! Start { tag: Array, name: Some("a") }
//! Start { tag: Number, name: None }
//! CharData("1")
//! End(Number)
//! Start { tag: Null, name: None }
//! End(Null)
//! End(Array)
//! End(Object)
//! ```

use std::fmt;

use crate::tag::TypeTag;

/// Character data for `true`.
pub const TRUE: &str = "true";
/// Character data for `false`.
pub const FALSE: &str = "false";

/// A JSON number as handed over by the token source.
#[derive(Debug, Clone, PartialEq)]
pub enum Number {
    /// Plain decimal text from the source, e.g. `1.50`. Emitted unchanged.
    Verbatim(String),

    /// Already-decoded value. Emitted as the shortest round-trip
    /// decimal, never in exponent notation.
    Float(f64),
}

impl Number {
    /// Canonical decimal text for character data.
    pub fn into_text(self) -> String {
        match self {
            Number::Verbatim(text) => text,
            // `Display` for f64 is shortest round-trip and never uses an exponent.
            Number::Float(value) => value.to_string(),
        }
    }
}

/// JSON token stream item.
#[derive(Debug, Clone, PartialEq)]
pub enum JsonToken {
    /// `{`
    ObjectStart,
    /// `}`
    ObjectEnd,
    /// `[`
    ArrayStart,
    /// `]`
    ArrayEnd,
    /// `true` or `false`
    Boolean(bool),
    /// Any JSON number
    Number(Number),
    /// String value or object key, already unescaped
    String(String),
    /// `null`
    Null,
}

impl JsonToken {
    /// Payload-free classification, used in error reports.
    pub fn kind(&self) -> TokenKind {
        match self {
            JsonToken::ObjectStart => TokenKind::ObjectStart,
            JsonToken::ObjectEnd => TokenKind::ObjectEnd,
            JsonToken::ArrayStart => TokenKind::ArrayStart,
            JsonToken::ArrayEnd => TokenKind::ArrayEnd,
            JsonToken::Boolean(_) => TokenKind::Boolean,
            JsonToken::Number(_) => TokenKind::Number,
            JsonToken::String(_) => TokenKind::String,
            JsonToken::Null => TokenKind::Null,
        }
    }

    /// Check if this is a closing delimiter.
    #[inline]
    pub fn is_close(&self) -> bool {
        matches!(self, JsonToken::ObjectEnd | JsonToken::ArrayEnd)
    }
}

/// Shape of a [`JsonToken`] without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    ObjectStart,
    ObjectEnd,
    ArrayStart,
    ArrayEnd,
    Boolean,
    Number,
    String,
    Null,
}

impl TokenKind {
    /// Human-readable description for error messages.
    pub fn describe(self) -> &'static str {
        match self {
            Self::ObjectStart => "'{'",
            Self::ObjectEnd => "'}'",
            Self::ArrayStart => "'['",
            Self::ArrayEnd => "']'",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::String => "string",
            Self::Null => "null",
        }
    }

    /// Container a closing delimiter belongs to.
    pub fn closes(self) -> Option<TypeTag> {
        match self {
            Self::ObjectEnd => Some(TypeTag::Object),
            Self::ArrayEnd => Some(TypeTag::Array),
            _ => None,
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

/// XML token stream item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum XmlToken {
    /// Start element named after `tag`, with a `name` attribute for
    /// object members.
    Start { tag: TypeTag, name: Option<String> },

    /// End element named after the tag.
    End(TypeTag),

    /// Raw, unescaped character data.
    CharData(String),
}
