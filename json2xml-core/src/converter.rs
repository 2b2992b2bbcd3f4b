//! The JSON → XML token converter.
//!
//! A bounded state machine layered on a nesting stack of [`TypeTag`]s.
//! Each call to [`Converter::next_token`] yields exactly one XML token:
//!
//! ```text
//!                    ┌──────────────────────────────┐
//!                    │             Idle             │◀─────────────┐
//!                    └──────────────────────────────┘              │
//!                      │ pull token(s) from source                 │
//!        bool/number/  │            null    │  container open/close│
//!        string        ▼                    ▼  ────────────────────┘
//!  ┌───────────────────────────┐  ┌──────────────────────┐
//!  │  AwaitingCharDataFlush    │─▶│ AwaitingScalarClose  │──────────┘
//!  └───────────────────────────┘  └──────────────────────┘
//!        emit CharData               emit End(scalar)
//! ```
//!
//! Inside an object the converter looks one token ahead: the key string
//! is captured and the member's value is pulled in the same call, so the
//! key can land on the value's start element as a `name` attribute.

use std::iter::FusedIterator;

use crate::error::{Error, Result};
use crate::source::TokenSource;
use crate::tag::TypeTag;
use crate::token::{JsonToken, TokenKind, XmlToken, FALSE, TRUE};

/// Which step the next call will take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Next call pulls from the source.
    Idle,
    /// Next call emits the buffered scalar text.
    AwaitingCharDataFlush,
    /// Next call closes the scalar element on top of the stack.
    AwaitingScalarClose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Running,
    Finished,
    Failed,
}

/// Streaming converter from a JSON token source to XML tokens.
///
/// Created once per conversion. After an error every further call
/// returns [`Error::Poisoned`]; after a clean end of stream every
/// further call returns `Ok(None)`.
#[derive(Debug)]
pub struct Converter<S> {
    source: S,
    stack: Vec<TypeTag>,
    pending: Option<String>,
    status: Status,
    max_depth: usize,
}

impl<S: TokenSource> Converter<S> {
    /// Create a converter reading from `source`.
    pub fn new(source: S) -> Self {
        Self {
            source,
            stack: Vec::with_capacity(16),
            pending: None,
            status: Status::Running,
            max_depth: 0,
        }
    }

    /// Current XML nesting depth.
    #[inline]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Deepest nesting reached so far.
    #[inline]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Which step the next call will take.
    pub fn state(&self) -> State {
        if self.pending.is_some() {
            State::AwaitingCharDataFlush
        } else if self.stack.last().is_some_and(|tag| tag.is_scalar()) {
            State::AwaitingScalarClose
        } else {
            State::Idle
        }
    }

    /// Give back the underlying source.
    pub fn into_source(self) -> S {
        self.source
    }

    /// Produce the next XML token.
    ///
    /// Returns `Ok(None)` once the source is exhausted with every element
    /// closed.
    pub fn next_token(&mut self) -> Result<Option<XmlToken>> {
        match self.status {
            Status::Running => {}
            Status::Finished => return Ok(None),
            Status::Failed => return Err(Error::Poisoned),
        }
        match self.step() {
            Ok(Some(token)) => Ok(Some(token)),
            Ok(None) => {
                self.status = Status::Finished;
                Ok(None)
            }
            Err(err) => {
                self.status = Status::Failed;
                Err(err)
            }
        }
    }

    fn step(&mut self) -> Result<Option<XmlToken>> {
        if let Some(text) = self.pending.take() {
            return Ok(Some(XmlToken::CharData(text)));
        }

        if let Some(&tag) = self.stack.last() {
            if tag.is_scalar() {
                self.stack.pop();
                return Ok(Some(XmlToken::End(tag)));
            }
        }

        let Some(mut token) = self.source.next_token()? else {
            return match self.stack.len() {
                0 => Ok(None),
                depth => Err(Error::Truncated { depth }),
            };
        };

        let mut key = None;
        if self.stack.last() == Some(&TypeTag::Object) && !matches!(token, JsonToken::ObjectEnd) {
            match token {
                JsonToken::String(name) => key = Some(name),
                other => return Err(Error::InvalidKey { found: other.kind() }),
            }
            token = match self.source.next_token()? {
                Some(value) => value,
                None => return Err(Error::Truncated { depth: self.stack.len() }),
            };
            // Key without a value: `{"a"}`
            if token.is_close() {
                return Err(Error::InvalidToken {
                    found: token.kind(),
                    open: Some(TypeTag::Object),
                });
            }
        }

        let out = match token {
            JsonToken::ObjectStart => self.open(TypeTag::Object, key, None),
            JsonToken::ArrayStart => self.open(TypeTag::Array, key, None),
            JsonToken::ObjectEnd => self.close(TokenKind::ObjectEnd)?,
            JsonToken::ArrayEnd => self.close(TokenKind::ArrayEnd)?,
            JsonToken::Boolean(value) => {
                let text = if value { TRUE } else { FALSE };
                self.open(TypeTag::Boolean, key, Some(text.to_string()))
            }
            JsonToken::Number(number) => self.open(TypeTag::Number, key, Some(number.into_text())),
            JsonToken::String(text) => self.open(TypeTag::String, key, Some(text)),
            JsonToken::Null => self.open(TypeTag::Null, key, None),
        };
        Ok(Some(out))
    }

    fn open(&mut self, tag: TypeTag, name: Option<String>, text: Option<String>) -> XmlToken {
        self.stack.push(tag);
        self.max_depth = self.max_depth.max(self.stack.len());
        self.pending = text;
        XmlToken::Start { tag, name }
    }

    fn close(&mut self, found: TokenKind) -> Result<XmlToken> {
        let open = self.stack.last().copied();
        match (open, found.closes()) {
            (Some(tag), Some(closes)) if tag == closes => {
                self.stack.pop();
                Ok(XmlToken::End(tag))
            }
            _ => Err(Error::InvalidToken { found, open }),
        }
    }
}

/// Yields tokens until end of stream or the first error.
impl<S: TokenSource> Iterator for Converter<S> {
    type Item = Result<XmlToken>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.status == Status::Failed {
            return None;
        }
        self.next_token().transpose()
    }
}

impl<S: TokenSource> FusedIterator for Converter<S> {}
