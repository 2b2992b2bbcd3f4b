//! Token sources - where the converter pulls JSON tokens from.

use crate::error::Result;
use crate::token::JsonToken;

/// Pull-based supplier of JSON tokens.
///
/// `Ok(None)` is a graceful end of stream. Whether that end is legal
/// (all containers closed) is the converter's call, not the source's.
pub trait TokenSource {
    /// Next token, end of stream, or a read failure.
    fn next_token(&mut self) -> Result<Option<JsonToken>>;
}

impl<S: TokenSource + ?Sized> TokenSource for &mut S {
    #[inline]
    fn next_token(&mut self) -> Result<Option<JsonToken>> {
        (**self).next_token()
    }
}

impl<S: TokenSource + ?Sized> TokenSource for Box<S> {
    #[inline]
    fn next_token(&mut self) -> Result<Option<JsonToken>> {
        (**self).next_token()
    }
}

/// Token source over an iterator of already-classified tokens.
///
/// Useful when tokens come from somewhere other than JSON text, and for
/// injecting upstream failures in tests.
#[derive(Debug, Clone)]
pub struct Tokens<I> {
    iter: I,
}

impl<I> Tokens<I>
where
    I: Iterator<Item = Result<JsonToken>>,
{
    /// Wrap a fallible token iterator.
    pub fn new(iter: I) -> Self {
        Self { iter }
    }
}

impl<I> TokenSource for Tokens<I>
where
    I: Iterator<Item = Result<JsonToken>>,
{
    #[inline]
    fn next_token(&mut self) -> Result<Option<JsonToken>> {
        self.iter.next().transpose()
    }
}

/// Token source over infallible tokens.
pub fn tokens<I>(iter: I) -> Tokens<impl Iterator<Item = Result<JsonToken>>>
where
    I: IntoIterator<Item = JsonToken>,
{
    Tokens::new(iter.into_iter().map(Ok))
}
