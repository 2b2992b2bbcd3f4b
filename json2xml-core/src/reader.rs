//! Streaming JSON reader.
//!
//! Turns any [`BufRead`] into a [`TokenSource`]. Only the current token
//! is ever held in memory: string runs are located with `memchr` and
//! copied straight out of the reader's buffer, and containers are
//! tracked as a stack of [`TypeTag`]s.
//!
//! Separators (`,` and `:`) are validated and swallowed; they never reach
//! the converter. Several whitespace-separated top-level values are read
//! one after another.
//!
//! ```text
//! {"a": [1, true]}
//! │ │    │ │  │  ││
//! │ │    │ │  │  │└ ObjectEnd
//! │ │    │ │  │  └ ArrayEnd
//! │ │    │ │  └ Boolean(true)
//! │ │    │ └ Number(Verbatim("1"))
//! │ │    └ ArrayStart
//! │ └ String("a")
//! └ ObjectStart
//! ```

use std::io::BufRead;

use memchr::memchr2;

use crate::error::{Error, Result, SyntaxErrorCode};
use crate::source::TokenSource;
use crate::tag::TypeTag;
use crate::token::{JsonToken, Number, TokenKind};

/// Default nesting limit.
pub const DEFAULT_MAX_DEPTH: usize = 10_000;

/// How numbers are handed to the converter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NumberFormat {
    /// Keep the source digits (`1.50` stays `1.50`). An exponent is
    /// expanded into plain decimal (`1e3` becomes `1000`).
    #[default]
    Verbatim,
    /// Decode to `f64` and re-render as the shortest round-trip decimal
    /// (`1.50` becomes `1.5`, `1e3` becomes `1000`).
    Float,
}

/// Reader configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReaderOptions {
    pub numbers: NumberFormat,
    /// Maximum number of simultaneously open containers.
    pub max_depth: usize,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            numbers: NumberFormat::Verbatim,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Keyword {
    True,
    False,
    Null,
}

static KEYWORDS: phf::Map<&'static str, Keyword> = phf::phf_map! {
    "true" => Keyword::True,
    "false" => Keyword::False,
    "null" => Keyword::Null,
};

// What the grammar allows at the current position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    TopValue,
    ArrayFirst,
    ArrayValue,
    ArrayComma,
    ObjectFirst,
    ObjectKey,
    ObjectColon,
    ObjectValue,
    ObjectComma,
}

#[inline]
fn syntax(code: SyntaxErrorCode, offset: u64) -> Error {
    Error::Syntax { code, offset }
}

#[inline]
fn is_whitespace(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r')
}

fn describe_byte(b: u8) -> String {
    if b.is_ascii_graphic() {
        (b as char).to_string()
    } else {
        format!("{b:#04x}")
    }
}

/// Largest decimal point shift applied when expanding an exponent.
/// Well past the `f64` range in both directions.
const MAX_EXPONENT_SHIFT: i64 = 1_100;

/// Rewrite validated number text with an exponent (at byte `at`) as plain
/// decimal, keeping every mantissa digit: `-1.5e-3` becomes `-0.0015`,
/// `1.50E+2` becomes `150`, `12e1` becomes `120`.
///
/// Returns `None` when the shift is too large to spell out.
fn expand_exponent(text: &str, at: usize) -> Option<String> {
    let (mantissa, exponent) = (&text[..at], &text[at + 1..]);
    let (negative, mantissa) = match mantissa.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, mantissa),
    };
    let (int_part, frac_part) = mantissa.split_once('.').unwrap_or((mantissa, ""));

    let (exp_negative, exp_digits) = match exponent.as_bytes().first() {
        Some(b'-') => (true, &exponent[1..]),
        Some(b'+') => (false, &exponent[1..]),
        _ => (false, exponent),
    };
    let mut shift: i64 = 0;
    for digit in exp_digits.bytes() {
        shift = shift * 10 + i64::from(digit - b'0');
        if shift > MAX_EXPONENT_SHIFT {
            return None;
        }
    }
    if exp_negative {
        shift = -shift;
    }

    let digits: String = [int_part, frac_part].concat();
    let point = int_part.len() as i64 + shift;
    let len = digits.len() as i64;

    let (int_digits, frac_digits) = if point <= 0 {
        (String::new(), "0".repeat((-point) as usize) + &digits)
    } else if point >= len {
        (digits + &"0".repeat((point - len) as usize), String::new())
    } else {
        let (int, frac) = digits.split_at(point as usize);
        (int.to_string(), frac.to_string())
    };

    let int_digits = int_digits.trim_start_matches('0');
    let mut out = String::with_capacity(int_digits.len() + frac_digits.len() + 3);
    if negative {
        out.push('-');
    }
    out.push_str(if int_digits.is_empty() { "0" } else { int_digits });
    if !frac_digits.is_empty() {
        out.push('.');
        out.push_str(&frac_digits);
    }
    Some(out)
}

/// Streaming JSON tokenizer over a buffered reader.
#[derive(Debug)]
pub struct JsonReader<R> {
    reader: R,
    options: ReaderOptions,
    expect: Expect,
    containers: Vec<TypeTag>,
    scratch: Vec<u8>,
    offset: u64,
}

impl<R: BufRead> JsonReader<R> {
    /// Create a reader with default options.
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, ReaderOptions::default())
    }

    /// Create a reader with explicit options.
    pub fn with_options(reader: R, options: ReaderOptions) -> Self {
        Self {
            reader,
            options,
            expect: Expect::TopValue,
            containers: Vec::with_capacity(16),
            scratch: Vec::with_capacity(64),
            offset: 0,
        }
    }

    /// Bytes consumed so far.
    #[inline]
    pub fn offset(&self) -> u64 {
        self.offset
    }

    // ========== Byte access ==========

    #[inline]
    fn peek(&mut self) -> Result<Option<u8>> {
        Ok(self.reader.fill_buf()?.first().copied())
    }

    #[inline]
    fn bump(&mut self) {
        self.reader.consume(1);
        self.offset += 1;
    }

    fn next_byte(&mut self) -> Result<Option<u8>> {
        let byte = self.peek()?;
        if byte.is_some() {
            self.bump();
        }
        Ok(byte)
    }

    fn expect_byte(&mut self) -> Result<u8> {
        let offset = self.offset;
        self.next_byte()?.ok_or(syntax(SyntaxErrorCode::UnexpectedEof, offset))
    }

    /// Skip whitespace and return the next byte without consuming it.
    fn skip_whitespace(&mut self) -> Result<Option<u8>> {
        loop {
            let (skip, found) = {
                let buf = self.reader.fill_buf()?;
                if buf.is_empty() {
                    return Ok(None);
                }
                let n = buf.iter().take_while(|&&b| is_whitespace(b)).count();
                (n, buf.get(n).copied())
            };
            self.reader.consume(skip);
            self.offset += skip as u64;
            if found.is_some() {
                return Ok(found);
            }
        }
    }

    // ========== Structure ==========

    fn after_value(&self) -> Expect {
        match self.containers.last() {
            Some(TypeTag::Array) => Expect::ArrayComma,
            Some(TypeTag::Object) => Expect::ObjectComma,
            _ => Expect::TopValue,
        }
    }

    fn open(&mut self, tag: TypeTag) -> Result<JsonToken> {
        if self.containers.len() >= self.options.max_depth {
            return Err(syntax(SyntaxErrorCode::DepthLimitExceeded, self.offset));
        }
        self.bump();
        self.containers.push(tag);
        Ok(match tag {
            TypeTag::Object => {
                self.expect = Expect::ObjectFirst;
                JsonToken::ObjectStart
            }
            _ => {
                self.expect = Expect::ArrayFirst;
                JsonToken::ArrayStart
            }
        })
    }

    fn close(&mut self, found: TokenKind) -> Result<JsonToken> {
        let open = self.containers.last().copied();
        match self.expect {
            Expect::ObjectColon => return Err(syntax(SyntaxErrorCode::ExpectedColon, self.offset)),
            Expect::ObjectValue => return Err(syntax(SyntaxErrorCode::ExpectedValue, self.offset)),
            _ => {}
        }
        if open.is_none() || open != found.closes() {
            return Err(Error::InvalidToken { found, open });
        }
        if matches!(self.expect, Expect::ArrayValue | Expect::ObjectKey) {
            return Err(syntax(SyntaxErrorCode::TrailingComma, self.offset));
        }
        self.bump();
        self.containers.pop();
        self.expect = self.after_value();
        Ok(match found {
            TokenKind::ObjectEnd => JsonToken::ObjectEnd,
            _ => JsonToken::ArrayEnd,
        })
    }

    fn unexpected(&self) -> Error {
        let code = match self.expect {
            Expect::ArrayComma => SyntaxErrorCode::ExpectedArrayCommaOrEnd,
            Expect::ObjectComma => SyntaxErrorCode::ExpectedObjectCommaOrEnd,
            Expect::ObjectColon => SyntaxErrorCode::ExpectedColon,
            _ => SyntaxErrorCode::ExpectedValue,
        };
        syntax(code, self.offset)
    }

    fn separator(&mut self, byte: u8) -> Result<()> {
        self.expect = match (byte, self.expect) {
            (b',', Expect::ArrayComma) => Expect::ArrayValue,
            (b',', Expect::ObjectComma) => Expect::ObjectKey,
            (b':', Expect::ObjectColon) => Expect::ObjectValue,
            _ => return Err(self.unexpected()),
        };
        self.bump();
        Ok(())
    }

    /// Read a value starting at `byte` (peeked, not consumed).
    fn value(&mut self, byte: u8) -> Result<JsonToken> {
        let token = match byte {
            b'{' => return self.open(TypeTag::Object),
            b'[' => return self.open(TypeTag::Array),
            b'"' => JsonToken::String(self.read_string()?),
            b'-' | b'0'..=b'9' => JsonToken::Number(self.read_number()?),
            b'a'..=b'z' | b'A'..=b'Z' => self.read_keyword()?,
            other => {
                return Err(Error::UnknownToken {
                    found: describe_byte(other),
                    offset: self.offset,
                })
            }
        };
        self.expect = self.after_value();
        Ok(token)
    }

    /// Read an object key starting at `byte`. Anything but a string is
    /// reported as an invalid key, after making sure it is a token at all.
    fn key(&mut self, byte: u8) -> Result<JsonToken> {
        let found = match byte {
            b'"' => {
                let key = self.read_string()?;
                self.expect = Expect::ObjectColon;
                return Ok(JsonToken::String(key));
            }
            b'{' => TokenKind::ObjectStart,
            b'[' => TokenKind::ArrayStart,
            _ => self.value(byte)?.kind(),
        };
        Err(Error::InvalidKey { found })
    }

    // ========== Scalars ==========

    fn read_string(&mut self) -> Result<String> {
        let start = self.offset;
        self.bump();
        self.scratch.clear();
        loop {
            let (used, stop) = {
                let buf = self.reader.fill_buf()?;
                if buf.is_empty() {
                    return Err(syntax(SyntaxErrorCode::UnexpectedEof, self.offset));
                }
                let end = memchr2(b'"', b'\\', buf);
                let run = &buf[..end.unwrap_or(buf.len())];
                if let Some(pos) = run.iter().position(|&b| b < 0x20) {
                    return Err(syntax(SyntaxErrorCode::ControlCharacter, self.offset + pos as u64));
                }
                self.scratch.extend_from_slice(run);
                match end {
                    Some(i) => (i + 1, Some(buf[i])),
                    None => (buf.len(), None),
                }
            };
            self.reader.consume(used);
            self.offset += used as u64;
            match stop {
                Some(b'"') => break,
                Some(_) => self.read_escape()?,
                None => {}
            }
        }
        String::from_utf8(std::mem::take(&mut self.scratch))
            .map_err(|_| syntax(SyntaxErrorCode::InvalidUtf8, start))
    }

    fn read_escape(&mut self) -> Result<()> {
        let offset = self.offset;
        let unescaped = match self.expect_byte()? {
            b'"' => b'"',
            b'\\' => b'\\',
            b'/' => b'/',
            b'b' => 0x08,
            b'f' => 0x0c,
            b'n' => b'\n',
            b'r' => b'\r',
            b't' => b'\t',
            b'u' => return self.read_unicode_escape(),
            _ => return Err(syntax(SyntaxErrorCode::InvalidEscape, offset)),
        };
        self.scratch.push(unescaped);
        Ok(())
    }

    fn read_unicode_escape(&mut self) -> Result<()> {
        let offset = self.offset;
        let unpaired = syntax(SyntaxErrorCode::UnpairedSurrogate, offset);
        let code = match self.read_hex4()? {
            lead @ 0xD800..=0xDBFF => {
                if self.next_byte()? != Some(b'\\') || self.next_byte()? != Some(b'u') {
                    return Err(unpaired);
                }
                match self.read_hex4()? {
                    trail @ 0xDC00..=0xDFFF => 0x10000 + ((lead - 0xD800) << 10) + (trail - 0xDC00),
                    _ => return Err(unpaired),
                }
            }
            0xDC00..=0xDFFF => return Err(unpaired),
            code => code,
        };
        let ch = char::from_u32(code).ok_or(syntax(SyntaxErrorCode::InvalidUnicodeEscape, offset))?;
        let mut utf8 = [0u8; 4];
        self.scratch.extend_from_slice(ch.encode_utf8(&mut utf8).as_bytes());
        Ok(())
    }

    fn read_hex4(&mut self) -> Result<u32> {
        let mut code = 0;
        for _ in 0..4 {
            let offset = self.offset;
            let digit = (self.expect_byte()? as char)
                .to_digit(16)
                .ok_or(syntax(SyntaxErrorCode::InvalidUnicodeEscape, offset))?;
            code = code << 4 | digit;
        }
        Ok(code)
    }

    fn take_byte(&mut self, byte: u8) {
        self.scratch.push(byte);
        self.bump();
    }

    fn take_digits(&mut self) -> Result<usize> {
        let mut count = 0;
        while let Some(b @ b'0'..=b'9') = self.peek()? {
            self.take_byte(b);
            count += 1;
        }
        Ok(count)
    }

    fn read_number(&mut self) -> Result<Number> {
        let start = self.offset;
        let invalid = |offset| syntax(SyntaxErrorCode::InvalidNumber, offset);
        self.scratch.clear();

        if self.peek()? == Some(b'-') {
            self.take_byte(b'-');
        }
        match self.peek()? {
            Some(b'0') => self.take_byte(b'0'),
            Some(b'1'..=b'9') => {
                self.take_digits()?;
            }
            _ => return Err(invalid(self.offset)),
        }
        if self.peek()? == Some(b'.') {
            self.take_byte(b'.');
            if self.take_digits()? == 0 {
                return Err(invalid(self.offset));
            }
        }
        let mut exponent_at = None;
        if let Some(e @ (b'e' | b'E')) = self.peek()? {
            exponent_at = Some(self.scratch.len());
            self.take_byte(e);
            if let Some(sign @ (b'+' | b'-')) = self.peek()? {
                self.take_byte(sign);
            }
            if self.take_digits()? == 0 {
                return Err(invalid(self.offset));
            }
        }
        // `01`, `1.2.3`, `12abc`
        if let Some(b) = self.peek()? {
            if b.is_ascii_alphanumeric() || matches!(b, b'.' | b'-' | b'+') {
                return Err(invalid(self.offset));
            }
        }

        let text = String::from_utf8(std::mem::take(&mut self.scratch)).map_err(|_| invalid(start))?;
        match self.options.numbers {
            NumberFormat::Verbatim => match exponent_at {
                None => Ok(Number::Verbatim(text)),
                Some(at) => expand_exponent(&text, at)
                    .map(Number::Verbatim)
                    .ok_or(syntax(SyntaxErrorCode::NumberOutOfRange, start)),
            },
            NumberFormat::Float => {
                let value: f64 = text.parse().map_err(|_| invalid(start))?;
                if !value.is_finite() {
                    return Err(syntax(SyntaxErrorCode::NumberOutOfRange, start));
                }
                Ok(Number::Float(value))
            }
        }
    }

    fn read_keyword(&mut self) -> Result<JsonToken> {
        let start = self.offset;
        let mut word = String::new();
        let mut at_eof = true;
        while let Some(b) = self.peek()? {
            if !(b.is_ascii_alphanumeric() || b == b'_') {
                at_eof = false;
                break;
            }
            word.push(b as char);
            self.bump();
        }
        match KEYWORDS.get(word.as_str()) {
            Some(Keyword::True) => Ok(JsonToken::Boolean(true)),
            Some(Keyword::False) => Ok(JsonToken::Boolean(false)),
            Some(Keyword::Null) => Ok(JsonToken::Null),
            // `tru` cut off by the end of input
            None if at_eof && KEYWORDS.keys().any(|k| k.starts_with(word.as_str())) => {
                Err(syntax(SyntaxErrorCode::UnexpectedEof, self.offset))
            }
            None => Err(Error::UnknownToken { found: word, offset: start }),
        }
    }
}

impl<R: BufRead> TokenSource for JsonReader<R> {
    fn next_token(&mut self) -> Result<Option<JsonToken>> {
        loop {
            let Some(byte) = self.skip_whitespace()? else {
                return Ok(None);
            };
            let token = match (byte, self.expect) {
                (b',' | b':', _) => {
                    self.separator(byte)?;
                    continue;
                }
                (b'}', _) => self.close(TokenKind::ObjectEnd)?,
                (b']', _) => self.close(TokenKind::ArrayEnd)?,
                (_, Expect::ObjectFirst | Expect::ObjectKey) => self.key(byte)?,
                (_, Expect::TopValue | Expect::ArrayFirst | Expect::ArrayValue | Expect::ObjectValue) => {
                    self.value(byte)?
                }
                (_, Expect::ArrayComma | Expect::ObjectComma | Expect::ObjectColon) => {
                    return Err(self.unexpected())
                }
            };
            return Ok(Some(token));
        }
    }
}
