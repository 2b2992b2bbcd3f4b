//! Token sinks - where the drive loop forwards XML tokens to.

use std::borrow::Cow;
use std::io::Write;

use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};
use quick_xml::name::QName;
use quick_xml::Writer;

use crate::error::{Error, Result};
use crate::token::XmlToken;

/// Attribute carrying an object member's key.
pub const NAME_ATTRIBUTE: &str = "name";

/// Stand-in for characters XML 1.0 cannot carry.
const REPLACEMENT: char = '\u{FFFD}';

// XML 1.0 `Char` production; surrogates never reach a `char`.
#[inline]
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}

/// Escape text for character data (`in_attribute = false`) or a
/// double-quoted attribute value.
///
/// Markup characters get entities, CR and TAB get character references
/// so parsers do not normalise them away, and LF gets one inside
/// attributes for the same reason. Characters outside the XML `Char`
/// range are replaced with U+FFFD.
fn escape(text: &str, in_attribute: bool) -> Cow<'_, str> {
    let needs_escape = |c: char| {
        matches!(c, '<' | '>' | '&' | '"' | '\'' | '\t' | '\r') || (in_attribute && c == '\n') || !is_xml_char(c)
    };
    let Some(first) = text.find(needs_escape) else {
        return Cow::Borrowed(text);
    };

    let mut out = String::with_capacity(text.len() + 16);
    out.push_str(&text[..first]);
    for c in text[first..].chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' => out.push_str("&#x9;"),
            '\r' => out.push_str("&#xD;"),
            '\n' if in_attribute => out.push_str("&#xA;"),
            c if !is_xml_char(c) => out.push(REPLACEMENT),
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// Consumer of XML tokens.
pub trait TokenSink {
    /// Accept one token. Any error aborts the conversion.
    fn accept(&mut self, token: XmlToken) -> Result<()>;
}

impl<K: TokenSink + ?Sized> TokenSink for &mut K {
    #[inline]
    fn accept(&mut self, token: XmlToken) -> Result<()> {
        (**self).accept(token)
    }
}

/// Collects tokens in memory.
impl TokenSink for Vec<XmlToken> {
    #[inline]
    fn accept(&mut self, token: XmlToken) -> Result<()> {
        self.push(token);
        Ok(())
    }
}

/// Serializes tokens as XML text. Attribute values and character data
/// are escaped here, not by quick-xml, so that whitespace and control
/// characters survive a round trip through a conforming parser.
impl<W: Write> TokenSink for Writer<W> {
    fn accept(&mut self, token: XmlToken) -> Result<()> {
        match token {
            XmlToken::Start { tag, name } => {
                let mut start = BytesStart::new(tag.name());
                if let Some(name) = &name {
                    start.push_attribute(Attribute {
                        key: QName(NAME_ATTRIBUTE.as_bytes()),
                        value: match escape(name, true) {
                            Cow::Borrowed(s) => Cow::Borrowed(s.as_bytes()),
                            Cow::Owned(s) => Cow::Owned(s.into_bytes()),
                        },
                    });
                }
                self.write_event(Event::Start(start))
            }
            XmlToken::End(tag) => self.write_event(Event::End(BytesEnd::new(tag.name()))),
            XmlToken::CharData(text) => {
                self.write_event(Event::Text(BytesText::from_escaped(escape(&text, false))))
            }
        }
        .map_err(|e| Error::Write(quick_xml::Error::from(e)))
    }
}
