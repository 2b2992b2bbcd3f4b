//! Drive loop - pumps converter output into a sink.

use std::io::{BufRead, Write};

use log::{debug, trace};
use quick_xml::Writer;

use crate::converter::Converter;
use crate::error::Result;
use crate::reader::{JsonReader, ReaderOptions};
use crate::sink::TokenSink;
use crate::source::TokenSource;

/// Summary of a finished conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DriveStats {
    /// XML tokens handed to the sink.
    pub tokens: u64,
    /// Deepest element nesting reached.
    pub max_depth: usize,
}

/// Run a conversion to completion.
///
/// Stops at the first error from either side and returns it unchanged.
pub fn drive<S, K>(source: S, sink: &mut K) -> Result<DriveStats>
where
    S: TokenSource,
    K: TokenSink + ?Sized,
{
    let mut converter = Converter::new(source);
    let mut stats = DriveStats::default();
    loop {
        let token = match converter.next_token() {
            Ok(Some(token)) => token,
            Ok(None) => break,
            Err(err) => {
                debug!("conversion failed after {} tokens: {err}", stats.tokens);
                return Err(err);
            }
        };
        trace!("emit {token:?}");
        if let Err(err) = sink.accept(token) {
            debug!("sink rejected token {}: {err}", stats.tokens);
            return Err(err);
        }
        stats.tokens += 1;
    }
    stats.max_depth = converter.max_depth();
    debug!("converted {} tokens, max depth {}", stats.tokens, stats.max_depth);
    Ok(stats)
}

/// Convert JSON text from `reader` into XML on `writer`.
pub fn convert<R, W>(reader: R, writer: &mut Writer<W>) -> Result<DriveStats>
where
    R: BufRead,
    W: Write,
{
    convert_with(reader, writer, ReaderOptions::default())
}

/// Like [`convert`], with explicit reader options.
pub fn convert_with<R, W>(reader: R, writer: &mut Writer<W>, options: ReaderOptions) -> Result<DriveStats>
where
    R: BufRead,
    W: Write,
{
    drive(JsonReader::with_options(reader, options), writer)
}

/// Convert a JSON document held in memory into an XML string.
pub fn convert_str(json: &str) -> Result<String> {
    let mut writer = Writer::new(Vec::with_capacity(json.len() * 2));
    convert(json.as_bytes(), &mut writer)?;
    Ok(String::from_utf8_lossy(&writer.into_inner()).into_owned())
}
