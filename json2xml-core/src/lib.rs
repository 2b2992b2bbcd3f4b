//! JSON to XML Core Converter
//!
//! Streaming, token-based translation of JSON into XML. Every JSON value
//! is wrapped in an element named after its type; object members carry
//! their key in a `name` attribute:
//!
//! ```text
//! {"Location": {"Longitude": -1.8262, "Latitude": 51.1789}}
//! ```
//! becomes
//! ```text
//! <object>
//!   <object name="Location">
//!     <number name="Longitude">-1.8262</number>
//!     <number name="Latitude">51.1789</number>
//!   </object>
//! </object>
//! ```
//! (indentation added for readability; none is emitted).
//!
//! The document is never held in memory: one JSON token goes in, one XML
//! token comes out.
//!
//! # Architecture
//!
//! - **tag.rs** - TypeTag enum and element names
//! - **token.rs** - JsonToken / XmlToken stream items
//! - **reader.rs** - Streaming JSON tokenizer (TokenSource over BufRead)
//! - **converter.rs** - The JSON → XML state machine
//! - **sink.rs** - TokenSink for quick-xml writers and token vectors
//! - **driver.rs** - Drive loop and convenience entry points
//! - **error.rs** - Error taxonomy

pub mod converter;
pub mod driver;
pub mod error;
pub mod reader;
pub mod sink;
pub mod source;
pub mod tag;
pub mod token;

pub use converter::{Converter, State};
pub use driver::{convert, convert_str, convert_with, drive, DriveStats};
pub use error::{Error, Result, SyntaxErrorCode};
pub use reader::{JsonReader, NumberFormat, ReaderOptions, DEFAULT_MAX_DEPTH};
pub use sink::TokenSink;
pub use source::{tokens, TokenSource, Tokens};
pub use tag::TypeTag;
pub use token::{JsonToken, Number, TokenKind, XmlToken};
