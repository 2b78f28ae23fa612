//! Decoder and encoder for GS2 1.2, the tag-delimited text format used to
//! exchange meter readings and time series between settlement systems.
//!
//! ```text
//! ##Start-message
//! #Id=0
//! #Number-of-objects=3
//! ##Meter-reading
//! #Reference=meterpoint1
//! #Value=1.1//
//! ##End-message
//! #Id=0
//! #Number-of-objects=3
//! ```
//!
//! [`decode`] and [`encode`] use the default options: both validators on,
//! shortest float formatting. Use [`Decoder`] and [`Encoder`] to change them.

pub mod config;
pub mod decode;
pub mod encode;
pub mod error;
pub mod observability;
pub mod scan;
pub mod schema;
pub mod validate;
pub mod value;

use std::io::{Read, Write};

pub use decode::{DecodeOptions, Decoder};
pub use encode::{EncodeOptions, Encoder};
pub use error::{Error, Result};
pub use gs2_model::{Document, EndMessage, Message, MeterReading, StartMessage, TimeSeries, Triplet};
pub use validate::{ValidationError, Validator};

pub fn decode<R: Read>(source: R) -> Result<Document> {
    Decoder::default().decode(source)
}

pub fn from_slice(input: &[u8]) -> Result<Document> {
    Decoder::default().decode_slice(input)
}

pub fn encode<W: Write>(doc: &Document, sink: W) -> Result<()> {
    Encoder::default().encode(doc, sink)
}

pub fn to_vec(doc: &Document) -> Result<Vec<u8>> {
    Encoder::default().encode_to_vec(doc)
}
