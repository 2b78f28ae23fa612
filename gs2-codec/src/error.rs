//! Error types for GS2 decoding and encoding.
//!
//! Every error aborts the current call. Unknown blocks and attributes are
//! not errors: the decoder skips them.

use thiserror::Error;

use crate::schema::ValueKind;
use crate::validate::ValidationError;

#[derive(Debug, Error)]
pub enum Error {
    /// The scanner entered its error state, or the grammar met a token it
    /// cannot accept in the current production.
    #[error("malformed input at byte {offset} while reading {production}: unexpected {}, near {context:?}", describe_byte(.byte))]
    MalformedToken {
        offset: usize,
        byte: Option<u8>,
        production: &'static str,
        context: String,
    },

    /// A recognized attribute's value failed to parse.
    #[error("invalid {kind} value {raw:?}: {reason}")]
    UnparsableValue {
        kind: ValueKind,
        raw: String,
        reason: String,
    },

    /// A value the GS2 text format cannot represent.
    #[error("cannot encode {kind} value: {reason}")]
    UnsupportedValue { kind: ValueKind, reason: String },

    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn unparsable(kind: ValueKind, raw: &str, reason: impl ToString) -> Self {
        Error::UnparsableValue {
            kind,
            raw: raw.to_string(),
            reason: reason.to_string(),
        }
    }
}

fn describe_byte(byte: &Option<u8>) -> String {
    match *byte {
        Some(b) => format!("{:?}", b as char),
        None => "end of input".to_string(),
    }
}
