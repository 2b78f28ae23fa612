//! GS2 encoder. Validates the document, renders it into a buffer, and only
//! then writes to the sink.
//!
//! Blocks are written in schema order with a blank line after each block
//! except the end message. Attributes holding their zero value are left out,
//! apart from fields flagged `always_emit` (a time series' `Sum`).

use std::io::Write;
use std::sync::Arc;

use gs2_model::Document;

use crate::error::Result;
use crate::schema::{Block, BlockKind};
use crate::validate::{self, Validator, Validators};
use crate::value::Format;

#[derive(Clone)]
pub struct EncodeOptions {
    pub validators: Validators,
    /// Decimals for every float. `None` writes the shortest exact form.
    pub float_precision: Option<usize>,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            validators: validate::default_validators(),
            float_precision: None,
        }
    }
}

impl std::fmt::Debug for EncodeOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<_> = self.validators.iter().map(|v| v.name()).collect();
        f.debug_struct("EncodeOptions")
            .field("validators", &names)
            .field("float_precision", &self.float_precision)
            .finish()
    }
}

impl EncodeOptions {
    pub fn with_validators(mut self, validators: Validators) -> Self {
        self.validators = validators;
        self
    }

    pub fn with_validator(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(Arc::new(validator));
        self
    }

    pub fn without_validators(mut self) -> Self {
        self.validators.clear();
        self
    }

    pub fn with_float_precision(mut self, precision: usize) -> Self {
        self.float_precision = Some(precision);
        self
    }
}

#[derive(Debug, Clone, Default)]
pub struct Encoder {
    options: EncodeOptions,
}

impl Encoder {
    pub fn new(options: EncodeOptions) -> Self {
        Self { options }
    }

    /// Encode `doc` and write it to `sink` in one call. Nothing is written
    /// if validation or formatting fails.
    pub fn encode<W: Write>(&self, doc: &Document, mut sink: W) -> Result<()> {
        let out = self.encode_to_vec(doc)?;
        sink.write_all(&out)?;
        Ok(())
    }

    pub fn encode_to_vec(&self, doc: &Document) -> Result<Vec<u8>> {
        validate::run(&self.options.validators, doc)?;

        let format = Format {
            float_precision: self.options.float_precision,
        };
        let mut out = String::new();

        for kind in BlockKind::ALL {
            match kind {
                BlockKind::StartMessage => {
                    block(kind, &doc.start_message, format, &mut out)?;
                    out.push('\n');
                }
                BlockKind::MeterReading => {
                    for reading in &doc.meter_readings {
                        block(kind, reading, format, &mut out)?;
                        out.push('\n');
                    }
                }
                BlockKind::TimeSeries => {
                    for ts in &doc.time_series {
                        block(kind, ts, format, &mut out)?;
                        out.push('\n');
                    }
                }
                BlockKind::EndMessage => block(kind, &doc.end_message, format, &mut out)?,
            }
        }

        tracing::debug!(
            bytes = out.len(),
            meter_readings = doc.meter_readings.len(),
            time_series = doc.time_series.len(),
            "encoded GS2 document"
        );
        Ok(out.into_bytes())
    }
}

fn block<T: Block>(kind: BlockKind, value: &T, format: Format, out: &mut String) -> Result<()> {
    out.push_str("##");
    out.push_str(kind.name());
    out.push('\n');

    for field in T::fields() {
        let v = field.read(value);
        if v.is_zero() && !field.always_emit {
            continue;
        }
        out.push('#');
        out.push_str(field.name);
        out.push('=');
        format.value(v, out)?;
        out.push('\n');
    }
    Ok(())
}
