//! GS2 decoder: drives the [`Scanner`] over a fully buffered input and binds
//! blocks and attributes to the model through the [`Schema`].
//!
//! Unknown blocks and attributes are skipped. After the document is built
//! and validated, its envelope, reading and series timestamps are shifted by
//! `-GMT-reference` hours (absent timestamps stay absent).

use std::io::Read;
use std::sync::Arc;

use gs2_model::{Document, MeterReading, TimeSeries, Triplet};
use time::{Duration, PrimitiveDateTime};

use crate::error::{Error, Result};
use crate::scan::{Scan, Scanner};
use crate::schema::{Block, BlockKind, Field, Schema, Value, ValueKind};
use crate::validate::{self, Validator, Validators};
use crate::value;

/// Bytes of input quoted around the failure point in errors.
const CONTEXT_BYTES: usize = 32;

#[derive(Clone)]
pub struct DecodeOptions {
    pub validators: Validators,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            validators: validate::default_validators(),
        }
    }
}

impl std::fmt::Debug for DecodeOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<_> = self.validators.iter().map(|v| v.name()).collect();
        f.debug_struct("DecodeOptions").field("validators", &names).finish()
    }
}

impl DecodeOptions {
    /// Replace the validator list. Include [`validate::default_validators`]
    /// if the defaults should still run.
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
}

#[derive(Debug, Clone)]
pub struct Decoder<'s> {
    options: DecodeOptions,
    schema: &'s Schema,
}

impl Default for Decoder<'static> {
    fn default() -> Self {
        Self::new(DecodeOptions::default())
    }
}

impl Decoder<'static> {
    pub fn new(options: DecodeOptions) -> Self {
        Self {
            options,
            schema: Schema::shared(),
        }
    }
}

impl<'s> Decoder<'s> {
    pub fn with_schema(options: DecodeOptions, schema: &'s Schema) -> Self {
        Self { options, schema }
    }

    /// Read all of `source`, then decode it.
    pub fn decode<R: Read>(&self, mut source: R) -> Result<Document> {
        let mut buf = Vec::new();
        source.read_to_end(&mut buf)?;
        self.decode_slice(&buf)
    }

    pub fn decode_slice(&self, input: &[u8]) -> Result<Document> {
        tracing::debug!(bytes = input.len(), "decoding GS2 document");

        let result = Parser::new(input, self.schema).document().and_then(|mut doc| {
            validate::run(&self.options.validators, &doc)?;
            normalize_timestamps(&mut doc);
            Ok(doc)
        });

        match &result {
            Ok(doc) => tracing::debug!(
                meter_readings = doc.meter_readings.len(),
                time_series = doc.time_series.len(),
                "decoded GS2 document"
            ),
            Err(e) => {
                metrics::counter!("gs2_decode_errors_total").increment(1);
                tracing::debug!(error = %e, "failed to decode GS2 document");
            }
        }

        result
    }
}

/// Shift every envelope, reading and series timestamp from the source zone
/// (GMT+`GMT-reference`) to GMT.
fn normalize_timestamps(doc: &mut Document) {
    let offset = Duration::seconds(doc.start_message.gmt_reference.saturating_mul(-3600));
    let shift = |t: &mut Option<PrimitiveDateTime>| {
        if let Some(time) = t {
            *time = time.saturating_add(offset);
        }
    };

    shift(&mut doc.start_message.time);
    shift(&mut doc.end_message.time);
    for reading in &mut doc.meter_readings {
        shift(&mut reading.time);
    }
    for ts in &mut doc.time_series {
        shift(&mut ts.start);
        shift(&mut ts.stop);
    }
}

/// Grammar layer over the scanner. `last` is `None` once input is exhausted.
struct Parser<'a, 's> {
    input: &'a [u8],
    pos: usize,
    scanner: Scanner,
    last: Option<Scan>,
    schema: &'s Schema,
}

impl<'a, 's> Parser<'a, 's> {
    fn new(input: &'a [u8], schema: &'s Schema) -> Self {
        Self {
            input,
            pos: 0,
            scanner: Scanner::new(),
            last: Some(Scan::SkipSpace),
            schema,
        }
    }

    fn next(&mut self) -> Option<Scan> {
        self.last = match self.input.get(self.pos) {
            Some(&b) => {
                self.pos += 1;
                Some(self.scanner.step(b))
            }
            None => None,
        };
        self.last
    }

    fn last_byte(&self) -> Option<u8> {
        match self.last {
            Some(_) => self.pos.checked_sub(1).map(|i| self.input[i]),
            None => None,
        }
    }

    fn peek(&self) -> Option<u8> {
        self.input.get(self.pos).copied()
    }

    /// True after a single `#` that opens an attribute rather than a block.
    fn at_attribute(&self) -> bool {
        self.last == Some(Scan::Hash) && self.peek() != Some(b'#')
    }

    fn malformed(&self, production: &'static str, from: usize) -> Error {
        let start = from.min(self.pos).saturating_sub(CONTEXT_BYTES);
        let end = (self.pos + CONTEXT_BYTES).min(self.input.len());
        let reason = self.scanner.error().map(str::to_string);
        let mut context = String::from_utf8_lossy(&self.input[start..end]).into_owned();
        if let Some(reason) = reason {
            context = format!("{context} ({reason})");
        }
        // At end of input the failure sits just past the last byte.
        let offset = match self.last {
            Some(_) => self.pos.saturating_sub(1),
            None => self.input.len(),
        };
        Error::MalformedToken {
            offset,
            byte: self.last_byte(),
            production,
            context,
        }
    }

    fn document(mut self) -> Result<Document> {
        let mut doc = Document::default();

        // The first `#` opens the first block; its twin is consumed below.
        loop {
            match self.next() {
                Some(Scan::Hash) | None => break,
                Some(Scan::SkipSpace) => {}
                Some(_) => return Err(self.malformed("start of document", 0)),
            }
        }

        while self.pos < self.input.len() {
            match self.next() {
                Some(Scan::Hash) => self.block(&mut doc)?,
                Some(Scan::SkipSpace) => {}
                _ => return Err(self.malformed("start of block", self.pos)),
            }
        }

        Ok(doc)
    }

    fn block(&mut self, doc: &mut Document) -> Result<()> {
        let from = self.pos;
        let mut name = Vec::new();
        loop {
            match self.next() {
                Some(Scan::Continue) => name.extend(self.last_byte()),
                Some(Scan::SkipSpace) => {}
                Some(Scan::Hash) | None => break,
                Some(_) => return Err(self.malformed("block name", from)),
            }
        }

        let name = String::from_utf8_lossy(&name);
        let Some(kind) = self.schema.block(&name) else {
            tracing::debug!(block = %name, "skipping unknown block");
            metrics::counter!("gs2_unknown_blocks_skipped_total").increment(1);
            return self.skip_block(from);
        };

        match kind {
            BlockKind::StartMessage => doc.start_message = self.attributes(Schema::message_field)?,
            BlockKind::EndMessage => doc.end_message = self.attributes(Schema::message_field)?,
            BlockKind::MeterReading => {
                let reading: MeterReading = self.attributes(Schema::meter_reading_field)?;
                doc.meter_readings.push(reading);
            }
            BlockKind::TimeSeries => {
                let series: TimeSeries = self.attributes(Schema::time_series_field)?;
                doc.time_series.push(series);
            }
        }
        Ok(())
    }

    fn attributes<T: Block>(
        &mut self,
        lookup: fn(&Schema, &str) -> Option<&'static Field<T>>,
    ) -> Result<T> {
        let mut block = T::default();
        while self.at_attribute() {
            self.attribute(&mut block, lookup)?;
        }
        Ok(block)
    }

    fn attribute<T: Block>(
        &mut self,
        block: &mut T,
        lookup: fn(&Schema, &str) -> Option<&'static Field<T>>,
    ) -> Result<()> {
        let from = self.pos;
        let mut name = Vec::new();
        loop {
            match self.next() {
                Some(Scan::Continue) => name.extend(self.last_byte()),
                Some(Scan::BeginValue) => break,
                _ => return Err(self.malformed("attribute name", from)),
            }
        }

        let name = String::from_utf8_lossy(&name);
        let Some(field) = lookup(self.schema, &name) else {
            tracing::trace!(attribute = %name, "skipping unknown attribute");
            return self.skip_attribute(from);
        };

        let value = match field.kind {
            ValueKind::TripletArray => Value::TripletArray(self.array()?),
            kind => {
                let raw = self.scalar()?;
                value::parse(kind, &raw)?
            }
        };
        field.write(block, value);
        Ok(())
    }

    /// Bytes up to the next `#` or end of input, minus skipped whitespace.
    fn scalar(&mut self) -> Result<String> {
        let from = self.pos;
        let mut raw = Vec::new();
        loop {
            match self.next() {
                Some(Scan::Continue) => raw.extend(self.last_byte()),
                Some(Scan::SkipSpace) => {}
                Some(Scan::Hash) | None => break,
                Some(_) => return Err(self.malformed("value", from)),
            }
        }
        String::from_utf8(raw).map_err(|e| {
            let raw = String::from_utf8_lossy(e.as_bytes()).into_owned();
            Error::UnparsableValue {
                kind: ValueKind::Text,
                raw,
                reason: "value is not valid UTF-8".to_string(),
            }
        })
    }

    /// `< t1 t2 ... >`. A value with no `<` before the next attribute is an
    /// empty array.
    fn array(&mut self) -> Result<Vec<Triplet>> {
        let from = self.pos;
        loop {
            match self.next() {
                Some(Scan::ArrayStart) => break,
                Some(Scan::SkipSpace) => {}
                Some(Scan::Continue) if self.last_byte() == Some(b' ') => {}
                Some(Scan::Hash) | None => return Ok(Vec::new()),
                Some(_) => return Err(self.malformed("array", from)),
            }
        }

        let mut values = Vec::new();
        let mut item = Vec::new();
        let mut closed = false;
        loop {
            match self.next() {
                Some(Scan::Continue) => item.extend(self.last_byte()),
                Some(tok @ (Scan::ArraySeparator | Scan::ArrayEnd)) => {
                    if !item.is_empty() {
                        let raw = String::from_utf8_lossy(&item);
                        values.push(value::parse_triplet(&raw)?);
                        item.clear();
                    }
                    closed |= tok == Scan::ArrayEnd;
                }
                Some(Scan::SkipSpace) => {}
                Some(Scan::Hash) => break,
                None if closed => break,
                _ => return Err(self.malformed("array", from)),
            }
        }
        Ok(values)
    }

    /// Skip to the `#` that precedes the next block header, or end of input.
    fn skip_block(&mut self, from: usize) -> Result<()> {
        loop {
            if self.last == Some(Scan::Hash) && self.peek() == Some(b'#') {
                return Ok(());
            }
            match self.next() {
                None => return Ok(()),
                Some(Scan::Error) => return Err(self.malformed("unknown block", from)),
                Some(_) => {}
            }
        }
    }

    /// Skip to the next `#` or end of input.
    fn skip_attribute(&mut self, from: usize) -> Result<()> {
        loop {
            match self.next() {
                Some(Scan::Hash) | None => return Ok(()),
                Some(Scan::Error) => return Err(self.malformed("unknown attribute", from)),
                Some(_) => {}
            }
        }
    }
}
