//! Consistency checks that GS2 promises but does not enforce structurally.
//!
//! Rules:
//! - Start and end messages agree on the number of objects, and that number
//!   equals readings + series + 2.
//! - Every time series holds `No-of-values` values summing to `Sum` within
//!   [`SUM_TOLERANCE`].
//! - Optionally, every time series spans `Start + Step * No-of-values == Stop`.

use std::sync::Arc;

use gs2_model::Document;
use thiserror::Error;

/// Largest accepted difference between a declared and a computed sum.
pub const SUM_TOLERANCE: f64 = 0.000001;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("conflicting number of objects: start message says {start}, end message says {end}")]
    ConflictingObjectCount { start: i64, end: i64 },

    #[error("number of objects not matching: found {actual}, but start/end says {declared}")]
    ObjectCountMismatch { declared: i64, actual: usize },

    #[error("time series {reference:?}: No-of-values says {declared}, but got {actual} values")]
    ValueCountMismatch {
        reference: String,
        declared: i64,
        actual: usize,
    },

    #[error("time series {reference:?}: Sum says {declared}, but values add up to {computed}")]
    SumMismatch {
        reference: String,
        declared: f64,
        computed: f64,
    },

    #[error("time series {reference:?}: Start + Step * No-of-values is {expected}, but Stop is {stop}")]
    SpanMismatch {
        reference: String,
        expected: String,
        stop: String,
    },
}

/// A check run over a whole document before it is returned from decode or
/// accepted by encode.
pub trait Validator: Send + Sync {
    fn name(&self) -> &'static str;
    fn validate(&self, doc: &Document) -> Result<(), ValidationError>;
}

impl<F> Validator for F
where
    F: Fn(&Document) -> Result<(), ValidationError> + Send + Sync,
{
    fn name(&self) -> &'static str {
        "custom"
    }

    fn validate(&self, doc: &Document) -> Result<(), ValidationError> {
        self(doc)
    }
}

pub type Validators = Vec<Arc<dyn Validator>>;

/// Object-count check followed by time-series consistency.
pub fn default_validators() -> Validators {
    vec![Arc::new(NumberOfObjects), Arc::new(TimeSeriesValues)]
}

/// Run `validators` in order, stopping at the first failure.
pub fn run(validators: &[Arc<dyn Validator>], doc: &Document) -> Result<(), ValidationError> {
    for v in validators {
        if let Err(e) = v.validate(doc) {
            metrics::counter!("gs2_validation_rejected_total", "validator" => v.name()).increment(1);
            tracing::debug!(validator = v.name(), error = %e, "document rejected");
            return Err(e);
        }
    }
    Ok(())
}

pub fn validate_no_of_objects(doc: &Document) -> Result<(), ValidationError> {
    let start = doc.start_message.number_of_objects;
    let end = doc.end_message.number_of_objects;

    if start != 0 && end != 0 && start != end {
        return Err(ValidationError::ConflictingObjectCount { start, end });
    }

    let declared = if start != 0 { start } else { end };
    let actual = doc.object_count();

    if usize::try_from(declared).ok() != Some(actual) {
        return Err(ValidationError::ObjectCountMismatch { declared, actual });
    }

    Ok(())
}

pub fn validate_time_series_values(doc: &Document) -> Result<(), ValidationError> {
    for ts in &doc.time_series {
        if usize::try_from(ts.no_of_values).ok() != Some(ts.values.len()) {
            return Err(ValidationError::ValueCountMismatch {
                reference: ts.reference.clone(),
                declared: ts.no_of_values,
                actual: ts.values.len(),
            });
        }

        let computed = ts.computed_sum();
        if (computed - ts.sum).abs() > SUM_TOLERANCE {
            return Err(ValidationError::SumMismatch {
                reference: ts.reference.clone(),
                declared: ts.sum,
                computed,
            });
        }
    }

    Ok(())
}

/// Series without a start or stop are not checked.
pub fn validate_time_series_span(doc: &Document) -> Result<(), ValidationError> {
    for ts in &doc.time_series {
        let (Some(_), Some(stop)) = (ts.start, ts.stop) else {
            continue;
        };
        let expected = ts.expected_stop();
        if expected != Some(stop) {
            return Err(ValidationError::SpanMismatch {
                reference: ts.reference.clone(),
                expected: expected.map_or_else(|| "out of range".to_string(), |t| t.to_string()),
                stop: stop.to_string(),
            });
        }
    }

    Ok(())
}

#[derive(Clone, Copy, Debug, Default)]
pub struct NumberOfObjects;

impl Validator for NumberOfObjects {
    fn name(&self) -> &'static str {
        "number-of-objects"
    }

    fn validate(&self, doc: &Document) -> Result<(), ValidationError> {
        validate_no_of_objects(doc)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TimeSeriesValues;

impl Validator for TimeSeriesValues {
    fn name(&self) -> &'static str {
        "time-series-values"
    }

    fn validate(&self, doc: &Document) -> Result<(), ValidationError> {
        validate_time_series_values(doc)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct TimeSeriesSpan;

impl Validator for TimeSeriesSpan {
    fn name(&self) -> &'static str {
        "time-series-span"
    }

    fn validate(&self, doc: &Document) -> Result<(), ValidationError> {
        validate_time_series_span(doc)
    }
}
