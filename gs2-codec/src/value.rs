//! Parsing and formatting of GS2 primitive values.
//!
//! | kind      | literal                  |
//! |-----------|--------------------------|
//! | timestamp | `2020-03-26.23:00:00`    |
//! | duration  | `0000-00-00.01:30:00`    |
//! | triplet   | `value/time/quality`     |
//! | array     | `< t1 t2 t3 >`           |
//!
//! Timestamps are zone-less. The hour `24` means midnight of the next day.

use gs2_model::Triplet;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Duration, PrimitiveDateTime};

use crate::error::{Error, Result};
use crate::schema::{Value, ValueKind, ValueRef};

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day].[hour]:[minute]:[second]");

/// Date written in front of every duration; only the clock part is read back.
const DURATION_DATE: &str = "0000-00-00";

const DURATION_UNITS: [Duration; 3] = [Duration::HOUR, Duration::MINUTE, Duration::SECOND];

/// Parse `raw` as a value of `kind`. Arrays are split by the decoder, so
/// `TripletArray` parses a single space-separated list here.
pub fn parse(kind: ValueKind, raw: &str) -> Result<Value> {
    Ok(match kind {
        ValueKind::Text => Value::Text(raw.to_string()),
        ValueKind::Integer => Value::Integer(parse_integer(raw)?),
        ValueKind::Float => Value::Float(parse_float(raw)?),
        ValueKind::Duration => Value::Duration(parse_duration(raw)?),
        ValueKind::Timestamp => Value::Timestamp(parse_timestamp(raw)?),
        ValueKind::Triplet => Value::Triplet(parse_triplet(raw)?),
        ValueKind::TripletArray => Value::TripletArray(
            raw.split(' ')
                .filter(|s| !s.is_empty())
                .map(parse_triplet)
                .collect::<Result<_>>()?,
        ),
    })
}

pub fn parse_integer(raw: &str) -> Result<i64> {
    raw.parse()
        .map_err(|e| Error::unparsable(ValueKind::Integer, raw, e))
}

pub fn parse_float(raw: &str) -> Result<f64> {
    raw.parse()
        .map_err(|e| Error::unparsable(ValueKind::Float, raw, e))
}

/// Parse a `YYYY-MM-DD.hh:mm:ss` literal. Empty input is the absent instant.
pub fn parse_timestamp(raw: &str) -> Result<Option<PrimitiveDateTime>> {
    if raw.is_empty() {
        return Ok(None);
    }

    let (literal, next_day) = match raw.split_once('.') {
        Some((date, clock)) if clock.starts_with("24") => (format!("{date}.00{}", &clock[2..]), true),
        _ => (raw.to_string(), false),
    };

    let parsed = PrimitiveDateTime::parse(&literal, TIMESTAMP_FORMAT)
        .map_err(|e| Error::unparsable(ValueKind::Timestamp, raw, e))?;

    if !next_day {
        return Ok(Some(parsed));
    }

    parsed
        .checked_add(Duration::DAY)
        .map(Some)
        .ok_or_else(|| Error::unparsable(ValueKind::Timestamp, raw, "day after 24:00 is out of range"))
}

/// Parse the clock part of a `0000-00-00.hh:mm:ss` literal.
///
/// Components are read positionally as hours, minutes and seconds; missing
/// trailing components add nothing. The date part is ignored.
pub fn parse_duration(raw: &str) -> Result<Duration> {
    if raw.is_empty() {
        return Ok(Duration::ZERO);
    }

    let clock = raw.split_once('.').map_or(raw, |(_, clock)| clock);
    let parts: Vec<&str> = clock.split(':').collect();
    if parts.len() > DURATION_UNITS.len() {
        return Err(Error::unparsable(
            ValueKind::Duration,
            raw,
            "expected at most hours, minutes and seconds",
        ));
    }

    parts
        .iter()
        .zip(DURATION_UNITS)
        .try_fold(Duration::ZERO, |total, (part, unit)| {
            let factor: i32 = part
                .parse()
                .map_err(|e| Error::unparsable(ValueKind::Duration, raw, e))?;
            unit.checked_mul(factor)
                .and_then(|d| total.checked_add(d))
                .ok_or_else(|| Error::unparsable(ValueKind::Duration, raw, "duration overflows"))
        })
}

/// Parse `value/time/quality`. Empty segments take their defaults; segments
/// past the third are ignored.
pub fn parse_triplet(raw: &str) -> Result<Triplet> {
    let mut segments = raw.split('/');

    let value = match segments.next() {
        Some(v) if !v.is_empty() => v
            .parse()
            .map_err(|e| Error::unparsable(ValueKind::Triplet, raw, e))?,
        _ => 0.0,
    };
    let time = match segments.next() {
        Some(t) => parse_timestamp(t).map_err(|e| match e {
            Error::UnparsableValue { reason, .. } => Error::unparsable(ValueKind::Triplet, raw, reason),
            other => other,
        })?,
        None => None,
    };
    let quality = segments.next().unwrap_or_default().to_string();

    Ok(Triplet { value, time, quality })
}

/// Formatting settings for one encode call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Format {
    /// Fixed number of decimals for floats. `None` writes the shortest
    /// literal that reads back to the same value.
    pub float_precision: Option<usize>,
}

impl Format {
    pub fn float(&self, v: f64) -> String {
        match self.float_precision {
            Some(precision) => format!("{v:.precision$}"),
            None => v.to_string(),
        }
    }

    pub fn triplet(&self, t: &Triplet) -> Result<String> {
        let time = match t.time {
            Some(time) => format_timestamp(time)?,
            None => String::new(),
        };
        Ok(format!("{}/{}/{}", self.float(t.value), time, t.quality))
    }

    /// Write one scalar value. Arrays are `< t1 t2 >` with a space after
    /// every element.
    pub fn value(&self, value: ValueRef<'_>, out: &mut String) -> Result<()> {
        match value {
            ValueRef::Text(s) => out.push_str(s),
            ValueRef::Integer(i) => out.push_str(&i.to_string()),
            ValueRef::Float(f) => out.push_str(&self.float(f)),
            ValueRef::Duration(d) => out.push_str(&format_duration(d)?),
            ValueRef::Timestamp(Some(t)) => out.push_str(&format_timestamp(t)?),
            ValueRef::Timestamp(None) => {}
            ValueRef::Triplet(t) => out.push_str(&self.triplet(t)?),
            ValueRef::TripletArray(values) => {
                out.push_str("< ");
                for t in values {
                    out.push_str(&self.triplet(t)?);
                    out.push(' ');
                }
                out.push('>');
            }
        }
        Ok(())
    }
}

pub fn format_timestamp(t: PrimitiveDateTime) -> Result<String> {
    t.format(TIMESTAMP_FORMAT).map_err(|e| Error::UnsupportedValue {
        kind: ValueKind::Timestamp,
        reason: e.to_string(),
    })
}

/// Format a duration as `0000-00-00.hh:mm:ss`. Whole seconds only; hours
/// are not wrapped at 24.
pub fn format_duration(d: Duration) -> Result<String> {
    if d.is_negative() {
        return Err(Error::UnsupportedValue {
            kind: ValueKind::Duration,
            reason: format!("negative duration {d}"),
        });
    }

    let seconds = d.whole_seconds();
    Ok(format!(
        "{DURATION_DATE}.{:02}:{:02}:{:02}",
        seconds / 3600,
        seconds % 3600 / 60,
        seconds % 60
    ))
}
