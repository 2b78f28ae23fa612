//! Data model for GS2 (version 1.2) metering documents.
//!
//! The types here are plain data: they carry no codec logic and no
//! validation. See the `gs2-codec` crate for reading and writing them.

pub mod domain;

pub use domain::{Document, EndMessage, Message, MeterReading, StartMessage, TimeSeries, Triplet};
