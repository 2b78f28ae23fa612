use super::{EndMessage, MeterReading, StartMessage, TimeSeries};

/// A complete GS2 document.
///
/// Readings and series keep the order in which their blocks appeared.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Document {
    pub start_message: StartMessage,
    pub meter_readings: Vec<MeterReading>,
    pub time_series: Vec<TimeSeries>,
    pub end_message: EndMessage,
}

impl Document {
    /// Number of GS2 objects in the document, counting both envelopes.
    pub fn object_count(&self) -> usize {
        self.meter_readings.len() + self.time_series.len() + 2
    }
}
