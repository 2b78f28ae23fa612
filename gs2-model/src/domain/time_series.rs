use time::{Duration, PrimitiveDateTime};

use super::Triplet;

/// Metered values over the interval `[start, stop)`, one value per `step`.
///
/// `no_of_values` and `sum` are the counts declared in the source text. They
/// are kept as read so validators can compare them with `values`.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TimeSeries {
    pub reference: String,
    pub start: Option<PrimitiveDateTime>,
    pub stop: Option<PrimitiveDateTime>,
    pub step: Duration,
    pub unit: String,
    pub type_of_value: String,
    pub direction_of_flow: String,
    pub values: Vec<Triplet>,
    pub no_of_values: i64,
    pub sum: f64,
    pub installation: String,
    pub plant: String,
    pub meter_location: String,
    pub net_owner: String,
    pub supplier: String,
    pub customer: String,
    pub meter: String,
    pub channel: String,
    pub description: String,
}

impl TimeSeries {
    /// Sum of all values in the series, in order.
    pub fn computed_sum(&self) -> f64 {
        self.values.iter().map(|t| t.value).sum()
    }

    /// `start + step * no_of_values`, or `None` without a start or on overflow.
    pub fn expected_stop(&self) -> Option<PrimitiveDateTime> {
        let count = i32::try_from(self.no_of_values).ok()?;
        let span = self.step.checked_mul(count)?;
        self.start?.checked_add(span)
    }
}
