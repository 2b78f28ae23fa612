use time::PrimitiveDateTime;

use super::Triplet;

/// A single channel reading at one point in time.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MeterReading {
    pub reference: String,
    pub time: Option<PrimitiveDateTime>,
    pub unit: String,
    pub value: Triplet,
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
