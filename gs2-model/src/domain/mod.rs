mod document;
mod message;
mod meter_reading;
mod time_series;
mod triplet;

pub use document::Document;
pub use message::{EndMessage, Message, StartMessage};
pub use meter_reading::MeterReading;
pub use time_series::TimeSeries;
pub use triplet::Triplet;
