use time::PrimitiveDateTime;

/// The GS2 envelope block. Every document opens with one (`Start-message`)
/// and closes with one (`End-message`); both share this shape.
///
/// Text fields are empty when absent. `gmt_reference` is the hour offset of
/// the source timezone, i.e. local time is GMT+`gmt_reference`.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Message {
    pub id: String,
    pub message_type: String,
    pub version: String,
    pub time: Option<PrimitiveDateTime>,
    pub to: String,
    pub from: String,
    pub reference_table: String,
    pub gmt_reference: i64,
    pub number_of_objects: i64,
    pub type_of_objects: String,
    pub contains_objects: String,
    pub requested_action: String,
    pub description: String,
}

pub type StartMessage = Message;
pub type EndMessage = Message;
