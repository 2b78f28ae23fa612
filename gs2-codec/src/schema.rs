//! Static GS2 1.2 schema: which blocks exist, which attributes each block
//! carries, and how each attribute maps onto a model field.
//!
//! Each block type has an ordered field table. Order matters: the encoder
//! emits attributes in table order. Lookups by wire name are
//! case-insensitive and go through a [`Schema`] built once per process.

use std::collections::HashMap;
use std::fmt;

use gs2_model::{Message, MeterReading, TimeSeries, Triplet};
use once_cell::sync::Lazy;
use time::{Duration, PrimitiveDateTime};

/// Value domain of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Text,
    Integer,
    Float,
    Duration,
    Timestamp,
    Triplet,
    TripletArray,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Text => "text",
            ValueKind::Integer => "integer",
            ValueKind::Float => "float",
            ValueKind::Duration => "duration",
            ValueKind::Timestamp => "timestamp",
            ValueKind::Triplet => "value triplet",
            ValueKind::TripletArray => "value triplet array",
        };
        f.write_str(name)
    }
}

/// A decoded attribute value, ready to be stored in a model field.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Integer(i64),
    Float(f64),
    Duration(Duration),
    Timestamp(Option<PrimitiveDateTime>),
    Triplet(Triplet),
    TripletArray(Vec<Triplet>),
}

/// A borrowed view of a model field, used when encoding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueRef<'a> {
    Text(&'a str),
    Integer(i64),
    Float(f64),
    Duration(Duration),
    Timestamp(Option<PrimitiveDateTime>),
    Triplet(&'a Triplet),
    TripletArray(&'a [Triplet]),
}

impl ValueRef<'_> {
    pub fn kind(&self) -> ValueKind {
        match self {
            ValueRef::Text(_) => ValueKind::Text,
            ValueRef::Integer(_) => ValueKind::Integer,
            ValueRef::Float(_) => ValueKind::Float,
            ValueRef::Duration(_) => ValueKind::Duration,
            ValueRef::Timestamp(_) => ValueKind::Timestamp,
            ValueRef::Triplet(_) => ValueKind::Triplet,
            ValueRef::TripletArray(_) => ValueKind::TripletArray,
        }
    }

    /// Whether this is the type's default value. Zero floats compare by bit
    /// pattern, so `-0.0` is not zero.
    pub fn is_zero(&self) -> bool {
        match self {
            ValueRef::Text(s) => s.is_empty(),
            ValueRef::Integer(i) => *i == 0,
            ValueRef::Float(f) => f.to_bits() == 0,
            ValueRef::Duration(d) => d.is_zero(),
            ValueRef::Timestamp(t) => t.is_none(),
            ValueRef::Triplet(t) => t.value.to_bits() == 0 && t.time.is_none() && t.quality.is_empty(),
            ValueRef::TripletArray(v) => v.is_empty(),
        }
    }
}

/// One attribute of a block type.
pub struct Field<T> {
    pub name: &'static str,
    pub kind: ValueKind,
    /// Emit the attribute even when it holds the zero value.
    pub always_emit: bool,
    read: for<'a> fn(&'a T) -> ValueRef<'a>,
    write: fn(&mut T, Value),
}

impl<T> Field<T> {
    pub fn read<'a>(&self, target: &'a T) -> ValueRef<'a> {
        (self.read)(target)
    }

    /// Store `value` in `target`. `value` must be of this field's kind; the
    /// decoder guarantees that by parsing with [`Field::kind`].
    pub fn write(&self, target: &mut T, value: Value) {
        (self.write)(target, value)
    }
}

impl<T> fmt::Debug for Field<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("always_emit", &self.always_emit)
            .finish()
    }
}

macro_rules! field {
    (@build $name:literal, $member:ident, $kind:ident, $always:literal, $read:expr) => {
        Field {
            name: $name,
            kind: ValueKind::$kind,
            always_emit: $always,
            read: $read,
            write: |t, v| {
                if let Value::$kind(x) = v {
                    t.$member = x;
                }
            },
        }
    };
    ($name:literal, $member:ident, Text) => {
        field!(@build $name, $member, Text, false, |t| ValueRef::Text(&t.$member))
    };
    ($name:literal, $member:ident, Triplet) => {
        field!(@build $name, $member, Triplet, false, |t| ValueRef::Triplet(&t.$member))
    };
    ($name:literal, $member:ident, TripletArray) => {
        field!(@build $name, $member, TripletArray, false, |t| ValueRef::TripletArray(&t.$member))
    };
    ($name:literal, $member:ident, $kind:ident, always) => {
        field!(@build $name, $member, $kind, true, |t| ValueRef::$kind(t.$member))
    };
    ($name:literal, $member:ident, $kind:ident) => {
        field!(@build $name, $member, $kind, false, |t| ValueRef::$kind(t.$member))
    };
}

/// A GS2 block type and its ordered attribute table.
pub trait Block: Default + 'static {
    fn fields() -> &'static [Field<Self>];
}

static MESSAGE_FIELDS: [Field<Message>; 13] = [
    field!("Id", id, Text),
    field!("Message-type", message_type, Text),
    field!("Version", version, Text),
    field!("Time", time, Timestamp),
    field!("To", to, Text),
    field!("From", from, Text),
    field!("Reference-table", reference_table, Text),
    field!("GMT-reference", gmt_reference, Integer),
    field!("Number-of-objects", number_of_objects, Integer),
    field!("Type-of-objects", type_of_objects, Text),
    field!("Contains-objects", contains_objects, Text),
    field!("Requested-action", requested_action, Text),
    field!("Description", description, Text),
];

static METER_READING_FIELDS: [Field<MeterReading>; 13] = [
    field!("Reference", reference, Text),
    field!("Time", time, Timestamp),
    field!("Unit", unit, Text),
    field!("Value", value, Triplet),
    field!("Installation", installation, Text),
    field!("Plant", plant, Text),
    field!("Meter-location", meter_location, Text),
    field!("Net-owner", net_owner, Text),
    field!("Supplier", supplier, Text),
    field!("Customer", customer, Text),
    field!("Meter", meter, Text),
    field!("Channel", channel, Text),
    field!("Description", description, Text),
];

// Sum is written even when zero: consumers read a missing Sum as "not
// computed" rather than as a zero settlement sum.
static TIME_SERIES_FIELDS: [Field<TimeSeries>; 19] = [
    field!("Reference", reference, Text),
    field!("Start", start, Timestamp),
    field!("Stop", stop, Timestamp),
    field!("Step", step, Duration),
    field!("Unit", unit, Text),
    field!("Type-of-value", type_of_value, Text),
    field!("Direction-of-flow", direction_of_flow, Text),
    field!("Value", values, TripletArray),
    field!("No-of-values", no_of_values, Integer),
    field!("Sum", sum, Float, always),
    field!("Installation", installation, Text),
    field!("Plant", plant, Text),
    field!("Meter-location", meter_location, Text),
    field!("Net-owner", net_owner, Text),
    field!("Supplier", supplier, Text),
    field!("Customer", customer, Text),
    field!("Meter", meter, Text),
    field!("Channel", channel, Text),
    field!("Description", description, Text),
];

impl Block for Message {
    fn fields() -> &'static [Field<Self>] {
        &MESSAGE_FIELDS
    }
}

impl Block for MeterReading {
    fn fields() -> &'static [Field<Self>] {
        &METER_READING_FIELDS
    }
}

impl Block for TimeSeries {
    fn fields() -> &'static [Field<Self>] {
        &TIME_SERIES_FIELDS
    }
}

/// Top-level blocks, in the order they are written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlockKind {
    StartMessage,
    MeterReading,
    TimeSeries,
    EndMessage,
}

impl BlockKind {
    pub const ALL: [BlockKind; 4] = [
        BlockKind::StartMessage,
        BlockKind::MeterReading,
        BlockKind::TimeSeries,
        BlockKind::EndMessage,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BlockKind::StartMessage => "Start-message",
            BlockKind::MeterReading => "Meter-reading",
            BlockKind::TimeSeries => "Time-series",
            BlockKind::EndMessage => "End-message",
        }
    }

    /// Repeatable blocks append to a sequence; the others overwrite.
    pub fn is_repeatable(self) -> bool {
        matches!(self, BlockKind::MeterReading | BlockKind::TimeSeries)
    }
}

/// Case-insensitive wire name to table index.
#[derive(Debug, Clone, Default)]
pub struct NameIndex {
    by_name: HashMap<String, usize>,
}

impl NameIndex {
    fn build<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let by_name = names
            .into_iter()
            .enumerate()
            .map(|(i, name)| (name.to_ascii_lowercase(), i))
            .collect();
        Self { by_name }
    }

    pub fn get(&self, name: &str) -> Option<usize> {
        self.by_name.get(&name.to_ascii_lowercase()).copied()
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

/// Name lookups for every block type. Immutable once built.
#[derive(Debug, Clone)]
pub struct Schema {
    blocks: NameIndex,
    message: NameIndex,
    meter_reading: NameIndex,
    time_series: NameIndex,
}

static SHARED: Lazy<Schema> = Lazy::new(Schema::new);

impl Default for Schema {
    fn default() -> Self {
        Self::new()
    }
}

impl Schema {
    pub fn new() -> Self {
        Self {
            blocks: NameIndex::build(BlockKind::ALL.iter().map(|b| b.name())),
            message: index_of::<Message>(),
            meter_reading: index_of::<MeterReading>(),
            time_series: index_of::<TimeSeries>(),
        }
    }

    /// Process-wide instance, built on first use.
    pub fn shared() -> &'static Schema {
        &SHARED
    }

    pub fn block(&self, name: &str) -> Option<BlockKind> {
        self.blocks.get(name).map(|i| BlockKind::ALL[i])
    }

    pub fn message_field(&self, name: &str) -> Option<&'static Field<Message>> {
        self.message.get(name).map(|i| &Message::fields()[i])
    }

    pub fn meter_reading_field(&self, name: &str) -> Option<&'static Field<MeterReading>> {
        self.meter_reading.get(name).map(|i| &MeterReading::fields()[i])
    }

    pub fn time_series_field(&self, name: &str) -> Option<&'static Field<TimeSeries>> {
        self.time_series.get(name).map(|i| &TimeSeries::fields()[i])
    }
}

fn index_of<T: Block>() -> NameIndex {
    NameIndex::build(T::fields().iter().map(|f| f.name))
}
