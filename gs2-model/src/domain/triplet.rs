use time::PrimitiveDateTime;

/// A metered value with an optional time override and a quality code.
///
/// `time` is `None` when the reading carries no explicit time. An empty
/// `quality` means the quality was not reported.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Triplet {
    pub value: f64,
    pub time: Option<PrimitiveDateTime>,
    pub quality: String,
}

impl Triplet {
    pub fn new(value: f64) -> Self {
        Self {
            value,
            ..Self::default()
        }
    }

    pub fn with_quality(value: f64, quality: impl Into<String>) -> Self {
        Self {
            value,
            time: None,
            quality: quality.into(),
        }
    }
}
