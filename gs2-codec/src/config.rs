use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::decode::DecodeOptions;
use crate::encode::EncodeOptions;
use crate::validate::{NumberOfObjects, TimeSeriesSpan, TimeSeriesValues, Validator, Validators};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ValidatorKind {
    NumberOfObjects,
    TimeSeriesValues,
    TimeSeriesSpan,
}

fn default_validator_kinds() -> Vec<ValidatorKind> {
    vec![ValidatorKind::NumberOfObjects, ValidatorKind::TimeSeriesValues]
}

/// Codec settings as read from a TOML file.
///
/// ```toml
/// float_precision = 3
/// validators = ["number-of-objects", "time-series-values", "time-series-span"]
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CodecConfig {
    pub float_precision: Option<usize>,
    #[serde(default = "default_validator_kinds")]
    pub validators: Vec<ValidatorKind>,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            float_precision: None,
            validators: default_validator_kinds(),
        }
    }
}

impl CodecConfig {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> anyhow::Result<Self> {
        let cfg: CodecConfig = toml::from_str(contents)?;
        Ok(cfg)
    }

    pub fn validators(&self) -> Validators {
        self.validators
            .iter()
            .map(|kind| -> Arc<dyn Validator> {
                match kind {
                    ValidatorKind::NumberOfObjects => Arc::new(NumberOfObjects),
                    ValidatorKind::TimeSeriesValues => Arc::new(TimeSeriesValues),
                    ValidatorKind::TimeSeriesSpan => Arc::new(TimeSeriesSpan),
                }
            })
            .collect()
    }

    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions::default().with_validators(self.validators())
    }

    pub fn encode_options(&self) -> EncodeOptions {
        EncodeOptions {
            validators: self.validators(),
            float_precision: self.float_precision,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let cfg = CodecConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, CodecConfig::default());
        assert_eq!(cfg.encode_options().float_precision, None);

        let names: Vec<_> = cfg.validators().iter().map(|v| v.name()).collect();
        assert_eq!(names, vec!["number-of-objects", "time-series-values"]);
    }

    #[test]
    fn reads_precision_and_validators() {
        let cfg = CodecConfig::from_toml_str(
            "float_precision = 3\nvalidators = [\"time-series-span\"]\n",
        )
        .unwrap();
        assert_eq!(cfg.float_precision, Some(3));
        assert_eq!(cfg.validators, vec![ValidatorKind::TimeSeriesSpan]);
        assert_eq!(cfg.decode_options().validators.len(), 1);
        assert_eq!(cfg.encode_options().float_precision, Some(3));
    }

    #[test]
    fn empty_validator_list_disables_checks() {
        let cfg = CodecConfig::from_toml_str("validators = []").unwrap();
        assert!(cfg.decode_options().validators.is_empty());
    }

    #[test]
    fn rejects_unknown_validator() {
        assert!(CodecConfig::from_toml_str("validators = [\"checksum\"]").is_err());
        assert!(CodecConfig::from_toml_str("precision = 3").is_err());
    }
}
