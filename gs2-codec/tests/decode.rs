mod common;

use gs2_codec::validate::{TimeSeriesSpan, ValidationError};
use gs2_codec::{DecodeOptions, Decoder, Error};

#[test]
fn decodes_meter_readings() {
    let doc = gs2_codec::decode(common::fixture("meterreading.gs2")).unwrap();
    assert_eq!(doc, common::meter_reading_document());
}

#[test]
fn decodes_time_series() {
    let doc = gs2_codec::decode(common::fixture("timeseries.gs2")).unwrap();
    assert_eq!(doc, common::time_series_document());
}

#[test]
fn newlines_are_optional() {
    let doc = gs2_codec::decode(common::fixture("timeseries_no_newlines.gs2")).unwrap();
    assert_eq!(doc, common::time_series_document());
}

#[test]
fn decodes_mixed_step_durations() {
    let doc = gs2_codec::decode(common::fixture("durations.gs2")).unwrap();
    assert_eq!(doc, common::durations_document());
}

#[test]
fn fixtures_satisfy_span_check() {
    let decoder = Decoder::new(DecodeOptions::default().with_validator(TimeSeriesSpan));
    assert!(decoder.decode(common::fixture("timeseries.gs2")).is_ok());
    assert!(decoder.decode(common::fixture("durations.gs2")).is_ok());
}

#[test]
fn decodes_documented_example() {
    let input = "##Start-message\n#Id=0\n#Number-of-objects=3\n\
                 ##Meter-reading\n#Reference=meterpoint1\n#Value=1.1//\n\
                 ##End-message\n#Id=0\n#Number-of-objects=3\n";
    let doc = gs2_codec::from_slice(input.as_bytes()).unwrap();

    assert_eq!(doc.meter_readings.len(), 1);
    let value = &doc.meter_readings[0].value;
    assert_eq!(value.value, 1.1);
    assert_eq!(value.time, None);
    assert_eq!(value.quality, "");
}

#[test]
fn hour_24_equals_next_midnight() {
    let a = gs2_codec::decode(
        "##Start-message\n#Time=2020-03-26.24:00:00\n##End-message\n#Number-of-objects=2\n".as_bytes(),
    )
    .unwrap();
    let b = gs2_codec::decode(
        "##Start-message\n#Time=2020-03-27.00:00:00\n##End-message\n#Number-of-objects=2\n".as_bytes(),
    )
    .unwrap();
    assert_eq!(a.start_message.time, b.start_message.time);
}

#[test]
fn inconsistent_sum_is_rejected() {
    let input = "##Start-message\n#Number-of-objects=3\n\
                 ##Time-series\n#Value=< 1// 2// >\n#No-of-values=2\n#Sum=4\n\
                 ##End-message\n";
    let err = gs2_codec::from_slice(input.as_bytes()).unwrap_err();
    assert!(matches!(
        err,
        Error::Validation(ValidationError::SumMismatch { declared, computed, .. }) if declared == 4.0 && computed == 3.0
    ));
}

#[test]
fn disabled_validators_accept_inconsistent_document() {
    let input = "##Time-series\n#Value=< 1// 2// >\n#No-of-values=5\n#Sum=4\n";
    let doc = Decoder::new(DecodeOptions::default().without_validators())
        .decode_slice(input.as_bytes())
        .unwrap();
    assert_eq!(doc.time_series[0].no_of_values, 5);
    assert_eq!(doc.time_series[0].values.len(), 2);
}

#[test]
fn custom_validator_runs_after_defaults() {
    let decoder = Decoder::new(DecodeOptions::default().with_validator(|doc: &gs2_codec::Document| {
        if doc.start_message.id.is_empty() {
            Err(ValidationError::ObjectCountMismatch { declared: 0, actual: 0 })
        } else {
            Ok(())
        }
    }));
    let err = decoder
        .decode_slice(b"##Start-message\n##End-message\n#Number-of-objects=2\n")
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[test]
fn unknown_blocks_and_attributes_never_fail() {
    let input = "##Start-message\n#Id=0\n#Signature=xyz\n\
                 ##Future-block\n#Anything=< a b c >\n#Else=1\n\
                 ##End-message\n#Number-of-objects=2\n";
    let doc = gs2_codec::from_slice(input.as_bytes()).unwrap();
    assert_eq!(doc.start_message.id, "0");
    assert!(doc.meter_readings.is_empty());
    assert!(doc.time_series.is_empty());
}
