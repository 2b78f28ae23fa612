#![allow(dead_code)]

use std::fs::File;
use std::path::PathBuf;

use gs2_codec::{Document, Message, MeterReading, TimeSeries, Triplet};
use time::macros::datetime;
use time::Duration;

pub fn fixture(name: &str) -> File {
    let path: PathBuf = [env!("CARGO_MANIFEST_DIR"), "tests", "testdata", name].iter().collect();
    File::open(&path).unwrap_or_else(|e| panic!("cannot open {}: {e}", path.display()))
}

fn hourly(values: &[f64], quality: &str) -> Vec<Triplet> {
    values.iter().map(|&v| Triplet::with_quality(v, quality)).collect()
}

fn settlement_start(time: time::PrimitiveDateTime) -> Message {
    Message {
        id: "0".to_string(),
        message_type: "Settlement-data".to_string(),
        version: "1.2".to_string(),
        time: Some(time),
        to: "MDM".to_string(),
        from: "Sender".to_string(),
        gmt_reference: 1,
        ..Message::default()
    }
}

fn end(number_of_objects: i64) -> Message {
    Message {
        id: "0".to_string(),
        number_of_objects,
        ..Message::default()
    }
}

fn reading(n: usize, time: time::PrimitiveDateTime, unit: &str, value: Triplet) -> MeterReading {
    MeterReading {
        reference: format!("meterpoint{n}"),
        meter: format!("meter{n}"),
        time: Some(time),
        unit: unit.to_string(),
        value,
        ..MeterReading::default()
    }
}

/// `meterreading.gs2` after normalization from GMT+1.
pub fn meter_reading_document() -> Document {
    let mut second = reading(2, datetime!(2019-07-19 01:00:00), "kWh", Triplet::new(85.078));
    second.description = "someDescription".to_string();

    Document {
        start_message: settlement_start(datetime!(2019-07-22 05:37:40)),
        meter_readings: vec![
            reading(1, datetime!(2019-07-19 00:00:00), "kWh", Triplet::with_quality(84.831, "0")),
            second,
            reading(3, datetime!(2019-07-19 02:00:00), "kVArh", Triplet::with_quality(85.325, "x")),
        ],
        time_series: Vec::new(),
        end_message: end(5),
    }
}

fn day_series(values: Vec<Triplet>, sum: f64, direction: &str) -> TimeSeries {
    TimeSeries {
        start: Some(datetime!(2020-03-26 23:00:00)),
        stop: Some(datetime!(2020-03-27 23:00:00)),
        step: Duration::HOUR,
        unit: "kWh".to_string(),
        type_of_value: "interval".to_string(),
        direction_of_flow: direction.to_string(),
        no_of_values: values.len() as i64,
        values,
        sum,
        ..TimeSeries::default()
    }
}

/// `timeseries.gs2` (and its single-line twin) after normalization from GMT+1.
pub fn time_series_document() -> Document {
    let mut first = day_series(
        hourly(
            &[0., 2., 1., 1., 1., 0., 2., 1., 1., 1., 1., 1., 1., 1., 1., 2., 1., 1., 2., 1., 1., 2., 0., 2.],
            "0",
        ),
        27.0,
        "in",
    );
    first.reference = "meterpoint1".to_string();

    let mut second = day_series(
        hourly(
            &[0., 0., 1., 0., 0., 0., 0., 1., 0., 1., 0., 1., 0., 0., 1., 0., 1., 2., 1., 1., 1., 0., 0., 1.],
            "0",
        ),
        12.0,
        "in",
    );
    second.reference = "meterpoint2".to_string();

    let mut third = day_series(
        hourly(
            &[
                0.02, 0.02, 0.07, 0.13, 0.12, 0.11, 0.02, 0.02, 0.02, 0.01, 0.02, 0.02, 0.02, 0.02, 0.02, 0.01,
                0.02, 0.02, 0.02, 0.02, 0.02, 0.01, 0.02, 0.02,
            ],
            "",
        ),
        0.8,
        "out",
    );
    third.start = Some(datetime!(2020-03-26 22:00:00));
    third.stop = Some(datetime!(2020-03-27 22:00:00));
    third.meter = "meter3".to_string();
    third.description = "somedescription".to_string();

    let mut fourth = day_series(hourly(&[0.0; 24], "x"), 0.0, "out");
    fourth.reference = "meterpoint4".to_string();
    fourth.installation = "meterpoint4".to_string();
    fourth.plant = "0".to_string();
    fourth.meter_location = "meterpoint4".to_string();
    fourth.meter = "meter4".to_string();
    fourth.channel = "1".to_string();

    let mut fifth = day_series(
        hourly(
            &[
                70.1, 72., 55.7, 57.6, 56.2, 59.5, 68.9, 79.8, 101.6, 84.9, 84., 85.7, 85.9, 83.9, 84.1, 68.9, 60.5,
                58., 56.9, 59.8, 60.1, 62., 57.1, 66.8,
            ],
            "",
        ),
        1680.0,
        "in",
    );
    fifth.reference = "meterpoint5".to_string();
    fifth.installation = "0".to_string();
    fifth.plant = "0".to_string();
    fifth.meter_location = "location5".to_string();
    fifth.meter = "meter5".to_string();
    fifth.channel = "1".to_string();

    Document {
        start_message: settlement_start(datetime!(2019-09-25 06:00:08)),
        meter_readings: Vec::new(),
        time_series: vec![first, second, third, fourth, fifth],
        end_message: end(7),
    }
}

fn stepped_series(
    reference: &str,
    stop: time::PrimitiveDateTime,
    step: Duration,
    values: &[f64],
    sum: f64,
) -> TimeSeries {
    TimeSeries {
        reference: reference.to_string(),
        start: Some(datetime!(2020-03-26 22:00:00)),
        stop: Some(stop),
        step,
        values: values.iter().copied().map(Triplet::new).collect(),
        no_of_values: values.len() as i64,
        sum,
        ..TimeSeries::default()
    }
}

/// `durations.gs2`: hourly, 2-hour, 15-minute and 1-second series at GMT+2.
pub fn durations_document() -> Document {
    let mut start_message = settlement_start(datetime!(2020-03-27 01:00:00));
    start_message.gmt_reference = 2;

    Document {
        start_message,
        meter_readings: Vec::new(),
        time_series: vec![
            stepped_series(
                "meterpoint1",
                datetime!(2020-03-27 08:00:00),
                Duration::HOUR,
                &[1., 2., 3., 4., 5., 6., 7., 8., 9., 10.],
                55.0,
            ),
            stepped_series(
                "meterpoint2",
                datetime!(2020-03-27 08:00:00),
                Duration::hours(2),
                &[0.001, 0.002, 0.003, 0.004, 0.005],
                0.015,
            ),
            stepped_series(
                "meterpoint3",
                datetime!(2020-03-26 23:00:00),
                Duration::minutes(15),
                &[10001.01, 10002.02, 1003.03, 1004.04],
                22010.1,
            ),
            stepped_series(
                "meterpoint4",
                datetime!(2020-03-26 22:00:05),
                Duration::SECOND,
                &[1.1, 2.2, 3.3, 4.4, 5.5],
                16.5,
            ),
        ],
        end_message: end(6),
    }
}
