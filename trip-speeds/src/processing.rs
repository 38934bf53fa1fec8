//! Provides functions which compute speed statistics from trips and vehicle records.
use crate::{
    records::VehicleRecord,
    trips::{Trip, TripKey},
};
use chrono::{NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use serde::Serialize;
use std::{collections::BTreeMap, num::NonZeroU32};
use tracing::instrument;
use transit_common::Speed;
use transit_smoothing::{BoundedSeriesAverager, SmoothingError};

/// A reported speed paired with its centered moving average.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub(crate) struct SmoothedPoint {
    pub(crate) tmstmp: NaiveDateTime,
    pub(crate) speed: Speed,
    pub(crate) smoothed: Speed,
}

#[derive(Clone, Debug, Serialize)]
pub(crate) struct SmoothedTrip {
    #[serde(flatten)]
    pub(crate) key: TripKey,
    pub(crate) points: Vec<SmoothedPoint>,
}

/// Smooths the speed series of a single trip.
/// # Parameters
/// - trip: the trip to smooth, this is treated as an independent series.
/// - averager: determines the half-width of the moving average.
#[instrument(skip_all, level = "debug", fields(vid = trip.key().vid, pid = trip.key().pid, len = trip.len()))]
pub(crate) fn smooth_trip(
    trip: &Trip,
    averager: &BoundedSeriesAverager,
) -> Result<SmoothedTrip, SmoothingError> {
    let smoothed = averager.smooth(&trip.speeds())?;
    let points = trip
        .records()
        .iter()
        .zip(smoothed)
        .map(|(record, smoothed)| SmoothedPoint {
            tmstmp: record.tmstmp,
            speed: record.spd,
            smoothed,
        })
        .collect();
    Ok(SmoothedTrip {
        key: trip.key().clone(),
        points,
    })
}

/// Smooths each trip independently, so no average spans two trips.
#[instrument(skip_all, fields(num_trips = trips.len(), half_width = averager.half_width()))]
pub(crate) fn smooth_trips(
    trips: &[Trip],
    averager: &BoundedSeriesAverager,
) -> Result<Vec<SmoothedTrip>, SmoothingError> {
    trips
        .iter()
        .map(|trip| smooth_trip(trip, averager))
        .collect()
}

/// The mean speed of all records reported within an interval of the day.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub(crate) struct IntervalSpeed {
    /// Start of the interval.
    pub(crate) time: NaiveTime,
    pub(crate) mean_speed: Speed,
    /// Number of records averaged.
    pub(crate) samples: usize,
}

/// Rounds the minute of `tmstmp` down to a multiple of `interval`, discarding the date.
fn interval_start(tmstmp: &NaiveDateTime, interval: NonZeroU32) -> NaiveTime {
    let time = tmstmp.time();
    time - TimeDelta::minutes(i64::from(time.minute() % interval.get()))
}

/// Averages the speed of all records, grouped by time of day.
///
/// Records are grouped by their timestamp with the minute rounded down to a multiple of
/// `interval` minutes, ignoring the date. With records reported once per minute, an
/// interval of one averages a single record from each day recorded.
#[instrument(skip_all, fields(num_records = records.len(), interval = interval.get()))]
pub(crate) fn average_speed_by_interval(
    records: &[VehicleRecord],
    interval: NonZeroU32,
) -> Vec<IntervalSpeed> {
    let mut totals = BTreeMap::<NaiveTime, (Speed, usize)>::new();
    for record in records {
        let total = totals
            .entry(interval_start(&record.tmstmp, interval))
            .or_default();
        total.0 += record.spd;
        total.1 += 1;
    }
    totals
        .into_iter()
        .map(|(time, (sum, samples))| IntervalSpeed {
            time,
            mean_speed: sum / samples as Speed,
            samples,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trips::split_trips;
    use assert_approx_eq::assert_approx_eq;
    use chrono::NaiveDate;

    fn record(day: u32, hour: u32, minute: u32, pdist: i64, spd: Speed) -> VehicleRecord {
        VehicleRecord {
            vid: 5551,
            tmstmp: NaiveDate::from_ymd_opt(2016, 8, day)
                .unwrap()
                .and_hms_opt(hour, minute, 0)
                .unwrap(),
            lat: 40.44,
            lon: -79.94,
            hdg: 270,
            pid: 4522,
            rt: "61D".to_owned(),
            des: "Downtown".to_owned(),
            pdist,
            spd,
            tablockid: "061D-161".to_owned(),
            tatripid: 2544,
        }
    }

    fn time(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn smoothed_points_align_with_timestamps() {
        let trips = split_trips(vec![
            record(11, 9, 0, 0, 1.0),
            record(11, 9, 1, 100, 2.0),
            record(11, 9, 2, 200, 3.0),
            record(11, 9, 3, 300, 4.0),
            record(11, 9, 4, 400, 5.0),
        ]);
        let averager = BoundedSeriesAverager::new(1).unwrap();
        let smoothed = smooth_trip(&trips[0], &averager).unwrap();

        assert_eq!(smoothed.key, *trips[0].key());
        assert_eq!(smoothed.points.len(), 5);
        for (point, minute) in smoothed.points.iter().zip(0..) {
            assert_eq!(point.tmstmp.time(), time(9, minute));
        }
        let values = smoothed.points.iter().map(|p| p.smoothed).collect::<Vec<_>>();
        assert_eq!(values, [1.5, 2.0, 3.0, 4.0, 4.5]);
        assert_eq!(smoothed.points[2].speed, 3.0);
    }

    #[test]
    fn trips_are_smoothed_independently() {
        let trips = split_trips(vec![
            record(11, 9, 0, 0, 10.0),
            record(11, 9, 1, 100, 20.0),
            record(11, 9, 2, 0, 100.0),
            record(11, 9, 3, 100, 200.0),
        ]);
        assert_eq!(trips.len(), 2);
        let averager = BoundedSeriesAverager::new(5).unwrap();
        let smoothed = smooth_trips(&trips, &averager).unwrap();
        let means = smoothed
            .iter()
            .map(|trip| trip.points.iter().map(|p| p.smoothed).collect::<Vec<_>>())
            .collect::<Vec<_>>();
        assert_eq!(means, [[15.0, 15.0], [150.0, 150.0]]);
    }

    #[test]
    fn interval_groups_ignore_date() {
        let records = [
            record(11, 9, 0, 0, 10.0),
            record(12, 9, 4, 0, 20.0),
            record(12, 9, 5, 0, 30.0),
            record(13, 8, 59, 0, 5.0),
        ];
        let speeds = average_speed_by_interval(&records, NonZeroU32::new(5).unwrap());
        assert_eq!(speeds.len(), 3);
        assert_eq!(speeds[0].time, time(8, 55));
        assert_eq!(speeds[0].samples, 1);
        assert_eq!(speeds[1].time, time(9, 0));
        assert_eq!(speeds[1].samples, 2);
        assert_approx_eq!(speeds[1].mean_speed, 15.0);
        assert_eq!(speeds[2].time, time(9, 5));
        assert_approx_eq!(speeds[2].mean_speed, 30.0);
    }

    #[test]
    fn unit_interval_averages_across_days() {
        let records = [
            record(11, 17, 30, 0, 12.0),
            record(12, 17, 30, 0, 18.0),
            record(13, 17, 31, 0, 7.0),
        ];
        let speeds = average_speed_by_interval(&records, NonZeroU32::MIN);
        assert_eq!(
            speeds,
            [
                IntervalSpeed {
                    time: time(17, 30),
                    mean_speed: 15.0,
                    samples: 2,
                },
                IntervalSpeed {
                    time: time(17, 31),
                    mean_speed: 7.0,
                    samples: 1,
                },
            ]
        );
    }

    #[test]
    fn no_records() {
        assert!(average_speed_by_interval(&[], NonZeroU32::MIN).is_empty());
    }
}
