//! Splits vehicle records into individual trips.
//!
//! A trip is the maximal run of records from a single vehicle, following a single route
//! pattern to a single destination, in which both the timestamp and the distance
//! travelled into the pattern never decrease. A drop in distance marks the start of a
//! new trip.
use crate::records::VehicleRecord;
use itertools::Itertools;
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, instrument};
use transit_common::{PatternId, Speed, VehicleId};

/// The attributes shared by every record of a trip.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub(crate) struct TripKey {
    pub(crate) vid: VehicleId,
    pub(crate) pid: PatternId,
    pub(crate) rt: String,
    pub(crate) des: String,
}

impl TripKey {
    fn of(record: &VehicleRecord) -> Self {
        Self {
            vid: record.vid,
            pid: record.pid,
            rt: record.rt.clone(),
            des: record.des.clone(),
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Trip {
    key: TripKey,
    /// Never empty, and ordered by timestamp and then distance.
    records: Vec<VehicleRecord>,
}

impl Trip {
    pub(crate) fn key(&self) -> &TripKey {
        &self.key
    }

    pub(crate) fn records(&self) -> &[VehicleRecord] {
        &self.records
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    pub(crate) fn speeds(&self) -> Vec<Speed> {
        self.records.iter().map(|record| record.spd).collect()
    }
}

fn is_non_decreasing<T: PartialOrd + Clone>(values: impl Iterator<Item = T>) -> bool {
    values.tuple_windows().all(|(a, b)| a <= b)
}

/// Splits the records of a single vehicle, pattern, route and destination wherever the
/// distance travelled drops.
fn split_group(key: &TripKey, mut records: Vec<VehicleRecord>) -> Vec<Trip> {
    if !is_non_decreasing(records.iter().map(|r| r.tmstmp))
        || !is_non_decreasing(records.iter().map(|r| r.pdist))
    {
        records.sort_by_key(|r| (r.tmstmp, r.pdist));
    }

    let mut trips = Vec::new();
    let mut current = Vec::<VehicleRecord>::new();
    for record in records {
        if current.last().is_some_and(|last| record.pdist < last.pdist) {
            trips.push(Trip {
                key: key.clone(),
                records: std::mem::take(&mut current),
            });
        }
        current.push(record);
    }
    if !current.is_empty() {
        trips.push(Trip {
            key: key.clone(),
            records: current,
        });
    }
    trips
}

/// Partitions `records` into trips.
///
/// Groups appear in the order in which their first record appears in `records`, and
/// every record belongs to exactly one trip.
#[instrument(skip_all, fields(num_records = records.len(), num_trips))]
pub(crate) fn split_trips(records: Vec<VehicleRecord>) -> Vec<Trip> {
    let mut group_index = HashMap::<TripKey, usize>::new();
    let mut groups = Vec::<(TripKey, Vec<VehicleRecord>)>::new();
    for record in records {
        let key = TripKey::of(&record);
        let index = *group_index.entry(key.clone()).or_insert_with(|| {
            groups.push((key, Vec::new()));
            groups.len() - 1
        });
        if let Some((_, group)) = groups.get_mut(index) {
            group.push(record);
        }
    }

    let trips = groups
        .into_iter()
        .flat_map(|(key, group)| {
            let trips = split_group(&key, group);
            debug!(?key, num_trips = trips.len(), "Split group");
            trips
        })
        .collect::<Vec<_>>();
    tracing::Span::current().record("num_trips", trips.len());
    trips
}
