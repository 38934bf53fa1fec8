//! Loads vehicle records from a CSV export of the TrueTime `vehicles` table, and
//! discards records which are blank or cannot be interpreted.
use chrono::NaiveDateTime;
use serde::Deserialize;
use std::{fs::File, io::Read, path::Path, str::FromStr};
use thiserror::Error;
use tracing::{debug, instrument, warn};
use transit_common::{Distance, PatternId, Speed, VehicleId};

/// Timestamp formats accepted in the `tmstmp` column, tried in order.
const TIMESTAMP_FORMATS: [&str; 5] = [
    "%Y%m%d %H:%M",
    "%Y%m%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
];

#[derive(Debug, Error)]
pub(crate) enum RecordError {
    #[error("Cannot open {0}: {1}")]
    Open(String, std::io::Error),
    #[error("Malformed CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("Invalid value {value:?} in column {field}")]
    InvalidField { field: &'static str, value: String },
}

/// A row of the `vehicles` table, before any interpretation.
#[derive(Default, Debug, Clone, Deserialize)]
pub(crate) struct RawVehicleRecord {
    vid: String,
    tmstmp: String,
    lat: String,
    lon: String,
    hdg: String,
    pid: String,
    rt: String,
    des: String,
    pdist: String,
    spd: String,
    tablockid: String,
    tatripid: String,
}

impl RawVehicleRecord {
    fn fields(&self) -> [&str; 12] {
        [
            &self.vid,
            &self.tmstmp,
            &self.lat,
            &self.lon,
            &self.hdg,
            &self.pid,
            &self.rt,
            &self.des,
            &self.pdist,
            &self.spd,
            &self.tablockid,
            &self.tatripid,
        ]
    }

    /// The TrueTime API occasionally returns records in which every attribute is an
    /// empty string. Records without a vehicle id are equally useless.
    fn is_blank(&self) -> bool {
        self.vid.trim().is_empty() || self.fields().iter().all(|f| f.trim().is_empty())
    }
}

/// A position and speed report from a single vehicle.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct VehicleRecord {
    pub(crate) vid: VehicleId,
    pub(crate) tmstmp: NaiveDateTime,
    pub(crate) lat: f64,
    pub(crate) lon: f64,
    /// Heading in degrees, clockwise from north.
    pub(crate) hdg: u16,
    pub(crate) pid: PatternId,
    pub(crate) rt: String,
    pub(crate) des: String,
    pub(crate) pdist: Distance,
    pub(crate) spd: Speed,
    pub(crate) tablockid: String,
    pub(crate) tatripid: u64,
}

fn parse_field<T: FromStr>(field: &'static str, value: &str) -> Result<T, RecordError> {
    value.trim().parse().map_err(|_| RecordError::InvalidField {
        field,
        value: value.to_owned(),
    })
}

/// As [parse_field], but also rejects `NaN` and infinities, which would poison any
/// running sum they enter.
fn parse_finite(field: &'static str, value: &str) -> Result<f64, RecordError> {
    let parsed = parse_field::<f64>(field, value)?;
    if parsed.is_finite() {
        Ok(parsed)
    } else {
        Err(RecordError::InvalidField {
            field,
            value: value.to_owned(),
        })
    }
}

fn parse_timestamp(value: &str) -> Result<NaiveDateTime, RecordError> {
    let value = value.trim();
    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .ok_or_else(|| RecordError::InvalidField {
            field: "tmstmp",
            value: value.to_owned(),
        })
}

impl TryFrom<&RawVehicleRecord> for VehicleRecord {
    type Error = RecordError;

    fn try_from(raw: &RawVehicleRecord) -> Result<Self, Self::Error> {
        Ok(VehicleRecord {
            vid: parse_field("vid", &raw.vid)?,
            tmstmp: parse_timestamp(&raw.tmstmp)?,
            lat: parse_finite("lat", &raw.lat)?,
            lon: parse_finite("lon", &raw.lon)?,
            hdg: parse_field("hdg", &raw.hdg)?,
            pid: parse_field("pid", &raw.pid)?,
            rt: raw.rt.trim().to_owned(),
            des: raw.des.trim().to_owned(),
            pdist: parse_field("pdist", &raw.pdist)?,
            spd: parse_finite("spd", &raw.spd)?,
            tablockid: raw.tablockid.trim().to_owned(),
            tatripid: parse_field("tatripid", &raw.tatripid)?,
        })
    }
}

/// The records which survived cleaning, and a tally of those which did not.
#[derive(Default, Debug)]
pub(crate) struct LoadReport {
    pub(crate) records: Vec<VehicleRecord>,
    pub(crate) blank_rows: usize,
    pub(crate) invalid_rows: usize,
}

/// Reads and cleans vehicle records from CSV data with a header row.
///
/// Blank and uninterpretable rows are skipped and counted. Structural problems with
/// the CSV itself, such as rows with the wrong number of columns, are fatal.
#[instrument(skip_all, fields(num_records, blank_rows, invalid_rows))]
pub(crate) fn load_records<R: Read>(reader: R) -> Result<LoadReport, RecordError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut report = LoadReport::default();
    for (row, raw) in reader.deserialize::<RawVehicleRecord>().enumerate() {
        let raw = raw?;
        if raw.is_blank() {
            debug!(row, "Dropping blank record");
            report.blank_rows += 1;
            continue;
        }
        match VehicleRecord::try_from(&raw) {
            Ok(record) => report.records.push(record),
            Err(e) => {
                warn!(row, "Dropping record: {e}");
                report.invalid_rows += 1;
            }
        }
    }

    let span = tracing::Span::current();
    span.record("num_records", report.records.len());
    span.record("blank_rows", report.blank_rows);
    span.record("invalid_rows", report.invalid_rows);
    Ok(report)
}

/// Opens the CSV file at `path` and passes it to [load_records].
pub(crate) fn load_records_from_path(path: &Path) -> Result<LoadReport, RecordError> {
    let file = File::open(path).map_err(|e| RecordError::Open(path.display().to_string(), e))?;
    load_records(file)
}
