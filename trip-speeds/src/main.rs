//! # Trip Speeds
//!
//! The Trip Speeds tool performs the following functions:
//! * Loads vehicle records exported from the TrueTime `vehicles` table, and discards bogus records.
//! * Splits the records into trips, and smooths the speed reported along each trip with a centered moving average.
//! * Averages reported speeds over fixed intervals of the day.
//! * Smooths a live stream of speeds, one per line, writing each average as soon as it is known.
//!
mod output;
mod parameters;
mod processing;
mod records;
mod stream;
mod trips;

use clap::Parser;
use miette::IntoDiagnostic;
use parameters::{IntervalSpeedsParameters, Mode, SmoothTripsParameters, StreamParameters};
use records::LoadReport;
use std::{io, path::Path};
use tracing::{info, instrument};
use transit_common::{LoggingOpts, init_tracing};
use transit_smoothing::{BoundedSeriesAverager, CenteredWindowAverager};

/// [clap] derived struct to handle command line parameters.
#[derive(Debug, Parser)]
#[clap(author, version = transit_common::version!(), about)]
struct Cli {
    #[clap(flatten)]
    logging: LoggingOpts,

    #[command(subcommand)]
    mode: Mode,
}

fn main() -> miette::Result<()> {
    let args = Cli::parse();
    init_tracing(&args.logging).into_diagnostic()?;

    match &args.mode {
        Mode::SmoothTrips(parameters) => run_smooth_trips(parameters),
        Mode::IntervalSpeeds(parameters) => run_interval_speeds(parameters),
        Mode::Stream(parameters) => run_stream(parameters),
    }
}

fn load(path: &Path) -> miette::Result<LoadReport> {
    let report = records::load_records_from_path(path).into_diagnostic()?;
    info!(
        path = %path.display(),
        loaded = report.records.len(),
        blank = report.blank_rows,
        invalid = report.invalid_rows,
        "Loaded vehicle records"
    );
    Ok(report)
}

#[instrument(skip_all, fields(input = %parameters.input.display()))]
fn run_smooth_trips(parameters: &SmoothTripsParameters) -> miette::Result<()> {
    let averager = BoundedSeriesAverager::new(parameters.half_width).into_diagnostic()?;
    let report = load(&parameters.input)?;

    let trips = trips::split_trips(report.records);
    info!(num_trips = trips.len(), "Split records into trips");

    let smoothed = processing::smooth_trips(&trips, &averager).into_diagnostic()?;
    let writer = output::open_output(parameters.output.as_deref()).into_diagnostic()?;
    output::write_json(writer, &smoothed).into_diagnostic()
}

#[instrument(skip_all, fields(input = %parameters.input.display()))]
fn run_interval_speeds(parameters: &IntervalSpeedsParameters) -> miette::Result<()> {
    let report = load(&parameters.input)?;

    let speeds = processing::average_speed_by_interval(&report.records, parameters.interval);
    info!(num_intervals = speeds.len(), "Averaged speeds");

    let writer = output::open_output(parameters.output.as_deref()).into_diagnostic()?;
    output::write_json(writer, &speeds).into_diagnostic()
}

#[instrument(skip_all)]
fn run_stream(parameters: &StreamParameters) -> miette::Result<()> {
    let averager = CenteredWindowAverager::new(parameters.half_width).into_diagnostic()?;
    let written =
        stream::stream_averages(io::stdin().lock(), io::stdout().lock(), averager)
            .into_diagnostic()?;
    info!(written, "End of input");
    Ok(())
}
