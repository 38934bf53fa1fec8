//! Defines the parameters of each of the modes of this tool.
use clap::{Parser, Subcommand};
use std::{num::NonZeroU32, path::PathBuf};

/// Encapsulates the parameters for smoothing the speeds of each trip.
#[derive(Debug, Clone, Parser)]
pub(crate) struct SmoothTripsParameters {
    /// CSV file of vehicle records, with a header row.
    #[clap(long)]
    pub(crate) input: PathBuf,

    /// Number of neighbouring samples either side of each speed included in its average.
    #[clap(long, default_value = "2")]
    pub(crate) half_width: usize,

    /// File to write the smoothed trips to as JSON. Standard output is used if omitted.
    #[clap(long)]
    pub(crate) output: Option<PathBuf>,
}

/// Encapsulates the parameters for averaging speeds over intervals of the day.
#[derive(Debug, Clone, Parser)]
pub(crate) struct IntervalSpeedsParameters {
    /// CSV file of vehicle records, with a header row.
    #[clap(long)]
    pub(crate) input: PathBuf,

    /// Length of each interval, in minutes.
    #[clap(long, default_value = "5")]
    pub(crate) interval: NonZeroU32,

    /// File to write the interval speeds to as JSON. Standard output is used if omitted.
    #[clap(long)]
    pub(crate) output: Option<PathBuf>,
}

/// Encapsulates the parameters for smoothing speeds read from standard input.
#[derive(Debug, Clone, Parser)]
pub(crate) struct StreamParameters {
    /// Number of neighbouring samples either side of each speed included in its average.
    #[clap(long, default_value = "2")]
    pub(crate) half_width: usize,
}

/// Specifies what the tool does, and wraps the mode-specific options in each variant.
#[derive(Subcommand, Debug)]
pub(crate) enum Mode {
    /// Splits vehicle records into trips and smooths the speeds of each trip independently.
    SmoothTrips(SmoothTripsParameters),
    /// Averages the speeds of all vehicle records over fixed intervals of the day.
    IntervalSpeeds(IntervalSpeedsParameters),
    /// Reads one speed per line from standard input and writes each centered average to
    /// standard output as soon as it is known.
    Stream(StreamParameters),
}
