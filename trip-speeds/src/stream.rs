//! Smooths a stream of speeds, one per line, as they arrive.
use std::{
    io::{self, BufRead, Write},
    num::ParseFloatError,
};
use thiserror::Error;
use tracing::{debug, instrument};
use transit_smoothing::{CenteredWindowAverager, SmoothingError};

#[derive(Debug, Error)]
pub(crate) enum StreamError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("Line {line}: cannot parse {text:?} as a speed: {source}")]
    Parse {
        line: usize,
        text: String,
        source: ParseFloatError,
    },
    #[error("Line {line}: {text:?} is not a finite speed")]
    NonFinite { line: usize, text: String },
    #[error("Smoothing failed: {0}")]
    Smoothing(#[from] SmoothingError),
}

/// Reads one speed per line from `input` and writes each centered average to `output`
/// as soon as it is known. Blank lines are skipped.
///
/// Each average is delayed by `k` lines, and the final `k` averages are written once
/// `input` is exhausted. Returns the number of averages written.
#[instrument(skip_all, fields(half_width = averager.half_width(), num_averages))]
pub(crate) fn stream_averages<R: BufRead, W: Write>(
    input: R,
    mut output: W,
    mut averager: CenteredWindowAverager,
) -> Result<usize, StreamError> {
    let mut written = 0;
    for (index, line) in input.lines().enumerate() {
        let line = line?;
        let text = line.trim();
        if text.is_empty() {
            continue;
        }
        let value: f64 = text.parse().map_err(|source| StreamError::Parse {
            line: index + 1,
            text: text.to_owned(),
            source,
        })?;
        if !value.is_finite() {
            return Err(StreamError::NonFinite {
                line: index + 1,
                text: text.to_owned(),
            });
        }
        if let Some(average) = averager.push(value)? {
            writeln!(output, "{average}")?;
            written += 1;
        }
    }

    debug!(samples = averager.samples_seen(), "Input exhausted, draining");
    for average in averager.finalize()? {
        writeln!(output, "{average}")?;
        written += 1;
    }
    output.flush()?;
    tracing::Span::current().record("num_averages", written);
    Ok(written)
}
