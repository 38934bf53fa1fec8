//! Errors raised when an averager is misconfigured or misused.
use thiserror::Error;

/// Describes which sequencing rule of the averager was broken.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum Sequencing {
    #[error("a live sample was fed after the end of the stream was signalled")]
    LiveSampleWhileDraining,
    #[error("the averager has already drained all of its values")]
    Terminated,
    #[error("more drain ticks were issued than the half-width {0} allows")]
    ExcessDrainTick(usize),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum SmoothingError {
    #[error("Invalid half-width {0}: must be a non-negative integer for which 2k+1 fits in usize")]
    InvalidParameter(String),
    #[error("Invalid sequencing: {0}")]
    InvalidSequencing(#[from] Sequencing),
}
