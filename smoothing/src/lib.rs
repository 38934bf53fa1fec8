//! # Transit Smoothing
//!
//! Centered moving averages over ordered streams of samples, computed in bounded
//! memory with constant work per sample.
//!
//! The value produced for position `i` of a stream of length `n` is the mean of the
//! samples at positions `max(0, i - k) ..= min(n - 1, i + k)`, where `k` is the
//! half-width of the window. Windows are truncated at both ends of the stream rather
//! than padded.
//!
//! # Example
//!
//! The following smooths a finite series in one call, and then the same series
//! lazily through the iterator adapter.
//! ```rust
//! use transit_smoothing::{CenteredAverageIterable, smooth};
//!
//! let smoothed = smooth(&[1.0, 2.0, 3.0, 4.0, 5.0], 1).unwrap();
//! assert_eq!(smoothed, vec![1.5, 2.0, 3.0, 4.0, 4.5]);
//!
//! let lazy = [1.0, 2.0, 3.0, 4.0, 5.0]
//!     .into_iter()
//!     .centered_average(1)
//!     .unwrap()
//!     .collect::<Vec<_>>();
//! assert_eq!(lazy, smoothed);
//! ```
pub mod averager;
pub mod error;
pub mod iterators;
pub mod series;
mod window;

pub use averager::{CenteredWindowAverager, EngineState};
pub use error::{Sequencing, SmoothingError};
pub use iterators::{CenteredAverageIter, CenteredAverageIterable};
pub use series::{BoundedSeriesAverager, smooth};

/// The scalar type of samples and averages.
pub type Real = f64;
