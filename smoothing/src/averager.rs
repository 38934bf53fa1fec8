//! The streaming engine which computes centered moving averages one sample at a time.
use super::{Real, Sequencing, SmoothingError, window::BoundedWindow};
use num::PrimInt;
use std::fmt::Display;
use tracing::trace;

/// The phase an averager is in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    /// Fewer than `k + 1` ticks have been seen, so no position can be centered yet.
    Filling,
    /// Live samples are arriving and one average is emitted per sample.
    Sliding,
    /// The end of the stream was signalled and the trailing averages are being emitted.
    Draining,
    /// All averages have been emitted. No further calls are accepted.
    Terminated,
}

/// Computes the centered moving average of a stream with half-width `k`.
///
/// The average for a position can only be emitted once the `k` samples which follow
/// it have arrived, so results lag the input by `k` ticks. Once the stream has ended
/// the caller issues `k` drain ticks, either through [Self::feed] with `None` or in one
/// go with [Self::finalize], to obtain the trailing `k` averages.
///
/// At most `2k + 1` samples are held at any time, and each tick performs at most one
/// insertion and one eviction.
#[derive(Clone, Debug)]
pub struct CenteredWindowAverager {
    half_width: usize,
    window: BoundedWindow,
    /// Number of accepted ticks, live or drain.
    samples_seen: usize,
    /// Number of drain ticks accepted.
    drain_ticks: usize,
    state: EngineState,
}

impl CenteredWindowAverager {
    /// Creates an averager with the given half-width.
    ///
    /// # Errors
    /// Returns [SmoothingError::InvalidParameter] if `half_width` is negative, or so
    /// large that a window of `2 * half_width + 1` samples cannot be addressed.
    pub fn new<K>(half_width: K) -> Result<Self, SmoothingError>
    where
        K: PrimInt + Display,
    {
        let invalid = || SmoothingError::InvalidParameter(half_width.to_string());
        let k = half_width.to_usize().ok_or_else(invalid)?;
        let capacity = k
            .checked_mul(2)
            .and_then(|width| width.checked_add(1))
            .ok_or_else(invalid)?;

        Ok(Self {
            half_width: k,
            window: BoundedWindow::new(capacity),
            samples_seen: 0,
            drain_ticks: 0,
            state: if k == 0 {
                EngineState::Sliding
            } else {
                EngineState::Filling
            },
        })
    }

    pub fn half_width(&self) -> usize {
        self.half_width
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// The number of ticks accepted so far, including drain ticks.
    pub fn samples_seen(&self) -> usize {
        self.samples_seen
    }

    /// The number of samples currently buffered. Never exceeds `2k + 1`.
    pub fn window_len(&self) -> usize {
        self.window.len()
    }

    /// Advances the averager by one tick.
    ///
    /// `Some(value)` is a live sample, `None` is a drain tick signalling that no more
    /// live samples will arrive. Returns the average centered on the oldest position not
    /// yet reported, or `None` while the window is still filling.
    ///
    /// # Errors
    /// Returns [SmoothingError::InvalidSequencing] if a live sample follows a drain
    /// tick, if more than `k` drain ticks are issued, or if the averager has terminated.
    pub fn feed(&mut self, value: Option<Real>) -> Result<Option<Real>, SmoothingError> {
        match (self.state, value) {
            (EngineState::Terminated, _) => return Err(Sequencing::Terminated.into()),
            (EngineState::Draining, Some(_)) => {
                return Err(Sequencing::LiveSampleWhileDraining.into());
            }
            (_, None) if self.drain_ticks == self.half_width => {
                return Err(Sequencing::ExcessDrainTick(self.half_width).into());
            }
            _ => {}
        }

        self.samples_seen += 1;
        match value {
            Some(value) => {
                self.window.push_back(value);
                if self.samples_seen > self.half_width {
                    self.state = EngineState::Sliding;
                }
            }
            None => {
                self.drain_ticks += 1;
                self.state = EngineState::Draining;
            }
        }

        let average = self.centered_average();
        if self.drain_ticks == self.half_width && self.state == EngineState::Draining {
            self.terminate();
        }
        Ok(average)
    }

    /// Pushes a live sample. Equivalent to `feed(Some(value))`.
    pub fn push(&mut self, value: Real) -> Result<Option<Real>, SmoothingError> {
        self.feed(Some(value))
    }

    /// Signals the end of the stream, issuing all outstanding drain ticks and returning
    /// the averages they produce, in position order.
    ///
    /// Consuming the averager guarantees that exactly `k` drain ticks are issued in
    /// total, and that no live samples can follow.
    ///
    /// # Errors
    /// Returns [SmoothingError::InvalidSequencing] if the averager has already
    /// terminated.
    pub fn finalize(mut self) -> Result<Vec<Real>, SmoothingError> {
        if self.state == EngineState::Terminated {
            return Err(Sequencing::Terminated.into());
        }
        let remaining = self.half_width - self.drain_ticks;
        let trailing = (0..remaining)
            .map(|_| self.feed(None))
            .filter_map(Result::transpose)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(trailing)
    }

    /// Returns the average centered on the next position due, having evicted every
    /// sample further than `k` positions to its left.
    fn centered_average(&mut self) -> Option<Real> {
        let position = self.samples_seen.checked_sub(self.half_width + 1)?;
        self.window.evict_before(position.saturating_sub(self.half_width));
        let average = self.window.mean();
        trace!(position, window_len = self.window.len(), ?average, "Centered average");
        average
    }

    fn terminate(&mut self) {
        trace!(samples_seen = self.samples_seen, "Averager drained");
        self.window.release();
        self.state = EngineState::Terminated;
    }
}
