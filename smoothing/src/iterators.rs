//! Provides an iterator adapter which smooths another iterator of samples lazily.
use super::{CenteredWindowAverager, Real, SmoothingError};
use num::PrimInt;
use std::{fmt::Display, vec};
use tracing::error;

/// Iterator which yields the centered average at each position of its source.
///
/// Averages lag the source by `k` items. Once the source is exhausted, the remaining
/// `k` averages are drained from the averager and yielded in order, so the adapter
/// yields exactly as many items as the source.
#[derive(Clone, Debug)]
pub struct CenteredAverageIter<I>
where
    I: Iterator<Item = Real>,
{
    /// Source of live samples.
    source: I,
    /// Averager applied to the source, taken once the source is exhausted.
    averager: Option<CenteredWindowAverager>,
    /// Trailing averages produced by finalizing the averager.
    drained: Option<vec::IntoIter<Real>>,
}

impl<I> CenteredAverageIter<I>
where
    I: Iterator<Item = Real>,
{
    /// Creates an iterator which applies the given averager to `source`.
    pub fn new(source: I, averager: CenteredWindowAverager) -> Self {
        Self {
            source,
            averager: Some(averager),
            drained: None,
        }
    }
}

impl<I> Iterator for CenteredAverageIter<I>
where
    I: Iterator<Item = Real>,
{
    type Item = Real;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(drained) = self.drained.as_mut() {
                return drained.next();
            }
            let result = match self.source.next() {
                Some(value) => self.averager.as_mut()?.push(value),
                None => match self.averager.take()?.finalize() {
                    Ok(trailing) => {
                        self.drained = Some(trailing.into_iter());
                        continue;
                    }
                    Err(e) => Err(e),
                },
            };
            match result {
                Ok(Some(average)) => return Some(average),
                Ok(None) => {}
                Err(e) => {
                    error!("Centered average iterator stopped: {e}");
                    self.averager = None;
                    return None;
                }
            }
        }
    }
}

/// Provides a method for smoothing any iterator of samples.
pub trait CenteredAverageIterable: Iterator<Item = Real> + Sized {
    /// Creates a [CenteredAverageIter] with half-width `half_width` over this iterator.
    ///
    /// # Errors
    /// Returns [SmoothingError::InvalidParameter] if `half_width` is invalid.
    fn centered_average<K>(
        self,
        half_width: K,
    ) -> Result<CenteredAverageIter<Self>, SmoothingError>
    where
        K: PrimInt + Display;
}

impl<I> CenteredAverageIterable for I
where
    I: Iterator<Item = Real>,
{
    fn centered_average<K>(
        self,
        half_width: K,
    ) -> Result<CenteredAverageIter<Self>, SmoothingError>
    where
        K: PrimInt + Display,
    {
        Ok(CenteredAverageIter::new(
            self,
            CenteredWindowAverager::new(half_width)?,
        ))
    }
}
