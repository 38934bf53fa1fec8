//! Smooths complete, already-materialised series.
use super::{CenteredWindowAverager, Real, SmoothingError};
use num::PrimInt;
use std::fmt::Display;
use tracing::instrument;

/// Drives a [CenteredWindowAverager] over finite series, producing one average per
/// input value.
///
/// The half-width is validated once on construction, after which the same averager
/// configuration can be applied to any number of independent series.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BoundedSeriesAverager {
    half_width: usize,
}

impl BoundedSeriesAverager {
    /// # Errors
    /// Returns [SmoothingError::InvalidParameter] if `half_width` is not a valid
    /// half-width for a [CenteredWindowAverager].
    pub fn new<K>(half_width: K) -> Result<Self, SmoothingError>
    where
        K: PrimInt + Display,
    {
        let averager = CenteredWindowAverager::new(half_width)?;
        Ok(Self {
            half_width: averager.half_width(),
        })
    }

    pub fn half_width(&self) -> usize {
        self.half_width
    }

    /// Returns the centered average at every position of `values`, in order.
    ///
    /// Every live value is fed, followed by exactly `k` drain ticks. The result always
    /// has the same length as `values`.
    #[instrument(skip_all, level = "trace", fields(half_width = self.half_width, len = values.len()))]
    pub fn smooth(&self, values: &[Real]) -> Result<Vec<Real>, SmoothingError> {
        if values.is_empty() {
            return Ok(Vec::new());
        }

        let mut averager = CenteredWindowAverager::new(self.half_width)?;
        let mut smoothed = Vec::with_capacity(values.len());
        for &value in values {
            if let Some(average) = averager.push(value)? {
                smoothed.push(average);
            }
        }
        smoothed.extend(averager.finalize()?);
        debug_assert_eq!(smoothed.len(), values.len());
        Ok(smoothed)
    }
}

/// Returns the centered average, with half-width `half_width`, at every position of
/// `values`.
///
/// # Errors
/// Returns [SmoothingError::InvalidParameter] if `half_width` is negative, even if
/// `values` is empty.
pub fn smooth<K>(values: &[Real], half_width: K) -> Result<Vec<Real>, SmoothingError>
where
    K: PrimInt + Display,
{
    BoundedSeriesAverager::new(half_width)?.smooth(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use rand::{Rng, SeedableRng, rngs::StdRng};

    /// Mean of the values in the truncated window about `index`, computed directly.
    fn reference_mean(values: &[Real], index: usize, k: usize) -> Real {
        let lo = index.saturating_sub(k);
        let hi = usize::min(values.len() - 1, index + k);
        let window = &values[lo..=hi];
        window.iter().sum::<Real>() / window.len() as Real
    }

    fn assert_all_approx_eq(left: &[Real], right: &[Real]) {
        assert_eq!(left.len(), right.len());
        for (l, r) in left.iter().zip(right) {
            assert_approx_eq!(*l, *r, 1e-9);
        }
    }

    #[test]
    fn odd_length_half_width_one() {
        assert_eq!(
            smooth(&[1.0, 2.0, 3.0, 4.0, 5.0], 1).unwrap(),
            [1.5, 2.0, 3.0, 4.0, 4.5]
        );
    }

    #[test]
    fn half_width_larger_than_interior() {
        assert_all_approx_eq(
            &smooth(&[2.0, 4.0, 6.0, 8.0, 10.0], 3).unwrap(),
            &[5.0, 6.0, 6.0, 6.0, 7.0],
        );
    }

    #[test]
    fn window_wider_than_stream_gives_global_mean() {
        assert_eq!(smooth(&[5.0, 7.0], 9).unwrap(), [6.0, 6.0]);
    }

    #[test]
    fn empty_input() {
        assert_eq!(smooth(&[], 1).unwrap(), Vec::<Real>::new());
        assert_eq!(smooth(&[], 0).unwrap(), Vec::<Real>::new());
    }

    #[test]
    fn negative_half_width_fails_for_empty_input() {
        assert!(matches!(
            smooth(&[], -1),
            Err(SmoothingError::InvalidParameter(_))
        ));
        assert!(matches!(
            BoundedSeriesAverager::new(-3i64),
            Err(SmoothingError::InvalidParameter(_))
        ));
    }

    #[test]
    fn zero_half_width_is_identity() {
        let values = [3.5, -1.0, 0.0, 12.25, 7.0];
        assert_eq!(smooth(&values, 0).unwrap(), values);
    }

    #[test]
    fn single_value() {
        for k in 0..4 {
            assert_eq!(smooth(&[42.0], k).unwrap(), [42.0]);
        }
    }

    #[test]
    fn averager_is_reusable() {
        let averager = BoundedSeriesAverager::new(2u32).unwrap();
        assert_eq!(averager.half_width(), 2);
        let first = averager.smooth(&[1.0, 1.0, 1.0]).unwrap();
        let second = averager.smooth(&[3.0, 6.0, 9.0, 12.0]).unwrap();
        assert_eq!(first, [1.0, 1.0, 1.0]);
        assert_all_approx_eq(&second, &[6.0, 7.5, 7.5, 9.0]);
    }

    #[test]
    fn matches_reference_on_random_series() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..200 {
            let len = rng.random_range(0..60);
            let k = rng.random_range(0..12usize);
            let values = (0..len)
                .map(|_| rng.random_range(0.0..60.0))
                .collect::<Vec<Real>>();

            let smoothed = smooth(&values, k).unwrap();
            assert_eq!(smoothed.len(), values.len());
            let expected = (0..values.len())
                .map(|i| reference_mean(&values, i, k))
                .collect::<Vec<_>>();
            assert_all_approx_eq(&smoothed, &expected);
        }
    }

    #[test]
    fn repeated_runs_are_bit_identical() {
        let mut rng = StdRng::seed_from_u64(7);
        let values = (0..500)
            .map(|_| rng.random_range(-100.0..100.0))
            .collect::<Vec<Real>>();
        let first = smooth(&values, 5).unwrap();
        let second = smooth(&values, 5).unwrap();
        assert!(
            first
                .iter()
                .zip(&second)
                .all(|(a, b)| a.to_bits() == b.to_bits())
        );
    }
}
