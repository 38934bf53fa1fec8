use super::Real;
use std::collections::VecDeque;

/// A contiguous run of samples, capped at a fixed capacity, together with their sum.
///
/// Storage grows on demand up to the capacity, so a window constructed with a large
/// capacity over a short stream only allocates for the samples it actually holds.
///
/// The sum is maintained incrementally and never recomputed. Values of very different
/// magnitude lose precision to cancellation once the large value is evicted: after
/// `[1e17, 1.0, 1.0]` with the first value evicted the sum is no longer `2.0`. A
/// non-finite value leaves the sum non-finite for the rest of the stream, so callers
/// must only push finite values.
#[derive(Clone, Debug)]
pub(crate) struct BoundedWindow {
    values: VecDeque<Real>,
    /// The maximum number of values held at once.
    capacity: usize,
    /// Stream position of the value at the front of `values`.
    front_position: usize,
    /// Sum of all values currently held, updated on every insert and eviction.
    sum: Real,
}

impl BoundedWindow {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            values: VecDeque::new(),
            capacity,
            front_position: 0,
            sum: 0.0,
        }
    }

    /// Appends a value, first evicting the oldest value if the window is full.
    ///
    /// Returns the evicted value, if any.
    pub(crate) fn push_back(&mut self, value: Real) -> Option<Real> {
        let evicted = if self.values.len() == self.capacity {
            self.pop_front()
        } else {
            None
        };
        self.values.push_back(value);
        self.sum += value;
        evicted
    }

    /// Removes the oldest value.
    pub(crate) fn pop_front(&mut self) -> Option<Real> {
        let value = self.values.pop_front()?;
        self.sum -= value;
        self.front_position += 1;
        Some(value)
    }

    /// Evicts every value whose stream position lies before `position`.
    pub(crate) fn evict_before(&mut self, position: usize) {
        while self.front_position < position {
            if self.pop_front().is_none() {
                break;
            }
        }
    }

    /// The arithmetic mean of the values held, or `None` if the window is empty.
    pub(crate) fn mean(&self) -> Option<Real> {
        (!self.values.is_empty()).then(|| self.sum / self.values.len() as Real)
    }

    pub(crate) fn len(&self) -> usize {
        self.values.len()
    }

    #[cfg(test)]
    pub(crate) fn sum(&self) -> Real {
        self.sum
    }

    /// Empties the window and releases its storage.
    pub(crate) fn release(&mut self) {
        self.front_position += self.values.len();
        self.values = VecDeque::new();
        self.sum = 0.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;

    #[test]
    fn push_evicts_oldest_at_capacity() {
        let mut window = BoundedWindow::new(3);
        assert_eq!(window.push_back(1.0), None);
        assert_eq!(window.push_back(2.0), None);
        assert_eq!(window.push_back(3.0), None);
        assert_eq!(window.push_back(4.0), Some(1.0));
        assert_eq!(window.len(), 3);
        assert_approx_eq!(window.sum(), 9.0);
        assert_eq!(window.mean(), Some(3.0));
    }

    #[test]
    fn evict_before_tracks_positions() {
        let mut window = BoundedWindow::new(5);
        for value in [10.0, 20.0, 30.0, 40.0] {
            window.push_back(value);
        }
        window.evict_before(2);
        assert_eq!(window.len(), 2);
        assert_eq!(window.mean(), Some(35.0));

        // Positions already evicted are not evicted twice.
        window.evict_before(1);
        assert_eq!(window.len(), 2);
    }

    #[test]
    fn evict_past_end_empties_window() {
        let mut window = BoundedWindow::new(2);
        window.push_back(1.0);
        window.evict_before(10);
        assert_eq!(window.len(), 0);
        assert_eq!(window.mean(), None);
    }

    #[test]
    fn unit_capacity_keeps_latest() {
        let mut window = BoundedWindow::new(1);
        window.push_back(5.0);
        assert_eq!(window.push_back(6.0), Some(5.0));
        assert_eq!(window.mean(), Some(6.0));
    }

    #[test]
    fn sum_matches_held_values_after_evictions() {
        let mut window = BoundedWindow::new(5);
        for i in 0..1000 {
            window.push_back(f64::from(i % 97) - 40.0);
            if i % 3 == 0 {
                window.evict_before(window.front_position + 1);
            }
            assert_eq!(window.sum(), window.values.iter().sum::<Real>());
        }
    }

    #[test]
    fn release_resets_sum() {
        let mut window = BoundedWindow::new(4);
        window.push_back(0.1);
        window.push_back(0.2);
        window.release();
        assert_eq!(window.len(), 0);
        assert_eq!(window.sum(), 0.0);
    }
}
