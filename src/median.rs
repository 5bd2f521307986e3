//! Median of an `f64` slice in expected O(n), built on [`Selector`].

use log::debug;
use rand::Rng;
use rand::rngs::ThreadRng;

use crate::error::InvalidArgument;
use crate::select::Selector;

/// Finds medians by partially reordering the given slice.
pub struct Median<R = ThreadRng> {
    selector: Selector<R>,
}

impl Default for Median<ThreadRng> {
    fn default() -> Self {
        Self::new(Selector::default())
    }
}

impl<R: Rng> Median<R> {
    /// Finds medians with the given selector's pivot method and random source.
    pub fn new(selector: Selector<R>) -> Self {
        Self { selector }
    }

    /// The selector used for both median passes.
    pub fn selector(&self) -> &Selector<R> {
        &self.selector
    }

    /// Mutable access to the selector, e.g. for selecting other ranks with the same generator.
    pub fn selector_mut(&mut self) -> &mut Selector<R> {
        &mut self.selector
    }

    /// The middle value of an odd-length slice, or the average of the two middle values of an
    /// even-length one.
    ///
    /// The slice is reordered but keeps the same values. It must not contain NaN.
    pub fn median(&mut self, values: &mut [f64]) -> Result<f64, InvalidArgument> {
        let n = values.len();
        match n {
            0 => Err(InvalidArgument::Empty),
            1 => Ok(values[0]),
            2 => Ok(average(values[0], values[1])),
            _ if n & 1 == 1 => {
                let middle = n >> 1;
                self.selector.select(values, middle)?;
                Ok(values[middle])
            }
            _ => {
                let high = n >> 1;
                let low = high - 1;

                let bounds = self.selector.select_range(values, high, 0, n)?;
                // The first pass already fixed everything up to `before`, so the low middle
                // value can only be in `before + 1..high`.
                if bounds.before != Some(low) {
                    let begin = bounds.before.map_or(0, |b| b + 1);
                    debug!("narrowed second pass over {begin}..{high}");
                    self.selector.select_range(values, low, begin, high)?;
                }
                Ok(average(values[low], values[high]))
            }
        }
    }
}

/// Average of two values that does not overflow for large finite operands.
///
/// When `x + y` is representable the result is exactly `(x + y) / 2`. Infinities follow IEEE
/// arithmetic: equal infinities average to themselves and opposite ones to NaN.
pub fn average(x: f64, y: f64) -> f64 {
    debug_assert!(!x.is_nan() && !y.is_nan(), "cannot average NaN");
    if x.is_infinite() || y.is_infinite() {
        return (x + y) / 2.0;
    }

    if x >= y {
        if y <= 0.0 && x >= 0.0 {
            // Opposite signs, the sum cannot overflow.
            return (x + y) / 2.0;
        }
        // The difference is smaller than either operand.
        ((x - y) / 2.0) + y
    } else {
        if x <= 0.0 && y >= 0.0 {
            return (x + y) / 2.0;
        }
        ((y - x) / 2.0) + x
    }
}

/// Median by fully sorting the slice in place. Slow, but obviously correct.
pub fn sorting_median(values: &mut [f64]) -> Result<f64, InvalidArgument> {
    if values.is_empty() {
        return Err(InvalidArgument::Empty);
    }
    values.sort_unstable_by(f64::total_cmp);

    let middle = values.len() >> 1;
    if values.len() & 1 == 1 {
        Ok(values[middle])
    } else {
        Ok(average(values[middle - 1], values[middle]))
    }
}
