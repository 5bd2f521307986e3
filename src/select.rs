//! Quickselect is a selection algorithm to find the k-th element of an unordered list as if it
//! were sorted, without sorting it.
//!
//! After a selection targeting `k`, `values[k]` holds the value a full sort would put there, every
//! element before `k` compares no-worse than it and every element after `k` no-better. Nothing is
//! guaranteed about the order within either side. This is enough to pick out the median, or the
//! top-N values of a beam (select `N - 1` in descending order), in expected O(N).

use std::cmp::Ordering;

use log::{debug, trace};
use rand::Rng;
use rand::prelude::*;
use rand::rngs::ThreadRng;

use crate::error::InvalidArgument;

/// Median-of-three pivots are only sampled from subranges at least this long.
pub const DEFAULT_MEDIAN_OF_THREE_THRESHOLD: usize = 24;

/// How a partition step picks its pivot.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum PivotMethod {
    /// Always the middle of the active subrange.
    Fixed,
    /// A uniformly chosen index in the active subrange.
    Random,
    /// Median of the values at about 25%, 50% and 75% of the active subrange.
    MedianOfThreeFixed,
    /// Median of three uniformly chosen indices. Most robust against inputs that would make
    /// the other methods quadratic.
    #[default]
    MedianOfThreeRandom,
}

/// Which values end up before the selected index.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Order {
    /// Largest values first.
    #[default]
    Descending,
    /// Smallest values first.
    Ascending,
}

impl Order {
    #[inline(always)]
    fn goes_before(self, value: f64, pivot: f64) -> bool {
        match self {
            Order::Descending => value >= pivot,
            Order::Ascending => value <= pivot,
        }
    }
}

/// Closest pivots that landed in their final sorted position on either side of the selected
/// index during one selection.
///
/// A side is `None` when the selection never had to look past it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Bounds {
    /// Nearest sorted index left of the selected one.
    pub before: Option<usize>,
    /// Nearest sorted index right of the selected one.
    pub after: Option<usize>,
}

/// Settings a [`Selector`] keeps for its whole lifetime.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SelectConfig {
    pub pivot: PivotMethod,
    pub order: Order,
    /// Subranges shorter than this fall back from median-of-three to the single-sample
    /// counterpart of the pivot method.
    pub median_of_three_threshold: usize,
}

impl SelectConfig {
    /// Median-of-three with random samples, descending, default threshold.
    pub fn new() -> Self {
        Self {
            pivot: PivotMethod::default(),
            order: Order::default(),
            median_of_three_threshold: DEFAULT_MEDIAN_OF_THREE_THRESHOLD,
        }
    }

    /// Defaults with the given order.
    pub fn with_order(order: Order) -> Self {
        let mut c = Self::new();
        c.order = order;
        c
    }

    /// Defaults with the given pivot method.
    pub fn with_pivot(pivot: PivotMethod) -> Self {
        let mut c = Self::new();
        c.pivot = pivot;
        c
    }
}

impl Default for SelectConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Reorders `f64` slices in place so that a chosen index holds its sorted value.
///
/// The random source is only consulted by the randomized pivot methods, and is advanced by
/// every selection that uses one. Pass a seeded generator for reproducible runs.
pub struct Selector<R = ThreadRng> {
    config: SelectConfig,
    rng: R,
}

impl Selector<ThreadRng> {
    /// Creates a selector backed by the thread-local generator.
    pub fn from_config(config: SelectConfig) -> Self {
        Self::new(config, rand::rng())
    }
}

impl Default for Selector<ThreadRng> {
    fn default() -> Self {
        Self::from_config(SelectConfig::default())
    }
}

impl<R: Rng> Selector<R> {
    /// Creates a selector drawing random pivots from `rng`.
    pub fn new(config: SelectConfig, rng: R) -> Self {
        Self { config, rng }
    }

    /// The settings this selector was created with.
    pub fn config(&self) -> &SelectConfig {
        &self.config
    }

    /// Selects index `k` over the whole slice.
    pub fn select(&mut self, values: &mut [f64], k: usize) -> Result<(), InvalidArgument> {
        self.select_range(values, k, 0, values.len()).map(|_| ())
    }

    /// Selects index `k` within `values[begin..end]`, leaving everything outside the range
    /// untouched.
    ///
    /// `k` indexes the whole slice, not the range. Returns the tightest already-sorted indices
    /// found on either side of `k`; see [`Bounds`]. When they are present, in descending order
    /// `sorted[before] >= sorted[k] >= sorted[after]`.
    ///
    /// The range must not contain NaN. This is only checked in debug builds; in release the
    /// result is unspecified, use [`contains_nan_range`] up front if the input is untrusted.
    pub fn select_range(
        &mut self,
        values: &mut [f64],
        k: usize,
        begin: usize,
        end: usize,
    ) -> Result<Bounds, InvalidArgument> {
        if values.is_empty() {
            return Err(InvalidArgument::Empty);
        }
        check_range(values.len(), begin, end)?;
        if k < begin || k >= end {
            return Err(InvalidArgument::Rank { k, begin, end });
        }
        debug_assert!(
            !values[begin..end].iter().any(|v| v.is_nan()),
            "cannot select from a range containing NaN"
        );

        let mut bounds = Bounds::default();
        let mut begin = begin;
        let mut end = end;
        loop {
            let pivot = self.pivot_index(values, begin, end - begin);
            let store = self.partition(values, begin, end, pivot);
            trace!("partitioned {begin}..{end} around index {pivot}, pivot landed at {store}");

            match store.cmp(&k) {
                // The pivot wound up left of k: look right.
                Ordering::Less => {
                    begin = store + 1;
                    bounds.before = Some(store);
                }
                Ordering::Greater => {
                    end = store;
                    bounds.after = Some(store);
                }
                Ordering::Equal => break,
            }
        }

        debug!("selected index {k}, bounds {bounds:?}");
        Ok(bounds)
    }

    /// Lomuto partition of `values[begin..end]` around the value at `pivot`. Returns the final
    /// index of the pivot value.
    fn partition(&self, values: &mut [f64], begin: usize, end: usize, pivot: usize) -> usize {
        let order = self.config.order;
        let last = end - 1;

        // Swap out the pivot. Its value is held in a local, so the last slot only needs to be
        // copied into the hole and is left out of the scan.
        let pivot_value = values[pivot];
        values[pivot] = values[last];

        let mut store = begin;
        for i in begin..last {
            if order.goes_before(values[i], pivot_value) {
                values.swap(store, i);
                store += 1;
            }
        }

        // Move the pivot to its final place.
        values[last] = values[store];
        values[store] = pivot_value;

        store
    }

    fn pivot_index(&mut self, values: &[f64], begin: usize, len: usize) -> usize {
        let median_of_three = len >= self.config.median_of_three_threshold;
        match self.config.pivot {
            PivotMethod::MedianOfThreeFixed if median_of_three => median_index(
                values,
                begin + (len >> 2),
                begin + (len >> 1),
                begin + ((3 * len) >> 2),
            ),
            PivotMethod::MedianOfThreeRandom if median_of_three => {
                let a = begin + self.rng.random_range(0..len);
                let b = begin + self.rng.random_range(0..len);
                let c = begin + self.rng.random_range(0..len);
                median_index(values, a, b, c)
            }
            PivotMethod::Random | PivotMethod::MedianOfThreeRandom => {
                begin + self.rng.random_range(0..len)
            }
            PivotMethod::Fixed | PivotMethod::MedianOfThreeFixed => begin + (len >> 1),
        }
    }
}

/// Index of the middle value among `values[a]`, `values[b]` and `values[c]`. Ties go to `b`.
fn median_index(values: &[f64], a: usize, b: usize, c: usize) -> usize {
    let (x, y, z) = (values[a], values[b], values[c]);
    if x <= y {
        if z >= y {
            b
        } else if x >= z {
            a
        } else {
            c
        }
    } else if y >= z {
        b
    } else if z >= x {
        a
    } else {
        c
    }
}

fn check_range(len: usize, begin: usize, end: usize) -> Result<(), InvalidArgument> {
    if begin >= end || end > len {
        return Err(InvalidArgument::Range { begin, end, len });
    }
    Ok(())
}

/// Returns whether any element of the slice is NaN.
pub fn contains_nan(values: &[f64]) -> Result<bool, InvalidArgument> {
    contains_nan_range(values, 0, values.len())
}

/// Returns whether any element of `values[begin..end]` is NaN.
pub fn contains_nan_range(
    values: &[f64],
    begin: usize,
    end: usize,
) -> Result<bool, InvalidArgument> {
    check_range(values.len(), begin, end)?;
    Ok(values[begin..end].iter().any(|v| v.is_nan()))
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn value() -> impl Strategy<Value = f64> {
        prop_oneof![
            -1e12f64..1e12,
            (0i32..16).prop_map(f64::from),
            Just(f64::INFINITY),
            Just(f64::NEG_INFINITY),
        ]
    }

    fn pivot() -> impl Strategy<Value = PivotMethod> {
        prop_oneof![
            Just(PivotMethod::Fixed),
            Just(PivotMethod::Random),
            Just(PivotMethod::MedianOfThreeFixed),
            Just(PivotMethod::MedianOfThreeRandom),
        ]
    }

    fn order() -> impl Strategy<Value = Order> {
        prop_oneof![Just(Order::Descending), Just(Order::Ascending)]
    }

    /// A slice with a valid `(k, begin, end)` inside it.
    fn selection() -> impl Strategy<Value = (Vec<f64>, usize, usize, usize)> {
        proptest::collection::vec(value(), 1..300)
            .prop_flat_map(|v| {
                let len = v.len();
                (Just(v), 0..len, 0..len)
            })
            .prop_flat_map(|(v, a, b)| {
                let (begin, last) = if a <= b { (a, b) } else { (b, a) };
                (Just(v), begin..=last, Just(begin), Just(last + 1))
            })
    }

    fn sorted_by(values: &[f64], order: Order) -> Vec<f64> {
        let mut sorted = values.to_vec();
        match order {
            Order::Descending => sorted.sort_by(|a, b| b.total_cmp(a)),
            Order::Ascending => sorted.sort_by(f64::total_cmp),
        }
        sorted
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn partition_invariant(
            (reference, k, begin, end) in selection(),
            pivot in pivot(),
            order in order(),
            seed in any::<u64>(),
        ) {
            let config = SelectConfig { pivot, order, ..SelectConfig::new() };
            let mut selector = Selector::new(config, ChaCha8Rng::seed_from_u64(seed));
            let mut data = reference.clone();
            let bounds = selector.select_range(&mut data, k, begin, end).unwrap();

            let sorted = sorted_by(&reference[begin..end], order);
            prop_assert_eq!(data[k], sorted[k - begin]);
            for i in begin..k {
                prop_assert!(order.goes_before(data[i], data[k]));
            }
            for i in k + 1..end {
                prop_assert!(order.goes_before(data[k], data[i]));
            }

            // Outside the range nothing moves, inside only the order changes.
            prop_assert_eq!(&data[..begin], &reference[..begin]);
            prop_assert_eq!(&data[end..], &reference[end..]);
            prop_assert_eq!(&sorted_by(&data[begin..end], order), &sorted);

            if let Some(before) = bounds.before {
                prop_assert!(begin <= before && before < k);
                prop_assert_eq!(data[before], sorted[before - begin]);
            }
            if let Some(after) = bounds.after {
                prop_assert!(k < after && after < end);
                prop_assert_eq!(data[after], sorted[after - begin]);
            }
        }

        #[test]
        fn reselecting_keeps_value((reference, k, _, _) in selection(), seed in any::<u64>()) {
            let mut selector = Selector::new(SelectConfig::new(), ChaCha8Rng::seed_from_u64(seed));
            let mut data = reference;
            selector.select(&mut data, k).unwrap();
            let selected = data[k];
            selector.select(&mut data, k).unwrap();
            prop_assert_eq!(data[k], selected);
        }
    }
}
