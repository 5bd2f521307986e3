//! In-place quickselect and median over `f64` slices.
//!
//! [`Selector`] reorders a slice so that one index holds the value it would have if the slice
//! were sorted, in expected linear time. [`Median`] builds on it and only pays for a second,
//! narrower selection on even-length input when the first one did not already fix the lower
//! middle value.
//!
//! ```
//! use quickmedian::{Median, Selector};
//!
//! let mut values = [6.0, 8.0, 7.0, 5.0, 3.0, 0.0, 9.0, 1.0, 2.0, 4.0];
//! let mut median: Median = Median::default();
//! assert_eq!(median.median(&mut values), Ok(4.5));
//!
//! // Descending by default: the five largest values end up before index 5.
//! let mut selector: Selector = Selector::default();
//! selector.select(&mut values, 5).unwrap();
//! assert_eq!(values[5], 4.0);
//! ```
//!
//! NaN is not a supported input anywhere in this crate. Debug builds assert against it, and
//! [`contains_nan`] is available for checking untrusted input up front.
pub mod error;
pub mod median;
pub mod select;

pub use error::InvalidArgument;
pub use median::{Median, average, sorting_median};
pub use select::{
    Bounds, DEFAULT_MEDIAN_OF_THREE_THRESHOLD, Order, PivotMethod, SelectConfig, Selector,
    contains_nan, contains_nan_range,
};
