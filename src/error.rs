/// Rejected arguments to a selection, median, or NaN scan.
///
/// Always returned before the slice is touched.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum InvalidArgument {
    /// The slice has no elements.
    #[error("the slice is empty")]
    Empty,
    /// The half-open range is empty or runs past the end of the slice.
    #[error("invalid range {begin}..{end} for a slice of length {len}")]
    Range {
        /// Inclusive start of the range.
        begin: usize,
        /// Exclusive end of the range.
        end: usize,
        /// Length of the slice.
        len: usize,
    },
    /// The selected index lies outside the range.
    #[error("index {k} is outside of the range {begin}..{end}")]
    Rank {
        /// The selected index.
        k: usize,
        /// Inclusive start of the range.
        begin: usize,
        /// Exclusive end of the range.
        end: usize,
    },
}
