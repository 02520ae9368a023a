//! Growth policy for full buffers.
//!
//! There is a single, global growth strategy: when an append or insert
//! finds the buffer full, the replacement buffer holds
//! `max(MIN_NON_ZERO_CAPACITY, GROWTH_FACTOR * len)` elements. Explicit
//! `reserve` and `resize` calls request exact capacities and bypass it.

use crate::error::ReserveError;

/// Capacity of the first buffer allocated by an append into an empty array.
pub const MIN_NON_ZERO_CAPACITY: usize = 1;

/// Multiplier applied to the current length when a full buffer is replaced.
pub const GROWTH_FACTOR: usize = 2;

/// Capacity of the buffer that replaces a full buffer holding `len` elements.
///
/// Returns [`ReserveError::CapacityOverflow`] instead of wrapping when
/// `GROWTH_FACTOR * len` does not fit in `usize`.
pub fn next_capacity(len: usize) -> Result<usize, ReserveError> {
    len.checked_mul(GROWTH_FACTOR)
        .map(|grown| grown.max(MIN_NON_ZERO_CAPACITY))
        .ok_or(ReserveError::CapacityOverflow { requested: len })
}

/// Like [`next_capacity`], but panics with `"capacity overflow"` the way
/// the standard collections do.
#[track_caller]
pub fn grown_capacity(len: usize) -> usize {
    match next_capacity(len) {
        Ok(capacity) => capacity,
        Err(_) => panic!("capacity overflow"),
    }
}
