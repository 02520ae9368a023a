//! Error types for buffer allocation.
//!
//! Only allocation can fail with a typed error. Failures raised by element
//! code (constructors, `Clone`, `Drop`) are panics and propagate unchanged
//! through the containers after they roll back their own partial work.

use std::error::Error;
use std::fmt;

/// Errors from requesting storage for a number of elements.
///
/// Returned by the `try_` family (`RawBuffer::try_allocate`,
/// `DynArray::try_reserve`, `DynArray::try_push`). The infallible
/// counterparts panic on [`CapacityOverflow`](ReserveError::CapacityOverflow)
/// and hand [`AllocationFailed`](ReserveError::AllocationFailed) to the
/// global allocation-error handler.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ReserveError {
    /// The requested element count cannot be described by a valid layout
    /// (the byte size would exceed `isize::MAX`).
    CapacityOverflow {
        /// Number of elements requested.
        requested: usize,
    },
    /// The global allocator could not satisfy the request.
    AllocationFailed {
        /// Size of the rejected allocation in bytes.
        bytes: usize,
        /// Alignment of the rejected allocation in bytes.
        align: usize,
    },
}

impl ReserveError {
    /// Whether this error came from the allocator rather than from
    /// capacity arithmetic.
    pub fn is_allocation_failure(&self) -> bool {
        matches!(self, Self::AllocationFailed { .. })
    }
}

impl fmt::Display for ReserveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityOverflow { requested } => {
                write!(f, "capacity overflow: {requested} elements do not fit a single allocation")
            }
            Self::AllocationFailed { bytes, align } => {
                write!(f, "memory allocation of {bytes} bytes (align {align}) failed")
            }
        }
    }
}

impl Error for ReserveError {}
