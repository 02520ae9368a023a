//! Vessel: a growable array with explicit control over allocation,
//! element lifetime, and panic safety.
//!
//! [`DynArray`] offers the usual dynamic-array surface (indexing,
//! append, insert, erase, capacity growth, copy and move) on top of a
//! [`RawBuffer`] that separates allocation from object lifetime.
//!
//! # Quick start
//!
//! ```rust
//! use vessel::{dyn_array, DynArray};
//!
//! let mut a = DynArray::new();
//! a.push(1);
//! a.push(2);
//! a.push(3);
//! assert_eq!(a, [1, 2, 3]);
//!
//! a.erase(1);
//! assert_eq!(a, [1, 3]);
//!
//! a.insert(0, 0);
//! assert_eq!(a, dyn_array![0, 1, 3]);
//! ```
//!
//! # Panic safety
//!
//! Element code (`Default`, `Clone`, `Drop`, or a constructor closure) may
//! panic. The array never catches those panics; it rolls back its own
//! partial work and lets the panic continue.
//!
//! | Guarantee | Operations |
//! |-----------|------------|
//! | Strong (unchanged on panic) | `with_len`, `from_fn`, `clone`, `clone_from` with growth, `reserve`, `resize` growth, `push`, `emplace_back_with`, `insert`/`emplace_with` |
//! | Basic (valid, contents unspecified) | `clone_from` without growth |
//! | Never panics | moves, `take`, `swap`, `pop` |
//!
//! Elements are relocated between buffers and shifted within a buffer by
//! bitwise moves, which cannot fail. The in-place `insert` path and
//! `erase` therefore have no failure point after the new value exists;
//! a panic from the erased value's own `Drop` surfaces after the array is
//! already consistent.
//!
//! Destructors that panic are tolerated: the array stays valid and every
//! other element is still dropped.
//!
//! Allocation failure goes through [`std::alloc::handle_alloc_error`] for
//! the infallible operations. `try_reserve` and `try_push` report it as a
//! [`ReserveError`] and leave the array unchanged.
//!
//! # Crates
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`raw`] | `vessel-raw` | `RawBuffer`, `InitGuard` |
//! | [`types`] | `vessel-core` | `ReserveError`, growth policy |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_op_in_unsafe_fn)]

mod array;
mod assign;
mod edit;
mod impls;
pub mod iter;
mod macros;

pub use array::DynArray;
pub use iter::IntoIter;
pub use vessel_core::ReserveError;
pub use vessel_raw::RawBuffer;

/// Raw storage primitives (re-export of `vessel-raw`).
pub mod raw {
    pub use vessel_raw::*;
}

/// Error types and growth policy (re-export of `vessel-core`).
pub mod types {
    pub use vessel_core::*;
}
