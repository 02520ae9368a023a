//! Raw element storage for the Vessel containers.
//!
//! A [`RawBuffer`] owns a block of uninitialised memory sized for a fixed
//! number of elements. It never constructs or destroys elements: the
//! owning container decides which slots are live. [`InitGuard`] is the
//! companion primitive for filling slots one at a time with rollback if
//! element construction panics part-way.
//!
//! # Ownership
//!
//! ```text
//! DynArray<T>
//! └── RawBuffer<T>   (ptr, capacity)   bytes only, never drops elements
//!     ├── [0, len)          live elements, owned by DynArray
//!     └── [len, capacity)   uninitialised
//! ```
//!
//! This crate and `vessel` are the only workspace crates containing
//! `unsafe` code. Every `unsafe` block states its obligations in a
//! `// SAFETY:` comment.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_op_in_unsafe_fn)]

pub mod buffer;
pub mod guard;

pub use buffer::RawBuffer;
pub use guard::InitGuard;
