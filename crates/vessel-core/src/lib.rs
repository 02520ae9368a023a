//! Core types for the Vessel container workspace.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! error type shared by every fallible allocation path and the growth
//! policy that decides how large a replacement buffer should be.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod growth;

pub use error::ReserveError;
