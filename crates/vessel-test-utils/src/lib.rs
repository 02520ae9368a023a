//! Test utilities for Vessel development.
//!
//! Provides [`Probe`], an instrumented element type that records every live
//! instance in a per-thread ledger and can be armed to panic on the N-th
//! clone or default construction, or when a chosen value is dropped.
//! Together with [`catch_panic`] this lets a test check that a failed
//! container operation leaves exactly the objects it started with.
//!
//! The ledger is thread-local, so tests running in parallel do not see
//! each other's probes.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod probe;

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

pub use probe::{Probe, ProbeScope};

/// Panic message raised by an armed `Probe` clone.
pub const INJECTED_CLONE_FAILURE: &str = "injected clone failure";
/// Panic message raised by an armed `Probe` default construction.
pub const INJECTED_DEFAULT_FAILURE: &str = "injected default failure";
/// Panic message raised when an armed probe value is dropped.
pub const INJECTED_DROP_FAILURE: &str = "injected drop failure";

/// Run `f`, returning its result or the message of the panic it raised.
pub fn catch_panic<R>(f: impl FnOnce() -> R) -> Result<R, String> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| panic_message(&*payload))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "<non-string panic payload>".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catch_panic_passes_through_values() {
        assert_eq!(catch_panic(|| 7), Ok(7));
    }

    #[test]
    fn catch_panic_reports_static_and_formatted_messages() {
        assert_eq!(
            catch_panic(|| panic!("plain")),
            Err::<(), _>("plain".to_owned())
        );
        let n = 3;
        assert_eq!(
            catch_panic(|| panic!("formatted {n}")),
            Err::<(), _>("formatted 3".to_owned())
        );
    }
}
