//! The [`Probe`] element type and its per-thread ledger.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::thread;

use indexmap::IndexMap;

use crate::{INJECTED_CLONE_FAILURE, INJECTED_DEFAULT_FAILURE, INJECTED_DROP_FAILURE};

thread_local! {
    /// Live probes by id, in creation order, mapped to their value.
    static LEDGER: RefCell<IndexMap<u64, u32>> = RefCell::new(IndexMap::new());
    static NEXT_ID: Cell<u64> = const { Cell::new(0) };
    /// Successful clones left before the next one panics; `None` = never.
    static CLONE_BUDGET: Cell<Option<usize>> = const { Cell::new(None) };
    static DEFAULT_BUDGET: Cell<Option<usize>> = const { Cell::new(None) };
    static DROP_TRAP: Cell<Option<u32>> = const { Cell::new(None) };
}

/// An element that reports its own lifetime.
///
/// Every construction (`new`, `clone`, `default`) registers the probe in the
/// calling thread's ledger and every drop removes it. Equality, ordering and
/// `Debug` look only at the value, never at the identity.
pub struct Probe {
    id: u64,
    value: u32,
}

impl Probe {
    pub fn new(value: u32) -> Self {
        let id = NEXT_ID.with(|next| {
            let id = next.get();
            next.set(id + 1);
            id
        });
        LEDGER.with(|ledger| ledger.borrow_mut().insert(id, value));
        Self { id, value }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    pub fn set(&mut self, value: u32) {
        self.value = value;
        LEDGER.with(|ledger| ledger.borrow_mut().insert(self.id, value));
    }
}

/// Consume one unit of `budget`, panicking with `message` when it is spent.
fn spend(budget: &'static thread::LocalKey<Cell<Option<usize>>>, message: &str) {
    let exhausted = budget.with(|left| match left.get() {
        Some(0) => true,
        Some(n) => {
            left.set(Some(n - 1));
            false
        }
        None => false,
    });
    if exhausted {
        panic!("{message}");
    }
}

impl Clone for Probe {
    fn clone(&self) -> Self {
        spend(&CLONE_BUDGET, INJECTED_CLONE_FAILURE);
        Self::new(self.value)
    }
}

impl Default for Probe {
    fn default() -> Self {
        spend(&DEFAULT_BUDGET, INJECTED_DEFAULT_FAILURE);
        Self::new(0)
    }
}

impl Drop for Probe {
    fn drop(&mut self) {
        // The ledger may already be gone during thread teardown.
        let _ = LEDGER.try_with(|ledger| ledger.borrow_mut().shift_remove(&self.id));
        let trapped = DROP_TRAP
            .try_with(|trap| trap.get() == Some(self.value))
            .unwrap_or(false);
        if trapped && !thread::panicking() {
            panic!("{INJECTED_DROP_FAILURE}");
        }
    }
}

impl From<u32> for Probe {
    fn from(value: u32) -> Self {
        Self::new(value)
    }
}

impl PartialEq for Probe {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for Probe {}

impl PartialEq<u32> for Probe {
    fn eq(&self, other: &u32) -> bool {
        self.value == *other
    }
}

impl fmt::Debug for Probe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Probe({})", self.value)
    }
}

/// Handle on the calling thread's probe ledger and fault plan.
///
/// Creating a scope clears the ledger and disarms every fault; dropping it
/// disarms the faults again so a failing assertion cannot leak an armed
/// plan into unrelated code on the same thread.
pub struct ProbeScope {
    _private: (),
}

impl ProbeScope {
    pub fn new() -> Self {
        LEDGER.with(|ledger| ledger.borrow_mut().clear());
        disarm_all();
        Self { _private: () }
    }

    /// Number of probes currently alive on this thread.
    pub fn live(&self) -> usize {
        LEDGER.with(|ledger| ledger.borrow().len())
    }

    /// Values of the live probes, oldest first.
    pub fn live_values(&self) -> Vec<u32> {
        LEDGER.with(|ledger| ledger.borrow().values().copied().collect())
    }

    /// Let `successes` more clones succeed, then panic on the next one.
    pub fn fail_clone_after(&self, successes: usize) {
        CLONE_BUDGET.with(|budget| budget.set(Some(successes)));
    }

    /// Let `successes` more default constructions succeed, then panic.
    pub fn fail_default_after(&self, successes: usize) {
        DEFAULT_BUDGET.with(|budget| budget.set(Some(successes)));
    }

    /// Panic whenever a probe holding `value` is dropped (outside unwinding).
    pub fn fail_drop_of(&self, value: u32) {
        DROP_TRAP.with(|trap| trap.set(Some(value)));
    }

    /// Disarm every injected fault.
    pub fn disarm(&self) {
        disarm_all();
    }
}

fn disarm_all() {
    CLONE_BUDGET.with(|budget| budget.set(None));
    DEFAULT_BUDGET.with(|budget| budget.set(None));
    DROP_TRAP.with(|trap| trap.set(None));
}

impl Default for ProbeScope {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ProbeScope {
    fn drop(&mut self) {
        let _ = CLONE_BUDGET.try_with(|budget| budget.set(None));
        let _ = DEFAULT_BUDGET.try_with(|budget| budget.set(None));
        let _ = DROP_TRAP.try_with(|trap| trap.set(None));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catch_panic;

    #[test]
    fn ledger_tracks_construction_and_drop() {
        let scope = ProbeScope::new();
        let a = Probe::new(1);
        let b = a.clone();
        let c = Probe::default();
        assert_eq!(scope.live(), 3);
        assert_eq!(scope.live_values(), [1, 1, 0]);
        drop(b);
        assert_eq!(scope.live_values(), [1, 0]);
        drop((a, c));
        assert_eq!(scope.live(), 0);
    }

    #[test]
    fn set_updates_ledger() {
        let scope = ProbeScope::new();
        let mut p = Probe::new(1);
        p.set(9);
        assert_eq!(p, 9);
        assert_eq!(scope.live_values(), [9]);
    }

    #[test]
    fn clone_budget_panics_after_successes() {
        let scope = ProbeScope::new();
        let p = Probe::new(4);
        scope.fail_clone_after(2);
        let first = p.clone();
        let second = p.clone();
        let err = catch_panic(|| p.clone()).unwrap_err();
        assert_eq!(err, INJECTED_CLONE_FAILURE);
        assert_eq!(scope.live(), 3);
        drop((first, second));
    }

    #[test]
    fn default_budget_panics() {
        let scope = ProbeScope::new();
        scope.fail_default_after(0);
        let err = catch_panic(Probe::default).unwrap_err();
        assert_eq!(err, INJECTED_DEFAULT_FAILURE);
        assert_eq!(scope.live(), 0);
        scope.disarm();
        let _ok = Probe::default();
    }

    #[test]
    fn drop_trap_panics_but_still_unregisters() {
        let scope = ProbeScope::new();
        scope.fail_drop_of(13);
        let p = Probe::new(13);
        let err = catch_panic(move || drop(p)).unwrap_err();
        assert_eq!(err, INJECTED_DROP_FAILURE);
        assert_eq!(scope.live(), 0);
    }

    #[test]
    fn dropping_scope_disarms() {
        {
            let scope = ProbeScope::new();
            scope.fail_clone_after(0);
        }
        let scope = ProbeScope::new();
        let p = Probe::new(1);
        let _copy = p.clone();
        assert_eq!(scope.live(), 2);
    }

    #[test]
    fn equality_ignores_identity() {
        let _scope = ProbeScope::new();
        assert_eq!(Probe::new(3), Probe::new(3));
        assert_ne!(Probe::new(3), Probe::new(4));
        assert_eq!(format!("{:?}", Probe::new(5)), "Probe(5)");
    }
}
