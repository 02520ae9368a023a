//! Slot-by-slot initialisation with rollback.
//!
//! [`InitGuard`] writes values into a run of uninitialised slots in order.
//! If it is dropped before [`commit`](InitGuard::commit), for example while
//! unwinding out of a panicking constructor, it destroys exactly the values
//! it wrote, so no partially built run outlives the failure.

use std::mem::{self, MaybeUninit};
use std::ptr;

/// Tracks how many leading slots of `slots` hold live values.
pub struct InitGuard<'a, T> {
    slots: &'a mut [MaybeUninit<T>],
    initialized: usize,
}

impl<'a, T> InitGuard<'a, T> {
    /// Start filling `slots` from index 0.
    ///
    /// The slots are treated as uninitialised: anything already in them is
    /// overwritten without being dropped.
    pub fn new(slots: &'a mut [MaybeUninit<T>]) -> Self {
        Self {
            slots,
            initialized: 0,
        }
    }

    /// Write `value` into the next free slot.
    ///
    /// # Panics
    ///
    /// Panics if every slot is already filled.
    #[track_caller]
    pub fn push(&mut self, value: T) {
        assert!(
            self.initialized < self.slots.len(),
            "InitGuard is full ({} slots)",
            self.slots.len()
        );
        self.slots[self.initialized].write(value);
        self.initialized += 1;
    }

    /// Number of slots written so far.
    pub fn initialized(&self) -> usize {
        self.initialized
    }

    /// Whether every slot has been written.
    pub fn is_full(&self) -> bool {
        self.initialized == self.slots.len()
    }

    /// Keep the written values and return how many there are.
    ///
    /// Ownership of the values passes to the caller, who must account for
    /// them (typically by bumping a container's length).
    pub fn commit(self) -> usize {
        let initialized = self.initialized;
        mem::forget(self);
        initialized
    }
}

impl<T> Drop for InitGuard<'_, T> {
    fn drop(&mut self) {
        let written = ptr::slice_from_raw_parts_mut(
            self.slots.as_mut_ptr().cast::<T>(),
            self.initialized,
        );
        // SAFETY: the first `initialized` slots were written by `push` and
        // have not been handed out, since `commit` forgets the guard.
        unsafe { ptr::drop_in_place(written) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RawBuffer;
    use std::cell::Cell;
    use std::panic::{self, AssertUnwindSafe};

    struct CountsDrops<'c>(&'c Cell<usize>);

    impl Drop for CountsDrops<'_> {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn commit_keeps_values() {
        let mut buf = RawBuffer::<String>::allocate(3);
        let mut guard = InitGuard::new(buf.as_uninit_slice_mut());
        guard.push("a".to_owned());
        guard.push("b".to_owned());
        assert_eq!(guard.initialized(), 2);
        assert!(!guard.is_full());
        assert_eq!(guard.commit(), 2);

        // SAFETY: slots 0 and 1 were committed above.
        let taken: Vec<String> = (0..2)
            .map(|i| unsafe { buf.uninit(i).assume_init_read() })
            .collect();
        assert_eq!(taken, ["a", "b"]);
    }

    #[test]
    fn dropping_uncommitted_guard_destroys_written_values() {
        let drops = Cell::new(0);
        let mut buf = RawBuffer::<CountsDrops<'_>>::allocate(4);
        {
            let mut guard = InitGuard::new(buf.as_uninit_slice_mut());
            guard.push(CountsDrops(&drops));
            guard.push(CountsDrops(&drops));
        }
        assert_eq!(drops.get(), 2);
    }

    #[test]
    fn unwinding_rolls_back_partial_fill() {
        let drops = Cell::new(0);
        let mut buf = RawBuffer::<CountsDrops<'_>>::allocate(4);
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let mut guard = InitGuard::new(buf.as_uninit_slice_mut());
            for i in 0..4 {
                if i == 3 {
                    panic!("constructor failed");
                }
                guard.push(CountsDrops(&drops));
            }
            guard.commit()
        }));
        assert!(result.is_err());
        assert_eq!(drops.get(), 3);
    }

    #[test]
    #[should_panic(expected = "InitGuard is full (1 slots)")]
    fn push_past_end_panics() {
        let mut buf = RawBuffer::<u8>::allocate(1);
        let mut guard = InitGuard::new(buf.as_uninit_slice_mut());
        guard.push(1);
        assert!(guard.is_full());
        guard.push(2);
    }
}
