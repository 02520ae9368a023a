//! Appending, inserting, and erasing elements.
//!
//! Growth follows [`vessel_core::growth`]: a full buffer is replaced by
//! one holding `max(1, 2 * len)` elements. The new element is always
//! constructed in its final slot before any existing element moves, so a
//! panicking constructor leaves the array exactly as it was.

use std::ptr;

use vessel_core::{growth, ReserveError};
use vessel_raw::RawBuffer;

use crate::DynArray;

impl<T> DynArray<T> {
    /// Append `value`, growing the buffer if it is full.
    ///
    /// Returns a reference to the new last element.
    #[track_caller]
    pub fn push(&mut self, value: T) -> &mut T {
        self.emplace_back_with(|| value)
    }

    /// Fallible version of [`push`](Self::push).
    ///
    /// On error `value` is dropped and the array is unchanged.
    pub fn try_push(&mut self, value: T) -> Result<&mut T, ReserveError> {
        if self.len == self.capacity() {
            self.try_reserve(growth::next_capacity(self.len)?)?;
        }
        Ok(self.write_at_end(value))
    }

    /// Append `value` only if no reallocation is needed.
    ///
    /// Hands `value` back when the buffer is full.
    pub fn push_within_capacity(&mut self, value: T) -> Result<&mut T, T> {
        if self.len == self.capacity() {
            return Err(value);
        }
        Ok(self.write_at_end(value))
    }

    /// Append the value produced by `f`, constructing it in place.
    ///
    /// When the buffer is full, `f` runs against the replacement buffer
    /// before any existing element is moved. If `f` panics the replacement
    /// is released and the array is unchanged.
    #[track_caller]
    pub fn emplace_back_with<F>(&mut self, f: F) -> &mut T
    where
        F: FnOnce() -> T,
    {
        let len = self.len;
        if len < self.capacity() {
            return self.write_at_end(f());
        }

        let mut grown = RawBuffer::allocate(growth::grown_capacity(len));
        grown.uninit_mut(len).write(f());
        self.relocate(grown);
        self.len = len + 1;
        // SAFETY: slot `len` was written before the buffers were swapped.
        unsafe { self.buf.uninit_mut(len).assume_init_mut() }
    }

    fn write_at_end(&mut self, value: T) -> &mut T {
        let len = self.len;
        let slot = self.buf.uninit_mut(len).write(value);
        self.len = len + 1;
        slot
    }

    /// Remove and return the last element, or `None` if empty.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        // SAFETY: slot `len` was live and is no longer counted, so it is read
        // exactly once.
        Some(unsafe { self.buf.uninit(self.len).assume_init_read() })
    }

    /// Drop the last element. Does nothing on an empty array.
    pub fn pop_back(&mut self) {
        drop(self.pop());
    }

    /// Insert `value` at `index`, shifting later elements right.
    ///
    /// See [`emplace_with`](Self::emplace_with).
    #[track_caller]
    pub fn insert(&mut self, index: usize, value: T) -> &mut T {
        self.emplace_with(index, || value)
    }

    /// Insert the value produced by `f` at `index`.
    ///
    /// `index == len()` appends. When the buffer is full the new element is
    /// constructed in a fresh buffer first and the prefix and suffix are
    /// moved around it; otherwise `f` runs before anything shifts. Either
    /// way a panic in `f` leaves the array unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `index > len()`.
    #[track_caller]
    pub fn emplace_with<F>(&mut self, index: usize, f: F) -> &mut T
    where
        F: FnOnce() -> T,
    {
        let len = self.len;
        assert!(
            index <= len,
            "insertion index (is {index}) should be <= len (is {len})"
        );

        if len == self.capacity() {
            let mut grown = RawBuffer::allocate(growth::grown_capacity(len));
            grown.uninit_mut(index).write(f());
            let src = self.buf.as_ptr();
            let dst = grown.as_mut_ptr();
            // SAFETY: `grown` is a distinct allocation with at least len + 1
            // slots. The prefix lands in [0, index) and the suffix in
            // [index + 1, len + 1), around the new element.
            unsafe {
                ptr::copy_nonoverlapping(src, dst, index);
                ptr::copy_nonoverlapping(src.add(index), dst.add(index + 1), len - index);
            }
            self.buf.swap(&mut grown);
        } else {
            let value = f();
            let slot = self.buf.slot_mut(index);
            // SAFETY: len < capacity, so [index + 1, len + 1) is in bounds.
            // The shifted-from slot is overwritten without being dropped.
            unsafe {
                ptr::copy(slot, slot.add(1), len - index);
                slot.write(value);
            }
        }

        self.len = len + 1;
        // SAFETY: slot `index` holds the inserted element.
        unsafe { self.buf.uninit_mut(index).assume_init_mut() }
    }

    /// Remove and return the element at `index`, shifting later elements
    /// left.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    #[track_caller]
    pub fn remove(&mut self, index: usize) -> T {
        let len = self.len;
        assert!(
            index < len,
            "removal index (is {index}) should be < len (is {len})"
        );
        let slot = self.buf.slot_mut(index);
        // SAFETY: slot `index` is live and read once; the tail
        // [index + 1, len) then moves over it and the count drops by one.
        unsafe {
            let value = ptr::read(slot);
            ptr::copy(slot.add(1), slot, len - index - 1);
            self.len = len - 1;
            value
        }
    }

    /// Drop the element at `index`, shifting later elements left.
    ///
    /// Returns `index`, which now holds the erased element's successor (or
    /// equals `len()` if the last element was erased).
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    #[track_caller]
    pub fn erase(&mut self, index: usize) -> usize {
        drop(self.remove(index));
        index
    }

    /// Drop every element past `new_len`. Does nothing if `new_len >= len()`.
    pub fn truncate(&mut self, new_len: usize) {
        let len = self.len;
        if new_len >= len {
            return;
        }
        let tail = ptr::slice_from_raw_parts_mut(self.buf.slot_mut(new_len), len - new_len);
        self.len = new_len;
        // SAFETY: [new_len, len) were live and are no longer counted.
        unsafe { ptr::drop_in_place(tail) }
    }

    /// Drop every element, keeping the buffer.
    pub fn clear(&mut self) {
        self.truncate(0);
    }
}
