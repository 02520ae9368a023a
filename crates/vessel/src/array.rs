//! The [`DynArray`] type: storage, construction, and capacity management.

use std::mem;
use std::ops::{Deref, DerefMut};
use std::ptr;
use std::slice;

use vessel_core::ReserveError;
use vessel_raw::{InitGuard, RawBuffer};

/// A contiguous, growable array.
///
/// Owns exactly one [`RawBuffer`]. Slots `[0, len)` hold live elements and
/// slots `[len, capacity)` are uninitialised; every operation restores that
/// split before it returns or unwinds.
pub struct DynArray<T> {
    pub(crate) buf: RawBuffer<T>,
    pub(crate) len: usize,
}

impl<T> DynArray<T> {
    /// Create an empty array. Does not allocate.
    pub const fn new() -> Self {
        Self {
            buf: RawBuffer::new(),
            len: 0,
        }
    }

    /// Create an empty array with room for exactly `capacity` elements.
    #[track_caller]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: RawBuffer::allocate(capacity),
            len: 0,
        }
    }

    /// Create an array of `len` default values. Capacity equals `len`.
    ///
    /// If `T::default()` panics, the values built so far are dropped and
    /// the buffer is released before the panic continues.
    #[track_caller]
    pub fn with_len(len: usize) -> Self
    where
        T: Default,
    {
        Self::from_fn(len, |_| T::default())
    }

    /// Create an array of `len` elements where element `i` is `f(i)`.
    ///
    /// Capacity equals `len`. Same rollback as [`with_len`](Self::with_len).
    #[track_caller]
    pub fn from_fn<F>(len: usize, mut f: F) -> Self
    where
        F: FnMut(usize) -> T,
    {
        let mut buf = RawBuffer::allocate(len);
        let mut guard = InitGuard::new(buf.as_uninit_slice_mut());
        for index in 0..len {
            guard.push(f(index));
        }
        let len = guard.commit();
        Self { buf, len }
    }

    /// Create an array of `n` clones of `elem`.
    #[track_caller]
    pub fn from_elem(elem: T, n: usize) -> Self
    where
        T: Clone,
    {
        Self::from_fn(n, |_| elem.clone())
    }

    /// Number of live elements.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the array holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of elements the current buffer can hold.
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// The live elements as a slice.
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: slots [0, len) are live and the pointer is non-null and
        // aligned even for the empty buffer.
        unsafe { slice::from_raw_parts(self.buf.as_ptr(), self.len) }
    }

    /// The live elements as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as in `as_slice`; `&mut self` guarantees uniqueness.
        unsafe { slice::from_raw_parts_mut(self.buf.as_mut_ptr(), self.len) }
    }

    /// Base address of the element storage.
    pub fn as_ptr(&self) -> *const T {
        self.buf.as_ptr()
    }

    /// Mutable base address of the element storage.
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.buf.as_mut_ptr()
    }

    /// Move the contents out into a new array, leaving `self` empty.
    pub fn take(&mut self) -> Self {
        mem::take(self)
    }

    /// Exchange buffers and lengths with `other`.
    pub fn swap(&mut self, other: &mut Self) {
        self.buf.swap(&mut other.buf);
        mem::swap(&mut self.len, &mut other.len);
    }

    /// Take over `other`'s contents.
    ///
    /// The two arrays swap buffers, then the elements `self` used to hold
    /// are dropped from `other`. Afterwards `other.len() == 0` and `other`
    /// keeps the storage `self` used to own.
    pub fn move_from(&mut self, other: &mut Self) {
        self.swap(other);
        other.clear();
    }

    /// Ensure the buffer can hold at least `new_capacity` elements.
    ///
    /// `new_capacity` is an absolute target, not an increment. Does nothing
    /// if the buffer is already large enough; otherwise allocates a buffer
    /// of exactly `new_capacity` and moves every element into it.
    #[track_caller]
    pub fn reserve(&mut self, new_capacity: usize) {
        if new_capacity <= self.capacity() {
            return;
        }
        self.relocate(RawBuffer::allocate(new_capacity));
    }

    /// Fallible version of [`reserve`](Self::reserve).
    ///
    /// On error the array is unchanged.
    pub fn try_reserve(&mut self, new_capacity: usize) -> Result<(), ReserveError> {
        if new_capacity <= self.capacity() {
            return Ok(());
        }
        self.relocate(RawBuffer::try_allocate(new_capacity)?);
        Ok(())
    }

    /// Move every live element into `target` and adopt it as storage.
    ///
    /// The old buffer is released without dropping anything: its elements
    /// now live in `target`.
    pub(crate) fn relocate(&mut self, mut target: RawBuffer<T>) {
        assert!(target.capacity() >= self.len);
        // SAFETY: `target` is a distinct allocation with room for `len`
        // elements. After the copy the originals are plain bytes, released
        // when `target` (holding the old buffer) drops.
        unsafe { ptr::copy_nonoverlapping(self.buf.as_ptr(), target.as_mut_ptr(), self.len) }
        self.buf.swap(&mut target);
    }

    /// Resize to `new_len`, filling new slots with `T::default()`.
    #[track_caller]
    pub fn resize(&mut self, new_len: usize)
    where
        T: Default,
    {
        self.resize_with(new_len, T::default);
    }

    /// Resize to `new_len`, filling new slots with values from `f`.
    ///
    /// Growing reserves exactly `new_len` if needed. If `f` panics, the
    /// values it already produced are dropped and the length is unchanged
    /// (the capacity may have grown). Shrinking drops the tail.
    #[track_caller]
    pub fn resize_with<F>(&mut self, new_len: usize, mut f: F)
    where
        F: FnMut() -> T,
    {
        let len = self.len;
        if new_len <= len {
            self.truncate(new_len);
            return;
        }
        self.reserve(new_len);
        let mut guard = InitGuard::new(&mut self.buf.as_uninit_slice_mut()[len..new_len]);
        while !guard.is_full() {
            guard.push(f());
        }
        self.len = len + guard.commit();
    }
}

impl<T> Drop for DynArray<T> {
    fn drop(&mut self) {
        // SAFETY: slots [0, len) are live and dropped exactly once here; the
        // buffer releases the bytes afterwards.
        unsafe { ptr::drop_in_place(self.as_mut_slice()) }
    }
}

impl<T> Default for DynArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Deref for DynArray<T> {
    type Target = [T];

    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T> DerefMut for DynArray<T> {
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}
