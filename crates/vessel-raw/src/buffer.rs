//! Owned, uninitialised element storage.
//!
//! [`RawBuffer`] is the `(pointer, capacity)` ownership pair underneath
//! every Vessel container. It allocates and releases bytes; it has no idea
//! which of its slots hold live objects.

use std::alloc::{self, Layout};
use std::fmt;
use std::marker::PhantomData;
use std::mem::{self, MaybeUninit};
use std::ptr::NonNull;

use vessel_core::ReserveError;

/// A block of uninitialised storage for `capacity` values of `T`.
///
/// The empty buffer (capacity 0) holds a dangling pointer and owns no
/// allocation. Zero-sized element types never allocate either, but the
/// buffer still reports the capacity it was asked for.
///
/// Dropping a `RawBuffer` releases the bytes without running any element
/// destructor. The owner must destroy every live element it placed in the
/// buffer first. `RawBuffer` is deliberately not `Clone`: copying elements
/// is the owning container's business.
pub struct RawBuffer<T> {
    ptr: NonNull<T>,
    capacity: usize,
    _owns: PhantomData<T>,
}

// SAFETY: RawBuffer is a uniquely-owned allocation with no interior
// sharing, so it is as thread-safe as the values it will hold.
unsafe impl<T: Send> Send for RawBuffer<T> {}
// SAFETY: shared access only hands out `*const T` and `&MaybeUninit<T>`.
unsafe impl<T: Sync> Sync for RawBuffer<T> {}

impl<T> RawBuffer<T> {
    /// Create an empty buffer. Does not allocate.
    pub const fn new() -> Self {
        Self {
            ptr: NonNull::dangling(),
            capacity: 0,
            _owns: PhantomData,
        }
    }

    /// Allocate storage for `capacity` elements.
    ///
    /// Returns the empty buffer when `capacity == 0`.
    ///
    /// # Panics
    ///
    /// Panics with `"capacity overflow"` if the byte size would exceed
    /// `isize::MAX`. Allocation failure is reported through
    /// [`std::alloc::handle_alloc_error`].
    #[track_caller]
    pub fn allocate(capacity: usize) -> Self {
        let layout = match Self::layout_for(capacity) {
            Ok(layout) => layout,
            Err(_) => panic!("capacity overflow"),
        };
        match Self::allocate_layout(capacity, layout) {
            Ok(buffer) => buffer,
            Err(layout) => alloc::handle_alloc_error(layout),
        }
    }

    /// Fallible version of [`allocate`](Self::allocate).
    pub fn try_allocate(capacity: usize) -> Result<Self, ReserveError> {
        let layout = Self::layout_for(capacity)?;
        Self::allocate_layout(capacity, layout).map_err(|layout| ReserveError::AllocationFailed {
            bytes: layout.size(),
            align: layout.align(),
        })
    }

    fn layout_for(capacity: usize) -> Result<Layout, ReserveError> {
        Layout::array::<T>(capacity).map_err(|_| ReserveError::CapacityOverflow {
            requested: capacity,
        })
    }

    fn allocate_layout(capacity: usize, layout: Layout) -> Result<Self, Layout> {
        if layout.size() == 0 {
            return Ok(Self {
                ptr: NonNull::dangling(),
                capacity,
                _owns: PhantomData,
            });
        }
        // SAFETY: layout has a non-zero size.
        let raw = unsafe { alloc::alloc(layout) };
        match NonNull::new(raw.cast::<T>()) {
            Some(ptr) => Ok(Self {
                ptr,
                capacity,
                _owns: PhantomData,
            }),
            None => Err(layout),
        }
    }

    /// Number of elements the buffer can hold.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether this is the empty (capacity 0) buffer.
    pub fn is_empty(&self) -> bool {
        self.capacity == 0
    }

    /// Base address of the storage. Dangling (but aligned) when empty.
    pub fn as_ptr(&self) -> *const T {
        self.ptr.as_ptr()
    }

    /// Mutable base address of the storage. Dangling (but aligned) when empty.
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.ptr.as_ptr()
    }

    /// Address of the slot at `offset`.
    ///
    /// `offset == capacity` is allowed and yields the one-past-the-end
    /// address. Reading through the pointer is only valid if the owner has
    /// constructed an object there.
    ///
    /// # Panics
    ///
    /// Panics if `offset > capacity`.
    #[track_caller]
    pub fn slot(&self, offset: usize) -> *const T {
        self.check_offset(offset);
        // SAFETY: offset <= capacity keeps the pointer inside the allocation
        // or one past its end.
        unsafe { self.ptr.as_ptr().add(offset) }
    }

    /// Mutable address of the slot at `offset`. See [`slot`](Self::slot).
    #[track_caller]
    pub fn slot_mut(&mut self, offset: usize) -> *mut T {
        self.check_offset(offset);
        // SAFETY: as in `slot`.
        unsafe { self.ptr.as_ptr().add(offset) }
    }

    #[track_caller]
    fn check_offset(&self, offset: usize) {
        assert!(
            offset <= self.capacity,
            "slot offset {offset} out of range for capacity {}",
            self.capacity
        );
    }

    /// The slot at `index`, typed as possibly-uninitialised.
    ///
    /// # Panics
    ///
    /// Panics if `index >= capacity`.
    #[track_caller]
    pub fn uninit(&self, index: usize) -> &MaybeUninit<T> {
        self.check_index(index);
        &self.as_uninit_slice()[index]
    }

    /// Mutable slot at `index`, typed as possibly-uninitialised.
    ///
    /// # Panics
    ///
    /// Panics if `index >= capacity`.
    #[track_caller]
    pub fn uninit_mut(&mut self, index: usize) -> &mut MaybeUninit<T> {
        self.check_index(index);
        &mut self.as_uninit_slice_mut()[index]
    }

    #[track_caller]
    fn check_index(&self, index: usize) {
        assert!(
            index < self.capacity,
            "slot index {index} out of range for capacity {}",
            self.capacity
        );
    }

    /// Every slot of the buffer as a slice of `MaybeUninit<T>`.
    pub fn as_uninit_slice(&self) -> &[MaybeUninit<T>] {
        // SAFETY: the allocation spans `capacity` slots (or T is zero-sized,
        // or capacity is 0 with a dangling aligned pointer), and any bit
        // pattern is a valid MaybeUninit<T>.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr().cast(), self.capacity) }
    }

    /// Every slot of the buffer as a mutable slice of `MaybeUninit<T>`.
    pub fn as_uninit_slice_mut(&mut self) -> &mut [MaybeUninit<T>] {
        // SAFETY: as in `as_uninit_slice`; `&mut self` guarantees uniqueness.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr().cast(), self.capacity) }
    }

    /// Exchange storage and capacity with `other`.
    pub fn swap(&mut self, other: &mut Self) {
        mem::swap(&mut self.ptr, &mut other.ptr);
        mem::swap(&mut self.capacity, &mut other.capacity);
    }

    /// Move the storage out, leaving `self` as the empty buffer.
    pub fn take(&mut self) -> Self {
        mem::take(self)
    }
}

impl<T> Default for RawBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for RawBuffer<T> {
    fn drop(&mut self) {
        if self.capacity == 0 || mem::size_of::<T>() == 0 {
            return;
        }
        if let Ok(layout) = Layout::array::<T>(self.capacity) {
            // SAFETY: ptr came from `alloc::alloc` with exactly this layout
            // and ownership has not been transferred elsewhere.
            unsafe { alloc::dealloc(self.ptr.as_ptr().cast(), layout) }
        }
    }
}

impl<T> fmt::Debug for RawBuffer<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RawBuffer")
            .field("ptr", &self.ptr)
            .field("capacity", &self.capacity)
            .finish()
    }
}
