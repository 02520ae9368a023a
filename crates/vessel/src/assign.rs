//! Copy construction and copy assignment.

use vessel_raw::{InitGuard, RawBuffer};

use crate::DynArray;

impl<T: Clone> Clone for DynArray<T> {
    /// Copy every element into a new buffer of capacity `self.len()`.
    ///
    /// If a `clone` panics, the copies made so far are dropped and the new
    /// buffer is released; `self` is never touched.
    fn clone(&self) -> Self {
        let mut buf = RawBuffer::allocate(self.len);
        let mut guard = InitGuard::new(buf.as_uninit_slice_mut());
        for item in self.as_slice() {
            guard.push(item.clone());
        }
        let len = guard.commit();
        Self { buf, len }
    }

    /// Copy-assign from `source`.
    ///
    /// When `source` does not fit in the current buffer, a full copy is
    /// built first and swapped in, so a panicking `clone` leaves `self`
    /// unchanged. Otherwise the storage is reused: the shared prefix is
    /// assigned element-wise, then the surplus tail is dropped or the
    /// missing tail is cloned in. A panic on that path leaves `self` valid
    /// but possibly holding a mix of old and new values.
    fn clone_from(&mut self, source: &Self) {
        if source.len > self.capacity() {
            let mut copy = source.clone();
            self.swap(&mut copy);
            return;
        }

        let len = self.len;
        let common = len.min(source.len);
        self.as_mut_slice()[..common].clone_from_slice(&source.as_slice()[..common]);

        if len > source.len {
            self.truncate(source.len);
        } else {
            let mut guard = InitGuard::new(&mut self.buf.as_uninit_slice_mut()[len..source.len]);
            for item in &source.as_slice()[len..] {
                guard.push(item.clone());
            }
            self.len = len + guard.commit();
        }
    }
}
