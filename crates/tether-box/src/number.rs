//! Boxed `f64` cells.

use std::fmt;
use std::mem;
use std::ptr::NonNull;

use crate::alloc::{release, Allocator, SystemAllocator};
use crate::error::{BoxError, Result};

/// A heap cell holding exactly one `f64`.
///
/// The cell carries no type tag; code receiving its pointer must already
/// know that it points at a number. The handle owns the cell and frees it on
/// drop unless ownership is given away with [`BoxedNumber::into_raw`].
pub struct BoxedNumber {
    ptr: NonNull<f64>,
}

impl BoxedNumber {
    /// Box `value` on the C heap.
    pub fn new(value: f64) -> Result<Self> {
        Self::new_in(value, &SystemAllocator)
    }

    /// Box `value` using `alloc`.
    pub fn new_in(value: f64, alloc: &dyn Allocator) -> Result<Self> {
        let size = mem::size_of::<f64>();
        let raw = alloc.allocate(size) as *mut f64;
        let Some(ptr) = NonNull::new(raw) else {
            tracing::warn!(target: "tether::box", size, "number allocation failed");
            return Err(BoxError::AllocationFailure { requested: size });
        };
        // SAFETY: the allocator contract guarantees `size` writable bytes
        // aligned for f64.
        unsafe { ptr.as_ptr().write(value) };
        tracing::trace!(target: "tether::box", ptr = ?ptr, value, "boxed number");
        Ok(Self { ptr })
    }

    /// Take ownership of a cell produced by the boxing layer.
    ///
    /// Returns `None` for a null pointer.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or a live cell from [`BoxedNumber::into_raw`] or
    /// `tether_box_number`, and no other owner may free it afterwards.
    pub unsafe fn from_raw(ptr: *mut f64) -> Option<Self> {
        NonNull::new(ptr).map(|ptr| Self { ptr })
    }

    /// Give up ownership. The caller becomes responsible for freeing the cell.
    pub fn into_raw(self) -> *mut f64 {
        let ptr = self.ptr.as_ptr();
        mem::forget(self);
        ptr
    }

    /// The boxed value.
    pub fn get(&self) -> f64 {
        // SAFETY: the cell is live and initialized for as long as `self` is.
        unsafe { self.ptr.as_ptr().read() }
    }

    /// Address of the cell. Stays valid while `self` is alive.
    pub fn as_ptr(&self) -> *mut f64 {
        self.ptr.as_ptr()
    }
}

impl Drop for BoxedNumber {
    fn drop(&mut self) {
        // SAFETY: we own the cell and it came from a malloc-compatible allocator.
        unsafe { release(self.ptr.as_ptr().cast()) };
    }
}

impl fmt::Debug for BoxedNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoxedNumber")
            .field("ptr", &self.ptr)
            .field("value", &self.get())
            .finish()
    }
}
