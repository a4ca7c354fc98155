//! Allocator seam for boxed cells.
//!
//! Every cell handed across the C boundary must be releasable with
//! `libc::free`, so allocators here only decide *whether* and *where* a
//! `malloc`-compatible block comes from. Tests use [`Budgeted`] and
//! [`Exhausted`] to simulate an allocator that has run dry.

use std::ffi::c_void;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Source of raw memory for boxed cells.
///
/// # Safety
///
/// A non-null pointer returned by [`Allocator::allocate`] must point to at
/// least `size` writable bytes, be aligned for `f64`, and be releasable with
/// `libc::free`. Returning null signals allocation failure.
pub unsafe trait Allocator {
    /// Allocate `size` bytes, or return null.
    fn allocate(&self, size: usize) -> *mut c_void;
}

/// The C heap (`malloc`).
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemAllocator;

unsafe impl Allocator for SystemAllocator {
    fn allocate(&self, size: usize) -> *mut c_void {
        // malloc(0) is allowed to return null
        unsafe { libc::malloc(size.max(1)) }
    }
}

/// An allocator that always fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct Exhausted;

unsafe impl Allocator for Exhausted {
    fn allocate(&self, _size: usize) -> *mut c_void {
        std::ptr::null_mut()
    }
}

/// Wraps another allocator and fails once a byte budget is spent.
///
/// A request larger than the remaining budget fails without consuming it.
#[derive(Debug)]
pub struct Budgeted<A = SystemAllocator> {
    inner: A,
    remaining: AtomicUsize,
}

impl<A: Allocator> Budgeted<A> {
    /// Wrap `inner` with `budget` bytes to spend.
    pub fn new(inner: A, budget: usize) -> Self {
        Self {
            inner,
            remaining: AtomicUsize::new(budget),
        }
    }

    /// Bytes still available.
    pub fn remaining(&self) -> usize {
        self.remaining.load(Ordering::Relaxed)
    }
}

unsafe impl<A: Allocator> Allocator for Budgeted<A> {
    fn allocate(&self, size: usize) -> *mut c_void {
        let charged = self
            .remaining
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |left| {
                left.checked_sub(size)
            });
        match charged {
            Ok(_) => self.inner.allocate(size),
            Err(left) => {
                tracing::trace!(target: "tether::alloc", size, left, "budget exhausted");
                std::ptr::null_mut()
            }
        }
    }
}

/// Release a cell previously produced by an [`Allocator`].
///
/// # Safety
///
/// `ptr` must be null or come from an [`Allocator`] and not have been
/// released already.
pub(crate) unsafe fn release(ptr: *mut c_void) {
    if ptr.is_null() {
        return;
    }
    tracing::trace!(target: "tether::alloc", ptr = ?ptr, "released cell");
    libc::free(ptr);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhausted_returns_null() {
        assert!(Exhausted.allocate(8).is_null());
    }

    #[test]
    fn system_allocates_zero_sized() {
        let ptr = SystemAllocator.allocate(0);
        assert!(!ptr.is_null());
        unsafe { release(ptr) };
    }

    #[test]
    fn budget_is_charged_per_request() {
        let alloc = Budgeted::new(SystemAllocator, 16);
        let a = alloc.allocate(8);
        assert!(!a.is_null());
        assert_eq!(alloc.remaining(), 8);

        // Too large for what is left: fails and keeps the budget.
        assert!(alloc.allocate(9).is_null());
        assert_eq!(alloc.remaining(), 8);

        let b = alloc.allocate(8);
        assert!(!b.is_null());
        assert_eq!(alloc.remaining(), 0);
        assert!(alloc.allocate(1).is_null());

        unsafe {
            release(a);
            release(b);
        }
    }

    #[test]
    fn release_null_is_noop() {
        unsafe { release(std::ptr::null_mut()) };
    }
}
