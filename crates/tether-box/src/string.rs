//! Boxed byte-string cells.
//!
//! Two buffer layouts exist. [`StringLayout::Exact`] reproduces the legacy
//! contract: the buffer is exactly as long as the source and carries no
//! terminator, so anything reading it as a C string runs past the
//! allocation. [`StringLayout::Terminated`] reserves one extra byte for a
//! NUL and is what the C entry points produce.

use std::ffi::{c_char, CStr};
use std::fmt;
use std::mem;
use std::ptr::{self, NonNull};
use std::str::Utf8Error;

use crate::alloc::{release, Allocator, SystemAllocator};
use crate::error::{BoxError, Result};

/// Buffer layout of a [`BoxedString`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StringLayout {
    /// `len + 1` bytes, the last one NUL.
    #[default]
    Terminated,
    /// Exactly `len` bytes, no terminator.
    Exact,
}

impl StringLayout {
    /// Bytes to allocate for a payload of `len` bytes.
    pub fn buffer_size(self, len: usize) -> Option<usize> {
        match self {
            Self::Terminated => len.checked_add(1),
            Self::Exact => Some(len),
        }
    }
}

/// A heap cell holding a copy of a byte string.
///
/// The handle remembers the payload length, so Rust code never scans for a
/// terminator. It owns the buffer and frees it on drop unless ownership is
/// given away with [`BoxedString::into_raw`].
pub struct BoxedString {
    ptr: NonNull<u8>,
    len: usize,
    layout: StringLayout,
}

impl BoxedString {
    /// Box a copy of `bytes` with a trailing NUL.
    pub fn new(bytes: &[u8]) -> Result<Self> {
        Self::new_in(bytes, StringLayout::Terminated, &SystemAllocator)
    }

    /// Box a copy of a C string (without its terminator) with a trailing NUL.
    pub fn from_c_str(source: &CStr) -> Result<Self> {
        Self::new(source.to_bytes())
    }

    /// Box a copy of `bytes` with the given layout using `alloc`.
    ///
    /// Embedded NUL bytes are copied as-is; no validation happens here.
    pub fn new_in(bytes: &[u8], layout: StringLayout, alloc: &dyn Allocator) -> Result<Self> {
        let len = bytes.len();
        let size = layout
            .buffer_size(len)
            .ok_or(BoxError::AllocationFailure { requested: usize::MAX })?;
        let raw = alloc.allocate(size) as *mut u8;
        let Some(ptr) = NonNull::new(raw) else {
            tracing::warn!(target: "tether::box", size, "string allocation failed");
            return Err(BoxError::AllocationFailure { requested: size });
        };
        // SAFETY: the buffer holds `size` bytes, which is `len` or `len + 1`
        // depending on the layout.
        unsafe {
            ptr::copy_nonoverlapping(bytes.as_ptr(), ptr.as_ptr(), len);
            if layout == StringLayout::Terminated {
                ptr.as_ptr().add(len).write(0);
            }
        }
        tracing::trace!(target: "tether::box", ptr = ?ptr, len, ?layout, "boxed string");
        Ok(Self { ptr, len, layout })
    }

    /// Take ownership of a NUL-terminated buffer produced by the boxing
    /// layer, measuring its length up to the terminator.
    ///
    /// Returns `None` for a null pointer.
    ///
    /// # Safety
    ///
    /// `ptr` must be null or a live, NUL-terminated cell from
    /// [`BoxedString::into_raw`] or `tether_box_string`, and no other owner
    /// may free it afterwards.
    pub unsafe fn from_raw_terminated(ptr: *mut c_char) -> Option<Self> {
        let ptr = NonNull::new(ptr.cast::<u8>())?;
        let len = libc::strlen(ptr.as_ptr().cast());
        Some(Self {
            ptr,
            len,
            layout: StringLayout::Terminated,
        })
    }

    /// Give up ownership. The caller becomes responsible for freeing the
    /// buffer. An [`StringLayout::Exact`] buffer is not a valid C string.
    pub fn into_raw(self) -> *mut c_char {
        let ptr = self.ptr.as_ptr().cast();
        mem::forget(self);
        ptr
    }

    /// Address of the buffer. Stays valid while `self` is alive.
    pub fn as_ptr(&self) -> *mut c_char {
        self.ptr.as_ptr().cast()
    }

    /// The payload, without any terminator.
    pub fn as_bytes(&self) -> &[u8] {
        // SAFETY: the first `len` bytes were initialized at construction.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    /// Payload length in bytes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the payload has no bytes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Buffer layout chosen at construction.
    pub fn layout(&self) -> StringLayout {
        self.layout
    }

    /// Whether native code may read this buffer as a C string.
    pub fn is_terminated(&self) -> bool {
        self.layout == StringLayout::Terminated
    }

    /// View as a C string. `None` for [`StringLayout::Exact`] buffers and
    /// for payloads with an embedded NUL.
    pub fn as_c_str(&self) -> Option<&CStr> {
        if !self.is_terminated() {
            return None;
        }
        // SAFETY: Terminated buffers hold `len + 1` initialized bytes.
        let with_nul = unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len + 1) };
        CStr::from_bytes_with_nul(with_nul).ok()
    }

    /// The payload as UTF-8.
    pub fn to_str(&self) -> std::result::Result<&str, Utf8Error> {
        std::str::from_utf8(self.as_bytes())
    }
}

impl Drop for BoxedString {
    fn drop(&mut self) {
        // SAFETY: we own the buffer and it came from a malloc-compatible allocator.
        unsafe { release(self.ptr.as_ptr().cast()) };
    }
}

impl fmt::Debug for BoxedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoxedString")
            .field("ptr", &self.ptr)
            .field("layout", &self.layout)
            .field("value", &String::from_utf8_lossy(self.as_bytes()))
            .finish()
    }
}
