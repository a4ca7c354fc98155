//! C entry points of the boxing layer.
//!
//! Failure is signalled with a null pointer. Every non-null pointer returned
//! here is owned by the caller and must be released with the matching
//! `tether_free_*` function (or `free`).

use std::ffi::{c_char, CStr};

use crate::alloc::release;
use crate::number::BoxedNumber;
use crate::string::BoxedString;

/// Box a double. Returns null if the allocator is exhausted.
#[no_mangle]
pub extern "C" fn tether_box_number(value: f64) -> *mut f64 {
    match BoxedNumber::new(value) {
        Ok(boxed) => boxed.into_raw(),
        Err(_) => std::ptr::null_mut(),
    }
}

/// Box a copy of a NUL-terminated string. The copy is itself terminated.
/// Returns null if `source` is null or the allocator is exhausted.
///
/// # Safety
///
/// `source` must be null or point to a valid NUL-terminated string.
#[no_mangle]
pub unsafe extern "C" fn tether_box_string(source: *const c_char) -> *mut c_char {
    if source.is_null() {
        return std::ptr::null_mut();
    }
    match BoxedString::from_c_str(CStr::from_ptr(source)) {
        Ok(boxed) => boxed.into_raw(),
        Err(_) => std::ptr::null_mut(),
    }
}

/// Release a cell from [`tether_box_number`]. Null is ignored.
///
/// # Safety
///
/// `ptr` must be null or an unreleased cell from the boxing layer.
#[no_mangle]
pub unsafe extern "C" fn tether_free_number(ptr: *mut f64) {
    release(ptr.cast());
}

/// Release a buffer from [`tether_box_string`]. Null is ignored.
///
/// # Safety
///
/// `ptr` must be null or an unreleased buffer from the boxing layer.
#[no_mangle]
pub unsafe extern "C" fn tether_free_string(ptr: *mut c_char) {
    release(ptr.cast());
}
