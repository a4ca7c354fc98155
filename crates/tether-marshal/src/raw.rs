//! The raw, untyped vector convention.
//!
//! Slot `i` of `argv` is either a `double*` (number) or a `char**` (string).
//! The callee decides which by agreement with the caller; reading a slot as
//! the wrong kind is undefined behaviour and nothing here can detect it.

use std::ffi::{c_char, c_int, c_void, CStr};
use std::marker::PhantomData;

use crate::args::{Arg, ArgList};
use crate::error::{MarshalError, Result};

/// Pointer to the first slot of an argument vector.
pub type ArgSlots = *const *mut c_void;

/// Dereference a string slot once, yielding the boxed string's buffer.
///
/// Returns null for a null slot.
///
/// # Safety
///
/// `slot` must be null or point to a readable `char*`.
#[no_mangle]
pub unsafe extern "C" fn tether_get_string(slot: *mut c_void) -> *mut c_char {
    if slot.is_null() {
        return std::ptr::null_mut();
    }
    *slot.cast::<*mut c_char>()
}

/// Rust name for [`tether_get_string`].
///
/// # Safety
///
/// See [`tether_get_string`].
pub unsafe fn get_string(slot: *mut c_void) -> *mut c_char {
    tether_get_string(slot)
}

/// Read slot `index` as a number slot: the slot itself is the `double*`.
///
/// # Safety
///
/// `argv` must hold more than `index` slots and slot `index` must be a
/// number slot.
pub unsafe fn number_slot(argv: ArgSlots, index: usize) -> *mut f64 {
    (*argv.add(index)).cast()
}

/// Read slot `index` as a string slot, dereferencing once.
///
/// # Safety
///
/// `argv` must hold more than `index` slots and slot `index` must be a
/// string slot.
pub unsafe fn string_slot(argv: ArgSlots, index: usize) -> *mut c_char {
    tether_get_string(*argv.add(index))
}

/// Callee-side view of `(argc, argv)`.
///
/// Positions are bounds-checked against `argc`; kinds are still taken on
/// trust.
#[derive(Debug, Clone, Copy)]
pub struct RawArgs<'a> {
    slots: &'a [*mut c_void],
}

impl<'a> RawArgs<'a> {
    /// Wrap the parameters a bridge function received.
    ///
    /// A negative `argc` or null `argv` yields an empty view.
    ///
    /// # Safety
    ///
    /// `argv` must be null or point to at least `argc` slots that stay valid
    /// for `'a`.
    pub unsafe fn from_raw(argc: c_int, argv: ArgSlots) -> Self {
        let len = usize::try_from(argc).unwrap_or(0);
        let slots: &'a [*mut c_void] = if argv.is_null() || len == 0 {
            &[]
        } else {
            std::slice::from_raw_parts(argv, len)
        };
        Self { slots }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// The erased pointer in slot `index`.
    pub fn slot(&self, index: usize) -> Option<*mut c_void> {
        self.slots.get(index).copied()
    }

    /// Read slot `index` as a number.
    ///
    /// # Safety
    ///
    /// Slot `index`, if present and non-null, must be a number slot.
    pub unsafe fn number(&self, index: usize) -> Option<f64> {
        let ptr = self.slot(index)?.cast::<f64>();
        if ptr.is_null() {
            return None;
        }
        Some(ptr.read())
    }

    /// Read slot `index` as a C string.
    ///
    /// # Safety
    ///
    /// Slot `index`, if present and non-null, must be a string slot whose
    /// buffer is NUL-terminated and outlives `'a`.
    pub unsafe fn text(&self, index: usize) -> Option<&'a CStr> {
        let ptr = tether_get_string(self.slot(index)?);
        if ptr.is_null() {
            return None;
        }
        Some(CStr::from_ptr(ptr))
    }
}

/// A raw argument vector built from an [`ArgList`].
///
/// The vector aliases the list's boxed values instead of copying them, and
/// borrows the list so none of them can be dropped or replaced while native
/// code may still read them.
#[derive(Debug)]
pub struct ArgVector<'a> {
    slots: Vec<*mut c_void>,
    // Backing cells of the string slots. Filled before any slot points into
    // it and never grown afterwards.
    _strings: Vec<*mut c_char>,
    argc: c_int,
    _args: PhantomData<&'a ArgList>,
}

impl<'a> ArgVector<'a> {
    /// Lay out `args` in positional order.
    pub fn from_args(args: &'a ArgList) -> Result<Self> {
        let count = args.len();
        let argc = c_int::try_from(count).map_err(|_| MarshalError::TooManyArguments { count })?;

        let mut strings = Vec::new();
        for (index, arg) in args.iter().enumerate() {
            if let Arg::Text(s) = arg {
                if !s.is_terminated() {
                    return Err(MarshalError::UnterminatedString { index });
                }
                if s.as_c_str().is_none() {
                    return Err(MarshalError::EmbeddedNul { index });
                }
                strings.push(s.as_ptr());
            }
        }

        let mut slots = Vec::with_capacity(count);
        let mut next_string = 0;
        for arg in args.iter() {
            match arg {
                Arg::Number(n) => slots.push(n.as_ptr().cast::<c_void>()),
                Arg::Text(_) => {
                    // SAFETY: `strings` holds one cell per text argument.
                    let cell = unsafe { strings.as_ptr().add(next_string) };
                    slots.push(cell.cast_mut().cast::<c_void>());
                    next_string += 1;
                }
            }
        }

        tracing::trace!(target: "tether::marshal", argc, strings = strings.len(), "built argument vector");
        Ok(Self {
            slots,
            _strings: strings,
            argc,
            _args: PhantomData,
        })
    }

    /// The out-of-band count passed next to the vector.
    pub fn argc(&self) -> c_int {
        self.argc
    }

    /// The vector itself, as handed to a bridge function.
    pub fn as_ptr(&self) -> ArgSlots {
        self.slots.as_ptr()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Callee-side view of this vector.
    pub fn view(&self) -> RawArgs<'_> {
        RawArgs { slots: &self.slots }
    }
}
