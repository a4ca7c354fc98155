//! Example bridge functions for the Tether calling convention.
//!
//! These are ordinary `extern "C"` functions of shape `(argc, argv)`, written
//! the way a C bridge author would write them: slots are read positionally
//! with no type checks, and results are boxed with the boxing layer and
//! handed to the caller. [`BRIDGES_TOML`] declares them for hosts.

use std::ffi::{c_char, c_int, CStr};

use tether_marshal::abi::{tether_box_number, tether_box_string};
use tether_marshal::raw::{number_slot, string_slot};
use tether_marshal::{ArgSlots, Bridge, Export, RawArgs, SlotKind};

/// Declaration of every bridge in this crate.
pub const BRIDGES_TOML: &str = include_str!("../bridges.toml");

/// `sum(num, num) -> num`
///
/// # Safety
///
/// `argv` must hold two number slots.
#[no_mangle]
pub unsafe extern "C" fn tether_demo_sum(argc: c_int, argv: ArgSlots) -> *mut f64 {
    if argc < 2 {
        return std::ptr::null_mut();
    }
    let a = number_slot(argv, 0);
    let b = number_slot(argv, 1);
    tether_box_number(*a + *b)
}

/// `reads(str)`
///
/// # Safety
///
/// `argv` must hold one string slot.
#[no_mangle]
pub unsafe extern "C" fn tether_demo_reads(argc: c_int, argv: ArgSlots) {
    let args = RawArgs::from_raw(argc, argv);
    if let Some(s) = args.text(0) {
        let ptr = string_slot(argv, 0);
        tracing::info!(
            target: "tether::demo",
            value = %s.to_string_lossy(),
            at = ?ptr,
            len = s.to_bytes().len(),
            "received string"
        );
    }
}

/// `args_example(str, num)`
///
/// # Safety
///
/// `argv` must hold a string slot followed by a number slot.
#[no_mangle]
pub unsafe extern "C" fn tether_demo_args_example(argc: c_int, argv: ArgSlots) {
    let args = RawArgs::from_raw(argc, argv);
    if let Some(s) = args.text(0) {
        tracing::info!(target: "tether::demo", index = 0, value = %s.to_string_lossy(), "received argument");
    }
    if let Some(n) = args.number(1) {
        tracing::info!(target: "tether::demo", index = 1, value = n, "received argument");
    }
}

/// `shout(str) -> str`
///
/// # Safety
///
/// `argv` must hold one string slot.
#[no_mangle]
pub unsafe extern "C" fn tether_demo_shout(argc: c_int, argv: ArgSlots) -> *mut c_char {
    let args = RawArgs::from_raw(argc, argv);
    let Some(s) = args.text(0) else {
        return std::ptr::null_mut();
    };
    let mut upper = s.to_bytes_with_nul().to_vec();
    upper.make_ascii_uppercase();
    match CStr::from_bytes_with_nul(&upper) {
        Ok(upper) => tether_box_string(upper.as_ptr()),
        Err(_) => std::ptr::null_mut(),
    }
}

/// `length(str) -> num`
///
/// # Safety
///
/// `argv` must hold one string slot.
#[no_mangle]
pub unsafe extern "C" fn tether_demo_length(argc: c_int, argv: ArgSlots) -> *mut f64 {
    if argc < 1 {
        return std::ptr::null_mut();
    }
    let s = string_slot(argv, 0);
    tether_box_number(libc::strlen(s) as f64)
}

const NUM_NUM: &[SlotKind] = &[SlotKind::Number, SlotKind::Number];
const STR: &[SlotKind] = &[SlotKind::Text];
const STR_NUM: &[SlotKind] = &[SlotKind::Text, SlotKind::Number];

static EXPORTS: [Export; 5] = [
    Export::new("tether_demo_sum", NUM_NUM, Bridge::Number(tether_demo_sum)),
    Export::new("tether_demo_reads", STR, Bridge::Void(tether_demo_reads)),
    Export::new("tether_demo_args_example", STR_NUM, Bridge::Void(tether_demo_args_example)),
    Export::new("tether_demo_shout", STR, Bridge::Text(tether_demo_shout)),
    Export::new("tether_demo_length", STR, Bridge::Number(tether_demo_length)),
];

/// Symbols exported by this crate, with the slots each one reads.
pub fn symbols() -> &'static [Export] {
    &EXPORTS
}

/// Resolve a symbol exported by this crate.
pub fn lookup(symbol: &str) -> Option<&'static Export> {
    EXPORTS.iter().find(|export| export.symbol == symbol)
}
