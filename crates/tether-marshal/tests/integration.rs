//! Integration tests for the marshalling convention.

use std::ffi::{c_char, c_int, CStr};
use std::io::Write;

use tether_marshal::abi::{tether_box_number, tether_box_string};
use tether_marshal::raw::{number_slot, string_slot};
use tether_marshal::{
    get_string, invoke, invoke_checked, Arg, ArgList, ArgSlots, BoxError, Bridge,
    BridgeDeclaration, Export, MarshalError, RawArgs, ReturnValue, SlotKind,
};
use tether_box::{BoxedNumber, BoxedString, Exhausted, StringLayout};

/// Written the way a C bridge would be: raw slot access, no checks.
unsafe extern "C" fn describe(_argc: c_int, argv: ArgSlots) -> *mut c_char {
    let n = *number_slot(argv, 0);
    let s = CStr::from_ptr(string_slot(argv, 1)).to_str().unwrap_or("?");
    let text = std::ffi::CString::new(format!("{s}={n}")).unwrap();
    tether_box_string(text.as_ptr())
}

const NUM_NUM: &[SlotKind] = &[SlotKind::Number, SlotKind::Number];
const NUM_STR: &[SlotKind] = &[SlotKind::Number, SlotKind::Text];

static ADD: Export = Export::new("add", NUM_NUM, Bridge::Number(add));
static DESCRIBE: Export = Export::new("describe", NUM_STR, Bridge::Text(describe));

unsafe extern "C" fn add(argc: c_int, argv: ArgSlots) -> *mut f64 {
    let args = RawArgs::from_raw(argc, argv);
    match (args.number(0), args.number(1)) {
        (Some(a), Some(b)) => tether_box_number(a + b),
        _ => std::ptr::null_mut(),
    }
}

#[test]
fn number_and_string_reach_the_callee() {
    let args: ArgList = vec![Arg::number(5.0).unwrap(), Arg::text("hi").unwrap()].into();
    let vector = args.as_raw().unwrap();
    unsafe {
        assert_eq!(*number_slot(vector.as_ptr(), 0), 5.0);
        let slot = *vector.as_ptr().add(1);
        assert_eq!(CStr::from_ptr(get_string(slot)).to_bytes(), b"hi");
    }
}

#[test]
fn retrieval_follows_construction_order() {
    let args: ArgList = vec![Arg::text("hi").unwrap(), Arg::number(5.0).unwrap()].into();
    let view_vector = args.as_raw().unwrap();
    let view = view_vector.view();
    unsafe {
        assert_eq!(view.text(0).unwrap().to_bytes(), b"hi");
        assert_eq!(view.number(1), Some(5.0));
    }
    assert_eq!(args.text(0).unwrap().as_bytes(), b"hi");
    assert_eq!(args.number(1).unwrap(), 5.0);
}

#[test]
fn raw_bridge_builds_a_string_result() {
    let args: ArgList = vec![Arg::number(2.5).unwrap(), Arg::text("x").unwrap()].into();
    let value = unsafe { invoke(Bridge::Text(describe), &args) }.unwrap();
    assert_eq!(value, ReturnValue::Text("x=2.5".to_string()));
}

#[test]
fn sum_of_three_and_four() {
    let args: ArgList = vec![Arg::number(3.0).unwrap(), Arg::number(4.0).unwrap()].into();
    let value = unsafe { invoke(Bridge::Number(add), &args) }.unwrap();
    assert_eq!(value, ReturnValue::Number(7.0));
}

#[test]
fn declaration_from_file_drives_a_checked_call() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"
[library]
name = "math"

[[functions]]
name = "add"
params = ["num", "num"]
returns = "num"
"#
    )
    .unwrap();

    let decl = BridgeDeclaration::load(file.path()).unwrap();
    let func = decl.find("add").unwrap();
    let args = func.box_inputs(&["1.25", "2"]).unwrap();
    let value = unsafe { invoke_checked(func, &ADD, &args) }.unwrap();
    assert_eq!(value, ReturnValue::Number(3.25));

    let wrong: ArgList = vec![Arg::number(1.0).unwrap(), Arg::text("2").unwrap()].into();
    let err = unsafe { invoke_checked(func, &ADD, &wrong) }.unwrap_err();
    assert!(matches!(
        err,
        MarshalError::ConventionViolation { index: 1, expected: SlotKind::Number, .. }
    ));
}

#[test]
fn missing_declaration_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = BridgeDeclaration::load(&dir.path().join("absent.bridge.toml")).unwrap_err();
    assert!(matches!(err, MarshalError::Io(_)));
}

#[test]
fn allocation_failure_surfaces_as_marshal_error() {
    let boxed = BoxedNumber::new_in(1.0, &Exhausted).map_err(MarshalError::from);
    assert!(matches!(
        boxed,
        Err(MarshalError::Box(BoxError::AllocationFailure { requested: 8 }))
    ));
}

#[test]
fn exact_strings_never_reach_native_code() {
    let raw = BoxedString::new_in(b"hi", StringLayout::Exact, &tether_box::SystemAllocator).unwrap();
    let args: ArgList = vec![Arg::Text(raw)].into();
    let err = unsafe { invoke(Bridge::Text(describe), &args) }.unwrap_err();
    assert!(matches!(err, MarshalError::UnterminatedString { index: 0 }));
}

#[test]
fn redeclared_slots_are_caught_before_the_call() {
    let decl = BridgeDeclaration::parse(
        r#"
[library]
name = "misdeclared"

[[functions]]
name = "describe"
params = ["str", "num"]
returns = "str"
"#,
    )
    .unwrap();
    let func = decl.find("describe").unwrap();
    let args = func.box_inputs(&["x", "2.5"]).unwrap();
    let err = unsafe { invoke_checked(func, &DESCRIBE, &args) }.unwrap_err();
    assert!(matches!(err, MarshalError::SignatureMismatch { .. }));
    assert!(err.to_string().contains("symbol 'describe' is (num, str) -> str"));
}

#[test]
fn strings_with_embedded_nul_never_reach_native_code() {
    let args: ArgList = vec![Arg::number(1.0).unwrap(), Arg::text("a\0b").unwrap()].into();
    let err = unsafe { invoke(Bridge::Text(describe), &args) }.unwrap_err();
    assert!(matches!(err, MarshalError::EmbeddedNul { index: 1 }));
}
