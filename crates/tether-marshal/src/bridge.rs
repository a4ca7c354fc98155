//! Bridge invocation and result reclamation.
//!
//! A bridge is a native `(argc, argv)` function. What it returns depends on
//! its declared result kind: nothing, a boxed `double*`, or a boxed `char*`.
//! [`Bridge`] keeps that kind next to the pointer so the host always knows
//! how to reclaim the result, and [`Export`] adds the slot kinds the symbol
//! reads so a declaration can be checked against the native side.

use std::ffi::{c_char, c_int};
use std::fmt;

use serde::Serialize;
use tether_box::{BoxedNumber, BoxedString};

use crate::args::ArgList;
use crate::declaration::BridgeFunction;
use crate::error::{MarshalError, Result};
use crate::kind::{self, ResultKind, SlotKind};
use crate::raw::ArgSlots;

/// Bridge returning nothing.
pub type VoidBridge = unsafe extern "C" fn(argc: c_int, argv: ArgSlots);
/// Bridge returning a boxed number owned by the caller.
pub type NumberBridge = unsafe extern "C" fn(argc: c_int, argv: ArgSlots) -> *mut f64;
/// Bridge returning a boxed, NUL-terminated string owned by the caller.
pub type TextBridge = unsafe extern "C" fn(argc: c_int, argv: ArgSlots) -> *mut c_char;

/// A native bridge function tagged with its result kind.
#[derive(Debug, Clone, Copy)]
pub enum Bridge {
    Void(VoidBridge),
    Number(NumberBridge),
    Text(TextBridge),
}

impl Bridge {
    /// What the bridge hands back.
    pub fn result_kind(&self) -> ResultKind {
        match self {
            Self::Void(_) => ResultKind::Void,
            Self::Number(_) => ResultKind::Number,
            Self::Text(_) => ResultKind::Text,
        }
    }
}

/// A native symbol with the slot kinds it reads and its typed pointer.
#[derive(Debug, Clone, Copy)]
pub struct Export {
    pub symbol: &'static str,
    pub params: &'static [SlotKind],
    pub bridge: Bridge,
}

impl Export {
    /// Describe `symbol`, which reads `params` and is called through `bridge`.
    pub const fn new(symbol: &'static str, params: &'static [SlotKind], bridge: Bridge) -> Self {
        Self {
            symbol,
            params,
            bridge,
        }
    }

    pub fn result_kind(&self) -> ResultKind {
        self.bridge.result_kind()
    }

    /// What the symbol reads and returns, e.g. `(num, num) -> num`.
    pub fn shape(&self) -> String {
        kind::shape(self.params, self.result_kind())
    }

    /// Check that `function` declares exactly the slots this symbol reads
    /// and the result it returns.
    pub fn verify(&self, function: &BridgeFunction) -> Result<()> {
        if function.params != self.params {
            return Err(MarshalError::SignatureMismatch {
                function: function.name.clone(),
                symbol: self.symbol.to_string(),
                declared: kind::shape(&function.params, function.returns),
                actual: self.shape(),
            });
        }
        if function.returns != self.result_kind() {
            return Err(MarshalError::ResultKindMismatch {
                function: function.name.clone(),
                declared: function.returns,
                actual: self.result_kind(),
            });
        }
        Ok(())
    }
}

/// A bridge result after the host has taken it back.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ReturnValue {
    /// The bridge returns nothing.
    Void,
    /// The bridge returned a null reference.
    Nil,
    Number(f64),
    Text(String),
}

impl fmt::Display for ReturnValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Void => write!(f, "void"),
            Self::Nil => write!(f, "nil"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Take back a boxed number result, freeing the cell.
///
/// # Safety
///
/// `raw` must be null or a boxed number nobody else will free.
pub unsafe fn reclaim_number(raw: *mut f64) -> ReturnValue {
    match BoxedNumber::from_raw(raw) {
        Some(n) => ReturnValue::Number(n.get()),
        None => ReturnValue::Nil,
    }
}

/// Take back a boxed string result, freeing the buffer.
///
/// # Safety
///
/// `raw` must be null or a NUL-terminated boxed string nobody else will free.
pub unsafe fn reclaim_text(raw: *mut c_char) -> Result<ReturnValue> {
    match BoxedString::from_raw_terminated(raw) {
        Some(s) => Ok(ReturnValue::Text(s.to_str()?.to_owned())),
        None => Ok(ReturnValue::Nil),
    }
}

/// Call `bridge` with `args` and reclaim its result.
///
/// The arguments stay owned by `args`; the bridge only sees aliases of them
/// for the duration of the call.
///
/// # Safety
///
/// `bridge` must follow the calling convention: read only the slots it was
/// given, as the kinds `args` holds, and return a pointer matching its
/// result kind that it no longer owns.
pub unsafe fn invoke(bridge: Bridge, args: &ArgList) -> Result<ReturnValue> {
    let vector = args.as_raw()?;
    let (argc, argv) = (vector.argc(), vector.as_ptr());
    tracing::debug!(target: "tether::call", argc, returns = %bridge.result_kind(), "invoking bridge");

    let value = match bridge {
        Bridge::Void(f) => {
            f(argc, argv);
            ReturnValue::Void
        }
        Bridge::Number(f) => reclaim_number(f(argc, argv)),
        Bridge::Text(f) => reclaim_text(f(argc, argv))?,
    };
    tracing::debug!(target: "tether::call", result = %value, "bridge returned");
    Ok(value)
}

/// Check a declaration against `export`, then `args` against the
/// declaration, then [`invoke`].
///
/// # Safety
///
/// `export.params` and the bridge's result kind must be what the native
/// symbol actually reads and returns. With that, every mismatch between the
/// host's declaration, its arguments and the symbol is a reported error.
pub unsafe fn invoke_checked(
    function: &BridgeFunction,
    export: &Export,
    args: &ArgList,
) -> Result<ReturnValue> {
    export.verify(function)?;
    function.check(args)?;
    invoke(export.bridge, args)
}
