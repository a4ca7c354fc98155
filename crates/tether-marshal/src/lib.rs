//! Argument marshalling convention for the Tether FFI bridge.
//!
//! A bridge function receives `(argc, argv)` where `argv` is a vector of
//! erased pointers. Number slots point straight at a boxed `f64`; string
//! slots point at a cell holding the `char*` of a boxed string, one level of
//! indirection more. Nothing in the vector says which is which. This crate
//! reproduces that raw convention and layers a tagged, checked API on top.
//!
//! ## Modules
//!
//! - [`kind`] — Slot and result kinds
//! - [`raw`] — Raw vector construction and callee-side accessors
//! - [`args`] — Tagged argument lists with checked positional access
//! - [`bridge`] — Typed bridge pointers, exports, invocation and result reclamation
//! - [`declaration`] — `.bridge.toml` declaration file parsing
//!
//! The C header for bridge authors lives in `include/tether.h`.

pub mod args;
pub mod bridge;
pub mod declaration;
pub mod error;
pub mod kind;
pub mod raw;

// Re-export key types for convenience
pub use args::{Arg, ArgList};
pub use bridge::{invoke, invoke_checked, Bridge, Export, ReturnValue};
pub use declaration::{BridgeDeclaration, BridgeFunction};
pub use error::MarshalError;
pub use kind::{ResultKind, SlotKind};
pub use raw::{get_string, ArgSlots, ArgVector, RawArgs};
pub use tether_box::abi;
pub use tether_box::{BoxError, BoxedNumber, BoxedString, StringLayout};
