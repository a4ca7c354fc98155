//! Heap boxing of native values for the Tether FFI bridge.
//!
//! A boxed value is a single heap cell that can cross the C boundary as one
//! opaque pointer. The layer never keeps a reference after handing one out:
//! whoever holds the pointer owns the cell.
//!
//! ## Modules
//!
//! - [`alloc`] — Allocator seam (`malloc`, budgeted and exhausted stubs)
//! - [`number`] — `f64` cells ([`BoxedNumber`])
//! - [`string`] — byte-string cells ([`BoxedString`], [`StringLayout`])
//! - [`abi`] — `extern "C"` entry points used by native bridge code
//! - [`error`] — Error types

pub mod abi;
pub mod alloc;
pub mod error;
pub mod number;
pub mod string;

// Re-export key types for convenience
pub use alloc::{Allocator, Budgeted, Exhausted, SystemAllocator};
pub use error::BoxError;
pub use number::BoxedNumber;
pub use string::{BoxedString, StringLayout};
