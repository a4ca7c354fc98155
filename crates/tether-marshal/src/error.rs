//! Marshalling error types.

use crate::kind::{ResultKind, SlotKind};

/// Errors that can occur while marshalling a bridge call.
#[derive(Debug, thiserror::Error)]
pub enum MarshalError {
    /// Boxing an argument or result failed.
    #[error("boxing error: {0}")]
    Box(#[from] tether_box::BoxError),

    /// A slot holds a different kind than the caller asked for.
    #[error("argument {index}: expected {expected}, found {found}")]
    ConventionViolation {
        index: usize,
        expected: SlotKind,
        found: SlotKind,
    },

    /// Positional access past the end of the argument list.
    #[error("argument {index} requested but only {count} supplied")]
    MissingArgument { index: usize, count: usize },

    /// Argument count differs from the declared parameter count.
    #[error("function '{function}' takes {expected} arguments, got {got}")]
    ArityMismatch {
        function: String,
        expected: usize,
        got: usize,
    },

    /// The bridge pointer returns a different kind than declared.
    #[error("function '{function}' is declared to return {declared} but the bridge returns {actual}")]
    ResultKindMismatch {
        function: String,
        declared: ResultKind,
        actual: ResultKind,
    },

    /// The declared parameters or result differ from what the native symbol
    /// reads and returns.
    #[error("function '{function}' is declared as {declared} but symbol '{symbol}' is {actual}")]
    SignatureMismatch {
        function: String,
        symbol: String,
        declared: String,
        actual: String,
    },

    /// A string without terminator would be handed to native code.
    #[error("argument {index}: string is not NUL-terminated")]
    UnterminatedString { index: usize },

    /// A string with a NUL before its end would be truncated by native code.
    #[error("argument {index}: string contains an embedded NUL")]
    EmbeddedNul { index: usize },

    /// The argument count does not fit the native count parameter.
    #[error("too many arguments: {count}")]
    TooManyArguments { count: usize },

    /// Textual input for a number slot did not parse.
    #[error("argument {index}: '{input}' is not a number")]
    InvalidNumber { index: usize, input: String },

    /// A string result was not valid UTF-8.
    #[error("invalid UTF-8 in string result: {0}")]
    Utf8(#[from] std::str::Utf8Error),

    /// Failed to validate a bridge declaration.
    #[error("invalid bridge declaration: {detail}")]
    InvalidDeclaration { detail: String },

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for marshalling operations.
pub type Result<T> = std::result::Result<T, MarshalError>;
