//! Slot and result kinds.
//!
//! The raw vector carries no tags; these enums are what a declaration or a
//! tagged argument list uses to say what each position holds.

use serde::{Deserialize, Serialize};

/// What a single argument slot holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SlotKind {
    /// A direct pointer to a boxed `f64`.
    #[serde(rename = "num", alias = "number")]
    Number,
    /// A pointer to a cell holding the `char*` of a boxed string.
    #[serde(rename = "str", alias = "string")]
    Text,
}

impl std::fmt::Display for SlotKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number => write!(f, "num"),
            Self::Text => write!(f, "str"),
        }
    }
}

/// What a bridge function hands back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ResultKind {
    #[serde(rename = "void")]
    Void,
    #[serde(rename = "num", alias = "number")]
    Number,
    #[serde(rename = "str", alias = "string")]
    Text,
}

impl std::fmt::Display for ResultKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Void => write!(f, "void"),
            Self::Number => write!(f, "num"),
            Self::Text => write!(f, "str"),
        }
    }
}

/// Render a parameter list and result as `(num, str) -> num`.
pub(crate) fn shape(params: &[SlotKind], returns: ResultKind) -> String {
    let params: Vec<String> = params.iter().map(ToString::to_string).collect();
    format!("({}) -> {returns}", params.join(", "))
}
