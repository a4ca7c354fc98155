//! Tagged argument lists.
//!
//! Each position carries its kind, so asking for the wrong kind is a
//! reported [`MarshalError::ConventionViolation`] rather than a misread
//! pointer. The raw vector for a native call is derived from the list with
//! [`ArgList::as_raw`].

use tether_box::{BoxedNumber, BoxedString};

use crate::error::{MarshalError, Result};
use crate::kind::SlotKind;
use crate::raw::ArgVector;

/// One positional argument.
#[derive(Debug)]
pub enum Arg {
    Number(BoxedNumber),
    Text(BoxedString),
}

impl Arg {
    /// Box a number argument.
    pub fn number(value: f64) -> Result<Self> {
        Ok(Self::Number(BoxedNumber::new(value)?))
    }

    /// Box a NUL-terminated string argument.
    pub fn text(value: &str) -> Result<Self> {
        Ok(Self::Text(BoxedString::new(value.as_bytes())?))
    }

    /// Slot kind this argument occupies.
    pub fn kind(&self) -> SlotKind {
        match self {
            Self::Number(_) => SlotKind::Number,
            Self::Text(_) => SlotKind::Text,
        }
    }
}

impl From<BoxedNumber> for Arg {
    fn from(value: BoxedNumber) -> Self {
        Self::Number(value)
    }
}

impl From<BoxedString> for Arg {
    fn from(value: BoxedString) -> Self {
        Self::Text(value)
    }
}

/// An owned, positional list of boxed arguments.
#[derive(Debug, Default)]
pub struct ArgList {
    args: Vec<Arg>,
}

impl ArgList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, arg: impl Into<Arg>) {
        self.args.push(arg.into());
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Arg> {
        self.args.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Arg> {
        self.args.iter()
    }

    /// Kinds of all positions, in order.
    pub fn kinds(&self) -> Vec<SlotKind> {
        self.args.iter().map(Arg::kind).collect()
    }

    fn at(&self, index: usize) -> Result<&Arg> {
        self.args.get(index).ok_or(MarshalError::MissingArgument {
            index,
            count: self.args.len(),
        })
    }

    /// The number at `index`.
    pub fn number(&self, index: usize) -> Result<f64> {
        match self.at(index)? {
            Arg::Number(n) => Ok(n.get()),
            other => Err(MarshalError::ConventionViolation {
                index,
                expected: SlotKind::Number,
                found: other.kind(),
            }),
        }
    }

    /// The string at `index`.
    pub fn text(&self, index: usize) -> Result<&BoxedString> {
        match self.at(index)? {
            Arg::Text(s) => Ok(s),
            other => Err(MarshalError::ConventionViolation {
                index,
                expected: SlotKind::Text,
                found: other.kind(),
            }),
        }
    }

    /// Build the raw vector a native bridge expects.
    pub fn as_raw(&self) -> Result<ArgVector<'_>> {
        ArgVector::from_args(self)
    }
}

impl From<Vec<Arg>> for ArgList {
    fn from(args: Vec<Arg>) -> Self {
        Self { args }
    }
}

impl FromIterator<Arg> for ArgList {
    fn from_iter<I: IntoIterator<Item = Arg>>(iter: I) -> Self {
        Self {
            args: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ArgList {
    type Item = &'a Arg;
    type IntoIter = std::slice::Iter<'a, Arg>;

    fn into_iter(self) -> Self::IntoIter {
        self.args.iter()
    }
}
