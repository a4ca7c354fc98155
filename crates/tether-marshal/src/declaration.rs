//! Bridge declaration file (`.bridge.toml`) parsing.
//!
//! A `.bridge.toml` file names a native library and lists its bridge
//! functions with the kind of every argument slot and of the result. The
//! raw vector carries no tags, so the declaration is the only place the
//! host can learn how to box inputs and reclaim results.

use serde::{Deserialize, Serialize};

use crate::args::{Arg, ArgList};
use crate::error::{MarshalError, Result};
use crate::kind::{self, ResultKind, SlotKind};

/// A complete bridge declaration parsed from a `.bridge.toml` file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeDeclaration {
    /// Metadata about the native library.
    pub library: BridgeLibrary,
    /// The bridge functions it exports.
    #[serde(default)]
    pub functions: Vec<BridgeFunction>,
}

/// Metadata about the native library.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeLibrary {
    /// Library name (e.g., "demos").
    pub name: String,
    /// ABI convention (only "C" is supported).
    #[serde(default = "default_abi")]
    pub abi: String,
    /// Linker flag (e.g., "-ltether_demos").
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

fn default_abi() -> String {
    "C".to_string()
}

/// A single bridge function declaration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeFunction {
    /// Name the host calls the function by.
    pub name: String,
    /// Native symbol; defaults to `name`.
    #[serde(default)]
    pub symbol: Option<String>,
    /// Kind of each positional argument slot.
    #[serde(default, alias = "parameters")]
    pub params: Vec<SlotKind>,
    /// Result kind.
    #[serde(default = "default_returns", alias = "return-kind")]
    pub returns: ResultKind,
    #[serde(default)]
    pub description: Option<String>,
    /// Whether this function is hidden from the host.
    #[serde(default)]
    pub excluded: bool,
}

fn default_returns() -> ResultKind {
    ResultKind::Void
}

impl BridgeFunction {
    /// Native symbol to resolve.
    pub fn symbol(&self) -> &str {
        self.symbol.as_deref().unwrap_or(&self.name)
    }

    /// Number of declared parameters.
    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// Human-readable signature, e.g. `sum(num, num) -> num`.
    pub fn signature(&self) -> String {
        format!("{}{}", self.name, kind::shape(&self.params, self.returns))
    }

    /// Check that `args` matches the declared slots, position by position.
    pub fn check(&self, args: &ArgList) -> Result<()> {
        if args.len() != self.arity() {
            return Err(MarshalError::ArityMismatch {
                function: self.name.clone(),
                expected: self.arity(),
                got: args.len(),
            });
        }
        for (index, (expected, found)) in self.params.iter().zip(args.kinds()).enumerate() {
            if *expected != found {
                return Err(MarshalError::ConventionViolation {
                    index,
                    expected: *expected,
                    found,
                });
            }
        }
        Ok(())
    }

    /// Box textual inputs according to the declared slot kinds.
    pub fn box_inputs<S: AsRef<str>>(&self, inputs: &[S]) -> Result<ArgList> {
        if inputs.len() != self.arity() {
            return Err(MarshalError::ArityMismatch {
                function: self.name.clone(),
                expected: self.arity(),
                got: inputs.len(),
            });
        }
        let mut args = ArgList::new();
        for (index, (kind, input)) in self.params.iter().zip(inputs).enumerate() {
            let input = input.as_ref();
            let arg = match kind {
                SlotKind::Number => {
                    let value = input.trim().parse::<f64>().map_err(|_| {
                        MarshalError::InvalidNumber {
                            index,
                            input: input.to_string(),
                        }
                    })?;
                    Arg::number(value)?
                }
                SlotKind::Text => Arg::text(input)?,
            };
            args.push(arg);
        }
        Ok(args)
    }
}

impl BridgeDeclaration {
    /// Parse a bridge declaration from a TOML string.
    pub fn parse(input: &str) -> Result<Self> {
        let decl: BridgeDeclaration = toml::from_str(input).map_err(MarshalError::Toml)?;

        if decl.library.name.is_empty() {
            return Err(MarshalError::InvalidDeclaration {
                detail: "library.name is required".to_string(),
            });
        }
        if !decl.library.abi.eq_ignore_ascii_case("C") {
            return Err(MarshalError::InvalidDeclaration {
                detail: format!("unsupported ABI '{}'", decl.library.abi),
            });
        }

        let mut seen = std::collections::HashSet::new();
        for func in decl.active_functions() {
            if func.name.is_empty() {
                return Err(MarshalError::InvalidDeclaration {
                    detail: "function name is required".to_string(),
                });
            }
            if !seen.insert(func.name.as_str()) {
                return Err(MarshalError::InvalidDeclaration {
                    detail: format!("function '{}' declared twice", func.name),
                });
            }
        }

        Ok(decl)
    }

    /// Parse a bridge declaration from a file path.
    pub fn load(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Return only the non-excluded functions.
    pub fn active_functions(&self) -> Vec<&BridgeFunction> {
        self.functions.iter().filter(|f| !f.excluded).collect()
    }

    /// Look up an active function by name.
    pub fn find(&self, name: &str) -> Option<&BridgeFunction> {
        self.functions.iter().find(|f| !f.excluded && f.name == name)
    }
}
