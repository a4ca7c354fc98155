//! `tether check`

use std::io::Write;

use anyhow::{bail, Result};
use tether_marshal::BridgeDeclaration;

/// Resolve every active function against the demo library and compare its
/// declared slots and result with what the symbol reads and returns.
pub fn run(decl: &BridgeDeclaration, out: &mut impl Write) -> Result<()> {
    let active = decl.active_functions();
    let mut failures = 0;

    for func in &active {
        let Some(export) = tether_demos::lookup(func.symbol()) else {
            failures += 1;
            writeln!(out, "MISSING {}: no symbol '{}'", func.name, func.symbol())?;
            continue;
        };
        match export.verify(func) {
            Ok(()) => writeln!(out, "ok      {} -> {}", func.name, func.symbol())?,
            Err(e) => {
                failures += 1;
                writeln!(out, "MISMATCH {}: {e}", func.name)?;
            }
        }
    }

    if failures > 0 {
        bail!("{failures} of {} functions failed to resolve", active.len());
    }
    writeln!(out, "{} functions resolved", active.len())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_declaration_resolves() {
        let decl = BridgeDeclaration::parse(tether_demos::BRIDGES_TOML).unwrap();
        let mut out = Vec::new();
        run(&decl, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("ok      sum -> tether_demo_sum"));
        assert!(text.ends_with("5 functions resolved\n"));
    }

    #[test]
    fn unresolved_and_mismatched_are_reported() {
        let decl = BridgeDeclaration::parse(
            r#"
[library]
name = "broken"

[[functions]]
name = "ghost"

[[functions]]
name = "sum"
symbol = "tether_demo_sum"
params = ["num", "num"]
returns = "str"
"#,
        )
        .unwrap();
        let mut out = Vec::new();
        let err = run(&decl, &mut out).unwrap_err();
        assert_eq!(err.to_string(), "2 of 2 functions failed to resolve");
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("MISSING ghost: no symbol 'ghost'"));
        assert!(text.contains(
            "MISMATCH sum: function 'sum' is declared to return str but the bridge returns num"
        ));
    }

    #[test]
    fn redeclared_parameters_are_reported() {
        let decl = BridgeDeclaration::parse(
            r#"
[library]
name = "misdeclared"

[[functions]]
name = "length"
symbol = "tether_demo_length"
params = ["num"]
returns = "num"
"#,
        )
        .unwrap();
        let mut out = Vec::new();
        let err = run(&decl, &mut out).unwrap_err();
        assert_eq!(err.to_string(), "1 of 1 functions failed to resolve");
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains(
            "MISMATCH length: function 'length' is declared as (num) -> num \
             but symbol 'tether_demo_length' is (str) -> num"
        ));
    }
}
