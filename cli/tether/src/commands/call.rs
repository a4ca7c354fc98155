//! `tether call <name> [args...]`

use std::io::Write;

use anyhow::{anyhow, Context, Result};
use serde::Serialize;
use tether_marshal::{invoke_checked, BridgeDeclaration, ReturnValue};

#[derive(Serialize)]
struct CallReport<'a> {
    function: &'a str,
    symbol: &'a str,
    result: &'a ReturnValue,
}

/// Box `inputs` per the declaration, invoke the bridge and print its result.
pub fn run(
    decl: &BridgeDeclaration,
    name: &str,
    inputs: &[String],
    json: bool,
    out: &mut impl Write,
) -> Result<()> {
    let func = decl
        .find(name)
        .ok_or_else(|| anyhow!("no function '{name}' in library '{}'", decl.library.name))?;
    let export = tether_demos::lookup(func.symbol())
        .ok_or_else(|| anyhow!("symbol '{}' is not exported", func.symbol()))?;
    export.verify(func)?;

    tracing::debug!(function = %func.name, symbol = export.symbol, inputs = inputs.len(), "calling bridge");
    let args = func
        .box_inputs(inputs)
        .with_context(|| format!("boxing arguments for {}", func.signature()))?;
    // SAFETY: each demo export lists exactly the slots its bridge reads.
    let value = unsafe { invoke_checked(func, export, &args) }
        .with_context(|| format!("calling {}", func.name))?;

    if json {
        let report = CallReport {
            function: &func.name,
            symbol: func.symbol(),
            result: &value,
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
    } else {
        writeln!(out, "{value}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demos() -> BridgeDeclaration {
        BridgeDeclaration::parse(tether_demos::BRIDGES_TOML).unwrap()
    }

    fn call(name: &str, inputs: &[&str], json: bool) -> Result<String> {
        let inputs: Vec<String> = inputs.iter().map(|s| s.to_string()).collect();
        let mut out = Vec::new();
        run(&demos(), name, &inputs, json, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn sum_prints_the_number() {
        assert_eq!(call("sum", &["3", "4"], false).unwrap(), "7\n");
    }

    #[test]
    fn void_result() {
        assert_eq!(call("args_example", &["hi", "5"], false).unwrap(), "void\n");
    }

    #[test]
    fn json_report() {
        let text = call("shout", &["hey"], true).unwrap();
        let report: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(report["function"], "shout");
        assert_eq!(report["symbol"], "tether_demo_shout");
        assert_eq!(report["result"]["kind"], "text");
        assert_eq!(report["result"]["value"], "HEY");
    }

    #[test]
    fn unknown_function() {
        let err = call("nope", &[], false).unwrap_err();
        assert_eq!(err.to_string(), "no function 'nope' in library 'demos'");
    }

    #[test]
    fn bad_number_carries_context() {
        let err = call("sum", &["1", "x"], false).unwrap_err();
        let chain = format!("{err:#}");
        assert!(chain.starts_with("boxing arguments for sum(num, num) -> num"));
        assert!(chain.contains("'x'"));
    }

    fn call_with(manifest: &str, name: &str, inputs: &[&str]) -> Result<String> {
        let decl = BridgeDeclaration::parse(manifest).unwrap();
        let inputs: Vec<String> = inputs.iter().map(|s| s.to_string()).collect();
        let mut out = Vec::new();
        run(&decl, name, &inputs, false, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn numbers_declared_as_strings_are_refused() {
        let manifest = r#"
[library]
name = "misdeclared"

[[functions]]
name = "sum"
symbol = "tether_demo_sum"
params = ["str", "str"]
returns = "num"
"#;
        let err = call_with(manifest, "sum", &["3", "4"]).unwrap_err();
        assert!(err
            .to_string()
            .ends_with("but symbol 'tether_demo_sum' is (num, num) -> num"));
    }

    #[test]
    fn strings_declared_as_numbers_are_refused() {
        let manifest = r#"
[library]
name = "misdeclared"

[[functions]]
name = "length"
symbol = "tether_demo_length"
params = ["num"]
returns = "num"
"#;
        let err = call_with(manifest, "length", &["5"]).unwrap_err();
        assert!(err.to_string().contains("declared as (num) -> num"));
    }

    #[test]
    fn renamed_function_with_matching_slots_runs() {
        let manifest = r#"
[library]
name = "renamed"

[[functions]]
name = "len"
symbol = "tether_demo_length"
params = ["string"]
returns = "number"
"#;
        assert_eq!(call_with(manifest, "len", &["four"]).unwrap(), "4\n");
    }
}
