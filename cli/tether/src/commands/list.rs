//! `tether list`

use std::io::Write;

use anyhow::Result;
use tether_marshal::BridgeDeclaration;

/// Print every active function with its signature.
pub fn run(decl: &BridgeDeclaration, out: &mut impl Write) -> Result<()> {
    let active = decl.active_functions();
    writeln!(
        out,
        "{} ({} functions, abi {})",
        decl.library.name,
        active.len(),
        decl.library.abi
    )?;
    if let Some(link) = &decl.library.link {
        writeln!(out, "  link: {link}")?;
    }
    for func in active {
        match &func.description {
            Some(desc) => writeln!(out, "  {:<40} {desc}", func.signature())?,
            None => writeln!(out, "  {}", func.signature())?,
        }
    }
    Ok(())
}
