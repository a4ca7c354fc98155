//! Tether CLI — drives the demo bridges through the argument convention.

mod commands;
mod logging;

use std::io;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tether_marshal::BridgeDeclaration;

#[derive(Parser)]
#[command(name = "tether", version, about = "Call native bridges through the Tether convention")]
struct Cli {
    /// Enable debug logging (overridden by TETHER_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Bridge declaration file (default: the bundled demo declaration)
    #[arg(long, global = true)]
    manifest: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List declared bridge functions
    List,
    /// Check that every declared function resolves to a demo symbol
    Check,
    /// Box arguments, call a bridge and print its result
    Call {
        /// Function name as declared
        name: String,
        /// Arguments, one per declared slot
        #[arg(allow_hyphen_values = true)]
        args: Vec<String>,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = run(cli);
    if let Err(e) = result {
        eprintln!("error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let decl = load_declaration(cli.manifest.as_deref())?;
    let mut out = io::stdout().lock();

    match cli.command {
        Commands::List => commands::list::run(&decl, &mut out),
        Commands::Check => commands::check::run(&decl, &mut out),
        Commands::Call { name, args, json } => {
            commands::call::run(&decl, &name, &args, json, &mut out)
        }
    }
}

/// Load the declaration at `path`, or the bundled one.
fn load_declaration(path: Option<&Path>) -> anyhow::Result<BridgeDeclaration> {
    let decl = match path {
        Some(path) => BridgeDeclaration::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => BridgeDeclaration::parse(tether_demos::BRIDGES_TOML)
            .context("parsing bundled declaration")?,
    };
    tracing::debug!(
        library = %decl.library.name,
        functions = decl.active_functions().len(),
        bundled = path.is_none(),
        "loaded declaration"
    );
    Ok(decl)
}
