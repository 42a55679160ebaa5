#![deny(missing_docs)]

//! # llms-txt CLI
//!
//! Command Line Interface for llms.txt generation.
//!
//! Supported Commands:
//! - `render`: Writes the llms.txt summary of an OpenAPI document.
//! - `operation`: Prints one endpoint with every `$ref` resolved.
//! - `serve`: Hosts both over HTTP (feature `server`).

use std::io::Write;

use clap::{Parser, Subcommand};

use crate::error::{CliError, CliResult};

mod error;
mod logging;
mod operation;
mod render;
#[cfg(feature = "server")]
mod serve;
mod source;

#[derive(Parser, Debug)]
#[clap(author, version, about = "llms.txt generator for OpenAPI documents")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG` overrides.
    #[clap(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render the llms.txt markdown summary.
    Render(render::RenderArgs),
    /// Print the resolved contract of a single operation as JSON.
    Operation(operation::OperationArgs),
    /// Serve llms.txt and per-operation details over HTTP.
    #[cfg(feature = "server")]
    Serve(serve::ServeArgs),
}

fn main() {
    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        let _ = report(&e, &mut std::io::stderr().lock());
        std::process::exit(1);
    }
}

/// Writes the failure to `out`.
fn report(err: &CliError, out: &mut impl Write) -> std::io::Result<()> {
    writeln!(out, "Error: {}", err)
}

fn run(cli: &Cli) -> CliResult<()> {
    logging::init_logging(cli.verbose)?;

    match &cli.command {
        Commands::Render(args) => render::execute(args)?,
        Commands::Operation(args) => operation::execute(args)?,
        #[cfg(feature = "server")]
        Commands::Serve(args) => serve::execute(args)?,
    }

    Ok(())
}
