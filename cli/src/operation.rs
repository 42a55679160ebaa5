#![deny(missing_docs)]

//! # Operation Command
//!
//! Prints the fully resolved contract of one endpoint as JSON.

use llms_txt_core::get_operation_spec;
use serde_json::Value;

use crate::error::{CliError, CliResult};
use crate::source::open_source;

/// Arguments for the operation command.
#[derive(clap::Args, Debug, Clone)]
pub struct OperationArgs {
    /// Path or `http(s)://` URL of the OpenAPI document (JSON or YAML).
    #[clap(long, env = "LLMS_TXT_SPEC")]
    pub spec: String,

    /// HTTP method, any case.
    #[clap(long)]
    pub method: String,

    /// Path template exactly as written in the document, e.g. `/users/{user_id}`.
    #[clap(long)]
    pub path: String,
}

/// Looks the operation up and returns it resolved.
pub fn lookup(args: &OperationArgs) -> CliResult<Value> {
    let document = open_source(&args.spec)?.load()?;
    Ok(get_operation_spec(&document, &args.method, &args.path)?)
}

/// Executes the operation command.
pub fn execute(args: &OperationArgs) -> CliResult<()> {
    let spec = lookup(args)?;
    let pretty = serde_json::to_string_pretty(&spec)
        .map_err(|e| CliError::General(format!("Failed to serialize operation: {}", e)))?;
    println!("{}", pretty);
    Ok(())
}
