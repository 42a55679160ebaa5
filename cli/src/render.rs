#![deny(missing_docs)]

//! # Render Command
//!
//! Writes the llms.txt summary of a schema document to a file or stdout.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use llms_txt_core::{generate_llms_txt, DEFAULT_MOUNT_PATH};

use crate::error::CliResult;
use crate::source::open_source;

/// Arguments for the render command.
#[derive(clap::Args, Debug, Clone)]
pub struct RenderArgs {
    /// Path or `http(s)://` URL of the OpenAPI document (JSON or YAML).
    #[clap(long, env = "LLMS_TXT_SPEC")]
    pub spec: String,

    /// Mount path the detail links are built against.
    #[clap(long, env = "LLMS_TXT_MOUNT_PATH", default_value = DEFAULT_MOUNT_PATH)]
    pub mount_path: String,

    /// Output file; stdout when omitted.
    #[clap(long, short)]
    pub output: Option<PathBuf>,
}

/// Executes the render command.
pub fn execute(args: &RenderArgs) -> CliResult<()> {
    let source = open_source(&args.spec)?;
    let document = source.load()?;
    let content = generate_llms_txt(&document, &args.mount_path);

    match &args.output {
        Some(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(path, &content)?;
            tracing::info!("Wrote llms.txt for {} to {:?}", source.describe(), path);
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(content.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}
