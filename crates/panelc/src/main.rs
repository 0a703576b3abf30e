#![warn(missing_docs)]

//! Entry point for the `panelc` binary.

mod cli;
mod error;

use std::{fs, io, process};

use clap::Parser;
use layerpanel::{PanelCompiler, load_from_path};
use tracing::{debug, error};
use tracing_subscriber::{fmt, prelude::*, registry};

use crate::{
    cli::{Cli, Format},
    error::Result,
};

fn main() {
    if let Err(err) = run() {
        error!("{err}");
        eprintln!("error: {err}");
        process::exit(1);
    }
}

/// Parse CLI arguments, install logging, render the document and write the output.
fn run() -> Result<()> {
    let cli = Cli::parse();
    let log_spec = cli.log.spec();
    registry()
        .with(logging::env_filter_from_spec(&log_spec))
        .with(fmt::layer().without_time().with_writer(io::stderr))
        .try_init()
        .ok();

    let mut loaded = load_from_path(&cli.document)?;
    let compiler = PanelCompiler::new(&loaded.options)?;
    let panel = compiler.render(&mut loaded.document)?;

    let out = match cli.format {
        Format::Json => panel.to_json()?,
        Format::Script => panel.script().to_string(),
        Format::Html => format!(
            "{}<script>\n{}</script>",
            loaded.document.header_html(),
            panel.script()
        ),
    };

    match &cli.output {
        Some(path) => {
            fs::write(path, out)?;
            debug!(path = %path.display(), "output_written");
        }
        None => println!("{out}"),
    }
    Ok(())
}
