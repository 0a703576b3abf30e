//! Command-line interface definitions for panelc.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use logging::LogArgs;

/// Command-line interface for the `panelc` binary.
#[derive(Parser, Debug)]
#[command(
    name = "panelc",
    about = "Compile a map document's layers into a panel-layers control",
    version
)]
pub struct Cli {
    /// Logging controls shared across layerpanel binaries.
    #[command(flatten)]
    pub log: LogArgs,

    /// Map document in RON syntax.
    #[arg(value_name = "DOCUMENT")]
    pub document: PathBuf,

    /// What to print.
    #[arg(long, value_enum, default_value_t = Format::Json)]
    pub format: Format,

    /// Write the output to a file instead of stdout.
    #[arg(long, short, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Output formats.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Panel configuration as pretty JSON.
    Json,
    /// Widget construction script.
    Script,
    /// Header asset tags followed by the script in a `<script>` element.
    Html,
}
