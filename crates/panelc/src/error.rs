//! Error handling for the panelc crate.

use std::{io, result};

use thiserror::Error;

/// Convenient result type for panelc operations.
pub type Result<T> = result::Result<T, Error>;

/// Errors that can occur while rendering a document.
#[derive(Debug, Error)]
pub enum Error {
    /// Loading, validating or rendering the panel failed.
    #[error("{}", .0.pretty())]
    Panel(#[from] layerpanel::Error),
    /// Serializing the panel configuration failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// Writing the output failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
