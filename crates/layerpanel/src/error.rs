//! Error types for document loading, panel configuration and rendering.

use std::{
    cmp::{max, min},
    fmt::Write as _,
    path::{Path, PathBuf},
};

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Errors produced while loading a map document or compiling a layer panel.
pub enum Error {
    #[error("{message}")]
    /// I/O or filesystem read error.
    Read {
        /// Optional path associated with the read error.
        path: Option<PathBuf>,
        /// Human-readable error message.
        message: String,
    },
    #[error("{message}")]
    /// RON parse error with a concrete line/column location and excerpt.
    Parse {
        /// Optional path associated with the parse error.
        path: Option<PathBuf>,
        /// 1-based line number.
        line: usize,
        /// 1-based column number.
        col: usize,
        /// Human-readable error message.
        message: String,
        /// Rendered excerpt including a caret at the error location.
        excerpt: String,
    },
    /// The number of group layer lists differs from the number of group names.
    #[error("group-count mismatch: {names} group name(s) but {lists} group list(s)")]
    GroupCountMismatch {
        /// Number of declared group names.
        names: usize,
        /// Number of supplied layer lists.
        lists: usize,
    },
    /// A grouped layer name does not match any registered overlay layer.
    #[error("group '{group}' references unknown overlay layer '{layer}'")]
    UnknownLayer {
        /// Group that referenced the layer.
        group: String,
        /// Layer name that could not be resolved.
        layer: String,
    },
    /// The grouping configuration mixes flat names and nested lists.
    #[error("invalid grouping: {detail}")]
    GroupShape {
        /// Description of the offending shape.
        detail: String,
    },
    /// Both raster-only and vector-only were requested for one panel.
    #[error("only_raster and only_vector are mutually exclusive")]
    ConflictingModes,
    /// Strict icon mode found no icon list for a group.
    #[error("no icon list for group {index} ({available} icon list(s) supplied)")]
    IconGroupOutOfRange {
        /// Zero-based group index.
        index: usize,
        /// Number of nested icon lists available.
        available: usize,
    },
    /// The icon configuration is neither a list of icons nor a list of icon lists.
    #[error("icons must be a list of icons or a list of icon lists: {detail}")]
    IconShape {
        /// Description of the offending value.
        detail: String,
    },
    /// A layer handle is not usable as a script identifier.
    #[error("invalid layer handle '{handle}'")]
    InvalidHandle {
        /// The rejected handle text.
        handle: String,
    },
    /// The host document has no map to attach the panel to.
    #[error("cannot render a layer panel without a map to attach it to")]
    NoAttachment,
}

impl Error {
    /// Whether this error belongs to the configuration family (bad grouping,
    /// icon, mode or handle settings) rather than I/O, parsing or host state.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::GroupCountMismatch { .. }
                | Self::UnknownLayer { .. }
                | Self::GroupShape { .. }
                | Self::ConflictingModes
                | Self::IconGroupOutOfRange { .. }
                | Self::InvalidHandle { .. }
        )
    }

    /// Render a human-friendly error message including location and an excerpt when available.
    pub fn pretty(&self) -> String {
        match self {
            Self::Read { path, message } => match path {
                Some(p) => format!("Read error at {}: {}", p.display(), message),
                None => format!("Read error: {}", message),
            },
            Self::Parse {
                path,
                line,
                col,
                message,
                excerpt,
            } => match path {
                Some(p) => format!(
                    "Document parse error at {}:{}:{}\n{}\n{}",
                    p.display(),
                    line,
                    col,
                    message,
                    excerpt
                ),
                None => format!(
                    "Document parse error at line {}, column {}\n{}\n{}",
                    line, col, message, excerpt
                ),
            },
            Self::IconShape { .. } => format!("Icon type error\n{}", self),
            Self::NoAttachment => format!("Render error\n{}", self),
            other => format!("Configuration error\n{}", other),
        }
    }

    /// Access the optional path attached to this error.
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Read { path, .. } | Self::Parse { path, .. } => path.as_deref(),
            _ => None,
        }
    }
}

/// Build a small 2-3 line excerpt with a caret at `(line_no, col_no)`.
pub(crate) fn excerpt_at(source: &str, line_no: usize, col_no: usize) -> String {
    let lines: Vec<&str> = source.lines().collect();
    let total = lines.len();
    let start = max(1usize, line_no.saturating_sub(2));
    let end = min(total, line_no + 1);

    let mut out = String::new();
    for n in start..=end {
        let text = lines.get(n - 1).copied().unwrap_or("");
        let _ignored = writeln!(out, " {:>4} | {}", n, text);
        if n == line_no {
            let prefix = format!(" {:>4} | ", n);
            let _ignored = writeln!(
                out,
                "{}{}^",
                " ".repeat(prefix.len()),
                " ".repeat(col_no.saturating_sub(1))
            );
        }
    }
    out
}
