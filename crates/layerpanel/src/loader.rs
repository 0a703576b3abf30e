//! Parse and load RON map documents.

use std::{ffi::OsStr, fs, path::Path};

use ron::{Options, error::SpannedError, extensions::Extensions};
use serde::Deserialize;
use tracing::debug;

use crate::{
    Document, Error, FeatureLayer, Handle, Marker, PanelOptions, TileLayer, error::excerpt_at,
};

/// A parsed map document: the host document and the panel options.
#[derive(Debug)]
pub struct LoadedDocument {
    /// Map and its registered children.
    pub document: Document,
    /// Panel options for the map.
    pub options: PanelOptions,
}

/// Top-level document as written in RON.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDocument {
    /// Map handle.
    #[serde(default = "default_map")]
    map: String,
    /// Children in registration order.
    #[serde(default)]
    children: Vec<RawChild>,
    /// Panel options.
    #[serde(default)]
    panel: PanelOptions,
}

/// Handle used when the document does not name its map.
fn default_map() -> String {
    "map".to_string()
}

/// Serde default for `control` and `show`.
const fn yes() -> bool {
    true
}

/// One registered child.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case", deny_unknown_fields)]
enum RawChild {
    /// Raster tile layer.
    Tile {
        /// Explicit handle.
        #[serde(default)]
        id: Option<String>,
        /// Display name.
        name: String,
        /// Register as an overlay instead of a base layer.
        #[serde(default)]
        overlay: bool,
        /// Listed in the panel.
        #[serde(default = "yes")]
        control: bool,
        /// Shown at start-up.
        #[serde(default = "yes")]
        show: bool,
    },
    /// Vector feature layer.
    Features {
        /// Explicit handle.
        #[serde(default)]
        id: Option<String>,
        /// Display name.
        name: String,
        /// Register as an overlay (default) or base layer.
        #[serde(default = "yes")]
        overlay: bool,
        /// Listed in the panel.
        #[serde(default = "yes")]
        control: bool,
        /// Shown at start-up.
        #[serde(default = "yes")]
        show: bool,
    },
    /// Point marker.
    Marker {
        /// Explicit handle.
        #[serde(default)]
        id: Option<String>,
    },
}

/// Use the explicit id when present, otherwise derive one from the position.
fn handle_for(id: Option<String>, kind: &str, index: usize) -> Result<Handle, Error> {
    match id {
        Some(id) => Handle::new(id),
        None => Ok(Handle::generated(kind, index)),
    }
}

impl RawDocument {
    /// Build the in-memory document.
    fn into_loaded(self) -> Result<LoadedDocument, Error> {
        let mut document = Document::new(Handle::new(self.map)?);
        for (i, child) in self.children.into_iter().enumerate() {
            match child {
                RawChild::Tile {
                    id,
                    name,
                    overlay,
                    control,
                    show,
                } => {
                    let layer = TileLayer::new(handle_for(id, "tile_layer", i)?, name)
                        .overlay(overlay)
                        .control(control)
                        .show(show);
                    document.add_child(layer);
                }
                RawChild::Features {
                    id,
                    name,
                    overlay,
                    control,
                    show,
                } => {
                    let layer = FeatureLayer::new(handle_for(id, "feature_layer", i)?, name)
                        .overlay(overlay)
                        .control(control)
                        .show(show);
                    document.add_child(layer);
                }
                RawChild::Marker { id } => {
                    document.add_child(Marker::new(handle_for(id, "marker", i)?));
                }
            }
        }
        Ok(LoadedDocument {
            document,
            options: self.panel,
        })
    }
}

/// Convert a RON error into a located parse error.
fn parse_error(err: &SpannedError, source: &str, path: Option<&Path>) -> Error {
    let line = err.span.start.line.max(1);
    let col = err.span.start.col.max(1);
    Error::Parse {
        path: path.map(Path::to_path_buf),
        line,
        col,
        message: err.code.to_string(),
        excerpt: excerpt_at(source, line, col),
    }
}

/// Parse a map document from a RON string. `path` is only used for error reporting.
pub fn load_from_str(source: &str, path: Option<&Path>) -> Result<LoadedDocument, Error> {
    let opts = Options::default().with_default_extension(Extensions::IMPLICIT_SOME);
    let raw: RawDocument = opts
        .from_str(source)
        .map_err(|e| parse_error(&e, source, path))?;
    debug!(map = %raw.map, children = raw.children.len(), "document_parsed");
    raw.into_loaded()
}

/// Load a map document from a `.ron` file.
pub fn load_from_path(path: &Path) -> Result<LoadedDocument, Error> {
    if path.extension() != Some(OsStr::new("ron")) {
        return Err(Error::Read {
            path: Some(path.to_path_buf()),
            message: "Unsupported document format (expected a .ron file)".to_string(),
        });
    }
    let source = fs::read_to_string(path).map_err(|e| Error::Read {
        path: Some(path.to_path_buf()),
        message: e.to_string(),
    })?;
    load_from_str(&source, Some(path))
}
