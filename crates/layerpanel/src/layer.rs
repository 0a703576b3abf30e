//! Layer capability traits and the concrete layer variants a map document can hold.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize, Serializer};

use crate::Error;

/// Identifiers that can be emitted verbatim into the widget script.
static HANDLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*$").expect("handle pattern is a valid regex")
});

/// Stable handle of an element inside the host document.
///
/// Handles double as script variable names, so they are restricted to plain
/// identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(String);

impl Handle {
    /// Validate `name` and wrap it as a handle.
    pub fn new(name: impl Into<String>) -> Result<Self, Error> {
        let name = name.into();
        if HANDLE_RE.is_match(&name) {
            Ok(Self(name))
        } else {
            Err(Error::InvalidHandle { handle: name })
        }
    }

    /// Derive a handle from an element kind and its registration index,
    /// e.g. `tile_layer_3`.
    pub(crate) fn generated(kind: &str, index: usize) -> Self {
        Self(format!("{}_{}", kind, index))
    }

    /// Borrow the handle text.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Handle {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

/// Layer family as seen by the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerKind {
    /// Mutually exclusive background layer; at most one is visible.
    Base,
    /// Independently toggled layer.
    Overlay,
}

impl LayerKind {
    /// Map the document-level `overlay` flag onto a kind.
    pub fn from_overlay(overlay: bool) -> Self {
        if overlay { Self::Overlay } else { Self::Base }
    }
}

/// Anything registered as a child of the map.
pub trait Element: fmt::Debug {
    /// Handle of this element in the host document.
    fn handle(&self) -> &Handle;

    /// Layer capabilities, if this element is a layer at all.
    fn as_layer(&self) -> Option<&dyn LayerRef> {
        None
    }
}

/// Capabilities the panel needs from a layer.
pub trait LayerRef {
    /// Handle of the layer in the host document.
    fn handle(&self) -> &Handle;
    /// Whether the layer is a base or an overlay layer.
    fn kind(&self) -> LayerKind;
    /// Name shown in the panel.
    fn display_name(&self) -> &str;
    /// Whether the layer is listed in the panel at all.
    fn controllable(&self) -> bool;
    /// Whether the layer is visible when the map first loads.
    fn visible_by_default(&self) -> bool;
}

/// Flags shared by every concrete layer variant.
#[derive(Debug, Clone, PartialEq, Eq)]
struct LayerProps {
    /// Document handle.
    handle: Handle,
    /// Display name.
    name: String,
    /// Base or overlay.
    kind: LayerKind,
    /// Listed in the panel.
    control: bool,
    /// Shown at start-up.
    show: bool,
}

/// Raster tile layer; a base layer unless marked as an overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileLayer {
    /// Common layer flags.
    props: LayerProps,
}

impl TileLayer {
    /// Create a controllable, visible base tile layer.
    pub fn new(handle: Handle, name: impl Into<String>) -> Self {
        Self {
            props: LayerProps {
                handle,
                name: name.into(),
                kind: LayerKind::Base,
                control: true,
                show: true,
            },
        }
    }

    /// Register the tile layer as an overlay instead of a base layer.
    pub fn overlay(mut self, overlay: bool) -> Self {
        self.props.kind = LayerKind::from_overlay(overlay);
        self
    }

    /// Set whether the layer is listed in the panel.
    pub fn control(mut self, control: bool) -> Self {
        self.props.control = control;
        self
    }

    /// Set whether the layer is shown at start-up.
    pub fn show(mut self, show: bool) -> Self {
        self.props.show = show;
        self
    }
}

/// Vector data layer (GeoJSON, feature group); an overlay unless marked otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureLayer {
    /// Common layer flags.
    props: LayerProps,
}

impl FeatureLayer {
    /// Create a controllable, visible overlay layer.
    pub fn new(handle: Handle, name: impl Into<String>) -> Self {
        Self {
            props: LayerProps {
                handle,
                name: name.into(),
                kind: LayerKind::Overlay,
                control: true,
                show: true,
            },
        }
    }

    /// Register the feature layer as an overlay (default) or as a base layer.
    pub fn overlay(mut self, overlay: bool) -> Self {
        self.props.kind = LayerKind::from_overlay(overlay);
        self
    }

    /// Set whether the layer is listed in the panel.
    pub fn control(mut self, control: bool) -> Self {
        self.props.control = control;
        self
    }

    /// Set whether the layer is shown at start-up.
    pub fn show(mut self, show: bool) -> Self {
        self.props.show = show;
        self
    }
}

/// Point marker. Never part of the panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    /// Document handle.
    handle: Handle,
}

impl Marker {
    /// Create a marker.
    pub fn new(handle: Handle) -> Self {
        Self { handle }
    }
}

impl Element for Marker {
    fn handle(&self) -> &Handle {
        &self.handle
    }
}

impl LayerRef for LayerProps {
    fn handle(&self) -> &Handle {
        &self.handle
    }
    fn kind(&self) -> LayerKind {
        self.kind
    }
    fn display_name(&self) -> &str {
        &self.name
    }
    fn controllable(&self) -> bool {
        self.control
    }
    fn visible_by_default(&self) -> bool {
        self.show
    }
}

impl Element for TileLayer {
    fn handle(&self) -> &Handle {
        &self.props.handle
    }
    fn as_layer(&self) -> Option<&dyn LayerRef> {
        Some(&self.props)
    }
}

impl Element for FeatureLayer {
    fn handle(&self) -> &Handle {
        &self.props.handle
    }
    fn as_layer(&self) -> Option<&dyn LayerRef> {
        Some(&self.props)
    }
}
