//! Compile a map's registered layers into a grouped layer-panel control.
//!
//! A render pass runs the same pipeline every time:
//!
//! 1. [`scan`] the host's children into base and overlay layers,
//! 2. compute the [`SuppressionSet`] of layers to hide after construction,
//! 3. resolve overlay groups from the [`GroupingMode`],
//! 4. assign icons per group with [`IconAssigner`],
//! 5. assemble the [`PanelConfiguration`] and request header assets.
//!
//! [`PanelCompiler::render`] drives the pipeline against any [`HostDocument`];
//! [`load_from_path`] builds an in-memory [`Document`] from a RON map file.

mod defaults;
mod error;
mod grouping;
mod host;
mod icons;
mod layer;
mod loader;
mod options;
mod panel;
mod scan;
mod script;
mod suppress;

#[cfg(test)]
mod test_render;

pub use error::Error;
pub use grouping::{GroupSpec, GroupingMode};
pub use host::{Asset, AssetKind, Document, HostDocument};
pub use icons::{IconAssigner, IconConfig, IconDefaults, IconSource, IconSpec, fit};
pub use layer::{Element, FeatureLayer, Handle, LayerKind, LayerRef, Marker, TileLayer};
pub use loader::{LoadedDocument, load_from_path, load_from_str};
pub use options::{Assets, GroupBy, PanelMode, PanelOptions, PanelSettings, WidgetOptions};
pub use panel::{PanelCompiler, PanelConfiguration, PanelEntry, PanelGroup, RenderedPanel};
pub use scan::{LayerIndex, LayerMap, ScannedLayer, scan};
pub use script::PanelScript;
pub use suppress::{Suppressed, SuppressionSet};
