//! Layer registry scanner: classify the host's children into base and overlay layers.

use tracing::{debug, trace};

use crate::{Element, Handle, LayerKind};

/// What the panel remembers about one controllable layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScannedLayer {
    /// Display name.
    pub name: String,
    /// Handle of the layer in the host document.
    pub handle: Handle,
    /// Whether the layer is visible when the map loads.
    pub visible: bool,
    /// Position among all registered children when the name was first seen.
    pub seq: usize,
}

/// Insertion-ordered map from display name to layer.
///
/// Re-inserting a name replaces the stored layer but keeps the position of the
/// first registration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerMap {
    /// Entries in first-registration order.
    entries: Vec<ScannedLayer>,
}

impl LayerMap {
    /// Insert or replace the layer registered under `layer.name`.
    pub fn insert(&mut self, layer: ScannedLayer) {
        if let Some(slot) = self.entries.iter_mut().find(|e| e.name == layer.name) {
            debug!(name = %layer.name, old = %slot.handle, new = %layer.handle, "duplicate_layer_name");
            let seq = slot.seq;
            *slot = ScannedLayer { seq, ..layer };
        } else {
            self.entries.push(layer);
        }
    }

    /// Look up a layer by display name.
    pub fn get(&self, name: &str) -> Option<&ScannedLayer> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Iterate in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &ScannedLayer> {
        self.entries.iter()
    }

    /// Number of distinct names.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map holds no layers.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Result of one scan: the two layer families in registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LayerIndex {
    /// Base layers.
    pub base: LayerMap,
    /// Overlay layers.
    pub overlay: LayerMap,
}

/// Classify `children`, skipping anything that is not a controllable layer.
pub fn scan(children: &[&dyn Element]) -> LayerIndex {
    let mut index = LayerIndex::default();
    for (seq, child) in children.iter().enumerate() {
        let Some(layer) = child.as_layer() else {
            trace!(handle = %child.handle(), "skip_non_layer");
            continue;
        };
        if !layer.controllable() {
            trace!(handle = %layer.handle(), "skip_uncontrolled_layer");
            continue;
        }
        let entry = ScannedLayer {
            name: layer.display_name().to_string(),
            handle: layer.handle().clone(),
            visible: layer.visible_by_default(),
            seq,
        };
        debug!(name = %entry.name, kind = ?layer.kind(), handle = %entry.handle, "scan_layer");
        match layer.kind() {
            LayerKind::Base => index.base.insert(entry),
            LayerKind::Overlay => index.overlay.insert(entry),
        }
    }
    index
}
