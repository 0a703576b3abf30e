//! Toggle suppression: layers to hide right after the panel is built.
//!
//! The widget shows every listed layer that is currently on the map, so the
//! compiler emits a hide instruction for each layer whose initial state must be
//! "off": every base layer after the first (only one base layer may be
//! visible), and every overlay registered with `show = false`.

use tracing::debug;

use crate::{Handle, LayerIndex, LayerKind, PanelMode, ScannedLayer};

/// A layer that must be hidden after construction.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct Suppressed {
    /// Display name.
    pub name: String,
    /// Handle of the layer to hide.
    pub layer: Handle,
}

/// Ordered mapping of layers to hide, keyed by family and display name, in
/// registration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SuppressionSet {
    /// Entries ordered by registration sequence.
    entries: Vec<Entry>,
}

/// One suppressed layer with its family and registration sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Entry {
    /// Position among the host's children.
    seq: usize,
    /// Family the layer was registered in.
    kind: LayerKind,
    /// What gets emitted.
    layer: Suppressed,
}

impl SuppressionSet {
    /// Compute the suppression set for a scanned layer index.
    pub fn compute(index: &LayerIndex) -> Self {
        let mut set = Self::default();
        for layer in index.base.iter().skip(1) {
            set.insert(LayerKind::Base, layer);
        }
        for layer in index.overlay.iter().filter(|l| !l.visible) {
            set.insert(LayerKind::Overlay, layer);
        }
        set.entries.sort_by_key(|e| e.seq);
        set
    }

    /// Insert keyed by family and display name; a later insert replaces the
    /// layer but keeps the earlier position.
    fn insert(&mut self, kind: LayerKind, layer: &ScannedLayer) {
        let suppressed = Suppressed {
            name: layer.name.clone(),
            layer: layer.handle.clone(),
        };
        match self
            .entries
            .iter_mut()
            .find(|e| e.kind == kind && e.layer.name == layer.name)
        {
            Some(slot) => slot.layer = suppressed,
            None => self.entries.push(Entry {
                seq: layer.seq,
                kind,
                layer: suppressed,
            }),
        }
    }

    /// Drop entries of the family `mode` leaves out of the panel.
    pub fn restrict(&mut self, mode: PanelMode) {
        let excluded = match mode {
            PanelMode::Full => return,
            PanelMode::RasterOnly => LayerKind::Overlay,
            PanelMode::VectorOnly => LayerKind::Base,
        };
        self.entries.retain(|e| {
            let keep = e.kind != excluded;
            if !keep {
                debug!(name = %e.layer.name, ?mode, "suppression_dropped_excluded_family");
            }
            keep
        });
    }

    /// Whether a layer with `name` is suppressed.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.layer.name == name)
    }

    /// Iterate suppressed layers in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Suppressed> {
        self.entries.iter().map(|e| &e.layer)
    }

    /// Number of suppressed layers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing needs hiding.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consume the set into an ordered list.
    pub fn into_vec(self) -> Vec<Suppressed> {
        self.entries.into_iter().map(|e| e.layer).collect()
    }
}
