//! Panel compiler: scan, suppress, group, assign icons and serialize.

use serde::Serialize;
use tracing::{debug, info};

use crate::{
    Asset, Error, Handle, HostDocument, IconAssigner, IconSpec, LayerIndex, PanelOptions,
    PanelScript, PanelSettings, Suppressed, SuppressionSet, WidgetOptions, scan,
};

/// One row of the panel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelEntry {
    /// Layer display name.
    pub name: String,
    /// Icon markup shown next to the name; base rows carry none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Handle of the layer the row toggles.
    pub layer: Handle,
}

/// A titled group of rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelGroup {
    /// Group heading.
    pub group: String,
    /// Collapsed state, set on the base group only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub collapsed: Option<bool>,
    /// Rows in display order.
    pub layers: Vec<PanelEntry>,
}

/// Everything the widget needs, in stable order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PanelConfiguration {
    /// Base-layer group; absent in vector-only panels.
    pub base: Option<PanelGroup>,
    /// Overlay groups; absent in raster-only panels.
    pub overlays: Option<Vec<PanelGroup>>,
    /// Layers to hide right after the widget is constructed.
    pub suppressed: Vec<Suppressed>,
}

/// Output of one render pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedPanel {
    /// Map the panel attaches to.
    pub map: Handle,
    /// Widget constructor options.
    pub options: WidgetOptions,
    /// Panel contents.
    pub config: PanelConfiguration,
}

impl RenderedPanel {
    /// Serialize the full render output as pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// The widget construction script.
    pub fn script(&self) -> PanelScript<'_> {
        PanelScript::new(self)
    }
}

/// Compiles a host document's layers into a panel configuration.
///
/// The compiler keeps no state between renders; every call to
/// [`render`](Self::render) recomputes the panel from the host's current
/// children.
#[derive(Debug, Clone)]
pub struct PanelCompiler {
    /// Validated options.
    settings: PanelSettings,
}

impl PanelCompiler {
    /// Validate `options` and build a compiler.
    pub fn new(options: &PanelOptions) -> Result<Self, Error> {
        Ok(Self {
            settings: options.settings()?,
        })
    }

    /// Compile the panel for `host` and request the assets it needs.
    ///
    /// On error nothing is requested from the host.
    pub fn render(&self, host: &mut dyn HostDocument) -> Result<RenderedPanel, Error> {
        let map = host.attachment().cloned().ok_or(Error::NoAttachment)?;
        let index = scan(&host.children());
        let (config, uses_font) = self.build(&index)?;

        let assets = &self.settings.assets;
        host.request_asset(Asset::stylesheet(&assets.panel_css));
        host.request_asset(Asset::script(&assets.panel_js));
        if uses_font {
            host.request_asset(Asset::stylesheet(&assets.icon_font_css));
        }

        info!(
            map = %map,
            base = index.base.len(),
            overlays = index.overlay.len(),
            suppressed = config.suppressed.len(),
            "panel_rendered"
        );
        Ok(RenderedPanel {
            map,
            options: self.settings.widget.clone(),
            config,
        })
    }

    /// Compile `index`, also reporting whether any icon needs the icon font.
    fn build(&self, index: &LayerIndex) -> Result<(PanelConfiguration, bool), Error> {
        let s = &self.settings;

        let mut suppression = SuppressionSet::compute(index);
        suppression.restrict(s.mode);

        let (overlays, uses_font) = if s.mode.shows_overlays() {
            let (groups, uses_font) = self.overlay_groups(index)?;
            (Some(groups), uses_font)
        } else {
            (None, false)
        };

        let base = s.mode.shows_base().then(|| PanelGroup {
            group: s.raster_group_name.clone(),
            collapsed: Some(s.widget.collapsed),
            layers: index
                .base
                .iter()
                .map(|l| PanelEntry {
                    name: l.name.clone(),
                    icon: None,
                    layer: l.handle.clone(),
                })
                .collect(),
        });

        let config = PanelConfiguration {
            base,
            overlays,
            suppressed: suppression.into_vec(),
        };
        Ok((config, uses_font))
    }

    /// Resolve the overlay groups and their icons.
    fn overlay_groups(&self, index: &LayerIndex) -> Result<(Vec<PanelGroup>, bool), Error> {
        let s = &self.settings;
        let groups = s.grouping.resolve(&s.data_group_name, &index.overlay)?;
        let assigner = IconAssigner::new(s.icons.as_ref(), &s.icon_defaults, s.strict_icons);

        let mut out = Vec::with_capacity(groups.len());
        let mut uses_font = false;
        for (gi, group) in groups.into_iter().enumerate() {
            let icons = assigner.assign(gi, group.layers.len())?;
            uses_font |= icons.iter().any(IconSpec::uses_icon_font);
            let layers = group
                .layers
                .into_iter()
                .zip(icons)
                .map(|(layer, icon)| PanelEntry {
                    name: layer.name,
                    icon: Some(icon.markup()),
                    layer: layer.handle,
                })
                .collect();
            debug!(group = %group.name, "panel_group");
            out.push(PanelGroup {
                group: group.name,
                collapsed: None,
                layers,
            });
        }
        Ok((out, uses_font))
    }
}
