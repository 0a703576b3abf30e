//! JavaScript emission for the panel-layers widget.
//!
//! Layer handles are written as bare identifiers so the widget receives the
//! layer objects themselves; every other value is a JSON literal.

use std::fmt::{self, Display, Formatter, Write as _};

use serde::Serialize;

use crate::{PanelGroup, RenderedPanel};

/// Script that builds the widget, attaches it to the map and hides suppressed layers.
#[derive(Debug, Clone, Copy)]
pub struct PanelScript<'a> {
    /// Panel to emit.
    panel: &'a RenderedPanel,
}

impl<'a> PanelScript<'a> {
    /// Wrap a rendered panel for emission.
    pub fn new(panel: &'a RenderedPanel) -> Self {
        Self { panel }
    }
}

/// Encode `value` as a JSON literal that is safe inside an HTML `<script>` element.
fn json<T: Serialize + ?Sized>(value: &T) -> Result<String, fmt::Error> {
    serde_json::to_string(value)
        .map(|s| s.replace("</", "<\\/"))
        .map_err(|_| fmt::Error)
}

/// Write one group object with its layer rows.
fn write_group(f: &mut Formatter<'_>, g: &PanelGroup, indent: &str) -> fmt::Result {
    write!(f, "{indent}{{\"group\": {}", json(&g.group)?)?;
    if let Some(collapsed) = g.collapsed {
        write!(f, ", \"collapsed\": {collapsed}")?;
    }
    writeln!(f, ", \"layers\": [")?;
    for e in &g.layers {
        let mut row = format!("{indent}    {{\"name\": {}", json(&e.name)?);
        if let Some(icon) = &e.icon {
            write!(row, ", \"icon\": {}", json(icon)?)?;
        }
        writeln!(f, "{row}, \"layer\": {}}},", e.layer)?;
    }
    write!(f, "{indent}]}}")
}

impl Display for PanelScript<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let cfg = &self.panel.config;

        match &cfg.base {
            Some(g) => {
                writeln!(f, "var baseLayers = [")?;
                write_group(f, g, "    ")?;
                writeln!(f, "];")?;
            }
            None => writeln!(f, "var baseLayers = null;")?,
        }

        match &cfg.overlays {
            Some(groups) => {
                writeln!(f, "var overLayers = [")?;
                for g in groups {
                    write_group(f, g, "    ")?;
                    writeln!(f, ",")?;
                }
                writeln!(f, "];")?;
            }
            None => writeln!(f, "var overLayers = null;")?,
        }

        writeln!(
            f,
            "var panelLayers = new L.Control.PanelLayers(baseLayers, overLayers, {});",
            json(&self.panel.options)?
        )?;
        writeln!(f, "{}.addControl(panelLayers);", self.panel.map)?;
        for s in &cfg.suppressed {
            writeln!(f, "{}.remove();", s.layer)?;
        }
        Ok(())
    }
}
