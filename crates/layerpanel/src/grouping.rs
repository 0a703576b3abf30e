//! Grouping resolver: partition overlay layers into named panel groups.

use tracing::debug;

use crate::{Error, LayerMap, ScannedLayer};

/// How overlay layers are grouped in the panel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GroupingMode {
    /// One synthetic group holding every overlay in scan order.
    #[default]
    None,
    /// One explicit group listing the named overlays in display order.
    Flat {
        /// Declared headings; at most one is allowed.
        names: Vec<String>,
        /// Overlay names in display order.
        layers: Vec<String>,
    },
    /// One group per name; `lists[i]` holds the overlays of `names[i]`.
    Nested {
        /// Group headings.
        names: Vec<String>,
        /// Overlay names per group, in display order.
        lists: Vec<Vec<String>>,
    },
}

/// A resolved panel group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSpec {
    /// Group heading.
    pub name: String,
    /// Member overlays in display order.
    pub layers: Vec<ScannedLayer>,
}

impl GroupingMode {
    /// Resolve the groups against the scanned overlays.
    ///
    /// `default_name` heads the synthetic group, and the flat group when it
    /// declares no heading of its own.
    pub fn resolve(&self, default_name: &str, overlays: &LayerMap) -> Result<Vec<GroupSpec>, Error> {
        let groups = match self {
            Self::None => vec![GroupSpec {
                name: default_name.to_string(),
                layers: overlays.iter().cloned().collect(),
            }],
            Self::Flat { names, layers } => {
                if names.len() > 1 {
                    return Err(Error::GroupCountMismatch {
                        names: names.len(),
                        lists: 1,
                    });
                }
                let name = names.first().map_or(default_name, String::as_str);
                vec![explicit_group(name, layers, overlays)?]
            }
            Self::Nested { names, lists } => {
                if names.len() != lists.len() {
                    return Err(Error::GroupCountMismatch {
                        names: names.len(),
                        lists: lists.len(),
                    });
                }
                names
                    .iter()
                    .zip(lists)
                    .map(|(name, layers)| explicit_group(name, layers, overlays))
                    .collect::<Result<Vec<_>, _>>()?
            }
        };
        for g in &groups {
            debug!(group = %g.name, layers = g.layers.len(), "resolved_group");
        }
        Ok(groups)
    }
}

/// Build one declared group, failing on names that are not registered overlays.
fn explicit_group(name: &str, layers: &[String], overlays: &LayerMap) -> Result<GroupSpec, Error> {
    let layers = layers
        .iter()
        .map(|layer| {
            overlays.get(layer).cloned().ok_or_else(|| Error::UnknownLayer {
                group: name.to_string(),
                layer: layer.clone(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    Ok(GroupSpec {
        name: name.to_string(),
        layers,
    })
}
