//! Icon assignment: resolve one icon per (group, layer) and render it to markup.
//!
//! Icon lists are matched to layers by position. Short lists are padded with
//! the "no icon" sentinel, long lists are truncated, and nested lists are
//! selected per group index.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;
use tracing::{trace, warn};

use crate::Error;

/// Prefixes that need the shared icon-font stylesheet.
static FONT_PREFIX_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^fa([srlbdt]|-(solid|regular|light|thin|duotone|brands))?$")
        .expect("font prefix pattern is a valid regex")
});

/// A resolved icon, or the sentinel.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum IconSpec {
    /// No icon.
    #[default]
    None,
    /// A font glyph.
    Glyph {
        /// Glyph name without prefix, e.g. `road`.
        name: String,
        /// Style prefix, e.g. `fa`.
        prefix: String,
        /// Optional CSS color.
        color: Option<String>,
    },
}

impl IconSpec {
    /// Whether this is the sentinel.
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Whether the glyph comes from the shared icon font.
    pub fn uses_icon_font(&self) -> bool {
        match self {
            Self::None => false,
            Self::Glyph { prefix, .. } => FONT_PREFIX_RE.is_match(prefix),
        }
    }

    /// Render the `<i>` fragment shown next to the layer name.
    pub fn markup(&self) -> String {
        match self {
            Self::None => "<i></i>".to_string(),
            Self::Glyph {
                name,
                prefix,
                color,
            } => {
                let class = if prefix.is_empty() {
                    name.clone()
                } else {
                    format!("{prefix} {prefix}-{name}")
                };
                match color {
                    Some(c) => format!(
                        r#"<i class="{}" style="color: {}"></i>"#,
                        escape_attr(&class),
                        escape_attr(c)
                    ),
                    None => format!(r#"<i class="{}"></i>"#, escape_attr(&class)),
                }
            }
        }
    }
}

/// Escape a value for use inside a double-quoted HTML attribute.
fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// One user-supplied icon entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconSource {
    /// Explicit "no icon" (`null`).
    Blank,
    /// Glyph name using the panel's default prefix and color.
    Name(String),
    /// Glyph with per-icon overrides.
    Spec {
        /// Glyph name.
        name: String,
        /// Prefix override.
        prefix: Option<String>,
        /// Color override.
        color: Option<String>,
    },
}

impl IconSource {
    /// Parse one entry: `null`, a string, or `{name, prefix?, color?}`.
    fn from_value(v: &Value) -> Result<Self, Error> {
        match v {
            Value::Null => Ok(Self::Blank),
            Value::String(s) => Ok(Self::Name(s.clone())),
            Value::Object(map) => {
                let field = |key: &str| -> Result<Option<String>, Error> {
                    match map.get(key) {
                        None | Some(Value::Null) => Ok(None),
                        Some(Value::String(s)) => Ok(Some(s.clone())),
                        Some(other) => Err(Error::IconShape {
                            detail: format!("icon field '{}' must be a string, got {}", key, other),
                        }),
                    }
                };
                if let Some(extra) = map
                    .keys()
                    .find(|k| !matches!(k.as_str(), "name" | "prefix" | "color"))
                {
                    return Err(Error::IconShape {
                        detail: format!("unknown icon field '{}'", extra),
                    });
                }
                let name = field("name")?.ok_or_else(|| Error::IconShape {
                    detail: "icon object is missing 'name'".to_string(),
                })?;
                Ok(Self::Spec {
                    name,
                    prefix: field("prefix")?,
                    color: field("color")?,
                })
            }
            other => Err(Error::IconShape {
                detail: format!("unexpected icon entry {}", other),
            }),
        }
    }

    /// Resolve against panel defaults.
    fn resolve(&self, defaults: &IconDefaults) -> IconSpec {
        match self {
            Self::Blank => IconSpec::None,
            Self::Name(name) => IconSpec::Glyph {
                name: name.clone(),
                prefix: defaults.prefix.clone(),
                color: defaults.color.clone(),
            },
            Self::Spec {
                name,
                prefix,
                color,
            } => IconSpec::Glyph {
                name: name.clone(),
                prefix: prefix.clone().unwrap_or_else(|| defaults.prefix.clone()),
                color: color.clone().or_else(|| defaults.color.clone()),
            },
        }
    }
}

/// User icon configuration: one flat list, or one list per group.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Value")]
pub enum IconConfig {
    /// Applied to every group from position 0.
    Flat(Vec<IconSource>),
    /// `lists[i]` applies to group `i`.
    Nested(Vec<Vec<IconSource>>),
}

impl IconConfig {
    /// Classify an untyped value as a flat or nested icon list.
    ///
    /// Anything else (a bare string, a map, a list mixing icons and lists) is
    /// an [`Error::IconShape`].
    pub fn from_value(value: &Value) -> Result<Self, Error> {
        let Value::Array(items) = value else {
            return Err(Error::IconShape {
                detail: format!("expected a list, got {}", value),
            });
        };
        let nested = items.iter().filter(|v| v.is_array()).count();
        if nested == 0 {
            let icons = items
                .iter()
                .map(IconSource::from_value)
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(Self::Flat(icons));
        }
        if nested != items.len() {
            return Err(Error::IconShape {
                detail: "list mixes icons and icon lists".to_string(),
            });
        }
        let lists = items
            .iter()
            .filter_map(Value::as_array)
            .map(|inner| {
                inner
                    .iter()
                    .map(IconSource::from_value)
                    .collect::<Result<Vec<_>, _>>()
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::Nested(lists))
    }
}

impl TryFrom<Value> for IconConfig {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(&value)
    }
}

/// Prefix and color used for icons that do not override them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IconDefaults {
    /// Style prefix.
    pub prefix: String,
    /// CSS color, if any.
    pub color: Option<String>,
}

/// Assigns icons to the layers of each group.
#[derive(Debug, Clone, Copy)]
pub struct IconAssigner<'a> {
    /// User icons, if any.
    config: Option<&'a IconConfig>,
    /// Prefix/color defaults.
    defaults: &'a IconDefaults,
    /// Fail instead of falling back when a nested list is missing.
    strict: bool,
}

impl<'a> IconAssigner<'a> {
    /// Create an assigner.
    pub fn new(config: Option<&'a IconConfig>, defaults: &'a IconDefaults, strict: bool) -> Self {
        Self {
            config,
            defaults,
            strict,
        }
    }

    /// Resolve `layer_count` icons for the group at `group_index`.
    pub fn assign(&self, group_index: usize, layer_count: usize) -> Result<Vec<IconSpec>, Error> {
        let sources: &[IconSource] = match self.config {
            None => &[],
            Some(IconConfig::Flat(icons)) => icons,
            Some(IconConfig::Nested(lists)) => match lists.get(group_index) {
                Some(list) => list,
                None if self.strict => {
                    return Err(Error::IconGroupOutOfRange {
                        index: group_index,
                        available: lists.len(),
                    });
                }
                None => {
                    warn!(
                        group = group_index,
                        available = lists.len(),
                        "no icon list for group; using blank icons"
                    );
                    &[]
                }
            },
        };
        let icons = sources.iter().map(|s| s.resolve(self.defaults)).collect();
        let icons = fit(icons, layer_count);
        trace!(group = group_index, count = icons.len(), "icons_assigned");
        Ok(icons)
    }
}

/// Pad with sentinels or truncate so exactly `n` icons remain.
pub fn fit(mut icons: Vec<IconSpec>, n: usize) -> Vec<IconSpec> {
    if icons.len() > n {
        trace!(supplied = icons.len(), layers = n, "truncating icon list");
    }
    icons.resize(n, IconSpec::None);
    icons
}
