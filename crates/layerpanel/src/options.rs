//! User-facing panel options and their validated form.

use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::Value;

use crate::{Error, GroupingMode, IconConfig, IconDefaults, defaults};

/// Which layer families the panel lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelMode {
    /// Base and overlay layers.
    #[default]
    Full,
    /// Base (raster) layers only.
    RasterOnly,
    /// Overlay (vector) layers only.
    VectorOnly,
}

impl PanelMode {
    /// Whether the base-layer section is rendered.
    pub fn shows_base(self) -> bool {
        !matches!(self, Self::VectorOnly)
    }

    /// Whether the overlay section is rendered.
    pub fn shows_overlays(self) -> bool {
        !matches!(self, Self::RasterOnly)
    }
}

/// Shape of the `group_by` option: nothing, one list of names, or one list per group.
#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
#[serde(try_from = "Value")]
pub enum GroupBy {
    /// No explicit grouping.
    #[default]
    None,
    /// One group of named layers.
    Flat(Vec<String>),
    /// One list of names per group.
    Nested(Vec<Vec<String>>),
}

impl GroupBy {
    /// Classify an untyped `group_by` value.
    pub fn from_value(value: &Value) -> Result<Self, Error> {
        let shape_err = |detail: String| Error::GroupShape { detail };
        let items = match value {
            Value::Null => return Ok(Self::None),
            Value::Array(items) if items.is_empty() => return Ok(Self::None),
            Value::Array(items) => items,
            other => return Err(shape_err(format!("expected a list, got {}", other))),
        };
        if items.iter().all(Value::is_string) {
            return Ok(Self::Flat(strings(items)));
        }
        if items.iter().all(Value::is_array) {
            let lists = items
                .iter()
                .filter_map(Value::as_array)
                .map(|inner| {
                    if inner.iter().all(Value::is_string) {
                        Ok(strings(inner))
                    } else {
                        Err(shape_err("group lists must contain layer names".to_string()))
                    }
                })
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(Self::Nested(lists));
        }
        Err(shape_err(
            "group_by must be a list of names or a list of name lists".to_string(),
        ))
    }
}

/// Collect string values; callers check the element types first.
fn strings(items: &[Value]) -> Vec<String> {
    items
        .iter()
        .filter_map(Value::as_str)
        .map(str::to_string)
        .collect()
}

impl TryFrom<Value> for GroupBy {
    type Error = Error;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(&value)
    }
}

/// Header assets the widget needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Assets {
    /// Panel widget stylesheet.
    #[serde(default = "defaults::default_panel_css")]
    pub panel_css: String,
    /// Panel widget script.
    #[serde(default = "defaults::default_panel_js")]
    pub panel_js: String,
    /// Icon font stylesheet, requested only when a font icon is used.
    #[serde(default = "defaults::default_icon_font_css")]
    pub icon_font_css: String,
}

impl Default for Assets {
    fn default() -> Self {
        Self {
            panel_css: defaults::default_panel_css(),
            panel_js: defaults::default_panel_js(),
            icon_font_css: defaults::default_icon_font_css(),
        }
    }
}

/// Panel options as written by the user.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PanelOptions {
    /// Panel title.
    #[serde(default, deserialize_with = "de_opt")]
    pub title: Option<String>,
    /// Heading of the base-layer group.
    #[serde(default = "defaults::default_group_name")]
    pub raster_group_name: String,
    /// Heading of the synthetic or flat overlay group.
    #[serde(default = "defaults::default_group_name")]
    pub data_group_name: String,
    /// Headings of nested overlay groups.
    #[serde(default)]
    pub groups: Vec<String>,
    /// Overlay grouping.
    #[serde(default)]
    pub group_by: GroupBy,
    /// Panel collapsed at start-up.
    #[serde(default = "defaults::default_true")]
    pub collapsed: bool,
    /// Groups can be collapsed individually.
    #[serde(default = "defaults::default_true")]
    pub collapsible_groups: bool,
    /// Compact panel; `false` makes it as tall as the screen.
    #[serde(default, deserialize_with = "de_opt")]
    pub compact: Option<bool>,
    /// Icons shown next to overlay names.
    #[serde(default, deserialize_with = "de_opt_icons")]
    pub icons: Option<IconConfig>,
    /// Default icon style prefix.
    #[serde(default = "defaults::default_icon_prefix")]
    pub icon_prefix: String,
    /// Default icon color.
    #[serde(default, deserialize_with = "de_opt")]
    pub icon_color: Option<String>,
    /// Reject nested icon configurations with fewer lists than groups.
    #[serde(default)]
    pub strict_icons: bool,
    /// List base layers only.
    #[serde(default)]
    pub only_raster: bool,
    /// List overlay layers only.
    #[serde(default)]
    pub only_vector: bool,
    /// Header asset locations.
    #[serde(default)]
    pub assets: Assets,
}

impl Default for PanelOptions {
    fn default() -> Self {
        Self {
            title: None,
            raster_group_name: defaults::default_group_name(),
            data_group_name: defaults::default_group_name(),
            groups: Vec::new(),
            group_by: GroupBy::None,
            collapsed: true,
            collapsible_groups: true,
            compact: None,
            icons: None,
            icon_prefix: defaults::default_icon_prefix(),
            icon_color: None,
            strict_icons: false,
            only_raster: false,
            only_vector: false,
            assets: Assets::default(),
        }
    }
}

// Accept either a plain value or an explicit Option<T>.
fn de_opt<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Helper<T> {
        Plain(T),
        Opt(Option<T>),
    }
    match Helper::deserialize(deserializer)? {
        Helper::Plain(v) => Ok(Some(v)),
        Helper::Opt(o) => Ok(o),
    }
}

// Icons go through an untyped value so shape errors carry a useful message.
fn de_opt_icons<'de, D>(deserializer: D) -> Result<Option<IconConfig>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    IconConfig::from_value(&value)
        .map(Some)
        .map_err(de::Error::custom)
}

/// Options forwarded to the widget constructor, in the widget's key style.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetOptions {
    /// Panel title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Panel collapsed at start-up.
    pub collapsed: bool,
    /// Groups can be collapsed individually.
    pub collapsible_groups: bool,
    /// Compact panel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compact: Option<bool>,
}

/// Validated, typed panel settings. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelSettings {
    /// Families listed in the panel.
    pub mode: PanelMode,
    /// Overlay grouping.
    pub grouping: GroupingMode,
    /// Heading of the base-layer group.
    pub raster_group_name: String,
    /// Heading of the synthetic or flat overlay group.
    pub data_group_name: String,
    /// Icons shown next to overlay names.
    pub icons: Option<IconConfig>,
    /// Prefix/color for icons that do not override them.
    pub icon_defaults: IconDefaults,
    /// Fail on missing nested icon lists.
    pub strict_icons: bool,
    /// Widget constructor options.
    pub widget: WidgetOptions,
    /// Header assets.
    pub assets: Assets,
}

impl PanelOptions {
    /// Validate the options and convert them into typed settings.
    pub fn settings(&self) -> Result<PanelSettings, Error> {
        let mode = match (self.only_raster, self.only_vector) {
            (true, true) => return Err(Error::ConflictingModes),
            (true, false) => PanelMode::RasterOnly,
            (false, true) => PanelMode::VectorOnly,
            (false, false) => PanelMode::Full,
        };

        let grouping = match &self.group_by {
            GroupBy::None if self.groups.is_empty() => GroupingMode::None,
            GroupBy::None => GroupingMode::Nested {
                names: self.groups.clone(),
                lists: Vec::new(),
            },
            GroupBy::Flat(layers) => GroupingMode::Flat {
                names: self.groups.clone(),
                layers: layers.clone(),
            },
            GroupBy::Nested(lists) => GroupingMode::Nested {
                names: self.groups.clone(),
                lists: lists.clone(),
            },
        };

        Ok(PanelSettings {
            mode,
            grouping,
            raster_group_name: self.raster_group_name.clone(),
            data_group_name: self.data_group_name.clone(),
            icons: self.icons.clone(),
            icon_defaults: IconDefaults {
                prefix: self.icon_prefix.clone(),
                color: self.icon_color.clone(),
            },
            strict_icons: self.strict_icons,
            widget: WidgetOptions {
                title: self.title.clone(),
                collapsed: self.collapsed,
                collapsible_groups: self.collapsible_groups,
                compact: self.compact,
            },
            assets: self.assets.clone(),
        })
    }
}
