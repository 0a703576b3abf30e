// Defaults and constants for panel options

/// Heading used when no group name is configured.
pub(crate) const GROUP_NAME: &str = " ";

/// Default icon style prefix.
pub(crate) const ICON_PREFIX: &str = "fa";

// Widget assets
pub(crate) const PANEL_CSS: &str =
    "https://unpkg.com/leaflet-panel-layers@1.3.1/dist/leaflet-panel-layers.min.css";
pub(crate) const PANEL_JS: &str =
    "https://unpkg.com/leaflet-panel-layers@1.3.1/dist/leaflet-panel-layers.min.js";
pub(crate) const ICON_FONT_CSS: &str =
    "https://cdnjs.cloudflare.com/ajax/libs/font-awesome/4.7.0/css/font-awesome.min.css";

// Serde default functions
pub(crate) fn default_group_name() -> String {
    GROUP_NAME.to_string()
}
pub(crate) fn default_icon_prefix() -> String {
    ICON_PREFIX.to_string()
}
pub(crate) const fn default_true() -> bool {
    true
}
pub(crate) fn default_panel_css() -> String {
    PANEL_CSS.to_string()
}
pub(crate) fn default_panel_js() -> String {
    PANEL_JS.to_string()
}
pub(crate) fn default_icon_font_css() -> String {
    ICON_FONT_CSS.to_string()
}
