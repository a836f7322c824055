use serde::{Deserialize, Serialize};

/// A selectable background map.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Basemap {
    pub id: String,

    /// Human-readable name for selector controls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Other ids the selector may send for this basemap, e.g. "OpenStreetMap" for "osm".
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub aliases: Vec<String>,

    /// Highest zoom the basemap has tiles for.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_zoom: Option<f64>,
}

impl Basemap {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), label: None, aliases: Vec::new(), max_zoom: None }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn with_max_zoom(mut self, max_zoom: f64) -> Self {
        self.max_zoom = Some(max_zoom);
        self
    }

    /// True if `id` names this basemap, directly or through an alias.
    pub fn matches(&self, id: &str) -> bool {
        self.id == id || self.aliases.iter().any(|alias| alias == id)
    }

    /// Zoom the view must be clamped to, if `zoom` is past this basemap's limit.
    pub fn clamp_target(&self, zoom: f64) -> Option<f64> {
        self.max_zoom.filter(|&max| zoom > max)
    }
}
