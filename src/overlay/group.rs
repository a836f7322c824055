use serde::{Deserialize, Serialize};

/// One choice in a group's layer selector.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerDescriptor {
    pub source_url: String,
    pub display_name: String,
}

impl LayerDescriptor {
    pub fn new(source_url: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self { source_url: source_url.into(), display_name: display_name.into() }
    }
}

/// Overlay layers sharing an image type, in catalog order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverlayGroup {
    pub category: String,
    pub layers: Vec<LayerDescriptor>,
}

impl OverlayGroup {
    pub fn new(category: impl Into<String>, layers: Vec<LayerDescriptor>) -> Self {
        Self { category: category.into(), layers }
    }

    pub fn find(&self, source_url: &str) -> Option<&LayerDescriptor> {
        self.layers.iter().find(|layer| layer.source_url == source_url)
    }
}
