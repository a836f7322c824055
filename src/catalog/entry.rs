use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::overlay::{LayerDescriptor, OverlayGroup};

/// One record of the layer catalog, e.g.
/// `{"ImageType": "Satellite", "Url": "https://a.example/tiles", "ImageName": "Layer A"}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    #[serde(rename = "ImageType")]
    pub category: String,
    #[serde(rename = "Url")]
    pub source_url: String,
    #[serde(rename = "ImageName")]
    pub display_name: String,
}

/// Parse the catalog JSON array. Unknown fields are ignored.
pub fn parse_catalog(bytes: &[u8]) -> Result<Vec<CatalogEntry>> {
    serde_json::from_slice(bytes).context("catalog is not a JSON array of {ImageType, Url, ImageName}")
}

/// Group entries by category, keeping the order in which categories and
/// entries were first seen.
pub fn group_entries(entries: impl IntoIterator<Item = CatalogEntry>) -> Vec<OverlayGroup> {
    let mut grouped: IndexMap<String, Vec<LayerDescriptor>> = IndexMap::new();
    for entry in entries {
        grouped.entry(entry.category)
            .or_default()
            .push(LayerDescriptor::new(entry.source_url, entry.display_name));
    }
    grouped.into_iter()
        .map(|(category, layers)| OverlayGroup::new(category, layers))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_two_satellite_layers_in_order() {
        let entries = parse_catalog(br#"[
            {"ImageType": "Satellite", "Url": "https://a.example/tiles", "ImageName": "Layer A"},
            {"ImageType": "Satellite", "Url": "https://a.example/tiles2", "ImageName": "Layer B"}
        ]"#).unwrap();

        let groups = group_entries(entries);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].category, "Satellite");
        let names: Vec<_> = groups[0].layers.iter().map(|l| l.display_name.as_str()).collect();
        assert_eq!(names, ["Layer A", "Layer B"]);
        assert_eq!(groups[0].layers[1].source_url, "https://a.example/tiles2");
    }

    #[test]
    fn categories_keep_first_seen_order() {
        let entry = |category: &str, name: &str| CatalogEntry {
            category: category.into(),
            source_url: format!("https://x.example/{name}"),
            display_name: name.into(),
        };
        let groups = group_entries([
            entry("Zoning", "z1"),
            entry("Aerial", "a1"),
            entry("Zoning", "z2"),
            entry("Bathymetry", "b1"),
            entry("Aerial", "a2"),
        ]);

        let order: Vec<_> = groups.iter().map(|g| g.category.as_str()).collect();
        assert_eq!(order, ["Zoning", "Aerial", "Bathymetry"]);
        let zoning: Vec<_> = groups[0].layers.iter().map(|l| l.display_name.as_str()).collect();
        assert_eq!(zoning, ["z1", "z2"]);
    }

    #[test]
    fn extra_fields_are_ignored() {
        let entries = parse_catalog(
            br#"[{"ImageType":"DEM","Url":"https://d.example","ImageName":"Height","Year":2024}]"#,
        ).unwrap();
        assert_eq!(entries[0].category, "DEM");
    }

    #[test]
    fn malformed_catalog_is_an_error() {
        assert!(parse_catalog(br#"{"ImageType":"DEM"}"#).is_err());
        assert!(parse_catalog(br#"[{"ImageType":"DEM","Url":"https://d.example"}]"#).is_err());
        assert!(parse_catalog(b"<html>").is_err());
    }
}
