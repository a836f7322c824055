use std::{path::Path, time::Duration};

use ahash::AHashSet;
use anyhow::{bail, Context, Result};
use geo::Point;
use serde::{Deserialize, Serialize};
use tilegrid::TileGridDescriptor;

use crate::{basemap::Basemap, common::Opacity, overlay::PatternRules};

/// Viewer settings. Every field has a default, so `{}` is a complete config.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ViewerConfig {
    /// Initial view center as `[lon, lat]`.
    pub center: [f64; 2],
    pub zoom: f64,
    pub basemaps: Vec<Basemap>,
    pub initial_basemap: String,
    pub basemap_opacity: Opacity,
    pub overlay_opacity: Opacity,
    /// Minimum milliseconds between coordinate readout updates.
    pub pointer_throttle_ms: u64,
    /// File path or HTTP(S) URL of the layer catalog.
    pub catalog: String,
    pub tile_patterns: PatternRules,
    /// Tiling scheme for overlays; Web Mercator levels 0-22 when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid: Option<TileGridDescriptor>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            center: [121.56, 25.04],
            zoom: 13.0,
            basemaps: default_basemaps(),
            initial_basemap: "osm".to_string(),
            basemap_opacity: Opacity::OPAQUE,
            overlay_opacity: Opacity::OVERLAY_DEFAULT,
            pointer_throttle_ms: 50,
            catalog: "./data/wmtslayer.json".to_string(),
            tile_patterns: PatternRules::default(),
            grid: None,
        }
    }
}

/// OpenStreetMap (tiles stop at zoom 19) plus the stock vector and imagery basemaps.
fn default_basemaps() -> Vec<Basemap> {
    vec![
        Basemap::new("osm").with_label("OpenStreetMap").with_alias("OpenStreetMap").with_max_zoom(19.0),
        Basemap::new("satellite").with_label("Imagery"),
        Basemap::new("hybrid").with_label("Imagery Hybrid"),
        Basemap::new("topo-vector").with_label("Topographic"),
        Basemap::new("gray-vector").with_label("Light Gray Canvas"),
        Basemap::new("streets-vector").with_label("Streets"),
    ]
}

impl ViewerConfig {
    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text).context("invalid viewer config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("in {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        let mut seen = AHashSet::new();
        for basemap in &self.basemaps {
            if !seen.insert(basemap.id.as_str()) {
                bail!("duplicate basemap id: {}", basemap.id);
            }
        }
        if !self.basemaps.iter().any(|b| b.matches(&self.initial_basemap)) {
            bail!("initial basemap {:?} is not in the basemap list", self.initial_basemap);
        }
        let [lon, lat] = self.center;
        if !(lon.is_finite() && lat.is_finite()) || lon.abs() > 180.0 || lat.abs() > 90.0 {
            bail!("center [{lon}, {lat}] is not a valid lon/lat");
        }
        if !self.zoom.is_finite() {
            bail!("zoom must be a finite number");
        }
        Ok(())
    }

    pub fn center_point(&self) -> Point<f64> { Point::new(self.center[0], self.center[1]) }

    pub fn pointer_throttle(&self) -> Duration { Duration::from_millis(self.pointer_throttle_ms) }

    pub fn grid(&self) -> TileGridDescriptor {
        self.grid.clone().unwrap_or_else(TileGridDescriptor::web_mercator)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use crate::overlay::TilePattern;

    #[test]
    fn empty_object_is_the_default() {
        let config = ViewerConfig::from_json_str("{}").unwrap();
        assert_eq!(config, ViewerConfig::default());
        assert_eq!(config.pointer_throttle(), Duration::from_millis(50));
        assert_eq!(config.grid().max_level(), 22);
    }

    #[test]
    fn osm_is_clamped_to_19() {
        let config = ViewerConfig::default();
        let osm = config.basemaps.iter().find(|b| b.matches("OpenStreetMap")).unwrap();
        assert_eq!(osm.max_zoom, Some(19.0));
    }

    #[test]
    fn partial_overrides() {
        let config = ViewerConfig::from_json_str(r#"{
            "zoom": 8,
            "overlay_opacity": 0.5,
            "tile_patterns": {"rules": [{"prefix": "https://xyz.example/", "pattern": "zxy"}]}
        }"#).unwrap();
        assert_eq!(config.zoom, 8.0);
        assert_eq!(config.overlay_opacity.value(), 0.5);
        assert_eq!(config.tile_patterns.resolve("https://xyz.example/a"), &TilePattern::Zxy);
        assert_eq!(config.initial_basemap, "osm");
    }

    #[test]
    fn rejects_unknown_initial_basemap() {
        let err = ViewerConfig::from_json_str(r#"{"initial_basemap": "moon"}"#).unwrap_err();
        assert!(err.to_string().contains("moon"));
    }

    #[test]
    fn rejects_duplicate_basemaps() {
        assert!(ViewerConfig::from_json_str(r#"{"basemaps": [{"id": "a"}, {"id": "a"}], "initial_basemap": "a"}"#).is_err());
    }

    #[test]
    fn rejects_out_of_range_opacity_and_unknown_keys() {
        assert!(ViewerConfig::from_json_str(r#"{"basemap_opacity": 4}"#).is_err());
        assert!(ViewerConfig::from_json_str(r#"{"zooom": 4}"#).is_err());
    }

    #[test]
    fn reads_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"catalog": "https://a.example/wmtslayer.json"}}"#).unwrap();
        let config = ViewerConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.catalog, "https://a.example/wmtslayer.json");
    }
}
