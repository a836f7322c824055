use anyhow::Result;
use tracing::{error, info};

use crate::overlay::OverlayGroup;
use super::{group_entries, parse_catalog, CatalogSource};

/// Fetch, parse and group a catalog.
pub fn try_load_groups(source: &dyn CatalogSource) -> Result<Vec<OverlayGroup>> {
    let bytes = source.fetch()?;
    let groups = group_entries(parse_catalog(&bytes)?);
    info!(source = %source.describe(), groups = groups.len(), "loaded layer catalog");
    Ok(groups)
}

/// Like `try_load_groups`, but a failed fetch or parse is logged and yields no
/// groups at all, leaving the viewer with its basemap only.
pub fn load_groups(source: &dyn CatalogSource) -> Vec<OverlayGroup> {
    try_load_groups(source).unwrap_or_else(|e| {
        error!(source = %source.describe(), "failed to load layer catalog: {e:#}");
        Vec::new()
    })
}
