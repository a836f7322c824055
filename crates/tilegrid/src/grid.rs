use std::{cmp::Ordering, fmt};

use geo::Coord;
use serde::{Deserialize, Serialize};

use crate::{lod::{LevelOfDetail, WEB_MERCATOR_LODS}, mercator::HALF_WORLD};

/// Errors raised when a tiling scheme violates its ordering invariants.
#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    /// The scheme has no levels of detail.
    Empty,
    /// Tile rows/cols or dpi is zero.
    ZeroDimension(&'static str),
    /// Level numbers must strictly increase.
    LevelOrder { previous: u32, level: u32 },
    /// Resolutions must be positive, finite and strictly decreasing.
    ResolutionOrder { level: u32 },
    /// Scales must be positive, finite and strictly decreasing.
    ScaleOrder { level: u32 },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::Empty => write!(f, "tile grid has no levels of detail"),
            GridError::ZeroDimension(what) => write!(f, "tile grid {what} must be non-zero"),
            GridError::LevelOrder { previous, level } =>
                write!(f, "level {level} does not follow level {previous}"),
            GridError::ResolutionOrder { level } =>
                write!(f, "resolution of level {level} is not below the previous level"),
            GridError::ScaleOrder { level } =>
                write!(f, "scale of level {level} is not below the previous level"),
        }
    }
}

impl std::error::Error for GridError {}

/// Column/row address of a tile within one level of a grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileIndex {
    pub level: u32,
    pub col: i64,
    pub row: i64,
}

/// Serialized shape of a grid before its invariants are checked.
#[derive(Deserialize)]
struct RawGrid {
    dpi: u32,
    rows: u32,
    cols: u32,
    origin: Coord<f64>,
    wkid: u32,
    lods: Vec<LevelOfDetail>,
}

/// A tiling scheme shared by every overlay layer: tile size, origin, spatial
/// reference and the ordered levels of detail.
///
/// Levels are strictly increasing while resolution and scale are strictly
/// decreasing. The descriptor is immutable once built, so it is normally
/// wrapped in an `Arc` and handed to every layer that needs it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawGrid")]
pub struct TileGridDescriptor {
    dpi: u32,
    rows: u32,
    cols: u32,
    origin: Coord<f64>,
    wkid: u32,
    lods: Vec<LevelOfDetail>,
}

impl TryFrom<RawGrid> for TileGridDescriptor {
    type Error = GridError;

    fn try_from(raw: RawGrid) -> Result<Self, Self::Error> {
        Self::new(raw.dpi, raw.rows, raw.cols, raw.origin, raw.wkid, raw.lods)
    }
}

impl TileGridDescriptor {
    /// Build a grid, checking tile dimensions and level ordering.
    pub fn new(
        dpi: u32,
        rows: u32,
        cols: u32,
        origin: Coord<f64>,
        wkid: u32,
        lods: Vec<LevelOfDetail>,
    ) -> Result<Self, GridError> {
        if dpi == 0 { return Err(GridError::ZeroDimension("dpi")) }
        if rows == 0 { return Err(GridError::ZeroDimension("rows")) }
        if cols == 0 { return Err(GridError::ZeroDimension("cols")) }

        let first = lods.first().ok_or(GridError::Empty)?;
        if !(first.resolution.is_finite() && first.resolution > 0.0) {
            return Err(GridError::ResolutionOrder { level: first.level });
        }
        if !(first.scale.is_finite() && first.scale > 0.0) {
            return Err(GridError::ScaleOrder { level: first.level });
        }

        for pair in lods.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            if next.level <= prev.level {
                return Err(GridError::LevelOrder { previous: prev.level, level: next.level });
            }
            // `!(a < b)` also rejects NaN.
            if !(next.resolution > 0.0 && next.resolution < prev.resolution) {
                return Err(GridError::ResolutionOrder { level: next.level });
            }
            if !(next.scale > 0.0 && next.scale < prev.scale) {
                return Err(GridError::ScaleOrder { level: next.level });
            }
        }

        Ok(Self { dpi, rows, cols, origin, wkid, lods })
    }

    /// Web Mercator (wkid 102100) grid with 256x256 tiles, levels 0 through 22.
    pub fn web_mercator() -> Self {
        Self {
            dpi: 96,
            rows: 256,
            cols: 256,
            origin: Coord { x: -HALF_WORLD, y: HALF_WORLD },
            wkid: 102100,
            lods: WEB_MERCATOR_LODS.to_vec(),
        }
    }

    #[inline] pub fn dpi(&self) -> u32 { self.dpi }
    #[inline] pub fn rows(&self) -> u32 { self.rows }
    #[inline] pub fn cols(&self) -> u32 { self.cols }
    #[inline] pub fn origin(&self) -> Coord<f64> { self.origin }
    #[inline] pub fn wkid(&self) -> u32 { self.wkid }
    #[inline] pub fn lods(&self) -> &[LevelOfDetail] { &self.lods }

    // `new` guarantees at least one level.
    #[inline] pub fn min_level(&self) -> u32 { self.lods[0].level }
    #[inline] pub fn max_level(&self) -> u32 { self.lods[self.lods.len() - 1].level }

    /// Level of detail with the given level number, if the grid defines it.
    pub fn lod(&self, level: u32) -> Option<&LevelOfDetail> {
        self.lods.binary_search_by_key(&level, |lod| lod.level).ok().map(|i| &self.lods[i])
    }

    /// Level whose resolution is closest (by ratio) to `resolution`.
    pub fn closest_lod(&self, resolution: f64) -> Option<&LevelOfDetail> {
        if !(resolution.is_finite() && resolution > 0.0) { return None }
        let target = resolution.ln();
        self.lods.iter().min_by(|a, b| {
            let da = (a.resolution.ln() - target).abs();
            let db = (b.resolution.ln() - target).abs();
            da.partial_cmp(&db).unwrap_or(Ordering::Equal)
        })
    }

    /// Resolution at a possibly fractional zoom, interpolated geometrically between
    /// the two bracketing levels and clamped to the grid's level range.
    pub fn resolution_at(&self, zoom: f64) -> f64 {
        let zoom = zoom.clamp(self.min_level() as f64, self.max_level() as f64);
        let upper = self.lods.partition_point(|lod| (lod.level as f64) < zoom);
        if upper == 0 { return self.lods[0].resolution }
        let upper = upper.min(self.lods.len() - 1);

        let hi = &self.lods[upper];
        if hi.level as f64 == zoom { return hi.resolution }
        let lo = &self.lods[upper - 1];

        let t = (zoom - lo.level as f64) / (hi.level - lo.level) as f64;
        lo.resolution * (hi.resolution / lo.resolution).powf(t)
    }

    /// Width and height of one tile in map units at `level`.
    pub fn tile_span(&self, level: u32) -> Option<(f64, f64)> {
        self.lod(level).map(|lod| (lod.resolution * self.cols as f64, lod.resolution * self.rows as f64))
    }

    /// Tile containing the map point `xy` at `level`. Rows count downward from the origin.
    pub fn tile_at(&self, level: u32, xy: Coord<f64>) -> Option<TileIndex> {
        if !(xy.x.is_finite() && xy.y.is_finite()) { return None }
        let (width, height) = self.tile_span(level)?;
        let col = ((xy.x - self.origin.x) / width).floor() as i64;
        let row = ((self.origin.y - xy.y) / height).floor() as i64;
        Some(TileIndex { level, col, row })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn web_mercator_levels() {
        let grid = TileGridDescriptor::web_mercator();
        assert_eq!(grid.min_level(), 0);
        assert_eq!(grid.max_level(), 22);
        assert_eq!(grid.lods().len(), 23);
        assert_eq!(grid.wkid(), 102100);
    }

    #[test]
    fn web_mercator_passes_validation() {
        let grid = TileGridDescriptor::web_mercator();
        let rebuilt = TileGridDescriptor::new(
            grid.dpi(), grid.rows(), grid.cols(), grid.origin(), grid.wkid(), grid.lods().to_vec(),
        );
        assert_eq!(rebuilt, Ok(grid));
    }

    #[test]
    fn resolution_at_whole_and_half_levels() {
        let grid = TileGridDescriptor::web_mercator();
        assert_eq!(grid.resolution_at(13.0), grid.lod(13).unwrap().resolution);

        let half = grid.resolution_at(12.5);
        let expected = grid.lod(12).unwrap().resolution / 2f64.sqrt();
        assert!((half - expected).abs() < 1e-9);
    }

    #[test]
    fn resolution_at_clamps_outside_range() {
        let grid = TileGridDescriptor::web_mercator();
        assert_eq!(grid.resolution_at(-3.0), grid.lod(0).unwrap().resolution);
        assert_eq!(grid.resolution_at(40.0), grid.lod(22).unwrap().resolution);
    }
}
