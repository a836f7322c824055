use geo::Coord;
use tilegrid::{mercator, GridError, LevelOfDetail, TileGridDescriptor, TileIndex};

fn origin() -> Coord<f64> {
    Coord { x: -mercator::HALF_WORLD, y: mercator::HALF_WORLD }
}

fn three_levels() -> Vec<LevelOfDetail> {
    vec![
        LevelOfDetail::new(0, 100.0, 1000.0),
        LevelOfDetail::new(1, 50.0, 500.0),
        LevelOfDetail::new(2, 25.0, 250.0),
    ]
}

#[test]
fn accepts_well_ordered_levels() {
    let grid = TileGridDescriptor::new(96, 256, 256, origin(), 102100, three_levels()).unwrap();
    assert_eq!(grid.min_level(), 0);
    assert_eq!(grid.max_level(), 2);
    assert_eq!(grid.lod(1).unwrap().resolution, 50.0);
    assert!(grid.lod(3).is_none());
}

#[test]
fn levels_may_skip_numbers() {
    let lods = vec![LevelOfDetail::new(3, 10.0, 100.0), LevelOfDetail::new(7, 1.0, 10.0)];
    let grid = TileGridDescriptor::new(96, 256, 256, origin(), 102100, lods).unwrap();
    assert!(grid.lod(5).is_none());
    // Halfway between levels 3 and 7 sits the geometric mean of their resolutions.
    assert!((grid.resolution_at(5.0) - 10f64.sqrt()).abs() < 1e-9);
}

#[test]
fn rejects_empty_table() {
    let err = TileGridDescriptor::new(96, 256, 256, origin(), 102100, vec![]).unwrap_err();
    assert_eq!(err, GridError::Empty);
}

#[test]
fn rejects_zero_tile_size() {
    let err = TileGridDescriptor::new(96, 0, 256, origin(), 102100, three_levels()).unwrap_err();
    assert_eq!(err, GridError::ZeroDimension("rows"));
}

#[test]
fn rejects_repeated_level() {
    let mut lods = three_levels();
    lods[2].level = 1;
    let err = TileGridDescriptor::new(96, 256, 256, origin(), 102100, lods).unwrap_err();
    assert_eq!(err, GridError::LevelOrder { previous: 1, level: 1 });
}

#[test]
fn rejects_growing_resolution() {
    let mut lods = three_levels();
    lods[1].resolution = 200.0;
    let err = TileGridDescriptor::new(96, 256, 256, origin(), 102100, lods).unwrap_err();
    assert_eq!(err, GridError::ResolutionOrder { level: 1 });
}

#[test]
fn rejects_flat_scale() {
    let mut lods = three_levels();
    lods[2].scale = 500.0;
    let err = TileGridDescriptor::new(96, 256, 256, origin(), 102100, lods).unwrap_err();
    assert_eq!(err, GridError::ScaleOrder { level: 2 });
}

#[test]
fn rejects_nan_resolution() {
    let mut lods = three_levels();
    lods[1].resolution = f64::NAN;
    let err = TileGridDescriptor::new(96, 256, 256, origin(), 102100, lods).unwrap_err();
    assert_eq!(err, GridError::ResolutionOrder { level: 1 });
}

#[test]
fn deserializing_checks_invariants() {
    let good = r#"{"dpi":96,"rows":256,"cols":256,"origin":{"x":0.0,"y":0.0},"wkid":3857,
        "lods":[{"level":0,"resolution":2.0,"scale":20.0},{"level":1,"resolution":1.0,"scale":10.0}]}"#;
    let grid: TileGridDescriptor = serde_json::from_str(good).unwrap();
    assert_eq!(grid.wkid(), 3857);

    let bad = r#"{"dpi":96,"rows":256,"cols":256,"origin":{"x":0.0,"y":0.0},"wkid":3857,
        "lods":[{"level":0,"resolution":1.0,"scale":20.0},{"level":1,"resolution":2.0,"scale":10.0}]}"#;
    assert!(serde_json::from_str::<TileGridDescriptor>(bad).is_err());
}

#[test]
fn closest_lod_by_ratio() {
    let grid = TileGridDescriptor::web_mercator();
    let z13 = grid.lod(13).unwrap().resolution;
    assert_eq!(grid.closest_lod(z13 * 1.2).unwrap().level, 13);
    assert_eq!(grid.closest_lod(z13 * 0.8).unwrap().level, 13);
    assert_eq!(grid.closest_lod(1e9).unwrap().level, 0);
    assert!(grid.closest_lod(0.0).is_none());
}

#[test]
fn tile_at_matches_slippy_numbering() {
    let grid = TileGridDescriptor::web_mercator();

    // The whole world is one tile at level 0.
    let center = Coord { x: 0.0, y: 0.0 };
    assert_eq!(grid.tile_at(0, center), Some(TileIndex { level: 0, col: 0, row: 0 }));
    assert_eq!(grid.tile_at(1, center), Some(TileIndex { level: 1, col: 1, row: 1 }));

    // Taipei at level 13 lands on OSM tile 13/6862/3507.
    let taipei = mercator::project(geo::Point::new(121.56, 25.04)).unwrap();
    assert_eq!(grid.tile_at(13, taipei), Some(TileIndex { level: 13, col: 6862, row: 3507 }));
    assert!(grid.tile_at(23, taipei).is_none());
}

#[test]
fn tile_span_doubles_per_level_up() {
    let grid = TileGridDescriptor::web_mercator();
    let (w0, h0) = grid.tile_span(0).unwrap();
    let (w1, _) = grid.tile_span(1).unwrap();
    assert!((w0 - 2.0 * mercator::HALF_WORLD).abs() < 1.0);
    assert_eq!(w0, h0);
    assert!((w0 / w1 - 2.0).abs() < 1e-9);
}
