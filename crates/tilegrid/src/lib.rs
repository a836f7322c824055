pub mod grid;
pub mod lod;
pub mod mercator;

pub use grid::{GridError, TileGridDescriptor, TileIndex};
pub use lod::LevelOfDetail;
