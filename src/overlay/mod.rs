mod group;
mod pattern;
mod registry;

pub use group::{LayerDescriptor, OverlayGroup};
pub use pattern::{PatternRule, PatternRules, TilePattern};
pub use registry::{ActiveOverlayLayer, GroupState, OverlayRegistry};
