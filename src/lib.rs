#![doc = "Tilescope public API"]
mod basemap;
mod catalog;
mod common;
mod config;
mod engine;
mod overlay;
mod pointer;
mod viewer;

pub use tilegrid;

#[doc(inline)]
pub use basemap::{ActiveBasemap, Basemap, BasemapController, Lifecycle};

#[doc(inline)]
pub use catalog::{catalog_source, group_entries, load_groups, parse_catalog, try_load_groups};

#[doc(inline)]
pub use catalog::{CatalogEntry, CatalogSource, FileCatalog, MemCatalog};

#[cfg(feature = "download")]
#[doc(inline)]
pub use catalog::HttpCatalog;

#[doc(inline)]
pub use common::{format_lon_lat, Opacity};

#[doc(inline)]
pub use config::ViewerConfig;

#[doc(inline)]
pub use engine::{
    EngineError, LayerHandle, MapEngine, MemEngine, MemLayer, Readiness, ScreenPoint, TileLayerSpec,
    TransitionTicket, ViewState,
};

#[doc(inline)]
pub use overlay::{
    ActiveOverlayLayer, GroupState, LayerDescriptor, OverlayGroup, OverlayRegistry, PatternRule, PatternRules,
    TilePattern,
};

#[doc(inline)]
pub use pointer::{PointerReporter, Sample, DEFAULT_THROTTLE};

#[doc(inline)]
pub use viewer::{Event, Viewer};
