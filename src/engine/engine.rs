use std::{fmt, sync::Arc};

use geo::Point;
use serde::{Deserialize, Serialize};
use tilegrid::TileGridDescriptor;

use crate::{basemap::Basemap, common::Opacity};

/// Identifies an overlay layer attached to the engine's layer collection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayerHandle(pub u32);

impl fmt::Display for LayerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LayerHandle({})", self.0)
    }
}

/// Identifies one zoom-clamp request. Tickets increase monotonically, so a
/// larger ticket always supersedes a smaller one.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TransitionTicket(pub u64);

impl fmt::Display for TransitionTicket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Whether a freshly activated basemap can take property changes yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    /// The engine will signal readiness later (see `BasemapController::on_ready`).
    Pending,
}

/// Pointer position in viewport pixels, origin at the top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self { Self { x, y } }
}

/// Snapshot of the engine's view. Read, never owned, by the controllers.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewState {
    pub zoom: f64,
    /// Longitude/latitude of the view center.
    pub center: Point<f64>,
    /// Viewport size in pixels.
    pub width: f64,
    pub height: f64,
}

/// Everything the engine needs to build one overlay tile layer.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TileLayerSpec {
    /// Source URL with the `{z}`/`{x}`/`{y}` suffix already substituted in.
    pub url_template: String,
    pub tile_info: Arc<TileGridDescriptor>,
    pub wkid: u32,
    pub cross_origin: &'static str,
    pub opacity: Opacity,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    /// The basemap's first visual layer has no opacity property.
    #[error("active basemap layer does not support opacity")]
    OpacityUnsupported,

    /// A later view transition replaced this one.
    #[error("view transition was superseded")]
    Superseded,

    #[error("view transition failed: {0}")]
    TransitionFailed(String),
}

/// The map-rendering engine as seen by the viewer: a live layer collection,
/// one basemap slot and a view.
///
/// Implementations are driven from a single owner (`Viewer`), so none of these
/// calls race with each other. Asynchronous engine work (basemap loading, view
/// transitions) is reported back through the viewer's `on_*` events.
pub trait MapEngine {
    fn view(&self) -> ViewState;

    /// Replace the current basemap with `basemap`.
    fn activate_basemap(&mut self, basemap: &Basemap) -> Readiness;

    /// Set the opacity of the active basemap's first visual layer.
    fn set_basemap_opacity(&mut self, opacity: Opacity) -> Result<(), EngineError>;

    /// Start an animated zoom change. The outcome arrives later tagged with `ticket`.
    fn request_zoom(&mut self, ticket: TransitionTicket, zoom: f64);

    fn add_layer(&mut self, spec: &TileLayerSpec) -> LayerHandle;
    fn remove_layer(&mut self, handle: LayerHandle);
    fn set_layer_opacity(&mut self, handle: LayerHandle, opacity: Opacity);

    /// Convert a viewport point to lon/lat; `None` outside the projection's valid range.
    fn to_map(&self, point: ScreenPoint) -> Option<Point<f64>>;
}
