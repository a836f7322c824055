use std::sync::Arc;

use ahash::AHashSet;
use geo::{Coord, Point};
use tilegrid::{mercator, TileGridDescriptor};

use crate::{basemap::Basemap, common::Opacity};
use super::{EngineError, LayerHandle, MapEngine, Readiness, ScreenPoint, TileLayerSpec, TransitionTicket, ViewState};

/// An overlay layer attached to a `MemEngine`.
#[derive(Clone, Debug, PartialEq)]
pub struct MemLayer {
    pub handle: LayerHandle,
    pub spec: TileLayerSpec,
    pub opacity: Opacity,
}

#[derive(Clone, Debug, PartialEq)]
struct MemBasemap {
    id: String,
    ready: bool,
    opacity: Option<Opacity>,
}

/// Headless engine keeping its layer collection in memory.
///
/// Useful for tests and scripted sessions: basemaps can be marked as loading
/// asynchronously (`with_deferred_basemap`) or as lacking an opacity property
/// (`with_opaque_basemap`), and zoom requests are recorded until settled.
#[derive(Clone, Debug)]
pub struct MemEngine {
    grid: Arc<TileGridDescriptor>,
    view: ViewState,
    next_handle: u32,
    layers: Vec<MemLayer>,
    basemap: Option<MemBasemap>,
    deferred: AHashSet<String>,
    opaque: AHashSet<String>,
    zoom_requests: Vec<(TransitionTicket, f64)>,
}

impl MemEngine {
    /// Web Mercator engine centered on `center` (lon/lat) at `zoom`, with a 1024x768 viewport.
    pub fn new(center: Point<f64>, zoom: f64) -> Self {
        Self::with_grid(Arc::new(TileGridDescriptor::web_mercator()), center, zoom)
    }

    pub fn with_grid(grid: Arc<TileGridDescriptor>, center: Point<f64>, zoom: f64) -> Self {
        Self {
            grid,
            view: ViewState { zoom, center, width: 1024.0, height: 768.0 },
            next_handle: 1,
            layers: Vec::new(),
            basemap: None,
            deferred: AHashSet::new(),
            opaque: AHashSet::new(),
            zoom_requests: Vec::new(),
        }
    }

    /// Basemap `id` reports `Pending` on activation until `mark_ready` is called.
    pub fn with_deferred_basemap(mut self, id: impl Into<String>) -> Self {
        self.deferred.insert(id.into());
        self
    }

    /// Basemap `id` rejects opacity changes.
    pub fn with_opaque_basemap(mut self, id: impl Into<String>) -> Self {
        self.opaque.insert(id.into());
        self
    }

    pub fn with_viewport(mut self, width: f64, height: f64) -> Self {
        self.view.width = width;
        self.view.height = height;
        self
    }

    pub fn set_zoom(&mut self, zoom: f64) { self.view.zoom = zoom }
    pub fn set_center(&mut self, center: Point<f64>) { self.view.center = center }

    /// Finish loading the active basemap. Returns false if `id` is not the active basemap.
    pub fn mark_ready(&mut self, id: &str) -> bool {
        match self.basemap.as_mut() {
            Some(basemap) if basemap.id == id => { basemap.ready = true; true }
            _ => false,
        }
    }

    /// Resolve a recorded zoom request, applying the zoom on success.
    /// Only the newest request can succeed; older ones come back superseded.
    pub fn settle_zoom(&mut self, ticket: TransitionTicket) -> Result<(), EngineError> {
        let latest = self.zoom_requests.iter().map(|(t, _)| *t).max();
        let Some(&(_, zoom)) = self.zoom_requests.iter().find(|(t, _)| *t == ticket) else {
            return Err(EngineError::TransitionFailed(format!("unknown transition {ticket}")));
        };
        if latest != Some(ticket) { return Err(EngineError::Superseded) }

        self.view.zoom = zoom;
        Ok(())
    }

    /// Overlay layers in attachment order.
    pub fn layers(&self) -> &[MemLayer] { &self.layers }

    pub fn layer(&self, handle: LayerHandle) -> Option<&MemLayer> {
        self.layers.iter().find(|layer| layer.handle == handle)
    }

    pub fn basemap_id(&self) -> Option<&str> { self.basemap.as_ref().map(|b| b.id.as_str()) }

    pub fn basemap_ready(&self) -> bool { self.basemap.as_ref().is_some_and(|b| b.ready) }

    /// Opacity actually set on the basemap layer, if any has been.
    pub fn basemap_opacity(&self) -> Option<Opacity> { self.basemap.as_ref().and_then(|b| b.opacity) }

    pub fn zoom_requests(&self) -> &[(TransitionTicket, f64)] { &self.zoom_requests }
}

impl MapEngine for MemEngine {
    fn view(&self) -> ViewState { self.view }

    fn activate_basemap(&mut self, basemap: &Basemap) -> Readiness {
        let ready = !self.deferred.contains(&basemap.id);
        self.basemap = Some(MemBasemap { id: basemap.id.clone(), ready, opacity: None });
        if ready { Readiness::Ready } else { Readiness::Pending }
    }

    fn set_basemap_opacity(&mut self, opacity: Opacity) -> Result<(), EngineError> {
        let Some(basemap) = self.basemap.as_mut() else { return Ok(()) };
        if self.opaque.contains(&basemap.id) { return Err(EngineError::OpacityUnsupported) }
        // An unloaded layer has no sub-layers to take the value.
        if basemap.ready { basemap.opacity = Some(opacity) }
        Ok(())
    }

    fn request_zoom(&mut self, ticket: TransitionTicket, zoom: f64) {
        self.zoom_requests.push((ticket, zoom));
    }

    fn add_layer(&mut self, spec: &TileLayerSpec) -> LayerHandle {
        let handle = LayerHandle(self.next_handle);
        self.next_handle += 1;
        self.layers.push(MemLayer { handle, spec: spec.clone(), opacity: spec.opacity });
        handle
    }

    fn remove_layer(&mut self, handle: LayerHandle) {
        self.layers.retain(|layer| layer.handle != handle);
    }

    fn set_layer_opacity(&mut self, handle: LayerHandle, opacity: Opacity) {
        if let Some(layer) = self.layers.iter_mut().find(|layer| layer.handle == handle) {
            layer.opacity = opacity;
        }
    }

    fn to_map(&self, point: ScreenPoint) -> Option<Point<f64>> {
        let center = mercator::project(self.view.center)?;
        let resolution = self.grid.resolution_at(self.view.zoom);
        let xy = Coord {
            x: center.x + (point.x - self.view.width / 2.0) * resolution,
            y: center.y - (point.y - self.view.height / 2.0) * resolution,
        };
        mercator::unproject(xy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn taipei() -> MemEngine { MemEngine::new(Point::new(121.56, 25.04), 13.0) }

    #[test]
    fn viewport_center_maps_to_view_center() {
        let engine = taipei();
        let p = engine.to_map(ScreenPoint::new(512.0, 384.0)).unwrap();
        assert!((p.x() - 121.56).abs() < 1e-9);
        assert!((p.y() - 25.04).abs() < 1e-9);
    }

    #[test]
    fn right_of_center_is_east() {
        let engine = taipei();
        let p = engine.to_map(ScreenPoint::new(612.0, 384.0)).unwrap();
        assert!(p.x() > 121.56);
        assert!((p.y() - 25.04).abs() < 1e-9);
    }

    #[test]
    fn beyond_the_world_edge_has_no_position() {
        let engine = MemEngine::new(Point::new(179.9, 0.0), 2.0);
        assert!(engine.to_map(ScreenPoint::new(1024.0, 384.0)).is_none());
    }

    #[test]
    fn deferred_basemap_ignores_opacity_until_ready() {
        let mut engine = taipei().with_deferred_basemap("satellite");
        assert_eq!(engine.activate_basemap(&Basemap::new("satellite")), Readiness::Pending);
        engine.set_basemap_opacity(Opacity::TRANSPARENT).unwrap();
        assert_eq!(engine.basemap_opacity(), None);

        assert!(engine.mark_ready("satellite"));
        engine.set_basemap_opacity(Opacity::TRANSPARENT).unwrap();
        assert_eq!(engine.basemap_opacity(), Some(Opacity::TRANSPARENT));
    }

    #[test]
    fn only_the_newest_zoom_request_lands() {
        let mut engine = taipei();
        engine.request_zoom(TransitionTicket(1), 19.0);
        engine.request_zoom(TransitionTicket(2), 18.0);
        assert_eq!(engine.settle_zoom(TransitionTicket(1)), Err(EngineError::Superseded));
        assert_eq!(engine.settle_zoom(TransitionTicket(2)), Ok(()));
        assert_eq!(engine.view().zoom, 18.0);
    }
}
