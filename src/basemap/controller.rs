use anyhow::{anyhow, bail, Result};
use tracing::{debug, info};

use crate::{
    common::Opacity,
    engine::{EngineError, MapEngine, Readiness, TransitionTicket},
};
use super::Basemap;

/// Loading state of the active basemap. Opacity is only pushed to the engine once `Ready`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Lifecycle {
    Pending,
    Ready,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ActiveBasemap {
    index: usize,
    lifecycle: Lifecycle,
    applied: Option<Opacity>,
}

impl ActiveBasemap {
    #[inline] pub fn lifecycle(&self) -> Lifecycle { self.lifecycle }

    /// Opacity last accepted by the engine for this activation.
    #[inline] pub fn applied_opacity(&self) -> Option<Opacity> { self.applied }
}

/// Owns the active basemap, the basemap opacity slider and the zoom clamp.
#[derive(Debug)]
pub struct BasemapController {
    basemaps: Vec<Basemap>,
    active: ActiveBasemap,
    slider: Opacity,
    next_ticket: u64,
    /// Only the outcome of this request is observed.
    latest_clamp: Option<(TransitionTicket, f64)>,
}

impl BasemapController {
    /// Activate `initial` on `engine` with the slider at `opacity`.
    pub fn new(basemaps: Vec<Basemap>, initial: &str, opacity: Opacity, engine: &mut impl MapEngine) -> Result<Self> {
        if basemaps.is_empty() { bail!("at least one basemap is required") }
        let index = Self::position(&basemaps, initial)?;

        let mut controller = Self {
            basemaps,
            active: ActiveBasemap { index, lifecycle: Lifecycle::Pending, applied: None },
            slider: opacity,
            next_ticket: 0,
            latest_clamp: None,
        };
        controller.activate(index, engine);
        Ok(controller)
    }

    fn position(basemaps: &[Basemap], id: &str) -> Result<usize> {
        basemaps.iter().position(|b| b.matches(id))
            .ok_or_else(|| anyhow!("unknown basemap: {id}"))
    }

    pub fn basemaps(&self) -> &[Basemap] { &self.basemaps }
    pub fn active(&self) -> &Basemap { &self.basemaps[self.active.index] }
    pub fn state(&self) -> &ActiveBasemap { &self.active }
    pub fn lifecycle(&self) -> Lifecycle { self.active.lifecycle }
    pub fn slider(&self) -> Opacity { self.slider }
    pub fn pending_clamp(&self) -> Option<(TransitionTicket, f64)> { self.latest_clamp }

    /// Swap the active basemap for `id`.
    ///
    /// Returns the ticket of the zoom clamp requested when the current view is
    /// zoomed in past the new basemap's `max_zoom`.
    pub fn select(&mut self, id: &str, engine: &mut impl MapEngine) -> Result<Option<TransitionTicket>> {
        let index = Self::position(&self.basemaps, id)?;
        info!(basemap = %self.basemaps[index].id, "selecting basemap");
        Ok(self.activate(index, engine))
    }

    fn activate(&mut self, index: usize, engine: &mut impl MapEngine) -> Option<TransitionTicket> {
        let readiness = engine.activate_basemap(&self.basemaps[index]);
        self.active = ActiveBasemap {
            index,
            lifecycle: match readiness {
                Readiness::Ready => Lifecycle::Ready,
                Readiness::Pending => Lifecycle::Pending,
            },
            applied: None,
        };

        match self.active.lifecycle {
            Lifecycle::Ready => self.apply(engine),
            Lifecycle::Pending => debug!(basemap = %self.active().id, "deferring opacity until basemap is ready"),
        }

        let zoom = engine.view().zoom;
        let target = self.basemaps[index].clamp_target(zoom)?;
        let ticket = TransitionTicket(self.next_ticket);
        self.next_ticket += 1;
        self.latest_clamp = Some((ticket, target));
        debug!(%ticket, from = zoom, to = target, "clamping zoom to basemap maximum");
        engine.request_zoom(ticket, target);
        Some(ticket)
    }

    /// Move the slider; non-numeric input (NaN) counts as fully opaque.
    pub fn set_opacity(&mut self, value: f64, engine: &mut impl MapEngine) -> Opacity {
        self.slider = Opacity::new(value, Opacity::OPAQUE);
        match self.active.lifecycle {
            Lifecycle::Ready => self.apply(engine),
            Lifecycle::Pending => debug!(opacity = %self.slider, "basemap still loading, opacity deferred"),
        }
        self.slider
    }

    /// The engine finished loading basemap `id`. Ignored unless `id` is the active,
    /// still-pending basemap. Returns true if the deferred opacity was applied.
    pub fn on_ready(&mut self, id: &str, engine: &mut impl MapEngine) -> bool {
        if !self.active().matches(id) || self.active.lifecycle == Lifecycle::Ready {
            debug!(basemap = id, "ignoring ready signal");
            return false;
        }
        self.active.lifecycle = Lifecycle::Ready;
        self.apply(engine);
        true
    }

    /// A zoom clamp finished. Outcomes of superseded requests are ignored; failures
    /// are logged and dropped. Returns true if `ticket` was the outstanding request.
    pub fn on_transition_settled(&mut self, ticket: TransitionTicket, outcome: Result<(), EngineError>) -> bool {
        match self.latest_clamp {
            Some((latest, _)) if latest == ticket => {
                self.latest_clamp = None;
                if let Err(e) = outcome { debug!(%ticket, error = %e, "zoom clamp did not complete") }
                true
            }
            _ => {
                debug!(%ticket, "ignoring stale zoom transition");
                false
            }
        }
    }

    fn apply(&mut self, engine: &mut impl MapEngine) {
        match engine.set_basemap_opacity(self.slider) {
            Ok(()) => self.active.applied = Some(self.slider),
            Err(EngineError::OpacityUnsupported) => {}
            Err(e) => debug!(error = %e, "basemap opacity not applied"),
        }
    }
}

#[cfg(test)]
mod tests {
    use geo::Point;

    use super::*;
    use crate::engine::MemEngine;

    fn basemaps() -> Vec<Basemap> {
        vec![
            Basemap::new("osm").with_alias("OpenStreetMap").with_max_zoom(19.0),
            Basemap::new("satellite"),
            Basemap::new("vector"),
        ]
    }

    fn engine_at(zoom: f64) -> MemEngine {
        MemEngine::new(Point::new(121.56, 25.04), zoom)
    }

    #[test]
    fn initial_basemap_takes_slider_value() {
        let mut engine = engine_at(13.0);
        let controller = BasemapController::new(basemaps(), "osm", Opacity::new(0.6, Opacity::OPAQUE), &mut engine).unwrap();
        assert_eq!(controller.lifecycle(), Lifecycle::Ready);
        assert_eq!(engine.basemap_id(), Some("osm"));
        assert_eq!(engine.basemap_opacity().map(Opacity::value), Some(0.6));
    }

    #[test]
    fn unknown_initial_basemap_is_an_error() {
        let mut engine = engine_at(13.0);
        assert!(BasemapController::new(basemaps(), "nope", Opacity::OPAQUE, &mut engine).is_err());
    }

    #[test]
    fn unknown_selection_changes_nothing() {
        let mut engine = engine_at(13.0);
        let mut controller = BasemapController::new(basemaps(), "satellite", Opacity::OPAQUE, &mut engine).unwrap();
        assert!(controller.select("nope", &mut engine).is_err());
        assert_eq!(controller.active().id, "satellite");
        assert_eq!(engine.basemap_id(), Some("satellite"));
    }

    #[test]
    fn alias_selects_basemap() {
        let mut engine = engine_at(13.0);
        let mut controller = BasemapController::new(basemaps(), "satellite", Opacity::OPAQUE, &mut engine).unwrap();
        controller.select("OpenStreetMap", &mut engine).unwrap();
        assert_eq!(controller.active().id, "osm");
    }

    #[test]
    fn clamps_zoom_once_when_past_max() {
        let mut engine = engine_at(21.0);
        let mut controller = BasemapController::new(basemaps(), "satellite", Opacity::OPAQUE, &mut engine).unwrap();
        assert!(engine.zoom_requests().is_empty());

        let ticket = controller.select("osm", &mut engine).unwrap();
        assert!(ticket.is_some());
        assert_eq!(engine.zoom_requests(), &[(ticket.unwrap(), 19.0)]);
    }

    #[test]
    fn no_clamp_at_or_below_max() {
        let mut engine = engine_at(19.0);
        let mut controller = BasemapController::new(basemaps(), "satellite", Opacity::OPAQUE, &mut engine).unwrap();
        assert_eq!(controller.select("osm", &mut engine).unwrap(), None);
        assert!(engine.zoom_requests().is_empty());
    }

    #[test]
    fn pending_basemap_gets_latest_slider_value_on_ready() {
        let mut engine = engine_at(13.0).with_deferred_basemap("satellite");
        let mut controller = BasemapController::new(basemaps(), "osm", Opacity::OPAQUE, &mut engine).unwrap();

        controller.set_opacity(0.4, &mut engine);
        controller.select("satellite", &mut engine).unwrap();
        assert_eq!(controller.lifecycle(), Lifecycle::Pending);
        assert_eq!(engine.basemap_opacity(), None);

        controller.set_opacity(0.2, &mut engine);
        assert_eq!(controller.state().applied_opacity(), None);

        engine.mark_ready("satellite");
        assert!(controller.on_ready("satellite", &mut engine));
        assert_eq!(engine.basemap_opacity().map(Opacity::value), Some(0.2));
        assert_eq!(controller.state().applied_opacity().map(Opacity::value), Some(0.2));
    }

    #[test]
    fn ready_signal_for_replaced_basemap_is_ignored() {
        let mut engine = engine_at(13.0).with_deferred_basemap("satellite");
        let mut controller = BasemapController::new(basemaps(), "osm", Opacity::OPAQUE, &mut engine).unwrap();
        controller.select("satellite", &mut engine).unwrap();
        controller.select("vector", &mut engine).unwrap();

        assert!(!controller.on_ready("satellite", &mut engine));
        assert_eq!(controller.active().id, "vector");
        assert_eq!(controller.lifecycle(), Lifecycle::Ready);
    }

    #[test]
    fn unsupported_opacity_is_silent() {
        let mut engine = engine_at(13.0).with_opaque_basemap("vector");
        let mut controller = BasemapController::new(basemaps(), "vector", Opacity::OPAQUE, &mut engine).unwrap();
        let shown = controller.set_opacity(0.3, &mut engine);
        assert_eq!(shown.value(), 0.3);
        assert_eq!(controller.state().applied_opacity(), None);
        assert_eq!(engine.basemap_opacity(), None);
    }

    #[test]
    fn non_numeric_opacity_means_opaque() {
        let mut engine = engine_at(13.0);
        let mut controller = BasemapController::new(basemaps(), "osm", Opacity::OPAQUE, &mut engine).unwrap();
        controller.set_opacity(0.3, &mut engine);
        assert_eq!(controller.set_opacity(f64::NAN, &mut engine), Opacity::OPAQUE);
        assert_eq!(engine.basemap_opacity(), Some(Opacity::OPAQUE));
    }

    #[test]
    fn only_latest_clamp_is_observed() {
        let mut engine = engine_at(21.0);
        let mut controller = BasemapController::new(basemaps(), "satellite", Opacity::OPAQUE, &mut engine).unwrap();
        let first = controller.select("osm", &mut engine).unwrap().unwrap();
        let second = controller.select("osm", &mut engine).unwrap().unwrap();
        assert!(second > first);

        assert!(!controller.on_transition_settled(first, Err(EngineError::Superseded)));
        assert_eq!(controller.pending_clamp().map(|(t, _)| t), Some(second));

        assert!(controller.on_transition_settled(second, Err(EngineError::TransitionFailed("interrupted".into()))));
        assert_eq!(controller.pending_clamp(), None);
        // Failures are not retried.
        assert_eq!(engine.zoom_requests().len(), 2);
    }
}
