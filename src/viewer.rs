use std::{sync::Arc, time::Duration};

use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::{
    basemap::BasemapController,
    catalog::{load_groups, CatalogSource},
    common::Opacity,
    config::ViewerConfig,
    engine::{EngineError, MapEngine, ScreenPoint, TransitionTicket},
    overlay::{GroupState, OverlayGroup, OverlayRegistry},
    pointer::{PointerReporter, Sample},
};

/// A user action or engine completion, in serializable form.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    SelectBasemap { id: String },
    /// `value: null` stands for a non-numeric slider reading.
    BasemapOpacity { value: Option<f64> },
    BasemapReady { id: String },
    TransitionSettled {
        ticket: u64,
        #[serde(default)]
        error: Option<String>,
    },
    SelectOverlay {
        group: String,
        #[serde(default)]
        source: Option<String>,
    },
    OverlayOpacity { group: String, value: Option<f64> },
    ClearOverlay { group: String },
    PointerMove { at_ms: f64, x: f64, y: f64 },
}

/// Owns the map engine together with the basemap, overlay and pointer state.
///
/// Every mutation of the engine's layer collection goes through `&mut self`,
/// so a viewer has exactly one writer at a time.
pub struct Viewer<E: MapEngine> {
    engine: E,
    basemaps: BasemapController,
    overlays: OverlayRegistry,
    pointer: PointerReporter,
}

impl<E: MapEngine> Viewer<E> {
    /// Activate the configured basemap on `engine` and show the view center in the readout.
    pub fn new(mut engine: E, config: &ViewerConfig) -> Result<Self> {
        config.validate()?;
        let basemaps = BasemapController::new(
            config.basemaps.clone(),
            &config.initial_basemap,
            config.basemap_opacity,
            &mut engine,
        )?;
        let overlays = OverlayRegistry::new(
            Arc::new(config.grid()),
            config.tile_patterns.clone(),
            config.overlay_opacity,
        );
        let mut pointer = PointerReporter::new(config.pointer_throttle());
        pointer.show_center(&engine.view());

        Ok(Self { engine, basemaps, overlays, pointer })
    }

    pub fn engine(&self) -> &E { &self.engine }
    pub fn engine_mut(&mut self) -> &mut E { &mut self.engine }
    pub fn basemaps(&self) -> &BasemapController { &self.basemaps }
    pub fn overlays(&self) -> &OverlayRegistry { &self.overlays }

    /// Replace the overlay groups with the catalog's. A failed load leaves no groups.
    pub fn load_catalog(&mut self, source: &dyn CatalogSource) -> usize {
        let groups = load_groups(source);
        let count = groups.len();
        self.set_groups(groups);
        count
    }

    pub fn set_groups(&mut self, groups: Vec<OverlayGroup>) {
        self.overlays.replace_groups(groups, &mut self.engine);
    }

    pub fn groups(&self) -> impl Iterator<Item = &OverlayGroup> + '_ { self.overlays.groups() }

    pub fn select_basemap(&mut self, id: &str) -> Result<Option<TransitionTicket>> {
        self.basemaps.select(id, &mut self.engine)
    }

    pub fn set_basemap_opacity(&mut self, value: f64) -> Opacity {
        self.basemaps.set_opacity(value, &mut self.engine)
    }

    pub fn on_basemap_ready(&mut self, id: &str) -> bool {
        self.basemaps.on_ready(id, &mut self.engine)
    }

    pub fn on_transition_settled(&mut self, ticket: TransitionTicket, outcome: Result<(), EngineError>) -> bool {
        self.basemaps.on_transition_settled(ticket, outcome)
    }

    pub fn select_overlay(&mut self, group: &str, source_url: Option<&str>) -> Result<&GroupState> {
        self.overlays.select_layer(group, source_url, &mut self.engine)
    }

    pub fn set_overlay_opacity(&mut self, group: &str, value: f64) -> Result<Opacity> {
        self.overlays.set_opacity(group, value, &mut self.engine)
    }

    pub fn clear_overlay(&mut self, group: &str) -> Result<()> {
        self.overlays.clear(group, &mut self.engine)
    }

    pub fn pointer_moved(&mut self, at: Duration, point: ScreenPoint) -> Sample {
        self.pointer.sample(at, point, &self.engine)
    }

    pub fn readout(&self) -> Option<&str> { self.pointer.text() }

    /// Dispatch one event. Errors are only returned for events naming unknown
    /// basemaps, groups or layers.
    pub fn apply(&mut self, event: &Event) -> Result<()> {
        match event {
            Event::SelectBasemap { id } => { self.select_basemap(id)?; }
            Event::BasemapOpacity { value } => { self.set_basemap_opacity(value.unwrap_or(f64::NAN)); }
            Event::BasemapReady { id } => { self.on_basemap_ready(id); }
            Event::TransitionSettled { ticket, error } => {
                let outcome = match error {
                    Some(message) => Err(EngineError::TransitionFailed(message.clone())),
                    None => Ok(()),
                };
                self.on_transition_settled(TransitionTicket(*ticket), outcome);
            }
            Event::SelectOverlay { group, source } => { self.select_overlay(group, source.as_deref())?; }
            Event::OverlayOpacity { group, value } => {
                self.set_overlay_opacity(group, value.unwrap_or(f64::NAN))?;
            }
            Event::ClearOverlay { group } => self.clear_overlay(group)?,
            Event::PointerMove { at_ms, x, y } => {
                let at = Duration::try_from_secs_f64(at_ms / 1000.0).unwrap_or_default();
                self.pointer_moved(at, ScreenPoint::new(*x, *y));
            }
        }
        Ok(())
    }

    /// Apply events in order, logging and skipping the ones that fail.
    pub fn apply_all<'a>(&mut self, events: impl IntoIterator<Item = &'a Event>) -> usize {
        let mut failed = 0;
        for event in events {
            if let Err(e) = self.apply(event) {
                warn!(?event, "event rejected: {e:#}");
                failed += 1;
            }
        }
        failed
    }
}
