use std::time::Duration;

use tracing::trace;

use crate::{
    common::format_lon_lat,
    engine::{MapEngine, ScreenPoint, ViewState},
};

/// Minimum spacing between accepted pointer samples (about 20 updates per second).
pub const DEFAULT_THROTTLE: Duration = Duration::from_millis(50);

/// What happened to one pointer-move sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sample {
    /// Arrived inside the throttle window and was discarded.
    Dropped,
    /// Converted and shown.
    Updated,
    /// Accepted, but the point has no geographic position; the readout is unchanged.
    Unconvertible,
}

/// Time-gated lon/lat readout for the pointer position.
///
/// Timestamps are offsets from any fixed epoch (e.g. page load), supplied by the caller.
#[derive(Clone, Debug)]
pub struct PointerReporter {
    throttle: Duration,
    last: Option<Duration>,
    text: Option<String>,
}

impl Default for PointerReporter {
    fn default() -> Self { Self::new(DEFAULT_THROTTLE) }
}

impl PointerReporter {
    pub fn new(throttle: Duration) -> Self {
        Self { throttle, last: None, text: None }
    }

    /// Current readout text, e.g. `121.560000°, 25.040000°`.
    pub fn text(&self) -> Option<&str> { self.text.as_deref() }

    /// Show the view center before any pointer movement.
    pub fn show_center(&mut self, view: &ViewState) {
        self.text = Some(format_lon_lat(view.center));
    }

    pub fn sample(&mut self, at: Duration, point: ScreenPoint, engine: &impl MapEngine) -> Sample {
        if let Some(last) = self.last {
            if at.saturating_sub(last) < self.throttle { return Sample::Dropped }
        }
        self.last = Some(at);

        match engine.to_map(point) {
            Some(lon_lat) => {
                self.text = Some(format_lon_lat(lon_lat));
                Sample::Updated
            }
            None => {
                trace!(x = point.x, y = point.y, "pointer outside projection range");
                Sample::Unconvertible
            }
        }
    }
}
