use std::time::Duration;

use tilescope_core::{EngineError, ScreenPoint, TransitionTicket, Viewer, ViewerConfig};
use wasm_bindgen::{JsValue, prelude::wasm_bindgen};

use crate::{common::*, engine::JsEngine};

#[wasm_bindgen]
pub struct WasmViewer {
    inner: Viewer<JsEngine>,
}

#[wasm_bindgen]
impl WasmViewer {
    /// Wrap a JS map engine object. `config` is an optional viewer config object
    /// (same shape as the JSON config file).
    #[wasm_bindgen(constructor)]
    pub fn new(engine: JsValue, config: JsValue) -> Result<WasmViewer, JsValue> {
        let config: ViewerConfig = if config.is_undefined() || config.is_null() {
            ViewerConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)?
        };
        let inner = Viewer::new(JsEngine::new(engine), &config).map_err(js_err)?;
        Ok(WasmViewer { inner })
    }

    /// Load the catalog fetched by the page. Returns the number of groups;
    /// a malformed catalog is reported on the console and yields zero.
    #[wasm_bindgen(js_name = "loadCatalog")]
    pub fn load_catalog(&mut self, json: &str) -> usize {
        match catalog_groups(json) {
            Ok(groups) => {
                let count = groups.len();
                self.inner.set_groups(groups);
                count
            }
            Err(e) => {
                self.catalog_failed(&format!("{e:#}"));
                0
            }
        }
    }

    /// Report a failed catalog fetch: every group is dropped.
    #[wasm_bindgen(js_name = "catalogFailed")]
    pub fn catalog_failed(&mut self, reason: &str) {
        console_error(&format!("failed to load layer catalog: {reason}"));
        self.inner.set_groups(Vec::new());
    }

    /// Groups as `[{category, layers: [{source_url, display_name}]}]`, for building controls.
    pub fn groups(&self) -> Result<JsValue, JsValue> {
        let groups: Vec<_> = self.inner.groups().collect();
        to_js(&groups)
    }

    /// Returns the zoom-clamp ticket, if a clamp was requested.
    #[wasm_bindgen(js_name = "selectBasemap")]
    pub fn select_basemap(&mut self, id: &str) -> Result<Option<f64>, JsValue> {
        let ticket = self.inner.select_basemap(id).map_err(js_err)?;
        Ok(ticket.map(|t| t.0 as f64))
    }

    /// Returns the slider readout, e.g. "0.7".
    #[wasm_bindgen(js_name = "setBasemapOpacity")]
    pub fn set_basemap_opacity(&mut self, input: &str) -> String {
        self.inner.set_basemap_opacity(slider_value(input)).display()
    }

    #[wasm_bindgen(js_name = "basemapReady")]
    pub fn basemap_ready(&mut self, id: &str) -> bool {
        self.inner.on_basemap_ready(id)
    }

    #[wasm_bindgen(js_name = "transitionSettled")]
    pub fn transition_settled(&mut self, ticket: f64, error: Option<String>) -> bool {
        let outcome = match error {
            Some(message) => Err(EngineError::TransitionFailed(message)),
            None => Ok(()),
        };
        self.inner.on_transition_settled(TransitionTicket(ticket as u64), outcome)
    }

    /// An empty `source` (the selector's placeholder option) clears the group.
    #[wasm_bindgen(js_name = "selectOverlay")]
    pub fn select_overlay(&mut self, group: &str, source: Option<String>) -> Result<(), JsValue> {
        let source = source.filter(|s| !s.is_empty());
        self.inner.select_overlay(group, source.as_deref()).map_err(js_err)?;
        Ok(())
    }

    #[wasm_bindgen(js_name = "setOverlayOpacity")]
    pub fn set_overlay_opacity(&mut self, group: &str, input: &str) -> Result<String, JsValue> {
        let opacity = self.inner.set_overlay_opacity(group, slider_value(input)).map_err(js_err)?;
        Ok(opacity.display())
    }

    #[wasm_bindgen(js_name = "clearOverlay")]
    pub fn clear_overlay(&mut self, group: &str) -> Result<(), JsValue> {
        self.inner.clear_overlay(group).map_err(js_err)
    }

    /// `at_ms` is `performance.now()`. Returns the readout text after the sample.
    #[wasm_bindgen(js_name = "pointerMove")]
    pub fn pointer_move(&mut self, at_ms: f64, x: f64, y: f64) -> Option<String> {
        let at = Duration::try_from_secs_f64(at_ms / 1000.0).unwrap_or_default();
        self.inner.pointer_moved(at, ScreenPoint::new(x, y));
        self.readout()
    }

    pub fn readout(&self) -> Option<String> {
        self.inner.readout().map(str::to_owned)
    }
}
