use geo::Point;
use serde::Deserialize;
use tilescope_core::{
    Basemap, EngineError, LayerHandle, MapEngine, Opacity, Readiness, ScreenPoint, TileLayerSpec, TransitionTicket,
    ViewState,
};
use wasm_bindgen::JsValue;

use crate::common::{call_method, console_error};

#[derive(Deserialize)]
struct JsView {
    zoom: f64,
    center: [f64; 2],
    width: f64,
    height: f64,
}

/// `MapEngine` backed by a JavaScript object wrapping the real map and view.
///
/// Expected methods: `view()`, `activateBasemap(id) -> bool` (true when already
/// loaded), `setBasemapOpacity(v) -> bool` (false when unsupported),
/// `goTo(ticket, zoom)`, `addLayer(spec) -> number`, `removeLayer(handle)`,
/// `setLayerOpacity(handle, v)` and `toMap(x, y) -> [lon, lat] | null`.
pub(crate) struct JsEngine {
    target: JsValue,
}

impl JsEngine {
    pub(crate) fn new(target: JsValue) -> Self { Self { target } }

    fn call(&self, name: &str, args: &[JsValue]) -> Option<JsValue> {
        call_method(&self.target, name, args)
            .map_err(|e| console_error(&format!("{e:#}")))
            .ok()
    }
}

impl MapEngine for JsEngine {
    fn view(&self) -> ViewState {
        let view = self.call("view", &[])
            .and_then(|v| serde_wasm_bindgen::from_value::<JsView>(v).ok())
            .unwrap_or(JsView { zoom: 0.0, center: [0.0, 0.0], width: 0.0, height: 0.0 });
        ViewState {
            zoom: view.zoom,
            center: Point::new(view.center[0], view.center[1]),
            width: view.width,
            height: view.height,
        }
    }

    fn activate_basemap(&mut self, basemap: &Basemap) -> Readiness {
        let ready = self.call("activateBasemap", &[JsValue::from_str(&basemap.id)])
            .and_then(|v| v.as_bool())
            .unwrap_or(false);
        if ready { Readiness::Ready } else { Readiness::Pending }
    }

    fn set_basemap_opacity(&mut self, opacity: Opacity) -> Result<(), EngineError> {
        match self.call("setBasemapOpacity", &[JsValue::from_f64(opacity.value())]).and_then(|v| v.as_bool()) {
            Some(false) => Err(EngineError::OpacityUnsupported),
            _ => Ok(()),
        }
    }

    fn request_zoom(&mut self, ticket: TransitionTicket, zoom: f64) {
        self.call("goTo", &[JsValue::from_f64(ticket.0 as f64), JsValue::from_f64(zoom)]);
    }

    fn add_layer(&mut self, spec: &TileLayerSpec) -> LayerHandle {
        let handle = match serde_wasm_bindgen::to_value(spec) {
            Ok(spec) => self.call("addLayer", &[spec]).and_then(|v| v.as_f64()).unwrap_or(0.0),
            Err(e) => {
                console_error(&format!("cannot pass layer {} to the map engine: {e}", spec.url_template));
                0.0
            }
        };
        LayerHandle(handle as u32)
    }

    fn remove_layer(&mut self, handle: LayerHandle) {
        self.call("removeLayer", &[JsValue::from(handle.0)]);
    }

    fn set_layer_opacity(&mut self, handle: LayerHandle, opacity: Opacity) {
        self.call("setLayerOpacity", &[JsValue::from(handle.0), JsValue::from_f64(opacity.value())]);
    }

    fn to_map(&self, point: ScreenPoint) -> Option<Point<f64>> {
        let lon_lat = self.call("toMap", &[JsValue::from_f64(point.x), JsValue::from_f64(point.y)])?;
        if lon_lat.is_null() || lon_lat.is_undefined() { return None }
        let [lon, lat]: [f64; 2] = serde_wasm_bindgen::from_value(lon_lat).ok()?;
        Some(Point::new(lon, lat))
    }
}
