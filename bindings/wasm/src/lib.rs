use wasm_bindgen::prelude::*;

mod common;
mod engine;
mod viewer;

pub use viewer::WasmViewer;

/// Called automatically when the WASM module is instantiated.
/// Sets up panic hook so Rust panics appear as console.error in the browser.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Group a catalog JSON array by `ImageType`, keeping first-seen order.
#[wasm_bindgen(js_name = "groupCatalog")]
pub fn group_catalog(json: &str) -> Result<JsValue, JsValue> {
    let entries = tilescope_core::parse_catalog(json.as_bytes()).map_err(common::js_err)?;
    common::to_js(&tilescope_core::group_entries(entries))
}
