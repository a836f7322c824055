use anyhow::{anyhow, Result};
use js_sys::{Function, Reflect};
use serde::Serialize;
use tilescope_core::{try_load_groups, MemCatalog, OverlayGroup};
use wasm_bindgen::{JsCast, JsValue};

pub(crate) fn js_err(e: impl ToString) -> JsValue {
    JsValue::from_str(&e.to_string())
}

pub(crate) fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| e.into())
}

/// Call `target[name](...args)`.
pub(crate) fn call_method(target: &JsValue, name: &str, args: &[JsValue]) -> Result<JsValue> {
    let method = Reflect::get(target, &JsValue::from_str(name))
        .map_err(|e| anyhow!("error getting method '{}': {:?}", name, e))?;
    let method: Function = method.dyn_into()
        .map_err(|_| anyhow!("map engine has no method '{}'", name))?;

    let args: js_sys::Array = args.iter().collect();
    method.apply(target, &args)
        .map_err(|e| anyhow!("map engine '{}' threw: {:?}", name, e))
}

/// Slider text to a number; anything unparsable becomes NaN, which the core
/// treats as "use the default".
pub(crate) fn slider_value(input: &str) -> f64 {
    input.trim().parse::<f64>().unwrap_or(f64::NAN)
}

pub(crate) fn console_error(message: &str) {
    web_sys::console::error_1(&JsValue::from_str(message));
}

/// Group the catalog text the page fetched.
pub(crate) fn catalog_groups(json: &str) -> Result<Vec<OverlayGroup>> {
    try_load_groups(&MemCatalog::new(json.as_bytes()))
}
