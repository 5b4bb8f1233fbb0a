//! Bindings to the global `mermaid` object loaded by the host page.

use mlive_core::theme::RendererConfig;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;

/// Element id mermaid uses for its temporary render target.
const RENDER_ID: &str = "mermaid-svg";

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = mermaid, js_name = initialize)]
    fn mermaid_initialize(config: &JsValue);

    #[wasm_bindgen(js_namespace = mermaid, js_name = render, catch)]
    fn mermaid_render(id: &str, text: &str) -> Result<js_sys::Promise, JsValue>;
}

/// Install global renderer settings; affects subsequent renders only.
pub fn configure(config: &RendererConfig) -> Result<(), String> {
    let json = config.to_json().map_err(|e| e.to_string())?;
    let value = js_sys::JSON::parse(&json).map_err(|e| error_message(&e))?;
    mermaid_initialize(&value);
    Ok(())
}

/// Render diagram source to SVG markup.
///
/// A rejection carries the renderer's message; an empty message is left for
/// the pipeline to replace.
pub async fn render(source: &str) -> Result<String, String> {
    let promise = mermaid_render(RENDER_ID, source).map_err(|e| error_message(&e))?;
    let result = JsFuture::from(promise)
        .await
        .map_err(|e| error_message(&e))?;
    js_sys::Reflect::get(&result, &JsValue::from_str("svg"))
        .ok()
        .and_then(|svg| svg.as_string())
        .ok_or_else(|| "renderer returned no SVG".to_string())
}

fn error_message(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value.as_string().unwrap_or_default()
}
