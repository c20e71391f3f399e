//! WASM bindings for the dataflow behavior validator.
//!
//! Exposes validate and explain to the web editor via `wasm-bindgen`.
//! Results are returned as native JS objects using `serde-wasm-bindgen`.

use wasm_bindgen::prelude::*;

use dfd_behavior_bindings_common as common;

// ── Public API ──────────────────────────────────────────────────────────

/// Validate the behavior text of an output port.
///
/// `available_inputs` is an array of the node's input port names.
/// `label_types_json` is either an array of label types or a saved diagram
/// with a `labelTypes` field; label checks are skipped when it is absent.
/// `config_json` optionally overrides validator settings.
///
/// Returns `{ ok, diagnostics }` where each diagnostic carries `line`,
/// `colStart`, `colEnd` and `message`. Context maps become plain objects.
#[wasm_bindgen]
pub fn validate(
    text: &str,
    available_inputs: JsValue,
    label_types_json: Option<String>,
    config_json: Option<String>,
) -> Result<JsValue, JsError> {
    let inputs: Vec<String> = serde_wasm_bindgen::from_value(available_inputs)
        .map_err(|e| JsError::new(&format!("invalid available inputs: {}", e)))?;
    let report = common::validate_behavior_json(
        text,
        &inputs,
        label_types_json.as_deref(),
        config_json.as_deref(),
    )
    .map_err(|e| JsError::new(&e))?;
    to_js(&report)
}

/// Explain a diagnostic code (e.g., "BHV2001").
///
/// Returns the explanation string, or `null` if unknown.
#[wasm_bindgen]
pub fn explain(id: &str) -> Option<String> {
    common::explain_diagnostic(id).map(|s| s.to_string())
}

// ── Helpers ─────────────────────────────────────────────────────────────

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsError> {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    value
        .serialize(&serializer)
        .map_err(|e| JsError::new(&e.to_string()))
}
