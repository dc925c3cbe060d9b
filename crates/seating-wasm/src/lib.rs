//! WebAssembly bindings for the seating plan engine
//!
//! Requests and results cross the boundary as plain JS objects (or JSON
//! strings) shaped like `SeatingRequest` and `GenerateOutcome`.

use serde::de::DeserializeOwned;
use serde::Serialize;
use seating_core::{SeatingPlan, SeatingRequest, Severity};
use wasm_bindgen::prelude::*;

mod bridge;

#[cfg(test)]
mod tests;

pub use bridge::{conflicts, conflicts_json, generate, generate_json, summary};

// Initialize panic hook for better error messages
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

fn from_js<T: DeserializeOwned>(value: JsValue) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value).map_err(|e| JsValue::from_str(&format!("invalid input: {}", e)))
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

fn run_generate(request: JsValue, seed: Option<u32>) -> Result<JsValue, JsValue> {
    let request: SeatingRequest = from_js(request)?;
    let outcome = bridge::generate(&request, seed.map(u64::from));
    for diagnostic in outcome.errors.iter().filter(|d| d.severity == Severity::Error) {
        web_sys::console::warn_1(&JsValue::from_str(&diagnostic.to_string()));
    }
    to_js(&outcome)
}

/// Generate ranked seating plans
#[wasm_bindgen(js_name = generatePlans)]
pub fn generate_plans(request: JsValue, seed: Option<u32>) -> Result<JsValue, JsValue> {
    run_generate(request, seed)
}

/// Same as `generatePlans`, resolved through a Promise
#[wasm_bindgen(js_name = generatePlansAsync)]
pub fn generate_plans_async(request: JsValue, seed: Option<u32>) -> js_sys::Promise {
    match run_generate(request, seed) {
        Ok(outcome) => js_sys::Promise::resolve(&outcome),
        Err(e) => js_sys::Promise::reject(&e),
    }
}

/// JSON string variant of `generatePlans`
#[wasm_bindgen(js_name = generatePlansJson)]
pub fn generate_plans_json(request: &str, seed: Option<u32>) -> Result<String, JsValue> {
    bridge::generate_json(request, seed.map(u64::from)).map_err(|e| JsValue::from_str(&e))
}

/// Conflict check for live feedback while constraints are edited
#[wasm_bindgen(js_name = detectConflicts)]
pub fn detect_conflicts(request: JsValue, check_adjacency: bool) -> Result<JsValue, JsValue> {
    let request: SeatingRequest = from_js(request)?;
    to_js(&bridge::conflicts(&request, check_adjacency))
}

#[wasm_bindgen(js_name = summarizePlan)]
pub fn summarize_plan(plan: JsValue, request: JsValue) -> Result<String, JsValue> {
    let plan: SeatingPlan = from_js(plan)?;
    let request: SeatingRequest = from_js(request)?;
    Ok(bridge::summary(&plan, &request))
}
