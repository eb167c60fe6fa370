//! WASM bindings for browser-based timeline export.
//!
//! This module exposes project parsing and CSV export to JavaScript via
//! wasm-bindgen.

use wasm_bindgen::prelude::*;

use crate::Project;
use crate::export::{CsvExporter, Exporter};
use crate::flatten::FlattenConfig;

/// Initialize panic hook for better error messages in the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "wasm")]
    console_error_panic_hook::set_once();
}

/// List the sequence names of a project.
///
/// Takes raw `.prproj` bytes and returns the names sorted case-insensitively.
#[wasm_bindgen]
pub fn list_sequences(data: &[u8]) -> Result<Vec<String>, JsValue> {
    let project = Project::from_bytes(data).map_err(|e| JsValue::from_str(&e.to_string()))?;
    Ok(project.sequence_names().into_iter().map(String::from).collect())
}

/// Flatten a sequence to CSV.
///
/// Takes raw `.prproj` bytes and a sequence name and returns CSV bytes in
/// chronological order, with nested sequences expanded.
#[wasm_bindgen]
pub fn prproj_to_csv(data: &[u8], sequence: &str, expand_nested: bool) -> Result<Vec<u8>, JsValue> {
    let project = Project::from_bytes(data).map_err(|e| JsValue::from_str(&e.to_string()))?;

    let config = FlattenConfig::new().with_expand_nested(expand_nested);
    let rows = project
        .flatten(sequence, &config)
        .map_err(|e| JsValue::from_str(&e.to_string()))?
        .ok_or_else(|| JsValue::from_str(&format!("Sequence '{sequence}' not found")))?;

    let mut output = Vec::new();
    CsvExporter::new()
        .export(&rows, &mut output)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

    Ok(output)
}
