//! Field export bindings
//!
//! Bakes the fields placed in the viewer into the PDF as an AcroForm.

use crate::to_js_error;
use pdfform_core::{export_form, parse_field_specs, ExportOptions, ExportReport};
use wasm_bindgen::prelude::*;

/// Export PDF with interactive form fields
///
/// # Arguments
/// * `pdf_bytes` - Original PDF as Uint8Array
/// * `fields_json` - JSON array of field placements (`type`, `pageIndex`, `x`, `y`, ...)
/// * `options_json` - Export options, e.g. `{"normalizePageRotation": true}`; may be empty
///
/// # Returns
/// New PDF bytes as Uint8Array
#[wasm_bindgen(js_name = exportPdfWithFields)]
pub fn export_pdf_with_fields(
    pdf_bytes: &[u8],
    fields_json: &str,
    options_json: &str,
) -> Result<Vec<u8>, JsValue> {
    export_report(pdf_bytes, fields_json, options_json)
        .map(|report| report.bytes)
        .map_err(to_js_error)
}

/// Per-field outcomes of an export, as JSON, without the PDF bytes.
///
/// Lets the viewer tell the user which fields were skipped.
#[wasm_bindgen(js_name = exportOutcomes)]
pub fn export_outcomes(
    pdf_bytes: &[u8],
    fields_json: &str,
    options_json: &str,
) -> Result<String, JsValue> {
    export_outcomes_json(pdf_bytes, fields_json, options_json).map_err(to_js_error)
}

/// Page sizes, origins and rotations as a JSON array
#[wasm_bindgen(js_name = inspectPages)]
pub fn inspect_pages(pdf_bytes: &[u8]) -> Result<String, JsValue> {
    inspect_pages_json(pdf_bytes).map_err(to_js_error)
}

pub fn export_report(
    pdf_bytes: &[u8],
    fields_json: &str,
    options_json: &str,
) -> Result<ExportReport, String> {
    let fields = parse_field_specs(fields_json).map_err(|e| e.to_string())?;
    let options = ExportOptions::from_json_str(options_json).map_err(|e| e.to_string())?;
    export_form(pdf_bytes, &fields, &options).map_err(|e| e.to_string())
}

pub fn export_outcomes_json(
    pdf_bytes: &[u8],
    fields_json: &str,
    options_json: &str,
) -> Result<String, String> {
    let report = export_report(pdf_bytes, fields_json, options_json)?;
    serde_json::to_string(&report.outcomes).map_err(|e| e.to_string())
}

pub fn inspect_pages_json(pdf_bytes: &[u8]) -> Result<String, String> {
    let pages = pdfform_core::inspect_pages(pdf_bytes).map_err(|e| e.to_string())?;
    serde_json::to_string(&pages).map_err(|e| e.to_string())
}
