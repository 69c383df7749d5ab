//! Browser bindings for pdfform
//!
//! Every binding takes and returns plain bytes or JSON strings so the viewer
//! does not need generated TypeScript types. Each `*_json` helper holds the
//! logic and is tested natively; the `#[wasm_bindgen]` wrapper only converts
//! errors to `JsValue`.

use wasm_bindgen::prelude::*;

pub mod coords;
pub mod field_export;

pub use coords::{map_dom_point_to_pdf_point, MapPointRequest};
pub use field_export::{export_pdf_with_fields, inspect_pages};

#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

pub(crate) fn to_js_error(message: String) -> JsValue {
    JsValue::from_str(&message)
}
