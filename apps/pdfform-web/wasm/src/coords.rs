//! Coordinate mapping bindings
//!
//! The viewer sends the pointer position, the page canvas rectangle and the
//! rendered page's geometry; the mapping itself lives in `pdfform_core::coords`.

use crate::to_js_error;
use pdfform_core::{ClientPoint, MappedPoint, PageViewport, Rotation, ViewportRect};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

/// Rendered page as the viewer knows it
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedPage {
    /// Native (unrotated) size in points
    pub width_pt: f64,
    pub height_pt: f64,
    #[serde(default)]
    pub rotation: Rotation,
    /// CSS pixels per point
    #[serde(default = "default_scale")]
    pub scale: f64,
}

fn default_scale() -> f64 {
    1.0
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapPointRequest {
    pub client: ClientPoint,
    pub canvas_rect: ViewportRect,
    pub page: RenderedPage,
    #[serde(default)]
    pub field_width: f64,
    #[serde(default)]
    pub field_height: f64,
}

/// Map a pointer position to the PDF origin of a new field
///
/// # Arguments
/// * `request_json` - `{"client": {x, y}, "canvasRect": {left, top, width, height},
///   "page": {widthPt, heightPt, rotation, scale}, "fieldWidth", "fieldHeight"}`
///
/// # Returns
/// JSON `{x, y, nx, ny}` with `x, y` in PDF points
#[wasm_bindgen(js_name = mapDomPointToPdfPoint)]
pub fn map_dom_point_to_pdf_point(request_json: &str) -> Result<String, JsValue> {
    map_point_json(request_json).map_err(to_js_error)
}

pub fn map_point(request: &MapPointRequest) -> MappedPoint {
    let page = &request.page;
    let viewport = PageViewport::new(page.width_pt, page.height_pt, page.rotation, page.scale);
    pdfform_core::map_dom_point_to_pdf_point(
        request.client,
        &request.canvas_rect,
        &viewport,
        page.width_pt,
        page.height_pt,
        request.field_width,
        request.field_height,
    )
}

pub fn map_point_json(request_json: &str) -> Result<String, String> {
    let request: MapPointRequest = serde_json::from_str(request_json)
        .map_err(|e| format!("Failed to parse request: {}", e))?;
    serde_json::to_string(&map_point(&request)).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_map_point_json_rotated_page() {
        let request = r#"{
            "client": {"x": 100, "y": 100},
            "canvasRect": {"left": 0, "top": 0, "width": 400, "height": 400},
            "page": {"widthPt": 600, "heightPt": 800, "rotation": 90}
        }"#;
        let json = map_point_json(request).unwrap();
        let mapped: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(mapped["nx"], 0.25);
        assert_eq!(mapped["ny"], 0.25);
        assert!((mapped["x"].as_f64().unwrap() - 150.0).abs() < 1e-9);
        assert!((mapped["y"].as_f64().unwrap() - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_map_point_defaults_scale_and_rotation() {
        let request: MapPointRequest = serde_json::from_str(
            r#"{
                "client": {"x": 50, "y": 50},
                "canvasRect": {"left": 0, "top": 0, "width": 612, "height": 792},
                "page": {"widthPt": 612, "heightPt": 792},
                "fieldWidth": 20,
                "fieldHeight": 20
            }"#,
        )
        .unwrap();
        assert_eq!(request.page.scale, 1.0);
        assert_eq!(request.page.rotation, Rotation::Deg0);

        let mapped = map_point(&request);
        assert!((mapped.x - 50.0).abs() < 1e-9);
        assert!((mapped.y - (792.0 - 50.0 - 20.0)).abs() < 1e-9);
    }

    #[test]
    fn test_map_point_rejects_bad_json() {
        let err = map_point_json("{}").unwrap_err();
        assert!(err.starts_with("Failed to parse request"), "{}", err);
    }
}
