//! Interactive form-field placement and export
//!
//! Maps pointer positions on a rendered page to PDF coordinates and bakes
//! the placed fields into a real AcroForm using lopdf.
//!
//! - `coords`: pixel <-> normalized <-> PDF point mapping, zoom and DPR invariant
//! - `rotation`: `/Rotate` snapping and frame changes between rotated and upright pages
//! - `export::export_form`: full pipeline, optionally flattening page rotation

pub mod acroform;
pub mod config;
pub mod coords;
pub mod error;
pub mod export;
pub mod fields;
pub mod guards;
pub mod naming;
pub mod page_info;
pub mod placement;
pub mod rotation;

pub use config::{ExportOptions, FieldAppearance};
pub use coords::{
    local_viewport_point, map_dom_point_to_pdf_point, pdf_rect_to_viewport_rect,
    viewport_rect_to_pdf_rect, ClientPoint, MappedPoint, NormalizedPoint, PageViewport,
    ViewportRect, ViewportTransform,
};
pub use error::FormError;
pub use export::{export_form, export_pdf_with_fields, ExportReport, FieldOutcome, PageTransform};
pub use fields::{FieldSpec, FieldType, PdfRect};
pub use naming::{sanitize_field_name, FieldNameAllocator};
pub use page_info::{inspect_pages, PageGeometry};
pub use placement::{clamp_pdf_rect_to_page, default_field_size, MIN_FIELD_SIZE};
pub use rotation::{
    map_point_for_rotation, neutralized_rotation, normalize_rotation, transform_rect_for_rotation,
    Rotation,
};

/// Parse PDF bytes and return page count
pub fn get_page_count(bytes: &[u8]) -> Result<usize, FormError> {
    let doc = lopdf::Document::load_mem(bytes).map_err(|e| FormError::Load(e.to_string()))?;
    Ok(doc.get_pages().len())
}

/// Parse a JSON array of field placements
pub fn parse_field_specs(json: &str) -> Result<Vec<FieldSpec>, FormError> {
    serde_json::from_str(json).map_err(|e| FormError::Config(format!("Invalid fields JSON: {}", e)))
}
