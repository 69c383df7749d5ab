//! Field placement clamping
//!
//! Keeps a field rectangle inside its page and above the minimum usable
//! size. Size is clamped before position: clamping position first would let
//! an oversized field compute a negative `page - size` offset range.

use crate::fields::{FieldSpec, FieldType, PdfRect};
use crate::guards::{clamp, safe_number};

/// Smallest width or height a placed field may have, in points
pub const MIN_FIELD_SIZE: f64 = 8.0;

/// Default dimensions for a field type (width, height) in points
pub fn default_field_size(field_type: FieldType) -> (f64, f64) {
    field_type.default_size()
}

/// Clamp a rectangle into `[0, page_width] x [0, page_height]`.
///
/// Width and height land in `[MIN_FIELD_SIZE, page dimension]`; a page
/// smaller than the minimum wins and shrinks the field to the page.
pub fn clamp_pdf_rect_to_page(rect: &PdfRect, page_width: f64, page_height: f64) -> PdfRect {
    let page_width = safe_number(page_width, 0.0).max(0.0);
    let page_height = safe_number(page_height, 0.0).max(0.0);

    let width = clamp(rect.width, MIN_FIELD_SIZE, page_width);
    let height = clamp(rect.height, MIN_FIELD_SIZE, page_height);
    let x = clamp(rect.x, 0.0, page_width - width);
    let y = clamp(rect.y, 0.0, page_height - height);

    PdfRect::new(x, y, width, height)
}

/// Resolve a spec's rectangle, filling in missing or unusable sizes from the
/// per-type defaults
pub fn resolve_field_rect(spec: &FieldSpec) -> PdfRect {
    let (default_width, default_height) = default_field_size(spec.field_type);
    let width = spec
        .width
        .map(|w| safe_number(w, default_width))
        .unwrap_or(default_width);
    let height = spec
        .height
        .map(|h| safe_number(h, default_height))
        .unwrap_or(default_height);

    PdfRect::new(
        safe_number(spec.x, 0.0),
        safe_number(spec.y, 0.0),
        width,
        height,
    )
}
