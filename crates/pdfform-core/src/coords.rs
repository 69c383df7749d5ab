//! Coordinate transformation between DOM, normalized and PDF coordinate systems
//!
//! A pointer position is first reduced to a normalized `(nx, ny)` fraction of
//! the canvas it landed on. That fraction does not depend on zoom or device
//! pixel ratio, so everything derived from it (the PDF point) does not either.

use crate::fields::PdfRect;
use crate::guards::{clamp, positive_or_one, safe_number};
use crate::placement::clamp_pdf_rect_to_page;
use crate::rotation::{map_point_for_rotation, Rotation};
use serde::{Deserialize, Serialize};

/// Pointer position in CSS pixels (client coordinates)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClientPoint {
    pub x: f64,
    pub y: f64,
}

impl ClientPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// On-screen rectangle of a page canvas in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewportRect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// Position as fractions of the displayed page, each in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormalizedPoint {
    pub nx: f64,
    pub ny: f64,
}

/// A pointer position relative to its canvas
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocalPoint {
    /// Offset from the canvas' left edge, clamped into `[0, width]`
    pub x: f64,
    /// Offset from the canvas' top edge, clamped into `[0, height]`
    pub y: f64,
    pub normalized: NormalizedPoint,
}

/// Result of mapping a pointer position to a field origin
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MappedPoint {
    pub x: f64,
    pub y: f64,
    pub nx: f64,
    pub ny: f64,
}

/// Pixel <-> PDF point conversion for one rendered page.
///
/// Implementations already account for the page's rotation and zoom. Pixel
/// coordinates have a top-left origin; PDF points are in the page's native
/// (unrotated) user space.
pub trait ViewportTransform {
    /// Viewport size in pixels (width, height)
    fn viewport_size(&self) -> (f64, f64);

    /// Convert a viewport pixel to a PDF point
    fn to_pdf_point(&self, px: f64, py: f64) -> (f64, f64);

    /// Convert a PDF point to a viewport pixel
    fn to_viewport_point(&self, x: f64, y: f64) -> (f64, f64);
}

/// Viewport of a page rendered at `scale` with its `/Rotate` applied.
///
/// Matches how PDF viewers lay out a rotated page: a 90/270 page is
/// displayed with width and height swapped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageViewport {
    pub page_width: f64,
    pub page_height: f64,
    pub rotation: Rotation,
    pub scale: f64,
}

impl PageViewport {
    pub fn new(page_width: f64, page_height: f64, rotation: Rotation, scale: f64) -> Self {
        Self {
            page_width: positive_or_one(page_width),
            page_height: positive_or_one(page_height),
            rotation,
            scale: positive_or_one(scale),
        }
    }

    /// Upright page size in points
    fn upright_size(&self) -> (f64, f64) {
        self.rotation
            .upright_size(self.page_width, self.page_height)
    }

    /// Viewport width in pixels
    pub fn width(&self) -> f64 {
        self.upright_size().0 * self.scale
    }

    /// Viewport height in pixels
    pub fn height(&self) -> f64 {
        self.upright_size().1 * self.scale
    }
}

impl ViewportTransform for PageViewport {
    fn viewport_size(&self) -> (f64, f64) {
        (self.width(), self.height())
    }

    fn to_pdf_point(&self, px: f64, py: f64) -> (f64, f64) {
        let (upright_w, upright_h) = self.upright_size();
        let ux = px / self.scale;
        let uy = upright_h - py / self.scale;
        map_point_for_rotation(ux, uy, upright_w, upright_h, self.rotation.neutralized())
    }

    fn to_viewport_point(&self, x: f64, y: f64) -> (f64, f64) {
        let (_, upright_h) = self.upright_size();
        let (ux, uy) =
            map_point_for_rotation(x, y, self.page_width, self.page_height, self.rotation);
        (ux * self.scale, (upright_h - uy) * self.scale)
    }
}

/// Clamp a pointer into its canvas and derive the normalized position.
///
/// Zero-sized (or otherwise unusable) canvas dimensions count as 1.
pub fn local_viewport_point(client: ClientPoint, canvas_rect: &ViewportRect) -> LocalPoint {
    let width = positive_or_one(canvas_rect.width);
    let height = positive_or_one(canvas_rect.height);

    let x = clamp(
        safe_number(client.x, 0.0) - safe_number(canvas_rect.left, 0.0),
        0.0,
        width,
    );
    let y = clamp(
        safe_number(client.y, 0.0) - safe_number(canvas_rect.top, 0.0),
        0.0,
        height,
    );

    LocalPoint {
        x,
        y,
        normalized: NormalizedPoint {
            nx: x / width,
            ny: y / height,
        },
    }
}

/// Map a pointer position to the PDF origin of a field being placed.
///
/// The pointer marks the field's visual top-left corner while PDF rectangles
/// grow upward from their bottom-left, so the field height is subtracted
/// from the raw y before the rectangle is clamped into the page.
pub fn map_dom_point_to_pdf_point<T: ViewportTransform + ?Sized>(
    client: ClientPoint,
    canvas_rect: &ViewportRect,
    transform: &T,
    page_width_pt: f64,
    page_height_pt: f64,
    field_width_pt: f64,
    field_height_pt: f64,
) -> MappedPoint {
    let local = local_viewport_point(client, canvas_rect);
    let NormalizedPoint { nx, ny } = local.normalized;

    let (viewport_w, viewport_h) = transform.viewport_size();
    let (raw_x, raw_y) = transform.to_pdf_point(nx * viewport_w, ny * viewport_h);

    let field_height = safe_number(field_height_pt, 0.0);
    let rect = PdfRect::new(
        safe_number(raw_x, 0.0),
        safe_number(raw_y, 0.0) - field_height,
        safe_number(field_width_pt, 0.0),
        field_height,
    );
    let clamped = clamp_pdf_rect_to_page(&rect, page_width_pt, page_height_pt);

    MappedPoint {
        x: clamped.x,
        y: clamped.y,
        nx,
        ny,
    }
}

/// Convert a viewport pixel rectangle to a PDF rectangle
pub fn viewport_rect_to_pdf_rect<T: ViewportTransform + ?Sized>(
    rect: &ViewportRect,
    transform: &T,
) -> PdfRect {
    let a = transform.to_pdf_point(rect.left, rect.top);
    let b = transform.to_pdf_point(rect.left + rect.width, rect.top + rect.height);
    PdfRect::from_corners(a, b)
}

/// Convert a PDF rectangle to a viewport pixel rectangle
pub fn pdf_rect_to_viewport_rect<T: ViewportTransform + ?Sized>(
    rect: &PdfRect,
    transform: &T,
) -> ViewportRect {
    let a = transform.to_viewport_point(rect.x, rect.y);
    let b = transform.to_viewport_point(rect.right(), rect.top());
    let bounds = PdfRect::from_corners(a, b);
    ViewportRect::new(bounds.x, bounds.y, bounds.width, bounds.height)
}
