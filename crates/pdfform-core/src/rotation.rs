//! Page rotation normalization
//!
//! A page's `/Rotate` entry turns its content clockwise for display. These
//! helpers move points and rectangles between the page's native (unrotated)
//! user space and the upright frame a reader actually shows, which is also
//! the frame of a rotation-flattened output page.

use crate::fields::PdfRect;
use serde::{Deserialize, Serialize};

/// Right-angle page rotation, clockwise as in `/Rotate`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(into = "u16", from = "u16")]
pub enum Rotation {
    #[default]
    Deg0,
    Deg90,
    Deg180,
    Deg270,
}

impl Rotation {
    /// Snap any angle to the nearest right angle
    pub fn from_degrees(angle: f64) -> Self {
        normalize_rotation(angle)
    }

    pub fn degrees(self) -> u16 {
        match self {
            Rotation::Deg0 => 0,
            Rotation::Deg90 => 90,
            Rotation::Deg180 => 180,
            Rotation::Deg270 => 270,
        }
    }

    /// The rotation that cancels this one
    pub fn neutralized(self) -> Self {
        neutralized_rotation(self)
    }

    /// Whether width and height trade places in the upright frame
    pub fn swaps_dimensions(self) -> bool {
        matches!(self, Rotation::Deg90 | Rotation::Deg270)
    }

    /// Upright (width, height) of a page whose native size is `width x height`
    pub fn upright_size(self, width: f64, height: f64) -> (f64, f64) {
        if self.swaps_dimensions() {
            (height, width)
        } else {
            (width, height)
        }
    }
}

impl From<Rotation> for u16 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

impl From<u16> for Rotation {
    fn from(degrees: u16) -> Self {
        normalize_rotation(f64::from(degrees))
    }
}

/// Snap an angle to {0, 90, 180, 270}.
///
/// The angle is reduced modulo 360 first, so `450` and `-90` are accepted.
/// Boundaries sit at 45/135/225/315, each belonging to the next quadrant.
pub fn normalize_rotation(angle: f64) -> Rotation {
    if !angle.is_finite() {
        return Rotation::Deg0;
    }
    let reduced = angle.rem_euclid(360.0);
    if reduced < 45.0 {
        Rotation::Deg0
    } else if reduced < 135.0 {
        Rotation::Deg90
    } else if reduced < 225.0 {
        Rotation::Deg180
    } else if reduced < 315.0 {
        Rotation::Deg270
    } else {
        Rotation::Deg0
    }
}

/// `(360 - source) mod 360`, snapped
pub fn neutralized_rotation(source: Rotation) -> Rotation {
    normalize_rotation((360.0 - f64::from(source.degrees())).rem_euclid(360.0))
}

/// Map a point from a page's native frame into its upright frame.
///
/// `page_width`/`page_height` are the native (unrotated) dimensions.
pub fn map_point_for_rotation(
    x: f64,
    y: f64,
    page_width: f64,
    page_height: f64,
    rotation: Rotation,
) -> (f64, f64) {
    match rotation {
        Rotation::Deg0 => (x, y),
        Rotation::Deg90 => (y, page_width - x),
        Rotation::Deg180 => (page_width - x, page_height - y),
        Rotation::Deg270 => (page_height - y, x),
    }
}

/// Map every corner of `rect` and return the axis-aligned bounding box
pub fn transform_rect_for_rotation(
    rect: &PdfRect,
    page_width: f64,
    page_height: f64,
    rotation: Rotation,
) -> PdfRect {
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;

    for (cx, cy) in rect.corners() {
        let (x, y) = map_point_for_rotation(cx, cy, page_width, page_height, rotation);
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }

    PdfRect::new(min_x, min_y, max_x - min_x, max_y - min_y)
}

/// Content matrix `[a b c d e f]` that draws native page content into the
/// upright frame.
///
/// The rotation part turns content counter-clockwise by the neutralized
/// angle (a clockwise turn by `rotation`); the translation moves the turned
/// page back into the positive quadrant.
pub fn content_matrix(rotation: Rotation, page_width: f64, page_height: f64) -> [f64; 6] {
    let (cos, sin) = match neutralized_rotation(rotation) {
        Rotation::Deg0 => (1.0, 0.0),
        Rotation::Deg90 => (0.0, 1.0),
        Rotation::Deg180 => (-1.0, 0.0),
        Rotation::Deg270 => (0.0, -1.0),
    };
    let (e, f) = match rotation {
        Rotation::Deg0 => (0.0, 0.0),
        Rotation::Deg90 => (0.0, page_width),
        Rotation::Deg180 => (page_width, page_height),
        Rotation::Deg270 => (page_height, 0.0),
    };
    [cos, sin, -sin, cos, e, f]
}

/// Apply a `[a b c d e f]` matrix to a point
pub fn apply_matrix(matrix: &[f64; 6], x: f64, y: f64) -> (f64, f64) {
    let [a, b, c, d, e, f] = *matrix;
    (a * x + c * y + e, b * x + d * y + f)
}
