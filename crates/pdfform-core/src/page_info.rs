//! Page geometry extraction
//!
//! Reads the size, origin and rotation of every page. `/MediaBox`, `/Rotate`
//! and `/Resources` are inheritable, so lookups walk the `/Parent` chain.

use crate::error::FormError;
use crate::rotation::{normalize_rotation, Rotation};
use lopdf::{Dictionary, Document, Object, ObjectId};
use serde::Serialize;

/// Page tree nesting deeper than this is treated as a cycle
const MAX_TREE_DEPTH: usize = 64;

/// US Letter, used when no `/MediaBox` is found anywhere up the tree
const DEFAULT_MEDIA_BOX: [f64; 4] = [0.0, 0.0, 612.0, 792.0];

/// Size, origin and rotation of one page
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageGeometry {
    /// Page index (0-based)
    pub index: usize,
    /// Native (unrotated) width in points
    pub width_pt: f64,
    /// Native (unrotated) height in points
    pub height_pt: f64,
    /// Lower-left corner of the media box
    pub origin_x: f64,
    pub origin_y: f64,
    pub rotation: Rotation,
}

impl PageGeometry {
    /// Width and height as displayed, after `/Rotate` is applied
    pub fn upright_size(&self) -> (f64, f64) {
        self.rotation.upright_size(self.width_pt, self.height_pt)
    }

    /// Read the geometry of the page object `page_id`
    pub fn from_page(doc: &Document, index: usize, page_id: ObjectId) -> Result<Self, FormError> {
        let media_box = match inherited_attribute(doc, page_id, b"MediaBox")? {
            Some(object) => parse_box_array(resolve(doc, object)?)?,
            None => DEFAULT_MEDIA_BOX,
        };

        let rotation = match inherited_attribute(doc, page_id, b"Rotate")? {
            Some(object) => number(resolve(doc, object)?)
                .map(normalize_rotation)
                .unwrap_or_default(),
            None => Rotation::Deg0,
        };

        let [x1, y1, x2, y2] = media_box;
        Ok(Self {
            index,
            width_pt: (x2 - x1).abs(),
            height_pt: (y2 - y1).abs(),
            origin_x: x1.min(x2),
            origin_y: y1.min(y2),
            rotation,
        })
    }
}

/// Geometry of every page in document order
pub fn document_geometry(doc: &Document) -> Result<Vec<PageGeometry>, FormError> {
    doc.get_pages()
        .into_values()
        .enumerate()
        .map(|(index, page_id)| PageGeometry::from_page(doc, index, page_id))
        .collect()
}

/// Load `pdf_bytes` and report the geometry of every page
pub fn inspect_pages(pdf_bytes: &[u8]) -> Result<Vec<PageGeometry>, FormError> {
    let doc = Document::load_mem(pdf_bytes).map_err(|e| FormError::Load(e.to_string()))?;
    document_geometry(&doc)
}

/// Look up `key` on the page, falling back to its ancestors
pub fn inherited_attribute<'a>(
    doc: &'a Document,
    page_id: ObjectId,
    key: &[u8],
) -> Result<Option<&'a Object>, FormError> {
    let mut dict = page_dict(doc, page_id)?;

    for _ in 0..MAX_TREE_DEPTH {
        if let Ok(value) = dict.get(key) {
            return Ok(Some(value));
        }
        let parent_id = match dict.get(b"Parent").and_then(Object::as_reference) {
            Ok(id) => id,
            Err(_) => return Ok(None),
        };
        dict = match doc.get_object(parent_id).and_then(Object::as_dict) {
            Ok(parent) => parent,
            Err(_) => return Ok(None),
        };
    }

    Err(FormError::Structure(format!(
        "Page tree above object {} {} is too deep",
        page_id.0, page_id.1
    )))
}

/// The dictionary of page object `page_id`
pub fn page_dict(doc: &Document, page_id: ObjectId) -> Result<&Dictionary, FormError> {
    doc.get_object(page_id)
        .and_then(Object::as_dict)
        .map_err(|e| {
            FormError::Structure(format!(
                "Page object {} {} is not a dictionary: {}",
                page_id.0, page_id.1, e
            ))
        })
}

/// Follow a single indirect reference
fn resolve<'a>(doc: &'a Document, object: &'a Object) -> Result<&'a Object, FormError> {
    match object {
        Object::Reference(id) => doc
            .get_object(*id)
            .map_err(|e| FormError::Structure(format!("Dangling reference: {}", e))),
        other => Ok(other),
    }
}

fn number(object: &Object) -> Option<f64> {
    match object {
        Object::Integer(n) => Some(*n as f64),
        Object::Real(n) => Some(f64::from(*n)),
        _ => None,
    }
}

/// Parse a box array [x1, y1, x2, y2]
fn parse_box_array(object: &Object) -> Result<[f64; 4], FormError> {
    let array = object
        .as_array()
        .map_err(|_| FormError::Structure("MediaBox is not an array".to_string()))?;
    if array.len() != 4 {
        return Err(FormError::Structure(format!(
            "MediaBox must have 4 elements, found {}",
            array.len()
        )));
    }

    let mut result = [0.0; 4];
    for (i, obj) in array.iter().enumerate() {
        result[i] = number(obj)
            .filter(|n| n.is_finite())
            .ok_or_else(|| FormError::Structure(format!("MediaBox element {} is not a number", i)))?;
    }

    Ok(result)
}
