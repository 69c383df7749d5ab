//! Form export pipeline
//!
//! Turns a source PDF plus a list of field placements into a PDF carrying a
//! real AcroForm. With rotation normalization every source page is redrawn
//! upright onto a fresh, unrotated page and the fields are re-projected into
//! that frame.

use crate::acroform::{add_widget, ensure_acroform, existing_field_names, WidgetKind, WidgetSpec};
use crate::config::ExportOptions;
use crate::error::FormError;
use crate::fields::{FieldSpec, PdfRect};
use crate::naming::FieldNameAllocator;
use crate::page_info::{inherited_attribute, page_dict, PageGeometry};
use crate::guards::safe_number;
use crate::placement::{clamp_pdf_rect_to_page, default_field_size, resolve_field_rect};
use crate::rotation::{content_matrix, map_point_for_rotation, transform_rect_for_rotation, Rotation};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, info, instrument, warn};

/// How a flattened page relates to its source page
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageTransform {
    /// Source page size, native frame
    pub page_width: f64,
    pub page_height: f64,
    /// Source `/Rotate`
    pub rotation: Rotation,
    /// Output page size
    pub out_width: f64,
    pub out_height: f64,
}

impl PageTransform {
    pub fn for_page(geometry: &PageGeometry) -> Self {
        let (out_width, out_height) = geometry.upright_size();
        Self {
            page_width: geometry.width_pt,
            page_height: geometry.height_pt,
            rotation: geometry.rotation,
            out_width,
            out_height,
        }
    }

    /// Re-project a rectangle from the source page into the output page
    pub fn apply(&self, rect: &PdfRect) -> PdfRect {
        transform_rect_for_rotation(rect, self.page_width, self.page_height, self.rotation)
    }

    /// Place a field on the output page.
    ///
    /// A field with both sizes keeps the box the user drew. Otherwise only
    /// its anchor point is re-projected and becomes the bottom-left corner;
    /// missing sizes come from the type defaults in the output frame so an
    /// unsized field stays upright.
    pub fn project_field(&self, spec: &FieldSpec) -> PdfRect {
        if spec.width.is_some() && spec.height.is_some() {
            return self.apply(&resolve_field_rect(spec));
        }

        let (x, y) = map_point_for_rotation(
            safe_number(spec.x, 0.0),
            safe_number(spec.y, 0.0),
            self.page_width,
            self.page_height,
            self.rotation,
        );
        let (width, height) = if self.rotation.swaps_dimensions() {
            (spec.height, spec.width)
        } else {
            (spec.width, spec.height)
        };
        let (default_width, default_height) = default_field_size(spec.field_type);

        PdfRect::new(
            x,
            y,
            width.map(|w| safe_number(w, default_width)).unwrap_or(default_width),
            height.map(|h| safe_number(h, default_height)).unwrap_or(default_height),
        )
    }
}

/// What happened to one requested field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum FieldOutcome {
    #[serde(rename_all = "camelCase")]
    Placed {
        /// Position in the input list
        index: usize,
        name: String,
        page_index: usize,
        /// Final widget rectangle in the output page's user space
        rect: PdfRect,
    },
    #[serde(rename_all = "camelCase")]
    SkippedOutOfRange {
        index: usize,
        /// As requested, so negative indexes are reported verbatim
        page_index: i64,
        page_count: usize,
    },
}

impl FieldOutcome {
    pub fn is_placed(&self) -> bool {
        matches!(self, FieldOutcome::Placed { .. })
    }
}

/// Output bytes plus one outcome per requested field, in input order
#[derive(Debug, Clone, Serialize)]
pub struct ExportReport {
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub outcomes: Vec<FieldOutcome>,
}

impl ExportReport {
    pub fn placed_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_placed()).count()
    }

    pub fn skipped_count(&self) -> usize {
        self.outcomes.len() - self.placed_count()
    }
}

/// A page fields can be placed on
#[derive(Debug, Clone, Copy)]
struct TargetPage {
    page_id: ObjectId,
    /// Geometry of the page as written to the output
    geometry: PageGeometry,
    /// Set when the page was flattened
    transform: Option<PageTransform>,
}

/// Export `fields` into `source`, returning just the PDF bytes
pub fn export_pdf_with_fields(
    source: &[u8],
    fields: &[FieldSpec],
    normalize_page_rotation: bool,
) -> Result<Vec<u8>, FormError> {
    let options = ExportOptions::default().with_rotation_normalized(normalize_page_rotation);
    export_form(source, fields, &options).map(|report| report.bytes)
}

/// Export `fields` into `source` and report what happened to each field.
///
/// A field whose page does not exist is skipped and reported; every other
/// field is clamped onto its page and given a unique name.
#[instrument(skip_all, fields(source_len = source.len(), fields = fields.len(), normalize = options.normalize_page_rotation))]
pub fn export_form(
    source: &[u8],
    fields: &[FieldSpec],
    options: &ExportOptions,
) -> Result<ExportReport, FormError> {
    options.validate()?;

    let source_doc = Document::load_mem(source).map_err(|e| FormError::Load(e.to_string()))?;

    let (mut doc, pages) = if options.normalize_page_rotation {
        flatten_rotation(&source_doc)?
    } else {
        let pages = source_pages(&source_doc)?;
        (source_doc, pages)
    };
    debug!(pages = pages.len(), "Prepared target pages");

    let acroform_id = ensure_acroform(&mut doc)?;
    let mut names = FieldNameAllocator::with_existing(existing_field_names(&doc));
    let mut outcomes = Vec::with_capacity(fields.len());

    for (index, spec) in fields.iter().enumerate() {
        let target = usize::try_from(spec.page_index)
            .ok()
            .and_then(|page_index| pages.get(page_index).map(|target| (page_index, target)));
        let Some((page_index, target)) = target else {
            warn!(
                index,
                page_index = spec.page_index,
                page_count = pages.len(),
                "Skipping field on missing page"
            );
            outcomes.push(FieldOutcome::SkippedOutOfRange {
                index,
                page_index: spec.page_index,
                page_count: pages.len(),
            });
            continue;
        };

        let projected = match &target.transform {
            Some(transform) => transform.project_field(spec),
            None => resolve_field_rect(spec),
        };
        let clamped = clamp_pdf_rect_to_page(
            &projected,
            target.geometry.width_pt,
            target.geometry.height_pt,
        );
        let rect = PdfRect::new(
            clamped.x + target.geometry.origin_x,
            clamped.y + target.geometry.origin_y,
            clamped.width,
            clamped.height,
        );

        let name = names.allocate(spec.name.as_deref(), spec.field_type, index + 1);
        let widget = WidgetSpec {
            name: &name,
            label: spec.label.as_deref(),
            kind: WidgetKind::for_field(spec.field_type, &options.appearance),
            rect,
        };
        add_widget(&mut doc, acroform_id, target.page_id, &widget, &options.appearance)?;

        debug!(
            index,
            name = %name,
            field_type = spec.field_type.as_str(),
            page_index,
            x = rect.x,
            y = rect.y,
            width = rect.width,
            height = rect.height,
            "Placed field"
        );
        outcomes.push(FieldOutcome::Placed {
            index,
            name,
            page_index,
            rect,
        });
    }

    doc.compress();
    let mut bytes = Vec::new();
    doc.save_to(&mut bytes)
        .map_err(|e| FormError::Save(e.to_string()))?;

    let report = ExportReport { bytes, outcomes };
    info!(
        placed = report.placed_count(),
        skipped = report.skipped_count(),
        output_len = report.bytes.len(),
        "Exported form"
    );
    Ok(report)
}

/// Target pages of an unmodified document
fn source_pages(doc: &Document) -> Result<Vec<TargetPage>, FormError> {
    doc.get_pages()
        .into_values()
        .enumerate()
        .map(|(index, page_id)| {
            Ok(TargetPage {
                page_id,
                geometry: PageGeometry::from_page(doc, index, page_id)?,
                transform: None,
            })
        })
        .collect()
}

/// Redraw every page of `source` upright into a fresh document.
///
/// Each source page becomes a Form XObject drawn through the rotation's
/// content matrix onto a page with no `/Rotate`, so the visual result is
/// unchanged. Source annotations are not carried over.
fn flatten_rotation(source: &Document) -> Result<(Document, Vec<TargetPage>), FormError> {
    let mut output = Document::with_version(source.version.clone());
    let pages_id = output.new_object_id();
    let mut cache = HashMap::new();
    let mut kids = Vec::new();
    let mut targets = Vec::new();

    for (index, source_page_id) in source.get_pages().into_values().enumerate() {
        let geometry = PageGeometry::from_page(source, index, source_page_id)?;
        let transform = PageTransform::for_page(&geometry);

        let xobject_id = create_page_xobject(&mut output, source, source_page_id, &geometry, &mut cache)?;

        let [a, b, c, d, e, f] = content_matrix(geometry.rotation, geometry.width_pt, geometry.height_pt);
        // Shift the media box origin to (0, 0) before turning
        let e = e - (a * geometry.origin_x + c * geometry.origin_y);
        let f = f - (b * geometry.origin_x + d * geometry.origin_y);
        let matrix = [a, b, c, d, e, f]
            .iter()
            .map(|v| format_number(*v))
            .collect::<Vec<_>>()
            .join(" ");
        let content = format!("q\n{} cm\n/Src Do\nQ\n", matrix);
        let content_id = output.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

        let page_id = output.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                0.into(),
                0.into(),
                Object::Real(transform.out_width as f32),
                Object::Real(transform.out_height as f32),
            ],
            "Resources" => dictionary! {
                "XObject" => dictionary! { "Src" => xobject_id },
            },
            "Contents" => content_id,
        });
        kids.push(Object::Reference(page_id));

        debug!(
            index,
            rotation = geometry.rotation.degrees(),
            out_width = transform.out_width,
            out_height = transform.out_height,
            "Flattened page"
        );
        targets.push(TargetPage {
            page_id,
            geometry: PageGeometry {
                index,
                width_pt: transform.out_width,
                height_pt: transform.out_height,
                origin_x: 0.0,
                origin_y: 0.0,
                rotation: Rotation::Deg0,
            },
            transform: Some(transform),
        });
    }

    let count = kids.len() as i64;
    output.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => count,
        }),
    );
    let catalog_id = output.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    output.trailer.set("Root", catalog_id);

    Ok((output, targets))
}

/// Format an operand, writing negative zero as `0`
fn format_number(value: f64) -> String {
    if value == 0.0 {
        "0".to_string()
    } else {
        value.to_string()
    }
}

/// Wrap a source page's content and resources in a Form XObject
fn create_page_xobject(
    output: &mut Document,
    source: &Document,
    page_id: ObjectId,
    geometry: &PageGeometry,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<ObjectId, FormError> {
    let content = page_content(source, page_dict(source, page_id)?);

    let mut xobject = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Form",
        "FormType" => 1,
        "BBox" => vec![
            Object::Real(geometry.origin_x as f32),
            Object::Real(geometry.origin_y as f32),
            Object::Real((geometry.origin_x + geometry.width_pt) as f32),
            Object::Real((geometry.origin_y + geometry.height_pt) as f32),
        ],
    };
    if let Some(resources) = inherited_attribute(source, page_id, b"Resources")? {
        xobject.set("Resources", copy_object_deep(output, source, resources, cache)?);
    }

    Ok(output.add_object(Stream::new(xobject, content)))
}

/// Concatenated, decoded content of a page
fn page_content(doc: &Document, page: &Dictionary) -> Vec<u8> {
    let decoded = |id: &ObjectId| -> Option<Vec<u8>> {
        let stream = doc.get_object(*id).ok()?.as_stream().ok()?;
        Some(
            stream
                .decompressed_content()
                .unwrap_or_else(|_| stream.content.clone()),
        )
    };

    match page.get(b"Contents") {
        Ok(Object::Reference(id)) => match doc.get_object(*id) {
            // A content array may itself be stored indirectly
            Ok(Object::Array(parts)) => concat_parts(parts, decoded),
            _ => decoded(id).unwrap_or_default(),
        },
        Ok(Object::Array(parts)) => concat_parts(parts, decoded),
        _ => Vec::new(),
    }
}

fn concat_parts(parts: &[Object], decoded: impl Fn(&ObjectId) -> Option<Vec<u8>>) -> Vec<u8> {
    let mut result = Vec::new();
    for part in parts {
        if let Some(content) = part.as_reference().ok().and_then(|id| decoded(&id)) {
            result.extend_from_slice(&content);
            result.push(b'\n');
        }
    }
    result
}

/// Copy `obj` into `output`, following references.
///
/// The new id is reserved before recursing so reference cycles terminate.
fn copy_object_deep(
    output: &mut Document,
    source: &Document,
    obj: &Object,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<Object, FormError> {
    match obj {
        Object::Reference(id) => {
            if let Some(&new_id) = cache.get(id) {
                return Ok(Object::Reference(new_id));
            }
            let new_id = output.new_object_id();
            cache.insert(*id, new_id);

            let copied = match source.get_object(*id) {
                Ok(referenced) => copy_object_deep(output, source, referenced, cache)?,
                // Dangling references read as null
                Err(_) => Object::Null,
            };
            output.objects.insert(new_id, copied);
            Ok(Object::Reference(new_id))
        }
        Object::Dictionary(dict) => Ok(Object::Dictionary(copy_dictionary(output, source, dict, cache)?)),
        Object::Array(items) => items
            .iter()
            .map(|item| copy_object_deep(output, source, item, cache))
            .collect::<Result<Vec<_>, _>>()
            .map(Object::Array),
        Object::Stream(stream) => {
            let dict = copy_dictionary(output, source, &stream.dict, cache)?;
            let mut copied = Stream::new(dict, stream.content.clone());
            copied.allows_compression = stream.allows_compression;
            Ok(Object::Stream(copied))
        }
        _ => Ok(obj.clone()),
    }
}

fn copy_dictionary(
    output: &mut Document,
    source: &Document,
    dict: &Dictionary,
    cache: &mut HashMap<ObjectId, ObjectId>,
) -> Result<Dictionary, FormError> {
    let mut copied = Dictionary::new();
    for (key, value) in dict.iter() {
        // Page tree links would drag the whole source tree along
        if key.as_slice() == b"Parent" {
            continue;
        }
        copied.set(key.clone(), copy_object_deep(output, source, value, cache)?);
    }
    Ok(copied)
}
