//! AcroForm widget synthesis
//!
//! Builds merged field/widget dictionaries with appearance streams, registers
//! them in the catalog's `/AcroForm` and attaches them to their page's
//! `/Annots`. Works on documents that already carry a form: the existing
//! `/AcroForm` is reused whether it is inline or referenced.

use crate::config::FieldAppearance;
use crate::error::FormError;
use crate::fields::{FieldType, PdfRect};
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};

/// Field hierarchies nested deeper than this are not walked
const MAX_FIELD_DEPTH: usize = 32;

/// ZapfDingbats check mark glyph
const CHECK_GLYPH: &str = "4";

/// Escape special characters for a literal string inside a content stream.
///
/// Non-ASCII characters become `?`: appearance text is drawn with a
/// standard 14 font, which has no glyphs for them.
pub fn escape_pdf_string(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '(' => "\\(".to_string(),
            ')' => "\\)".to_string(),
            '\\' => "\\\\".to_string(),
            _ if c.is_ascii() && !c.is_ascii_control() => c.to_string(),
            _ => "?".to_string(),
        })
        .collect()
}

/// A PDF text string: literal for ASCII, UTF-16BE with BOM otherwise
pub fn text_string(s: &str) -> Object {
    if s.is_ascii() {
        Object::String(s.as_bytes().to_vec(), StringFormat::Literal)
    } else {
        let mut bytes = vec![0xFE, 0xFF];
        bytes.extend(s.encode_utf16().flat_map(u16::to_be_bytes));
        Object::String(bytes, StringFormat::Hexadecimal)
    }
}

/// Decode a PDF text string (UTF-16BE with BOM, otherwise byte-per-char)
pub fn decode_text_string(bytes: &[u8]) -> String {
    match bytes {
        [0xFE, 0xFF, rest @ ..] => {
            let units: Vec<u16> = rest
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        _ => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}

/// What kind of widget to synthesize
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetKind {
    /// `/FT /Tx` with a starting value
    Text { value: String },
    /// `/FT /Btn` with `Yes`/`Off` appearances
    Checkbox,
}

impl WidgetKind {
    /// Signature boxes become empty text fields, date fields start with the
    /// configured placeholder
    pub fn for_field(field_type: FieldType, appearance: &FieldAppearance) -> Self {
        match field_type {
            FieldType::Checkbox => WidgetKind::Checkbox,
            FieldType::Date => WidgetKind::Text {
                value: appearance.date_placeholder.clone(),
            },
            FieldType::Text | FieldType::Signature => WidgetKind::Text {
                value: String::new(),
            },
        }
    }
}

/// One widget to place
#[derive(Debug, Clone)]
pub struct WidgetSpec<'a> {
    pub name: &'a str,
    pub label: Option<&'a str>,
    pub kind: WidgetKind,
    /// Absolute rectangle in the page's user space
    pub rect: PdfRect,
}

/// Return the id of the catalog's `/AcroForm`, creating it if needed.
///
/// An inline form dictionary is moved into its own object so later edits go
/// through one path. Default resources and `/NeedAppearances` are ensured.
pub fn ensure_acroform(doc: &mut Document) -> Result<ObjectId, FormError> {
    let existing = doc
        .catalog()
        .map_err(|e| FormError::Structure(format!("Failed to get catalog: {}", e)))?
        .get(b"AcroForm")
        .ok()
        .cloned();

    let acroform_id = match existing {
        Some(Object::Reference(id)) => id,
        Some(Object::Dictionary(inline)) => doc.add_object(Object::Dictionary(inline)),
        _ => doc.add_object(dictionary! { "Fields" => Vec::<Object>::new() }),
    };

    doc.catalog_mut()
        .map_err(|e| FormError::Structure(format!("Failed to get catalog: {}", e)))?
        .set("AcroForm", Object::Reference(acroform_id));

    let acroform = doc
        .get_object_mut(acroform_id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| FormError::Structure(format!("AcroForm is not a dictionary: {}", e)))?;

    if acroform.get(b"Fields").is_err() {
        acroform.set("Fields", Vec::<Object>::new());
    }
    if acroform.get(b"DA").is_err() {
        acroform.set("DA", Object::string_literal("/Helv 0 Tf 0 g"));
    }
    acroform.set("NeedAppearances", true);

    let fonts = default_fonts();
    match acroform.get_mut(b"DR") {
        Ok(Object::Dictionary(resources)) => match resources.get_mut(b"Font") {
            Ok(Object::Dictionary(existing_fonts)) => {
                for (key, font) in fonts.iter() {
                    if existing_fonts.get(key).is_err() {
                        existing_fonts.set(key.clone(), font.clone());
                    }
                }
            }
            Ok(_) => {}
            Err(_) => resources.set("Font", fonts),
        },
        // Shared resource dictionaries are left alone
        Ok(_) => {}
        Err(_) => acroform.set("DR", dictionary! { "Font" => fonts }),
    }

    Ok(acroform_id)
}

fn default_fonts() -> Dictionary {
    dictionary! {
        "Helv" => dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        },
        "ZaDb" => dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "ZapfDingbats",
        },
    }
}

/// Fully qualified names of every field already in the document
pub fn existing_field_names(doc: &Document) -> Vec<String> {
    let mut names = Vec::new();

    let Some(acroform) = doc
        .catalog()
        .ok()
        .and_then(|catalog| catalog.get(b"AcroForm").ok())
        .and_then(|object| resolve_dict(doc, object))
    else {
        return names;
    };

    if let Some(fields) = acroform
        .get(b"Fields")
        .ok()
        .and_then(|object| resolve_array(doc, object))
    {
        collect_field_names(doc, fields, None, 0, &mut names);
    }
    names
}

fn collect_field_names(
    doc: &Document,
    fields: &[Object],
    prefix: Option<&str>,
    depth: usize,
    names: &mut Vec<String>,
) {
    if depth >= MAX_FIELD_DEPTH {
        return;
    }
    for field in fields {
        let Some(dict) = resolve_dict(doc, field) else {
            continue;
        };
        let partial = dict.get(b"T").ok().and_then(|t| match t {
            Object::String(bytes, _) => Some(decode_text_string(bytes)),
            _ => None,
        });
        let full = match (prefix, partial) {
            (Some(p), Some(t)) => Some(format!("{}.{}", p, t)),
            (None, Some(t)) => Some(t),
            (p, None) => p.map(str::to_string),
        };

        let kids = dict.get(b"Kids").ok().and_then(|k| resolve_array(doc, k));
        match kids {
            Some(kids) => collect_field_names(doc, kids, full.as_deref(), depth + 1, names),
            None => {
                if let Some(name) = full {
                    names.push(name);
                }
            }
        }
    }
}

fn resolve_dict<'a>(doc: &'a Document, object: &'a Object) -> Option<&'a Dictionary> {
    match object {
        Object::Reference(id) => doc.get_object(*id).ok()?.as_dict().ok(),
        Object::Dictionary(dict) => Some(dict),
        _ => None,
    }
}

fn resolve_array<'a>(doc: &'a Document, object: &'a Object) -> Option<&'a Vec<Object>> {
    match object {
        Object::Reference(id) => doc.get_object(*id).ok()?.as_array().ok(),
        Object::Array(array) => Some(array),
        _ => None,
    }
}

/// Create a widget on `page_id` and register it in the form.
///
/// Returns the id of the new field/widget object.
pub fn add_widget(
    doc: &mut Document,
    acroform_id: ObjectId,
    page_id: ObjectId,
    widget: &WidgetSpec<'_>,
    appearance: &FieldAppearance,
) -> Result<ObjectId, FormError> {
    let PdfRect { width, height, .. } = widget.rect;
    let mut field = Dictionary::new();

    field.set("Type", "Annot");
    field.set("Subtype", "Widget");
    field.set("T", text_string(widget.name));
    if let Some(label) = widget.label.filter(|l| !l.trim().is_empty()) {
        field.set("TU", text_string(label));
    }
    field.set(
        "Rect",
        vec![
            Object::Real(widget.rect.x as f32),
            Object::Real(widget.rect.y as f32),
            Object::Real(widget.rect.right() as f32),
            Object::Real(widget.rect.top() as f32),
        ],
    );
    // Print
    field.set("F", 4);
    field.set("P", Object::Reference(page_id));
    field.set(
        "MK",
        dictionary! {
            "BC" => color_array(appearance.border_rgb()),
            "BG" => color_array(appearance.background_rgb()),
        },
    );
    field.set(
        "BS",
        dictionary! {
            "Type" => "Border",
            "W" => Object::Real(appearance.border_width as f32),
            "S" => "S",
        },
    );

    match &widget.kind {
        WidgetKind::Text { value } => {
            let font_size = text_font_size(appearance, height);
            field.set("FT", "Tx");
            field.set("V", text_string(value));
            field.set(
                "DA",
                Object::string_literal(format!(
                    "/Helv {} Tf {}",
                    appearance.font_size,
                    fill_color(appearance.text_rgb())
                )),
            );
            let stream = text_appearance(width, height, value, font_size, appearance);
            let stream_id = doc.add_object(stream);
            field.set("AP", dictionary! { "N" => stream_id });
        }
        WidgetKind::Checkbox => {
            field.set("FT", "Btn");
            field.set("V", "Off");
            field.set("AS", "Off");
            field.set(
                "DA",
                Object::string_literal(format!(
                    "/ZaDb 0 Tf {}",
                    fill_color(appearance.text_rgb())
                )),
            );
            if let Ok(Object::Dictionary(mk)) = field.get_mut(b"MK") {
                mk.set("CA", Object::string_literal(CHECK_GLYPH));
            }
            let on_id = doc.add_object(checkbox_appearance(width, height, true, appearance));
            let off_id = doc.add_object(checkbox_appearance(width, height, false, appearance));
            field.set(
                "AP",
                dictionary! {
                    "N" => dictionary! { "Yes" => on_id, "Off" => off_id },
                },
            );
        }
    }

    let field_id = doc.add_object(field);
    append_to_array(doc, acroform_id, b"Fields", Object::Reference(field_id))?;
    append_to_array(doc, page_id, b"Annots", Object::Reference(field_id))?;
    Ok(field_id)
}

/// Push `value` onto the array stored under `key` in dictionary `holder_id`,
/// following the entry if it is an indirect reference
fn append_to_array(
    doc: &mut Document,
    holder_id: ObjectId,
    key: &[u8],
    value: Object,
) -> Result<(), FormError> {
    let key_name = String::from_utf8_lossy(key).into_owned();

    let referenced = {
        let holder = doc
            .get_object(holder_id)
            .and_then(Object::as_dict)
            .map_err(|e| FormError::Structure(format!("Object holding {} is not a dictionary: {}", key_name, e)))?;
        holder.get(key).ok().and_then(|o| o.as_reference().ok())
    };

    if let Some(array_id) = referenced {
        let array = doc
            .get_object_mut(array_id)
            .and_then(Object::as_array_mut)
            .map_err(|e| FormError::Structure(format!("{} reference is not an array: {}", key_name, e)))?;
        array.push(value);
        return Ok(());
    }

    let holder = doc
        .get_object_mut(holder_id)
        .and_then(Object::as_dict_mut)
        .map_err(|e| FormError::Structure(format!("Object holding {} is not a dictionary: {}", key_name, e)))?;
    match holder.get_mut(key) {
        Ok(Object::Array(array)) => array.push(value),
        _ => holder.set(key_name, vec![value]),
    }
    Ok(())
}

fn color_array(rgb: [f32; 3]) -> Object {
    Object::Array(rgb.iter().map(|&c| Object::Real(c)).collect())
}

fn fill_color(rgb: [f32; 3]) -> String {
    format!("{} {} {} rg", rgb[0], rgb[1], rgb[2])
}

fn stroke_color(rgb: [f32; 3]) -> String {
    format!("{} {} {} RG", rgb[0], rgb[1], rgb[2])
}

/// Configured size, or one that fits the box when auto-sizing
fn text_font_size(appearance: &FieldAppearance, height: f64) -> f64 {
    if appearance.font_size > 0.0 {
        appearance.font_size
    } else {
        (height * 0.6).clamp(6.0, 14.0)
    }
}

/// Background fill and border shared by every widget appearance
fn frame_operators(width: f64, height: f64, appearance: &FieldAppearance) -> String {
    let mut ops = format!(
        "{}\n0 0 {} {} re f\n",
        fill_color(appearance.background_rgb()),
        width,
        height
    );
    let border = appearance.border_width;
    if border > 0.0 {
        ops.push_str(&format!(
            "{}\n{} w\n{} {} {} {} re S\n",
            stroke_color(appearance.border_rgb()),
            border,
            border / 2.0,
            border / 2.0,
            (width - border).max(0.0),
            (height - border).max(0.0),
        ));
    }
    ops
}

fn form_xobject(width: f64, height: f64, resources: Dictionary, content: String) -> Stream {
    let stream_dict = dictionary! {
        "Type" => "XObject",
        "Subtype" => "Form",
        "FormType" => 1,
        "BBox" => vec![
            0.into(),
            0.into(),
            Object::Real(width as f32),
            Object::Real(height as f32),
        ],
        "Resources" => resources,
    };
    Stream::new(stream_dict, content.into_bytes())
}

fn text_appearance(
    width: f64,
    height: f64,
    value: &str,
    font_size: f64,
    appearance: &FieldAppearance,
) -> Stream {
    let mut content = format!("q\n{}Q\n/Tx BMC\n", frame_operators(width, height, appearance));
    if !value.is_empty() {
        let text_x = appearance.border_width + 2.0;
        let baseline = ((height - font_size) / 2.0).max(0.0) + font_size * 0.22;
        content.push_str(&format!(
            "q\n{clip} {clip} {cw} {ch} re W n\nBT\n/Helv {fs} Tf\n{color}\n{tx} {ty} Td\n({text}) Tj\nET\nQ\n",
            clip = appearance.border_width,
            cw = (width - 2.0 * appearance.border_width).max(0.0),
            ch = (height - 2.0 * appearance.border_width).max(0.0),
            fs = font_size,
            color = fill_color(appearance.text_rgb()),
            tx = text_x,
            ty = baseline,
            text = escape_pdf_string(value),
        ));
    }
    content.push_str("EMC\n");

    form_xobject(
        width,
        height,
        dictionary! { "Font" => dictionary! { "Helv" => default_fonts_entry(b"Helv") } },
        content,
    )
}

fn checkbox_appearance(width: f64, height: f64, checked: bool, appearance: &FieldAppearance) -> Stream {
    let mut content = format!("q\n{}Q\n", frame_operators(width, height, appearance));
    if checked {
        let size = width.min(height) * 0.8;
        content.push_str(&format!(
            "q\nBT\n/ZaDb {fs} Tf\n{color}\n{tx} {ty} Td\n({glyph}) Tj\nET\nQ\n",
            fs = size,
            color = fill_color(appearance.text_rgb()),
            tx = (width - size * 0.85) / 2.0,
            ty = (height - size * 0.7) / 2.0,
            glyph = CHECK_GLYPH,
        ));
    }

    form_xobject(
        width,
        height,
        dictionary! { "Font" => dictionary! { "ZaDb" => default_fonts_entry(b"ZaDb") } },
        content,
    )
}

fn default_fonts_entry(key: &[u8]) -> Object {
    default_fonts()
        .get(key)
        .cloned()
        .unwrap_or(Object::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn create_single_page_pdf() -> (Document, ObjectId) {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        });
        doc.objects.insert(
            pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => vec![page_id.into()],
                "Count" => 1,
            }),
        );
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        (doc, page_id)
    }

    fn field_dict(doc: &Document, id: ObjectId) -> &Dictionary {
        doc.get_object(id).unwrap().as_dict().unwrap()
    }

    fn string_value(object: &Object) -> String {
        match object {
            Object::String(bytes, _) => decode_text_string(bytes),
            other => panic!("not a string: {:?}", other),
        }
    }

    fn references(object: &Object) -> Vec<ObjectId> {
        object
            .as_array()
            .unwrap()
            .iter()
            .map(|o| o.as_reference().unwrap())
            .collect()
    }

    #[test]
    fn test_escape_pdf_string_basic() {
        assert_eq!(escape_pdf_string("Hello"), "Hello");
        assert_eq!(escape_pdf_string("(test)"), "\\(test\\)");
        assert_eq!(escape_pdf_string("back\\slash"), "back\\\\slash");
        assert_eq!(escape_pdf_string("día"), "d?a");
    }

    #[test]
    fn test_text_string_encoding() {
        match text_string("Name") {
            Object::String(bytes, StringFormat::Literal) => assert_eq!(bytes, b"Name".to_vec()),
            other => panic!("unexpected {:?}", other),
        }
        match text_string("é") {
            Object::String(bytes, StringFormat::Hexadecimal) => {
                assert_eq!(bytes, vec![0xFE, 0xFF, 0x00, 0xE9]);
                assert_eq!(decode_text_string(&bytes), "é");
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_ensure_acroform_creates_form() {
        let (mut doc, _) = create_single_page_pdf();
        let acroform_id = ensure_acroform(&mut doc).unwrap();

        let catalog = doc.catalog().unwrap();
        assert_eq!(catalog.get(b"AcroForm").unwrap().as_reference().unwrap(), acroform_id);

        let acroform = field_dict(&doc, acroform_id);
        assert!(acroform.get(b"Fields").unwrap().as_array().unwrap().is_empty());
        assert!(acroform.get(b"NeedAppearances").unwrap().as_bool().unwrap());
        let fonts = acroform.get(b"DR").unwrap().as_dict().unwrap().get(b"Font").unwrap();
        let fonts = fonts.as_dict().unwrap();
        assert!(fonts.get(b"Helv").is_ok());
        assert!(fonts.get(b"ZaDb").is_ok());
    }

    #[test]
    fn test_ensure_acroform_reuses_inline_form() {
        let (mut doc, _) = create_single_page_pdf();
        let existing = doc.add_object(dictionary! { "FT" => "Tx", "T" => Object::string_literal("old") });
        doc.catalog_mut().unwrap().set(
            "AcroForm",
            dictionary! {
                "Fields" => vec![existing.into()],
                "DR" => dictionary! { "Font" => dictionary! { "Helv" => Object::Null } },
            },
        );

        let acroform_id = ensure_acroform(&mut doc).unwrap();
        let acroform = field_dict(&doc, acroform_id);
        assert_eq!(acroform.get(b"Fields").unwrap().as_array().unwrap().len(), 1);

        // Existing font entries are kept, missing ones added
        let fonts = acroform.get(b"DR").unwrap().as_dict().unwrap().get(b"Font").unwrap();
        let fonts = fonts.as_dict().unwrap();
        assert!(matches!(fonts.get(b"Helv").unwrap(), Object::Null));
        assert!(fonts.get(b"ZaDb").is_ok());
    }

    #[test]
    fn test_existing_field_names_walks_kids() {
        let (mut doc, _) = create_single_page_pdf();
        let kid_a = doc.add_object(dictionary! { "T" => Object::string_literal("first") });
        let kid_b = doc.add_object(dictionary! { "T" => Object::string_literal("last") });
        let parent = doc.add_object(dictionary! {
            "T" => Object::string_literal("buyer"),
            "Kids" => vec![kid_a.into(), kid_b.into()],
        });
        let plain = doc.add_object(dictionary! { "T" => Object::string_literal("text_1") });
        let fields = doc.add_object(Object::Array(vec![parent.into(), plain.into()]));
        let acroform = doc.add_object(dictionary! { "Fields" => fields });
        doc.catalog_mut().unwrap().set("AcroForm", acroform);

        assert_eq!(
            existing_field_names(&doc),
            vec!["buyer.first".to_string(), "buyer.last".to_string(), "text_1".to_string()]
        );
    }

    #[test]
    fn test_existing_field_names_without_form() {
        let (doc, _) = create_single_page_pdf();
        assert!(existing_field_names(&doc).is_empty());
    }

    #[test]
    fn test_add_text_widget() {
        let (mut doc, page_id) = create_single_page_pdf();
        let acroform_id = ensure_acroform(&mut doc).unwrap();
        let appearance = FieldAppearance::default();
        let widget = WidgetSpec {
            name: "due_date",
            label: Some("Due date"),
            kind: WidgetKind::for_field(FieldType::Date, &appearance),
            rect: PdfRect::new(72.0, 100.0, 100.0, 30.0),
        };

        let field_id = add_widget(&mut doc, acroform_id, page_id, &widget, &appearance).unwrap();
        let field = field_dict(&doc, field_id);

        assert_eq!(field.get(b"FT").unwrap().as_name().unwrap(), b"Tx");
        assert_eq!(field.get(b"Subtype").unwrap().as_name().unwrap(), b"Widget");
        assert_eq!(string_value(field.get(b"T").unwrap()), "due_date");
        assert_eq!(string_value(field.get(b"TU").unwrap()), "Due date");
        assert_eq!(string_value(field.get(b"V").unwrap()), "YYYY-MM-DD");
        assert_eq!(field.get(b"P").unwrap().as_reference().unwrap(), page_id);
        assert!(field.get(b"MK").is_ok());
        assert!(field.get(b"BS").is_ok());

        let rect: Vec<f32> = field
            .get(b"Rect")
            .unwrap()
            .as_array()
            .unwrap()
            .iter()
            .map(|o| o.as_float().unwrap())
            .collect();
        assert_eq!(rect, vec![72.0, 100.0, 172.0, 130.0]);

        let ap_id = field
            .get(b"AP")
            .unwrap()
            .as_dict()
            .unwrap()
            .get(b"N")
            .unwrap()
            .as_reference()
            .unwrap();
        let stream = doc.get_object(ap_id).unwrap().as_stream().unwrap();
        let content = String::from_utf8_lossy(&stream.content);
        assert!(content.contains("(YYYY-MM-DD) Tj"), "{}", content);
        assert!(content.contains("/Tx BMC"));

        let fields = field_dict(&doc, acroform_id).get(b"Fields").unwrap();
        assert_eq!(references(fields), vec![field_id]);
        let annots = field_dict(&doc, page_id).get(b"Annots").unwrap();
        assert_eq!(references(annots), vec![field_id]);
    }

    #[test]
    fn test_non_ascii_placeholder_keeps_value() {
        let (mut doc, page_id) = create_single_page_pdf();
        let acroform_id = ensure_acroform(&mut doc).unwrap();
        let appearance = FieldAppearance {
            date_placeholder: "JJ/MM/AAAA é".to_string(),
            ..FieldAppearance::default()
        };
        let widget = WidgetSpec {
            name: "date_1",
            label: None,
            kind: WidgetKind::for_field(FieldType::Date, &appearance),
            rect: PdfRect::new(72.0, 100.0, 100.0, 30.0),
        };

        let field_id = add_widget(&mut doc, acroform_id, page_id, &widget, &appearance).unwrap();
        let field = field_dict(&doc, field_id);
        assert_eq!(string_value(field.get(b"V").unwrap()), "JJ/MM/AAAA é");

        let ap_id = field
            .get(b"AP")
            .unwrap()
            .as_dict()
            .unwrap()
            .get(b"N")
            .unwrap()
            .as_reference()
            .unwrap();
        let stream = doc.get_object(ap_id).unwrap().as_stream().unwrap();
        let content = String::from_utf8_lossy(&stream.content);
        assert!(content.contains("(JJ/MM/AAAA ?) Tj"), "{}", content);

        let form = field_dict(&doc, acroform_id);
        assert!(form.get(b"NeedAppearances").unwrap().as_bool().unwrap());
    }

    #[test]
    fn test_add_checkbox_widget() {
        let (mut doc, page_id) = create_single_page_pdf();
        let acroform_id = ensure_acroform(&mut doc).unwrap();
        let appearance = FieldAppearance::default();
        let widget = WidgetSpec {
            name: "agree",
            label: None,
            kind: WidgetKind::Checkbox,
            rect: PdfRect::new(10.0, 10.0, 20.0, 20.0),
        };

        let field_id = add_widget(&mut doc, acroform_id, page_id, &widget, &appearance).unwrap();
        let field = field_dict(&doc, field_id);

        assert_eq!(field.get(b"FT").unwrap().as_name().unwrap(), b"Btn");
        assert_eq!(field.get(b"AS").unwrap().as_name().unwrap(), b"Off");
        assert!(field.get(b"TU").is_err());
        let normal = field
            .get(b"AP")
            .unwrap()
            .as_dict()
            .unwrap()
            .get(b"N")
            .unwrap()
            .as_dict()
            .unwrap();
        assert!(normal.get(b"Yes").is_ok());
        assert!(normal.get(b"Off").is_ok());
    }

    #[test]
    fn test_signature_becomes_empty_text_field() {
        let kind = WidgetKind::for_field(FieldType::Signature, &FieldAppearance::default());
        assert_eq!(kind, WidgetKind::Text { value: String::new() });
    }

    #[test]
    fn test_annots_by_reference_are_extended() {
        let (mut doc, page_id) = create_single_page_pdf();
        let other = doc.add_object(dictionary! { "Type" => "Annot", "Subtype" => "Text" });
        let annots_id = doc.add_object(Object::Array(vec![other.into()]));
        doc.get_object_mut(page_id)
            .unwrap()
            .as_dict_mut()
            .unwrap()
            .set("Annots", annots_id);

        let acroform_id = ensure_acroform(&mut doc).unwrap();
        let appearance = FieldAppearance::default();
        let widget = WidgetSpec {
            name: "notes",
            label: None,
            kind: WidgetKind::Text { value: String::new() },
            rect: PdfRect::new(0.0, 0.0, 150.0, 30.0),
        };
        let field_id = add_widget(&mut doc, acroform_id, page_id, &widget, &appearance).unwrap();

        let annots = doc.get_object(annots_id).unwrap();
        assert_eq!(references(annots), vec![other, field_id]);
        // The page still points at the shared array
        let page = field_dict(&doc, page_id);
        assert_eq!(page.get(b"Annots").unwrap().as_reference().unwrap(), annots_id);
    }
}
