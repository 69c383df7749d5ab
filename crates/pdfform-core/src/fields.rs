//! Form field data model
//!
//! Field placements arrive from the viewer as JSON (camelCase keys, `"type"`
//! discriminator) and are consumed by the export pipeline.

use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle in PDF points, bottom-left origin
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct PdfRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PdfRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Build the bounding rectangle of two opposite corners in any order
    pub fn from_corners(a: (f64, f64), b: (f64, f64)) -> Self {
        let min_x = a.0.min(b.0);
        let min_y = a.1.min(b.1);
        Self {
            x: min_x,
            y: min_y,
            width: a.0.max(b.0) - min_x,
            height: a.1.max(b.1) - min_y,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y + self.height
    }

    /// The four corners: bottom-left, bottom-right, top-right, top-left
    pub fn corners(&self) -> [(f64, f64); 4] {
        [
            (self.x, self.y),
            (self.right(), self.y),
            (self.right(), self.top()),
            (self.x, self.top()),
        ]
    }

    /// Whether the rectangle lies inside `[0, page_width] x [0, page_height]`
    pub fn fits_within(&self, page_width: f64, page_height: f64) -> bool {
        const EPSILON: f64 = 1e-9;
        self.x >= -EPSILON
            && self.y >= -EPSILON
            && self.right() <= page_width + EPSILON
            && self.top() <= page_height + EPSILON
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Checkbox,
    Date,
    Signature,
}

impl FieldType {
    /// Default dimensions for a field type (width, height) in points
    pub fn default_size(&self) -> (f64, f64) {
        match self {
            FieldType::Text => (150.0, 30.0),
            FieldType::Date => (100.0, 30.0),
            FieldType::Signature => (200.0, 50.0),
            FieldType::Checkbox => (20.0, 20.0),
        }
    }

    /// Lowercase name, also used for synthesized field names
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Checkbox => "checkbox",
            FieldType::Date => "date",
            FieldType::Signature => "signature",
        }
    }
}

impl std::str::FromStr for FieldType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" => Ok(FieldType::Text),
            "checkbox" => Ok(FieldType::Checkbox),
            "date" => Ok(FieldType::Date),
            "signature" => Ok(FieldType::Signature),
            other => Err(format!("Invalid field type: {}", other)),
        }
    }
}

/// A field placed by the user, in PDF points on a 0-based page
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FieldSpec {
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Signed so a bogus index from the viewer is skipped, not a parse error
    pub page_index: i64,
    pub x: f64,
    pub y: f64,
    /// Missing sizes are resolved from [`FieldType::default_size`]
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub name: Option<String>,
    /// Shown as the widget tooltip
    #[serde(default)]
    pub label: Option<String>,
}

impl FieldSpec {
    /// Create a field with the default size for its type
    pub fn new(field_type: FieldType, page_index: i64, x: f64, y: f64) -> Self {
        Self {
            field_type,
            page_index,
            x,
            y,
            width: None,
            height: None,
            name: None,
            label: None,
        }
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_sizes() {
        assert_eq!(FieldType::Text.default_size(), (150.0, 30.0));
        assert_eq!(FieldType::Date.default_size(), (100.0, 30.0));
        assert_eq!(FieldType::Signature.default_size(), (200.0, 50.0));
        assert_eq!(FieldType::Checkbox.default_size(), (20.0, 20.0));
    }

    #[test]
    fn test_from_corners_any_order() {
        let a = PdfRect::from_corners((10.0, 50.0), (30.0, 20.0));
        let b = PdfRect::from_corners((30.0, 20.0), (10.0, 50.0));
        assert_eq!(a, PdfRect::new(10.0, 20.0, 20.0, 30.0));
        assert_eq!(a, b);
    }

    #[test]
    fn test_field_type_parse() {
        assert_eq!("Checkbox".parse::<FieldType>(), Ok(FieldType::Checkbox));
        assert_eq!(" date ".parse::<FieldType>(), Ok(FieldType::Date));
        assert!("radio".parse::<FieldType>().is_err());
    }

    #[test]
    fn test_field_spec_deserializes_camel_case() {
        let json = r#"{
            "type": "signature",
            "pageIndex": 2,
            "x": 72,
            "y": 144.5,
            "height": 40,
            "name": "Buyer Signature"
        }"#;
        let spec: FieldSpec = serde_json::from_str(json).unwrap();
        assert_eq!(
            spec,
            FieldSpec {
                field_type: FieldType::Signature,
                page_index: 2,
                x: 72.0,
                y: 144.5,
                width: None,
                height: Some(40.0),
                name: Some("Buyer Signature".to_string()),
                label: None,
            }
        );
    }

    #[test]
    fn test_field_type_serializes_lowercase() {
        let spec = FieldSpec::new(FieldType::Checkbox, 0, 1.0, 2.0);
        let json = serde_json::to_string(&spec).unwrap();
        assert!(json.contains("\"type\":\"checkbox\""), "{}", json);
        assert!(json.contains("\"pageIndex\":0"), "{}", json);
    }
}
