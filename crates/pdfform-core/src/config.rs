//! Export options
//!
//! Options come from a TOML file for the CLI or a JSON object from the
//! browser. Every key is optional and falls back to its default.
//!
//! ```toml
//! normalize_page_rotation = true
//!
//! [appearance]
//! font_size = 11
//! border_color = "#1f4fbf"
//! ```

use crate::error::FormError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Options controlling one export
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExportOptions {
    /// Bake `/Rotate` into page content and re-project the fields
    #[serde(default, alias = "normalizePageRotation")]
    pub normalize_page_rotation: bool,

    #[serde(default)]
    pub appearance: FieldAppearance,
}

impl ExportOptions {
    pub fn with_rotation_normalized(mut self, normalize: bool) -> Self {
        self.normalize_page_rotation = normalize;
        self
    }

    /// Load options from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, FormError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            FormError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse options from a TOML string
    pub fn from_toml_str(s: &str) -> Result<Self, FormError> {
        let options: Self = toml::from_str(s).map_err(|e| FormError::Config(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Parse options from a JSON string; an empty string yields the defaults
    pub fn from_json_str(s: &str) -> Result<Self, FormError> {
        if s.trim().is_empty() {
            return Ok(Self::default());
        }
        let options: Self = serde_json::from_str(s).map_err(|e| FormError::Config(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> Result<(), FormError> {
        self.appearance.validate()
    }
}

/// Visual style of synthesized widgets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldAppearance {
    /// Font size for text widgets; 0 lets the reader auto-size
    pub font_size: f64,
    pub border_width: f64,
    /// Colors as `#rrggbb`
    pub border_color: String,
    pub background_color: String,
    pub text_color: String,
    /// Starting value of date fields.
    ///
    /// `/V` keeps any text, but the prebuilt appearance uses the standard
    /// Helvetica encoding and draws non-ASCII characters as `?` until the
    /// reader regenerates it (`/NeedAppearances` is set).
    pub date_placeholder: String,
}

impl Default for FieldAppearance {
    fn default() -> Self {
        Self {
            font_size: 10.0,
            border_width: 1.0,
            border_color: "#1f4fbf".to_string(),
            background_color: "#eef3ff".to_string(),
            text_color: "#000000".to_string(),
            date_placeholder: "YYYY-MM-DD".to_string(),
        }
    }
}

impl FieldAppearance {
    pub fn validate(&self) -> Result<(), FormError> {
        if !self.font_size.is_finite() || self.font_size < 0.0 {
            return Err(FormError::Config(format!(
                "font_size must be a non-negative number, got {}",
                self.font_size
            )));
        }
        if !self.border_width.is_finite() || self.border_width < 0.0 {
            return Err(FormError::Config(format!(
                "border_width must be a non-negative number, got {}",
                self.border_width
            )));
        }
        for (key, value) in [
            ("border_color", &self.border_color),
            ("background_color", &self.background_color),
            ("text_color", &self.text_color),
        ] {
            if parse_hex_color(value).is_none() {
                return Err(FormError::Config(format!(
                    "{} must look like #rrggbb, got {:?}",
                    key, value
                )));
            }
        }
        Ok(())
    }

    pub fn border_rgb(&self) -> [f32; 3] {
        parse_hex_color(&self.border_color).unwrap_or([0.0; 3])
    }

    pub fn background_rgb(&self) -> [f32; 3] {
        parse_hex_color(&self.background_color).unwrap_or([1.0; 3])
    }

    pub fn text_rgb(&self) -> [f32; 3] {
        parse_hex_color(&self.text_color).unwrap_or([0.0; 3])
    }
}

/// Parse `#rrggbb` (leading `#` optional) into RGB components in `[0, 1]`
pub fn parse_hex_color(color: &str) -> Option<[f32; 3]> {
    let hex = color.trim().trim_start_matches('#');
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&hex[range], 16)
            .ok()
            .map(|v| f32::from(v) / 255.0)
    };
    Some([channel(0..2)?, channel(2..4)?, channel(4..6)?])
}
