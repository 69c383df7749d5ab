//! Form field name sanitizing and de-duplication
//!
//! AcroForm readers address fields by their `/T` name, so names are limited
//! to `[A-Za-z0-9_.-]` and must be unique within one export.

use crate::fields::FieldType;
use std::collections::HashSet;

/// Sanitize a user-supplied field name.
///
/// Whitespace runs become a single `_`, characters outside `[A-Za-z0-9_.-]`
/// are dropped and leading/trailing underscores are stripped. An empty
/// result falls back to `fallback`.
pub fn sanitize_field_name(raw: &str, fallback: &str) -> String {
    let mut cleaned = String::with_capacity(raw.len());
    let mut in_whitespace = false;

    for c in raw.trim().chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                cleaned.push('_');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') {
            cleaned.push(c);
        }
    }

    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        fallback.to_string()
    } else {
        trimmed.to_string()
    }
}

/// Synthesized name for a field without a usable name: `{type}_{ordinal}`
pub fn fallback_field_name(field_type: FieldType, ordinal: usize) -> String {
    format!("{}_{}", field_type.as_str(), ordinal)
}

/// Hands out unique, sanitized field names for one export
#[derive(Debug, Default)]
pub struct FieldNameAllocator {
    used: HashSet<String>,
}

impl FieldNameAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from names already present in the document
    pub fn with_existing<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            used: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Allocate a unique name for the field at `ordinal` (1-based).
    ///
    /// On collision `_2`, `_3`, ... are appended until the name is free.
    pub fn allocate(&mut self, raw: Option<&str>, field_type: FieldType, ordinal: usize) -> String {
        let fallback = fallback_field_name(field_type, ordinal);
        let base = sanitize_field_name(raw.unwrap_or(""), &fallback);

        let mut candidate = base.clone();
        let mut suffix = 2usize;
        while self.used.contains(&candidate) {
            candidate = format!("{}_{}", base, suffix);
            suffix += 1;
        }

        self.used.insert(candidate.clone());
        candidate
    }

    #[cfg(test)]
    fn is_used(&self, name: &str) -> bool {
        self.used.contains(name)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.used.len()
    }
}
