//! Persisted design records.

use crate::id::new_design_id;
use crate::model::{CanvasSize, Element};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_TITLE: &str = "Untitled design";
pub const DEFAULT_CATEGORY: &str = "custom";
/// Appended to the title of a duplicated design.
pub const COPY_SUFFIX: &str = " (副本)";

/// A named, saved element sequence plus metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignRecord {
    pub id: String,
    pub title: String,
    pub elements: Vec<Element>,
    /// PNG data URI of the rendered design.
    #[serde(default)]
    pub thumbnail: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub size: CanvasSize,
    #[serde(default = "default_category")]
    pub category: String,
}

fn default_category() -> String {
    DEFAULT_CATEGORY.to_string()
}

impl DesignRecord {
    /// A fresh, empty record stamped with the current time.
    pub fn new(title: impl Into<String>, size: CanvasSize) -> Self {
        let now = Utc::now();
        Self {
            id: new_design_id(),
            title: title.into(),
            elements: Vec::new(),
            thumbnail: String::new(),
            created_at: now,
            updated_at: now,
            size,
            category: default_category(),
        }
    }

    /// Clone under a new id with fresh timestamps and a copy-marked title.
    /// The element sequence is carried over unchanged.
    pub fn duplicate(&self) -> Self {
        let now = Utc::now();
        Self {
            id: new_design_id(),
            title: format!("{}{}", self.title, COPY_SUFFIX),
            created_at: now,
            updated_at: now,
            ..self.clone()
        }
    }

    /// File name used when the rendered design is downloaded.
    pub fn file_name(&self) -> String {
        export_file_name(&self.title)
    }
}

/// `<title>.png`, with path separators replaced so the name stays a single
/// path component.
pub fn export_file_name(title: &str) -> String {
    let title = title.trim();
    let stem: String = if title.is_empty() {
        DEFAULT_TITLE.to_string()
    } else {
        title
            .chars()
            .map(|c| if matches!(c, '/' | '\\' | '\0') { '_' } else { c })
            .collect()
    };
    format!("{stem}.png")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ElementKind, Frame, ShapeContent};
    use pretty_assertions::assert_eq;

    #[test]
    fn duplicate_marks_title_and_keeps_elements() {
        let mut rec = DesignRecord::new("Spring sale", CanvasSize::POSTER);
        rec.elements.push(Element::new(
            Frame::new(0.0, 0.0, 10.0, 10.0),
            ElementKind::Shape(ShapeContent::default()),
        ));
        let copy = rec.duplicate();
        assert_ne!(copy.id, rec.id);
        assert_eq!(copy.title, "Spring sale (副本)");
        assert_eq!(copy.elements, rec.elements);
        assert!(copy.created_at >= rec.created_at);
    }

    #[test]
    fn record_json_uses_camel_case_and_size_string() {
        let rec = DesignRecord::new("x", CanvasSize::new(800, 1200));
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["size"], "800x1200");
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_some());
        assert_eq!(json["category"], "custom");
    }

    #[test]
    fn file_name_is_single_component() {
        assert_eq!(export_file_name("a/b"), "a_b.png");
        assert_eq!(export_file_name("  "), "Untitled design.png");
    }
}
