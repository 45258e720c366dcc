use pd_core::{ElementId, ElementType};
use pd_render::RenderError;
use pd_store::StoreError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("no element with id {0}")]
    UnknownElement(ElementId),

    #[error("an element with id {0} already exists")]
    DuplicateId(ElementId),

    #[error("{property} does not apply to {element_type} elements")]
    VariantMismatch {
        property: &'static str,
        element_type: ElementType,
    },

    #[error("{property} must be a finite number, got {value}")]
    InvalidValue { property: &'static str, value: f64 },
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("design {0} not found")]
    NotFound(String),

    #[error(transparent)]
    Editor(#[from] EditorError),

    #[error("render failed: {0}")]
    Render(#[from] RenderError),

    #[error("store failed: {0}")]
    Store(#[from] StoreError),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
