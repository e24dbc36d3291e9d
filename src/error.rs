use tabula_layout::{LayoutError, NothingCause, TableError};
use tabula_render_lopdf::RenderError;
use thiserror::Error;

/// A comprehensive error type for building and writing a document.
#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("Layout failed: {0}")]
    Layout(#[from] LayoutError),

    #[error("Invalid table: {0}")]
    Table(#[from] TableError),

    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration is invalid: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Content could not be placed even on an empty page (failed in {:?}).", .0.kind)]
    Unplaceable(NothingCause),
}
