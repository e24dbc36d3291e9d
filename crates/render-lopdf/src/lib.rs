//! PDF output for laid-out tables using lopdf.
//!
//! [`PdfCanvas`] turns draw calls into content-stream operators; [`PdfWriter`]
//! collects page streams into a document and serialises it.

mod canvas;
mod error;
mod writer;

pub use canvas::PdfCanvas;
pub use error::RenderError;
pub use writer::PdfWriter;

/// Resource name of the font used for content labels.
pub const LABEL_FONT: &str = "F1";
