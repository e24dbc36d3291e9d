//! Paginated, border-collapsed tables written to PDF.
//!
//! Build a [`Table`] model, hand it to a [`DocumentRenderer`] and write the pages out:
//!
//! ```no_run
//! use tabula::{Cell, DocumentConfig, DocumentRenderer, Table};
//!
//! let mut table = Table::with_equal_columns(2)?;
//! table.add_cell(Cell::new().with_block(12.0).with_label("left"))?;
//! table.add_cell(Cell::new().with_block(12.0).with_label("right"))?;
//!
//! let mut document = DocumentRenderer::new(DocumentConfig::default());
//! document.add_table(table)?;
//! document.write_pdf(&mut std::fs::File::create("table.pdf")?)?;
//! # Ok::<(), tabula::DocumentError>(())
//! ```

pub mod config;
pub mod document;
pub mod error;

pub use config::DocumentConfig;
pub use document::{DocumentRenderer, Page};
pub use error::DocumentError;

pub use tabula_layout::{
    Border, BorderStyle, Borders, Cell, CellContent, Color, LayoutConfig, LayoutStatus, Margins,
    Position, RenderNode, Side, Table, TableError, TableRenderer, VerticalAlignment,
};
pub use tabula_style::PageSize;
