use thiserror::Error;

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Malformed grid: cell at row {row}, column {col} spans {colspan} columns but the table has {columns}.")]
    MalformedGrid {
        row: usize,
        col: usize,
        colspan: usize,
        columns: usize,
    },
    #[error("Generic layout error: {0}")]
    Generic(String),
}

/// Construction-time violations of the table grid.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TableError {
    #[error("A table needs at least one column.")]
    NoColumns,
    #[error("Column {column} has a non-positive width weight of {weight}.")]
    NonPositiveWeight { column: usize, weight: f32 },
    #[error("Cell spans must be at least 1, got rowspan {rowspan} and colspan {colspan}.")]
    ZeroSpan { rowspan: usize, colspan: usize },
    #[error("Cell colspan {colspan} exceeds the table's {columns} columns.")]
    ColspanTooWide { colspan: usize, columns: usize },
    #[error("The {part} has {found} columns but the table has {expected}.")]
    ColumnMismatch {
        part: &'static str,
        expected: usize,
        found: usize,
    },
}

pub mod config;
pub mod interface;
pub mod model;
pub mod node_kind;
pub mod nodes;
pub mod painting;
pub mod properties;

pub use self::config::LayoutConfig;
pub use self::interface::{
    CellPosition, LayoutContext, LayoutResult, LayoutStatus, NothingCause, Renderer,
};
pub use self::model::{Cell, CellContent, ElementId, Table};
pub use self::node_kind::NodeKind;
pub use self::nodes::{CellRenderer, LeafRenderer, RenderNode, TableRenderer};
pub use self::painting::{DrawContext, DrawOp, DrawingCanvas, RecordingCanvas, TagRole, TagTree, TagTreePointer};
pub use self::properties::{Position, Properties};

// Re-export geometry and border types used throughout the public API
pub use tabula_style::{Border, BorderStyle, Borders, Margins, Side, VerticalAlignment};
pub use tabula_types::{Color, LayoutArea, Rect};

#[cfg(test)]
mod test_utils;
