//! The table model handed to the layout engine.
//!
//! Cells are placed into the grid as they are added, so every grid violation is
//! reported here, before any layout runs.

use crate::painting::TagRole;
use crate::properties::Position;
use crate::TableError;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tabula_style::{Border, Borders, Margins, Side, VerticalAlignment};
use tabula_types::Color;

static NEXT_ELEMENT_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a model element, shared by every fragment laid out from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

impl ElementId {
    pub fn next() -> Self {
        Self(NEXT_ELEMENT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

/// Content placed inside a cell.
#[derive(Debug, Clone)]
pub enum CellContent {
    /// An unsplittable block of fixed height.
    Block { height: f32, label: Option<String> },
    /// `count` lines of `line_height` each; may be split between lines.
    Lines {
        line_height: f32,
        count: usize,
        label: Option<String>,
    },
    /// A nested table, laid out by the same engine.
    Table(Arc<Table>),
}

impl CellContent {
    fn set_label(&mut self, value: String) {
        match self {
            CellContent::Block { label, .. } | CellContent::Lines { label, .. } => {
                *label = Some(value)
            }
            CellContent::Table(_) => {
                log::warn!("Labels are not supported on nested tables; ignoring '{}'.", value)
            }
        }
    }
}

pub const DEFAULT_CELL_BORDER_WIDTH: f32 = 0.5;
pub const DEFAULT_CELL_PADDING: f32 = 2.0;

/// The border every cell side gets unless overridden.
pub fn default_cell_border() -> Border {
    Border::solid(DEFAULT_CELL_BORDER_WIDTH, Color::BLACK)
}

#[derive(Debug, Clone)]
pub struct Cell {
    pub(crate) row: usize,
    pub(crate) col: usize,
    pub(crate) rowspan: usize,
    pub(crate) colspan: usize,
    pub borders: Borders,
    pub padding: Margins,
    pub vertical_alignment: VerticalAlignment,
    pub content: Vec<CellContent>,
}

impl Default for Cell {
    fn default() -> Self {
        Self::new()
    }
}

impl Cell {
    pub fn new() -> Self {
        Self {
            row: 0,
            col: 0,
            rowspan: 1,
            colspan: 1,
            borders: Borders::all(default_cell_border()),
            padding: Margins::all(DEFAULT_CELL_PADDING),
            vertical_alignment: VerticalAlignment::Top,
            content: Vec::new(),
        }
    }

    /// A border-less, empty cell used to complete a partially filled row.
    pub fn placeholder(row: usize, col: usize) -> Self {
        Self {
            row,
            col,
            borders: Borders::none(),
            padding: Margins::default(),
            ..Self::new()
        }
    }

    pub fn with_span(mut self, rowspan: usize, colspan: usize) -> Self {
        self.rowspan = rowspan;
        self.colspan = colspan;
        self
    }

    pub fn with_borders(mut self, borders: Borders) -> Self {
        self.borders = borders;
        self
    }

    pub fn with_border(mut self, side: Side, border: Option<Border>) -> Self {
        self.borders[side] = border;
        self
    }

    pub fn with_padding(mut self, padding: Margins) -> Self {
        self.padding = padding;
        self
    }

    pub fn with_vertical_alignment(mut self, alignment: VerticalAlignment) -> Self {
        self.vertical_alignment = alignment;
        self
    }

    pub fn with_block(mut self, height: f32) -> Self {
        self.content.push(CellContent::Block {
            height,
            label: None,
        });
        self
    }

    pub fn with_lines(mut self, line_height: f32, count: usize) -> Self {
        self.content.push(CellContent::Lines {
            line_height,
            count,
            label: None,
        });
        self
    }

    pub fn with_table(mut self, table: Table) -> Self {
        self.content.push(CellContent::Table(Arc::new(table)));
        self
    }

    /// Labels the most recently added content item.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        if let Some(last) = self.content.last_mut() {
            last.set_label(label.into());
        }
        self
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn col(&self) -> usize {
        self.col
    }

    pub fn rowspan(&self) -> usize {
        self.rowspan
    }

    pub fn colspan(&self) -> usize {
        self.colspan
    }
}

#[derive(Debug, Clone)]
pub struct Table {
    pub(crate) id: ElementId,
    pub(crate) column_weights: Vec<f32>,
    pub(crate) cells: Vec<Arc<Cell>>,
    pub(crate) row_count: usize,
    occupancy: Vec<Vec<bool>>,
    cur_row: usize,
    cur_col: usize,
    pub(crate) header: Option<Arc<Table>>,
    pub(crate) footer: Option<Arc<Table>>,
    pub(crate) skip_first_header: bool,
    pub(crate) skip_last_footer: bool,
    pub(crate) complete: bool,
    pub(crate) borders: Borders,
    pub(crate) width: Option<f32>,
    pub(crate) keep_together: bool,
    pub(crate) margins: Margins,
    pub(crate) position: Option<Position>,
    pub(crate) role: TagRole,
}

impl Table {
    /// Creates an empty table whose columns share the width in proportion to `column_weights`.
    pub fn new(column_weights: Vec<f32>) -> Result<Self, TableError> {
        if column_weights.is_empty() {
            return Err(TableError::NoColumns);
        }
        if let Some((column, &weight)) = column_weights
            .iter()
            .enumerate()
            .find(|(_, w)| w.is_nan() || **w <= 0.0)
        {
            return Err(TableError::NonPositiveWeight { column, weight });
        }
        Ok(Self {
            id: ElementId::next(),
            column_weights,
            cells: Vec::new(),
            row_count: 0,
            occupancy: Vec::new(),
            cur_row: 0,
            cur_col: 0,
            header: None,
            footer: None,
            skip_first_header: false,
            skip_last_footer: false,
            complete: true,
            borders: Borders::none(),
            width: None,
            keep_together: false,
            margins: Margins::default(),
            position: None,
            role: TagRole::Table,
        })
    }

    /// A table of `columns` equally wide columns.
    pub fn with_equal_columns(columns: usize) -> Result<Self, TableError> {
        Self::new(vec![1.0; columns])
    }

    /// Places `cell` at the next free grid position, in row-major order.
    ///
    /// Positions claimed by rowspans of earlier cells are skipped. A cell whose
    /// colspan does not fit in the remainder of the current row starts a new row.
    pub fn add_cell(&mut self, cell: Cell) -> Result<(usize, usize), TableError> {
        let columns = self.columns();
        if cell.rowspan == 0 || cell.colspan == 0 {
            return Err(TableError::ZeroSpan {
                rowspan: cell.rowspan,
                colspan: cell.colspan,
            });
        }
        if cell.colspan > columns {
            return Err(TableError::ColspanTooWide {
                colspan: cell.colspan,
                columns,
            });
        }

        loop {
            if self.cur_col + cell.colspan > columns {
                self.cur_row += 1;
                self.cur_col = 0;
            }
            self.ensure_rows(self.cur_row + 1);
            let row = &self.occupancy[self.cur_row];
            match (self.cur_col..self.cur_col + cell.colspan).find(|&c| row[c]) {
                Some(taken) => self.cur_col = taken + 1,
                None => break,
            }
        }

        let (row, col) = (self.cur_row, self.cur_col);
        self.ensure_rows(row + cell.rowspan);
        for r in row..row + cell.rowspan {
            for c in col..col + cell.colspan {
                self.occupancy[r][c] = true;
            }
        }
        self.row_count = self.row_count.max(row + cell.rowspan);
        self.cur_col += cell.colspan;

        let mut cell = cell;
        cell.row = row;
        cell.col = col;
        self.cells.push(Arc::new(cell));
        Ok((row, col))
    }

    /// Moves the insertion point to the first column of the next row.
    pub fn start_new_row(&mut self) -> &mut Self {
        if self.cur_col > 0 {
            self.cur_row += 1;
            self.cur_col = 0;
        }
        self
    }

    fn ensure_rows(&mut self, rows: usize) {
        let columns = self.columns();
        while self.occupancy.len() < rows {
            self.occupancy.push(vec![false; columns]);
        }
    }

    pub fn with_header(mut self, mut header: Table) -> Result<Self, TableError> {
        self.check_part("header", &header)?;
        header.role = TagRole::THead;
        self.header = Some(Arc::new(header));
        Ok(self)
    }

    pub fn with_footer(mut self, mut footer: Table) -> Result<Self, TableError> {
        self.check_part("footer", &footer)?;
        footer.role = TagRole::TFoot;
        self.footer = Some(Arc::new(footer));
        Ok(self)
    }

    fn check_part(&self, part: &'static str, table: &Table) -> Result<(), TableError> {
        if table.columns() != self.columns() {
            return Err(TableError::ColumnMismatch {
                part,
                expected: self.columns(),
                found: table.columns(),
            });
        }
        Ok(())
    }

    pub fn with_skip_first_header(mut self, skip: bool) -> Self {
        self.skip_first_header = skip;
        self
    }

    pub fn with_skip_last_footer(mut self, skip: bool) -> Self {
        self.skip_last_footer = skip;
        self
    }

    /// Marks the table as still receiving rows. An incomplete table ignores its
    /// bottom margin and never draws its final footer.
    pub fn set_complete(&mut self, complete: bool) -> &mut Self {
        self.complete = complete;
        self
    }

    pub fn with_borders(mut self, borders: Borders) -> Self {
        self.borders = borders;
        self
    }

    pub fn with_border(mut self, side: Side, border: Option<Border>) -> Self {
        self.borders[side] = border;
        self
    }

    pub fn with_width(mut self, width: f32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_keep_together(mut self, keep_together: bool) -> Self {
        self.keep_together = keep_together;
        self
    }

    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    pub fn with_position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn columns(&self) -> usize {
        self.column_weights.len()
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn cells(&self) -> &[Arc<Cell>] {
        &self.cells
    }

    pub fn header(&self) -> Option<&Arc<Table>> {
        self.header.as_ref()
    }

    pub fn footer(&self) -> Option<&Arc<Table>> {
        self.footer.as_ref()
    }

    pub fn is_complete(&self) -> bool {
        self.complete
    }

    pub fn borders(&self) -> &Borders {
        &self.borders
    }

    pub fn role(&self) -> TagRole {
        self.role
    }

    /// Distributes `width`, less half of each outer vertical border, across the columns.
    pub fn scaled_column_widths(&self, width: f32, left_border: f32, right_border: f32) -> Vec<f32> {
        let available = (width - left_border / 2.0 - right_border / 2.0).max(0.0);
        let total: f32 = self.column_weights.iter().sum();
        self.column_weights
            .iter()
            .map(|w| w * available / total)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell() -> Cell {
        Cell::new().with_block(10.0)
    }

    #[test]
    fn rejects_bad_column_weights() {
        assert_eq!(Table::new(vec![]).unwrap_err(), TableError::NoColumns);
        assert_eq!(
            Table::new(vec![1.0, 0.0]).unwrap_err(),
            TableError::NonPositiveWeight {
                column: 1,
                weight: 0.0
            }
        );
    }

    #[test]
    fn places_cells_row_major() {
        let mut table = Table::with_equal_columns(2).unwrap();
        assert_eq!(table.add_cell(cell()).unwrap(), (0, 0));
        assert_eq!(table.add_cell(cell()).unwrap(), (0, 1));
        assert_eq!(table.add_cell(cell()).unwrap(), (1, 0));
        assert_eq!(table.row_count(), 2);
    }

    #[test]
    fn skips_positions_claimed_by_rowspans() {
        let mut table = Table::with_equal_columns(2).unwrap();
        table.add_cell(cell().with_span(2, 1)).unwrap();
        table.add_cell(cell()).unwrap();
        assert_eq!(table.add_cell(cell()).unwrap(), (1, 1));
        assert_eq!(table.add_cell(cell()).unwrap(), (2, 0));
    }

    #[test]
    fn wide_cell_starts_new_row() {
        let mut table = Table::with_equal_columns(3).unwrap();
        table.add_cell(cell()).unwrap();
        table.add_cell(cell()).unwrap();
        assert_eq!(table.add_cell(cell().with_span(1, 2)).unwrap(), (1, 0));
    }

    #[test]
    fn rejects_invalid_spans() {
        let mut table = Table::with_equal_columns(2).unwrap();
        assert_eq!(
            table.add_cell(cell().with_span(0, 1)).unwrap_err(),
            TableError::ZeroSpan {
                rowspan: 0,
                colspan: 1
            }
        );
        assert_eq!(
            table.add_cell(cell().with_span(1, 3)).unwrap_err(),
            TableError::ColspanTooWide {
                colspan: 3,
                columns: 2
            }
        );
    }

    #[test]
    fn start_new_row_moves_to_next_row() {
        let mut table = Table::with_equal_columns(3).unwrap();
        table.add_cell(cell()).unwrap();
        table.start_new_row();
        assert_eq!(table.add_cell(cell()).unwrap(), (1, 0));
        table.add_cell(cell()).unwrap();
        table.add_cell(cell()).unwrap();
        table.start_new_row();
        assert_eq!(table.add_cell(cell()).unwrap(), (2, 0));
    }

    #[test]
    fn header_must_match_columns() {
        let table = Table::with_equal_columns(2).unwrap();
        let header = Table::with_equal_columns(3).unwrap();
        assert_eq!(
            table.with_header(header).unwrap_err(),
            TableError::ColumnMismatch {
                part: "header",
                expected: 2,
                found: 3
            }
        );
    }

    #[test]
    fn column_widths_exclude_half_outer_borders() {
        let table = Table::new(vec![1.0, 3.0]).unwrap();
        let widths = table.scaled_column_widths(102.0, 2.0, 2.0);
        assert_eq!(widths, vec![25.0, 75.0]);
    }
}
