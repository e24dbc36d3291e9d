//! Row-by-row table layout with page splitting.
//!
//! A layout pass works on a scratch copy of the fragment's grid, so a renderer can be
//! laid out any number of times and a rejected attempt leaves it untouched.

use super::ledger::{BorderLedger, Resolution};
use super::TableRenderer;
use crate::interface::{CellPosition, LayoutContext, LayoutResult, LayoutStatus, NothingCause};
use crate::node_kind::NodeKind;
use crate::nodes::CellRenderer;
use crate::{LayoutError, Renderer};
use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;
use tabula_style::border::width_of;
use tabula_style::{collapse, Borders};
use tabula_types::{LayoutArea, Rect};

/// A cell waiting to be laid out in the current row.
#[derive(Debug, Clone, Copy)]
struct QueuedCell {
    cell: usize,
    col: usize,
    /// Row the cell's span ends on. Differs from the current row for a cell pulled
    /// in early because the row is being split.
    finish_row: usize,
}

/// A cell that did not fit completely in the row being split.
#[derive(Debug)]
struct CellSplit {
    status: LayoutStatus,
    /// The cell as it was before this row was laid out.
    original: usize,
    split: Option<usize>,
    overflow: Option<CellRenderer>,
}

/// Scratch state of one layout pass. Cells live in an arena and the grid refers to
/// them by index, so split parts and moved cells never alias.
struct Pass {
    cells: Vec<CellRenderer>,
    grid: Vec<Vec<Option<usize>>>,
    ledger: BorderLedger,
    heights: Vec<f32>,
    widths: Arc<[f32]>,
    columns: usize,
}

impl Pass {
    fn new(rows: &[Vec<Option<CellRenderer>>], columns: usize) -> Result<Self, LayoutError> {
        let mut cells = Vec::new();
        let mut grid = Vec::with_capacity(rows.len());
        for row in rows {
            let mut slots = vec![None; columns];
            for (col, cell) in row.iter().enumerate() {
                let Some(cell) = cell else { continue };
                if col >= columns || col + cell.cell.colspan > columns {
                    return Err(LayoutError::MalformedGrid {
                        row: cell.cell.row,
                        col,
                        colspan: cell.cell.colspan,
                        columns,
                    });
                }
                cells.push(cell.clone());
                slots[col] = Some(cells.len() - 1);
            }
            grid.push(slots);
        }
        Ok(Self {
            cells,
            ledger: BorderLedger::new(grid.len(), columns),
            grid,
            heights: Vec::new(),
            widths: Arc::from(Vec::new()),
            columns,
        })
    }

    fn push(&mut self, cell: CellRenderer) -> usize {
        self.cells.push(cell);
        self.cells.len() - 1
    }

    fn borders(&self, idx: usize) -> Borders {
        self.cells[idx].properties.borders
    }

    fn column_offset(&self, col: usize) -> f32 {
        self.widths[..col].iter().sum()
    }

    fn span_width(&self, col: usize, colspan: usize) -> f32 {
        self.widths[col..col + colspan].iter().sum()
    }

    /// Records the four edges of a cell into the ledger, resolving them against what
    /// neighbours already recorded. Where a neighbour's border wins, the cell takes it
    /// over; where the cell wins, the neighbour's matching edge is updated.
    fn record_cell_borders(&mut self, idx: usize, row: usize) {
        let (col, colspan) = {
            let cell = &self.cells[idx].cell;
            (cell.col, cell.colspan)
        };
        let rowspan = self.cells[idx].cell.rowspan.min(row + 1);
        let borders = self.borders(idx);
        let top_line = row + 1 - rowspan;

        for i in 0..colspan {
            match self.ledger.resolve_horizontal(top_line, col + i, borders.top) {
                Resolution::Replaced => {
                    if top_line > 0 {
                        if let Some(above) = self.grid[top_line - 1][col + i] {
                            self.cells[above].properties.borders.bottom = borders.top;
                        }
                    }
                }
                Resolution::Kept(kept) => self.cells[idx].properties.borders.top = kept,
            }
        }

        for i in 0..colspan {
            self.ledger.set_horizontal(row + 1, col + i, borders.bottom);
        }

        if col != 0 {
            for j in top_line..=row {
                match self.ledger.resolve_vertical(col, j, borders.left) {
                    Resolution::Replaced => {
                        if let Some(left) = self.grid[j][col - 1] {
                            self.cells[left].properties.borders.right = borders.left;
                        }
                    }
                    Resolution::Kept(_) => {
                        let resolved = self.ledger.vertical(col)[row];
                        if let Some(own) = self.grid[j][col] {
                            self.cells[own].properties.borders.left = resolved;
                        }
                    }
                }
            }
        } else {
            for j in top_line..=row {
                self.ledger.set_vertical(0, j, borders.left);
            }
        }

        for j in top_line..=row {
            self.ledger.resolve_vertical(col + colspan, j, borders.right);
        }
    }

    /// Whether every row from `start_row` on fits into `area` as is. Works on copies of
    /// the cells and heights; nothing in the pass changes.
    ///
    /// Cells are measured the way the row loop lays them out: with the table's outer
    /// borders collapsed in and room kept for the bottom border at the table's edge.
    fn can_fit_rows(
        &self,
        ctx: &LayoutContext,
        area: LayoutArea,
        start_row: usize,
        table_borders: Borders,
    ) -> Result<bool, LayoutError> {
        let mut bbox = area.bbox;
        let mut heights = self.heights.clone();
        for row in start_row..self.grid.len() {
            let mut row_height = 0.0f32;
            for (col, slot) in self.grid[row].iter().enumerate() {
                let Some(idx) = *slot else { continue };
                let mut cell = self.cells[idx].clone();
                let (rowspan, colspan) = (cell.cell.rowspan, cell.cell.colspan);
                let span_start = (row + 1).saturating_sub(rowspan);
                let rowspan_offset: f32 = heights[span_start.min(heights.len())..].iter().sum();
                let mut cell_box = Rect::new(
                    bbox.x + self.column_offset(col),
                    bbox.y,
                    self.span_width(col, colspan),
                    rowspan_offset + bbox.height,
                );

                let borders = &mut cell.properties.borders;
                if row + 1 == rowspan {
                    borders.top = collapse(borders.top, table_borders.top);
                }
                if col == 0 {
                    borders.left = collapse(borders.left, table_borders.left);
                }
                if col + colspan == self.columns {
                    borders.right = collapse(borders.right, table_borders.right);
                }
                let old_bottom = borders.bottom;
                let collapsed_bottom = collapse(old_bottom, table_borders.bottom);
                if let Some(border) = collapsed_bottom {
                    cell_box.apply_margins(0.0, 0.0, border.width / 2.0, 0.0, false);
                    borders.bottom = Some(border);
                }
                let raise = collapsed_bottom
                    .map_or(0.0, |border| (border.width - width_of(old_bottom.as_ref())) / 2.0);

                let cell_ctx = ctx
                    .with_area(LayoutArea::new(area.page_number, cell_box))
                    .with_forced_placement(false);
                let result = cell.layout_cell(&cell_ctx)?;
                if !result.is_full() {
                    return Ok(false);
                }
                if let Some(occupied) = result.occupied_area {
                    row_height = row_height.max(occupied.bbox.height - raise - rowspan_offset);
                }
            }
            heights.push(row_height);
            bbox.decrease_height(row_height);
        }
        Ok(true)
    }

    fn materialize(&self, indices: &[usize]) -> Vec<CellRenderer> {
        indices.iter().map(|&i| self.cells[i].clone()).collect()
    }

    fn materialize_rows(&self, rows: std::ops::Range<usize>) -> Vec<Vec<Option<CellRenderer>>> {
        self.grid[rows]
            .iter()
            .map(|row| {
                row.iter()
                    .map(|slot| slot.map(|i| self.cells[i].clone()))
                    .collect()
            })
            .collect()
    }
}

fn max_width(current: Option<f32>, border: Option<f32>) -> Option<f32> {
    match (current, border) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (None, b) => b,
        (a, None) => a,
    }
}

impl TableRenderer {
    /// Widths of the top, left and right outer borders, each resolved against the table's own.
    ///
    /// Left and right are taken from as few rows as possible: scanning stops once both
    /// sides have seen a border.
    fn outer_border_widths(&self, pass: &Pass) -> (f32, f32, f32) {
        let (mut top, mut left, mut right) = (None, None, None);
        let mut row = 0;
        while row < pass.grid.len() && (left.is_none() || right.is_none()) {
            let slots = &pass.grid[row];
            if row == 0 {
                for idx in slots.iter().flatten() {
                    top = max_width(top, pass.borders(*idx).top.map(|b| b.width));
                }
            }
            if let Some(idx) = slots.first().copied().flatten() {
                left = max_width(left, pass.borders(idx).left.map(|b| b.width));
            }
            if let Some((col, idx)) = slots
                .iter()
                .enumerate()
                .rev()
                .find_map(|(col, slot)| slot.map(|idx| (col, idx)))
            {
                if col + pass.cells[idx].cell.colspan == pass.columns {
                    right = max_width(right, pass.borders(idx).right.map(|b| b.width));
                }
            }
            row += 1;
        }
        let table = &self.properties.borders;
        (
            width_of(table.top.as_ref()).max(top.unwrap_or(0.0)),
            width_of(table.left.as_ref()).max(left.unwrap_or(0.0)),
            width_of(table.right.as_ref()).max(right.unwrap_or(0.0)),
        )
    }

    fn overflow_fragment(&self, row_start: usize, rows: Vec<Vec<Option<CellRenderer>>>) -> Self {
        let mut overflow = Self::empty(Arc::clone(&self.model), row_start, self.properties.clone());
        overflow.rows = rows;
        overflow.is_original = false;
        overflow
    }

    pub(crate) fn layout_table(
        &mut self,
        ctx: &LayoutContext,
    ) -> Result<LayoutResult<TableRenderer>, LayoutError> {
        let area = ctx.area;
        let page = area.page_number;
        let model = Arc::clone(&self.model);
        let columns = model.columns();
        let start = self.row_start;
        let table_borders = self.properties.borders;

        self.heights.clear();
        self.children.clear();
        self.header = None;
        self.footer = None;
        self.occupied_area = None;
        self.grid_origin = None;
        self.tolerance = ctx.tolerance();

        let mut margins = self.properties.margins;
        if !model.complete {
            margins.bottom = 0.0;
        }
        if start != 0 {
            margins.top = 0.0;
        }

        let mut pass = Pass::new(&self.rows, columns)?;
        let mut layout_box = area.bbox;
        layout_box.apply_margins(margins.top, margins.right, margins.bottom, margins.left, false);

        let (top_width, left_width, right_width) = self.outer_border_widths(&pass);

        if let Some(position) = self.properties.position {
            layout_box.x += position.x;
        }
        let table_width = self
            .properties
            .width
            .filter(|w| *w > 0.0)
            .unwrap_or(layout_box.width);
        let mut occupied = LayoutArea::new(
            page,
            Rect::new(layout_box.x, layout_box.top() - top_width / 2.0, table_width, 0.0),
        );

        let is_first_header = start == 0 && self.is_original;
        let header_applies = !pass.grid.is_empty()
            && (!self.is_original || is_first_header && !model.skip_first_header);
        let mut header = None;
        if let (Some(part), true) = (model.header.as_ref(), header_applies) {
            let mut renderer = TableRenderer::for_part(Arc::clone(part), table_borders);
            let result = renderer.layout_table(&ctx.with_area(LayoutArea::new(page, layout_box)))?;
            if !result.is_full() {
                log::debug!("Header of table does not fit; the table cannot start here.");
                let cause = result
                    .cause_of_nothing
                    .unwrap_or(NothingCause::new(NodeKind::Table));
                return Ok(LayoutResult::nothing(None, cause));
            }
            let height = result.occupied_area.map_or(0.0, |a| a.bbox.height);
            layout_box.decrease_height(height);
            occupied.bbox.move_down(height).increase_height(height);
            header = Some(Box::new(renderer));
        }

        let mut footer = None;
        if let Some(part) = model.footer.as_ref() {
            let mut renderer = TableRenderer::for_part(Arc::clone(part), table_borders);
            let result = renderer.layout_table(&ctx.with_area(LayoutArea::new(page, layout_box)))?;
            if !result.is_full() {
                log::debug!("Footer of table does not fit; the table cannot start here.");
                let cause = result
                    .cause_of_nothing
                    .unwrap_or(NothingCause::new(NodeKind::Table));
                return Ok(LayoutResult::nothing(None, cause));
            }
            let height = result.occupied_area.map_or(0.0, |a| a.bbox.height);
            renderer.move_by(0.0, -(layout_box.height - height));
            layout_box.move_up(height).decrease_height(height);
            footer = Some(Box::new(renderer));
        }

        // The other halves of the outer borders are taken by the cells.
        layout_box.apply_margins(top_width / 2.0, right_width / 2.0, 0.0, left_width / 2.0, false);
        pass.widths = Arc::from(model.scaled_column_widths(table_width, left_width, right_width));
        let grid_origin = (layout_box.x, layout_box.top());

        self.fill_last_row(&mut pass);

        let table_forced = ctx.forced_placement || self.properties.forced_placement;
        let mut splits: Vec<Option<CellSplit>> = (0..columns).map(|_| None).collect();
        let mut target_row = vec![0usize; columns];
        let mut row_moves: BTreeMap<usize, usize> = BTreeMap::new();
        let mut children: Vec<usize> = Vec::new();
        let mut bottom_width = 0.0f32;
        let mut omitted_footer: Option<Box<TableRenderer>> = None;

        for row in 0..pass.grid.len() {
            // Forced placement only ever applies to the first row.
            let cell_ctx_base = ctx.with_forced_placement(row == 0 && table_forced);

            bottom_width = 0.0;
            let mut row_height = 0.0f32;
            let mut split = false;
            let mut has_content = true;
            let mut big_rowspan_added = false;
            let mut row_children: Vec<usize> = Vec::new();
            let mut first_cause: Option<NothingCause> = None;
            let mut queue = queue_row(&pass, row);

            while let Some(queued) = queue.pop_front() {
                let QueuedCell {
                    cell: idx,
                    col,
                    finish_row,
                } = queued;
                let (rowspan, colspan, model_row) = {
                    let cell = &pass.cells[idx].cell;
                    (cell.rowspan, cell.colspan, cell.row)
                };

                {
                    let borders = &mut pass.cells[idx].properties.borders;
                    if finish_row + 1 == rowspan {
                        borders.top = collapse(borders.top, table_borders.top);
                    }
                    if col == 0 {
                        borders.left = collapse(borders.left, table_borders.left);
                    }
                    if col + colspan == columns {
                        borders.right = collapse(borders.right, table_borders.right);
                    }
                }

                pass.record_cell_borders(idx, row);
                if row + 1 < pass.grid.len() {
                    for j in 0..colspan {
                        if let Some(next) = pass.grid[row + 1][col + j] {
                            pass.record_cell_borders(next, row + 1);
                        }
                    }
                }
                if col + 1 < columns {
                    if let Some(next) = pass.grid[row][col + 1] {
                        pass.record_cell_borders(next, row);
                    }
                }

                target_row[col] = finish_row;
                let from_future = row != finish_row;

                let cell_width = pass.span_width(col, colspan);
                let span_start = (finish_row + 1).saturating_sub(rowspan).min(row);
                let rowspan_offset: f32 = pass.heights[span_start..row].iter().sum();
                let open = !from_future || has_content;
                let mut cell_box = Rect::new(
                    layout_box.x + pass.column_offset(col),
                    layout_box.y + if open { 0.0 } else { layout_box.height },
                    cell_width,
                    rowspan_offset + if open { layout_box.height } else { 0.0 },
                );

                // Lay the cell out with the bottom border it would get at the table's
                // bottom edge, so that border always fits.
                let old_bottom = pass.cells[idx].properties.borders.bottom;
                let collapsed_bottom = collapse(old_bottom, table_borders.bottom);
                if let Some(border) = collapsed_bottom {
                    bottom_width = bottom_width.max(border.width);
                    cell_box.apply_margins(0.0, 0.0, border.width / 2.0, 0.0, false);
                    pass.cells[idx].properties.borders.bottom = Some(border);
                }

                let cell_ctx = cell_ctx_base.with_area(LayoutArea::new(page, cell_box));
                let mut result = pass.cells[idx].layout_cell(&cell_ctx)?;

                let raise = collapsed_bottom
                    .map(|border| (border.width - width_of(old_bottom.as_ref())) / 2.0);
                let adjust = |area: &mut LayoutArea| {
                    if let Some(raise) = raise {
                        area.bbox.apply_margins(0.0, 0.0, raise, 0.0, false);
                    }
                    area.bbox.set_width(cell_width);
                };
                if result.status != LayoutStatus::Nothing {
                    if let Some(a) = result.occupied_area.as_mut() {
                        adjust(a);
                    }
                    if let Some(a) = pass.cells[idx].occupied_area_mut() {
                        adjust(a);
                    }
                    if let Some(a) = result.split.as_mut().and_then(|s| s.occupied_area_mut()) {
                        adjust(a);
                    }
                } else if first_cause.is_none() {
                    let position = CellPosition {
                        row: model_row,
                        col,
                    };
                    first_cause = Some(
                        result
                            .cause_of_nothing
                            .unwrap_or(NothingCause::new(NodeKind::Cell))
                            .in_cell(position),
                    );
                }
                if collapsed_bottom.is_some() {
                    pass.cells[idx].properties.borders.bottom = old_bottom;
                    if let Some(split) = result.split.as_mut() {
                        split.properties.borders.bottom = old_bottom;
                    }
                }
                let occupied_height = result.occupied_area.map(|a| a.bbox.height);

                if from_future {
                    if result.status == LayoutStatus::Partial {
                        let split_idx = result.split.take().map(|s| pass.push(s));
                        if let Some(split_idx) = split_idx {
                            pass.grid[row][col] = Some(split_idx);
                        }
                        splits[col] = Some(CellSplit {
                            status: result.status,
                            original: idx,
                            split: split_idx,
                            overflow: result.overflow.take(),
                        });
                    } else {
                        pass.grid[finish_row][col] = None;
                        pass.grid[row][col] = Some(idx);
                        row_moves.insert(col, finish_row);
                    }
                } else if result.status != LayoutStatus::Full {
                    if !split {
                        if let Some(footer_renderer) = footer.as_ref() {
                            if model.skip_last_footer
                                && model.complete
                                && ctx.config.allow_footer_omission
                            {
                                let footer_height = footer_renderer
                                    .occupied_area
                                    .map_or(0.0, |a| a.bbox.height);
                                let mut potential = layout_box;
                                potential.move_down(footer_height).increase_height(footer_height);
                                let potential = LayoutArea::new(page, potential);
                                if pass.can_fit_rows(ctx, potential, row, table_borders)? {
                                    log::debug!(
                                        "Remaining rows fit without the footer; dropping its reservation."
                                    );
                                    layout_box.increase_height(footer_height).move_down(footer_height);
                                    omitted_footer = footer.take();
                                    queue = queue_row(&pass, row);
                                    row_children.clear();
                                    row_height = 0.0;
                                    bottom_width = 0.0;
                                    first_cause = None;
                                    continue;
                                }
                            }
                        }

                        big_rowspan_added |= self.pull_spanning_cells(&mut pass, &mut queue, row, idx);
                    }
                    split = true;
                    if result.status == LayoutStatus::Nothing {
                        has_content = false;
                    }
                    let split_idx = result.split.take().map(|s| pass.push(s));
                    if let Some(split_idx) = split_idx {
                        pass.grid[row][col] = Some(split_idx);
                    }
                    splits[col] = Some(CellSplit {
                        status: result.status,
                        original: idx,
                        split: split_idx,
                        overflow: result.overflow.take(),
                    });
                }

                row_children.push(idx);
                if result.status != LayoutStatus::Nothing {
                    if let Some(height) = occupied_height {
                        row_height = row_height.max(height - rowspan_offset);
                    }
                }
            }

            let committed = has_content || big_rowspan_added;
            if committed {
                pass.heights.push(row_height);
                occupied.bbox.move_down(row_height).increase_height(row_height);
                layout_box.decrease_height(row_height);
            }

            let last_row = row + 1 == pass.grid.len();
            if split || last_row {
                let grown = self.correct_bottom_border(&mut pass, row, committed);
                if grown > 0.0 {
                    occupied.bbox.move_down(grown).increase_height(grown);
                    layout_box.decrease_height(grown);
                }
                stretch_placed_cells(&mut pass, row, has_content, committed);
            }

            if !split {
                children.append(&mut row_children);
                continue;
            }

            // Split: rows before `row` (and `row` itself when it has content) go to
            // the current area, everything else continues in the overflow fragment.
            occupied
                .bbox
                .apply_margins(top_width / 2.0 + margins.top, 0.0, bottom_width / 2.0, 0.0, true);

            let mut rowspans = vec![0usize; columns];
            let mut enlarge = vec![false; columns];
            for col in 0..columns {
                if let Some(cell_split) = splits[col].take() {
                    if let Some(split_idx) = cell_split.split {
                        rowspans[col] = pass.cells[split_idx].cell.rowspan;
                        if cell_split.status != LayoutStatus::Nothing && committed {
                            children.push(split_idx);
                        }
                    }
                    if committed || cell_split.status == LayoutStatus::Nothing {
                        pass.grid[row][col] = None;
                        let Some(mut overflow) = cell_split.overflow else {
                            continue;
                        };
                        let model_borders = overflow.cell.borders;
                        if cell_split.status == LayoutStatus::Partial {
                            // The continuation must not draw a second line at the cut.
                            overflow.properties.borders.top = None;
                        } else {
                            overflow.properties.borders.top = model_borders.top;
                        }
                        let line = table_borders.bottom.or(model_borders.bottom);
                        for j in 0..overflow.cell.colspan {
                            pass.ledger.set_horizontal(row + 1, col + j, line);
                        }
                        overflow.properties.borders.bottom = model_borders.bottom;
                        let overflow_idx = pass.push(overflow);
                        pass.grid[target_row[col]][col] = Some(overflow_idx);
                    } else {
                        pass.grid[row][col] = None;
                        pass.grid[target_row[col]][col] = Some(cell_split.original);
                    }
                } else if has_content {
                    if let Some(idx) = pass.grid[row][col] {
                        enlarge[col] = true;
                        let cell = &pass.cells[idx].cell;
                        let line = table_borders.bottom.or(cell.borders.bottom);
                        for j in 0..cell.colspan {
                            pass.ledger.set_horizontal(row + 1, col + j, line);
                        }
                    }
                }
            }

            let min_rowspan = rowspans
                .iter()
                .copied()
                .filter(|r| *r != 0)
                .min()
                .unwrap_or(usize::MAX);

            for col in 0..columns {
                if !enlarge[col] {
                    continue;
                }
                if min_rowspan == 1 {
                    if let Some(idx) = pass.grid[row][col].take() {
                        children.push(idx);
                        let continuation = self.continuation_of(&pass.cells[idx]);
                        let continuation_idx = pass.push(continuation);
                        pass.grid[target_row[col]][col] = Some(continuation_idx);
                    }
                } else {
                    if let Some(idx) = pass.grid[row][col] {
                        children.push(idx);
                    }
                    // Shift the rest of the column up by one row.
                    let mut i = row;
                    let span_end = row.saturating_add(min_rowspan);
                    while i < span_end
                        && i + 1 < pass.grid.len()
                        && pass.grid[i + 1][col].is_some()
                    {
                        pass.grid[i][col] = pass.grid[i + 1][col].take();
                        i += 1;
                    }
                    if i + 1 != span_end {
                        if let Some(idx) = pass.grid[i][col].take() {
                            let continuation = self.continuation_of(&pass.cells[idx]);
                            let continuation_idx = pass.push(continuation);
                            pass.grid[target_row[col]][col] = Some(continuation_idx);
                        }
                    }
                }
            }

            let mut split_header = header;
            let mut split_footer = footer;
            if let Some(mut restored) = omitted_footer.take() {
                // Every fragment but the last one carries the footer.
                log::warn!(
                    "Rows expected to fit without the footer were split at row {}; restoring the footer.",
                    start + row
                );
                let footer_height = restored.occupied_area.map_or(0.0, |a| a.bbox.height);
                restored.move_by(0.0, -footer_height);
                split_footer = Some(restored);
            }
            if let Some(footer_renderer) = split_footer.as_mut() {
                let footer_height = footer_renderer
                    .occupied_area
                    .map_or(0.0, |a| a.bbox.height);
                if last_row {
                    let footer_top = footer_renderer
                        .occupied_area
                        .map_or(0.0, |a| a.bbox.top());
                    footer_renderer.move_by(0.0, occupied.bbox.y - footer_top);
                } else {
                    footer_renderer.move_by(0.0, layout_box.height);
                }
                occupied.bbox.move_down(footer_height).increase_height(footer_height);
            }

            let mut overflow_rows = pass.materialize_rows(row..pass.grid.len());
            for (&col, &previous_row) in &row_moves {
                let local = previous_row - row;
                if local < overflow_rows.len() && overflow_rows[local][col].is_none() {
                    let moved = overflow_rows[0][col].take();
                    overflow_rows[local][col] = moved;
                }
            }

            if self.properties.keep_together && !table_forced {
                log::debug!("Table must be kept together but does not fit; deferring it.");
                let cause = first_cause.unwrap_or(NothingCause::new(NodeKind::Table));
                return Ok(LayoutResult::nothing(None, cause));
            }

            if children.is_empty() && split_footer.is_none() {
                if table_forced {
                    log::warn!(
                        "Forced table placement produced no rows; the remaining rows are dropped."
                    );
                    self.occupied_area = Some(occupied);
                    self.grid_origin = Some(grid_origin);
                    self.column_widths = Arc::clone(&pass.widths);
                    return Ok(LayoutResult::full(occupied));
                }
                let cause = first_cause.unwrap_or(NothingCause::new(NodeKind::Table));
                return Ok(LayoutResult::nothing(None, cause));
            }

            log::debug!(
                "Splitting table at row {} ({} placed cells, {} rows carried over).",
                start + row,
                children.len(),
                overflow_rows.len()
            );

            let ledger_rows = if has_content || row == 0 { row + 1 } else { row };
            let mut split_fragment =
                Self::empty(Arc::clone(&model), start, self.properties.clone());
            split_fragment.rows = pass.materialize_rows(0..row);
            split_fragment.is_original = self.is_original;
            split_fragment.is_last_fragment = false;
            split_fragment.children = pass.materialize(&children);
            split_fragment.heights = pass.heights.clone();
            split_fragment.ledger = pass.ledger.slice(ledger_rows.min(pass.grid.len()));
            split_fragment.column_widths = Arc::clone(&pass.widths);
            split_fragment.grid_origin = Some(grid_origin);
            split_fragment.tolerance = self.tolerance;
            split_fragment.header = split_header.take();
            split_fragment.footer = split_footer.take();
            split_fragment.occupied_area = Some(occupied);

            let overflow_fragment = self.overflow_fragment(start + row, overflow_rows);
            return Ok(LayoutResult::partial(occupied, split_fragment, overflow_fragment));
        }

        let mut footer = footer;
        if model.skip_last_footer || !model.complete {
            footer = None;
        }

        self.children = pass.materialize(&children);
        self.heights = pass.heights.clone();
        self.column_widths = Arc::clone(&pass.widths);
        self.ledger = pass.ledger;
        self.grid_origin = Some(grid_origin);
        self.header = header;
        self.occupied_area = Some(occupied);

        let shift = self
            .properties
            .position
            .map(|position| layout_box.y + position.y - occupied.bbox.y);

        if let Some(area) = self.occupied_area.as_mut() {
            area.bbox
                .apply_margins(top_width / 2.0, 0.0, bottom_width / 2.0, 0.0, true)
                .apply_margins(margins.top, margins.right, margins.bottom, margins.left, true);
        }

        if let Some(mut footer_renderer) = footer {
            footer_renderer.move_by(0.0, layout_box.height);
            let footer_height = footer_renderer
                .occupied_area
                .map_or(0.0, |a| a.bbox.height);
            if let Some(area) = self.occupied_area.as_mut() {
                area.bbox.move_down(footer_height).increase_height(footer_height);
            }
            self.footer = Some(footer_renderer);
        }

        if let Some(dy) = shift {
            self.move_by(0.0, dy);
        }

        let occupied = self.occupied_area.unwrap_or(occupied);
        Ok(LayoutResult::full(occupied))
    }

    /// Completes a partially filled last row with border-less placeholder cells.
    fn fill_last_row(&self, pass: &mut Pass) {
        let Some(last) = pass.grid.len().checked_sub(1) else {
            return;
        };
        let mut col = 0;
        while col < pass.columns {
            match pass.grid[last][col] {
                Some(idx) => col += pass.cells[idx].cell.colspan,
                None => break,
            }
        }
        if col == 0 || col >= pass.columns {
            return;
        }
        let model_row = self.row_start + last;
        while col < pass.columns {
            let placeholder = crate::model::Cell::placeholder(model_row, col);
            let idx = pass.push(CellRenderer::new(Arc::new(placeholder)));
            pass.grid[last][col] = Some(idx);
            col += 1;
        }
    }

    /// Queues cells from later rows whose span covers `row`, so they are laid out at
    /// least partially before the split. Returns whether any such cell takes part.
    fn pull_spanning_cells(
        &self,
        pass: &mut Pass,
        queue: &mut VecDeque<QueuedCell>,
        row: usize,
        split_cell: usize,
    ) -> bool {
        let mut added = false;
        for col in 0..pass.columns {
            if pass.grid[row][col].is_some() {
                if pass.cells[split_cell].cell.rowspan > 1 {
                    added = true;
                }
                continue;
            }
            let Some((add_row, idx)) = (row + 1..pass.grid.len())
                .find_map(|r| pass.grid[r][col].map(|idx| (r, idx)))
            else {
                continue;
            };
            let (rowspan, colspan) = {
                let cell = &pass.cells[idx].cell;
                (cell.rowspan, cell.colspan)
            };
            let spans_row = row + rowspan > add_row;
            if !spans_row {
                continue;
            }
            if pass.cells[idx].is_bottom_aligned() {
                // Bottom-aligned content stays together; only close the lines around it.
                let borders = pass.borders(idx);
                pass.ledger.set_horizontal(row + 1, col, borders.bottom);
                if col == 0 {
                    for i in (0..=row).rev() {
                        if pass.ledger.resolve_vertical(0, i, borders.left) != Resolution::Replaced {
                            break;
                        }
                    }
                } else if col + colspan == pass.columns {
                    for i in (0..=row).rev() {
                        if pass.ledger.resolve_vertical(col + colspan, i, borders.right)
                            != Resolution::Replaced
                        {
                            break;
                        }
                    }
                }
            } else {
                queue.push_back(QueuedCell {
                    cell: idx,
                    col,
                    finish_row: add_row,
                });
                added = true;
            }
        }
        added
    }

    /// Grows the last placed row when a collapsed bottom border is wider than the
    /// cell's own, and records that border in the ledger. Returns how much the row grew.
    fn correct_bottom_border(&self, pass: &mut Pass, row: usize, committed: bool) -> f32 {
        if pass.heights.is_empty() {
            return 0.0;
        }
        let table_bottom = self.properties.borders.bottom;
        let (last_row, line) = if committed { (row, row + 1) } else { (row - 1, row) };
        let mut difference = 0.0f32;
        for col in 0..pass.columns {
            let Some(idx) = pass.grid[last_row][col] else {
                continue;
            };
            let cell_bottom = pass.cells[idx].properties.borders.bottom;
            let collapsed = collapse(cell_bottom, table_bottom);
            let cell_width = width_of(cell_bottom.as_ref());
            let collapsed_width = width_of(collapsed.as_ref());
            if cell_width < collapsed_width {
                pass.cells[idx].properties.borders.bottom = collapsed;
                for j in 0..pass.cells[idx].cell.colspan {
                    pass.ledger.set_horizontal(line, col + j, collapsed);
                }
            }
            let grow = (collapsed_width - cell_width) / 2.0;
            let rowspan = pass.cells[idx].cell.rowspan;
            let span_height: f32 = pass.heights[pass.heights.len().saturating_sub(rowspan)..]
                .iter()
                .sum();
            if let Some(area) = pass.cells[idx].occupied_area_mut() {
                area.bbox.apply_margins(0.0, 0.0, grow, 0.0, true);
                if span_height < area.bbox.height {
                    difference = difference.max(grow);
                }
            }
        }
        if let Some(last) = pass.heights.last_mut() {
            *last += difference;
        }
        difference
    }

    /// An empty renderer of the same model cell for the overflow fragment, with its top
    /// border taken from the table when the table has one.
    fn continuation_of(&self, cell: &CellRenderer) -> CellRenderer {
        let mut continuation = cell.empty_continuation();
        if let Some(top) = self.properties.borders.top {
            continuation.properties.borders.top = Some(top);
        }
        continuation
    }
}

fn queue_row(pass: &Pass, row: usize) -> VecDeque<QueuedCell> {
    pass.grid[row]
        .iter()
        .enumerate()
        .filter_map(|(col, slot)| {
            slot.map(|cell| QueuedCell {
                cell,
                col,
                finish_row: row,
            })
        })
        .collect()
}

/// Stretches every placed cell over the rows it spans and applies vertical alignment.
fn stretch_placed_cells(pass: &mut Pass, row: usize, has_content: bool, committed: bool) {
    for k in 0..=row {
        if k == row && !committed {
            continue;
        }
        for col in 0..pass.columns {
            let Some(idx) = pass.grid[k][col] else {
                continue;
            };
            let rowspan = pass.cells[idx].cell.rowspan;
            let from = (k + 1).saturating_sub(rowspan);
            let height: f32 = pass.heights[from..=k].iter().sum();
            let line = if k == row && !has_content { k } else { k + 1 };
            if pass.ledger.horizontal(line)[col].is_none() {
                let bottom = pass.cells[idx].properties.borders.bottom;
                pass.ledger.set_horizontal(line, col, bottom);
            }
            let cell = &mut pass.cells[idx];
            cell.stretch_to(height);
            cell.apply_vertical_alignment();
        }
    }
}
