//! Table renderer: border collapsing, row-by-row pagination and border drawing.

pub mod draw;
pub mod ledger;
mod pagination;


pub use draw::{border_segments, BorderSegment};
pub use ledger::{BorderLedger, Resolution};

use crate::config::LayoutConfig;
use crate::interface::{LayoutContext, LayoutResult, Renderer};
use crate::model::Table;
use crate::node_kind::NodeKind;
use crate::nodes::{CellRenderer, RenderNode};
use crate::painting::{DrawContext, TagRole};
use crate::properties::Properties;
use crate::LayoutError;
use std::sync::Arc;
use tabula_style::Borders;
use tabula_types::LayoutArea;

/// Renders a contiguous row range of a table.
///
/// A fresh renderer covers the whole table. Laying it out either places everything
/// (the renderer itself holds the result) or produces a split fragment for the current
/// area and an overflow fragment for the rest.
#[derive(Debug, Clone)]
pub struct TableRenderer {
    model: Arc<Table>,
    /// Model index of the first row of this fragment.
    row_start: usize,
    /// Cells keyed by the *last* row of their span, relative to `row_start`.
    rows: Vec<Vec<Option<CellRenderer>>>,
    is_original: bool,
    is_last_fragment: bool,
    header: Option<Box<TableRenderer>>,
    footer: Option<Box<TableRenderer>>,
    children: Vec<CellRenderer>,
    heights: Vec<f32>,
    column_widths: Arc<[f32]>,
    ledger: BorderLedger,
    /// Top-left corner of the cell grid, inside the outer half borders.
    grid_origin: Option<(f32, f32)>,
    /// Fragments lower than this draw no borders.
    tolerance: f32,
    properties: Properties,
    occupied_area: Option<LayoutArea>,
}

impl TableRenderer {
    pub fn new(model: Arc<Table>) -> Self {
        let properties = Properties {
            borders: model.borders,
            keep_together: model.keep_together,
            position: model.position,
            margins: model.margins,
            width: model.width,
            ..Properties::default()
        };
        let mut renderer = Self::empty(model, 0, properties);
        renderer.rows = vec![vec![None; renderer.model.columns()]; renderer.model.row_count()];
        let cells = renderer.model.cells.clone();
        for cell in cells {
            renderer.add_child(RenderNode::Cell(CellRenderer::new(cell)));
        }
        renderer
    }

    /// A header or footer renderer carrying the borders of the table it belongs to.
    fn for_part(model: Arc<Table>, borders: Borders) -> Self {
        let mut renderer = Self::new(model);
        renderer.properties.borders = borders;
        renderer
    }

    fn empty(model: Arc<Table>, row_start: usize, properties: Properties) -> Self {
        Self {
            model,
            row_start,
            rows: Vec::new(),
            is_original: true,
            is_last_fragment: true,
            header: None,
            footer: None,
            children: Vec::new(),
            heights: Vec::new(),
            column_widths: Arc::from(Vec::new()),
            ledger: BorderLedger::default(),
            grid_origin: None,
            tolerance: LayoutConfig::default().float_tolerance,
            properties,
            occupied_area: None,
        }
    }

    /// Adds a cell renderer at the bottom-left slot of its span.
    ///
    /// Anything other than a cell is reported and ignored.
    pub fn add_child(&mut self, node: RenderNode) {
        let cell = match node {
            RenderNode::Cell(cell) => cell,
            other => {
                log::error!(
                    "Only cell renderers can be added to a table, got a {} renderer; ignoring it.",
                    other.kind().as_str()
                );
                return;
            }
        };
        let (row, col, rowspan) = (cell.cell.row, cell.cell.col, cell.cell.rowspan);
        let slot = (row + rowspan)
            .checked_sub(self.row_start + 1)
            .and_then(|r| self.rows.get_mut(r))
            .and_then(|r| r.get_mut(col));
        match slot {
            Some(slot) => *slot = Some(cell),
            None => log::warn!(
                "Cell at row {}, column {} lies outside rows {}..{} of this table; ignoring it.",
                row,
                col,
                self.row_start,
                self.row_start + self.rows.len()
            ),
        }
    }

    pub fn model(&self) -> &Table {
        &self.model
    }

    /// Model rows covered by this fragment.
    pub fn row_range(&self) -> std::ops::Range<usize> {
        self.row_start..self.row_start + self.rows.len()
    }

    /// Laid-out cells, in placement order.
    pub fn children(&self) -> &[CellRenderer] {
        &self.children
    }

    /// Heights of the rows placed by the last layout.
    pub fn heights(&self) -> &[f32] {
        &self.heights
    }

    pub fn column_widths(&self) -> &[f32] {
        &self.column_widths
    }

    pub fn ledger(&self) -> &BorderLedger {
        &self.ledger
    }

    pub fn header(&self) -> Option<&TableRenderer> {
        self.header.as_deref()
    }

    pub fn footer(&self) -> Option<&TableRenderer> {
        self.footer.as_deref()
    }

    /// The not yet laid out cell whose span ends at `row` (fragment relative) and starts at `col`.
    pub fn cell_at(&self, row: usize, col: usize) -> Option<&CellRenderer> {
        self.rows.get(row)?.get(col)?.as_ref()
    }

    pub fn is_original(&self) -> bool {
        self.is_original
    }

    pub fn is_last_fragment(&self) -> bool {
        self.is_last_fragment
    }

    /// Segments the border pass strokes for this fragment, or nothing when the
    /// fragment has no visible geometry.
    pub fn border_segments(&self) -> Vec<BorderSegment> {
        let Some(area) = &self.occupied_area else {
            return Vec::new();
        };
        if area.bbox.height < self.tolerance || self.children.is_empty() {
            return Vec::new();
        }
        let Some((x, y)) = self.grid_origin else {
            return Vec::new();
        };
        border_segments(&self.ledger, &self.heights, &self.column_widths, x, y)
    }

    fn draw_borders(&self, ctx: &mut DrawContext) {
        let segments = self.border_segments();
        if segments.is_empty() {
            return;
        }
        ctx.as_artifact(|ctx| {
            for s in &segments {
                ctx.canvas.draw_border(&s.border, s.x1, s.y1, s.x2, s.y2);
            }
        });
    }

    fn draw_children(&self, ctx: &mut DrawContext) {
        let model = &self.model;
        if let Some(header) = &self.header {
            let first_header = self.row_start == 0 && self.is_original && !model.skip_first_header;
            if first_header {
                header.draw(ctx);
            } else {
                ctx.as_artifact(|ctx| header.draw(ctx));
            }
        }

        let tagged = ctx.is_tagging() && !self.children.is_empty();
        let grouped = (model.header.is_some() || model.footer.is_some())
            && (!model.skip_first_header || !model.skip_last_footer);
        if tagged && grouped {
            if let Some(tags) = ctx.tag_pointer() {
                match tags.kid_roles().iter().position(|r| *r == TagRole::TBody) {
                    Some(index) => tags.move_to_kid(index),
                    None => tags.add_tag(TagRole::TBody),
                }
            }
        }

        // Rows of every fragment share the table's tag, so TR kids are indexed by model row.
        for child in &self.children {
            if tagged {
                if let Some(tags) = ctx.tag_pointer() {
                    let row = child.cell.row;
                    if row < tags.kid_roles().len() {
                        tags.move_to_kid(row);
                    } else {
                        tags.add_tag(TagRole::Tr);
                    }
                }
            }
            child.draw(ctx);
            if tagged {
                if let Some(tags) = ctx.tag_pointer() {
                    tags.move_to_parent();
                }
            }
        }
        if tagged && grouped {
            if let Some(tags) = ctx.tag_pointer() {
                tags.move_to_parent();
            }
        }

        self.draw_borders(ctx);

        if let Some(footer) = &self.footer {
            let last_footer = self.is_last_fragment && model.complete && !model.skip_last_footer;
            if last_footer {
                footer.draw(ctx);
            } else {
                ctx.as_artifact(|ctx| footer.draw(ctx));
            }
        }
    }
}

impl Renderer for TableRenderer {
    fn layout(&mut self, ctx: &LayoutContext) -> Result<LayoutResult, LayoutError> {
        Ok(self.layout_table(ctx)?.map(RenderNode::from))
    }

    fn draw(&self, ctx: &mut DrawContext) {
        let id = self.model.id;
        let tagged = match ctx.tag_pointer() {
            Some(tags) => {
                tags.add_tag_for(id, self.model.role);
                true
            }
            None => false,
        };

        self.draw_children(ctx);

        if tagged {
            if let Some(tags) = ctx.tag_pointer() {
                tags.move_to_parent();
                if self.is_last_fragment && self.model.complete {
                    tags.remove_element_connection(id);
                }
            }
        }
    }

    fn occupied_area(&self) -> Option<&LayoutArea> {
        self.occupied_area.as_ref()
    }

    fn move_by(&mut self, dx: f32, dy: f32) {
        if let Some(area) = self.occupied_area.as_mut() {
            area.bbox.translate(dx, dy);
        }
        if let Some((x, y)) = self.grid_origin.as_mut() {
            *x += dx;
            *y += dy;
        }
        for child in &mut self.children {
            child.move_by(dx, dy);
        }
        if let Some(header) = self.header.as_mut() {
            header.move_by(dx, dy);
        }
        if let Some(footer) = self.footer.as_mut() {
            footer.move_by(dx, dy);
        }
    }

    fn properties(&self) -> &Properties {
        &self.properties
    }

    fn properties_mut(&mut self) -> &mut Properties {
        &mut self.properties
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Table
    }
}
