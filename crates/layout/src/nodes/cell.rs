use crate::interface::{LayoutContext, LayoutResult, LayoutStatus, NothingCause, Renderer};
use crate::model::Cell;
use crate::node_kind::NodeKind;
use crate::nodes::RenderNode;
use crate::painting::{DrawContext, TagRole};
use crate::properties::Properties;
use crate::LayoutError;
use std::sync::Arc;
use tabula_style::{Borders, Side, VerticalAlignment};
use tabula_types::{LayoutArea, Rect};

/// Lays out the content of one table cell inside the box the table hands it.
///
/// Half of each current border width and the padding are reserved inside the box;
/// the other half of every border belongs to the neighbouring cell or the table.
#[derive(Debug, Clone)]
pub struct CellRenderer {
    pub(crate) cell: Arc<Cell>,
    children: Vec<RenderNode>,
    pub(crate) properties: Properties,
    occupied_area: Option<LayoutArea>,
}

impl CellRenderer {
    pub fn new(cell: Arc<Cell>) -> Self {
        let children = cell.content.iter().map(RenderNode::from_content).collect();
        Self::with_children(cell, children)
    }

    fn with_children(cell: Arc<Cell>, children: Vec<RenderNode>) -> Self {
        let properties = Properties {
            borders: cell.borders,
            vertical_alignment: Some(cell.vertical_alignment),
            ..Properties::default()
        };
        Self {
            cell,
            children,
            properties,
            occupied_area: None,
        }
    }

    /// A renderer for the same model cell without any content, used to keep the grid
    /// of a continuation fragment free of holes.
    pub fn empty_continuation(&self) -> Self {
        Self::with_children(Arc::clone(&self.cell), Vec::new())
    }

    pub fn cell(&self) -> &Cell {
        &self.cell
    }

    pub fn children(&self) -> &[RenderNode] {
        &self.children
    }

    pub fn borders(&self) -> &Borders {
        &self.properties.borders
    }

    fn vertical_alignment(&self) -> VerticalAlignment {
        self.properties.vertical_alignment.unwrap_or_default()
    }

    pub(crate) fn is_bottom_aligned(&self) -> bool {
        self.vertical_alignment() == VerticalAlignment::Bottom
    }

    /// Half borders plus padding, as (top, right, bottom, left).
    fn insets(&self) -> (f32, f32, f32, f32) {
        let borders = &self.properties.borders;
        let padding = self.cell.padding;
        (
            borders.width(Side::Top) / 2.0 + padding.top,
            borders.width(Side::Right) / 2.0 + padding.right,
            borders.width(Side::Bottom) / 2.0 + padding.bottom,
            borders.width(Side::Left) / 2.0 + padding.left,
        )
    }

    fn content_box(&self, bbox: Rect) -> Rect {
        let (top, right, bottom, left) = self.insets();
        let mut content = bbox;
        content.apply_margins(top, right, bottom, left, false);
        content
    }

    fn fragment(&self, children: Vec<RenderNode>, occupied_area: Option<LayoutArea>) -> Self {
        Self {
            cell: Arc::clone(&self.cell),
            children,
            properties: self.properties.clone(),
            occupied_area,
        }
    }

    /// Lays the content out top-down. A later child that does not fit splits the cell;
    /// the first child not fitting leaves the whole cell for the next area.
    pub fn layout_cell(
        &mut self,
        ctx: &LayoutContext,
    ) -> Result<LayoutResult<CellRenderer>, LayoutError> {
        let area = ctx.area;
        let tolerance = ctx.tolerance();
        let forced = ctx.forced_placement || self.properties.forced_placement;
        let content = self.content_box(area.bbox);

        if content.height < -tolerance && !forced {
            log::trace!(
                "Cell at row {}, column {} cannot fit its borders and padding.",
                self.cell.row,
                self.cell.col
            );
            return Ok(LayoutResult::nothing(
                Some(self.clone()),
                NothingCause::new(NodeKind::Cell),
            ));
        }

        let mut cursor = content.top();
        let mut placed: Vec<RenderNode> = Vec::with_capacity(self.children.len());

        for (index, child) in self.children.iter().enumerate() {
            let mut child = child.clone();
            let remaining = Rect::new(content.x, content.y, content.width, cursor - content.y);
            let child_ctx = ctx
                .with_area(LayoutArea::new(area.page_number, remaining))
                .with_forced_placement(forced && index == 0);
            let result = child.layout(&child_ctx)?;

            match result.status {
                LayoutStatus::Full => {
                    if let Some(occupied) = child.occupied_area() {
                        cursor = cursor.min(occupied.bbox.y);
                    }
                    placed.push(child);
                }
                LayoutStatus::Partial => {
                    placed.extend(result.split);
                    let mut rest: Vec<RenderNode> = result.overflow.into_iter().collect();
                    rest.extend(self.children[index + 1..].iter().cloned());
                    return Ok(self.split_at(area, placed, rest));
                }
                LayoutStatus::Nothing => {
                    if index == 0 {
                        let cause = result
                            .cause_of_nothing
                            .unwrap_or(NothingCause::new(NodeKind::Cell));
                        return Ok(LayoutResult::nothing(Some(self.clone()), cause));
                    }
                    let mut rest = vec![result.overflow.unwrap_or(child)];
                    rest.extend(self.children[index + 1..].iter().cloned());
                    return Ok(self.split_at(area, placed, rest));
                }
            }
        }

        let (top, _, bottom, _) = self.insets();
        let height = content.top() - cursor + top + bottom;
        let bbox = Rect::new(area.bbox.x, area.bbox.top() - height, area.bbox.width, height);
        let occupied = LayoutArea::new(area.page_number, bbox);
        self.children = placed;
        self.occupied_area = Some(occupied);
        Ok(LayoutResult::full(occupied))
    }

    /// A split cell occupies the whole area it was given.
    fn split_at(
        &mut self,
        area: LayoutArea,
        placed: Vec<RenderNode>,
        rest: Vec<RenderNode>,
    ) -> LayoutResult<CellRenderer> {
        self.occupied_area = Some(area);
        let split = self.fragment(placed, Some(area));
        let overflow = self.fragment(rest, None);
        LayoutResult::partial(area, split, overflow)
    }

    pub(crate) fn occupied_area_mut(&mut self) -> Option<&mut LayoutArea> {
        self.occupied_area.as_mut()
    }

    /// Grows or shrinks the cell to `height`, keeping its top edge in place.
    pub(crate) fn stretch_to(&mut self, height: f32) {
        if let Some(area) = self.occupied_area.as_mut() {
            let shift = height - area.bbox.height;
            area.bbox.move_down(shift).set_height(height);
        }
    }

    /// Moves the content down inside a stretched cell according to its vertical alignment.
    pub(crate) fn apply_vertical_alignment(&mut self) {
        let factor = self.vertical_alignment().offset_factor();
        let Some(area) = self.occupied_area else {
            return;
        };
        if factor == 0.0 || self.children.is_empty() {
            return;
        }
        let content = self.content_box(area.bbox);
        let content_bottom = self
            .children
            .iter()
            .filter_map(|child| child.occupied_area().map(|a| a.bbox.y))
            .fold(f32::INFINITY, f32::min);
        if !content_bottom.is_finite() {
            return;
        }
        let free = content_bottom - content.y;
        if free <= 0.0 {
            return;
        }
        let dy = -free * factor;
        for child in &mut self.children {
            child.move_by(0.0, dy);
        }
    }
}

impl Renderer for CellRenderer {
    fn layout(&mut self, ctx: &LayoutContext) -> Result<LayoutResult, LayoutError> {
        Ok(self.layout_cell(ctx)?.map(RenderNode::Cell))
    }

    fn draw(&self, ctx: &mut DrawContext) {
        let tagged = ctx.is_tagging();
        if let Some(tags) = ctx.tag_pointer() {
            tags.add_tag(TagRole::Td);
        }
        for child in &self.children {
            child.draw(ctx);
        }
        if tagged {
            if let Some(tags) = ctx.tag_pointer() {
                tags.move_to_parent();
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
        for child in &mut self.children {
            child.move_by(dx, dy);
        }
    }

    fn properties(&self) -> &Properties {
        &self.properties
    }

    fn properties_mut(&mut self) -> &mut Properties {
        &mut self.properties
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Cell
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Cell;
    use crate::LayoutConfig;
    use tabula_style::{Border, Margins};
    use tabula_types::Color;

    fn ctx_area(height: f32) -> LayoutArea {
        LayoutArea::new(1, Rect::new(0.0, 0.0, 100.0, height))
    }

    fn bordered(width: f32) -> Cell {
        Cell::new()
            .with_borders(Borders::all(Border::solid(width, Color::BLACK)))
            .with_padding(Margins::all(0.0))
    }

    #[test]
    fn full_cell_includes_half_borders_and_padding() {
        let config = LayoutConfig::default();
        let cell = bordered(2.0)
            .with_padding(Margins::all(3.0))
            .with_block(10.0);
        let mut renderer = CellRenderer::new(Arc::new(cell));
        let result = renderer
            .layout_cell(&LayoutContext::new(ctx_area(100.0), &config))
            .unwrap();
        assert!(result.is_full());
        let bbox = result.occupied_area.unwrap().bbox;
        // 10 content + 2 * 3 padding + 2 * 1 half border
        assert_eq!(bbox.height, 18.0);
        assert_eq!(bbox.top(), 100.0);
        assert_eq!(bbox.width, 100.0);
        let leaf = renderer.children()[0].occupied_area().unwrap().bbox;
        assert_eq!(leaf.top(), 96.0);
        assert_eq!(leaf.x, 4.0);
    }

    #[test]
    fn first_child_not_fitting_returns_whole_cell() {
        let config = LayoutConfig::default();
        let cell = bordered(1.0).with_block(50.0);
        let mut renderer = CellRenderer::new(Arc::new(cell));
        let result = renderer
            .layout_cell(&LayoutContext::new(ctx_area(20.0), &config))
            .unwrap();
        assert_eq!(result.status, LayoutStatus::Nothing);
        assert_eq!(result.cause_of_nothing.unwrap().kind, NodeKind::Leaf);
        assert_eq!(result.overflow.unwrap().children().len(), 1);
    }

    #[test]
    fn later_child_not_fitting_splits() {
        let config = LayoutConfig::default();
        let cell = bordered(0.0).with_block(10.0).with_block(30.0);
        let mut renderer = CellRenderer::new(Arc::new(cell));
        let result = renderer
            .layout_cell(&LayoutContext::new(ctx_area(25.0), &config))
            .unwrap();
        assert_eq!(result.status, LayoutStatus::Partial);
        assert_eq!(result.occupied_area.unwrap().bbox.height, 25.0);
        assert_eq!(result.split.unwrap().children().len(), 1);
        assert_eq!(result.overflow.unwrap().children().len(), 1);
    }

    #[test]
    fn splitting_lines_carries_the_rest() {
        let config = LayoutConfig::default();
        let cell = bordered(0.0).with_lines(10.0, 4).with_block(5.0);
        let mut renderer = CellRenderer::new(Arc::new(cell));
        let result = renderer
            .layout_cell(&LayoutContext::new(ctx_area(25.0), &config))
            .unwrap();
        assert_eq!(result.status, LayoutStatus::Partial);
        let overflow = result.overflow.unwrap();
        assert_eq!(overflow.children().len(), 2);
        assert!(overflow.occupied_area().is_none());
    }

    #[test]
    fn layout_is_repeatable() {
        let config = LayoutConfig::default();
        let cell = bordered(1.0).with_lines(10.0, 3);
        let mut renderer = CellRenderer::new(Arc::new(cell));
        let ctx = LayoutContext::new(ctx_area(100.0), &config);
        let first = renderer.layout_cell(&ctx).unwrap().occupied_area;
        let second = renderer.layout_cell(&ctx).unwrap().occupied_area;
        assert_eq!(first, second);
    }

    #[test]
    fn stretch_keeps_top_and_aligns_bottom() {
        let config = LayoutConfig::default();
        let cell = bordered(0.0)
            .with_vertical_alignment(VerticalAlignment::Bottom)
            .with_block(10.0);
        let mut renderer = CellRenderer::new(Arc::new(cell));
        renderer
            .layout_cell(&LayoutContext::new(ctx_area(100.0), &config))
            .unwrap();
        renderer.stretch_to(40.0);
        renderer.apply_vertical_alignment();
        let bbox = renderer.occupied_area().unwrap().bbox;
        assert_eq!(bbox.top(), 100.0);
        assert_eq!(bbox.height, 40.0);
        let leaf = renderer.children()[0].occupied_area().unwrap().bbox;
        assert_eq!(leaf.y, 60.0);
    }

    #[test]
    fn empty_continuation_has_model_borders_and_no_content() {
        let cell = bordered(1.0).with_block(10.0);
        let mut renderer = CellRenderer::new(Arc::new(cell));
        renderer.properties.borders.top = None;
        let continuation = renderer.empty_continuation();
        assert!(continuation.children().is_empty());
        assert_eq!(continuation.borders().width(Side::Top), 1.0);
    }
}
