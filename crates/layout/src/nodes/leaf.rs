use crate::interface::{LayoutContext, LayoutResult, NothingCause, Renderer};
use crate::model::CellContent;
use crate::node_kind::NodeKind;
use crate::nodes::RenderNode;
use crate::painting::DrawContext;
use crate::properties::Properties;
use crate::LayoutError;
use tabula_types::{LayoutArea, Rect};

/// How a leaf occupies vertical space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LeafContent {
    Block { height: f32 },
    Lines { line_height: f32, count: usize },
}

impl LeafContent {
    pub fn height(&self) -> f32 {
        match *self {
            LeafContent::Block { height } => height,
            LeafContent::Lines { line_height, count } => line_height * count as f32,
        }
    }
}

/// Generic content inside a cell: a fixed block, or a run of equal lines that can
/// be split between any two lines.
#[derive(Debug, Clone)]
pub struct LeafRenderer {
    content: LeafContent,
    label: Option<String>,
    properties: Properties,
    occupied_area: Option<LayoutArea>,
}

impl LeafRenderer {
    pub fn new(content: LeafContent) -> Self {
        Self {
            content,
            label: None,
            properties: Properties::default(),
            occupied_area: None,
        }
    }

    pub fn block(height: f32) -> Self {
        Self::new(LeafContent::Block { height })
    }

    pub fn lines(line_height: f32, count: usize) -> Self {
        Self::new(LeafContent::Lines { line_height, count })
    }

    pub fn with_label(mut self, label: Option<String>) -> Self {
        self.label = label;
        self
    }

    /// Builds the renderer for a non-table content item.
    pub(crate) fn from_content(content: &CellContent) -> Option<Self> {
        match content {
            CellContent::Block { height, label } => {
                Some(Self::block(*height).with_label(label.clone()))
            }
            CellContent::Lines {
                line_height,
                count,
                label,
            } => Some(Self::lines(*line_height, *count).with_label(label.clone())),
            CellContent::Table(_) => None,
        }
    }

    pub fn content(&self) -> LeafContent {
        self.content
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    fn placed(&self, area: &LayoutArea, content: LeafContent) -> Self {
        let height = content.height();
        let width = self.properties.width.unwrap_or(area.bbox.width);
        let bbox = Rect::new(area.bbox.x, area.bbox.top() - height, width, height);
        Self {
            content,
            label: self.label.clone(),
            properties: self.properties.clone(),
            occupied_area: Some(LayoutArea::new(area.page_number, bbox)),
        }
    }

    pub fn layout_leaf(&mut self, ctx: &LayoutContext) -> LayoutResult<LeafRenderer> {
        let area = ctx.area;
        let available = area.bbox.height + ctx.tolerance();
        let forced = ctx.forced_placement || self.properties.forced_placement;

        let (line_height, count) = match self.content {
            LeafContent::Block { height } => {
                if height <= available || forced {
                    *self = self.placed(&area, self.content);
                    return LayoutResult::full(self.occupied_area.unwrap_or(area));
                }
                return LayoutResult::nothing(None, NothingCause::new(NodeKind::Leaf));
            }
            LeafContent::Lines { line_height, count } => (line_height, count),
        };

        let mut fitting = if line_height > 0.0 {
            ((available / line_height).floor().max(0.0) as usize).min(count)
        } else {
            count
        };
        if fitting == 0 && count > 0 && forced {
            log::debug!("Forcing one line of {} into an area that is too small.", count);
            fitting = 1;
        }

        if fitting == count {
            *self = self.placed(&area, self.content);
            return LayoutResult::full(self.occupied_area.unwrap_or(area));
        }
        if fitting == 0 {
            return LayoutResult::nothing(None, NothingCause::new(NodeKind::Leaf));
        }

        let split = self.placed(
            &area,
            LeafContent::Lines {
                line_height,
                count: fitting,
            },
        );
        let overflow = Self {
            content: LeafContent::Lines {
                line_height,
                count: count - fitting,
            },
            label: self.label.clone(),
            properties: self.properties.clone(),
            occupied_area: None,
        };
        let occupied = split.occupied_area.unwrap_or(area);
        LayoutResult::partial(occupied, split, overflow)
    }
}

impl Renderer for LeafRenderer {
    fn layout(&mut self, ctx: &LayoutContext) -> Result<LayoutResult, LayoutError> {
        Ok(self.layout_leaf(ctx).map(RenderNode::Leaf))
    }

    fn draw(&self, ctx: &mut DrawContext) {
        if let Some(area) = &self.occupied_area {
            ctx.canvas.draw_content(area.bbox, self.label());
        }
    }

    fn occupied_area(&self) -> Option<&LayoutArea> {
        self.occupied_area.as_ref()
    }

    fn move_by(&mut self, dx: f32, dy: f32) {
        if let Some(area) = self.occupied_area.as_mut() {
            area.bbox.translate(dx, dy);
        }
    }

    fn properties(&self) -> &Properties {
        &self.properties
    }

    fn properties_mut(&mut self) -> &mut Properties {
        &mut self.properties
    }

    fn kind(&self) -> NodeKind {
        NodeKind::Leaf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interface::LayoutStatus;
    use crate::LayoutConfig;

    fn area(height: f32) -> LayoutArea {
        LayoutArea::new(1, Rect::new(10.0, 100.0, 50.0, height))
    }

    #[test]
    fn block_fits_at_top_of_area() {
        let config = LayoutConfig::default();
        let mut leaf = LeafRenderer::block(20.0);
        let result = leaf.layout_leaf(&LayoutContext::new(area(30.0), &config));
        assert_eq!(result.status, LayoutStatus::Full);
        let bbox = leaf.occupied_area().unwrap().bbox;
        assert_eq!(bbox, Rect::new(10.0, 110.0, 50.0, 20.0));
    }

    #[test]
    fn block_that_does_not_fit_is_nothing_unless_forced() {
        let config = LayoutConfig::default();
        let mut leaf = LeafRenderer::block(40.0);
        let ctx = LayoutContext::new(area(30.0), &config);
        let result = leaf.layout_leaf(&ctx);
        assert_eq!(result.status, LayoutStatus::Nothing);
        assert!(result.overflow.is_none());
        assert_eq!(result.cause_of_nothing.unwrap().kind, NodeKind::Leaf);

        let forced = leaf.layout_leaf(&ctx.with_forced_placement(true));
        assert_eq!(forced.status, LayoutStatus::Full);
    }

    #[test]
    fn lines_split_between_lines() {
        let config = LayoutConfig::default();
        let mut leaf = LeafRenderer::lines(10.0, 5);
        let result = leaf.layout_leaf(&LayoutContext::new(area(34.0), &config));
        assert_eq!(result.status, LayoutStatus::Partial);
        let split = result.split.unwrap();
        let overflow = result.overflow.unwrap();
        assert_eq!(split.content(), LeafContent::Lines { line_height: 10.0, count: 3 });
        assert_eq!(overflow.content(), LeafContent::Lines { line_height: 10.0, count: 2 });
        assert_eq!(split.occupied_area().unwrap().bbox.height, 30.0);
        assert!(overflow.occupied_area().is_none());
    }

    #[test]
    fn tolerance_absorbs_rounding() {
        let config = LayoutConfig::default();
        let mut leaf = LeafRenderer::block(20.00005);
        let result = leaf.layout_leaf(&LayoutContext::new(area(20.0), &config));
        assert!(result.is_full());
    }
}
