pub mod cell;
pub mod leaf;
pub mod table;

pub use cell::CellRenderer;
pub use leaf::{LeafContent, LeafRenderer};
pub use table::TableRenderer;

use crate::interface::{LayoutContext, LayoutResult, Renderer};
use crate::model::CellContent;
use crate::node_kind::NodeKind;
use crate::painting::DrawContext;
use crate::properties::Properties;
use crate::LayoutError;
use std::sync::Arc;
use tabula_types::LayoutArea;

/// A node in the render tree.
///
/// Tables only look at the `Cell` variant for span metadata; everything else goes
/// through the [`Renderer`] contract.
#[derive(Debug, Clone)]
pub enum RenderNode {
    Leaf(LeafRenderer),
    Cell(CellRenderer),
    Table(Box<TableRenderer>),
}

impl RenderNode {
    pub(crate) fn from_content(content: &CellContent) -> Self {
        match content {
            CellContent::Table(table) => {
                RenderNode::Table(Box::new(TableRenderer::new(Arc::clone(table))))
            }
            other => match LeafRenderer::from_content(other) {
                Some(leaf) => RenderNode::Leaf(leaf),
                None => RenderNode::Leaf(LeafRenderer::block(0.0)),
            },
        }
    }

    pub fn as_leaf(&self) -> Option<&LeafRenderer> {
        match self {
            RenderNode::Leaf(leaf) => Some(leaf),
            _ => None,
        }
    }

    pub fn as_cell(&self) -> Option<&CellRenderer> {
        match self {
            RenderNode::Cell(cell) => Some(cell),
            _ => None,
        }
    }

    pub fn as_table(&self) -> Option<&TableRenderer> {
        match self {
            RenderNode::Table(table) => Some(table),
            _ => None,
        }
    }

    fn inner(&self) -> &dyn Renderer {
        match self {
            RenderNode::Leaf(node) => node,
            RenderNode::Cell(node) => node,
            RenderNode::Table(node) => node.as_ref(),
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Renderer {
        match self {
            RenderNode::Leaf(node) => node,
            RenderNode::Cell(node) => node,
            RenderNode::Table(node) => node.as_mut(),
        }
    }
}

impl From<TableRenderer> for RenderNode {
    fn from(table: TableRenderer) -> Self {
        RenderNode::Table(Box::new(table))
    }
}

impl From<CellRenderer> for RenderNode {
    fn from(cell: CellRenderer) -> Self {
        RenderNode::Cell(cell)
    }
}

impl From<LeafRenderer> for RenderNode {
    fn from(leaf: LeafRenderer) -> Self {
        RenderNode::Leaf(leaf)
    }
}

impl Renderer for RenderNode {
    fn layout(&mut self, ctx: &LayoutContext) -> Result<LayoutResult, LayoutError> {
        self.inner_mut().layout(ctx)
    }

    fn draw(&self, ctx: &mut DrawContext) {
        self.inner().draw(ctx)
    }

    fn occupied_area(&self) -> Option<&LayoutArea> {
        self.inner().occupied_area()
    }

    fn move_by(&mut self, dx: f32, dy: f32) {
        self.inner_mut().move_by(dx, dy)
    }

    fn properties(&self) -> &Properties {
        self.inner().properties()
    }

    fn properties_mut(&mut self) -> &mut Properties {
        self.inner_mut().properties_mut()
    }

    fn kind(&self) -> NodeKind {
        self.inner().kind()
    }
}
