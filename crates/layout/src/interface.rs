use crate::config::LayoutConfig;
use crate::node_kind::NodeKind;
use crate::nodes::RenderNode;
use crate::painting::DrawContext;
use crate::properties::Properties;
use crate::LayoutError;
use std::fmt::Debug;
use tabula_types::LayoutArea;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutStatus {
    /// Everything was placed.
    Full,
    /// A prefix was placed; the rest is carried by the overflow renderer.
    Partial,
    /// Nothing could be placed in the given area.
    Nothing,
}

/// Grid position of a table cell, in model coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CellPosition {
    pub row: usize,
    pub col: usize,
}

/// The deepest renderer that produced `Nothing`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NothingCause {
    pub kind: NodeKind,
    /// The table cell the failure happened in, if the failure happened inside a table.
    pub cell: Option<CellPosition>,
}

impl NothingCause {
    pub fn new(kind: NodeKind) -> Self {
        Self { kind, cell: None }
    }

    /// Attaches the cell position unless a deeper table already did.
    pub fn in_cell(mut self, position: CellPosition) -> Self {
        self.cell.get_or_insert(position);
        self
    }
}

/// Outcome of one layout attempt.
///
/// A `Nothing` result may carry an overflow renderer to continue with; when it does not,
/// the renderer that was laid out is unchanged and should be retried in the next area.
#[derive(Debug, Clone)]
pub struct LayoutResult<R = RenderNode> {
    pub status: LayoutStatus,
    pub occupied_area: Option<LayoutArea>,
    pub split: Option<R>,
    pub overflow: Option<R>,
    pub cause_of_nothing: Option<NothingCause>,
}

impl<R> LayoutResult<R> {
    pub fn full(occupied_area: LayoutArea) -> Self {
        Self {
            status: LayoutStatus::Full,
            occupied_area: Some(occupied_area),
            split: None,
            overflow: None,
            cause_of_nothing: None,
        }
    }

    pub fn partial(occupied_area: LayoutArea, split: R, overflow: R) -> Self {
        Self {
            status: LayoutStatus::Partial,
            occupied_area: Some(occupied_area),
            split: Some(split),
            overflow: Some(overflow),
            cause_of_nothing: None,
        }
    }

    pub fn nothing(overflow: Option<R>, cause: NothingCause) -> Self {
        Self {
            status: LayoutStatus::Nothing,
            occupied_area: None,
            split: None,
            overflow,
            cause_of_nothing: Some(cause),
        }
    }

    pub fn is_full(&self) -> bool {
        self.status == LayoutStatus::Full
    }

    pub fn map<S>(self, f: impl Fn(R) -> S) -> LayoutResult<S> {
        LayoutResult {
            status: self.status,
            occupied_area: self.occupied_area,
            split: self.split.map(&f),
            overflow: self.overflow.map(&f),
            cause_of_nothing: self.cause_of_nothing,
        }
    }
}

/// Read-only inputs of a layout pass.
#[derive(Debug, Clone, Copy)]
pub struct LayoutContext<'a> {
    pub area: LayoutArea,
    pub config: &'a LayoutConfig,
    /// Inherited from an ancestor that must be placed even though it does not fit.
    pub forced_placement: bool,
}

impl<'a> LayoutContext<'a> {
    pub fn new(area: LayoutArea, config: &'a LayoutConfig) -> Self {
        Self {
            area,
            config,
            forced_placement: false,
        }
    }

    pub fn with_area(&self, area: LayoutArea) -> Self {
        Self { area, ..*self }
    }

    pub fn with_forced_placement(&self, forced_placement: bool) -> Self {
        Self {
            forced_placement,
            ..*self
        }
    }

    pub fn tolerance(&self) -> f32 {
        self.config.float_tolerance
    }
}

/// The contract shared by leaf content, cells and tables.
pub trait Renderer: Debug {
    fn layout(&mut self, ctx: &LayoutContext) -> Result<LayoutResult, LayoutError>;

    fn draw(&self, ctx: &mut DrawContext);

    fn occupied_area(&self) -> Option<&LayoutArea>;

    /// Translates the renderer and everything it placed.
    fn move_by(&mut self, dx: f32, dy: f32);

    fn properties(&self) -> &Properties;

    fn properties_mut(&mut self) -> &mut Properties;

    fn kind(&self) -> NodeKind;
}
