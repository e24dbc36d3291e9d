use tabula_style::Border;
use tabula_types::Rect;

/// A drawing surface in page coordinates.
pub trait DrawingCanvas {
    /// Strokes a straight border segment from `(x1, y1)` to `(x2, y2)`.
    fn draw_border(&mut self, border: &Border, x1: f32, y1: f32, x2: f32, y2: f32);

    /// Paints a placeholder for leaf content occupying `rect`.
    fn draw_content(&mut self, rect: Rect, label: Option<&str>);

    /// Starts a region of non-semantic content.
    fn open_artifact(&mut self);

    fn close_artifact(&mut self);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Border {
        border: Border,
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
    },
    Content {
        rect: Rect,
        label: Option<String>,
    },
    OpenArtifact,
    CloseArtifact,
}

/// A canvas that records every call, used for inspection and testing.
#[derive(Debug, Default, Clone)]
pub struct RecordingCanvas {
    pub ops: Vec<DrawOp>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn borders(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Border { .. }))
    }

    pub fn contents(&self) -> impl Iterator<Item = &DrawOp> {
        self.ops
            .iter()
            .filter(|op| matches!(op, DrawOp::Content { .. }))
    }
}

impl DrawingCanvas for RecordingCanvas {
    fn draw_border(&mut self, border: &Border, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.ops.push(DrawOp::Border {
            border: *border,
            x1,
            y1,
            x2,
            y2,
        });
    }

    fn draw_content(&mut self, rect: Rect, label: Option<&str>) {
        self.ops.push(DrawOp::Content {
            rect,
            label: label.map(str::to_string),
        });
    }

    fn open_artifact(&mut self) {
        self.ops.push(DrawOp::OpenArtifact);
    }

    fn close_artifact(&mut self) {
        self.ops.push(DrawOp::CloseArtifact);
    }
}
