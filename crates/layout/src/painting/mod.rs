pub mod canvas;
pub mod tagging;

pub use canvas::{DrawOp, DrawingCanvas, RecordingCanvas};
pub use tagging::{TagRole, TagTree, TagTreePointer};

/// Mutable state threaded through a draw pass.
pub struct DrawContext<'a> {
    pub canvas: &'a mut dyn DrawingCanvas,
    pub tag_pointer: Option<&'a mut dyn TagTreePointer>,
    pub tagging_enabled: bool,
}

impl<'a> DrawContext<'a> {
    pub fn new(canvas: &'a mut dyn DrawingCanvas) -> Self {
        Self {
            canvas,
            tag_pointer: None,
            tagging_enabled: false,
        }
    }

    pub fn tagged(canvas: &'a mut dyn DrawingCanvas, tag_pointer: &'a mut dyn TagTreePointer) -> Self {
        Self {
            canvas,
            tag_pointer: Some(tag_pointer),
            tagging_enabled: true,
        }
    }

    /// Whether structure tags should be emitted right now.
    pub fn is_tagging(&self) -> bool {
        self.tagging_enabled && self.tag_pointer.is_some()
    }

    /// The tag pointer, while tagging is enabled.
    pub fn tag_pointer(&mut self) -> Option<&mut (dyn TagTreePointer + 'a)> {
        if self.tagging_enabled {
            self.tag_pointer.as_deref_mut()
        } else {
            None
        }
    }

    /// Runs `f` with tagging suspended and the drawn content marked as an artifact.
    /// Does nothing special when tagging is already off.
    pub fn as_artifact(&mut self, f: impl FnOnce(&mut DrawContext<'a>)) {
        if !self.is_tagging() {
            f(self);
            return;
        }
        self.tagging_enabled = false;
        self.canvas.open_artifact();
        f(self);
        self.canvas.close_artifact();
        self.tagging_enabled = true;
    }
}
