use crate::error::RenderError;
use crate::LABEL_FONT;
use lopdf::content::{Content, Operation};
use lopdf::{Object, StringFormat};
use tabula_layout::DrawingCanvas;
use tabula_style::{Border, BorderStyle};
use tabula_types::{Color, Rect};

const LABEL_SIZE: f32 = 8.0;
const CONTENT_FILL: f32 = 0.92;

/// A [`DrawingCanvas`] recording PDF content-stream operators for one page.
///
/// Coordinates are PDF user space: the origin is the bottom-left corner of the page.
pub struct PdfCanvas {
    content: Content,
    artifact_depth: usize,
}

impl Default for PdfCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfCanvas {
    pub fn new() -> Self {
        Self {
            content: Content {
                operations: Vec::new(),
            },
            artifact_depth: 0,
        }
    }

    pub fn operations(&self) -> &[Operation] {
        &self.content.operations
    }

    pub fn into_content(self) -> Content {
        if self.artifact_depth != 0 {
            log::warn!(
                "Content stream finished with {} unclosed artifact sections.",
                self.artifact_depth
            );
        }
        self.content
    }

    pub fn encode(self) -> Result<Vec<u8>, RenderError> {
        Ok(self.into_content().encode()?)
    }

    fn push(&mut self, operator: &str, operands: Vec<Object>) {
        self.content.operations.push(Operation::new(operator, operands));
    }

    fn set_stroke_color(&mut self, color: Color) {
        let [r, g, b] = color.to_unit_rgb();
        self.push("RG", vec![r.into(), g.into(), b.into()]);
    }

    fn stroke_line(&mut self, width: f32, x1: f32, y1: f32, x2: f32, y2: f32) {
        self.push("w", vec![width.into()]);
        self.push("m", vec![x1.into(), y1.into()]);
        self.push("l", vec![x2.into(), y2.into()]);
        self.push("S", vec![]);
    }
}

impl DrawingCanvas for PdfCanvas {
    fn draw_border(&mut self, border: &Border, x1: f32, y1: f32, x2: f32, y2: f32) {
        if border.width <= 0.0 {
            return;
        }
        let width = border.width;
        self.push("q", vec![]);
        self.set_stroke_color(border.color);
        match border.style {
            BorderStyle::Solid => self.stroke_line(width, x1, y1, x2, y2),
            BorderStyle::Dashed => {
                self.push(
                    "d",
                    vec![Object::Array(vec![(3.0 * width).into(), (3.0 * width).into()]), 0.into()],
                );
                self.stroke_line(width, x1, y1, x2, y2);
            }
            BorderStyle::Dotted => {
                self.push("J", vec![1.into()]);
                self.push(
                    "d",
                    vec![Object::Array(vec![0.into(), (2.0 * width).into()]), 0.into()],
                );
                self.stroke_line(width, x1, y1, x2, y2);
            }
            BorderStyle::Double => {
                // Two strokes of a third of the width each, on both sides of the centre line.
                let length = ((x2 - x1).powi(2) + (y2 - y1).powi(2)).sqrt();
                if length > 0.0 {
                    let nx = -(y2 - y1) / length * width / 3.0;
                    let ny = (x2 - x1) / length * width / 3.0;
                    let stroke = width / 3.0;
                    self.stroke_line(stroke, x1 + nx, y1 + ny, x2 + nx, y2 + ny);
                    self.stroke_line(stroke, x1 - nx, y1 - ny, x2 - nx, y2 - ny);
                }
            }
        }
        self.push("Q", vec![]);
    }

    fn draw_content(&mut self, rect: Rect, label: Option<&str>) {
        self.push("q", vec![]);
        self.push("g", vec![CONTENT_FILL.into()]);
        self.push(
            "re",
            vec![rect.x.into(), rect.y.into(), rect.width.into(), rect.height.into()],
        );
        self.push("f", vec![]);
        if let Some(label) = label.filter(|l| !l.trim().is_empty()) {
            self.push("g", vec![0.into()]);
            self.push("BT", vec![]);
            self.push("Tf", vec![LABEL_FONT.into(), LABEL_SIZE.into()]);
            let baseline = rect.top() - LABEL_SIZE;
            self.push("Td", vec![(rect.x + 1.0).into(), baseline.into()]);
            self.push(
                "Tj",
                vec![Object::String(label.as_bytes().to_vec(), StringFormat::Literal)],
            );
            self.push("ET", vec![]);
        }
        self.push("Q", vec![]);
    }

    fn open_artifact(&mut self) {
        self.artifact_depth += 1;
        self.push("BMC", vec![Object::Name(b"Artifact".to_vec())]);
    }

    fn close_artifact(&mut self) {
        if self.artifact_depth == 0 {
            log::warn!("Closing an artifact section that was never opened; ignoring it.");
            return;
        }
        self.artifact_depth -= 1;
        self.push("EMC", vec![]);
    }
}
