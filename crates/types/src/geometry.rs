//! Page-space geometry.
//!
//! Coordinates follow PDF user space: the origin is the bottom-left corner of the
//! page and `y` grows upwards. A `Rect` is anchored at its bottom-left corner.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn move_down(&mut self, dy: f32) -> &mut Self {
        self.y -= dy;
        self
    }

    pub fn move_up(&mut self, dy: f32) -> &mut Self {
        self.y += dy;
        self
    }

    pub fn move_right(&mut self, dx: f32) -> &mut Self {
        self.x += dx;
        self
    }

    pub fn translate(&mut self, dx: f32, dy: f32) -> &mut Self {
        self.x += dx;
        self.y += dy;
        self
    }

    pub fn increase_height(&mut self, dh: f32) -> &mut Self {
        self.height += dh;
        self
    }

    pub fn decrease_height(&mut self, dh: f32) -> &mut Self {
        self.height -= dh;
        self
    }

    pub fn set_height(&mut self, height: f32) -> &mut Self {
        self.height = height;
        self
    }

    pub fn set_width(&mut self, width: f32) -> &mut Self {
        self.width = width;
        self
    }

    /// Shrinks the rectangle by the given edge insets, or grows it when `reverse` is set.
    ///
    /// The top edge moves down by `top`, the bottom edge moves up by `bottom`, and so on.
    pub fn apply_margins(
        &mut self,
        top: f32,
        right: f32,
        bottom: f32,
        left: f32,
        reverse: bool,
    ) -> &mut Self {
        let sign = if reverse { -1.0 } else { 1.0 };
        self.x += sign * left;
        self.width -= sign * (left + right);
        self.y += sign * bottom;
        self.height -= sign * (top + bottom);
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn zero() -> Self {
        Self {
            width: 0.0,
            height: 0.0,
        }
    }
}

/// A rectangle on a specific page. Page numbers start at 1.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LayoutArea {
    pub page_number: usize,
    pub bbox: Rect,
}

impl LayoutArea {
    pub fn new(page_number: usize, bbox: Rect) -> Self {
        Self { page_number, bbox }
    }
}
