use tabula_style::{Borders, Margins, VerticalAlignment};

/// Absolute placement of a renderer, relative to the area it is laid out in.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    /// Page the renderer is pinned to. Pinned renderers are laid out outside the
    /// normal page flow.
    pub page_number: Option<usize>,
}

/// Per-renderer typed property bag.
///
/// `borders` holds the *current* per-side borders. Table layout writes collapsed
/// borders back into it, so it can drift from the model's borders.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Properties {
    pub borders: Borders,
    pub vertical_alignment: Option<VerticalAlignment>,
    pub keep_together: bool,
    pub forced_placement: bool,
    pub position: Option<Position>,
    pub margins: Margins,
    pub width: Option<f32>,
}
