//! Border descriptors and the collapse rule shared by cells and tables.

use crate::parsers::{self, StyleParseError};
use serde::{Deserialize, Serialize};
use std::ops::{Index, IndexMut};
use std::str::FromStr;
use tabula_types::Color;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "camelCase")]
pub enum BorderStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
    Double,
}

/// A stroked line descriptor. An absent border is modelled as `Option::None`.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Border {
    pub width: f32,
    #[serde(default)]
    pub style: BorderStyle,
    #[serde(default)]
    pub color: Color,
}

impl Border {
    pub fn new(width: f32, style: BorderStyle, color: Color) -> Self {
        Self {
            width,
            style,
            color,
        }
    }

    pub fn solid(width: f32, color: Color) -> Self {
        Self::new(width, BorderStyle::Solid, color)
    }
}

impl FromStr for Border {
    type Err = StyleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parsers::run_parser(parsers::parse_border, s)
    }
}

/// Width of an optional border, zero when absent.
pub fn width_of(border: Option<&Border>) -> f32 {
    border.map_or(0.0, |b| b.width)
}

/// Resolves a cell edge lying on the table boundary against the table's border.
///
/// The table border replaces the cell border only when it is strictly wider, so equal
/// widths keep the cell's border. An absent border never wins against a present one.
pub fn collapse(cell: Option<Border>, table: Option<Border>) -> Option<Border> {
    match (cell, table) {
        (Some(c), Some(t)) if t.width > c.width => Some(t),
        (Some(c), _) => Some(c),
        (None, t) => t,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];
}

/// One optional border per side.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Default)]
pub struct Borders {
    #[serde(default)]
    pub top: Option<Border>,
    #[serde(default)]
    pub right: Option<Border>,
    #[serde(default)]
    pub bottom: Option<Border>,
    #[serde(default)]
    pub left: Option<Border>,
}

impl Borders {
    pub fn all(border: Border) -> Self {
        Self {
            top: Some(border),
            right: Some(border),
            bottom: Some(border),
            left: Some(border),
        }
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn width(&self, side: Side) -> f32 {
        width_of(self[side].as_ref())
    }

    pub fn with(mut self, side: Side, border: Option<Border>) -> Self {
        self[side] = border;
        self
    }
}

impl Index<Side> for Borders {
    type Output = Option<Border>;

    fn index(&self, side: Side) -> &Self::Output {
        match side {
            Side::Top => &self.top,
            Side::Right => &self.right,
            Side::Bottom => &self.bottom,
            Side::Left => &self.left,
        }
    }
}

impl IndexMut<Side> for Borders {
    fn index_mut(&mut self, side: Side) -> &mut Self::Output {
        match side {
            Side::Top => &mut self.top,
            Side::Right => &mut self.right,
            Side::Bottom => &mut self.bottom,
            Side::Left => &mut self.left,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn b(width: f32) -> Border {
        Border::solid(width, Color::BLACK)
    }

    #[test]
    fn wider_table_border_wins() {
        assert_eq!(collapse(Some(b(1.0)), Some(b(2.0))), Some(b(2.0)));
    }

    #[test]
    fn equal_widths_keep_cell_border() {
        let cell = Border::solid(1.0, Color::rgb(255, 0, 0));
        assert_eq!(collapse(Some(cell), Some(b(1.0))), Some(cell));
    }

    #[test]
    fn absent_never_wins() {
        assert_eq!(collapse(None, Some(b(0.5))), Some(b(0.5)));
        assert_eq!(collapse(Some(b(0.5)), None), Some(b(0.5)));
        assert_eq!(collapse(None, None), None);
    }

    #[test]
    fn border_from_shorthand() {
        let border: Border = "1.5pt DOUBLE #ff0000".parse().unwrap();
        assert_eq!(border, Border::new(1.5, BorderStyle::Double, Color::rgb(255, 0, 0)));
        assert!("1pt groove".parse::<Border>().is_err());
    }

    #[test]
    fn borders_index_by_side() {
        let borders = Borders::all(b(1.0)).with(Side::Left, None);
        assert_eq!(borders.width(Side::Top), 1.0);
        assert_eq!(borders.width(Side::Left), 0.0);
    }

    #[test]
    fn border_deserializes_with_defaults() {
        let border: Border = serde_json::from_str(r##"{"width": 2, "color": "#ff0000"}"##).unwrap();
        assert_eq!(border, Border::solid(2.0, Color::rgb(255, 0, 0)));
    }
}
