//! Page sizes and edge insets.
use crate::parsers::{self, StyleParseError};
use serde::{de, Deserialize, Deserializer};
use std::str::FromStr;

/// Insets from the four edges of a box, in points.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Margins {
    pub fn all(value: f32) -> Self {
        Self::symmetric(value, value)
    }

    pub fn symmetric(vertical: f32, horizontal: f32) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    /// Parses a shorthand of one, two or four lengths, e.g. `"10pt 2cm"`.
    pub fn parse(input: &str) -> Result<Self, StyleParseError> {
        parsers::parse_shorthand_margins(input)
    }
}

/// Accepts a single number, a shorthand string or a map with any subset of the sides.
impl<'de> Deserialize<'de> for Margins {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize, Default)]
        #[serde(default)]
        struct Sides {
            top: f32,
            right: f32,
            bottom: f32,
            left: f32,
        }

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum MarginsDef {
            Uniform(f32),
            Shorthand(String),
            Sides(Sides),
        }

        match MarginsDef::deserialize(deserializer)? {
            MarginsDef::Uniform(value) => Ok(Margins::all(value)),
            MarginsDef::Shorthand(s) => Margins::parse(&s).map_err(de::Error::custom),
            MarginsDef::Sides(s) => Ok(Margins {
                top: s.top,
                right: s.right,
                bottom: s.bottom,
                left: s.left,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PageSize {
    #[default]
    A4,
    Letter,
    Legal,
    Custom { width: f32, height: f32 },
}

impl PageSize {
    /// Width and height in points.
    pub fn dimensions_pt(&self) -> (f32, f32) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }
}

impl FromStr for PageSize {
    type Err = StyleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parsers::parse_page_size(s)
    }
}

impl<'de> Deserialize<'de> for PageSize {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum PageSizeDef {
            Named(String),
            Custom { width: f32, height: f32 },
        }

        match PageSizeDef::deserialize(deserializer)? {
            PageSizeDef::Named(name) => name.parse().map_err(de::Error::custom),
            PageSizeDef::Custom { width, height } => Ok(PageSize::Custom { width, height }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn margins_deserialize_from_string_number_and_map() {
        let m: Margins = serde_json::from_str("\"10pt 20pt\"").unwrap();
        assert_eq!((m.top, m.left), (10.0, 20.0));
        let m: Margins = serde_json::from_str("36").unwrap();
        assert_eq!(m, Margins::all(36.0));
        let m: Margins = serde_json::from_str(r#"{"top": 5, "extra": true}"#).unwrap();
        assert_eq!(m.top, 5.0);
        assert_eq!(m.vertical(), 5.0);
    }

    #[test]
    fn page_size_deserializes() {
        let p: PageSize = serde_json::from_str("\"Letter\"").unwrap();
        assert_eq!(p.dimensions_pt(), (612.0, 792.0));
        let p: PageSize = serde_json::from_str(r#"{"width": 300, "height": 200}"#).unwrap();
        assert_eq!(p, PageSize::Custom { width: 300.0, height: 200.0 });
        assert!(serde_json::from_str::<PageSize>("\"B5\"").is_err());
    }
}
