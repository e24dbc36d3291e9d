use crate::parsers::StyleParseError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Where a cell's content sits when the row is taller than the content.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "camelCase")]
pub enum VerticalAlignment {
    #[default]
    Top,
    Middle,
    Bottom,
}

impl VerticalAlignment {
    /// Fraction of the free space placed above the content.
    pub fn offset_factor(self) -> f32 {
        match self {
            VerticalAlignment::Top => 0.0,
            VerticalAlignment::Middle => 0.5,
            VerticalAlignment::Bottom => 1.0,
        }
    }
}

impl FromStr for VerticalAlignment {
    type Err = StyleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "top" => Ok(VerticalAlignment::Top),
            "middle" | "center" => Ok(VerticalAlignment::Middle),
            "bottom" => Ok(VerticalAlignment::Bottom),
            _ => Err(StyleParseError::InvalidValue {
                property: "vertical-align".to_string(),
                value: s.to_string(),
            }),
        }
    }
}
