use crate::error::DocumentError;
use serde::{de, Deserialize, Deserializer};
use tabula_layout::LayoutConfig;
use tabula_style::parsers::parse_border_side;
use tabula_style::{Border, Margins, PageSize};
use tabula_types::Rect;

/// Page geometry and layout switches of a document.
///
/// Every field has a default, so `{}` is a valid configuration:
///
/// ```json
/// { "pageSize": "Letter", "margins": "36pt", "tableBorder": "0.5pt solid #808080" }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentConfig {
    pub page_size: PageSize,
    pub margins: Margins,
    pub float_tolerance: f32,
    pub allow_footer_omission: bool,
    /// Emit a structure tree and mark table borders as artifacts.
    pub tagged: bool,
    /// Border given to every side of tables that set none of their own.
    #[serde(deserialize_with = "border_shorthand")]
    pub table_border: Option<Border>,
}

/// Reads a border shorthand such as `"1pt dashed #333"`, or `"none"`.
fn border_shorthand<'de, D>(deserializer: D) -> Result<Option<Border>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    parse_border_side(&value).map_err(de::Error::custom)
}

impl Default for DocumentConfig {
    fn default() -> Self {
        let layout = LayoutConfig::default();
        Self {
            page_size: PageSize::A4,
            margins: Margins::all(36.0),
            float_tolerance: layout.float_tolerance,
            allow_footer_omission: layout.allow_footer_omission,
            tagged: false,
            table_border: None,
        }
    }
}

impl DocumentConfig {
    pub fn from_json(json: &str) -> Result<Self, DocumentError> {
        let config: DocumentConfig = serde_json::from_str(json)?;
        log::debug!("Loaded document configuration: {:?}", config);
        Ok(config)
    }

    pub fn layout_config(&self) -> LayoutConfig {
        LayoutConfig {
            float_tolerance: self.float_tolerance,
            allow_footer_omission: self.allow_footer_omission,
        }
    }

    pub fn page_dimensions(&self) -> (f32, f32) {
        self.page_size.dimensions_pt()
    }

    /// The part of a page inside the margins, in PDF coordinates.
    pub fn content_box(&self) -> Rect {
        let (width, height) = self.page_dimensions();
        let mut rect = Rect::new(0.0, 0.0, width, height);
        let m = &self.margins;
        rect.apply_margins(m.top, m.right, m.bottom, m.left, false);
        rect
    }
}
