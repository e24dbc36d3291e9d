pub mod fixtures;

use lopdf::Document as LopdfDocument;
use lopdf::content::Content;
use tabula::{DocumentConfig, DocumentRenderer, Table};

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Wrapper around a generated PDF with helper methods
pub struct GeneratedPdf {
    pub bytes: Vec<u8>,
    pub doc: LopdfDocument,
}

impl GeneratedPdf {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, Box<dyn std::error::Error>> {
        let doc = LopdfDocument::load_mem(&bytes)?;
        Ok(Self { bytes, doc })
    }

    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// Decoded content stream of the 1-based page `number`.
    pub fn page_content(&self, number: u32) -> Result<Content, Box<dyn std::error::Error>> {
        let page_id = *self
            .doc
            .get_pages()
            .get(&number)
            .ok_or_else(|| format!("page {number} does not exist"))?;
        let bytes = self.doc.get_page_content(page_id)?;
        Ok(Content::decode(&bytes)?)
    }

    /// The strings shown with `Tj` on page `number`, in drawing order.
    pub fn labels(&self, number: u32) -> Result<Vec<String>, Box<dyn std::error::Error>> {
        let content = self.page_content(number)?;
        Ok(content
            .operations
            .iter()
            .filter(|op| op.operator == "Tj")
            .filter_map(|op| op.operands.first())
            .filter_map(|operand| operand.as_str().ok())
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            .collect())
    }

    pub fn count_operator(&self, number: u32, operator: &str) -> Result<usize, Box<dyn std::error::Error>> {
        let content = self.page_content(number)?;
        Ok(content
            .operations
            .iter()
            .filter(|op| op.operator == operator)
            .count())
    }
}

/// Lays out `tables` one after another and reads the written PDF back.
pub fn render_tables(
    config: DocumentConfig,
    tables: Vec<Table>,
) -> Result<(DocumentRenderer, GeneratedPdf), Box<dyn std::error::Error>> {
    let mut document = DocumentRenderer::new(config);
    for table in tables {
        document.add_table(table)?;
    }
    let bytes = document.to_bytes()?;
    Ok((document, GeneratedPdf::from_bytes(bytes)?))
}
