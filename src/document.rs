use crate::config::DocumentConfig;
use crate::error::DocumentError;
use std::io::Write;
use std::sync::Arc;
use tabula_layout::{
    Borders, DrawContext, LayoutArea, LayoutConfig, LayoutContext, LayoutError, LayoutResult,
    LayoutStatus, RenderNode, Renderer, Table, TableRenderer, TagTree,
};
use tabula_render_lopdf::{PdfCanvas, PdfWriter};
use tabula_types::Rect;

/// The renderers placed on one page, in drawing order.
#[derive(Debug, Clone)]
pub struct Page {
    number: usize,
    nodes: Vec<RenderNode>,
}

impl Page {
    fn new(number: usize) -> Self {
        Self {
            number,
            nodes: Vec::new(),
        }
    }

    /// One-based page number.
    pub fn number(&self) -> usize {
        self.number
    }

    pub fn nodes(&self) -> &[RenderNode] {
        &self.nodes
    }
}

/// Lays renderers out page after page and writes the result as a PDF.
///
/// Renderers added one after the other stack vertically inside the page margins.
/// A renderer that only partly fits leaves its split fragment on the current page
/// and continues with its overflow fragment on the next one.
#[derive(Debug)]
pub struct DocumentRenderer {
    config: DocumentConfig,
    layout_config: LayoutConfig,
    pages: Vec<Page>,
    /// Index into `pages` of the page the flow is on.
    flow_page: usize,
    /// Space left on the flow page.
    remaining: Rect,
    /// Nothing has been placed on the flow page yet.
    fresh: bool,
}

impl DocumentRenderer {
    pub fn new(config: DocumentConfig) -> Self {
        let layout_config = config.layout_config();
        let remaining = config.content_box();
        Self {
            config,
            layout_config,
            pages: vec![Page::new(1)],
            flow_page: 0,
            remaining,
            fresh: true,
        }
    }

    pub fn config(&self) -> &DocumentConfig {
        &self.config
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Adds `table` to the document, giving it the configured table border when it
    /// has no border of its own.
    pub fn add_table(&mut self, mut table: Table) -> Result<(), DocumentError> {
        if let Some(border) = self.config.table_border {
            if *table.borders() == Borders::none() {
                table = table.with_borders(Borders::all(border));
            }
        }
        self.add(TableRenderer::new(Arc::new(table)))
    }

    /// Lays `node` out in the page flow, or on its pinned page when its position names one.
    pub fn add(&mut self, node: impl Into<RenderNode>) -> Result<(), DocumentError> {
        let node = node.into();
        match node.properties().position.and_then(|p| p.page_number) {
            Some(page_number) => self.add_pinned(node, page_number),
            None => self.add_to_flow(node),
        }
    }

    fn add_to_flow(&mut self, mut current: RenderNode) -> Result<(), DocumentError> {
        let mut forced = false;
        loop {
            let area = LayoutArea::new(self.flow_page + 1, self.remaining);
            let result = {
                let ctx = LayoutContext::new(area, &self.layout_config).with_forced_placement(forced);
                current.layout(&ctx)?
            };

            let status = result.status;
            match status {
                LayoutStatus::Full => {
                    self.place_in_flow(current);
                    return Ok(());
                }
                LayoutStatus::Partial => {
                    let (split, overflow) = split_pair(result)?;
                    log::debug!(
                        "{:?} split on page {}; continuing on the next page.",
                        split.kind(),
                        area.page_number
                    );
                    self.place_in_flow(split);
                    self.next_page();
                    current = overflow;
                    forced = false;
                }
                LayoutStatus::Nothing => {
                    let cause = result.cause_of_nothing;
                    if let Some(overflow) = result.overflow {
                        current = overflow;
                    }
                    if !self.fresh {
                        self.next_page();
                        continue;
                    }
                    if forced {
                        return Err(match cause {
                            Some(cause) => DocumentError::Unplaceable(cause),
                            None => LayoutError::Generic(
                                "Forced layout produced nothing without a cause".into(),
                            )
                            .into(),
                        });
                    }
                    log::warn!(
                        "{:?} does not fit on an empty page {} (cause: {:?}); forcing placement.",
                        current.kind(),
                        area.page_number,
                        cause
                    );
                    forced = true;
                }
            }
        }
    }

    /// Pinned renderers are laid out in the full content box of their page and do
    /// not move the flow.
    fn add_pinned(&mut self, mut node: RenderNode, page_number: usize) -> Result<(), DocumentError> {
        let page_number = page_number.max(1);
        self.ensure_page(page_number - 1);
        let area = LayoutArea::new(page_number, self.config.content_box());
        let result = {
            let ctx = LayoutContext::new(area, &self.layout_config).with_forced_placement(true);
            node.layout(&ctx)?
        };

        let status = result.status;
        let placed = match status {
            LayoutStatus::Full => node,
            LayoutStatus::Partial => {
                let (split, _) = split_pair(result)?;
                log::warn!(
                    "{:?} pinned to page {} does not fit; dropping its overflow.",
                    split.kind(),
                    page_number
                );
                split
            }
            LayoutStatus::Nothing => {
                return Err(match result.cause_of_nothing {
                    Some(cause) => DocumentError::Unplaceable(cause),
                    None => LayoutError::Generic(format!(
                        "Nothing of a renderer pinned to page {page_number} could be placed"
                    ))
                    .into(),
                });
            }
        };
        self.pages[page_number - 1].nodes.push(placed);
        Ok(())
    }

    fn place_in_flow(&mut self, node: RenderNode) {
        if let Some(occupied) = node.occupied_area() {
            let used = (self.remaining.top() - occupied.bbox.y)
                .min(self.remaining.height)
                .max(0.0);
            self.remaining.decrease_height(used);
        }
        self.fresh = false;
        self.pages[self.flow_page].nodes.push(node);
    }

    fn next_page(&mut self) {
        self.flow_page += 1;
        self.ensure_page(self.flow_page);
        self.remaining = self.config.content_box();
        self.fresh = true;
    }

    fn ensure_page(&mut self, index: usize) {
        while self.pages.len() <= index {
            let number = self.pages.len() + 1;
            self.pages.push(Page::new(number));
        }
    }

    /// Draws every page onto its own content stream and serialises the document.
    pub fn write_pdf<W: Write>(&self, writer: &mut W) -> Result<(), DocumentError> {
        let (width, height) = self.config.page_dimensions();
        let mut pdf = PdfWriter::new();
        let mut tags = TagTree::new();

        for page in &self.pages {
            let mut canvas = PdfCanvas::new();
            {
                let mut ctx = if self.config.tagged {
                    DrawContext::tagged(&mut canvas, &mut tags)
                } else {
                    DrawContext::new(&mut canvas)
                };
                for node in &page.nodes {
                    node.draw(&mut ctx);
                }
            }
            pdf.add_page(width, height, canvas.encode()?);
        }

        if self.config.tagged {
            pdf.set_structure(&tags);
        }
        log::info!("Writing document with {} pages.", pdf.page_count());
        pdf.finish(writer)?;
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, DocumentError> {
        let mut buffer = Vec::new();
        self.write_pdf(&mut buffer)?;
        Ok(buffer)
    }
}

fn split_pair(result: LayoutResult) -> Result<(RenderNode, RenderNode), DocumentError> {
    match (result.split, result.overflow) {
        (Some(split), Some(overflow)) => Ok((split, overflow)),
        _ => Err(LayoutError::Generic("Partial result without split and overflow".into()).into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_layout::{Border, Cell, Color, Margins, Position, Side};
    use tabula_style::PageSize;

    fn page_config() -> DocumentConfig {
        DocumentConfig {
            page_size: PageSize::Custom {
                width: 200.0,
                height: 100.0,
            },
            margins: Margins::all(0.0),
            ..Default::default()
        }
    }

    fn table(rows: usize, block: f32) -> Table {
        let mut table = Table::with_equal_columns(2).unwrap();
        for _ in 0..rows * 2 {
            table
                .add_cell(
                    Cell::new()
                        .with_borders(Borders::all(Border::solid(1.0, Color::BLACK)))
                        .with_padding(Margins::all(0.0))
                        .with_block(block),
                )
                .unwrap();
        }
        table
    }

    fn row_range(node: &RenderNode) -> std::ops::Range<usize> {
        node.as_table().unwrap().row_range()
    }

    #[test]
    fn partial_table_continues_on_the_next_page() {
        let _ = env_logger::builder().is_test(true).try_init();
        let mut document = DocumentRenderer::new(page_config());
        document.add_table(table(5, 19.0)).unwrap();

        assert_eq!(document.page_count(), 2);
        assert_eq!(row_range(&document.pages()[0].nodes()[0]), 0..4);
        assert_eq!(row_range(&document.pages()[1].nodes()[0]), 4..5);
    }

    #[test]
    fn tables_stack_and_move_on_when_full() {
        let mut document = DocumentRenderer::new(page_config());
        document.add_table(table(2, 19.0)).unwrap();
        document.add_table(table(2, 19.0)).unwrap();
        document.add_table(table(2, 19.0)).unwrap();

        assert_eq!(document.page_count(), 2);
        let first = document.pages()[0].nodes();
        assert_eq!(first.len(), 2);
        let second_top = first[1].occupied_area().unwrap().bbox.top();
        assert!((second_top - 59.0).abs() < 1e-3, "got {second_top}");
        assert_eq!(document.pages()[1].nodes().len(), 1);
    }

    #[test]
    fn oversized_row_is_forced_onto_an_empty_page() {
        let mut document = DocumentRenderer::new(page_config());
        document.add_table(table(1, 150.0)).unwrap();
        assert_eq!(document.page_count(), 1);
        assert_eq!(document.pages()[0].nodes().len(), 1);
    }

    #[test]
    fn pinned_table_does_not_move_the_flow() {
        let mut document = DocumentRenderer::new(page_config());
        let pinned = table(1, 19.0).with_position(Position {
            x: 0.0,
            y: 0.0,
            page_number: Some(3),
        });
        document.add_table(pinned).unwrap();
        document.add_table(table(1, 19.0)).unwrap();

        assert_eq!(document.page_count(), 3);
        assert_eq!(document.pages()[0].nodes().len(), 1);
        assert!(document.pages()[1].nodes().is_empty());
        assert_eq!(document.pages()[2].nodes().len(), 1);
        assert_eq!(document.pages()[2].number(), 3);
    }

    #[test]
    fn configured_border_goes_to_tables_without_borders() {
        let border = Border::solid(2.0, Color::BLACK);
        let config = DocumentConfig {
            table_border: Some(border),
            ..page_config()
        };
        let mut document = DocumentRenderer::new(config);
        document.add_table(table(1, 10.0)).unwrap();
        let own = Border::solid(0.5, Color::BLACK);
        document
            .add_table(table(1, 10.0).with_border(Side::Top, Some(own)))
            .unwrap();

        let nodes = document.pages()[0].nodes();
        let first = nodes[0].as_table().unwrap().model().borders();
        assert_eq!(*first, Borders::all(border));
        let second = nodes[1].as_table().unwrap().model().borders();
        assert_eq!(second.top, Some(own));
        assert_eq!(second.bottom, None);
    }

    #[test]
    fn empty_document_writes_one_blank_page() {
        let document = DocumentRenderer::new(page_config());
        let bytes = document.to_bytes().unwrap();
        let pdf = lopdf::Document::load_mem(&bytes).unwrap();
        assert_eq!(pdf.get_pages().len(), 1);
    }
}
