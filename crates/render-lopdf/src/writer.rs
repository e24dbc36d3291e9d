use crate::error::RenderError;
use crate::LABEL_FONT;
use lopdf::{dictionary, Document, Object, ObjectId, Stream};
use std::io::Write;
use tabula_layout::TagTree;

/// Builds an in-memory PDF document page by page and writes it out at the end.
pub struct PdfWriter {
    document: Document,
    pages_id: ObjectId,
    resources_id: ObjectId,
    page_ids: Vec<ObjectId>,
    struct_tree_root: Option<ObjectId>,
}

impl Default for PdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfWriter {
    pub fn new() -> Self {
        let mut document = Document::with_version("1.7");
        let pages_id = document.new_object_id();
        let font_id = document.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = document.add_object(dictionary! {
            "Font" => dictionary! { LABEL_FONT => font_id },
        });
        Self {
            document,
            pages_id,
            resources_id,
            page_ids: Vec::new(),
            struct_tree_root: None,
        }
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Adds a page with one content stream and returns the page's object id.
    pub fn add_page(&mut self, width: f32, height: f32, content: Vec<u8>) -> ObjectId {
        let content_id = self
            .document
            .add_object(Stream::new(dictionary! {}, content));
        let page_id = self.document.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
            "Contents" => content_id,
            "Resources" => self.resources_id,
        });
        self.page_ids.push(page_id);
        log::debug!("Wrote page {} ({}x{} pt).", self.page_ids.len(), width, height);
        page_id
    }

    /// Writes the logical structure of the document as a structure tree.
    ///
    /// Only the element hierarchy is recorded; content is not linked to it with
    /// marked-content identifiers.
    pub fn set_structure(&mut self, tree: &TagTree) {
        let root_id = self.document.new_object_id();
        let kids = self.write_struct_kids(tree, tree.root(), root_id);
        self.document.objects.insert(
            root_id,
            Object::Dictionary(dictionary! {
                "Type" => "StructTreeRoot",
                "K" => kids,
            }),
        );
        self.struct_tree_root = Some(root_id);
    }

    fn write_struct_element(&mut self, tree: &TagTree, index: usize, parent: ObjectId) -> Option<ObjectId> {
        let node = tree.node(index)?;
        let role = node.role.as_str();
        let id = self.document.new_object_id();
        let kids = self.write_struct_kids(tree, index, id);
        self.document.objects.insert(
            id,
            Object::Dictionary(dictionary! {
                "Type" => "StructElem",
                "S" => Object::Name(role.as_bytes().to_vec()),
                "P" => parent,
                "K" => kids,
            }),
        );
        Some(id)
    }

    fn write_struct_kids(&mut self, tree: &TagTree, index: usize, id: ObjectId) -> Vec<Object> {
        let kids = tree.node(index).map(|n| n.kids.clone()).unwrap_or_default();
        kids.into_iter()
            .filter_map(|kid| self.write_struct_element(tree, kid, id))
            .map(Object::Reference)
            .collect()
    }

    /// Completes the page tree and catalog and serialises the document.
    pub fn finish<W: Write>(mut self, writer: &mut W) -> Result<(), RenderError> {
        if self.page_ids.is_empty() {
            return Err(RenderError::Other("A PDF document needs at least one page".into()));
        }
        let kids: Vec<Object> = self.page_ids.iter().map(|id| Object::from(*id)).collect();
        let count = self.page_ids.len() as i64;
        self.document.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => kids,
                "Count" => count,
            }),
        );

        let mut catalog = dictionary! { "Type" => "Catalog", "Pages" => self.pages_id };
        if let Some(root) = self.struct_tree_root {
            catalog.set("StructTreeRoot", root);
            catalog.set("MarkInfo", dictionary! { "Marked" => true });
        }
        let catalog_id = self.document.add_object(catalog);
        self.document.trailer.set("Root", catalog_id);

        self.document.save_to(writer)?;
        Ok(())
    }

    pub fn into_bytes(self) -> Result<Vec<u8>, RenderError> {
        let mut buffer = Vec::new();
        self.finish(&mut buffer)?;
        Ok(buffer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabula_layout::{TagRole, TagTreePointer};

    #[test]
    fn writes_a_readable_document() {
        let mut writer = PdfWriter::new();
        writer.add_page(200.0, 100.0, b"0 0 m 10 10 l S".to_vec());
        writer.add_page(200.0, 100.0, Vec::new());
        let bytes = writer.into_bytes().unwrap();
        let document = Document::load_mem(&bytes).unwrap();
        assert_eq!(document.get_pages().len(), 2);
    }

    #[test]
    fn empty_document_is_rejected() {
        assert!(matches!(
            PdfWriter::new().into_bytes(),
            Err(RenderError::Other(_))
        ));
    }

    #[test]
    fn structure_tree_is_linked_from_the_catalog() {
        let mut tree = TagTree::new();
        tree.add_tag(TagRole::Table);
        tree.add_tag(TagRole::Tr);
        tree.add_tag(TagRole::Td);

        let mut writer = PdfWriter::new();
        writer.add_page(100.0, 100.0, Vec::new());
        writer.set_structure(&tree);
        let document = Document::load_mem(&writer.into_bytes().unwrap()).unwrap();
        let catalog = document.catalog().unwrap();
        let root = catalog.get(b"StructTreeRoot").unwrap().as_reference().unwrap();
        let root = document.get_dictionary(root).unwrap();
        let kids = root.get(b"K").unwrap().as_array().unwrap();
        assert_eq!(kids.len(), 1);
    }
}
