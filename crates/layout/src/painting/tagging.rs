use crate::model::ElementId;
use std::collections::HashMap;
use std::fmt::Write as _;

/// Structure roles emitted for tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagRole {
    Document,
    Table,
    THead,
    TBody,
    TFoot,
    Tr,
    Td,
}

impl TagRole {
    /// The PDF structure type name.
    pub fn as_str(&self) -> &'static str {
        match self {
            TagRole::Document => "Document",
            TagRole::Table => "Table",
            TagRole::THead => "THead",
            TagRole::TBody => "TBody",
            TagRole::TFoot => "TFoot",
            TagRole::Tr => "TR",
            TagRole::Td => "TD",
        }
    }
}

/// A cursor into a structure tree.
///
/// Tables that are split across pages keep contributing to the same tags, so
/// elements can be connected to the tag they created and find it again later.
pub trait TagTreePointer {
    /// Appends a new kid with `role` to the current tag and moves into it.
    fn add_tag(&mut self, role: TagRole);

    /// Moves to the tag connected to `element`, creating and connecting it first
    /// if no such tag exists.
    fn add_tag_for(&mut self, element: ElementId, role: TagRole);

    fn move_to_kid(&mut self, index: usize);

    fn move_to_parent(&mut self);

    fn kid_roles(&self) -> Vec<TagRole>;

    /// Forgets the tag connected to `element`. Later fragments get a fresh tag.
    fn remove_element_connection(&mut self, element: ElementId);
}

#[derive(Debug, Clone)]
pub struct TagNode {
    pub role: TagRole,
    pub parent: Option<usize>,
    pub kids: Vec<usize>,
}

/// An in-memory structure tree rooted at a `Document` tag.
#[derive(Debug, Clone)]
pub struct TagTree {
    nodes: Vec<TagNode>,
    current: usize,
    connections: HashMap<ElementId, usize>,
}

impl Default for TagTree {
    fn default() -> Self {
        Self::new()
    }
}

impl TagTree {
    pub fn new() -> Self {
        Self {
            nodes: vec![TagNode {
                role: TagRole::Document,
                parent: None,
                kids: Vec::new(),
            }],
            current: 0,
            connections: HashMap::new(),
        }
    }

    pub fn root(&self) -> usize {
        0
    }

    pub fn node(&self, index: usize) -> Option<&TagNode> {
        self.nodes.get(index)
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    fn push_kid(&mut self, role: TagRole) -> usize {
        let index = self.nodes.len();
        self.nodes.push(TagNode {
            role,
            parent: Some(self.current),
            kids: Vec::new(),
        });
        self.nodes[self.current].kids.push(index);
        index
    }

    /// Renders the tree as nested roles, e.g. `Document(Table(TR(TD,TD)))`.
    pub fn outline(&self) -> String {
        let mut out = String::new();
        self.write_outline(self.root(), &mut out);
        out
    }

    fn write_outline(&self, index: usize, out: &mut String) {
        let node = &self.nodes[index];
        let _ = write!(out, "{}", node.role.as_str());
        if node.kids.is_empty() {
            return;
        }
        out.push('(');
        for (i, kid) in node.kids.iter().enumerate() {
            if i > 0 {
                out.push(',');
            }
            self.write_outline(*kid, out);
        }
        out.push(')');
    }
}

impl TagTreePointer for TagTree {
    fn add_tag(&mut self, role: TagRole) {
        self.current = self.push_kid(role);
    }

    fn add_tag_for(&mut self, element: ElementId, role: TagRole) {
        if let Some(&index) = self.connections.get(&element) {
            self.current = index;
            return;
        }
        let index = self.push_kid(role);
        self.connections.insert(element, index);
        self.current = index;
    }

    fn move_to_kid(&mut self, index: usize) {
        match self.nodes[self.current].kids.get(index) {
            Some(&kid) => self.current = kid,
            None => log::warn!(
                "Tag {} has no kid at index {}; staying put.",
                self.nodes[self.current].role.as_str(),
                index
            ),
        }
    }

    fn move_to_parent(&mut self) {
        if let Some(parent) = self.nodes[self.current].parent {
            self.current = parent;
        }
    }

    fn kid_roles(&self) -> Vec<TagRole> {
        self.nodes[self.current]
            .kids
            .iter()
            .map(|&kid| self.nodes[kid].role)
            .collect()
    }

    fn remove_element_connection(&mut self, element: ElementId) {
        self.connections.remove(&element);
    }
}
