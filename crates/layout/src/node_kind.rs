/// Represents the specific type of a renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Leaf,
    Cell,
    Table,
}

impl NodeKind {
    /// Returns a string representation, primarily for debugging or error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeKind::Leaf => "Leaf",
            NodeKind::Cell => "Cell",
            NodeKind::Table => "Table",
        }
    }
}
