use hashlink::LinkedHashMap;

/// One entry in the declared layout.
///
/// Names are unique within a parent; the tree is a plain literal description
/// with no cycles and owns no resources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StructureNode {
    /// A named container holding further nodes, in declaration order.
    Directory {
        children: LinkedHashMap<String, StructureNode>,
    },
    /// A directory whose immediate contents are a flat list of empty files.
    FileGroup { names: Vec<String> },
    /// A leaf with no content.
    EmptyFile,
}

impl StructureNode {
    pub fn empty_directory() -> Self {
        StructureNode::Directory {
            children: LinkedHashMap::new(),
        }
    }

    /// Number of filesystem entries this node expands to, itself included.
    pub fn entry_count(&self) -> usize {
        match self {
            StructureNode::Directory { children } => {
                1 + children.values().map(Self::entry_count).sum::<usize>()
            }
            StructureNode::FileGroup { names } => 1 + names.len(),
            StructureNode::EmptyFile => 1,
        }
    }
}
