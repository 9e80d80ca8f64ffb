use std::collections::BTreeMap;

use smol_str::SmolStr;

use super::kind::SymbolKind;
use super::reference::Reference;
use crate::base::{FileId, TextRange};

/// Index of a node in the symbol table arena.
/// Uses u32 for compact storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// The key-less project scope; always present.
    pub const ROOT: NodeId = NodeId(0);

    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    /// Get the index into the arena
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Semantic payload of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SymbolInfo {
    pub kind: SymbolKind,
    /// File that declared the symbol; `None` for the root and for nodes
    /// not tied to source text.
    pub file_origin: Option<FileId>,
    /// Translation unit whose Build created the node
    pub translation_unit: Option<FileId>,
    /// Byte range of the declaring name in `file_origin`
    pub anchor: Option<TextRange>,
    /// Index into the parent's `local_references` of the declared type
    pub declared_type: Option<usize>,
    pub is_port: bool,
    /// References made from this scope
    pub local_references: Vec<Reference>,
    /// Package imports made in this scope
    pub imports: Vec<Reference>,
}

impl SymbolInfo {
    pub fn new(kind: SymbolKind) -> Self {
        Self {
            kind,
            file_origin: None,
            translation_unit: None,
            anchor: None,
            declared_type: None,
            is_port: false,
            local_references: Vec::new(),
            imports: Vec::new(),
        }
    }

    pub fn with_declared_type(mut self, declared_type: Option<usize>) -> Self {
        self.declared_type = declared_type;
        self
    }

    pub fn with_port(mut self, is_port: bool) -> Self {
        self.is_port = is_port;
        self
    }
}

/// A node of the symbol tree.
#[derive(Debug, Clone)]
pub struct SymbolNode {
    pub(super) key: Option<SmolStr>,
    pub(super) parent: Option<NodeId>,
    /// Sorted by key, so traversal order is stable
    pub(super) children: BTreeMap<SmolStr, NodeId>,
    pub info: SymbolInfo,
}

impl SymbolNode {
    pub(super) fn new(key: Option<SmolStr>, parent: Option<NodeId>, info: SymbolInfo) -> Self {
        Self {
            key,
            parent,
            children: BTreeMap::new(),
            info,
        }
    }

    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> impl Iterator<Item = (&str, NodeId)> {
        self.children.iter().map(|(key, id)| (key.as_str(), *id))
    }

    pub fn kind(&self) -> SymbolKind {
        self.info.kind
    }
}
