use smol_str::SmolStr;

use super::kind::SymbolKind;
use super::reference::Reference;
use super::symbol::{NodeId, SymbolInfo, SymbolNode};

/// Default limit on `` `include `` nesting.
pub const DEFAULT_MAX_INCLUDE_DEPTH: usize = 32;

/// Scoped tree of declarations for one project snapshot.
///
/// Nodes live in an arena owned by the table and refer to each other by
/// [`NodeId`]; creation order is the order Build visited the declarations.
#[derive(Debug, Clone)]
pub struct SymbolTable {
    /// Arena storage for all nodes; index 0 is the root
    pub(crate) nodes: Vec<SymbolNode>,
    anonymous_blocks: usize,
    pub(crate) max_include_depth: usize,
}

impl Default for SymbolTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolTable {
    pub fn new() -> Self {
        Self {
            nodes: vec![SymbolNode::new(None, None, SymbolInfo::new(SymbolKind::Root))],
            anonymous_blocks: 0,
            max_include_depth: DEFAULT_MAX_INCLUDE_DEPTH,
        }
    }

    /// Limit `` `include `` nesting during Build.
    pub fn with_max_include_depth(mut self, depth: usize) -> Self {
        self.max_include_depth = depth;
        self
    }

    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    pub fn node(&self, id: NodeId) -> Option<&SymbolNode> {
        self.nodes.get(id.index())
    }

    pub fn info(&self, id: NodeId) -> Option<&SymbolInfo> {
        self.node(id).map(|node| &node.info)
    }

    pub fn key(&self, id: NodeId) -> Option<&str> {
        self.node(id).and_then(|node| node.key())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|node| node.parent)
    }

    /// Children of `id` in key order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = (&str, NodeId)> {
        self.node(id).into_iter().flat_map(|node| node.children())
    }

    pub fn child(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.node(id).and_then(|node| node.children.get(name).copied())
    }

    /// Number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when only the root exists.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Pre-order traversal from the root, children in key order.
    pub fn iter_depth_first(&self) -> DepthFirst<'_> {
        DepthFirst {
            table: self,
            stack: vec![NodeId::ROOT],
        }
    }

    /// Every recorded reference (imports included) with its scope, in arena
    /// order.
    pub fn references(&self) -> impl Iterator<Item = (NodeId, &Reference)> {
        self.nodes.iter().enumerate().flat_map(|(index, node)| {
            let scope = NodeId::new(index);
            node.info
                .imports
                .iter()
                .chain(node.info.local_references.iter())
                .map(move |reference| (scope, reference))
        })
    }

    /// `$root::a::b` style name for messages.
    pub fn path(&self, id: NodeId) -> String {
        let mut segments = Vec::new();
        let mut current = Some(id);
        while let Some(node) = current.and_then(|id| self.node(id)) {
            segments.push(node.key().unwrap_or("$root"));
            current = node.parent;
        }
        segments.reverse();
        segments.join("::")
    }

    // ============================================================
    // Mutation (used by Build and Resolve)
    // ============================================================

    /// Insert a child under `parent`.
    ///
    /// Keys are unique among siblings: on a clash nothing is inserted and the
    /// existing node is returned as the error.
    pub(crate) fn insert(
        &mut self,
        parent: NodeId,
        key: SmolStr,
        info: SymbolInfo,
    ) -> Result<NodeId, NodeId> {
        if let Some(existing) = self.child(parent, &key) {
            return Err(existing);
        }
        let id = NodeId::new(self.nodes.len());
        tracing::trace!("insert {} under {}", key, self.path(parent));
        self.nodes.push(SymbolNode::new(Some(key.clone()), Some(parent), info));
        self.nodes[parent.index()].children.insert(key, id);
        Ok(id)
    }

    /// Fresh key for an unnamed block; never a valid identifier.
    pub(crate) fn next_anonymous_key(&mut self) -> SmolStr {
        let key = SmolStr::new(format!("%anon-block-{}", self.anonymous_blocks));
        self.anonymous_blocks += 1;
        key
    }

    pub(crate) fn info_mut(&mut self, id: NodeId) -> Option<&mut SymbolInfo> {
        self.nodes.get_mut(id.index()).map(|node| &mut node.info)
    }

    /// Record a reference in `scope`, returning its index there.
    pub(crate) fn push_reference(&mut self, scope: NodeId, reference: Reference) -> Option<usize> {
        let references = &mut self.info_mut(scope)?.local_references;
        references.push(reference);
        Some(references.len() - 1)
    }

    pub(crate) fn push_import(&mut self, scope: NodeId, reference: Reference) {
        if let Some(info) = self.info_mut(scope) {
            info.imports.push(reference);
        }
    }
}

/// Iterator returned by [`SymbolTable::iter_depth_first`].
#[derive(Debug, Clone)]
pub struct DepthFirst<'a> {
    table: &'a SymbolTable,
    stack: Vec<NodeId>,
}

impl Iterator for DepthFirst<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        if let Some(node) = self.table.node(id) {
            self.stack.extend(node.children.values().rev().copied());
        }
        Some(id)
    }
}
