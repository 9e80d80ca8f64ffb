use super::reference::{Reference, ReferenceKind};
use super::symbol::NodeId;
use super::table::SymbolTable;
use crate::base::FileId;

/// Bound on declared-type chains (`typedef a_t b_t; b_t v; v.f`).
const MAX_TYPE_HOPS: usize = 16;

impl SymbolTable {
    // ============================================================
    // Scoped lookups (used by Resolve)
    // ============================================================

    /// Look `name` up from `scope` outward.
    ///
    /// Each scope checks its children, then its imports. At the root a child
    /// only matches if it is globally visible or was built by the
    /// referencing translation unit, and only that unit's file-scope
    /// imports apply.
    pub fn lookup_lexical(&self, scope: NodeId, name: &str, unit: FileId) -> Option<NodeId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            if let Some(child) = self.child(id, name) {
                if id != NodeId::ROOT || self.is_visible_from(child, unit) {
                    return Some(child);
                }
            }
            let imported = if id == NodeId::ROOT {
                self.lookup_in_unit_imports(name, unit)
            } else {
                self.lookup_in_imports(id, name)
            };
            if imported.is_some() {
                return imported;
            }
            current = self.parent(id);
        }
        None
    }

    fn is_visible_from(&self, id: NodeId, unit: FileId) -> bool {
        self.info(id).is_some_and(|info| {
            info.kind.is_globally_visible() || info.translation_unit == Some(unit)
        })
    }

    /// Names brought into `scope` by its (already resolved) imports.
    pub fn lookup_in_imports(&self, scope: NodeId, name: &str) -> Option<NodeId> {
        let info = self.info(scope)?;
        info.imports
            .iter()
            .find_map(|import| self.imported_name(import, name))
    }

    /// File-scope imports written by `unit`.
    fn lookup_in_unit_imports(&self, name: &str, unit: FileId) -> Option<NodeId> {
        let info = self.info(NodeId::ROOT)?;
        info.imports
            .iter()
            .filter(|import| import.translation_unit == unit)
            .find_map(|import| self.imported_name(import, name))
    }

    fn imported_name(&self, import: &Reference, name: &str) -> Option<NodeId> {
        match import.kind {
            ReferenceKind::WildcardImport => import
                .components
                .first()
                .and_then(|package| package.resolved)
                .and_then(|package| self.child(package, name)),
            ReferenceKind::Import => import
                .components
                .get(1)
                .filter(|member| member.name == name)
                .and_then(|member| member.resolved),
            _ => None,
        }
    }

    /// A root-level package or class, for `name::member` references.
    pub fn lookup_package(&self, name: &str) -> Option<NodeId> {
        self.child(NodeId::ROOT, name)
            .filter(|&id| self.info(id).is_some_and(|info| info.kind.is_package_like()))
    }

    /// The node whose children are the members of `id`: its declared type
    /// (followed through aliases) or `id` itself when it has none.
    pub fn type_scope(&self, id: NodeId) -> NodeId {
        let mut current = id;
        for _ in 0..MAX_TYPE_HOPS {
            match self.declared_type_target(current) {
                Some(target) if target != current => current = target,
                _ => break,
            }
        }
        current
    }

    /// Resolved target of a node's declared type reference.
    pub fn declared_type_target(&self, id: NodeId) -> Option<NodeId> {
        let index = self.info(id)?.declared_type?;
        let parent = self.parent(id)?;
        self.info(parent)?.local_references.get(index)?.target()
    }

    /// Member `name` of `id` (`inst.sig`, `var.field`).
    pub fn lookup_member(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.child(self.type_scope(id), name)
    }
}

// ============================================================
// Definition lookup (used by the definition query)
// ============================================================

/// Strategy for mapping a bare symbol name to a declaration node.
///
/// Definition queries go through this trait so a scope-aware strategy can
/// replace the whole-tree search without touching callers.
pub trait DefinitionLookup: std::fmt::Debug {
    fn lookup(&self, table: &SymbolTable, name: &str) -> Option<NodeId>;
}

/// First node, in depth-first pre-order with children in key order, whose
/// key equals the name.
///
/// Scoping and shadowing are ignored: a name declared in several scopes
/// resolves to whichever declaration the traversal meets first.
#[derive(Debug, Clone, Copy, Default)]
pub struct DepthFirstLookup;

impl DefinitionLookup for DepthFirstLookup {
    fn lookup(&self, table: &SymbolTable, name: &str) -> Option<NodeId> {
        table
            .iter_depth_first()
            .find(|&id| table.key(id) == Some(name))
    }
}
