use smol_str::SmolStr;

use super::symbol::NodeId;
use crate::base::{FileId, TextRange};

/// What a reference names, which also decides its Resolve pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    /// A user-defined type: instance type, typedef'd data type, base class
    Type,
    /// Any other identifier use
    Value,
    /// `import pkg::name;`
    Import,
    /// `import pkg::*;`
    WildcardImport,
    /// `.port(...)` or `#(.PARAM(...))` of an instantiation
    PortConnection,
}

/// Separator in front of a reference component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Separator {
    /// `::`
    Package,
    /// `.`
    Member,
}

/// One identifier of a (possibly qualified) reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceComponent {
    pub name: SmolStr,
    /// Byte range of the identifier in the reference's file
    pub anchor: TextRange,
    /// `None` for the first component
    pub separator: Option<Separator>,
    /// Set by Resolve
    pub resolved: Option<NodeId>,
}

/// A use of a name, recorded in the scope it appears in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub kind: ReferenceKind,
    /// File containing the reference text
    pub file: FileId,
    /// Translation unit whose Build recorded the reference
    pub translation_unit: FileId,
    pub components: Vec<ReferenceComponent>,
    /// For port connections: index of the instantiated type's reference in
    /// the same scope
    pub owner: Option<usize>,
}

impl Reference {
    /// The node the whole reference resolved to (its last component).
    pub fn target(&self) -> Option<NodeId> {
        self.components.last().and_then(|component| component.resolved)
    }

    pub fn is_resolved(&self) -> bool {
        self.target().is_some()
    }

    /// Source-like spelling, e.g. `pkg::name` or `u0.sig`.
    pub fn path(&self) -> String {
        let mut path = String::new();
        for component in &self.components {
            match component.separator {
                Some(Separator::Package) => path.push_str("::"),
                Some(Separator::Member) => path.push('.'),
                None => {}
            }
            path.push_str(&component.name);
        }
        if self.kind == ReferenceKind::WildcardImport {
            path.push_str("::*");
        }
        path
    }
}
