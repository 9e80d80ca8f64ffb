//! Resolve phase: link recorded references to declaration nodes.
//!
//! Three passes over the whole tree, each in arena order:
//! 1. package imports, so later lookups can see imported names
//! 2. type references, so member lookups can follow declared types
//! 3. value references and named port connections
//!
//! Resolution never changes the tree shape. Components that cannot be
//! linked stay unresolved and are reported once per reference.

use super::diagnostics::{Diagnostic, codes};
use super::symbol_table::{NodeId, Reference, ReferenceKind, Separator, SymbolTable};

/// Which references a pass handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pass {
    Imports,
    Types,
    Values,
}

impl Pass {
    fn handles(self, kind: ReferenceKind) -> bool {
        match self {
            Pass::Imports => matches!(kind, ReferenceKind::Import | ReferenceKind::WildcardImport),
            Pass::Types => kind == ReferenceKind::Type,
            Pass::Values => matches!(kind, ReferenceKind::Value | ReferenceKind::PortConnection),
        }
    }
}

/// Where a reference lives inside its scope.
#[derive(Debug, Clone, Copy)]
enum Slot {
    Import(usize),
    Local(usize),
}

impl SymbolTable {
    /// Resolve every reference recorded by Build.
    ///
    /// Resolving an already resolved table recomputes the same links.
    pub fn resolve(&mut self) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for pass in [Pass::Imports, Pass::Types, Pass::Values] {
            self.resolve_pass(pass, &mut diagnostics);
        }
        tracing::debug!(
            "resolve finished: {} unresolved reference(s)",
            diagnostics.len()
        );
        diagnostics
    }

    fn resolve_pass(&mut self, pass: Pass, diagnostics: &mut Vec<Diagnostic>) {
        for index in 0..self.nodes.len() {
            let scope = NodeId::new(index);
            let slots: Vec<Slot> = {
                let info = &self.nodes[index].info;
                let imports = (0..info.imports.len()).map(Slot::Import);
                let locals = (0..info.local_references.len()).map(Slot::Local);
                imports
                    .chain(locals)
                    .filter(|&slot| self.slot(scope, slot).is_some_and(|r| pass.handles(r.kind)))
                    .collect()
            };

            for slot in slots {
                // compute against the immutable table, then write back
                let Some(reference) = self.slot(scope, slot) else {
                    continue;
                };
                let targets = self.resolve_reference(scope, reference);
                if let Some(diagnostic) = unresolved_diagnostic(self, scope, reference, &targets) {
                    diagnostics.push(diagnostic);
                }
                if let Some(reference) = self.slot_mut(scope, slot) {
                    for (component, target) in reference.components.iter_mut().zip(targets) {
                        component.resolved = target;
                    }
                }
            }
        }
    }

    fn slot(&self, scope: NodeId, slot: Slot) -> Option<&Reference> {
        let info = self.info(scope)?;
        match slot {
            Slot::Import(index) => info.imports.get(index),
            Slot::Local(index) => info.local_references.get(index),
        }
    }

    fn slot_mut(&mut self, scope: NodeId, slot: Slot) -> Option<&mut Reference> {
        let info = self.info_mut(scope)?;
        match slot {
            Slot::Import(index) => info.imports.get_mut(index),
            Slot::Local(index) => info.local_references.get_mut(index),
        }
    }

    /// Target of each component, in order. Resolution stops at the first
    /// component that cannot be linked.
    fn resolve_reference(&self, scope: NodeId, reference: &Reference) -> Vec<Option<NodeId>> {
        let mut targets = vec![None; reference.components.len()];
        match reference.kind {
            ReferenceKind::Import | ReferenceKind::WildcardImport => {
                let Some(package) = reference
                    .components
                    .first()
                    .and_then(|c| self.lookup_package(&c.name))
                else {
                    return targets;
                };
                targets[0] = Some(package);
                if let Some(member) = reference.components.get(1) {
                    targets[1] = self.child(package, &member.name);
                }
            }
            ReferenceKind::PortConnection => {
                let owner = reference
                    .owner
                    .and_then(|index| self.info(scope)?.local_references.get(index))
                    .and_then(|owner| owner.target());
                if let (Some(owner), Some(port)) = (owner, reference.components.first()) {
                    targets[0] = self.lookup_member(owner, &port.name);
                }
            }
            ReferenceKind::Type | ReferenceKind::Value => {
                let mut previous: Option<NodeId> = None;
                for (index, component) in reference.components.iter().enumerate() {
                    let target = match previous {
                        None => {
                            let next = reference.components.get(1).and_then(|c| c.separator);
                            if next == Some(Separator::Package) {
                                self.lookup_package(&component.name)
                            } else {
                                self.lookup_lexical(scope, &component.name, reference.translation_unit)
                            }
                        }
                        Some(parent) => match component.separator {
                            Some(Separator::Package) => self.child(parent, &component.name),
                            _ => self.lookup_member(parent, &component.name),
                        },
                    };
                    targets[index] = target;
                    match target {
                        Some(target) => previous = Some(target),
                        None => break,
                    }
                }
            }
        }
        targets
    }
}

fn unresolved_diagnostic(
    table: &SymbolTable,
    scope: NodeId,
    reference: &Reference,
    targets: &[Option<NodeId>],
) -> Option<Diagnostic> {
    let missing = targets.iter().position(Option::is_none)?;
    if reference.kind == ReferenceKind::PortConnection {
        // nothing to report against when the instantiated type is unknown
        let owner_resolved = reference
            .owner
            .and_then(|index| table.info(scope)?.local_references.get(index))
            .is_some_and(|owner| owner.is_resolved());
        if !owner_resolved {
            return None;
        }
    }
    let component = &reference.components[missing];
    let what = match reference.kind {
        ReferenceKind::Type => "type",
        ReferenceKind::Import | ReferenceKind::WildcardImport if missing == 0 => "package",
        ReferenceKind::PortConnection => "port",
        _ => "symbol",
    };
    let message = if missing == 0 {
        format!("unresolved {} `{}` in {}", what, component.name, table.path(scope))
    } else {
        format!(
            "unresolved {} `{}` in `{}`",
            what,
            component.name,
            spelled_prefix(reference, missing)
        )
    };
    Some(
        Diagnostic::warning(message)
            .with_code(codes::UNRESOLVED_REFERENCE)
            .in_file(reference.file)
            .with_range(component.anchor),
    )
}

/// The first `len` components, spelled with their own separators.
fn spelled_prefix(reference: &Reference, len: usize) -> String {
    let mut prefix = String::new();
    for component in &reference.components[..len] {
        match component.separator {
            Some(Separator::Package) => prefix.push_str("::"),
            Some(Separator::Member) => prefix.push('.'),
            None => {}
        }
        prefix.push_str(&component.name);
    }
    prefix
}
