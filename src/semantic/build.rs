//! Build phase: populate the symbol table from parsed files.
//!
//! Declarations are inserted at the scope implied by their lexical nesting;
//! identifier uses are recorded as unresolved [`Reference`]s on the scope
//! they appear in, for the Resolve phase to link.

use smol_str::SmolStr;
use tracing::debug;

use super::diagnostics::{Diagnostic, codes};
use super::symbol_table::{
    NodeId, Reference, ReferenceComponent, ReferenceKind, Separator, SymbolInfo, SymbolKind,
    SymbolTable,
};
use crate::base::{FileId, TextRange};
use crate::parser::{
    AstNode, Block, ClassDecl, DataType, Declaration, ImportDecl, IncludeDirective, Instantiation,
    ModuleDecl, ModuleFlavor, Name, NameRef, PackageDecl, PortConnection, Subroutine, SyntaxKind,
    SyntaxNode, TypedefDecl,
};
use crate::project::VerilogProject;

impl SymbolTable {
    /// Build every registered translation unit, in registration order.
    pub fn build(&mut self, project: &mut VerilogProject) -> Vec<Diagnostic> {
        let mut diagnostics = Vec::new();
        for file in project.translation_units() {
            diagnostics.extend(self.build_file(project, file));
        }
        diagnostics
    }

    /// Build one file into the current tree.
    pub fn build_file(&mut self, project: &mut VerilogProject, file: FileId) -> Vec<Diagnostic> {
        let mut builder = Builder {
            table: self,
            project,
            diagnostics: Vec::new(),
            unit: file,
            file,
            include_stack: Vec::new(),
        };
        if let Some(root) = builder.parse(file, None) {
            builder.walk(NodeId::ROOT, &root);
        }
        builder.diagnostics
    }
}

struct Builder<'a> {
    table: &'a mut SymbolTable,
    project: &'a mut VerilogProject,
    diagnostics: Vec<Diagnostic>,
    /// Translation unit being built
    unit: FileId,
    /// File currently walked (differs from `unit` inside includes)
    file: FileId,
    include_stack: Vec<FileId>,
}

impl Builder<'_> {
    /// Parse `file`, reporting read failures and syntax errors.
    fn parse(&mut self, file: FileId, directive: Option<TextRange>) -> Option<SyntaxNode> {
        let (root, errors) = match self.project.ensure_parsed(file) {
            Ok(text) => (text.syntax(), text.errors().to_vec()),
            Err(err) => {
                let mut diagnostic = Diagnostic::error(err.to_string())
                    .with_code(codes::UNREADABLE_FILE)
                    .in_file(self.file);
                if let Some(range) = directive {
                    diagnostic = diagnostic.with_range(range);
                }
                self.diagnostics.push(diagnostic);
                return None;
            }
        };
        for error in errors {
            self.diagnostics.push(
                Diagnostic::error(format!("syntax error: {}", error.message))
                    .with_code(codes::SYNTAX_ERROR)
                    .in_file(file)
                    .with_range(error.range),
            );
        }
        Some(root)
    }

    fn walk(&mut self, scope: NodeId, node: &SyntaxNode) {
        for child in node.children() {
            self.visit(scope, &child);
        }
    }

    fn visit(&mut self, scope: NodeId, node: &SyntaxNode) {
        match node.kind() {
            SyntaxKind::MODULE_DECL => self.module(scope, node),
            SyntaxKind::PACKAGE_DECL => {
                let name = PackageDecl::cast(node.clone()).and_then(|p| p.name());
                self.scope_declaration(scope, node, name, SymbolKind::Package);
            }
            SyntaxKind::CLASS_DECL => {
                let name = ClassDecl::cast(node.clone()).and_then(|c| c.name());
                self.scope_declaration(scope, node, name, SymbolKind::Class);
            }
            SyntaxKind::FUNCTION_DECL | SyntaxKind::TASK_DECL => {
                let Some(subroutine) = Subroutine::cast(node.clone()) else {
                    return;
                };
                let kind = if subroutine.is_task() {
                    SymbolKind::Task
                } else {
                    SymbolKind::Function
                };
                self.scope_declaration(scope, node, subroutine.name(), kind);
            }
            SyntaxKind::DATA_DECL | SyntaxKind::PORT_DECL | SyntaxKind::PARAM_DECL => {
                if let Some(declaration) = Declaration::cast(node.clone()) {
                    self.declaration(scope, &declaration);
                }
            }
            SyntaxKind::TYPEDEF_DECL => {
                if let Some(typedef) = TypedefDecl::cast(node.clone()) {
                    self.typedef(scope, &typedef);
                }
            }
            SyntaxKind::INSTANTIATION => {
                if let Some(instantiation) = Instantiation::cast(node.clone()) {
                    self.instantiation(scope, &instantiation);
                }
            }
            SyntaxKind::IMPORT_DECL => {
                if let Some(import) = ImportDecl::cast(node.clone()) {
                    self.import(scope, &import);
                }
            }
            SyntaxKind::INCLUDE_DIRECTIVE => {
                if let Some(include) = IncludeDirective::cast(node.clone()) {
                    self.include(scope, &include);
                }
            }
            SyntaxKind::BLOCK => self.block(scope, node),
            SyntaxKind::DATA_TYPE => {
                if let Some(data_type) = DataType::cast(node.clone()) {
                    self.data_type(scope, &data_type);
                }
            }
            SyntaxKind::NAME_REF => {
                if let Some(name_ref) = NameRef::cast(node.clone()) {
                    self.reference(scope, &name_ref, ReferenceKind::Value);
                }
            }
            // Declared names are handled by their parent; end labels are not uses
            SyntaxKind::NAME | SyntaxKind::LABEL => {}
            _ => self.walk(scope, node),
        }
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    /// Insert `name` under `scope`. Reports duplicates (the first wins).
    fn declare(&mut self, scope: NodeId, name: Option<Name>, mut info: SymbolInfo) -> Option<NodeId> {
        let token = name?.token()?;
        let key = SmolStr::new(token.text());
        info.file_origin = Some(self.file);
        info.translation_unit = Some(self.unit);
        info.anchor = Some(token.text_range());

        match self.table.insert(scope, key.clone(), info.clone()) {
            Ok(id) => Some(id),
            Err(existing) => {
                if self.merge_port_declaration(existing, &info) {
                    return None;
                }
                let previous = self
                    .table
                    .info(existing)
                    .map(|info| info.kind)
                    .unwrap_or(SymbolKind::Root);
                self.diagnostics.push(
                    Diagnostic::error(format!(
                        "duplicate declaration of `{}` in {} (previously declared as {})",
                        key,
                        self.table.path(scope),
                        previous
                    ))
                    .with_code(codes::DUPLICATE_DEFINITION)
                    .in_file(self.file)
                    .with_range(token.text_range()),
                );
                None
            }
        }
    }

    /// Non-ANSI ports are declared twice (`input a; wire a;`); fold the pair
    /// into one node instead of reporting a duplicate.
    fn merge_port_declaration(&mut self, existing: NodeId, incoming: &SymbolInfo) -> bool {
        let Some(info) = self.table.info_mut(existing) else {
            return false;
        };
        let mergeable = info.kind == SymbolKind::DataNetVariableInstance
            && incoming.kind == SymbolKind::DataNetVariableInstance
            && info.is_port != incoming.is_port;
        if mergeable {
            info.is_port = true;
            if info.declared_type.is_none() {
                info.declared_type = incoming.declared_type;
            }
        }
        mergeable
    }

    /// Module-like, package, class, function and task: a named scope whose
    /// body is walked inside the new node. Duplicates skip their body.
    fn scope_declaration(&mut self, scope: NodeId, node: &SyntaxNode, name: Option<Name>, kind: SymbolKind) {
        if let Some(id) = self.declare(scope, name, SymbolInfo::new(kind)) {
            self.walk(id, node);
        }
    }

    fn module(&mut self, scope: NodeId, node: &SyntaxNode) {
        let Some(module) = ModuleDecl::cast(node.clone()) else {
            return;
        };
        let kind = match module.flavor() {
            ModuleFlavor::Module => SymbolKind::Module,
            ModuleFlavor::Interface => SymbolKind::Interface,
            ModuleFlavor::Program => SymbolKind::Program,
        };
        self.scope_declaration(scope, node, module.name(), kind);
    }

    fn declaration(&mut self, scope: NodeId, declaration: &Declaration) {
        let kind = if declaration.is_parameter() {
            SymbolKind::Parameter
        } else {
            SymbolKind::DataNetVariableInstance
        };
        let is_port = declaration.is_port();
        let data_type = declaration.data_type();
        let declared_type = data_type.as_ref().and_then(|dt| self.data_type(scope, dt));
        let struct_body = data_type.as_ref().and_then(|dt| dt.struct_body());

        for declarator in declaration.declarators() {
            let info = SymbolInfo::new(kind)
                .with_port(is_port)
                .with_declared_type(declared_type);
            if let Some(id) = self.declare(scope, declarator.name(), info) {
                if let Some(body) = &struct_body {
                    self.struct_fields(id, body.syntax());
                }
            }
            // unpacked dimensions and initializer
            self.walk(scope, declarator.syntax());
        }
    }

    fn typedef(&mut self, scope: NodeId, typedef: &TypedefDecl) {
        // `typedef class c;` only announces a later declaration
        let Some(data_type) = typedef.data_type() else {
            return;
        };
        let declared_type = self.data_type(scope, &data_type);
        let info = SymbolInfo::new(SymbolKind::TypeAlias).with_declared_type(declared_type);
        if let Some(id) = self.declare(scope, typedef.name(), info) {
            if let Some(body) = data_type.struct_body() {
                self.struct_fields(id, body.syntax());
            }
        }
        for child in typedef.syntax().children() {
            if child.kind() == SyntaxKind::EXPR {
                self.walk(scope, &child);
            }
        }
    }

    /// Struct members become children of the typedef or variable they belong to.
    fn struct_fields(&mut self, owner: NodeId, body: &SyntaxNode) {
        for field in body.children().filter_map(Declaration::cast) {
            self.declaration(owner, &field);
        }
    }

    /// Record the references of a data type. Returns the index of the
    /// user-defined type reference, if the type names one.
    fn data_type(&mut self, scope: NodeId, data_type: &DataType) -> Option<usize> {
        let mut user_type = None;
        for child in data_type.syntax().children() {
            match child.kind() {
                SyntaxKind::NAME_REF => {
                    if let Some(name_ref) = NameRef::cast(child) {
                        let index = self.reference(scope, &name_ref, ReferenceKind::Type);
                        user_type = user_type.or(index);
                    }
                }
                SyntaxKind::ENUM_BODY => self.enum_body(scope, &child),
                // fields are declared by the owning typedef or variable
                SyntaxKind::STRUCT_BODY => {}
                _ => self.walk(scope, &child),
            }
        }
        user_type
    }

    fn enum_body(&mut self, scope: NodeId, body: &SyntaxNode) {
        for child in body.children() {
            match child.kind() {
                SyntaxKind::ENUM_MEMBER => {
                    let name = child.children().find_map(Name::cast);
                    self.declare(scope, name, SymbolInfo::new(SymbolKind::EnumConstant));
                    self.walk(scope, &child);
                }
                SyntaxKind::NAME_REF => {
                    if let Some(name_ref) = NameRef::cast(child) {
                        self.reference(scope, &name_ref, ReferenceKind::Type);
                    }
                }
                _ => self.walk(scope, &child),
            }
        }
    }

    // ========================================================================
    // Instances, imports and includes
    // ========================================================================

    fn instantiation(&mut self, scope: NodeId, instantiation: &Instantiation) {
        let type_ref = instantiation
            .data_type()
            .and_then(|dt| self.data_type(scope, &dt));

        for child in instantiation.syntax().children() {
            match child.kind() {
                SyntaxKind::PORT_CONNECTION => {
                    if let Some(connection) = PortConnection::cast(child) {
                        self.port_connection(scope, &connection, type_ref);
                    }
                }
                SyntaxKind::EXPR => self.walk(scope, &child),
                _ => {}
            }
        }

        for instance in instantiation.instances() {
            let info = SymbolInfo::new(SymbolKind::DataNetVariableInstance).with_declared_type(type_ref);
            self.declare(scope, instance.name(), info);
            for child in instance.syntax().children() {
                match child.kind() {
                    SyntaxKind::PORT_CONNECTION => {
                        if let Some(connection) = PortConnection::cast(child) {
                            self.port_connection(scope, &connection, type_ref);
                        }
                    }
                    SyntaxKind::EXPR => self.walk(scope, &child),
                    _ => {}
                }
            }
        }
    }

    fn port_connection(&mut self, scope: NodeId, connection: &PortConnection, owner: Option<usize>) {
        if let Some(port) = connection.port() {
            let reference = Reference {
                kind: ReferenceKind::PortConnection,
                file: self.file,
                translation_unit: self.unit,
                components: vec![ReferenceComponent {
                    name: SmolStr::new(port.text()),
                    anchor: port.text_range(),
                    separator: None,
                    resolved: None,
                }],
                owner,
            };
            self.table.push_reference(scope, reference);
        }
        // the actual expression
        self.walk(scope, connection.syntax());
    }

    fn import(&mut self, scope: NodeId, import: &ImportDecl) {
        for item in import.items() {
            let Some(package) = item.package() else {
                continue;
            };
            let mut components = vec![ReferenceComponent {
                name: SmolStr::new(package.text()),
                anchor: package.text_range(),
                separator: None,
                resolved: None,
            }];
            let kind = if item.is_wildcard() {
                ReferenceKind::WildcardImport
            } else if let Some(member) = item.member() {
                components.push(ReferenceComponent {
                    name: SmolStr::new(member.text()),
                    anchor: member.text_range(),
                    separator: Some(Separator::Package),
                    resolved: None,
                });
                ReferenceKind::Import
            } else {
                continue;
            };
            self.table.push_import(
                scope,
                Reference {
                    kind,
                    file: self.file,
                    translation_unit: self.unit,
                    components,
                    owner: None,
                },
            );
        }
    }

    /// Build an included file inline, in the scope of the directive.
    fn include(&mut self, scope: NodeId, include: &IncludeDirective) {
        let Some(path) = include.path() else {
            return;
        };
        let range = include
            .path_token()
            .map(|token| token.text_range())
            .unwrap_or_else(|| include.syntax().text_range());

        if self.include_stack.len() >= self.table.max_include_depth {
            self.diagnostics.push(
                Diagnostic::error(format!(
                    "`include \"{}\" exceeds the maximum nesting depth of {}",
                    path, self.table.max_include_depth
                ))
                .with_code(codes::RECURSIVE_INCLUDE)
                .in_file(self.file)
                .with_range(range),
            );
            return;
        }

        let included = match self.project.open_included_file(&path) {
            Ok(id) => id,
            Err(err) => {
                self.diagnostics.push(
                    Diagnostic::warning(format!("cannot include \"{}\": {}", path, err))
                        .with_code(codes::MISSING_INCLUDE)
                        .in_file(self.file)
                        .with_range(range),
                );
                return;
            }
        };
        if included == self.unit || self.include_stack.contains(&included) {
            self.diagnostics.push(
                Diagnostic::error(format!("recursive `include \"{}\"", path))
                    .with_code(codes::RECURSIVE_INCLUDE)
                    .in_file(self.file)
                    .with_range(range),
            );
            return;
        }

        let Some(root) = self.parse(included, Some(range)) else {
            return;
        };
        debug!("building `include \"{}\" ({}) into {}", path, included, self.table.path(scope));
        self.include_stack.push(included);
        let includer = std::mem::replace(&mut self.file, included);
        self.walk(scope, &root);
        self.file = includer;
        self.include_stack.pop();
    }

    // ========================================================================
    // Blocks and references
    // ========================================================================

    fn block(&mut self, scope: NodeId, node: &SyntaxNode) {
        let Some(block) = Block::cast(node.clone()) else {
            return;
        };
        let kind = if is_procedural(node) {
            SymbolKind::Block
        } else {
            SymbolKind::Generate
        };
        let id = match block.label() {
            Some(label) => self.declare(scope, Some(label), SymbolInfo::new(kind)),
            None => {
                let key = self.table.next_anonymous_key();
                let mut info = SymbolInfo::new(kind);
                info.file_origin = Some(self.file);
                info.translation_unit = Some(self.unit);
                self.table.insert(scope, key, info).ok()
            }
        };
        if let Some(id) = id {
            self.walk(id, node);
        }
    }

    fn reference(&mut self, scope: NodeId, name_ref: &NameRef, kind: ReferenceKind) -> Option<usize> {
        let components: Vec<_> = name_ref
            .segments()
            .into_iter()
            .map(|segment| ReferenceComponent {
                name: SmolStr::new(segment.ident.text()),
                anchor: segment.ident.text_range(),
                separator: segment.separator.map(|separator| match separator {
                    SyntaxKind::COLON_COLON => Separator::Package,
                    _ => Separator::Member,
                }),
                resolved: None,
            })
            .collect();
        if components.is_empty() {
            return None;
        }
        self.table.push_reference(
            scope,
            Reference {
                kind,
                file: self.file,
                translation_unit: self.unit,
                components,
                owner: None,
            },
        )
    }
}

/// Is this block inside procedural code rather than a generate construct?
fn is_procedural(node: &SyntaxNode) -> bool {
    for ancestor in node.ancestors().skip(1) {
        match ancestor.kind() {
            SyntaxKind::FUNCTION_DECL | SyntaxKind::TASK_DECL => return true,
            SyntaxKind::STATEMENT => {
                let first = ancestor
                    .children_with_tokens()
                    .filter_map(|element| element.into_token())
                    .find(|token| !token.kind().is_trivia());
                if first.is_some_and(|token| token.kind() == SyntaxKind::PROCEDURE_KW) {
                    return true;
                }
            }
            SyntaxKind::MODULE_DECL
            | SyntaxKind::PACKAGE_DECL
            | SyntaxKind::CLASS_DECL
            | SyntaxKind::SOURCE_FILE => return false,
            _ => {}
        }
    }
    false
}
