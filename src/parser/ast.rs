//! Typed AST wrappers over the untyped rowan CST.
//!
//! Each struct wraps a SyntaxNode and exposes the children the symbol table
//! builder needs. Anything the wrappers do not surface (expressions,
//! statements) is walked generically.

use super::syntax_kind::SyntaxKind;
use super::{SyntaxNode, SyntaxToken};

/// Trait for AST nodes that wrap a SyntaxNode
pub trait AstNode: Sized {
    fn can_cast(kind: SyntaxKind) -> bool;
    fn cast(node: SyntaxNode) -> Option<Self>;
    fn syntax(&self) -> &SyntaxNode;
}

// ============================================================================
// Helper macros
// ============================================================================

macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub struct $name(SyntaxNode);

        impl AstNode for $name {
            fn can_cast(kind: SyntaxKind) -> bool {
                kind == SyntaxKind::$kind
            }

            fn cast(node: SyntaxNode) -> Option<Self> {
                if Self::can_cast(node.kind()) {
                    Some(Self(node))
                } else {
                    None
                }
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.0
            }
        }
    };
}

fn child<N: AstNode>(node: &SyntaxNode) -> Option<N> {
    node.children().find_map(N::cast)
}

fn children<N: AstNode>(node: &SyntaxNode) -> impl Iterator<Item = N> {
    node.children().filter_map(N::cast)
}

fn first_token(node: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|element| element.into_token())
        .find(|token| token.kind() == kind)
}

// ============================================================================
// Names
// ============================================================================

ast_node!(Name, NAME);

impl Name {
    /// The declared identifier (`new` for class constructors)
    pub fn token(&self) -> Option<SyntaxToken> {
        self.0
            .children_with_tokens()
            .filter_map(|element| element.into_token())
            .find(|token| !token.kind().is_trivia())
    }

    pub fn text(&self) -> Option<String> {
        self.token().map(|token| token.text().to_string())
    }
}

ast_node!(NameRef, NAME_REF);

/// One identifier of a qualified or hierarchical name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameSegment {
    pub ident: SyntaxToken,
    /// Separator before this segment (`::` or `.`); `None` for the first
    pub separator: Option<SyntaxKind>,
}

impl NameRef {
    pub fn segments(&self) -> Vec<NameSegment> {
        let mut segments = Vec::new();
        let mut separator = None;
        for token in self
            .0
            .children_with_tokens()
            .filter_map(|element| element.into_token())
        {
            match token.kind() {
                SyntaxKind::IDENT => {
                    segments.push(NameSegment {
                        ident: token,
                        separator: separator.take(),
                    });
                }
                SyntaxKind::COLON_COLON | SyntaxKind::DOT => separator = Some(token.kind()),
                _ => {}
            }
        }
        segments
    }
}

ast_node!(Label, LABEL);

impl Label {
    /// Declaring label (`begin : name`)
    pub fn name(&self) -> Option<Name> {
        child(&self.0)
    }
}

// ============================================================================
// Design units
// ============================================================================

ast_node!(SourceFile, SOURCE_FILE);

/// Keyword flavor of a `MODULE_DECL`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModuleFlavor {
    Module,
    Interface,
    Program,
}

ast_node!(ModuleDecl, MODULE_DECL);

impl ModuleDecl {
    pub fn flavor(&self) -> ModuleFlavor {
        let keyword = self
            .0
            .children_with_tokens()
            .filter_map(|element| element.into_token())
            .map(|token| token.kind())
            .find(|kind| kind.is_keyword());
        match keyword {
            Some(SyntaxKind::INTERFACE_KW) => ModuleFlavor::Interface,
            Some(SyntaxKind::PROGRAM_KW) => ModuleFlavor::Program,
            _ => ModuleFlavor::Module,
        }
    }

    pub fn name(&self) -> Option<Name> {
        child(&self.0)
    }
}

ast_node!(PackageDecl, PACKAGE_DECL);

impl PackageDecl {
    pub fn name(&self) -> Option<Name> {
        child(&self.0)
    }
}

ast_node!(ClassDecl, CLASS_DECL);

impl ClassDecl {
    pub fn name(&self) -> Option<Name> {
        child(&self.0)
    }

    /// Base class type (`extends base`)
    pub fn extends(&self) -> Option<DataType> {
        child(&self.0)
    }
}

/// A function or task declaration
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Subroutine(SyntaxNode);

impl AstNode for Subroutine {
    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(kind, SyntaxKind::FUNCTION_DECL | SyntaxKind::TASK_DECL)
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        Self::can_cast(node.kind()).then(|| Self(node))
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.0
    }
}

impl Subroutine {
    pub fn is_task(&self) -> bool {
        self.0.kind() == SyntaxKind::TASK_DECL
    }

    pub fn name(&self) -> Option<Name> {
        child(&self.0)
    }

    pub fn return_type(&self) -> Option<DataType> {
        child(&self.0)
    }

    /// Class scope of an out-of-class body (`function void cls::name`)
    pub fn class_scope(&self) -> Option<NameRef> {
        child(&self.0)
    }
}

// ============================================================================
// Declarations
// ============================================================================

ast_node!(DataType, DATA_TYPE);

impl DataType {
    /// The user-defined type named by this data type, if any
    pub fn type_ref(&self) -> Option<NameRef> {
        child(&self.0)
    }

    pub fn enum_body(&self) -> Option<EnumBody> {
        child(&self.0)
    }

    pub fn struct_body(&self) -> Option<StructBody> {
        child(&self.0)
    }
}

ast_node!(Declarator, DECLARATOR);

impl Declarator {
    pub fn name(&self) -> Option<Name> {
        child(&self.0)
    }
}

/// Data, net, port or parameter declaration
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Declaration(SyntaxNode);

impl AstNode for Declaration {
    fn can_cast(kind: SyntaxKind) -> bool {
        matches!(
            kind,
            SyntaxKind::DATA_DECL | SyntaxKind::PORT_DECL | SyntaxKind::PARAM_DECL
        )
    }

    fn cast(node: SyntaxNode) -> Option<Self> {
        Self::can_cast(node.kind()).then(|| Self(node))
    }

    fn syntax(&self) -> &SyntaxNode {
        &self.0
    }
}

impl Declaration {
    pub fn is_parameter(&self) -> bool {
        self.0.kind() == SyntaxKind::PARAM_DECL
    }

    /// Port declarations: ANSI header entries and body direction declarations
    pub fn is_port(&self) -> bool {
        self.0.kind() == SyntaxKind::PORT_DECL
            || self
                .0
                .children_with_tokens()
                .filter_map(|element| element.into_token())
                .any(|token| token.kind().is_direction())
    }

    pub fn data_type(&self) -> Option<DataType> {
        child(&self.0)
    }

    pub fn declarators(&self) -> impl Iterator<Item = Declarator> {
        children(&self.0)
    }
}

ast_node!(TypedefDecl, TYPEDEF_DECL);

impl TypedefDecl {
    pub fn data_type(&self) -> Option<DataType> {
        child(&self.0)
    }

    pub fn name(&self) -> Option<Name> {
        child(&self.0)
    }
}

ast_node!(EnumBody, ENUM_BODY);

impl EnumBody {
    pub fn members(&self) -> impl Iterator<Item = EnumMember> {
        children(&self.0)
    }
}

ast_node!(EnumMember, ENUM_MEMBER);

impl EnumMember {
    pub fn name(&self) -> Option<Name> {
        child(&self.0)
    }
}

ast_node!(StructBody, STRUCT_BODY);

impl StructBody {
    pub fn fields(&self) -> impl Iterator<Item = Declaration> {
        children(&self.0)
    }
}

// ============================================================================
// Instantiation
// ============================================================================

ast_node!(Instantiation, INSTANTIATION);

impl Instantiation {
    pub fn data_type(&self) -> Option<DataType> {
        child(&self.0)
    }

    /// Named parameter overrides (`#(.W(8))`)
    pub fn parameter_overrides(&self) -> impl Iterator<Item = PortConnection> {
        children(&self.0)
    }

    pub fn instances(&self) -> impl Iterator<Item = Instance> {
        children(&self.0)
    }
}

ast_node!(Instance, INSTANCE);

impl Instance {
    pub fn name(&self) -> Option<Name> {
        child(&self.0)
    }

    pub fn connections(&self) -> impl Iterator<Item = PortConnection> {
        children(&self.0)
    }
}

ast_node!(PortConnection, PORT_CONNECTION);

impl PortConnection {
    /// The formal port (or parameter) name after the `.`
    pub fn port(&self) -> Option<SyntaxToken> {
        first_token(&self.0, SyntaxKind::IDENT)
    }
}

// ============================================================================
// Imports and includes
// ============================================================================

ast_node!(ImportDecl, IMPORT_DECL);

impl ImportDecl {
    pub fn items(&self) -> impl Iterator<Item = ImportItem> {
        children(&self.0)
    }
}

ast_node!(ImportItem, IMPORT_ITEM);

impl ImportItem {
    fn idents(&self) -> impl Iterator<Item = SyntaxToken> {
        self.0
            .children_with_tokens()
            .filter_map(|element| element.into_token())
            .filter(|token| token.kind() == SyntaxKind::IDENT)
    }

    pub fn package(&self) -> Option<SyntaxToken> {
        self.idents().next()
    }

    /// The imported member; `None` for a wildcard import
    pub fn member(&self) -> Option<SyntaxToken> {
        self.idents().nth(1)
    }

    pub fn is_wildcard(&self) -> bool {
        first_token(&self.0, SyntaxKind::OPERATOR).is_some_and(|token| token.text() == "*")
    }
}

ast_node!(IncludeDirective, INCLUDE_DIRECTIVE);

impl IncludeDirective {
    pub fn path_token(&self) -> Option<SyntaxToken> {
        first_token(&self.0, SyntaxKind::STRING)
    }

    /// The included path with the quotes stripped
    pub fn path(&self) -> Option<String> {
        let token = self.path_token()?;
        let text = token.text();
        let inner = text.strip_prefix('"')?.strip_suffix('"')?;
        (!inner.is_empty()).then(|| inner.to_string())
    }
}

// ============================================================================
// Blocks
// ============================================================================

ast_node!(Block, BLOCK);

impl Block {
    /// Declared label: `begin : name`, or the label of a loop body
    pub fn label(&self) -> Option<Name> {
        self.0.children().filter_map(Label::cast).find_map(|label| label.name())
    }
}
