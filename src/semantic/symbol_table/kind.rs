use std::fmt;

/// Declaration category of a symbol table node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// The key-less project scope
    Root,
    Module,
    Interface,
    Program,
    Package,
    Class,
    Function,
    Task,
    /// `parameter`, `localparam` and parameter ports
    Parameter,
    /// `typedef`
    TypeAlias,
    EnumConstant,
    /// Nets, variables, ports, genvars and instances
    DataNetVariableInstance,
    /// Generate block (named or anonymous)
    Generate,
    /// Procedural `begin`/`fork` block
    Block,
}

impl SymbolKind {
    /// Kinds that can be referenced from any file once declared at the root.
    pub fn is_globally_visible(self) -> bool {
        matches!(
            self,
            Self::Module | Self::Interface | Self::Program | Self::Package | Self::Class
        )
    }

    /// Kinds that may qualify a `name::member` reference.
    pub fn is_package_like(self) -> bool {
        matches!(self, Self::Package | Self::Class)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Module => "module",
            Self::Interface => "interface",
            Self::Program => "program",
            Self::Package => "package",
            Self::Class => "class",
            Self::Function => "function",
            Self::Task => "task",
            Self::Parameter => "parameter",
            Self::TypeAlias => "typedef",
            Self::EnumConstant => "enum constant",
            Self::DataNetVariableInstance => "data/net/variable/instance",
            Self::Generate => "generate block",
            Self::Block => "block",
        }
    }
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
