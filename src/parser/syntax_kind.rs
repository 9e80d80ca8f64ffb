//! Syntax kinds for the Rowan-based CST
//!
//! This enum defines all possible node and token kinds in the syntax tree.
//! Keywords the parser does not branch on share the generic `KEYWORD` kind.

/// All syntax kinds (tokens and nodes) for Verilog/SystemVerilog
///
/// Tokens are leaf nodes (identifiers, keywords, punctuation).
/// Nodes are composite (modules, declarations, references).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // =========================================================================
    // TRIVIA (whitespace, comments and inert directives)
    // =========================================================================
    WHITESPACE = 0,
    LINE_COMMENT,
    BLOCK_COMMENT,
    /// `define lines, `timescale, conditional directives and macro uses
    DIRECTIVE,

    // =========================================================================
    // LITERALS
    // =========================================================================
    IDENT,         // foo, \escaped
    SYSTEM_IDENT,  // $display
    NUMBER,        // 42, 8'hff, '0, 1.5, 10ns
    STRING,        // "file.svh"
    INCLUDE_KW,    // `include

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    L_PAREN,      // (
    R_PAREN,      // )
    L_BRACKET,    // [
    R_BRACKET,    // ]
    L_BRACE,      // {
    R_BRACE,      // }
    SEMICOLON,    // ;
    COMMA,        // ,
    DOT,          // .
    COLON,        // :
    COLON_COLON,  // ::
    HASH,         // #
    AT,           // @
    EQ,           // =
    APOSTROPHE,   // '
    OPERATOR,     // every other operator

    // =========================================================================
    // KEYWORDS
    // =========================================================================
    MODULE_KW,       // module, macromodule
    ENDMODULE_KW,
    INTERFACE_KW,
    ENDINTERFACE_KW,
    PROGRAM_KW,
    ENDPROGRAM_KW,
    PACKAGE_KW,
    ENDPACKAGE_KW,
    CLASS_KW,
    ENDCLASS_KW,
    FUNCTION_KW,
    ENDFUNCTION_KW,
    TASK_KW,
    ENDTASK_KW,
    PARAMETER_KW,
    LOCALPARAM_KW,
    INPUT_KW,
    OUTPUT_KW,
    INOUT_KW,
    REF_KW,
    NET_TYPE_KW,     // wire, tri, supply0, ...
    DATA_TYPE_KW,    // logic, reg, int, ...
    SIGNING_KW,      // signed, unsigned
    VAR_KW,
    CONST_KW,
    LIFETIME_KW,     // static, automatic
    TYPEDEF_KW,
    ENUM_KW,
    STRUCT_KW,       // struct, union
    PACKED_KW,
    IMPORT_KW,
    EXPORT_KW,
    ASSIGN_KW,
    PROCEDURE_KW,    // always, always_ff, always_comb, always_latch, initial, final
    BEGIN_KW,
    END_KW,
    FORK_KW,
    JOIN_KW,         // join, join_any, join_none
    CASE_KW,         // case, casex, casez
    ENDCASE_KW,
    IF_KW,
    ELSE_KW,
    FOR_KW,
    GENERATE_KW,
    ENDGENERATE_KW,
    GENVAR_KW,
    EXTENDS_KW,
    VIRTUAL_KW,
    KEYWORD,         // any other reserved word

    // =========================================================================
    // NODES
    // =========================================================================
    SOURCE_FILE,
    MODULE_DECL,       // module / interface / program
    PACKAGE_DECL,
    CLASS_DECL,
    FUNCTION_DECL,
    TASK_DECL,
    PARAM_PORT_LIST,
    PORT_LIST,
    PORT_DECL,
    DATA_DECL,
    PARAM_DECL,
    DECLARATOR,
    DATA_TYPE,
    TYPEDEF_DECL,
    ENUM_BODY,
    ENUM_MEMBER,
    STRUCT_BODY,
    INSTANTIATION,
    INSTANCE,
    PORT_CONNECTION,
    IMPORT_DECL,
    IMPORT_ITEM,
    INCLUDE_DIRECTIVE,
    GENERATE_REGION,
    BLOCK,             // named/anonymous begin-end and generate blocks
    STATEMENT,
    EXPR,
    LABEL,
    NAME,              // declared identifier
    NAME_REF,          // identifier use, possibly qualified or hierarchical

    // Special
    ERROR,

    #[doc(hidden)]
    __LAST,
}

impl SyntaxKind {
    /// Check if this is a trivia token (whitespace, comment, inert directive)
    pub fn is_trivia(self) -> bool {
        matches!(
            self,
            Self::WHITESPACE | Self::LINE_COMMENT | Self::BLOCK_COMMENT | Self::DIRECTIVE
        )
    }

    /// Check if this is a keyword
    pub fn is_keyword(self) -> bool {
        (self as u16) >= (Self::MODULE_KW as u16) && (self as u16) <= (Self::KEYWORD as u16)
    }

    /// Keywords that open a data or net declaration
    pub fn starts_data_type(self) -> bool {
        matches!(
            self,
            Self::NET_TYPE_KW
                | Self::DATA_TYPE_KW
                | Self::SIGNING_KW
                | Self::VAR_KW
                | Self::CONST_KW
                | Self::ENUM_KW
                | Self::STRUCT_KW
                | Self::GENVAR_KW
        )
    }

    /// Port direction keywords
    pub fn is_direction(self) -> bool {
        matches!(
            self,
            Self::INPUT_KW | Self::OUTPUT_KW | Self::INOUT_KW | Self::REF_KW
        )
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

impl From<rowan::SyntaxKind> for SyntaxKind {
    fn from(raw: rowan::SyntaxKind) -> Self {
        assert!(raw.0 < SyntaxKind::__LAST as u16);
        // Safety: we control all syntax kinds and check bounds above
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw.0) }
    }
}

/// Language definition for Rowan
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VerilogLanguage {}

impl rowan::Language for VerilogLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        raw.into()
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        kind.into()
    }
}

/// Type aliases for convenience
pub type SyntaxNode = rowan::SyntaxNode<VerilogLanguage>;
pub type SyntaxToken = rowan::SyntaxToken<VerilogLanguage>;
pub type SyntaxElement = rowan::SyntaxElement<VerilogLanguage>;
