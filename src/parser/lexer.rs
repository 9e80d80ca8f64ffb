//! Logos-based lexer for Verilog/SystemVerilog
//!
//! Fast, lossless tokenization using the logos crate: every byte of the input
//! ends up in exactly one token, including whitespace and comments.

use super::syntax_kind::SyntaxKind;
use logos::Logos;
use rowan::TextSize;

/// A token with its kind, text, and position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: SyntaxKind,
    pub text: &'a str,
    pub offset: TextSize,
}

/// Lexer wrapping the logos-generated tokenizer
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, LogosToken>,
    offset: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: LogosToken::lexer(input),
            offset: 0,
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let logos_token = self.inner.next()?;
        let text = self.inner.slice();
        let offset = TextSize::new(self.offset);
        self.offset += text.len() as u32;

        let kind = match logos_token {
            Ok(t) => t.into(),
            Err(()) => SyntaxKind::ERROR,
        };

        Some(Token { kind, text, offset })
    }
}

/// Tokenize an entire string into a Vec
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Logos token enum - maps to SyntaxKind
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
pub enum LogosToken {
    // =========================================================================
    // TRIVIA
    // =========================================================================
    #[regex(r"[ \t\r\n\x0c]+")]
    Whitespace,

    #[regex(r"//[^\n]*")]
    LineComment,

    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    BlockComment,

    // =========================================================================
    // COMPILER DIRECTIVES
    // =========================================================================
    #[token("`include")]
    Include,

    // Macro definitions swallow the whole (possibly continued) line.
    #[regex(r"`define([^\n\\]|\\[^\n]|\\\r?\n)*")]
    #[regex(r"`(timescale|default_nettype|resetall|celldefine|endcelldefine|line|pragma|begin_keywords|end_keywords|undefineall|unconnected_drive|nounconnected_drive)[^\n]*")]
    #[regex(r"`(ifdef|ifndef|elsif|undef)[ \t]+[a-zA-Z_][a-zA-Z0-9_$]*")]
    #[regex(r"`[a-zA-Z_][a-zA-Z0-9_$]*")]
    Directive,

    // =========================================================================
    // LITERALS
    // =========================================================================
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_$]*")]
    #[regex(r"\\[!-~]+")]
    Ident,

    #[regex(r"\$[a-zA-Z0-9_$]+")]
    SystemIdent,

    #[regex(r"[0-9][0-9_]*")]
    #[regex(r"([0-9][0-9_]*)?'[sS]?[bBoOdDhH][0-9a-fA-FxXzZ?_]+")]
    #[regex(r"'[01xXzZ]")]
    #[regex(r"[0-9][0-9_]*\.[0-9][0-9_]*([eE][+-]?[0-9]+)?")]
    #[regex(r"[0-9][0-9_]*[eE][+-]?[0-9]+")]
    #[regex(r"[0-9][0-9_]*(\.[0-9][0-9_]*)?(s|ms|us|ns|ps|fs)")]
    Number,

    #[regex(r#""([^"\\\n]|\\[^\n])*""#)]
    String,

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,
    #[token(":")]
    Colon,
    #[token("::")]
    ColonColon,
    #[token("#")]
    Hash,
    #[token("@")]
    At,
    #[token("=")]
    Eq,
    #[token("'")]
    Apostrophe,

    // Operators the parser never branches on (longest match wins)
    #[token("==")]
    #[token("!=")]
    #[token("===")]
    #[token("!==")]
    #[token("==?")]
    #[token("!=?")]
    #[token("<=")]
    #[token(">=")]
    #[token("&&")]
    #[token("||")]
    #[token("<<")]
    #[token(">>")]
    #[token("<<<")]
    #[token(">>>")]
    #[token("**")]
    #[token("->")]
    #[token("<->")]
    #[token("++")]
    #[token("--")]
    #[token("+:")]
    #[token("-:")]
    #[token("+=")]
    #[token("-=")]
    #[token("*=")]
    #[token("/=")]
    #[token("%=")]
    #[token("&=")]
    #[token("|=")]
    #[token("^=")]
    #[token("<<=")]
    #[token(">>=")]
    #[token("~&")]
    #[token("~|")]
    #[token("~^")]
    #[token("^~")]
    #[token("|->")]
    #[token("|=>")]
    #[token("##")]
    #[token("+")]
    #[token("-")]
    #[token("*")]
    #[token("/")]
    #[token("%")]
    #[token("&")]
    #[token("|")]
    #[token("^")]
    #[token("~")]
    #[token("!")]
    #[token("<")]
    #[token(">")]
    #[token("?")]
    #[token("$")]
    Operator,

    // =========================================================================
    // KEYWORDS (longest match wins in logos, so identifiers with a keyword
    // prefix still lex as identifiers)
    // =========================================================================
    #[token("module")]
    #[token("macromodule")]
    ModuleKw,
    #[token("endmodule")]
    EndmoduleKw,
    #[token("interface")]
    InterfaceKw,
    #[token("endinterface")]
    EndinterfaceKw,
    #[token("program")]
    ProgramKw,
    #[token("endprogram")]
    EndprogramKw,
    #[token("package")]
    PackageKw,
    #[token("endpackage")]
    EndpackageKw,
    #[token("class")]
    ClassKw,
    #[token("endclass")]
    EndclassKw,
    #[token("function")]
    FunctionKw,
    #[token("endfunction")]
    EndfunctionKw,
    #[token("task")]
    TaskKw,
    #[token("endtask")]
    EndtaskKw,
    #[token("parameter")]
    ParameterKw,
    #[token("localparam")]
    LocalparamKw,
    #[token("input")]
    InputKw,
    #[token("output")]
    OutputKw,
    #[token("inout")]
    InoutKw,
    #[token("ref")]
    RefKw,

    #[token("wire")]
    #[token("tri")]
    #[token("tri0")]
    #[token("tri1")]
    #[token("triand")]
    #[token("trior")]
    #[token("trireg")]
    #[token("wand")]
    #[token("wor")]
    #[token("uwire")]
    #[token("supply0")]
    #[token("supply1")]
    NetTypeKw,

    #[token("reg")]
    #[token("logic")]
    #[token("bit")]
    #[token("byte")]
    #[token("shortint")]
    #[token("int")]
    #[token("longint")]
    #[token("integer")]
    #[token("time")]
    #[token("real")]
    #[token("realtime")]
    #[token("shortreal")]
    #[token("string")]
    #[token("event")]
    #[token("chandle")]
    #[token("void")]
    DataTypeKw,

    #[token("signed")]
    #[token("unsigned")]
    SigningKw,
    #[token("var")]
    VarKw,
    #[token("const")]
    ConstKw,
    #[token("static")]
    #[token("automatic")]
    LifetimeKw,
    #[token("typedef")]
    TypedefKw,
    #[token("enum")]
    EnumKw,
    #[token("struct")]
    #[token("union")]
    StructKw,
    #[token("packed")]
    PackedKw,
    #[token("import")]
    ImportKw,
    #[token("export")]
    ExportKw,
    #[token("assign")]
    AssignKw,

    #[token("always")]
    #[token("always_comb")]
    #[token("always_ff")]
    #[token("always_latch")]
    #[token("initial")]
    #[token("final")]
    ProcedureKw,

    #[token("begin")]
    BeginKw,
    #[token("end")]
    EndKw,
    #[token("fork")]
    ForkKw,
    #[token("join")]
    #[token("join_any")]
    #[token("join_none")]
    JoinKw,
    #[token("case")]
    #[token("casex")]
    #[token("casez")]
    #[token("randcase")]
    CaseKw,
    #[token("endcase")]
    EndcaseKw,
    #[token("if")]
    IfKw,
    #[token("else")]
    ElseKw,
    #[token("for")]
    ForKw,
    #[token("generate")]
    GenerateKw,
    #[token("endgenerate")]
    EndgenerateKw,
    #[token("genvar")]
    GenvarKw,
    #[token("extends")]
    ExtendsKw,
    #[token("virtual")]
    VirtualKw,

    #[token("while")]
    #[token("repeat")]
    #[token("forever")]
    #[token("do")]
    #[token("foreach")]
    #[token("return")]
    #[token("break")]
    #[token("continue")]
    #[token("posedge")]
    #[token("negedge")]
    #[token("edge")]
    #[token("or")]
    #[token("and")]
    #[token("not")]
    #[token("default")]
    #[token("unique")]
    #[token("unique0")]
    #[token("priority")]
    #[token("inside")]
    #[token("null")]
    #[token("this")]
    #[token("super")]
    #[token("new")]
    #[token("wait")]
    #[token("disable")]
    #[token("assert")]
    #[token("assume")]
    #[token("cover")]
    #[token("property")]
    #[token("endproperty")]
    #[token("sequence")]
    #[token("endsequence")]
    #[token("iff")]
    #[token("modport")]
    #[token("clocking")]
    #[token("endclocking")]
    #[token("with")]
    #[token("type")]
    #[token("extern")]
    #[token("pure")]
    #[token("local")]
    #[token("protected")]
    #[token("rand")]
    #[token("randc")]
    #[token("constraint")]
    #[token("force")]
    #[token("release")]
    #[token("deassign")]
    #[token("defparam")]
    #[token("tagged")]
    #[token("matches")]
    #[token("dist")]
    Keyword,
}

impl From<LogosToken> for SyntaxKind {
    fn from(token: LogosToken) -> Self {
        use LogosToken::*;
        match token {
            // Trivia
            Whitespace => SyntaxKind::WHITESPACE,
            LineComment => SyntaxKind::LINE_COMMENT,
            BlockComment => SyntaxKind::BLOCK_COMMENT,
            Directive => SyntaxKind::DIRECTIVE,
            Include => SyntaxKind::INCLUDE_KW,

            // Literals
            Ident => SyntaxKind::IDENT,
            SystemIdent => SyntaxKind::SYSTEM_IDENT,
            Number => SyntaxKind::NUMBER,
            String => SyntaxKind::STRING,

            // Punctuation
            LParen => SyntaxKind::L_PAREN,
            RParen => SyntaxKind::R_PAREN,
            LBracket => SyntaxKind::L_BRACKET,
            RBracket => SyntaxKind::R_BRACKET,
            LBrace => SyntaxKind::L_BRACE,
            RBrace => SyntaxKind::R_BRACE,
            Semicolon => SyntaxKind::SEMICOLON,
            Comma => SyntaxKind::COMMA,
            Dot => SyntaxKind::DOT,
            Colon => SyntaxKind::COLON,
            ColonColon => SyntaxKind::COLON_COLON,
            Hash => SyntaxKind::HASH,
            At => SyntaxKind::AT,
            Eq => SyntaxKind::EQ,
            Apostrophe => SyntaxKind::APOSTROPHE,
            Operator => SyntaxKind::OPERATOR,

            // Keywords
            ModuleKw => SyntaxKind::MODULE_KW,
            EndmoduleKw => SyntaxKind::ENDMODULE_KW,
            InterfaceKw => SyntaxKind::INTERFACE_KW,
            EndinterfaceKw => SyntaxKind::ENDINTERFACE_KW,
            ProgramKw => SyntaxKind::PROGRAM_KW,
            EndprogramKw => SyntaxKind::ENDPROGRAM_KW,
            PackageKw => SyntaxKind::PACKAGE_KW,
            EndpackageKw => SyntaxKind::ENDPACKAGE_KW,
            ClassKw => SyntaxKind::CLASS_KW,
            EndclassKw => SyntaxKind::ENDCLASS_KW,
            FunctionKw => SyntaxKind::FUNCTION_KW,
            EndfunctionKw => SyntaxKind::ENDFUNCTION_KW,
            TaskKw => SyntaxKind::TASK_KW,
            EndtaskKw => SyntaxKind::ENDTASK_KW,
            ParameterKw => SyntaxKind::PARAMETER_KW,
            LocalparamKw => SyntaxKind::LOCALPARAM_KW,
            InputKw => SyntaxKind::INPUT_KW,
            OutputKw => SyntaxKind::OUTPUT_KW,
            InoutKw => SyntaxKind::INOUT_KW,
            RefKw => SyntaxKind::REF_KW,
            NetTypeKw => SyntaxKind::NET_TYPE_KW,
            DataTypeKw => SyntaxKind::DATA_TYPE_KW,
            SigningKw => SyntaxKind::SIGNING_KW,
            VarKw => SyntaxKind::VAR_KW,
            ConstKw => SyntaxKind::CONST_KW,
            LifetimeKw => SyntaxKind::LIFETIME_KW,
            TypedefKw => SyntaxKind::TYPEDEF_KW,
            EnumKw => SyntaxKind::ENUM_KW,
            StructKw => SyntaxKind::STRUCT_KW,
            PackedKw => SyntaxKind::PACKED_KW,
            ImportKw => SyntaxKind::IMPORT_KW,
            ExportKw => SyntaxKind::EXPORT_KW,
            AssignKw => SyntaxKind::ASSIGN_KW,
            ProcedureKw => SyntaxKind::PROCEDURE_KW,
            BeginKw => SyntaxKind::BEGIN_KW,
            EndKw => SyntaxKind::END_KW,
            ForkKw => SyntaxKind::FORK_KW,
            JoinKw => SyntaxKind::JOIN_KW,
            CaseKw => SyntaxKind::CASE_KW,
            EndcaseKw => SyntaxKind::ENDCASE_KW,
            IfKw => SyntaxKind::IF_KW,
            ElseKw => SyntaxKind::ELSE_KW,
            ForKw => SyntaxKind::FOR_KW,
            GenerateKw => SyntaxKind::GENERATE_KW,
            EndgenerateKw => SyntaxKind::ENDGENERATE_KW,
            GenvarKw => SyntaxKind::GENVAR_KW,
            ExtendsKw => SyntaxKind::EXTENDS_KW,
            VirtualKw => SyntaxKind::VIRTUAL_KW,
            Keyword => SyntaxKind::KEYWORD,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(input: &str) -> Vec<SyntaxKind> {
        Lexer::new(input)
            .map(|t| t.kind)
            .filter(|k| !k.is_trivia())
            .collect()
    }

    #[test]
    fn test_lex_module_header() {
        let tokens: Vec<_> = Lexer::new("module foo;").collect();
        assert_eq!(tokens.len(), 4); // module, whitespace, foo, ;
        assert_eq!(tokens[0].kind, SyntaxKind::MODULE_KW);
        assert_eq!(tokens[1].kind, SyntaxKind::WHITESPACE);
        assert_eq!(tokens[2].kind, SyntaxKind::IDENT);
        assert_eq!(tokens[2].text, "foo");
        assert_eq!(tokens[2].offset, TextSize::new(7));
        assert_eq!(tokens[3].kind, SyntaxKind::SEMICOLON);
    }

    #[test]
    fn test_lex_keyword_prefix_is_identifier() {
        assert_eq!(kinds("module_a"), vec![SyntaxKind::IDENT]);
        assert_eq!(kinds("endmodule_x"), vec![SyntaxKind::IDENT]);
        assert_eq!(kinds("wire"), vec![SyntaxKind::NET_TYPE_KW]);
    }

    #[test]
    fn test_lex_qualified_name() {
        assert_eq!(
            kinds("pkg::item"),
            vec![
                SyntaxKind::IDENT,
                SyntaxKind::COLON_COLON,
                SyntaxKind::IDENT
            ]
        );
    }

    #[test]
    fn test_lex_numbers() {
        for literal in ["42", "8'hFF", "4'b10_10", "'0", "1.5", "3e4", "10ns", "'sd3"] {
            assert_eq!(kinds(literal), vec![SyntaxKind::NUMBER], "{literal}");
        }
    }

    #[test]
    fn test_lex_directives_are_trivia() {
        let source = "`timescale 1ns/1ps\n`define WIDTH 8 \\\n  + 1\n`ifdef FOO\nmodule m; endmodule\n`endif\n";
        assert_eq!(
            kinds(source),
            vec![
                SyntaxKind::MODULE_KW,
                SyntaxKind::IDENT,
                SyntaxKind::SEMICOLON,
                SyntaxKind::ENDMODULE_KW
            ]
        );
    }

    #[test]
    fn test_lex_include_directive() {
        assert_eq!(
            kinds("`include \"defs.svh\""),
            vec![SyntaxKind::INCLUDE_KW, SyntaxKind::STRING]
        );
    }

    #[test]
    fn test_lex_comments() {
        assert_eq!(
            kinds("a /* block ** comment */ b // line\nc"),
            vec![SyntaxKind::IDENT, SyntaxKind::IDENT, SyntaxKind::IDENT]
        );
    }

    #[test]
    fn test_lex_special_identifiers() {
        assert_eq!(kinds("$display"), vec![SyntaxKind::SYSTEM_IDENT]);
        assert_eq!(kinds("\\bus[0] "), vec![SyntaxKind::IDENT]);
    }

    #[test]
    fn test_lex_is_lossless() {
        let source = "module top(input logic clk);\n  foo #(.W(8)) u0 (.a(clk));\nendmodule // done\n";
        let rebuilt: String = Lexer::new(source).map(|t| t.text).collect();
        assert_eq!(rebuilt, source);
    }

    #[test]
    fn test_lex_operators() {
        assert_eq!(
            kinds("a <= b == c"),
            vec![
                SyntaxKind::IDENT,
                SyntaxKind::OPERATOR,
                SyntaxKind::IDENT,
                SyntaxKind::OPERATOR,
                SyntaxKind::IDENT
            ]
        );
        assert_eq!(kinds("="), vec![SyntaxKind::EQ]);
    }
}
