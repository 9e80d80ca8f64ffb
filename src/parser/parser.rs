//! Recursive descent parser for Verilog/SystemVerilog
//!
//! Builds a rowan GreenNode tree from tokens.
//! Supports error recovery and produces a lossless CST. The grammar covers the
//! declaration structure (design units, ports, parameters, data, typedefs,
//! instances, subroutines, generate and procedural blocks); expressions are
//! kept flat, with identifier uses wrapped in `NAME_REF` nodes.

use super::lexer::{Lexer, Token};
use super::syntax_kind::SyntaxKind;
use rowan::{Checkpoint, GreenNode, GreenNodeBuilder, TextRange, TextSize};

/// Parse result containing the green tree and any errors
#[derive(Debug, Clone)]
pub struct Parse {
    pub green: GreenNode,
    pub errors: Vec<SyntaxError>,
}

impl Parse {
    /// Get the root syntax node
    pub fn syntax(&self) -> super::SyntaxNode {
        super::SyntaxNode::new_root(self.green.clone())
    }

    /// Check if parsing succeeded without errors
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A syntax error with location and message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    pub range: TextRange,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            message: message.into(),
            range,
        }
    }
}

/// Parse Verilog/SystemVerilog source code into a CST
pub fn parse(input: &str) -> Parse {
    let tokens: Vec<_> = Lexer::new(input).collect();
    let mut parser = Parser::new(&tokens);
    parser.parse_source_file();
    parser.finish()
}

/// Whether a body is made of procedural statements or design items.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyMode {
    Statement,
    Item,
}

/// Keywords that close a construct; expressions and item lists never run past them.
const CLOSERS: &[SyntaxKind] = &[
    SyntaxKind::ENDMODULE_KW,
    SyntaxKind::ENDINTERFACE_KW,
    SyntaxKind::ENDPROGRAM_KW,
    SyntaxKind::ENDPACKAGE_KW,
    SyntaxKind::ENDCLASS_KW,
    SyntaxKind::ENDFUNCTION_KW,
    SyntaxKind::ENDTASK_KW,
    SyntaxKind::ENDGENERATE_KW,
    SyntaxKind::ENDCASE_KW,
    SyntaxKind::END_KW,
    SyntaxKind::JOIN_KW,
];

/// Keywords that can only start a new statement or item.
const STATEMENT_STARTERS: &[SyntaxKind] = &[
    SyntaxKind::MODULE_KW,
    SyntaxKind::INTERFACE_KW,
    SyntaxKind::PROGRAM_KW,
    SyntaxKind::PACKAGE_KW,
    SyntaxKind::CLASS_KW,
    SyntaxKind::FUNCTION_KW,
    SyntaxKind::TASK_KW,
    SyntaxKind::BEGIN_KW,
    SyntaxKind::FORK_KW,
    SyntaxKind::IF_KW,
    SyntaxKind::ELSE_KW,
    SyntaxKind::FOR_KW,
    SyntaxKind::CASE_KW,
    SyntaxKind::ASSIGN_KW,
    SyntaxKind::PROCEDURE_KW,
    SyntaxKind::GENERATE_KW,
    SyntaxKind::TYPEDEF_KW,
    SyntaxKind::IMPORT_KW,
    SyntaxKind::PARAMETER_KW,
    SyntaxKind::LOCALPARAM_KW,
];

/// Class member qualifiers that may precede a declaration.
const QUALIFIERS: &[&str] = &["extern", "pure", "local", "protected", "rand", "randc"];

/// The parser state
struct Parser<'a> {
    tokens: &'a [Token<'a>],
    pos: usize,
    builder: GreenNodeBuilder<'static>,
    errors: Vec<SyntaxError>,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token<'a>]) -> Self {
        Self {
            tokens,
            pos: 0,
            builder: GreenNodeBuilder::new(),
            errors: Vec::new(),
        }
    }

    fn finish(self) -> Parse {
        Parse {
            green: self.builder.finish(),
            errors: self.errors,
        }
    }

    // =========================================================================
    // Token inspection (all lookahead skips trivia)
    // =========================================================================

    /// The n-th significant token from the current position
    fn nth_token(&self, n: usize) -> Option<&Token<'a>> {
        self.tokens[self.pos..]
            .iter()
            .filter(|t| !t.kind.is_trivia())
            .nth(n)
    }

    fn nth(&self, n: usize) -> SyntaxKind {
        self.nth_token(n).map(|t| t.kind).unwrap_or(SyntaxKind::ERROR)
    }

    fn nth_text(&self, n: usize) -> &str {
        self.nth_token(n).map(|t| t.text).unwrap_or("")
    }

    fn current_kind(&self) -> SyntaxKind {
        self.nth(0)
    }

    fn current_text(&self) -> &str {
        self.nth_text(0)
    }

    fn at(&self, kind: SyntaxKind) -> bool {
        !self.at_eof() && self.current_kind() == kind
    }

    fn at_any(&self, kinds: &[SyntaxKind]) -> bool {
        !self.at_eof() && kinds.contains(&self.current_kind())
    }

    fn at_keyword(&self, text: &str) -> bool {
        self.at(SyntaxKind::KEYWORD) && self.current_text() == text
    }

    fn at_eof(&self) -> bool {
        self.nth_token(0).is_none()
    }

    // =========================================================================
    // Token consumption
    // =========================================================================

    fn skip_trivia(&mut self) {
        while let Some(token) = self.tokens.get(self.pos) {
            if !token.kind.is_trivia() {
                break;
            }
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }

    /// Consume the next significant token (and the trivia before it)
    fn bump(&mut self) {
        self.skip_trivia();
        if let Some(token) = self.tokens.get(self.pos) {
            self.builder.token(token.kind.into(), token.text);
            self.pos += 1;
        }
    }

    fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.at(kind) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: SyntaxKind) -> bool {
        if self.eat(kind) {
            true
        } else {
            self.error(format!("expected {:?}", kind));
            false
        }
    }

    // =========================================================================
    // Error handling
    // =========================================================================

    fn error(&mut self, message: impl Into<String>) {
        let range = match self.nth_token(0) {
            Some(t) => TextRange::at(t.offset, TextSize::of(t.text)),
            None => {
                let end = self
                    .tokens
                    .last()
                    .map(|t| t.offset + TextSize::of(t.text))
                    .unwrap_or_default();
                TextRange::empty(end)
            }
        };
        self.errors.push(SyntaxError::new(message, range));
    }

    /// Report an error and skip tokens until one of `recovery` (or a closer).
    fn error_recover(&mut self, message: impl Into<String>, recovery: &[SyntaxKind]) {
        self.error(message);
        self.start_node(SyntaxKind::ERROR);
        // Always consume at least one token to make progress
        let mut consumed = false;
        while !self.at_eof() && !self.at_any(recovery) && !(consumed && self.at_any(CLOSERS)) {
            self.bump();
            consumed = true;
        }
        if !consumed && !self.at_eof() {
            self.bump();
        }
        self.finish_node();
    }

    // =========================================================================
    // Node building helpers
    // =========================================================================

    fn start_node(&mut self, kind: SyntaxKind) {
        self.skip_trivia();
        self.builder.start_node(kind.into());
    }

    fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    fn checkpoint(&mut self) -> Checkpoint {
        self.skip_trivia();
        self.builder.checkpoint()
    }

    fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind.into());
    }

    // =========================================================================
    // Lookahead helpers
    // =========================================================================

    /// Skip `IDENT (:: IDENT)*` starting at significant index `n`.
    fn skip_type_path(&self, n: usize) -> Option<usize> {
        if self.nth(n) != SyntaxKind::IDENT {
            return None;
        }
        let mut n = n + 1;
        while self.nth(n) == SyntaxKind::COLON_COLON && self.nth(n + 1) == SyntaxKind::IDENT {
            n += 2;
        }
        Some(n)
    }

    /// Skip a balanced group opened at significant index `n`.
    fn skip_balanced(&self, n: usize) -> usize {
        let mut depth = 0usize;
        let mut n = n;
        loop {
            match self.nth(n) {
                SyntaxKind::L_PAREN | SyntaxKind::L_BRACKET | SyntaxKind::L_BRACE => depth += 1,
                SyntaxKind::R_PAREN | SyntaxKind::R_BRACKET | SyntaxKind::R_BRACE => {
                    depth = depth.saturating_sub(1);
                }
                _ if self.nth_token(n).is_none() => return n,
                _ => {}
            }
            n += 1;
            if depth == 0 {
                return n;
            }
        }
    }

    fn skip_dims(&self, mut n: usize) -> usize {
        while self.nth(n) == SyntaxKind::L_BRACKET {
            n = self.skip_balanced(n);
        }
        n
    }

    /// Is the identifier at the cursor the start of a user-defined type?
    fn ident_is_type(&self) -> bool {
        let Some(mut n) = self.skip_type_path(0) else {
            return false;
        };
        if self.nth(n) == SyntaxKind::HASH && self.nth(n + 1) == SyntaxKind::L_PAREN {
            n = self.skip_balanced(n + 1);
        }
        n = self.skip_dims(n);
        match self.nth(n) {
            SyntaxKind::IDENT => true,
            // interface port with modport: `bus_if.master b`
            SyntaxKind::DOT => {
                self.nth(n + 1) == SyntaxKind::IDENT && self.nth(n + 2) == SyntaxKind::IDENT
            }
            _ => false,
        }
    }

    /// Is the identifier at the cursor the start of a module instantiation?
    fn ident_is_instantiation(&self) -> bool {
        let Some(n) = self.skip_type_path(0) else {
            return false;
        };
        match self.nth(n) {
            SyntaxKind::HASH => true,
            SyntaxKind::IDENT => {
                let after = self.skip_dims(n + 1);
                self.nth(after) == SyntaxKind::L_PAREN
            }
            _ => false,
        }
    }

    /// Number of leading qualifier tokens (`virtual`, `static`, `local`, ...)
    fn qualifier_run(&self) -> usize {
        let mut n = 0;
        loop {
            let kind = self.nth(n);
            let is_qualifier = matches!(kind, SyntaxKind::VIRTUAL_KW | SyntaxKind::LIFETIME_KW)
                || (kind == SyntaxKind::KEYWORD && QUALIFIERS.contains(&self.nth_text(n)));
            if !is_qualifier {
                return n;
            }
            n += 1;
        }
    }

    // =========================================================================
    // Grammar rules: design units
    // =========================================================================

    /// SourceFile = Item*
    fn parse_source_file(&mut self) {
        self.start_node(SyntaxKind::SOURCE_FILE);

        while !self.at_eof() {
            let pos_before = self.pos;
            self.parse_item();
            // Safety: if we didn't make progress, force-skip a token
            if self.pos == pos_before && !self.at_eof() {
                self.error_recover(
                    format!("unexpected token: {:?}", self.current_kind()),
                    &[SyntaxKind::SEMICOLON],
                );
            }
        }
        // Trailing trivia belongs to the file
        self.skip_trivia();

        self.finish_node();
    }

    /// Items until one of `end` (not consumed). Stops at foreign closers.
    fn parse_items_until(&mut self, end: &[SyntaxKind]) {
        while !self.at_eof() && !self.at_any(end) {
            if self.at_any(CLOSERS) {
                self.error(format!("unexpected {:?}", self.current_kind()));
                return;
            }
            let pos_before = self.pos;
            self.parse_item();
            if self.pos == pos_before {
                self.error_recover(
                    format!("unexpected token: {:?}", self.current_kind()),
                    &[SyntaxKind::SEMICOLON],
                );
            }
        }
    }

    /// Item = DesignUnit | Declaration | Instantiation | Generate | Procedure | ...
    fn parse_item(&mut self) {
        match self.current_kind() {
            SyntaxKind::MODULE_KW | SyntaxKind::INTERFACE_KW | SyntaxKind::PROGRAM_KW => {
                self.parse_module_like()
            }
            SyntaxKind::PACKAGE_KW => self.parse_package(),
            SyntaxKind::CLASS_KW => self.parse_class(),
            SyntaxKind::FUNCTION_KW | SyntaxKind::TASK_KW => self.parse_subroutine(),
            SyntaxKind::VIRTUAL_KW | SyntaxKind::LIFETIME_KW | SyntaxKind::KEYWORD
                if self.qualifier_run() > 0 =>
            {
                let n = self.qualifier_run();
                match self.nth(n) {
                    SyntaxKind::FUNCTION_KW | SyntaxKind::TASK_KW => self.parse_subroutine(),
                    SyntaxKind::CLASS_KW => self.parse_class(),
                    _ => self.parse_data_decl(),
                }
            }
            SyntaxKind::PARAMETER_KW | SyntaxKind::LOCALPARAM_KW => self.parse_param_decl(),
            SyntaxKind::TYPEDEF_KW => self.parse_typedef(),
            SyntaxKind::IMPORT_KW => self.parse_import(),
            SyntaxKind::INCLUDE_KW => self.parse_include(),
            kind if kind.is_direction() || kind.starts_data_type() => self.parse_data_decl(),
            SyntaxKind::ASSIGN_KW => self.parse_simple_statement(),
            SyntaxKind::PROCEDURE_KW => {
                self.start_node(SyntaxKind::STATEMENT);
                self.bump();
                self.parse_statement();
                self.finish_node();
            }
            SyntaxKind::GENERATE_KW => self.parse_generate_region(),
            SyntaxKind::IF_KW => self.parse_if(BodyMode::Item),
            SyntaxKind::FOR_KW => self.parse_for(BodyMode::Item),
            SyntaxKind::CASE_KW => self.parse_case(BodyMode::Item),
            SyntaxKind::BEGIN_KW => self.parse_block(BodyMode::Item),
            SyntaxKind::IDENT if self.ident_is_instantiation() => self.parse_instantiation(),
            SyntaxKind::IDENT if self.ident_is_type() => self.parse_data_decl(),
            SyntaxKind::SEMICOLON => self.bump(),
            SyntaxKind::KEYWORD | SyntaxKind::EXPORT_KW | SyntaxKind::IDENT => {
                self.parse_generic_item()
            }
            _ => {
                self.error_recover(
                    format!("unexpected token: {:?}", self.current_kind()),
                    &[SyntaxKind::SEMICOLON],
                );
                self.eat(SyntaxKind::SEMICOLON);
            }
        }
    }

    /// ModuleDecl = ('module' | 'interface' | 'program') lifetime? Name
    ///              Import* ParamPortList? PortList? ';' Item* end Label?
    fn parse_module_like(&mut self) {
        let end = match self.current_kind() {
            SyntaxKind::INTERFACE_KW => SyntaxKind::ENDINTERFACE_KW,
            SyntaxKind::PROGRAM_KW => SyntaxKind::ENDPROGRAM_KW,
            _ => SyntaxKind::ENDMODULE_KW,
        };
        self.start_node(SyntaxKind::MODULE_DECL);
        self.bump();
        self.eat(SyntaxKind::LIFETIME_KW);
        self.parse_name();

        while self.at(SyntaxKind::IMPORT_KW) {
            self.parse_import();
        }
        if self.at(SyntaxKind::HASH) {
            self.parse_param_port_list();
        }
        if self.at(SyntaxKind::L_PAREN) {
            self.parse_port_list(false);
        }
        self.expect(SyntaxKind::SEMICOLON);

        self.parse_items_until(&[end]);
        if self.expect(end) {
            self.parse_end_label();
        }
        self.finish_node();
    }

    /// PackageDecl = 'package' lifetime? Name ';' Item* 'endpackage' Label?
    fn parse_package(&mut self) {
        self.start_node(SyntaxKind::PACKAGE_DECL);
        self.bump();
        self.eat(SyntaxKind::LIFETIME_KW);
        self.parse_name();
        self.expect(SyntaxKind::SEMICOLON);

        self.parse_items_until(&[SyntaxKind::ENDPACKAGE_KW]);
        if self.expect(SyntaxKind::ENDPACKAGE_KW) {
            self.parse_end_label();
        }
        self.finish_node();
    }

    /// ClassDecl = 'virtual'? 'class' lifetime? Name ParamPortList?
    ///             ('extends' TypeRef ParamValues? Args?)? ';' Item* 'endclass' Label?
    fn parse_class(&mut self) {
        self.start_node(SyntaxKind::CLASS_DECL);
        while !self.at(SyntaxKind::CLASS_KW) && !self.at_eof() {
            self.bump(); // qualifiers
        }
        self.expect(SyntaxKind::CLASS_KW);
        self.eat(SyntaxKind::LIFETIME_KW);
        self.parse_name();
        if self.at(SyntaxKind::HASH) {
            self.parse_param_port_list();
        }
        if self.eat(SyntaxKind::EXTENDS_KW) {
            self.start_node(SyntaxKind::DATA_TYPE);
            if self.at(SyntaxKind::IDENT) {
                self.parse_name_ref(false);
            } else {
                self.error("expected base class name");
            }
            if self.eat(SyntaxKind::HASH) && self.at(SyntaxKind::L_PAREN) {
                self.parse_paren_expr();
            }
            self.finish_node();
            if self.at(SyntaxKind::L_PAREN) {
                self.parse_paren_expr();
            }
        }
        // implements clauses and anything else up to the header end
        if !self.at(SyntaxKind::SEMICOLON) {
            self.parse_expr_until(&[SyntaxKind::SEMICOLON]);
        }
        self.expect(SyntaxKind::SEMICOLON);

        self.parse_items_until(&[SyntaxKind::ENDCLASS_KW]);
        if self.expect(SyntaxKind::ENDCLASS_KW) {
            self.parse_end_label();
        }
        self.finish_node();
    }

    /// Subroutine = qualifiers ('function' | 'task') lifetime? ReturnType? Name
    ///              PortList? ';' Statement* end Label?
    ///
    /// `extern` and `pure` prototypes have no body.
    fn parse_subroutine(&mut self) {
        let qualifiers = self.qualifier_run();
        let is_prototype = (0..qualifiers).any(|n| matches!(self.nth_text(n), "extern" | "pure"));
        let (node, end) = if self.nth(qualifiers) == SyntaxKind::TASK_KW {
            (SyntaxKind::TASK_DECL, SyntaxKind::ENDTASK_KW)
        } else {
            (SyntaxKind::FUNCTION_DECL, SyntaxKind::ENDFUNCTION_KW)
        };

        self.start_node(node);
        for _ in 0..qualifiers {
            self.bump();
        }
        self.bump(); // function / task
        self.eat(SyntaxKind::LIFETIME_KW);

        // Return type: anything before the name
        let has_return_type = match self.current_kind() {
            SyntaxKind::IDENT => {
                self.ident_is_type()
                    && !(self.nth(1) == SyntaxKind::COLON_COLON && self.nth(3) == SyntaxKind::L_PAREN)
            }
            kind => kind.starts_data_type() || kind == SyntaxKind::L_BRACKET,
        };
        if has_return_type {
            self.parse_data_type_opt();
        }

        // Out-of-class method body: `function void cls::name(...)`
        if self.at(SyntaxKind::IDENT) && self.nth(1) == SyntaxKind::COLON_COLON {
            self.start_node(SyntaxKind::NAME_REF);
            self.bump();
            self.finish_node();
            self.bump(); // ::
        }
        if self.at_keyword("new") {
            self.start_node(SyntaxKind::NAME);
            self.bump();
            self.finish_node();
        } else {
            self.parse_name();
        }

        if self.at(SyntaxKind::L_PAREN) {
            self.parse_port_list(true);
        }
        self.expect(SyntaxKind::SEMICOLON);

        if !is_prototype {
            self.parse_statements_until(&[end]);
            if self.expect(end) {
                self.parse_end_label();
            }
        }
        self.finish_node();
    }

    // =========================================================================
    // Grammar rules: ports and parameters
    // =========================================================================

    /// ParamPortList = '#' '(' (ParamDecl (',' ParamDecl)*)? ')'
    fn parse_param_port_list(&mut self) {
        self.start_node(SyntaxKind::PARAM_PORT_LIST);
        self.expect(SyntaxKind::HASH);
        if self.expect(SyntaxKind::L_PAREN) {
            while !self.at_eof() && !self.at(SyntaxKind::R_PAREN) && !self.at_any(CLOSERS) {
                let pos_before = self.pos;
                self.start_node(SyntaxKind::PARAM_DECL);
                if self.at_any(&[SyntaxKind::PARAMETER_KW, SyntaxKind::LOCALPARAM_KW]) {
                    self.bump();
                }
                if self.at_keyword("type") {
                    self.bump();
                } else {
                    self.parse_data_type_opt();
                }
                self.parse_declarator(&[SyntaxKind::COMMA, SyntaxKind::R_PAREN]);
                self.finish_node();
                if !self.eat(SyntaxKind::COMMA) {
                    if self.pos == pos_before {
                        self.error_recover(
                            "malformed parameter",
                            &[SyntaxKind::COMMA, SyntaxKind::R_PAREN],
                        );
                        continue;
                    }
                    break;
                }
            }
            self.expect(SyntaxKind::R_PAREN);
        }
        self.finish_node();
    }

    /// PortList = '(' (PortEntry (',' PortEntry)*)? ')'
    ///
    /// ANSI entries become `PORT_DECL` nodes; non-ANSI entries are plain name
    /// references to declarations in the body. Subroutine port lists are
    /// always ANSI.
    fn parse_port_list(&mut self, always_ansi: bool) {
        self.start_node(SyntaxKind::PORT_LIST);
        self.expect(SyntaxKind::L_PAREN);
        let mut ansi = always_ansi;

        while !self.at_eof() && !self.at(SyntaxKind::R_PAREN) && !self.at_any(CLOSERS) {
            let pos_before = self.pos;
            let kind = self.current_kind();
            let starts_decl = kind.is_direction()
                || kind.starts_data_type()
                || kind == SyntaxKind::VIRTUAL_KW
                || kind == SyntaxKind::INTERFACE_KW
                || (kind == SyntaxKind::IDENT && self.ident_is_type());

            if starts_decl || (ansi && kind == SyntaxKind::IDENT) {
                ansi = true;
                self.start_node(SyntaxKind::PORT_DECL);
                if self.current_kind().is_direction() {
                    self.bump();
                }
                self.eat(SyntaxKind::INTERFACE_KW);
                self.parse_data_type_opt();
                self.parse_declarator(&[SyntaxKind::COMMA, SyntaxKind::R_PAREN]);
                self.finish_node();
            } else if !self.at(SyntaxKind::COMMA) {
                // non-ANSI: `(a, b[3:0], .c(d))`
                self.parse_expr_until(&[SyntaxKind::COMMA, SyntaxKind::R_PAREN]);
            }

            if !self.eat(SyntaxKind::COMMA) {
                if self.pos == pos_before {
                    self.error_recover("malformed port", &[SyntaxKind::COMMA, SyntaxKind::R_PAREN]);
                    continue;
                }
                break;
            }
        }
        self.expect(SyntaxKind::R_PAREN);
        self.finish_node();
    }

    // =========================================================================
    // Grammar rules: declarations
    // =========================================================================

    /// Name = IDENT
    fn parse_name(&mut self) {
        if self.at(SyntaxKind::IDENT) {
            self.start_node(SyntaxKind::NAME);
            self.bump();
            self.finish_node();
        } else {
            self.error("expected identifier");
        }
    }

    /// EndLabel = ':' IDENT
    fn parse_end_label(&mut self) {
        if self.at(SyntaxKind::COLON) && self.nth(1) == SyntaxKind::IDENT {
            self.start_node(SyntaxKind::LABEL);
            self.bump();
            self.bump();
            self.finish_node();
        }
    }

    /// BlockLabel = ':' Name
    fn parse_block_label(&mut self) {
        if self.at(SyntaxKind::COLON) && self.nth(1) == SyntaxKind::IDENT {
            self.start_node(SyntaxKind::LABEL);
            self.bump();
            self.parse_name();
            self.finish_node();
        }
    }

    /// DataType = (keyword | qualifier | EnumBody | StructBody | TypeRef | Dims)+
    ///
    /// Returns false (and builds nothing) when no type is present.
    fn parse_data_type_opt(&mut self) -> bool {
        let checkpoint = self.checkpoint();
        let mut any = false;
        let mut has_user_type = false;

        loop {
            match self.current_kind() {
                SyntaxKind::NET_TYPE_KW
                | SyntaxKind::DATA_TYPE_KW
                | SyntaxKind::SIGNING_KW
                | SyntaxKind::VAR_KW
                | SyntaxKind::CONST_KW
                | SyntaxKind::LIFETIME_KW
                | SyntaxKind::GENVAR_KW => self.bump(),
                SyntaxKind::KEYWORD if QUALIFIERS.contains(&self.current_text()) => self.bump(),
                SyntaxKind::VIRTUAL_KW => {
                    self.bump();
                    self.eat(SyntaxKind::INTERFACE_KW);
                }
                SyntaxKind::ENUM_KW => self.parse_enum_body(),
                SyntaxKind::STRUCT_KW => self.parse_struct_body(),
                SyntaxKind::L_BRACKET => self.parse_dims(),
                SyntaxKind::IDENT if !has_user_type && self.ident_is_type() => {
                    has_user_type = true;
                    self.parse_name_ref(false);
                    if self.at(SyntaxKind::HASH) && self.nth(1) == SyntaxKind::L_PAREN {
                        self.bump();
                        self.parse_paren_expr();
                    }
                    // modport selection: `bus_if.master`
                    if self.at(SyntaxKind::DOT) && self.nth(1) == SyntaxKind::IDENT {
                        self.bump();
                        self.bump();
                    }
                }
                _ => break,
            }
            any = true;
        }

        if any {
            self.start_node_at(checkpoint, SyntaxKind::DATA_TYPE);
            self.finish_node();
        }
        any
    }

    /// Dims = ('[' Expr ']')*
    fn parse_dims(&mut self) {
        while self.at(SyntaxKind::L_BRACKET) {
            self.bump();
            self.parse_expr_until(&[SyntaxKind::R_BRACKET]);
            self.expect(SyntaxKind::R_BRACKET);
        }
    }

    /// EnumBody = 'enum' BaseType? '{' EnumMember (',' EnumMember)* '}'
    fn parse_enum_body(&mut self) {
        self.start_node(SyntaxKind::ENUM_BODY);
        self.expect(SyntaxKind::ENUM_KW);
        while !self.at_eof() && !self.at(SyntaxKind::L_BRACE) {
            match self.current_kind() {
                SyntaxKind::DATA_TYPE_KW | SyntaxKind::NET_TYPE_KW | SyntaxKind::SIGNING_KW => {
                    self.bump()
                }
                SyntaxKind::L_BRACKET => self.parse_dims(),
                SyntaxKind::IDENT => self.parse_name_ref(false),
                _ => break,
            }
        }
        if self.expect(SyntaxKind::L_BRACE) {
            while !self.at_eof() && !self.at(SyntaxKind::R_BRACE) && !self.at_any(CLOSERS) {
                let pos_before = self.pos;
                self.start_node(SyntaxKind::ENUM_MEMBER);
                self.parse_name();
                self.parse_dims();
                if self.eat(SyntaxKind::EQ) {
                    self.parse_expr_until(&[SyntaxKind::COMMA, SyntaxKind::R_BRACE]);
                }
                self.finish_node();
                if !self.eat(SyntaxKind::COMMA) {
                    if self.pos == pos_before {
                        self.error_recover(
                            "malformed enum member",
                            &[SyntaxKind::COMMA, SyntaxKind::R_BRACE],
                        );
                        continue;
                    }
                    break;
                }
            }
            self.expect(SyntaxKind::R_BRACE);
        }
        self.finish_node();
    }

    /// StructBody = ('struct' | 'union') 'packed'? signing? '{' DataDecl* '}'
    fn parse_struct_body(&mut self) {
        self.start_node(SyntaxKind::STRUCT_BODY);
        self.expect(SyntaxKind::STRUCT_KW);
        self.eat(SyntaxKind::PACKED_KW);
        self.eat(SyntaxKind::SIGNING_KW);
        if self.expect(SyntaxKind::L_BRACE) {
            while !self.at_eof() && !self.at(SyntaxKind::R_BRACE) && !self.at_any(CLOSERS) {
                let pos_before = self.pos;
                self.parse_data_decl();
                if self.pos == pos_before {
                    self.error_recover("malformed struct member", &[SyntaxKind::SEMICOLON]);
                    self.eat(SyntaxKind::SEMICOLON);
                }
            }
            self.expect(SyntaxKind::R_BRACE);
        }
        self.finish_node();
    }

    /// Declarator = Name Dims ('=' Expr)?
    fn parse_declarator(&mut self, terminators: &[SyntaxKind]) {
        self.start_node(SyntaxKind::DECLARATOR);
        self.parse_name();
        self.parse_dims();
        if self.eat(SyntaxKind::EQ) {
            self.parse_expr_until(terminators);
        }
        self.finish_node();
    }

    /// DataDecl = direction? DataType? Declarator (',' Declarator)* ';'
    fn parse_data_decl(&mut self) {
        self.start_node(SyntaxKind::DATA_DECL);
        if self.current_kind().is_direction() {
            self.bump();
        }
        self.parse_data_type_opt();
        loop {
            self.parse_declarator(&[SyntaxKind::COMMA, SyntaxKind::SEMICOLON]);
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        if !self.eat(SyntaxKind::SEMICOLON) {
            self.error_recover("expected ';' after declaration", &[SyntaxKind::SEMICOLON]);
            self.eat(SyntaxKind::SEMICOLON);
        }
        self.finish_node();
    }

    /// ParamDecl = ('parameter' | 'localparam') 'type'? DataType?
    ///             Declarator (',' Declarator)* ';'
    fn parse_param_decl(&mut self) {
        self.start_node(SyntaxKind::PARAM_DECL);
        self.bump();
        if self.at_keyword("type") {
            self.bump();
        } else {
            self.parse_data_type_opt();
        }
        loop {
            self.parse_declarator(&[SyntaxKind::COMMA, SyntaxKind::SEMICOLON]);
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        self.expect(SyntaxKind::SEMICOLON);
        self.finish_node();
    }

    /// TypedefDecl = 'typedef' ('class' | 'interface' 'class')? DataType? Name Dims ';'
    fn parse_typedef(&mut self) {
        self.start_node(SyntaxKind::TYPEDEF_DECL);
        self.bump();
        if self.at(SyntaxKind::CLASS_KW) || self.at(SyntaxKind::INTERFACE_KW) {
            // forward declaration
            self.eat(SyntaxKind::INTERFACE_KW);
            self.eat(SyntaxKind::CLASS_KW);
        } else {
            self.parse_data_type_opt();
        }
        self.parse_name();
        self.parse_dims();
        self.expect(SyntaxKind::SEMICOLON);
        self.finish_node();
    }

    /// ImportDecl = 'import' ImportItem (',' ImportItem)* ';'
    /// ImportItem = IDENT '::' (IDENT | '*')
    fn parse_import(&mut self) {
        if self.nth(1) == SyntaxKind::STRING {
            // DPI import: not a package import
            self.parse_generic_item();
            return;
        }
        self.start_node(SyntaxKind::IMPORT_DECL);
        self.bump();
        loop {
            self.start_node(SyntaxKind::IMPORT_ITEM);
            if self.expect(SyntaxKind::IDENT) && self.expect(SyntaxKind::COLON_COLON) {
                if self.at(SyntaxKind::IDENT)
                    || (self.at(SyntaxKind::OPERATOR) && self.current_text() == "*")
                {
                    self.bump();
                } else {
                    self.error("expected identifier or '*' in import");
                }
            }
            self.finish_node();
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        self.expect(SyntaxKind::SEMICOLON);
        self.finish_node();
    }

    /// IncludeDirective = '`include' STRING
    fn parse_include(&mut self) {
        self.start_node(SyntaxKind::INCLUDE_DIRECTIVE);
        self.bump();
        if !self.eat(SyntaxKind::STRING) {
            self.error("expected file name after `include");
        }
        self.finish_node();
    }

    // =========================================================================
    // Grammar rules: instantiation
    // =========================================================================

    /// Instantiation = DataType ('#' Connections)? Instance (',' Instance)* ';'
    /// Instance      = Name Dims Connections
    fn parse_instantiation(&mut self) {
        self.start_node(SyntaxKind::INSTANTIATION);

        self.start_node(SyntaxKind::DATA_TYPE);
        self.parse_name_ref(false);
        self.finish_node();

        if self.eat(SyntaxKind::HASH) {
            if self.at(SyntaxKind::L_PAREN) {
                self.parse_connections();
            } else {
                // `#8` style single value
                self.bump();
            }
        }

        loop {
            self.start_node(SyntaxKind::INSTANCE);
            self.parse_name();
            self.parse_dims();
            if self.at(SyntaxKind::L_PAREN) {
                self.parse_connections();
            } else {
                self.error("expected port connections");
            }
            self.finish_node();
            if !self.eat(SyntaxKind::COMMA) {
                break;
            }
        }
        if !self.eat(SyntaxKind::SEMICOLON) {
            self.error_recover("expected ';' after instantiation", &[SyntaxKind::SEMICOLON]);
            self.eat(SyntaxKind::SEMICOLON);
        }
        self.finish_node();
    }

    /// Connections = '(' (Connection (',' Connection)*)? ')'
    /// Connection  = '.' IDENT ('(' Expr? ')')? | '.*' | Expr
    fn parse_connections(&mut self) {
        self.expect(SyntaxKind::L_PAREN);
        while !self.at_eof() && !self.at(SyntaxKind::R_PAREN) && !self.at_any(CLOSERS) {
            let pos_before = self.pos;
            if self.at(SyntaxKind::DOT) && self.nth(1) == SyntaxKind::IDENT {
                self.start_node(SyntaxKind::PORT_CONNECTION);
                self.bump();
                self.bump();
                if self.eat(SyntaxKind::L_PAREN) {
                    if !self.at(SyntaxKind::R_PAREN) {
                        self.parse_expr_until(&[SyntaxKind::R_PAREN]);
                    }
                    self.expect(SyntaxKind::R_PAREN);
                }
                self.finish_node();
            } else if self.at(SyntaxKind::DOT) && self.nth_text(1) == "*" {
                self.bump();
                self.bump();
            } else if !self.at(SyntaxKind::COMMA) {
                self.parse_expr_until(&[SyntaxKind::COMMA, SyntaxKind::R_PAREN]);
            }
            if !self.eat(SyntaxKind::COMMA) {
                if self.pos == pos_before {
                    self.error_recover(
                        "malformed connection",
                        &[SyntaxKind::COMMA, SyntaxKind::R_PAREN],
                    );
                    continue;
                }
                break;
            }
        }
        self.expect(SyntaxKind::R_PAREN);
    }

    // =========================================================================
    // Grammar rules: generate constructs and blocks
    // =========================================================================

    /// GenerateRegion = 'generate' Item* 'endgenerate'
    fn parse_generate_region(&mut self) {
        self.start_node(SyntaxKind::GENERATE_REGION);
        self.bump();
        self.parse_items_until(&[SyntaxKind::ENDGENERATE_KW]);
        self.expect(SyntaxKind::ENDGENERATE_KW);
        self.finish_node();
    }

    /// Block = ('begin' | 'fork') BlockLabel? Body* ('end' | 'join') EndLabel?
    fn parse_block(&mut self, mode: BodyMode) {
        self.start_node(SyntaxKind::BLOCK);
        self.parse_block_contents(mode);
        self.finish_node();
    }

    fn parse_block_contents(&mut self, mode: BodyMode) {
        let end = if self.at(SyntaxKind::FORK_KW) {
            SyntaxKind::JOIN_KW
        } else {
            SyntaxKind::END_KW
        };
        self.bump();
        self.parse_block_label();
        match mode {
            BodyMode::Statement => self.parse_statements_until(&[end]),
            BodyMode::Item => self.parse_items_until(&[end]),
        }
        if self.expect(end) {
            self.parse_end_label();
        }
    }

    fn parse_body(&mut self, mode: BodyMode) {
        match mode {
            BodyMode::Statement => self.parse_statement(),
            BodyMode::Item if self.at(SyntaxKind::BEGIN_KW) => self.parse_block(mode),
            BodyMode::Item
                if self.at_any(&[SyntaxKind::IF_KW, SyntaxKind::FOR_KW, SyntaxKind::CASE_KW]) =>
            {
                self.parse_item()
            }
            BodyMode::Item => {
                // A single generate item still forms its own (anonymous) block
                self.start_node(SyntaxKind::BLOCK);
                self.parse_item();
                self.finish_node();
            }
        }
    }

    /// If = 'if' '(' Expr ')' Body ('else' Body)?
    fn parse_if(&mut self, mode: BodyMode) {
        self.start_node(SyntaxKind::STATEMENT);
        self.bump();
        if self.at(SyntaxKind::L_PAREN) {
            self.parse_paren_expr();
        } else {
            self.error("expected '(' after if");
        }
        self.parse_body(mode);
        if self.eat(SyntaxKind::ELSE_KW) {
            self.parse_body(mode);
        }
        self.finish_node();
    }

    /// For = 'for' '(' (DataDecl | Expr ';') Expr ';' Expr ')' Body
    ///
    /// The loop (header included) is a BLOCK so loop variables get a scope;
    /// a `begin : label` body names that scope.
    fn parse_for(&mut self, mode: BodyMode) {
        self.start_node(SyntaxKind::BLOCK);
        self.bump();
        if self.expect(SyntaxKind::L_PAREN) {
            let kind = self.current_kind();
            if kind.starts_data_type() || (kind == SyntaxKind::IDENT && self.ident_is_type()) {
                self.parse_data_decl();
            } else {
                self.parse_expr_until(&[SyntaxKind::SEMICOLON]);
                self.expect(SyntaxKind::SEMICOLON);
            }
            self.parse_expr_until(&[SyntaxKind::SEMICOLON]);
            self.expect(SyntaxKind::SEMICOLON);
            self.parse_expr_until(&[SyntaxKind::R_PAREN]);
            self.expect(SyntaxKind::R_PAREN);
        }
        if self.at(SyntaxKind::BEGIN_KW) {
            self.parse_block_contents(mode);
        } else if mode == BodyMode::Item {
            self.parse_item();
        } else {
            self.parse_statement();
        }
        self.finish_node();
    }

    /// Case = 'case' '(' Expr ')' CaseItem* 'endcase'
    /// CaseItem = ('default' ':'? | Expr ':') Body
    fn parse_case(&mut self, mode: BodyMode) {
        self.start_node(SyntaxKind::STATEMENT);
        self.bump();
        if self.at(SyntaxKind::L_PAREN) {
            self.parse_paren_expr();
        }
        // `case (x) inside` / `matches`
        if self.at_keyword("inside") || self.at_keyword("matches") {
            self.bump();
        }
        while !self.at_eof() && !self.at(SyntaxKind::ENDCASE_KW) {
            if self.at_any(CLOSERS) {
                break;
            }
            let pos_before = self.pos;
            if self.at_keyword("default") {
                self.bump();
                self.eat(SyntaxKind::COLON);
            } else {
                self.parse_expr_until(&[SyntaxKind::COLON]);
                self.expect(SyntaxKind::COLON);
            }
            self.parse_body(mode);
            if self.pos == pos_before {
                self.error_recover("malformed case item", &[SyntaxKind::ENDCASE_KW]);
            }
        }
        self.expect(SyntaxKind::ENDCASE_KW);
        self.finish_node();
    }

    // =========================================================================
    // Grammar rules: statements
    // =========================================================================

    fn parse_statements_until(&mut self, end: &[SyntaxKind]) {
        while !self.at_eof() && !self.at_any(end) {
            if self.at_any(CLOSERS) {
                self.error(format!("unexpected {:?}", self.current_kind()));
                return;
            }
            let pos_before = self.pos;
            self.parse_statement();
            if self.pos == pos_before {
                self.error_recover(
                    format!("unexpected token: {:?}", self.current_kind()),
                    &[SyntaxKind::SEMICOLON],
                );
                self.eat(SyntaxKind::SEMICOLON);
            }
        }
    }

    fn parse_statement(&mut self) {
        match self.current_kind() {
            SyntaxKind::BEGIN_KW | SyntaxKind::FORK_KW => self.parse_block(BodyMode::Statement),
            SyntaxKind::IF_KW => self.parse_if(BodyMode::Statement),
            SyntaxKind::FOR_KW => self.parse_for(BodyMode::Statement),
            SyntaxKind::CASE_KW => self.parse_case(BodyMode::Statement),
            SyntaxKind::SEMICOLON => self.bump(),
            SyntaxKind::AT | SyntaxKind::HASH => {
                // event or delay control followed by a statement
                self.start_node(SyntaxKind::STATEMENT);
                self.bump();
                match self.current_kind() {
                    SyntaxKind::L_PAREN => self.parse_paren_expr(),
                    SyntaxKind::IDENT => self.parse_name_ref(true),
                    _ => self.bump(),
                }
                self.parse_statement();
                self.finish_node();
            }
            SyntaxKind::PARAMETER_KW | SyntaxKind::LOCALPARAM_KW => self.parse_param_decl(),
            SyntaxKind::TYPEDEF_KW => self.parse_typedef(),
            SyntaxKind::IMPORT_KW => self.parse_import(),
            SyntaxKind::INCLUDE_KW => self.parse_include(),
            kind if kind.is_direction() || kind.starts_data_type() => self.parse_data_decl(),
            SyntaxKind::IDENT if self.ident_is_type() => self.parse_data_decl(),
            SyntaxKind::KEYWORD => match self.current_text() {
                "forever" => self.parse_prefixed_statement(false),
                "repeat" | "while" | "wait" | "foreach" => self.parse_prefixed_statement(true),
                "unique" | "unique0" | "priority" => {
                    self.start_node(SyntaxKind::STATEMENT);
                    self.bump();
                    self.parse_statement();
                    self.finish_node();
                }
                "do" => {
                    self.start_node(SyntaxKind::STATEMENT);
                    self.bump();
                    self.parse_statement();
                    if self.at_keyword("while") {
                        self.bump();
                        self.parse_paren_expr();
                    }
                    self.expect(SyntaxKind::SEMICOLON);
                    self.finish_node();
                }
                _ => self.parse_simple_statement(),
            },
            _ if self.at_any(CLOSERS) || self.at_eof() => {}
            _ => self.parse_simple_statement(),
        }
    }

    /// `forever Stmt` or `while (Expr) Stmt`
    fn parse_prefixed_statement(&mut self, with_condition: bool) {
        self.start_node(SyntaxKind::STATEMENT);
        self.bump();
        if with_condition && self.at(SyntaxKind::L_PAREN) {
            self.parse_paren_expr();
        }
        self.parse_statement();
        self.finish_node();
    }

    /// SimpleStatement = Expr ';'
    fn parse_simple_statement(&mut self) {
        self.start_node(SyntaxKind::STATEMENT);
        if self.current_kind().is_keyword() {
            self.bump(); // assign, return, disable, ...
        }
        self.parse_expr_tail(&[SyntaxKind::SEMICOLON]);
        if !self.eat(SyntaxKind::SEMICOLON) {
            self.error("expected ';'");
        }
        self.finish_node();
    }

    /// Generic item for constructs without declarations of interest
    /// (`modport`, `assert property`, `constraint`, `export`, ...).
    fn parse_generic_item(&mut self) {
        self.start_node(SyntaxKind::STATEMENT);
        let mut depth = 0usize;
        let mut first = true;
        while !self.at_eof() {
            let kind = self.current_kind();
            if depth == 0 && !first && (self.at_any(CLOSERS) || STATEMENT_STARTERS.contains(&kind)) {
                break;
            }
            match kind {
                SyntaxKind::SEMICOLON if depth == 0 => {
                    self.bump();
                    break;
                }
                SyntaxKind::L_PAREN | SyntaxKind::L_BRACKET | SyntaxKind::L_BRACE => depth += 1,
                SyntaxKind::R_PAREN | SyntaxKind::R_BRACKET => depth = depth.saturating_sub(1),
                SyntaxKind::R_BRACE => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        self.bump();
                        if !self.at(SyntaxKind::SEMICOLON) {
                            break;
                        }
                        continue;
                    }
                }
                SyntaxKind::IDENT => {
                    self.parse_name_ref(true);
                    first = false;
                    continue;
                }
                _ => {}
            }
            self.bump();
            first = false;
        }
        self.finish_node();
    }

    // =========================================================================
    // Grammar rules: expressions
    // =========================================================================

    /// '(' Expr ')'
    fn parse_paren_expr(&mut self) {
        self.expect(SyntaxKind::L_PAREN);
        if !self.at(SyntaxKind::R_PAREN) {
            self.parse_expr_until(&[SyntaxKind::R_PAREN]);
        }
        self.expect(SyntaxKind::R_PAREN);
    }

    /// Flat expression up to one of `terminators` at nesting depth zero.
    fn parse_expr_until(&mut self, terminators: &[SyntaxKind]) {
        self.start_node(SyntaxKind::EXPR);
        self.parse_expr_tail(terminators);
        self.finish_node();
    }

    fn parse_expr_tail(&mut self, terminators: &[SyntaxKind]) {
        let mut depth = 0usize;
        // Identifiers right after `.` are member selects, not references
        let mut after_select = false;

        while !self.at_eof() {
            let kind = self.current_kind();
            if depth == 0 && terminators.contains(&kind) {
                break;
            }
            if self.at_any(CLOSERS) {
                break;
            }
            if depth == 0 && STATEMENT_STARTERS.contains(&kind) {
                break;
            }
            match kind {
                SyntaxKind::L_PAREN | SyntaxKind::L_BRACKET | SyntaxKind::L_BRACE => depth += 1,
                SyntaxKind::R_PAREN | SyntaxKind::R_BRACKET | SyntaxKind::R_BRACE => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                SyntaxKind::IDENT if !after_select => {
                    self.parse_name_ref(true);
                    after_select = false;
                    continue;
                }
                _ => {}
            }
            after_select = matches!(kind, SyntaxKind::DOT);
            self.bump();
        }
    }

    /// NameRef = IDENT (('::' | '.') IDENT)*
    ///
    /// Hierarchical `.` segments are only chained when `hierarchical` is set.
    fn parse_name_ref(&mut self, hierarchical: bool) {
        self.start_node(SyntaxKind::NAME_REF);
        self.bump();
        loop {
            let separator = self.current_kind();
            let chains = separator == SyntaxKind::COLON_COLON
                || (hierarchical && separator == SyntaxKind::DOT);
            if chains && self.nth(1) == SyntaxKind::IDENT {
                self.bump();
                self.bump();
            } else {
                break;
            }
        }
        self.finish_node();
    }
}
