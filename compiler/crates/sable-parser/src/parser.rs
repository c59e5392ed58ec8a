// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The parser implementation.
//!
//! Selectors parse into an operator tree (comma groups over combinator
//! chains over compound literals) that selector resolution later
//! flattens. Declaration values parse into literal/identifier/call
//! expression lists; adjacent value tokens glue into a single literal so
//! `10px` or `a,` never split across parts.

use sable_ast::expr::{BasicLit, CallExpr, Expr, ExprKind, Ident};
use sable_ast::stmt::{
    AssignStmt, BlockStmt, Comment, Decl, DeclKind, GenDecl, ImportDecl, IncludeStmt, MixinDecl,
    RuleSpec, SelDecl, SelStmt, SourceFile, Spec, SpecKind, Stmt, StmtKind, ValueSpec,
};
use sable_ast::token::{Token, TokenKind};
use sable_ast::{NodeId, Span};

use crate::Mode;

/// Maximum number of errors to collect before stopping.
const MAX_ERRORS: usize = 20;

/// A parse error with position, message, and optional hint.
#[derive(Debug, Clone)]
pub struct ParseError {
    pub span: Span,
    pub message: String,
    pub hint: Option<String>,
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ParseError {}

impl ParseError {
    fn expected(what: &str, found: TokenKind, span: Span) -> Self {
        Self {
            span,
            message: format!("expected {}, found '{}'", what, found.name()),
            hint: None,
        }
    }

    fn not_implemented(feature: &str, span: Span) -> Self {
        Self {
            span,
            message: format!("{} is not yet implemented", feature),
            hint: None,
        }
    }

    fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// The outcome of a parse: the file built so far plus collected errors.
#[derive(Debug)]
pub struct ParseResult {
    pub file: SourceFile,
    pub errors: Vec<ParseError>,
}

impl ParseResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// The parser for sable source code.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    mode: Mode,
    errors: Vec<ParseError>,
    comments: Vec<Comment>,
    next_node_id: u32,
}

impl Parser {
    pub fn new(tokens: Vec<Token>, mode: Mode) -> Self {
        Self {
            tokens,
            pos: 0,
            mode,
            errors: Vec::new(),
            comments: Vec::new(),
            next_node_id: 0,
        }
    }

    pub fn parse(mut self) -> ParseResult {
        let mut decls = Vec::new();
        if self.mode.contains(Mode::FUNC_ONLY) {
            match self.parse_signature() {
                Ok(decl) => decls.push(decl),
                Err(e) => {
                    self.errors.push(e);
                }
            }
        } else {
            self.skip_trivia();
            while !self.at_end() {
                match self.parse_decl() {
                    Ok(decl) => decls.push(decl),
                    Err(e) => {
                        if !self.record_error(e) {
                            break;
                        }
                        self.synchronize();
                    }
                }
                self.skip_trivia();
            }
        }
        ParseResult {
            file: SourceFile { decls, comments: self.comments },
            errors: self.errors,
        }
    }

    fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next_node_id);
        self.next_node_id += 1;
        id
    }

    /// Record error, return whether parsing should continue.
    fn record_error(&mut self, error: ParseError) -> bool {
        self.errors.push(error);
        self.errors.len() < MAX_ERRORS
    }

    fn trace(&self, production: &str) {
        if self.mode.contains(Mode::TRACE) {
            eprintln!("parse: {} at {}", production, self.current().span.start);
        }
    }

    /// Skip to the next top-level declaration after an error.
    fn synchronize(&mut self) {
        let mut depth = 0usize;
        while !self.at_end() {
            match self.current_kind() {
                TokenKind::Lbrace => {
                    depth += 1;
                    self.advance();
                }
                TokenKind::Rbrace => {
                    self.advance();
                    if depth <= 1 {
                        return;
                    }
                    depth -= 1;
                }
                TokenKind::Semicolon if depth == 0 => {
                    self.advance();
                    return;
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Skip to the next statement inside a block after an error.
    fn synchronize_stmt(&mut self) {
        while !self.at_end() {
            match self.current_kind() {
                TokenKind::Semicolon => {
                    self.advance();
                    return;
                }
                TokenKind::Rbrace => return,
                _ => {
                    self.advance();
                }
            }
        }
    }

    // =========================================================================
    // Token Navigation
    // =========================================================================

    fn current(&self) -> &Token {
        self.tokens.get(self.pos).unwrap_or_else(|| self.tokens.last().unwrap())
    }

    fn current_kind(&self) -> TokenKind {
        self.current().kind
    }

    fn peek(&self, n: usize) -> TokenKind {
        self.tokens.get(self.pos + n).map(|t| t.kind).unwrap_or(TokenKind::Eof)
    }

    fn at_end(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    fn advance(&mut self) -> &Token {
        if !self.at_end() {
            self.pos += 1;
        }
        let idx = self.pos.saturating_sub(1);
        self.tokens.get(idx).unwrap_or_else(|| self.tokens.last().unwrap())
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current_kind() == kind
    }

    fn match_token(&mut self, kind: TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<&Token, ParseError> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            Err(ParseError::expected(
                &format!("'{}'", kind.name()),
                self.current_kind(),
                self.current().span,
            ))
        }
    }

    /// Skip comment tokens, retaining them under `PARSE_COMMENTS`.
    fn skip_trivia(&mut self) {
        while self.check(TokenKind::Comment) {
            let tok = self.advance().clone();
            if self.mode.contains(Mode::PARSE_COMMENTS) {
                self.comments.push(Comment { text: tok.text, span: tok.span });
            }
        }
    }

    /// True when the current token begins a variable reference.
    fn at_var(&self) -> bool {
        self.check(TokenKind::Ident) && self.current().text.starts_with('$')
    }

    /// True when `kind` can name a call (plain identifier or command
    /// directive).
    fn is_callee(&self, kind: TokenKind) -> bool {
        (kind == TokenKind::Ident && !self.current().text.starts_with('$')) || kind.is_command()
    }

    // =========================================================================
    // Declarations
    // =========================================================================

    fn parse_decl(&mut self) -> Result<Decl, ParseError> {
        match self.current_kind() {
            TokenKind::Ident if self.at_var() => self.parse_value_decl(),
            TokenKind::Mixin => self.parse_mixin_decl(),
            TokenKind::Import => self.parse_import_decl(),
            TokenKind::Include => Err(ParseError {
                span: self.current().span,
                message: "@include is only allowed inside a block".to_string(),
                hint: None,
            }),
            kind @ (TokenKind::If | TokenKind::Else | TokenKind::Each | TokenKind::Func) => {
                Err(ParseError::not_implemented(kind.spelling(), self.current().span))
            }
            _ => self.parse_selector_decl(),
        }
    }

    /// `$name: values;` or the bare reference `$name;`
    fn parse_value_decl(&mut self) -> Result<Decl, ParseError> {
        self.trace("value spec");
        let name_tok = self.advance().clone();
        let name = Ident::new(name_tok.text, name_tok.span);
        let values = if self.check(TokenKind::Semicolon) {
            Vec::new()
        } else {
            self.expect(TokenKind::Colon)?;
            let values = self.parse_values()?;
            if values.is_empty() {
                return Err(ParseError::expected(
                    "a value",
                    self.current_kind(),
                    self.current().span,
                ));
            }
            values
        };
        let end = self
            .expect(TokenKind::Semicolon)
            .map_err(|e| e.with_hint("variable assignments end with ';'"))?
            .span;
        let span = name_tok.span.to(end);
        let spec = Spec {
            id: self.next_id(),
            kind: SpecKind::Value(ValueSpec { names: vec![name], values }),
            span,
        };
        Ok(Decl {
            id: self.next_id(),
            kind: DeclKind::Gen(GenDecl { specs: vec![spec] }),
            span,
        })
    }

    /// `@mixin name($a, $b: default) { … }`
    fn parse_mixin_decl(&mut self) -> Result<Decl, ParseError> {
        self.trace("mixin decl");
        let start = self.advance().span;
        let name_tok = self.expect(TokenKind::Ident)?.clone();
        let name = Ident::new(name_tok.text, name_tok.span);
        let mut params = Vec::new();
        if self.match_token(TokenKind::Lparen) {
            while !self.check(TokenKind::Rparen) && !self.at_end() {
                params.push(self.parse_mixin_param()?);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
            self.expect(TokenKind::Rparen)?;
        }
        self.expect(TokenKind::Lbrace)?;
        let block = self.parse_block()?;
        let span = start.to(block.span);
        Ok(Decl {
            id: self.next_id(),
            kind: DeclKind::Mixin(MixinDecl { name, params, block }),
            span,
        })
    }

    /// A declared parameter normalizes to a key-value expression whose
    /// value, when present, is the default.
    fn parse_mixin_param(&mut self) -> Result<Expr, ParseError> {
        if !self.at_var() {
            return Err(ParseError::expected(
                "a parameter name",
                self.current_kind(),
                self.current().span,
            ));
        }
        let name_tok = self.advance().clone();
        let key = Expr {
            id: self.next_id(),
            kind: ExprKind::Ident(Ident::new(name_tok.text, name_tok.span)),
            span: name_tok.span,
        };
        let value = if self.match_token(TokenKind::Colon) {
            Some(Box::new(self.parse_call_arg()?))
        } else {
            None
        };
        let end = value.as_ref().map(|v| v.span).unwrap_or(name_tok.span);
        Ok(Expr {
            id: self.next_id(),
            kind: ExprKind::KeyValue { key: Box::new(key), value },
            span: name_tok.span.to(end),
        })
    }

    /// `@import "path";` re-emitted verbatim.
    fn parse_import_decl(&mut self) -> Result<Decl, ParseError> {
        self.trace("import decl");
        let start = self.advance().span;
        let mut text = String::new();
        let mut prev_end = None;
        let mut end = start;
        while !self.check(TokenKind::Semicolon) && !self.at_end() {
            let tok = self.advance();
            if let Some(prev) = prev_end {
                if tok.span.start != prev {
                    text.push(' ');
                }
            }
            text.push_str(&tok.text);
            prev_end = Some(tok.span.end);
            end = tok.span;
        }
        if text.is_empty() {
            return Err(ParseError::expected(
                "an import path",
                self.current_kind(),
                self.current().span,
            ));
        }
        self.expect(TokenKind::Semicolon)?;
        let span = start.to(end);
        Ok(Decl {
            id: self.next_id(),
            kind: DeclKind::Import(ImportDecl {
                path: BasicLit::new(TokenKind::Str, text, span),
            }),
            span,
        })
    }

    fn parse_selector_decl(&mut self) -> Result<Decl, ParseError> {
        self.trace("selector decl");
        let stmt = self.parse_sel_stmt()?;
        let span = stmt.sel.span.to(stmt.block.span);
        Ok(Decl {
            id: self.next_id(),
            kind: DeclKind::Sel(SelDecl { stmt }),
            span,
        })
    }

    fn parse_sel_stmt(&mut self) -> Result<SelStmt, ParseError> {
        let sel = self.parse_selector_group()?;
        self.expect(TokenKind::Lbrace)
            .map_err(|e| e.with_hint("selectors are followed by a '{' block"))?;
        let block = self.parse_block()?;
        Ok(SelStmt { sel, resolved: None, block })
    }

    // =========================================================================
    // Blocks and statements
    // =========================================================================

    /// Parses statements up to and including the closing `}`.
    fn parse_block(&mut self) -> Result<BlockStmt, ParseError> {
        let start = self.current().span;
        let mut list = Vec::new();
        self.skip_trivia();
        while !self.check(TokenKind::Rbrace) && !self.at_end() {
            match self.parse_stmt() {
                Ok(stmt) => list.push(stmt),
                Err(e) => {
                    if !self.record_error(e) {
                        break;
                    }
                    self.synchronize_stmt();
                }
            }
            self.skip_trivia();
        }
        let end = self.expect(TokenKind::Rbrace)?.span;
        Ok(BlockStmt { id: self.next_id(), list, span: start.to(end) })
    }

    fn parse_stmt(&mut self) -> Result<Stmt, ParseError> {
        match self.current_kind() {
            TokenKind::Ident if self.at_var() => self.parse_assign_stmt(),
            TokenKind::Include => self.parse_include_stmt(),
            TokenKind::Mixin => Err(ParseError {
                span: self.current().span,
                message: "mixin declarations are only allowed at the top level".to_string(),
                hint: None,
            }),
            kind @ (TokenKind::If
            | TokenKind::Else
            | TokenKind::Each
            | TokenKind::Func
            | TokenKind::Import) => {
                Err(ParseError::not_implemented(kind.spelling(), self.current().span))
            }
            _ if self.at_nested_selector() => {
                let start = self.current().span;
                let stmt = self.parse_sel_stmt()?;
                let span = start.to(stmt.block.span);
                Ok(Stmt { id: self.next_id(), kind: StmtKind::Sel(Box::new(stmt)), span })
            }
            _ => self.parse_rule_stmt(),
        }
    }

    /// A `{` before any `;` or `}` means the upcoming tokens form a
    /// nested selector rather than a declaration.
    fn at_nested_selector(&self) -> bool {
        for tok in &self.tokens[self.pos..] {
            match tok.kind {
                TokenKind::Lbrace => return true,
                TokenKind::Semicolon | TokenKind::Rbrace | TokenKind::Eof => return false,
                _ => {}
            }
        }
        false
    }

    fn parse_assign_stmt(&mut self) -> Result<Stmt, ParseError> {
        self.trace("assign stmt");
        let name_tok = self.advance().clone();
        let name = Ident::new(name_tok.text, name_tok.span);
        self.expect(TokenKind::Colon)?;
        let values = self.parse_values()?;
        if values.is_empty() {
            return Err(ParseError::expected(
                "a value",
                self.current_kind(),
                self.current().span,
            ));
        }
        let end = self.expect(TokenKind::Semicolon)?.span;
        Ok(Stmt {
            id: self.next_id(),
            kind: StmtKind::Assign(AssignStmt { lhs: vec![name], rhs: values }),
            span: name_tok.span.to(end),
        })
    }

    fn parse_include_stmt(&mut self) -> Result<Stmt, ParseError> {
        self.trace("include stmt");
        let start = self.advance().span;
        let name_tok = self.expect(TokenKind::Ident)?.clone();
        let name = Ident::new(name_tok.text, name_tok.span);
        let mut args = Vec::new();
        if self.match_token(TokenKind::Lparen) {
            while !self.check(TokenKind::Rparen) && !self.at_end() {
                args.push(self.parse_call_arg()?);
                if !self.match_token(TokenKind::Comma) {
                    break;
                }
            }
            self.expect(TokenKind::Rparen)?;
        }
        let end = self.expect(TokenKind::Semicolon)?.span;
        Ok(Stmt {
            id: self.next_id(),
            kind: StmtKind::Include(IncludeStmt { name, args }),
            span: start.to(end),
        })
    }

    /// `property: values;` wrapped as a declaration statement.
    fn parse_rule_stmt(&mut self) -> Result<Stmt, ParseError> {
        self.trace("rule spec");
        if !self.check(TokenKind::Ident) {
            return Err(ParseError::expected(
                "a property name",
                self.current_kind(),
                self.current().span,
            ));
        }
        let name_tok = self.advance().clone();
        let name = Ident::new(name_tok.text, name_tok.span);
        self.expect(TokenKind::Colon)?;
        let values = self.parse_values()?;
        if values.is_empty() {
            return Err(ParseError::expected(
                "a value",
                self.current_kind(),
                self.current().span,
            ));
        }
        // The final declaration in a block may omit its semicolon.
        let end = if self.check(TokenKind::Semicolon) {
            self.advance().span
        } else if self.check(TokenKind::Rbrace) {
            values.last().map(|v| v.span).unwrap_or(name_tok.span)
        } else {
            return Err(ParseError::expected(
                "';'",
                self.current_kind(),
                self.current().span,
            ));
        };
        let span = name_tok.span.to(end);
        let spec = Spec {
            id: self.next_id(),
            kind: SpecKind::Rule(RuleSpec { name, values }),
            span,
        };
        let decl = Decl {
            id: self.next_id(),
            kind: DeclKind::Gen(GenDecl { specs: vec![spec] }),
            span,
        };
        Ok(Stmt { id: self.next_id(), kind: StmtKind::Decl(Box::new(decl)), span })
    }

    // =========================================================================
    // Selectors
    // =========================================================================

    fn parse_selector_group(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_selector_seq()?;
        while self.match_token(TokenKind::Comma) {
            self.skip_trivia();
            let right = self.parse_selector_seq()?;
            left = self.binary(TokenKind::Comma, left, right);
        }
        Ok(left)
    }

    fn parse_selector_seq(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_selector_compound()?;
        while matches!(
            self.current_kind(),
            TokenKind::Add | TokenKind::Gtr | TokenKind::Til
        ) {
            let op = self.advance().kind;
            let right = self.parse_selector_compound()?;
            left = self.binary(op, left, right);
        }
        Ok(left)
    }

    fn binary(&mut self, op: TokenKind, left: Expr, right: Expr) -> Expr {
        let span = left.span.to(right.span);
        Expr {
            id: self.next_id(),
            kind: ExprKind::Binary { op, left: Box::new(left), right: Box::new(right) },
            span,
        }
    }

    /// One compound selector: a parent reference, or adjacent simple
    /// selectors glued into a single literal (source whitespace becomes a
    /// single descendant space).
    fn parse_selector_compound(&mut self) -> Result<Expr, ParseError> {
        self.skip_trivia();
        if self.check(TokenKind::Nest) {
            let amp = self.advance().span;
            let operand = if self.at_compound_piece() {
                self.parse_selector_compound()?
            } else {
                Expr {
                    id: self.next_id(),
                    kind: ExprKind::Lit(BasicLit::new(TokenKind::Str, "", amp)),
                    span: amp,
                }
            };
            let span = amp.to(operand.span);
            return Ok(Expr {
                id: self.next_id(),
                kind: ExprKind::Unary { op: TokenKind::Nest, operand: Box::new(operand) },
                span,
            });
        }

        if !self.at_compound_piece() {
            return Err(ParseError::expected(
                "a selector",
                self.current_kind(),
                self.current().span,
            ));
        }
        let first = self.advance().clone();
        let mut text = first.text.clone();
        let start = first.span.start;
        let mut end = first.span.end;
        while self.at_compound_piece() {
            let tok = self.advance().clone();
            if tok.span.start != end {
                text.push(' ');
            }
            text.push_str(&tok.text);
            end = tok.span.end;
        }
        let span = Span::new(start, end);
        Ok(Expr {
            id: self.next_id(),
            kind: ExprKind::Lit(BasicLit::new(TokenKind::Str, text, span)),
            span,
        })
    }

    fn at_compound_piece(&self) -> bool {
        match self.current_kind() {
            TokenKind::Ident => !self.current().text.starts_with('$'),
            TokenKind::Str
            | TokenKind::Int
            | TokenKind::Colon
            | TokenKind::Period
            | TokenKind::Mul
            | TokenKind::Lbrack
            | TokenKind::Rbrack
            | TokenKind::Assign => true,
            kind => kind.is_command(),
        }
    }

    // =========================================================================
    // Values and calls
    // =========================================================================

    fn parse_values(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut values = Vec::new();
        loop {
            self.skip_trivia();
            match self.current_kind() {
                TokenKind::Semicolon | TokenKind::Rbrace | TokenKind::Rparen | TokenKind::Eof => {
                    break;
                }
                TokenKind::Ident if self.at_var() => {
                    let tok = self.advance().clone();
                    values.push(Expr {
                        id: self.next_id(),
                        kind: ExprKind::Ident(Ident::new(tok.text, tok.span)),
                        span: tok.span,
                    });
                }
                kind if self.is_callee(kind)
                    && self.peek(1) == TokenKind::Lparen
                    && self.adjacent_next() =>
                {
                    values.push(self.parse_call_expr()?);
                }
                kind if self.at_value_piece(kind) => {
                    values.push(self.parse_value_word(true));
                }
                _ => {
                    return Err(ParseError::expected(
                        "a value",
                        self.current_kind(),
                        self.current().span,
                    ));
                }
            }
        }
        Ok(values)
    }

    /// True when the token after the current one starts where it ends.
    fn adjacent_next(&self) -> bool {
        self.tokens
            .get(self.pos + 1)
            .map(|t| t.span.start == self.current().span.end)
            .unwrap_or(false)
    }

    fn at_value_piece(&self, kind: TokenKind) -> bool {
        match kind {
            TokenKind::Ident | TokenKind::Int | TokenKind::Float | TokenKind::Str => true,
            TokenKind::Comma
            | TokenKind::Quo
            | TokenKind::Mul
            | TokenKind::Rem
            | TokenKind::Period => true,
            _ => kind.is_command(),
        }
    }

    /// A run of adjacent value tokens glued into one literal. Inside
    /// call arguments a comma separates arguments instead of gluing.
    fn parse_value_word(&mut self, glue_commas: bool) -> Expr {
        let first = self.advance().clone();
        let mut kind = match first.kind {
            TokenKind::Int => TokenKind::Int,
            TokenKind::Float => TokenKind::Float,
            _ => TokenKind::Str,
        };
        let mut text = first.text.clone();
        let start = first.span.start;
        let mut end = first.span.end;
        while self.at_value_piece(self.current_kind())
            && self.current().span.start == end
            && (glue_commas || self.current_kind() != TokenKind::Comma)
            && !(self.current_kind() == TokenKind::Ident && self.current().text.starts_with('$'))
        {
            let tok = self.advance().clone();
            text.push_str(&tok.text);
            end = tok.span.end;
            kind = TokenKind::Str;
        }
        let span = Span::new(start, end);
        Expr {
            id: self.next_id(),
            kind: ExprKind::Lit(BasicLit::new(kind, text, span)),
            span,
        }
    }

    fn parse_call_expr(&mut self) -> Result<Expr, ParseError> {
        self.trace("call expr");
        let name_tok = self.advance().clone();
        let name = Ident::new(name_tok.text, name_tok.span);
        self.expect(TokenKind::Lparen)?;
        let mut args = Vec::new();
        self.skip_trivia();
        while !self.check(TokenKind::Rparen) && !self.at_end() {
            args.push(self.parse_call_arg()?);
            if !self.match_token(TokenKind::Comma) {
                break;
            }
            self.skip_trivia();
        }
        let end = self.expect(TokenKind::Rparen)?.span;
        let span = name_tok.span.to(end);
        Ok(Expr {
            id: self.next_id(),
            kind: ExprKind::Call(CallExpr { name, args, resolved: None }),
            span,
        })
    }

    /// One call argument: a literal, a reference, a keyword argument, or
    /// a nested call.
    fn parse_call_arg(&mut self) -> Result<Expr, ParseError> {
        self.skip_trivia();
        match self.current_kind() {
            TokenKind::Ident if self.at_var() => {
                let tok = self.advance().clone();
                let key = Expr {
                    id: self.next_id(),
                    kind: ExprKind::Ident(Ident::new(tok.text.clone(), tok.span)),
                    span: tok.span,
                };
                if self.match_token(TokenKind::Colon) {
                    let value = self.parse_call_arg()?;
                    let span = tok.span.to(value.span);
                    Ok(Expr {
                        id: self.next_id(),
                        kind: ExprKind::KeyValue {
                            key: Box::new(key),
                            value: Some(Box::new(value)),
                        },
                        span,
                    })
                } else {
                    Ok(key)
                }
            }
            kind if self.is_callee(kind)
                && self.peek(1) == TokenKind::Lparen
                && self.adjacent_next() =>
            {
                self.parse_call_expr()
            }
            TokenKind::Ident => {
                let tok = self.advance().clone();
                Ok(Expr {
                    id: self.next_id(),
                    kind: ExprKind::Ident(Ident::new(tok.text, tok.span)),
                    span: tok.span,
                })
            }
            kind if self.at_value_piece(kind) => Ok(self.parse_value_word(false)),
            _ => Err(ParseError::expected(
                "an argument",
                self.current_kind(),
                self.current().span,
            )),
        }
    }

    // =========================================================================
    // Built-in signature stubs
    // =========================================================================

    /// In `FUNC_ONLY` mode the input is a signature stub like
    /// `rgb($red, $green, $blue)`: one declaration holding a single call
    /// expression. Stubs usually stop short of the terminating `;`; the
    /// resulting parse error is reported and tolerated by the registrar.
    fn parse_signature(&mut self) -> Result<Decl, ParseError> {
        self.trace("signature stub");
        self.skip_trivia();
        let call = self.parse_call_expr()?;
        let span = call.span;
        let name = match &call.kind {
            ExprKind::Call(c) => c.name.clone(),
            _ => unreachable!("parse_call_expr builds a call"),
        };
        let spec = Spec {
            id: self.next_id(),
            kind: SpecKind::Rule(RuleSpec { name, values: vec![call] }),
            span,
        };
        let decl = Decl {
            id: self.next_id(),
            kind: DeclKind::Gen(GenDecl { specs: vec![spec] }),
            span,
        };
        if let Err(e) = self.expect(TokenKind::Semicolon) {
            self.errors.push(e);
        }
        Ok(decl)
    }
}
