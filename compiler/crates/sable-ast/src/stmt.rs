// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Statement and declaration AST nodes.

use crate::expr::{BasicLit, Expr, Ident};
use crate::{NodeId, Span};

/// A parsed source file.
#[derive(Debug, Clone, Default)]
pub struct SourceFile {
    pub decls: Vec<Decl>,
    /// Comments retained under `PARSE_COMMENTS`; never re-emitted.
    pub comments: Vec<Comment>,
}

/// A comment as written in the source.
#[derive(Debug, Clone)]
pub struct Comment {
    pub text: String,
    pub span: Span,
}

/// A top-level declaration.
#[derive(Debug, Clone)]
pub struct Decl {
    pub id: NodeId,
    pub kind: DeclKind,
    pub span: Span,
}

/// The kind of declaration.
#[derive(Debug, Clone)]
pub enum DeclKind {
    /// General declaration carrying specifications
    Gen(GenDecl),
    /// Selector declaration (a rule set)
    Sel(SelDecl),
    /// Mixin definition
    Mixin(MixinDecl),
    /// Import, re-emitted as plain CSS
    Import(ImportDecl),
}

/// A group of specifications (variable assignments, rules).
#[derive(Debug, Clone)]
pub struct GenDecl {
    pub specs: Vec<Spec>,
}

/// A selector declaration wraps the selector statement it introduces.
#[derive(Debug, Clone)]
pub struct SelDecl {
    pub stmt: SelStmt,
}

/// A mixin definition; parameters are key-value expressions whose value
/// is the optional default.
#[derive(Debug, Clone)]
pub struct MixinDecl {
    pub name: Ident,
    pub params: Vec<Expr>,
    pub block: BlockStmt,
}

/// An `@import` to pass through to the output.
#[derive(Debug, Clone)]
pub struct ImportDecl {
    pub path: BasicLit,
}

/// A single specification inside a general declaration.
#[derive(Debug, Clone)]
pub struct Spec {
    pub id: NodeId,
    pub kind: SpecKind,
    pub span: Span,
}

/// The kind of specification.
#[derive(Debug, Clone)]
pub enum SpecKind {
    /// Variable assignment (`$name: values`); with no values, a bare
    /// reference that emits the bound value
    Value(ValueSpec),
    /// One CSS declaration (`property: values`)
    Rule(RuleSpec),
}

/// Variable assignment or bare reference.
#[derive(Debug, Clone)]
pub struct ValueSpec {
    pub names: Vec<Ident>,
    pub values: Vec<Expr>,
}

/// A property and its value expressions.
#[derive(Debug, Clone)]
pub struct RuleSpec {
    pub name: Ident,
    pub values: Vec<Expr>,
}

/// A selector statement: the raw selector expression and, after
/// resolution, the fully flattened selector list.
#[derive(Debug, Clone)]
pub struct SelStmt {
    pub sel: Expr,
    /// Set by selector resolution; never an illegal literal.
    pub resolved: Option<BasicLit>,
    pub block: BlockStmt,
}

/// A brace-delimited group of statements.
#[derive(Debug, Clone)]
pub struct BlockStmt {
    pub id: NodeId,
    pub list: Vec<Stmt>,
    pub span: Span,
}

/// A statement inside a block.
#[derive(Debug, Clone)]
pub struct Stmt {
    pub id: NodeId,
    pub kind: StmtKind,
    pub span: Span,
}

/// The kind of statement.
#[derive(Debug, Clone)]
pub enum StmtKind {
    /// Declaration wrapper for specs appearing inside a block
    Decl(Box<Decl>),
    /// Nested selector statement
    Sel(Box<SelStmt>),
    /// Variable assignment inside a block
    Assign(AssignStmt),
    /// Mixin inclusion
    Include(IncludeStmt),
}

/// Block-scope variable assignment.
#[derive(Debug, Clone)]
pub struct AssignStmt {
    pub lhs: Vec<Ident>,
    pub rhs: Vec<Expr>,
}

/// `@include name(args…);`
#[derive(Debug, Clone)]
pub struct IncludeStmt {
    pub name: Ident,
    pub args: Vec<Expr>,
}
