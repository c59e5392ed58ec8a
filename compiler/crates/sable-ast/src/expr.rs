// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Expression AST nodes.

use crate::token::TokenKind;
use crate::{NodeId, Span};

/// An expression in the AST.
#[derive(Debug, Clone)]
pub struct Expr {
    pub id: NodeId,
    pub kind: ExprKind,
    pub span: Span,
}

/// The kind of expression.
#[derive(Debug, Clone)]
pub enum ExprKind {
    /// Basic literal (integer, float, string, or illegal)
    Lit(BasicLit),
    /// Identifier; `$`-prefixed names resolve through the scope chain
    Ident(Ident),
    /// Unary selector operation (parent reference `&`)
    Unary {
        op: TokenKind,
        operand: Box<Expr>,
    },
    /// Binary selector operation (combinators, comma groups)
    Binary {
        op: TokenKind,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Keyword argument or declared parameter; `value` is absent for a
    /// parameter without a default
    KeyValue {
        key: Box<Expr>,
        value: Option<Box<Expr>>,
    },
    /// Built-in function call
    Call(CallExpr),
}

/// A literal with its token kind and source text.
#[derive(Debug, Clone, PartialEq)]
pub struct BasicLit {
    pub kind: TokenKind,
    pub value: String,
    pub span: Span,
}

impl BasicLit {
    pub fn new(kind: TokenKind, value: impl Into<String>, span: Span) -> Self {
        Self { kind, value: value.into(), span }
    }
}

/// A name appearing in the source.
#[derive(Debug, Clone, PartialEq)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self { name: name.into(), span }
    }

    /// Variable references carry their `$` sigil.
    pub fn is_var(&self) -> bool {
        self.name.starts_with('$')
    }
}

/// A call to a registered built-in. `resolved` is filled by the call
/// evaluator; once set it is always a basic literal.
#[derive(Debug, Clone)]
pub struct CallExpr {
    pub name: Ident,
    pub args: Vec<Expr>,
    pub resolved: Option<BasicLit>,
}
