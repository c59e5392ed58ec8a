// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Pre-order AST traversal.
//!
//! The visitor is presented with each node before its children. Returning
//! [`Flow::Skip`] stops the framework from descending, letting a visitor
//! walk children manually or not at all — selector resolution relies on
//! this to gate descent on the active precedence.

use crate::expr::{Expr, ExprKind};
use crate::stmt::{
    BlockStmt, Decl, DeclKind, SelStmt, SourceFile, Spec, SpecKind, Stmt, StmtKind,
};

/// A borrowed reference to any node in the tree.
#[derive(Debug, Clone, Copy)]
pub enum Node<'a> {
    File(&'a SourceFile),
    Decl(&'a Decl),
    Spec(&'a Spec),
    Stmt(&'a Stmt),
    Block(&'a BlockStmt),
    Sel(&'a SelStmt),
    Expr(&'a Expr),
}

/// Whether the framework should descend into the node's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Descend,
    Skip,
}

/// A pre-order visitor over the AST.
pub trait Visitor {
    fn visit(&mut self, node: Node<'_>) -> Flow;
}

/// Walk `node` depth-first, calling the visitor before each node and
/// descending into children in declaration order unless it skips.
pub fn walk<V: Visitor>(v: &mut V, node: Node<'_>) {
    if v.visit(node) == Flow::Skip {
        return;
    }
    match node {
        Node::File(file) => {
            for decl in &file.decls {
                walk(v, Node::Decl(decl));
            }
        }
        Node::Decl(decl) => match &decl.kind {
            DeclKind::Gen(gen) => {
                for spec in &gen.specs {
                    walk(v, Node::Spec(spec));
                }
            }
            DeclKind::Sel(sel) => walk(v, Node::Sel(&sel.stmt)),
            DeclKind::Mixin(mixin) => {
                for param in &mixin.params {
                    walk(v, Node::Expr(param));
                }
                walk(v, Node::Block(&mixin.block));
            }
            DeclKind::Import(_) => {}
        },
        Node::Spec(spec) => match &spec.kind {
            SpecKind::Value(value) => {
                for expr in &value.values {
                    walk(v, Node::Expr(expr));
                }
            }
            SpecKind::Rule(rule) => {
                for expr in &rule.values {
                    walk(v, Node::Expr(expr));
                }
            }
        },
        Node::Stmt(stmt) => match &stmt.kind {
            StmtKind::Decl(decl) => walk(v, Node::Decl(decl)),
            StmtKind::Sel(sel) => walk(v, Node::Sel(sel)),
            StmtKind::Assign(assign) => {
                for expr in &assign.rhs {
                    walk(v, Node::Expr(expr));
                }
            }
            StmtKind::Include(include) => {
                for expr in &include.args {
                    walk(v, Node::Expr(expr));
                }
            }
        },
        Node::Block(block) => {
            for stmt in &block.list {
                walk(v, Node::Stmt(stmt));
            }
        }
        Node::Sel(sel) => {
            walk(v, Node::Expr(&sel.sel));
            walk(v, Node::Block(&sel.block));
        }
        Node::Expr(expr) => match &expr.kind {
            ExprKind::Lit(_) | ExprKind::Ident(_) => {}
            ExprKind::Unary { operand, .. } => walk(v, Node::Expr(operand)),
            ExprKind::Binary { left, right, .. } => {
                walk(v, Node::Expr(left));
                walk(v, Node::Expr(right));
            }
            ExprKind::KeyValue { key, value } => {
                walk(v, Node::Expr(key));
                if let Some(value) = value {
                    walk(v, Node::Expr(value));
                }
            }
            ExprKind::Call(call) => {
                for arg in &call.args {
                    walk(v, Node::Expr(arg));
                }
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::BasicLit;
    use crate::token::TokenKind;
    use crate::{NodeId, Span};

    fn lit(id: u32, value: &str) -> Expr {
        Expr {
            id: NodeId(id),
            kind: ExprKind::Lit(BasicLit::new(TokenKind::Str, value, Span::default())),
            span: Span::default(),
        }
    }

    struct Collector {
        seen: Vec<String>,
        skip_binary: bool,
    }

    impl Visitor for Collector {
        fn visit(&mut self, node: Node<'_>) -> Flow {
            if let Node::Expr(expr) = node {
                match &expr.kind {
                    ExprKind::Lit(l) => self.seen.push(l.value.clone()),
                    ExprKind::Binary { .. } => {
                        self.seen.push("bin".to_string());
                        if self.skip_binary {
                            return Flow::Skip;
                        }
                    }
                    _ => {}
                }
            }
            Flow::Descend
        }
    }

    #[test]
    fn walks_children_in_order() {
        let tree = Expr {
            id: NodeId(0),
            kind: ExprKind::Binary {
                op: TokenKind::Gtr,
                left: Box::new(lit(1, "a")),
                right: Box::new(lit(2, "b")),
            },
            span: Span::default(),
        };
        let mut c = Collector { seen: vec![], skip_binary: false };
        walk(&mut c, Node::Expr(&tree));
        assert_eq!(c.seen, ["bin", "a", "b"]);
    }

    #[test]
    fn skip_preempts_children() {
        let tree = Expr {
            id: NodeId(0),
            kind: ExprKind::Binary {
                op: TokenKind::Gtr,
                left: Box::new(lit(1, "a")),
                right: Box::new(lit(2, "b")),
            },
            span: Span::default(),
        };
        let mut c = Collector { seen: vec![], skip_binary: true };
        walk(&mut c, Node::Expr(&tree));
        assert_eq!(c.seen, ["bin"]);
    }
}
