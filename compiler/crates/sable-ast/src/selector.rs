// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Selector resolution.
//!
//! Flattens a nested selector expression into the fully qualified CSS
//! selector list. The walk runs once per precedence level, highest first:
//! parent references reduce at 5, CSS combinators join at 4, comma groups
//! at 3, and a lone literal is the terminal case at 2. Each reduction
//! records its result in a positional part map; inserting at position P
//! discards every part recorded above P, so a reduction supersedes the
//! premature emissions of its operands. Per-node state lives in side
//! tables keyed by `NodeId`, which keeps resolution deterministic across
//! repeated runs over the same tree.

use std::collections::{BTreeMap, HashMap, HashSet};

use crate::expr::{BasicLit, Expr, ExprKind};
use crate::stmt::SelStmt;
use crate::token::TokenKind;
use crate::visit::{walk, Flow, Node, Visitor};
use crate::NodeId;

const NEST_PREC: u8 = 5;
const GROUP_PREC: u8 = 3;
const LITERAL_PREC: u8 = 2;

/// Resolve the selector statement against its parent's resolved value,
/// storing the flattened selector list in `stmt.resolved`.
pub fn resolve(stmt: &mut SelStmt, parent: Option<&str>) {
    let mut r = Resolver {
        parent,
        prec: NEST_PREC,
        inject: false,
        parts: BTreeMap::new(),
        reduced: HashMap::new(),
        consumed: HashSet::new(),
    };
    for prec in (LITERAL_PREC..=NEST_PREC).rev() {
        r.prec = prec;
        r.inject = parent.is_some();
        walk(&mut r, Node::Expr(&stmt.sel));
    }
    let value = r.parts.values().cloned().collect::<Vec<_>>().join(" ");
    stmt.resolved = Some(BasicLit::new(TokenKind::Str, value, stmt.sel.span));
}

struct Resolver<'a> {
    parent: Option<&'a str>,
    /// Precedence handled by the current pass.
    prec: u8,
    /// A parent prefix is still owed on the current walk path.
    inject: bool,
    /// Position → resolved part, truncated on insert.
    parts: BTreeMap<usize, String>,
    /// Reduced nest nodes and the value they carry.
    reduced: HashMap<NodeId, String>,
    /// Literals folded into a join; never added again.
    consumed: HashSet<NodeId>,
}

impl Visitor for Resolver<'_> {
    fn visit(&mut self, node: Node<'_>) -> Flow {
        let Node::Expr(expr) = node else {
            return Flow::Descend;
        };
        match &expr.kind {
            ExprKind::Lit(lit) => {
                if lit.kind == TokenKind::Illegal || self.consumed.contains(&expr.id) {
                    return Flow::Skip;
                }
                if self.prec != LITERAL_PREC {
                    return Flow::Skip;
                }
                let value = if self.inject {
                    self.inject_parent(&lit.value)
                } else {
                    lit.value.clone()
                };
                self.add(expr.span.start, value);
                Flow::Skip
            }
            ExprKind::Unary { op: TokenKind::Nest, operand } => {
                if self.reduced.contains_key(&expr.id) {
                    return Flow::Skip;
                }
                if self.prec < TokenKind::Nest.precedence() {
                    panic!("invalid nest operator at precedence {}", self.prec);
                }
                let base = self.collapse(operand);
                let value = self.inject_parent(&base);
                self.reduced.insert(expr.id, value.clone());
                self.add(expr.span.start, value);
                self.inject = false;
                Flow::Skip
            }
            ExprKind::Unary { op, .. } => {
                panic!("invalid unary selector operator `{}`", op)
            }
            ExprKind::Binary { op, left, right } => match *op {
                TokenKind::Nest => {
                    if self.reduced.contains_key(&expr.id) {
                        return Flow::Skip;
                    }
                    if self.prec < TokenKind::Nest.precedence() {
                        panic!("invalid binary nest operator at precedence {}", self.prec);
                    }
                    let x = self.collapse(left);
                    let y = self.collapse(right);
                    let joined = match (x.is_empty(), y.is_empty()) {
                        (true, _) => y,
                        (_, true) => x,
                        _ => format!("{} {}", x, y),
                    };
                    let value = self.inject_parent(&joined);
                    self.reduced.insert(expr.id, value.clone());
                    self.add(expr.span.start, value);
                    self.inject = false;
                    Flow::Skip
                }
                TokenKind::Add | TokenKind::Gtr | TokenKind::Til => {
                    if self.prec > op.precedence() {
                        return Flow::Descend;
                    }
                    if self.prec < op.precedence() {
                        return Flow::Skip;
                    }
                    let mut value = self.join_binary(*op, left, right);
                    if self.inject && !self.has_reduced_nest(expr) {
                        value = self.inject_parent(&value);
                        self.inject = false;
                    }
                    self.add(expr.span.start, value);
                    Flow::Skip
                }
                TokenKind::Comma => {
                    if self.prec != GROUP_PREC {
                        // Walk both sides independently; each branch of a
                        // group receives the parent prefix on its own.
                        self.inject = self.parent.is_some();
                        walk(self, Node::Expr(left));
                        self.inject = self.parent.is_some();
                        walk(self, Node::Expr(right));
                        return Flow::Skip;
                    }
                    let x = self.collapse(left);
                    let y = self.collapse(right);
                    let x = self.inject_branch(left, x);
                    let y = self.inject_branch(right, y);
                    self.add(expr.span.start, format!("{}, {}", x, y));
                    Flow::Skip
                }
                _ => panic!("invalid binary selector operator `{}`", op),
            },
            _ => panic!("selector resolution over a non-selector expression"),
        }
    }
}

impl Resolver<'_> {
    /// Record a part, discarding everything reported above its position.
    fn add(&mut self, pos: usize, value: String) {
        self.parts.insert(pos, value);
        self.parts.split_off(&(pos + 1));
    }

    /// Prefix `value` with the parent's resolved value, distributing over
    /// the parent's comma-group branches.
    fn inject_parent(&self, value: &str) -> String {
        let Some(parent) = self.parent else {
            return value.to_string();
        };
        parent
            .split(", ")
            .map(|branch| {
                if value.is_empty() {
                    branch.to_string()
                } else {
                    format!("{} {}", branch, value)
                }
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Prefix a comma-group branch unless the branch already consumed the
    /// parent through a nest reduction.
    fn inject_branch(&self, branch: &Expr, value: String) -> String {
        if self.parent.is_some() && !self.has_reduced_nest(branch) {
            self.inject_parent(&value)
        } else {
            value
        }
    }

    /// Fold an operand subtree into its textual value, marking consumed
    /// literals so later passes never re-add them.
    fn collapse(&mut self, expr: &Expr) -> String {
        match &expr.kind {
            ExprKind::Lit(lit) => {
                self.consumed.insert(expr.id);
                lit.value.clone()
            }
            ExprKind::Unary { operand, .. } => match self.reduced.get(&expr.id) {
                Some(value) => value.clone(),
                None => self.collapse(operand),
            },
            ExprKind::Binary { op, left, right } => match self.reduced.get(&expr.id) {
                Some(value) => value.clone(),
                None => self.join_binary(*op, left, right),
            },
            _ => panic!("cannot collapse a non-selector expression"),
        }
    }

    fn join_binary(&mut self, op: TokenKind, left: &Expr, right: &Expr) -> String {
        let x = self.collapse(left);
        let y = self.collapse(right);
        if op == TokenKind::Comma {
            format!("{}, {}", x, y)
        } else {
            format!("{} {} {}", x, op.spelling(), y)
        }
    }

    /// True when the subtree contains a nest node that already consumed
    /// the parent.
    fn has_reduced_nest(&self, expr: &Expr) -> bool {
        if self.reduced.contains_key(&expr.id) {
            return true;
        }
        match &expr.kind {
            ExprKind::Unary { operand, .. } => self.has_reduced_nest(operand),
            ExprKind::Binary { left, right, .. } => {
                self.has_reduced_nest(left) || self.has_reduced_nest(right)
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stmt::BlockStmt;
    use crate::Span;

    struct Trees {
        next: u32,
    }

    impl Trees {
        fn new() -> Self {
            Trees { next: 0 }
        }

        fn id(&mut self) -> NodeId {
            let id = NodeId(self.next);
            self.next += 1;
            id
        }

        fn lit(&mut self, value: &str, start: usize) -> Expr {
            self.lit_kind(TokenKind::Str, value, start)
        }

        fn lit_kind(&mut self, kind: TokenKind, value: &str, start: usize) -> Expr {
            let span = Span::new(start, start + value.len());
            Expr { id: self.id(), kind: ExprKind::Lit(BasicLit::new(kind, value, span)), span }
        }

        fn unary(&mut self, operand: Expr, start: usize) -> Expr {
            let span = Span::new(start, operand.span.end);
            Expr {
                id: self.id(),
                kind: ExprKind::Unary { op: TokenKind::Nest, operand: Box::new(operand) },
                span,
            }
        }

        fn binary(&mut self, op: TokenKind, left: Expr, right: Expr) -> Expr {
            let span = left.span.to(right.span);
            Expr {
                id: self.id(),
                kind: ExprKind::Binary { op, left: Box::new(left), right: Box::new(right) },
                span,
            }
        }

        fn stmt(&mut self, sel: Expr) -> SelStmt {
            SelStmt {
                sel,
                resolved: None,
                block: BlockStmt { id: self.id(), list: vec![], span: Span::default() },
            }
        }
    }

    fn resolved(stmt: &SelStmt) -> &str {
        &stmt.resolved.as_ref().expect("resolution sets the literal").value
    }

    #[test]
    fn lone_literal_passes_through() {
        let mut t = Trees::new();
        let sel = t.lit("a", 0);
        let mut stmt = t.stmt(sel);
        resolve(&mut stmt, None);
        assert_eq!(resolved(&stmt), "a");
    }

    #[test]
    fn literal_prefixes_parent() {
        let mut t = Trees::new();
        let sel = t.lit("b", 0);
        let mut stmt = t.stmt(sel);
        resolve(&mut stmt, Some("a"));
        assert_eq!(resolved(&stmt), "a b");
    }

    #[test]
    fn nest_collapses_into_parent() {
        let mut t = Trees::new();
        let operand = t.lit("c", 2);
        let sel = t.unary(operand, 0);
        let mut stmt = t.stmt(sel);
        resolve(&mut stmt, Some("a"));
        assert_eq!(resolved(&stmt), "a c");
    }

    #[test]
    fn nest_distributes_over_parent_group() {
        let mut t = Trees::new();
        let operand = t.lit("c", 2);
        let sel = t.unary(operand, 0);
        let mut stmt = t.stmt(sel);
        resolve(&mut stmt, Some("a, b"));
        assert_eq!(resolved(&stmt), "a c, b c");
    }

    #[test]
    fn combinator_joins_operands() {
        let mut t = Trees::new();
        let a = t.lit("a", 0);
        let b = t.lit("b", 4);
        let sel = t.binary(TokenKind::Gtr, a, b);
        let mut stmt = t.stmt(sel);
        resolve(&mut stmt, None);
        assert_eq!(resolved(&stmt), "a > b");
    }

    #[test]
    fn combinator_under_parent() {
        let mut t = Trees::new();
        let a = t.lit("a", 0);
        let b = t.lit("b", 4);
        let sel = t.binary(TokenKind::Til, a, b);
        let mut stmt = t.stmt(sel);
        resolve(&mut stmt, Some("p"));
        assert_eq!(resolved(&stmt), "p a ~ b");
    }

    #[test]
    fn comma_group_without_parent() {
        let mut t = Trees::new();
        let a = t.lit("a", 0);
        let b = t.lit("b", 3);
        let sel = t.binary(TokenKind::Comma, a, b);
        let mut stmt = t.stmt(sel);
        resolve(&mut stmt, None);
        assert_eq!(resolved(&stmt), "a, b");
    }

    #[test]
    fn comma_branches_each_receive_parent() {
        let mut t = Trees::new();
        let c = t.lit("c", 0);
        let d = t.lit("d", 3);
        let sel = t.binary(TokenKind::Comma, c, d);
        let mut stmt = t.stmt(sel);
        resolve(&mut stmt, Some("a"));
        assert_eq!(resolved(&stmt), "a c, a d");
    }

    #[test]
    fn comma_of_nests_consumes_parent_per_branch() {
        let mut t = Trees::new();
        let c = t.lit("c", 2);
        let left = t.unary(c, 0);
        let d = t.lit("d", 7);
        let right = t.unary(d, 5);
        let sel = t.binary(TokenKind::Comma, left, right);
        let mut stmt = t.stmt(sel);
        resolve(&mut stmt, Some("a"));
        assert_eq!(resolved(&stmt), "a c, a d");
    }

    #[test]
    fn bare_nest_with_combinator() {
        let mut t = Trees::new();
        let empty = t.lit("", 0);
        let amp = t.unary(empty, 0);
        let b = t.lit("b", 4);
        let sel = t.binary(TokenKind::Gtr, amp, b);
        let mut stmt = t.stmt(sel);
        resolve(&mut stmt, Some("a"));
        assert_eq!(resolved(&stmt), "a > b");
    }

    #[test]
    fn group_containing_combinator() {
        let mut t = Trees::new();
        let a = t.lit("a", 0);
        let b = t.lit("b", 4);
        let left = t.binary(TokenKind::Gtr, a, b);
        let c = t.lit("c", 7);
        let sel = t.binary(TokenKind::Comma, left, c);
        let mut stmt = t.stmt(sel);
        resolve(&mut stmt, None);
        assert_eq!(resolved(&stmt), "a > b, c");
    }

    #[test]
    fn illegal_literal_is_never_added() {
        let mut t = Trees::new();
        let sel = t.lit_kind(TokenKind::Illegal, "oops", 0);
        let mut stmt = t.stmt(sel);
        resolve(&mut stmt, None);
        assert_eq!(resolved(&stmt), "");
    }

    #[test]
    fn resolution_is_deterministic() {
        let mut t = Trees::new();
        let c = t.lit("c", 2);
        let sel = t.unary(c, 0);
        let mut stmt = t.stmt(sel);
        resolve(&mut stmt, Some("a, b"));
        let first = resolved(&stmt).to_string();
        resolve(&mut stmt, Some("a, b"));
        assert_eq!(resolved(&stmt), &first);
    }
}
