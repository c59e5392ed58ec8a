// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Built-in registry.
//!
//! Native helpers describe themselves with a signature stub written in
//! the stylesheet language itself (`rgb($red, $green, $blue)`). The stub
//! is parsed in `FUNC_ONLY` mode and walked to extract the name and the
//! declared parameters; the registry stores those next to the native
//! handler. Registration happens once at startup; a malformed stub is a
//! programmer error and panics.

use std::collections::HashMap;
use std::sync::{OnceLock, RwLock};

use sable_ast::expr::{BasicLit, Expr, ExprKind};
use sable_ast::visit::{walk, Flow, Node, Visitor};
use sable_ast::Span;

use crate::{parse_str, Mode};

/// The call node as seen by a native handler.
#[derive(Debug, Clone)]
pub struct CallSite {
    pub name: String,
    pub span: Span,
}

/// Errors produced by native handlers.
#[derive(Debug, thiserror::Error)]
pub enum BuiltinError {
    #[error("`{func}` expects {expected} arguments, got {got}")]
    Arity { func: String, expected: usize, got: usize },

    #[error("argument `{value}` to `{func}` is not a number")]
    NotANumber { func: String, value: String },

    #[error("argument `{value}` to `{func}` is not a color")]
    NotAColor { func: String, value: String },

    #[error("{0}")]
    Message(String),
}

/// A native handler receives the call node and the resolved literal
/// arguments, and produces a literal.
pub type CallHandler = fn(&CallSite, &[BasicLit]) -> Result<BasicLit, BuiltinError>;

/// A declared parameter: its `$name` and optional default.
#[derive(Debug, Clone)]
pub struct Param {
    pub name: String,
    pub default: Option<BasicLit>,
}

/// A registered built-in.
#[derive(Clone)]
pub struct Builtin {
    pub name: String,
    pub params: Vec<Param>,
    pub handler: CallHandler,
}

impl Builtin {
    /// Position of a declared parameter by keyword name.
    pub fn param_index(&self, key: &str) -> Option<usize> {
        self.params.iter().position(|p| p.name == key)
    }
}

static REGISTRY: OnceLock<RwLock<HashMap<String, Builtin>>> = OnceLock::new();

fn registry() -> &'static RwLock<HashMap<String, Builtin>> {
    REGISTRY.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Register a native handler under the signature stub's name.
///
/// The stub usually stops short of a terminating `;`, so the single
/// `expected ';', found 'EOF'` parse error is tolerated; anything else in
/// the stub is fatal.
pub fn register(signature: &str, handler: CallHandler) {
    let result = parse_str(signature, Mode::FUNC_ONLY);
    for err in &result.errors {
        if !err.message.ends_with("expected ';', found 'EOF'") {
            panic!("invalid builtin signature `{}`: {}", signature, err);
        }
    }
    let Some(decl) = result.file.decls.first() else {
        panic!("builtin signature `{}` contains no declaration", signature);
    };

    let mut sig = SignatureWalker::default();
    walk(&mut sig, Node::Decl(decl));
    let Some(name) = sig.name else {
        panic!("builtin signature `{}` contains no call expression", signature);
    };

    let builtin = Builtin { name: name.clone(), params: sig.params, handler };
    let mut map = registry().write().unwrap();
    if map.insert(name.clone(), builtin).is_some() {
        eprintln!("builtin `{}` already registered; keeping the newer handler", name);
    }
}

/// Look up a registered built-in by name.
pub fn lookup(name: &str) -> Option<Builtin> {
    registry().read().unwrap().get(name).cloned()
}

/// Walks rule spec → general decl → call expression, collecting the
/// callee name and normalizing each argument to a (name, default) pair.
#[derive(Default)]
struct SignatureWalker {
    name: Option<String>,
    params: Vec<Param>,
}

impl Visitor for SignatureWalker {
    fn visit(&mut self, node: Node<'_>) -> Flow {
        let Node::Expr(expr) = node else {
            return Flow::Descend;
        };
        let ExprKind::Call(call) = &expr.kind else {
            return Flow::Descend;
        };
        self.name = Some(call.name.name.clone());
        for arg in &call.args {
            match &arg.kind {
                ExprKind::Ident(id) => {
                    self.params.push(Param { name: id.name.clone(), default: None });
                }
                ExprKind::KeyValue { key, value } => {
                    let ExprKind::Ident(id) = &key.kind else {
                        panic!("builtin parameter name must be an identifier");
                    };
                    let default = match value.as_deref() {
                        None => None,
                        Some(Expr { kind: ExprKind::Lit(lit), .. }) => Some(lit.clone()),
                        Some(other) => {
                            panic!("builtin parameter default must be a literal, got {:?}", other.kind)
                        }
                    };
                    self.params.push(Param { name: id.name.clone(), default });
                }
                other => panic!("unsupported builtin signature argument {:?}", other),
            }
        }
        Flow::Skip
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sable_ast::token::TokenKind;

    fn echo(call: &CallSite, args: &[BasicLit]) -> Result<BasicLit, BuiltinError> {
        let joined: Vec<&str> = args.iter().map(|a| a.value.as_str()).collect();
        Ok(BasicLit::new(TokenKind::Str, joined.join("|"), call.span))
    }

    #[test]
    fn registers_and_extracts_parameters() {
        register("echo-params($a, $b: 4, $c)", echo);
        let builtin = lookup("echo-params").expect("registered");
        let names: Vec<&str> = builtin.params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["$a", "$b", "$c"]);
        assert!(builtin.params[0].default.is_none());
        assert_eq!(builtin.params[1].default.as_ref().map(|d| d.value.as_str()), Some("4"));
        assert_eq!(builtin.param_index("$c"), Some(2));
        assert_eq!(builtin.param_index("$nope"), None);
    }

    #[test]
    fn complete_stub_with_semicolon_is_fine() {
        register("echo-complete($x);", echo);
        assert!(lookup("echo-complete").is_some());
    }

    #[test]
    fn duplicate_registration_keeps_newest() {
        fn first(call: &CallSite, _: &[BasicLit]) -> Result<BasicLit, BuiltinError> {
            Ok(BasicLit::new(TokenKind::Str, "first", call.span))
        }
        fn second(call: &CallSite, _: &[BasicLit]) -> Result<BasicLit, BuiltinError> {
            Ok(BasicLit::new(TokenKind::Str, "second", call.span))
        }
        register("echo-dup($x)", first);
        register("echo-dup($x)", second);
        let builtin = lookup("echo-dup").expect("registered");
        let site = CallSite { name: "echo-dup".to_string(), span: Span::default() };
        let out = (builtin.handler)(&site, &[]).expect("handler runs");
        assert_eq!(out.value, "second");
    }

    #[test]
    fn handlers_receive_resolved_arguments() {
        register("echo-args($a, $b)", echo);
        let builtin = lookup("echo-args").expect("registered");
        let site = CallSite { name: "echo-args".to_string(), span: Span::default() };
        let args = [
            BasicLit::new(TokenKind::Int, "1", Span::default()),
            BasicLit::new(TokenKind::Int, "2", Span::default()),
        ];
        let out = (builtin.handler)(&site, &args).expect("handler runs");
        assert_eq!(out.value, "1|2");
    }

    #[test]
    fn unregistered_name_is_not_found() {
        assert!(lookup("echo-unregistered").is_none());
    }
}
