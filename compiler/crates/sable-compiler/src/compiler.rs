// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The compiler walk and CSS emission.
//!
//! Output follows the nested style: a block opens with `sel {`, each rule
//! line is indented two spaces past the block level, and a block's close
//! brace trails its last rule. Entering a nested block while the current
//! scope already holds rules closes the open line and bumps the level.

use std::collections::HashMap;

use sable_ast::selector;
use sable_ast::stmt::{
    AssignStmt, BlockStmt, Decl, DeclKind, ImportDecl, IncludeStmt, MixinDecl, RuleSpec, SelStmt,
    SourceFile, Spec, SpecKind, Stmt, StmtKind, ValueSpec,
};
use sable_ast::expr::{Expr, ExprKind};
use sable_ast::Span;
use sable_parser::builtin::BuiltinError;
use sable_parser::ParseError;

use crate::scope::ScopeChain;

/// Errors surfaced to the caller of a compilation.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("function `{0}` was not found")]
    FunctionNotFound(String),

    #[error("mixin `{0}` was not found")]
    MixinNotFound(String),

    #[error("unknown argument `{key}` for `{func}`")]
    UnknownArgument { func: String, key: String },

    #[error("`{func}` expects {expected} arguments, got {got}")]
    TooManyArguments { func: String, expected: usize, got: usize },

    #[error("missing argument `{param}` for `{func}`")]
    MissingArgument { func: String, param: String },

    #[error("undefined variable `{0}`")]
    UnresolvedReference(String),

    #[error(transparent)]
    Builtin(#[from] BuiltinError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CompileError {
    /// The source position, when the error carries one.
    pub fn span(&self) -> Option<Span> {
        match self {
            CompileError::Parse(e) => Some(e.span),
            _ => None,
        }
    }
}

/// Compiles one source file to CSS. State is scoped to a single
/// compilation; the built-in registry is the only process-wide piece.
pub struct Compiler {
    pub(crate) buf: String,
    /// Resolved selectors of the enclosing selector statements.
    pub(crate) sels: Vec<String>,
    pub(crate) first_rule: bool,
    pub(crate) level: usize,
    pub(crate) scopes: ScopeChain,
    pub(crate) mixins: HashMap<String, MixinDecl>,
}

impl Compiler {
    pub fn new() -> Self {
        sable_builtins::register_defaults();
        Self {
            buf: String::new(),
            sels: Vec::new(),
            first_rule: true,
            level: 0,
            scopes: ScopeChain::new(),
            mixins: HashMap::new(),
        }
    }

    /// Walk the file and produce its CSS, with a trailing newline.
    pub fn compile(&mut self, file: &mut SourceFile) -> Result<String, CompileError> {
        for decl in &mut file.decls {
            self.decl(decl)?;
        }
        if !self.buf.is_empty() && !self.buf.ends_with('\n') {
            self.buf.push('\n');
        }
        Ok(std::mem::take(&mut self.buf))
    }

    fn decl(&mut self, decl: &mut Decl) -> Result<(), CompileError> {
        match &mut decl.kind {
            DeclKind::Gen(gen) => {
                for spec in &mut gen.specs {
                    self.spec(spec)?;
                }
                Ok(())
            }
            DeclKind::Sel(sel) => self.sel_stmt(&mut sel.stmt),
            DeclKind::Mixin(mixin) => {
                self.mixins.insert(mixin.name.name.clone(), mixin.clone());
                Ok(())
            }
            DeclKind::Import(import) => {
                self.import(import);
                Ok(())
            }
        }
    }

    fn import(&mut self, import: &ImportDecl) {
        if !self.buf.is_empty() {
            self.buf.push('\n');
        }
        self.buf.push_str("@import ");
        self.buf.push_str(&import.path.value);
        self.buf.push(';');
    }

    fn spec(&mut self, spec: &mut Spec) -> Result<(), CompileError> {
        match &mut spec.kind {
            SpecKind::Value(value) => self.value_spec(value),
            SpecKind::Rule(rule) => self.rule_spec(rule),
        }
    }

    /// Variable assignment, or a bare reference that emits its binding.
    fn value_spec(&mut self, spec: &mut ValueSpec) -> Result<(), CompileError> {
        let name = spec.names[0].name.clone();
        if spec.values.is_empty() {
            let value = self
                .scopes
                .get(&name)
                .ok_or_else(|| CompileError::UnresolvedReference(name.clone()))?
                .to_string();
            self.out(&format!("{};", value));
        } else {
            let value = self.simplify(&mut spec.values)?;
            self.scopes.define(name, value);
        }
        Ok(())
    }

    fn rule_spec(&mut self, spec: &mut RuleSpec) -> Result<(), CompileError> {
        if self.first_rule {
            self.block_intro();
        } else {
            self.out("\n");
        }
        self.scopes.add_rule(spec.name.name.clone());
        let value = self.simplify(&mut spec.values)?;
        self.out(&format!("  {}: ", spec.name.name));
        self.buf.push_str(&value);
        self.buf.push(';');
        Ok(())
    }

    fn sel_stmt(&mut self, stmt: &mut SelStmt) -> Result<(), CompileError> {
        let parent = self.sels.last().cloned();
        selector::resolve(stmt, parent.as_deref());
        let resolved = stmt
            .resolved
            .as_ref()
            .map(|lit| lit.value.clone())
            .unwrap_or_else(|| panic!("selector resolution always sets the literal"));
        self.sels.push(resolved);
        self.block(&mut stmt.block)
    }

    fn block(&mut self, block: &mut BlockStmt) -> Result<(), CompileError> {
        let saved_level = self.level;
        if self.scopes.rule_count() > 0 {
            self.level += 1;
            // close the previous spec's open line before nesting
            self.buf.push_str(" }\n");
        }
        self.scopes.push_scope();
        self.first_rule = true;
        let mut result = Ok(());
        for stmt in &mut block.list {
            result = self.stmt(stmt);
            if result.is_err() {
                break;
            }
        }
        self.level = saved_level;
        self.scopes.pop_scope();
        self.block_outro();
        self.first_rule = true;
        result
    }

    fn stmt(&mut self, stmt: &mut Stmt) -> Result<(), CompileError> {
        match &mut stmt.kind {
            StmtKind::Decl(decl) => self.decl(decl),
            StmtKind::Sel(sel) => self.sel_stmt(sel),
            StmtKind::Assign(assign) => self.assign(assign),
            StmtKind::Include(include) => self.include_stmt(include),
        }
    }

    fn assign(&mut self, assign: &mut AssignStmt) -> Result<(), CompileError> {
        let value = self.simplify(&mut assign.rhs)?;
        self.scopes.define(assign.lhs[0].name.clone(), value);
        Ok(())
    }

    /// Expand a mixin body in place: parameters bind like variables and
    /// the body's rules count toward the enclosing block.
    fn include_stmt(&mut self, inc: &mut IncludeStmt) -> Result<(), CompileError> {
        let Some(mut mixin) = self.mixins.get(&inc.name.name).cloned() else {
            return Err(CompileError::MixinNotFound(inc.name.name.clone()));
        };

        let mut params: Vec<(String, Option<Expr>)> = Vec::with_capacity(mixin.params.len());
        for param in &mixin.params {
            let ExprKind::KeyValue { key, value } = &param.kind else {
                panic!("mixin parameters normalize to key-value expressions");
            };
            let ExprKind::Ident(id) = &key.kind else {
                panic!("mixin parameter name must be an identifier");
            };
            params.push((id.name.clone(), value.as_deref().cloned()));
        }

        let mut bound: Vec<Option<String>> = vec![None; params.len()];
        let mut argpos = 0usize;
        for i in 0..inc.args.len() {
            if argpos < i {
                argpos = i;
            }
            if matches!(inc.args[i].kind, ExprKind::KeyValue { .. }) {
                let (pos, value) = {
                    let ExprKind::KeyValue { key, value } = &mut inc.args[i].kind else {
                        unreachable!()
                    };
                    let ExprKind::Ident(k) = &key.kind else {
                        panic!("keyword argument name must be an identifier");
                    };
                    let pos = params
                        .iter()
                        .position(|(name, _)| name == &k.name)
                        .ok_or_else(|| CompileError::UnknownArgument {
                            func: inc.name.name.clone(),
                            key: k.name.clone(),
                        })?;
                    let value_expr = value
                        .as_mut()
                        .unwrap_or_else(|| panic!("keyword argument `{}` has no value", k.name));
                    (pos, self.simplify_one(value_expr)?)
                };
                bound[pos] = Some(value);
            } else {
                if argpos >= bound.len() {
                    return Err(CompileError::TooManyArguments {
                        func: inc.name.name.clone(),
                        expected: params.len(),
                        got: inc.args.len(),
                    });
                }
                bound[argpos] = Some(self.simplify_one(&mut inc.args[i])?);
            }
        }

        for (i, (name, default)) in params.into_iter().enumerate() {
            let value = match bound[i].take() {
                Some(v) => v,
                None => match default {
                    Some(mut d) => self.simplify_one(&mut d)?,
                    None => {
                        return Err(CompileError::MissingArgument {
                            func: inc.name.name.clone(),
                            param: name,
                        });
                    }
                },
            };
            self.scopes.define(name, value);
        }

        for stmt in &mut mixin.block.list {
            self.stmt(stmt)?;
        }
        Ok(())
    }

    fn block_intro(&mut self) {
        self.first_rule = false;
        if !self.buf.is_empty() && self.level == 0 {
            self.out("\n\n");
        }
        let sel = self.sels.last().cloned().unwrap_or_default();
        self.out(&format!("{} {{\n", sel));
    }

    fn block_outro(&mut self) {
        self.sels.pop();
        if self.first_rule {
            return;
        }
        self.first_rule = true;
        self.buf.push_str(" }");
    }

    /// Print with the current indentation; lines starting with a newline
    /// pass through unindented.
    pub(crate) fn out(&mut self, v: &str) {
        if v.starts_with('\n') {
            self.buf.push_str(v);
            return;
        }
        for _ in 0..self.level * 2 {
            self.buf.push(' ');
        }
        self.buf.push_str(v);
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new()
    }
}
