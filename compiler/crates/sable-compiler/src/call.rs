// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Call evaluation and value simplification.
//!
//! Arguments at a call site resolve against the registered signature:
//! positionally, or by keyword matched against the declared parameter
//! names, with declared defaults filling the gaps. Identifier references
//! are rewritten in place with their resolved literal so repeated
//! evaluation reuses the result.

use sable_ast::expr::{BasicLit, Expr, ExprKind};
use sable_ast::token::TokenKind;
use sable_parser::builtin::{self, CallSite};

use crate::compiler::{CompileError, Compiler};

impl Compiler {
    /// Evaluate a call expression to a basic literal.
    pub(crate) fn eval_call(&mut self, expr: &mut Expr) -> Result<BasicLit, CompileError> {
        let span = expr.span;
        let ExprKind::Call(call) = &mut expr.kind else {
            panic!("call evaluation over a non-call expression");
        };
        if let Some(lit) = &call.resolved {
            return Ok(lit.clone());
        }

        let func = builtin::lookup(&call.name.name)
            .ok_or_else(|| CompileError::FunctionNotFound(call.name.name.clone()))?;

        // Argument buffer, pre-filled with declared defaults.
        let mut callargs: Vec<Option<BasicLit>> =
            func.params.iter().map(|p| p.default.clone()).collect();

        let mut argpos = 0usize;
        for i in 0..call.args.len() {
            if argpos < i {
                argpos = i;
            }
            if matches!(call.args[i].kind, ExprKind::KeyValue { .. }) {
                let (pos, lit) = {
                    let ExprKind::KeyValue { key, value } = &mut call.args[i].kind else {
                        unreachable!()
                    };
                    let ExprKind::Ident(k) = &key.kind else {
                        panic!("keyword argument name must be an identifier");
                    };
                    let pos = func.param_index(&k.name).ok_or_else(|| {
                        CompileError::UnknownArgument {
                            func: func.name.clone(),
                            key: k.name.clone(),
                        }
                    })?;
                    let value_expr = value
                        .as_mut()
                        .unwrap_or_else(|| panic!("keyword argument `{}` has no value", k.name));
                    (pos, self.resolve_arg(value_expr)?)
                };
                callargs[pos] = Some(lit);
            } else {
                if argpos >= callargs.len() {
                    return Err(CompileError::TooManyArguments {
                        func: func.name.clone(),
                        expected: func.params.len(),
                        got: call.args.len(),
                    });
                }
                let lit = self.resolve_arg(&mut call.args[i])?;
                callargs[argpos] = Some(lit);
            }
        }

        let mut resolved_args = Vec::with_capacity(callargs.len());
        for (param, arg) in func.params.iter().zip(callargs) {
            match arg {
                Some(lit) => resolved_args.push(lit),
                None => {
                    return Err(CompileError::MissingArgument {
                        func: func.name.clone(),
                        param: param.name.clone(),
                    });
                }
            }
        }

        let site = CallSite { name: call.name.name.clone(), span };
        let lit = (func.handler)(&site, &resolved_args)?;
        call.resolved = Some(lit.clone());
        Ok(lit)
    }

    /// Resolve one argument to a basic literal. References are replaced
    /// in the argument list with the resolved literal.
    fn resolve_arg(&mut self, expr: &mut Expr) -> Result<BasicLit, CompileError> {
        if matches!(expr.kind, ExprKind::Call(_)) {
            return self.eval_call(expr);
        }
        let lit = match &expr.kind {
            ExprKind::Lit(lit) => return Ok(lit.clone()),
            ExprKind::Ident(id) if id.is_var() => {
                let value = self
                    .scopes
                    .get(&id.name)
                    .ok_or_else(|| CompileError::UnresolvedReference(id.name.clone()))?;
                BasicLit::new(TokenKind::Str, value, expr.span)
            }
            ExprKind::Ident(id) => BasicLit::new(TokenKind::Str, id.name.clone(), expr.span),
            other => panic!("unsupported call argument {:?}", other),
        };
        expr.kind = ExprKind::Lit(lit.clone());
        Ok(lit)
    }

    /// Concatenate value expressions with single-space joins.
    pub(crate) fn simplify(&mut self, exprs: &mut [Expr]) -> Result<String, CompileError> {
        let mut parts = Vec::with_capacity(exprs.len());
        for expr in exprs {
            parts.push(self.simplify_one(expr)?);
        }
        Ok(parts.join(" "))
    }

    pub(crate) fn simplify_one(&mut self, expr: &mut Expr) -> Result<String, CompileError> {
        if matches!(expr.kind, ExprKind::Call(_)) {
            return Ok(self.eval_call(expr)?.value);
        }
        match &expr.kind {
            ExprKind::Lit(lit) => Ok(lit.value.clone()),
            ExprKind::Ident(id) if id.is_var() => self
                .scopes
                .get(&id.name)
                .map(str::to_string)
                .ok_or_else(|| CompileError::UnresolvedReference(id.name.clone())),
            ExprKind::Ident(id) => Ok(id.name.clone()),
            other => panic!("unsupported value expression {:?}", other),
        }
    }
}
