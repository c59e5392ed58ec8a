// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Numeric helpers. Units ride along: `round(10.6px)` is `11px`.

use sable_ast::expr::BasicLit;
use sable_ast::token::TokenKind;
use sable_parser::builtin::{self, BuiltinError, CallSite};

pub fn register() {
    builtin::register("round($value)", round);
    builtin::register("ceil($value)", ceil);
    builtin::register("floor($value)", floor);
    builtin::register("abs($value)", abs);
    builtin::register("percentage($value)", percentage);
}

fn round(call: &CallSite, args: &[BasicLit]) -> Result<BasicLit, BuiltinError> {
    map_number(call, args, f64::round)
}

fn ceil(call: &CallSite, args: &[BasicLit]) -> Result<BasicLit, BuiltinError> {
    map_number(call, args, f64::ceil)
}

fn floor(call: &CallSite, args: &[BasicLit]) -> Result<BasicLit, BuiltinError> {
    map_number(call, args, f64::floor)
}

fn abs(call: &CallSite, args: &[BasicLit]) -> Result<BasicLit, BuiltinError> {
    map_number(call, args, f64::abs)
}

fn percentage(call: &CallSite, args: &[BasicLit]) -> Result<BasicLit, BuiltinError> {
    let [value] = args else {
        return Err(BuiltinError::Arity { func: call.name.clone(), expected: 1, got: args.len() });
    };
    let (n, _) = split_dimension(call, &value.value)?;
    Ok(BasicLit::new(
        TokenKind::Str,
        format!("{}%", format_number(n * 100.0)),
        call.span,
    ))
}

fn map_number(
    call: &CallSite,
    args: &[BasicLit],
    f: fn(f64) -> f64,
) -> Result<BasicLit, BuiltinError> {
    let [value] = args else {
        return Err(BuiltinError::Arity { func: call.name.clone(), expected: 1, got: args.len() });
    };
    let (n, unit) = split_dimension(call, &value.value)?;
    Ok(BasicLit::new(
        TokenKind::Str,
        format!("{}{}", format_number(f(n)), unit),
        call.span,
    ))
}

/// `10.6px` → (10.6, "px"); `0.5` → (0.5, "").
fn split_dimension<'a>(call: &CallSite, value: &'a str) -> Result<(f64, &'a str), BuiltinError> {
    let split = value
        .char_indices()
        .find(|(i, c)| c.is_alphabetic() || (*c == '%' && *i > 0))
        .map(|(i, _)| i)
        .unwrap_or(value.len());
    let (number, unit) = value.split_at(split);
    let n: f64 = number.parse().map_err(|_| BuiltinError::NotANumber {
        func: call.name.clone(),
        value: value.to_string(),
    })?;
    Ok((n, unit))
}

/// Whole results print without a fractional part.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sable_ast::Span;

    fn call(name: &str) -> CallSite {
        CallSite { name: name.to_string(), span: Span::default() }
    }

    fn arg(value: &str) -> BasicLit {
        BasicLit::new(TokenKind::Str, value, Span::default())
    }

    #[test]
    fn rounding_keeps_units() {
        assert_eq!(round(&call("round"), &[arg("10.6px")]).unwrap().value, "11px");
        assert_eq!(ceil(&call("ceil"), &[arg("10.1em")]).unwrap().value, "11em");
        assert_eq!(floor(&call("floor"), &[arg("10.9")]).unwrap().value, "10");
    }

    #[test]
    fn abs_strips_the_sign() {
        assert_eq!(abs(&call("abs"), &[arg("-3px")]).unwrap().value, "3px");
    }

    #[test]
    fn percentage_scales_fractions() {
        assert_eq!(percentage(&call("percentage"), &[arg("0.5")]).unwrap().value, "50%");
        assert_eq!(percentage(&call("percentage"), &[arg("0.125")]).unwrap().value, "12.5%");
    }

    #[test]
    fn non_numbers_are_rejected() {
        assert!(round(&call("round"), &[arg("red")]).is_err());
    }
}
