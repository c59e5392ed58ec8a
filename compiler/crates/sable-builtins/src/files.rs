// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Asset path helpers.

use sable_ast::expr::BasicLit;
use sable_ast::token::TokenKind;
use sable_parser::builtin::{self, BuiltinError, CallSite};

pub fn register() {
    builtin::register("image-url($path)", image_url);
    builtin::register("url($path)", url);
}

/// Plain CSS `url(...)` values pass through untouched.
fn url(call: &CallSite, args: &[BasicLit]) -> Result<BasicLit, BuiltinError> {
    let [path] = args else {
        return Err(BuiltinError::Arity { func: call.name.clone(), expected: 1, got: args.len() });
    };
    Ok(BasicLit::new(
        TokenKind::Str,
        format!("url({})", path.value),
        call.span,
    ))
}

fn image_url(call: &CallSite, args: &[BasicLit]) -> Result<BasicLit, BuiltinError> {
    let [path] = args else {
        return Err(BuiltinError::Arity { func: call.name.clone(), expected: 1, got: args.len() });
    };
    let trimmed = path.value.trim_matches(|c| c == '"' || c == '\'');
    Ok(BasicLit::new(
        TokenKind::Str,
        format!("url(\"{}\")", trimmed),
        call.span,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sable_ast::Span;

    #[test]
    fn url_passes_through() {
        let call = CallSite { name: "url".to_string(), span: Span::default() };
        let arg = BasicLit::new(TokenKind::Str, "\"bg.png\"", Span::default());
        assert_eq!(url(&call, &[arg]).unwrap().value, "url(\"bg.png\")");
    }

    #[test]
    fn wraps_and_normalizes_quotes() {
        let call = CallSite { name: "image-url".to_string(), span: Span::default() };
        let quoted = BasicLit::new(TokenKind::Str, "\"cat.png\"", Span::default());
        assert_eq!(image_url(&call, &[quoted]).unwrap().value, "url(\"cat.png\")");
        let bare = BasicLit::new(TokenKind::Str, "dog.png", Span::default());
        assert_eq!(image_url(&call, &[bare]).unwrap().value, "url(\"dog.png\")");
    }
}
