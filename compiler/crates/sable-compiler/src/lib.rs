// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Compiles sable stylesheets to plain CSS.
//!
//! The pipeline: lex, parse, then a single walk over the AST that
//! resolves selectors, evaluates variable scopes and built-in calls, and
//! emits nested-style CSS.

mod call;
mod compiler;
mod scope;

use std::path::Path;

pub use compiler::{CompileError, Compiler};
pub use sable_parser::Mode;

/// Compile a single sable file to CSS.
pub fn compile_file(path: impl AsRef<Path>) -> Result<String, CompileError> {
    let source = std::fs::read_to_string(path)?;
    compile_str(&source)
}

/// Compile in-memory sable source to CSS.
pub fn compile_str(source: &str) -> Result<String, CompileError> {
    let mut result = sable_parser::parse_str(source, Mode::PARSE_COMMENTS);
    if !result.errors.is_empty() {
        return Err(CompileError::Parse(result.errors.remove(0)));
    }
    let mut compiler = Compiler::new();
    compiler.compile(&mut result.file)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(src: &str) -> String {
        compile_str(src).unwrap_or_else(|e| panic!("failed to compile {:?}: {}", src, e))
    }

    #[test]
    fn simple_rule() {
        assert_eq!(compile("a { color: red; }"), "a {\n  color: red; }\n");
    }

    #[test]
    fn multiple_rules_in_a_block() {
        assert_eq!(
            compile("a { color: red; width: 10px; }"),
            "a {\n  color: red;\n  width: 10px; }\n"
        );
    }

    #[test]
    fn sibling_blocks_are_separated_by_a_blank_line() {
        assert_eq!(
            compile("a { color: red; }\nb { color: blue; }"),
            "a {\n  color: red; }\n\nb {\n  color: blue; }\n"
        );
    }

    #[test]
    fn nesting_flattens_to_a_descendant_selector() {
        assert_eq!(compile("a { b { color: red; } }"), "a b {\n  color: red; }\n");
    }

    #[test]
    fn nested_block_after_rules_closes_and_indents() {
        assert_eq!(
            compile("a { color: red; b { color: blue; } }"),
            "a {\n  color: red; }\n  a b {\n    color: blue; }\n"
        );
    }

    #[test]
    fn rules_after_a_nested_block_reopen_the_selector() {
        assert_eq!(
            compile("a { b { x: y; } color: red; }"),
            "a b {\n  x: y; }\n\na {\n  color: red; }\n"
        );
    }

    #[test]
    fn comma_group_with_nesting_resolves_per_branch() {
        assert_eq!(
            compile("a, b { & c { x: y; } }"),
            "a c, b c {\n  x: y; }\n"
        );
    }

    #[test]
    fn plain_nesting_under_a_group_also_distributes() {
        assert_eq!(
            compile("a, b { c { x: y; } }"),
            "a c, b c {\n  x: y; }\n"
        );
    }

    #[test]
    fn combinators_keep_their_spacing() {
        assert_eq!(compile("a > b { x: y; }"), "a > b {\n  x: y; }\n");
        assert_eq!(compile("a + b { x: y; }"), "a + b {\n  x: y; }\n");
        assert_eq!(compile("a ~ b { x: y; }"), "a ~ b {\n  x: y; }\n");
    }

    #[test]
    fn variables_resolve_through_the_scope_chain() {
        assert_eq!(
            compile("$c: red; a { color: $c; }"),
            "a {\n  color: red; }\n"
        );
    }

    #[test]
    fn inner_scopes_shadow_without_leaking() {
        assert_eq!(
            compile("$c: red;\na { $c: blue; color: $c; }\nb { color: $c; }"),
            "a {\n  color: blue; }\n\nb {\n  color: red; }\n"
        );
    }

    #[test]
    fn builtin_calls_resolve_to_literals() {
        assert_eq!(
            compile("a { color: rgb(1, 2, 3); }"),
            "a {\n  color: rgb(1,2,3); }\n"
        );
    }

    #[test]
    fn calls_accept_variables_and_nesting() {
        assert_eq!(
            compile("$g: 2; a { color: rgb(1, $g, round(2.6)); }"),
            "a {\n  color: rgb(1,2,3); }\n"
        );
    }

    #[test]
    fn mixins_expand_into_the_current_block() {
        let src = "@mixin size($w, $h: 10px) { width: $w; height: $h; }\n\
                   a { @include size(5px); color: red; }";
        assert_eq!(
            compile(src),
            "a {\n  width: 5px;\n  height: 10px;\n  color: red; }\n"
        );
    }

    #[test]
    fn imports_pass_through() {
        assert_eq!(
            compile("@import \"base.css\";\na { color: red; }"),
            "@import \"base.css\";\n\na {\n  color: red; }\n"
        );
    }

    #[test]
    fn bare_reference_emits_its_value() {
        assert_eq!(compile("$c: red;\n$c;\n"), "red;\n");
    }

    #[test]
    fn output_always_ends_with_a_newline() {
        assert!(compile("a { color: red; }").ends_with('\n'));
        assert_eq!(compile(""), "");
    }

    #[test]
    fn unknown_function_errors() {
        assert!(matches!(
            compile_str("a { color: nope(1); }"),
            Err(CompileError::FunctionNotFound(name)) if name == "nope"
        ));
    }

    #[test]
    fn undefined_variable_errors() {
        assert!(matches!(
            compile_str("a { color: $missing; }"),
            Err(CompileError::UnresolvedReference(name)) if name == "$missing"
        ));
    }

    #[test]
    fn unknown_mixin_errors() {
        assert!(matches!(
            compile_str("a { @include ghost; }"),
            Err(CompileError::MixinNotFound(name)) if name == "ghost"
        ));
    }

    #[test]
    fn parse_errors_carry_their_position() {
        let err = compile_str("a { color red; }").unwrap_err();
        let CompileError::Parse(parse) = &err else { panic!("expected a parse error") };
        assert!(err.span().is_some());
        assert!(parse.message.starts_with("expected"));
    }

    /// Walks `spec/basic/*` at the repository root: each case directory
    /// holds `input.scss` and `expected_output.css`, compared byte for
    /// byte after stripping backtick annotation markers.
    #[test]
    fn conformance_corpus() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR"))
            .parent().unwrap()
            .parent().unwrap()
            .parent().unwrap()
            .join("spec/basic");

        let mut cases: Vec<_> = std::fs::read_dir(&dir)
            .expect("spec/basic directory not found")
            .map(|entry| entry.unwrap().path())
            .filter(|path| path.is_dir())
            .collect();
        cases.sort();
        assert!(!cases.is_empty(), "no conformance cases in {}", dir.display());

        for case in cases {
            let input = case.join("input.scss");
            let expected = std::fs::read_to_string(case.join("expected_output.css"))
                .unwrap_or_else(|e| panic!("missing expectation for {}: {}", case.display(), e));
            let out = compile_file(&input)
                .unwrap_or_else(|e| panic!("failed to compile {}: {}", input.display(), e));
            let out = out.replace('`', "");
            assert_eq!(out, expected, "output mismatch for {}", case.display());
        }
    }
}
