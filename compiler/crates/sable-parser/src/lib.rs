//! Parser for the sable stylesheet language.
//!
//! Transforms a token stream into an abstract syntax tree, and hosts the
//! registry of native built-ins declared through signature stubs.

pub mod builtin;
mod parser;

use std::ops::{BitOr, BitOrAssign};

pub use parser::{ParseError, ParseResult, Parser};

/// Parser behavior flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Mode(u32);

impl Mode {
    /// Retain comments on the parsed file.
    pub const PARSE_COMMENTS: Mode = Mode(1 << 0);
    /// Log productions to stderr while parsing.
    pub const TRACE: Mode = Mode(1 << 1);
    /// Parse a single built-in signature stub instead of a file.
    pub const FUNC_ONLY: Mode = Mode(1 << 2);

    pub fn contains(self, other: Mode) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Mode {
    type Output = Mode;

    fn bitor(self, rhs: Mode) -> Mode {
        Mode(self.0 | rhs.0)
    }
}

impl BitOrAssign for Mode {
    fn bitor_assign(&mut self, rhs: Mode) {
        self.0 |= rhs.0;
    }
}

/// Lex and parse a source string in one step.
pub fn parse_str(source: &str, mode: Mode) -> ParseResult {
    let lexed = sable_lexer::Lexer::new(source).tokenize();
    let mut errors: Vec<ParseError> = lexed
        .errors
        .into_iter()
        .map(|e| ParseError { span: e.span, message: e.message, hint: None })
        .collect();
    let result = Parser::new(lexed.tokens, mode).parse();
    errors.extend(result.errors);
    ParseResult { file: result.file, errors }
}
