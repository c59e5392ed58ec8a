// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! Token definitions for the lexer.

use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use crate::Span;

/// A token produced by the lexer.
///
/// `text` holds the lexeme as written in the source; for fixed-spelling
/// tokens it equals `kind.spelling()`.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

/// The kind of token, partitioned into literal, operator, keyword,
/// command, and include-mixin groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Illegal,
    Eof,
    Comment,

    // Literals
    Ident,
    Int,
    Float,
    Str,

    // Operators and delimiters
    Add,    // +
    Sub,    // -
    Mul,    // *
    Quo,    // /
    Rem,    // %
    Nest,   // &
    Gtr,    // >
    Til,    // ~
    Assign, // =
    Comma,
    Period,
    Colon,
    Semicolon,
    Lparen,
    Rparen,
    Lbrace,
    Rbrace,
    Lbrack,
    Rbrack,

    // Keywords
    If,      // @if
    Else,    // @else
    Each,    // @each
    Import,  // @import
    Include, // @include
    Func,    // @function
    Mixin,   // @mixin

    // Command directives
    Sprite,
    SpriteFile,
    SpriteDimensions,
    SpriteHeight,
    SpriteWidth,

    // Include-mixin helpers
    File,
    Background,
}

/// All token kinds, for exhaustive classification tests.
pub const ALL: &[TokenKind] = &[
    TokenKind::Illegal,
    TokenKind::Eof,
    TokenKind::Comment,
    TokenKind::Ident,
    TokenKind::Int,
    TokenKind::Float,
    TokenKind::Str,
    TokenKind::Add,
    TokenKind::Sub,
    TokenKind::Mul,
    TokenKind::Quo,
    TokenKind::Rem,
    TokenKind::Nest,
    TokenKind::Gtr,
    TokenKind::Til,
    TokenKind::Assign,
    TokenKind::Comma,
    TokenKind::Period,
    TokenKind::Colon,
    TokenKind::Semicolon,
    TokenKind::Lparen,
    TokenKind::Rparen,
    TokenKind::Lbrace,
    TokenKind::Rbrace,
    TokenKind::Lbrack,
    TokenKind::Rbrack,
    TokenKind::If,
    TokenKind::Else,
    TokenKind::Each,
    TokenKind::Import,
    TokenKind::Include,
    TokenKind::Func,
    TokenKind::Mixin,
    TokenKind::Sprite,
    TokenKind::SpriteFile,
    TokenKind::SpriteDimensions,
    TokenKind::SpriteHeight,
    TokenKind::SpriteWidth,
    TokenKind::File,
    TokenKind::Background,
];

/// The command directives entered into the lookup table.
const COMMANDS: &[TokenKind] = &[
    TokenKind::Sprite,
    TokenKind::SpriteFile,
    TokenKind::SpriteDimensions,
    TokenKind::SpriteHeight,
    TokenKind::SpriteWidth,
];

static DIRECTIVES: OnceLock<HashMap<&'static str, TokenKind>> = OnceLock::new();

/// Look up a command directive by its canonical spelling.
///
/// Returns `None` for anything that is not a registered directive.
pub fn lookup(ident: &str) -> Option<TokenKind> {
    let directives = DIRECTIVES.get_or_init(|| {
        COMMANDS.iter().map(|&kind| (kind.spelling(), kind)).collect()
    });
    directives.get(ident).copied()
}

impl TokenKind {
    /// The canonical spelling used for stringification and reverse lookup.
    pub fn spelling(self) -> &'static str {
        match self {
            TokenKind::Illegal => "ILLEGAL",
            TokenKind::Eof => "EOF",
            TokenKind::Comment => "comment",

            TokenKind::Ident => "IDENT",
            TokenKind::Int => "INT",
            TokenKind::Float => "FLOAT",
            TokenKind::Str => "STRING",

            TokenKind::Add => "+",
            TokenKind::Sub => "-",
            TokenKind::Mul => "*",
            TokenKind::Quo => "/",
            TokenKind::Rem => "%",
            TokenKind::Nest => "&",
            TokenKind::Gtr => ">",
            TokenKind::Til => "~",
            TokenKind::Assign => "=",
            TokenKind::Comma => ",",
            TokenKind::Period => ".",
            TokenKind::Colon => ":",
            TokenKind::Semicolon => ";",
            TokenKind::Lparen => "(",
            TokenKind::Rparen => ")",
            TokenKind::Lbrace => "{",
            TokenKind::Rbrace => "}",
            TokenKind::Lbrack => "[",
            TokenKind::Rbrack => "]",

            TokenKind::If => "@if",
            TokenKind::Else => "@else",
            TokenKind::Each => "@each",
            TokenKind::Import => "@import",
            TokenKind::Include => "@include",
            TokenKind::Func => "@function",
            TokenKind::Mixin => "@mixin",

            TokenKind::Sprite => "sprite",
            TokenKind::SpriteFile => "sprite-file",
            TokenKind::SpriteDimensions => "sprite-dimensions",
            TokenKind::SpriteHeight => "sprite-height",
            TokenKind::SpriteWidth => "sprite-width",

            TokenKind::File => "file",
            TokenKind::Background => "background",
        }
    }

    /// True for identifiers and basic literals.
    pub fn is_literal(self) -> bool {
        matches!(
            self,
            TokenKind::Ident | TokenKind::Int | TokenKind::Float | TokenKind::Str
        )
    }

    /// True for operators and delimiters.
    pub fn is_operator(self) -> bool {
        matches!(
            self,
            TokenKind::Add
                | TokenKind::Sub
                | TokenKind::Mul
                | TokenKind::Quo
                | TokenKind::Rem
                | TokenKind::Nest
                | TokenKind::Gtr
                | TokenKind::Til
                | TokenKind::Assign
                | TokenKind::Comma
                | TokenKind::Period
                | TokenKind::Colon
                | TokenKind::Semicolon
                | TokenKind::Lparen
                | TokenKind::Rparen
                | TokenKind::Lbrace
                | TokenKind::Rbrace
                | TokenKind::Lbrack
                | TokenKind::Rbrack
        )
    }

    /// True for `@`-directive keywords.
    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::If
                | TokenKind::Else
                | TokenKind::Each
                | TokenKind::Import
                | TokenKind::Include
                | TokenKind::Func
                | TokenKind::Mixin
        )
    }

    /// True for command directives (the lookup table entries).
    pub fn is_command(self) -> bool {
        COMMANDS.contains(&self)
    }

    /// Selector operator precedence: nesting binds tightest, then CSS
    /// combinators, then comma groups; everything else is lowest.
    pub fn precedence(self) -> u8 {
        match self {
            TokenKind::Nest => 5,
            TokenKind::Add | TokenKind::Gtr | TokenKind::Til => 4,
            TokenKind::Comma => 3,
            _ => 0,
        }
    }

    /// Name used in diagnostics, e.g. `expected ';', found 'EOF'`.
    pub fn name(self) -> &'static str {
        self.spelling()
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.spelling())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicates_are_disjoint() {
        for &kind in ALL {
            let hits = [kind.is_literal(), kind.is_operator(), kind.is_keyword()]
                .iter()
                .filter(|&&b| b)
                .count();
            assert!(hits <= 1, "{:?} is in more than one range", kind);
        }
    }

    #[test]
    fn command_lookup_round_trips() {
        for &kind in ALL {
            if kind.is_command() {
                assert_eq!(lookup(kind.spelling()), Some(kind));
            }
        }
        assert_eq!(lookup("sprite-file"), Some(TokenKind::SpriteFile));
        assert_eq!(lookup("not-a-directive"), None);
        // Keywords are not directives
        assert_eq!(lookup("@mixin"), None);
    }

    #[test]
    fn operator_spellings() {
        assert_eq!(TokenKind::Nest.spelling(), "&");
        assert_eq!(TokenKind::Gtr.spelling(), ">");
        assert_eq!(TokenKind::Til.spelling(), "~");
        assert_eq!(TokenKind::Comma.spelling(), ",");
    }

    #[test]
    fn selector_precedence_ordering() {
        assert!(TokenKind::Nest.precedence() > TokenKind::Add.precedence());
        assert!(TokenKind::Add.precedence() > TokenKind::Comma.precedence());
        assert_eq!(TokenKind::Gtr.precedence(), TokenKind::Til.precedence());
        assert_eq!(TokenKind::Ident.precedence(), 0);
    }
}
