// SPDX-License-Identifier: (MIT OR Apache-2.0)
//! The lexer implementation using logos.

use logos::Logos;
use sable_ast::token::{self, Token, TokenKind};
use sable_ast::Span;

/// Maximum number of errors to collect before stopping.
const MAX_ERRORS: usize = 20;

/// Raw token type for logos - classification happens in a second pass.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
enum RawToken {
    #[regex(r"/\*[^*]*\*+(?:[^/*][^*]*\*+)*/")]
    #[regex(r"//[^\n]*")]
    Comment,

    // `$name`, sigil included
    #[regex(r"\$[A-Za-z_][A-Za-z0-9_-]*")]
    Var,

    // `@mixin`, `@include`, ...
    #[regex(r"@[a-zA-Z-]+")]
    AtWord,

    // `10px`, `50%`, `-2.5em`
    #[regex(r"-?[0-9]+(\.[0-9]+)?[a-zA-Z%]+")]
    Dimension,

    #[regex(r"-?[0-9]+\.[0-9]+")]
    Float,

    #[regex(r"-?[0-9]+")]
    Int,

    // `#fff` hex colors and `#id` selectors alike
    #[regex(r"#[A-Za-z0-9_-]+")]
    Hash,

    #[regex(r#""[^"]*""#)]
    #[regex(r"'[^']*'")]
    Str,

    // `a`, `.class`, `-moz-border`
    #[regex(r"\.?-?[A-Za-z_][A-Za-z0-9_-]*")]
    Ident,

    #[token("&")]
    Amp,
    #[token(">")]
    Gt,
    #[token("~")]
    Tilde,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("=")]
    Eq,
    #[token(",")]
    Comma,
    #[token(".")]
    Period,
    #[token(":")]
    Colon,
    #[token(";")]
    Semi,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBrack,
    #[token("]")]
    RBrack,
}

/// A lexing error with its source location.
#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub span: Span,
    pub message: String,
}

impl LexError {
    fn unexpected_char(ch: char, pos: usize) -> Self {
        LexError {
            span: Span::new(pos, pos + ch.len_utf8()),
            message: format!("unexpected character `{}`", ch),
        }
    }

    fn unknown_directive(slice: &str, span: Span) -> Self {
        LexError {
            span,
            message: format!("unknown directive `{}`", slice),
        }
    }
}

/// The result of tokenizing a source, with every error collected.
#[derive(Debug)]
pub struct LexResult {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexError>,
}

impl LexResult {
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// The lexer for sable source text.
pub struct Lexer<'a> {
    source: &'a str,
    errors: Vec<LexError>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source text.
    pub fn new(source: &'a str) -> Self {
        Self { source, errors: Vec::new() }
    }

    /// Tokenize the entire source, collecting multiple errors.
    pub fn tokenize(&mut self) -> LexResult {
        let mut tokens = Vec::new();
        let mut logos_lexer = RawToken::lexer(self.source);

        while let Some(result) = logos_lexer.next() {
            if self.errors.len() >= MAX_ERRORS {
                break;
            }

            let span = logos_lexer.span();
            let slice = logos_lexer.slice();
            let span = Span::new(span.start, span.end);

            let kind = match result {
                Ok(raw) => match self.convert_token(raw, slice, span) {
                    Ok(kind) => kind,
                    Err(e) => {
                        self.errors.push(e);
                        continue;
                    }
                },
                Err(()) => {
                    let ch = self.source[span.start..].chars().next().unwrap_or('?');
                    self.errors.push(LexError::unexpected_char(ch, span.start));
                    continue;
                }
            };

            tokens.push(Token {
                kind,
                text: slice.to_string(),
                span,
            });
        }

        tokens.push(Token {
            kind: TokenKind::Eof,
            text: String::new(),
            span: Span::new(self.source.len(), self.source.len()),
        });

        LexResult {
            tokens,
            errors: std::mem::take(&mut self.errors),
        }
    }

    fn convert_token(&self, raw: RawToken, slice: &str, span: Span) -> Result<TokenKind, LexError> {
        let kind = match raw {
            RawToken::Comment => TokenKind::Comment,
            RawToken::Var => TokenKind::Ident,
            RawToken::AtWord => match slice {
                "@if" => TokenKind::If,
                "@else" => TokenKind::Else,
                "@each" => TokenKind::Each,
                "@import" => TokenKind::Import,
                "@include" => TokenKind::Include,
                "@function" => TokenKind::Func,
                "@mixin" => TokenKind::Mixin,
                _ => return Err(LexError::unknown_directive(slice, span)),
            },
            RawToken::Dimension | RawToken::Hash | RawToken::Str => TokenKind::Str,
            RawToken::Float => TokenKind::Float,
            RawToken::Int => TokenKind::Int,
            // Bare command directives (sprite helpers) keep their own kind
            RawToken::Ident => token::lookup(slice).unwrap_or(TokenKind::Ident),
            RawToken::Amp => TokenKind::Nest,
            RawToken::Gt => TokenKind::Gtr,
            RawToken::Tilde => TokenKind::Til,
            RawToken::Plus => TokenKind::Add,
            RawToken::Minus => TokenKind::Sub,
            RawToken::Star => TokenKind::Mul,
            RawToken::Slash => TokenKind::Quo,
            RawToken::Percent => TokenKind::Rem,
            RawToken::Eq => TokenKind::Assign,
            RawToken::Comma => TokenKind::Comma,
            RawToken::Period => TokenKind::Period,
            RawToken::Colon => TokenKind::Colon,
            RawToken::Semi => TokenKind::Semicolon,
            RawToken::LParen => TokenKind::Lparen,
            RawToken::RParen => TokenKind::Rparen,
            RawToken::LBrace => TokenKind::Lbrace,
            RawToken::RBrace => TokenKind::Rbrace,
            RawToken::LBrack => TokenKind::Lbrack,
            RawToken::RBrack => TokenKind::Rbrack,
        };
        Ok(kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let result = Lexer::new(src).tokenize();
        assert!(result.is_ok(), "lex errors: {:?}", result.errors);
        result.tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn simple_rule() {
        assert_eq!(
            kinds("a { color: red; }"),
            [
                TokenKind::Ident,
                TokenKind::Lbrace,
                TokenKind::Ident,
                TokenKind::Colon,
                TokenKind::Ident,
                TokenKind::Semicolon,
                TokenKind::Rbrace,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn variables_keep_their_sigil() {
        let result = Lexer::new("$color: red;").tokenize();
        assert!(result.is_ok());
        assert_eq!(result.tokens[0].kind, TokenKind::Ident);
        assert_eq!(result.tokens[0].text, "$color");
    }

    #[test]
    fn dimensions_are_single_tokens() {
        let result = Lexer::new("width: 10px; margin: -2.5em; x: 50%;").tokenize();
        assert!(result.is_ok());
        let texts: Vec<&str> = result
            .tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Str)
            .map(|t| t.text.as_str())
            .collect();
        assert_eq!(texts, ["10px", "-2.5em", "50%"]);
    }

    #[test]
    fn hex_colors_and_ids() {
        let result = Lexer::new("#fff #main").tokenize();
        assert!(result.is_ok());
        assert_eq!(result.tokens[0].text, "#fff");
        assert_eq!(result.tokens[1].text, "#main");
    }

    #[test]
    fn selector_operators() {
        assert_eq!(
            kinds("a > b, & ~ c + d"),
            [
                TokenKind::Ident,
                TokenKind::Gtr,
                TokenKind::Ident,
                TokenKind::Comma,
                TokenKind::Nest,
                TokenKind::Til,
                TokenKind::Ident,
                TokenKind::Add,
                TokenKind::Ident,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn directive_keywords() {
        assert_eq!(
            kinds("@mixin big { } @include big;"),
            [
                TokenKind::Mixin,
                TokenKind::Ident,
                TokenKind::Lbrace,
                TokenKind::Rbrace,
                TokenKind::Include,
                TokenKind::Ident,
                TokenKind::Semicolon,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn unknown_directive_is_an_error() {
        let result = Lexer::new("@media print { }").tokenize();
        assert!(!result.is_ok());
        assert!(result.errors[0].message.contains("@media"));
    }

    #[test]
    fn command_directives_keep_their_kind() {
        let result = Lexer::new("sprite-file").tokenize();
        assert!(result.is_ok());
        assert_eq!(result.tokens[0].kind, TokenKind::SpriteFile);
    }

    #[test]
    fn comments_are_tokens() {
        let result = Lexer::new("/* note */ a { } // end").tokenize();
        assert!(result.is_ok());
        assert_eq!(result.tokens[0].kind, TokenKind::Comment);
        assert_eq!(result.tokens[0].text, "/* note */");
        assert_eq!(result.tokens.last().map(|t| t.kind), Some(TokenKind::Eof));
    }

    #[test]
    fn adjacency_is_visible_in_spans() {
        let result = Lexer::new("a:hover b").tokenize();
        assert!(result.is_ok());
        let toks = &result.tokens;
        // `a` `:` `hover` touch; `hover` and `b` do not
        assert_eq!(toks[0].span.end, toks[1].span.start);
        assert_eq!(toks[1].span.end, toks[2].span.start);
        assert!(toks[2].span.end < toks[3].span.start);
    }
}
