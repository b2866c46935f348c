//! Lexer for Logo source text
//!
//! The lexer is total: characters that cannot start a token are skipped
//! rather than reported, so every input produces a token stream ending
//! in [`TokenKind::Eof`].

use std::fmt;

use logos::Logos;

use crate::diagnostics::Span;

/// Token types for Logo
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"([ \t\r\n\f]+|;[^\n]*)")]
pub enum TokenKind {
    // A sign is part of the number only when a digit follows it directly,
    // so `FD -5` is one token and `FD - 5` is three. An exponent needs
    // at least one digit: `1e3` is a number, `1e` is `1` then a word.
    #[regex(r"[+-]?[0-9]+(\.[0-9]*)?([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    Number(f64),

    // `?` continues a word so predicates like `EMPTY?` stay one token.
    #[regex(r"[A-Za-z_][A-Za-z0-9_?]*", |lex| lex.slice().to_string())]
    Word(String),

    // Punctuation
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(":")]
    Colon,
    #[token("\"")]
    Quote,

    // Operators
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("=")]
    Eq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("<>")]
    NotEq,

    // End of input
    Eof,
}

/// A token with its literal text and source span
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self {
            kind,
            text: text.into(),
            span,
        }
    }

    /// Byte offset of the token in the source
    pub fn offset(&self) -> usize {
        self.span.start
    }

    /// Whether this is a word equal to `name`, ignoring case
    pub fn is_word(&self, name: &str) -> bool {
        matches!(&self.kind, TokenKind::Word(w) if w.eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Eof => f.write_str("end of input"),
            _ => write!(f, "`{}`", self.text),
        }
    }
}

/// Lexer over a source string
pub struct Lexer<'a> {
    source: &'a str,
    logos_lexer: logos::Lexer<'a, TokenKind>,
    at_eof: bool,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for the given source text
    pub fn new(source: &'a str) -> Self {
        Self {
            source,
            logos_lexer: TokenKind::lexer(source),
            at_eof: false,
        }
    }

    /// Get the next token, skipping unrecognized characters.
    ///
    /// Returns [`TokenKind::Eof`] once the input is exhausted, and keeps
    /// returning it on further calls.
    pub fn next_token(&mut self) -> Token {
        if !self.at_eof {
            while let Some(result) = self.logos_lexer.next() {
                let range = self.logos_lexer.span();
                match result {
                    Ok(kind) => {
                        return Token::new(
                            kind,
                            self.logos_lexer.slice(),
                            Span::new(range.start, range.end),
                        );
                    }
                    Err(()) => {
                        tracing::trace!(
                            offset = range.start,
                            text = self.logos_lexer.slice(),
                            "skipping unrecognized input"
                        );
                    }
                }
            }
            self.at_eof = true;
        }

        let end = self.source.len();
        Token::new(TokenKind::Eof, "", Span::new(end, end))
    }
}

/// Tokenize a whole program. The result always ends with an EOF token.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token();
        let done = token.kind == TokenKind::Eof;
        tokens.push(token);
        if done {
            return tokens;
        }
    }
}

#[cfg(test)]
#[path = "lexer_tests.rs"]
mod tests;
