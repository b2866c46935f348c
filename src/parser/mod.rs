//! Parser for Logo
//!
//! This module provides:
//! - Lexer (tokenization)
//! - Parser (AST construction)
//! - AST definitions
//! - Source line tracking

pub mod ast;
pub mod lexer;
#[allow(clippy::module_inception)]
pub mod parser;
pub mod span;

pub use ast::*;
pub use lexer::{tokenize, Lexer, Token, TokenKind};
pub use parser::Parser;
pub use span::SourceFile;

use crate::diagnostics::LogoError;

/// Parse a token stream into a program
pub fn parse(tokens: Vec<Token>) -> Result<Program, LogoError> {
    Parser::new(tokens).parse_program()
}

/// Tokenize and parse source text
pub fn parse_source(source: &str) -> Result<Program, LogoError> {
    parse(tokenize(source))
}
