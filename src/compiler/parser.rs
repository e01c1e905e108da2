//! # Parser Module
//!
//! The primary interface for the syntactic-analysis phase. Converts the
//! token stream the lexer produces into a [`Program`], resolving variable
//! scope/slot references along the way.

pub mod common;
pub mod expression_parser;
pub mod statement_parser;

use crate::ast::nodes::Program;
use crate::compiler::error::CompileError;
use crate::compiler::lexer::Token;

/// Parses a complete token stream into a [`Program`] AST.
pub fn parse(tokens: Vec<Token<'_>>) -> Result<Program<'_>, CompileError> {
    use common::Parser;

    let parser = Parser::new(tokens);
    parser.parse_program()
}
