//! # uxncle
//!
//! A compiler from a small C-like imperative language ("uxncle") to
//! Uxntal, the textual assembly dialect of the Uxn stack virtual machine.
//! The pipeline is a [`compiler::lexer`], a Pratt-precedence
//! [`compiler::parser`] that resolves variable scope/slot references as a
//! side effect of parsing, and a [`codegen`] pass that lowers the typed AST
//! to Uxntal text while tracking the symbolic depth of the data stack.

pub mod ast;
pub mod codegen;
pub mod compiler;
pub mod debug;

pub use compiler::error::CompileError;
pub use compiler::{compile_file, parse, tokenize};

/// Compiles `source` straight to Uxntal assembly text, without touching
/// the filesystem. The thin wrapper [`compiler::compile_file`] is what the
/// CLI uses instead, since it also has a source and output path to manage.
pub fn compile(source: &str) -> Result<String, CompileError> {
    let tokens = tokenize(source)?;
    let program = parse(tokens)?;
    codegen::generate(&program)
}
