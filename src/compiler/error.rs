//! # Compiler Error Definitions
//!
//! Centralizes the error types that can occur anywhere in the compilation
//! pipeline — lexing, parsing, and code generation. Built on `thiserror` for
//! the same reason the rest of this crate reaches for it: `Display` text
//! generated from `#[error(...)]` rather than hand-rolled `impl Display`.

use thiserror::Error;

/// Errors raised while scanning a character literal. These surface to the
/// parser as a `TokenKind::Error` rather than aborting the lexer outright.
#[derive(Error, Debug, Clone, PartialEq, Default)]
pub enum LexError {
    #[default]
    #[error("unrecognized character")]
    UnexpectedCharacter,

    #[error("unterminated character literal")]
    UnterminatedCharLiteral,

    #[error("malformed character literal")]
    MalformedCharLiteral,

    #[error("unknown escape sequence '\\{0}'")]
    UnknownEscape(char),

    #[error("character literal is not ASCII")]
    NonAsciiChar(char),
}

/// The primary error enumeration for the `uxncle` compiler.
#[derive(Error, Debug)]
pub enum CompileError {
    /// Wrapper for standard I/O errors (reading the source, writing the output).
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// A malformed token (bad character literal, stray character) reached the parser.
    #[error("lex error at line {line}: {source}")]
    LexError {
        line: u32,
        #[source]
        source: LexError,
    },

    /// Structural parse errors: unexpected tokens, missing punctuation, bad grammar.
    #[error("parse error at line {line}: {message}")]
    ParseError { line: u32, message: String },

    /// A variable was declared twice in the same scope.
    #[error("'{name}' is already declared in this scope (line {line})")]
    Redeclaration { name: String, line: u32 },

    /// A variable was referenced before (or without ever) being declared.
    #[error("undefined variable '{name}' (line {line})")]
    UndefinedVariable { name: String, line: u32 },

    /// An expression's type cannot be implicitly converted to the context
    /// that needs it (assignment, condition, arithmetic operand).
    #[error("type error at line {line}: {message}")]
    TypeError { line: u32, message: String },

    /// Too many locals in one scope, or too many concurrently active scopes.
    #[error("capacity exceeded at line {line}: {what}")]
    CapacityExceeded { what: String, line: u32 },

    /// An invariant the compiler itself should guarantee was violated.
    #[error("internal compiler error: {0}")]
    Internal(String),
}

impl CompileError {
    pub fn lex(line: u32, source: LexError) -> Self {
        Self::LexError { line, source }
    }

    pub fn parser(line: u32, message: impl Into<String>) -> Self {
        Self::ParseError {
            line,
            message: message.into(),
        }
    }

    pub fn redeclaration(name: impl Into<String>, line: u32) -> Self {
        Self::Redeclaration {
            name: name.into(),
            line,
        }
    }

    pub fn undefined_variable(name: impl Into<String>, line: u32) -> Self {
        Self::UndefinedVariable {
            name: name.into(),
            line,
        }
    }

    pub fn type_error(line: u32, message: impl Into<String>) -> Self {
        Self::TypeError {
            line,
            message: message.into(),
        }
    }

    pub fn capacity_exceeded(what: impl Into<String>, line: u32) -> Self {
        Self::CapacityExceeded {
            what: what.into(),
            line,
        }
    }
}
