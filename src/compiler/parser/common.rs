//! # Parser Core
//!
//! Defines [`Parser`], the token cursor and scope table shared by the
//! statement and expression parsers. Variable/scope resolution happens here,
//! as a side effect of parsing, rather than in a later semantic-analysis
//! pass: a `DeclVar` allocates a slot the moment it is parsed, and an
//! identifier reference is resolved against the live scope stack the moment
//! it is read.

use crate::ast::nodes::{Program, ScopeRecord, Stmt, VarRef, Variable};
use crate::ast::types::{MAX_LOCALS, MAX_SCOPES, PrimitiveType};
use crate::compiler::error::CompileError;
use crate::compiler::lexer::{Token, TokenKind};
use crate::debug;

use super::statement_parser::StatementParser;

/// The token cursor plus the stack of scopes currently being parsed.
/// Scopes are pushed on `{` and popped on the matching `}`, exactly
/// mirroring the code generator's own scope stack during lowering.
pub struct Parser<'src> {
    tokens: Vec<Token<'src>>,
    pos: usize,
    scopes: Vec<ScopeRecord<'src>>,
    next_scope_index: usize,
}

impl<'src> Parser<'src> {
    pub fn new(tokens: Vec<Token<'src>>) -> Self {
        Self {
            tokens,
            pos: 0,
            scopes: vec![ScopeRecord::new(0)],
            next_scope_index: 1,
        }
    }

    pub fn peek(&self) -> &Token<'src> {
        &self.tokens[self.pos]
    }

    pub fn is_at_end(&self) -> bool {
        self.peek().is_eof()
    }

    pub fn advance(&mut self) -> Token<'src> {
        let token = self.tokens[self.pos].clone();
        if !self.is_at_end() {
            self.pos += 1;
        }
        token
    }

    pub fn check<F: Fn(&TokenKind<'src>) -> bool>(&self, predicate: F) -> bool {
        predicate(&self.peek().kind)
    }

    /// Consumes the current token if it satisfies `predicate`, otherwise
    /// reports a parse error naming what was expected instead.
    pub fn expect<F: Fn(&TokenKind<'src>) -> bool>(
        &mut self,
        predicate: F,
        expected: &str,
    ) -> Result<Token<'src>, CompileError> {
        if self.check(predicate) {
            Ok(self.advance())
        } else {
            let found = self.peek();
            Err(CompileError::parser(
                found.line,
                format!("expected {expected}, found {}", found.kind.describe()),
            ))
        }
    }

    pub fn push_scope(&mut self) -> Result<(), CompileError> {
        if self.scopes.len() >= MAX_SCOPES {
            return Err(CompileError::capacity_exceeded(
                "too many active scopes",
                self.peek().line,
            ));
        }
        let index = self.next_scope_index;
        self.next_scope_index += 1;
        debug::log_parser(&format!("entering scope {index}"));
        self.scopes.push(ScopeRecord::new(index));
        Ok(())
    }

    pub fn pop_scope(&mut self) -> ScopeRecord<'src> {
        let scope = self.scopes.pop().expect("scope stack underflow");
        debug::log_parser(&format!("leaving scope {}", scope.index));
        scope
    }

    /// Declares a new variable in the innermost active scope. Fails if the
    /// name is already declared in that *same* scope — shadowing a name
    /// from an enclosing scope is legal.
    pub fn declare_variable(
        &mut self,
        name: Token<'src>,
        ty: PrimitiveType,
    ) -> Result<VarRef, CompileError> {
        let line = name.line;
        let scope = self.scopes.last().expect("no active scope");
        if scope.find(name.lexeme).is_some() {
            return Err(CompileError::redeclaration(name.lexeme, line));
        }
        if scope.variables.len() >= MAX_LOCALS {
            return Err(CompileError::capacity_exceeded(
                "too many locals in scope",
                line,
            ));
        }
        let var_ref = VarRef {
            scope: scope.index,
            slot: scope.variables.len(),
        };
        self.scopes
            .last_mut()
            .unwrap()
            .variables
            .push(Variable { name, ty, var_ref });
        Ok(var_ref)
    }

    /// Resolves a name against the scope stack, innermost scope first.
    pub fn resolve_variable(
        &self,
        name: &str,
        line: u32,
    ) -> Result<(VarRef, PrimitiveType), CompileError> {
        for scope in self.scopes.iter().rev() {
            if let Some(var) = scope.find(name) {
                return Ok((var.var_ref, var.ty));
            }
        }
        Err(CompileError::undefined_variable(name, line))
    }

    /// Parses the whole token stream into a [`Program`].
    pub fn parse_program(mut self) -> Result<Program<'src>, CompileError> {
        let mut statements: Vec<Stmt<'src>> = Vec::new();
        while !self.is_at_end() {
            statements.push(StatementParser::parse_statement(&mut self)?);
        }
        let root = self.pop_scope();
        debug_assert!(self.scopes.is_empty(), "unbalanced scope stack at EOF");
        Ok(Program { root, statements })
    }
}
