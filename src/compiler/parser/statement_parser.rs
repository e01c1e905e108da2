//! # Statement Parser
//!
//! Parses the statement forms uxncle recognizes: `prntint`, typed
//! declarations, `{ ... }` scope blocks, `if`/`else`, `while`, `for`, and
//! bare expression statements. Delegates expression parsing to
//! [`ExpressionParser`].

use super::common::Parser;
use super::expression_parser::ExpressionParser;
use crate::ast::nodes::Stmt;
use crate::ast::types::PrimitiveType;
use crate::compiler::error::CompileError;
use crate::compiler::lexer::TokenKind;

/// A static utility struct dedicated to parsing statements and building
/// statement AST nodes.
pub struct StatementParser;

impl StatementParser {
    pub fn parse_statement<'src>(parser: &mut Parser<'src>) -> Result<Stmt<'src>, CompileError> {
        match parser.peek().kind {
            TokenKind::PrintInt => Self::parse_print(parser),
            TokenKind::Int | TokenKind::Char | TokenKind::Bool => Self::parse_decl(parser),
            TokenKind::LeftBrace => Self::parse_scope(parser),
            TokenKind::If => Self::parse_if(parser),
            TokenKind::While => Self::parse_while(parser),
            TokenKind::For => Self::parse_for(parser),
            _ => Self::parse_expr_stmt(parser),
        }
    }

    fn parse_print<'src>(parser: &mut Parser<'src>) -> Result<Stmt<'src>, CompileError> {
        let token = parser.advance();
        let value = ExpressionParser::parse_expression(parser)?;
        parser.expect(|k| matches!(k, TokenKind::Semicolon), "';'")?;
        Ok(Stmt::Print { value, token })
    }

    fn parse_decl<'src>(parser: &mut Parser<'src>) -> Result<Stmt<'src>, CompileError> {
        let ty_token = parser.advance();
        let ty = match ty_token.kind {
            TokenKind::Int => PrimitiveType::Int,
            TokenKind::Char => PrimitiveType::Char,
            TokenKind::Bool => PrimitiveType::Bool,
            _ => unreachable!("parse_decl dispatched on a non-type token"),
        };
        let name = parser.expect(|k| matches!(k, TokenKind::Identifier(_)), "identifier")?;
        let var_ref = parser.declare_variable(name.clone(), ty)?;

        let init = if parser.check(|k| matches!(k, TokenKind::Equal)) {
            parser.advance();
            Some(ExpressionParser::parse_expression(parser)?)
        } else {
            None
        };

        parser.expect(|k| matches!(k, TokenKind::Semicolon), "';'")?;
        Ok(Stmt::DeclVar {
            var_ref,
            ty,
            name,
            init,
        })
    }

    fn parse_scope<'src>(parser: &mut Parser<'src>) -> Result<Stmt<'src>, CompileError> {
        parser.expect(|k| matches!(k, TokenKind::LeftBrace), "'{'")?;
        parser.push_scope()?;

        let mut body = Vec::new();
        while !parser.check(|k| matches!(k, TokenKind::RightBrace)) && !parser.is_at_end() {
            body.push(Self::parse_statement(parser)?);
        }

        parser.expect(|k| matches!(k, TokenKind::RightBrace), "'}'")?;
        let scope = parser.pop_scope();
        Ok(Stmt::Scope { scope, body })
    }

    fn parse_if<'src>(parser: &mut Parser<'src>) -> Result<Stmt<'src>, CompileError> {
        let token = parser.advance();
        parser.expect(|k| matches!(k, TokenKind::LeftParen), "'('")?;
        let cond = ExpressionParser::parse_expression(parser)?;
        parser.expect(|k| matches!(k, TokenKind::RightParen), "')'")?;
        let then_branch = Box::new(Self::parse_statement(parser)?);

        let else_branch = if parser.check(|k| matches!(k, TokenKind::Else)) {
            parser.advance();
            Some(Box::new(Self::parse_statement(parser)?))
        } else {
            None
        };

        Ok(Stmt::If {
            cond,
            then_branch,
            else_branch,
            token,
        })
    }

    fn parse_while<'src>(parser: &mut Parser<'src>) -> Result<Stmt<'src>, CompileError> {
        let token = parser.advance();
        parser.expect(|k| matches!(k, TokenKind::LeftParen), "'('")?;
        let cond = ExpressionParser::parse_expression(parser)?;
        parser.expect(|k| matches!(k, TokenKind::RightParen), "')'")?;
        let body = Box::new(Self::parse_statement(parser)?);
        Ok(Stmt::While { cond, body, token })
    }

    fn parse_for<'src>(parser: &mut Parser<'src>) -> Result<Stmt<'src>, CompileError> {
        let token = parser.advance();
        parser.expect(|k| matches!(k, TokenKind::LeftParen), "'('")?;
        // All three clauses are plain expressions, including assignment —
        // never a declaration or nested statement.
        let init = ExpressionParser::parse_expression(parser)?;
        parser.expect(|k| matches!(k, TokenKind::Semicolon), "';'")?;
        let cond = ExpressionParser::parse_expression(parser)?;
        parser.expect(|k| matches!(k, TokenKind::Semicolon), "';'")?;
        let iter = ExpressionParser::parse_expression(parser)?;
        parser.expect(|k| matches!(k, TokenKind::RightParen), "')'")?;
        let body = Box::new(Self::parse_statement(parser)?);
        Ok(Stmt::For {
            init,
            cond,
            iter,
            body,
            token,
        })
    }

    fn parse_expr_stmt<'src>(parser: &mut Parser<'src>) -> Result<Stmt<'src>, CompileError> {
        let expr = ExpressionParser::parse_expression(parser)?;
        parser.expect(|k| matches!(k, TokenKind::Semicolon), "';'")?;
        Ok(Stmt::ExprStmt { expr })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::nodes::Program;
    use crate::compiler::lexer::tokenize;
    use crate::compiler::parser::parse;

    fn parse_program(source: &str) -> Program<'_> {
        parse(tokenize(source).unwrap()).unwrap()
    }

    #[test]
    fn missing_semicolon_is_a_parse_error() {
        let err = parse(tokenize("prntint 1").unwrap()).unwrap_err();
        assert!(matches!(err, CompileError::ParseError { line: 1, .. }));
    }

    #[test]
    fn redeclaration_in_the_same_scope_is_rejected() {
        let err = parse(tokenize("int a; int a;").unwrap()).unwrap_err();
        assert!(matches!(err, CompileError::Redeclaration { .. }));
    }

    #[test]
    fn shadowing_in_a_nested_scope_is_allowed() {
        let program = parse_program("int a; { int a; }");
        assert_eq!(program.statements.len(), 2);
    }

    #[test]
    fn if_without_else_has_no_else_branch() {
        let program = parse_program("if (1) prntint 1;");
        let Stmt::If { else_branch, .. } = &program.statements[0] else {
            panic!("expected an If statement");
        };
        assert!(else_branch.is_none());
    }

    #[test]
    fn for_loop_requires_all_three_clauses() {
        let err = parse(tokenize("for (;;) prntint 1;").unwrap());
        assert!(err.is_err());
    }

    #[test]
    fn undefined_variable_reference_is_a_parse_error() {
        let err = parse(tokenize("prntint x;").unwrap()).unwrap_err();
        assert!(matches!(err, CompileError::UndefinedVariable { .. }));
    }
}
