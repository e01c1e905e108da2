//! # Expression Parser
//!
//! Implements Pratt (operator-precedence) parsing for uxncle expressions.
//! Precedence climbs from assignment (lowest, right-associative) through
//! comparison, term, and factor (highest, apart from primaries), via a
//! fixed per-token precedence lookup rather than a chain of grammar-rule
//! functions.

use super::common::Parser;
use crate::ast::nodes::{BinOp, Expr};
use crate::compiler::error::CompileError;
use crate::compiler::lexer::TokenKind;

const ASSIGNMENT: u8 = 1;
const COMPARISON: u8 = 2;
const TERM: u8 = 3;
const FACTOR: u8 = 4;

/// A static utility struct dedicated to parsing expressions and building
/// expression AST nodes.
pub struct ExpressionParser;

impl ExpressionParser {
    pub fn parse_expression<'src>(parser: &mut Parser<'src>) -> Result<Expr<'src>, CompileError> {
        Self::parse_binary_expression(parser, ASSIGNMENT)
    }

    /// Operator-precedence climbing. `min_precedence` is the lowest
    /// precedence an operator found in this call may bind at; recursive
    /// calls raise it by one to enforce left-associativity, except for
    /// assignment, which re-enters at its own level to stay right-associative.
    fn parse_binary_expression<'src>(
        parser: &mut Parser<'src>,
        min_precedence: u8,
    ) -> Result<Expr<'src>, CompileError> {
        let mut left = Self::parse_primary(parser)?;

        loop {
            let precedence = Self::get_precedence(&parser.peek().kind);
            if precedence == 0 || precedence < min_precedence {
                break;
            }

            if matches!(parser.peek().kind, TokenKind::Equal) {
                let token = parser.advance();
                if !matches!(left, Expr::Var { .. }) {
                    return Err(CompileError::parser(
                        token.line,
                        "assignment target must be a variable",
                    ));
                }
                let value = Self::parse_binary_expression(parser, ASSIGNMENT)?;
                left = Expr::Assign {
                    target: Box::new(left),
                    value: Box::new(value),
                    token,
                };
                continue;
            }

            let token = parser.advance();
            let op = Self::to_binop(&token.kind);
            let right = Self::parse_binary_expression(parser, precedence + 1)?;
            left = Expr::Binary {
                op,
                left: Box::new(left),
                right: Box::new(right),
                token,
            };
        }

        Ok(left)
    }

    /// Precedence of `kind` as an infix operator, or `0` if it is not one.
    fn get_precedence(kind: &TokenKind) -> u8 {
        match kind {
            TokenKind::Equal => ASSIGNMENT,
            TokenKind::EqualEqual
            | TokenKind::BangEqual
            | TokenKind::Less
            | TokenKind::Greater
            | TokenKind::LessEqual
            | TokenKind::GreaterEqual => COMPARISON,
            TokenKind::Plus | TokenKind::Minus => TERM,
            TokenKind::Star | TokenKind::Slash => FACTOR,
            _ => 0,
        }
    }

    fn to_binop(kind: &TokenKind) -> BinOp {
        match kind {
            TokenKind::Plus => BinOp::Add,
            TokenKind::Minus => BinOp::Sub,
            TokenKind::Star => BinOp::Mul,
            TokenKind::Slash => BinOp::Div,
            TokenKind::EqualEqual => BinOp::Eq,
            TokenKind::BangEqual => BinOp::Neq,
            TokenKind::Less => BinOp::Lt,
            TokenKind::Greater => BinOp::Gt,
            TokenKind::LessEqual => BinOp::Le,
            TokenKind::GreaterEqual => BinOp::Ge,
            other => unreachable!("{other:?} is not a binary operator"),
        }
    }

    fn parse_primary<'src>(parser: &mut Parser<'src>) -> Result<Expr<'src>, CompileError> {
        let token = parser.peek().clone();
        match token.kind {
            TokenKind::Number(digits) => {
                parser.advance();
                let value: u16 = digits.parse().map_err(|_| {
                    CompileError::parser(token.line, format!("invalid integer literal '{digits}'"))
                })?;
                Ok(Expr::IntLit { value, token })
            }
            TokenKind::Hex(lexeme) => {
                parser.advance();
                let value = u16::from_str_radix(&lexeme[2..], 16).map_err(|_| {
                    CompileError::parser(token.line, format!("invalid hex literal '{lexeme}'"))
                })?;
                Ok(Expr::IntLit { value, token })
            }
            TokenKind::Identifier(name) => {
                parser.advance();
                let (var_ref, _ty) = parser.resolve_variable(name, token.line)?;
                Ok(Expr::Var { var_ref, token })
            }
            _ => Err(CompileError::parser(
                token.line,
                format!("expected expression, found {}", token.kind.describe()),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::lexer::tokenize;

    fn parse_expr(source: &str) -> Expr<'_> {
        let tokens = tokenize(source).unwrap();
        let mut parser = Parser::new(tokens);
        ExpressionParser::parse_expression(&mut parser).unwrap()
    }

    #[test]
    fn factor_binds_tighter_than_term() {
        let expr = parse_expr("1 + 2 * 3");
        let Expr::Binary { op: BinOp::Add, right, .. } = &expr else {
            panic!("expected a top-level Add, got {expr:?}");
        };
        assert!(matches!(**right, Expr::Binary { op: BinOp::Mul, .. }));
    }

    #[test]
    fn assignment_is_right_associative() {
        let tokens = tokenize("a = b = 1").unwrap();
        let mut parser = Parser::new(tokens);
        parser.declare_variable(
            crate::compiler::lexer::Token {
                kind: TokenKind::Identifier("a"),
                lexeme: "a",
                span: 0..1,
                line: 1,
            },
            crate::ast::types::PrimitiveType::Int,
        ).unwrap();
        parser.declare_variable(
            crate::compiler::lexer::Token {
                kind: TokenKind::Identifier("b"),
                lexeme: "b",
                span: 0..1,
                line: 1,
            },
            crate::ast::types::PrimitiveType::Int,
        ).unwrap();
        let expr = ExpressionParser::parse_expression(&mut parser).unwrap();
        let Expr::Assign { value, .. } = &expr else {
            panic!("expected a top-level Assign, got {expr:?}");
        };
        assert!(matches!(**value, Expr::Assign { .. }));
    }

    #[test]
    fn assigning_to_a_non_variable_is_a_parse_error() {
        let tokens = tokenize("1 = 2").unwrap();
        let mut parser = Parser::new(tokens);
        let err = ExpressionParser::parse_expression(&mut parser).unwrap_err();
        assert!(matches!(err, CompileError::ParseError { .. }));
    }

    #[test]
    fn hex_literal_parses_as_an_int_lit() {
        let expr = parse_expr("0xFFFF");
        assert!(matches!(expr, Expr::IntLit { value: 0xFFFF, .. }));
    }

    #[test]
    fn a_bare_left_paren_in_primary_position_is_a_parse_error() {
        // primary is NUMBER | HEX | IDENT only — no grouping production.
        let tokens = tokenize("(1 + 2) * 3").unwrap();
        let mut parser = Parser::new(tokens);
        let err = ExpressionParser::parse_expression(&mut parser).unwrap_err();
        assert!(matches!(err, CompileError::ParseError { .. }));
    }
}
