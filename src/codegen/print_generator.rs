//! # Print Statement Code Generator
//!
//! `prntint <expr>;` always prints its operand as a 2-byte integer — lower
//! the operand widened to `int`, hand it to the decimal-print subroutine,
//! then emit a trailing space to the console device port.

use super::common::Emitter;
use super::expression_generator::ExpressionGenerator;
use crate::ast::nodes::Expr;
use crate::ast::types::PrimitiveType;
use crate::compiler::error::CompileError;

pub struct PrintGenerator;

impl PrintGenerator {
    pub fn generate(emitter: &mut Emitter<'_>, value: &Expr<'_>) -> Result<(), CompileError> {
        let line = value.token().line;
        let ty = ExpressionGenerator::generate(emitter, value)?;
        if ty != PrimitiveType::Int {
            emitter.try_cast(ty, PrimitiveType::Int, line)?;
        }
        emitter.emit(";print-decimal JSR2");
        emitter.pop(2);
        emitter.emit("#20 .Console/char DEO");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    fn generate_source(source: &str) -> String {
        let tokens = crate::compiler::lexer::tokenize(source).unwrap();
        let program = crate::compiler::parser::parse(tokens).unwrap();
        crate::codegen::generate(&program).unwrap()
    }

    #[test]
    fn print_calls_the_decimal_routine_and_emits_a_trailing_space() {
        let asm = generate_source("prntint 1;");
        assert!(asm.contains(";print-decimal JSR2"));
        assert!(asm.contains("#20 .Console/char DEO"));
    }

    #[test]
    fn print_widens_a_char_operand_to_int_first() {
        let asm = generate_source("char c = 65; prntint c;");
        assert!(asm.contains("#00 SWP"));
    }
}
