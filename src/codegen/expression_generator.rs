//! # Expression Code Generator
//!
//! Lowers an [`Expr`] node to Uxntal text, one rule per variant. Every
//! lowering function leaves exactly one value of the type it returns on top
//! of the data stack and reports that growth through [`Emitter::push`], so
//! the statement generator can later pop a full expression's residue with a
//! single, width-correct call.

use super::common::{Emitter, common_type, width_suffix};
use crate::ast::nodes::{BinOp, Expr};
use crate::ast::types::PrimitiveType;
use crate::compiler::error::CompileError;

pub struct ExpressionGenerator;

impl ExpressionGenerator {
    /// Lowers `expr`, returning the type of the single value it leaves on
    /// top of the stack.
    pub fn generate(
        emitter: &mut Emitter<'_>,
        expr: &Expr<'_>,
    ) -> Result<PrimitiveType, CompileError> {
        match expr {
            Expr::IntLit { value, .. } => Self::generate_int_lit(emitter, *value),
            Expr::Var { var_ref, token } => {
                Self::generate_var(emitter, var_ref.scope, var_ref.slot, token.line)
            }
            Expr::Binary {
                op, left, right, ..
            } => Self::generate_binary(emitter, *op, left, right),
            Expr::Assign { target, value, .. } => Self::generate_assign(emitter, target, value),
        }
    }

    fn generate_int_lit(
        emitter: &mut Emitter<'_>,
        value: u16,
    ) -> Result<PrimitiveType, CompileError> {
        emitter.emit(&format!("#{value:04x}"));
        emitter.push(2);
        Ok(PrimitiveType::Int)
    }

    fn generate_var(
        emitter: &mut Emitter<'_>,
        scope: usize,
        slot: usize,
        line: u32,
    ) -> Result<PrimitiveType, CompileError> {
        let ty = Self::var_type(emitter, scope, slot, line)?;
        let offset = emitter.get_offset(scope, slot);
        emitter.emit(&format!("#{offset:04x}"));
        emitter.push(2);
        let helper = if ty.size() == 2 {
            "peek-uxncle-short"
        } else {
            "peek-uxncle"
        };
        emitter.emit(&format!(";{helper} JSR2"));
        emitter.pop(2);
        emitter.push(ty.size());
        Ok(ty)
    }

    fn var_type(
        emitter: &Emitter<'_>,
        scope: usize,
        slot: usize,
        line: u32,
    ) -> Result<PrimitiveType, CompileError> {
        emitter
            .scope_variable_type(scope, slot)
            .ok_or_else(|| CompileError::Internal(format!("scope/slot out of range at line {line}")))
    }

    fn generate_binary(
        emitter: &mut Emitter<'_>,
        op: BinOp,
        left: &Expr<'_>,
        right: &Expr<'_>,
    ) -> Result<PrimitiveType, CompileError> {
        use BinOp::*;
        match op {
            Add | Sub | Mul | Div => Self::generate_arith(emitter, op, left, right),
            Eq | Neq | Lt | Gt => Self::generate_compare(emitter, op, left, right),
            Le => Self::generate_le_ge(emitter, left, right, "GTH"),
            Ge => Self::generate_le_ge(emitter, left, right, "LTH"),
        }
    }

    /// Binary arithmetic requires both operands to already share the same
    /// type — unlike comparisons, it never widens a mismatched pair — and
    /// the result retains that operand type. Emits the two-byte `2`-suffixed
    /// instruction for `int` operands, or the byte-wide form for `char`/`bool`.
    fn generate_arith(
        emitter: &mut Emitter<'_>,
        op: BinOp,
        left: &Expr<'_>,
        right: &Expr<'_>,
    ) -> Result<PrimitiveType, CompileError> {
        let line = left.token().line;
        let lt = Self::generate(emitter, left)?;
        let rt = Self::generate(emitter, right)?;
        if lt != rt {
            return Err(CompileError::type_error(
                line,
                format!("arithmetic requires matching operand types, got '{lt}' and '{rt}'"),
            ));
        }
        let instr = match op {
            BinOp::Add => "ADD",
            BinOp::Sub => "SUB",
            BinOp::Mul => "MUL",
            BinOp::Div => "DIV",
            _ => unreachable!("generate_arith dispatched on a non-arithmetic operator"),
        };
        emitter.emit(&format!("{instr}{}", width_suffix(lt)));
        emitter.pop(lt.size() * 2);
        emitter.push(lt.size());
        Ok(lt)
    }

    fn generate_compare(
        emitter: &mut Emitter<'_>,
        op: BinOp,
        left: &Expr<'_>,
        right: &Expr<'_>,
    ) -> Result<PrimitiveType, CompileError> {
        let (common, width) = Self::lower_widened_pair(emitter, left, right)?;
        let instr = match op {
            BinOp::Eq => "EQU",
            BinOp::Neq => "NEQ",
            BinOp::Lt => "LTH",
            BinOp::Gt => "GTH",
            _ => unreachable!("generate_compare dispatched on a non-comparison operator"),
        };
        emitter.emit(&format!("{instr}{}", width_suffix(common)));
        emitter.pop(width * 2);
        emitter.push(1);
        Ok(PrimitiveType::Bool)
    }

    /// `<=` lowers to `GTH(width) #01 NEQ`, `>=` to `LTH(width) #01 NEQ` —
    /// greater-than (or less-than) negated, not the other comparison
    /// negated, which would invert the operand direction.
    fn generate_le_ge(
        emitter: &mut Emitter<'_>,
        left: &Expr<'_>,
        right: &Expr<'_>,
        base_instr: &str,
    ) -> Result<PrimitiveType, CompileError> {
        let (common, width) = Self::lower_widened_pair(emitter, left, right)?;
        emitter.emit(&format!("{base_instr}{}", width_suffix(common)));
        emitter.pop(width * 2);
        emitter.push(1);
        emitter.emit("#01");
        emitter.push(1);
        emitter.emit("NEQ");
        emitter.pop(2);
        emitter.push(1);
        Ok(PrimitiveType::Bool)
    }

    /// Lowers `left` then `right`, widening each to their common type in
    /// place as soon as it is on top of the stack, and returns that common
    /// type plus its byte width.
    fn lower_widened_pair(
        emitter: &mut Emitter<'_>,
        left: &Expr<'_>,
        right: &Expr<'_>,
    ) -> Result<(PrimitiveType, u16), CompileError> {
        let lt = Self::generate(emitter, left)?;
        let rt_preview = Self::peek_type(right);
        let common = common_type(lt, rt_preview.unwrap_or(lt));
        if lt != common {
            emitter.try_cast(lt, common, left.token().line)?;
        }
        let rt = Self::generate(emitter, right)?;
        if rt != common {
            emitter.try_cast(rt, common, right.token().line)?;
        }
        Ok((common, common.size()))
    }

    /// A best-effort static type guess used only to decide the common
    /// comparison width before `right` is actually lowered — correctness
    /// does not depend on this being exact, since `right`'s real type is
    /// checked and cast after it is lowered too.
    fn peek_type(expr: &Expr<'_>) -> Option<PrimitiveType> {
        match expr {
            Expr::IntLit { .. } => Some(PrimitiveType::Int),
            _ => None,
        }
    }

    fn generate_assign(
        emitter: &mut Emitter<'_>,
        target: &Expr<'_>,
        value: &Expr<'_>,
    ) -> Result<PrimitiveType, CompileError> {
        let Expr::Var { var_ref, token } = target else {
            return Err(CompileError::parser(
                target.token().line,
                "assignment target must be a variable",
            ));
        };
        let target_ty = Self::var_type(emitter, var_ref.scope, var_ref.slot, token.line)?;

        let vt = Self::generate(emitter, value)?;
        if vt != target_ty {
            emitter.try_cast(vt, target_ty, value.token().line)?;
        }

        let dup_instr = if target_ty.size() == 2 { "DUP2" } else { "DUP" };
        emitter.emit(dup_instr);
        emitter.push(target_ty.size());

        let offset = emitter.get_offset(var_ref.scope, var_ref.slot);
        emitter.emit(&format!("#{offset:04x}"));
        emitter.push(2);
        let helper = if target_ty.size() == 2 {
            "poke-uxncle-short"
        } else {
            "poke-uxncle"
        };
        emitter.emit(&format!(";{helper} JSR2"));
        emitter.pop(2 + target_ty.size());

        Ok(target_ty)
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
    fn int_literal_pushes_a_four_digit_hex_short() {
        let asm = generate_source("prntint 0xFF;");
        assert!(asm.contains("#00ff"));
    }

    #[test]
    fn subtraction_preserves_source_operand_order() {
        let asm = generate_source("int a = 9; int b = 3; prntint a - b;");
        // left then right pushed, SUB2 computes left - right.
        assert!(asm.contains("SUB2"));
    }

    #[test]
    fn division_is_left_associative_in_emission_order() {
        let asm = generate_source("int a = 64; prntint a / 8 / 2;");
        let first = asm.find("DIV2").unwrap();
        let second = asm[first + 1..].find("DIV2");
        assert!(second.is_some(), "expected two DIV2 instructions");
    }

    #[test]
    fn le_lowers_to_negated_gth() {
        let asm = generate_source("int a = 1; if (a <= 2) prntint 1;");
        assert!(asm.contains("GTH2"));
    }

    #[test]
    fn ge_lowers_to_negated_lth() {
        let asm = generate_source("int a = 1; if (a >= 2) prntint 1;");
        assert!(asm.contains("LTH2"));
    }

    #[test]
    fn assignment_to_narrower_type_emits_the_narrowing_cast() {
        let asm = generate_source("char c; c = 300;");
        assert!(asm.contains("SWP POP"));
    }

    #[test]
    fn comparison_result_is_usable_as_a_bool_condition() {
        let asm = generate_source("bool b = 5 + 3;");
        assert!(asm.contains("NEQ2"));
    }
}
