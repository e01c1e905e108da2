//! # Statement Code Generator
//!
//! Lowers a [`Stmt`] node to Uxntal text. Each function here is responsible
//! for leaving the symbolic stack depth exactly as it found it once its own
//! construct is fully lowered — [`Stmt::ExprStmt`] pops its own expression's
//! residue rather than counting on a caller to do it, since an un-braced
//! `if`/`while`/`for` body is a single `Stmt` lowered directly by
//! [`StatementGenerator::generate`] and never passes through
//! [`crate::codegen::generate_block`] at all.

use super::common::Emitter;
use super::expression_generator::ExpressionGenerator;
use super::print_generator::PrintGenerator;
use crate::ast::nodes::{Expr, ScopeRecord, Stmt};
use crate::ast::types::PrimitiveType;
use crate::compiler::error::CompileError;

pub struct StatementGenerator;

impl StatementGenerator {
    pub fn generate(emitter: &mut Emitter<'_>, stmt: &Stmt<'_>) -> Result<(), CompileError> {
        match stmt {
            Stmt::Print { value, .. } => PrintGenerator::generate(emitter, value),
            Stmt::DeclVar {
                var_ref, ty, init, ..
            } => Self::generate_decl_var(emitter, var_ref.scope, var_ref.slot, *ty, init.as_ref()),
            Stmt::ExprStmt { expr } => {
                ExpressionGenerator::generate(emitter, expr)?;
                // Pop our own residue here rather than relying on the caller:
                // an un-braced `if`/`while`/`for` body is a single `Stmt`
                // lowered directly by `Self::generate`, never passed through
                // `codegen::generate_block`'s end-of-statement pop.
                if emitter.depth() > 0 {
                    emitter.pop_bytes(emitter.depth());
                }
                Ok(())
            }
            Stmt::Scope { scope, body } => Self::generate_scope(emitter, scope.clone(), body),
            Stmt::If {
                cond,
                then_branch,
                else_branch,
                ..
            } => Self::generate_if(emitter, cond, then_branch, else_branch.as_deref()),
            Stmt::While { cond, body, .. } => Self::generate_while(emitter, cond, body),
            Stmt::For {
                init,
                cond,
                iter,
                body,
                ..
            } => Self::generate_for(emitter, init, cond, iter, body),
        }
    }

    fn generate_decl_var(
        emitter: &mut Emitter<'_>,
        scope: usize,
        slot: usize,
        ty: PrimitiveType,
        init: Option<&Expr<'_>>,
    ) -> Result<(), CompileError> {
        let Some(init) = init else {
            return Ok(());
        };
        let line = init.token().line;
        let init_ty = ExpressionGenerator::generate(emitter, init)?;
        if init_ty != ty {
            emitter.try_cast(init_ty, ty, line)?;
        }
        let offset = emitter.get_offset(scope, slot);
        emitter.emit(&format!("#{offset:04x}"));
        emitter.push(2);
        let helper = if ty.size() == 2 {
            "poke-uxncle-short"
        } else {
            "poke-uxncle"
        };
        emitter.emit(&format!(";{helper} JSR2"));
        emitter.pop(2 + ty.size());
        Ok(())
    }

    fn generate_scope(
        emitter: &mut Emitter<'_>,
        scope: ScopeRecord<'_>,
        body: &[Stmt<'_>],
    ) -> Result<(), CompileError> {
        emitter.enter_scope(scope);
        crate::codegen::generate_block(emitter, body)?;
        emitter.exit_scope();
        Ok(())
    }

    /// Casts a lowered condition value to `bool` in place if it isn't
    /// already one.
    fn lower_condition(emitter: &mut Emitter<'_>, cond: &Expr<'_>) -> Result<(), CompileError> {
        let ty = ExpressionGenerator::generate(emitter, cond)?;
        if ty != PrimitiveType::Bool {
            emitter.try_cast(ty, PrimitiveType::Bool, cond.token().line)?;
        }
        Ok(())
    }

    /// Logically negates the 1-byte boolean on top of the stack in place.
    fn invert_condition(emitter: &mut Emitter<'_>) {
        emitter.emit("#00");
        emitter.push(1);
        emitter.emit("EQU");
        emitter.pop(2);
        emitter.push(1);
    }

    fn generate_if(
        emitter: &mut Emitter<'_>,
        cond: &Expr<'_>,
        then_branch: &Stmt<'_>,
        else_branch: Option<&Stmt<'_>>,
    ) -> Result<(), CompileError> {
        let n = emitter.next_label();
        Self::lower_condition(emitter, cond)?;
        Self::invert_condition(emitter);

        match else_branch {
            Some(else_branch) => {
                emitter.emit(&format!(",&lbl{n}_else JCN"));
                emitter.pop(1);
                Self::generate(emitter, then_branch)?;
                emitter.emit(&format!(",&lbl{n}_end JMP"));
                emitter.emit(&format!("&lbl{n}_else"));
                Self::generate(emitter, else_branch)?;
                emitter.emit(&format!("&lbl{n}_end"));
            }
            None => {
                emitter.emit(&format!(",&lbl{n}_end JCN"));
                emitter.pop(1);
                Self::generate(emitter, then_branch)?;
                emitter.emit(&format!("&lbl{n}_end"));
            }
        }
        Ok(())
    }

    fn generate_while(
        emitter: &mut Emitter<'_>,
        cond: &Expr<'_>,
        body: &Stmt<'_>,
    ) -> Result<(), CompileError> {
        let n = emitter.next_label();
        emitter.emit(&format!("&lbl{n}_top"));
        Self::lower_condition(emitter, cond)?;
        Self::invert_condition(emitter);
        emitter.emit(&format!(",&lbl{n}_end JCN"));
        emitter.pop(1);
        Self::generate(emitter, body)?;
        emitter.emit(&format!(",&lbl{n}_top JMP"));
        emitter.emit(&format!("&lbl{n}_end"));
        Ok(())
    }

    fn generate_for(
        emitter: &mut Emitter<'_>,
        init: &Expr<'_>,
        cond: &Expr<'_>,
        iter: &Expr<'_>,
        body: &Stmt<'_>,
    ) -> Result<(), CompileError> {
        ExpressionGenerator::generate(emitter, init)?;
        if emitter.depth() > 0 {
            emitter.pop_bytes(emitter.depth());
        }

        let n = emitter.next_label();
        emitter.emit(&format!("&lbl{n}_top"));
        Self::lower_condition(emitter, cond)?;
        Self::invert_condition(emitter);
        emitter.emit(&format!(",&lbl{n}_end JCN"));
        emitter.pop(1);
        Self::generate(emitter, body)?;

        ExpressionGenerator::generate(emitter, iter)?;
        if emitter.depth() > 0 {
            emitter.pop_bytes(emitter.depth());
        }

        emitter.emit(&format!(",&lbl{n}_top JMP"));
        emitter.emit(&format!("&lbl{n}_end"));
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

    fn label_count(asm: &str, pattern: &str) -> usize {
        asm.matches(pattern).count()
    }

    #[test]
    fn if_without_else_emits_a_single_end_label_referenced_once() {
        let asm = generate_source("if (1) prntint 1;");
        // one jump to it, one definition of it.
        assert_eq!(label_count(&asm, "_end"), 2);
        assert!(!asm.contains("_else"));
    }

    #[test]
    fn if_with_else_emits_both_branch_labels() {
        let asm = generate_source("if (1) prntint 1; else prntint 2;");
        assert_eq!(label_count(&asm, "_else"), 2);
        assert_eq!(label_count(&asm, "_end"), 2);
    }

    #[test]
    fn while_loop_jumps_back_to_its_own_top_label() {
        let asm = generate_source("int i = 0; while (i != 10) { i = i + 1; }");
        assert!(asm.contains("_top"));
        assert!(asm.contains(",&lbl0_top JMP") || asm.contains("JMP"));
    }

    #[test]
    fn nested_control_flow_never_reuses_a_label_number() {
        let asm = generate_source(
            "int i = 0; while (i != 3) { if (i == 1) prntint i; i = i + 1; }",
        );
        let top_labels: Vec<&str> = asm
            .lines()
            .filter(|l| l.trim_start().starts_with("&lbl") && l.contains("_top"))
            .collect();
        assert_eq!(top_labels.len(), 1, "while loop should define exactly one top label");
    }

    #[test]
    fn for_loop_lowers_init_condition_and_iterator() {
        let asm = generate_source("int i; for (i = 0; i != 5; i = i + 1) prntint i;");
        assert!(asm.contains(";peek-uxncle-short JSR2") || asm.contains("peek-uxncle"));
        assert!(asm.contains("_top"));
    }

    #[test]
    fn expression_statement_residue_is_popped() {
        let asm = generate_source("int a = 1; a + 1;");
        assert!(asm.contains("POP2"));
    }

    #[test]
    fn unbraced_loop_body_pops_its_own_assignment_residue_every_iteration() {
        // An un-braced `while` body is a single `Stmt` lowered directly,
        // never passed through `generate_block`'s end-of-statement pop —
        // the assignment expression statement must pop its own result.
        // The body sits between the conditional jump (JCN) and the
        // backward jump (JMP) that closes the loop.
        let asm = generate_source("int i = 0; while (i != 10) i = i + 1;");
        let body_start = asm.find("JCN").unwrap();
        let body_end = asm[body_start..].find("JMP").unwrap() + body_start;
        assert!(asm[body_start..body_end].contains("POP2"));
    }

    #[test]
    fn scope_block_emits_matching_alloc_and_dealloc_byte_counts() {
        let asm = generate_source("{ int a; char b; }");
        assert!(asm.contains("#0003 ;alloc-uxncle JSR2"));
        assert!(asm.contains("#0003 ;dealloc-uxncle JSR2"));
    }
}
