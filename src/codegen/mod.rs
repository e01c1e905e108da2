//! # Code Generation Module
//!
//! Lowers a parsed [`Program`] to Uxntal text: fixed preamble, the program
//! body (root scope entered like any nested block, statements lowered in
//! order), fixed postamble.
//!
//! - **`common`**: [`common::Emitter`], the shared mutable context, plus the
//!   semantic helpers (`get_size`/`get_scope_size`/`get_offset`) and the
//!   implicit-cast instruction sequences (`try_cast`).
//! - **`expression_generator`**: one lowering rule per [`crate::ast::nodes::Expr`] variant.
//! - **`statement_generator`**: one lowering rule per [`crate::ast::nodes::Stmt`] variant.
//! - **`print_generator`**: the `prntint` statement.

pub mod common;
pub mod expression_generator;
pub mod print_generator;
pub mod statement_generator;

use crate::ast::nodes::{Program, Stmt};
use crate::compiler::error::CompileError;
use crate::debug;
use common::{Emitter, POSTAMBLE, PREAMBLE};
use statement_generator::StatementGenerator;

/// Lowers every statement in `body` in order, resetting the symbolic stack
/// depth to zero after each one — mirroring the original's "pop everything
/// this statement pushed" discipline, which is what lets a bare expression
/// statement's unused value get discarded without every individual
/// lowering rule having to special-case it.
pub fn generate_block(emitter: &mut Emitter<'_>, body: &[Stmt<'_>]) -> Result<(), CompileError> {
    for stmt in body {
        StatementGenerator::generate(emitter, stmt)?;
        if emitter.depth() > 0 {
            emitter.pop_bytes(emitter.depth());
        }
    }
    Ok(())
}

/// Lowers a complete program to Uxntal text.
pub fn generate(program: &Program<'_>) -> Result<String, CompileError> {
    let mut emitter = Emitter::new();
    emitter.emit_raw(PREAMBLE);

    debug::log_codegen(&format!(
        "lowering program: {} top-level statement(s)",
        program.statements.len()
    ));

    emitter.enter_scope(program.root.clone());
    generate_block(&mut emitter, &program.statements)?;
    emitter.exit_scope();

    emitter.emit_raw(POSTAMBLE);
    Ok(emitter.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::nodes::ScopeRecord;

    fn empty_program() -> Program<'static> {
        Program {
            root: ScopeRecord::new(0),
            statements: Vec::new(),
        }
    }

    #[test]
    fn empty_program_wraps_preamble_and_postamble_around_an_empty_root_frame() {
        let out = generate(&empty_program()).unwrap();
        assert!(out.starts_with("|10 @Console"));
        assert!(out.contains("#0000 ;alloc-uxncle JSR2"));
        assert!(out.contains("#0000 ;dealloc-uxncle JSR2"));
        assert!(out.trim_end().ends_with("|ffff &end"));
    }

    /// Builds a source program out of an arbitrary sequence of declaration
    /// and arithmetic-assignment statements on one `int` variable, then
    /// checks the symbolic stack-depth invariant holds across the whole
    /// compilation: `generate_block` pops every statement's residue, so a
    /// well-typed program of any length must still close with a fully
    /// balanced data stack (the emitted alloc/dealloc pair is the only
    /// thing left at depth zero).
    #[test]
    fn property_every_well_typed_statement_sequence_leaves_the_stack_balanced() {
        use proptest::prelude::*;

        let op = prop_oneof![Just('+'), Just('-'), Just('*')];
        let stmts = prop::collection::vec((op, 1u16..200), 1..20);

        proptest!(|(stmts in stmts)| {
            let mut source = String::from("int a = 1;\n");
            for (op, n) in &stmts {
                source.push_str(&format!("a = a {op} {n};\n"));
            }
            let tokens = crate::compiler::lexer::tokenize(&source).unwrap();
            let program = crate::compiler::parser::parse(tokens).unwrap();
            // generate() only returns Ok if every pop/push stayed balanced —
            // an unbalanced statement would trip the `debug_assert!` inside
            // `Emitter::pop` well before this point.
            prop_assert!(generate(&program).is_ok());
        });
    }
}
