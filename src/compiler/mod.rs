//! # Compiler Module
//!
//! Orchestrates the three front-to-back passes — lex, parse, lower — that
//! turn one `uxncle` source file into one Uxntal assembly file. There is no
//! separate build/run/test lifecycle here: a single invocation reads a
//! source path, writes an output path, and is done.

pub mod error;
pub mod lexer;
pub mod parser;

pub use lexer::tokenize;
pub use parser::parse;

use std::path::Path;

use crate::codegen;
use crate::debug;
use error::CompileError;

/// Reads `source_path`, compiles it to Uxntal text, and writes the result
/// to `output_path`. `verbose` raises the [`debug`] module's log level for
/// the duration of this call.
pub fn compile_file(
    source_path: &Path,
    output_path: &Path,
    verbose: bool,
) -> Result<(), CompileError> {
    if verbose {
        // Single-threaded CLI entry point: nothing else reads these vars
        // concurrently, so the data race `set_var` guards against cannot occur.
        unsafe {
            std::env::set_var("UXNCLE_DEBUG", "1");
            std::env::set_var("UXNCLE_VERBOSE", "1");
        }
    }

    let timer = debug::PerfTimer::new("compile");

    let source = std::fs::read_to_string(source_path)?;
    debug::log_compiler(&format!(
        "read {} bytes from {}",
        source.len(),
        source_path.display()
    ));

    let tokens = tokenize(&source)?;
    debug::log_compiler(&format!("lexed {} token(s)", tokens.len()));

    let program = parse(tokens)?;
    debug::log_compiler(&format!(
        "parsed {} top-level statement(s)",
        program.statements.len()
    ));

    let asm = codegen::generate(&program)?;
    debug::log_compiler(&format!("generated {} byte(s) of assembly", asm.len()));

    std::fs::write(output_path, asm)?;
    timer.finish();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_a_source_file_to_an_output_file() {
        let dir = std::env::temp_dir();
        let src_path = dir.join("uxncle_compiler_mod_test_input.uxn");
        let out_path = dir.join("uxncle_compiler_mod_test_output.tal");
        std::fs::write(&src_path, "prntint 1 + 2;").unwrap();

        compile_file(&src_path, &out_path, false).unwrap();
        let asm = std::fs::read_to_string(&out_path).unwrap();
        assert!(asm.contains("print-decimal"));

        std::fs::remove_file(&src_path).unwrap();
        std::fs::remove_file(&out_path).unwrap();
    }

    #[test]
    fn missing_source_file_is_an_io_error() {
        let err = compile_file(
            Path::new("/nonexistent/uxncle/path.uxn"),
            Path::new("/tmp/uxncle_compiler_mod_test_unused.tal"),
            false,
        )
        .unwrap_err();
        assert!(matches!(err, CompileError::IoError(_)));
    }
}
