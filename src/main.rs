//! # uxncle CLI
//!
//! The command-line front end: decodes `uxncle <source-path>
//! <output-path>`, drives [`compiler::compile_file`], and maps the result
//! onto the process exit code. Reading the source, writing the assembly,
//! and argument decoding are deliberately thin here — the compiler crate
//! itself never touches a filesystem path.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Arg, ArgAction, Command};

mod ast;
mod codegen;
mod compiler;
mod debug;

use compiler::compile_file;
use compiler::error::CompileError;

/// Conventional BSD `sysexits.h` code for "an input file could not be read
/// or an output file could not be written" — the original C implementation
/// this compiler's target dialect descends from uses the same convention.
const EX_IOERR: u8 = 74;

fn main() -> ExitCode {
    let matches = Command::new("uxncle")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Compiles uxncle source to Uxntal assembly")
        .arg(
            Arg::new("source")
                .required(true)
                .value_name("SOURCE")
                .value_parser(clap::value_parser!(PathBuf))
                .help("uxncle source file to compile"),
        )
        .arg(
            Arg::new("output")
                .required(true)
                .value_name("OUTPUT")
                .value_parser(clap::value_parser!(PathBuf))
                .help("Path to write the generated Uxntal assembly to"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Show step-by-step compilation tracing"),
        )
        .get_matches();

    let source_path = matches.get_one::<PathBuf>("source").unwrap();
    let output_path = matches.get_one::<PathBuf>("output").unwrap();
    let verbose = matches.get_flag("verbose");

    match compile_file(source_path, output_path, verbose) {
        Ok(()) => {
            println!("wrote {}", output_path.display());
            ExitCode::SUCCESS
        }
        Err(CompileError::IoError(e)) => {
            eprintln!("uxncle: {e}");
            ExitCode::from(EX_IOERR)
        }
        Err(e) => {
            eprintln!("uxncle: {e}");
            ExitCode::FAILURE
        }
    }
}
