//! # Debugging and Logging Utilities
//!
//! Conditional logging and performance measurement used across the compiler
//! pipeline. Logging is gated by environment variables rather than a
//! tracing-subscriber stack, matching the rest of this crate's dependency
//! footprint.

use std::time::Instant;

/// Debugging is enabled if `UXNCLE_DEBUG` is set, if `--verbose` was passed
/// on the CLI, or if compiled with `debug_assertions` (default `cargo build`).
pub fn is_debug_enabled() -> bool {
    std::env::var("UXNCLE_DEBUG").is_ok() || cfg!(debug_assertions)
}

/// Performance tracking is enabled if `UXNCLE_VERBOSE` is set.
pub fn is_perf_enabled() -> bool {
    std::env::var("UXNCLE_VERBOSE").is_ok()
}

pub fn log_lexer(msg: &str) {
    if is_debug_enabled() {
        eprintln!("🔍 LEXER: {}", msg);
    }
}

pub fn log_parser(msg: &str) {
    if is_debug_enabled() {
        eprintln!("🔍 PARSER: {}", msg);
    }
}

pub fn log_codegen(msg: &str) {
    if is_debug_enabled() {
        eprintln!("🔍 CODEGEN: {}", msg);
    }
}

pub fn log_compiler(msg: &str) {
    if is_debug_enabled() {
        eprintln!("🔍 COMPILER: {}", msg);
    }
}

/// Times a single operation, reporting elapsed duration on drop-free `finish()`.
pub struct PerfTimer {
    start: Instant,
    label: String,
}

impl PerfTimer {
    pub fn new(label: &str) -> Self {
        Self {
            start: Instant::now(),
            label: label.to_string(),
        }
    }

    pub fn finish(self) {
        if is_perf_enabled() {
            let duration = self.start.elapsed();
            eprintln!("⏱️  {}: {:?}", self.label, duration);
        }
    }
}
