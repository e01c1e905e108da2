//! # Code Generation Common Utilities
//!
//! Defines [`Emitter`], the mutable context threaded through every lowering
//! function: the output text sink, the stack of currently active lexical
//! scopes (outermost first), a byte-accurate symbolic data-stack depth
//! counter, and a label counter for control flow. Also hosts the semantic
//! helpers (`get_size`/`get_scope_size`/`get_offset`) and the implicit-cast
//! instruction sequences (`try_cast`), plus the fixed preamble/postamble
//! Uxntal text every compiled program is wrapped in.

use crate::ast::nodes::ScopeRecord;
use crate::ast::types::PrimitiveType;
use crate::compiler::error::CompileError;

/// The device port, zero-page layout, and heap-pointer initialization every
/// program starts with, reproduced verbatim from the reference assembler.
pub const PREAMBLE: &str = r#"|10 @Console [ &pad $8 &char $1 &byte $1 &short $2 &string $2 ]
|0000
@number [ &started $1 ]
@uxncle [ &heap $2 ]
|0100
	;uxncle-heap .uxncle/heap STZ2
"#;

/// The decimal print routine and the six heap helper subroutines, followed
/// by the `@uxncle-heap` label placed immediately before the terminal
/// `|ffff &end` byte.
pub const POSTAMBLE: &str = r#"
@print-decimal
	#2710 DUP2 ;print-decimal/loop STA2
	#0000 ;print-decimal/digit STA2
	&loop
		.print-decimal/loop LDZ2 #0000 EQU2 ,&done JCN
		DUP2 .print-decimal/loop LDZ2 DIV2
		DUP2 .print-decimal/digit STZ2
		.print-decimal/loop LDZ2 MUL2 SUB2
		.print-decimal/loop LDZ2 #000a DIV2 .print-decimal/loop STZ2
	&done
	POP2
	JMP2r
|a000 &loop $2 &digit $2

@alloc-uxncle
	.uxncle/heap LDZ2 ADD2 .uxncle/heap STZ2
	JMP2r

@dealloc-uxncle
	.uxncle/heap LDZ2 SWP2 SUB2 .uxncle/heap STZ2
	JMP2r

@peek-uxncle-short
	.uxncle/heap LDZ2 SWP2 SUB2 LDA2
	JMP2r

@poke-uxncle-short
	.uxncle/heap LDZ2 SWP2 SUB2 STA2
	JMP2r

@peek-uxncle
	.uxncle/heap LDZ2 SWP2 SUB2 LDA
	JMP2r

@poke-uxncle
	.uxncle/heap LDZ2 SWP2 SUB2 STA
	JMP2r

@uxncle-heap
|ffff &end
"#;

/// 2 for `int`, 1 for `char`/`bool`, 0 for the internal `none` sentinel.
pub fn get_size(ty: PrimitiveType) -> u16 {
    ty.size()
}

/// Sum of [`get_size`] over every variable currently declared in `scope`.
pub fn get_scope_size(scope: &ScopeRecord) -> u16 {
    scope.variables.iter().map(|v| get_size(v.ty)).sum()
}

/// The two types a binary operation's operands must both be widened to
/// before the Uxntal instruction is emitted. Equal types need no widening;
/// differing types always meet at `int`, the only type `try_cast` bridges
/// through.
pub fn common_type(a: PrimitiveType, b: PrimitiveType) -> PrimitiveType {
    if a == b { a } else { PrimitiveType::Int }
}

/// `"2"` when a value of this type occupies two stack bytes, `""` when it
/// occupies one — the suffix distinguishing e.g. `ADD` from `ADD2`.
pub fn width_suffix(ty: PrimitiveType) -> &'static str {
    if ty.size() == 2 { "2" } else { "" }
}

/// The output sink, live scope stack, and symbolic data-stack depth counter
/// shared by every lowering function. Every push/pop of the tracked depth
/// goes through [`Emitter::push`]/[`Emitter::pop`] — nothing mutates the
/// counter directly from a lowering function, by construction.
pub struct Emitter<'src> {
    out: String,
    scopes: Vec<ScopeRecord<'src>>,
    depth: u16,
    next_label: u32,
}

impl<'src> Emitter<'src> {
    pub fn new() -> Self {
        Self {
            out: String::new(),
            scopes: Vec::new(),
            depth: 0,
            next_label: 0,
        }
    }

    pub fn emit(&mut self, text: &str) {
        self.out.push_str(text);
        self.out.push('\n');
    }

    pub fn emit_raw(&mut self, text: &str) {
        self.out.push_str(text);
    }

    pub fn finish(self) -> String {
        self.out
    }

    /// Current symbolic depth of the data stack, in bytes.
    pub fn depth(&self) -> u16 {
        self.depth
    }

    pub fn push(&mut self, bytes: u16) {
        self.depth += bytes;
    }

    /// Reduces the tracked depth by `bytes`, without emitting anything —
    /// callers that actually need the value gone from the real stack use
    /// [`Emitter::pop_bytes`] instead.
    pub fn pop(&mut self, bytes: u16) {
        debug_assert!(bytes <= self.depth, "popped more than was pushed");
        self.depth = self.depth.saturating_sub(bytes);
    }

    /// Emits `POP2` for every whole short of `bytes`, then a trailing `POP`
    /// for a single leftover byte, and reduces the tracked depth to match.
    pub fn pop_bytes(&mut self, bytes: u16) {
        let mut remaining = bytes;
        while remaining >= 2 {
            self.emit("POP2");
            remaining -= 2;
        }
        if remaining == 1 {
            self.emit("POP");
        }
        self.pop(bytes);
    }

    pub fn next_label(&mut self) -> u32 {
        let label = self.next_label;
        self.next_label += 1;
        label
    }

    /// Pushes a new active scope and emits the `alloc-uxncle` call sized
    /// to its full byte footprint. The scope's variable list must already
    /// be complete — parsing finishes before any scope is lowered.
    pub fn enter_scope(&mut self, scope: ScopeRecord<'src>) {
        let size = get_scope_size(&scope);
        self.emit(&format!("#{size:04x} ;alloc-uxncle JSR2"));
        self.scopes.push(scope);
    }

    /// Emits the mirroring `dealloc-uxncle` call and pops the scope record.
    /// The byte count here always equals the one passed to the matching
    /// `enter_scope` call.
    pub fn exit_scope(&mut self) {
        let scope = self.scopes.pop().expect("scope stack underflow");
        let size = get_scope_size(&scope);
        self.emit(&format!("#{size:04x} ;dealloc-uxncle JSR2"));
    }

    /// The declared type of the variable at `slot` in the scope with index
    /// `scope_idx`, looked up from the live scope stack.
    pub fn scope_variable_type(&self, scope_idx: usize, slot: usize) -> Option<PrimitiveType> {
        self.scopes
            .iter()
            .find(|s| s.index == scope_idx)
            .and_then(|s| s.variables.get(slot))
            .map(|v| v.ty)
    }

    /// The cumulative offset, in bytes, from the current heap pointer to
    /// the variable at `slot` in the scope with index `scope_idx`. See
    /// `codegen::common`'s module doc and the design ledger for the
    /// derivation: it is the suffix sum of sizes from `slot` to the end of
    /// that scope, plus the full footprint of every scope nested more
    /// deeply than it that is still currently active.
    pub fn get_offset(&self, scope_idx: usize, slot: usize) -> u16 {
        let pos = self
            .scopes
            .iter()
            .position(|s| s.index == scope_idx)
            .expect("referenced scope is not on the live scope stack");
        let target = &self.scopes[pos];
        let mut offset: u16 = target.variables[slot..]
            .iter()
            .map(|v| get_size(v.ty))
            .sum();
        for inner in &self.scopes[pos + 1..] {
            offset += get_scope_size(inner);
        }
        offset
    }

    /// Emits the instruction sequence converting a value of type `from`
    /// (already on top of the stack) to `to`, and adjusts the tracked
    /// depth to match. A same-type cast is a no-op. Any other pairing is a
    /// `TypeError` — there is no defined bridge for it.
    pub fn try_cast(
        &mut self,
        from: PrimitiveType,
        to: PrimitiveType,
        line: u32,
    ) -> Result<(), CompileError> {
        use PrimitiveType::*;
        if from == to {
            return Ok(());
        }
        match (from, to) {
            (Int, Char) => {
                self.emit("SWP POP");
                self.pop(1);
            }
            (Char, Int) | (Bool, Int) => {
                self.emit("#00 SWP");
                self.push(1);
            }
            (Int, Bool) => {
                self.emit("#0000");
                self.push(2);
                self.emit("NEQ2");
                self.pop(4);
                self.push(1);
            }
            (Char, Bool) => {
                self.emit("#00");
                self.push(1);
                self.emit("NEQ");
                self.pop(2);
                self.push(1);
            }
            _ => {
                return Err(CompileError::type_error(
                    line,
                    format!("cannot convert {from} to {to}"),
                ));
            }
        }
        Ok(())
    }
}

impl Default for Emitter<'_> {
    fn default() -> Self {
        Self::new()
    }
}
