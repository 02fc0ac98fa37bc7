//! The printer's single recoverable failure plus the programmer-error kind
//! callers may choose to surface instead of asserting (§7 of
//! `SPEC_FULL.md`).

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PrintError {
    /// The instruction carries an opcode tag with no printer entry. Only
    /// reachable through [`crate::instruction::Op::try_from`] on a raw,
    /// possibly-corrupted tag — a well-typed `Op` is always printable.
    #[error("unknown insn {0}")]
    UnknownOpcode(u32),

    /// An operand violates a precondition the producing pass is supposed to
    /// guarantee (e.g. a method handle that fails to resolve a name for
    /// `ic_call`). Not raised by malformed bit patterns within an
    /// `Operand` itself — those are caught by `debug_assert!` at
    /// construction time instead.
    #[error("malformed operand: {0}")]
    MalformedOperand(String),
}
