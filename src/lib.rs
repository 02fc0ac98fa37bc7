//! Back-end LIR: operand model, closed instruction enumeration, and the
//! disassembler-like text printer every later back-end pass is validated
//! against.
//!
//! `classloader` and `frontend` are external-collaborator boundaries: this
//! crate depends on the capabilities they describe (`MethodResolver`'s
//! backing store, the expression tree this IR is lowered from) without
//! owning their implementation.

pub mod classloader;
pub mod error;
pub mod frontend;
pub mod instruction;
pub mod operand;
pub mod printer;
pub mod unit;

pub use error::PrintError;
pub use instruction::{Instruction, Op, OperandForm};
pub use operand::{BasicBlockId, LiveInterval, LiveIntervalTable, Operand, PhysRegName, StackSlot, VirtualRegister};
pub use printer::{lir_print, MethodResolver};
pub use unit::{BasicBlock, Unit};
