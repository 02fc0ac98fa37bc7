//! Construction API: assembles instructions into basic blocks, allocating
//! virtual registers as it goes. This is the realistic input the printer
//! consumes in tests; the printer's own contract in `crate::printer` does
//! not depend on anything in this module.
//!
//! Grounded on `backend/ir.rs::Assembler` (`insns: Vec<Insn>` plus
//! `push_insn`), generalized to also own the per-unit live-interval arena
//! and the basic-block boundaries a `Branch` operand's `bb 0x...` form
//! references.

use crate::instruction::Instruction;
use crate::operand::{BasicBlockId, LiveIntervalTable, VirtualRegister};

/// A straight-line run of instructions with a single entry, addressed by
/// the entry address assigned to it (by whatever later pass lays out the
/// unit's blocks — this module does not itself assign addresses).
pub struct BasicBlock {
    id: BasicBlockId,
    insns: Vec<Instruction>,
}

impl BasicBlock {
    pub fn new(id: BasicBlockId) -> Self {
        Self { id, insns: Vec::new() }
    }

    pub fn id(&self) -> BasicBlockId {
        self.id
    }

    pub fn push(&mut self, insn: Instruction) {
        #[cfg(feature = "trace-insns")]
        log::trace!("{:?}: appended {:?}", self.id, insn.op());
        self.insns.push(insn);
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.insns
    }
}

/// A compilation unit: the basic blocks lowering produced for one method,
/// plus the live-interval arena every operand's `VirtualRegister` indexes
/// into. Dropping a `Unit` frees every instruction and interval it owns —
/// the "freed with the compilation unit" lifecycle from §3 of
/// `SPEC_FULL.md`.
#[derive(Default)]
pub struct Unit {
    blocks: Vec<BasicBlock>,
    intervals: LiveIntervalTable,
}

impl Unit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a fresh, unallocated virtual register in this unit's
    /// interval table.
    pub fn alloc_vreg(&mut self) -> VirtualRegister {
        self.intervals.alloc()
    }

    pub fn intervals(&self) -> &LiveIntervalTable {
        &self.intervals
    }

    pub fn intervals_mut(&mut self) -> &mut LiveIntervalTable {
        &mut self.intervals
    }

    pub fn push_block(&mut self, block: BasicBlock) {
        self.blocks.push(block);
    }

    pub fn blocks(&self) -> &[BasicBlock] {
        &self.blocks
    }

    /// Every instruction across every basic block, in program order — the
    /// order `lir_print`'s caller is responsible for iterating (§5 of
    /// `SPEC_FULL.md`).
    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> {
        self.blocks.iter().flat_map(|b| b.instructions())
    }
}
