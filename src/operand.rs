//! Operand model: virtual registers, live intervals, stack slots and the
//! tagged `Operand` variants every instruction slot is filled with.
//!
//! Grounded on `backend/ir.rs::{Opnd, Mem, MemBase}` and
//! `asm/arm64/opnd.rs::A64Mem` (same "base + displacement" shape, ported
//! here to the closed variant set the printer's textual grammar requires).

use std::fmt;

/// Maps an allocator's physical-register code to its architectural name
/// (`eax`, `xmm0`, ...). An abstract capability, not owned by this module —
/// see the distilled spec's framing of `phys_reg_name`.
pub trait PhysRegName {
    fn name(&self, code: u8) -> &'static str;
}

/// Identity of a virtual register created by front-end lowering. Never
/// carries allocation state itself; that lives in the `LiveInterval` it
/// indexes into `LiveIntervalTable`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct VirtualRegister {
    id: u32,
}

impl VirtualRegister {
    pub(crate) fn new(id: u32) -> Self {
        Self { id }
    }

    pub fn id(&self) -> u32 {
        self.id
    }
}

/// The range of program points where a vreg is live, plus its current
/// physical-register assignment (if register allocation has run).
#[derive(Clone, Copy, Debug)]
pub struct LiveInterval {
    vreg: VirtualRegister,
    phys_reg: Option<u8>,
}

impl LiveInterval {
    fn unallocated(vreg: VirtualRegister) -> Self {
        Self { vreg, phys_reg: None }
    }

    pub fn vreg(&self) -> VirtualRegister {
        self.vreg
    }

    /// Whether allocation has pinned this interval to a physical register.
    pub fn has_fixed_reg(&self) -> bool {
        self.phys_reg.is_some()
    }

    pub fn fixed_reg(&self) -> Option<u8> {
        self.phys_reg
    }
}

/// Per-compilation-unit arena of live intervals, indexed by vreg id.
/// Operands carry a `VirtualRegister` (a stable index), never a pointer —
/// this is the "pointer graph -> arena + index" transformation the
/// distilled spec's design notes call for.
#[derive(Default)]
pub struct LiveIntervalTable {
    intervals: Vec<LiveInterval>,
}

impl LiveIntervalTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a fresh, unallocated virtual register.
    pub fn alloc(&mut self) -> VirtualRegister {
        let vreg = VirtualRegister::new(self.intervals.len() as u32);
        self.intervals.push(LiveInterval::unallocated(vreg));
        vreg
    }

    /// Pins a virtual register to a physical register, as the allocator does.
    /// Never touches the opcode or operand tags of any instruction — only
    /// the interval.
    pub fn assign_fixed_reg(&mut self, vreg: VirtualRegister, phys_reg: u8) {
        self.intervals[vreg.id() as usize].phys_reg = Some(phys_reg);
    }

    pub fn interval(&self, vreg: VirtualRegister) -> &LiveInterval {
        &self.intervals[vreg.id() as usize]
    }
}

/// Signed frame-relative slot index. Immutable once assigned by frame
/// layout; this type exposes no setter past construction.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct StackSlot {
    index: i32,
}

impl StackSlot {
    pub fn new(index: i32) -> Self {
        Self { index }
    }

    pub fn index(&self) -> i32 {
        self.index
    }
}

/// A basic block, referenced by its entry address for the branch operand's
/// textual form (`bb 0x...`).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct BasicBlockId(pub u64);

/// Tagged operand variant. Exactly the forms named in the textual grammar;
/// no variant here exists without a corresponding entry in §4.1 of
/// `SPEC_FULL.md`.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Operand {
    /// Unused slot for an opcode whose signature doesn't use it.
    None,
    /// `$0xHEX`, reproduced verbatim as unsigned hex.
    Imm(u64),
    /// `rN` or `rN=PHYS`.
    Reg(VirtualRegister),
    /// `$0xHEX(rN)`.
    MemBase { disp: i64, base: VirtualRegister },
    /// `($0xHEX)`.
    MemDisp { disp: i64 },
    /// `@SLOT(bp)`.
    MemLocal { slot: StackSlot },
    /// `(rB, rI, SHIFT)`.
    MemIndex { base: VirtualRegister, index: VirtualRegister, shift: u8 },
    /// `$0xHEX`, pc-relative.
    Rel(i64),
    /// `bb 0xHEX`.
    Branch(BasicBlockId),
    /// Thread-local (`gs:`-segment) base+displacement form.
    TlMemBase { disp: i64, base: VirtualRegister },
    /// Thread-local (`gs:`-segment) bare-displacement form.
    TlMemDisp { disp: i64 },
}

impl Operand {
    /// Convenience constructor; asserts the invariant that a shift amount
    /// is a valid SIB scale (the "out-of-range shift" precondition from
    /// §7 of `SPEC_FULL.md` — a producing-pass bug, caught eagerly here).
    pub fn mem_index(base: VirtualRegister, index: VirtualRegister, shift: u8) -> Self {
        debug_assert!(shift <= 3, "MemIndex shift out of range: {shift}");
        Operand::MemIndex { base, index, shift }
    }

    /// Appends this operand's textual form to `out`. Never mutates `self`;
    /// never allocates beyond `out`'s own growth.
    pub fn fmt_into(&self, out: &mut String, intervals: &LiveIntervalTable, regs: &dyn PhysRegName) {
        match self {
            Operand::None => {}
            Operand::Imm(imm) => {
                use std::fmt::Write;
                write!(out, "$0x{imm:x}").unwrap();
            }
            Operand::Reg(vreg) => fmt_reg(out, *vreg, intervals, regs),
            Operand::MemBase { disp, base } => fmt_membase(out, *disp, *base),
            Operand::MemDisp { disp } => {
                use std::fmt::Write;
                write!(out, "($0x{disp:x})").unwrap();
            }
            Operand::MemLocal { slot } => {
                use std::fmt::Write;
                write!(out, "@{}(bp)", slot.index()).unwrap();
            }
            Operand::MemIndex { base, index, shift } => {
                use std::fmt::Write;
                write!(out, "(r{}, r{}, {})", base.id(), index.id(), shift).unwrap();
            }
            Operand::Rel(rel) => {
                use std::fmt::Write;
                write!(out, "$0x{rel:x}").unwrap();
            }
            Operand::Branch(BasicBlockId(target)) => {
                use std::fmt::Write;
                write!(out, "bb 0x{target:x}").unwrap();
            }
            Operand::TlMemBase { disp, base } => {
                out.push_str("gs:");
                fmt_membase(out, *disp, *base);
            }
            Operand::TlMemDisp { disp } => {
                use std::fmt::Write;
                write!(out, "gs:($0x{disp:x})").unwrap();
            }
        }
    }
}

fn fmt_reg(out: &mut String, vreg: VirtualRegister, intervals: &LiveIntervalTable, regs: &dyn PhysRegName) {
    use std::fmt::Write;
    let interval = intervals.interval(vreg);
    match interval.fixed_reg() {
        Some(phys) => write!(out, "r{}={}", vreg.id(), regs.name(phys)).unwrap(),
        None => write!(out, "r{}", vreg.id()).unwrap(),
    }
}

fn fmt_membase(out: &mut String, disp: i64, base: VirtualRegister) {
    use std::fmt::Write;
    write!(out, "$0x{disp:x}(r{})", base.id()).unwrap();
}

impl fmt::Display for BasicBlockId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}
