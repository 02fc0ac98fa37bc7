//! Instruction model: the closed opcode enumeration and the operand slots
//! each opcode's fixed signature uses.
//!
//! Grounded on `backend/ir.rs::{Op, Insn}` for the "one struct, slot-per-role"
//! shape, and on the `print_*` dispatch table in jato's
//! `arch/x86/lir-printer.c` for the exhaustive opcode set and which operand
//! slots each opcode reads (the distilled spec's §4.2 signature table is the
//! same table, generalized).

use crate::error::PrintError;
use crate::operand::{BasicBlockId, Operand, StackSlot, VirtualRegister};

/// The operand-form signature an opcode is bound to. Carried alongside the
/// opcode mainly for documentation and for the property tests in §8 of
/// `SPEC_FULL.md`, which quantify over "every two-operand signature" etc.
/// — the printer itself does not consult this; it dispatches on `Op`
/// directly (see `crate::printer`).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum OperandForm {
    Nullary,
    ImmReg,
    ImmMembase,
    ImmMemlocal,
    ImmMemdisp,
    MembaseReg,
    MemdispReg,
    RegMemdisp,
    MemlocalReg,
    RegMemlocal,
    RegMembase,
    MemindexReg,
    RegMemindex,
    MembaseOnly,
    MemlocalOnly,
    MemindexOnly,
    RegReg,
    /// `reg_reg` plus a `"(Nbit->32bit)"` suffix.
    SignExtendRegReg,
    RegOnly,
    PushReg,
    PushMemlocal,
    PopMemlocal,
    PopReg,
    ImmOnly,
    RelOnly,
    CallReg,
    IcCall,
    Branch,
    Phi,
    TlImmMembase,
    TlRegMembase,
    TlRegMemdisp,
    TlMemdispReg,
}

macro_rules! opcodes {
    ( $( $variant:ident, $mnemonic:literal, $form:ident ; )* ) => {
        /// Closed, exhaustive opcode enumeration. Every variant here has a
        /// matching arm in `crate::printer::lir_print` — missing one is a
        /// compile error, not a runtime "unknown opcode".
        #[derive(Clone, Copy, PartialEq, Eq, Debug)]
        #[repr(u32)]
        pub enum Op {
            $( $variant, )*
        }

        impl Op {
            /// Canonical lowercase mnemonic, left-padded to column 20 by
            /// the printer.
            pub fn mnemonic(&self) -> &'static str {
                match self {
                    $( Op::$variant => $mnemonic, )*
                }
            }

            /// The operand-form signature this opcode is bound to.
            pub fn form(&self) -> OperandForm {
                match self {
                    $( Op::$variant => OperandForm::$form, )*
                }
            }

            const ALL: &'static [Op] = &[ $( Op::$variant, )* ];
        }

        impl TryFrom<u32> for Op {
            type Error = PrintError;

            /// Recovers an `Op` from a raw opcode tag, as if reading one
            /// back out of (possibly corrupted) instruction memory. A
            /// well-typed `Instruction` never goes through this path; it
            /// exists for the dispatch-table boundary described in the
            /// distilled spec's design notes.
            fn try_from(tag: u32) -> Result<Self, Self::Error> {
                Op::ALL.get(tag as usize).copied().ok_or_else(|| {
                    log::warn!("unknown insn {tag}");
                    PrintError::UnknownOpcode(tag)
                })
            }
        }
    };
}

opcodes! {
    AdcImmReg, "adc_imm_reg", ImmReg;
    AdcMembaseReg, "adc_membase_reg", MembaseReg;
    AdcRegReg, "adc_reg_reg", RegReg;
    AddsdXmmXmm, "addsd_xmm_xmm", RegReg;
    AddssXmmXmm, "addss_xmm_xmm", RegReg;
    AddImmReg, "add_imm_reg", ImmReg;
    AddMembaseReg, "add_membase_reg", MembaseReg;
    AddRegReg, "add_reg_reg", RegReg;
    AndMembaseReg, "and_membase_reg", MembaseReg;
    AndRegReg, "and_reg_reg", RegReg;
    CallReg, "call_reg", CallReg;
    CallRel, "call_rel", RelOnly;
    CltdRegReg, "cltd_reg_reg", RegReg;
    CmpImmReg, "cmp_imm_reg", ImmReg;
    CmpMembaseReg, "cmp_membase_reg", MembaseReg;
    CmpRegReg, "cmp_reg_reg", RegReg;
    ConvFpu64ToGpr, "conv_fpu64_to_gpr", RegReg;
    ConvFpuToGpr, "conv_fpu_to_gpr", RegReg;
    ConvGprToFpu, "conv_gpr_to_fpu", RegReg;
    ConvGprToFpu64, "conv_gpr_to_fpu64", RegReg;
    ConvXmm64ToXmm, "conv_xmm64_to_xmm", RegReg;
    ConvXmmToXmm64, "conv_xmm_to_xmm64", RegReg;
    DivsdXmmXmm, "divsd_xmm_xmm", RegReg;
    DivssXmmXmm, "divss_xmm_xmm", RegReg;
    DivMembaseReg, "div_membase_reg", MembaseReg;
    DivRegReg, "div_reg_reg", RegReg;
    Fild64Membase, "fild_64_membase", MembaseOnly;
    Fistp64Membase, "fistp_64_membase", MembaseOnly;
    FldcwMembase, "fldcw_membase", MembaseOnly;
    Fld64Membase, "fld_64_membase", MembaseOnly;
    Fld64Memlocal, "fld_64_memlocal", MemlocalOnly;
    FldMembase, "fld_membase", MembaseOnly;
    FldMemlocal, "fld_memlocal", MemlocalOnly;
    FnstcwMembase, "fnstcw_membase", MembaseOnly;
    Fstp64Membase, "fstp_64_membase", MembaseOnly;
    Fstp64Memlocal, "fstp_64_memlocal", MemlocalOnly;
    FstpMembase, "fstp_membase", MembaseOnly;
    FstpMemlocal, "fstp_memlocal", MemlocalOnly;
    IcCall, "ic_call", IcCall;
    JeBranch, "je_branch", Branch;
    JgeBranch, "jge_branch", Branch;
    JgBranch, "jg_branch", Branch;
    JleBranch, "jle_branch", Branch;
    JlBranch, "jl_branch", Branch;
    JmpBranch, "jmp_branch", Branch;
    JmpMembase, "jmp_membase", MembaseOnly;
    JmpMemindex, "jmp_memindex", MemindexOnly;
    JneBranch, "jne_branch", Branch;
    MovsdMembaseXmm, "movsd_membase_xmm", MembaseReg;
    MovsdMemdispXmm, "movsd_memdisp_xmm", MemdispReg;
    MovsdMemindexXmm, "movsd_memindex_xmm", MemindexReg;
    MovsdMemlocalXmm, "movsd_memlocal_xmm", MemlocalReg;
    MovsdXmmMembase, "movsd_xmm_membase", RegMembase;
    MovsdXmmMemdisp, "movsd_xmm_memdisp", RegMemdisp;
    MovsdXmmMemindex, "movsd_xmm_memindex", RegMemindex;
    MovsdXmmMemlocal, "movsd_xmm_memlocal", RegMemlocal;
    MovsdXmmXmm, "movsd_xmm_xmm", RegReg;
    MovssMembaseXmm, "movss_membase_xmm", MembaseReg;
    MovssMemdispXmm, "movss_memdisp_xmm", MemdispReg;
    MovssMemindexXmm, "movss_memindex_xmm", MemindexReg;
    MovssMemlocalXmm, "movss_memlocal_xmm", MemlocalReg;
    MovssXmmMembase, "movss_xmm_membase", RegMembase;
    MovssXmmMemdisp, "movss_xmm_memdisp", RegMemdisp;
    MovssXmmMemindex, "movss_xmm_memindex", RegMemindex;
    MovssXmmMemlocal, "movss_xmm_memlocal", RegMemlocal;
    MovssXmmXmm, "movss_xmm_xmm", RegReg;
    Movsx16RegReg, "movsx_16_reg_reg", SignExtendRegReg;
    Movsx8RegReg, "movsx_8_reg_reg", SignExtendRegReg;
    Movzx16RegReg, "movzx_16_reg_reg", SignExtendRegReg;
    MovImmMembase, "mov_imm_membase", ImmMembase;
    MovImmMemlocal, "mov_imm_memlocal", ImmMemlocal;
    MovImmReg, "mov_imm_reg", ImmReg;
    MovImmTlMembase, "mov_imm_tlmembase", TlImmMembase;
    MovMembaseReg, "mov_membase_reg", MembaseReg;
    MovMemdispReg, "mov_memdisp_reg", MemdispReg;
    MovMemindexReg, "mov_memindex_reg", MemindexReg;
    MovMemlocalReg, "mov_memlocal_reg", MemlocalReg;
    MovRegMembase, "mov_reg_membase", RegMembase;
    MovRegMemdisp, "mov_reg_memdisp", RegMemdisp;
    MovRegMemindex, "mov_reg_memindex", RegMemindex;
    MovRegMemlocal, "mov_reg_memlocal", RegMemlocal;
    MovRegReg, "mov_reg_reg", RegReg;
    MovRegTlMembase, "mov_reg_tlmembase", TlRegMembase;
    MovRegTlMemdisp, "mov_reg_tlmemdisp", TlRegMemdisp;
    MovTlMemdispReg, "mov_tlmemdisp_reg", TlMemdispReg;
    MulsdMemdispXmm, "fmul_64_memdisp_xmm", MemdispReg;
    MulsdXmmXmm, "mulsd_xmm_xmm", RegReg;
    MulssXmmXmm, "mulss_xmm_xmm", RegReg;
    MulMembaseEax, "mul_membase_eax", MembaseReg;
    MulRegEax, "mul_reg_eax", RegReg;
    MulRegReg, "mul_reg_reg", RegReg;
    NegReg, "neg_reg", RegOnly;
    Nop, "nop", Nullary;
    OrImmMembase, "or_imm_membase", ImmMembase;
    OrMembaseReg, "or_membase_reg", MembaseReg;
    OrRegReg, "or_reg_reg", RegReg;
    Phi, "phi", Phi;
    PopMemlocal, "pop_memlocal", PopMemlocal;
    PopReg, "pop_reg", PopReg;
    PushImm, "push_imm", ImmOnly;
    PushMemlocal, "push_memlocal", PushMemlocal;
    PushReg, "push_reg", PushReg;
    Ret, "ret", Nullary;
    SarImmReg, "sar_imm_reg", ImmReg;
    SarRegReg, "sar_reg_reg", RegReg;
    SaveCallerRegs, "save_caller_regs", Nullary;
    SbbImmReg, "sbb_imm_reg", ImmReg;
    SbbMembaseReg, "sbb_membase_reg", MembaseReg;
    SbbRegReg, "sbb_reg_reg", RegReg;
    ShlRegReg, "shl_reg_reg", RegReg;
    ShrRegReg, "shr_reg_reg", RegReg;
    SubsdXmmXmm, "subsd_xmm_xmm", RegReg;
    SubssXmmXmm, "subss_xmm_xmm", RegReg;
    SubImmReg, "sub_imm_reg", ImmReg;
    SubMembaseReg, "sub_membase_reg", MembaseReg;
    SubRegReg, "sub_reg_reg", RegReg;
    TestImmMemdisp, "test_imm_memdisp", ImmMemdisp;
    TestMembaseReg, "test_membase_reg", MembaseReg;
    XorpdXmmXmm, "xorpd_xmm_xmm", RegReg;
    XorpsXmmXmm, "xorps_xmm_xmm", RegReg;
    XorMembaseReg, "xor_membase_reg", MembaseReg;
    XorRegReg, "xor_reg_reg", RegReg;
    RestoreCallerRegs, "restore_caller_regs", Nullary;
    RestoreCallerRegsF32, "restore_caller_regs_f32", Nullary;
    RestoreCallerRegsF64, "restore_caller_regs_f64", Nullary;
    RestoreCallerRegsI32, "restore_caller_regs_i32", Nullary;
    RestoreCallerRegsI64, "restore_caller_regs_i64", Nullary;
}

/// A single LIR instruction: an opcode plus the operand slots its signature
/// uses. Unused slots for a given opcode sit at `Operand::None` / empty —
/// the per-signature constructors below are the only supported way to
/// build one, so a slot can't be filled with the wrong operand kind for
/// its opcode's signature.
#[derive(Clone, Debug)]
pub struct Instruction {
    pub(crate) op: Op,
    pub(crate) src: Operand,
    pub(crate) dest: Operand,
    pub(crate) operand: Operand,
    pub(crate) ssa_srcs: Vec<Operand>,
    pub(crate) ssa_dest: Operand,
}

impl Instruction {
    fn blank(op: Op) -> Self {
        Self { op, src: Operand::None, dest: Operand::None, operand: Operand::None, ssa_srcs: Vec::new(), ssa_dest: Operand::None }
    }

    pub fn op(&self) -> Op {
        self.op
    }
}

macro_rules! def_nullary {
    ($ctor:ident, $op:expr) => {
        pub fn $ctor() -> Instruction {
            Instruction::blank($op)
        }
    };
}

macro_rules! def_imm_reg {
    ($ctor:ident, $op:expr) => {
        pub fn $ctor(imm: u64, dest: VirtualRegister) -> Instruction {
            Instruction { src: Operand::Imm(imm), dest: Operand::Reg(dest), ..Instruction::blank($op) }
        }
    };
}

macro_rules! def_imm_membase {
    ($ctor:ident, $op:expr) => {
        pub fn $ctor(imm: u64, disp: i64, base: VirtualRegister) -> Instruction {
            Instruction { src: Operand::Imm(imm), dest: Operand::MemBase { disp, base }, ..Instruction::blank($op) }
        }
    };
}

macro_rules! def_imm_memlocal {
    ($ctor:ident, $op:expr) => {
        pub fn $ctor(imm: u64, slot: StackSlot) -> Instruction {
            Instruction { src: Operand::Imm(imm), dest: Operand::MemLocal { slot }, ..Instruction::blank($op) }
        }
    };
}

macro_rules! def_imm_memdisp {
    ($ctor:ident, $op:expr) => {
        pub fn $ctor(imm: u64, disp: i64) -> Instruction {
            Instruction { src: Operand::Imm(imm), dest: Operand::MemDisp { disp }, ..Instruction::blank($op) }
        }
    };
}

macro_rules! def_membase_reg {
    ($ctor:ident, $op:expr) => {
        pub fn $ctor(disp: i64, base: VirtualRegister, dest: VirtualRegister) -> Instruction {
            Instruction { src: Operand::MemBase { disp, base }, dest: Operand::Reg(dest), ..Instruction::blank($op) }
        }
    };
}

macro_rules! def_memdisp_reg {
    ($ctor:ident, $op:expr) => {
        pub fn $ctor(disp: i64, dest: VirtualRegister) -> Instruction {
            Instruction { src: Operand::MemDisp { disp }, dest: Operand::Reg(dest), ..Instruction::blank($op) }
        }
    };
}

macro_rules! def_reg_memdisp {
    ($ctor:ident, $op:expr) => {
        pub fn $ctor(src: VirtualRegister, disp: i64) -> Instruction {
            Instruction { src: Operand::Reg(src), dest: Operand::MemDisp { disp }, ..Instruction::blank($op) }
        }
    };
}

macro_rules! def_memlocal_reg {
    ($ctor:ident, $op:expr) => {
        pub fn $ctor(slot: StackSlot, dest: VirtualRegister) -> Instruction {
            Instruction { src: Operand::MemLocal { slot }, dest: Operand::Reg(dest), ..Instruction::blank($op) }
        }
    };
}

macro_rules! def_reg_memlocal {
    ($ctor:ident, $op:expr) => {
        pub fn $ctor(src: VirtualRegister, slot: StackSlot) -> Instruction {
            Instruction { src: Operand::Reg(src), dest: Operand::MemLocal { slot }, ..Instruction::blank($op) }
        }
    };
}

macro_rules! def_reg_membase {
    ($ctor:ident, $op:expr) => {
        pub fn $ctor(src: VirtualRegister, disp: i64, base: VirtualRegister) -> Instruction {
            Instruction { src: Operand::Reg(src), dest: Operand::MemBase { disp, base }, ..Instruction::blank($op) }
        }
    };
}

macro_rules! def_memindex_reg {
    ($ctor:ident, $op:expr) => {
        pub fn $ctor(base: VirtualRegister, index: VirtualRegister, shift: u8, dest: VirtualRegister) -> Instruction {
            Instruction { src: Operand::mem_index(base, index, shift), dest: Operand::Reg(dest), ..Instruction::blank($op) }
        }
    };
}

macro_rules! def_reg_memindex {
    ($ctor:ident, $op:expr) => {
        pub fn $ctor(src: VirtualRegister, base: VirtualRegister, index: VirtualRegister, shift: u8) -> Instruction {
            Instruction { src: Operand::Reg(src), dest: Operand::mem_index(base, index, shift), ..Instruction::blank($op) }
        }
    };
}

macro_rules! def_membase_only {
    ($ctor:ident, $op:expr) => {
        pub fn $ctor(disp: i64, base: VirtualRegister) -> Instruction {
            Instruction { operand: Operand::MemBase { disp, base }, ..Instruction::blank($op) }
        }
    };
}

macro_rules! def_memlocal_only {
    ($ctor:ident, $op:expr) => {
        pub fn $ctor(slot: StackSlot) -> Instruction {
            Instruction { operand: Operand::MemLocal { slot }, ..Instruction::blank($op) }
        }
    };
}

macro_rules! def_reg_reg {
    ($ctor:ident, $op:expr) => {
        pub fn $ctor(src: VirtualRegister, dest: VirtualRegister) -> Instruction {
            Instruction { src: Operand::Reg(src), dest: Operand::Reg(dest), ..Instruction::blank($op) }
        }
    };
}

macro_rules! def_reg_only {
    ($ctor:ident, $op:expr) => {
        pub fn $ctor(dest: VirtualRegister) -> Instruction {
            Instruction { operand: Operand::Reg(dest), ..Instruction::blank($op) }
        }
    };
}

impl Instruction {
    def_nullary!(nop, Op::Nop);
    def_nullary!(ret, Op::Ret);
    def_nullary!(save_caller_regs, Op::SaveCallerRegs);
    def_nullary!(restore_caller_regs, Op::RestoreCallerRegs);
    def_nullary!(restore_caller_regs_i32, Op::RestoreCallerRegsI32);
    def_nullary!(restore_caller_regs_i64, Op::RestoreCallerRegsI64);
    def_nullary!(restore_caller_regs_f32, Op::RestoreCallerRegsF32);
    def_nullary!(restore_caller_regs_f64, Op::RestoreCallerRegsF64);

    def_imm_reg!(adc_imm_reg, Op::AdcImmReg);
    def_imm_reg!(add_imm_reg, Op::AddImmReg);
    def_imm_reg!(cmp_imm_reg, Op::CmpImmReg);
    def_imm_reg!(mov_imm_reg, Op::MovImmReg);
    def_imm_reg!(sar_imm_reg, Op::SarImmReg);
    def_imm_reg!(sbb_imm_reg, Op::SbbImmReg);
    def_imm_reg!(sub_imm_reg, Op::SubImmReg);

    def_imm_membase!(mov_imm_membase, Op::MovImmMembase);
    def_imm_membase!(or_imm_membase, Op::OrImmMembase);

    def_imm_memlocal!(mov_imm_memlocal, Op::MovImmMemlocal);

    def_imm_memdisp!(test_imm_memdisp, Op::TestImmMemdisp);

    def_membase_reg!(adc_membase_reg, Op::AdcMembaseReg);
    def_membase_reg!(add_membase_reg, Op::AddMembaseReg);
    def_membase_reg!(and_membase_reg, Op::AndMembaseReg);
    def_membase_reg!(cmp_membase_reg, Op::CmpMembaseReg);
    def_membase_reg!(div_membase_reg, Op::DivMembaseReg);
    def_membase_reg!(mov_membase_reg, Op::MovMembaseReg);
    def_membase_reg!(movss_membase_xmm, Op::MovssMembaseXmm);
    def_membase_reg!(movsd_membase_xmm, Op::MovsdMembaseXmm);
    def_membase_reg!(mul_membase_eax, Op::MulMembaseEax);
    def_membase_reg!(or_membase_reg, Op::OrMembaseReg);
    def_membase_reg!(sbb_membase_reg, Op::SbbMembaseReg);
    def_membase_reg!(sub_membase_reg, Op::SubMembaseReg);
    def_membase_reg!(test_membase_reg, Op::TestMembaseReg);
    def_membase_reg!(xor_membase_reg, Op::XorMembaseReg);

    def_memdisp_reg!(mov_memdisp_reg, Op::MovMemdispReg);
    def_memdisp_reg!(movss_memdisp_xmm, Op::MovssMemdispXmm);
    def_memdisp_reg!(movsd_memdisp_xmm, Op::MovsdMemdispXmm);
    def_memdisp_reg!(fmul_64_memdisp_xmm, Op::MulsdMemdispXmm);

    def_reg_memdisp!(mov_reg_memdisp, Op::MovRegMemdisp);
    def_reg_memdisp!(movss_xmm_memdisp, Op::MovssXmmMemdisp);
    def_reg_memdisp!(movsd_xmm_memdisp, Op::MovsdXmmMemdisp);

    def_memlocal_reg!(mov_memlocal_reg, Op::MovMemlocalReg);
    def_memlocal_reg!(movss_memlocal_xmm, Op::MovssMemlocalXmm);
    def_memlocal_reg!(movsd_memlocal_xmm, Op::MovsdMemlocalXmm);

    def_reg_memlocal!(mov_reg_memlocal, Op::MovRegMemlocal);
    def_reg_membase!(mov_reg_membase, Op::MovRegMembase);
    def_reg_memlocal!(movss_xmm_memlocal, Op::MovssXmmMemlocal);
    def_reg_membase!(movss_xmm_membase, Op::MovssXmmMembase);
    def_reg_memlocal!(movsd_xmm_memlocal, Op::MovsdXmmMemlocal);
    def_reg_membase!(movsd_xmm_membase, Op::MovsdXmmMembase);

    def_memindex_reg!(mov_memindex_reg, Op::MovMemindexReg);
    def_memindex_reg!(movss_memindex_xmm, Op::MovssMemindexXmm);
    def_memindex_reg!(movsd_memindex_xmm, Op::MovsdMemindexXmm);

    def_reg_memindex!(mov_reg_memindex, Op::MovRegMemindex);
    def_reg_memindex!(movss_xmm_memindex, Op::MovssXmmMemindex);
    def_reg_memindex!(movsd_xmm_memindex, Op::MovsdXmmMemindex);

    def_membase_only!(jmp_membase, Op::JmpMembase);
    def_membase_only!(fld_membase, Op::FldMembase);
    def_membase_only!(fld_64_membase, Op::Fld64Membase);
    def_membase_only!(fild_64_membase, Op::Fild64Membase);
    def_membase_only!(fstp_membase, Op::FstpMembase);
    def_membase_only!(fstp_64_membase, Op::Fstp64Membase);
    def_membase_only!(fnstcw_membase, Op::FnstcwMembase);
    def_membase_only!(fldcw_membase, Op::FldcwMembase);
    def_membase_only!(fistp_64_membase, Op::Fistp64Membase);

    def_memlocal_only!(fld_memlocal, Op::FldMemlocal);
    def_memlocal_only!(fld_64_memlocal, Op::Fld64Memlocal);
    def_memlocal_only!(fstp_memlocal, Op::FstpMemlocal);
    def_memlocal_only!(fstp_64_memlocal, Op::Fstp64Memlocal);

    /// The sole `memindex_only` opcode: an indirect jump through a
    /// scaled-index memory operand.
    pub fn jmp_memindex(base: VirtualRegister, index: VirtualRegister, shift: u8) -> Instruction {
        Instruction { operand: Operand::mem_index(base, index, shift), ..Instruction::blank(Op::JmpMemindex) }
    }

    def_reg_reg!(adc_reg_reg, Op::AdcRegReg);
    def_reg_reg!(addss_xmm_xmm, Op::AddssXmmXmm);
    def_reg_reg!(addsd_xmm_xmm, Op::AddsdXmmXmm);
    def_reg_reg!(add_reg_reg, Op::AddRegReg);
    def_reg_reg!(and_reg_reg, Op::AndRegReg);
    def_reg_reg!(cltd_reg_reg, Op::CltdRegReg);
    def_reg_reg!(cmp_reg_reg, Op::CmpRegReg);
    def_reg_reg!(conv_fpu_to_gpr, Op::ConvFpuToGpr);
    def_reg_reg!(conv_fpu64_to_gpr, Op::ConvFpu64ToGpr);
    def_reg_reg!(conv_gpr_to_fpu, Op::ConvGprToFpu);
    def_reg_reg!(conv_gpr_to_fpu64, Op::ConvGprToFpu64);
    def_reg_reg!(conv_xmm_to_xmm64, Op::ConvXmmToXmm64);
    def_reg_reg!(conv_xmm64_to_xmm, Op::ConvXmm64ToXmm);
    def_reg_reg!(div_reg_reg, Op::DivRegReg);
    def_reg_reg!(divss_xmm_xmm, Op::DivssXmmXmm);
    def_reg_reg!(divsd_xmm_xmm, Op::DivsdXmmXmm);
    def_reg_reg!(mov_reg_reg, Op::MovRegReg);
    def_reg_reg!(movss_xmm_xmm, Op::MovssXmmXmm);
    def_reg_reg!(movsd_xmm_xmm, Op::MovsdXmmXmm);
    def_reg_reg!(mul_reg_eax, Op::MulRegEax);
    def_reg_reg!(mul_reg_reg, Op::MulRegReg);
    def_reg_reg!(mulss_xmm_xmm, Op::MulssXmmXmm);
    def_reg_reg!(mulsd_xmm_xmm, Op::MulsdXmmXmm);
    def_reg_reg!(or_reg_reg, Op::OrRegReg);
    def_reg_reg!(sar_reg_reg, Op::SarRegReg);
    def_reg_reg!(sbb_reg_reg, Op::SbbRegReg);
    def_reg_reg!(shl_reg_reg, Op::ShlRegReg);
    def_reg_reg!(shr_reg_reg, Op::ShrRegReg);
    def_reg_reg!(subss_xmm_xmm, Op::SubssXmmXmm);
    def_reg_reg!(subsd_xmm_xmm, Op::SubsdXmmXmm);
    def_reg_reg!(sub_reg_reg, Op::SubRegReg);
    def_reg_reg!(xor_reg_reg, Op::XorRegReg);
    def_reg_reg!(xorps_xmm_xmm, Op::XorpsXmmXmm);
    def_reg_reg!(xorpd_xmm_xmm, Op::XorpdXmmXmm);

    def_reg_reg!(movsx_8_reg_reg, Op::Movsx8RegReg);
    def_reg_reg!(movsx_16_reg_reg, Op::Movsx16RegReg);
    def_reg_reg!(movzx_16_reg_reg, Op::Movzx16RegReg);

    def_reg_only!(neg_reg, Op::NegReg);

    /// `pop_reg`: pops into a register. Kept distinct from `reg_only`
    /// (which is `neg_reg`'s signature) per the distilled spec's own
    /// naming, even though both store their single operand in the same
    /// `operand` slot.
    pub fn pop_reg(dest: VirtualRegister) -> Instruction {
        Instruction { operand: Operand::Reg(dest), ..Instruction::blank(Op::PopReg) }
    }

    pub fn push_reg(src: VirtualRegister) -> Instruction {
        Instruction { operand: Operand::Reg(src), ..Instruction::blank(Op::PushReg) }
    }

    pub fn push_memlocal(slot: StackSlot) -> Instruction {
        Instruction { operand: Operand::MemLocal { slot }, ..Instruction::blank(Op::PushMemlocal) }
    }

    pub fn pop_memlocal(slot: StackSlot) -> Instruction {
        Instruction { operand: Operand::MemLocal { slot }, ..Instruction::blank(Op::PopMemlocal) }
    }

    pub fn push_imm(imm: u64) -> Instruction {
        Instruction { operand: Operand::Imm(imm), ..Instruction::blank(Op::PushImm) }
    }

    pub fn call_rel(rel: i64) -> Instruction {
        Instruction { operand: Operand::Rel(rel), ..Instruction::blank(Op::CallRel) }
    }

    /// `call_reg`: an indirect call through a register, rendered
    /// parenthesized.
    pub fn call_reg(dest: VirtualRegister) -> Instruction {
        Instruction { operand: Operand::Reg(dest), ..Instruction::blank(Op::CallReg) }
    }

    /// Inline-cache call site. `method_handle` is the immediate value the
    /// allocator-side resolver capability later turns into a method name.
    pub fn ic_call(src: VirtualRegister, method_handle: u64) -> Instruction {
        Instruction { src: Operand::Reg(src), dest: Operand::Imm(method_handle), ..Instruction::blank(Op::IcCall) }
    }

    pub fn je_branch(target: BasicBlockId) -> Instruction {
        Instruction { operand: Operand::Branch(target), ..Instruction::blank(Op::JeBranch) }
    }

    pub fn jge_branch(target: BasicBlockId) -> Instruction {
        Instruction { operand: Operand::Branch(target), ..Instruction::blank(Op::JgeBranch) }
    }

    pub fn jg_branch(target: BasicBlockId) -> Instruction {
        Instruction { operand: Operand::Branch(target), ..Instruction::blank(Op::JgBranch) }
    }

    pub fn jle_branch(target: BasicBlockId) -> Instruction {
        Instruction { operand: Operand::Branch(target), ..Instruction::blank(Op::JleBranch) }
    }

    pub fn jl_branch(target: BasicBlockId) -> Instruction {
        Instruction { operand: Operand::Branch(target), ..Instruction::blank(Op::JlBranch) }
    }

    pub fn jmp_branch(target: BasicBlockId) -> Instruction {
        Instruction { operand: Operand::Branch(target), ..Instruction::blank(Op::JmpBranch) }
    }

    pub fn jne_branch(target: BasicBlockId) -> Instruction {
        Instruction { operand: Operand::Branch(target), ..Instruction::blank(Op::JneBranch) }
    }

    /// φ-node: `nr_srcs` sources (one per incoming edge) plus one
    /// destination.
    pub fn phi(srcs: &[VirtualRegister], dest: VirtualRegister) -> Instruction {
        Instruction {
            ssa_srcs: srcs.iter().map(|r| Operand::Reg(*r)).collect(),
            ssa_dest: Operand::Reg(dest),
            ..Instruction::blank(Op::Phi)
        }
    }

    pub fn mov_imm_tl_membase(imm: u64, disp: i64, base: VirtualRegister) -> Instruction {
        Instruction { src: Operand::Imm(imm), dest: Operand::TlMemBase { disp, base }, ..Instruction::blank(Op::MovImmTlMembase) }
    }

    pub fn mov_reg_tl_membase(src: VirtualRegister, disp: i64, base: VirtualRegister) -> Instruction {
        Instruction { src: Operand::Reg(src), dest: Operand::TlMemBase { disp, base }, ..Instruction::blank(Op::MovRegTlMembase) }
    }

    pub fn mov_reg_tl_memdisp(src: VirtualRegister, disp: i64) -> Instruction {
        Instruction { src: Operand::Reg(src), dest: Operand::TlMemDisp { disp }, ..Instruction::blank(Op::MovRegTlMemdisp) }
    }

    pub fn mov_tl_memdisp_reg(disp: i64, dest: VirtualRegister) -> Instruction {
        Instruction { src: Operand::TlMemDisp { disp }, dest: Operand::Reg(dest), ..Instruction::blank(Op::MovTlMemdispReg) }
    }
}
