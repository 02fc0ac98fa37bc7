//! Printer dispatch: `lir_print`, a total function from instruction to
//! formatted text.
//!
//! Grounded on `backend/ir.rs`'s `fmt::Debug for Insn` (one match arm per
//! opcode, threading a shared formatter through) and, for the exact textual
//! grammar and special-case suffixes, jato's `arch/x86/lir-printer.c`
//! (`print_func_name`'s `"%-20s "` column and the per-signature `print_*`
//! helpers).

use std::fmt::Write as _;

use crate::error::PrintError;
use crate::instruction::{Instruction, Op, OperandForm};
use crate::operand::{LiveIntervalTable, Operand, PhysRegName};

/// Resolves an `ic_call` method handle to the method's name. An abstract
/// capability, not owned by this module — see `crate::classloader` for one
/// concrete implementation.
pub trait MethodResolver {
    fn resolve_method_name(&self, imm: u64) -> Option<&str>;
}

const MNEMONIC_COLUMN: usize = 20;

/// Renders `instruction` into `sink`, per the opcode's operand-form
/// signature. Appends no trailing newline; the caller decides line framing.
///
/// `UnknownOpcode` can never be produced here — `instruction.op()` is always
/// a valid `Op`, proven by the compiler's exhaustive match below. It exists
/// on `PrintError` for the raw-tag boundary in `Op::try_from`, not this
/// path. The only error this function can actually return is
/// `MalformedOperand`, from `ic_call`'s resolver precondition.
pub fn lir_print(
    instruction: &Instruction,
    sink: &mut String,
    intervals: &LiveIntervalTable,
    regs: &dyn PhysRegName,
    resolver: &dyn MethodResolver,
) -> Result<(), PrintError> {
    let op = instruction.op();
    write!(sink, "{:<width$} ", op.mnemonic(), width = MNEMONIC_COLUMN).unwrap();

    match op.form() {
        OperandForm::Nullary => {}

        OperandForm::ImmReg
        | OperandForm::ImmMembase
        | OperandForm::ImmMemlocal
        | OperandForm::ImmMemdisp
        | OperandForm::MembaseReg
        | OperandForm::MemdispReg
        | OperandForm::RegMemdisp
        | OperandForm::MemlocalReg
        | OperandForm::RegMemlocal
        | OperandForm::RegMembase
        | OperandForm::MemindexReg
        | OperandForm::RegMemindex
        | OperandForm::RegReg
        | OperandForm::TlImmMembase
        | OperandForm::TlRegMembase
        | OperandForm::TlRegMemdisp
        | OperandForm::TlMemdispReg => {
            instruction.src.fmt_into(sink, intervals, regs);
            sink.push_str(", ");
            instruction.dest.fmt_into(sink, intervals, regs);
        }

        OperandForm::SignExtendRegReg => {
            instruction.src.fmt_into(sink, intervals, regs);
            sink.push_str(", ");
            instruction.dest.fmt_into(sink, intervals, regs);
            sink.push_str(sign_extend_suffix(op));
        }

        OperandForm::MembaseOnly
        | OperandForm::MemlocalOnly
        | OperandForm::MemindexOnly
        | OperandForm::RegOnly
        | OperandForm::PushReg
        | OperandForm::PushMemlocal
        | OperandForm::PopMemlocal
        | OperandForm::PopReg
        | OperandForm::ImmOnly
        | OperandForm::RelOnly
        | OperandForm::Branch => {
            instruction.operand.fmt_into(sink, intervals, regs);
        }

        OperandForm::CallReg => {
            sink.push('(');
            instruction.operand.fmt_into(sink, intervals, regs);
            sink.push(')');
        }

        OperandForm::IcCall => {
            instruction.src.fmt_into(sink, intervals, regs);
            sink.push_str(", ");
            instruction.dest.fmt_into(sink, intervals, regs);
            let imm = match instruction.dest {
                Operand::Imm(imm) => imm,
                _ => unreachable!("ic_call's dest slot is always Operand::Imm"),
            };
            let name = resolver.resolve_method_name(imm).ok_or_else(|| {
                PrintError::MalformedOperand(format!("ic_call: unresolvable method handle 0x{imm:x}"))
            })?;
            write!(sink, "<{name}>").unwrap();
        }

        OperandForm::Phi => {
            for src in &instruction.ssa_srcs {
                src.fmt_into(sink, intervals, regs);
                sink.push_str(", ");
            }
            instruction.ssa_dest.fmt_into(sink, intervals, regs);
        }
    }

    Ok(())
}

fn sign_extend_suffix(op: Op) -> &'static str {
    match op {
        Op::Movsx8RegReg => "(8bit->32bit)",
        Op::Movsx16RegReg | Op::Movzx16RegReg => "(16bit->32bit)",
        _ => unreachable!("sign_extend_suffix called for a non-sign-extending opcode"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instruction::Instruction;
    use crate::operand::{BasicBlockId, StackSlot, VirtualRegister};

    struct FixedRegs;

    impl PhysRegName for FixedRegs {
        fn name(&self, code: u8) -> &'static str {
            match code {
                0 => "eax",
                1 => "ebx",
                _ => "unknown",
            }
        }
    }

    struct NoMethods;

    impl MethodResolver for NoMethods {
        fn resolve_method_name(&self, _imm: u64) -> Option<&str> {
            None
        }
    }

    struct OneMethod(&'static str);

    impl MethodResolver for OneMethod {
        fn resolve_method_name(&self, _imm: u64) -> Option<&str> {
            Some(self.0)
        }
    }

    fn render(instruction: &Instruction, intervals: &LiveIntervalTable) -> String {
        let mut sink = String::new();
        lir_print(instruction, &mut sink, intervals, &FixedRegs, &NoMethods).unwrap();
        sink
    }

    #[test]
    fn add_imm_reg_matches_worked_example() {
        let mut intervals = LiveIntervalTable::new();
        let dest = intervals.alloc();
        assert_eq!(dest.id(), 3, "the worked example assumes vreg 3 is the third allocated register");
        let insn = Instruction::add_imm_reg(0x10, dest);
        assert_eq!(render(&insn, &intervals), "add_imm_reg          $0x10, r3");
    }

    #[test]
    fn mov_reg_reg_with_fixed_src() {
        let mut intervals = LiveIntervalTable::new();
        let src = intervals.alloc();
        intervals.assign_fixed_reg(src, 0);
        let dest = intervals.alloc();
        let insn = Instruction::mov_reg_reg(src, dest);
        assert_eq!(render(&insn, &intervals), "mov_reg_reg          r0=eax, r1");
    }

    #[test]
    fn jmp_branch() {
        let intervals = LiveIntervalTable::new();
        let insn = Instruction::jmp_branch(BasicBlockId(0xabcd));
        assert_eq!(render(&insn, &intervals), "jmp_branch           bb 0xabcd");
    }

    #[test]
    fn mov_membase_reg() {
        let mut intervals = LiveIntervalTable::new();
        let base = intervals.alloc();
        let dest = intervals.alloc();
        let insn = Instruction::mov_membase_reg(0x20, base, dest);
        assert_eq!(render(&insn, &intervals), "mov_membase_reg      $0x20(r0), r1");
    }

    #[test]
    fn movsx_8_reg_reg_appends_suffix() {
        let mut intervals = LiveIntervalTable::new();
        let src = intervals.alloc();
        let dest = intervals.alloc();
        let insn = Instruction::movsx_8_reg_reg(src, dest);
        assert_eq!(render(&insn, &intervals), "movsx_8_reg_reg      r0, r1(8bit->32bit)");
    }

    #[test]
    fn phi_joins_sources_then_dest() {
        let mut intervals = LiveIntervalTable::new();
        let srcs: Vec<_> = (0..3).map(|_| intervals.alloc()).collect();
        let dest = intervals.alloc();
        let insn = Instruction::phi(&srcs, dest);
        assert_eq!(render(&insn, &intervals), "phi                  r0, r1, r2, r3");
    }

    #[test]
    fn ic_call_appends_resolved_method_name() {
        let mut intervals = LiveIntervalTable::new();
        let src = intervals.alloc();
        let insn = Instruction::ic_call(src, 0xdead);
        let mut sink = String::new();
        lir_print(&insn, &mut sink, &intervals, &FixedRegs, &OneMethod("foo")).unwrap();
        assert_eq!(sink, "ic_call              r0, $0xdead<foo>");
    }

    #[test]
    fn ic_call_unresolvable_handle_is_malformed_operand() {
        let mut intervals = LiveIntervalTable::new();
        let src = intervals.alloc();
        let insn = Instruction::ic_call(src, 0xdead);
        let mut sink = String::new();
        let err = lir_print(&insn, &mut sink, &intervals, &FixedRegs, &NoMethods).unwrap_err();
        assert!(matches!(err, PrintError::MalformedOperand(_)));
    }

    #[test]
    fn nullary_emits_only_mnemonic_column() {
        let intervals = LiveIntervalTable::new();
        let insn = Instruction::ret();
        assert_eq!(render(&insn, &intervals), "ret                  ");
    }

    #[test]
    fn call_reg_is_parenthesized() {
        let mut intervals = LiveIntervalTable::new();
        let dest = intervals.alloc();
        let insn = Instruction::call_reg(dest);
        assert_eq!(render(&insn, &intervals), "call_reg             (r0)");
    }

    #[test]
    fn push_memlocal_renders_slot() {
        let intervals = LiveIntervalTable::new();
        let insn = Instruction::push_memlocal(StackSlot::new(-8));
        assert_eq!(render(&insn, &intervals), "push_memlocal        @-8(bp)");
    }

    #[test]
    fn thread_local_membase_has_gs_prefix_no_extra_parens() {
        let mut intervals = LiveIntervalTable::new();
        let src = intervals.alloc();
        let base = intervals.alloc();
        let insn = Instruction::mov_reg_tl_membase(src, 0x4, base);
        assert_eq!(render(&insn, &intervals), "mov_reg_tlmembase    r0, gs:$0x4(r1)");
    }

    #[test]
    fn mov_reg_membase_renders_base_plus_disp_not_a_local_slot() {
        let mut intervals = LiveIntervalTable::new();
        let src = intervals.alloc();
        let base = intervals.alloc();
        let insn = Instruction::mov_reg_membase(src, 0x20, base);
        assert_eq!(render(&insn, &intervals), "mov_reg_membase      r0, $0x20(r1)");
    }

    #[test]
    fn unknown_opcode_tag_is_rejected_by_op_try_from() {
        let err = Op::try_from(10_000u32).unwrap_err();
        assert_eq!(err, PrintError::UnknownOpcode(10_000));
    }

    #[test]
    fn same_instruction_prints_identically_twice() {
        let mut intervals = LiveIntervalTable::new();
        let dest = intervals.alloc();
        let insn = Instruction::add_imm_reg(0x10, dest);
        assert_eq!(render(&insn, &intervals), render(&insn, &intervals));
    }
}

/// Property-based tests quantifying over every opcode, in the style of
/// `burjui-risky`'s exact-string instruction tests but generated rather
/// than enumerated by hand, per properties (1), (2), (4) and (5) of
/// `SPEC_FULL.md` §8.
#[cfg(test)]
mod property_tests {
    use super::*;
    use crate::operand::{BasicBlockId, StackSlot};
    use proptest::prelude::*;

    struct NamedRegs;

    impl PhysRegName for NamedRegs {
        fn name(&self, code: u8) -> &'static str {
            match code % 4 {
                0 => "eax",
                1 => "ebx",
                2 => "ecx",
                _ => "edx",
            }
        }
    }

    struct AlwaysResolves;

    impl MethodResolver for AlwaysResolves {
        fn resolve_method_name(&self, _imm: u64) -> Option<&str> {
            Some("resolved")
        }
    }

    /// Builds one syntactically valid instance of `op`, shaped by its
    /// operand-form signature, using fresh virtual registers allocated
    /// from `table`. This mirrors the typed constructors in
    /// `crate::instruction` one-to-one but is driven by `OperandForm`
    /// rather than by opcode, so a single function covers all 127 without
    /// enumerating their names again.
    fn build_instruction(op: Op, table: &mut LiveIntervalTable, imm: u64, disp: i64, shift: u8) -> Instruction {
        let shift = shift % 4;
        let blank = |op| Instruction {
            op,
            src: Operand::None,
            dest: Operand::None,
            operand: Operand::None,
            ssa_srcs: Vec::new(),
            ssa_dest: Operand::None,
        };
        match op.form() {
            OperandForm::Nullary => blank(op),
            OperandForm::ImmReg => {
                let dest = table.alloc();
                Instruction { src: Operand::Imm(imm), dest: Operand::Reg(dest), ..blank(op) }
            }
            OperandForm::ImmMembase => {
                let base = table.alloc();
                Instruction { src: Operand::Imm(imm), dest: Operand::MemBase { disp, base }, ..blank(op) }
            }
            OperandForm::ImmMemlocal => Instruction {
                src: Operand::Imm(imm),
                dest: Operand::MemLocal { slot: StackSlot::new(disp as i32) },
                ..blank(op)
            },
            OperandForm::ImmMemdisp => Instruction { src: Operand::Imm(imm), dest: Operand::MemDisp { disp }, ..blank(op) },
            OperandForm::MembaseReg => {
                let base = table.alloc();
                let dest = table.alloc();
                Instruction { src: Operand::MemBase { disp, base }, dest: Operand::Reg(dest), ..blank(op) }
            }
            OperandForm::MemdispReg => {
                let dest = table.alloc();
                Instruction { src: Operand::MemDisp { disp }, dest: Operand::Reg(dest), ..blank(op) }
            }
            OperandForm::RegMemdisp => {
                let src = table.alloc();
                Instruction { src: Operand::Reg(src), dest: Operand::MemDisp { disp }, ..blank(op) }
            }
            OperandForm::MemlocalReg => {
                let dest = table.alloc();
                Instruction {
                    src: Operand::MemLocal { slot: StackSlot::new(disp as i32) },
                    dest: Operand::Reg(dest),
                    ..blank(op)
                }
            }
            OperandForm::RegMemlocal => {
                let src = table.alloc();
                Instruction {
                    src: Operand::Reg(src),
                    dest: Operand::MemLocal { slot: StackSlot::new(disp as i32) },
                    ..blank(op)
                }
            }
            OperandForm::RegMembase => {
                let src = table.alloc();
                let base = table.alloc();
                Instruction { src: Operand::Reg(src), dest: Operand::MemBase { disp, base }, ..blank(op) }
            }
            OperandForm::MemindexReg => {
                let base = table.alloc();
                let index = table.alloc();
                let dest = table.alloc();
                Instruction { src: Operand::mem_index(base, index, shift), dest: Operand::Reg(dest), ..blank(op) }
            }
            OperandForm::RegMemindex => {
                let src = table.alloc();
                let base = table.alloc();
                let index = table.alloc();
                Instruction { src: Operand::Reg(src), dest: Operand::mem_index(base, index, shift), ..blank(op) }
            }
            OperandForm::MembaseOnly => {
                let base = table.alloc();
                Instruction { operand: Operand::MemBase { disp, base }, ..blank(op) }
            }
            OperandForm::MemlocalOnly => {
                Instruction { operand: Operand::MemLocal { slot: StackSlot::new(disp as i32) }, ..blank(op) }
            }
            OperandForm::MemindexOnly => {
                let base = table.alloc();
                let index = table.alloc();
                Instruction { operand: Operand::mem_index(base, index, shift), ..blank(op) }
            }
            OperandForm::RegReg | OperandForm::SignExtendRegReg => {
                let src = table.alloc();
                let dest = table.alloc();
                Instruction { src: Operand::Reg(src), dest: Operand::Reg(dest), ..blank(op) }
            }
            OperandForm::RegOnly | OperandForm::PushReg | OperandForm::PopReg | OperandForm::CallReg => {
                let r = table.alloc();
                Instruction { operand: Operand::Reg(r), ..blank(op) }
            }
            OperandForm::PushMemlocal | OperandForm::PopMemlocal => {
                Instruction { operand: Operand::MemLocal { slot: StackSlot::new(disp as i32) }, ..blank(op) }
            }
            OperandForm::ImmOnly => Instruction { operand: Operand::Imm(imm), ..blank(op) },
            OperandForm::RelOnly => Instruction { operand: Operand::Rel(disp), ..blank(op) },
            OperandForm::Branch => Instruction { operand: Operand::Branch(BasicBlockId(imm)), ..blank(op) },
            OperandForm::IcCall => {
                let src = table.alloc();
                Instruction { src: Operand::Reg(src), dest: Operand::Imm(imm), ..blank(op) }
            }
            OperandForm::Phi => {
                let s1 = table.alloc();
                let s2 = table.alloc();
                let dest = table.alloc();
                Instruction { ssa_srcs: vec![Operand::Reg(s1), Operand::Reg(s2)], ssa_dest: Operand::Reg(dest), ..blank(op) }
            }
            OperandForm::TlImmMembase => {
                let base = table.alloc();
                Instruction { src: Operand::Imm(imm), dest: Operand::TlMemBase { disp, base }, ..blank(op) }
            }
            OperandForm::TlRegMembase => {
                let src = table.alloc();
                let base = table.alloc();
                Instruction { src: Operand::Reg(src), dest: Operand::TlMemBase { disp, base }, ..blank(op) }
            }
            OperandForm::TlRegMemdisp => {
                let src = table.alloc();
                Instruction { src: Operand::Reg(src), dest: Operand::TlMemDisp { disp }, ..blank(op) }
            }
            OperandForm::TlMemdispReg => {
                let dest = table.alloc();
                Instruction { src: Operand::TlMemDisp { disp }, dest: Operand::Reg(dest), ..blank(op) }
            }
        }
    }

    fn is_two_operand(form: OperandForm) -> bool {
        !matches!(
            form,
            OperandForm::Nullary
                | OperandForm::MembaseOnly
                | OperandForm::MemlocalOnly
                | OperandForm::MemindexOnly
                | OperandForm::RegOnly
                | OperandForm::PushReg
                | OperandForm::PushMemlocal
                | OperandForm::PopMemlocal
                | OperandForm::PopReg
                | OperandForm::ImmOnly
                | OperandForm::RelOnly
                | OperandForm::CallReg
                | OperandForm::Branch
                | OperandForm::Phi
        )
    }

    /// Counts `", "` occurrences outside any parenthesized group — the
    /// `MemIndex` form's own internal commas (`(rB, rI, SHIFT)`) must not
    /// be mistaken for the src/dest separator.
    fn top_level_separators(s: &str) -> usize {
        let bytes = s.as_bytes();
        let mut depth = 0i32;
        let mut count = 0;
        for i in 0..bytes.len() {
            match bytes[i] {
                b'(' => depth += 1,
                b')' => depth -= 1,
                b',' if depth == 0 && bytes.get(i + 1) == Some(&b' ') => count += 1,
                _ => {}
            }
        }
        count
    }

    proptest! {
        #[test]
        fn every_opcode_prints_successfully_with_no_trailing_newline_and_is_idempotent(
            idx in 0..Op::ALL.len(),
            imm: u64,
            disp: i64,
            shift: u8,
        ) {
            let op = Op::ALL[idx];
            let mut table = LiveIntervalTable::new();
            let insn = build_instruction(op, &mut table, imm, disp, shift);

            let mut first = String::new();
            lir_print(&insn, &mut first, &table, &NamedRegs, &AlwaysResolves).unwrap();

            prop_assert!(first.starts_with(op.mnemonic()));
            prop_assert!(first.len() >= MNEMONIC_COLUMN);
            prop_assert!(!first.ends_with('\n'));

            let mut second = String::new();
            lir_print(&insn, &mut second, &table, &NamedRegs, &AlwaysResolves).unwrap();
            prop_assert_eq!(first, second);
        }

        #[test]
        fn two_operand_signatures_have_exactly_one_top_level_separator(
            form_idx in 0usize..1000,
            imm: u64,
            disp: i64,
            shift: u8,
        ) {
            let two_operand_ops: Vec<Op> = Op::ALL.iter().copied().filter(|op| is_two_operand(op.form())).collect();
            let op = two_operand_ops[form_idx % two_operand_ops.len()];
            let mut table = LiveIntervalTable::new();
            let insn = build_instruction(op, &mut table, imm, disp, shift);

            let mut sink = String::new();
            lir_print(&insn, &mut sink, &table, &NamedRegs, &AlwaysResolves).unwrap();
            prop_assert_eq!(top_level_separators(&sink), 1);
        }
    }
}
