use num_traits::FromPrimitive;

use crate::asm::*;
use crate::misc::sign_extend;

fn reg_at(input: u16, shift: u32) -> Reg {
    match Reg::from_u16((input >> shift) & Reg::MASK) {
        Some(reg) => reg,
        None => unreachable!("register fields are 3 bits"),
    }
}

fn dst(input: u16) -> Reg {
    reg_at(input, Ins::DST_SHIFT)
}

fn src1(input: u16) -> Reg {
    reg_at(input, Ins::SRC1_SHIFT)
}

fn alu_src2(input: u16) -> AluSrc {
    if input & Ins::IMM_FLAG != 0 {
        AluSrc::Imm(sign_extend(input, Ins::IMM5_BITS))
    } else {
        AluSrc::Reg(reg_at(input, Ins::SRC2_SHIFT))
    }
}

fn pc_offset9(input: u16) -> u16 {
    sign_extend(input, Ins::PC_OFFSET9_BITS)
}

fn offset6(input: u16) -> u16 {
    sign_extend(input, Ins::OFFSET6_BITS)
}

fn decode_br(input: u16) -> Ins {
    let cond = BrCond((input >> Ins::DST_SHIFT) & 0x7);
    Ins::Br{cond, offset: pc_offset9(input)}
}

fn decode_jsr(input: u16) -> Ins {
    let target = if input & Ins::JSR_FLAG != 0 {
        JsrTarget::Offset(sign_extend(input, Ins::PC_OFFSET11_BITS))
    } else {
        JsrTarget::Reg(src1(input))
    };
    Ins::Jsr{target}
}

/// Decodes a single instruction word. Every word decodes to something; the
/// reserved opcodes come back as `Ins::Rti` and `Ins::Res`.
pub fn decode(input: u16) -> Ins {
    let Some(op) = Opcode::from_u16(input >> Opcode::SHIFT) else {
        unreachable!("opcodes are 4 bits");
    };

    match op {
        Opcode::Br => decode_br(input),
        Opcode::Add => Ins::Add{dst: dst(input), src1: src1(input), src2: alu_src2(input)},
        Opcode::Ld => Ins::Ld{dst: dst(input), offset: pc_offset9(input)},
        Opcode::St => Ins::St{src: dst(input), offset: pc_offset9(input)},
        Opcode::Jsr => decode_jsr(input),
        Opcode::And => Ins::And{dst: dst(input), src1: src1(input), src2: alu_src2(input)},
        Opcode::Ldr => Ins::Ldr{dst: dst(input), base: src1(input), offset: offset6(input)},
        Opcode::Str => Ins::Str{src: dst(input), base: src1(input), offset: offset6(input)},
        Opcode::Rti => Ins::Rti,
        Opcode::Not => Ins::Not{dst: dst(input), src: src1(input)},
        Opcode::Ldi => Ins::Ldi{dst: dst(input), offset: pc_offset9(input)},
        Opcode::Sti => Ins::Sti{src: dst(input), offset: pc_offset9(input)},
        Opcode::Jmp => Ins::Jmp{base: src1(input)},
        Opcode::Res => Ins::Res,
        Opcode::Lea => Ins::Lea{dst: dst(input), offset: pc_offset9(input)},
        Opcode::Trap => Ins::Trap{vector: (input & Ins::TRAP_VECTOR_MASK) as u8},
    }
}
