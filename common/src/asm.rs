use std::fmt;

use num_derive::FromPrimitive;
use num_traits::FromPrimitive as _;
use derive_more::IsVariant;


#[derive(Debug, Clone, Copy, FromPrimitive, PartialEq, Eq, Hash)]
pub enum Reg {
    R0 = 0,
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", format!("{:?}", self).to_lowercase())
    }
}

pub const NUM_REGS: usize = 8;

impl Reg {
    pub const NUM_BITS: u32 = 3;
    pub const MASK: u16 = (1u16 << Self::NUM_BITS) - 1;

    // Return address register for JSR, JSRR and TRAP.
    pub const LINK: Reg = Reg::R7;

    pub fn index(self) -> usize {
        self as usize
    }
}

////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Copy, FromPrimitive, PartialEq, Eq)]
pub enum Opcode {
    Br = 0,
    Add,
    Ld,
    St,
    Jsr,
    And,
    Ldr,
    Str,
    Rti,
    Not,
    Ldi,
    Sti,
    Jmp,
    Res,
    Lea,
    Trap,
}

impl Opcode {
    pub const SHIFT: u32 = 12;
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", format!("{:?}", self).to_lowercase())
    }
}

////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Clone, Copy, FromPrimitive, PartialEq, Eq)]
pub enum TrapCode {
    Getc = 0x20,
    Out,
    Puts,
    In,
    Putsp,
    Halt,
}

impl fmt::Display for TrapCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", format!("{:?}", self).to_uppercase())
    }
}

////////////////////////////////////////////////////////////////////////////////

// Second operand of ADD and AND, selected by bit 5.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AluSrc {
    Reg(Reg),
    Imm(u16), // Already sign extended
}

impl fmt::Display for AluSrc {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AluSrc::Reg(reg) => write!(f, "{reg}"),
            AluSrc::Imm(imm) => fmt_imm(f, *imm),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsrTarget {
    Offset(u16), // JSR, PC relative
    Reg(Reg),    // JSRR
}

// The n, z, p mask of a BR, in bits 2, 1, 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BrCond(pub u16);

impl BrCond {
    pub const N: u16 = 0x4;
    pub const Z: u16 = 0x2;
    pub const P: u16 = 0x1;
}

impl fmt::Display for BrCond {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (bit, c) in [(Self::N, 'n'), (Self::Z, 'z'), (Self::P, 'p')] {
            if self.0 & bit != 0 {
                write!(f, "{c}")?;
            }
        }
        Ok(())
    }
}

fn fmt_imm(f: &mut fmt::Formatter, val: u16) -> fmt::Result {
    write!(f, "#{}", val as i16)
}

////////////////////////////////////////////////////////////////////////////////

// One variant per opcode. Offsets and immediates are stored sign extended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, IsVariant)]
pub enum Ins {
    Br { cond: BrCond, offset: u16 },
    Add { dst: Reg, src1: Reg, src2: AluSrc },
    Ld { dst: Reg, offset: u16 },
    St { src: Reg, offset: u16 },
    Jsr { target: JsrTarget },
    And { dst: Reg, src1: Reg, src2: AluSrc },
    Ldr { dst: Reg, base: Reg, offset: u16 },
    Str { src: Reg, base: Reg, offset: u16 },
    Rti,
    Not { dst: Reg, src: Reg },
    Ldi { dst: Reg, offset: u16 },
    Sti { src: Reg, offset: u16 },
    Jmp { base: Reg },
    Res,
    Lea { dst: Reg, offset: u16 },
    Trap { vector: u8 },
}

impl Ins {
    // Field positions shared by several formats.
    pub const DST_SHIFT: u32 = 9;
    pub const SRC1_SHIFT: u32 = 6;
    pub const SRC2_SHIFT: u32 = 0;
    pub const IMM_FLAG: u16 = 1 << 5;
    pub const JSR_FLAG: u16 = 1 << 11;

    pub const IMM5_BITS: u32 = 5;
    pub const OFFSET6_BITS: u32 = 6;
    pub const PC_OFFSET9_BITS: u32 = 9;
    pub const PC_OFFSET11_BITS: u32 = 11;
    pub const TRAP_VECTOR_MASK: u16 = 0xff;

    pub fn opcode(&self) -> Opcode {
        match self {
            Ins::Br{..} => Opcode::Br,
            Ins::Add{..} => Opcode::Add,
            Ins::Ld{..} => Opcode::Ld,
            Ins::St{..} => Opcode::St,
            Ins::Jsr{..} => Opcode::Jsr,
            Ins::And{..} => Opcode::And,
            Ins::Ldr{..} => Opcode::Ldr,
            Ins::Str{..} => Opcode::Str,
            Ins::Rti => Opcode::Rti,
            Ins::Not{..} => Opcode::Not,
            Ins::Ldi{..} => Opcode::Ldi,
            Ins::Sti{..} => Opcode::Sti,
            Ins::Jmp{..} => Opcode::Jmp,
            Ins::Res => Opcode::Res,
            Ins::Lea{..} => Opcode::Lea,
            Ins::Trap{..} => Opcode::Trap,
        }
    }

    pub fn display_with_pc(&self, pc: u16) -> InsWithPc<'_> {
        InsWithPc(self, pc)
    }

    // Like Display, but PC relative operands are shown as absolute addresses.
    // pc is the address of the instruction itself.
    pub fn fmt_with_pc(&self, f: &mut fmt::Formatter, pc: u16) -> fmt::Result {
        let next = pc.wrapping_add(1);
        let target = |offset: u16| next.wrapping_add(offset);
        match *self {
            Ins::Br{cond, offset} => write!(f, "br{cond}\t{:#06x}", target(offset)),
            Ins::Ld{dst, offset} => write!(f, "ld\t{dst}, {:#06x}", target(offset)),
            Ins::St{src, offset} => write!(f, "st\t{src}, {:#06x}", target(offset)),
            Ins::Jsr{target: JsrTarget::Offset(offset)} => write!(f, "jsr\t{:#06x}", target(offset)),
            Ins::Ldi{dst, offset} => write!(f, "ldi\t{dst}, {:#06x}", target(offset)),
            Ins::Sti{src, offset} => write!(f, "sti\t{src}, {:#06x}", target(offset)),
            Ins::Lea{dst, offset} => write!(f, "lea\t{dst}, {:#06x}", target(offset)),
            _ => fmt::Display::fmt(self, f),
        }
    }
}

impl fmt::Display for Ins {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Ins::Br{cond, offset} => {
                write!(f, "br{cond}\t")?;
                fmt_imm(f, offset)
            },
            Ins::Add{dst, src1, src2} => write!(f, "add\t{dst}, {src1}, {src2}"),
            Ins::And{dst, src1, src2} => write!(f, "and\t{dst}, {src1}, {src2}"),
            Ins::Not{dst, src} => write!(f, "not\t{dst}, {src}"),
            Ins::Jmp{base: Reg::R7} => write!(f, "ret"),
            Ins::Jmp{base} => write!(f, "jmp\t{base}"),
            Ins::Jsr{target: JsrTarget::Offset(offset)} => {
                write!(f, "jsr\t")?;
                fmt_imm(f, offset)
            },
            Ins::Jsr{target: JsrTarget::Reg(base)} => write!(f, "jsrr\t{base}"),
            Ins::Ld{dst, offset} => {
                write!(f, "ld\t{dst}, ")?;
                fmt_imm(f, offset)
            },
            Ins::Ldi{dst, offset} => {
                write!(f, "ldi\t{dst}, ")?;
                fmt_imm(f, offset)
            },
            Ins::Lea{dst, offset} => {
                write!(f, "lea\t{dst}, ")?;
                fmt_imm(f, offset)
            },
            Ins::St{src, offset} => {
                write!(f, "st\t{src}, ")?;
                fmt_imm(f, offset)
            },
            Ins::Sti{src, offset} => {
                write!(f, "sti\t{src}, ")?;
                fmt_imm(f, offset)
            },
            Ins::Ldr{dst, base, offset} => {
                write!(f, "ldr\t{dst}, {base}, ")?;
                fmt_imm(f, offset)
            },
            Ins::Str{src, base, offset} => {
                write!(f, "str\t{src}, {base}, ")?;
                fmt_imm(f, offset)
            },
            Ins::Trap{vector} => {
                match TrapCode::from_u8(vector) {
                    Some(code) => write!(f, "{code}"),
                    None => write!(f, "trap\t{vector:#04x}"),
                }
            },
            Ins::Rti => write!(f, "rti"),
            Ins::Res => write!(f, "reserved"),
        }
    }
}

// Just for formatting, like Path::Display()
pub struct InsWithPc<'a>(&'a Ins, u16);

impl<'a> fmt::Display for InsWithPc<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt_with_pc(f, self.1)
    }
}
