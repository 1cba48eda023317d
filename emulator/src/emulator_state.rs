use common::asm::{NUM_REGS, Reg};
use common::constants::{MEM_WORDS, PC_START};
use common::misc::IsNegative;

use log::trace;


/// The condition code. Exactly one of the three is held at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cond {
    Pos = 0x1,
    #[default]
    Zero = 0x2,
    Neg = 0x4,
}

impl Cond {
    pub fn of(val: u16) -> Cond {
        if val == 0 {
            Cond::Zero
        } else if val.is_negative() {
            Cond::Neg
        } else {
            Cond::Pos
        }
    }

    // Same bit layout as the n, z, p mask of BR.
    pub fn bits(self) -> u16 {
        self as u16
    }
}

// This is separate so a mutable borrow can be passed to the MMIO handlers.
pub struct EmulatorState {
    num_ins: usize,
    mem: Vec<u16>,
    regs: [u16; NUM_REGS],
    pc: u16,
    cond: Cond,
}

impl EmulatorState {
    pub fn new() -> Self {
        EmulatorState {
            num_ins: 0usize,
            mem: vec![0; MEM_WORDS],
            regs: [0; NUM_REGS],
            pc: PC_START,
            cond: Cond::Zero,
        }
    }

    pub fn inc_ins(&mut self) {
        self.num_ins += 1;
    }

    pub fn num_ins(&self) -> usize {
        self.num_ins
    }

    // Plain storage, no device side effects.
    pub fn mem_read_word(&self, addr: u16) -> u16 {
        self.mem[addr as usize]
    }

    pub fn mem_write_word(&mut self, addr: u16, val: u16) {
        trace!("Mem: writing {val:#06x} to {addr:#06x}");
        self.mem[addr as usize] = val;
    }

    pub fn reg_write_word(&mut self, reg: Reg, val: u16) {
        trace!("Reg: writing {val:#06x} to {reg}");
        self.regs[reg.index()] = val;
    }

    pub fn reg_read_word(&self, reg: Reg) -> u16 {
        self.regs[reg.index()]
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn set_pc(&mut self, pc: u16) {
        trace!("PC: {:#06x} -> {pc:#06x}", self.pc);
        self.pc = pc;
    }

    pub fn cond(&self) -> Cond {
        self.cond
    }

    pub fn set_cond(&mut self, cond: Cond) {
        self.cond = cond;
    }

    /// Sets the condition code from the value just written to `reg`.
    pub fn update_flags(&mut self, reg: Reg) {
        self.cond = Cond::of(self.reg_read_word(reg));
    }
}

impl Default for EmulatorState {
    fn default() -> Self {
        Self::new()
    }
}
