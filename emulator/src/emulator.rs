use common::asm::*;
use common::constants::MMIO_START;
use common::decoder::decode;
use common::image::Image;
use crate::EmulatorState;
use crate::MMIOHandler;
use crate::emulator_state::Cond;
use crate::error::{EmuError, LoadError};
use crate::io::console::Console;
use crate::io::keyboard::Keyboard;

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use delegate::delegate;
use log::{debug, info};


#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecRet {
    Ok,
    Halt,
}


pub struct Emulator {
    state: EmulatorState,
    mmio_handlers: HashMap<u16, Arc<Mutex<dyn MMIOHandler>>>,
    pub(crate) console: Arc<dyn Console>,
}

impl Emulator {
    // Instructions between non-blocking looks at the console for an interrupt.
    const INTERRUPT_CHECK_INTERVAL: usize = 1024;

    pub fn new(console: Arc<dyn Console>) -> Emulator {
        Self::with_poll_timeout(console, Keyboard::DEFAULT_POLL_TIMEOUT)
    }

    pub fn with_poll_timeout(console: Arc<dyn Console>, poll_timeout: Duration) -> Emulator {
        let mut emu = Emulator {
            state: EmulatorState::new(),
            mmio_handlers: HashMap::new(),
            console: console.clone(),
        };
        emu.set_mmio_handler(Keyboard::with_timeout(console, poll_timeout));
        emu
    }

    // Run until a halt, a fault, or an interrupt.
    pub fn run(&mut self) -> Result<(), EmuError> {
        while self.run_ins()? != ExecRet::Halt {}
        Ok(())
    }

    // Fetch, decode and execute a single instruction.
    pub fn run_ins(&mut self) -> Result<ExecRet, EmuError> {
        let interrupted = if self.state.num_ins() % Self::INTERRUPT_CHECK_INTERVAL == 0 {
            self.console.check_interrupt()?
        } else {
            self.console.interrupted()
        };
        if interrupted {
            return Err(EmuError::Interrupted);
        }
        self.state.inc_ins();

        let pc = self.state.pc();
        let ins = decode(self.mem_read_word(pc)?);
        debug!("PC: {pc:#06x}: {}", ins.display_with_pc(pc));
        self.state.set_pc(pc.wrapping_add(1));

        self.exec(&ins)
    }

    ///////////////////////////////////////////////////////////////////////////
    // Loading
    ///////////////////////////////////////////////////////////////////////////

    // Words past 0xffff wrap around to 0x0000.
    pub fn load_words(&mut self, origin: u16, words: &[u16]) {
        self.load(&Image::new(origin, words.to_vec()));
    }

    pub fn load(&mut self, image: &Image) {
        for (addr, word) in image.placed() {
            self.state.mem_write_word(addr, word);
        }
        info!("Loaded {} words at {:#06x}", image.words.len(), image.origin);
    }

    // Returns the image's origin.
    pub fn load_image(&mut self, input: impl Read, path: &Path) -> Result<u16, LoadError> {
        let image = Image::read(input).map_err(|source| LoadError::Image{
            path: path.to_owned(),
            source,
        })?;
        self.load(&image);
        Ok(image.origin)
    }

    pub fn load_image_file(&mut self, path: impl AsRef<Path>) -> Result<u16, LoadError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| LoadError::Open{
            path: path.to_owned(),
            source,
        })?;
        self.load_image(file, path)
    }

    ///////////////////////////////////////////////////////////////////////////
    // Memory
    ///////////////////////////////////////////////////////////////////////////

    pub fn set_mmio_handler(&mut self, handler: impl MMIOHandler + 'static) {
        let addrs = handler.default_addrs().to_vec();
        let handler = Arc::new(Mutex::new(handler));
        for addr in addrs {
            self.register_handler(handler.clone(), addr);
        }
    }

    fn register_handler(&mut self, handler: Arc<Mutex<dyn MMIOHandler>>, addr: u16) {
        assert!(addr >= MMIO_START, "MMIOHandler addr {addr:#06x} below device space");
        let prev = self.mmio_handlers.insert(addr, handler);
        assert!(prev.is_none(), "Duplicate MMIOHandler for {addr:#06x}");
    }

    pub fn mem_read_word(&mut self, addr: u16) -> Result<u16, EmuError> {
        if let Some(handler) = self.mmio_handlers.get(&addr) {
            let mut handler = handler.lock().unwrap_or_else(PoisonError::into_inner);
            return Ok(handler.read_word(&mut self.state, addr)?);
        }
        Ok(self.state.mem_read_word(addr))
    }

    pub fn mem_write_word(&mut self, addr: u16, val: u16) {
        if let Some(handler) = self.mmio_handlers.get(&addr) {
            let mut handler = handler.lock().unwrap_or_else(PoisonError::into_inner);
            handler.write_word(&mut self.state, addr, val);
        } else {
            self.state.mem_write_word(addr, val);
        }
    }

    pub fn get_state(&self) -> &EmulatorState {
        &self.state
    }

    pub fn get_state_mut(&mut self) -> &mut EmulatorState {
        &mut self.state
    }

    delegate! {
        to self.state {
            pub fn reg_read_word(&self, reg: Reg) -> u16;
            pub fn reg_write_word(&mut self, reg: Reg, val: u16);
            pub fn pc(&self) -> u16;
            pub fn cond(&self) -> Cond;
        }
    }

    // Writes a general purpose register and sets the condition code from it.
    pub(crate) fn write_result(&mut self, dst: Reg, val: u16) {
        self.state.reg_write_word(dst, val);
        self.state.update_flags(dst);
    }

    fn pc_relative(&self, offset: u16) -> u16 {
        self.state.pc().wrapping_add(offset)
    }

    fn base_relative(&self, base: Reg, offset: u16) -> u16 {
        self.state.reg_read_word(base).wrapping_add(offset)
    }

    ///////////////////////////////////////////////////////////////////////////
    // Execute
    ///////////////////////////////////////////////////////////////////////////

    fn alu_operand(&self, src2: AluSrc) -> u16 {
        match src2 {
            AluSrc::Reg(reg) => self.state.reg_read_word(reg),
            AluSrc::Imm(imm) => imm,
        }
    }

    fn exec_alu_ins(&mut self, dst: Reg, src1: Reg, src2: AluSrc, op: fn(u16, u16) -> u16) {
        let lhs = self.state.reg_read_word(src1);
        let rhs = self.alu_operand(src2);
        self.write_result(dst, op(lhs, rhs));
    }

    fn exec_branch_ins(&mut self, cond: BrCond, offset: u16) {
        if cond.0 & self.state.cond().bits() != 0 {
            let target = self.pc_relative(offset);
            self.state.set_pc(target);
        }
    }

    fn exec_jsr_ins(&mut self, target: JsrTarget) {
        // R7 is written first, so JSRR R7 continues at the next instruction.
        let ret = self.state.pc();
        self.state.reg_write_word(Reg::LINK, ret);
        let dest = match target {
            JsrTarget::Offset(offset) => self.pc_relative(offset),
            JsrTarget::Reg(base) => self.state.reg_read_word(base),
        };
        debug!("Call to {dest:#06x}, returning to {ret:#06x}");
        self.state.set_pc(dest);
    }

    fn exec(&mut self, ins: &Ins) -> Result<ExecRet, EmuError> {
        match *ins {
            Ins::Add{dst, src1, src2} => self.exec_alu_ins(dst, src1, src2, u16::wrapping_add),
            Ins::And{dst, src1, src2} => self.exec_alu_ins(dst, src1, src2, |a, b| a & b),
            Ins::Not{dst, src} => {
                let val = !self.state.reg_read_word(src);
                self.write_result(dst, val);
            },
            Ins::Br{cond, offset} => self.exec_branch_ins(cond, offset),
            Ins::Jmp{base} => {
                let dest = self.state.reg_read_word(base);
                self.state.set_pc(dest);
            },
            Ins::Jsr{target} => self.exec_jsr_ins(target),
            Ins::Ld{dst, offset} => {
                let val = self.mem_read_word(self.pc_relative(offset))?;
                self.write_result(dst, val);
            },
            Ins::Ldi{dst, offset} => {
                let addr = self.mem_read_word(self.pc_relative(offset))?;
                let val = self.mem_read_word(addr)?;
                self.write_result(dst, val);
            },
            Ins::Ldr{dst, base, offset} => {
                let val = self.mem_read_word(self.base_relative(base, offset))?;
                self.write_result(dst, val);
            },
            Ins::Lea{dst, offset} => {
                let addr = self.pc_relative(offset);
                self.write_result(dst, addr);
            },
            Ins::St{src, offset} => {
                let val = self.state.reg_read_word(src);
                self.mem_write_word(self.pc_relative(offset), val);
            },
            Ins::Sti{src, offset} => {
                let addr = self.mem_read_word(self.pc_relative(offset))?;
                let val = self.state.reg_read_word(src);
                self.mem_write_word(addr, val);
            },
            Ins::Str{src, base, offset} => {
                let val = self.state.reg_read_word(src);
                self.mem_write_word(self.base_relative(base, offset), val);
            },
            Ins::Trap{vector} => return self.exec_trap_ins(vector),
            Ins::Rti | Ins::Res => {
                return Err(EmuError::IllegalOpcode{
                    opcode: ins.opcode(),
                    pc: self.state.pc().wrapping_sub(1),
                });
            },
        }

        Ok(ExecRet::Ok)
    }
}
