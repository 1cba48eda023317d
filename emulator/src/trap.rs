use common::asm::{Reg, TrapCode};
use common::constants::MEM_WORDS;

use crate::emulator::{Emulator, ExecRet};
use crate::error::EmuError;

use log::debug;
use num_traits::FromPrimitive;

const IN_PROMPT: &[u8] = b"Enter a character: ";
const HALT_MESSAGE: &[u8] = b"HALT\n";

// Service routines, run in place of an OS trap table.
impl Emulator {
    pub(crate) fn exec_trap_ins(&mut self, vector: u8) -> Result<ExecRet, EmuError> {
        let ret = self.pc();
        self.reg_write_word(Reg::LINK, ret);

        let Some(code) = TrapCode::from_u8(vector) else {
            return Err(EmuError::UnknownTrap{vector, pc: ret.wrapping_sub(1)});
        };
        debug!("Trap {code}");

        match code {
            TrapCode::Getc => {
                let ch = self.trap_read_char()?;
                self.write_result(Reg::R0, ch as u16);
            },
            TrapCode::Out => {
                let ch = self.reg_read_word(Reg::R0) as u8;
                self.console.write_bytes(&[ch])?;
            },
            TrapCode::Puts => {
                let bytes = self.string_at(self.reg_read_word(Reg::R0), false);
                self.console.write_bytes(&bytes)?;
            },
            TrapCode::In => {
                self.console.write_bytes(IN_PROMPT)?;
                self.console.flush()?;
                let ch = self.trap_read_char()?;
                self.console.write_bytes(&[ch])?;
                self.write_result(Reg::R0, ch as u16);
            },
            TrapCode::Putsp => {
                let bytes = self.string_at(self.reg_read_word(Reg::R0), true);
                self.console.write_bytes(&bytes)?;
            },
            TrapCode::Halt => {
                self.console.write_bytes(HALT_MESSAGE)?;
                self.console.flush()?;
                return Ok(ExecRet::Halt);
            },
        }

        self.console.flush()?;
        Ok(ExecRet::Ok)
    }

    fn trap_read_char(&mut self) -> Result<u8, EmuError> {
        match self.console.read_key()? {
            Some(ch) => Ok(ch),
            None if self.console.interrupted() => Err(EmuError::Interrupted),
            None => Err(EmuError::EndOfInput),
        }
    }

    // Collects a NUL terminated string from plain storage. Unpacked strings
    // hold one character per word; packed ones hold two, low byte first.
    // Gives up after one pass over memory.
    fn string_at(&self, mut addr: u16, packed: bool) -> Vec<u8> {
        let mut out = vec![];
        for _ in 0..MEM_WORDS {
            let word = self.get_state().mem_read_word(addr);
            let [low, high] = word.to_le_bytes();
            if packed {
                if low == 0 {
                    break;
                }
                out.push(low);
                if high == 0 {
                    break;
                }
                out.push(high);
            } else {
                if word == 0 {
                    break;
                }
                out.push(low);
            }
            addr = addr.wrapping_add(1);
        }
        out
    }
}
