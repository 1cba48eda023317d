pub mod console;
pub mod keyboard;

use std::io;

use crate::EmulatorState;

/// A device that owns one or more addresses. Reads of those addresses always
/// go through the handler.
pub trait MMIOHandler: Send {
    fn default_addrs(&self) -> &[u16] {
        &[]
    }

    fn read_word(&mut self, emu: &mut EmulatorState, addr: u16) -> io::Result<u16>;

    // Devices without write side effects leave the value in plain storage.
    fn write_word(&mut self, emu: &mut EmulatorState, addr: u16, val: u16) {
        emu.mem_write_word(addr, val);
    }
}
