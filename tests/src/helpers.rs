use common::constants::PC_START;
use emu_lib::Emulator;
use emu_lib::io::console::PipeConsole;

use std::sync::Arc;

pub const HALT: u16 = 0xf025;

pub fn emulator(bin: &[u16]) -> (Emulator, Arc<PipeConsole>) {
    let console = Arc::new(PipeConsole::default());
    let mut emu = Emulator::new(console.clone());
    emu.load_words(PC_START, bin);
    (emu, console)
}

// Assumes the last word executed is a halt.
pub fn run(bin: &[u16]) -> Emulator {
    run_with_input(bin, b"").0
}

pub fn run_with_input(bin: &[u16], input: &[u8]) -> (Emulator, Arc<PipeConsole>) {
    let (mut emu, console) = emulator(bin);
    console.write_input(input);
    emu.run().unwrap();
    (emu, console)
}
