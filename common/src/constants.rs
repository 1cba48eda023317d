
pub const MEM_WORDS: usize = (u16::MAX as usize) + 1;

// Where execution starts, whatever the image origin.
pub const PC_START: u16 = 0x3000;

// Memory mapped device registers
pub const MMIO_START: u16 = 0xfe00;
pub const KBSR: u16 = 0xfe00; // Keyboard status, bit 15 set when a key is ready
pub const KBDR: u16 = 0xfe02; // Keyboard data, bits 7:0
