use std::io;
use std::path::PathBuf;

use common::asm::Opcode;
use common::image::ImageError;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum EmuError {
    #[error("illegal opcode {opcode} at {pc:#06x}")]
    IllegalOpcode { opcode: Opcode, pc: u16 },

    #[error("unknown trap vector {vector:#04x} at {pc:#06x}")]
    UnknownTrap { vector: u8, pc: u16 },

    #[error("console input exhausted")]
    EndOfInput,

    #[error("interrupted")]
    Interrupted,

    #[error("console: {0}")]
    Console(#[from] io::Error),
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unable to open {}: {source}", .path.display())]
    Open { path: PathBuf, source: io::Error },

    #[error("unable to load {}: {source}", .path.display())]
    Image { path: PathBuf, source: ImageError },
}
