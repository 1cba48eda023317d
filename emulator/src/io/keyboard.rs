use std::io;
use std::sync::Arc;
use std::time::Duration;

use common::constants::{KBDR, KBSR};

use crate::EmulatorState;
use crate::io::MMIOHandler;
use crate::io::console::Console;

use log::{error, trace};

/// Keyboard status and data registers, backed by a console.
pub struct Keyboard {
    device: Arc<dyn Console>,
    poll_timeout: Duration,
    last: u8,
}

impl Keyboard {
    pub const KBSR: u16 = KBSR;
    pub const KBDR: u16 = KBDR;

    const READY_SHIFT: u16 = 15;
    pub const READY_MASK: u16 = 0x1 << Self::READY_SHIFT;

    pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(1);

    pub fn new(device: Arc<dyn Console>) -> Self {
        Self::with_timeout(device, Self::DEFAULT_POLL_TIMEOUT)
    }

    pub fn with_timeout(device: Arc<dyn Console>, poll_timeout: Duration) -> Self {
        Keyboard{device, poll_timeout, last: 0}
    }

    fn kbsr_read(&mut self) -> io::Result<u16> {
        let ready = self.device.poll_key(self.poll_timeout)?;
        Ok((ready as u16) << Self::READY_SHIFT)
    }

    fn kbdr_read(&mut self) -> u16 {
        match self.device.take_key() {
            Some(ch) => {
                trace!("Keyboard: returned {ch:#04x}");
                self.last = ch;
            },
            None => error!("Keyboard: read of KBDR when no character is available"),
        }
        self.last as u16
    }
}

impl MMIOHandler for Keyboard {
    fn read_word(&mut self, _: &mut EmulatorState, addr: u16) -> io::Result<u16> {
        match addr {
            Self::KBSR => self.kbsr_read(),
            Self::KBDR => Ok(self.kbdr_read()),
            _ => panic!("Keyboard doesn't handle address {addr:#06x}"),
        }
    }

    fn default_addrs(&self) -> &[u16] {
        &[Self::KBSR, Self::KBDR]
    }
}
