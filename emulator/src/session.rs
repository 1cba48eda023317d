use std::sync::Arc;

use crate::error::EmuError;
use crate::io::console::Console;

use log::{error, info};

pub const EXIT_OK: i32 = 0;
pub const EXIT_FAILURE: i32 = 1;
pub const EXIT_INTERRUPTED: i32 = -2;

/// Holds the console in raw mode for the length of a run and puts it back
/// exactly once, whichever way the run ends.
pub struct ConsoleGuard {
    console: Arc<dyn Console>,
    active: bool,
}

impl ConsoleGuard {
    pub fn new(console: Arc<dyn Console>) -> std::io::Result<Self> {
        console.enter_raw()?;
        Ok(ConsoleGuard{console, active: true})
    }

    pub fn console(&self) -> &Arc<dyn Console> {
        &self.console
    }

    pub fn restore(&mut self) {
        if !self.active {
            return;
        }
        self.active = false;
        if let Err(e) = self.console.restore() {
            error!("Unable to restore console: {e}");
        }
    }
}

impl Drop for ConsoleGuard {
    fn drop(&mut self) {
        self.restore();
    }
}

// Tears down after a run and picks the process exit status.
pub fn finish_run(mut guard: ConsoleGuard, result: Result<(), EmuError>) -> i32 {
    guard.restore();
    match result {
        Ok(()) => {
            info!("Halted");
            EXIT_OK
        },
        Err(EmuError::Interrupted) => {
            // The interrupted program's cursor is wherever it left it.
            if let Err(e) = guard.console().write_bytes(b"\n").and_then(|_| guard.console().flush()) {
                error!("Unable to write to console: {e}");
            }
            info!("Interrupted");
            EXIT_INTERRUPTED
        },
        Err(e) => {
            error!("{e}");
            EXIT_FAILURE
        },
    }
}
