pub mod emulator;
pub mod emulator_state;
pub mod error;
pub mod io;
pub mod session;
mod trap;

pub use emulator::{Emulator, ExecRet};
pub use emulator_state::{Cond, EmulatorState};
pub use error::{EmuError, LoadError};
pub use io::MMIOHandler;
