use emu_lib::Emulator;
use emu_lib::io::console::{Console, TermConsole};
use emu_lib::session::{ConsoleGuard, EXIT_FAILURE, finish_run};

use std::path::PathBuf;
use std::process::exit;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use log::error;


/// LC-3 Emulator
#[derive(Parser)]
struct Args {
    /// Images to load, in order. Later images may overwrite earlier ones.
    #[arg(required = true)]
    images: Vec<PathBuf>,

    /// How long a keyboard status read waits for a key, in milliseconds.
    #[arg(long, default_value_t = 1000)]
    poll_timeout_ms: u64,
}



fn main() {
    env_logger::init();

    let opt = Args::parse();

    let console: Arc<dyn Console> = Arc::new(TermConsole::new());
    let mut emu = Emulator::with_poll_timeout(
        console.clone(),
        Duration::from_millis(opt.poll_timeout_ms),
    );

    for path in &opt.images {
        if let Err(e) = emu.load_image_file(path) {
            error!("{e}");
            exit(EXIT_FAILURE);
        }
    }

    let guard = match ConsoleGuard::new(console) {
        Ok(guard) => guard,
        Err(e) => {
            error!("Unable to set up console: {e}");
            exit(EXIT_FAILURE);
        },
    };

    let result = emu.run();
    exit(finish_run(guard, result));
}
