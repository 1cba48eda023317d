use std::collections::VecDeque;
use std::io::{self, stdout, Write};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use log::{debug, trace};

/// The emulator's view of the host terminal: keyboard in, characters out.
pub trait Console: Send + Sync {
    // Wait up to timeout for a key. A key found stays pending until taken.
    fn poll_key(&self, timeout: Duration) -> io::Result<bool>;

    // Pending key, if any, without waiting.
    fn take_key(&self) -> Option<u8>;

    // Blocks until a key arrives. None when no more input will ever come.
    fn read_key(&self) -> io::Result<Option<u8>>;

    fn write_bytes(&self, bytes: &[u8]) -> io::Result<()>;
    fn flush(&self) -> io::Result<()>;

    fn interrupted(&self) -> bool;

    // Looks for input without waiting, so an interrupt is seen even while
    // the program isn't reading the keyboard.
    fn check_interrupt(&self) -> io::Result<bool> {
        Ok(self.interrupted())
    }

    fn enter_raw(&self) -> io::Result<()> {
        Ok(())
    }

    fn restore(&self) -> io::Result<()> {
        Ok(())
    }
}

// Typed as a key, Ctrl-C asks the emulator to stop.
pub const CTRL_C: u8 = 0x03;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

////////////////////////////////////////////////////////////////////////////////

#[derive(Default)]
pub struct TermConsole {
    keys: Mutex<VecDeque<u8>>,
    interrupted: AtomicBool,
    raw: AtomicBool,
}

impl TermConsole {
    // How long read_key() waits between checks for an interrupt.
    const READ_SLICE: Duration = Duration::from_millis(100);

    pub fn new() -> Self {
        Default::default()
    }

    fn translate(key: KeyEvent) -> Option<u8> {
        if key.kind != KeyEventKind::Press {
            return None;
        }

        match key.code {
            KeyCode::Char(c) if c.is_ascii() => {
                let c = c as u8;
                Some(if key.modifiers.contains(KeyModifiers::CONTROL) { c & 0x1f } else { c })
            },
            KeyCode::Enter => Some(b'\n'),
            KeyCode::Backspace => Some(0x08),
            KeyCode::Tab => Some(b'\t'),
            KeyCode::Esc => Some(0x1b),
            _ => None,
        }
    }

    fn accept(&self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };
        match Self::translate(key) {
            Some(CTRL_C) => {
                debug!("Console: interrupt");
                self.interrupted.store(true, Ordering::SeqCst);
            },
            Some(ch) => {
                trace!("Console: key {ch:#04x}");
                lock(&self.keys).push_back(ch);
            },
            None => (),
        }
    }

    // Queues every event the terminal has ready. Only the first wait may
    // take up to timeout.
    fn pump(&self, timeout: Duration) -> io::Result<()> {
        let mut timeout = timeout;
        while !self.interrupted() && event::poll(timeout)? {
            self.accept(event::read()?);
            timeout = Duration::ZERO;
        }
        Ok(())
    }
}

impl Console for TermConsole {
    fn poll_key(&self, timeout: Duration) -> io::Result<bool> {
        if lock(&self.keys).is_empty() {
            self.pump(timeout)?;
        }
        Ok(!lock(&self.keys).is_empty())
    }

    fn take_key(&self) -> Option<u8> {
        lock(&self.keys).pop_front()
    }

    fn read_key(&self) -> io::Result<Option<u8>> {
        loop {
            if let Some(ch) = self.take_key() {
                return Ok(Some(ch));
            }
            if self.interrupted() {
                return Ok(None);
            }
            self.pump(Self::READ_SLICE)?;
        }
    }

    fn write_bytes(&self, bytes: &[u8]) -> io::Result<()> {
        let mut out = stdout().lock();
        if !self.raw.load(Ordering::SeqCst) {
            return out.write_all(bytes);
        }

        // Raw mode doesn't return the carriage on a newline.
        for line in bytes.split_inclusive(|b| *b == b'\n') {
            match line.split_last() {
                Some((b'\n', rest)) => {
                    out.write_all(rest)?;
                    out.write_all(b"\r\n")?;
                },
                _ => out.write_all(line)?,
            }
        }
        Ok(())
    }

    fn flush(&self) -> io::Result<()> {
        stdout().lock().flush()
    }

    fn interrupted(&self) -> bool {
        self.interrupted.load(Ordering::SeqCst)
    }

    fn check_interrupt(&self) -> io::Result<bool> {
        self.pump(Duration::ZERO)?;
        Ok(self.interrupted())
    }

    fn enter_raw(&self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        self.raw.store(true, Ordering::SeqCst);
        Ok(())
    }

    fn restore(&self) -> io::Result<()> {
        if self.raw.swap(false, Ordering::SeqCst) {
            terminal::disable_raw_mode()?;
        }
        Ok(())
    }
}

////////////////////////////////////////////////////////////////////////////////

// In-memory console for driving the emulator without a terminal. A CTRL_C
// in the input acts like the key typed at a terminal.
#[derive(Default)]
pub struct PipeConsole {
    in_buf: Mutex<VecDeque<u8>>,
    out_buf: Mutex<VecDeque<u8>>,
    pending: Mutex<Option<u8>>,
    interrupted: AtomicBool,
    restores: AtomicUsize,
}

impl PipeConsole {
    pub fn take_output(&self) -> VecDeque<u8> {
        std::mem::take(&mut lock(&self.out_buf))
    }

    pub fn output_string(&self) -> String {
        let out: Vec<u8> = self.take_output().into();
        String::from_utf8_lossy(&out).into_owned()
    }

    pub fn push_input(&self, val: u8) {
        lock(&self.in_buf).push_back(val);
    }

    pub fn write_input(&self, vals: &[u8]) {
        for val in vals.iter() {
            self.push_input(*val);
        }
    }

    pub fn interrupt(&self) {
        self.interrupted.store(true, Ordering::SeqCst);
    }

    pub fn restore_count(&self) -> usize {
        self.restores.load(Ordering::SeqCst)
    }
}

impl Console for PipeConsole {
    fn poll_key(&self, _timeout: Duration) -> io::Result<bool> {
        let mut pending = lock(&self.pending);
        if pending.is_none() {
            match lock(&self.in_buf).pop_front() {
                Some(CTRL_C) => self.interrupt(),
                ch => *pending = ch,
            }
        }
        Ok(pending.is_some())
    }

    fn take_key(&self) -> Option<u8> {
        lock(&self.pending).take()
    }

    fn read_key(&self) -> io::Result<Option<u8>> {
        if self.interrupted() {
            return Ok(None);
        }
        self.poll_key(Duration::ZERO)?;
        Ok(self.take_key())
    }

    fn write_bytes(&self, bytes: &[u8]) -> io::Result<()> {
        lock(&self.out_buf).extend(bytes);
        Ok(())
    }

    fn flush(&self) -> io::Result<()> {
        Ok(())
    }

    fn interrupted(&self) -> bool {
        self.interrupted.load(Ordering::SeqCst)
    }

    fn check_interrupt(&self) -> io::Result<bool> {
        let mut in_buf = lock(&self.in_buf);
        if let Some(i) = in_buf.iter().position(|&ch| ch == CTRL_C) {
            in_buf.remove(i);
            self.interrupt();
        }
        Ok(self.interrupted())
    }

    fn restore(&self) -> io::Result<()> {
        self.restores.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
