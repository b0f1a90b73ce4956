//! Console plumbing: ANSI colors, prompt reads, and a scoped SIGINT handler
//! used to break into the debugger or abort a long trace dump.

use std::io::{self, BufRead, Write};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConsoleColor {
    Gray,
    White,
    LightYellow,
    LightAqua,
    LightGreen,
    LightPurple,
    LightRed,
}

impl ConsoleColor {
    pub fn ansi(self) -> &'static str {
        match self {
            ConsoleColor::Gray => "\x1b[90m",
            ConsoleColor::White => "\x1b[97m",
            ConsoleColor::LightYellow => "\x1b[93m",
            ConsoleColor::LightAqua => "\x1b[96m",
            ConsoleColor::LightGreen => "\x1b[92m",
            ConsoleColor::LightPurple => "\x1b[95m",
            ConsoleColor::LightRed => "\x1b[91m",
        }
    }
}

pub const ANSI_RESET: &str = "\x1b[0m";

/// Blocking prompt read from stdin. Returns `None` on EOF.
pub fn read_line(prompt: &str) -> Option<String> {
    print!("{prompt}");
    io::stdout().flush().ok();
    let mut line = String::new();
    match io::stdin().lock().read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
    }
}

#[cfg(unix)]
mod ctrl_c {
    use std::sync::atomic::{AtomicBool, Ordering};

    static CTRL_C_PRESSED: AtomicBool = AtomicBool::new(false);

    extern "C" fn handler(_signal: libc::c_int) {
        CTRL_C_PRESSED.store(true, Ordering::SeqCst);
    }

    /// Installs a SIGINT handler for its lifetime and restores the previous
    /// disposition on drop. The default disposition would kill the process;
    /// while one of these is live, Ctrl+C only raises a flag that the owner
    /// polls with `take`.
    pub struct ScopedConsoleCtrlHandler {
        previous: libc::sighandler_t,
    }

    impl ScopedConsoleCtrlHandler {
        pub fn new() -> Self {
            CTRL_C_PRESSED.store(false, Ordering::SeqCst);
            let handler = handler as extern "C" fn(libc::c_int);
            let previous = unsafe { libc::signal(libc::SIGINT, handler as libc::sighandler_t) };
            Self { previous }
        }

        /// Consumes a pending Ctrl+C, if any.
        pub fn take(&self) -> bool {
            CTRL_C_PRESSED.swap(false, Ordering::SeqCst)
        }
    }

    impl Default for ScopedConsoleCtrlHandler {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Drop for ScopedConsoleCtrlHandler {
        fn drop(&mut self) {
            unsafe {
                libc::signal(libc::SIGINT, self.previous);
            }
        }
    }
}

#[cfg(not(unix))]
mod ctrl_c {
    /// No signal interception on this platform; `take` never fires.
    pub struct ScopedConsoleCtrlHandler;

    impl ScopedConsoleCtrlHandler {
        pub fn new() -> Self {
            Self
        }

        pub fn take(&self) -> bool {
            false
        }
    }

    impl Default for ScopedConsoleCtrlHandler {
        fn default() -> Self {
            Self::new()
        }
    }
}

pub use ctrl_c::ScopedConsoleCtrlHandler;
