use std::cell::Cell;
use std::fmt;

use thiserror::Error;

/// Direction of a memory-bus access, for error reporting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessKind {
    Read,
    Write,
}

impl fmt::Display for AccessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessKind::Read => write!(f, "read"),
            AccessKind::Write => write!(f, "write"),
        }
    }
}

#[derive(Debug, Error)]
pub enum EmuError {
    #[error("{kind} at unmapped address ${address:04x}")]
    InvalidMemoryAccess { kind: AccessKind, address: u16 },

    #[error("invalid opcode ${op_code:02x} on page {page}")]
    InvalidOpcode { page: u8, op_code: u8 },

    #[error("assertion violated: {0}")]
    AssertViolation(String),

    #[error("invalid command: {0}")]
    BadCommand(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("instruction hash mismatch")]
    SyncMismatch,
}

pub type EmuResult<T> = Result<T, EmuError>;

/// What to do with recoverable faults (bad register values, unmapped
/// accesses): silence them, log and continue, or abort the run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorPolicy {
    Ignore,
    Log,
    Fail,
}

/// Shared fault handler. One instance is created per machine and handed to
/// every device that can raise a recoverable fault; the debugger's
/// `option errors` command flips the policy at runtime.
pub struct ErrorHandler {
    policy: Cell<ErrorPolicy>,
}

impl ErrorHandler {
    pub fn new() -> Self {
        Self {
            policy: Cell::new(ErrorPolicy::Log),
        }
    }

    pub fn policy(&self) -> ErrorPolicy {
        self.policy.get()
    }

    pub fn set_policy(&self, policy: ErrorPolicy) {
        self.policy.set(policy);
    }

    /// Route a recoverable fault through the current policy. `Ignore` and
    /// `Log` swallow the error so emulation continues; `Fail` propagates it.
    pub fn report(&self, error: EmuError) -> EmuResult<()> {
        match self.policy.get() {
            ErrorPolicy::Ignore => Ok(()),
            ErrorPolicy::Log => {
                log::error!("{error}");
                Ok(())
            }
            ErrorPolicy::Fail => Err(error),
        }
    }
}

impl Default for ErrorHandler {
    fn default() -> Self {
        Self::new()
    }
}
