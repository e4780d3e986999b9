//! Error taxonomy for the scatter-gather core.
//!
//! A plain enum with a hand-written `Display`, no `thiserror`.

use std::fmt;

/// The mode a `StripePlan` was built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Read,
    Write,
}

#[derive(Debug)]
pub enum ScatgatError {
    /// An operation was invoked against a plan in the wrong mode (read vs.
    /// write). No state is changed.
    WrongMode { expected: Mode, actual: Mode },
    /// An open/ftruncate/mmap/mremap/munmap failure that could not be
    /// locally absorbed by a single worker — surfaced from plan-level
    /// build/close calls. Per-entry failures inside a fan-out are absorbed
    /// per the local-recovery policy and do not reach this variant.
    Io(std::io::Error),
    /// A thread failed to spawn during a fan-out. Propagated to the
    /// caller rather than aborting the process.
    Spawn(std::io::Error),
    /// A buffer too short to contain a VDIF header, or a header whose
    /// `df_len` is zero.
    InvalidVdifHeader,
}

impl fmt::Display for ScatgatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScatgatError::WrongMode { expected, actual } => write!(
                f,
                "plan misuse: expected a {:?}-mode plan, got {:?}",
                expected, actual
            ),
            ScatgatError::Io(e) => write!(f, "I/O error: {e}"),
            ScatgatError::Spawn(e) => write!(f, "failed to spawn worker thread: {e}"),
            ScatgatError::InvalidVdifHeader => write!(f, "invalid VDIF header"),
        }
    }
}

impl std::error::Error for ScatgatError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScatgatError::Io(e) | ScatgatError::Spawn(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ScatgatError {
    fn from(e: std::io::Error) -> Self {
        ScatgatError::Io(e)
    }
}

pub type Result<T> = std::result::Result<T, ScatgatError>;
