//! Lifecycle events sent from per-instance tasks to the supervisor loop.

use std::fmt;
use std::process::ExitStatus;

use forewoman_core::InstanceName;

/// Exit code reported when a child could not be started at all.
pub const SPAWN_FAILURE_CODE: i32 = 127;

/// Which pipe a chunk came from. Both render identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Stdout,
    Stderr,
}

/// How an instance ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceExit {
    /// Exited normally with this code.
    Code(i32),
    /// Terminated by this signal (unix).
    Signal(i32),
    /// Never started.
    SpawnFailed,
    /// Waiting on the child failed; status is unknown.
    Unknown,
}

impl InstanceExit {
    pub fn from_status(status: ExitStatus) -> Self {
        if let Some(code) = status.code() {
            return Self::Code(code);
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = status.signal() {
                return Self::Signal(signal);
            }
        }
        Self::Unknown
    }

    /// Numeric code as printed on the console. Signals follow the shell
    /// convention of `128 + signal`.
    pub fn code(&self) -> i32 {
        match self {
            Self::Code(code) => *code,
            Self::Signal(signal) => 128 + signal,
            Self::SpawnFailed => SPAWN_FAILURE_CODE,
            Self::Unknown => -1,
        }
    }

    pub fn success(&self) -> bool {
        matches!(self, Self::Code(0))
    }
}

impl fmt::Display for InstanceExit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.code().fmt(f)
    }
}

#[derive(Debug)]
pub enum Event {
    /// A raw chunk read from the child's stdout or stderr.
    Output {
        instance: InstanceName,
        stream: Stream,
        chunk: Vec<u8>,
    },
    /// The child is gone and both pipes are drained.
    Exited {
        instance: InstanceName,
        exit: InstanceExit,
    },
}
