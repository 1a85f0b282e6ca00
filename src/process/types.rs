/*!
 * Process Types
 * Common types for process lifecycle management
 */

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::limits::EXIT_FAILURE;
use crate::core::types::StatusCode;

/// Exit status of a process record
///
/// `Running` is the only non-terminal state; a record moves out of it at
/// most once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "code")]
pub enum ExitStatus {
    /// Process has not terminated
    Running,
    /// Process called `exit` (or returned from main) with a code
    Exited(StatusCode),
    /// Process was terminated by the kernel (fault or boundary violation)
    Killed(StatusCode),
}

impl ExitStatus {
    /// Kernel-initiated termination with the standard failure status
    #[inline]
    #[must_use]
    pub const fn killed() -> Self {
        Self::Killed(EXIT_FAILURE)
    }

    #[inline]
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Running)
    }

    /// Code observed by `wait`; a running record reads as failure
    #[inline]
    #[must_use]
    pub const fn code(&self) -> StatusCode {
        match self {
            Self::Running => EXIT_FAILURE,
            Self::Exited(code) | Self::Killed(code) => *code,
        }
    }
}

/// Which side of a record's two-holder count is releasing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Holder {
    /// The process the record describes
    Owner,
    /// The parent's child-registry entry (or the task runner)
    Parent,
}

/// Program load failures, reported to `exec` as -1
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    #[error("empty command line")]
    EmptyCommand,

    #[error("{0}: no such program")]
    NotFound(String),

    #[error("{program}: load rejected: {reason}")]
    Rejected { program: String, reason: String },

    #[error("could not start process: {0}")]
    SpawnFailed(String),

    #[error("{0}: machine is powered off")]
    PoweredOff(String),
}
