/*!
 * Error Types
 * Centralized error handling with thiserror and miette
 */

use miette::Diagnostic;
use thiserror::Error;

use super::types::Pid;

// Re-export domain errors so callers can match on them from one place
pub use crate::memory::BadPointer;
pub use crate::process::LoadError;
pub use crate::syscalls::Violation;
pub use crate::vfs::VfsError;

/// Unified kernel error type with miette diagnostics
#[derive(Error, Debug, Diagnostic)]
pub enum KernelError {
    #[error("Failed to load initial task: {0}")]
    #[diagnostic(
        code(kernel::load_failed),
        help("Check that the program name is registered with the loader.")
    )]
    LoadFailed(String),

    #[error("Empty command line")]
    #[diagnostic(code(kernel::empty_command), help("Pass a program name to run."))]
    EmptyCommand,

    #[error("Machine powered off while waiting for process {0}")]
    #[diagnostic(
        code(kernel::powered_off),
        help("A process invoked halt before the task finished.")
    )]
    PoweredOff(Pid),

    #[error("Machine is powered off")]
    #[diagnostic(
        code(kernel::halted),
        help("No task can start after halt; build a new kernel.")
    )]
    Halted,

    #[error("Invalid configuration: {0}")]
    #[diagnostic(code(kernel::config))]
    Config(String),

    #[error("Filesystem error: {0}")]
    #[diagnostic(code(kernel::vfs))]
    Vfs(#[from] VfsError),
}
