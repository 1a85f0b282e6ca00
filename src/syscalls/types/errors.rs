/*!
 * Syscall Error Types
 * Boundary violations detected while decoding a trap
 */

use thiserror::Error;

use crate::core::types::RawFd;
use crate::memory::BadPointer;

/// A request that crosses the trust boundary illegally
///
/// Always fatal to the calling process, never to the kernel.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Violation {
    /// Stack word or argument pointer failed validation
    #[error(transparent)]
    BadPointer(#[from] BadPointer),

    /// Syscall number outside the fixed enumeration
    #[error("unknown syscall number {0}")]
    UnknownSyscall(u32),

    /// Descriptor outside the table
    #[error("descriptor {0} out of range")]
    BadFd(RawFd),
}
