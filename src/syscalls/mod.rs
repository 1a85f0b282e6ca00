/*!
 * Syscalls Module
 * Decoding and dispatch of user traps
 */

mod decode;
mod dispatcher;
mod fd;
mod fs;
mod types;

// Re-export public API
pub use decode::decode;
pub use types::{Syscall, SyscallNumber, TrapFrame, Violation};
