/*!
 * Core Types
 * Common types used across the kernel
 */

/// Process ID type
pub type Pid = u32;

/// User virtual address (32-bit user ABI)
pub type UserAddr = u32;

/// Raw descriptor value as it arrives in a syscall argument word
pub type RawFd = i32;

/// Exit status as reported by `exit` and returned by `wait`
pub type StatusCode = i32;

/// Common result type for kernel facade operations
pub type KernelResult<T> = Result<T, super::errors::KernelError>;
