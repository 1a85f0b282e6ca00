/*!
 * Syscall Types
 * Numbers, frames, decoded requests and boundary errors
 */

pub mod errors;
pub mod frame;
pub mod numbers;
pub mod syscall;

pub use errors::Violation;
pub use frame::TrapFrame;
pub use numbers::SyscallNumber;
pub use syscall::Syscall;
