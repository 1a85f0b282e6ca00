/*!
 * Userprog Kernel Library
 *
 * The user/kernel trust boundary of a small teaching kernel, hosted on std
 * threads:
 * - User-pointer validation over simulated page tables
 * - Syscall decoding and dispatch
 * - Per-process file descriptor tables
 * - The exec/wait/exit lifecycle and its process records
 */

pub mod core;
pub mod demos;
pub mod devices;
pub mod kernel;
pub mod memory;
pub mod monitoring;
pub mod process;
pub mod syscalls;
pub mod vfs;

// Re-exports
pub use crate::core::{KernelConfig, KernelError, KernelResult, Pid, StatusCode};
pub use demos::{demo_registry, register_demos};
pub use devices::{BufferedConsole, Console, PowerControl, SimulatedPower, StdConsole};
pub use kernel::{Kernel, KernelBuilder};
pub use memory::{BadPointer, UserMemory, UserRange};
pub use monitoring::init_tracing;
pub use process::{
    ExitStatus, Fd, ProgramLoader, ProgramRegistry, ProgramResult, Trap, UserContext, UserProgram,
};
pub use syscalls::{Syscall, SyscallNumber, TrapFrame, Violation};
pub use vfs::{FileSystem, MemFS, OpenFile, VfsError};
