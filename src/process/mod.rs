/*!
 * Process Module
 * Process records, descriptor tables and the exec/wait/exit lifecycle
 */

pub mod context;
pub mod fd_table;
mod lifecycle;
pub mod loader;
pub mod record;
pub mod registry;
pub mod table;
pub mod task;
pub mod types;

// Re-export for convenience
pub use context::{ProgramResult, Trap, UserContext};
pub use fd_table::{Fd, FdTable};
pub use loader::{ProgramLoader, ProgramRegistry, UserProgram};
pub use record::ProcessRecord;
pub use registry::ChildRegistry;
pub use table::ProcessTable;
pub use task::Process;
pub use types::{ExitStatus, Holder, LoadError};
