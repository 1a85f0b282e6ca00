/*!
 * Virtual File System Module
 * Filesystem collaborator behind the descriptor tables
 */

pub mod memory;
pub mod traits;
pub mod types;

// Re-exports
pub use memory::MemFS;
pub use traits::{FileSystem, OpenFile};
pub use types::{check_name, VfsError, VfsResult, NAME_MAX};
