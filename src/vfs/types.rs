/*!
 * VFS Types
 * Shared types for filesystem operations
 */

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// VFS operation result
pub type VfsResult<T> = Result<T, VfsError>;

/// Longest file name the filesystem accepts
pub const NAME_MAX: usize = 14;

/// VFS errors
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum VfsError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Invalid name: {0:?}")]
    InvalidName(String),

    #[error("Out of space")]
    OutOfSpace,

    #[error("File too large")]
    FileTooLarge,
}

/// Validate a flat file name
pub fn check_name(name: &str) -> VfsResult<()> {
    if name.is_empty() || name.len() > NAME_MAX || name.contains('/') {
        return Err(VfsError::InvalidName(name.to_string()));
    }
    Ok(())
}
