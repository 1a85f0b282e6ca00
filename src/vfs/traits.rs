/*!
 * VFS Traits
 * Filesystem collaborator consumed by descriptor tables
 */

use super::types::VfsResult;

/// Flat filesystem collaborator
///
/// Implementations must be shareable across process threads. Open handles
/// keep file contents alive after `remove`.
pub trait FileSystem: Send + Sync {
    /// Create a zero-filled file of `initial_size` bytes
    fn create(&self, name: &str, initial_size: u32) -> VfsResult<()>;

    /// Remove a file by name
    fn remove(&self, name: &str) -> VfsResult<()>;

    /// Open a file by name
    fn open(&self, name: &str) -> VfsResult<Box<dyn OpenFile>>;

    /// Get filesystem name/type
    fn name(&self) -> &str;
}

/// Open file handle
///
/// Owns its offset. Dropping the handle closes it.
pub trait OpenFile: Send {
    /// Read from the current offset, returning bytes read (0 at EOF)
    fn read(&mut self, buf: &mut [u8]) -> VfsResult<usize>;

    /// Write at the current offset, returning bytes written
    ///
    /// Files do not grow; writes stop at the current length.
    fn write(&mut self, data: &[u8]) -> VfsResult<usize>;

    /// Move the offset; positions past EOF are allowed
    fn seek(&mut self, pos: u32);

    /// Current offset
    fn tell(&self) -> u32;

    /// File length in bytes
    fn length(&self) -> u32;
}
