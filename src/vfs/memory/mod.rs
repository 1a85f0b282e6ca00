/*!
 * In-Memory Filesystem Backend
 * Fast, volatile filesystem for testing and the demo kernel
 */

mod file_handle;

use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::debug;

use super::traits::{FileSystem, OpenFile};
use super::types::*;
use file_handle::MemFile;

/// Shared file contents, kept alive by the directory and open handles
pub(super) type Inode = Arc<RwLock<Vec<u8>>>;

/// In-memory filesystem implementation
#[derive(Debug, Clone)]
pub struct MemFS {
    files: Arc<DashMap<String, Inode>>,
    max_size: Option<usize>,
    current_size: Arc<AtomicUsize>,
    open_handles: Arc<AtomicUsize>,
}

impl MemFS {
    /// Create new in-memory filesystem
    pub fn new() -> Self {
        Self {
            files: Arc::new(DashMap::new()),
            max_size: None,
            current_size: Arc::new(AtomicUsize::new(0)),
            open_handles: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Create with size limit
    pub fn with_capacity(max_size: usize) -> Self {
        let mut fs = Self::new();
        fs.max_size = Some(max_size);
        fs
    }

    /// Create a file with the given contents (setup helper)
    pub fn insert(&self, name: &str, data: &[u8]) -> VfsResult<()> {
        check_name(name)?;
        self.reserve(data.len())?;
        if let Some(old) = self
            .files
            .insert(name.to_string(), Arc::new(RwLock::new(data.to_vec())))
        {
            self.current_size.fetch_sub(old.read().len(), Ordering::SeqCst);
        }
        Ok(())
    }

    /// Snapshot of a file's contents
    pub fn contents(&self, name: &str) -> Option<Vec<u8>> {
        self.files.get(name).map(|inode| inode.read().clone())
    }

    /// Whether a file exists
    pub fn exists(&self, name: &str) -> bool {
        self.files.contains_key(name)
    }

    /// Number of handles currently open across all processes
    pub fn open_count(&self) -> usize {
        self.open_handles.load(Ordering::SeqCst)
    }

    /// Check if space is available and reserve it atomically
    fn reserve(&self, additional: usize) -> VfsResult<()> {
        if let Some(max) = self.max_size {
            loop {
                let current = self.current_size.load(Ordering::SeqCst);
                if current + additional > max {
                    return Err(VfsError::OutOfSpace);
                }
                if self
                    .current_size
                    .compare_exchange(
                        current,
                        current + additional,
                        Ordering::SeqCst,
                        Ordering::SeqCst,
                    )
                    .is_ok()
                {
                    return Ok(());
                }
            }
        }
        self.current_size.fetch_add(additional, Ordering::SeqCst);
        Ok(())
    }
}

impl Default for MemFS {
    fn default() -> Self {
        Self::new()
    }
}

impl FileSystem for MemFS {
    fn create(&self, name: &str, initial_size: u32) -> VfsResult<()> {
        check_name(name)?;
        if self.files.contains_key(name) {
            return Err(VfsError::AlreadyExists(name.to_string()));
        }

        self.reserve(initial_size as usize)?;
        let inode = Arc::new(RwLock::new(vec![0u8; initial_size as usize]));

        // Lost race with another creator: give the space back
        match self.files.entry(name.to_string()) {
            dashmap::mapref::entry::Entry::Occupied(_) => {
                self.current_size
                    .fetch_sub(initial_size as usize, Ordering::SeqCst);
                Err(VfsError::AlreadyExists(name.to_string()))
            }
            dashmap::mapref::entry::Entry::Vacant(slot) => {
                slot.insert(inode);
                debug!(name, initial_size, "created file");
                Ok(())
            }
        }
    }

    fn remove(&self, name: &str) -> VfsResult<()> {
        let (_, inode) = self
            .files
            .remove(name)
            .ok_or_else(|| VfsError::NotFound(name.to_string()))?;
        self.current_size
            .fetch_sub(inode.read().len(), Ordering::SeqCst);
        debug!(name, "removed file");
        Ok(())
    }

    fn open(&self, name: &str) -> VfsResult<Box<dyn OpenFile>> {
        let inode = self
            .files
            .get(name)
            .map(|entry| Arc::clone(entry.value()))
            .ok_or_else(|| VfsError::NotFound(name.to_string()))?;

        Ok(Box::new(MemFile::new(inode, Arc::clone(&self.open_handles))))
    }

    fn name(&self) -> &str {
        "memfs"
    }
}
