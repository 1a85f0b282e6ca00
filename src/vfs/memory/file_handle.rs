/*!
 * File Handle Implementation
 * In-memory file handle for read/write operations
 */

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use super::super::traits::OpenFile;
use super::super::types::*;
use super::Inode;

/// In-memory file handle
pub(super) struct MemFile {
    inode: Inode,
    pos: u32,
    open_handles: Arc<AtomicUsize>,
}

impl MemFile {
    pub(super) fn new(inode: Inode, open_handles: Arc<AtomicUsize>) -> Self {
        open_handles.fetch_add(1, Ordering::SeqCst);
        Self {
            inode,
            pos: 0,
            open_handles,
        }
    }
}

impl OpenFile for MemFile {
    fn read(&mut self, buf: &mut [u8]) -> VfsResult<usize> {
        let data = self.inode.read();
        let start = (self.pos as usize).min(data.len());
        let count = buf.len().min(data.len() - start);
        buf[..count].copy_from_slice(&data[start..start + count]);
        self.pos += count as u32;
        Ok(count)
    }

    fn write(&mut self, bytes: &[u8]) -> VfsResult<usize> {
        let mut data = self.inode.write();
        let start = (self.pos as usize).min(data.len());
        let count = bytes.len().min(data.len() - start);
        data[start..start + count].copy_from_slice(&bytes[..count]);
        self.pos += count as u32;
        Ok(count)
    }

    fn seek(&mut self, pos: u32) {
        self.pos = pos;
    }

    fn tell(&self) -> u32 {
        self.pos
    }

    fn length(&self) -> u32 {
        self.inode.read().len() as u32
    }
}

impl Drop for MemFile {
    fn drop(&mut self) {
        self.open_handles.fetch_sub(1, Ordering::SeqCst);
    }
}
