/*!
 * File Descriptor Table
 * Per-process bounded map from small integer handles to open files
 */

use std::fmt;

use crate::core::limits::{FD_TABLE_SIZE, FIRST_DYNAMIC_FD, STDIN_FILENO, STDOUT_FILENO};
use crate::core::types::RawFd;
use crate::vfs::OpenFile;

/// Checked descriptor handle in `[0, FD_TABLE_SIZE)`
///
/// Distinct from any address type; the only way to index a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Fd(u8);

impl Fd {
    pub const STDIN: Fd = Fd(STDIN_FILENO as u8);
    pub const STDOUT: Fd = Fd(STDOUT_FILENO as u8);

    /// Check a raw argument word, `None` if out of range
    #[inline]
    pub fn new(raw: RawFd) -> Option<Self> {
        usize::try_from(raw)
            .ok()
            .filter(|&index| index < FD_TABLE_SIZE)
            .map(|index| Fd(index as u8))
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn as_raw(self) -> RawFd {
        self.0 as RawFd
    }

    /// Reserved console handle (0 or 1)
    #[inline]
    pub const fn is_console(self) -> bool {
        (self.0 as usize) < FIRST_DYNAMIC_FD
    }
}

impl fmt::Display for Fd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bounded descriptor table owned by one process
///
/// Slots 0 and 1 are reserved for the console and never hold a file.
pub struct FdTable {
    slots: Vec<Option<Box<dyn OpenFile>>>,
    open: usize,
}

impl FdTable {
    pub fn new() -> Self {
        let mut slots = Vec::with_capacity(FD_TABLE_SIZE);
        slots.resize_with(FD_TABLE_SIZE, || None);
        Self { slots, open: 0 }
    }

    /// Store `file` at the lowest free dynamic handle
    ///
    /// A full table hands the file back so the caller can release it.
    pub fn insert(&mut self, file: Box<dyn OpenFile>) -> Result<Fd, Box<dyn OpenFile>> {
        let Some(index) = (FIRST_DYNAMIC_FD..FD_TABLE_SIZE).find(|&i| self.slots[i].is_none())
        else {
            return Err(file);
        };
        self.slots[index] = Some(file);
        self.open += 1;
        Ok(Fd(index as u8))
    }

    /// Open file behind `fd`, `None` for console handles and empty slots
    pub fn get_mut(&mut self, fd: Fd) -> Option<&mut (dyn OpenFile + 'static)> {
        self.slots[fd.index()].as_deref_mut()
    }

    /// Whether `fd` currently maps to a file
    #[inline]
    pub fn contains(&self, fd: Fd) -> bool {
        self.slots[fd.index()].is_some()
    }

    /// Take the file out of its slot, freeing the handle for reuse
    pub fn remove(&mut self, fd: Fd) -> Option<Box<dyn OpenFile>> {
        let file = self.slots[fd.index()].take()?;
        self.open -= 1;
        Some(file)
    }

    /// Release every open file, returning how many were closed
    pub fn close_all(&mut self) -> usize {
        let closed = self.open;
        for slot in &mut self.slots {
            // Dropping the handle closes it in the filesystem
            drop(slot.take());
        }
        self.open = 0;
        closed
    }

    /// Number of open files
    #[inline]
    pub fn len(&self) -> usize {
        self.open
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.open == 0
    }

    /// Handles currently open, ascending
    pub fn open_fds(&self) -> Vec<Fd> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_some())
            .map(|(i, _)| Fd(i as u8))
            .collect()
    }
}

impl Default for FdTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FdTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FdTable")
            .field("open", &self.open_fds())
            .finish()
    }
}
