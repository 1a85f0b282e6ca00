/*!
 * Process State
 * Kernel-side state owned by one running process
 */

use std::sync::Arc;

use super::fd_table::FdTable;
use super::record::ProcessRecord;
use super::registry::ChildRegistry;
use crate::core::types::{Pid, UserAddr};
use crate::memory::UserMemory;

/// Per-process kernel state
///
/// Owned by the process's own thread; nothing here is shared, except the
/// record, which the parent also holds.
#[derive(Debug)]
pub struct Process {
    pid: Pid,
    name: String,
    pub(crate) memory: UserMemory,
    pub(crate) fds: FdTable,
    pub(crate) children: ChildRegistry,
    /// Owner-side holder; `None` once the exit path has run
    pub(crate) record: Option<Arc<ProcessRecord>>,
    stack_top: UserAddr,
}

impl Process {
    pub(crate) fn new(record: Arc<ProcessRecord>, stack_pages: usize) -> Self {
        let mut memory = UserMemory::new();
        let stack_top = memory.map_stack(stack_pages);
        Self {
            pid: record.pid(),
            name: record.name().to_string(),
            memory,
            fds: FdTable::new(),
            children: ChildRegistry::new(),
            record: Some(record),
            stack_top,
        }
    }

    #[inline]
    pub fn pid(&self) -> Pid {
        self.pid
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Initial stack pointer (exclusive top of the stack mapping)
    #[inline]
    pub fn stack_top(&self) -> UserAddr {
        self.stack_top
    }

    #[inline]
    pub fn memory(&self) -> &UserMemory {
        &self.memory
    }

    #[inline]
    pub fn memory_mut(&mut self) -> &mut UserMemory {
        &mut self.memory
    }

    #[inline]
    pub fn fds(&self) -> &FdTable {
        &self.fds
    }

    #[inline]
    pub fn children(&self) -> &ChildRegistry {
        &self.children
    }

    /// Whether the exit path has already run
    #[inline]
    pub fn has_exited(&self) -> bool {
        self.record.is_none()
    }
}
