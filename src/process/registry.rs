/*!
 * Child Registry
 * A process's references to the records of its direct children
 */

use std::collections::BTreeMap;
use std::sync::Arc;

use super::record::ProcessRecord;
use crate::core::types::Pid;

/// Parent-side holders of child records
///
/// Each entry is one parent reference; removing an entry hands that
/// reference back to the caller, who must release it in the process table.
#[derive(Debug, Default)]
pub struct ChildRegistry {
    children: BTreeMap<Pid, Arc<ProcessRecord>>,
}

impl ChildRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, record: Arc<ProcessRecord>) {
        self.children.insert(record.pid(), record);
    }

    /// Record of a live direct child
    pub fn get(&self, pid: Pid) -> Option<Arc<ProcessRecord>> {
        self.children.get(&pid).cloned()
    }

    pub fn remove(&mut self, pid: Pid) -> Option<Arc<ProcessRecord>> {
        self.children.remove(&pid)
    }

    /// Remove every entry (orphaning on exit)
    pub fn drain(&mut self) -> Vec<Arc<ProcessRecord>> {
        std::mem::take(&mut self.children).into_values().collect()
    }

    #[inline]
    pub fn contains(&self, pid: Pid) -> bool {
        self.children.contains_key(&pid)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.children.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    pub fn pids(&self) -> Vec<Pid> {
        self.children.keys().copied().collect()
    }
}
