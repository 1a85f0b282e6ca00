/*!
 * Process Table
 * Pid-indexed arena of live process records
 */

use dashmap::DashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tracing::debug;

use super::record::ProcessRecord;
use super::types::Holder;
use crate::core::types::Pid;

/// Arena owning every reachable process record
///
/// A record leaves the arena exactly when its last holder releases it.
#[derive(Debug)]
pub struct ProcessTable {
    records: DashMap<Pid, Arc<ProcessRecord>>,
    next_pid: AtomicU32,
}

impl ProcessTable {
    pub fn new() -> Self {
        Self {
            records: DashMap::new(),
            next_pid: AtomicU32::new(1),
        }
    }

    /// Create a record with both holders taken
    pub fn allocate(&self, name: &str) -> Arc<ProcessRecord> {
        let pid = self.next_pid.fetch_add(1, Ordering::Relaxed);
        let record = Arc::new(ProcessRecord::new(pid, name));
        self.records.insert(pid, Arc::clone(&record));
        debug!(pid, name, "process record allocated");
        record
    }

    /// Release one holder; the record is freed when both are gone
    pub fn release(&self, record: &ProcessRecord, holder: Holder) {
        if record.release() {
            self.records.remove(&record.pid());
            debug!(pid = record.pid(), ?holder, "process record freed");
        } else {
            debug!(pid = record.pid(), ?holder, "process record released");
        }
    }

    /// Look up a reachable record
    pub fn get(&self, pid: Pid) -> Option<Arc<ProcessRecord>> {
        self.records.get(&pid).map(|entry| Arc::clone(entry.value()))
    }

    #[inline]
    pub fn contains(&self, pid: Pid) -> bool {
        self.records.contains_key(&pid)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Wake every blocked waiter (used on power-off)
    pub fn interrupt_all(&self) {
        for entry in self.records.iter() {
            entry.value().interrupt();
        }
    }
}

impl Default for ProcessTable {
    fn default() -> Self {
        Self::new()
    }
}
