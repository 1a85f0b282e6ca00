/*!
 * Process Record
 *
 * Kernel-owned lifecycle state for one process, shared between the process
 * itself and its parent.
 *
 * # Protocol
 * - `status` is written exactly once, by the owner's exit path
 * - `completion` is a one-shot signal raised after the status is final;
 *   a parent blocked in `wait` observes the status only after it is raised
 * - `holders` starts at 2 (owner + parent); the process table drops the
 *   record when the count reaches zero, so neither side can observe a
 *   freed record
 */

use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicU8, Ordering};

use super::types::ExitStatus;
use crate::core::types::Pid;
use crate::devices::PowerControl;

/// Shared per-process record
#[derive(Debug)]
pub struct ProcessRecord {
    pid: Pid,
    name: String,
    status: Mutex<ExitStatus>,
    completed: Mutex<bool>,
    completion: Condvar,
    holders: AtomicU8,
}

impl ProcessRecord {
    pub(crate) fn new(pid: Pid, name: impl Into<String>) -> Self {
        Self {
            pid,
            name: name.into(),
            status: Mutex::new(ExitStatus::Running),
            completed: Mutex::new(false),
            completion: Condvar::new(),
            holders: AtomicU8::new(2),
        }
    }

    #[inline]
    pub fn pid(&self) -> Pid {
        self.pid
    }

    /// Program name (first token of the command line)
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current status snapshot
    #[inline]
    pub fn status(&self) -> ExitStatus {
        *self.status.lock()
    }

    /// Move from `Running` to a terminal status
    ///
    /// Returns `false` (and changes nothing) if the status was already final
    /// or `status` is not terminal.
    pub(crate) fn set_status(&self, status: ExitStatus) -> bool {
        let mut current = self.status.lock();
        if current.is_terminal() || !status.is_terminal() {
            return false;
        }
        *current = status;
        true
    }

    /// Raise the one-shot completion signal
    pub(crate) fn signal_completion(&self) {
        let mut completed = self.completed.lock();
        *completed = true;
        self.completion.notify_all();
    }

    /// Whether completion has been signaled
    #[inline]
    pub fn is_complete(&self) -> bool {
        *self.completed.lock()
    }

    /// Block until completion, returning the final status
    ///
    /// Returns `None` if the machine powers off first.
    pub(crate) fn wait_completion(&self, power: &dyn PowerControl) -> Option<ExitStatus> {
        let mut completed = self.completed.lock();
        while !*completed {
            if power.is_off() {
                return None;
            }
            self.completion.wait(&mut completed);
        }
        drop(completed);
        Some(self.status())
    }

    /// Wake any waiter so it can notice a power-off
    pub(crate) fn interrupt(&self) {
        let _completed = self.completed.lock();
        self.completion.notify_all();
    }

    /// Drop one holder, returning `true` if it was the last
    pub(crate) fn release(&self) -> bool {
        let previous = self.holders.fetch_sub(1, Ordering::AcqRel);
        debug_assert!(previous > 0, "process record {} over-released", self.pid);
        previous == 1
    }

    /// Holders still referencing this record
    #[inline]
    pub fn holders(&self) -> u8 {
        self.holders.load(Ordering::Acquire)
    }
}
