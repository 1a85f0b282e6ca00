/*!
 * Wait
 * Reap a direct child exactly once
 */

use tracing::debug;

use crate::core::limits::EXIT_FAILURE;
use crate::core::types::{Pid, StatusCode};
use crate::kernel::Kernel;
use crate::process::task::Process;
use crate::process::types::Holder;

impl Kernel {
    /// wait(pid): the child's exit status, or -1 if `pid` is not an unwaited child
    ///
    /// Returns `None` only when the machine powers off while blocked.
    pub(crate) fn wait(&self, process: &mut Process, pid: i32) -> Option<StatusCode> {
        let Some(record) = Pid::try_from(pid)
            .ok()
            .and_then(|pid| process.children.get(pid))
        else {
            debug!(pid = process.pid(), child = pid, "wait on non-child");
            return Some(EXIT_FAILURE);
        };

        let status = record.wait_completion(self.power())?;

        process.children.remove(record.pid());
        self.records().release(&record, Holder::Parent);

        debug!(pid = process.pid(), child = record.pid(), ?status, "child reaped");
        Some(status.code())
    }
}
