/*!
 * Exit
 * The single termination path for every process
 */

use tracing::{info, warn};

use crate::kernel::Kernel;
use crate::process::task::Process;
use crate::process::types::{ExitStatus, Holder};

impl Kernel {
    /// Terminate `process` with `status`
    ///
    /// Runs at most once per process. A second call (no owner reference
    /// left) is logged and otherwise ignored; the caller still stops the
    /// process.
    pub(crate) fn exit(&self, process: &mut Process, status: ExitStatus) {
        let Some(record) = process.record.take() else {
            warn!(pid = process.pid(), ?status, "exit on a process with no live record");
            return;
        };
        let pid = process.pid();

        // 1. Final status, written once
        if !record.set_status(status) {
            warn!(pid, ?status, current = ?record.status(), "exit status already set");
        }
        let code = record.status().code();

        // 2. Descriptors
        let closed = process.fds.close_all();

        // 3. Unwaited children become orphans
        let orphans = process.children.drain();
        for child in &orphans {
            self.records().release(child, Holder::Parent);
        }

        // 4. No longer schedulable; wake the waiter
        self.unmark_live(pid);
        record.signal_completion();

        // 5. Owner-side reference
        self.records().release(&record, Holder::Owner);

        // 6. Termination notice
        self.console()
            .putbuf(format!("{}: exit({})\n", process.name(), code).as_bytes());

        info!(pid, code, closed, orphans = orphans.len(), "process exited");
    }
}
