/*!
 * File System Syscalls
 * Name-level operations on the shared file system
 */

use tracing::debug;

use crate::core::types::Pid;
use crate::kernel::Kernel;

impl Kernel {
    /// create(name, initial_size): true if the file was created
    pub(super) fn create(&self, pid: Pid, name: &str, initial_size: u32) -> bool {
        match self.fs().create(name, initial_size) {
            Ok(()) => {
                debug!(pid, name, initial_size, "file created");
                true
            }
            Err(e) => {
                debug!(pid, name, error = %e, "create failed");
                false
            }
        }
    }

    /// remove(name): true if the file was removed; open handles stay valid
    pub(super) fn remove(&self, pid: Pid, name: &str) -> bool {
        match self.fs().remove(name) {
            Ok(()) => {
                debug!(pid, name, "file removed");
                true
            }
            Err(e) => {
                debug!(pid, name, error = %e, "remove failed");
                false
            }
        }
    }
}
