/*!
 * File Descriptor Syscalls
 * Per-process descriptor operations with console routing for fds 0 and 1
 */

use tracing::{debug, trace, warn};

use crate::core::limits::EXIT_FAILURE;
use crate::memory::{copy_out, UserRange};
use crate::kernel::Kernel;
use crate::process::{Fd, Process};

impl Kernel {
    /// open(name): lowest free descriptor, or -1
    pub(super) fn open(&self, process: &mut Process, name: &str) -> i32 {
        let file = match self.fs().open(name) {
            Ok(file) => file,
            Err(e) => {
                debug!(pid = process.pid(), name, error = %e, "open failed");
                return EXIT_FAILURE;
            }
        };

        match process.fds.insert(file) {
            Ok(fd) => {
                trace!(pid = process.pid(), name, %fd, "opened");
                fd.as_raw()
            }
            Err(_file) => {
                debug!(pid = process.pid(), name, "descriptor table full");
                EXIT_FAILURE
            }
        }
    }

    /// close(fd): no-op for the console and for unopened slots
    pub(super) fn close(&self, process: &mut Process, fd: Fd) {
        if fd.is_console() {
            return;
        }
        if process.fds.remove(fd).is_some() {
            trace!(pid = process.pid(), %fd, "closed");
        }
    }

    pub(super) fn filesize(&self, process: &mut Process, fd: Fd) -> i32 {
        match process.fds.get_mut(fd) {
            Some(file) => file.length() as i32,
            None => EXIT_FAILURE,
        }
    }

    /// read(fd, buffer, size): bytes read into the validated user buffer
    pub(super) fn read(&self, process: &mut Process, fd: Fd, buffer: UserRange) -> i32 {
        if fd == Fd::STDIN {
            let console = self.console();
            let data: Vec<u8> = (0..buffer.len()).map(|_| console.getc()).collect();
            return copy_out(process.memory_mut(), buffer, &data) as i32;
        }
        if fd == Fd::STDOUT {
            return EXIT_FAILURE;
        }

        let Some(file) = process.fds.get_mut(fd) else {
            return EXIT_FAILURE;
        };
        let mut data = vec![0u8; buffer.len() as usize];
        match file.read(&mut data) {
            Ok(count) => copy_out(process.memory_mut(), buffer, &data[..count]) as i32,
            Err(e) => {
                debug!(pid = process.pid(), %fd, error = %e, "read failed");
                EXIT_FAILURE
            }
        }
    }

    /// write(fd, data): bytes written; the console takes the whole buffer in one call
    pub(super) fn write(&self, process: &mut Process, fd: Fd, data: &[u8]) -> i32 {
        if fd == Fd::STDOUT {
            self.console().putbuf(data);
            return data.len() as i32;
        }
        if fd == Fd::STDIN {
            return EXIT_FAILURE;
        }

        let Some(file) = process.fds.get_mut(fd) else {
            return EXIT_FAILURE;
        };
        match file.write(data) {
            Ok(count) => count as i32,
            Err(e) => {
                debug!(pid = process.pid(), %fd, error = %e, "write failed");
                EXIT_FAILURE
            }
        }
    }

    pub(super) fn seek(&self, process: &mut Process, fd: Fd, position: u32) {
        match process.fds.get_mut(fd) {
            Some(file) => file.seek(position),
            None => warn!(pid = process.pid(), %fd, "seek on unopened descriptor"),
        }
    }

    pub(super) fn tell(&self, process: &mut Process, fd: Fd) -> i32 {
        match process.fds.get_mut(fd) {
            Some(file) => file.tell() as i32,
            None => {
                warn!(pid = process.pid(), %fd, "tell on unopened descriptor");
                EXIT_FAILURE
            }
        }
    }
}
