/*!
 * Syscall Dispatcher
 * Routes a trap to its handler and writes the result register
 */

use super::decode::decode;
use super::types::{Syscall, TrapFrame};
use crate::kernel::Kernel;
use crate::monitoring::{span_syscall, trace_violation};
use crate::process::{ExitStatus, Process, Trap};

impl Kernel {
    /// Handle one trap from `process`
    ///
    /// `Ok` means control returns to user code with `frame.eax` updated for
    /// value-returning calls. `Err` means the process never runs user code
    /// again.
    pub fn dispatch(&self, process: &mut Process, frame: &mut TrapFrame) -> Result<(), Trap> {
        // Nothing runs on a powered-off machine, not even the decode
        if self.is_halted() {
            return Err(Trap::Halted);
        }

        let syscall = match decode(process.memory(), frame.esp) {
            Ok(syscall) => syscall,
            Err(violation) => {
                trace_violation(process.pid(), frame.esp, &violation);
                self.exit(process, ExitStatus::killed());
                return Err(Trap::Terminated);
            }
        };

        let number = syscall.number();
        let pid = process.pid();
        let span = span_syscall(number.name(), pid);
        let _guard = span.enter();

        let result = match syscall {
            Syscall::Halt => {
                self.halt();
                return Err(Trap::Halted);
            }
            Syscall::Exit { status } => {
                self.exit(process, ExitStatus::Exited(status));
                return Err(Trap::Terminated);
            }
            Syscall::Exec { ref cmdline } => self.exec(process, cmdline),
            Syscall::Wait { pid: child } => match self.wait(process, child) {
                Some(code) => code,
                None => return Err(Trap::Halted),
            },
            Syscall::Create {
                ref name,
                initial_size,
            } => self.create(pid, name, initial_size) as i32,
            Syscall::Remove { ref name } => self.remove(pid, name) as i32,
            Syscall::Open { ref name } => self.open(process, name),
            Syscall::Filesize { fd } => self.filesize(process, fd),
            Syscall::Read { fd, buffer } => self.read(process, fd, buffer),
            Syscall::Write { fd, ref data } => self.write(process, fd, data),
            Syscall::Seek { fd, position } => {
                self.seek(process, fd, position);
                0
            }
            Syscall::Tell { fd } => self.tell(process, fd),
            Syscall::Close { fd } => {
                self.close(process, fd);
                0
            }
        };

        if number.returns_value() {
            frame.eax = result as u32;
        }
        span.record_result(result);
        Ok(())
    }
}
