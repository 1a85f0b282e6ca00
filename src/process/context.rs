/*!
 * User Context
 *
 * The user-mode side of a simulated process: memory accesses that can fault
 * and the syscall stubs that push argument words and trap into the kernel.
 */

use thiserror::Error;

use super::task::Process;
use super::types::ExitStatus;
use crate::core::limits::{ARG_WORD_SIZE, PHYS_BASE};
use crate::core::types::{Pid, RawFd, StatusCode, UserAddr};
use crate::kernel::Kernel;
use crate::memory::UserMemory;
use crate::syscalls::{SyscallNumber, TrapFrame};

/// Bytes below the stack top reserved for syscall argument words
const ARG_AREA: u32 = 64;

/// Why user code stopped running
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trap {
    /// The process went through the exit path
    #[error("process terminated")]
    Terminated,

    /// User-mode access to an unmapped or kernel address
    #[error("page fault at {0:#010x}")]
    Fault(UserAddr),

    /// The machine was powered off
    #[error("machine powered off")]
    Halted,
}

/// Result of a user program's main function
pub type ProgramResult = Result<StatusCode, Trap>;

/// User-mode execution context handed to a program's `main`
///
/// Once any trap ends the process, every further access or syscall fails
/// with the same trap; control never returns to user code.
pub struct UserContext<'k> {
    kernel: &'k Kernel,
    process: &'k mut Process,
    stopped: Option<Trap>,
}

impl<'k> UserContext<'k> {
    pub(crate) fn new(kernel: &'k Kernel, process: &'k mut Process) -> Self {
        Self {
            kernel,
            process,
            stopped: None,
        }
    }

    #[inline]
    pub fn pid(&self) -> Pid {
        self.process.pid()
    }

    #[inline]
    pub fn name(&self) -> &str {
        self.process.name()
    }

    #[inline]
    pub fn kernel(&self) -> &Kernel {
        self.kernel
    }

    /// Read-only view of the kernel-side process state
    #[inline]
    pub fn process(&self) -> &Process {
        self.process
    }

    /// Direct access to this process's memory (program setup, mapping pages)
    #[inline]
    pub fn memory(&mut self) -> &mut UserMemory {
        self.process.memory_mut()
    }

    /// Trap that ended this process, if any
    #[inline]
    pub fn stopped(&self) -> Option<Trap> {
        self.stopped
    }

    #[inline]
    pub fn stack_top(&self) -> UserAddr {
        self.process.stack_top()
    }

    // ========================================================================
    // Data segment helpers
    // ========================================================================

    pub fn alloc(&mut self, len: u32) -> UserAddr {
        self.process.memory_mut().alloc(len)
    }

    pub fn alloc_bytes(&mut self, data: &[u8]) -> UserAddr {
        let addr = self.alloc(data.len() as u32);
        // A refused allocation is unmapped; the syscall using it then fails
        let _ = self.process.memory_mut().write_bytes(addr, data);
        addr
    }

    /// Place a NUL-terminated copy of `s` in user memory
    pub fn alloc_str(&mut self, s: &str) -> UserAddr {
        let mut bytes = Vec::with_capacity(s.len() + 1);
        bytes.extend_from_slice(s.as_bytes());
        bytes.push(0);
        self.alloc_bytes(&bytes)
    }

    // ========================================================================
    // User-mode memory access
    // ========================================================================

    /// Load one byte; unmapped or kernel addresses fault and kill the process
    pub fn load(&mut self, addr: UserAddr) -> Result<u8, Trap> {
        self.ensure_running()?;
        match self.user_byte(addr) {
            Some(byte) => Ok(byte),
            None => Err(self.fault(addr)),
        }
    }

    /// Load `len` bytes starting at `addr`
    pub fn load_bytes(&mut self, addr: UserAddr, len: u32) -> Result<Vec<u8>, Trap> {
        (0..len)
            .map(|offset| self.load(addr.wrapping_add(offset)))
            .collect()
    }

    /// Store one byte; unmapped or kernel addresses fault and kill the process
    pub fn store(&mut self, addr: UserAddr, value: u8) -> Result<(), Trap> {
        self.ensure_running()?;
        if addr >= PHYS_BASE || self.process.memory_mut().write_byte(addr, value).is_none() {
            return Err(self.fault(addr));
        }
        Ok(())
    }

    fn user_byte(&self, addr: UserAddr) -> Option<u8> {
        if addr >= PHYS_BASE {
            return None;
        }
        self.process.memory().read_byte(addr)
    }

    fn fault(&mut self, addr: UserAddr) -> Trap {
        tracing::info!(pid = self.pid(), addr = format_args!("{addr:#010x}"), "user page fault");
        self.kernel.exit(self.process, ExitStatus::killed());
        self.stop(Trap::Fault(addr))
    }

    fn stop(&mut self, trap: Trap) -> Trap {
        self.stopped = Some(trap);
        trap
    }

    fn ensure_running(&mut self) -> Result<(), Trap> {
        if let Some(trap) = self.stopped {
            return Err(trap);
        }
        if self.kernel.is_halted() {
            return Err(self.stop(Trap::Halted));
        }
        Ok(())
    }

    // ========================================================================
    // Traps
    // ========================================================================

    /// Trap into the kernel with a hand-built frame
    pub fn trap(&mut self, mut frame: TrapFrame) -> Result<TrapFrame, Trap> {
        self.ensure_running()?;
        match self.kernel.dispatch(self.process, &mut frame) {
            Ok(()) => Ok(frame),
            Err(trap) => Err(self.stop(trap)),
        }
    }

    /// Push `words` (number first, then arguments) on the stack and trap
    pub fn syscall(&mut self, words: &[u32]) -> Result<i32, Trap> {
        self.ensure_running()?;
        let esp = self.stack_top() - ARG_AREA;
        for (i, word) in words.iter().enumerate() {
            let addr = esp + ARG_WORD_SIZE * i as u32;
            if self
                .process
                .memory_mut()
                .write_bytes(addr, &word.to_le_bytes())
                .is_none()
            {
                return Err(self.fault(addr));
            }
        }
        let frame = self.trap(TrapFrame::new(esp))?;
        Ok(frame.eax as i32)
    }

    // ========================================================================
    // Syscall stubs
    // ========================================================================

    /// Power off; never returns to user code
    pub fn halt(&mut self) -> Trap {
        match self.syscall(&[SyscallNumber::Halt as u32]) {
            Err(trap) => trap,
            Ok(_) => Trap::Halted,
        }
    }

    /// Terminate with `status`; never returns to user code
    pub fn exit(&mut self, status: StatusCode) -> Trap {
        match self.syscall(&[SyscallNumber::Exit as u32, status as u32]) {
            Err(trap) => trap,
            Ok(_) => Trap::Terminated,
        }
    }

    pub fn exec(&mut self, cmdline: &str) -> Result<i32, Trap> {
        let addr = self.alloc_str(cmdline);
        self.syscall(&[SyscallNumber::Exec as u32, addr])
    }

    pub fn wait(&mut self, pid: i32) -> Result<i32, Trap> {
        self.syscall(&[SyscallNumber::Wait as u32, pid as u32])
    }

    pub fn create(&mut self, name: &str, initial_size: u32) -> Result<bool, Trap> {
        let addr = self.alloc_str(name);
        Ok(self.syscall(&[SyscallNumber::Create as u32, addr, initial_size])? != 0)
    }

    pub fn remove(&mut self, name: &str) -> Result<bool, Trap> {
        let addr = self.alloc_str(name);
        Ok(self.syscall(&[SyscallNumber::Remove as u32, addr])? != 0)
    }

    pub fn open(&mut self, name: &str) -> Result<i32, Trap> {
        let addr = self.alloc_str(name);
        self.syscall(&[SyscallNumber::Open as u32, addr])
    }

    pub fn filesize(&mut self, fd: RawFd) -> Result<i32, Trap> {
        self.syscall(&[SyscallNumber::Filesize as u32, fd as u32])
    }

    /// Read up to `len` bytes into a fresh user buffer, returning the count and the bytes
    pub fn read(&mut self, fd: RawFd, len: u32) -> Result<(i32, Vec<u8>), Trap> {
        let buf = self.alloc(len);
        let count = self.syscall(&[SyscallNumber::Read as u32, fd as u32, buf, len])?;
        let copied = u32::try_from(count).unwrap_or(0);
        let bytes = self
            .process
            .memory()
            .read_bytes(buf, copied)
            .unwrap_or_default();
        Ok((count, bytes))
    }

    pub fn write(&mut self, fd: RawFd, data: &[u8]) -> Result<i32, Trap> {
        let buf = self.alloc_bytes(data);
        self.syscall(&[SyscallNumber::Write as u32, fd as u32, buf, data.len() as u32])
    }

    pub fn seek(&mut self, fd: RawFd, position: u32) -> Result<(), Trap> {
        self.syscall(&[SyscallNumber::Seek as u32, fd as u32, position])
            .map(|_| ())
    }

    pub fn tell(&mut self, fd: RawFd) -> Result<i32, Trap> {
        self.syscall(&[SyscallNumber::Tell as u32, fd as u32])
    }

    pub fn close(&mut self, fd: RawFd) -> Result<(), Trap> {
        self.syscall(&[SyscallNumber::Close as u32, fd as u32])
            .map(|_| ())
    }

    /// Write a string to the console
    pub fn print(&mut self, s: &str) -> Result<(), Trap> {
        self.write(crate::core::limits::STDOUT_FILENO as RawFd, s.as_bytes())
            .map(|_| ())
    }
}
