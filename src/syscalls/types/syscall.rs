/*!
 * Syscall Enum
 * Fully decoded requests; every user address has already been validated
 */

use crate::core::types::StatusCode;
use crate::memory::UserRange;
use crate::process::Fd;

use super::numbers::SyscallNumber;

/// Decoded system call
///
/// Strings and outgoing data are kernel-owned copies; the only user address
/// left is the validated destination of `Read`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Syscall {
    Halt,
    Exit {
        status: StatusCode,
    },
    Exec {
        cmdline: String,
    },
    Wait {
        pid: i32,
    },
    Create {
        name: String,
        initial_size: u32,
    },
    Remove {
        name: String,
    },
    Open {
        name: String,
    },
    Filesize {
        fd: Fd,
    },
    Read {
        fd: Fd,
        buffer: UserRange,
    },
    Write {
        fd: Fd,
        data: Vec<u8>,
    },
    Seek {
        fd: Fd,
        position: u32,
    },
    Tell {
        fd: Fd,
    },
    Close {
        fd: Fd,
    },
}

impl Syscall {
    /// Identifier this request was decoded from
    #[must_use]
    pub const fn number(&self) -> SyscallNumber {
        match self {
            Self::Halt => SyscallNumber::Halt,
            Self::Exit { .. } => SyscallNumber::Exit,
            Self::Exec { .. } => SyscallNumber::Exec,
            Self::Wait { .. } => SyscallNumber::Wait,
            Self::Create { .. } => SyscallNumber::Create,
            Self::Remove { .. } => SyscallNumber::Remove,
            Self::Open { .. } => SyscallNumber::Open,
            Self::Filesize { .. } => SyscallNumber::Filesize,
            Self::Read { .. } => SyscallNumber::Read,
            Self::Write { .. } => SyscallNumber::Write,
            Self::Seek { .. } => SyscallNumber::Seek,
            Self::Tell { .. } => SyscallNumber::Tell,
            Self::Close { .. } => SyscallNumber::Close,
        }
    }
}
