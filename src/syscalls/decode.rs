/*!
 * Syscall Decoding
 *
 * The trust boundary: reads the number and argument words from the user
 * stack and turns argument pointers into kernel-owned data. Handlers only
 * ever see the resulting `Syscall`.
 *
 * # Security
 * - Each stack word is validated before it is read
 * - Only as many words as the syscall takes are touched
 * - Descriptors are range-checked into `Fd` here, not in handlers
 */

use super::types::{Syscall, SyscallNumber, Violation};
use crate::core::limits::{ARG_WORD_SIZE, MAX_SYSCALL_ARGS};
use crate::core::types::{RawFd, UserAddr};
use crate::memory::{check_range, copy_in, copy_in_string, read_word, BadPointer, UserMemory};
use crate::process::Fd;

/// Decode the request whose number sits at `esp`
pub fn decode(mem: &UserMemory, esp: UserAddr) -> Result<Syscall, Violation> {
    let raw = read_word(mem, esp)?;
    let number = SyscallNumber::try_from(raw).map_err(Violation::UnknownSyscall)?;
    let args = read_args(mem, esp, number.arg_count())?;

    let syscall = match number {
        SyscallNumber::Halt => Syscall::Halt,
        SyscallNumber::Exit => Syscall::Exit {
            status: args[0] as i32,
        },
        SyscallNumber::Exec => Syscall::Exec {
            cmdline: copy_in_string(mem, args[0])?,
        },
        SyscallNumber::Wait => Syscall::Wait {
            pid: args[0] as i32,
        },
        SyscallNumber::Create => Syscall::Create {
            name: copy_in_string(mem, args[0])?,
            initial_size: args[1],
        },
        SyscallNumber::Remove => Syscall::Remove {
            name: copy_in_string(mem, args[0])?,
        },
        SyscallNumber::Open => Syscall::Open {
            name: copy_in_string(mem, args[0])?,
        },
        SyscallNumber::Filesize => Syscall::Filesize {
            fd: checked_fd(args[0])?,
        },
        SyscallNumber::Read => {
            let fd = checked_fd(args[0])?;
            Syscall::Read {
                fd,
                buffer: check_range(mem, args[1], args[2])?,
            }
        }
        SyscallNumber::Write => {
            let fd = checked_fd(args[0])?;
            Syscall::Write {
                fd,
                data: copy_in(mem, args[1], args[2])?,
            }
        }
        SyscallNumber::Seek => Syscall::Seek {
            fd: checked_fd(args[0])?,
            position: args[1],
        },
        SyscallNumber::Tell => Syscall::Tell {
            fd: checked_fd(args[0])?,
        },
        SyscallNumber::Close => Syscall::Close {
            fd: checked_fd(args[0])?,
        },
    };

    Ok(syscall)
}

/// Read `count` argument words above the number
fn read_args(
    mem: &UserMemory,
    esp: UserAddr,
    count: usize,
) -> Result<[u32; MAX_SYSCALL_ARGS], Violation> {
    let mut args = [0u32; MAX_SYSCALL_ARGS];
    for (slot, arg) in args.iter_mut().enumerate().take(count) {
        let offset = ARG_WORD_SIZE * (slot as u32 + 1);
        let addr = esp.checked_add(offset).ok_or(BadPointer {
            addr: esp,
            width: offset + ARG_WORD_SIZE,
        })?;
        *arg = read_word(mem, addr)?;
    }
    Ok(args)
}

fn checked_fd(word: u32) -> Result<Fd, Violation> {
    let raw = word as RawFd;
    Fd::new(raw).ok_or(Violation::BadFd(raw))
}
