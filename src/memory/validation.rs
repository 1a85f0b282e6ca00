/*!
 * User Pointer Validation
 *
 * The only code allowed to turn a user-supplied address into kernel data.
 *
 * # Security Principles
 * - Validate before any dereference, never catch a fault afterwards
 * - Fail-secure: null, kernel, wrapping and unmapped ranges are rejected
 * - TOCTOU: data is copied into kernel-owned buffers in the same step that
 *   validates it, so handlers never hold a raw user address for reading
 */

use thiserror::Error;

use super::address_space::{page_base, UserMemory};
use super::traits::AddressSpace;
use crate::core::limits::{ARG_WORD_SIZE, MAX_USER_STRING, PGSIZE, PHYS_BASE};
use crate::core::types::UserAddr;

/// A rejected user address range
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("bad user pointer {addr:#010x} (width {width})")]
pub struct BadPointer {
    pub addr: UserAddr,
    pub width: u32,
}

/// A validated, writable user range
///
/// Only constructed by `check_range`, so holding one proves the range was
/// below `PHYS_BASE` and mapped when it was checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserRange {
    addr: UserAddr,
    len: u32,
}

impl UserRange {
    #[inline]
    pub const fn addr(&self) -> UserAddr {
        self.addr
    }

    #[inline]
    pub const fn len(&self) -> u32 {
        self.len
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Check that `[addr, addr + width)` is user memory mapped in `space`
///
/// A zero width is checked as one byte: the start address must still be a
/// real user address even when nothing will be transferred.
pub fn check_range<A>(space: &A, addr: UserAddr, width: u32) -> Result<UserRange, BadPointer>
where
    A: AddressSpace + ?Sized,
{
    let checked = width.max(1);
    let bad = BadPointer { addr, width };

    if addr == 0 || addr >= PHYS_BASE {
        return Err(bad);
    }

    let end = addr.checked_add(checked).ok_or(bad)?;
    if end > PHYS_BASE {
        return Err(bad);
    }

    // One lookup per page touched by the range
    let mut page = page_base(addr);
    while page < end {
        if !space.is_mapped(page) {
            return Err(bad);
        }
        page = match page.checked_add(PGSIZE) {
            Some(next) => next,
            None => break,
        };
    }

    Ok(UserRange { addr, len: width })
}

/// Validate and read one little-endian argument word
pub fn read_word(mem: &UserMemory, addr: UserAddr) -> Result<u32, BadPointer> {
    let bytes = copy_in(mem, addr, ARG_WORD_SIZE)?;
    let mut word = [0u8; 4];
    word.copy_from_slice(&bytes);
    Ok(u32::from_le_bytes(word))
}

/// Validate and copy `len` bytes into a kernel buffer
pub fn copy_in(mem: &UserMemory, addr: UserAddr, len: u32) -> Result<Vec<u8>, BadPointer> {
    let range = check_range(mem, addr, len)?;
    mem.read_bytes(range.addr, range.len)
        .ok_or(BadPointer { addr, width: len })
}

/// Validate and copy a NUL-terminated string into a kernel `String`
///
/// Every byte is checked before it is read. A string without a terminator
/// inside `MAX_USER_STRING` bytes is rejected. Non-UTF-8 bytes are replaced.
pub fn copy_in_string(mem: &UserMemory, addr: UserAddr) -> Result<String, BadPointer> {
    let mut bytes = Vec::new();
    let mut cursor = addr;

    loop {
        if bytes.len() >= MAX_USER_STRING {
            return Err(BadPointer {
                addr,
                width: MAX_USER_STRING as u32,
            });
        }

        let width = bytes.len() as u32 + 1;
        check_range(mem, cursor, 1).map_err(|_| BadPointer { addr, width })?;
        let byte = mem
            .read_byte(cursor)
            .ok_or(BadPointer { addr, width })?;
        if byte == 0 {
            break;
        }
        bytes.push(byte);
        cursor += 1;
    }

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Copy kernel data out to a previously validated range
///
/// Writes at most `range.len()` bytes and returns how many were written.
pub fn copy_out(mem: &mut UserMemory, range: UserRange, data: &[u8]) -> usize {
    let count = data.len().min(range.len as usize);
    match mem.write_bytes(range.addr, &data[..count]) {
        Some(()) => count,
        None => 0,
    }
}
