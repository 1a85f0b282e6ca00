/*!
 * Simulated User Address Space
 * Sparse page table backing one process's user memory
 */

use std::collections::HashMap;

use super::traits::AddressSpace;
use crate::core::limits::{MAX_DATA_SEGMENT, PGSIZE, PHYS_BASE, USER_BASE};
use crate::core::types::UserAddr;

/// Round an address down to its page base
#[inline]
#[must_use]
pub const fn page_base(addr: UserAddr) -> UserAddr {
    addr & !(PGSIZE - 1)
}

/// Per-process user memory
///
/// Pages are allocated lazily by `map_page`. Raw accessors return `None`
/// for unmapped bytes instead of faulting; callers decide whether that is a
/// user fault or a validated kernel copy.
#[derive(Debug)]
pub struct UserMemory {
    pages: HashMap<UserAddr, Box<[u8]>>,
    /// Bump pointer for `alloc`, starts at `USER_BASE`
    brk: UserAddr,
}

impl UserMemory {
    pub fn new() -> Self {
        Self {
            pages: HashMap::new(),
            brk: USER_BASE,
        }
    }

    /// Map a zeroed page containing `addr`
    ///
    /// Returns `false` for kernel addresses or pages already present.
    pub fn map_page(&mut self, addr: UserAddr) -> bool {
        if addr >= PHYS_BASE {
            return false;
        }
        let base = page_base(addr);
        if self.pages.contains_key(&base) {
            return false;
        }
        self.pages
            .insert(base, vec![0u8; PGSIZE as usize].into_boxed_slice());
        true
    }

    /// Remove the page containing `addr`
    pub fn unmap_page(&mut self, addr: UserAddr) -> bool {
        self.pages.remove(&page_base(addr)).is_some()
    }

    /// Map `count` pages ending right below `PHYS_BASE` and return the initial stack pointer
    pub fn map_stack(&mut self, count: usize) -> UserAddr {
        for i in 1..=count as u32 {
            self.map_page(PHYS_BASE - i * PGSIZE);
        }
        PHYS_BASE
    }

    /// Reserve `len` bytes in the data segment, mapping pages as needed
    ///
    /// Used by simulated programs to place strings and buffers. A request
    /// that would grow the segment past `MAX_DATA_SEGMENT` maps nothing and
    /// leaves `brk` alone; the returned address is then unmapped and any use
    /// of it faults or fails validation.
    pub fn alloc(&mut self, len: u32) -> UserAddr {
        let addr = self.brk;
        let end = match addr.checked_add(len.max(1)) {
            Some(end) if end <= USER_BASE + MAX_DATA_SEGMENT => end,
            _ => {
                tracing::debug!(addr, len, "data segment allocation refused");
                return addr;
            }
        };
        for page in (page_base(addr)..end).step_by(PGSIZE as usize) {
            self.map_page(page);
        }
        self.brk = end;
        addr
    }

    /// Number of mapped pages
    #[inline]
    pub fn mapped_pages(&self) -> usize {
        self.pages.len()
    }

    /// Read one byte, `None` if unmapped
    #[inline]
    pub fn read_byte(&self, addr: UserAddr) -> Option<u8> {
        let page = self.pages.get(&page_base(addr))?;
        Some(page[(addr - page_base(addr)) as usize])
    }

    /// Write one byte, `None` if unmapped
    #[inline]
    pub fn write_byte(&mut self, addr: UserAddr, value: u8) -> Option<()> {
        let base = page_base(addr);
        let page = self.pages.get_mut(&base)?;
        page[(addr - base) as usize] = value;
        Some(())
    }

    /// Read `len` bytes, `None` if any byte is unmapped or the range wraps
    pub fn read_bytes(&self, addr: UserAddr, len: u32) -> Option<Vec<u8>> {
        let mut out = Vec::with_capacity(len as usize);
        for offset in 0..len {
            out.push(self.read_byte(addr.checked_add(offset)?)?);
        }
        Some(out)
    }

    /// Write `data` at `addr`, `None` if any byte is unmapped or the range wraps
    ///
    /// Bytes before the first unmapped address are left written.
    pub fn write_bytes(&mut self, addr: UserAddr, data: &[u8]) -> Option<()> {
        for (offset, byte) in data.iter().enumerate() {
            let target = addr.checked_add(u32::try_from(offset).ok()?)?;
            self.write_byte(target, *byte)?;
        }
        Some(())
    }
}

impl Default for UserMemory {
    fn default() -> Self {
        Self::new()
    }
}

impl AddressSpace for UserMemory {
    #[inline]
    fn is_mapped(&self, addr: UserAddr) -> bool {
        addr < PHYS_BASE && self.pages.contains_key(&page_base(addr))
    }
}
