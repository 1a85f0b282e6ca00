/*!
 * Trap Frame
 * Saved user registers visible to the syscall handler
 */

use crate::core::types::UserAddr;

/// Interrupted user context
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrapFrame {
    /// User stack pointer; points at the syscall number
    pub esp: UserAddr,
    /// Accumulator; receives the syscall result
    pub eax: u32,
}

impl TrapFrame {
    #[inline]
    #[must_use]
    pub const fn new(esp: UserAddr) -> Self {
        Self { esp, eax: 0 }
    }

    #[inline]
    #[must_use]
    pub const fn with_eax(mut self, eax: u32) -> Self {
        self.eax = eax;
        self
    }
}
