/*!
 * System Limits and Constants
 *
 * Centralized location for the fixed values of the user/kernel boundary.
 * Organized by domain for maintainability and discoverability.
 *
 * ## Conventions
 * - Values are grouped by domain (address space, descriptors, syscalls)
 * - Security-critical constants are marked with [SECURITY]
 * - ABI-fixed values are marked with [ABI]
 */

// =============================================================================
// ADDRESS SPACE
// =============================================================================

/// Base of kernel virtual memory
/// Every user address must lie strictly below this value
/// [SECURITY] The validator rejects any range reaching past it
pub const PHYS_BASE: u32 = 0xC000_0000;

/// Page size of the simulated address translation table (4KB)
pub const PGSIZE: u32 = 4096;

/// Lowest address that programs may map (first page is never mapped)
/// Keeps null and near-null pointers permanently invalid
pub const USER_BASE: u32 = 0x0804_8000;

/// Largest data segment `UserMemory::alloc` will grow to (64MB above `USER_BASE`)
/// Keeps the bump allocator far below the stack and bounds mapped pages
pub const MAX_DATA_SEGMENT: u32 = 64 * 1024 * 1024;

/// Longest user string (file name, command line) copied into the kernel
/// [SECURITY] Unterminated strings are a boundary violation, not a scan to PHYS_BASE
pub const MAX_USER_STRING: usize = PGSIZE as usize;

// =============================================================================
// FILE DESCRIPTORS
// =============================================================================

/// Number of slots in a per-process descriptor table
pub const FD_TABLE_SIZE: usize = 128;

/// Reserved descriptor for console input
/// [ABI]
pub const STDIN_FILENO: u32 = 0;

/// Reserved descriptor for console output
/// [ABI]
pub const STDOUT_FILENO: u32 = 1;

/// First descriptor handed out by `open`
pub const FIRST_DYNAMIC_FD: usize = 2;

// =============================================================================
// SYSCALL ABI
// =============================================================================

/// Width of one syscall argument word on the user stack
/// [ABI]
pub const ARG_WORD_SIZE: u32 = 4;

/// Maximum argument words following the syscall number
/// [ABI]
pub const MAX_SYSCALL_ARGS: usize = 3;

/// Standard failure status
/// Used for every kernel-initiated termination and as the sentinel return
pub const EXIT_FAILURE: i32 = -1;

// =============================================================================
// PROCESS DEFAULTS
// =============================================================================

/// Default number of stack pages mapped for a new process
pub const DEFAULT_USER_STACK_PAGES: usize = 1;

/// Upper bound on configurable stack pages (8MB)
pub const MAX_USER_STACK_PAGES: usize = 2048;
