/*!
 * Memory Module
 * Simulated user address spaces and the user-pointer validator
 */

pub mod address_space;
pub mod traits;
pub mod validation;

// Re-export for convenience
pub use address_space::{page_base, UserMemory};
pub use traits::AddressSpace;
pub use validation::{check_range, copy_in, copy_in_string, copy_out, read_word, BadPointer, UserRange};
