/*!
 * Memory Traits
 * Address-translation abstraction consumed by the pointer validator
 */

use crate::core::types::UserAddr;

/// Address-mapping query for one process's translation table
///
/// The validator only needs to know whether a user page is present;
/// it never walks or modifies the table itself.
pub trait AddressSpace {
    /// Whether the page containing `addr` is currently mapped
    fn is_mapped(&self, addr: UserAddr) -> bool;
}
