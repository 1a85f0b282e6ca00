/*!
 * Pointer Validation Tests
 * Properties of the user-pointer validator over simulated page tables
 */

use pretty_assertions::assert_eq;
use proptest::prelude::*;

use userprog_kernel::core::limits::{MAX_USER_STRING, PGSIZE, PHYS_BASE, USER_BASE};
use userprog_kernel::memory::{check_range, copy_in, copy_in_string, copy_out, read_word};
use userprog_kernel::UserMemory;

/// Two data pages at USER_BASE plus one stack page
fn layout() -> UserMemory {
    let mut mem = UserMemory::new();
    mem.map_page(USER_BASE);
    mem.map_page(USER_BASE + PGSIZE);
    mem.map_stack(1);
    mem
}

proptest! {
    #[test]
    fn prop_kernel_addresses_rejected(addr in PHYS_BASE..=u32::MAX, width in 0u32..64) {
        let mem = layout();
        prop_assert!(check_range(&mem, addr, width).is_err());
    }

    #[test]
    fn prop_ranges_ending_past_phys_base_rejected(back in 1u32..64, extra in 1u32..64) {
        let mem = layout();
        let addr = PHYS_BASE - back;
        prop_assert!(check_range(&mem, addr, back + extra).is_err());
    }

    #[test]
    fn prop_mapped_ranges_accepted(offset in 0u32..PGSIZE, width in 0u32..PGSIZE) {
        let mem = layout();
        let addr = USER_BASE + offset;
        let range = check_range(&mem, addr, width).unwrap();
        prop_assert_eq!(range.addr(), addr);
        prop_assert_eq!(range.len(), width);
    }

    #[test]
    fn prop_range_into_unmapped_page_rejected(offset in 0u32..PGSIZE, tail in 1u32..PGSIZE) {
        // Third page after USER_BASE is unmapped
        let mem = layout();
        let addr = USER_BASE + PGSIZE + offset;
        let width = (PGSIZE - offset) + tail;
        prop_assert!(check_range(&mem, addr, width).is_err());
    }

    #[test]
    fn prop_copy_in_matches_memory(data in proptest::collection::vec(any::<u8>(), 1..256)) {
        let mut mem = layout();
        let addr = USER_BASE + PGSIZE - 100;
        mem.write_bytes(addr, &data).unwrap();
        prop_assert_eq!(copy_in(&mem, addr, data.len() as u32).unwrap(), data);
    }

    #[test]
    fn prop_string_round_trip(s in "[a-z0-9 ]{0,200}") {
        let mut mem = layout();
        let mut bytes = s.clone().into_bytes();
        bytes.push(0);
        mem.write_bytes(USER_BASE + 10, &bytes).unwrap();
        prop_assert_eq!(copy_in_string(&mem, USER_BASE + 10).unwrap(), s);
    }
}

#[test]
fn test_null_and_wrapping() {
    let mem = layout();
    assert!(check_range(&mem, 0, 0).is_err());
    assert!(check_range(&mem, 0, 4).is_err());
    assert!(check_range(&mem, USER_BASE, u32::MAX).is_err());
}

#[test]
fn test_zero_width_still_checks_address() {
    let mem = layout();
    assert!(check_range(&mem, USER_BASE, 0).is_ok());
    assert!(check_range(&mem, 0x0900_0000, 0).is_err());
}

#[test]
fn test_word_at_top_of_stack() {
    let mut mem = layout();
    mem.write_bytes(PHYS_BASE - 4, &7u32.to_le_bytes()).unwrap();
    assert_eq!(read_word(&mem, PHYS_BASE - 4).unwrap(), 7);
    assert!(read_word(&mem, PHYS_BASE - 3).is_err());
}

#[test]
fn test_string_crossing_into_unmapped_page() {
    let mut mem = layout();
    let end = USER_BASE + 2 * PGSIZE;
    mem.write_bytes(end - 3, b"abc").unwrap();
    let err = copy_in_string(&mem, end - 3).unwrap_err();
    assert_eq!(err.addr, end - 3);
}

#[test]
fn test_string_without_terminator_is_capped() {
    let mut mem = layout();
    mem.write_bytes(USER_BASE, &vec![b'x'; 2 * PGSIZE as usize])
        .unwrap();
    let err = copy_in_string(&mem, USER_BASE).unwrap_err();
    assert_eq!(err.width as usize, MAX_USER_STRING);
}

#[test]
fn test_copy_out_truncates_to_range() {
    let mut mem = layout();
    let range = check_range(&mem, USER_BASE, 3).unwrap();
    assert_eq!(copy_out(&mut mem, range, b"abcdef"), 3);
    assert_eq!(mem.read_bytes(USER_BASE, 4).unwrap(), b"abc\0".to_vec());
}

#[test]
fn test_unmapped_page_no_longer_validates() {
    let mut mem = layout();
    assert!(check_range(&mem, USER_BASE + PGSIZE - 2, 4).is_ok());

    assert!(mem.unmap_page(USER_BASE + PGSIZE));
    assert_eq!(mem.mapped_pages(), 2);
    assert!(check_range(&mem, USER_BASE + PGSIZE - 2, 4).is_err());
    assert!(check_range(&mem, USER_BASE + PGSIZE - 2, 2).is_ok());
    assert!(read_word(&mem, USER_BASE + PGSIZE).is_err());
}
