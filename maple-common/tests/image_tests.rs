// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Unit tests for application image validation.

use maple_common::image::{is_valid_application, MemoryLayout, VectorTable};
use maple_common::layout::{APP_ADDR, FLASH_END, RAM_END, RAM_START};

fn layout() -> MemoryLayout {
    MemoryLayout::DEFAULT
}

fn valid() -> VectorTable {
    VectorTable::from_words(RAM_END, APP_ADDR + 0xC1)
}

// =============================================================================
// Accepted images
// =============================================================================

#[test]
fn test_typical_image_is_valid() {
    assert!(is_valid_application(&valid(), &layout()));
}

#[test]
fn test_stack_below_top_of_ram_is_valid() {
    let vt = VectorTable::from_words(0x2003_F000, APP_ADDR + 0x101);
    assert!(is_valid_application(&vt, &layout()));
}

#[test]
fn test_entry_near_end_of_flash_is_valid() {
    let vt = VectorTable::from_words(RAM_END, FLASH_END - 3);
    assert!(is_valid_application(&vt, &layout()));
}

// =============================================================================
// Rejected images
// =============================================================================

#[test]
fn test_erased_flash_is_invalid() {
    let vt = VectorTable::from_words(0xFFFF_FFFF, 0xFFFF_FFFF);
    assert!(!is_valid_application(&vt, &layout()));
}

#[test]
fn test_zeroed_flash_is_invalid() {
    let vt = VectorTable::from_words(0, 0);
    assert!(!is_valid_application(&vt, &layout()));
}

#[test]
fn test_stack_outside_ram_is_invalid() {
    let above = VectorTable::from_words(RAM_END + 4, APP_ADDR + 0xC1);
    let at_start = VectorTable::from_words(RAM_START, APP_ADDR + 0xC1);
    let in_flash = VectorTable::from_words(APP_ADDR, APP_ADDR + 0xC1);
    assert!(!is_valid_application(&above, &layout()));
    assert!(!is_valid_application(&at_start, &layout()));
    assert!(!is_valid_application(&in_flash, &layout()));
}

#[test]
fn test_misaligned_stack_is_invalid() {
    let vt = VectorTable::from_words(RAM_END - 2, APP_ADDR + 0xC1);
    assert!(!is_valid_application(&vt, &layout()));
}

#[test]
fn test_arm_mode_reset_vector_is_invalid() {
    // Cortex-M0+ only executes Thumb code
    let vt = VectorTable::from_words(RAM_END, APP_ADDR + 0xC0);
    assert!(!is_valid_application(&vt, &layout()));
}

#[test]
fn test_entry_in_bootloader_region_is_invalid() {
    let vt = VectorTable::from_words(RAM_END, 0x1000_0101);
    assert!(!is_valid_application(&vt, &layout()));
}

#[test]
fn test_entry_inside_vector_words_is_invalid() {
    let vt = VectorTable::from_words(RAM_END, APP_ADDR + 0x5);
    assert!(!is_valid_application(&vt, &layout()));
}

#[test]
fn test_entry_past_flash_end_is_invalid() {
    let vt = VectorTable::from_words(RAM_END, FLASH_END + 1);
    assert!(!is_valid_application(&vt, &layout()));
}

// =============================================================================
// MemoryLayout tests
// =============================================================================

#[test]
fn test_layout_at_moves_only_app_addr() {
    let moved = MemoryLayout::at(0x1002_0000);
    assert_eq!(moved.app_addr, 0x1002_0000);
    assert_eq!(moved.flash_end, FLASH_END);
    assert_eq!(moved.ram_start, RAM_START);
    assert_eq!(moved.ram_end, RAM_END);
}

#[test]
fn test_image_is_checked_against_its_own_address() {
    // Valid at the default address, but its entry lies below a later image start
    let moved = MemoryLayout::at(0x1002_0000);
    assert!(is_valid_application(&valid(), &layout()));
    assert!(!is_valid_application(&valid(), &moved));
}
