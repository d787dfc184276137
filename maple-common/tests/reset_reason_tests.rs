// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Unit tests for reset reason encoding and the read-and-clear contract.

use maple_common::layout::BOOT_FLAG_MAGIC;
use maple_common::reset_reason::{arm, read_and_clear, FlagCell, ResetReason};

struct Cell(u32);

impl FlagCell for Cell {
    fn load(&self) -> u32 {
        self.0
    }

    fn store(&mut self, raw: u32) {
        self.0 = raw;
    }
}

// =============================================================================
// Encoding tests
// =============================================================================

#[test]
fn test_known_codes_decode() {
    assert_eq!(
        ResetReason::from_raw(BOOT_FLAG_MAGIC | 0x01),
        ResetReason::PersistentBootloader
    );
    assert_eq!(
        ResetReason::from_raw(BOOT_FLAG_MAGIC | 0x02),
        ResetReason::JustUploaded
    );
    assert_eq!(
        ResetReason::from_raw(BOOT_FLAG_MAGIC | 0x03),
        ResetReason::BootloaderRunning
    );
}

#[test]
fn test_cleared_word_is_no_reason() {
    assert_eq!(ResetReason::from_raw(0), ResetReason::NoReason);
    assert_eq!(ResetReason::NoReason.to_raw(), 0);
}

#[test]
fn test_every_reason_survives_storage() {
    for reason in ResetReason::ALL {
        assert_eq!(ResetReason::from_raw(reason.to_raw()), reason);
    }
}

#[test]
fn test_unknown_code_with_magic_is_no_reason() {
    assert_eq!(
        ResetReason::from_raw(BOOT_FLAG_MAGIC | 0x04),
        ResetReason::NoReason
    );
    assert_eq!(
        ResetReason::from_raw(BOOT_FLAG_MAGIC | 0xFFFF),
        ResetReason::NoReason
    );
    assert_eq!(ResetReason::from_raw(BOOT_FLAG_MAGIC), ResetReason::NoReason);
}

#[test]
fn test_bare_code_without_magic_is_no_reason() {
    // A stray small value must not be mistaken for an armed flag
    assert_eq!(ResetReason::from_raw(0x01), ResetReason::NoReason);
    assert_eq!(ResetReason::from_raw(0x02), ResetReason::NoReason);
    assert_eq!(ResetReason::from_raw(0x03), ResetReason::NoReason);
}

#[test]
fn test_power_on_garbage_is_no_reason() {
    for raw in [0xFFFF_FFFF, 0xDEAD_BEEF, 0xB006_0002, 0x0007_0001, 0x5555_AAAA] {
        assert_eq!(ResetReason::from_raw(raw), ResetReason::NoReason, "raw {raw:#x}");
    }
}

// =============================================================================
// read_and_clear tests
// =============================================================================

#[test]
fn test_read_and_clear_returns_armed_reason() {
    let mut cell = Cell(ResetReason::JustUploaded.to_raw());
    assert_eq!(read_and_clear(&mut cell), ResetReason::JustUploaded);
}

#[test]
fn test_read_and_clear_clears_the_cell() {
    let mut cell = Cell(ResetReason::PersistentBootloader.to_raw());
    read_and_clear(&mut cell);
    assert_eq!(cell.0, 0);
}

#[test]
fn test_second_read_in_same_boot_is_no_reason() {
    for reason in ResetReason::ALL {
        let mut cell = Cell(reason.to_raw());
        assert_eq!(read_and_clear(&mut cell), reason);
        assert_eq!(read_and_clear(&mut cell), ResetReason::NoReason);
    }
}

#[test]
fn test_read_and_clear_clears_garbage_too() {
    let mut cell = Cell(0xDEAD_BEEF);
    assert_eq!(read_and_clear(&mut cell), ResetReason::NoReason);
    assert_eq!(cell.0, 0);
}

// =============================================================================
// arm tests
// =============================================================================

#[test]
fn test_arm_then_read_and_clear() {
    let mut cell = Cell(0);
    arm(&mut cell, ResetReason::BootloaderRunning);
    assert_eq!(read_and_clear(&mut cell), ResetReason::BootloaderRunning);
}

#[test]
fn test_arm_overwrites_previous_reason() {
    let mut cell = Cell(ResetReason::PersistentBootloader.to_raw());
    arm(&mut cell, ResetReason::JustUploaded);
    assert_eq!(read_and_clear(&mut cell), ResetReason::JustUploaded);
}

#[test]
fn test_arming_no_reason_clears() {
    let mut cell = Cell(ResetReason::PersistentBootloader.to_raw());
    arm(&mut cell, ResetReason::NoReason);
    assert_eq!(cell.0, 0);
}
