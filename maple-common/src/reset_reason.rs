// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Reset reason carried across soft resets in a single persistent word.
//!
//! The word is written by whoever asks for the next boot to behave differently
//! (the upload path, or firmware requesting the loader) and is consumed exactly
//! once by the bootloader. Reading clears it, so an uncontrolled reset after
//! that point (watchdog, brown-out) falls back to the power-on behaviour.

use crate::layout::{BOOT_FLAG_MAGIC, BOOT_FLAG_MAGIC_MASK};

/// Why the previous boot cycle ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ResetReason {
    /// Power-on, or nothing was armed.
    NoReason,
    /// Stay in the loader until an upload happens.
    PersistentBootloader,
    /// A new image was just written; run it without waiting.
    JustUploaded,
    /// The loader itself was the running image.
    BootloaderRunning,
}

impl ResetReason {
    /// All variants, in code order.
    pub const ALL: [ResetReason; 4] = [
        ResetReason::NoReason,
        ResetReason::PersistentBootloader,
        ResetReason::JustUploaded,
        ResetReason::BootloaderRunning,
    ];

    /// Decode a raw flag word. Anything that is not a known armed value is `NoReason`.
    pub fn from_raw(raw: u32) -> Self {
        if raw & BOOT_FLAG_MAGIC_MASK != BOOT_FLAG_MAGIC {
            return ResetReason::NoReason;
        }
        match raw & !BOOT_FLAG_MAGIC_MASK {
            0x01 => ResetReason::PersistentBootloader,
            0x02 => ResetReason::JustUploaded,
            0x03 => ResetReason::BootloaderRunning,
            _ => ResetReason::NoReason,
        }
    }

    /// Encode for storage. `NoReason` is the cleared word.
    pub fn to_raw(self) -> u32 {
        match self {
            ResetReason::NoReason => 0,
            ResetReason::PersistentBootloader => BOOT_FLAG_MAGIC | 0x01,
            ResetReason::JustUploaded => BOOT_FLAG_MAGIC | 0x02,
            ResetReason::BootloaderRunning => BOOT_FLAG_MAGIC | 0x03,
        }
    }
}

/// Storage for the persistent flag word.
pub trait FlagCell {
    fn load(&self) -> u32;
    fn store(&mut self, raw: u32);
}

/// Read the reset reason and clear the cell.
pub fn read_and_clear(cell: &mut impl FlagCell) -> ResetReason {
    let raw = cell.load();
    cell.store(0);
    ResetReason::from_raw(raw)
}

/// Arm the cell so the next boot sees `reason`.
pub fn arm(cell: &mut impl FlagCell, reason: ResetReason) {
    cell.store(reason.to_raw());
}
