// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Application image plausibility checks.
//!
//! Only the first two vector table words are inspected. A valid image starts
//! with an initial stack pointer inside SRAM and a Thumb reset vector that
//! points back into its own flash region. Erased (`0xFFFF_FFFF`) or zeroed
//! flash fails both tests.

use crate::layout::{APP_ADDR, FLASH_END, RAM_END, RAM_START};

/// The two words at the start of a Cortex-M image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct VectorTable {
    pub initial_sp: u32,
    pub reset_vector: u32,
}

impl VectorTable {
    pub fn from_words(initial_sp: u32, reset_vector: u32) -> Self {
        Self {
            initial_sp,
            reset_vector,
        }
    }

    /// Read the vector table at `addr` via volatile reads.
    ///
    /// # Safety
    /// `addr` must point to at least 8 readable, word-aligned bytes.
    pub unsafe fn read_from(addr: u32) -> Self {
        Self {
            initial_sp: (addr as *const u32).read_volatile(),
            reset_vector: (addr as *const u32).offset(1).read_volatile(),
        }
    }
}

/// Address ranges an image is checked against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemoryLayout {
    pub app_addr: u32,
    pub flash_end: u32,
    pub ram_start: u32,
    pub ram_end: u32,
}

impl MemoryLayout {
    pub const DEFAULT: MemoryLayout = MemoryLayout {
        app_addr: APP_ADDR,
        flash_end: FLASH_END,
        ram_start: RAM_START,
        ram_end: RAM_END,
    };

    /// Same map with the image placed at `app_addr`.
    pub fn at(app_addr: u32) -> Self {
        Self {
            app_addr,
            ..Self::DEFAULT
        }
    }

    fn stack_in_ram(&self, sp: u32) -> bool {
        // The stack grows down, so the top-of-RAM address itself is a valid start.
        sp > self.ram_start && sp <= self.ram_end && sp & 0x3 == 0
    }

    fn entry_in_image(&self, reset_vector: u32) -> bool {
        if reset_vector & 1 == 0 {
            return false;
        }
        let entry = reset_vector & !1;
        // 8 bytes in: the entry cannot overlap the two words we just read.
        entry >= self.app_addr.saturating_add(8) && entry < self.flash_end
    }
}

/// Whether `vt` looks like the start of a runnable application in `layout`.
pub fn is_valid_application(vt: &VectorTable, layout: &MemoryLayout) -> bool {
    layout.stack_in_ram(vt.initial_sp) && layout.entry_in_image(vt.reset_vector)
}
