// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Boot flag cell in the RP2040 watchdog scratch register, and reboot helpers.
//!
//! The scratch words survive `SCB::sys_reset()` and watchdog resets but are
//! cleared by a power-on reset, which is exactly the lifetime the reset reason
//! needs. SCRATCH2 is used because the ROM overwrites SCRATCH0/1 when entering
//! the USB loader and owns SCRATCH4..7.
//!
//! Firmware uses `reboot_to_bootloader()` to come back to the loader and stay
//! there until a new image is uploaded.

use crate::layout::BOOT_FLAG_ADDR;
use crate::reset_reason::{arm, FlagCell, ResetReason};

/// The boot flag word in watchdog SCRATCH2.
pub struct ScratchFlag {
    addr: u32,
}

impl ScratchFlag {
    /// # Safety
    /// Only one `ScratchFlag` may be live; the register is not otherwise synchronized.
    pub unsafe fn new() -> Self {
        Self {
            addr: BOOT_FLAG_ADDR,
        }
    }
}

impl FlagCell for ScratchFlag {
    fn load(&self) -> u32 {
        unsafe { (self.addr as *const u32).read_volatile() }
    }

    fn store(&mut self, raw: u32) {
        unsafe { (self.addr as *mut u32).write_volatile(raw) }
    }
}

/// Arm `reason` and reset the chip.
pub fn reboot_with_reason(reason: ResetReason) -> ! {
    cortex_m::interrupt::disable();

    let mut flag = unsafe { ScratchFlag::new() };
    arm(&mut flag, reason);

    // Make sure the write lands before the reset request
    cortex_m::asm::dsb();

    cortex_m::peripheral::SCB::sys_reset();
}

/// Reboot into the loader and stay there until an upload.
pub fn reboot_to_bootloader() -> ! {
    reboot_with_reason(ResetReason::PersistentBootloader)
}

/// Reboot normally.
pub fn reboot() -> ! {
    reboot_with_reason(ResetReason::NoReason)
}
