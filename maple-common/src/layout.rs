// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Memory map and timing constants shared by the bootloader and firmware.

// --- Flash layout ---

pub const FLASH_BASE: u32 = 0x1000_0000;
pub const FLASH_END: u32 = 0x1020_0000; // 2MB external QSPI flash

/// Application image start. The bootloader owns the first 64KB.
pub const APP_ADDR: u32 = 0x1001_0000;

// --- SRAM ---

pub const RAM_START: u32 = 0x2000_0000;
pub const RAM_END: u32 = 0x2004_2000; // striped banks + SRAM4/5

// --- Boot flag ---

/// Upper half of an armed boot flag word. The lower half carries the reason code.
pub const BOOT_FLAG_MAGIC: u32 = 0xB007_0000;
pub const BOOT_FLAG_MAGIC_MASK: u32 = 0xFFFF_0000;

/// Watchdog SCRATCH0. The eight scratch words follow it.
pub const WATCHDOG_SCRATCH0: u32 = 0x4005_800C;

/// Watchdog SCRATCH2: kept across soft and watchdog resets, cleared on power-on.
///
/// SCRATCH0/1 and 4..7 belong to the ROM: `reset_to_usb_boot` passes its arguments through
/// SCRATCH0/1 and the watchdog boot vector lives in SCRATCH4..7.
pub const BOOT_FLAG_ADDR: u32 = WATCHDOG_SCRATCH0 + 2 * 4;

// --- Wait loop and indicator ---

/// Slow strobes to wait for an upload before handing off to the application.
pub const BOOTLOADER_WAIT_ITERATIONS: u32 = 6;

pub const STARTUP_BLINKS: u32 = 5;
pub const FAST_STROBE_MS: u32 = 50;
pub const SLOW_STROBE_MS: u32 = 150;

// --- USB ---

/// Line coding a host selects to ask for an upload (the "1200 baud touch").
pub const UPLOAD_TOUCH_BAUD: u32 = 1200;

pub const USB_VID: u16 = 0x2E8A;
pub const USB_PID: u16 = 0x000A;
