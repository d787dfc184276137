// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Terminal transfers of control: into the application, or into the ROM
//! USB loader for an upload.

use crate::peripherals::LED_GPIO;
use maple_common::flag::ScratchFlag;
use maple_common::image::VectorTable;
use maple_common::reset_reason::{arm, ResetReason};

/// Hand control to the application image at `addr` (execute in place).
///
/// # Safety
/// `addr` must hold an image whose vector table passed validation.
pub unsafe fn jump_to_application(addr: u32) -> ! {
    prepare_for_firmware_handoff();
    relocate_vector_table(addr);

    let vt = VectorTable::read_from(addr);
    jump_to_firmware(vt.initial_sp, vt.reset_vector);
}

/// Hand the USB controller to the ROM mass-storage loader.
///
/// The ROM stores its arguments in SCRATCH0/1 and later reboots through the
/// watchdog once the image is written. Neither touches the flag in SCRATCH2,
/// so the next boot sees `JustUploaded`.
pub fn enter_rom_upload() -> ! {
    cortex_m::interrupt::disable();

    let mut flag = unsafe { ScratchFlag::new() };
    arm(&mut flag, ResetReason::JustUploaded);
    cortex_m::asm::dsb();

    // Blink the LED on USB activity while the ROM loader runs
    rp2040_hal::rom_data::reset_to_usb_boot(1 << LED_GPIO, 0);

    loop {
        cortex_m::asm::wfi();
    }
}

/// Quiesce everything the bootloader started so the application sees a clean
/// core. Clocks stay configured; the SDK runtime reinitializes them safely.
unsafe fn prepare_for_firmware_handoff() {
    // Disable all interrupts
    cortex_m::interrupt::disable();

    // Stop SysTick
    const SYST_CSR: *mut u32 = 0xE000_E010 as *mut u32;
    SYST_CSR.write_volatile(0);

    // Clear all pending interrupts in NVIC
    const NVIC_ICPR: *mut u32 = 0xE000_E280 as *mut u32;
    NVIC_ICPR.write_volatile(0xFFFF_FFFF);

    // Disable all NVIC interrupts
    const NVIC_ICER: *mut u32 = 0xE000_E180 as *mut u32;
    NVIC_ICER.write_volatile(0xFFFF_FFFF);

    // Hold USBCTRL in reset so the host sees the loader's CDC port go away
    const RESETS_RESET: *mut u32 = 0x4000_C000 as *mut u32;
    const USBCTRL_RESET_BIT: u32 = 1 << 24;
    let reset = RESETS_RESET.read_volatile();
    RESETS_RESET.write_volatile(reset | USBCTRL_RESET_BIT);

    cortex_m::asm::dsb();
    cortex_m::asm::isb();
}

unsafe fn relocate_vector_table(addr: u32) {
    const SCB_VTOR: *mut u32 = 0xE000_ED08 as *mut u32;
    SCB_VTOR.write_volatile(addr);

    cortex_m::asm::dsb();
    cortex_m::asm::isb();
}

unsafe fn jump_to_firmware(initial_sp: u32, reset_vector: u32) -> ! {
    core::arch::asm!(
        "msr msp, {sp}",
        "cpsie i",  // Re-enable interrupts before jumping (SDK expects PRIMASK=0)
        "bx {reset}",
        sp = in(reg) initial_sp,
        reset = in(reg) reset_vector,
        options(noreturn)
    );
}
