// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! RP2040 implementation of the boot sequence collaborators.

use crate::handoff;
use crate::peripherals::Peripherals;
use crate::usb_upload::UsbUpload;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::InputPin;
use maple_common::flag::ScratchFlag;
use maple_common::image::{is_valid_application, MemoryLayout, VectorTable};
use maple_common::interfaces::{
    BootFlag, Cadence, ImageValidator, Indicator, Jumper, Polarity, SerialLoader, UploadSubsystem,
    UsbSense,
};
use maple_common::reset_reason::{self, ResetReason};
use rp2040_hal as hal;

pub struct RpBoard {
    p: Peripherals,
    usb: UsbUpload,
    flag: ScratchFlag,
}

impl RpBoard {
    pub fn new(p: Peripherals, usb: UsbUpload) -> Self {
        Self {
            p,
            usb,
            flag: unsafe { ScratchFlag::new() },
        }
    }
}

/// Delay that keeps the USB device serviced between milliseconds.
///
/// Strobes block for hundreds of milliseconds, far longer than a host waits
/// for a control transfer during enumeration.
struct ServicingDelay<'a> {
    timer: &'a mut hal::Timer,
    usb: &'a mut UsbUpload,
}

impl DelayNs for ServicingDelay<'_> {
    fn delay_ns(&mut self, ns: u32) {
        self.timer.delay_ns(ns);
    }

    fn delay_ms(&mut self, ms: u32) {
        for _ in 0..ms {
            self.timer.delay_ms(1);
            self.usb.poll();
        }
    }
}

impl BootFlag for RpBoard {
    fn read_and_clear_boot_flag(&mut self) -> ResetReason {
        reset_reason::read_and_clear(&mut self.flag)
    }
}

impl ImageValidator for RpBoard {
    fn is_valid_application(&self, addr: u32) -> bool {
        let vt = unsafe { VectorTable::read_from(addr) };
        let valid = is_valid_application(&vt, &MemoryLayout::at(addr));
        defmt::debug!(
            "Image at 0x{:08x}: sp=0x{:08x} reset=0x{:08x} valid={}",
            addr,
            vt.initial_sp,
            vt.reset_vector,
            valid
        );
        valid
    }
}

impl UsbSense for RpBoard {
    fn sample_usb_data_pin(&mut self) -> bool {
        self.p.usb_sense.is_high().unwrap_or(true)
    }
}

impl Indicator for RpBoard {
    fn strobe_indicator(&mut self, count: u32, cadence: Cadence, polarity: Polarity) {
        let mut delay = ServicingDelay {
            timer: &mut self.p.timer,
            usb: &mut self.usb,
        };
        maple_common::strobe(&mut self.p.led_pin, &mut delay, count, cadence, polarity);
    }
}

impl UploadSubsystem for RpBoard {
    fn upload_has_started(&mut self) -> bool {
        self.usb.poll();
        self.usb.take_touch()
    }

    fn finish_upload(&mut self) -> ! {
        defmt::println!("Upload requested, handing USB to the ROM loader");
        self.p.timer.delay_ms(10u32);
        handoff::enter_rom_upload()
    }
}

impl SerialLoader for RpBoard {
    /// There is no separate serial loader on this board; this only keeps the CDC port serviced.
    fn poll_serial_loader(&mut self) {
        self.usb.poll();
    }
}

impl Jumper for RpBoard {
    fn jump_to_application(&mut self, addr: u32) -> ! {
        defmt::println!("Jumping to application at 0x{:08x}", addr);
        self.p.timer.delay_ms(10u32);
        unsafe { handoff::jump_to_application(addr) }
    }
}
