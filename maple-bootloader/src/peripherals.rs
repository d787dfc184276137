// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Peripheral initialization for the bootloader.
//!
//! Every HAL constructor below takes its block through RESETS, so the
//! peripherals we touch start from reset state even after a soft reset.
//! Flash needs no setup: boot2 already configured XIP before `main`.

use rp2040_hal as hal;
use rp2040_hal::usb::UsbBus;
use usb_device::class_prelude::UsbBusAllocator;

pub type LedPin =
    hal::gpio::Pin<hal::gpio::bank0::Gpio25, hal::gpio::FunctionSioOutput, hal::gpio::PullDown>;
/// Wired to the USB attach/data line; a host pulls it low.
pub type UsbSensePin =
    hal::gpio::Pin<hal::gpio::bank0::Gpio2, hal::gpio::FunctionSioInput, hal::gpio::PullUp>;

pub const LED_GPIO: u32 = 25;

/// Static storage for UsbBusAllocator (required by usb-device for 'static lifetime).
static mut USB_BUS: Option<UsbBusAllocator<UsbBus>> = None;

fn store_usb_bus(bus: UsbBusAllocator<UsbBus>) -> &'static UsbBusAllocator<UsbBus> {
    unsafe {
        USB_BUS = Some(bus);
        match (*core::ptr::addr_of!(USB_BUS)).as_ref() {
            Some(bus) => bus,
            None => cortex_m::peripheral::SCB::sys_reset(),
        }
    }
}

pub struct Peripherals {
    pub led_pin: LedPin,
    pub usb_sense: UsbSensePin,
    pub timer: hal::Timer,
    pub usb_bus: &'static UsbBusAllocator<UsbBus>,
}

/// Bring up clocks, GPIO and the USB bus.
///
/// There is nothing to report a failure to at this point, so a clock setup
/// failure resets the chip and tries again.
pub fn init() -> Peripherals {
    let mut pac = unsafe { hal::pac::Peripherals::steal() };

    let mut watchdog = hal::Watchdog::new(pac.WATCHDOG);
    let Ok(clocks) = hal::clocks::init_clocks_and_plls(
        12_000_000u32,
        pac.XOSC,
        pac.CLOCKS,
        pac.PLL_SYS,
        pac.PLL_USB,
        &mut pac.RESETS,
        &mut watchdog,
    ) else {
        cortex_m::peripheral::SCB::sys_reset();
    };

    let timer = hal::Timer::new(pac.TIMER, &mut pac.RESETS, &clocks);
    let sio = hal::Sio::new(pac.SIO);
    let pins = hal::gpio::Pins::new(
        pac.IO_BANK0,
        pac.PADS_BANK0,
        sio.gpio_bank0,
        &mut pac.RESETS,
    );

    let usb_bus = store_usb_bus(UsbBusAllocator::new(UsbBus::new(
        pac.USBCTRL_REGS,
        pac.USBCTRL_DPRAM,
        clocks.usb_clock,
        true,
        &mut pac.RESETS,
    )));

    Peripherals {
        led_pin: pins.gpio25.into_push_pull_output(),
        usb_sense: pins.gpio2.into_pull_up_input(),
        timer,
        usb_bus,
    }
}
