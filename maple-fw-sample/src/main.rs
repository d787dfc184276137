// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Sample application for the maple bootloader.
//!
//! Blinks the LED and offers a small USB serial console. Holding the button
//! on GP3, or typing `bootload`, reboots into the loader and keeps it there
//! until a new image is uploaded.

#![no_std]
#![no_main]

use defmt_rtt as _;
use embedded_hal::digital::{InputPin, OutputPin, StatefulOutputPin};
use maple_common::flag;
use maple_common::{Cadence, Polarity};
use panic_probe as _;
use rp2040_hal as hal;
use rp2040_hal::usb::UsbBus;
use usb_device::class_prelude::UsbBusAllocator;
use usb_device::prelude::*;
use usbd_serial::SerialPort;

defmt::timestamp!("{=u64:us}", { 0 });

use cortex_m_rt::entry;

const USB_PID_APP: u16 = 0x000B;
const HEARTBEAT_US: u64 = 500_000;

/// Static storage for UsbBusAllocator (required by usb-device for 'static lifetime).
static mut USB_BUS: Option<UsbBusAllocator<UsbBus>> = None;

enum Action {
    None,
    Bootload,
    Reboot,
}

fn process_command(line: &str, serial: &mut SerialPort<UsbBus>) -> Action {
    match line.trim() {
        "help" | "?" => {
            let _ = serial.write(b"Available commands:\r\n");
            let _ = serial.write(b"  help     - Show this help\r\n");
            let _ = serial.write(b"  bootload - Reboot and stay in the bootloader\r\n");
            let _ = serial.write(b"  reboot   - Reboot normally\r\n");
            Action::None
        }
        "bootload" => {
            let _ = serial.write(b"Rebooting to bootloader...\r\n");
            Action::Bootload
        }
        "reboot" => {
            let _ = serial.write(b"Rebooting...\r\n");
            Action::Reboot
        }
        "" => Action::None,
        _ => {
            let _ = serial.write(b"Unknown command. Type 'help' for available commands.\r\n");
            Action::None
        }
    }
}

#[entry]
fn main() -> ! {
    defmt::println!("Application started");

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
        flag::reboot();
    };

    let mut timer = hal::Timer::new(pac.TIMER, &mut pac.RESETS, &clocks);
    let sio = hal::Sio::new(pac.SIO);
    let pins = hal::gpio::Pins::new(
        pac.IO_BANK0,
        pac.PADS_BANK0,
        sio.gpio_bank0,
        &mut pac.RESETS,
    );

    let mut led_pin = pins.gpio25.into_push_pull_output();
    let mut button = pins.gpio3.into_pull_up_input();

    // Signal that the handoff worked
    maple_common::strobe(&mut led_pin, &mut timer, 3, Cadence::Fast, Polarity::ActiveHigh);

    let usb_bus = unsafe {
        USB_BUS = Some(UsbBusAllocator::new(UsbBus::new(
            pac.USBCTRL_REGS,
            pac.USBCTRL_DPRAM,
            clocks.usb_clock,
            true,
            &mut pac.RESETS,
        )));
        match (*core::ptr::addr_of!(USB_BUS)).as_ref() {
            Some(bus) => bus,
            None => flag::reboot(),
        }
    };

    let mut serial = SerialPort::new(usb_bus);
    let Ok(builder) = UsbDeviceBuilder::new(
        usb_bus,
        UsbVidPid(maple_common::layout::USB_VID, USB_PID_APP),
    )
    .strings(&[StringDescriptors::default()
        .manufacturer("ADNT")
        .product("Maple Sample Firmware")
        .serial_number("FW001")]) else {
        flag::reboot();
    };
    let mut usb_dev = builder.device_class(usbd_serial::USB_CLASS_CDC).build();

    defmt::println!("USB CDC initialized, type 'help' on the console");

    let mut cmd_buf = [0u8; 64];
    let mut cmd_pos = 0usize;
    let mut last_toggle = timer.get_counter();

    loop {
        usb_dev.poll(&mut [&mut serial]);

        if button.is_low().unwrap_or(false) {
            defmt::println!("Button held, rebooting to bootloader");
            flag::reboot_to_bootloader();
        }

        let mut buf = [0u8; 64];
        if let Ok(count) = serial.read(&mut buf) {
            for &byte in &buf[..count] {
                let _ = serial.write(&[byte]);

                if byte == b'\r' || byte == b'\n' {
                    let _ = serial.write(b"\r\n");
                    if cmd_pos == 0 {
                        continue;
                    }

                    let action = match core::str::from_utf8(&cmd_buf[..cmd_pos]) {
                        Ok(line) => process_command(line, &mut serial),
                        Err(_) => Action::None,
                    };
                    cmd_pos = 0;

                    if !matches!(action, Action::None) {
                        // Let the reply reach the host
                        for _ in 0..100 {
                            usb_dev.poll(&mut [&mut serial]);
                            cortex_m::asm::delay(10_000);
                        }
                    }
                    match action {
                        Action::Bootload => flag::reboot_to_bootloader(),
                        Action::Reboot => flag::reboot(),
                        Action::None => {}
                    }
                } else if byte == 0x7F || byte == 0x08 {
                    if cmd_pos > 0 {
                        cmd_pos -= 1;
                        let _ = serial.write(b"\x08 \x08");
                    }
                } else if cmd_pos < cmd_buf.len() {
                    cmd_buf[cmd_pos] = byte;
                    cmd_pos += 1;
                }
            }
        }

        let now = timer.get_counter();
        if (now - last_toggle).to_micros() >= HEARTBEAT_US {
            last_toggle = now;
            if led_pin.is_set_high().unwrap_or(false) {
                led_pin.set_low().ok();
            } else {
                led_pin.set_high().ok();
            }
        }
    }
}
