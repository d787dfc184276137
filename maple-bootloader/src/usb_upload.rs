// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! USB CDC port that a host uses to request an upload.
//!
//! The port carries no protocol. A host asks for an upload with the usual
//! "1200 baud touch": it opens the port at 1200 baud and closes it again,
//! which shows up here as that line coding with DTR dropped. The image itself
//! is then written through the ROM mass-storage loader.

use maple_common::layout::{UPLOAD_TOUCH_BAUD, USB_PID, USB_VID};
use rp2040_hal::usb::UsbBus;
use usb_device::class_prelude::UsbBusAllocator;
use usb_device::prelude::*;
use usbd_serial::SerialPort;

pub struct UsbUpload {
    serial: SerialPort<'static, UsbBus>,
    usb_dev: UsbDevice<'static, UsbBus>,
    touched: bool,
}

impl UsbUpload {
    pub fn new(usb_bus: &'static UsbBusAllocator<UsbBus>) -> Self {
        let serial = SerialPort::new(usb_bus);
        let Ok(builder) = UsbDeviceBuilder::new(usb_bus, UsbVidPid(USB_VID, USB_PID)).strings(&[
            StringDescriptors::default()
                .manufacturer("ADNT")
                .product("Maple Bootloader")
                .serial_number("0001"),
        ]) else {
            cortex_m::peripheral::SCB::sys_reset();
        };
        let usb_dev = builder.device_class(usbd_serial::USB_CLASS_CDC).build();

        Self {
            serial,
            usb_dev,
            touched: false,
        }
    }

    /// Service the USB device. Must be called at least every few milliseconds.
    pub fn poll(&mut self) {
        if self.usb_dev.poll(&mut [&mut self.serial]) {
            // Nothing is read from the host; drop whatever it sends.
            let mut sink = [0u8; 64];
            while let Ok(n) = self.serial.read(&mut sink) {
                if n == 0 {
                    break;
                }
            }
        }

        if self.serial.line_coding().data_rate() == UPLOAD_TOUCH_BAUD && !self.serial.dtr() {
            self.touched = true;
        }
    }

    /// Whether a touch was seen since the last call.
    pub fn take_touch(&mut self) -> bool {
        core::mem::replace(&mut self.touched, false)
    }
}
