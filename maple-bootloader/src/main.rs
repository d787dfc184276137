// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Maple bootloader for RP2040: wait for a USB upload, then run the application.

#![no_std]
#![no_main]

mod board;
mod handoff;
mod peripherals;
mod usb_upload;

use defmt_rtt as _;
use panic_probe as _;

defmt::timestamp!("{=u64:us}", { 0 });

use cortex_m_rt::entry;
use maple_common::sequence::{run_boot, BootConfig};

#[unsafe(link_section = ".boot2")]
#[used]
pub static BOOT2: [u8; 256] = rp2040_boot2::BOOT_LOADER_GENERIC_03H;

#[entry]
fn main() -> ! {
    defmt::println!("Bootloader init");

    let p = peripherals::init();
    let usb = usb_upload::UsbUpload::new(p.usb_bus);
    let mut board = board::RpBoard::new(p, usb);

    run_boot(&mut board, &BootConfig::DEFAULT)
}
