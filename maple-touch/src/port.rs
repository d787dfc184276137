// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Serial port discovery and the 1200 baud touch.

use anyhow::{bail, Context, Result};
use serialport::{SerialPortInfo, SerialPortType};
use std::time::Duration;

use maple_common::layout::{UPLOAD_TOUCH_BAUD, USB_PID, USB_VID};

/// How long the port is held open at the touch baud rate.
const TOUCH_HOLD_MS: u64 = 50;

/// Whether a port belongs to a device in bootloader wait mode.
pub fn is_bootloader_port(info: &SerialPortInfo) -> bool {
    match &info.port_type {
        SerialPortType::UsbPort(usb) => usb.vid == USB_VID && usb.pid == USB_PID,
        _ => false,
    }
}

/// Ports currently enumerated by a bootloader.
pub fn bootloader_ports() -> Result<Vec<SerialPortInfo>> {
    let ports = serialport::available_ports().context("Failed to enumerate serial ports")?;
    Ok(ports.into_iter().filter(is_bootloader_port).collect())
}

/// Pick the port to touch.
///
/// An explicit name always wins. Otherwise exactly one bootloader port must be
/// present, so the tool never guesses between two boards.
pub fn select_port(candidates: &[SerialPortInfo], requested: Option<&str>) -> Result<String> {
    if let Some(name) = requested {
        return Ok(name.to_string());
    }

    match candidates {
        [] => bail!(
            "No bootloader found (USB {:04x}:{:04x}); is the board in its wait window?",
            USB_VID,
            USB_PID
        ),
        [only] => Ok(only.port_name.clone()),
        many => {
            let names: Vec<&str> = many.iter().map(|p| p.port_name.as_str()).collect();
            bail!(
                "Several bootloaders found ({}); pick one with --port",
                names.join(", ")
            )
        }
    }
}

/// Open `port_name` at the touch baud rate and close it with DTR dropped.
pub fn touch(port_name: &str) -> Result<()> {
    let mut port = serialport::new(port_name, UPLOAD_TOUCH_BAUD)
        .timeout(Duration::from_millis(TOUCH_HOLD_MS))
        .open()
        .with_context(|| format!("Failed to open serial port {}", port_name))?;

    port.write_data_terminal_ready(true)
        .map_err(|e| anyhow::anyhow!("Failed to raise DTR: {}", e))?;
    std::thread::sleep(Duration::from_millis(TOUCH_HOLD_MS));

    // The device may already be gone by the time DTR drops.
    let _ = port.write_data_terminal_ready(false);
    Ok(())
}

/// Whether `port_name` is still enumerated.
pub fn is_present(port_name: &str) -> Result<bool> {
    let ports = serialport::available_ports().context("Failed to enumerate serial ports")?;
    Ok(ports.iter().any(|p| p.port_name == port_name))
}
