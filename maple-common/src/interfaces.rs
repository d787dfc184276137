// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Collaborator contracts the boot sequence is written against.
//!
//! Board code implements these on top of real peripherals; the host tests
//! implement them with recording doubles. Clock, flash and USB stack setup
//! happen before any of them is called.

use crate::reset_reason::ResetReason;

/// LED strobe speed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Cadence {
    Fast,
    Slow,
}

/// Pin level that lights the indicator LED.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Polarity {
    ActiveHigh,
    ActiveLow,
}

/// The persistent reset reason flag.
pub trait BootFlag {
    /// Return the armed reason and clear it. Called once per boot.
    fn read_and_clear_boot_flag(&mut self) -> ResetReason;
}

/// Application image check.
pub trait ImageValidator {
    /// Whether a runnable image starts at `addr`. Must not have side effects.
    fn is_valid_application(&self, addr: u32) -> bool;
}

/// USB attach sensing.
pub trait UsbSense {
    /// `true` when no host is pulling the data line (USB absent).
    fn sample_usb_data_pin(&mut self) -> bool;
}

/// Operator feedback LED.
pub trait Indicator {
    fn strobe_indicator(&mut self, count: u32, cadence: Cadence, polarity: Polarity);
}

/// The upload subsystem.
pub trait UploadSubsystem {
    /// Non-blocking: has the host just started an upload?
    fn upload_has_started(&mut self) -> bool;

    /// Carry the upload through. Ends in a full system reset.
    fn finish_upload(&mut self) -> !;
}

/// Secondary loader that needs regular servicing while we wait.
pub trait SerialLoader {
    fn poll_serial_loader(&mut self);
}

/// Transfer of control to the application.
pub trait Jumper {
    fn jump_to_application(&mut self, addr: u32) -> !;
}

/// Everything the boot sequence needs from a board.
pub trait Board:
    BootFlag + ImageValidator + UsbSense + Indicator + UploadSubsystem + SerialLoader + Jumper
{
}

impl<T> Board for T where
    T: BootFlag + ImageValidator + UsbSense + Indicator + UploadSubsystem + SerialLoader + Jumper
{
}
