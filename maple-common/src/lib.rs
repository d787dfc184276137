// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Boot-mode decision core for the maple bootloader.
//!
//! This crate supports both `no_std` (embedded) and `std` (host) environments:
//! - Default: `no_std` mode, pure logic only
//! - `std` feature: builds against `std` for host tooling
//! - `embedded` feature: RP2040 flag cell, reboot helpers and LED strobe
//! - `defmt` feature: `defmt::Format` derives and decision logging

#![cfg_attr(not(feature = "std"), no_std)]

pub mod decision;
pub mod image;
pub mod interfaces;
pub mod layout;
pub mod reset_reason;
pub mod sequence;
pub mod wait_loop;

// Boot flag cell and reboot helpers (requires embedded feature)
#[cfg(feature = "embedded")]
pub mod flag;

// Re-export commonly used types
pub use decision::{decide, wants_startup_strobe, BootDecision, WaitPolicy};
pub use image::{is_valid_application, MemoryLayout, VectorTable};
pub use interfaces::{
    Board, BootFlag, Cadence, ImageValidator, Indicator, Jumper, Polarity, SerialLoader,
    UploadSubsystem, UsbSense,
};
pub use reset_reason::{FlagCell, ResetReason};
pub use sequence::{run_boot, BootConfig};
pub use wait_loop::{WaitLoop, WaitState};

// Embedded-specific exports (only with embedded feature)
#[cfg(feature = "embedded")]
use embedded_hal::delay::DelayNs;
#[cfg(feature = "embedded")]
use embedded_hal::digital::OutputPin;

/// Map a cadence to its half-period in milliseconds.
pub fn cadence_period_ms(cadence: Cadence) -> u32 {
    match cadence {
        Cadence::Fast => layout::FAST_STROBE_MS,
        Cadence::Slow => layout::SLOW_STROBE_MS,
    }
}

/// Strobe an LED `count` times, leaving it off.
#[cfg(feature = "embedded")]
pub fn strobe(
    led: &mut impl OutputPin,
    timer: &mut impl DelayNs,
    count: u32,
    cadence: Cadence,
    polarity: Polarity,
) {
    let period_ms = cadence_period_ms(cadence);
    for _ in 0..count {
        set_led(led, true, polarity);
        timer.delay_ms(period_ms);
        set_led(led, false, polarity);
        timer.delay_ms(period_ms);
    }
}

#[cfg(feature = "embedded")]
fn set_led(led: &mut impl OutputPin, lit: bool, polarity: Polarity) {
    let high = match polarity {
        Polarity::ActiveHigh => lit,
        Polarity::ActiveLow => !lit,
    };
    if high {
        led.set_high().ok();
    } else {
        led.set_low().ok();
    }
}
