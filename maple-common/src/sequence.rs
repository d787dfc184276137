// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! The boot sequence: reset reason, decision, feedback, wait, handoff.
//!
//! All inputs are sampled before the first strobe, so the decision is frozen
//! before any waiting starts. The handoff is reachable only through
//! `WaitPolicy::Bypass` or an expired `WaitPolicy::Bounded`, and
//! `BootDecision::wait_policy` hands out neither when `skip_jump` is set.

use crate::decision::{decide, wants_startup_strobe, WaitPolicy};
use crate::interfaces::{Board, Cadence, Polarity};
use crate::layout::{APP_ADDR, BOOTLOADER_WAIT_ITERATIONS, STARTUP_BLINKS};
use crate::reset_reason::ResetReason;
use crate::wait_loop::{wait_bounded, wait_unbounded};

/// Per-board boot parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BootConfig {
    pub app_addr: u32,
    pub wait_iterations: u32,
    pub startup_blinks: u32,
    pub polarity: Polarity,
}

impl BootConfig {
    pub const DEFAULT: BootConfig = BootConfig {
        app_addr: APP_ADDR,
        wait_iterations: BOOTLOADER_WAIT_ITERATIONS,
        startup_blinks: STARTUP_BLINKS,
        polarity: Polarity::ActiveHigh,
    };
}

impl Default for BootConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Inputs sampled at the start of a boot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BootInputs {
    pub reason: ResetReason,
    pub code_valid: bool,
    pub usb_present: bool,
}

/// Consume the flag, check the image and sample the USB pin, in that order.
pub fn sample_inputs<B: Board>(board: &mut B, config: &BootConfig) -> BootInputs {
    let reason = board.read_and_clear_boot_flag();
    let code_valid = board.is_valid_application(config.app_addr);
    let usb_present = !board.sample_usb_data_pin();
    BootInputs {
        reason,
        code_valid,
        usb_present,
    }
}

/// Run the boot sequence to its end: an application handoff or an upload reset.
pub fn run_boot<B: Board>(board: &mut B, config: &BootConfig) -> ! {
    let inputs = sample_inputs(board, config);
    let decision = decide(inputs.reason, inputs.code_valid, inputs.usb_present);
    let policy = decision.wait_policy(config.wait_iterations);

    #[cfg(feature = "defmt")]
    defmt::info!(
        "Boot: reason={} code_valid={} usb_present={} -> {} {}",
        inputs.reason,
        inputs.code_valid,
        inputs.usb_present,
        decision,
        policy
    );

    if wants_startup_strobe(inputs.reason) {
        board.strobe_indicator(config.startup_blinks, Cadence::Fast, config.polarity);
    }

    match policy {
        WaitPolicy::Unbounded => wait_unbounded(config.polarity, board),
        WaitPolicy::Bounded(bound) => {
            wait_bounded(bound, config.polarity, board);
        }
        WaitPolicy::Bypass => {}
    }

    #[cfg(feature = "defmt")]
    defmt::info!("Handing off to 0x{:08x}", config.app_addr);

    board.jump_to_application(config.app_addr)
}
