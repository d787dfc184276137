// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Boot mode decision - pure logic without hardware dependencies.
//!
//! The decision is computed once per boot from the consumed reset reason, the
//! image check and one sample of the USB sense pin. Nothing here touches
//! hardware, so every combination can be exercised on the host.

use crate::reset_reason::ResetReason;

/// Outcome of the boot mode decision (immutable).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BootDecision {
    /// Never hand off to the application this boot.
    pub skip_jump: bool,
    /// Do not wait for an upload before handing off.
    pub skip_wait: bool,
}

/// How the upload wait loop is allowed to end.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WaitPolicy {
    /// No waiting at all; hand off immediately.
    Bypass,
    /// Hand off after this many idle iterations.
    Bounded(u32),
    /// Only an upload can end the wait.
    Unbounded,
}

/// Combine the boot inputs into a decision.
///
/// | reason               | skip_jump    | skip_wait |
/// |----------------------|--------------|-----------|
/// | PersistentBootloader | true         | false     |
/// | JustUploaded         | false        | true      |
/// | BootloaderRunning    | true         | false     |
/// | NoReason             | !code_valid  | false     |
///
/// A present USB host then forces `skip_jump`, whatever the table said.
pub fn decide(reason: ResetReason, code_valid: bool, usb_present: bool) -> BootDecision {
    let mut decision = match reason {
        ResetReason::PersistentBootloader => BootDecision {
            skip_jump: true,
            skip_wait: false,
        },
        ResetReason::JustUploaded => BootDecision {
            skip_jump: false,
            skip_wait: true,
        },
        ResetReason::BootloaderRunning => BootDecision {
            skip_jump: true,
            skip_wait: false,
        },
        ResetReason::NoReason => BootDecision {
            skip_jump: !code_valid,
            skip_wait: false,
        },
    };

    if usb_present {
        decision.skip_jump = true;
    }

    decision
}

/// Whether `reason` gets the fast startup strobe.
///
/// Power-on (including garbage flag values) and explicit loader requests get
/// it; the two soft-reset paths stay dark.
pub fn wants_startup_strobe(reason: ResetReason) -> bool {
    matches!(
        reason,
        ResetReason::NoReason | ResetReason::PersistentBootloader
    )
}

impl BootDecision {
    /// Freeze the wait behaviour for this boot.
    ///
    /// `skip_jump` dominates `skip_wait`: a boot that must not hand off never
    /// bypasses the wait, since falling through would reach the handoff.
    ///
    /// So `JustUploaded` with a USB host still attached waits for another
    /// upload instead of running the new image; it stays resident until the
    /// cable is pulled and the board is reset.
    pub fn wait_policy(&self, bound: u32) -> WaitPolicy {
        if self.skip_jump {
            WaitPolicy::Unbounded
        } else if self.skip_wait {
            WaitPolicy::Bypass
        } else {
            WaitPolicy::Bounded(bound)
        }
    }
}
