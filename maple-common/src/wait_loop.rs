// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Upload wait loop.
//!
//! Each iteration strobes the LED once at the slow cadence, asks the upload
//! subsystem whether a host has started an upload, then services the serial
//! loader. An upload start is terminal: `finish_upload` resets the chip.
//! Otherwise the loop ends only when a bounded policy runs out.

use crate::decision::WaitPolicy;
use crate::interfaces::{Cadence, Indicator, Polarity, SerialLoader, UploadSubsystem};

/// Wait loop states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum WaitState {
    /// Polling for an upload.
    Waiting,
    /// Host started an upload; control is with the upload subsystem.
    UploadInProgress,
    /// Bound expired without an upload.
    Done,
}

pub struct WaitLoop {
    bound: Option<u32>,
    iterations: u32,
    state: WaitState,
    polarity: Polarity,
}

impl WaitLoop {
    pub fn new(policy: WaitPolicy, polarity: Polarity) -> Self {
        let (bound, state) = match policy {
            WaitPolicy::Bypass | WaitPolicy::Bounded(0) => (Some(0), WaitState::Done),
            WaitPolicy::Bounded(n) => (Some(n), WaitState::Waiting),
            WaitPolicy::Unbounded => (None, WaitState::Waiting),
        };
        Self {
            bound,
            iterations: 0,
            state,
            polarity,
        }
    }

    pub fn state(&self) -> WaitState {
        self.state
    }

    /// Idle iterations completed so far.
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    /// Run one iteration. Does not return if an upload starts.
    pub fn step<H>(&mut self, hw: &mut H) -> WaitState
    where
        H: Indicator + UploadSubsystem + SerialLoader,
    {
        if self.state != WaitState::Waiting {
            return self.state;
        }

        hw.strobe_indicator(1, Cadence::Slow, self.polarity);

        if hw.upload_has_started() {
            self.state = WaitState::UploadInProgress;
            #[cfg(feature = "defmt")]
            defmt::info!("Upload started after {} iterations", self.iterations);
            hw.finish_upload();
        }

        hw.poll_serial_loader();

        self.iterations = self.iterations.saturating_add(1);
        if let Some(bound) = self.bound {
            if self.iterations >= bound {
                self.state = WaitState::Done;
            }
        }

        self.state
    }
}

/// Wait at most `bound` iterations, returning how many ran.
pub fn wait_bounded<H>(bound: u32, polarity: Polarity, hw: &mut H) -> u32
where
    H: Indicator + UploadSubsystem + SerialLoader,
{
    let mut wait = WaitLoop::new(WaitPolicy::Bounded(bound), polarity);
    while wait.step(hw) == WaitState::Waiting {}
    wait.iterations()
}

/// Wait until an upload starts. Never returns.
pub fn wait_unbounded<H>(polarity: Polarity, hw: &mut H) -> !
where
    H: Indicator + UploadSubsystem + SerialLoader,
{
    let mut wait = WaitLoop::new(WaitPolicy::Unbounded, polarity);
    loop {
        wait.step(hw);
    }
}
