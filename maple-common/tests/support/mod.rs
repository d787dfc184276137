// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Recording board double for the wait loop and boot sequence tests.
//!
//! The two terminal operations end the run by panicking with an `Exit`
//! payload, which `run_to_exit` catches. An unbounded wait with no upload is
//! cut off after `poll_limit` upload polls and reported as `StillWaiting`.

#![allow(dead_code)]

use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

use maple_common::image::{is_valid_application, MemoryLayout, VectorTable};
use maple_common::interfaces::{
    BootFlag, Cadence, ImageValidator, Indicator, Jumper, Polarity, SerialLoader, UploadSubsystem,
    UsbSense,
};
use maple_common::reset_reason::{self, FlagCell, ResetReason};
use maple_common::sequence::{run_boot, BootConfig};

pub const VALID_SP: u32 = 0x2004_2000;
pub const VALID_RESET: u32 = 0x1001_00C1;
pub const ERASED: u32 = 0xFFFF_FFFF;

/// Flag word held in plain memory.
#[derive(Default)]
pub struct RamCell(pub u32);

impl FlagCell for RamCell {
    fn load(&self) -> u32 {
        self.0
    }

    fn store(&mut self, raw: u32) {
        self.0 = raw;
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Event {
    FlagRead,
    ImageChecked(u32),
    UsbSampled,
    Strobe {
        count: u32,
        cadence: Cadence,
        polarity: Polarity,
    },
    UploadPolled,
    SerialPolled,
    FinishUpload,
    Jump(u32),
}

/// How a run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Exit {
    /// `finish_upload` was called; the chip would reset.
    UploadReset,
    /// `jump_to_application` was called.
    Jump(u32),
    /// Still waiting when the poll limit was hit.
    StillWaiting,
}

pub struct MockBoard {
    pub flag: RamCell,
    pub vector_table: VectorTable,
    pub usb_line_idle: bool,
    /// Upload poll (1-based) that reports a started upload.
    pub upload_at: Option<u32>,
    pub poll_limit: u32,
    pub upload_polls: u32,
    log: RefCell<Vec<Event>>,
}

impl MockBoard {
    pub fn new(reason: ResetReason, code_valid: bool, usb_present: bool) -> Self {
        let vector_table = if code_valid {
            VectorTable::from_words(VALID_SP, VALID_RESET)
        } else {
            VectorTable::from_words(ERASED, ERASED)
        };
        Self {
            flag: RamCell(reason.to_raw()),
            vector_table,
            usb_line_idle: !usb_present,
            upload_at: None,
            poll_limit: 1_000,
            upload_polls: 0,
            log: RefCell::new(Vec::new()),
        }
    }

    pub fn with_upload_at(mut self, poll: u32) -> Self {
        self.upload_at = Some(poll);
        self
    }

    pub fn with_raw_flag(mut self, raw: u32) -> Self {
        self.flag = RamCell(raw);
        self
    }

    /// Everything recorded so far, in call order.
    pub fn events(&self) -> Vec<Event> {
        self.log.borrow().clone()
    }

    fn record(&self, event: Event) {
        self.log.borrow_mut().push(event);
    }

    pub fn count(&self, wanted: impl Fn(&Event) -> bool) -> usize {
        self.log.borrow().iter().filter(|e| wanted(e)).count()
    }

    pub fn slow_strobes(&self) -> usize {
        self.count(|e| {
            matches!(
                e,
                Event::Strobe {
                    cadence: Cadence::Slow,
                    ..
                }
            )
        })
    }

    pub fn fast_strobes(&self) -> usize {
        self.count(|e| {
            matches!(
                e,
                Event::Strobe {
                    cadence: Cadence::Fast,
                    ..
                }
            )
        })
    }

    pub fn position(&self, wanted: impl Fn(&Event) -> bool) -> Option<usize> {
        self.log.borrow().iter().position(wanted)
    }
}

impl BootFlag for MockBoard {
    fn read_and_clear_boot_flag(&mut self) -> ResetReason {
        self.record(Event::FlagRead);
        reset_reason::read_and_clear(&mut self.flag)
    }
}

impl ImageValidator for MockBoard {
    fn is_valid_application(&self, addr: u32) -> bool {
        self.record(Event::ImageChecked(addr));
        is_valid_application(&self.vector_table, &MemoryLayout::at(addr))
    }
}

impl UsbSense for MockBoard {
    fn sample_usb_data_pin(&mut self) -> bool {
        self.record(Event::UsbSampled);
        self.usb_line_idle
    }
}

impl Indicator for MockBoard {
    fn strobe_indicator(&mut self, count: u32, cadence: Cadence, polarity: Polarity) {
        self.record(Event::Strobe {
            count,
            cadence,
            polarity,
        });
    }
}

impl UploadSubsystem for MockBoard {
    fn upload_has_started(&mut self) -> bool {
        self.record(Event::UploadPolled);
        self.upload_polls += 1;
        if self.upload_polls > self.poll_limit {
            panic::panic_any(Exit::StillWaiting);
        }
        self.upload_at == Some(self.upload_polls)
    }

    fn finish_upload(&mut self) -> ! {
        self.record(Event::FinishUpload);
        panic::panic_any(Exit::UploadReset)
    }
}

impl SerialLoader for MockBoard {
    fn poll_serial_loader(&mut self) {
        self.record(Event::SerialPolled);
    }
}

impl Jumper for MockBoard {
    fn jump_to_application(&mut self, addr: u32) -> ! {
        self.record(Event::Jump(addr));
        panic::panic_any(Exit::Jump(addr))
    }
}

static QUIET_EXITS: Once = Once::new();

/// Keep the simulated resets and jumps out of the test output.
fn silence_exit_panics() {
    QUIET_EXITS.call_once(|| {
        let default_hook = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if info.payload().downcast_ref::<Exit>().is_none() {
                default_hook(info);
            }
        }));
    });
}

/// Run `f` until it leaves through one of the simulated terminal operations.
pub fn catch_exit(f: impl FnOnce()) -> Exit {
    silence_exit_panics();
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(()) => panic!("terminal operation returned"),
        Err(payload) => match payload.downcast::<Exit>() {
            Ok(exit) => *exit,
            Err(other) => panic::resume_unwind(other),
        },
    }
}

/// Run the full boot sequence on `board`.
pub fn run_to_exit(board: &mut MockBoard, config: &BootConfig) -> Exit {
    catch_exit(|| {
        run_boot(board, config);
    })
}
