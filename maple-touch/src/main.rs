// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Host tool for the maple bootloader.
//!
//! Usage:
//!   maple-touch list
//!   maple-touch --port /dev/ttyACM0 touch
//!   maple-touch upload firmware.uf2 --volume /media/$USER/RPI-RP2

mod cli;
mod commands;
mod port;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    let args = cli::Cli::parse();
    cli::run(args)
}
