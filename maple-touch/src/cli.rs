// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Command-line interface definitions.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::commands;

/// Command-line arguments.
#[derive(Parser)]
#[command(name = "maple-touch")]
#[command(about = "Put a maple bootloader into upload mode")]
pub struct Cli {
    /// Serial port (e.g., /dev/ttyACM0); found by USB id when omitted
    #[arg(short, long, global = true)]
    pub port: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// List boards currently waiting in the bootloader
    List,

    /// Send the 1200 baud touch and wait for the board to re-enumerate
    Touch {
        /// Give up waiting after this many milliseconds
        #[arg(short, long, default_value = "5000")]
        timeout: u64,
    },

    /// Touch, then copy a UF2 image onto the ROM loader's drive
    Upload {
        /// UF2 image
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Mount point of the loader drive (e.g., /media/$USER/RPI-RP2)
        #[arg(short, long)]
        volume: PathBuf,

        /// Give up waiting for the drive after this many milliseconds
        #[arg(short, long, default_value = "15000")]
        timeout: u64,
    },
}

/// Execute the parsed CLI command.
pub fn run(cli: Cli) -> Result<()> {
    let port = cli.port.as_deref();

    match cli.command {
        Commands::List => commands::list(),
        Commands::Touch { timeout } => commands::touch(port, timeout),
        Commands::Upload {
            file,
            volume,
            timeout,
        } => commands::upload(port, &file, &volume, timeout),
    }
}
