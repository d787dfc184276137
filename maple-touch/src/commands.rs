// SPDX-License-Identifier: MIT
// Copyright (c) 2026 ADNT Sarl <info@adnt.io>

//! Command implementations.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

use crate::port;

const POLL_INTERVAL: Duration = Duration::from_millis(100);
const UF2_MAGIC_START0: u32 = 0x0A32_4655;
const UF2_MAGIC_START1: u32 = 0x9E5D_5157;
const UF2_BLOCK_SIZE: usize = 512;

/// List boards waiting in the bootloader.
pub fn list() -> Result<()> {
    let ports = port::bootloader_ports()?;
    if ports.is_empty() {
        println!("No bootloader found.");
        return Ok(());
    }

    for info in ports {
        println!("{}", info.port_name);
    }
    Ok(())
}

/// Touch the bootloader port and wait until it goes away.
pub fn touch(requested: Option<&str>, timeout_ms: u64) -> Result<()> {
    let name = touch_port(requested)?;
    wait_for_port_gone(&name, timeout_ms)?;
    println!("Board is in the ROM loader.");
    Ok(())
}

/// Touch the bootloader, then copy a UF2 image onto the loader drive.
pub fn upload(requested: Option<&str>, file: &Path, volume: &Path, timeout_ms: u64) -> Result<()> {
    let image = fs::read(file).with_context(|| format!("Failed to read {}", file.display()))?;
    if !looks_like_uf2(&image) {
        bail!("{} is not a UF2 image", file.display());
    }

    println!(
        "Image:  {} ({} bytes, {} blocks)",
        file.display(),
        image.len(),
        image.len() / UF2_BLOCK_SIZE
    );
    println!("Volume: {}", volume.display());
    println!();

    let name = touch_port(requested)?;
    wait_for_port_gone(&name, timeout_ms)?;
    wait_for_volume(volume, timeout_ms)?;

    let file_name = file.file_name().context("Image path has no file name")?;
    let target = volume.join(file_name);
    copy_with_progress(&image, &target)?;

    println!();
    println!("Image written; the board reboots into it once the loader finishes.");
    Ok(())
}

/// Whether `data` starts with a UF2 block and is a whole number of blocks.
pub fn looks_like_uf2(data: &[u8]) -> bool {
    if data.len() < UF2_BLOCK_SIZE || data.len() % UF2_BLOCK_SIZE != 0 {
        return false;
    }
    let word = |i: usize| u32::from_le_bytes([data[i], data[i + 1], data[i + 2], data[i + 3]]);
    word(0) == UF2_MAGIC_START0 && word(4) == UF2_MAGIC_START1
}

fn touch_port(requested: Option<&str>) -> Result<String> {
    let candidates = port::bootloader_ports()?;
    let name = port::select_port(&candidates, requested)?;

    print!("Touching {}... ", name);
    std::io::stdout().flush()?;
    port::touch(&name)?;
    println!("OK");

    Ok(name)
}

fn spinner(message: &str) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg} [{elapsed}]")?);
    pb.set_message(message.to_string());
    pb.enable_steady_tick(POLL_INTERVAL);
    Ok(pb)
}

fn wait_for_port_gone(name: &str, timeout_ms: u64) -> Result<()> {
    let pb = spinner(&format!("Waiting for {} to disconnect", name))?;
    let deadline = Instant::now() + Duration::from_millis(timeout_ms);

    while port::is_present(name)? {
        if Instant::now() >= deadline {
            pb.abandon();
            bail!("{} is still present; the board ignored the touch", name);
        }
        std::thread::sleep(POLL_INTERVAL);
    }

    pb.finish_with_message(format!("{} disconnected", name));
    Ok(())
}

fn wait_for_volume(volume: &Path, timeout_ms: u64) -> Result<()> {
    let pb = spinner(&format!("Waiting for {}", volume.display()))?;
    let deadline = Instant::now() + Duration::from_millis(timeout_ms);

    while !volume.is_dir() {
        if Instant::now() >= deadline {
            pb.abandon();
            bail!("{} did not appear; is the drive mounted?", volume.display());
        }
        std::thread::sleep(POLL_INTERVAL);
    }

    pb.finish_with_message(format!("{} mounted", volume.display()));
    Ok(())
}

fn copy_with_progress(image: &[u8], target: &Path) -> Result<()> {
    let mut out =
        File::create(target).with_context(|| format!("Failed to create {}", target.display()))?;

    let pb = ProgressBar::new(image.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})",
            )?
            .progress_chars("#>-"),
    );

    let mut written = 0u64;
    for block in image.chunks(UF2_BLOCK_SIZE * 8) {
        if let Err(e) = out.write_all(block) {
            pb.abandon();
            bail!("Write failed at offset {}: {}", written, e);
        }
        written += block.len() as u64;
        pb.set_position(written);
    }

    // The loader may reset before the OS flushes its cache.
    out.sync_all()
        .with_context(|| format!("Failed to flush {}", target.display()))?;
    pb.finish_with_message("Copy complete");
    Ok(())
}
