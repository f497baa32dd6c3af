//! # Overlay Subcommand
//!
//! Render a Zephyr devicetree overlay fragment for a board's primary
//! device, ready to drop into a shield directory. I2C and SPI devices get
//! full nodes; other protocols render a placeholder comment until a
//! generator exists for them.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;

use mnfs_core::{DeviceDescriptor, Protocol};
use mnfs_schema::load_path;

/// Arguments for the overlay subcommand.
#[derive(Args, Debug)]
pub struct OverlayArgs {
    /// Manifest file to render an overlay for.
    pub file: PathBuf,

    /// Devicetree `compatible` to bind, e.g. `adi,adt7420`. Defaults to
    /// `<vendor>,<driver>` from the manifest strings.
    #[arg(long)]
    pub compatible: Option<String>,

    /// Node label. Defaults to the product name, folded to label form.
    #[arg(long)]
    pub label: Option<String>,
}

/// Run `mnfs overlay`.
pub fn run(args: &OverlayArgs) -> Result<()> {
    let manifest = load_path(&args.file)?;
    let device = manifest
        .primary_device()
        .context("manifest declares no devices")?;
    let driver = manifest
        .driver(device)
        .context("device names no driver string")?;

    let compatible = match &args.compatible {
        Some(compatible) => compatible.clone(),
        None => default_compatible(manifest.vendor().unwrap_or(""), driver),
    };
    let label = match &args.label {
        Some(label) => sanitize(label),
        None => sanitize(manifest.product().unwrap_or("")),
    };
    let label = if label.is_empty() { "board".to_string() } else { label };

    print!("{}", render_overlay(device, driver, &compatible, &label));
    Ok(())
}

/// Render the devicetree fragment. Pure — all names resolved by the
/// caller.
pub fn render_overlay(
    device: &DeviceDescriptor,
    driver: &str,
    compatible: &str,
    label: &str,
) -> String {
    let mut out = String::from(
        "/*\n * Copyright The Zephyr Project Contributors\n * SPDX-License-Identifier: Apache-2.0\n */\n\n",
    );
    let node = sanitize(driver);
    match device.protocol {
        Protocol::I2C => {
            out.push_str("&mikrobus_i2c {\n");
            out.push_str("\tstatus = \"okay\";\n\n");
            out.push_str(&format!("\t{node}_{label}: {node}@{:02x} {{\n", device.reg));
            out.push_str(&format!("\t\tcompatible = \"{compatible}\";\n"));
            out.push_str(&format!("\t\treg = <0x{:02x}>;\n", device.reg));
            push_irq(&mut out, device);
            out.push_str("\t};\n};\n");
        }
        Protocol::SPI => {
            out.push_str("&mikrobus_spi {\n");
            out.push_str("\tstatus = \"okay\";\n\n");
            out.push_str(&format!("\t{node}_{label}: {node}@{:x} {{\n", device.reg));
            out.push_str(&format!("\t\tcompatible = \"{compatible}\";\n"));
            out.push_str(&format!("\t\treg = <{}>;\n", device.reg));
            if device.max_speed_hz > 0 {
                out.push_str(&format!(
                    "\t\tspi-max-frequency = <{}>;\n",
                    device.max_speed_hz
                ));
            }
            if device.mode & 0x2 != 0 {
                out.push_str("\t\tspi-cpol;\n");
            }
            if device.mode & 0x1 != 0 {
                out.push_str("\t\tspi-cpha;\n");
            }
            push_irq(&mut out, device);
            out.push_str("\t};\n};\n");
        }
        other => {
            out.push_str(&format!(
                "/* Protocol {:#x} ({}) overlays are not supported yet */\n",
                other.0,
                other.name()
            ));
        }
    }
    out
}

/// The INT pin sits at index 7 of the Zephyr mikroBUS connector gpio map.
fn push_irq(out: &mut String, device: &DeviceDescriptor) {
    if device.irq.is_some() {
        out.push_str("\t\tint-gpios = <&mikrobus_header 7 GPIO_ACTIVE_LOW>;\n");
    }
}

/// Fold free-form text to devicetree label form: lowercase alphanumerics,
/// runs of anything else becoming single underscores.
fn sanitize(text: &str) -> String {
    let mut out = String::new();
    for c in text.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c.to_ascii_lowercase());
        } else if !out.is_empty() && !out.ends_with('_') {
            out.push('_');
        }
    }
    out.trim_end_matches('_').to_string()
}

/// Default devicetree `compatible`: lowercased vendor, driver as-is.
fn default_compatible(vendor: &str, driver: &str) -> String {
    let vendor: String = vendor
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect();
    format!("{vendor},{driver}")
}
