//! # CPort Protocols and Bundle Classes
//!
//! Wire code tables from the Greybus application protocol, as used by
//! manifest `protocol` and `class` fields. Both namespaces are open:
//! numbers outside the published tables are carried as-is and name
//! themselves "Reserved", so the types wrap the raw byte rather than
//! enumerating it.

use serde::{Deserialize, Serialize};

/// A CPort protocol number.
///
/// Device descriptors use a protocol to say how the board talks
/// (I2C, SPI, UART, ...); CPort descriptors use it to bind a Greybus
/// connection. The code is carried verbatim either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Protocol(pub u8);

impl Protocol {
    /// Control protocol, mandatory on CPort 0.
    pub const CONTROL: Protocol = Protocol(0x00);
    /// GPIO over Bridged PHY.
    pub const GPIO: Protocol = Protocol(0x02);
    /// I2C over Bridged PHY.
    pub const I2C: Protocol = Protocol(0x03);
    /// UART over Bridged PHY. UART devices have no `reg` address.
    pub const UART: Protocol = Protocol(0x04);
    /// SPI over Bridged PHY. SPI devices must declare `max-speed-hz`
    /// and `mode`.
    pub const SPI: Protocol = Protocol(0x0b);

    /// The published protocol name, or `"Reserved"` for unassigned codes.
    pub fn name(&self) -> &'static str {
        match self.0 {
            0x00 => "Control",
            0x01 => "AP",
            0x02 => "GPIO",
            0x03 => "I2C",
            0x04 => "UART",
            0x05 => "HID",
            0x06 => "USB",
            0x07 => "SDIO",
            0x08 => "Power Supply",
            0x09 => "PWM",
            0x0b => "SPI",
            0x0c => "Display",
            0x0d => "Camera Management",
            0x0e => "Sensor",
            0x0f => "Lights",
            0x10 => "Vibrator",
            0x11 => "Loopback",
            0x12 => "Audio Management",
            0x13 => "Audio Data",
            0x14 => "SVC",
            0x15 => "Firmware",
            0x16 => "Camera Data",
            0xfe => "Raw",
            0xff => "Vendor Specific",
            _ => "Reserved",
        }
    }

    /// The bundle class a CPort speaking this protocol belongs to, or
    /// `None` for reserved codes.
    pub fn bundle_class(&self) -> Option<BundleClass> {
        let class = match self.0 {
            0x00 => 0x00,
            0x01 => 0x01,
            0x02..=0x04 | 0x06 | 0x07 | 0x09 | 0x0b => 0x0a,
            0x05 => 0x05,
            0x08 => 0x08,
            0x0c => 0x0c,
            0x0d | 0x16 => 0x0d,
            0x0e => 0x0e,
            0x0f => 0x0f,
            0x10 => 0x10,
            0x11 => 0x11,
            0x12 | 0x13 => 0x12,
            0x14 => 0x14,
            0x15 => 0x15,
            0xfe => 0xfe,
            0xff => 0xff,
            _ => return None,
        };
        Some(BundleClass(class))
    }
}

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// A bundle class number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BundleClass(pub u8);

impl BundleClass {
    /// Control class, mandatory on bundle 0.
    pub const CONTROL: BundleClass = BundleClass(0x00);
    /// Bridged PHY class, shared by the bus protocols (GPIO, I2C, UART,
    /// SPI, ...).
    pub const BRIDGED_PHY: BundleClass = BundleClass(0x0a);

    /// The published class name, or `"Reserved"` for unassigned codes.
    pub fn name(&self) -> &'static str {
        match self.0 {
            0x00 => "Control",
            0x01 => "AP",
            0x05 => "HID",
            0x08 => "Power Supply",
            0x0a => "Bridged PHY",
            0x0c => "Display",
            0x0d => "Camera",
            0x0e => "Sensor",
            0x0f => "Lights",
            0x10 => "Vibrator",
            0x11 => "Loopback",
            0x12 => "Audio",
            0x14 => "SVC",
            0x15 => "Firmware",
            0xfe => "Raw",
            0xff => "Vendor Specific",
            _ => "Reserved",
        }
    }
}

impl std::fmt::Display for BundleClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
