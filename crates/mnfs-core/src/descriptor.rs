//! # Descriptor Records
//!
//! The typed model of a mikroBUS manifest: one record type per descriptor
//! block, composed into the immutable [`Manifest`] aggregate.
//!
//! Records hold validated wire values and nothing else — no source text,
//! no line numbers, no lifecycle state. The loader in `mnfs-schema` is the
//! only producer of a whole [`Manifest`], and it only hands one out after
//! every cross-reference has resolved.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::id::{BundleId, CportId, DeviceId, PropertyId, StringId};
use crate::pins::{PinRole, PinState};
use crate::protocol::{BundleClass, Protocol};

/// The `[manifest-header]` block: the manifest format revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestHeader {
    /// Format major version.
    pub version_major: u8,
    /// Format minor version.
    pub version_minor: u8,
}

impl ManifestHeader {
    /// The only format revision this toolchain understands.
    pub const VERSION: (u8, u8) = (0, 1);
}

/// The `[interface-descriptor]` block: who made the board and what it is,
/// as references into the string table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterfaceDescriptor {
    /// String carrying the vendor name.
    pub vendor_string_id: StringId,
    /// String carrying the product name.
    pub product_string_id: StringId,
}

/// The `[mikrobus-descriptor]` block: a pin-control state for each of the
/// twelve mikroBUS header pins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MikrobusDescriptor {
    pub pwm: PinState,
    pub int: PinState,
    pub rx: PinState,
    pub tx: PinState,
    pub scl: PinState,
    pub sda: PinState,
    pub mosi: PinState,
    pub miso: PinState,
    pub sck: PinState,
    pub cs: PinState,
    pub rst: PinState,
    pub an: PinState,
}

impl MikrobusDescriptor {
    /// The state assigned to one pin role.
    pub fn state(&self, role: PinRole) -> PinState {
        match role {
            PinRole::Pwm => self.pwm,
            PinRole::Int => self.int,
            PinRole::Rx => self.rx,
            PinRole::Tx => self.tx,
            PinRole::Scl => self.scl,
            PinRole::Sda => self.sda,
            PinRole::Mosi => self.mosi,
            PinRole::Miso => self.miso,
            PinRole::Sck => self.sck,
            PinRole::Cs => self.cs,
            PinRole::Rst => self.rst,
            PinRole::An => self.an,
        }
    }
}

/// A `[string-descriptor N]` block: one entry in the manifest's string
/// table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringDescriptor {
    /// Table id other descriptors reference.
    pub id: StringId,
    /// The text, at most 255 bytes.
    pub string: String,
}

/// A property value type code.
///
/// The code fixes the byte width of each element in the property's value
/// array. Codes outside the table are invalid manifest content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PropertyType(pub u8);

impl PropertyType {
    /// Width in bytes of one value-array element, or `None` for codes the
    /// format does not define.
    pub fn element_width(&self) -> Option<u32> {
        match self.0 {
            0x00..=0x03 | 0x07 | 0x08 => Some(1),
            0x04 => Some(2),
            0x05 => Some(4),
            0x06 => Some(8),
            _ => None,
        }
    }
}

/// A `[property-descriptor N]` block: a named array of integers a device
/// driver can consume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDescriptor {
    /// Table id `prop-link` fields reference.
    pub id: PropertyId,
    /// String carrying the property name.
    pub name_string_id: StringId,
    /// Element type code; fixes the element byte width.
    pub prop_type: PropertyType,
    /// The elements, each within the type's width.
    pub value: Vec<u64>,
}

/// Interrupt wiring of a device: the IRQ number and its trigger type.
///
/// Both values come from the optional `irq`/`irq-type` key pair. A device
/// without the `irq` key has no interrupt at all, which is distinct from
/// `irq = 0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Irq {
    /// IRQ number.
    pub line: u8,
    /// Trigger type code.
    pub irq_type: u8,
}

/// A `[device-descriptor N]` block: one device the add-on board exposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDescriptor {
    /// Id, unique among the manifest's devices.
    pub id: DeviceId,
    /// String carrying the kernel driver name.
    pub driver_string_id: StringId,
    /// Bus protocol the device speaks.
    pub protocol: Protocol,
    /// Bus address. Always 0 for UART devices, which are unaddressed.
    pub reg: u8,
    /// Interrupt wiring, if the device raises one.
    pub irq: Option<Irq>,
    /// SPI clock ceiling in Hz. 0 for non-SPI devices.
    pub max_speed_hz: u32,
    /// SPI mode bits (bit 0 CPHA, bit 1 CPOL). 0 for non-SPI devices.
    pub mode: u8,
    /// Property this device consumes, if any.
    pub prop_link: Option<PropertyId>,
    /// GPIO descriptor link; 0 when unused.
    pub gpio_link: u8,
    /// Regulator descriptor link; 0 when unused.
    pub reg_link: u8,
    /// Clock descriptor link; 0 when unused.
    pub clock_link: u8,
}

/// A `[bundle-descriptor N]` block: a Greybus function grouping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleDescriptor {
    /// Id, unique among the manifest's bundles. Bundle 0 is the control
    /// bundle and must carry the Control class.
    pub id: BundleId,
    /// The bundle's class code.
    pub class: BundleClass,
}

/// A `[cport-descriptor N]` block: a Greybus connection endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CportDescriptor {
    /// Id, unique among the manifest's CPorts. CPort 0 is the control
    /// CPort and must speak the Control protocol.
    pub id: CportId,
    /// The bundle this CPort belongs to.
    pub bundle: BundleId,
    /// The protocol spoken over this CPort.
    pub protocol: Protocol,
}

/// A complete, validated mikroBUS manifest.
///
/// Keyed collections use `BTreeMap` so iteration is always in id order —
/// the same order the canonical writer emits and the loader checks
/// references in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    /// Format revision.
    pub header: ManifestHeader,
    /// Vendor and product identity.
    pub interface: InterfaceDescriptor,
    /// Pin states for the mikroBUS header.
    pub mikrobus: MikrobusDescriptor,
    /// Devices by id.
    pub devices: BTreeMap<DeviceId, DeviceDescriptor>,
    /// Properties by id.
    pub properties: BTreeMap<PropertyId, PropertyDescriptor>,
    /// String table by id.
    pub strings: BTreeMap<StringId, StringDescriptor>,
    /// Bundles by id.
    pub bundles: BTreeMap<BundleId, BundleDescriptor>,
    /// CPorts by id.
    pub cports: BTreeMap<CportId, CportDescriptor>,
}

impl Manifest {
    /// Resolve a string table entry.
    pub fn string(&self, id: StringId) -> Option<&str> {
        self.strings.get(&id).map(|s| s.string.as_str())
    }

    /// The vendor name. Present on every loaded manifest.
    pub fn vendor(&self) -> Option<&str> {
        self.string(self.interface.vendor_string_id)
    }

    /// The product name. Present on every loaded manifest.
    pub fn product(&self) -> Option<&str> {
        self.string(self.interface.product_string_id)
    }

    /// The driver name a device resolves to.
    pub fn driver(&self, device: &DeviceDescriptor) -> Option<&str> {
        self.string(device.driver_string_id)
    }

    /// The device with the lowest id — the board's main function.
    pub fn primary_device(&self) -> Option<&DeviceDescriptor> {
        self.devices.values().next()
    }
}
