//! # Typed Manifest Loading
//!
//! The second of the loader's two passes: interpret the raw sections from
//! [`crate::parse`] into the descriptor records of `mnfs-core`, enforce the
//! per-section field rules, and resolve every cross-reference before a
//! [`Manifest`] is handed out.
//!
//! ## Error Order
//!
//! Loading is fail-fast and deterministic. For a given input the first
//! defect along this order is the error:
//!
//! 1. syntax, in file order (the scanner);
//! 2. section headers, in file order — unrecognized kinds, malformed or
//!    duplicated ids, repeated singletons;
//! 3. presence of the three required singleton sections;
//! 4. per-section field checks — header, interface, mikrobus, then the
//!    keyed kinds in canonical order (devices, properties, strings,
//!    bundles, cports), ascending by id;
//! 5. cross-references, ascending by id — interface string refs, device
//!    driver and property links, property name refs, cport bundle refs.
//!
//! Accumulating every defect was considered and rejected: a manifest is a
//! few dozen lines of hand-written configuration, and the first error names
//! the section and key to fix.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;

use mnfs_core::{
    BundleClass, BundleDescriptor, BundleId, CportDescriptor, CportId, DeviceDescriptor, DeviceId,
    InterfaceDescriptor, Irq, Manifest, ManifestHeader, MikrobusDescriptor, PinRole, PinState,
    PropertyDescriptor, PropertyId, PropertyType, Protocol, SchemaError, StringDescriptor,
    StringId,
};

use crate::parse::{scan, RawSection};

/// Widest renderable property value text, delimiters included.
const PROPERTY_VALUE_TEXT_MAX: usize = 255;
/// Longest string descriptor text, in bytes.
const STRING_TEXT_MAX: usize = 255;

/// An error raised by [`load_path`]: either the file could not be read, or
/// its content failed to load.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The file was read but its content is not a valid manifest.
    #[error("{}: {source}", path.display())]
    Schema {
        /// The file that failed to load.
        path: PathBuf,
        /// The underlying schema error.
        source: SchemaError,
    },

    /// The file could not be read at all.
    #[error("cannot read '{}': {source}", path.display())]
    Io {
        /// The file that could not be read.
        path: PathBuf,
        /// The underlying IO error.
        source: std::io::Error,
    },
}

/// Load a manifest from its textual form.
///
/// Pure: one pass over the text, no IO, no partial results. On success the
/// returned [`Manifest`] has every field range-checked and every reference
/// resolved. On failure the error names the offending section and, where
/// one is involved, the key — see the module docs for the error order.
///
/// # Errors
///
/// Any [`SchemaError`] variant. Notably:
///
/// - [`SchemaError::UnknownSection`] for a header outside the recognized
///   descriptor set;
/// - [`SchemaError::MissingSection`] when `manifest-header`,
///   `interface-descriptor`, or `mikrobus-descriptor` is absent;
/// - [`SchemaError::MissingKey`] for an absent required field, including
///   any of the twelve `<pin>-state` keys;
/// - [`SchemaError::DuplicateId`] for a repeated singleton section or a
///   repeated id within one keyed kind;
/// - [`SchemaError::DanglingReference`] for a reference field naming an id
///   with no descriptor;
/// - [`SchemaError::InvalidValue`] for malformed numbers, out-of-range
///   values, and violated per-section rules.
pub fn load(source: &str) -> Result<Manifest, SchemaError> {
    let sections = scan(source)?;
    let classified = classify(&sections)?;

    let header_section = classified.header.ok_or_else(|| missing("manifest-header"))?;
    let interface_section = classified
        .interface
        .ok_or_else(|| missing("interface-descriptor"))?;
    let mikrobus_section = classified
        .mikrobus
        .ok_or_else(|| missing("mikrobus-descriptor"))?;

    let header = header_fields(header_section)?;
    let interface = interface_fields(interface_section)?;
    let mikrobus = mikrobus_fields(mikrobus_section)?;

    let mut pending_devices = BTreeMap::new();
    for (&id, section) in &classified.devices {
        pending_devices.insert(id, device_fields(section)?);
    }
    let mut pending_properties = BTreeMap::new();
    for (&id, section) in &classified.properties {
        pending_properties.insert(id, property_fields(section)?);
    }
    let mut strings = BTreeMap::new();
    for (&id, section) in &classified.strings {
        strings.insert(id, string_fields(section, id)?);
    }
    let mut bundles = BTreeMap::new();
    let mut next_bundle_id = 1u32;
    for (&id, section) in &classified.bundles {
        bundles.insert(id, bundle_fields(section, id, &mut next_bundle_id)?);
    }
    let mut pending_cports = BTreeMap::new();
    for (&id, section) in &classified.cports {
        pending_cports.insert(id, cport_fields(section, id)?);
    }

    let interface = InterfaceDescriptor {
        vendor_string_id: resolve_string(
            &strings,
            "interface-descriptor",
            "vendor-string-id",
            interface.vendor_string_id,
        )?,
        product_string_id: resolve_string(
            &strings,
            "interface-descriptor",
            "product-string-id",
            interface.product_string_id,
        )?,
    };

    let mut devices = BTreeMap::new();
    for (id, pending) in pending_devices {
        let driver_string_id = resolve_string(
            &strings,
            &pending.section,
            "driver-string-id",
            pending.driver_string_id,
        )?;
        let prop_link = match pending.prop_link {
            0 => None,
            raw => Some(resolve_property(
                &pending_properties,
                &pending.section,
                raw,
            )?),
        };
        devices.insert(
            id,
            DeviceDescriptor {
                id,
                driver_string_id,
                protocol: pending.protocol,
                reg: pending.reg,
                irq: pending.irq,
                max_speed_hz: pending.max_speed_hz,
                mode: pending.mode,
                prop_link,
                gpio_link: pending.gpio_link,
                reg_link: pending.reg_link,
                clock_link: pending.clock_link,
            },
        );
    }

    let mut properties = BTreeMap::new();
    for (id, pending) in pending_properties {
        let name_string_id = resolve_string(
            &strings,
            &pending.section,
            "name-string-id",
            pending.name_string_id,
        )?;
        properties.insert(
            id,
            PropertyDescriptor {
                id,
                name_string_id,
                prop_type: pending.prop_type,
                value: pending.value,
            },
        );
    }

    let mut cports = BTreeMap::new();
    for (id, pending) in pending_cports {
        let bundle = BundleId(pending.bundle);
        if !bundles.contains_key(&bundle) {
            return Err(SchemaError::DanglingReference {
                section: pending.section,
                key: "bundle".to_string(),
                id: pending.bundle,
            });
        }
        cports.insert(
            id,
            CportDescriptor {
                id,
                bundle,
                protocol: pending.protocol,
            },
        );
    }

    Ok(Manifest {
        header,
        interface,
        mikrobus,
        devices,
        properties,
        strings,
        bundles,
        cports,
    })
}

/// Load a manifest from a file.
///
/// Thin wrapper over [`load`] for the CLI and tests; the error keeps the
/// path so collection walks can report which file failed.
pub fn load_path(path: impl AsRef<Path>) -> Result<Manifest, LoadError> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    load(&text).map_err(|source| LoadError::Schema {
        path: path.to_path_buf(),
        source,
    })
}

/// Raw sections grouped by descriptor kind, ids parsed and deduplicated.
#[derive(Default)]
struct Classified<'a> {
    header: Option<&'a RawSection>,
    interface: Option<&'a RawSection>,
    mikrobus: Option<&'a RawSection>,
    strings: BTreeMap<StringId, &'a RawSection>,
    devices: BTreeMap<DeviceId, &'a RawSection>,
    properties: BTreeMap<PropertyId, &'a RawSection>,
    bundles: BTreeMap<BundleId, &'a RawSection>,
    cports: BTreeMap<CportId, &'a RawSection>,
}

fn classify(sections: &[RawSection]) -> Result<Classified<'_>, SchemaError> {
    let mut out = Classified::default();
    for section in sections {
        match section.kind.as_str() {
            // A singleton kind with an id token names no known descriptor.
            "manifest-header" | "interface-descriptor" | "mikrobus-descriptor"
                if section.id.is_some() =>
            {
                return Err(SchemaError::UnknownSection {
                    section: section.header.clone(),
                })
            }
            "manifest-header" => store_singleton(&mut out.header, section)?,
            "interface-descriptor" => store_singleton(&mut out.interface, section)?,
            "mikrobus-descriptor" => store_singleton(&mut out.mikrobus, section)?,
            "string-descriptor" => {
                let id = nonzero_id(section, keyed_id(section, 1)? as u8, StringId::new)?;
                store_keyed(&mut out.strings, id, section)?;
            }
            "device-descriptor" => {
                let id = DeviceId(keyed_id(section, 1)? as u8);
                store_keyed(&mut out.devices, id, section)?;
            }
            "property-descriptor" => {
                let id = nonzero_id(section, keyed_id(section, 1)? as u8, PropertyId::new)?;
                store_keyed(&mut out.properties, id, section)?;
            }
            "bundle-descriptor" => {
                let id = BundleId(keyed_id(section, 1)? as u8);
                store_keyed(&mut out.bundles, id, section)?;
            }
            "cport-descriptor" => {
                let id = CportId(keyed_id(section, 2)? as u16);
                store_keyed(&mut out.cports, id, section)?;
            }
            _ => {
                return Err(SchemaError::UnknownSection {
                    section: section.header.clone(),
                })
            }
        }
    }
    Ok(out)
}

fn store_singleton<'a>(
    slot: &mut Option<&'a RawSection>,
    section: &'a RawSection,
) -> Result<(), SchemaError> {
    if slot.is_some() {
        return Err(SchemaError::DuplicateId {
            section: section.header.clone(),
        });
    }
    *slot = Some(section);
    Ok(())
}

fn store_keyed<'a, K: Ord>(
    map: &mut BTreeMap<K, &'a RawSection>,
    id: K,
    section: &'a RawSection,
) -> Result<(), SchemaError> {
    match map.entry(id) {
        Entry::Vacant(entry) => {
            entry.insert(section);
            Ok(())
        }
        Entry::Occupied(_) => Err(SchemaError::DuplicateId {
            section: section.header.clone(),
        }),
    }
}

/// Parse a keyed section's id token. The token may be double-quoted.
fn keyed_id(section: &RawSection, num_bytes: u32) -> Result<u64, SchemaError> {
    let token = section.id.as_deref().ok_or_else(|| SchemaError::InvalidValue {
        section: section.header.clone(),
        key: "id".to_string(),
        reason: "missing id value".to_string(),
    })?;
    int_value(&section.header, "id", token.trim_matches('"'), num_bytes)
}

/// Wrap an id whose namespace reserves 0.
fn nonzero_id<T>(
    section: &RawSection,
    raw: u8,
    construct: impl FnOnce(u8) -> Option<T>,
) -> Result<T, SchemaError> {
    construct(raw).ok_or_else(|| SchemaError::InvalidValue {
        section: section.header.clone(),
        key: "id".to_string(),
        reason: "cannot be 0".to_string(),
    })
}

fn missing(section: &str) -> SchemaError {
    SchemaError::MissingSection {
        section: section.to_string(),
    }
}

/// Parse an integer value: decimal or `0x`-prefixed hexadecimal, within
/// the field's wire width.
fn int_value(section: &str, key: &str, text: &str, num_bytes: u32) -> Result<u64, SchemaError> {
    let parsed = match text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        Some(hex) if !hex.is_empty() => u64::from_str_radix(hex, 16).ok(),
        Some(_) => None,
        None => text.parse::<u64>().ok(),
    };
    let value = parsed.ok_or_else(|| SchemaError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        reason: format!("'{text}' is not a decimal or 0x-prefixed integer"),
    })?;

    let max = match num_bytes {
        8 => u64::MAX,
        n => (1u64 << (8 * n)) - 1,
    };
    if value > max {
        return Err(SchemaError::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            reason: format!("{value} is out of range ([0:{max}])"),
        });
    }
    Ok(value)
}

fn require_int(section: &RawSection, key: &str, num_bytes: u32) -> Result<u64, SchemaError> {
    int_value(&section.header, key, section.require(key)?, num_bytes)
}

fn optional_int(
    section: &RawSection,
    key: &str,
    num_bytes: u32,
) -> Result<Option<u64>, SchemaError> {
    section
        .get(key)
        .map(|text| int_value(&section.header, key, text, num_bytes))
        .transpose()
}

fn header_fields(section: &RawSection) -> Result<ManifestHeader, SchemaError> {
    let version_major = require_int(section, "version-major", 1)? as u8;
    let version_minor = require_int(section, "version-minor", 1)? as u8;
    let (supported_major, supported_minor) = ManifestHeader::VERSION;
    if (version_major, version_minor) != ManifestHeader::VERSION {
        let key = if version_major != supported_major {
            "version-major"
        } else {
            "version-minor"
        };
        return Err(SchemaError::InvalidValue {
            section: section.header.clone(),
            key: key.to_string(),
            reason: format!(
                "format version {version_major}.{version_minor} is not supported \
                 (only {supported_major}.{supported_minor})"
            ),
        });
    }
    Ok(ManifestHeader {
        version_major,
        version_minor,
    })
}

/// Interface fields before reference resolution.
struct PendingInterface {
    vendor_string_id: u8,
    product_string_id: u8,
}

fn interface_fields(section: &RawSection) -> Result<PendingInterface, SchemaError> {
    Ok(PendingInterface {
        vendor_string_id: require_int(section, "vendor-string-id", 1)? as u8,
        product_string_id: require_int(section, "product-string-id", 1)? as u8,
    })
}

fn mikrobus_fields(section: &RawSection) -> Result<MikrobusDescriptor, SchemaError> {
    let mut states = [PinState(0); 12];
    for (slot, role) in states.iter_mut().zip(PinRole::ALL) {
        *slot = PinState(require_int(section, role.key(), 1)? as u8);
    }
    let [pwm, int, rx, tx, scl, sda, mosi, miso, sck, cs, rst, an] = states;
    Ok(MikrobusDescriptor {
        pwm,
        int,
        rx,
        tx,
        scl,
        sda,
        mosi,
        miso,
        sck,
        cs,
        rst,
        an,
    })
}

fn string_fields(section: &RawSection, id: StringId) -> Result<StringDescriptor, SchemaError> {
    let text = section.require("string")?;
    if text.is_empty() {
        return Err(SchemaError::InvalidValue {
            section: section.header.clone(),
            key: "string".to_string(),
            reason: "string must not be empty".to_string(),
        });
    }
    if text.len() > STRING_TEXT_MAX {
        return Err(SchemaError::InvalidValue {
            section: section.header.clone(),
            key: "string".to_string(),
            reason: format!(
                "string is too long ({} bytes, maximum is {STRING_TEXT_MAX})",
                text.len()
            ),
        });
    }
    Ok(StringDescriptor {
        id,
        string: text.to_string(),
    })
}

/// Device fields before reference resolution.
struct PendingDevice {
    section: String,
    driver_string_id: u8,
    protocol: Protocol,
    reg: u8,
    irq: Option<Irq>,
    max_speed_hz: u32,
    mode: u8,
    prop_link: u8,
    gpio_link: u8,
    reg_link: u8,
    clock_link: u8,
}

fn device_fields(section: &RawSection) -> Result<PendingDevice, SchemaError> {
    let driver_string_id = require_int(section, "driver-string-id", 1)? as u8;
    let protocol = Protocol(require_int(section, "protocol", 1)? as u8);

    // SPI devices must pin their clock ceiling and mode; other protocols
    // carry no such keys and any present are ignored.
    let (max_speed_hz, mode) = if protocol == Protocol::SPI {
        (
            require_int(section, "max-speed-hz", 4)? as u32,
            require_int(section, "mode", 1)? as u8,
        )
    } else {
        (0, 0)
    };

    // UART devices are unaddressed; everything else sits at a register.
    let reg = if protocol == Protocol::UART {
        0
    } else {
        require_int(section, "reg", 1)? as u8
    };

    let irq = match optional_int(section, "irq", 1)? {
        Some(line) => Some(Irq {
            line: line as u8,
            irq_type: require_int(section, "irq-type", 1)? as u8,
        }),
        None => None,
    };

    Ok(PendingDevice {
        section: section.header.clone(),
        driver_string_id,
        protocol,
        reg,
        irq,
        max_speed_hz,
        mode,
        prop_link: optional_int(section, "prop-link", 1)?.unwrap_or(0) as u8,
        gpio_link: optional_int(section, "gpio-link", 1)?.unwrap_or(0) as u8,
        reg_link: optional_int(section, "reg-link", 1)?.unwrap_or(0) as u8,
        clock_link: optional_int(section, "clock-link", 1)?.unwrap_or(0) as u8,
    })
}

/// Property fields before reference resolution.
struct PendingProperty {
    section: String,
    name_string_id: u8,
    prop_type: PropertyType,
    value: Vec<u64>,
}

fn property_fields(section: &RawSection) -> Result<PendingProperty, SchemaError> {
    let name_string_id = require_int(section, "name-string-id", 1)? as u8;
    let prop_type = PropertyType(require_int(section, "type", 1)? as u8);
    let Some(element_width) = prop_type.element_width() else {
        return Err(SchemaError::InvalidValue {
            section: section.header.clone(),
            key: "type".to_string(),
            reason: format!("unknown property type {:#x}", prop_type.0),
        });
    };
    let value = value_array(section, element_width)?;
    Ok(PendingProperty {
        section: section.header.clone(),
        name_string_id,
        prop_type,
        value,
    })
}

/// Parse a `value = <n n n>` array. Elements are plain decimal and must
/// fit the property type's element width.
fn value_array(section: &RawSection, element_width: u32) -> Result<Vec<u64>, SchemaError> {
    let text = section.require("value")?;
    let invalid = |reason: String| SchemaError::InvalidValue {
        section: section.header.clone(),
        key: "value".to_string(),
        reason,
    };

    if text.len() > PROPERTY_VALUE_TEXT_MAX {
        return Err(invalid(format!(
            "array text is too long ({} bytes, maximum is {PROPERTY_VALUE_TEXT_MAX})",
            text.len()
        )));
    }
    let inner = text
        .strip_prefix('<')
        .and_then(|rest| rest.strip_suffix('>'))
        .ok_or_else(|| invalid(format!("'{text}' is not wrapped in '<' and '>'")))?;

    let max = match element_width {
        8 => u64::MAX,
        n => (1u64 << (8 * n)) - 1,
    };
    let mut value = Vec::new();
    for element in inner.split_whitespace() {
        let parsed = element
            .parse::<u64>()
            .map_err(|_| invalid(format!("'{element}' is not a decimal integer")))?;
        if parsed > max {
            return Err(invalid(format!("{parsed} is out of range ([0:{max}])")));
        }
        value.push(parsed);
    }
    Ok(value)
}

fn bundle_fields(
    section: &RawSection,
    id: BundleId,
    next_nonzero: &mut u32,
) -> Result<BundleDescriptor, SchemaError> {
    let class = BundleClass(require_int(section, "class", 1)? as u8);
    if id.0 == 0 && class != BundleClass::CONTROL {
        return Err(SchemaError::InvalidValue {
            section: section.header.clone(),
            key: "class".to_string(),
            reason: "bundle 0 must be a 'Control' bundle".to_string(),
        });
    }
    if id.0 != 0 {
        // Non-zero bundle ids conventionally count 1, 2, 3, ... in order;
        // gaps load fine but are worth flagging.
        if u32::from(id.0) != *next_nonzero {
            tracing::warn!("non-incremental id for '[{}]'", section.header);
        }
        *next_nonzero += 1;
    }
    Ok(BundleDescriptor { id, class })
}

/// CPort fields before reference resolution.
struct PendingCport {
    section: String,
    bundle: u8,
    protocol: Protocol,
}

fn cport_fields(section: &RawSection, id: CportId) -> Result<PendingCport, SchemaError> {
    let bundle = require_int(section, "bundle", 1)? as u8;
    let protocol = Protocol(require_int(section, "protocol", 1)? as u8);
    if id.0 == 0 && protocol != Protocol::CONTROL {
        return Err(SchemaError::InvalidValue {
            section: section.header.clone(),
            key: "protocol".to_string(),
            reason: "cport 0 must be a 'Control' cport".to_string(),
        });
    }
    Ok(PendingCport {
        section: section.header.clone(),
        bundle,
        protocol,
    })
}

fn resolve_string(
    strings: &BTreeMap<StringId, StringDescriptor>,
    section: &str,
    key: &str,
    raw: u8,
) -> Result<StringId, SchemaError> {
    StringId::new(raw)
        .filter(|id| strings.contains_key(id))
        .ok_or_else(|| SchemaError::DanglingReference {
            section: section.to_string(),
            key: key.to_string(),
            id: raw,
        })
}

fn resolve_property(
    properties: &BTreeMap<PropertyId, PendingProperty>,
    section: &str,
    raw: u8,
) -> Result<PropertyId, SchemaError> {
    PropertyId::new(raw)
        .filter(|id| properties.contains_key(id))
        .ok_or_else(|| SchemaError::DanglingReference {
            section: section.to_string(),
            key: "prop-link".to_string(),
            id: raw,
        })
}
