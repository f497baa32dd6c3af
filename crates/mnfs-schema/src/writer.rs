//! # Canonical Writer and Content Digest
//!
//! Render a loaded [`Manifest`] back to text in one fixed shape, and hash
//! that shape. Hand-written manifests vary freely — comment lines, key
//! order, decimal versus hex, sections in any order — so equality and
//! digests are never computed over source text. The canonical text is the
//! sole digest input: two manifests that load to the same model always
//! produce the same digest, whatever their authors typed.
//!
//! ## Shape
//!
//! Sections are emitted in a fixed order — header, interface, mikrobus,
//! then devices, properties, strings, bundles, cports, each ascending by
//! id — separated by one blank line. Values render as `0x`-hex except in
//! the header block and property fields, which stay decimal. The optional
//! `irq`/`irq-type` pair is omitted entirely when the device has no
//! interrupt, so "no irq" survives a round trip. Annotation comments mark
//! the interface strings and name each bundle class and cport protocol.

use mnfs_core::{
    sha256_digest, BundleDescriptor, ContentDigest, CportDescriptor, DeviceDescriptor,
    InterfaceDescriptor, Manifest, ManifestHeader, MikrobusDescriptor, PinRole,
    PropertyDescriptor, StringDescriptor,
};

/// The canonical rendering of a manifest.
///
/// Only [`to_canonical`] constructs one, so holding a `CanonicalText` is
/// proof the text has the canonical shape and can be digested or compared
/// byte-for-byte.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalText(String);

impl CanonicalText {
    /// The canonical text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the underlying string.
    pub fn into_string(self) -> String {
        self.0
    }

    /// Digest of the canonical bytes.
    pub fn digest(&self) -> ContentDigest {
        sha256_digest(self.0.as_bytes())
    }
}

impl std::fmt::Display for CanonicalText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Render a manifest in canonical shape.
///
/// Loading the result yields a manifest equal to the input, and rendering
/// that again reproduces the result byte-for-byte — canonical text is a
/// fixed point.
pub fn to_canonical(manifest: &Manifest) -> CanonicalText {
    let mut blocks = Vec::new();
    blocks.push(header_block(&manifest.header));
    blocks.push(interface_block(&manifest.interface));
    blocks.push(mikrobus_block(&manifest.mikrobus));
    for device in manifest.devices.values() {
        blocks.push(device_block(device));
    }
    for property in manifest.properties.values() {
        blocks.push(property_block(property));
    }
    for string in manifest.strings.values() {
        blocks.push(string_block(string, &manifest.interface));
    }
    for bundle in manifest.bundles.values() {
        blocks.push(bundle_block(bundle));
    }
    for cport in manifest.cports.values() {
        blocks.push(cport_block(cport));
    }
    CanonicalText(blocks.join("\n\n") + "\n")
}

/// Digest of a manifest's canonical rendering.
pub fn digest(manifest: &Manifest) -> ContentDigest {
    to_canonical(manifest).digest()
}

// Block builders return their lines joined by '\n', without a trailing
// newline; [`to_canonical`] owns the separators.

fn header_block(header: &ManifestHeader) -> String {
    format!(
        "[manifest-header]\nversion-major = {}\nversion-minor = {}",
        header.version_major, header.version_minor
    )
}

fn interface_block(interface: &InterfaceDescriptor) -> String {
    format!(
        "[interface-descriptor]\nvendor-string-id = {:#x}\nproduct-string-id = {:#x}",
        interface.vendor_string_id.get(),
        interface.product_string_id.get()
    )
}

fn mikrobus_block(mikrobus: &MikrobusDescriptor) -> String {
    let mut lines = vec!["[mikrobus-descriptor]".to_string()];
    for role in PinRole::ALL {
        lines.push(format!("{} = {}", role.key(), mikrobus.state(role)));
    }
    lines.join("\n")
}

fn device_block(device: &DeviceDescriptor) -> String {
    let mut lines = vec![format!("[device-descriptor {:#x}]", device.id.0)];
    lines.push(format!(
        "driver-string-id = {:#x}",
        device.driver_string_id.get()
    ));
    lines.push(format!("protocol = {:#x}", device.protocol.0));
    lines.push(format!("reg = {:#x}", device.reg));
    if let Some(irq) = device.irq {
        lines.push(format!("irq = {:#x}", irq.line));
        lines.push(format!("irq-type = {:#x}", irq.irq_type));
    }
    lines.push(format!("max-speed-hz = {:#x}", device.max_speed_hz));
    lines.push(format!("mode = {:#x}", device.mode));
    lines.push(format!(
        "prop-link = {:#x}",
        device.prop_link.map_or(0, |link| link.get())
    ));
    lines.push(format!("gpio-link = {:#x}", device.gpio_link));
    lines.push(format!("reg-link = {:#x}", device.reg_link));
    lines.push(format!("clock-link = {:#x}", device.clock_link));
    lines.join("\n")
}

fn property_block(property: &PropertyDescriptor) -> String {
    let elements: Vec<String> = property.value.iter().map(u64::to_string).collect();
    format!(
        "[property-descriptor {:#x}]\nname-string-id = {}\ntype = {}\nvalue = <{}>",
        property.id.get(),
        property.name_string_id.get(),
        property.prop_type.0,
        elements.join(" ")
    )
}

fn string_block(string: &StringDescriptor, interface: &InterfaceDescriptor) -> String {
    let mut lines = Vec::new();
    if string.id == interface.vendor_string_id {
        lines.push("; Interface vendor string".to_string());
    } else if string.id == interface.product_string_id {
        lines.push("; Interface product string".to_string());
    }
    lines.push(format!("[string-descriptor {:#x}]", string.id.get()));
    lines.push(format!("string = {}", string.string));
    lines.join("\n")
}

fn bundle_block(bundle: &BundleDescriptor) -> String {
    format!(
        "; '{}' class on Bundle {}\n[bundle-descriptor {:#x}]\nclass = {:#x}",
        bundle.class.name(),
        bundle.id.0,
        bundle.id.0,
        bundle.class.0
    )
}

fn cport_block(cport: &CportDescriptor) -> String {
    format!(
        "; '{}' protocol on CPort {}\n[cport-descriptor {:#x}]\nbundle = {:#x}\nprotocol = {:#x}",
        cport.protocol.name(),
        cport.id.0,
        cport.id.0,
        cport.bundle.0,
        cport.protocol.0
    )
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::load::load;
    use mnfs_core::{
        BundleClass, BundleId, CportId, DeviceId, Irq, PinState, PropertyId, PropertyType,
        Protocol, StringDescriptor, StringId,
    };
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    /// Free-form descriptor text: trimming-stable and newline-free.
    fn arb_label() -> impl Strategy<Value = String> {
        "[A-Za-z0-9][A-Za-z0-9 _.+-]{0,28}[A-Za-z0-9]|[A-Za-z0-9]"
    }

    fn arb_strings() -> impl Strategy<Value = BTreeMap<StringId, StringDescriptor>> {
        prop::collection::vec(arb_label(), 2..6).prop_map(|texts| {
            texts
                .into_iter()
                .enumerate()
                .map(|(index, text)| {
                    let id = StringId::new(index as u8 + 1).unwrap();
                    (id, StringDescriptor { id, string: text })
                })
                .collect()
        })
    }

    #[derive(Debug, Clone)]
    struct DeviceSeed {
        driver_index: prop::sample::Index,
        protocol: u8,
        reg: u8,
        irq: Option<(u8, u8)>,
        max_speed_hz: u32,
        mode: u8,
        prop_index: Option<prop::sample::Index>,
        gpio_link: u8,
        reg_link: u8,
        clock_link: u8,
    }

    fn arb_device_seed() -> impl Strategy<Value = DeviceSeed> {
        (
            any::<prop::sample::Index>(),
            prop_oneof![Just(0x02u8), Just(0x03), Just(0x04), Just(0x0b), Just(0x0e)],
            any::<u8>(),
            prop::option::of((any::<u8>(), any::<u8>())),
            any::<u32>(),
            0u8..=3,
            prop::option::of(any::<prop::sample::Index>()),
            any::<u8>(),
            any::<u8>(),
            any::<u8>(),
        )
            .prop_map(
                |(
                    driver_index,
                    protocol,
                    reg,
                    irq,
                    max_speed_hz,
                    mode,
                    prop_index,
                    gpio_link,
                    reg_link,
                    clock_link,
                )| DeviceSeed {
                    driver_index,
                    protocol,
                    reg,
                    irq,
                    max_speed_hz,
                    mode,
                    prop_index,
                    gpio_link,
                    reg_link,
                    clock_link,
                },
            )
    }

    #[derive(Debug, Clone)]
    struct PropertySeed {
        name_index: prop::sample::Index,
        type_code: u8,
        raw_elements: Vec<u64>,
    }

    fn arb_property_seed() -> impl Strategy<Value = PropertySeed> {
        (
            any::<prop::sample::Index>(),
            0u8..=8,
            prop::collection::vec(any::<u64>(), 0..5),
        )
            .prop_map(|(name_index, type_code, raw_elements)| PropertySeed {
                name_index,
                type_code,
                raw_elements,
            })
    }

    /// A whole manifest the loader's own rules hold for, assembled the way
    /// the loader would have produced it.
    fn arb_manifest() -> impl Strategy<Value = Manifest> {
        (
            arb_strings(),
            any::<prop::sample::Index>(),
            any::<prop::sample::Index>(),
            prop::array::uniform12(any::<u8>()),
            prop::collection::btree_map(0u8..=5, arb_device_seed(), 0..4),
            prop::collection::btree_map(1u8..=5, arb_property_seed(), 0..3),
            prop::option::of((
                prop::collection::btree_map(1u8..=3, any::<u8>(), 0..3),
                prop::collection::btree_map(
                    1u16..=6,
                    (
                        any::<prop::sample::Index>(),
                        prop_oneof![
                            Just(Protocol::GPIO),
                            Just(Protocol::I2C),
                            Just(Protocol::UART),
                            Just(Protocol::SPI),
                            Just(Protocol(0x0e)),
                        ],
                    ),
                    0..3,
                ),
            )),
        )
            .prop_map(
                |(strings, vendor_index, product_index, states, device_seeds, property_seeds, greybus)| {
                    let string_ids: Vec<StringId> = strings.keys().copied().collect();

                    let mut properties = BTreeMap::new();
                    for (raw_id, seed) in property_seeds {
                        let id = PropertyId::new(raw_id).unwrap();
                        let prop_type = PropertyType(seed.type_code);
                        let mask = match prop_type.element_width().unwrap() {
                            8 => u64::MAX,
                            width => (1u64 << (8 * width)) - 1,
                        };
                        properties.insert(
                            id,
                            PropertyDescriptor {
                                id,
                                name_string_id: *seed.name_index.get(&string_ids),
                                prop_type,
                                value: seed.raw_elements.iter().map(|raw| raw & mask).collect(),
                            },
                        );
                    }
                    let property_ids: Vec<PropertyId> = properties.keys().copied().collect();

                    let mut devices = BTreeMap::new();
                    for (raw_id, seed) in device_seeds {
                        let id = DeviceId(raw_id);
                        let protocol = Protocol(seed.protocol);
                        let (max_speed_hz, mode) = if protocol == Protocol::SPI {
                            (seed.max_speed_hz, seed.mode)
                        } else {
                            (0, 0)
                        };
                        let reg = if protocol == Protocol::UART { 0 } else { seed.reg };
                        devices.insert(
                            id,
                            DeviceDescriptor {
                                id,
                                driver_string_id: *seed.driver_index.get(&string_ids),
                                protocol,
                                reg,
                                irq: seed.irq.map(|(line, irq_type)| Irq { line, irq_type }),
                                max_speed_hz,
                                mode,
                                prop_link: seed.prop_index.and_then(|index| {
                                    if property_ids.is_empty() {
                                        None
                                    } else {
                                        Some(*index.get(&property_ids))
                                    }
                                }),
                                gpio_link: seed.gpio_link,
                                reg_link: seed.reg_link,
                                clock_link: seed.clock_link,
                            },
                        );
                    }

                    let mut bundles = BTreeMap::new();
                    let mut cports = BTreeMap::new();
                    if let Some((extra_bundles, cport_seeds)) = greybus {
                        bundles.insert(
                            BundleId(0),
                            BundleDescriptor {
                                id: BundleId(0),
                                class: BundleClass::CONTROL,
                            },
                        );
                        for (raw_id, class) in extra_bundles {
                            bundles.insert(
                                BundleId(raw_id),
                                BundleDescriptor {
                                    id: BundleId(raw_id),
                                    class: BundleClass(class),
                                },
                            );
                        }
                        let bundle_ids: Vec<BundleId> = bundles.keys().copied().collect();

                        cports.insert(
                            CportId(0),
                            CportDescriptor {
                                id: CportId(0),
                                bundle: BundleId(0),
                                protocol: Protocol::CONTROL,
                            },
                        );
                        for (raw_id, (bundle_index, protocol)) in cport_seeds {
                            cports.insert(
                                CportId(raw_id),
                                CportDescriptor {
                                    id: CportId(raw_id),
                                    bundle: *bundle_index.get(&bundle_ids),
                                    protocol,
                                },
                            );
                        }
                    }

                    Manifest {
                        header: ManifestHeader {
                            version_major: 0,
                            version_minor: 1,
                        },
                        interface: InterfaceDescriptor {
                            vendor_string_id: *vendor_index.get(&string_ids),
                            product_string_id: *product_index.get(&string_ids),
                        },
                        mikrobus: {
                            let [pwm, int, rx, tx, scl, sda, mosi, miso, sck, cs, rst, an] =
                                states.map(PinState);
                            MikrobusDescriptor {
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
                            }
                        },
                        devices,
                        properties,
                        strings,
                        bundles,
                        cports,
                    }
                },
            )
    }

    proptest! {
        /// The canonical text of any valid manifest loads back to the
        /// same manifest, and canonicalizing again is byte-stable.
        #[test]
        fn canonical_round_trip(manifest in arb_manifest()) {
            let canonical = to_canonical(&manifest);
            let reloaded = load(canonical.as_str()).expect("canonical text must load");
            prop_assert_eq!(&reloaded, &manifest);
            let recanonical = to_canonical(&reloaded);
            prop_assert_eq!(recanonical.as_str(), canonical.as_str());
        }

        #[test]
        fn digest_is_stable_across_the_round_trip(manifest in arb_manifest()) {
            let reloaded = load(to_canonical(&manifest).as_str()).unwrap();
            prop_assert_eq!(digest(&reloaded), digest(&manifest));
        }

        /// Everything a loaded manifest points at exists.
        #[test]
        fn loaded_references_resolve(manifest in arb_manifest()) {
            let reloaded = load(to_canonical(&manifest).as_str()).unwrap();
            prop_assert!(reloaded.vendor().is_some());
            prop_assert!(reloaded.product().is_some());
            for device in reloaded.devices.values() {
                prop_assert!(reloaded.driver(device).is_some());
                if let Some(link) = device.prop_link {
                    prop_assert!(reloaded.properties.contains_key(&link));
                }
            }
            for property in reloaded.properties.values() {
                prop_assert!(reloaded.string(property.name_string_id).is_some());
            }
            for cport in reloaded.cports.values() {
                prop_assert!(reloaded.bundles.contains_key(&cport.bundle));
            }
        }
    }
}
