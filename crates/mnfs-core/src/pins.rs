//! # mikroBUS Pin Roles and States
//!
//! The mikroBUS header exposes twelve configurable pins. A manifest's
//! `[mikrobus-descriptor]` section assigns each of them a pin-control
//! state code, keyed `<role>-state` (`pwm-state`, `int-state`, ...).
//!
//! State codes are opaque to this toolchain: they select a pinctrl
//! configuration on the host and pass through parsing, serialization,
//! and digest computation untouched.

use serde::{Deserialize, Serialize};

/// One of the twelve configurable mikroBUS header pins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PinRole {
    /// PWM output.
    Pwm,
    /// Interrupt input.
    Int,
    /// UART receive.
    Rx,
    /// UART transmit.
    Tx,
    /// I2C clock.
    Scl,
    /// I2C data.
    Sda,
    /// SPI controller-out.
    Mosi,
    /// SPI controller-in.
    Miso,
    /// SPI clock.
    Sck,
    /// SPI chip-select.
    Cs,
    /// Reset.
    Rst,
    /// Analog input.
    An,
}

impl PinRole {
    /// All twelve roles, in the order the descriptor section lists them.
    pub const ALL: [PinRole; 12] = [
        PinRole::Pwm,
        PinRole::Int,
        PinRole::Rx,
        PinRole::Tx,
        PinRole::Scl,
        PinRole::Sda,
        PinRole::Mosi,
        PinRole::Miso,
        PinRole::Sck,
        PinRole::Cs,
        PinRole::Rst,
        PinRole::An,
    ];

    /// The pin name as it appears on the mikroBUS header.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pwm => "pwm",
            Self::Int => "int",
            Self::Rx => "rx",
            Self::Tx => "tx",
            Self::Scl => "scl",
            Self::Sda => "sda",
            Self::Mosi => "mosi",
            Self::Miso => "miso",
            Self::Sck => "sck",
            Self::Cs => "cs",
            Self::Rst => "rst",
            Self::An => "an",
        }
    }

    /// The key this role uses in a `[mikrobus-descriptor]` section.
    pub fn key(&self) -> &'static str {
        match self {
            Self::Pwm => "pwm-state",
            Self::Int => "int-state",
            Self::Rx => "rx-state",
            Self::Tx => "tx-state",
            Self::Scl => "scl-state",
            Self::Sda => "sda-state",
            Self::Mosi => "mosi-state",
            Self::Miso => "miso-state",
            Self::Sck => "sck-state",
            Self::Cs => "cs-state",
            Self::Rst => "rst-state",
            Self::An => "an-state",
        }
    }
}

impl std::fmt::Display for PinRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pin-control state code for one mikroBUS pin.
///
/// The host's add-on board loader interprets the code; manifests carry it
/// verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PinState(pub u8);

impl std::fmt::Display for PinState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_twelve_distinct_roles() {
        let mut keys: Vec<&str> = PinRole::ALL.iter().map(|r| r.key()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), 12);
    }

    #[test]
    fn test_role_keys_are_suffixed_names() {
        for role in PinRole::ALL {
            assert_eq!(role.key(), format!("{}-state", role.as_str()));
        }
    }

    #[test]
    fn test_descriptor_order_starts_with_pwm_ends_with_an() {
        assert_eq!(PinRole::ALL[0], PinRole::Pwm);
        assert_eq!(PinRole::ALL[11], PinRole::An);
    }

    #[test]
    fn test_pin_state_displays_hex() {
        assert_eq!(PinState(0x4).to_string(), "0x4");
        assert_eq!(PinState(0).to_string(), "0x0");
    }
}
