use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// TIC protocol variant selected by the meter configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolMode {
    /// Legacy output: 1200 baud, space separators, no timestamp field.
    #[default]
    Historical,
    /// Linky output: 9600 baud, tab separators, optional horodate field.
    Standard,
}

impl ProtocolMode {
    /// Field separator byte.
    pub fn separator(self) -> u8 {
        match self {
            Self::Historical => b' ',
            Self::Standard => b'\t',
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Historical => "historical",
            Self::Standard => "standard",
        }
    }

    /// Line settings the transport opener must apply for this mode.
    pub fn serial_config(self) -> SerialConfig {
        match self {
            Self::Historical => SerialConfig {
                baud_rate: 1200,
                data_bits: 7,
                parity: ParityMode::None,
                stop_bits: 1,
            },
            Self::Standard => SerialConfig {
                baud_rate: 9600,
                data_bits: 7,
                parity: ParityMode::Even,
                stop_bits: 1,
            },
        }
    }
}

impl fmt::Display for ProtocolMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProtocolMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "historical" | "historique" => Ok(Self::Historical),
            "standard" => Ok(Self::Standard),
            other => Err(format!(
                "Invalid protocol mode '{}': must be 'historical' or 'standard'",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ParityMode {
    None,
    Even,
    Odd,
}

/// Serial line parameters. Consumed by whatever opens the port, never by the
/// decoding pipeline.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SerialConfig {
    pub baud_rate: u32,
    pub data_bits: u8,
    pub parity: ParityMode,
    pub stop_bits: u8,
}

impl SerialConfig {
    /// Framing string such as "7E1".
    pub fn framing(&self) -> String {
        let parity = match self.parity {
            ParityMode::None => 'N',
            ParityMode::Even => 'E',
            ParityMode::Odd => 'O',
        };
        format!("{}{}{}", self.data_bits, parity, self.stop_bits)
    }
}
