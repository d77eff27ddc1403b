//! Bluetooth UUIDs
//!
//! Service and characteristic types are carried as full 128-bit values so
//! that 16-bit SIG short forms and vendor UUIDs compare uniformly.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

/// Bluetooth base UUID "00000000-0000-1000-8000-00805F9B34FB".
const BASE_UUID: u128 = 0x0000_0000_0000_1000_8000_0080_5F9B_34FB;

/// Short values occupy the top 32 bits of the base UUID.
const SHORT_SHIFT: u32 = 96;
const BASE_MASK: u128 = (1 << SHORT_SHIFT) - 1;

/// A 128-bit Bluetooth UUID.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Uuid(u128);

impl Uuid {
    /// Creates a UUID from a 16-bit SIG-assigned value.
    pub const fn from_u16(uuid16: u16) -> Self {
        Self::from_u32(uuid16 as u32)
    }

    /// Creates a UUID from a 32-bit SIG-assigned value.
    pub const fn from_u32(uuid32: u32) -> Self {
        Uuid(BASE_UUID | (uuid32 as u128) << SHORT_SHIFT)
    }

    /// Returns the 32-bit short form if this is a SIG-assigned UUID.
    pub fn as_u32(&self) -> Option<u32> {
        if self.0 & BASE_MASK == BASE_UUID {
            u32::try_from(self.0 >> SHORT_SHIFT).ok()
        } else {
            None
        }
    }

    /// Returns the 16-bit short form if this is a SIG-assigned 16-bit UUID.
    pub fn as_u16(&self) -> Option<u16> {
        self.as_u32().and_then(|short| u16::try_from(short).ok())
    }
}

impl fmt::Display for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = self.0;
        write!(
            f,
            "{:08x}-{:04x}-{:04x}-{:04x}-{:012x}",
            value >> 96,
            (value >> 80) & 0xFFFF,
            (value >> 64) & 0xFFFF,
            (value >> 48) & 0xFFFF,
            value & 0xFFFF_FFFF_FFFF
        )
    }
}

impl fmt::Debug for Uuid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.as_u16(), self.as_u32()) {
            (Some(short), _) => write!(f, "Uuid(0x{:04X})", short),
            (None, Some(short)) => write!(f, "Uuid(0x{:08X})", short),
            _ => write!(f, "Uuid({})", self),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum UuidParseError {
    #[error("UUID must have 4, 8 or 32 hex digits")]
    InvalidLength,

    #[error("invalid UUID digits")]
    InvalidFormat(#[from] ParseIntError),

    #[error("invalid UUID hex: {0}")]
    Hex(#[from] hex::FromHexError),
}

impl FromStr for Uuid {
    type Err = UuidParseError;

    /// Accepts "1803", "00001803" or the full form with or without hyphens.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits: String = s
            .trim()
            .trim_start_matches("0x")
            .chars()
            .filter(|c| *c != '-')
            .collect();

        match digits.len() {
            4 => Ok(Uuid::from_u16(u16::from_str_radix(&digits, 16)?)),
            8 => Ok(Uuid::from_u32(u32::from_str_radix(&digits, 16)?)),
            32 => {
                let mut bytes = [0u8; 16];
                hex::decode_to_slice(&digits, &mut bytes)?;
                Ok(Uuid(u128::from_be_bytes(bytes)))
            }
            _ => Err(UuidParseError::InvalidLength),
        }
    }
}
