//! Link Loss Service assigned numbers and value types

use super::error::{LlsError, Status};
use crate::att::AttErrorCode;
use crate::uuid::Uuid;
use std::fmt;

/// Link Loss Service
pub const LINK_LOSS_SERVICE_UUID: u16 = 0x1803;
/// Alert Level characteristic
pub const ALERT_LEVEL_CHARACTERISTIC_UUID: u16 = 0x2A06;

/// Number of characteristics the client resolves for one service instance.
pub const LLS_NUM_CHARACTERISTICS: usize = 1;
/// Index of the Alert Level characteristic in the handle table.
pub const ALERT_LEVEL_INDEX: usize = 0;
/// Encoded length of an Alert Level value.
pub const ALERT_LEVEL_VALUE_LEN: usize = 1;

pub const fn link_loss_service_uuid() -> Uuid {
    Uuid::from_u16(LINK_LOSS_SERVICE_UUID)
}

pub const fn alert_level_uuid() -> Uuid {
    Uuid::from_u16(ALERT_LEVEL_CHARACTERISTIC_UUID)
}

/// Alert level of the remote Link Loss Service.
///
/// `Disabled` is carried as an opaque third value; no behaviour beyond
/// reading and writing it is attached to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AlertLevel {
    Off = 0x00,
    On = 0x01,
    Disabled = 0x02,
}

impl AlertLevel {
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Decodes a characteristic value as received from the peer.
    ///
    /// A value of the wrong length reports
    /// [`AttErrorCode::InvalidAttributeValueLength`], an unknown level
    /// reports [`Status::InvalidValue`].
    pub fn decode(value: &[u8]) -> Result<AlertLevel, Status> {
        match value {
            [raw] => AlertLevel::try_from(*raw).map_err(Status::from),
            _ => Err(Status::Att(AttErrorCode::InvalidAttributeValueLength)),
        }
    }
}

impl TryFrom<u8> for AlertLevel {
    type Error = LlsError;

    fn try_from(raw: u8) -> Result<Self, Self::Error> {
        match raw {
            0x00 => Ok(AlertLevel::Off),
            0x01 => Ok(AlertLevel::On),
            0x02 => Ok(AlertLevel::Disabled),
            _ => Err(LlsError::InvalidValue),
        }
    }
}

impl From<AlertLevel> for u8 {
    fn from(level: AlertLevel) -> u8 {
        level.as_u8()
    }
}

/// Opaque identifier of one client record.
///
/// The low byte addresses the registry slot and the upper 24 bits carry the
/// slot generation, which is never zero. An identifier stays unique while its
/// record is alive and goes stale as soon as the record is released.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(u32);

const INDEX_BITS: u32 = 8;
const INDEX_MASK: u32 = (1 << INDEX_BITS) - 1;

/// Largest generation that fits above the slot index.
pub(crate) const MAX_GENERATION: u32 = u32::MAX >> INDEX_BITS;

impl ConnectionId {
    pub(crate) fn new(index: usize, generation: u32) -> Self {
        let index = u32::try_from(index).unwrap_or(INDEX_MASK) & INDEX_MASK;
        ConnectionId((generation << INDEX_BITS) | index)
    }

    pub(crate) fn index(&self) -> usize {
        (self.0 & INDEX_MASK) as usize
    }

    pub(crate) fn generation(&self) -> u32 {
        self.0 >> INDEX_BITS
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl From<u32> for ConnectionId {
    fn from(raw: u32) -> Self {
        ConnectionId(raw)
    }
}

impl fmt::Debug for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ConnectionId(0x{:08x})", self.0)
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}
