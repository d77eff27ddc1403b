//! Common types for GATT operations

use crate::uuid::Uuid;
use bitflags::bitflags;

/// Transport-level connection handle.
pub type ConHandle = u16;

/// Handle value the discovery engine reports for an attribute it did not find.
pub const ATT_HANDLE_NONE: u16 = 0x0000;

bitflags! {
    /// Characteristic properties as defined in the Bluetooth specification
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct CharacteristicProperties: u8 {
        const BROADCAST = 0x01;
        const READ = 0x02;
        const WRITE_WITHOUT_RESPONSE = 0x04;
        const WRITE = 0x08;
        const NOTIFY = 0x10;
        const INDICATE = 0x20;
        const AUTHENTICATED_SIGNED_WRITES = 0x40;
        const EXTENDED_PROPERTIES = 0x80;
    }
}

impl CharacteristicProperties {
    /// Whether the server may push values without a read
    pub fn can_push(&self) -> bool {
        self.intersects(Self::NOTIFY | Self::INDICATE)
    }
}

/// A characteristic resolved by the discovery engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Characteristic {
    /// Characteristic UUID
    pub uuid: Uuid,
    /// Declaration handle
    pub start_handle: u16,
    /// Value handle
    pub value_handle: u16,
    /// Last handle belonging to this characteristic (descriptors included)
    pub end_handle: u16,
    /// Characteristic properties
    pub properties: CharacteristicProperties,
}

impl Characteristic {
    /// Whether discovery actually located this characteristic.
    pub fn is_resolved(&self) -> bool {
        self.value_handle != ATT_HANDLE_NONE
    }
}
