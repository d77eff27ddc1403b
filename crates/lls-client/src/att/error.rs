//! ATT error codes
use std::fmt;
use std::ops::RangeInclusive;

const APPLICATION_ERRORS: RangeInclusive<u8> = 0x80..=0x9F;
const COMMON_PROFILE_ERRORS: RangeInclusive<u8> = 0xE0..=0xFF;

/// ATT error codes as reported by a remote attribute server.
///
/// Every `u8` maps to exactly one variant and back, so codes outside the
/// well-known set survive a round trip through this type unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttErrorCode {
    /// No error
    NoError,
    InvalidHandle,
    ReadNotPermitted,
    WriteNotPermitted,
    InvalidPdu,
    InsufficientAuthentication,
    RequestNotSupported,
    InvalidOffset,
    InsufficientAuthorization,
    PrepareQueueFull,
    AttributeNotFound,
    AttributeNotLong,
    InsufficientEncryptionKeySize,
    InvalidAttributeValueLength,
    Unlikely,
    InsufficientEncryption,
    UnsupportedGroupType,
    InsufficientResources,
    DatabaseOutOfSync,
    ValueNotAllowed,
    /// Application error (0x80..=0x9F)
    ApplicationError(u8),
    /// Common profile and service error (0xE0..=0xFF)
    CommonProfileError(u8),
    /// Reserved for future use
    Unknown(u8),
}

/// Codes 0x00..=0x13, indexed by their value.
const DEFINED: [AttErrorCode; 20] = [
    AttErrorCode::NoError,
    AttErrorCode::InvalidHandle,
    AttErrorCode::ReadNotPermitted,
    AttErrorCode::WriteNotPermitted,
    AttErrorCode::InvalidPdu,
    AttErrorCode::InsufficientAuthentication,
    AttErrorCode::RequestNotSupported,
    AttErrorCode::InvalidOffset,
    AttErrorCode::InsufficientAuthorization,
    AttErrorCode::PrepareQueueFull,
    AttErrorCode::AttributeNotFound,
    AttErrorCode::AttributeNotLong,
    AttErrorCode::InsufficientEncryptionKeySize,
    AttErrorCode::InvalidAttributeValueLength,
    AttErrorCode::Unlikely,
    AttErrorCode::InsufficientEncryption,
    AttErrorCode::UnsupportedGroupType,
    AttErrorCode::InsufficientResources,
    AttErrorCode::DatabaseOutOfSync,
    AttErrorCode::ValueNotAllowed,
];

impl AttErrorCode {
    pub fn is_success(&self) -> bool {
        matches!(self, AttErrorCode::NoError)
    }
}

impl From<u8> for AttErrorCode {
    fn from(code: u8) -> Self {
        if let Some(defined) = DEFINED.get(usize::from(code)) {
            *defined
        } else if APPLICATION_ERRORS.contains(&code) {
            AttErrorCode::ApplicationError(code)
        } else if COMMON_PROFILE_ERRORS.contains(&code) {
            AttErrorCode::CommonProfileError(code)
        } else {
            AttErrorCode::Unknown(code)
        }
    }
}

impl From<AttErrorCode> for u8 {
    fn from(code: AttErrorCode) -> u8 {
        match code {
            AttErrorCode::ApplicationError(raw)
            | AttErrorCode::CommonProfileError(raw)
            | AttErrorCode::Unknown(raw) => raw,
            defined => DEFINED
                .iter()
                .position(|candidate| *candidate == defined)
                .and_then(|index| u8::try_from(index).ok())
                .unwrap_or(0),
        }
    }
}

impl fmt::Display for AttErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} (0x{:02x})", self, u8::from(*self))
    }
}
