//! Usage errors and event status codes

use crate::att::AttErrorCode;
use crate::gatt::DiscoveryError;
use std::fmt;
use thiserror::Error;

/// Precondition violations, reported synchronously by the client API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LlsError {
    #[error("a client is already associated with this connection handle")]
    AlreadyConnected,

    #[error("no free client record")]
    ResourceExhausted,

    #[error("client is not ready for this operation")]
    WrongState,

    #[error("unknown connection identifier")]
    NotFound,

    #[error("invalid alert level")]
    InvalidValue,
}

/// Status carried by events delivered to the application.
///
/// ATT codes reported by the peer or the transport are passed through in
/// [`Status::Att`]; `AttErrorCode::NoError` folds into `Success` unless the
/// code accompanies a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Success,
    AlreadyConnected,
    ResourceExhausted,
    WrongState,
    NotFound,
    ServiceNotFound,
    InvalidValue,
    Att(AttErrorCode),
}

impl Status {
    pub fn is_success(&self) -> bool {
        matches!(self, Status::Success)
    }

    /// Status for an operation known to have failed; never `Success`.
    pub fn failure(code: AttErrorCode) -> Self {
        match Status::from(code) {
            Status::Success => Status::Att(AttErrorCode::Unlikely),
            status => status,
        }
    }
}

impl From<LlsError> for Status {
    fn from(err: LlsError) -> Self {
        match err {
            LlsError::AlreadyConnected => Status::AlreadyConnected,
            LlsError::ResourceExhausted => Status::ResourceExhausted,
            LlsError::WrongState => Status::WrongState,
            LlsError::NotFound => Status::NotFound,
            LlsError::InvalidValue => Status::InvalidValue,
        }
    }
}

impl From<AttErrorCode> for Status {
    fn from(code: AttErrorCode) -> Self {
        match code {
            AttErrorCode::NoError => Status::Success,
            code => Status::Att(code),
        }
    }
}

impl From<DiscoveryError> for Status {
    fn from(err: DiscoveryError) -> Self {
        match err {
            DiscoveryError::ServiceNotFound => Status::ServiceNotFound,
            DiscoveryError::Att(AttErrorCode::NoError) => Status::ServiceNotFound,
            DiscoveryError::Att(code) => Status::Att(code),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Success => f.write_str("success"),
            Status::AlreadyConnected => f.write_str("already connected"),
            Status::ResourceExhausted => f.write_str("resource exhausted"),
            Status::WrongState => f.write_str("wrong state"),
            Status::NotFound => f.write_str("not found"),
            Status::ServiceNotFound => f.write_str("service not found"),
            Status::InvalidValue => f.write_str("invalid value"),
            Status::Att(code) => write!(f, "ATT error {}", code),
        }
    }
}

/// Result type of the client API
pub type LlsResult<T> = Result<T, LlsError>;
