//! Attribute Protocol (ATT) status codes
//!
//! Only the error taxonomy is needed on this side of the transport: results
//! delivered by the attribute transport carry one of these codes and are
//! passed through to the application verbatim.

pub mod error;

pub use self::error::AttErrorCode;
