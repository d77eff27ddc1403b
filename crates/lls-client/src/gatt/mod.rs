//! GATT client-side collaborators
//!
//! The attribute transport and the discovery engine live outside this crate.
//! This module defines what they hand back (resolved characteristics) and the
//! request traits the service client drives them through.

pub mod transport;
pub mod types;

pub use transport::{AttTransport, DiscoveryError, DispatchError, ServiceDiscovery};
pub use types::{Characteristic, CharacteristicProperties, ConHandle};
