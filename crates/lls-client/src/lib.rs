//! Link Loss Service client for Bluetooth LE centrals
//!
//! This crate implements the client side of the Link Loss Service on top of
//! an externally provided attribute transport and GATT discovery engine. It
//! keeps one record per remote connection in caller-owned, fixed-capacity
//! storage and serializes reads and writes of the Alert Level characteristic
//! per connection.

pub mod att;
pub mod gatt;
pub mod lls;
pub mod uuid;

// Re-export common types for convenience
pub use att::AttErrorCode;
pub use gatt::{
    AttTransport, Characteristic, CharacteristicProperties, ConHandle, DiscoveryError,
    DispatchError, ServiceDiscovery,
};
pub use lls::{
    AlertLevel, ClientConfig, ClientState, ConnectionId, EventHandler, LinkLossClient, LlsError,
    LlsEvent, Status,
};
pub use uuid::Uuid;
