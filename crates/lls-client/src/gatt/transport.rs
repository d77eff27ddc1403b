//! Request seams towards the attribute transport and the discovery engine
//!
//! Both collaborators are asynchronous: a request only starts an operation and
//! its outcome is reported back later through the `on_*` entry points of the
//! service client, tagged with the connection identifier passed here.

use super::types::ConHandle;
use crate::att::AttErrorCode;
use crate::lls::ConnectionId;
use crate::uuid::Uuid;
use thiserror::Error;

/// Why a transport request could not be handed off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DispatchError {
    /// The transport cannot accept a request right now. It must call
    /// `on_can_send_now` for this connection once it can.
    #[error("transport busy")]
    Busy,

    /// The request was refused outright.
    #[error("request failed: {0}")]
    Failed(AttErrorCode),
}

/// Why discovery of the service failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DiscoveryError {
    #[error("service not found")]
    ServiceNotFound,

    #[error("discovery failed: {0}")]
    Att(AttErrorCode),
}

/// Asynchronous read/write by attribute handle.
pub trait AttTransport {
    /// Read the value at `value_handle`; the result comes back through
    /// `on_read_result(cid, ..)`.
    fn read_value(
        &mut self,
        cid: ConnectionId,
        con_handle: ConHandle,
        value_handle: u16,
    ) -> Result<(), DispatchError>;

    /// Write `value` to `value_handle` with response; the result comes back
    /// through `on_write_result(cid, ..)`.
    fn write_value(
        &mut self,
        cid: ConnectionId,
        con_handle: ConHandle,
        value_handle: u16,
        value: &[u8],
    ) -> Result<(), DispatchError>;
}

/// Resolves a primary service and its characteristics on a connection.
pub trait ServiceDiscovery {
    /// Starts discovery. Completion is reported through
    /// `on_discovery_complete(cid, ..)` with one entry per requested UUID, in
    /// request order.
    fn discover(
        &mut self,
        cid: ConnectionId,
        con_handle: ConHandle,
        service_uuid: &Uuid,
        characteristic_uuids: &[Uuid],
    );
}
