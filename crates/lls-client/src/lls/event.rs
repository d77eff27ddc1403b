//! Events delivered to the application

use super::error::Status;
use super::types::{AlertLevel, ConnectionId};
use crate::gatt::ConHandle;

/// Event emitted by a client record to its application handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlsEvent {
    /// Discovery finished. On failure the record is already gone.
    Connected {
        cid: ConnectionId,
        con_handle: ConHandle,
        status: Status,
    },
    /// Result of a read, or a value pushed by the server. `level` is set
    /// only when `status` is `Success`.
    AlertLevel {
        cid: ConnectionId,
        status: Status,
        level: Option<AlertLevel>,
    },
    /// Result of a write.
    WriteComplete { cid: ConnectionId, status: Status },
    /// The record was released.
    Disconnected { cid: ConnectionId },
}

impl LlsEvent {
    /// Builds the event for a received alert level value.
    pub(crate) fn alert_level_value(cid: ConnectionId, value: &[u8]) -> Self {
        match AlertLevel::decode(value) {
            Ok(level) => LlsEvent::AlertLevel {
                cid,
                status: Status::Success,
                level: Some(level),
            },
            Err(status) => LlsEvent::alert_level_failed(cid, status),
        }
    }

    pub(crate) fn alert_level_failed(cid: ConnectionId, status: Status) -> Self {
        LlsEvent::AlertLevel {
            cid,
            status,
            level: None,
        }
    }

    pub fn cid(&self) -> ConnectionId {
        match self {
            LlsEvent::Connected { cid, .. }
            | LlsEvent::AlertLevel { cid, .. }
            | LlsEvent::WriteComplete { cid, .. }
            | LlsEvent::Disconnected { cid } => *cid,
        }
    }

    /// Status of the event; `Disconnected` always reports `Success`.
    pub fn status(&self) -> Status {
        match self {
            LlsEvent::Connected { status, .. }
            | LlsEvent::AlertLevel { status, .. }
            | LlsEvent::WriteComplete { status, .. } => *status,
            LlsEvent::Disconnected { .. } => Status::Success,
        }
    }
}

/// Receiver of [`LlsEvent`]s for one connection.
///
/// Handlers are invoked synchronously from within the client's entry points
/// and therefore cannot call back into the client.
pub trait EventHandler {
    fn handle_event(&mut self, event: LlsEvent);
}

impl<F> EventHandler for F
where
    F: FnMut(LlsEvent),
{
    fn handle_event(&mut self, event: LlsEvent) {
        self(event)
    }
}
