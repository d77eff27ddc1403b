//! Link Loss Service client
//!
//! One [`LinkLossClient`] serves every connection of the application. Each
//! connection gets a record in a fixed-capacity registry; the record walks the
//! state table in [`super::state`] as application calls and transport
//! callbacks arrive. All entry points run to completion on the caller's
//! context and never wait for the peer: results are reported later through
//! the record's [`EventHandler`].

use super::config::ClientConfig;
use super::error::{LlsError, LlsResult, Status};
use super::event::{EventHandler, LlsEvent};
use super::registry::Registry;
use super::state::{ClientInput, ClientState};
use super::types::{
    AlertLevel, ConnectionId, ALERT_LEVEL_INDEX, ALERT_LEVEL_VALUE_LEN, LLS_NUM_CHARACTERISTICS,
};
use crate::att::AttErrorCode;
use crate::gatt::{
    AttTransport, Characteristic, ConHandle, DiscoveryError, DispatchError, ServiceDiscovery,
};
use crate::uuid::Uuid;
use log::{debug, info, trace, warn};

type HandleTable = [Characteristic; LLS_NUM_CHARACTERISTICS];

/// State of one remote Link Loss Service instance.
struct ClientRecord<H> {
    cid: ConnectionId,
    con_handle: ConHandle,
    state: ClientState,
    /// Written once, when discovery succeeds
    characteristics: Option<HandleTable>,
    /// Characteristic targeted by the pending read or write
    characteristic_index: usize,
    write_buffer: [u8; ALERT_LEVEL_VALUE_LEN],
    handler: H,
}

impl<H: EventHandler> ClientRecord<H> {
    fn new(cid: ConnectionId, con_handle: ConHandle, handler: H) -> Self {
        Self {
            cid,
            con_handle,
            state: ClientState::Idle,
            characteristics: None,
            characteristic_index: ALERT_LEVEL_INDEX,
            write_buffer: [0; ALERT_LEVEL_VALUE_LEN],
            handler,
        }
    }

    /// Applies `input` to the state table. Returns false if it was rejected.
    fn transition(&mut self, input: ClientInput) -> bool {
        match self.state.on(input) {
            Some(next) => {
                debug!(
                    "LLS client {}: {:?} -> {:?} on {:?}",
                    self.cid, self.state, next, input
                );
                self.state = next;
                true
            }
            None => false,
        }
    }

    fn characteristic(&self, index: usize) -> Option<&Characteristic> {
        self.characteristics.as_ref().and_then(|table| table.get(index))
    }

    fn emit(&mut self, event: LlsEvent) {
        debug!("LLS client {}: emitting {:?}", self.cid, event);
        self.handler.handle_event(event);
    }

    /// Final event of a released record.
    fn close(mut self) {
        if self.state.is_busy() {
            debug!(
                "LLS client {}: abandoning pending operation in {:?}",
                self.cid, self.state
            );
        }
        let cid = self.cid;
        self.emit(LlsEvent::Disconnected { cid });
    }
}

/// Link Loss Service client for up to `N` simultaneous connections.
///
/// The client owns every record and every record's handle table inline, so
/// whoever owns the client owns all of its storage; nothing is allocated
/// after construction.
pub struct LinkLossClient<T, D, H, const N: usize> {
    transport: T,
    discovery: D,
    config: ClientConfig,
    registry: Registry<ClientRecord<H>, N>,
}

impl<T, D, H, const N: usize> LinkLossClient<T, D, H, N>
where
    T: AttTransport,
    D: ServiceDiscovery,
    H: EventHandler,
{
    /// Initializes the client with an empty registry.
    pub fn new(transport: T, discovery: D, config: ClientConfig) -> Self {
        Self {
            transport,
            discovery,
            config,
            registry: Registry::new(),
        }
    }

    /// Releases every record without emitting events.
    pub fn deinit(&mut self) {
        if !self.registry.is_empty() {
            info!(
                "LLS client deinit: releasing {} connection(s)",
                self.registry.len()
            );
        }
        self.registry.clear();
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn discovery(&self) -> &D {
        &self.discovery
    }

    pub fn discovery_mut(&mut self) -> &mut D {
        &mut self.discovery
    }

    pub fn capacity(&self) -> usize {
        self.registry.capacity()
    }

    pub fn connection_count(&self) -> usize {
        self.registry.len()
    }

    pub fn state(&self, cid: ConnectionId) -> Option<ClientState> {
        self.registry.get(cid).map(|record| record.state)
    }

    pub fn con_handle(&self, cid: ConnectionId) -> Option<ConHandle> {
        self.registry.get(cid).map(|record| record.con_handle)
    }

    pub fn find_by_con_handle(&self, con_handle: ConHandle) -> Option<ConnectionId> {
        self.registry
            .find(|record| record.con_handle == con_handle)
    }

    /// The resolved Alert Level characteristic, once discovery has succeeded.
    pub fn alert_level_characteristic(&self, cid: ConnectionId) -> Option<Characteristic> {
        self.registry
            .get(cid)
            .and_then(|record| record.characteristic(ALERT_LEVEL_INDEX))
            .copied()
    }

    /// Starts a client for the Link Loss Service on `con_handle`.
    ///
    /// Returns the new connection identifier. [`LlsEvent::Connected`] follows
    /// once discovery finishes, with the failure status if it does not
    /// succeed.
    pub fn connect(&mut self, con_handle: ConHandle, handler: H) -> LlsResult<ConnectionId> {
        if self.find_by_con_handle(con_handle).is_some() {
            warn!(
                "LLS client already exists for connection handle 0x{:04x}",
                con_handle
            );
            return Err(LlsError::AlreadyConnected);
        }

        let cid = self
            .registry
            .insert_with(|cid| ClientRecord::new(cid, con_handle, handler))
            .map_err(|err| {
                warn!(
                    "no free LLS client record for connection handle 0x{:04x}",
                    con_handle
                );
                err
            })?;

        if let Some(record) = self.registry.get_mut(cid) {
            record.transition(ClientInput::Connect);
        }

        info!(
            "LLS client {}: discovering {} on connection handle 0x{:04x}",
            cid, self.config.service_uuid, con_handle
        );
        let characteristic_uuids: [Uuid; LLS_NUM_CHARACTERISTICS] = [self.config.alert_level_uuid];
        self.discovery.discover(
            cid,
            con_handle,
            &self.config.service_uuid,
            &characteristic_uuids,
        );

        Ok(cid)
    }

    /// Requests the remote alert level; the value arrives as
    /// [`LlsEvent::AlertLevel`].
    pub fn read_alert_level(&mut self, cid: ConnectionId) -> LlsResult<()> {
        let record = self.registry.get_mut(cid).ok_or(LlsError::NotFound)?;
        if !record.transition(ClientInput::ReadRequested) {
            debug!(
                "LLS client {}: read rejected in state {:?}",
                cid, record.state
            );
            return Err(LlsError::WrongState);
        }
        record.characteristic_index = ALERT_LEVEL_INDEX;

        self.dispatch(cid);
        Ok(())
    }

    /// Writes the remote alert level; completion arrives as
    /// [`LlsEvent::WriteComplete`].
    pub fn write_alert_level(&mut self, cid: ConnectionId, level: AlertLevel) -> LlsResult<()> {
        let record = self.registry.get_mut(cid).ok_or(LlsError::NotFound)?;
        if !record.transition(ClientInput::WriteRequested) {
            debug!(
                "LLS client {}: write rejected in state {:?}",
                cid, record.state
            );
            return Err(LlsError::WrongState);
        }
        record.characteristic_index = ALERT_LEVEL_INDEX;
        record.write_buffer = [level.as_u8()];

        self.dispatch(cid);
        Ok(())
    }

    /// Like [`write_alert_level`](Self::write_alert_level) for an unchecked
    /// wire value. Values outside the defined levels fail with
    /// [`LlsError::InvalidValue`] before anything else is checked.
    pub fn write_alert_level_raw(&mut self, cid: ConnectionId, raw: u8) -> LlsResult<()> {
        let level = AlertLevel::try_from(raw)?;
        self.write_alert_level(cid, level)
    }

    /// Releases the record for `cid` and emits [`LlsEvent::Disconnected`].
    ///
    /// A request already handed to the transport is not cancelled; its result
    /// is dropped when it arrives.
    pub fn disconnect(&mut self, cid: ConnectionId) -> LlsResult<()> {
        let record = self.registry.remove(cid).ok_or(LlsError::NotFound)?;
        info!(
            "LLS client {}: disconnected from connection handle 0x{:04x}",
            cid, record.con_handle
        );
        record.close();
        Ok(())
    }

    /// Hands the pending read or write of `cid` to the transport.
    fn dispatch(&mut self, cid: ConnectionId) {
        let Some(record) = self.registry.get_mut(cid) else {
            return;
        };
        let pending = record.state;
        if !pending.is_dispatch_pending() {
            return;
        }

        let value_handle = record
            .characteristic(record.characteristic_index)
            .map(|characteristic| characteristic.value_handle);
        let result = match (pending, value_handle) {
            (_, None) => {
                warn!("LLS client {}: no resolved handle for {:?}", cid, pending);
                Err(DispatchError::Failed(AttErrorCode::InvalidHandle))
            }
            (ClientState::AwaitReadDispatch, Some(value_handle)) => {
                self.transport
                    .read_value(cid, record.con_handle, value_handle)
            }
            (_, Some(value_handle)) => self.transport.write_value(
                cid,
                record.con_handle,
                value_handle,
                &record.write_buffer,
            ),
        };

        match result {
            Ok(()) => {
                record.transition(ClientInput::Dispatched);
            }
            Err(DispatchError::Busy) => {
                trace!(
                    "LLS client {}: transport busy, waiting for can-send-now",
                    cid
                );
            }
            Err(DispatchError::Failed(code)) => {
                warn!("LLS client {}: transport refused request: {}", cid, code);
                record.transition(ClientInput::DispatchFailed);
                let status = Status::failure(code);
                let event = if pending == ClientState::AwaitReadDispatch {
                    LlsEvent::alert_level_failed(cid, status)
                } else {
                    LlsEvent::WriteComplete { cid, status }
                };
                record.emit(event);
            }
        }
    }

    /// The transport can take the request it previously refused as busy.
    pub fn on_can_send_now(&mut self, cid: ConnectionId) {
        let dispatch_pending = self
            .registry
            .get(cid)
            .map(|record| record.state.is_dispatch_pending());
        match dispatch_pending {
            Some(true) => self.dispatch(cid),
            Some(false) => trace!("LLS client {}: nothing to dispatch", cid),
            None => trace!("LLS client {}: can-send-now for released client", cid),
        }
    }

    /// Completion of the discovery started by [`connect`](Self::connect).
    ///
    /// The table must hold exactly the requested characteristics with a
    /// resolved Alert Level value handle; anything else counts as the service
    /// not being present.
    pub fn on_discovery_complete(
        &mut self,
        cid: ConnectionId,
        result: Result<&[Characteristic], DiscoveryError>,
    ) {
        let alert_level_uuid = self.config.alert_level_uuid;
        let Some(record) = self.registry.get_mut(cid) else {
            trace!("LLS client {}: dropping discovery result", cid);
            return;
        };
        if record.state != ClientState::AwaitingConnection {
            warn!(
                "LLS client {}: unexpected discovery result in state {:?}",
                cid, record.state
            );
            return;
        }

        let table = result
            .map_err(Status::from)
            .and_then(|found| resolve_handle_table(found, &alert_level_uuid));

        match table {
            Ok(table) => {
                record.characteristics = Some(table);
                record.transition(ClientInput::DiscoveryComplete);
                info!(
                    "LLS client {}: ready, alert level at handle 0x{:04x}",
                    cid, table[ALERT_LEVEL_INDEX].value_handle
                );
                let con_handle = record.con_handle;
                record.emit(LlsEvent::Connected {
                    cid,
                    con_handle,
                    status: Status::Success,
                });
            }
            Err(status) => {
                if let Some(mut record) = self.registry.remove(cid) {
                    warn!("LLS client {}: discovery failed: {}", cid, status);
                    let con_handle = record.con_handle;
                    record.emit(LlsEvent::Connected {
                        cid,
                        con_handle,
                        status,
                    });
                }
            }
        }
    }

    /// Result of a read issued for `cid`.
    pub fn on_read_result(&mut self, cid: ConnectionId, status: AttErrorCode, value: &[u8]) {
        let Some(record) = self.registry.get_mut(cid) else {
            trace!("LLS client {}: dropping read result", cid);
            return;
        };
        if !record.transition(ClientInput::ReadResult) {
            warn!(
                "LLS client {}: unexpected read result in state {:?}",
                cid, record.state
            );
            return;
        }

        let event = if status.is_success() {
            LlsEvent::alert_level_value(cid, value)
        } else {
            LlsEvent::alert_level_failed(cid, Status::failure(status))
        };
        record.emit(event);
    }

    /// Result of a write issued for `cid`.
    pub fn on_write_result(&mut self, cid: ConnectionId, status: AttErrorCode) {
        let Some(record) = self.registry.get_mut(cid) else {
            trace!("LLS client {}: dropping write result", cid);
            return;
        };
        if !record.transition(ClientInput::WriteResult) {
            warn!(
                "LLS client {}: unexpected write result in state {:?}",
                cid, record.state
            );
            return;
        }

        record.emit(LlsEvent::WriteComplete {
            cid,
            status: Status::from(status),
        });
    }

    /// A value pushed by the server on `con_handle`.
    ///
    /// Forwarded as [`LlsEvent::AlertLevel`] when it targets the Alert Level
    /// value handle of a connected record whose characteristic supports
    /// notifications or indications. Does not affect a pending operation.
    pub fn on_notification(&mut self, con_handle: ConHandle, value_handle: u16, value: &[u8]) {
        if !self.config.forward_notifications {
            return;
        }
        let Some(cid) = self.find_by_con_handle(con_handle) else {
            trace!(
                "dropping notification for unknown connection handle 0x{:04x}",
                con_handle
            );
            return;
        };
        let Some(record) = self.registry.get_mut(cid) else {
            return;
        };

        let is_alert_level = record.state.is_connected()
            && record
                .characteristic(ALERT_LEVEL_INDEX)
                .map_or(false, |characteristic| {
                    characteristic.value_handle == value_handle
                        && characteristic.properties.can_push()
                });
        if !is_alert_level {
            trace!(
                "LLS client {}: ignoring notification for handle 0x{:04x}",
                cid, value_handle
            );
            return;
        }

        record.emit(LlsEvent::alert_level_value(cid, value));
    }

    /// The transport reports that `con_handle` is gone.
    pub fn on_disconnection(&mut self, con_handle: ConHandle) {
        let Some(cid) = self.find_by_con_handle(con_handle) else {
            return;
        };
        if let Some(record) = self.registry.remove(cid) {
            info!(
                "LLS client {}: connection handle 0x{:04x} lost",
                cid, con_handle
            );
            record.close();
        }
    }
}

fn resolve_handle_table(
    found: &[Characteristic],
    alert_level_uuid: &Uuid,
) -> Result<HandleTable, Status> {
    let table = HandleTable::try_from(found).map_err(|_| Status::ServiceNotFound)?;
    let alert_level = &table[ALERT_LEVEL_INDEX];
    if alert_level.uuid != *alert_level_uuid || !alert_level.is_resolved() {
        return Err(Status::ServiceNotFound);
    }
    Ok(table)
}
