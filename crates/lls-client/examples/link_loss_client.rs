use lls_client::lls::alert_level_uuid;
use lls_client::{
    AlertLevel, AttErrorCode, AttTransport, Characteristic, CharacteristicProperties,
    ClientConfig, ConHandle, ConnectionId, DispatchError, LinkLossClient, LlsEvent,
    ServiceDiscovery, Uuid,
};
use std::collections::VecDeque;

const ALERT_LEVEL_HANDLE: u16 = 0x000B;

/// Work the simulated peripheral still has to answer
enum Pending {
    Discovery(ConnectionId),
    Read(ConnectionId),
    Write(ConnectionId, u8),
}

/// In-memory peripheral exposing one Link Loss Service
#[derive(Default)]
struct SimulatedPeripheral {
    alert_level: u8,
    queue: VecDeque<Pending>,
}

#[derive(Default)]
struct Link(std::rc::Rc<std::cell::RefCell<SimulatedPeripheral>>);

impl AttTransport for Link {
    fn read_value(
        &mut self,
        cid: ConnectionId,
        _con_handle: ConHandle,
        _value_handle: u16,
    ) -> Result<(), DispatchError> {
        self.0.borrow_mut().queue.push_back(Pending::Read(cid));
        Ok(())
    }

    fn write_value(
        &mut self,
        cid: ConnectionId,
        _con_handle: ConHandle,
        _value_handle: u16,
        value: &[u8],
    ) -> Result<(), DispatchError> {
        let value = *value.first().ok_or(DispatchError::Failed(AttErrorCode::InvalidPdu))?;
        self.0.borrow_mut().queue.push_back(Pending::Write(cid, value));
        Ok(())
    }
}

impl ServiceDiscovery for Link {
    fn discover(
        &mut self,
        cid: ConnectionId,
        _con_handle: ConHandle,
        service_uuid: &Uuid,
        _characteristic_uuids: &[Uuid],
    ) {
        println!("Discovering service {}", service_uuid);
        self.0.borrow_mut().queue.push_back(Pending::Discovery(cid));
    }
}

type Client = LinkLossClient<Link, Link, fn(LlsEvent), 2>;

fn print_event(event: LlsEvent) {
    match event {
        LlsEvent::Connected { cid, con_handle, status } => {
            println!("[{}] connected on handle 0x{:04x}: {}", cid, con_handle, status)
        }
        LlsEvent::AlertLevel { cid, status, level } => {
            println!("[{}] alert level {:?}: {}", cid, level, status)
        }
        LlsEvent::WriteComplete { cid, status } => println!("[{}] write complete: {}", cid, status),
        LlsEvent::Disconnected { cid } => println!("[{}] disconnected", cid),
    }
}

/// Answers everything the peripheral has queued.
fn pump(client: &mut Client, peripheral: &Link) {
    loop {
        let next = peripheral.0.borrow_mut().queue.pop_front();
        let Some(pending) = next else { break };
        match pending {
            Pending::Discovery(cid) => {
                let table = [Characteristic {
                    uuid: alert_level_uuid(),
                    start_handle: ALERT_LEVEL_HANDLE - 1,
                    value_handle: ALERT_LEVEL_HANDLE,
                    end_handle: ALERT_LEVEL_HANDLE,
                    properties: CharacteristicProperties::READ | CharacteristicProperties::WRITE,
                }];
                client.on_discovery_complete(cid, Ok(&table));
            }
            Pending::Read(cid) => {
                let value = peripheral.0.borrow().alert_level;
                client.on_read_result(cid, AttErrorCode::NoError, &[value]);
            }
            Pending::Write(cid, value) => {
                peripheral.0.borrow_mut().alert_level = value;
                client.on_write_result(cid, AttErrorCode::NoError);
            }
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let peripheral = Link::default();
    peripheral.0.borrow_mut().alert_level = AlertLevel::On.as_u8();

    let mut client: Client = LinkLossClient::new(
        Link(peripheral.0.clone()),
        Link(peripheral.0.clone()),
        ClientConfig::default().with_service_uuid("0x1803".parse()?),
    );

    let cid = client.connect(0x0005, print_event)?;
    pump(&mut client, &peripheral);

    client.read_alert_level(cid)?;
    pump(&mut client, &peripheral);

    client.write_alert_level(cid, AlertLevel::Disabled)?;
    pump(&mut client, &peripheral);

    client.read_alert_level(cid)?;
    pump(&mut client, &peripheral);

    client.disconnect(cid)?;
    if let Err(err) = client.read_alert_level(cid) {
        println!("read after disconnect: {}", err);
    }

    Ok(())
}
