//! Link Loss Service (LLS) client
//!
//! Drives discovery, reads and writes of the remote Alert Level
//! characteristic for any number of connections and reports the outcomes to
//! the application as [`LlsEvent`]s.

pub mod client;
pub mod config;
pub mod error;
pub mod event;
pub mod registry;
pub mod state;
pub mod types;


pub use client::LinkLossClient;
pub use config::ClientConfig;
pub use error::{LlsError, LlsResult, Status};
pub use event::{EventHandler, LlsEvent};
pub use registry::{Registry, MAX_REGISTRY_CAPACITY};
pub use state::{ClientInput, ClientState};
pub use types::{
    alert_level_uuid, link_loss_service_uuid, AlertLevel, ConnectionId,
    ALERT_LEVEL_CHARACTERISTIC_UUID, LINK_LOSS_SERVICE_UUID, LLS_NUM_CHARACTERISTICS,
};
