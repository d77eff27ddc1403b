//! Client configuration

use super::types::{alert_level_uuid, link_loss_service_uuid};
use crate::uuid::Uuid;

/// Link Loss Service client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Service to discover on each connection
    pub service_uuid: Uuid,
    /// Alert Level characteristic within that service
    pub alert_level_uuid: Uuid,
    /// Forward alert level values pushed by the server as events
    pub forward_notifications: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            service_uuid: link_loss_service_uuid(),
            alert_level_uuid: alert_level_uuid(),
            forward_notifications: true,
        }
    }
}

impl ClientConfig {
    pub fn with_service_uuid(mut self, uuid: Uuid) -> Self {
        self.service_uuid = uuid;
        self
    }

    pub fn with_alert_level_uuid(mut self, uuid: Uuid) -> Self {
        self.alert_level_uuid = uuid;
        self
    }

    pub fn with_forward_notifications(mut self, forward: bool) -> Self {
        self.forward_notifications = forward;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uuids_from_strings() {
        let config = ClientConfig::default()
            .with_service_uuid("0x1803".parse().unwrap())
            .with_alert_level_uuid("00002a06-0000-1000-8000-00805f9b34fb".parse().unwrap())
            .with_forward_notifications(false);
        assert_eq!(config.service_uuid, link_loss_service_uuid());
        assert_eq!(config.alert_level_uuid, alert_level_uuid());
        assert!(!config.forward_notifications);
    }
}
