//! Mirrors transform writes into storage and tells same-context observers.

use crate::result::StorageResult;
use crate::storage::Storage;
use log::{debug, warn};
use shared::{ConnectionStatus, ContextRole, ObjectKey, ObjectTransform, StorageEvent};
use std::convert::TryFrom;
use std::time::Duration;
use tokio::sync::broadcast;

const EVENT_CAPACITY: usize = 64;

pub struct PersistenceBridge {
    storage: Box<dyn Storage>,
    role: ContextRole,
    connection_timeout: Duration,
    events: broadcast::Sender<StorageEvent>,
}

impl PersistenceBridge {
    pub fn new(storage: Box<dyn Storage>, role: ContextRole, connection_timeout: Duration) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            storage,
            role,
            connection_timeout,
            events,
        }
    }

    /// Same-context change notifications. Delivery is best effort: a receiver
    /// that falls behind loses the oldest events and nobody is told.
    pub fn subscribe(&self) -> broadcast::Receiver<StorageEvent> {
        self.events.subscribe()
    }

    pub fn role(&self) -> ContextRole {
        self.role
    }

    /// Writes the transform to its slot, stamps this context's last-update key
    /// and dispatches the change locally. Other processes learn about the write
    /// through the storage itself; this process would not, so it tells itself.
    ///
    /// The event is dispatched even when a write fails, since the in-memory
    /// state it describes is authoritative regardless of storage.
    pub fn mirror(&mut self, key: ObjectKey, transform: &ObjectTransform) -> StorageResult<()> {
        let slot = key.storage_slot();
        let serialized = match serde_json::to_string(transform) {
            Ok(serialized) => serialized,
            Err(e) => {
                warn!("Could not serialize {} for storage: {}", key, e);
                return Ok(());
            }
        };
        let written = self
            .storage
            .set_item(slot, &serialized)
            .and_then(|_| self.stamp(shared::now_millis()));

        let event = StorageEvent {
            key: slot.to_string(),
            new_value: Some(serialized),
        };
        if self.events.send(event).is_err() {
            debug!("No local observers for {}", slot);
        }
        written
    }

    /// Stamps this context's last-update key without touching any transform.
    pub fn heartbeat(&mut self, now_millis: i64) -> StorageResult<()> {
        self.stamp(now_millis)
    }

    fn stamp(&mut self, now_millis: i64) -> StorageResult<()> {
        self.storage
            .set_item(self.role.heartbeat_key(), &now_millis.to_string())
    }

    /// Connected when the other context stamped its key less than the
    /// connection timeout ago. Purely informational. Stamps further in the
    /// future than the timeout count as garbage.
    pub fn poll_connection(&self, now_millis: i64) -> ConnectionStatus {
        let peer_key = self.role.peer().heartbeat_key();
        let last = match self.storage.get_item(peer_key) {
            Ok(Some(value)) => value.trim().parse::<i64>().ok(),
            Ok(None) => None,
            Err(e) => {
                debug!("Reading {} failed: {}", peer_key, e);
                None
            }
        };
        let timeout = i64::try_from(self.connection_timeout.as_millis()).unwrap_or(i64::MAX);
        match last {
            Some(last) if now_millis.saturating_sub(last).saturating_abs() < timeout => {
                ConnectionStatus::Connected
            }
            _ => ConnectionStatus::Disconnected,
        }
    }

    /// Reads back a mirrored transform, if one was ever written.
    pub fn load_slot(&self, key: ObjectKey) -> Option<ObjectTransform> {
        let value = self.storage.get_item(key.storage_slot()).ok()??;
        match ObjectTransform::from_json(key, &value) {
            Ok(transform) => Some(transform),
            Err(e) => {
                warn!("Ignoring unreadable {} slot: {}", key, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use shared::{TruckTransform, EDITOR_LAST_UPDATE_KEY, MAIN_APP_LAST_UPDATE_KEY};

    fn bridge(role: ContextRole) -> PersistenceBridge {
        PersistenceBridge::new(
            Box::new(MemoryStorage::default()),
            role,
            Duration::from_millis(5000),
        )
    }

    #[test]
    fn mirror_writes_slot_and_timestamp_and_notifies() {
        let mut bridge = bridge(ContextRole::Editor);
        let mut rx = bridge.subscribe();
        let transform = ObjectTransform::Truck(TruckTransform::default());
        bridge.mirror(ObjectKey::Truck, &transform).unwrap();

        assert_eq!(bridge.load_slot(ObjectKey::Truck), Some(transform.clone()));
        let stamp = bridge.storage.get_item(EDITOR_LAST_UPDATE_KEY).unwrap();
        assert!(stamp.unwrap().parse::<i64>().is_ok());

        let event = rx.try_recv().unwrap();
        assert_eq!(event.key, "truckTransform");
        let value = event.new_value.unwrap();
        assert_eq!(ObjectTransform::from_json(ObjectKey::Truck, &value).unwrap(), transform);
    }

    #[test]
    fn mirror_without_observers_still_persists() {
        let mut bridge = bridge(ContextRole::Editor);
        let transform = ObjectTransform::Truck(TruckTransform::default());
        assert!(bridge.mirror(ObjectKey::Truck, &transform).is_ok());
        assert!(bridge.load_slot(ObjectKey::Truck).is_some());
    }

    #[test]
    fn connection_follows_peer_heartbeat_age() {
        let mut editor = bridge(ContextRole::Editor);
        assert_eq!(editor.poll_connection(10_000), ConnectionStatus::Disconnected);

        editor
            .storage
            .set_item(MAIN_APP_LAST_UPDATE_KEY, "10000")
            .unwrap();
        assert_eq!(editor.poll_connection(10_000), ConnectionStatus::Connected);
        assert_eq!(editor.poll_connection(14_999), ConnectionStatus::Connected);
        assert_eq!(editor.poll_connection(15_000), ConnectionStatus::Disconnected);
    }

    #[test]
    fn own_heartbeat_does_not_count_as_peer() {
        let mut main_app = bridge(ContextRole::MainApp);
        main_app.heartbeat(1_000).unwrap();
        assert_eq!(main_app.poll_connection(1_000), ConnectionStatus::Disconnected);
    }

    #[test]
    fn garbled_timestamp_is_disconnected() {
        let mut editor = bridge(ContextRole::Editor);
        editor
            .storage
            .set_item(MAIN_APP_LAST_UPDATE_KEY, "yesterday")
            .unwrap();
        assert_eq!(editor.poll_connection(0), ConnectionStatus::Disconnected);
    }

    #[test]
    fn extreme_timestamps_are_disconnected() {
        let mut editor = bridge(ContextRole::Editor);
        let now = 1_700_000_000_000;
        for stamp in &[i64::MIN, i64::MAX, now + 60_000] {
            editor
                .storage
                .set_item(MAIN_APP_LAST_UPDATE_KEY, &stamp.to_string())
                .unwrap();
            assert_eq!(editor.poll_connection(now), ConnectionStatus::Disconnected);
        }
        editor
            .storage
            .set_item(MAIN_APP_LAST_UPDATE_KEY, &(now + 1).to_string())
            .unwrap();
        assert_eq!(editor.poll_connection(now), ConnectionStatus::Connected);
    }

    #[test]
    fn huge_timeout_does_not_wrap() {
        let mut editor = PersistenceBridge::new(
            Box::new(MemoryStorage::default()),
            ContextRole::Editor,
            Duration::from_secs(u64::MAX),
        );
        editor
            .storage
            .set_item(MAIN_APP_LAST_UPDATE_KEY, "0")
            .unwrap();
        assert_eq!(
            editor.poll_connection(1_700_000_000_000),
            ConnectionStatus::Connected
        );
    }
}
