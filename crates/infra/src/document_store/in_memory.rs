use std::collections::BTreeMap;
use std::sync::RwLock;

use stockflow_core::ItemId;
use stockflow_events::{EventBus, InMemoryEventBus, Subscription};
use stockflow_inventory::{ItemRecord, RecordPatch};

use super::{DocumentStore, LiveDocumentStore, Snapshot, StoreError};

/// In-memory live document store.
///
/// Intended for tests/dev and the purely local front end. Every successful
/// write publishes the full snapshot to subscribers.
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    records: RwLock<BTreeMap<ItemId, ItemRecord>>,
    bus: InMemoryEventBus<Snapshot>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.read().map(|r| r.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn get(&self, id: &ItemId) -> Option<ItemRecord> {
        self.records.read().ok()?.get(id).cloned()
    }

    /// Run `f` against the records under the write lock and publish the
    /// resulting snapshot if it succeeded. Publishing under the lock keeps
    /// snapshots in write order.
    fn write<T>(
        &self,
        f: impl FnOnce(&mut BTreeMap<ItemId, ItemRecord>) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::Storage("lock poisoned".to_string()))?;

        let out = f(&mut records)?;

        let snapshot: Snapshot = records.iter().map(|(id, r)| (*id, r.clone())).collect();
        if let Err(err) = self.bus.publish(snapshot) {
            tracing::warn!(error = ?err, "failed to publish store snapshot");
        }
        Ok(out)
    }
}

impl DocumentStore for InMemoryDocumentStore {
    fn create(&self, record: ItemRecord) -> Result<ItemId, StoreError> {
        self.write(|records| {
            let id = ItemId::new();
            records.insert(id, record);
            Ok(id)
        })
    }

    fn update(&self, id: ItemId, patch: &RecordPatch) -> Result<(), StoreError> {
        self.write(|records| {
            let record = records.get_mut(&id).ok_or(StoreError::NotFound(id))?;
            record.merge(patch);
            Ok(())
        })
    }

    fn delete(&self, id: ItemId) -> Result<(), StoreError> {
        self.write(|records| {
            records.remove(&id).ok_or(StoreError::NotFound(id))?;
            Ok(())
        })
    }

    fn list_all(&self) -> Result<Snapshot, StoreError> {
        let records = self
            .records
            .read()
            .map_err(|_| StoreError::Storage("lock poisoned".to_string()))?;
        Ok(records.iter().map(|(id, r)| (*id, r.clone())).collect())
    }
}

impl LiveDocumentStore for InMemoryDocumentStore {
    fn subscribe(&self) -> Subscription<Snapshot> {
        self.bus.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockflow_inventory::{ItemStatus, Quantity};

    fn record(name: &str, qty: u32) -> ItemRecord {
        ItemRecord::new(name, Quantity::new(qty).unwrap(), ItemStatus::StockIn)
    }

    #[test]
    fn create_assigns_fresh_ids() {
        let store = InMemoryDocumentStore::new();
        let a = store.create(record("Widget", 1)).unwrap();
        let b = store.create(record("Widget", 1)).unwrap();

        assert_ne!(a, b);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn update_merges_fields() {
        let store = InMemoryDocumentStore::new();
        let id = store.create(record("Widget", 5)).unwrap();

        store
            .update(id, &RecordPatch::status(ItemStatus::Packed))
            .unwrap();

        let stored = store.get(&id).unwrap();
        assert_eq!(stored.qty, 5);
        assert_eq!(stored.status, ItemStatus::Packed);
    }

    #[test]
    fn missing_ids_are_not_found() {
        let store = InMemoryDocumentStore::new();
        let id = ItemId::new();

        assert_eq!(store.delete(id), Err(StoreError::NotFound(id)));
        assert_eq!(
            store.update(id, &RecordPatch::default()),
            Err(StoreError::NotFound(id))
        );
    }

    #[test]
    fn writes_publish_snapshots_in_order() {
        let store = InMemoryDocumentStore::new();
        let sub = store.subscribe();

        let id = store.create(record("Widget", 5)).unwrap();
        store.delete(id).unwrap();

        let first = sub.try_recv().unwrap();
        assert_eq!(first, vec![(id, record("Widget", 5))]);
        let second = sub.try_recv().unwrap();
        assert!(second.is_empty());
    }

    #[test]
    fn failed_writes_publish_nothing() {
        let store = InMemoryDocumentStore::new();
        let sub = store.subscribe();

        let _ = store.delete(ItemId::new());

        assert!(sub.drain_latest().is_none());
    }
}
