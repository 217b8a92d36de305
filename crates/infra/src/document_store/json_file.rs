use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use stockflow_core::ItemId;
use stockflow_events::{EventBus, InMemoryEventBus, Subscription};
use stockflow_inventory::{ItemRecord, ItemStatus, RecordPatch};

use super::{DocumentStore, LiveDocumentStore, Snapshot, StoreError};

/// On-disk shape of one record.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Document {
    id: ItemId,
    name: String,
    qty: u32,
    status: ItemStatus,
}

impl Document {
    fn from_record(id: ItemId, record: &ItemRecord) -> Self {
        Self {
            id,
            name: record.name.clone(),
            qty: record.qty,
            status: record.status,
        }
    }

    fn into_entry(self) -> (ItemId, ItemRecord) {
        (
            self.id,
            ItemRecord {
                name: self.name,
                qty: self.qty,
                status: self.status,
            },
        )
    }
}

/// Document store persisted to a single JSON file.
///
/// The whole collection is kept in memory and rewritten after each write
/// (temp file + rename). A write only takes effect in memory once the file
/// has been replaced, so a failed write leaves both unchanged.
#[derive(Debug)]
pub struct JsonFileDocumentStore {
    path: PathBuf,
    records: RwLock<BTreeMap<ItemId, ItemRecord>>,
    bus: InMemoryEventBus<Snapshot>,
}

impl JsonFileDocumentStore {
    /// Open the store at `path`, loading existing records. A missing file is
    /// an empty store; it is created on the first write.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let records = if path.exists() {
            let raw = fs::read_to_string(&path)
                .map_err(|e| StoreError::Storage(format!("read {}: {e}", path.display())))?;
            if raw.trim().is_empty() {
                BTreeMap::new()
            } else {
                let docs: Vec<Document> = serde_json::from_str(&raw)
                    .map_err(|e| StoreError::Serialization(e.to_string()))?;
                docs.into_iter().map(Document::into_entry).collect()
            }
        } else {
            BTreeMap::new()
        };

        tracing::info!(path = %path.display(), records = records.len(), "opened json document store");

        Ok(Self {
            path,
            records: RwLock::new(records),
            bus: InMemoryEventBus::new(),
        })
    }

    fn persist(&self, records: &BTreeMap<ItemId, ItemRecord>) -> Result<(), StoreError> {
        let docs: Vec<Document> = records
            .iter()
            .map(|(id, r)| Document::from_record(*id, r))
            .collect();
        let json = serde_json::to_string_pretty(&docs)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, json)
            .map_err(|e| StoreError::Storage(format!("write {}: {e}", tmp.display())))?;
        fs::rename(&tmp, &self.path)
            .map_err(|e| StoreError::Storage(format!("replace {}: {e}", self.path.display())))?;
        Ok(())
    }

    fn write<T>(
        &self,
        f: impl FnOnce(&mut BTreeMap<ItemId, ItemRecord>) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let mut records = self
            .records
            .write()
            .map_err(|_| StoreError::Storage("lock poisoned".to_string()))?;

        let mut next = records.clone();
        let out = f(&mut next)?;
        self.persist(&next)?;
        *records = next;

        let snapshot: Snapshot = records.iter().map(|(id, r)| (*id, r.clone())).collect();
        if let Err(err) = self.bus.publish(snapshot) {
            tracing::warn!(error = ?err, "failed to publish store snapshot");
        }
        Ok(out)
    }
}

impl DocumentStore for JsonFileDocumentStore {
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

impl LiveDocumentStore for JsonFileDocumentStore {
    fn subscribe(&self) -> Subscription<Snapshot> {
        self.bus.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockflow_inventory::Quantity;

    fn temp_path() -> PathBuf {
        std::env::temp_dir().join(format!("stockflow-test-{}.json", uuid::Uuid::now_v7()))
    }

    fn record(name: &str, qty: u32, status: ItemStatus) -> ItemRecord {
        ItemRecord::new(name, Quantity::new(qty).unwrap(), status)
    }

    #[test]
    fn missing_file_opens_empty() {
        let path = temp_path();
        let store = JsonFileDocumentStore::open(&path).unwrap();
        assert!(store.list_all().unwrap().is_empty());
        assert!(!path.exists());
    }

    #[test]
    fn records_survive_reopen() {
        let path = temp_path();
        let (kept, moved) = {
            let store = JsonFileDocumentStore::open(&path).unwrap();
            let kept = store.create(record("Widget", 6, ItemStatus::StockIn)).unwrap();
            let moved = store.create(record("Gadget", 2, ItemStatus::StockIn)).unwrap();
            let gone = store.create(record("Gizmo", 1, ItemStatus::StockIn)).unwrap();
            store
                .update(moved, &RecordPatch::status(ItemStatus::StockOut))
                .unwrap();
            store.delete(gone).unwrap();
            (kept, moved)
        };

        let reopened = JsonFileDocumentStore::open(&path).unwrap();
        let all: BTreeMap<_, _> = reopened.list_all().unwrap().into_iter().collect();
        assert_eq!(all.len(), 2);
        assert_eq!(all[&kept], record("Widget", 6, ItemStatus::StockIn));
        assert_eq!(all[&moved], record("Gadget", 2, ItemStatus::StockOut));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn file_uses_wire_field_names() {
        let path = temp_path();
        let store = JsonFileDocumentStore::open(&path).unwrap();
        let id = store.create(record("Widget", 3, ItemStatus::Packed)).unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            raw,
            serde_json::json!([{"id": id.to_string(), "name": "Widget", "qty": 3, "status": "PACKED"}])
        );

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn corrupt_file_is_a_serialization_error() {
        let path = temp_path();
        fs::write(&path, "{not json").unwrap();

        let err = JsonFileDocumentStore::open(&path).unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn unwritable_path_fails_without_changing_state() {
        let dir = std::env::temp_dir().join(format!("stockflow-missing-{}", uuid::Uuid::now_v7()));
        let store = JsonFileDocumentStore::open(dir.join("items.json")).unwrap();

        let err = store
            .create(record("Widget", 1, ItemStatus::StockIn))
            .unwrap_err();

        assert!(matches!(err, StoreError::Storage(_)));
        assert!(store.list_all().unwrap().is_empty());
    }
}
