//! Document store abstraction (thin client over an external database).
//!
//! The ledger only needs a handful of record-level operations. Anything that
//! can create, merge-update, delete and list `{name, qty, status}` documents
//! can back it; live stores additionally push full snapshots after each write.

pub mod in_memory;
pub mod json_file;

use std::sync::Arc;

use thiserror::Error;

use stockflow_core::ItemId;
use stockflow_events::Subscription;
use stockflow_inventory::{ItemRecord, RecordPatch};

pub use in_memory::InMemoryDocumentStore;
pub use json_file::JsonFileDocumentStore;

/// Full contents of a store at one point in time.
pub type Snapshot = Vec<(ItemId, ItemRecord)>;

/// Document store operation error.
///
/// These are infrastructure failures; the ledger reports them to the user as
/// "<operation> failed" and leaves its local state untouched.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("record not found: {0}")]
    NotFound(ItemId),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Record-level persistence used by the ledger.
pub trait DocumentStore: Send + Sync {
    /// Insert a record and return the id the store assigned to it.
    fn create(&self, record: ItemRecord) -> Result<ItemId, StoreError>;

    /// Merge the given fields into the record at `id`.
    fn update(&self, id: ItemId, patch: &RecordPatch) -> Result<(), StoreError>;

    /// Remove the record at `id`.
    fn delete(&self, id: ItemId) -> Result<(), StoreError>;

    /// Fetch every record.
    fn list_all(&self) -> Result<Snapshot, StoreError>;
}

/// A store that pushes a full snapshot to subscribers after every write.
pub trait LiveDocumentStore: DocumentStore {
    /// Start receiving snapshots. Drop the subscription (or call
    /// `unsubscribe`) to cancel it.
    fn subscribe(&self) -> Subscription<Snapshot>;
}

impl<S> DocumentStore for Arc<S>
where
    S: DocumentStore + ?Sized,
{
    fn create(&self, record: ItemRecord) -> Result<ItemId, StoreError> {
        (**self).create(record)
    }

    fn update(&self, id: ItemId, patch: &RecordPatch) -> Result<(), StoreError> {
        (**self).update(id, patch)
    }

    fn delete(&self, id: ItemId) -> Result<(), StoreError> {
        (**self).delete(id)
    }

    fn list_all(&self) -> Result<Snapshot, StoreError> {
        (**self).list_all()
    }
}

impl<S> LiveDocumentStore for Arc<S>
where
    S: LiveDocumentStore + ?Sized,
{
    fn subscribe(&self) -> Subscription<Snapshot> {
        (**self).subscribe()
    }
}
