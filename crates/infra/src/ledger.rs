//! Inventory ledger: the application service behind every user intent.
//!
//! ## Execution Flow
//!
//! ```text
//! StockCommand (raw input)
//!   ↓
//! 1. Decide: validate against the local inventory, plan store writes (pure)
//!   ↓
//! 2. Persist: perform the writes in order; on failure undo the lots created so far
//!   ↓
//! 3. Apply: fold the acknowledged changes into the local inventory
//!   ↓
//! 4. Notify: show the outcome
//! ```
//!
//! Local state and the notification only change after the store has
//! acknowledged every write, so a failed write never shows stale success.
//!
//! With a live store the ledger may also be attached to the store's snapshot
//! feed. `sync` replaces the whole collection with the newest snapshot, which
//! is idempotent with respect to changes the ledger already applied locally.

use chrono::{Duration, Utc};
use thiserror::Error;

use stockflow_core::{DomainError, ItemId};
use stockflow_events::Subscription;
use stockflow_inventory::{
    Board, FullTransfer, Inventory, ItemStatus, StockChange, StockCommand, StockEvent, StockItem,
};

use crate::document_store::{DocumentStore, LiveDocumentStore, Snapshot, StoreError};
use crate::notifier::{Notification, Notifier};

const NOT_FOUND_NOTICE: &str = "Item not found";

#[derive(Debug, Error)]
pub enum LedgerError {
    /// Malformed or out-of-range input. Nothing changed.
    #[error("validation failed: {0}")]
    Validation(String),

    /// The command referenced an item that is no longer present.
    #[error("item not found: {0}")]
    NotFound(ItemId),

    /// The store rejected a write (or a read). Local state is unchanged.
    #[error("{op} failed: {source}")]
    Persistence {
        op: &'static str,
        #[source]
        source: StoreError,
    },

    /// The store acknowledged something the domain model cannot represent.
    #[error("invariant violated: {0}")]
    Invariant(String),
}

impl LedgerError {
    fn from_domain(err: DomainError, id: Option<ItemId>) -> Self {
        match err {
            DomainError::Validation(msg) | DomainError::InvalidId(msg) => LedgerError::Validation(msg),
            DomainError::NotFound => match id {
                Some(id) => LedgerError::NotFound(id),
                None => LedgerError::Invariant("missing item without an id".to_string()),
            },
            DomainError::InvariantViolation(msg) => LedgerError::Invariant(msg),
        }
    }
}

/// Behavioural knobs of a ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerSettings {
    pub full_transfer: FullTransfer,
    pub notification_ttl: Duration,
}

impl Default for LedgerSettings {
    fn default() -> Self {
        Self {
            full_transfer: FullTransfer::default(),
            notification_ttl: Duration::seconds(Notifier::DEFAULT_TTL_SECS),
        }
    }
}

/// Owns the inventory collection and mediates every change to it.
///
/// All mutations take `&mut self`, so intents run one at a time and to
/// completion.
#[derive(Debug)]
pub struct Ledger<S> {
    store: S,
    inventory: Inventory,
    notifier: Notifier,
    settings: LedgerSettings,
    subscription: Option<Subscription<Snapshot>>,
}

impl<S> Ledger<S> {
    /// Create a ledger with an empty local collection (nothing is loaded).
    pub fn new(store: S, settings: LedgerSettings) -> Self {
        Self {
            store,
            inventory: Inventory::new(),
            notifier: Notifier::new(settings.notification_ttl),
            settings,
            subscription: None,
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn inventory(&self) -> &Inventory {
        &self.inventory
    }

    pub fn settings(&self) -> LedgerSettings {
        self.settings
    }

    pub fn board(&self) -> Board {
        Board::from_inventory(&self.inventory)
    }

    /// The notification visible right now, if any.
    pub fn notification(&self) -> Option<&Notification> {
        self.notifier.current(Utc::now())
    }

    pub fn notifier_mut(&mut self) -> &mut Notifier {
        &mut self.notifier
    }

    pub fn is_attached(&self) -> bool {
        self.subscription.is_some()
    }

    /// Replace the local collection with `snapshot` (last write wins).
    pub fn apply_snapshot(&mut self, snapshot: Snapshot) {
        let total = snapshot.len();
        let rejected = self.inventory.replace_with(snapshot);
        for id in &rejected {
            tracing::warn!(item_id = %id, "dropping invalid record from snapshot");
        }
        tracing::debug!(items = total - rejected.len(), "applied snapshot");
    }

    /// Cancel the live subscription, if any.
    pub fn detach(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.unsubscribe();
            tracing::debug!("detached from store snapshots");
        }
    }

    fn notify(&mut self, message: impl Into<String>) {
        self.notifier.show(message, Utc::now());
    }
}

impl<S> Ledger<S>
where
    S: DocumentStore,
{
    /// Create a ledger and load the store's current contents.
    pub fn open(store: S, settings: LedgerSettings) -> Result<Self, LedgerError> {
        let mut ledger = Self::new(store, settings);
        ledger.refresh()?;
        Ok(ledger)
    }

    /// Reload the whole collection from the store.
    pub fn refresh(&mut self) -> Result<(), LedgerError> {
        let snapshot = self
            .store
            .list_all()
            .map_err(|source| LedgerError::Persistence { op: "load", source })?;
        self.apply_snapshot(snapshot);
        Ok(())
    }

    /// Add a new lot in Stock In.
    pub fn add(&mut self, name: &str, qty: &str) -> Result<StockItem, LedgerError> {
        let events = self.execute(StockCommand::add(name, qty))?;
        events
            .into_iter()
            .find_map(|e| match e {
                StockEvent::ItemCreated(item) => Some(item),
                _ => None,
            })
            .ok_or_else(|| LedgerError::Invariant("add produced no item".to_string()))
    }

    pub fn delete(&mut self, id: ItemId) -> Result<(), LedgerError> {
        self.execute(StockCommand::Delete { id }).map(|_| ())
    }

    pub fn edit_quantity(&mut self, id: ItemId, qty: &str) -> Result<(), LedgerError> {
        self.execute(StockCommand::edit_quantity(id, qty)).map(|_| ())
    }

    /// Move `qty` of lot `id` to `target`, splitting the lot if needed.
    pub fn transfer(&mut self, id: ItemId, target: ItemStatus, qty: &str) -> Result<(), LedgerError> {
        self.execute(StockCommand::transfer(id, target, qty)).map(|_| ())
    }

    /// Run one intent through decide → persist → apply → notify.
    ///
    /// Returns the changes that were applied to the local collection.
    pub fn execute(&mut self, command: StockCommand) -> Result<Vec<StockEvent>, LedgerError> {
        let op = command.kind();
        let target = command.target_id();

        let plan = match self.inventory.decide(&command, self.settings.full_transfer) {
            Ok(plan) => plan,
            Err(err) => {
                let err = LedgerError::from_domain(err, target);
                match &err {
                    LedgerError::NotFound(id) => {
                        tracing::warn!(op, item_id = %id, "command references a missing item");
                        self.notify(NOT_FOUND_NOTICE);
                    }
                    other => tracing::warn!(op, error = %other, "command rejected"),
                }
                return Err(err);
            }
        };

        let events = match self.persist(plan.changes) {
            Ok(events) => events,
            Err(StoreError::NotFound(missing)) if Some(missing) == target => {
                // Removed by another client since the last load or snapshot.
                tracing::warn!(op, item_id = %missing, "item already removed from store");
                if let Err(err) = self.inventory.apply(StockEvent::ItemRemoved { id: missing }) {
                    tracing::debug!(op, error = %err, "stale item was not held locally");
                }
                self.notify(NOT_FOUND_NOTICE);
                return Err(LedgerError::NotFound(missing));
            }
            Err(source) => {
                tracing::error!(op, error = %source, "store write failed");
                self.notify(command.failure_notice());
                return Err(LedgerError::Persistence { op, source });
            }
        };

        for event in events.iter().cloned() {
            if let Err(err) = self.inventory.apply(event) {
                // The store accepted the writes; resync rather than keep a
                // diverged local copy.
                tracing::error!(op, error = %err, "local apply failed, reloading from store");
                if let Err(reload) = self.refresh() {
                    tracing::error!(op, error = %reload, "reload after failed apply also failed");
                }
                break;
            }
        }

        tracing::info!(op, notice = %plan.notice, items = self.inventory.len(), "command applied");
        self.notify(plan.notice);
        Ok(events)
    }

    /// Perform the planned writes in order.
    ///
    /// If a write fails, lots created earlier in the same plan are deleted
    /// again so the store is left as it was (best effort).
    fn persist(&self, changes: Vec<StockChange>) -> Result<Vec<StockEvent>, StoreError> {
        let mut created = Vec::new();
        let mut events = Vec::with_capacity(changes.len());

        for change in changes {
            let result = match &change {
                StockChange::Create(record) => self.store.create(record.clone()).map(Some),
                StockChange::Update { id, patch } => self.store.update(*id, patch).map(|_| None),
                StockChange::Delete { id } => self.store.delete(*id).map(|_| None),
            };

            let assigned = match result {
                Ok(assigned) => assigned,
                Err(err) => {
                    self.compensate(&created);
                    return Err(err);
                }
            };
            created.extend(assigned);

            match change.commit(assigned) {
                Ok(event) => events.push(event),
                Err(err) => {
                    self.compensate(&created);
                    return Err(StoreError::Storage(err.to_string()));
                }
            }
        }

        Ok(events)
    }

    fn compensate(&self, created: &[ItemId]) {
        for id in created {
            match self.store.delete(*id) {
                Ok(()) => tracing::warn!(item_id = %id, "rolled back lot created by failed command"),
                Err(err) => {
                    tracing::error!(item_id = %id, error = %err, "failed to roll back created lot")
                }
            }
        }
    }
}

impl<S> Ledger<S>
where
    S: LiveDocumentStore,
{
    /// Load the store and subscribe to its snapshots.
    pub fn open_live(store: S, settings: LedgerSettings) -> Result<Self, LedgerError> {
        let mut ledger = Self::new(store, settings);
        ledger.attach();
        ledger.refresh()?;
        Ok(ledger)
    }

    /// Subscribe to store snapshots (replacing any existing subscription).
    pub fn attach(&mut self) {
        self.detach();
        self.subscription = Some(self.store.subscribe());
        tracing::debug!("attached to store snapshots");
    }

    /// Apply the newest pending snapshot, if there is one.
    ///
    /// Returns whether the collection was replaced.
    pub fn sync(&mut self) -> bool {
        let latest = self
            .subscription
            .as_ref()
            .and_then(Subscription::drain_latest);
        match latest {
            Some(snapshot) => {
                self.apply_snapshot(snapshot);
                true
            }
            None => false,
        }
    }
}

impl<S> Drop for Ledger<S> {
    fn drop(&mut self) {
        self.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document_store::InMemoryDocumentStore;

    fn ledger() -> Ledger<InMemoryDocumentStore> {
        Ledger::new(InMemoryDocumentStore::new(), LedgerSettings::default())
    }

    fn message<S>(ledger: &Ledger<S>) -> Option<String> {
        ledger.notification().map(|n| n.message.clone())
    }

    #[test]
    fn add_persists_then_notifies() {
        let mut ledger = ledger();
        let item = ledger.add("Widget", "10").unwrap();

        assert_eq!(item.status(), ItemStatus::StockIn);
        assert_eq!(ledger.store().get(&item.item_id()).unwrap().qty, 10);
        assert_eq!(ledger.inventory().len(), 1);
        assert_eq!(message(&ledger).as_deref(), Some("10x Widget added"));
    }

    #[test]
    fn validation_failures_are_silent() {
        let mut ledger = ledger();

        let err = ledger.add("", "3").unwrap_err();

        assert!(matches!(err, LedgerError::Validation(_)));
        assert!(ledger.inventory().is_empty());
        assert!(ledger.store().is_empty());
        assert!(message(&ledger).is_none());
    }

    #[test]
    fn missing_item_notifies_not_found() {
        let mut ledger = ledger();
        let id = ItemId::new();

        let err = ledger.delete(id).unwrap_err();

        assert!(matches!(err, LedgerError::NotFound(missing) if missing == id));
        assert_eq!(message(&ledger).as_deref(), Some("Item not found"));
    }

    #[test]
    fn delete_and_edit_notices() {
        let mut ledger = ledger();
        let id = ledger.add("Widget", "10").unwrap().item_id();

        ledger.edit_quantity(id, "7").unwrap();
        assert_eq!(
            message(&ledger).as_deref(),
            Some("Widget quantity updated to 7")
        );
        assert_eq!(ledger.store().get(&id).unwrap().qty, 7);

        ledger.delete(id).unwrap();
        assert_eq!(message(&ledger).as_deref(), Some("Widget deleted"));
        assert!(ledger.store().is_empty());
        assert!(ledger.inventory().is_empty());
    }

    #[test]
    fn open_loads_existing_records() {
        let store = InMemoryDocumentStore::new();
        store
            .create(stockflow_inventory::ItemRecord::new(
                "Widget",
                stockflow_inventory::Quantity::new(2).unwrap(),
                ItemStatus::Packed,
            ))
            .unwrap();

        let ledger = Ledger::open(store, LedgerSettings::default()).unwrap();

        assert_eq!(ledger.inventory().len(), 1);
        assert_eq!(ledger.board().column(ItemStatus::Packed).rows.len(), 1);
    }

    #[test]
    fn detach_stops_snapshot_delivery() {
        let mut ledger = Ledger::open_live(InMemoryDocumentStore::new(), LedgerSettings::default())
            .unwrap();
        assert!(ledger.is_attached());

        ledger.detach();
        ledger.add("Widget", "1").unwrap();

        assert!(!ledger.is_attached());
        assert!(!ledger.sync());
    }
}
