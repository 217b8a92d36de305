use std::collections::BTreeMap;

use stockflow_core::{DomainError, DomainResult, ItemId};

use crate::command::{FullTransfer, Plan, StockChange, StockCommand, StockEvent};
use crate::input::{parse_name, parse_quantity};
use crate::item::{ItemRecord, RecordPatch, StockItem};
use crate::status::ItemStatus;

/// The collection of stock lots, keyed by id.
///
/// Every lot in the collection holds a positive quantity. Several lots may
/// share a `(name, status)` pair; split quantities are never merged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Inventory {
    items: BTreeMap<ItemId, StockItem>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: &ItemId) -> Option<&StockItem> {
        self.items.get(id)
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.items.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// All lots in id (creation) order.
    pub fn iter(&self) -> impl Iterator<Item = &StockItem> {
        self.items.values()
    }

    pub fn ids(&self) -> impl Iterator<Item = ItemId> + '_ {
        self.items.keys().copied()
    }

    pub fn with_status(&self, status: ItemStatus) -> impl Iterator<Item = &StockItem> {
        self.items.values().filter(move |i| i.status() == status)
    }

    /// Total quantity held under `name`, across all lots and statuses.
    pub fn total_for(&self, name: &str) -> u64 {
        self.items
            .values()
            .filter(|i| i.name() == name)
            .map(|i| u64::from(i.qty().get()))
            .sum()
    }

    /// Replace the whole collection with a store snapshot.
    ///
    /// Records that violate the lot invariants (zero quantity, blank name) are
    /// left out; their ids are returned so the caller can report them.
    /// Replacing with the same snapshot twice yields the same collection.
    pub fn replace_with<I>(&mut self, snapshot: I) -> Vec<ItemId>
    where
        I: IntoIterator<Item = (ItemId, ItemRecord)>,
    {
        let mut rejected = Vec::new();
        let mut items = BTreeMap::new();
        for (id, record) in snapshot {
            match StockItem::from_record(id, record) {
                Ok(item) => {
                    items.insert(id, item);
                }
                Err(_) => rejected.push(id),
            }
        }
        self.items = items;
        rejected
    }

    /// Validate a command against the current state and plan its writes.
    ///
    /// This must not mutate state; see `apply`.
    pub fn decide(&self, command: &StockCommand, policy: FullTransfer) -> DomainResult<Plan> {
        match command {
            StockCommand::Add { name, qty } => self.decide_add(name, qty),
            StockCommand::Delete { id } => self.decide_delete(*id),
            StockCommand::EditQuantity { id, qty } => self.decide_edit(*id, qty),
            StockCommand::Transfer { id, target, qty } => {
                self.decide_transfer(*id, *target, qty, policy)
            }
        }
    }

    /// Fold an acknowledged change into the collection.
    pub fn apply(&mut self, event: StockEvent) -> DomainResult<()> {
        match event {
            StockEvent::ItemCreated(item) => {
                let id = item.item_id();
                if self.items.contains_key(&id) {
                    return Err(DomainError::invariant(format!("duplicate item id {id}")));
                }
                self.items.insert(id, item);
            }
            StockEvent::ItemUpdated { id, patch } => {
                let item = self.items.get_mut(&id).ok_or_else(DomainError::not_found)?;
                item.apply_patch(&patch)?;
            }
            StockEvent::ItemRemoved { id } => {
                self.items.remove(&id).ok_or_else(DomainError::not_found)?;
            }
        }
        Ok(())
    }

    fn require(&self, id: ItemId) -> DomainResult<&StockItem> {
        self.items.get(&id).ok_or_else(DomainError::not_found)
    }

    fn decide_add(&self, name: &str, qty: &str) -> DomainResult<Plan> {
        let name = parse_name(name)?;
        let qty = parse_quantity(qty)?;
        Ok(Plan {
            notice: format!("{qty}x {name} added"),
            changes: vec![StockChange::Create(ItemRecord::new(name, qty, ItemStatus::StockIn))],
        })
    }

    fn decide_delete(&self, id: ItemId) -> DomainResult<Plan> {
        let item = self.require(id)?;
        Ok(Plan {
            notice: format!("{} deleted", item.name()),
            changes: vec![StockChange::Delete { id }],
        })
    }

    fn decide_edit(&self, id: ItemId, qty: &str) -> DomainResult<Plan> {
        let item = self.require(id)?;
        let qty = parse_quantity(qty)?;
        Ok(Plan {
            notice: format!("{} quantity updated to {qty}", item.name()),
            changes: vec![StockChange::Update {
                id,
                patch: RecordPatch::qty(qty),
            }],
        })
    }

    fn decide_transfer(
        &self,
        id: ItemId,
        target: ItemStatus,
        qty: &str,
        policy: FullTransfer,
    ) -> DomainResult<Plan> {
        let source = self.require(id)?;
        if source.status() == target {
            return Err(DomainError::validation(format!(
                "{} is already in {}",
                source.name(),
                target.label()
            )));
        }

        let moved = parse_quantity(qty)?;
        let remaining = source.qty().split(moved)?;
        let split_lot = StockChange::Create(ItemRecord::new(source.name(), moved, target));

        // The new lot is written first so a failure on the source write can be
        // compensated by deleting it.
        let changes = match (remaining, policy) {
            (Some(rest), _) => vec![
                split_lot,
                StockChange::Update {
                    id,
                    patch: RecordPatch::qty(rest),
                },
            ],
            (None, FullTransfer::Repoint) => vec![StockChange::Update {
                id,
                patch: RecordPatch::status(target),
            }],
            (None, FullTransfer::Recreate) => vec![split_lot, StockChange::Delete { id }],
        };

        Ok(Plan {
            notice: format!("{moved}x {} moved to {}", source.name(), target.label()),
            changes,
        })
    }
}
