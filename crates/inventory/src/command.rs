//! Intents, planned writes, and committed changes.
//!
//! A `StockCommand` carries the raw user input of one intent. `Inventory::decide`
//! validates it against the current collection and returns a `Plan`: the store
//! writes to perform (`StockChange`) plus the notification to show once they
//! succeed. After the store acknowledges a write it becomes a `StockEvent`,
//! which `Inventory::apply` folds into the collection.

use stockflow_core::{DomainError, DomainResult, ItemId};

use crate::item::{ItemRecord, RecordPatch, StockItem};
use crate::status::ItemStatus;

/// A user intent with its raw (unparsed) inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StockCommand {
    Add { name: String, qty: String },
    Delete { id: ItemId },
    EditQuantity { id: ItemId, qty: String },
    Transfer { id: ItemId, target: ItemStatus, qty: String },
}

impl StockCommand {
    pub fn add(name: impl Into<String>, qty: impl Into<String>) -> Self {
        StockCommand::Add {
            name: name.into(),
            qty: qty.into(),
        }
    }

    pub fn edit_quantity(id: ItemId, qty: impl Into<String>) -> Self {
        StockCommand::EditQuantity { id, qty: qty.into() }
    }

    pub fn transfer(id: ItemId, target: ItemStatus, qty: impl Into<String>) -> Self {
        StockCommand::Transfer {
            id,
            target,
            qty: qty.into(),
        }
    }

    /// Short operation name, used for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            StockCommand::Add { .. } => "add",
            StockCommand::Delete { .. } => "delete",
            StockCommand::EditQuantity { .. } => "edit_quantity",
            StockCommand::Transfer { .. } => "transfer",
        }
    }

    /// Item targeted by the command, if any.
    pub fn target_id(&self) -> Option<ItemId> {
        match self {
            StockCommand::Add { .. } => None,
            StockCommand::Delete { id }
            | StockCommand::EditQuantity { id, .. }
            | StockCommand::Transfer { id, .. } => Some(*id),
        }
    }

    /// Notification shown when persisting this command fails.
    pub fn failure_notice(&self) -> &'static str {
        match self {
            StockCommand::Add { .. } => "Add failed",
            StockCommand::Delete { .. } => "Delete failed",
            StockCommand::EditQuantity { .. } => "Update failed",
            StockCommand::Transfer { .. } => "Transfer failed",
        }
    }
}

/// How a transfer that moves a lot's entire quantity is written.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub enum FullTransfer {
    /// Change the source lot's status in place (id preserved, one write).
    #[default]
    Repoint,
    /// Delete the source lot and create a new one under the target status.
    Recreate,
}

/// A store write that has not happened yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StockChange {
    Create(ItemRecord),
    Update { id: ItemId, patch: RecordPatch },
    Delete { id: ItemId },
}

impl StockChange {
    /// Turn an acknowledged write into an event.
    ///
    /// `created` is the id the store assigned; it is required for `Create`
    /// and ignored otherwise.
    pub fn commit(self, created: Option<ItemId>) -> DomainResult<StockEvent> {
        match self {
            StockChange::Create(record) => {
                let id = created
                    .ok_or_else(|| DomainError::invariant("created record has no id"))?;
                Ok(StockEvent::ItemCreated(StockItem::from_record(id, record)?))
            }
            StockChange::Update { id, patch } => Ok(StockEvent::ItemUpdated { id, patch }),
            StockChange::Delete { id } => Ok(StockEvent::ItemRemoved { id }),
        }
    }
}

/// An acknowledged change to the collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StockEvent {
    ItemCreated(StockItem),
    ItemUpdated { id: ItemId, patch: RecordPatch },
    ItemRemoved { id: ItemId },
}

/// Outcome of deciding a command: the writes to perform, in order, and the
/// notification to show once all of them succeed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    pub changes: Vec<StockChange>,
    pub notice: String,
}
