use serde::{Deserialize, Serialize};

use stockflow_core::{DomainError, DomainResult, Entity, ItemId};

use crate::quantity::Quantity;
use crate::status::ItemStatus;

/// Persisted document for one stock lot, as held by the document store.
///
/// `qty` is a plain integer here because the store is not trusted to uphold
/// the positive-quantity invariant; `StockItem::from_record` checks it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub name: String,
    pub qty: u32,
    pub status: ItemStatus,
}

impl ItemRecord {
    pub fn new(name: impl Into<String>, qty: Quantity, status: ItemStatus) -> Self {
        Self {
            name: name.into(),
            qty: qty.get(),
            status,
        }
    }

    /// Merge a partial update into this record.
    pub fn merge(&mut self, patch: &RecordPatch) {
        if let Some(qty) = patch.qty {
            self.qty = qty;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }
}

/// Partial update of a record (fields left `None` are untouched).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qty: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ItemStatus>,
}

impl RecordPatch {
    pub fn qty(qty: Quantity) -> Self {
        Self {
            qty: Some(qty.get()),
            status: None,
        }
    }

    pub fn status(status: ItemStatus) -> Self {
        Self {
            qty: None,
            status: Some(status),
        }
    }
}

/// A stock lot: a quantity of a named good sharing one status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockItem {
    id: ItemId,
    name: String,
    qty: Quantity,
    status: ItemStatus,
}

impl StockItem {
    pub fn new(id: ItemId, name: impl Into<String>, qty: Quantity, status: ItemStatus) -> Self {
        Self {
            id,
            name: name.into(),
            qty,
            status,
        }
    }

    /// Rebuild a lot from a stored record, enforcing the domain invariants.
    pub fn from_record(id: ItemId, record: ItemRecord) -> DomainResult<Self> {
        let qty = Quantity::new(record.qty)
            .ok_or_else(|| DomainError::invariant(format!("item {id} has zero quantity")))?;
        if record.name.trim().is_empty() {
            return Err(DomainError::invariant(format!("item {id} has an empty name")));
        }
        Ok(Self {
            id,
            name: record.name,
            qty,
            status: record.status,
        })
    }

    pub fn to_record(&self) -> ItemRecord {
        ItemRecord::new(self.name.clone(), self.qty, self.status)
    }

    pub fn item_id(&self) -> ItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn qty(&self) -> Quantity {
        self.qty
    }

    pub fn status(&self) -> ItemStatus {
        self.status
    }

    /// Apply a partial update. A patch carrying `qty == 0` is rejected and
    /// leaves the lot untouched.
    pub fn apply_patch(&mut self, patch: &RecordPatch) -> DomainResult<()> {
        let qty = match patch.qty {
            Some(raw) => Some(
                Quantity::new(raw)
                    .ok_or_else(|| DomainError::invariant("quantity must stay positive"))?,
            ),
            None => None,
        };
        if let Some(qty) = qty {
            self.qty = qty;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        Ok(())
    }
}

impl Entity for StockItem {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn qty(n: u32) -> Quantity {
        Quantity::new(n).unwrap()
    }

    #[test]
    fn record_round_trips_through_item() {
        let id = ItemId::new();
        let record = ItemRecord::new("Widget", qty(5), ItemStatus::Packed);
        let item = StockItem::from_record(id, record.clone()).unwrap();
        assert_eq!(item.id(), &id);
        assert_eq!(item.to_record(), record);
    }

    #[test]
    fn zero_quantity_record_is_rejected() {
        let record = ItemRecord {
            name: "Widget".to_string(),
            qty: 0,
            status: ItemStatus::StockIn,
        };
        let err = StockItem::from_record(ItemId::new(), record).unwrap_err();
        assert!(matches!(err, DomainError::InvariantViolation(_)));
    }

    #[test]
    fn record_json_uses_wire_field_names() {
        let record = ItemRecord::new("Widget", qty(3), ItemStatus::StockIn);
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"name": "Widget", "qty": 3, "status": "STOCK_IN"})
        );
    }

    #[test]
    fn merge_only_touches_given_fields() {
        let mut record = ItemRecord::new("Widget", qty(3), ItemStatus::StockIn);
        record.merge(&RecordPatch::status(ItemStatus::StockOut));
        assert_eq!(record.qty, 3);
        assert_eq!(record.status, ItemStatus::StockOut);
    }

    #[test]
    fn zero_patch_leaves_item_untouched() {
        let mut item = StockItem::new(ItemId::new(), "Widget", qty(3), ItemStatus::StockIn);
        let patch = RecordPatch {
            qty: Some(0),
            status: Some(ItemStatus::Packed),
        };
        assert!(item.apply_patch(&patch).is_err());
        assert_eq!(item.qty(), qty(3));
        assert_eq!(item.status(), ItemStatus::StockIn);
    }
}
