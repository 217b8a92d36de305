use core::str::FromStr;

use serde::{Deserialize, Serialize};

use stockflow_core::DomainError;

/// Stage of a stock lot in the flow.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemStatus {
    StockIn,
    Packed,
    StockOut,
}

impl ItemStatus {
    /// All statuses, in board column order.
    pub const ALL: [ItemStatus; 3] = [ItemStatus::StockIn, ItemStatus::Packed, ItemStatus::StockOut];

    /// Wire name (matches the serialized form).
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::StockIn => "STOCK_IN",
            ItemStatus::Packed => "PACKED",
            ItemStatus::StockOut => "STOCK_OUT",
        }
    }

    /// Human-readable label used in notifications and column headers.
    pub fn label(&self) -> &'static str {
        match self {
            ItemStatus::StockIn => "Stock In",
            ItemStatus::Packed => "Packed",
            ItemStatus::StockOut => "Stock Out",
        }
    }

    /// Statuses a lot in `self` may be moved to.
    pub fn others(self) -> impl Iterator<Item = ItemStatus> {
        Self::ALL.into_iter().filter(move |s| *s != self)
    }
}

impl core::fmt::Display for ItemStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.label())
    }
}

/// Accepts the wire names, the labels, and the short forms `in`/`packed`/`out`
/// (case-insensitive, ignoring spaces, `-` and `_`).
impl FromStr for ItemStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .flat_map(char::to_lowercase)
            .collect();

        match key.as_str() {
            "stockin" | "in" => Ok(ItemStatus::StockIn),
            "packed" | "pack" => Ok(ItemStatus::Packed),
            "stockout" | "out" => Ok(ItemStatus::StockOut),
            _ => Err(DomainError::validation(format!(
                "unknown status '{s}' (expected one of: in, packed, out)"
            ))),
        }
    }
}
