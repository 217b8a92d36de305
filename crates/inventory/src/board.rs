//! Three-column board view over an inventory.
//!
//! Pure presentation data: which lots sit in which column, and what each
//! lot's overflow menu offers. Rendering beyond plain text is left to the
//! front end.

use stockflow_core::ItemId;

use crate::inventory::Inventory;
use crate::item::StockItem;
use crate::status::ItemStatus;

/// Entry in a lot's overflow menu.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum MenuAction {
    EditQuantity,
    MoveTo(ItemStatus),
    Delete,
}

impl MenuAction {
    pub fn label(&self) -> String {
        match self {
            MenuAction::EditQuantity => "Edit Quantity".to_string(),
            MenuAction::MoveTo(status) => format!("Move to {}", status.label()),
            MenuAction::Delete => "Delete".to_string(),
        }
    }
}

/// One lot as shown in a column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub item: StockItem,
}

impl Row {
    pub fn id(&self) -> ItemId {
        self.item.item_id()
    }

    /// Quantity badge, e.g. `x4`.
    pub fn badge(&self) -> String {
        format!("x{}", self.item.qty())
    }

    pub fn menu(&self) -> Vec<MenuAction> {
        let mut actions = vec![MenuAction::EditQuantity];
        actions.extend(self.item.status().others().map(MenuAction::MoveTo));
        actions.push(MenuAction::Delete);
        actions
    }

    /// Heading of the transfer prompt for moving this lot to `target`.
    pub fn transfer_prompt(&self, target: ItemStatus) -> String {
        format!(
            "Transfer {} ({} available) to {}",
            self.item.name(),
            self.item.qty(),
            target.label()
        )
    }

    /// Heading of the edit-quantity prompt.
    pub fn edit_prompt(&self) -> String {
        format!("Edit Quantity for {}", self.item.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub status: ItemStatus,
    pub rows: Vec<Row>,
}

impl Column {
    pub const EMPTY_TEXT: &'static str = "No items";

    pub fn title(&self) -> &'static str {
        self.status.label()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    pub columns: Vec<Column>,
}

impl Board {
    /// Build the board: one column per status, in flow order.
    pub fn from_inventory(inventory: &Inventory) -> Self {
        let columns = ItemStatus::ALL
            .into_iter()
            .map(|status| Column {
                status,
                rows: inventory
                    .with_status(status)
                    .map(|item| Row { item: item.clone() })
                    .collect(),
            })
            .collect();
        Self { columns }
    }

    pub fn column(&self, status: ItemStatus) -> &Column {
        // Columns are built from ItemStatus::ALL, so every status is present.
        &self.columns[ItemStatus::ALL
            .iter()
            .position(|s| *s == status)
            .unwrap_or_default()]
    }

    /// The row showing lot `id`, in whichever column it sits.
    pub fn row(&self, id: ItemId) -> Option<&Row> {
        self.columns
            .iter()
            .flat_map(|column| &column.rows)
            .find(|row| row.id() == id)
    }

    /// Plain-text rendering, one section per column.
    pub fn render_text(&self) -> String {
        let mut out = String::new();
        for column in &self.columns {
            out.push_str(&format!("== {} ==\n", column.title()));
            if column.is_empty() {
                out.push_str(&format!("  {}\n", Column::EMPTY_TEXT));
                continue;
            }
            for row in &column.rows {
                out.push_str(&format!(
                    "  [{}] {} {}\n",
                    row.id().short(),
                    row.item.name(),
                    row.badge()
                ));
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::ItemRecord;
    use crate::quantity::Quantity;

    fn inventory_with(lots: &[(&str, u32, ItemStatus)]) -> Inventory {
        let mut inv = Inventory::new();
        inv.replace_with(lots.iter().map(|(name, qty, status)| {
            (
                ItemId::new(),
                ItemRecord::new(*name, Quantity::new(*qty).unwrap(), *status),
            )
        }));
        inv
    }

    #[test]
    fn columns_follow_flow_order() {
        let board = Board::from_inventory(&Inventory::new());
        let titles: Vec<_> = board.columns.iter().map(Column::title).collect();
        assert_eq!(titles, vec!["Stock In", "Packed", "Stock Out"]);
        assert!(board.columns.iter().all(Column::is_empty));
    }

    #[test]
    fn lots_land_in_their_status_column() {
        let inv = inventory_with(&[
            ("Widget", 6, ItemStatus::StockIn),
            ("Widget", 4, ItemStatus::Packed),
            ("Gadget", 1, ItemStatus::Packed),
        ]);
        let board = Board::from_inventory(&inv);

        assert_eq!(board.column(ItemStatus::StockIn).rows.len(), 1);
        assert_eq!(board.column(ItemStatus::Packed).rows.len(), 2);
        assert!(board.column(ItemStatus::StockOut).is_empty());
    }

    #[test]
    fn menu_offers_every_other_status() {
        let inv = inventory_with(&[("Widget", 4, ItemStatus::Packed)]);
        let board = Board::from_inventory(&inv);
        let row = &board.column(ItemStatus::Packed).rows[0];

        let labels: Vec<_> = row.menu().iter().map(MenuAction::label).collect();
        assert_eq!(
            labels,
            vec!["Edit Quantity", "Move to Stock In", "Move to Stock Out", "Delete"]
        );
        assert_eq!(row.badge(), "x4");
        assert_eq!(
            row.transfer_prompt(ItemStatus::StockOut),
            "Transfer Widget (4 available) to Stock Out"
        );
        assert_eq!(row.edit_prompt(), "Edit Quantity for Widget");
    }

    #[test]
    fn rows_are_found_by_id_across_columns() {
        let inv = inventory_with(&[
            ("Widget", 6, ItemStatus::StockIn),
            ("Gadget", 1, ItemStatus::StockOut),
        ]);
        let board = Board::from_inventory(&inv);

        for item in inv.iter() {
            let row = board.row(item.item_id()).unwrap();
            assert_eq!(row.item.name(), item.name());
        }
        assert!(board.row(ItemId::new()).is_none());
    }

    #[test]
    fn text_rendering_marks_empty_columns() {
        let inv = inventory_with(&[("Widget", 2, ItemStatus::StockIn)]);
        let text = Board::from_inventory(&inv).render_text();

        assert!(text.contains("== Stock In ==\n  ["));
        assert!(text.contains("Widget x2"));
        assert!(text.contains("== Packed ==\n  No items\n"));
    }
}
