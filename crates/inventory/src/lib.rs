//! Inventory domain module.
//!
//! This crate contains the stock-lot business rules (status flow, quantity
//! validation, the transfer/split rule) implemented purely as deterministic
//! domain logic (no IO, no storage, no clocks).

pub mod board;
pub mod command;
pub mod input;
pub mod inventory;
pub mod item;
pub mod quantity;
pub mod status;

pub use board::{Board, Column, MenuAction, Row};
pub use command::{FullTransfer, Plan, StockChange, StockCommand, StockEvent};
pub use input::{parse_name, parse_quantity};
pub use inventory::Inventory;
pub use item::{ItemRecord, RecordPatch, StockItem};
pub use quantity::Quantity;
pub use status::ItemStatus;
