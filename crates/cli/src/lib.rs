//! Line-oriented front end for the stockflow ledger.

pub mod input;
pub mod shell;

pub use input::{Input, InputError};
pub use shell::{Reply, Shell};
