//! Infrastructure layer: document stores, the ledger service, configuration.

pub mod config;
pub mod document_store;
pub mod ledger;
pub mod notifier;


pub use config::{Config, ConfigError, StoreBackend};
pub use document_store::{
    DocumentStore, InMemoryDocumentStore, JsonFileDocumentStore, LiveDocumentStore, Snapshot,
    StoreError,
};
pub use ledger::{Ledger, LedgerError, LedgerSettings};
pub use notifier::{Notification, Notifier};
