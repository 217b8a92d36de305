//! Publish/subscribe plumbing.
//!
//! Stores use this to fan out change notifications (full snapshots) to live
//! subscribers. The bus is transport-agnostic; `InMemoryEventBus` is the only
//! implementation shipped here.

pub mod bus;
pub mod in_memory_bus;

pub use bus::{EventBus, Subscription};
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
