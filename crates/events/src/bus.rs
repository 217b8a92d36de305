//! Event publishing/subscription abstraction (mechanics only).
//!
//! This module provides a pub/sub mechanism for distributing messages to
//! multiple consumers. For stockflow the messages are full collection snapshots
//! emitted by a document store after each write.
//!
//! ## Delivery
//!
//! - **Broadcast**: every subscriber receives its own copy of each message
//! - **At-least-once**: a consumer may see a state it has already applied, so
//!   consumers must be idempotent
//! - **No persistence**: the store is the source of truth, the bus only distributes

use std::sync::Arc;
use std::sync::mpsc::{Receiver, TryRecvError};

/// A subscription to a message stream.
///
/// ## Usage Pattern
///
/// ```ignore
/// let subscription = store.subscribe();
///
/// // Event loop tick: only the newest snapshot matters.
/// if let Some(snapshot) = subscription.drain_latest() {
///     inventory.replace_with(snapshot);
/// }
///
/// // Teardown.
/// subscription.unsubscribe();
/// ```
///
/// Subscriptions are designed for single-threaded consumption. Dropping the
/// subscription cancels it; the bus prunes the dead sender on its next publish.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Try to receive a message without blocking.
    pub fn try_recv(&self) -> Result<M, TryRecvError> {
        self.receiver.try_recv()
    }

    /// Drain every pending message and return only the most recent one.
    ///
    /// Returns `None` when nothing is pending (or the bus is gone).
    pub fn drain_latest(&self) -> Option<M> {
        let mut latest = None;
        while let Ok(message) = self.receiver.try_recv() {
            latest = Some(message);
        }
        latest
    }

    /// Cancel the subscription.
    pub fn unsubscribe(self) {
        drop(self);
    }
}

/// Domain-agnostic event bus (pub/sub abstraction).
///
/// ```text
/// Store write (acknowledged) → Event Bus (publish snapshot) → Subscribers
///                                                               └─ Ledger::sync
/// ```
///
/// Messages are published only after the write they describe has been applied
/// to the store, so a subscriber never observes a state the store rejected.
///
/// The trait requires `Send + Sync`; multiple threads can publish concurrently.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
