//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// A stock lot keeps its identity while its quantity or status changes, so two
/// lots with the same name and quantity are still different entities.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
