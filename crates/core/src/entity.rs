//! Entity trait: records that keep their identity while their other fields vary
//! (catalog products, cart lines).

/// Anything addressable by a stable identifier.
pub trait Entity {
    /// Strongly-typed identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the identifier.
    fn id(&self) -> &Self::Id;

    /// Two entities are the same entity when their identifiers match,
    /// regardless of the rest of their state.
    fn same_entity(&self, other: &Self) -> bool {
        self.id() == other.id()
    }
}
