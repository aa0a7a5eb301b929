//! Entity trait: identity that persists across state changes.

/// Marker + minimal interface for domain entities.
///
/// An entity is identified by its id, not by its attribute values: two
/// `InventoryItem` snapshots with different balances but the same `ItemId`
/// are the same item at different points in time.
pub trait Entity {
    /// Strongly-typed identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// The entity's identifier.
    fn id(&self) -> &Self::Id;
}
