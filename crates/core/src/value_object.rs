//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**: two value
/// objects with the same attribute values are the same value. To "modify"
/// one, build a new one. `ReservationDelta` and `DedupeKey` are the
/// canonical examples in this workspace; `InventoryItem` is not (it is an
/// entity, identified by its id).
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
