use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use estoque_core::{Entity, ItemId, LocationId, ProductId};

/// One stock-keeping record (optionally scoped to a storage location).
///
/// Mutated only through movement application or reservation operations; both
/// are expressed as returned new values or an [`ItemPatch`] handed to the
/// persistence collaborator, never in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    pub id: ItemId,
    pub product_id: ProductId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<LocationId>,
    /// Signed accumulated quantity; may be fractional.
    pub on_hand_quantity: Decimal,
    /// Quantity earmarked against pending sales, not yet shipped. Never
    /// negative.
    pub reserved_quantity: Decimal,
    /// Moving average unit cost in smallest currency unit (cents).
    pub average_unit_cost: i64,
    /// Restock alert threshold.
    pub minimum_quantity: Decimal,
    /// Snapshot version, incremented by the persistence collaborator on each
    /// accepted update.
    #[serde(default)]
    pub version: u64,
}

impl InventoryItem {
    /// On-hand minus reserved. Negative reservations (bad data) do not
    /// inflate availability.
    pub fn available_quantity(&self) -> Decimal {
        self.on_hand_quantity - self.reserved_quantity.max(Decimal::ZERO)
    }

    /// Reserved exceeding on-hand is a reported anomaly, never silently
    /// clamped.
    pub fn is_over_reserved(&self) -> bool {
        self.reserved_quantity > self.on_hand_quantity
    }

    pub fn is_below_minimum(&self) -> bool {
        self.on_hand_quantity < self.minimum_quantity
    }

    /// New snapshot with a different reserved quantity (value semantics).
    pub fn with_reserved(&self, reserved_quantity: Decimal) -> Self {
        Self {
            reserved_quantity,
            ..self.clone()
        }
    }
}

impl Entity for InventoryItem {
    type Id = ItemId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Partial update handed to the persistence collaborator.
///
/// Carries the snapshot version it was computed from so a store can reject
/// stale writes (optimistic concurrency hook; see `InventoryStore`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_hand_quantity: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reserved_quantity: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub average_unit_cost: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_version: Option<u64>,
}

impl ItemPatch {
    /// Patch that only moves the reservation level.
    pub fn reservation(reserved_quantity: Decimal, expected_version: u64) -> Self {
        Self {
            reserved_quantity: Some(reserved_quantity),
            expected_version: Some(expected_version),
            ..Self::default()
        }
    }
}
