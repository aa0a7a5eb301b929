//! External persistence boundary.
//!
//! The engine never owns storage; items and movements live behind this trait
//! (an HTTP API or local persistence in production, [`crate::in_memory`] in
//! tests). The store must provide per-item atomic update semantics; the
//! engine adds no locking of its own.

use async_trait::async_trait;
use thiserror::Error;

use estoque_core::{ItemId, LocationId, ProductId};
use estoque_inventory::{DedupeKey, InventoryItem, ItemPatch, MovementPayload, StockMovement};

/// Item lookup filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ItemFilter {
    pub product_id: Option<ProductId>,
    pub location_id: Option<LocationId>,
}

impl ItemFilter {
    pub fn for_product(product_id: ProductId) -> Self {
        Self {
            product_id: Some(product_id),
            ..Self::default()
        }
    }
}

/// Store-side failure.
///
/// `Duplicate` is the dedupe rejection: the movement's fingerprint has been
/// seen before, so the caller treats the movement as already recorded. `Io`
/// is the sole fatal class and propagates unchanged.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("duplicate movement (dedupe key {0})")]
    Duplicate(DedupeKey),
    #[error("store io failure: {0}")]
    Io(String),
}

/// Inventory persistence collaborator.
#[async_trait]
pub trait InventoryStore: Send + Sync {
    /// Fetch current item snapshots matching `filter`.
    async fn list_items(&self, filter: &ItemFilter) -> Result<Vec<InventoryItem>, StoreError>;

    /// Apply a partial update to one item. Stores honoring
    /// `ItemPatch::expected_version` reject stale writes with `Io`.
    async fn update_item(&self, id: ItemId, patch: ItemPatch)
        -> Result<InventoryItem, StoreError>;

    /// Persist a movement ledger entry, keyed by its dedupe fingerprint.
    async fn create_movement(
        &self,
        item_id: ItemId,
        payload: MovementPayload,
    ) -> Result<StockMovement, StoreError>;

    /// Whether a movement with this dedupe fingerprint is already on ledger.
    async fn movement_exists(&self, key: &DedupeKey) -> Result<bool, StoreError>;
}
