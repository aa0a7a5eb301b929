//! In-memory inventory store for tests/dev.
//!
//! Mirrors the behavior the engine expects from the real backend: per-item
//! snapshot versioning, dedupe-key rejection on movement creation, and
//! server-side computation of a movement's resulting balance and average
//! cost from the item state at insertion time.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;

use estoque_core::{ItemId, MovementId};
use estoque_inventory::{
    average_cost, signed_quantity, CostInputs, DedupeKey, InventoryItem, ItemPatch,
    MovementPayload, MovementType, StockMovement,
};

use crate::store::{InventoryStore, ItemFilter, StoreError};

#[derive(Debug, Default)]
pub struct InMemoryInventoryStore {
    items: Mutex<Vec<InventoryItem>>,
    movements: Mutex<Vec<StockMovement>>,
    seen_keys: Mutex<HashSet<DedupeKey>>,
}

impl InMemoryInventoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an item snapshot (test setup).
    pub fn seed_item(&self, item: InventoryItem) {
        if let Ok(mut items) = self.items.lock() {
            items.push(item);
        }
    }

    /// All persisted movements, in insertion order.
    pub fn movements(&self) -> Vec<StockMovement> {
        self.movements
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    /// Current snapshot of one item.
    pub fn item(&self, id: ItemId) -> Option<InventoryItem> {
        self.items
            .lock()
            .ok()
            .and_then(|items| items.iter().find(|i| i.id == id).cloned())
    }
}

fn poisoned() -> StoreError {
    StoreError::Io("in-memory store lock poisoned".into())
}

#[async_trait]
impl InventoryStore for InMemoryInventoryStore {
    async fn list_items(&self, filter: &ItemFilter) -> Result<Vec<InventoryItem>, StoreError> {
        let items = self.items.lock().map_err(|_| poisoned())?;
        Ok(items
            .iter()
            .filter(|item| {
                filter
                    .product_id
                    .is_none_or(|product| item.product_id == product)
                    && filter
                        .location_id
                        .is_none_or(|location| item.location_id == Some(location))
            })
            .cloned()
            .collect())
    }

    async fn update_item(
        &self,
        id: ItemId,
        patch: ItemPatch,
    ) -> Result<InventoryItem, StoreError> {
        let mut items = self.items.lock().map_err(|_| poisoned())?;
        let item = items
            .iter_mut()
            .find(|item| item.id == id)
            .ok_or_else(|| StoreError::Io(format!("item {id} not found")))?;

        if let Some(expected) = patch.expected_version {
            if expected != item.version {
                return Err(StoreError::Io(format!(
                    "stale snapshot for item {id}: expected version {expected}, found {}",
                    item.version
                )));
            }
        }

        if let Some(on_hand) = patch.on_hand_quantity {
            item.on_hand_quantity = on_hand;
        }
        if let Some(reserved) = patch.reserved_quantity {
            item.reserved_quantity = reserved;
        }
        if let Some(avg) = patch.average_unit_cost {
            item.average_unit_cost = avg;
        }
        item.version += 1;

        Ok(item.clone())
    }

    async fn create_movement(
        &self,
        item_id: ItemId,
        payload: MovementPayload,
    ) -> Result<StockMovement, StoreError> {
        let key = DedupeKey::for_payload(item_id, &payload);
        {
            let mut seen = self.seen_keys.lock().map_err(|_| poisoned())?;
            if !seen.insert(key.clone()) {
                return Err(StoreError::Duplicate(key));
            }
        }

        let items = self.items.lock().map_err(|_| poisoned())?;
        let item = items
            .iter()
            .find(|item| item.id == item_id)
            .ok_or_else(|| StoreError::Io(format!("item {item_id} not found")))?;

        // Resulting values snapshot the item as of insertion; the caller
        // patches the item itself.
        let delta = signed_quantity(payload.tipo, payload.quantidade, None);
        let resulting_balance = item.on_hand_quantity + delta;
        let resulting_average_cost = if matches!(payload.tipo, MovementType::Entrada) {
            average_cost(CostInputs {
                current_qty: item.on_hand_quantity,
                current_avg_cost: item.average_unit_cost,
                incoming_qty: delta,
                incoming_unit_cost: payload.custo_unitario.unwrap_or(0),
            })
        } else {
            item.average_unit_cost
        };

        let movement = StockMovement {
            id: MovementId::new(),
            item_id,
            movement_type: payload.tipo,
            quantity: payload.quantidade.abs(),
            unit_cost: payload.custo_unitario,
            resulting_average_cost,
            resulting_balance,
            date: payload.data,
            lot: payload.lote,
            serial: payload.serie,
            origin: payload.origem,
            origin_id: payload.origem_id,
            location_id: payload.deposito_id,
            notes: payload.observacoes,
            reversal_of: None,
        };

        let mut movements = self.movements.lock().map_err(|_| poisoned())?;
        movements.push(movement.clone());
        Ok(movement)
    }

    async fn movement_exists(&self, key: &DedupeKey) -> Result<bool, StoreError> {
        let seen = self.seen_keys.lock().map_err(|_| poisoned())?;
        Ok(seen.contains(key))
    }
}
