//! Reservation of on-hand quantity against pending sales.
//!
//! All operations are read-modify-write over a full item snapshot and return
//! the updated snapshot as a new value; the caller persists it and is
//! responsible for re-fetching a fresh snapshot per operation.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use estoque_core::{ItemId, LocationId, ValueObject};

use crate::item::InventoryItem;

/// Reservation failure.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", tag = "kind")]
pub enum ReservationError {
    #[error("no inventory item resolves for the requested product/location")]
    ItemNotFound,
    #[error("requested {requested} exceeds available {available}")]
    InsufficientBalance {
        requested: Decimal,
        available: Decimal,
    },
}

/// Ephemeral record of one reserve/release, folded into
/// `InventoryItem::reserved_quantity` and never persisted on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationDelta {
    pub item_id: ItemId,
    pub previous_reserved: Decimal,
    pub new_reserved: Decimal,
}

impl ValueObject for ReservationDelta {}

impl ReservationDelta {
    /// Signed change actually applied (release deltas are negative and may
    /// be smaller in magnitude than requested due to the zero floor).
    pub fn applied(&self) -> Decimal {
        self.new_reserved - self.previous_reserved
    }
}

/// Pick the stock record a reservation should land on.
///
/// An exact location match wins; otherwise the candidate with the greatest
/// available quantity is chosen, ties broken by stable input order.
pub fn resolve_for_reserve<'a>(
    candidates: &'a [InventoryItem],
    location_id: Option<&LocationId>,
) -> Option<&'a InventoryItem> {
    resolve(candidates, location_id, |item| item.available_quantity())
}

/// Pick the stock record a release should come off.
///
/// Same rule as [`resolve_for_reserve`], except non-location ties prefer the
/// candidate currently holding the greatest reservation.
pub fn resolve_for_release<'a>(
    candidates: &'a [InventoryItem],
    location_id: Option<&LocationId>,
) -> Option<&'a InventoryItem> {
    resolve(candidates, location_id, |item| item.reserved_quantity)
}

fn resolve<'a>(
    candidates: &'a [InventoryItem],
    location_id: Option<&LocationId>,
    rank: impl Fn(&InventoryItem) -> Decimal,
) -> Option<&'a InventoryItem> {
    if let Some(wanted) = location_id {
        if let Some(exact) = candidates
            .iter()
            .find(|item| item.location_id.as_ref() == Some(wanted))
        {
            return Some(exact);
        }
    }

    // Strictly-greater keeps the first candidate on ties (stable order).
    candidates.iter().fold(None, |best, candidate| match best {
        Some(current) if rank(candidate) > rank(current) => Some(candidate),
        Some(current) => Some(current),
        None => Some(candidate),
    })
}

/// Earmark `quantity` against the item. Fails when the request exceeds the
/// available (on-hand minus already-reserved) quantity.
pub fn reserve(
    item: &InventoryItem,
    quantity: Decimal,
) -> Result<(InventoryItem, ReservationDelta), ReservationError> {
    let available = item.available_quantity();
    if quantity > available {
        return Err(ReservationError::InsufficientBalance {
            requested: quantity,
            available,
        });
    }

    let previous_reserved = item.reserved_quantity;
    let new_reserved = previous_reserved + quantity;
    let updated = item.with_reserved(new_reserved);
    let delta = ReservationDelta {
        item_id: item.id,
        previous_reserved,
        new_reserved,
    };
    Ok((updated, delta))
}

/// Give back `quantity` of reservation, floored at zero.
///
/// This is a best-effort rollback and must not itself fail; over-release
/// silently clamps.
pub fn release(item: &InventoryItem, quantity: Decimal) -> (InventoryItem, ReservationDelta) {
    let previous_reserved = item.reserved_quantity;
    let new_reserved = (previous_reserved - quantity).max(Decimal::ZERO);
    let updated = item.with_reserved(new_reserved);
    let delta = ReservationDelta {
        item_id: item.id,
        previous_reserved,
        new_reserved,
    };
    (updated, delta)
}
