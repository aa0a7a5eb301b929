//! Movement application: the composition callers actually run.
//!
//! Validates a request against a fresh item snapshot, resolves the signed
//! delta, recomputes the weighted average cost for effective entries, and
//! hands back the patch the persistence collaborator should apply. Pure; the
//! item snapshot is never mutated.

use rust_decimal::Decimal;

use crate::cost::{average_cost, CostInputs};
use crate::item::{InventoryItem, ItemPatch};
use crate::movement::{MovementPayload, MovementRequest};
use crate::policy::NegativeBalancePolicy;
use crate::validate::{
    validate, MovementField, ValidationContext, ValidationError, ValidationOutcome,
};

/// Result of applying one movement to one item snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct MovementApplication {
    pub signed_delta: Decimal,
    pub resulting_balance: Decimal,
    /// Cents. Unchanged for exits; recomputed for effective entries.
    pub resulting_average_cost: i64,
    pub patch: ItemPatch,
    /// Wire payload for the movement-creation collaborator, built from the
    /// validated request.
    pub payload: MovementPayload,
}

/// Validate and compute the effect of `request` on `item`.
///
/// Returns the structured validation outcome on rejection so callers can
/// surface per-field errors.
pub fn apply_movement(
    item: &InventoryItem,
    request: &MovementRequest,
    policy: &NegativeBalancePolicy,
) -> Result<MovementApplication, ValidationOutcome> {
    let context = ValidationContext {
        on_hand_quantity: Some(item.on_hand_quantity),
        policy: *policy,
    };
    let outcome = validate(request, &context);
    if !outcome.is_valid() {
        return Err(outcome);
    }

    // A valid request always carries a date, so the payload always builds;
    // reporting the miss keeps every rejection path structured.
    let Some(payload) = request.payload() else {
        let mut errors = ValidationOutcome::default();
        errors.reject(MovementField::Date, ValidationError::MissingDate);
        return Err(errors);
    };

    let signed_delta = request.signed_delta();
    let resulting_balance = item.on_hand_quantity + signed_delta;

    let resulting_average_cost = if request.is_effective_entry() {
        average_cost(CostInputs {
            current_qty: item.on_hand_quantity,
            current_avg_cost: item.average_unit_cost,
            incoming_qty: signed_delta,
            incoming_unit_cost: request.unit_cost.unwrap_or(0),
        })
    } else {
        item.average_unit_cost
    };

    let patch = ItemPatch {
        on_hand_quantity: Some(resulting_balance),
        average_unit_cost: Some(resulting_average_cost),
        expected_version: Some(item.version),
        ..ItemPatch::default()
    };

    Ok(MovementApplication {
        signed_delta,
        resulting_balance,
        resulting_average_cost,
        patch,
        payload,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::MovementType;
    use chrono::Utc;
    use estoque_core::{ItemId, ProductId};
    use rust_decimal::Decimal;

    fn item(on_hand: i64, avg_cost: i64) -> InventoryItem {
        InventoryItem {
            id: ItemId::new(),
            product_id: ProductId::new(),
            location_id: None,
            on_hand_quantity: Decimal::from(on_hand),
            reserved_quantity: Decimal::ZERO,
            average_unit_cost: avg_cost,
            minimum_quantity: Decimal::ZERO,
            version: 3,
        }
    }

    fn request(movement_type: MovementType, quantity: i64, unit_cost: Option<i64>) -> MovementRequest {
        MovementRequest {
            item_id: Some(ItemId::new()),
            movement_type,
            quantity: Decimal::from(quantity),
            unit_cost,
            date: Some(Utc::now()),
            ..MovementRequest::default()
        }
    }

    #[test]
    fn entrada_moves_balance_and_average_cost() {
        let snapshot = item(100, 500);
        let application = apply_movement(
            &snapshot,
            &request(MovementType::Entrada, 50, Some(800)),
            &NegativeBalancePolicy::default(),
        )
        .unwrap();

        assert_eq!(application.resulting_balance, Decimal::from(150));
        assert_eq!(application.resulting_average_cost, 600);
        assert_eq!(application.patch.expected_version, Some(3));
        // Snapshot untouched.
        assert_eq!(snapshot.on_hand_quantity, Decimal::from(100));
    }

    #[test]
    fn saida_keeps_average_cost() {
        let snapshot = item(100, 500);
        let application = apply_movement(
            &snapshot,
            &request(MovementType::Saida, 30, None),
            &NegativeBalancePolicy::default(),
        )
        .unwrap();

        assert_eq!(application.resulting_balance, Decimal::from(70));
        assert_eq!(application.resulting_average_cost, 500);
    }

    #[test]
    fn rejected_request_returns_the_field_errors() {
        let snapshot = item(5, 100);
        let outcome = apply_movement(
            &snapshot,
            &request(MovementType::Saida, 20, None),
            &NegativeBalancePolicy::default(),
        )
        .unwrap_err();

        assert!(!outcome.is_valid());
        assert_eq!(
            outcome.error_for(MovementField::Quantity),
            Some(ValidationError::BalanceExceeded)
        );
    }

    #[test]
    fn application_carries_the_wire_payload() {
        let snapshot = item(10, 100);
        let req = request(MovementType::Entrada, 5, Some(200));
        let application =
            apply_movement(&snapshot, &req, &NegativeBalancePolicy::default()).unwrap();

        assert_eq!(application.payload.quantidade, Decimal::from(5));
        assert_eq!(application.payload.custo_unitario, Some(200));
        assert_eq!(Some(application.payload.data), req.date);
    }
}
