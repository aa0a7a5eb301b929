//! Movement request validation.
//!
//! Field checks are independent and accumulated into a structured map so a
//! caller (typically a form) can render per-field feedback. Validation never
//! errors out of band; the outcome is always a value.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::movement::{MovementRequest, OriginKind};
use crate::policy::{NegativeBalancePolicy, PolicyReason};

/// Field a validation error is scoped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MovementField {
    Item,
    Date,
    Quantity,
    UnitCost,
    Notes,
    Origin,
}

/// Field-scoped validation error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValidationError {
    #[error("an inventory item is required")]
    MissingItem,
    #[error("a movement date is required")]
    MissingDate,
    #[error("quantity must be greater than zero")]
    InvalidQuantity,
    #[error("unit cost is required for entry movements")]
    MissingUnitCost,
    #[error("quantity exceeds the available balance")]
    BalanceExceeded,
    #[error("a justification is required for negative balances")]
    JustificationRequired,
    #[error("an origin document reference is required")]
    MissingOriginReference,
}

/// What the caller currently knows about the item and the ruling policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationContext {
    /// Known on-hand quantity; `None` skips the balance check (e.g. item not
    /// yet resolved).
    pub on_hand_quantity: Option<Decimal>,
    pub policy: NegativeBalancePolicy,
}

/// Accumulated per-field errors. Empty means valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationOutcome {
    errors: BTreeMap<MovementField, ValidationError>,
}

impl ValidationOutcome {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &BTreeMap<MovementField, ValidationError> {
        &self.errors
    }

    pub fn error_for(&self, field: MovementField) -> Option<ValidationError> {
        self.errors.get(&field).copied()
    }

    pub(crate) fn reject(&mut self, field: MovementField, error: ValidationError) {
        self.errors.insert(field, error);
    }
}

/// Validate a movement request against the caller-supplied context.
///
/// All checks run; multiple errors may be reported simultaneously. Callers
/// apply the movement only after `is_valid()`.
pub fn validate(request: &MovementRequest, context: &ValidationContext) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::default();

    if request.item_id.is_none() {
        outcome.reject(MovementField::Item, ValidationError::MissingItem);
    }

    if request.date.is_none() {
        outcome.reject(MovementField::Date, ValidationError::MissingDate);
    }

    if request.quantity <= Decimal::ZERO {
        outcome.reject(MovementField::Quantity, ValidationError::InvalidQuantity);
    }

    if request.is_effective_entry() && !request.unit_cost.is_some_and(|c| c > 0) {
        outcome.reject(MovementField::UnitCost, ValidationError::MissingUnitCost);
    }

    // Exit movements against a known balance defer to the policy. A
    // justification-specific rejection surfaces on the notes field so the
    // caller can prompt for one; anything else reads as "exceeds balance".
    if let Some(on_hand) = context.on_hand_quantity {
        let delta = request.signed_delta();
        if delta < Decimal::ZERO {
            let evaluation =
                context
                    .policy
                    .evaluate(on_hand, delta, request.has_justification());
            if !evaluation.accepted {
                match evaluation.reason {
                    Some(PolicyReason::JustificationRequired) => outcome.reject(
                        MovementField::Notes,
                        ValidationError::JustificationRequired,
                    ),
                    _ => outcome
                        .reject(MovementField::Quantity, ValidationError::BalanceExceeded),
                }
            }
        }
    }

    if request.origin != OriginKind::Manual
        && !request
            .origin_id
            .as_deref()
            .is_some_and(|id| !id.trim().is_empty())
    {
        outcome.reject(
            MovementField::Origin,
            ValidationError::MissingOriginReference,
        );
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::{AdjustmentDirection, MovementType};
    use chrono::Utc;
    use estoque_core::ItemId;

    fn base_request(movement_type: MovementType, quantity: i64) -> MovementRequest {
        MovementRequest {
            item_id: Some(ItemId::new()),
            movement_type,
            quantity: Decimal::from(quantity),
            unit_cost: Some(100),
            date: Some(Utc::now()),
            ..MovementRequest::default()
        }
    }

    #[test]
    fn valid_entrada_passes() {
        let outcome = validate(
            &base_request(MovementType::Entrada, 5),
            &ValidationContext::default(),
        );
        assert!(outcome.is_valid());
    }

    #[test]
    fn missing_fields_are_reported_together() {
        let request = MovementRequest {
            movement_type: MovementType::Entrada,
            quantity: Decimal::ZERO,
            ..MovementRequest::default()
        };
        let outcome = validate(&request, &ValidationContext::default());

        assert!(!outcome.is_valid());
        assert_eq!(
            outcome.error_for(MovementField::Item),
            Some(ValidationError::MissingItem)
        );
        assert_eq!(
            outcome.error_for(MovementField::Date),
            Some(ValidationError::MissingDate)
        );
        assert_eq!(
            outcome.error_for(MovementField::Quantity),
            Some(ValidationError::InvalidQuantity)
        );
        assert_eq!(
            outcome.error_for(MovementField::UnitCost),
            Some(ValidationError::MissingUnitCost)
        );
    }

    #[test]
    fn entry_directed_ajuste_requires_unit_cost() {
        let mut request = base_request(MovementType::Ajuste, 3);
        request.adjustment_direction = Some(AdjustmentDirection::Entrada);
        request.unit_cost = None;

        let outcome = validate(&request, &ValidationContext::default());
        assert_eq!(
            outcome.error_for(MovementField::UnitCost),
            Some(ValidationError::MissingUnitCost)
        );
    }

    #[test]
    fn saida_exceeding_balance_surfaces_as_quantity_error() {
        let request = base_request(MovementType::Saida, 20);
        let context = ValidationContext {
            on_hand_quantity: Some(Decimal::from(5)),
            policy: NegativeBalancePolicy::default(),
        };

        let outcome = validate(&request, &context);
        assert!(!outcome.is_valid());
        assert_eq!(
            outcome.error_for(MovementField::Quantity),
            Some(ValidationError::BalanceExceeded)
        );
    }

    #[test]
    fn justification_rejection_surfaces_on_notes_and_notes_flip_it() {
        let policy = NegativeBalancePolicy {
            allow_negative: true,
            require_justification: true,
        };
        let context = ValidationContext {
            on_hand_quantity: Some(Decimal::from(5)),
            policy,
        };

        let request = base_request(MovementType::Saida, 20);
        let outcome = validate(&request, &context);
        assert_eq!(
            outcome.error_for(MovementField::Notes),
            Some(ValidationError::JustificationRequired)
        );

        let mut justified = request;
        justified.notes = Some("inventory shrinkage write-off".into());
        assert!(validate(&justified, &context).is_valid());
    }

    #[test]
    fn blank_notes_are_not_a_justification() {
        let policy = NegativeBalancePolicy {
            allow_negative: true,
            require_justification: true,
        };
        let context = ValidationContext {
            on_hand_quantity: Some(Decimal::from(1)),
            policy,
        };
        let mut request = base_request(MovementType::Saida, 2);
        request.notes = Some("   ".into());

        let outcome = validate(&request, &context);
        assert_eq!(
            outcome.error_for(MovementField::Notes),
            Some(ValidationError::JustificationRequired)
        );
    }

    #[test]
    fn unknown_balance_skips_the_policy_check() {
        let request = base_request(MovementType::Saida, 1_000);
        let outcome = validate(&request, &ValidationContext::default());
        assert!(outcome.is_valid());
    }

    #[test]
    fn non_manual_origin_requires_reference() {
        let mut request = base_request(MovementType::Entrada, 1);
        request.origin = OriginKind::Sale;
        request.origin_id = None;

        let outcome = validate(&request, &ValidationContext::default());
        assert_eq!(
            outcome.error_for(MovementField::Origin),
            Some(ValidationError::MissingOriginReference)
        );

        request.origin_id = Some("sale-123".into());
        assert!(validate(&request, &ValidationContext::default()).is_valid());
    }
}
