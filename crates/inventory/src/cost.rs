//! Weighted average unit cost.
//!
//! Only incoming (positive) quantity contributes cost weight. Costs are
//! whole cents; intermediate math runs in `Decimal` so fractional quantities
//! weight correctly.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Inputs to one rolling-average recomputation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CostInputs {
    pub current_qty: Decimal,
    /// Cents.
    pub current_avg_cost: i64,
    pub incoming_qty: Decimal,
    /// Cents.
    pub incoming_unit_cost: i64,
}

/// Recompute the rolling average unit cost (cents) after an entry.
///
/// `round((cq·cc + iq·ic) / (cq + iq))`, midpoint away from zero (matching
/// the monetary representation, not banker's rounding). Negative current
/// values are clamped to 0 before weighting: balances must not go negative
/// under normal policy, but the calculator tolerates transient bad state
/// rather than erroring. A zero denominator yields 0.
pub fn average_cost(inputs: CostInputs) -> i64 {
    let current_qty = inputs.current_qty.max(Decimal::ZERO);
    let current_cost = Decimal::from(inputs.current_avg_cost.max(0));
    let incoming_qty = inputs.incoming_qty.max(Decimal::ZERO);
    let incoming_cost = Decimal::from(inputs.incoming_unit_cost.max(0));

    if incoming_qty == Decimal::ZERO {
        return inputs.current_avg_cost.max(0);
    }

    let denominator = current_qty + incoming_qty;
    if denominator == Decimal::ZERO {
        return 0;
    }

    let blended = (current_qty * current_cost + incoming_qty * incoming_cost) / denominator;
    blended
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .unwrap_or(0)
}
