//! Negative balance policy.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use estoque_core::ValueObject;

/// Policy governing whether a projected balance may go below zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NegativeBalancePolicy {
    pub allow_negative: bool,
    pub require_justification: bool,
}

impl Default for NegativeBalancePolicy {
    /// Default stance: negatives forbidden; if a deployment opts into
    /// negatives, a justification is still demanded.
    fn default() -> Self {
        Self {
            allow_negative: false,
            require_justification: true,
        }
    }
}

impl ValueObject for NegativeBalancePolicy {}

/// Why an evaluation rejected (or, informationally, accepted) a projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PolicyReason {
    NegativeNotAllowed,
    JustificationRequired,
    /// Informational: the projection is negative but the policy accepts it.
    NegativeAllowed,
}

/// Outcome of one policy evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolicyEvaluation {
    pub accepted: bool,
    pub projected_balance: Decimal,
    pub reason: Option<PolicyReason>,
}

impl NegativeBalancePolicy {
    /// Decide accept/reject for `current_balance + delta`.
    pub fn evaluate(
        &self,
        current_balance: Decimal,
        delta: Decimal,
        justification_provided: bool,
    ) -> PolicyEvaluation {
        let projected_balance = current_balance + delta;

        if projected_balance >= Decimal::ZERO {
            return PolicyEvaluation {
                accepted: true,
                projected_balance,
                reason: None,
            };
        }

        if !self.allow_negative {
            return PolicyEvaluation {
                accepted: false,
                projected_balance,
                reason: Some(PolicyReason::NegativeNotAllowed),
            };
        }

        if self.require_justification && !justification_provided {
            return PolicyEvaluation {
                accepted: false,
                projected_balance,
                reason: Some(PolicyReason::JustificationRequired),
            };
        }

        PolicyEvaluation {
            accepted: true,
            projected_balance,
            reason: Some(PolicyReason::NegativeAllowed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(v: i64) -> Decimal {
        Decimal::from(v)
    }

    #[test]
    fn non_negative_projection_is_accepted_without_reason() {
        let eval = NegativeBalancePolicy::default().evaluate(dec(10), dec(-10), false);
        assert!(eval.accepted);
        assert_eq!(eval.projected_balance, Decimal::ZERO);
        assert_eq!(eval.reason, None);
    }

    #[test]
    fn default_policy_rejects_negatives_even_with_justification() {
        let eval = NegativeBalancePolicy::default().evaluate(dec(5), dec(-6), true);
        assert!(!eval.accepted);
        assert_eq!(eval.reason, Some(PolicyReason::NegativeNotAllowed));
        assert_eq!(eval.projected_balance, dec(-1));
    }

    #[test]
    fn allowed_negatives_demand_justification() {
        let policy = NegativeBalancePolicy {
            allow_negative: true,
            require_justification: true,
        };

        let rejected = policy.evaluate(dec(2), dec(-5), false);
        assert!(!rejected.accepted);
        assert_eq!(rejected.reason, Some(PolicyReason::JustificationRequired));

        // Same input with justification flips to accepted.
        let accepted = policy.evaluate(dec(2), dec(-5), true);
        assert!(accepted.accepted);
        assert_eq!(accepted.reason, Some(PolicyReason::NegativeAllowed));
    }

    #[test]
    fn fully_permissive_policy_accepts_with_informational_reason() {
        let policy = NegativeBalancePolicy {
            allow_negative: true,
            require_justification: false,
        };
        let eval = policy.evaluate(dec(0), dec(-3), false);
        assert!(eval.accepted);
        assert_eq!(eval.reason, Some(PolicyReason::NegativeAllowed));
    }
}
