use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use estoque_core::{ItemId, LocationId, MovementId};

/// Stock movement kind. Wire values are the legacy Portuguese names and are
/// part of the backend compatibility contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum MovementType {
    #[serde(rename = "ENTRADA")]
    Entrada,
    #[serde(rename = "SAIDA")]
    Saida,
    /// Default for requests that do not say otherwise; an undirected AJUSTE
    /// is the neutral legacy case.
    #[default]
    #[serde(rename = "AJUSTE")]
    Ajuste,
}

impl MovementType {
    pub fn as_str(self) -> &'static str {
        match self {
            MovementType::Entrada => "ENTRADA",
            MovementType::Saida => "SAIDA",
            MovementType::Ajuste => "AJUSTE",
        }
    }
}

/// Direction of an AJUSTE movement, resolving whether the adjustment acts as
/// an entry or an exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdjustmentDirection {
    #[serde(rename = "ENTRADA")]
    Entrada,
    #[serde(rename = "SAIDA")]
    Saida,
}

/// Business document kind that caused a movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OriginKind {
    #[default]
    #[serde(rename = "MANUAL")]
    Manual,
    #[serde(rename = "SALE")]
    Sale,
    #[serde(rename = "PURCHASE")]
    Purchase,
}

impl OriginKind {
    pub fn as_str(self) -> &'static str {
        match self {
            OriginKind::Manual => "MANUAL",
            OriginKind::Sale => "SALE",
            OriginKind::Purchase => "PURCHASE",
        }
    }
}

/// Map a movement's type (plus adjustment direction) to a signed quantity
/// delta.
///
/// ENTRADA contributes `+|q|`, SAIDA `-|q|`. AJUSTE follows its direction;
/// an AJUSTE with **no** direction passes the raw signed quantity through
/// unchanged. That last case is a legacy asymmetry kept on purpose: callers
/// that still submit pre-signed adjustment quantities bypass the
/// magnitude-plus-direction convention used everywhere else.
pub fn signed_quantity(
    movement_type: MovementType,
    quantity: Decimal,
    adjustment_direction: Option<AdjustmentDirection>,
) -> Decimal {
    match movement_type {
        MovementType::Entrada => quantity.abs(),
        MovementType::Saida => -quantity.abs(),
        MovementType::Ajuste => match adjustment_direction {
            Some(AdjustmentDirection::Entrada) => quantity.abs(),
            Some(AdjustmentDirection::Saida) => -quantity.abs(),
            None => quantity,
        },
    }
}

/// A movement as requested by a caller, before validation and application.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MovementRequest {
    pub item_id: Option<ItemId>,
    pub movement_type: MovementType,
    /// Magnitude; sign is resolved via [`signed_quantity`].
    pub quantity: Decimal,
    /// Cents. Required for effective entries.
    pub unit_cost: Option<i64>,
    pub date: Option<DateTime<Utc>>,
    pub lot: Option<String>,
    pub serial: Option<String>,
    pub origin: OriginKind,
    pub origin_id: Option<String>,
    pub location_id: Option<LocationId>,
    pub notes: Option<String>,
    pub adjustment_direction: Option<AdjustmentDirection>,
}

impl MovementRequest {
    /// Signed delta this request would apply to an on-hand balance.
    pub fn signed_delta(&self) -> Decimal {
        signed_quantity(self.movement_type, self.quantity, self.adjustment_direction)
    }

    /// Whether this request acts as an entry (receives stock and carries
    /// cost weight).
    pub fn is_effective_entry(&self) -> bool {
        matches!(self.movement_type, MovementType::Entrada)
            || (matches!(self.movement_type, MovementType::Ajuste)
                && matches!(self.adjustment_direction, Some(AdjustmentDirection::Entrada)))
    }

    /// Non-blank notes count as justification for negative-balance policy.
    pub fn has_justification(&self) -> bool {
        self.notes
            .as_deref()
            .is_some_and(|n| !n.trim().is_empty())
    }

    /// Wire payload for the movement-creation collaborator. `None` when the
    /// request has no date (such a request never passes validation).
    pub fn payload(&self) -> Option<MovementPayload> {
        Some(MovementPayload {
            tipo: self.movement_type,
            quantidade: self.quantity,
            custo_unitario: self.unit_cost,
            data: self.date?,
            lote: self.lot.clone(),
            serie: self.serial.clone(),
            origem: self.origin,
            origem_id: self.origin_id.clone(),
            observacoes: self.notes.clone(),
            deposito_id: self.location_id,
        })
    }
}

/// JSON payload for movement creation.
///
/// Field names are a compatibility contract with the existing backend API
/// and must be preserved bit-for-bit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovementPayload {
    pub tipo: MovementType,
    pub quantidade: Decimal,
    #[serde(rename = "custoUnitario", skip_serializing_if = "Option::is_none")]
    pub custo_unitario: Option<i64>,
    pub data: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lote: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serie: Option<String>,
    pub origem: OriginKind,
    #[serde(rename = "origemId", skip_serializing_if = "Option::is_none")]
    pub origem_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observacoes: Option<String>,
    #[serde(rename = "depositoId", skip_serializing_if = "Option::is_none")]
    pub deposito_id: Option<LocationId>,
}

/// Immutable ledger entry, as persisted by the external collaborator.
///
/// Never mutated after acceptance; corrections are new AJUSTE or reversal
/// movements referencing the original via `reversal_of`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    pub id: MovementId,
    pub item_id: ItemId,
    #[serde(rename = "tipo")]
    pub movement_type: MovementType,
    /// Magnitude only (> 0).
    pub quantity: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_cost: Option<i64>,
    pub resulting_average_cost: i64,
    pub resulting_balance: Decimal,
    pub date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lot: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub serial: Option<String>,
    pub origin: OriginKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub origin_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<LocationId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Back-reference to the movement this one reverses; never ownership.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reversal_of: Option<MovementId>,
}
