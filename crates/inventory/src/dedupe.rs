//! Idempotency fingerprint for movement requests.
//!
//! Retried imports and duplicate submissions must resolve to the same key so
//! the persistence collaborator can ignore re-insertion. The key is *not* a
//! primary identifier; two movements with equal keys are the same real-world
//! event.

use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use estoque_core::{ItemId, LocationId, ValueObject};

use crate::movement::{MovementPayload, MovementRequest};

/// Deterministic, order-stable fingerprint of a movement's semantic content.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DedupeKey(String);

impl ValueObject for DedupeKey {}

impl DedupeKey {
    /// Key for a request about to be applied.
    pub fn for_request(request: &MovementRequest) -> Self {
        let mut builder = KeyBuilder::default();
        builder.id(request.item_id.map(|id| id.to_string()));
        builder.raw(request.movement_type.as_str());
        builder.date(request.date);
        builder.quantity(request.quantity);
        builder.cost(request.unit_cost);
        builder.raw(request.origin.as_str());
        builder.text(request.origin_id.as_deref());
        builder.text(request.lot.as_deref());
        builder.text(request.serial.as_deref());
        builder.id(request.location_id.map(|id| id.to_string()));
        builder.finish()
    }

    /// Key for a wire payload, as computed by the persistence side. Produces
    /// the same key as [`DedupeKey::for_request`] on equivalent content.
    pub fn for_payload(item_id: ItemId, payload: &MovementPayload) -> Self {
        let mut builder = KeyBuilder::default();
        builder.id(Some(item_id.to_string()));
        builder.raw(payload.tipo.as_str());
        builder.date(Some(payload.data));
        builder.quantity(payload.quantidade);
        builder.cost(payload.custo_unitario);
        builder.raw(payload.origem.as_str());
        builder.text(payload.origem_id.as_deref());
        builder.text(payload.lote.as_deref());
        builder.text(payload.serie.as_deref());
        builder.id(payload.deposito_id.map(|id: LocationId| id.to_string()));
        builder.finish()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for DedupeKey {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

const DELIMITER: &str = "|";

/// Accumulates normalized parts in fixed field order; empty parts are
/// omitted entirely.
#[derive(Default)]
struct KeyBuilder {
    parts: Vec<String>,
}

impl KeyBuilder {
    fn raw(&mut self, part: &str) {
        if !part.is_empty() {
            self.parts.push(part.to_string());
        }
    }

    fn id(&mut self, part: Option<String>) {
        if let Some(id) = part {
            self.raw(&normalize(&id));
        }
    }

    fn text(&mut self, part: Option<&str>) {
        if let Some(text) = part {
            let normalized = normalize(text);
            self.raw(&normalized);
        }
    }

    fn date(&mut self, date: Option<DateTime<Utc>>) {
        if let Some(date) = date {
            self.raw(&date.to_rfc3339_opts(SecondsFormat::Secs, true));
        }
    }

    fn quantity(&mut self, quantity: Decimal) {
        // Strip trailing zeros so 5, 5.0 and 5.00 fingerprint identically.
        self.raw(&quantity.normalize().to_string());
    }

    fn cost(&mut self, cost: Option<i64>) {
        if let Some(cost) = cost {
            self.raw(&cost.to_string());
        }
    }

    fn finish(self) -> DedupeKey {
        DedupeKey(self.parts.join(DELIMITER))
    }
}

/// Trim, uppercase, collapse internal whitespace runs to one space.
fn normalize(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}
