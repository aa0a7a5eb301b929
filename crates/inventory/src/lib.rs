//! Inventory movement & costing engine.
//!
//! This crate contains the business rules that turn a stream of stock
//! movements (entries, exits, adjustments) into a consistent on-hand /
//! reserved balance and a weighted average unit cost, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage).
//!
//! Persistence and transport are external collaborators; all mutation is
//! expressed as returned new values (`ItemPatch`, updated snapshots), never
//! through shared in-process state.

pub mod apply;
pub mod cost;
pub mod dedupe;
pub mod item;
pub mod movement;
pub mod policy;
pub mod reservation;
pub mod validate;

pub use apply::{apply_movement, MovementApplication};
pub use cost::{average_cost, CostInputs};
pub use dedupe::DedupeKey;
pub use item::{InventoryItem, ItemPatch};
pub use movement::{
    signed_quantity, AdjustmentDirection, MovementPayload, MovementRequest, MovementType,
    OriginKind, StockMovement,
};
pub use policy::{NegativeBalancePolicy, PolicyEvaluation, PolicyReason};
pub use reservation::{
    release, reserve, resolve_for_release, resolve_for_reserve, ReservationDelta,
    ReservationError,
};
pub use validate::{validate, MovementField, ValidationContext, ValidationError, ValidationOutcome};
