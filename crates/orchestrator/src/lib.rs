//! Cross-domain movement orchestration.
//!
//! Turns commercial document transitions (sales and purchases reaching a
//! final status, cancellations, quote-time reservations) into stock
//! movements and reservation changes, against an externally persisted
//! inventory snapshot reached through the [`store::InventoryStore`] trait.
//!
//! Per-line emissions are independent: one failing line never rolls back its
//! siblings, and the outcome is reported as a partial-failure list. Re-runs
//! are idempotent through the persistence layer's dedupe-key rejection.

pub mod audit;
pub mod in_memory;
pub mod orchestrator;
pub mod store;


pub use audit::{AuditEvent, AuditEventKind, AuditNotifier};
pub use in_memory::InMemoryInventoryStore;
pub use orchestrator::{
    AppliedLine, DocumentOutcome, LineEffect, LineFailure, LineFailureKind, MovementOrchestrator,
};
pub use store::{InventoryStore, ItemFilter, StoreError};
