//! Commercial document model consumed by the movement orchestrator.
//!
//! Sales and purchases are thin CRUD records owned elsewhere; this crate
//! carries only the shape and the status lifecycle the inventory engine
//! reacts to.

pub mod document;

pub use document::{DocumentLine, DocumentStatus, PurchaseDocument, SaleDocument};
