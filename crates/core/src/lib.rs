//! `estoque-core` — shared domain foundation.
//!
//! This crate contains **pure domain** primitives (identifiers, errors,
//! entity/value-object markers). No infrastructure concerns live here.

pub mod entity;
pub mod error;
pub mod id;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{DocumentId, ItemId, LocationId, MovementId, ProductId};
pub use value_object::ValueObject;
