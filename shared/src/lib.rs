//! Shared types and domain logic for the inventory core
//!
//! This crate contains the database-free half of the system: movement
//! validation, stock transition planning, alert band classification, and
//! ledger summary math. The `inventory-engine` crate layers Postgres
//! persistence on top of these types.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
