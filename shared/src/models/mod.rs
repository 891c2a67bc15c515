//! Domain models for the inventory core

mod alert;
mod movement;
mod stock;

pub use alert::*;
pub use movement::*;
pub use stock::*;
