//! Inventory movement ledger and stock reservation engine
//!
//! The single source of truth for "what happened to stock and why": an
//! append-only movement ledger, a reservation/release path over the catalog
//! stock counters, low-stock alert lifecycle, and read-side reporting.
//!
//! This crate exposes no network surface. An order-processing caller drives
//! it in-process: check availability, reserve or release a batch of order
//! lines, then feed the updated items into alert evaluation.
//!
//! ```no_run
//! # async fn demo(pool: sqlx::PgPool) -> inventory_engine::AppResult<()> {
//! use inventory_engine::services::{AlertService, ReservationService};
//! use inventory_engine::services::reservation::OrderContext;
//! use shared::{AlertThresholds, OrderItem, StockOperation};
//!
//! let reservations = ReservationService::new(pool.clone());
//! let alerts = AlertService::new(pool, AlertThresholds::default());
//!
//! let items: Vec<OrderItem> = vec![];
//! let report = reservations
//!     .update_stock_for_order(&items, StockOperation::Reserve, &OrderContext::default())
//!     .await?;
//! alerts.evaluate(&report.updated_items).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod services;

pub use config::Config;
pub use error::{AppError, AppResult};

/// Schema migrations for the ledger, alert, and catalog-projection tables.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();
