//! Stock alert lifecycle
//!
//! Derives low/critical stock alerts from post-movement stock levels. At
//! most one alert row exists per stock target: the row is upserted while
//! stock stays at or below the low threshold and resolved once it rises
//! above, never deleted, preserving history.

use serde::{Deserialize, Serialize};
use shared::{alert_message, AlertBand, AlertThresholds, UpdatedStockItem};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::AppResult;

/// Alert service owning the threshold policy
#[derive(Clone)]
pub struct AlertService {
    db: PgPool,
    thresholds: AlertThresholds,
}

/// Alert priorities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "stock_alert_priority", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum AlertPriority {
    Medium,
    High,
}

impl AlertService {
    pub fn new(db: PgPool, thresholds: AlertThresholds) -> Self {
        Self { db, thresholds }
    }

    /// Classify each updated stock target and upsert or resolve its alert.
    ///
    /// Re-running with stock already above the low threshold is a no-op on
    /// an already-resolved alert.
    pub async fn evaluate(&self, updated_items: &[UpdatedStockItem]) -> AppResult<()> {
        for item in updated_items {
            let band = self.thresholds.classify(item.new_stock);
            match band {
                AlertBand::Critical => {
                    self.upsert(item, AlertPriority::High, band).await?;
                }
                AlertBand::Low => {
                    self.upsert(item, AlertPriority::Medium, band).await?;
                }
                AlertBand::Healthy => {
                    self.resolve(item.product_id, item.variant_id).await?;
                }
            }
        }

        Ok(())
    }

    async fn upsert(
        &self,
        item: &UpdatedStockItem,
        priority: AlertPriority,
        band: AlertBand,
    ) -> AppResult<()> {
        // threshold_for and alert_message are Some for non-healthy bands
        let min_threshold = self.thresholds.threshold_for(band).unwrap_or_default();
        let message = alert_message(band, item.new_stock).unwrap_or_default();

        sqlx::query(
            r#"
            INSERT INTO stock_alerts
                (product_id, variant_id, current_stock, min_threshold, priority, status, message)
            VALUES ($1, $2, $3, $4, $5, 'ACTIVE', $6)
            ON CONFLICT (product_id, COALESCE(variant_id, '00000000-0000-0000-0000-000000000000'::uuid))
            DO UPDATE SET
                current_stock = EXCLUDED.current_stock,
                min_threshold = EXCLUDED.min_threshold,
                priority = EXCLUDED.priority,
                status = 'ACTIVE',
                message = EXCLUDED.message,
                resolved_at = NULL,
                updated_at = now()
            "#,
        )
        .bind(item.product_id)
        .bind(item.variant_id)
        .bind(item.new_stock)
        .bind(min_threshold)
        .bind(priority)
        .bind(message)
        .execute(&self.db)
        .await?;

        tracing::debug!(
            product_id = %item.product_id,
            new_stock = item.new_stock,
            priority = ?priority,
            "stock alert raised"
        );

        Ok(())
    }

    async fn resolve(&self, product_id: Uuid, variant_id: Option<Uuid>) -> AppResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE stock_alerts
            SET status = 'RESOLVED', resolved_at = now(), updated_at = now()
            WHERE product_id = $1
              AND variant_id IS NOT DISTINCT FROM $2
              AND status = 'ACTIVE'
            "#,
        )
        .bind(product_id)
        .bind(variant_id)
        .execute(&self.db)
        .await?;

        if result.rows_affected() > 0 {
            tracing::debug!(product_id = %product_id, "stock alert resolved");
        }

        Ok(())
    }
}
