//! Movement ledger service
//!
//! Append-only store of inventory movements; the audit trail for every
//! stock change. Records are created once and never mutated or deleted.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::validation::{
    derive_total_value, validate_new_stock, validate_product_id, validate_quantity,
};
use sqlx::{FromRow, PgConnection, PgPool};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Ledger service for recording and appending inventory movements
#[derive(Clone)]
pub struct LedgerService {
    db: PgPool,
}

/// Inventory movement types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "inventory_movement_type", rename_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MovementType {
    Purchase,
    Sale,
    ReturnIn,
    ReturnOut,
    Adjustment,
    Transfer,
    Damaged,
    Expired,
    Lost,
    Found,
    Production,
    Consumption,
    Reservation,
    Release,
}

impl MovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::Purchase => "PURCHASE",
            MovementType::Sale => "SALE",
            MovementType::ReturnIn => "RETURN_IN",
            MovementType::ReturnOut => "RETURN_OUT",
            MovementType::Adjustment => "ADJUSTMENT",
            MovementType::Transfer => "TRANSFER",
            MovementType::Damaged => "DAMAGED",
            MovementType::Expired => "EXPIRED",
            MovementType::Lost => "LOST",
            MovementType::Found => "FOUND",
            MovementType::Production => "PRODUCTION",
            MovementType::Consumption => "CONSUMPTION",
            MovementType::Reservation => "RESERVATION",
            MovementType::Release => "RELEASE",
        }
    }
}

/// One immutable ledger row
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct InventoryMovement {
    pub id: Uuid,
    pub product_id: Uuid,
    pub variant_id: Option<Uuid>,
    pub movement_type: MovementType,
    pub quantity: i32,
    pub previous_stock: i32,
    pub new_stock: i32,
    pub unit_cost: Option<Decimal>,
    pub total_value: Option<Decimal>,
    pub reason: String,
    pub reference: Option<String>,
    pub order_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    pub notes: Option<String>,
    pub batch_number: Option<String>,
    pub expiration_date: Option<DateTime<Utc>>,
    pub location_from: Option<String>,
    pub location_to: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for recording a movement
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewMovement {
    pub product_id: Uuid,
    pub variant_id: Option<Uuid>,
    pub movement_type: MovementType,
    pub quantity: i32,
    pub previous_stock: i32,
    pub new_stock: i32,
    pub unit_cost: Option<Decimal>,
    pub total_value: Option<Decimal>,
    #[validate(length(min = 1))]
    pub reason: String,
    pub reference: Option<String>,
    pub order_id: Option<Uuid>,
    pub user_id: Option<Uuid>,
    pub supplier_id: Option<Uuid>,
    pub notes: Option<String>,
    pub batch_number: Option<String>,
    pub expiration_date: Option<DateTime<Utc>>,
    pub location_from: Option<String>,
    pub location_to: Option<String>,
}

/// Outcome of a batch append
#[derive(Debug, Clone, Serialize)]
pub struct BatchRecordOutcome {
    pub success: bool,
    pub recorded_count: usize,
    pub movement_ids: Vec<Uuid>,
    pub errors: Vec<String>,
}

impl LedgerService {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record a single movement on its own connection.
    pub async fn record(&self, input: &NewMovement) -> AppResult<Uuid> {
        let mut conn = self.db.acquire().await?;
        self.record_in(&mut conn, input).await
    }

    /// Record a movement on a caller-supplied connection, so the append
    /// co-commits with the stock write in the caller's transaction.
    pub async fn record_in(&self, conn: &mut PgConnection, input: &NewMovement) -> AppResult<Uuid> {
        Self::validate(input)?;

        let total_value = derive_total_value(input.quantity, input.unit_cost, input.total_value);

        let movement_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO inventory_movements (
                product_id, variant_id, movement_type, quantity, previous_stock, new_stock,
                unit_cost, total_value, reason, reference, order_id, user_id, supplier_id,
                notes, batch_number, expiration_date, location_from, location_to
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            RETURNING id
            "#,
        )
        .bind(input.product_id)
        .bind(input.variant_id)
        .bind(input.movement_type)
        .bind(input.quantity)
        .bind(input.previous_stock)
        .bind(input.new_stock)
        .bind(input.unit_cost)
        .bind(total_value)
        .bind(&input.reason)
        .bind(&input.reference)
        .bind(input.order_id)
        .bind(input.user_id)
        .bind(input.supplier_id)
        .bind(&input.notes)
        .bind(&input.batch_number)
        .bind(input.expiration_date)
        .bind(&input.location_from)
        .bind(&input.location_to)
        .fetch_one(&mut *conn)
        .await?;

        tracing::debug!(
            movement_id = %movement_id,
            product_id = %input.product_id,
            movement_type = input.movement_type.as_str(),
            quantity = input.quantity,
            "recorded inventory movement"
        );

        Ok(movement_id)
    }

    /// Record a batch of movements in one transaction.
    ///
    /// Per-movement validation failures are collected into `errors` and
    /// skipped; the movements that pass still commit. Infrastructure
    /// failures abort the whole batch.
    pub async fn record_batch(&self, inputs: &[NewMovement]) -> AppResult<BatchRecordOutcome> {
        let mut movement_ids = Vec::with_capacity(inputs.len());
        let mut errors = Vec::new();

        let mut tx = self.db.begin().await?;
        for input in inputs {
            match self.record_in(&mut tx, input).await {
                Ok(id) => movement_ids.push(id),
                Err(err @ AppError::Validation { .. }) => errors.push(err.to_string()),
                Err(err) => return Err(err),
            }
        }
        tx.commit().await?;

        if !errors.is_empty() {
            tracing::warn!(
                recorded = movement_ids.len(),
                rejected = errors.len(),
                "batch append committed with rejected movements"
            );
        }

        Ok(BatchRecordOutcome {
            success: errors.is_empty(),
            recorded_count: movement_ids.len(),
            movement_ids,
            errors,
        })
    }

    fn validate(input: &NewMovement) -> AppResult<()> {
        validate_product_id(input.product_id)
            .map_err(|msg| AppError::validation("product_id", msg))?;
        validate_quantity(input.quantity).map_err(|msg| AppError::validation("quantity", msg))?;
        validate_new_stock(input.new_stock).map_err(|msg| AppError::validation("new_stock", msg))?;
        input
            .validate()
            .map_err(|err| AppError::validation("reason", err.to_string()))?;
        Ok(())
    }
}
