//! Inventory ledger service
//!
//! The only path through which material stock changes. Every change locks the
//! material row, updates the stock and appends a movement row in one
//! transaction, so concurrent movements against the same material serialize
//! and the log always chains stock_before -> stock_after without gaps.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{InventoryMovement, MovementType, StockChange};

/// Inventory service for stock movements
#[derive(Clone)]
pub struct InventoryService {
    db: PgPool,
}

/// Input for applying a stock movement
#[derive(Debug, Clone, Deserialize)]
pub struct ApplyMovementInput {
    pub material_id: Uuid,
    pub movement_type: MovementType,
    pub quantity: Decimal,
    pub reason: Option<String>,
    pub reference_id: Option<Uuid>,
}

/// Per-material result of a best-effort batch deduction
#[derive(Debug, Clone, Serialize)]
pub struct MaterialDeduction {
    pub material_id: Uuid,
    pub quantity: Decimal,
    pub outcome: DeductionOutcome,
}

/// Outcome of one deduction in a batch
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case", tag = "status")]
pub enum DeductionOutcome {
    Applied { stock_after: Decimal },
    Failed { reason: String },
}

/// Movement listing filter
#[derive(Debug, Default, Deserialize)]
pub struct MovementFilter {
    pub material_id: Option<Uuid>,
    pub movement_type: Option<MovementType>,
}

impl InventoryService {
    /// Create a new InventoryService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Apply a stock movement in its own transaction
    pub async fn apply_movement(&self, input: &ApplyMovementInput) -> AppResult<StockChange> {
        let mut tx = self.db.begin().await?;
        let change = Self::apply_movement_in_tx(&mut tx, input).await?;
        tx.commit().await?;
        Ok(change)
    }

    /// Apply a stock movement inside a caller-owned transaction
    ///
    /// Material purchases and order delivery go through here so every stock
    /// change shares the same locked-row update + movement append.
    pub async fn apply_movement_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        input: &ApplyMovementInput,
    ) -> AppResult<StockChange> {
        // Lock the material row: movements against the same material serialize
        let material = sqlx::query_as::<_, (String, Decimal)>(
            "SELECT name, stock_available FROM materials WHERE id = $1 FOR UPDATE",
        )
        .bind(input.material_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or(AppError::MaterialNotFound(input.material_id))?;

        let (material_name, stock_before) = material;
        let stock_after = input
            .movement_type
            .apply(stock_before, input.quantity)
            .map_err(|err| AppError::from_stock(err, &material_name))?;

        sqlx::query("UPDATE materials SET stock_available = $1, updated_at = NOW() WHERE id = $2")
            .bind(stock_after)
            .bind(input.material_id)
            .execute(&mut **tx)
            .await?;

        let movement_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO inventory_movements (
                material_id, movement_type, quantity, stock_before, stock_after,
                reason, reference_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(input.material_id)
        .bind(input.movement_type)
        .bind(input.quantity)
        .bind(stock_before)
        .bind(stock_after)
        .bind(&input.reason)
        .bind(input.reference_id)
        .fetch_one(&mut **tx)
        .await?;

        Ok(StockChange {
            movement_id,
            material_id: input.material_id,
            stock_before,
            stock_after,
        })
    }

    /// Drain the materials of a product for a sale, best effort
    ///
    /// Each material moves in its own transaction and a failure on one does
    /// not undo the others: a completed sale is never blocked by a stock gap,
    /// the shortfall is reported for manual reconciliation instead.
    pub async fn drain_for_sale(
        &self,
        product_id: Uuid,
        units: i32,
        sale_id: Uuid,
        reason: &str,
    ) -> AppResult<Vec<MaterialDeduction>> {
        let links = sqlx::query_as::<_, (Uuid, Decimal)>(
            "SELECT material_id, quantity FROM product_materials WHERE product_id = $1",
        )
        .bind(product_id)
        .fetch_all(&self.db)
        .await?;

        if links.is_empty() {
            tracing::warn!(%product_id, "product has no material links, nothing to drain");
            return Ok(Vec::new());
        }

        let mut deductions = Vec::with_capacity(links.len());
        for (material_id, per_unit) in links {
            let quantity = per_unit * Decimal::from(units);
            let input = ApplyMovementInput {
                material_id,
                movement_type: MovementType::Salida,
                quantity,
                reason: Some(reason.to_string()),
                reference_id: Some(sale_id),
            };
            let outcome = match self.apply_movement(&input).await {
                Ok(change) => DeductionOutcome::Applied {
                    stock_after: change.stock_after,
                },
                Err(err) => {
                    tracing::warn!(
                        %material_id,
                        %sale_id,
                        error = %err,
                        "material deduction failed during sale, needs manual reconciliation"
                    );
                    DeductionOutcome::Failed {
                        reason: err.to_string(),
                    }
                }
            };
            deductions.push(MaterialDeduction {
                material_id,
                quantity,
                outcome,
            });
        }

        Ok(deductions)
    }

    /// List movements, newest first
    pub async fn list_movements(
        &self,
        filter: &MovementFilter,
    ) -> AppResult<Vec<InventoryMovement>> {
        let movements = sqlx::query_as::<_, InventoryMovement>(
            r#"
            SELECT id, material_id, movement_type, quantity, stock_before, stock_after,
                   reason, reference_id, occurred_at
            FROM inventory_movements
            WHERE ($1::uuid IS NULL OR material_id = $1)
              AND ($2::movement_type IS NULL OR movement_type = $2)
            ORDER BY occurred_at DESC
            "#,
        )
        .bind(filter.material_id)
        .bind(filter.movement_type)
        .fetch_all(&self.db)
        .await?;

        Ok(movements)
    }

    /// Movement history of one material, oldest first (audit order)
    pub async fn material_history(&self, material_id: Uuid) -> AppResult<Vec<InventoryMovement>> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM materials WHERE id = $1)",
        )
        .bind(material_id)
        .fetch_one(&self.db)
        .await?;

        if !exists {
            return Err(AppError::MaterialNotFound(material_id));
        }

        let movements = sqlx::query_as::<_, InventoryMovement>(
            r#"
            SELECT id, material_id, movement_type, quantity, stock_before, stock_after,
                   reason, reference_id, occurred_at
            FROM inventory_movements
            WHERE material_id = $1
            ORDER BY occurred_at ASC
            "#,
        )
        .bind(material_id)
        .fetch_all(&self.db)
        .await?;

        Ok(movements)
    }
}
