//! Sales service
//!
//! Creating a sale snapshots the product's current production cost and
//! per-unit profit, enforces total = unit price * quantity, and drains the
//! product's materials from stock best effort.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::inventory::{InventoryService, MaterialDeduction};
use crate::services::product::ProductService;
use shared::finance::unit_profit;
use shared::models::{PaymentMethod, Sale, SaleStatus};
use shared::types::DateRange;
use shared::validation;

/// Sales service
#[derive(Clone)]
pub struct SaleService {
    db: PgPool,
}

/// Input for recording a sale
#[derive(Debug, Deserialize)]
pub struct CreateSaleInput {
    pub product_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub sale_date: Option<NaiveDate>,
    pub payment_method: Option<PaymentMethod>,
    pub status: Option<SaleStatus>,
    pub notes: Option<String>,
}

/// Input for editing a sale record
///
/// Cost/profit snapshots are not recomputed on edit; they belong to the
/// moment the sale was made.
#[derive(Debug, Deserialize)]
pub struct UpdateSaleInput {
    pub customer_id: Option<Uuid>,
    pub quantity: i32,
    pub unit_price: Decimal,
    pub sale_date: NaiveDate,
    pub payment_method: PaymentMethod,
    pub status: SaleStatus,
    pub notes: Option<String>,
}

/// Listing filter
#[derive(Debug, Default, Deserialize)]
pub struct SaleFilter {
    pub status: Option<SaleStatus>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl SaleFilter {
    fn range(&self) -> DateRange {
        DateRange {
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

/// A created sale together with the stock deductions it caused
#[derive(Debug, Serialize)]
pub struct SaleReceipt {
    pub sale: Sale,
    pub deductions: Vec<MaterialDeduction>,
}

const SALE_COLUMNS: &str = "id, product_id, customer_id, quantity, unit_price, total_price, \
                            production_cost, profit, sale_date, payment_method, status, notes, \
                            created_at, updated_at";

impl SaleService {
    /// Create a new SaleService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    fn validate(quantity: i32, unit_price: Decimal) -> AppResult<()> {
        validation::validate_quantity(quantity).map_err(|msg| AppError::Validation {
            field: "quantity".to_string(),
            message: msg.to_string(),
            message_es: "La cantidad debe ser mayor que cero".to_string(),
        })?;
        validation::validate_amount(unit_price).map_err(|msg| AppError::Validation {
            field: "unit_price".to_string(),
            message: msg.to_string(),
            message_es: "El precio unitario no puede ser negativo".to_string(),
        })?;
        Ok(())
    }

    /// Record a sale, snapshotting the current production cost
    pub async fn create(&self, input: CreateSaleInput) -> AppResult<SaleReceipt> {
        Self::validate(input.quantity, input.unit_price)?;

        // Snapshot cost/profit from the product's current bill of materials
        let production_cost = match input.product_id {
            Some(product_id) => Some(
                ProductService::new(self.db.clone())
                    .production_cost(product_id)
                    .await?,
            ),
            None => None,
        };
        let profit = production_cost.map(|cost| unit_profit(input.unit_price, cost));

        let total_price = input.unit_price * Decimal::from(input.quantity);
        let sale_date = input
            .sale_date
            .unwrap_or_else(|| Utc::now().date_naive());
        let status = input.status.unwrap_or(SaleStatus::Pendiente);

        let sale = sqlx::query_as::<_, Sale>(&format!(
            r#"
            INSERT INTO sales (
                product_id, customer_id, quantity, unit_price, total_price,
                production_cost, profit, sale_date, payment_method, status, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            RETURNING {SALE_COLUMNS}
            "#
        ))
        .bind(input.product_id)
        .bind(input.customer_id)
        .bind(input.quantity)
        .bind(input.unit_price)
        .bind(total_price)
        .bind(production_cost)
        .bind(profit)
        .bind(sale_date)
        .bind(input.payment_method.unwrap_or_default())
        .bind(status)
        .bind(&input.notes)
        .fetch_one(&self.db)
        .await?;

        // Drain materials for the sold units; failures are reported, not fatal
        let deductions = match (input.product_id, status) {
            (Some(product_id), status) if status.counts_for_finance() => {
                InventoryService::new(self.db.clone())
                    .drain_for_sale(
                        product_id,
                        input.quantity,
                        sale.id,
                        &format!("Venta de producto ({} unidades)", input.quantity),
                    )
                    .await?
            }
            _ => Vec::new(),
        };

        Ok(SaleReceipt { sale, deductions })
    }

    /// Edit a sale record
    pub async fn update(&self, sale_id: Uuid, input: UpdateSaleInput) -> AppResult<Sale> {
        Self::validate(input.quantity, input.unit_price)?;

        let total_price = input.unit_price * Decimal::from(input.quantity);

        let sale = sqlx::query_as::<_, Sale>(&format!(
            r#"
            UPDATE sales
            SET customer_id = $1, quantity = $2, unit_price = $3, total_price = $4,
                sale_date = $5, payment_method = $6, status = $7, notes = $8, updated_at = NOW()
            WHERE id = $9
            RETURNING {SALE_COLUMNS}
            "#
        ))
        .bind(input.customer_id)
        .bind(input.quantity)
        .bind(input.unit_price)
        .bind(total_price)
        .bind(input.sale_date)
        .bind(input.payment_method)
        .bind(input.status)
        .bind(&input.notes)
        .bind(sale_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Sale".to_string()))?;

        Ok(sale)
    }

    /// Update just the status of a sale
    pub async fn update_status(&self, sale_id: Uuid, status: SaleStatus) -> AppResult<Sale> {
        let sale = sqlx::query_as::<_, Sale>(&format!(
            "UPDATE sales SET status = $1, updated_at = NOW() WHERE id = $2 RETURNING {SALE_COLUMNS}"
        ))
        .bind(status)
        .bind(sale_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Sale".to_string()))?;

        Ok(sale)
    }

    /// Delete a sale record
    pub async fn delete(&self, sale_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM sales WHERE id = $1")
            .bind(sale_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Sale".to_string()));
        }

        Ok(())
    }

    /// Get a sale by id
    pub async fn get(&self, sale_id: Uuid) -> AppResult<Sale> {
        let sale = sqlx::query_as::<_, Sale>(&format!(
            "SELECT {SALE_COLUMNS} FROM sales WHERE id = $1"
        ))
        .bind(sale_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Sale".to_string()))?;

        Ok(sale)
    }

    /// List sales, newest first
    pub async fn list(&self, filter: &SaleFilter) -> AppResult<Vec<Sale>> {
        let (start, end) = filter.range().bounds();

        let sales = sqlx::query_as::<_, Sale>(&format!(
            r#"
            SELECT {SALE_COLUMNS}
            FROM sales
            WHERE ($1::sale_status IS NULL OR status = $1)
              AND sale_date BETWEEN $2 AND $3
            ORDER BY sale_date DESC, created_at DESC
            "#
        ))
        .bind(filter.status)
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await?;

        Ok(sales)
    }
}
