//! Material catalog service
//!
//! CRUD for raw materials. Stock never changes by direct column writes: any
//! difference requested through create/update is routed through the inventory
//! ledger inside the same transaction, and stock increases are recorded in
//! the purchase history.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::inventory::{ApplyMovementInput, InventoryService};
use shared::models::{Material, MaterialPurchase, MovementType};
use shared::validation;

/// Material service
#[derive(Clone)]
pub struct MaterialService {
    db: PgPool,
}

/// Input for creating or updating a material
#[derive(Debug, Deserialize)]
pub struct MaterialInput {
    pub name: String,
    pub unit_price: Decimal,
    pub unit_of_measure: String,
    pub stock_available: Option<Decimal>,
    pub supplier: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Input for recording a material purchase
#[derive(Debug, Deserialize)]
pub struct PurchaseInput {
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub supplier: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

const MATERIAL_COLUMNS: &str = "id, name, unit_price, unit_of_measure, stock_available, \
                                supplier, purchase_date, notes, created_at, updated_at";

impl MaterialService {
    /// Create a new MaterialService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    fn validate(input: &MaterialInput) -> AppResult<()> {
        validation::validate_name(&input.name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
            message_es: "El nombre no puede estar vacío".to_string(),
        })?;
        validation::validate_amount(input.unit_price).map_err(|msg| AppError::Validation {
            field: "unit_price".to_string(),
            message: msg.to_string(),
            message_es: "El precio unitario no puede ser negativo".to_string(),
        })?;
        if let Some(stock) = input.stock_available {
            if stock < Decimal::ZERO {
                return Err(AppError::Validation {
                    field: "stock_available".to_string(),
                    message: "Stock cannot be negative".to_string(),
                    message_es: "El stock no puede ser negativo".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Create a material; initial stock enters through the ledger
    pub async fn create(&self, input: MaterialInput) -> AppResult<Material> {
        Self::validate(&input)?;

        let mut tx = self.db.begin().await?;

        let material_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO materials (name, unit_price, unit_of_measure, stock_available,
                                   supplier, purchase_date, notes)
            VALUES ($1, $2, $3, 0, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(&input.name)
        .bind(input.unit_price)
        .bind(&input.unit_of_measure)
        .bind(&input.supplier)
        .bind(input.purchase_date)
        .bind(&input.notes)
        .fetch_one(&mut *tx)
        .await?;

        let initial_stock = input.stock_available.unwrap_or(Decimal::ZERO);
        if initial_stock > Decimal::ZERO {
            InventoryService::apply_movement_in_tx(
                &mut tx,
                &ApplyMovementInput {
                    material_id,
                    movement_type: MovementType::Entrada,
                    quantity: initial_stock,
                    reason: Some("Stock inicial del material".to_string()),
                    reference_id: None,
                },
            )
            .await?;

            Self::insert_purchase_in_tx(
                &mut tx,
                material_id,
                initial_stock,
                input.unit_price,
                input.supplier.as_deref(),
                input.purchase_date.unwrap_or_else(|| Utc::now().date_naive()),
                None,
            )
            .await?;
        }

        let material = Self::fetch_in_tx(&mut tx, material_id).await?;
        tx.commit().await?;

        Ok(material)
    }

    /// Update a material; stock differences go through the ledger, increases
    /// also land in the purchase history
    pub async fn update(&self, material_id: Uuid, input: MaterialInput) -> AppResult<Material> {
        Self::validate(&input)?;

        let mut tx = self.db.begin().await?;

        let current_stock = sqlx::query_scalar::<_, Decimal>(
            "SELECT stock_available FROM materials WHERE id = $1 FOR UPDATE",
        )
        .bind(material_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(AppError::MaterialNotFound(material_id))?;

        sqlx::query(
            r#"
            UPDATE materials
            SET name = $1, unit_price = $2, unit_of_measure = $3, supplier = $4,
                purchase_date = $5, notes = $6, updated_at = NOW()
            WHERE id = $7
            "#,
        )
        .bind(&input.name)
        .bind(input.unit_price)
        .bind(&input.unit_of_measure)
        .bind(&input.supplier)
        .bind(input.purchase_date)
        .bind(&input.notes)
        .bind(material_id)
        .execute(&mut *tx)
        .await?;

        if let Some(target_stock) = input.stock_available {
            let difference = target_stock - current_stock;
            if difference > Decimal::ZERO {
                InventoryService::apply_movement_in_tx(
                    &mut tx,
                    &ApplyMovementInput {
                        material_id,
                        movement_type: MovementType::Entrada,
                        quantity: difference,
                        reason: Some("Compra de material (incremento de stock)".to_string()),
                        reference_id: None,
                    },
                )
                .await?;

                Self::insert_purchase_in_tx(
                    &mut tx,
                    material_id,
                    difference,
                    input.unit_price,
                    input.supplier.as_deref(),
                    input.purchase_date.unwrap_or_else(|| Utc::now().date_naive()),
                    Some(&format!(
                        "Compra adicional - Stock actualizado de {} a {} {}",
                        current_stock, target_stock, input.unit_of_measure
                    )),
                )
                .await?;
            } else if difference < Decimal::ZERO {
                InventoryService::apply_movement_in_tx(
                    &mut tx,
                    &ApplyMovementInput {
                        material_id,
                        movement_type: MovementType::Salida,
                        quantity: -difference,
                        reason: Some("Ajuste de stock (reducción)".to_string()),
                        reference_id: None,
                    },
                )
                .await?;
            }
        }

        let material = Self::fetch_in_tx(&mut tx, material_id).await?;
        tx.commit().await?;

        Ok(material)
    }

    /// Record a purchase: stock entry plus history row, atomically
    pub async fn record_purchase(
        &self,
        material_id: Uuid,
        input: PurchaseInput,
    ) -> AppResult<MaterialPurchase> {
        if input.quantity <= Decimal::ZERO {
            return Err(AppError::InvalidQuantity {
                quantity: input.quantity,
            });
        }
        validation::validate_amount(input.unit_price).map_err(|msg| AppError::Validation {
            field: "unit_price".to_string(),
            message: msg.to_string(),
            message_es: "El precio unitario no puede ser negativo".to_string(),
        })?;

        let mut tx = self.db.begin().await?;

        InventoryService::apply_movement_in_tx(
            &mut tx,
            &ApplyMovementInput {
                material_id,
                movement_type: MovementType::Entrada,
                quantity: input.quantity,
                reason: Some("Compra de material".to_string()),
                reference_id: None,
            },
        )
        .await?;

        let purchase = Self::insert_purchase_in_tx(
            &mut tx,
            material_id,
            input.quantity,
            input.unit_price,
            input.supplier.as_deref(),
            input.purchase_date.unwrap_or_else(|| Utc::now().date_naive()),
            input.notes.as_deref(),
        )
        .await?;

        tx.commit().await?;

        Ok(purchase)
    }

    async fn insert_purchase_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        material_id: Uuid,
        quantity: Decimal,
        unit_price: Decimal,
        supplier: Option<&str>,
        purchase_date: NaiveDate,
        notes: Option<&str>,
    ) -> AppResult<MaterialPurchase> {
        let purchase = sqlx::query_as::<_, MaterialPurchase>(
            r#"
            INSERT INTO material_purchases (material_id, quantity, unit_price, total,
                                            supplier, purchase_date, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, material_id, quantity, unit_price, total, supplier, purchase_date,
                      notes, created_at
            "#,
        )
        .bind(material_id)
        .bind(quantity)
        .bind(unit_price)
        .bind(quantity * unit_price)
        .bind(supplier)
        .bind(purchase_date)
        .bind(notes)
        .fetch_one(&mut **tx)
        .await?;

        Ok(purchase)
    }

    async fn fetch_in_tx(
        tx: &mut Transaction<'_, Postgres>,
        material_id: Uuid,
    ) -> AppResult<Material> {
        let material = sqlx::query_as::<_, Material>(&format!(
            "SELECT {MATERIAL_COLUMNS} FROM materials WHERE id = $1"
        ))
        .bind(material_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or(AppError::MaterialNotFound(material_id))?;

        Ok(material)
    }

    /// Delete a material
    ///
    /// Movement history is kept (audit trail); product links referencing the
    /// material become dangling and cost zero until relinked.
    pub async fn delete(&self, material_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM materials WHERE id = $1")
            .bind(material_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::MaterialNotFound(material_id));
        }

        Ok(())
    }

    /// Get a material by id
    pub async fn get(&self, material_id: Uuid) -> AppResult<Material> {
        let material = sqlx::query_as::<_, Material>(&format!(
            "SELECT {MATERIAL_COLUMNS} FROM materials WHERE id = $1"
        ))
        .bind(material_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::MaterialNotFound(material_id))?;

        Ok(material)
    }

    /// List materials alphabetically
    pub async fn list(&self) -> AppResult<Vec<Material>> {
        let materials = sqlx::query_as::<_, Material>(&format!(
            "SELECT {MATERIAL_COLUMNS} FROM materials ORDER BY name ASC"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(materials)
    }

    /// Materials below the low-stock threshold
    pub async fn low_stock(&self) -> AppResult<Vec<Material>> {
        let materials = sqlx::query_as::<_, Material>(&format!(
            r#"
            SELECT {MATERIAL_COLUMNS}
            FROM materials
            WHERE stock_available < $1
            ORDER BY stock_available ASC
            "#
        ))
        .bind(Material::LOW_STOCK_THRESHOLD)
        .fetch_all(&self.db)
        .await?;

        Ok(materials)
    }

    /// Purchase history of a material, newest first
    pub async fn purchases(&self, material_id: Uuid) -> AppResult<Vec<MaterialPurchase>> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM materials WHERE id = $1)",
        )
        .bind(material_id)
        .fetch_one(&self.db)
        .await?;
        if !exists {
            return Err(AppError::MaterialNotFound(material_id));
        }

        let purchases = sqlx::query_as::<_, MaterialPurchase>(
            r#"
            SELECT id, material_id, quantity, unit_price, total, supplier, purchase_date,
                   notes, created_at
            FROM material_purchases
            WHERE material_id = $1
            ORDER BY purchase_date DESC, created_at DESC
            "#,
        )
        .bind(material_id)
        .fetch_all(&self.db)
        .await?;

        Ok(purchases)
    }
}
