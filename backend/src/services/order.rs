//! Order fulfillment service
//!
//! Pending orders walk a linear lifecycle and spawn a sale plus stock
//! deductions when delivered. Delivery is the only transition with side
//! effects; every other status change is a plain update.

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::inventory::{InventoryService, MaterialDeduction};
use crate::services::product::ProductService;
use shared::finance::unit_profit;
use shared::models::{Order, OrderStatus, PaymentMethod, Sale, SaleStatus};
use shared::validation;

/// Order fulfillment service
#[derive(Clone)]
pub struct OrderService {
    db: PgPool,
}

/// Input for creating or editing an order
#[derive(Debug, Deserialize)]
pub struct OrderInput {
    pub product_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,
    pub quantity: i32,
    pub order_date: Option<NaiveDate>,
    pub estimated_delivery: Option<NaiveDate>,
    pub agreed_price: Option<Decimal>,
    pub advance_payment: Option<Decimal>,
    pub notes: Option<String>,
}

/// Result of a status transition
///
/// `sale` and `deductions` are only populated by the delivery transition.
#[derive(Debug, Serialize)]
pub struct TransitionOutcome {
    pub order: Order,
    pub sale: Option<Sale>,
    pub deductions: Vec<MaterialDeduction>,
}

const ORDER_COLUMNS: &str = "id, product_id, customer_id, quantity, order_date, \
                             estimated_delivery, status, agreed_price, advance_payment, notes, \
                             created_at, updated_at";

const SALE_COLUMNS: &str = "id, product_id, customer_id, quantity, unit_price, total_price, \
                            production_cost, profit, sale_date, payment_method, status, notes, \
                            created_at, updated_at";

impl OrderService {
    /// Create a new OrderService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    fn validate(input: &OrderInput) -> AppResult<()> {
        validation::validate_quantity(input.quantity).map_err(|msg| AppError::Validation {
            field: "quantity".to_string(),
            message: msg.to_string(),
            message_es: "La cantidad debe ser mayor que cero".to_string(),
        })?;
        if let Some(agreed) = input.agreed_price {
            validation::validate_amount(agreed).map_err(|msg| AppError::Validation {
                field: "agreed_price".to_string(),
                message: msg.to_string(),
                message_es: "El precio acordado no puede ser negativo".to_string(),
            })?;
        }
        let advance = input.advance_payment.unwrap_or(Decimal::ZERO);
        validation::validate_advance_payment(advance, input.agreed_price).map_err(|msg| {
            AppError::Validation {
                field: "advance_payment".to_string(),
                message: msg.to_string(),
                message_es: "El anticipo no puede superar el precio acordado".to_string(),
            }
        })?;
        Ok(())
    }

    /// Create a pending order
    pub async fn create(&self, input: OrderInput) -> AppResult<Order> {
        Self::validate(&input)?;

        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            INSERT INTO orders (
                product_id, customer_id, quantity, order_date, estimated_delivery,
                agreed_price, advance_payment, notes
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(input.product_id)
        .bind(input.customer_id)
        .bind(input.quantity)
        .bind(input.order_date.unwrap_or_else(|| Utc::now().date_naive()))
        .bind(input.estimated_delivery)
        .bind(input.agreed_price)
        .bind(input.advance_payment.unwrap_or(Decimal::ZERO))
        .bind(&input.notes)
        .fetch_one(&self.db)
        .await?;

        Ok(order)
    }

    /// Edit an order's commercial fields; the status is driven by
    /// `transition`
    pub async fn update(&self, order_id: Uuid, input: OrderInput) -> AppResult<Order> {
        Self::validate(&input)?;

        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            UPDATE orders
            SET product_id = $1, customer_id = $2, quantity = $3, order_date = COALESCE($4, order_date),
                estimated_delivery = $5, agreed_price = $6, advance_payment = $7, notes = $8,
                updated_at = NOW()
            WHERE id = $9
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(input.product_id)
        .bind(input.customer_id)
        .bind(input.quantity)
        .bind(input.order_date)
        .bind(input.estimated_delivery)
        .bind(input.agreed_price)
        .bind(input.advance_payment.unwrap_or(Decimal::ZERO))
        .bind(&input.notes)
        .bind(order_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::OrderNotFound(order_id))?;

        Ok(order)
    }

    /// Move an order to a new status
    ///
    /// Transitions to anything but `entregado` are pure status updates.
    /// Delivery creates the sale first, then drains materials best effort,
    /// then persists the final status: a stock shortfall on one material is
    /// reported but never blocks a completed sale.
    pub async fn transition(
        &self,
        order_id: Uuid,
        new_status: OrderStatus,
    ) -> AppResult<TransitionOutcome> {
        let order = self.get(order_id).await?;

        if order.status.is_terminal() {
            return Err(AppError::AlreadyDelivered(order_id));
        }

        if new_status != OrderStatus::Entregado {
            let order = self.set_status(order_id, new_status).await?;
            return Ok(TransitionOutcome {
                order,
                sale: None,
                deductions: Vec::new(),
            });
        }

        self.deliver(order).await
    }

    /// The delivery transition: spawn the sale, drain materials, close the
    /// order
    async fn deliver(&self, order: Order) -> AppResult<TransitionOutcome> {
        let product_id = order.product_id.ok_or(AppError::MissingProduct(order.id))?;

        let agreed_price = order.agreed_price.unwrap_or(Decimal::ZERO);
        let unit_price = agreed_price / Decimal::from(order.quantity);
        let production_cost = ProductService::new(self.db.clone())
            .production_cost(product_id)
            .await?;
        let profit = unit_profit(unit_price, production_cost);

        let order_id_hex = order.id.to_string();
        let order_ref = &order_id_hex[..8];
        let notes = match &order.notes {
            Some(existing) => format!("Venta generada desde orden #{}. {}", order_ref, existing),
            None => format!("Venta generada desde orden #{}", order_ref),
        };

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
        .bind(product_id)
        .bind(order.customer_id)
        .bind(order.quantity)
        .bind(unit_price)
        .bind(agreed_price)
        .bind(production_cost)
        .bind(profit)
        .bind(Utc::now().date_naive())
        .bind(PaymentMethod::Efectivo)
        .bind(SaleStatus::Entregado)
        .bind(&notes)
        .fetch_one(&self.db)
        .await?;

        let deductions = InventoryService::new(self.db.clone())
            .drain_for_sale(
                product_id,
                order.quantity,
                sale.id,
                &format!(
                    "Orden entregada - Venta de producto ({} unidades)",
                    order.quantity
                ),
            )
            .await?;

        let order = self.set_status(order.id, OrderStatus::Entregado).await?;

        tracing::info!(
            order_id = %order.id,
            sale_id = %sale.id,
            failed_deductions = deductions
                .iter()
                .filter(|d| matches!(d.outcome, crate::services::inventory::DeductionOutcome::Failed { .. }))
                .count(),
            "order delivered"
        );

        Ok(TransitionOutcome {
            order,
            sale: Some(sale),
            deductions,
        })
    }

    async fn set_status(&self, order_id: Uuid, status: OrderStatus) -> AppResult<Order> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "UPDATE orders SET status = $1, updated_at = NOW() WHERE id = $2 RETURNING {ORDER_COLUMNS}"
        ))
        .bind(status)
        .bind(order_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::OrderNotFound(order_id))?;

        Ok(order)
    }

    /// Register the remaining balance as paid
    pub async fn settle_payment(&self, order_id: Uuid) -> AppResult<Order> {
        let order = self.get(order_id).await?;

        if order.balance_due() <= Decimal::ZERO {
            return Err(AppError::Validation {
                field: "advance_payment".to_string(),
                message: "Order is already fully paid".to_string(),
                message_es: "Esta orden ya está completamente pagada".to_string(),
            });
        }

        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            UPDATE orders
            SET advance_payment = agreed_price, updated_at = NOW()
            WHERE id = $1
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(order_id)
        .fetch_one(&self.db)
        .await?;

        Ok(order)
    }

    /// Delete an order (allowed from any state)
    pub async fn delete(&self, order_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM orders WHERE id = $1")
            .bind(order_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::OrderNotFound(order_id));
        }

        Ok(())
    }

    /// Get an order by id
    pub async fn get(&self, order_id: Uuid) -> AppResult<Order> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE id = $1"
        ))
        .bind(order_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::OrderNotFound(order_id))?;

        Ok(order)
    }

    /// List orders, optionally by status, newest first
    pub async fn list(&self, status: Option<OrderStatus>) -> AppResult<Vec<Order>> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            r#"
            SELECT {ORDER_COLUMNS}
            FROM orders
            WHERE $1::order_status IS NULL OR status = $1
            ORDER BY order_date DESC, created_at DESC
            "#
        ))
        .bind(status)
        .fetch_all(&self.db)
        .await?;

        Ok(orders)
    }

    /// Undelivered orders whose estimated delivery falls within the next
    /// `days` days (or is already overdue); feeds the reminder surface
    pub async fn upcoming_deliveries(&self, days: i64) -> AppResult<Vec<Order>> {
        let today = Utc::now().date_naive();
        let horizon = today + chrono::Duration::days(days);

        let orders = sqlx::query_as::<_, Order>(&format!(
            r#"
            SELECT {ORDER_COLUMNS}
            FROM orders
            WHERE status <> 'entregado'
              AND estimated_delivery IS NOT NULL
              AND estimated_delivery <= $1
            ORDER BY estimated_delivery ASC
            "#
        ))
        .bind(horizon)
        .fetch_all(&self.db)
        .await?;

        Ok(orders)
    }
}
