//! Sale models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Lifecycle status of a sale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "sale_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SaleStatus {
    Pendiente,
    Completado,
    Entregado,
    Cancelado,
}

impl SaleStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaleStatus::Pendiente => "pendiente",
            SaleStatus::Completado => "completado",
            SaleStatus::Entregado => "entregado",
            SaleStatus::Cancelado => "cancelado",
        }
    }

    /// Cancelled sales are excluded from every financial aggregate
    pub fn counts_for_finance(&self) -> bool {
        !matches!(self, SaleStatus::Cancelado)
    }
}

/// How a sale was paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "payment_method", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Efectivo,
    Tarjeta,
    Transferencia,
    Otro,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Efectivo => "efectivo",
            PaymentMethod::Tarjeta => "tarjeta",
            PaymentMethod::Transferencia => "transferencia",
            PaymentMethod::Otro => "otro",
        }
    }
}

/// A sale record
///
/// `production_cost` and `profit` are per-unit snapshots taken when the sale
/// is written; later material price edits never change them.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Sale {
    pub id: Uuid,
    pub product_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,
    pub quantity: i32,
    pub unit_price: Decimal,
    /// Always unit_price * quantity, enforced at write time
    pub total_price: Decimal,
    pub production_cost: Option<Decimal>,
    pub profit: Option<Decimal>,
    pub sale_date: NaiveDate,
    pub payment_method: PaymentMethod,
    pub status: SaleStatus,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Sale {
    /// Quantity-weighted production cost snapshot of this sale
    pub fn production_cost_total(&self) -> Decimal {
        self.production_cost.unwrap_or(Decimal::ZERO) * Decimal::from(self.quantity)
    }
}
