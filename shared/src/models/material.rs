//! Raw material models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A raw material kept in stock
///
/// Stock is fractional (materials are measured in metres, grams, units, ...)
/// and is only ever changed through the inventory ledger.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Material {
    pub id: Uuid,
    pub name: String,
    pub unit_price: Decimal,
    pub unit_of_measure: String,
    pub stock_available: Decimal,
    pub supplier: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Material {
    /// Current valuation of the stock on hand
    pub fn stock_value(&self) -> Decimal {
        self.unit_price * self.stock_available
    }

    /// Stock below this threshold is reported as low
    pub const LOW_STOCK_THRESHOLD: Decimal = Decimal::from_parts(10, 0, 0, false, 0);

    pub fn is_low_stock(&self) -> bool {
        self.stock_available < Self::LOW_STOCK_THRESHOLD
    }
}

/// A recorded purchase of a material
///
/// Purchases feed the stock history; recording one also applies an `entrada`
/// movement through the inventory ledger.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct MaterialPurchase {
    pub id: Uuid,
    pub material_id: Uuid,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub total: Decimal,
    pub supplier: Option<String>,
    pub purchase_date: NaiveDate,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}
