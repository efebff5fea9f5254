//! Product and bill-of-materials models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A sellable product
///
/// Production cost is never stored on the product; it is derived from the
/// material links and current material prices every time it is needed.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub sale_price: Decimal,
    /// Minutes of work to produce one unit
    pub elaboration_time: Option<i32>,
    pub photo_url: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Link between a product and one of the materials it consumes
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProductMaterial {
    pub id: Uuid,
    pub product_id: Uuid,
    pub material_id: Uuid,
    /// Quantity of the material consumed per product unit
    pub quantity: Decimal,
    pub created_at: DateTime<Utc>,
}
