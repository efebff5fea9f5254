//! Product catalog service
//!
//! CRUD for products plus bill-of-materials management and costing. Costs are
//! derived from current material prices on every call; past sales keep their
//! own snapshots.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::finance::{production_cost, CostBreakdown, CostComponent};
use shared::models::{Product, ProductMaterial};
use shared::validation;

/// Product service
#[derive(Clone)]
pub struct ProductService {
    db: PgPool,
}

/// Input for creating or updating a product
#[derive(Debug, Deserialize)]
pub struct ProductInput {
    pub name: String,
    pub category: String,
    pub description: Option<String>,
    pub sale_price: Decimal,
    pub elaboration_time: Option<i32>,
    pub photo_url: Option<String>,
    pub active: Option<bool>,
}

/// One bill-of-materials line in a replace-links request
#[derive(Debug, Deserialize)]
pub struct MaterialLinkInput {
    pub material_id: Uuid,
    pub quantity: Decimal,
}

/// A product with its material links resolved
#[derive(Debug, Serialize)]
pub struct ProductDetail {
    #[serde(flatten)]
    pub product: Product,
    pub materials: Vec<ProductMaterial>,
}

impl ProductService {
    /// Create a new ProductService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    fn validate(input: &ProductInput) -> AppResult<()> {
        validation::validate_name(&input.name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
            message_es: "El nombre no puede estar vacío".to_string(),
        })?;
        validation::validate_amount(input.sale_price).map_err(|msg| AppError::Validation {
            field: "sale_price".to_string(),
            message: msg.to_string(),
            message_es: "El precio de venta no puede ser negativo".to_string(),
        })?;
        Ok(())
    }

    /// Create a product
    pub async fn create(&self, input: ProductInput) -> AppResult<Product> {
        Self::validate(&input)?;

        let product = sqlx::query_as::<_, Product>(
            r#"
            INSERT INTO products (name, category, description, sale_price, elaboration_time, photo_url, active)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, category, description, sale_price, elaboration_time, photo_url,
                      active, created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.category)
        .bind(&input.description)
        .bind(input.sale_price)
        .bind(input.elaboration_time)
        .bind(&input.photo_url)
        .bind(input.active.unwrap_or(true))
        .fetch_one(&self.db)
        .await?;

        Ok(product)
    }

    /// Update a product
    pub async fn update(&self, product_id: Uuid, input: ProductInput) -> AppResult<Product> {
        Self::validate(&input)?;

        let product = sqlx::query_as::<_, Product>(
            r#"
            UPDATE products
            SET name = $1, category = $2, description = $3, sale_price = $4,
                elaboration_time = $5, photo_url = $6, active = $7, updated_at = NOW()
            WHERE id = $8
            RETURNING id, name, category, description, sale_price, elaboration_time, photo_url,
                      active, created_at, updated_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.category)
        .bind(&input.description)
        .bind(input.sale_price)
        .bind(input.elaboration_time)
        .bind(&input.photo_url)
        .bind(input.active.unwrap_or(true))
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        Ok(product)
    }

    /// Delete a product; its sales keep a null product reference
    pub async fn delete(&self, product_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(product_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Product".to_string()));
        }

        Ok(())
    }

    /// List products, optionally only active ones
    pub async fn list(&self, only_active: bool) -> AppResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, category, description, sale_price, elaboration_time, photo_url,
                   active, created_at, updated_at
            FROM products
            WHERE NOT $1 OR active
            ORDER BY name ASC
            "#,
        )
        .bind(only_active)
        .fetch_all(&self.db)
        .await?;

        Ok(products)
    }

    /// Get a product with its material links
    pub async fn get(&self, product_id: Uuid) -> AppResult<ProductDetail> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, category, description, sale_price, elaboration_time, photo_url,
                   active, created_at, updated_at
            FROM products
            WHERE id = $1
            "#,
        )
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        let materials = sqlx::query_as::<_, ProductMaterial>(
            r#"
            SELECT id, product_id, material_id, quantity, created_at
            FROM product_materials
            WHERE product_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.db)
        .await?;

        Ok(ProductDetail { product, materials })
    }

    /// Replace the product's bill of materials
    pub async fn set_materials(
        &self,
        product_id: Uuid,
        links: Vec<MaterialLinkInput>,
    ) -> AppResult<Vec<ProductMaterial>> {
        for link in &links {
            validation::validate_link_quantity(link.quantity).map_err(|msg| {
                AppError::Validation {
                    field: "quantity".to_string(),
                    message: msg.to_string(),
                    message_es: "La cantidad de material debe ser mayor que cero".to_string(),
                }
            })?;
        }

        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)",
        )
        .bind(product_id)
        .fetch_one(&self.db)
        .await?;
        if !exists {
            return Err(AppError::NotFound("Product".to_string()));
        }

        let mut tx = self.db.begin().await?;

        sqlx::query("DELETE FROM product_materials WHERE product_id = $1")
            .bind(product_id)
            .execute(&mut *tx)
            .await?;

        let mut saved = Vec::with_capacity(links.len());
        for link in &links {
            let row = sqlx::query_as::<_, ProductMaterial>(
                r#"
                INSERT INTO product_materials (product_id, material_id, quantity)
                VALUES ($1, $2, $3)
                RETURNING id, product_id, material_id, quantity, created_at
                "#,
            )
            .bind(product_id)
            .bind(link.material_id)
            .bind(link.quantity)
            .fetch_one(&mut *tx)
            .await?;
            saved.push(row);
        }

        tx.commit().await?;

        Ok(saved)
    }

    /// Resolve the product's material links against current material prices
    async fn cost_components(&self, product_id: Uuid) -> AppResult<Vec<CostComponent>> {
        let rows = sqlx::query_as::<_, (Uuid, Decimal, Option<String>, Option<Decimal>)>(
            r#"
            SELECT pm.material_id, pm.quantity, m.name, m.unit_price
            FROM product_materials pm
            LEFT JOIN materials m ON m.id = pm.material_id
            WHERE pm.product_id = $1
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.db)
        .await?;

        let components: Vec<CostComponent> = rows
            .into_iter()
            .map(|(material_id, quantity, name, unit_price)| {
                if unit_price.is_none() {
                    tracing::warn!(
                        %product_id,
                        %material_id,
                        "material link no longer resolves, counted as zero cost"
                    );
                }
                CostComponent {
                    material_id,
                    material_name: name,
                    unit_price,
                    quantity,
                }
            })
            .collect();

        Ok(components)
    }

    /// Current production cost of one unit of the product
    pub async fn production_cost(&self, product_id: Uuid) -> AppResult<Decimal> {
        let components = self.cost_components(product_id).await?;
        Ok(production_cost(&components))
    }

    /// Full cost/margin breakdown for the product
    pub async fn cost_breakdown(&self, product_id: Uuid) -> AppResult<CostBreakdown> {
        let product = sqlx::query_as::<_, (String, String, Decimal)>(
            "SELECT name, category, sale_price FROM products WHERE id = $1",
        )
        .bind(product_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        let components = self.cost_components(product_id).await?;
        let (name, category, sale_price) = product;

        Ok(CostBreakdown::from_components(
            product_id, name, category, sale_price, components,
        ))
    }
}
