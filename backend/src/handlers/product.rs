//! HTTP handlers for product management endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::product::{MaterialLinkInput, ProductDetail, ProductInput, ProductService};
use crate::AppState;
use shared::finance::CostBreakdown;
use shared::models::{Product, ProductMaterial};

#[derive(Debug, Default, Deserialize)]
pub struct ProductListQuery {
    #[serde(default)]
    pub only_active: bool,
}

/// Create a product
pub async fn create_product(
    State(state): State<AppState>,
    Json(input): Json<ProductInput>,
) -> AppResult<Json<Product>> {
    let service = ProductService::new(state.db);
    let product = service.create(input).await?;
    Ok(Json(product))
}

/// List products
pub async fn list_products(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> AppResult<Json<Vec<Product>>> {
    let service = ProductService::new(state.db);
    let products = service.list(query.only_active).await?;
    Ok(Json(products))
}

/// Get a product with its bill of materials
pub async fn get_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<ProductDetail>> {
    let service = ProductService::new(state.db);
    let product = service.get(product_id).await?;
    Ok(Json(product))
}

/// Update a product
pub async fn update_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Json(input): Json<ProductInput>,
) -> AppResult<Json<Product>> {
    let service = ProductService::new(state.db);
    let product = service.update(product_id, input).await?;
    Ok(Json(product))
}

/// Delete a product
pub async fn delete_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = ProductService::new(state.db);
    service.delete(product_id).await?;
    Ok(Json(()))
}

/// Replace the product's bill of materials
pub async fn set_product_materials(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
    Json(links): Json<Vec<MaterialLinkInput>>,
) -> AppResult<Json<Vec<ProductMaterial>>> {
    let service = ProductService::new(state.db);
    let saved = service.set_materials(product_id, links).await?;
    Ok(Json(saved))
}

/// Cost and margin breakdown of a product
pub async fn get_product_cost(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<CostBreakdown>> {
    let service = ProductService::new(state.db);
    let breakdown = service.cost_breakdown(product_id).await?;
    Ok(Json(breakdown))
}
