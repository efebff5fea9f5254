//! HTTP handlers for sales endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::sale::{
    CreateSaleInput, SaleFilter, SaleReceipt, SaleService, UpdateSaleInput,
};
use crate::AppState;
use shared::models::{Sale, SaleStatus};

#[derive(Debug, Deserialize)]
pub struct SaleStatusUpdate {
    pub status: SaleStatus,
}

/// Record a sale
pub async fn create_sale(
    State(state): State<AppState>,
    Json(input): Json<CreateSaleInput>,
) -> AppResult<Json<SaleReceipt>> {
    let service = SaleService::new(state.db);
    let receipt = service.create(input).await?;
    Ok(Json(receipt))
}

/// List sales
pub async fn list_sales(
    State(state): State<AppState>,
    Query(filter): Query<SaleFilter>,
) -> AppResult<Json<Vec<Sale>>> {
    let service = SaleService::new(state.db);
    let sales = service.list(&filter).await?;
    Ok(Json(sales))
}

/// Get a sale
pub async fn get_sale(
    State(state): State<AppState>,
    Path(sale_id): Path<Uuid>,
) -> AppResult<Json<Sale>> {
    let service = SaleService::new(state.db);
    let sale = service.get(sale_id).await?;
    Ok(Json(sale))
}

/// Edit a sale
pub async fn update_sale(
    State(state): State<AppState>,
    Path(sale_id): Path<Uuid>,
    Json(input): Json<UpdateSaleInput>,
) -> AppResult<Json<Sale>> {
    let service = SaleService::new(state.db);
    let sale = service.update(sale_id, input).await?;
    Ok(Json(sale))
}

/// Update a sale's status
pub async fn update_sale_status(
    State(state): State<AppState>,
    Path(sale_id): Path<Uuid>,
    Json(update): Json<SaleStatusUpdate>,
) -> AppResult<Json<Sale>> {
    let service = SaleService::new(state.db);
    let sale = service.update_status(sale_id, update.status).await?;
    Ok(Json(sale))
}

/// Delete a sale
pub async fn delete_sale(
    State(state): State<AppState>,
    Path(sale_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = SaleService::new(state.db);
    service.delete(sale_id).await?;
    Ok(Json(()))
}
