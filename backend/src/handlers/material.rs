//! HTTP handlers for material management endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::material::{MaterialInput, MaterialService, PurchaseInput};
use crate::AppState;
use shared::models::{Material, MaterialPurchase};

/// Create a material
pub async fn create_material(
    State(state): State<AppState>,
    Json(input): Json<MaterialInput>,
) -> AppResult<Json<Material>> {
    let service = MaterialService::new(state.db);
    let material = service.create(input).await?;
    Ok(Json(material))
}

/// List materials
pub async fn list_materials(State(state): State<AppState>) -> AppResult<Json<Vec<Material>>> {
    let service = MaterialService::new(state.db);
    let materials = service.list().await?;
    Ok(Json(materials))
}

/// Materials under the low-stock threshold
pub async fn list_low_stock_materials(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<Material>>> {
    let service = MaterialService::new(state.db);
    let materials = service.low_stock().await?;
    Ok(Json(materials))
}

/// Get a material
pub async fn get_material(
    State(state): State<AppState>,
    Path(material_id): Path<Uuid>,
) -> AppResult<Json<Material>> {
    let service = MaterialService::new(state.db);
    let material = service.get(material_id).await?;
    Ok(Json(material))
}

/// Update a material
pub async fn update_material(
    State(state): State<AppState>,
    Path(material_id): Path<Uuid>,
    Json(input): Json<MaterialInput>,
) -> AppResult<Json<Material>> {
    let service = MaterialService::new(state.db);
    let material = service.update(material_id, input).await?;
    Ok(Json(material))
}

/// Delete a material
pub async fn delete_material(
    State(state): State<AppState>,
    Path(material_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = MaterialService::new(state.db);
    service.delete(material_id).await?;
    Ok(Json(()))
}

/// Record a purchase of a material
pub async fn record_material_purchase(
    State(state): State<AppState>,
    Path(material_id): Path<Uuid>,
    Json(input): Json<PurchaseInput>,
) -> AppResult<Json<MaterialPurchase>> {
    let service = MaterialService::new(state.db);
    let purchase = service.record_purchase(material_id, input).await?;
    Ok(Json(purchase))
}

/// Purchase history of a material
pub async fn list_material_purchases(
    State(state): State<AppState>,
    Path(material_id): Path<Uuid>,
) -> AppResult<Json<Vec<MaterialPurchase>>> {
    let service = MaterialService::new(state.db);
    let purchases = service.purchases(material_id).await?;
    Ok(Json(purchases))
}
