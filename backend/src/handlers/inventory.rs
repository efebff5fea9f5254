//! HTTP handlers for inventory ledger endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::inventory::{ApplyMovementInput, InventoryService, MovementFilter};
use crate::AppState;
use shared::models::{InventoryMovement, StockChange};

/// Apply a stock movement
pub async fn apply_movement(
    State(state): State<AppState>,
    Json(input): Json<ApplyMovementInput>,
) -> AppResult<Json<StockChange>> {
    let service = InventoryService::new(state.db);
    let change = service.apply_movement(&input).await?;
    Ok(Json(change))
}

/// List movements, newest first
pub async fn list_movements(
    State(state): State<AppState>,
    Query(filter): Query<MovementFilter>,
) -> AppResult<Json<Vec<InventoryMovement>>> {
    let service = InventoryService::new(state.db);
    let movements = service.list_movements(&filter).await?;
    Ok(Json(movements))
}

/// Movement history of one material, oldest first
pub async fn get_material_history(
    State(state): State<AppState>,
    Path(material_id): Path<Uuid>,
) -> AppResult<Json<Vec<InventoryMovement>>> {
    let service = InventoryService::new(state.db);
    let movements = service.material_history(material_id).await?;
    Ok(Json(movements))
}
