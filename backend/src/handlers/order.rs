//! HTTP handlers for order fulfillment endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::order::{OrderInput, OrderService, TransitionOutcome};
use crate::AppState;
use shared::models::{Order, OrderStatus};

#[derive(Debug, Default, Deserialize)]
pub struct OrderListQuery {
    pub status: Option<OrderStatus>,
}

#[derive(Debug, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}

#[derive(Debug, Deserialize)]
pub struct UpcomingQuery {
    #[serde(default = "default_horizon_days")]
    pub days: i64,
}

fn default_horizon_days() -> i64 {
    3
}

/// Create an order
pub async fn create_order(
    State(state): State<AppState>,
    Json(input): Json<OrderInput>,
) -> AppResult<Json<Order>> {
    let service = OrderService::new(state.db);
    let order = service.create(input).await?;
    Ok(Json(order))
}

/// List orders
pub async fn list_orders(
    State(state): State<AppState>,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let service = OrderService::new(state.db);
    let orders = service.list(query.status).await?;
    Ok(Json(orders))
}

/// Undelivered orders due within the horizon
pub async fn list_upcoming_deliveries(
    State(state): State<AppState>,
    Query(query): Query<UpcomingQuery>,
) -> AppResult<Json<Vec<Order>>> {
    let service = OrderService::new(state.db);
    let orders = service.upcoming_deliveries(query.days).await?;
    Ok(Json(orders))
}

/// Get an order
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<Order>> {
    let service = OrderService::new(state.db);
    let order = service.get(order_id).await?;
    Ok(Json(order))
}

/// Edit an order
pub async fn update_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(input): Json<OrderInput>,
) -> AppResult<Json<Order>> {
    let service = OrderService::new(state.db);
    let order = service.update(order_id, input).await?;
    Ok(Json(order))
}

/// Move an order through its lifecycle; delivery spawns the sale and the
/// stock deductions
pub async fn transition_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(update): Json<OrderStatusUpdate>,
) -> AppResult<Json<TransitionOutcome>> {
    let service = OrderService::new(state.db);
    let outcome = service.transition(order_id, update.status).await?;
    Ok(Json(outcome))
}

/// Settle the outstanding balance of an order
pub async fn settle_order_payment(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<Order>> {
    let service = OrderService::new(state.db);
    let order = service.settle_payment(order_id).await?;
    Ok(Json(order))
}

/// Delete an order
pub async fn delete_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = OrderService::new(state.db);
    service.delete(order_id).await?;
    Ok(Json(()))
}
