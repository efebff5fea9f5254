//! HTTP handlers for expense endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::expense::{ExpenseInput, ExpenseService};
use crate::AppState;
use shared::models::{Expense, ExpenseCategory};
use shared::types::DateRange;

#[derive(Debug, Default, Deserialize)]
pub struct ExpenseListQuery {
    pub category: Option<ExpenseCategory>,
    pub start_date: Option<chrono::NaiveDate>,
    pub end_date: Option<chrono::NaiveDate>,
}

impl ExpenseListQuery {
    fn range(&self) -> DateRange {
        DateRange {
            start_date: self.start_date,
            end_date: self.end_date,
        }
    }
}

/// Create an expense
pub async fn create_expense(
    State(state): State<AppState>,
    Json(input): Json<ExpenseInput>,
) -> AppResult<Json<Expense>> {
    let service = ExpenseService::new(state.db);
    let expense = service.create(input).await?;
    Ok(Json(expense))
}

/// List expenses
pub async fn list_expenses(
    State(state): State<AppState>,
    Query(query): Query<ExpenseListQuery>,
) -> AppResult<Json<Vec<Expense>>> {
    let service = ExpenseService::new(state.db);
    let expenses = service.list(query.category, &query.range()).await?;
    Ok(Json(expenses))
}

/// Get an expense
pub async fn get_expense(
    State(state): State<AppState>,
    Path(expense_id): Path<Uuid>,
) -> AppResult<Json<Expense>> {
    let service = ExpenseService::new(state.db);
    let expense = service.get(expense_id).await?;
    Ok(Json(expense))
}

/// Update an expense
pub async fn update_expense(
    State(state): State<AppState>,
    Path(expense_id): Path<Uuid>,
    Json(input): Json<ExpenseInput>,
) -> AppResult<Json<Expense>> {
    let service = ExpenseService::new(state.db);
    let expense = service.update(expense_id, input).await?;
    Ok(Json(expense))
}

/// Delete an expense
pub async fn delete_expense(
    State(state): State<AppState>,
    Path(expense_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = ExpenseService::new(state.db);
    service.delete(expense_id).await?;
    Ok(Json(()))
}
