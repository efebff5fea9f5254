//! HTTP handlers for reporting and financial analysis endpoints

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    Json,
};

use crate::error::AppResult;
use crate::services::reporting::{DashboardMetrics, FinancialStatement, ReportingService};
use crate::AppState;
use shared::finance::OperatingCosts;
use shared::types::DateRange;

/// Headline metrics for the dashboard
pub async fn get_dashboard_metrics(
    State(state): State<AppState>,
) -> AppResult<Json<DashboardMetrics>> {
    let service = ReportingService::new(state.db);
    let metrics = service.dashboard_metrics().await?;
    Ok(Json(metrics))
}

/// Operating-cost breakdown for a period
pub async fn get_operating_costs(
    State(state): State<AppState>,
    Query(range): Query<DateRange>,
) -> AppResult<Json<OperatingCosts>> {
    let service = ReportingService::new(state.db);
    let costs = service.operating_costs(&range).await?;
    Ok(Json(costs))
}

/// Full financial statement: analysis, costs, health and product ranking
pub async fn get_financial_statement(
    State(state): State<AppState>,
    Query(range): Query<DateRange>,
) -> AppResult<Json<FinancialStatement>> {
    let service = ReportingService::new(state.db);
    let statement = service.financial_statement(&range).await?;
    Ok(Json(statement))
}

/// Sales report as CSV
pub async fn export_sales_report(
    State(state): State<AppState>,
    Query(range): Query<DateRange>,
) -> AppResult<impl IntoResponse> {
    let service = ReportingService::new(state.db);
    let csv = service.sales_report_csv(&range).await?;
    Ok(([(header::CONTENT_TYPE, "text/csv")], csv))
}

/// Inventory valuation report as CSV
pub async fn export_inventory_report(
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let service = ReportingService::new(state.db);
    let csv = service.inventory_report_csv().await?;
    Ok(([(header::CONTENT_TYPE, "text/csv")], csv))
}

/// Expenses report as CSV
pub async fn export_expenses_report(
    State(state): State<AppState>,
    Query(range): Query<DateRange>,
) -> AppResult<impl IntoResponse> {
    let service = ReportingService::new(state.db);
    let csv = service.expenses_report_csv(&range).await?;
    Ok(([(header::CONTENT_TYPE, "text/csv")], csv))
}
