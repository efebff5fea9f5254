//! Route definitions for the Taller dashboard backend

use axum::{
    middleware,
    routing::{get, post, put},
    Router,
};

use crate::{handlers, middleware::auth_middleware, AppState};

/// Create API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        // Health check (public)
        .route("/health", get(handlers::health_check))
        // Auth routes (public)
        .nest("/auth", auth_routes())
        // Protected routes - material catalog and purchases
        .nest("/materials", material_routes())
        // Protected routes - product catalog and costing
        .nest("/products", product_routes())
        // Protected routes - customer management
        .nest("/customers", customer_routes())
        // Protected routes - sales
        .nest("/sales", sale_routes())
        // Protected routes - expenses
        .nest("/expenses", expense_routes())
        // Protected routes - inventory ledger
        .nest("/inventory", inventory_routes())
        // Protected routes - order fulfillment
        .nest("/orders", order_routes())
        // Protected routes - notes
        .nest("/notes", note_routes())
        // Protected routes - reports and financial analysis
        .nest("/reports", reporting_routes())
}

/// Authentication routes (public)
fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .route("/refresh", post(handlers::refresh))
}

/// Material routes (protected)
fn material_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_materials).post(handlers::create_material),
        )
        .route("/low-stock", get(handlers::list_low_stock_materials))
        .route(
            "/:material_id",
            get(handlers::get_material)
                .put(handlers::update_material)
                .delete(handlers::delete_material),
        )
        .route(
            "/:material_id/purchases",
            get(handlers::list_material_purchases).post(handlers::record_material_purchase),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Product routes (protected)
fn product_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route(
            "/:product_id",
            get(handlers::get_product)
                .put(handlers::update_product)
                .delete(handlers::delete_product),
        )
        .route("/:product_id/materials", put(handlers::set_product_materials))
        .route("/:product_id/cost", get(handlers::get_product_cost))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Customer routes (protected)
fn customer_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_customers).post(handlers::create_customer),
        )
        .route(
            "/:customer_id",
            get(handlers::get_customer)
                .put(handlers::update_customer)
                .delete(handlers::delete_customer),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Sale routes (protected)
fn sale_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_sales).post(handlers::create_sale))
        .route(
            "/:sale_id",
            get(handlers::get_sale)
                .put(handlers::update_sale)
                .delete(handlers::delete_sale),
        )
        .route("/:sale_id/status", put(handlers::update_sale_status))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Expense routes (protected)
fn expense_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_expenses).post(handlers::create_expense),
        )
        .route(
            "/:expense_id",
            get(handlers::get_expense)
                .put(handlers::update_expense)
                .delete(handlers::delete_expense),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Inventory ledger routes (protected)
fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/movements",
            get(handlers::list_movements).post(handlers::apply_movement),
        )
        .route(
            "/movements/material/:material_id",
            get(handlers::get_material_history),
        )
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Order fulfillment routes (protected)
fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_orders).post(handlers::create_order))
        .route("/upcoming", get(handlers::list_upcoming_deliveries))
        .route(
            "/:order_id",
            get(handlers::get_order)
                .put(handlers::update_order)
                .delete(handlers::delete_order),
        )
        .route("/:order_id/status", put(handlers::transition_order))
        .route("/:order_id/settle", post(handlers::settle_order_payment))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Note routes (protected)
fn note_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::list_notes).post(handlers::create_note))
        .route(
            "/:note_id",
            put(handlers::update_note).delete(handlers::delete_note),
        )
        .route("/:note_id/toggle", post(handlers::toggle_note))
        .route_layer(middleware::from_fn(auth_middleware))
}

/// Reporting routes (protected)
fn reporting_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(handlers::get_dashboard_metrics))
        .route("/operating-costs", get(handlers::get_operating_costs))
        .route("/financial-analysis", get(handlers::get_financial_statement))
        .route("/export/sales", get(handlers::export_sales_report))
        .route("/export/inventory", get(handlers::export_inventory_report))
        .route("/export/expenses", get(handlers::export_expenses_report))
        .route_layer(middleware::from_fn(auth_middleware))
}
