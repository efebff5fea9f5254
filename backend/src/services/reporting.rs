//! Reporting service for dashboard metrics, financial statements and export
//!
//! The financial endpoints load in-memory snapshots of the relevant
//! collections and delegate all computation to the pure finance layer in the
//! shared crate.

use chrono::{Datelike, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::PgPool;

use crate::error::AppResult;
use shared::finance::{
    financial_analysis, financial_health, operating_costs, profitability_by_product,
    FinancialAnalysis, FinancialHealth, OperatingCosts, ProductProfitability,
};
use shared::models::{Expense, Material, Product, Sale};
use shared::types::DateRange;

/// Reporting service
#[derive(Clone)]
pub struct ReportingService {
    db: PgPool,
}

/// Dashboard metrics
#[derive(Debug, Serialize)]
pub struct DashboardMetrics {
    pub revenue_this_month: Decimal,
    pub sales_this_month: i64,
    pub pending_orders: i64,
    pub active_products: i64,
    pub total_customers: i64,
    pub inventory_value: Decimal,
    pub low_stock_materials: i64,
    pub expenses_this_month: Decimal,
}

/// The full financial statement served to the analysis page
#[derive(Debug, Serialize)]
pub struct FinancialStatement {
    pub analysis: FinancialAnalysis,
    pub operating_costs: OperatingCosts,
    pub health: FinancialHealth,
    pub profitability: Vec<ProductProfitability>,
}

/// Row of the sales CSV report
#[derive(Debug, Serialize)]
struct SalesReportRow {
    fecha: NaiveDate,
    cliente: String,
    producto: String,
    cantidad: i32,
    precio_unitario: Decimal,
    total: Decimal,
    estado: String,
}

/// Row of the inventory CSV report
#[derive(Debug, Serialize)]
struct InventoryReportRow {
    material: String,
    stock: Decimal,
    unidad: String,
    precio_unitario: Decimal,
    valor_total: Decimal,
    proveedor: String,
}

/// Row of the expenses CSV report
#[derive(Debug, Serialize)]
struct ExpenseReportRow {
    fecha: NaiveDate,
    concepto: String,
    categoria: String,
    monto: Decimal,
    descripcion: String,
}

impl ReportingService {
    /// Create a new ReportingService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Headline metrics for the dashboard
    pub async fn dashboard_metrics(&self) -> AppResult<DashboardMetrics> {
        let today = Utc::now().date_naive();
        let month_start = NaiveDate::from_ymd_opt(today.year(), today.month(), 1)
            .expect("first of month is always valid");

        let (revenue_this_month, sales_this_month): (Decimal, i64) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(total_price), 0), COUNT(*)
            FROM sales
            WHERE status <> 'cancelado' AND sale_date >= $1
            "#,
        )
        .bind(month_start)
        .fetch_one(&self.db)
        .await?;

        let pending_orders: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM orders WHERE status <> 'entregado'",
        )
        .fetch_one(&self.db)
        .await?;

        let active_products: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM products WHERE active")
                .fetch_one(&self.db)
                .await?;

        let total_customers: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.db)
            .await?;

        let (inventory_value, low_stock_materials): (Decimal, i64) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(unit_price * stock_available), 0),
                   COUNT(*) FILTER (WHERE stock_available < 10)
            FROM materials
            "#,
        )
        .fetch_one(&self.db)
        .await?;

        let expenses_this_month: Decimal = sqlx::query_scalar(
            "SELECT COALESCE(SUM(amount), 0) FROM expenses WHERE date >= $1",
        )
        .bind(month_start)
        .fetch_one(&self.db)
        .await?;

        Ok(DashboardMetrics {
            revenue_this_month,
            sales_this_month,
            pending_orders,
            active_products,
            total_customers,
            inventory_value,
            low_stock_materials,
            expenses_this_month,
        })
    }

    /// Operating-cost breakdown for a period
    pub async fn operating_costs(&self, range: &DateRange) -> AppResult<OperatingCosts> {
        let expenses = self.load_expenses(range).await?;
        Ok(operating_costs(&expenses))
    }

    /// The full financial statement for a period
    ///
    /// Materials are always valued at their current stock; the date range
    /// scopes sales and expenses only.
    pub async fn financial_statement(&self, range: &DateRange) -> AppResult<FinancialStatement> {
        let sales = self.load_sales(range).await?;
        let expenses = self.load_expenses(range).await?;
        let materials = self.load_materials().await?;
        let products = self.load_products().await?;

        let analysis = financial_analysis(&sales, &expenses, &materials);
        let health = financial_health(&analysis);

        Ok(FinancialStatement {
            operating_costs: operating_costs(&expenses),
            profitability: profitability_by_product(&sales, &products),
            analysis,
            health,
        })
    }

    /// Sales report as CSV
    pub async fn sales_report_csv(&self, range: &DateRange) -> AppResult<String> {
        let rows = sqlx::query_as::<_, (NaiveDate, Option<String>, Option<String>, i32, Decimal, Decimal, String)>(
            r#"
            SELECT s.sale_date, c.name, p.name, s.quantity, s.unit_price, s.total_price,
                   s.status::text
            FROM sales s
            LEFT JOIN customers c ON c.id = s.customer_id
            LEFT JOIN products p ON p.id = s.product_id
            WHERE s.sale_date BETWEEN $1 AND $2
            ORDER BY s.sale_date DESC
            "#,
        )
        .bind(range.bounds().0)
        .bind(range.bounds().1)
        .fetch_all(&self.db)
        .await?;

        let report: Vec<SalesReportRow> = rows
            .into_iter()
            .map(
                |(fecha, cliente, producto, cantidad, precio_unitario, total, estado)| {
                    SalesReportRow {
                        fecha,
                        cliente: cliente.unwrap_or_else(|| "N/A".to_string()),
                        producto: producto.unwrap_or_else(|| "N/A".to_string()),
                        cantidad,
                        precio_unitario,
                        total,
                        estado,
                    }
                },
            )
            .collect();

        Self::export_to_csv(&report)
    }

    /// Inventory valuation report as CSV
    pub async fn inventory_report_csv(&self) -> AppResult<String> {
        let materials = self.load_materials().await?;

        let report: Vec<InventoryReportRow> = materials
            .into_iter()
            .map(|m| InventoryReportRow {
                stock: m.stock_available,
                valor_total: m.stock_value(),
                material: m.name,
                unidad: m.unit_of_measure,
                precio_unitario: m.unit_price,
                proveedor: m.supplier.unwrap_or_else(|| "-".to_string()),
            })
            .collect();

        Self::export_to_csv(&report)
    }

    /// Expenses report as CSV
    pub async fn expenses_report_csv(&self, range: &DateRange) -> AppResult<String> {
        let expenses = self.load_expenses(range).await?;

        let report: Vec<ExpenseReportRow> = expenses
            .into_iter()
            .map(|e| ExpenseReportRow {
                fecha: e.date,
                concepto: e.concept,
                categoria: e.category.as_str().to_string(),
                monto: e.amount,
                descripcion: e.description.unwrap_or_default(),
            })
            .collect();

        Self::export_to_csv(&report)
    }

    async fn load_sales(&self, range: &DateRange) -> AppResult<Vec<Sale>> {
        let (start, end) = range.bounds();
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, product_id, customer_id, quantity, unit_price, total_price,
                   production_cost, profit, sale_date, payment_method, status, notes,
                   created_at, updated_at
            FROM sales
            WHERE sale_date BETWEEN $1 AND $2
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await?;
        Ok(sales)
    }

    async fn load_expenses(&self, range: &DateRange) -> AppResult<Vec<Expense>> {
        let (start, end) = range.bounds();
        let expenses = sqlx::query_as::<_, Expense>(
            r#"
            SELECT id, concept, category, amount, date, description, created_at, updated_at
            FROM expenses
            WHERE date BETWEEN $1 AND $2
            "#,
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await?;
        Ok(expenses)
    }

    async fn load_materials(&self) -> AppResult<Vec<Material>> {
        let materials = sqlx::query_as::<_, Material>(
            r#"
            SELECT id, name, unit_price, unit_of_measure, stock_available, supplier,
                   purchase_date, notes, created_at, updated_at
            FROM materials
            ORDER BY name ASC
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(materials)
    }

    async fn load_products(&self) -> AppResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, name, category, description, sale_price, elaboration_time, photo_url,
                   active, created_at, updated_at
            FROM products
            "#,
        )
        .fetch_all(&self.db)
        .await?;
        Ok(products)
    }

    /// Serialize report rows as CSV
    fn export_to_csv<T: Serialize>(data: &[T]) -> AppResult<String> {
        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in data {
            wtr.serialize(record).map_err(|e| {
                crate::error::AppError::Internal(format!("CSV serialization error: {}", e))
            })?;
        }
        let csv_data = String::from_utf8(wtr.into_inner().map_err(|e| {
            crate::error::AppError::Internal(format!("CSV writer error: {}", e))
        })?)
        .map_err(|e| crate::error::AppError::Internal(format!("UTF-8 conversion error: {}", e)))?;
        Ok(csv_data)
    }
}
