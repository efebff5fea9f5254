//! Financial analysis over sales, expenses and materials
//!
//! Aggregates the raw collections into an operating-cost breakdown, a
//! profitability statement with break-even point and ROI, and a per-product
//! profitability ranking. Cancelled sales never count.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::models::{Expense, ExpenseCategory, Material, Product, Sale};

/// Operating costs broken down by category
///
/// `fixed_total` is the `servicios` bucket; every other category is variable.
/// The five category totals always partition `grand_total` exactly.
#[derive(Debug, Clone, Serialize)]
pub struct OperatingCosts {
    pub envio: Decimal,
    pub publicidad: Decimal,
    pub servicios: Decimal,
    pub herramientas: Decimal,
    pub otros: Decimal,
    pub fixed_total: Decimal,
    pub variable_total: Decimal,
    pub grand_total: Decimal,
}

/// Sum expenses into the per-category breakdown
pub fn operating_costs(expenses: &[Expense]) -> OperatingCosts {
    let mut by_category: HashMap<ExpenseCategory, Decimal> = HashMap::new();
    for expense in expenses {
        *by_category.entry(expense.category).or_insert(Decimal::ZERO) += expense.amount;
    }
    let total_of = |category: ExpenseCategory| {
        by_category.get(&category).copied().unwrap_or(Decimal::ZERO)
    };

    let servicios = total_of(ExpenseCategory::Servicios);
    let envio = total_of(ExpenseCategory::Envio);
    let publicidad = total_of(ExpenseCategory::Publicidad);
    let herramientas = total_of(ExpenseCategory::Herramientas);
    let otros = total_of(ExpenseCategory::Otros);

    let fixed_total = servicios;
    let variable_total = envio + publicidad + herramientas + otros;

    OperatingCosts {
        envio,
        publicidad,
        servicios,
        herramientas,
        otros,
        fixed_total,
        variable_total,
        grand_total: fixed_total + variable_total,
    }
}

/// The full financial statement
#[derive(Debug, Clone, Serialize)]
pub struct FinancialAnalysis {
    pub total_revenue: Decimal,
    /// Point-in-time valuation of the material inventory (price * stock)
    pub materials_cost: Decimal,
    pub operating_expenses: Decimal,
    pub total_cost: Decimal,
    /// Quantity-weighted cost snapshots of the counted sales
    pub production_cost_of_sales: Decimal,
    pub gross_profit: Decimal,
    pub net_profit: Decimal,
    pub gross_margin_percent: Decimal,
    pub net_margin_percent: Decimal,
    pub roi_percent: Decimal,
    /// 0 means undefined/unreachable (contribution margin <= 0), never
    /// "zero units needed"
    pub break_even_units: Decimal,
}

/// Compute the financial statement from the raw collections
pub fn financial_analysis(
    sales: &[Sale],
    expenses: &[Expense],
    materials: &[Material],
) -> FinancialAnalysis {
    let counted: Vec<&Sale> = sales
        .iter()
        .filter(|sale| sale.status.counts_for_finance())
        .collect();

    let total_revenue: Decimal = counted.iter().map(|sale| sale.total_price).sum();

    let materials_cost: Decimal = materials.iter().map(Material::stock_value).sum();

    let costs = operating_costs(expenses);
    let operating_expenses = costs.grand_total;
    let total_cost = materials_cost + operating_expenses;

    let production_cost_of_sales: Decimal =
        counted.iter().map(|sale| sale.production_cost_total()).sum();

    let gross_profit = total_revenue - production_cost_of_sales;
    let net_profit = total_revenue - production_cost_of_sales - operating_expenses;

    let gross_margin_percent = ratio_percent(gross_profit, total_revenue);
    let net_margin_percent = ratio_percent(net_profit, total_revenue);

    let investment = materials_cost + operating_expenses;
    let roi_percent = ratio_percent(net_profit, investment);

    let sale_count = Decimal::from(counted.len() as i64);
    let (average_price, average_variable_cost) = if counted.is_empty() {
        (Decimal::ZERO, Decimal::ZERO)
    } else {
        (
            total_revenue / sale_count,
            (production_cost_of_sales + costs.variable_total) / sale_count,
        )
    };
    let contribution_margin = average_price - average_variable_cost;
    let break_even_units = if contribution_margin > Decimal::ZERO {
        costs.fixed_total / contribution_margin
    } else {
        Decimal::ZERO
    };

    FinancialAnalysis {
        total_revenue,
        materials_cost,
        operating_expenses,
        total_cost,
        production_cost_of_sales,
        gross_profit,
        net_profit,
        gross_margin_percent,
        net_margin_percent,
        roi_percent,
        break_even_units,
    }
}

/// part / whole * 100, zero when the denominator is zero
fn ratio_percent(part: Decimal, whole: Decimal) -> Decimal {
    if whole == Decimal::ZERO {
        Decimal::ZERO
    } else {
        part / whole * Decimal::from(100)
    }
}

/// Accumulated profitability of one product across its sales
#[derive(Debug, Clone, Serialize)]
pub struct ProductProfitability {
    pub product_id: Uuid,
    pub name: String,
    pub category: String,
    pub units_sold: i64,
    pub revenue: Decimal,
    pub production_cost: Decimal,
    pub contribution_margin: Decimal,
    pub profit: Decimal,
    pub margin_percent: Decimal,
}

/// Rank products by accumulated profit, descending
///
/// Only non-cancelled sales with a resolvable product reference participate.
pub fn profitability_by_product(
    sales: &[Sale],
    products: &[Product],
) -> Vec<ProductProfitability> {
    let catalog: HashMap<Uuid, &Product> =
        products.iter().map(|product| (product.id, product)).collect();

    let mut accumulated: HashMap<Uuid, ProductProfitability> = HashMap::new();
    for sale in sales {
        if !sale.status.counts_for_finance() {
            continue;
        }
        let Some(product_id) = sale.product_id else {
            continue;
        };
        let Some(product) = catalog.get(&product_id) else {
            continue;
        };

        let entry = accumulated
            .entry(product_id)
            .or_insert_with(|| ProductProfitability {
                product_id,
                name: product.name.clone(),
                category: product.category.clone(),
                units_sold: 0,
                revenue: Decimal::ZERO,
                production_cost: Decimal::ZERO,
                contribution_margin: Decimal::ZERO,
                profit: Decimal::ZERO,
                margin_percent: Decimal::ZERO,
            });

        let sale_cost = sale.production_cost_total();
        entry.units_sold += sale.quantity as i64;
        entry.revenue += sale.total_price;
        entry.production_cost += sale_cost;
        entry.contribution_margin += sale.total_price - sale_cost;
    }

    let mut ranking: Vec<ProductProfitability> = accumulated
        .into_values()
        .map(|mut entry| {
            entry.profit = entry.revenue - entry.production_cost;
            entry.margin_percent = ratio_percent(entry.profit, entry.revenue);
            entry
        })
        .collect();
    ranking.sort_by(|a, b| b.profit.cmp(&a.profit));
    ranking
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PaymentMethod, SaleStatus};
    use chrono::{NaiveDate, Utc};

    fn dec(v: i64) -> Decimal {
        Decimal::from(v)
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn sale(total: i64, quantity: i32, cost_per_unit: i64, status: SaleStatus) -> Sale {
        Sale {
            id: Uuid::new_v4(),
            product_id: None,
            customer_id: None,
            quantity,
            unit_price: dec(total) / dec(quantity as i64),
            total_price: dec(total),
            production_cost: Some(dec(cost_per_unit)),
            profit: None,
            sale_date: date(),
            payment_method: PaymentMethod::Efectivo,
            status,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn expense(category: ExpenseCategory, amount: i64) -> Expense {
        Expense {
            id: Uuid::new_v4(),
            concept: "gasto".to_string(),
            category,
            amount: dec(amount),
            date: date(),
            description: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn material(price: i64, stock: i64) -> Material {
        Material {
            id: Uuid::new_v4(),
            name: "material".to_string(),
            unit_price: dec(price),
            unit_of_measure: "unidad".to_string(),
            stock_available: dec(stock),
            supplier: None,
            purchase_date: None,
            notes: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn product(id: Uuid, name: &str) -> Product {
        Product {
            id,
            name: name.to_string(),
            category: "joyeria".to_string(),
            description: None,
            sale_price: dec(50),
            elaboration_time: None,
            photo_url: None,
            active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_operating_costs_partition() {
        let expenses = vec![
            expense(ExpenseCategory::Envio, 10),
            expense(ExpenseCategory::Publicidad, 20),
            expense(ExpenseCategory::Servicios, 30),
            expense(ExpenseCategory::Herramientas, 5),
            expense(ExpenseCategory::Otros, 15),
            expense(ExpenseCategory::Servicios, 10),
        ];
        let costs = operating_costs(&expenses);
        assert_eq!(costs.servicios, dec(40));
        assert_eq!(costs.fixed_total, dec(40));
        assert_eq!(costs.variable_total, dec(50));
        assert_eq!(costs.grand_total, dec(90));
        assert_eq!(costs.fixed_total + costs.variable_total, costs.grand_total);
    }

    #[test]
    fn test_empty_inputs_all_zero() {
        let analysis = financial_analysis(&[], &[], &[]);
        assert_eq!(analysis.total_revenue, Decimal::ZERO);
        assert_eq!(analysis.gross_margin_percent, Decimal::ZERO);
        assert_eq!(analysis.net_margin_percent, Decimal::ZERO);
        assert_eq!(analysis.roi_percent, Decimal::ZERO);
        assert_eq!(analysis.break_even_units, Decimal::ZERO);
    }

    /// Worked example: one 200-peso sale of 2 units costing 50/unit,
    /// 20 fixed + 10 variable expenses, 20 pesos of inventory on hand.
    #[test]
    fn test_worked_example() {
        let sales = vec![sale(200, 2, 50, SaleStatus::Entregado)];
        let expenses = vec![
            expense(ExpenseCategory::Servicios, 20),
            expense(ExpenseCategory::Otros, 10),
        ];
        let materials = vec![material(5, 4)];

        let analysis = financial_analysis(&sales, &expenses, &materials);
        assert_eq!(analysis.total_revenue, dec(200));
        assert_eq!(analysis.materials_cost, dec(20));
        assert_eq!(analysis.operating_expenses, dec(30));
        assert_eq!(analysis.total_cost, dec(50));
        assert_eq!(analysis.production_cost_of_sales, dec(100));
        assert_eq!(analysis.gross_profit, dec(100));
        assert_eq!(analysis.net_profit, dec(70));
        assert_eq!(analysis.gross_margin_percent, dec(50));
        assert_eq!(analysis.net_margin_percent, dec(35));
        assert_eq!(analysis.roi_percent, dec(140));
    }

    #[test]
    fn test_cancelled_sales_excluded() {
        let sales = vec![
            sale(200, 2, 50, SaleStatus::Entregado),
            sale(1000, 1, 10, SaleStatus::Cancelado),
        ];
        let analysis = financial_analysis(&sales, &[], &[]);
        assert_eq!(analysis.total_revenue, dec(200));
        assert_eq!(analysis.production_cost_of_sales, dec(100));
    }

    #[test]
    fn test_break_even_sentinel_when_unprofitable() {
        // Average variable cost exceeds average price: break-even undefined
        let sales = vec![sale(100, 1, 150, SaleStatus::Completado)];
        let expenses = vec![expense(ExpenseCategory::Servicios, 40)];
        let analysis = financial_analysis(&sales, &expenses, &[]);
        assert_eq!(analysis.break_even_units, Decimal::ZERO);
    }

    #[test]
    fn test_break_even_reconstructs_fixed_costs() {
        let sales = vec![
            sale(200, 2, 50, SaleStatus::Entregado),
            sale(100, 1, 20, SaleStatus::Completado),
        ];
        let expenses = vec![
            expense(ExpenseCategory::Servicios, 90),
            expense(ExpenseCategory::Envio, 30),
        ];
        let analysis = financial_analysis(&sales, &expenses, &[]);

        // revenue 300 over 2 sales -> avg 150; variable (120 + 30) / 2 = 75
        let contribution = dec(150) - dec(75);
        assert_eq!(analysis.break_even_units, dec(90) / contribution);
        assert_eq!(analysis.break_even_units * contribution, dec(90));
    }

    #[test]
    fn test_profitability_ranking() {
        let winner = Uuid::new_v4();
        let runner_up = Uuid::new_v4();
        let gone = Uuid::new_v4();

        let mut winning_sale = sale(300, 3, 20, SaleStatus::Entregado);
        winning_sale.product_id = Some(winner);
        let mut second_sale = sale(100, 1, 60, SaleStatus::Completado);
        second_sale.product_id = Some(runner_up);
        let mut orphan_sale = sale(500, 1, 0, SaleStatus::Entregado);
        orphan_sale.product_id = Some(gone);
        let mut cancelled_sale = sale(900, 1, 0, SaleStatus::Cancelado);
        cancelled_sale.product_id = Some(winner);

        let products = vec![product(winner, "collar"), product(runner_up, "aretes")];
        let ranking = profitability_by_product(
            &[winning_sale, second_sale, orphan_sale, cancelled_sale],
            &products,
        );

        assert_eq!(ranking.len(), 2);
        assert_eq!(ranking[0].product_id, winner);
        assert_eq!(ranking[0].units_sold, 3);
        assert_eq!(ranking[0].revenue, dec(300));
        assert_eq!(ranking[0].production_cost, dec(60));
        assert_eq!(ranking[0].profit, dec(240));
        assert_eq!(ranking[0].margin_percent, dec(80));
        assert_eq!(ranking[1].product_id, runner_up);
        assert_eq!(ranking[1].profit, dec(40));
    }
}
