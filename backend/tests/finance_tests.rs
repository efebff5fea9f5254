//! Financial analysis tests
//!
//! Covers the operating-cost partition, the margin and ROI guards, the
//! break-even sentinel, and the totality of the health classification.

use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use shared::finance::{financial_analysis, financial_health, operating_costs, HealthLevel};
use shared::models::{Expense, ExpenseCategory, Material, PaymentMethod, Sale, SaleStatus};

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

fn sale(total: i64, quantity: i32, cost_per_unit: i64, status: SaleStatus) -> Sale {
    Sale {
        id: Uuid::new_v4(),
        product_id: None,
        customer_id: None,
        quantity,
        unit_price: Decimal::from(total) / Decimal::from(quantity as i64),
        total_price: Decimal::from(total),
        production_cost: Some(Decimal::from(cost_per_unit)),
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
        amount: Decimal::from(amount),
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
        unit_price: Decimal::from(price),
        unit_of_measure: "unidad".to_string(),
        stock_available: Decimal::from(stock),
        supplier: None,
        purchase_date: None,
        notes: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

// ============================================================================
// Unit Tests
// ============================================================================

#[test]
fn test_statement_matches_worked_example() {
    let sales = vec![sale(200, 2, 50, SaleStatus::Entregado)];
    let expenses = vec![
        expense(ExpenseCategory::Servicios, 20),
        expense(ExpenseCategory::Otros, 10),
    ];
    let materials = vec![material(5, 4)];

    let analysis = financial_analysis(&sales, &expenses, &materials);
    assert_eq!(analysis.materials_cost, Decimal::from(20));
    assert_eq!(analysis.production_cost_of_sales, Decimal::from(100));
    assert_eq!(analysis.gross_profit, Decimal::from(100));
    assert_eq!(analysis.operating_expenses, Decimal::from(30));
    assert_eq!(analysis.net_profit, Decimal::from(70));
    assert_eq!(analysis.net_margin_percent, Decimal::from(35));

    let health = financial_health(&analysis);
    assert_eq!(health.level, HealthLevel::Excelente);
}

#[test]
fn test_zero_revenue_margins_are_zero() {
    let analysis = financial_analysis(&[], &[expense(ExpenseCategory::Envio, 50)], &[]);
    assert_eq!(analysis.total_revenue, Decimal::ZERO);
    assert_eq!(analysis.gross_margin_percent, Decimal::ZERO);
    assert_eq!(analysis.net_margin_percent, Decimal::ZERO);
}

#[test]
fn test_health_boundaries() {
    let at = |margin: i64| {
        let mut analysis = financial_analysis(&[], &[], &[]);
        analysis.net_margin_percent = Decimal::from(margin);
        financial_health(&analysis).level
    };

    assert_eq!(at(30), HealthLevel::Excelente);
    assert_eq!(at(20), HealthLevel::Bueno);
    assert_eq!(at(10), HealthLevel::Regular);
    assert_eq!(at(0), HealthLevel::Malo);
    assert_eq!(at(-1), HealthLevel::Critico);
}

// ============================================================================
// Property Tests
// ============================================================================

fn arb_category() -> impl Strategy<Value = ExpenseCategory> {
    prop_oneof![
        Just(ExpenseCategory::Envio),
        Just(ExpenseCategory::Publicidad),
        Just(ExpenseCategory::Servicios),
        Just(ExpenseCategory::Herramientas),
        Just(ExpenseCategory::Otros),
    ]
}

proptest! {
    /// Fixed + variable always equals the grand total, exactly
    #[test]
    fn prop_operating_costs_partition(
        entries in prop::collection::vec((arb_category(), 0i64..1_000_000), 0..40)
    ) {
        let expenses: Vec<Expense> = entries
            .into_iter()
            .map(|(category, amount)| expense(category, amount))
            .collect();

        let costs = operating_costs(&expenses);
        prop_assert_eq!(costs.fixed_total + costs.variable_total, costs.grand_total);

        let by_category = costs.envio + costs.publicidad + costs.servicios
            + costs.herramientas + costs.otros;
        prop_assert_eq!(by_category, costs.grand_total);
    }

    /// Every net margin lands in exactly one health tier
    #[test]
    fn prop_health_is_total(margin_cents in -1_000_000i64..1_000_000) {
        let mut analysis = financial_analysis(&[], &[], &[]);
        analysis.net_margin_percent = Decimal::new(margin_cents, 2);

        let verdict = financial_health(&analysis);
        let level = verdict.level;
        prop_assert!(matches!(
            level,
            HealthLevel::Excelente
                | HealthLevel::Bueno
                | HealthLevel::Regular
                | HealthLevel::Malo
                | HealthLevel::Critico
        ));
        prop_assert!(!verdict.message.is_empty());
    }

    /// Break-even is the zero sentinel or strictly positive, and when
    /// defined it reconstructs the fixed costs
    #[test]
    fn prop_break_even_sentinel_or_positive(
        totals in prop::collection::vec((1i64..10_000, 1i32..20, 0i64..5_000), 0..20),
        fixed in 0i64..100_000,
        variable in 0i64..100_000,
    ) {
        let sales: Vec<Sale> = totals
            .iter()
            .map(|&(total, quantity, cost)| sale(total, quantity, cost, SaleStatus::Completado))
            .collect();
        let expenses = vec![
            expense(ExpenseCategory::Servicios, fixed),
            expense(ExpenseCategory::Envio, variable),
        ];

        let analysis = financial_analysis(&sales, &expenses, &[]);
        prop_assert!(analysis.break_even_units >= Decimal::ZERO);

        if analysis.break_even_units > Decimal::ZERO {
            let counted = Decimal::from(sales.len() as i64);
            let avg_price = analysis.total_revenue / counted;
            let avg_variable =
                (analysis.production_cost_of_sales + Decimal::from(variable)) / counted;
            let contribution = avg_price - avg_variable;
            let reconstructed = analysis.break_even_units * contribution;
            let tolerance = Decimal::new(1, 6);
            prop_assert!((reconstructed - Decimal::from(fixed)).abs() <= tolerance);
        }
    }

    /// Cancelled sales never move the statement
    #[test]
    fn prop_cancelled_sales_are_inert(
        total in 1i64..10_000,
        quantity in 1i32..20,
        cost in 0i64..5_000,
    ) {
        let baseline = financial_analysis(&[], &[], &[]);
        let with_cancelled = financial_analysis(
            &[sale(total, quantity, cost, SaleStatus::Cancelado)],
            &[],
            &[],
        );

        prop_assert_eq!(baseline.total_revenue, with_cancelled.total_revenue);
        prop_assert_eq!(
            baseline.production_cost_of_sales,
            with_cancelled.production_cost_of_sales
        );
        prop_assert_eq!(baseline.net_profit, with_cancelled.net_profit);
    }
}
