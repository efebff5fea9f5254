//! Order fulfillment tests
//!
//! Pins down the lifecycle table and the delivery math: the unit price and
//! profit derived from the agreed price, the cost snapshot from the bill of
//! materials, and the per-material drain quantities.

use rust_decimal::Decimal;
use uuid::Uuid;

use shared::finance::{production_cost, unit_profit, CostComponent};
use shared::models::{MovementType, OrderStatus};

fn dec(v: i64) -> Decimal {
    Decimal::from(v)
}

fn component(price: i64, quantity: i64) -> CostComponent {
    CostComponent {
        material_id: Uuid::new_v4(),
        material_name: None,
        unit_price: Some(dec(price)),
        quantity: dec(quantity),
    }
}

#[test]
fn test_lifecycle_is_linear() {
    let mut walked = vec![OrderStatus::Pendiente];
    while let Some(next) = walked.last().unwrap().next() {
        walked.push(next);
    }
    assert_eq!(
        walked,
        vec![
            OrderStatus::Pendiente,
            OrderStatus::EnProceso,
            OrderStatus::Completado,
            OrderStatus::Entregado,
        ]
    );
}

/// Delivery of an order: agreed price 100 for 2 units of a product built
/// from 1 unit of a 10-peso material and 2 units of a 5-peso material.
#[test]
fn test_delivery_math() {
    let links = [component(10, 1), component(5, 2)];

    let cost = production_cost(&links);
    assert_eq!(cost, dec(20));

    let agreed_price = dec(100);
    let quantity = 2i32;
    let unit_price = agreed_price / Decimal::from(quantity);
    assert_eq!(unit_price, dec(50));

    let profit = unit_profit(unit_price, cost);
    assert_eq!(profit, dec(30));

    // The sale carries the order's agreed total, not unit_price * rounding
    assert_eq!(unit_price * Decimal::from(quantity), agreed_price);
}

/// Delivery drains link quantity * order quantity of each material
#[test]
fn test_delivery_drain_quantities() {
    let order_quantity = 2i32;
    let links = [(dec(1), dec(40)), (dec(2), dec(40))]; // (per unit, stock)

    let mut drained = Vec::new();
    for (per_unit, stock) in links {
        let quantity = per_unit * Decimal::from(order_quantity);
        let after = MovementType::Salida.apply(stock, quantity).unwrap();
        drained.push((quantity, after));
    }

    assert_eq!(drained[0], (dec(2), dec(38)));
    assert_eq!(drained[1], (dec(4), dec(36)));
}

/// A drain failure on one material leaves the others applied: the batch is
/// best effort, per material
#[test]
fn test_partial_drain_is_per_material() {
    let order_quantity = 3i32;
    // First material has plenty, second does not
    let links = [(dec(1), dec(10)), (dec(4), dec(5))];

    let outcomes: Vec<Result<Decimal, _>> = links
        .iter()
        .map(|&(per_unit, stock)| {
            MovementType::Salida.apply(stock, per_unit * Decimal::from(order_quantity))
        })
        .collect();

    assert_eq!(outcomes[0], Ok(dec(7)));
    assert!(outcomes[1].is_err());
}

#[test]
fn test_zero_priced_order_delivers_at_loss() {
    // An order without an agreed price still delivers; the sale records the
    // cost snapshot and a negative profit
    let cost = production_cost(&[component(10, 1)]);
    let unit_price = Decimal::ZERO / Decimal::from(2);
    let profit = unit_profit(unit_price, cost);
    assert_eq!(profit, dec(-10));
}
