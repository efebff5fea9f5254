//! Bill-of-materials costing
//!
//! Production cost is always recomputed from current material prices, so a
//! price edit is reflected immediately in future costings. Past sales are
//! unaffected: they carry their own cost snapshot.

use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

/// One material line of a product's bill of materials, with the material's
/// current price resolved
///
/// `unit_price` is `None` when the linked material no longer exists; such a
/// component contributes nothing to the cost and is flagged, not fatal.
#[derive(Debug, Clone, Serialize)]
pub struct CostComponent {
    pub material_id: Uuid,
    pub material_name: Option<String>,
    pub unit_price: Option<Decimal>,
    pub quantity: Decimal,
}

impl CostComponent {
    /// Cost contributed by this component, if the material still resolves
    pub fn cost(&self) -> Option<Decimal> {
        self.unit_price.map(|price| price * self.quantity)
    }
}

/// Production cost of one product unit: sum of price * quantity over the
/// material links. Zero links cost zero.
pub fn production_cost(components: &[CostComponent]) -> Decimal {
    components
        .iter()
        .filter_map(CostComponent::cost)
        .sum::<Decimal>()
}

/// Profit per unit at a given sale price
pub fn unit_profit(sale_price: Decimal, production_cost: Decimal) -> Decimal {
    sale_price - production_cost
}

/// Margin over sale price, as a percentage. Zero when the sale price is zero.
pub fn margin_percent(sale_price: Decimal, production_cost: Decimal) -> Decimal {
    if sale_price == Decimal::ZERO {
        return Decimal::ZERO;
    }
    (sale_price - production_cost) / sale_price * Decimal::from(100)
}

/// Full cost/margin picture for one product, as exposed by the product API
#[derive(Debug, Clone, Serialize)]
pub struct CostBreakdown {
    pub product_id: Uuid,
    pub product_name: String,
    pub category: String,
    pub sale_price: Decimal,
    pub components: Vec<CostComponent>,
    pub production_cost: Decimal,
    pub unit_profit: Decimal,
    pub margin_percent: Decimal,
    /// Material ids whose link no longer resolves; their cost counted as zero
    pub missing_materials: Vec<Uuid>,
}

impl CostBreakdown {
    pub fn from_components(
        product_id: Uuid,
        product_name: String,
        category: String,
        sale_price: Decimal,
        components: Vec<CostComponent>,
    ) -> Self {
        let cost = production_cost(&components);
        let missing_materials = components
            .iter()
            .filter(|c| c.unit_price.is_none())
            .map(|c| c.material_id)
            .collect();
        Self {
            product_id,
            product_name,
            category,
            sale_price,
            production_cost: cost,
            unit_profit: unit_profit(sale_price, cost),
            margin_percent: margin_percent(sale_price, cost),
            components,
            missing_materials,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn component(price: Option<i64>, quantity: i64) -> CostComponent {
        CostComponent {
            material_id: Uuid::new_v4(),
            material_name: Some("hilo".to_string()),
            unit_price: price.map(Decimal::from),
            quantity: Decimal::from(quantity),
        }
    }

    #[test]
    fn test_production_cost_sums_links() {
        let components = vec![component(Some(10), 1), component(Some(5), 2)];
        assert_eq!(production_cost(&components), Decimal::from(20));
    }

    #[test]
    fn test_no_links_costs_zero() {
        assert_eq!(production_cost(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_missing_material_contributes_zero() {
        let components = vec![component(Some(10), 1), component(None, 4)];
        assert_eq!(production_cost(&components), Decimal::from(10));
    }

    #[test]
    fn test_margin_zero_price_guard() {
        assert_eq!(margin_percent(Decimal::ZERO, Decimal::from(5)), Decimal::ZERO);
    }

    #[test]
    fn test_no_links_full_margin() {
        // A product with an empty bill of materials keeps 100% margin
        assert_eq!(
            margin_percent(Decimal::from(80), production_cost(&[])),
            Decimal::from(100)
        );
    }

    #[test]
    fn test_breakdown_flags_missing() {
        let broken = component(None, 2);
        let missing_id = broken.material_id;
        let breakdown = CostBreakdown::from_components(
            Uuid::new_v4(),
            "pulsera".to_string(),
            "joyeria".to_string(),
            Decimal::from(50),
            vec![component(Some(10), 1), broken],
        );
        assert_eq!(breakdown.production_cost, Decimal::from(10));
        assert_eq!(breakdown.unit_profit, Decimal::from(40));
        assert_eq!(breakdown.missing_materials, vec![missing_id]);
    }
}
