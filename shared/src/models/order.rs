//! Pending order models and fulfillment lifecycle

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Lifecycle status of a pending order
///
/// The flow is linear: pendiente -> en_proceso -> completado -> entregado.
/// `entregado` is terminal and is only reachable through the delivery path,
/// which creates the sale and drains materials.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "order_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pendiente,
    EnProceso,
    Completado,
    Entregado,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pendiente => "pendiente",
            OrderStatus::EnProceso => "en_proceso",
            OrderStatus::Completado => "completado",
            OrderStatus::Entregado => "entregado",
        }
    }

    /// The next step in the linear flow, if any
    pub fn next(&self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pendiente => Some(OrderStatus::EnProceso),
            OrderStatus::EnProceso => Some(OrderStatus::Completado),
            OrderStatus::Completado => Some(OrderStatus::Entregado),
            OrderStatus::Entregado => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Entregado)
    }
}

/// A customer order awaiting fulfillment
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Order {
    pub id: Uuid,
    pub product_id: Option<Uuid>,
    pub customer_id: Option<Uuid>,
    pub quantity: i32,
    pub order_date: NaiveDate,
    pub estimated_delivery: Option<NaiveDate>,
    pub status: OrderStatus,
    pub agreed_price: Option<Decimal>,
    /// Advance payment, 0 <= anticipo <= agreed_price
    pub advance_payment: Decimal,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Outstanding balance after the advance payment
    pub fn balance_due(&self) -> Decimal {
        self.agreed_price.unwrap_or(Decimal::ZERO) - self.advance_payment
    }

    /// Whether the estimated delivery date has passed without delivery
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.status.is_terminal()
            && self
                .estimated_delivery
                .map(|due| due < today)
                .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_flow() {
        assert_eq!(OrderStatus::Pendiente.next(), Some(OrderStatus::EnProceso));
        assert_eq!(OrderStatus::EnProceso.next(), Some(OrderStatus::Completado));
        assert_eq!(OrderStatus::Completado.next(), Some(OrderStatus::Entregado));
        assert_eq!(OrderStatus::Entregado.next(), None);
    }

    #[test]
    fn test_only_entregado_is_terminal() {
        assert!(OrderStatus::Entregado.is_terminal());
        assert!(!OrderStatus::Pendiente.is_terminal());
        assert!(!OrderStatus::EnProceso.is_terminal());
        assert!(!OrderStatus::Completado.is_terminal());
    }
}
