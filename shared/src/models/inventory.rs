//! Inventory ledger models and stock arithmetic
//!
//! The movement log is append-only: rows are never updated or deleted, and it
//! is the audit trail of record for material stock.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use uuid::Uuid;

/// Types of stock movements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "movement_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MovementType {
    /// Stock received (purchase, return)
    Entrada,
    /// Stock consumed (sale, order delivery)
    Salida,
    /// Absolute correction: sets stock to the given quantity
    Ajuste,
}

impl MovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::Entrada => "entrada",
            MovementType::Salida => "salida",
            MovementType::Ajuste => "ajuste",
        }
    }

    /// Compute the stock level after applying this movement
    ///
    /// Pure arithmetic; the inventory service wraps it in a transaction with
    /// the material row locked so concurrent movements serialize.
    pub fn apply(&self, stock_before: Decimal, quantity: Decimal) -> Result<Decimal, StockError> {
        match self {
            MovementType::Entrada => {
                if quantity <= Decimal::ZERO {
                    return Err(StockError::InvalidQuantity { quantity });
                }
                Ok(stock_before + quantity)
            }
            MovementType::Salida => {
                if quantity <= Decimal::ZERO {
                    return Err(StockError::InvalidQuantity { quantity });
                }
                let after = stock_before - quantity;
                if after < Decimal::ZERO {
                    return Err(StockError::InsufficientStock {
                        available: stock_before,
                        requested: quantity,
                    });
                }
                Ok(after)
            }
            MovementType::Ajuste => {
                if quantity < Decimal::ZERO {
                    return Err(StockError::InvalidQuantity { quantity });
                }
                Ok(quantity)
            }
        }
    }
}

/// Errors from stock arithmetic
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StockError {
    #[error("invalid movement quantity: {quantity}")]
    InvalidQuantity { quantity: Decimal },

    #[error("insufficient stock: {available} available, {requested} requested")]
    InsufficientStock {
        available: Decimal,
        requested: Decimal,
    },
}

/// One row of the stock movement log
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct InventoryMovement {
    pub id: Uuid,
    pub material_id: Uuid,
    pub movement_type: MovementType,
    pub quantity: Decimal,
    pub stock_before: Decimal,
    pub stock_after: Decimal,
    pub reason: Option<String>,
    /// Sale or order that caused the movement, when system generated
    pub reference_id: Option<Uuid>,
    pub occurred_at: DateTime<Utc>,
}

/// Result of a committed stock movement
#[derive(Debug, Clone, Serialize)]
pub struct StockChange {
    pub movement_id: Uuid,
    pub material_id: Uuid,
    pub stock_before: Decimal,
    pub stock_after: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(v: i64) -> Decimal {
        Decimal::from(v)
    }

    #[test]
    fn test_entrada_adds() {
        assert_eq!(MovementType::Entrada.apply(dec(10), dec(5)), Ok(dec(15)));
    }

    #[test]
    fn test_salida_subtracts() {
        assert_eq!(MovementType::Salida.apply(dec(15), dec(3)), Ok(dec(12)));
    }

    #[test]
    fn test_salida_rejects_negative_result() {
        let err = MovementType::Salida.apply(dec(5), dec(6)).unwrap_err();
        assert_eq!(
            err,
            StockError::InsufficientStock {
                available: dec(5),
                requested: dec(6),
            }
        );
    }

    #[test]
    fn test_salida_exact_drain_allowed() {
        assert_eq!(MovementType::Salida.apply(dec(5), dec(5)), Ok(dec(0)));
    }

    #[test]
    fn test_ajuste_sets_absolute() {
        assert_eq!(MovementType::Ajuste.apply(dec(12), dec(7)), Ok(dec(7)));
        assert_eq!(MovementType::Ajuste.apply(dec(12), dec(0)), Ok(dec(0)));
    }

    #[test]
    fn test_zero_quantity_rejected_for_flows() {
        assert!(MovementType::Entrada.apply(dec(10), dec(0)).is_err());
        assert!(MovementType::Salida.apply(dec(10), dec(0)).is_err());
        assert!(MovementType::Entrada.apply(dec(10), dec(-1)).is_err());
        assert!(MovementType::Ajuste.apply(dec(10), dec(-1)).is_err());
    }

    /// The chained example from the ledger contract: 10 -> 15 -> 12 -> 7
    #[test]
    fn test_movement_chain() {
        let s0 = dec(10);
        let s1 = MovementType::Entrada.apply(s0, dec(5)).unwrap();
        assert_eq!(s1, dec(15));
        let s2 = MovementType::Salida.apply(s1, dec(3)).unwrap();
        assert_eq!(s2, dec(12));
        let s3 = MovementType::Ajuste.apply(s2, dec(7)).unwrap();
        assert_eq!(s3, dec(7));
    }

    /// Two withdrawals of 6 against stock 10: the second must fail once the
    /// first commits, regardless of arrival order.
    #[test]
    fn test_competing_salidas_only_one_fits() {
        let s1 = MovementType::Salida.apply(dec(10), dec(6)).unwrap();
        assert_eq!(s1, dec(4));
        assert!(MovementType::Salida.apply(s1, dec(6)).is_err());
    }
}
