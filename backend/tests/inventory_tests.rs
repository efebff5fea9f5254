//! Inventory ledger arithmetic tests
//!
//! The service layer wraps this arithmetic in a row-locked transaction; these
//! tests pin down the arithmetic itself and the chaining invariants the
//! movement log relies on.

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::models::{MovementType, StockError};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[test]
fn test_chain_with_all_movement_types() {
    // entrada 5, salida 3, ajuste 7 against a material starting at 10
    let s0 = dec("10");
    let s1 = MovementType::Entrada.apply(s0, dec("5")).unwrap();
    let s2 = MovementType::Salida.apply(s1, dec("3")).unwrap();
    let s3 = MovementType::Ajuste.apply(s2, dec("7")).unwrap();

    assert_eq!((s1, s2, s3), (dec("15"), dec("12"), dec("7")));
}

#[test]
fn test_fractional_quantities() {
    let after = MovementType::Entrada.apply(dec("2.5"), dec("0.75")).unwrap();
    assert_eq!(after, dec("3.25"));

    let after = MovementType::Salida.apply(after, dec("3.25")).unwrap();
    assert_eq!(after, Decimal::ZERO);
}

#[test]
fn test_competing_withdrawals() {
    // Two salidas of 6 against stock 10: whichever commits second must fail
    let first = MovementType::Salida.apply(dec("10"), dec("6")).unwrap();
    assert_eq!(first, dec("4"));

    let second = MovementType::Salida.apply(first, dec("6"));
    assert_eq!(
        second,
        Err(StockError::InsufficientStock {
            available: dec("4"),
            requested: dec("6"),
        })
    );
}

#[test]
fn test_quantity_validation_per_type() {
    assert!(matches!(
        MovementType::Entrada.apply(dec("1"), Decimal::ZERO),
        Err(StockError::InvalidQuantity { .. })
    ));
    assert!(matches!(
        MovementType::Salida.apply(dec("1"), dec("-2")),
        Err(StockError::InvalidQuantity { .. })
    ));
    // ajuste accepts zero (empty the shelf) but not negatives
    assert_eq!(MovementType::Ajuste.apply(dec("9"), Decimal::ZERO), Ok(Decimal::ZERO));
    assert!(MovementType::Ajuste.apply(dec("9"), dec("-1")).is_err());
}

// ============================================================================
// Property Tests
// ============================================================================

fn arb_quantity() -> impl Strategy<Value = Decimal> {
    // Fractional quantities with three decimal places, matching the schema
    (1i64..10_000_000).prop_map(|thousandths| Decimal::new(thousandths, 3))
}

proptest! {
    /// A committed movement never leaves negative stock
    #[test]
    fn prop_stock_never_negative(
        stock in 0i64..10_000_000,
        quantity in arb_quantity(),
        which in 0u8..3,
    ) {
        let stock = Decimal::new(stock, 3);
        let movement = match which {
            0 => MovementType::Entrada,
            1 => MovementType::Salida,
            _ => MovementType::Ajuste,
        };

        if let Ok(after) = movement.apply(stock, quantity) {
            prop_assert!(after >= Decimal::ZERO);
        }
    }

    /// entrada/salida are exact inverses when both fit
    #[test]
    fn prop_entrada_salida_roundtrip(
        stock in 0i64..10_000_000,
        quantity in arb_quantity(),
    ) {
        let stock = Decimal::new(stock, 3);
        let up = MovementType::Entrada.apply(stock, quantity).unwrap();
        let down = MovementType::Salida.apply(up, quantity).unwrap();
        prop_assert_eq!(down, stock);
    }

    /// A salida either fails or removes exactly its quantity
    #[test]
    fn prop_salida_conserves_stock(
        stock in 0i64..10_000_000,
        quantity in arb_quantity(),
    ) {
        let stock = Decimal::new(stock, 3);
        match MovementType::Salida.apply(stock, quantity) {
            Ok(after) => prop_assert_eq!(stock - after, quantity),
            Err(StockError::InsufficientStock { available, requested }) => {
                prop_assert_eq!(available, stock);
                prop_assert_eq!(requested, quantity);
                prop_assert!(quantity > stock);
            }
            Err(other) => prop_assert!(false, "unexpected error: {other}"),
        }
    }

    /// ajuste lands exactly on the requested level regardless of history
    #[test]
    fn prop_ajuste_is_absolute(
        stock in 0i64..10_000_000,
        target in 0i64..10_000_000,
    ) {
        let stock = Decimal::new(stock, 3);
        let target = Decimal::new(target, 3);
        prop_assert_eq!(MovementType::Ajuste.apply(stock, target), Ok(target));
    }
}
