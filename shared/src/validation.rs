//! Validation utilities for the Taller business management dashboard

use rust_decimal::Decimal;

/// Validate a monetary amount (prices, totals, expenses) is non-negative
pub fn validate_amount(amount: Decimal) -> Result<(), &'static str> {
    if amount < Decimal::ZERO {
        return Err("Amount cannot be negative");
    }
    Ok(())
}

/// Validate a sale/order quantity is a positive whole number
pub fn validate_quantity(quantity: i32) -> Result<(), &'static str> {
    if quantity <= 0 {
        return Err("Quantity must be greater than zero");
    }
    Ok(())
}

/// Validate a bill-of-materials link quantity is positive
pub fn validate_link_quantity(quantity: Decimal) -> Result<(), &'static str> {
    if quantity <= Decimal::ZERO {
        return Err("Material quantity per unit must be greater than zero");
    }
    Ok(())
}

/// Validate an advance payment against the agreed price
pub fn validate_advance_payment(
    advance: Decimal,
    agreed_price: Option<Decimal>,
) -> Result<(), &'static str> {
    if advance < Decimal::ZERO {
        return Err("Advance payment cannot be negative");
    }
    if let Some(agreed) = agreed_price {
        if advance > agreed {
            return Err("Advance payment cannot exceed the agreed price");
        }
    }
    Ok(())
}

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

/// Validate password strength
pub fn validate_password(password: &str) -> Result<(), &'static str> {
    if password.len() < 8 {
        return Err("Password must be at least 8 characters");
    }
    Ok(())
}

/// Validate a required name field is non-empty after trimming
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("Name cannot be empty");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_amount() {
        assert!(validate_amount(Decimal::from(10)).is_ok());
        assert!(validate_amount(Decimal::ZERO).is_ok());
        assert!(validate_amount(Decimal::from(-1)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-3).is_err());
    }

    #[test]
    fn test_validate_link_quantity() {
        assert!(validate_link_quantity(Decimal::new(5, 1)).is_ok());
        assert!(validate_link_quantity(Decimal::ZERO).is_err());
    }

    #[test]
    fn test_validate_advance_payment() {
        assert!(validate_advance_payment(Decimal::from(50), Some(Decimal::from(100))).is_ok());
        assert!(validate_advance_payment(Decimal::from(100), Some(Decimal::from(100))).is_ok());
        assert!(validate_advance_payment(Decimal::from(101), Some(Decimal::from(100))).is_err());
        assert!(validate_advance_payment(Decimal::from(-1), None).is_err());
        assert!(validate_advance_payment(Decimal::from(5), None).is_ok());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("test@example.com").is_ok());
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("@.").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("password123").is_ok());
        assert!(validate_password("short").is_err());
    }

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Collar de perlas").is_ok());
        assert!(validate_name("   ").is_err());
    }
}
