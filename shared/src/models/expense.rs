//! Operating expense models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Expense categories
///
/// `servicios` (utilities: electricity, water, internet) is the fixed-cost
/// bucket; everything else is variable. Unknown categories arriving on the
/// wire are bucketed under `otros`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, sqlx::Type)]
#[sqlx(type_name = "expense_category", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ExpenseCategory {
    Envio,
    Publicidad,
    Servicios,
    Herramientas,
    Otros,
}

impl<'de> Deserialize<'de> for ExpenseCategory {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(ExpenseCategory::from_str_lossy(&raw))
    }
}

impl ExpenseCategory {
    /// Parse a category name, bucketing anything unrecognized under `otros`
    pub fn from_str_lossy(raw: &str) -> Self {
        match raw {
            "envio" => ExpenseCategory::Envio,
            "publicidad" => ExpenseCategory::Publicidad,
            "servicios" => ExpenseCategory::Servicios,
            "herramientas" => ExpenseCategory::Herramientas,
            _ => ExpenseCategory::Otros,
        }
    }

    pub const ALL: [ExpenseCategory; 5] = [
        ExpenseCategory::Envio,
        ExpenseCategory::Publicidad,
        ExpenseCategory::Servicios,
        ExpenseCategory::Herramientas,
        ExpenseCategory::Otros,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ExpenseCategory::Envio => "envio",
            ExpenseCategory::Publicidad => "publicidad",
            ExpenseCategory::Servicios => "servicios",
            ExpenseCategory::Herramientas => "herramientas",
            ExpenseCategory::Otros => "otros",
        }
    }

    /// Whether the category counts as a fixed cost in break-even analysis
    pub fn is_fixed(&self) -> bool {
        matches!(self, ExpenseCategory::Servicios)
    }
}

/// An operating expense
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Expense {
    pub id: Uuid,
    pub concept: String,
    pub category: ExpenseCategory,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_servicios_is_fixed() {
        for category in ExpenseCategory::ALL {
            assert_eq!(category.is_fixed(), category == ExpenseCategory::Servicios);
        }
    }

    #[test]
    fn test_unknown_category_buckets_to_otros() {
        assert_eq!(
            ExpenseCategory::from_str_lossy("publicidad"),
            ExpenseCategory::Publicidad
        );
        assert_eq!(
            ExpenseCategory::from_str_lossy("suscripciones"),
            ExpenseCategory::Otros
        );
        assert_eq!(ExpenseCategory::from_str_lossy(""), ExpenseCategory::Otros);
    }
}
