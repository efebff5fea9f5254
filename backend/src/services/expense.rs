//! Operating expense service

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::{Expense, ExpenseCategory};
use shared::types::DateRange;
use shared::validation;

/// Expense service
#[derive(Clone)]
pub struct ExpenseService {
    db: PgPool,
}

/// Input for creating or updating an expense
#[derive(Debug, Deserialize)]
pub struct ExpenseInput {
    pub concept: String,
    pub category: ExpenseCategory,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub description: Option<String>,
}

const EXPENSE_COLUMNS: &str =
    "id, concept, category, amount, date, description, created_at, updated_at";

impl ExpenseService {
    /// Create a new ExpenseService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    fn validate(input: &ExpenseInput) -> AppResult<()> {
        validation::validate_name(&input.concept).map_err(|msg| AppError::Validation {
            field: "concept".to_string(),
            message: msg.to_string(),
            message_es: "El concepto no puede estar vacío".to_string(),
        })?;
        validation::validate_amount(input.amount).map_err(|msg| AppError::Validation {
            field: "amount".to_string(),
            message: msg.to_string(),
            message_es: "El monto no puede ser negativo".to_string(),
        })?;
        Ok(())
    }

    /// Create an expense
    pub async fn create(&self, input: ExpenseInput) -> AppResult<Expense> {
        Self::validate(&input)?;

        let expense = sqlx::query_as::<_, Expense>(&format!(
            r#"
            INSERT INTO expenses (concept, category, amount, date, description)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {EXPENSE_COLUMNS}
            "#
        ))
        .bind(&input.concept)
        .bind(input.category)
        .bind(input.amount)
        .bind(input.date)
        .bind(&input.description)
        .fetch_one(&self.db)
        .await?;

        Ok(expense)
    }

    /// Update an expense
    pub async fn update(&self, expense_id: Uuid, input: ExpenseInput) -> AppResult<Expense> {
        Self::validate(&input)?;

        let expense = sqlx::query_as::<_, Expense>(&format!(
            r#"
            UPDATE expenses
            SET concept = $1, category = $2, amount = $3, date = $4, description = $5,
                updated_at = NOW()
            WHERE id = $6
            RETURNING {EXPENSE_COLUMNS}
            "#
        ))
        .bind(&input.concept)
        .bind(input.category)
        .bind(input.amount)
        .bind(input.date)
        .bind(&input.description)
        .bind(expense_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Expense".to_string()))?;

        Ok(expense)
    }

    /// Delete an expense
    pub async fn delete(&self, expense_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = $1")
            .bind(expense_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Expense".to_string()));
        }

        Ok(())
    }

    /// Get an expense by id
    pub async fn get(&self, expense_id: Uuid) -> AppResult<Expense> {
        let expense = sqlx::query_as::<_, Expense>(&format!(
            "SELECT {EXPENSE_COLUMNS} FROM expenses WHERE id = $1"
        ))
        .bind(expense_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Expense".to_string()))?;

        Ok(expense)
    }

    /// List expenses in a date range, newest first
    pub async fn list(
        &self,
        category: Option<ExpenseCategory>,
        range: &DateRange,
    ) -> AppResult<Vec<Expense>> {
        let (start, end) = range.bounds();

        let expenses = sqlx::query_as::<_, Expense>(&format!(
            r#"
            SELECT {EXPENSE_COLUMNS}
            FROM expenses
            WHERE ($1::expense_category IS NULL OR category = $1)
              AND date BETWEEN $2 AND $3
            ORDER BY date DESC, created_at DESC
            "#
        ))
        .bind(category)
        .bind(start)
        .bind(end)
        .fetch_all(&self.db)
        .await?;

        Ok(expenses)
    }
}
