//! Customer service

use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use shared::models::Customer;
use shared::validation;

/// Customer service
#[derive(Clone)]
pub struct CustomerService {
    db: PgPool,
}

/// Input for creating or updating a customer
#[derive(Debug, Deserialize)]
pub struct CustomerInput {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub notes: Option<String>,
}

const CUSTOMER_COLUMNS: &str =
    "id, name, phone, email, address, notes, created_at, updated_at";

impl CustomerService {
    /// Create a new CustomerService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    fn validate(input: &CustomerInput) -> AppResult<()> {
        validation::validate_name(&input.name).map_err(|msg| AppError::Validation {
            field: "name".to_string(),
            message: msg.to_string(),
            message_es: "El nombre no puede estar vacío".to_string(),
        })?;
        if let Some(email) = &input.email {
            validation::validate_email(email).map_err(|msg| AppError::Validation {
                field: "email".to_string(),
                message: msg.to_string(),
                message_es: "Formato de correo inválido".to_string(),
            })?;
        }
        Ok(())
    }

    /// Create a customer
    pub async fn create(&self, input: CustomerInput) -> AppResult<Customer> {
        Self::validate(&input)?;

        let customer = sqlx::query_as::<_, Customer>(&format!(
            r#"
            INSERT INTO customers (name, phone, email, address, notes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {CUSTOMER_COLUMNS}
            "#
        ))
        .bind(&input.name)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(&input.address)
        .bind(&input.notes)
        .fetch_one(&self.db)
        .await?;

        Ok(customer)
    }

    /// Update a customer
    pub async fn update(&self, customer_id: Uuid, input: CustomerInput) -> AppResult<Customer> {
        Self::validate(&input)?;

        let customer = sqlx::query_as::<_, Customer>(&format!(
            r#"
            UPDATE customers
            SET name = $1, phone = $2, email = $3, address = $4, notes = $5, updated_at = NOW()
            WHERE id = $6
            RETURNING {CUSTOMER_COLUMNS}
            "#
        ))
        .bind(&input.name)
        .bind(&input.phone)
        .bind(&input.email)
        .bind(&input.address)
        .bind(&input.notes)
        .bind(customer_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer".to_string()))?;

        Ok(customer)
    }

    /// Delete a customer; their sales and orders keep a null reference
    pub async fn delete(&self, customer_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1")
            .bind(customer_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Customer".to_string()));
        }

        Ok(())
    }

    /// Get a customer by id
    pub async fn get(&self, customer_id: Uuid) -> AppResult<Customer> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = $1"
        ))
        .bind(customer_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Customer".to_string()))?;

        Ok(customer)
    }

    /// List customers alphabetically
    pub async fn list(&self) -> AppResult<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers ORDER BY name ASC"
        ))
        .fetch_all(&self.db)
        .await?;

        Ok(customers)
    }
}
