//! Error handling for the Taller dashboard backend
//!
//! Provides consistent error responses in English and Spanish

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use rust_decimal::Decimal;
use serde::Serialize;
use shared::models::StockError;
use thiserror::Error;
use uuid::Uuid;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication errors
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    // Validation errors
    #[error("Validation error: {message}")]
    Validation {
        field: String,
        message: String,
        message_es: String,
    },

    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Inventory errors
    #[error("Invalid movement quantity: {quantity}")]
    InvalidQuantity { quantity: Decimal },

    #[error("Insufficient stock of {material}: {available} available, {requested} requested")]
    InsufficientStock {
        material: String,
        available: Decimal,
        requested: Decimal,
    },

    #[error("Material not found: {0}")]
    MaterialNotFound(Uuid),

    // Fulfillment errors
    #[error("Order not found: {0}")]
    OrderNotFound(Uuid),

    #[error("Order {0} has no product associated")]
    MissingProduct(Uuid),

    #[error("Order {0} was already delivered")]
    AlreadyDelivered(Uuid),

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl AppError {
    /// Attach the material name to a stock arithmetic failure
    pub fn from_stock(err: StockError, material: &str) -> Self {
        match err {
            StockError::InvalidQuantity { quantity } => AppError::InvalidQuantity { quantity },
            StockError::InsufficientStock {
                available,
                requested,
            } => AppError::InsufficientStock {
                material: material.to_string(),
                available,
                requested,
            },
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message_en: String,
    pub message_es: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_detail) = match &self {
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail {
                    code: "INVALID_CREDENTIALS".to_string(),
                    message_en: "Invalid email or password".to_string(),
                    message_es: "Correo o contraseña incorrectos".to_string(),
                    field: None,
                },
            ),
            AppError::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail {
                    code: "TOKEN_EXPIRED".to_string(),
                    message_en: "Token has expired".to_string(),
                    message_es: "El token ha expirado".to_string(),
                    field: None,
                },
            ),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail {
                    code: "INVALID_TOKEN".to_string(),
                    message_en: "Invalid token".to_string(),
                    message_es: "Token inválido".to_string(),
                    field: None,
                },
            ),
            AppError::Validation {
                field,
                message,
                message_es,
            } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "VALIDATION_ERROR".to_string(),
                    message_en: message.clone(),
                    message_es: message_es.clone(),
                    field: Some(field.clone()),
                },
            ),
            AppError::DuplicateEntry(field) => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    code: "DUPLICATE_ENTRY".to_string(),
                    message_en: format!("A record with this {} already exists", field),
                    message_es: format!("Ya existe un registro con este {}", field),
                    field: Some(field.clone()),
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "NOT_FOUND".to_string(),
                    message_en: format!("{} not found", resource),
                    message_es: format!("No se encontró {}", resource),
                    field: None,
                },
            ),
            AppError::InvalidQuantity { quantity } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    code: "INVALID_QUANTITY".to_string(),
                    message_en: format!("Invalid movement quantity: {}", quantity),
                    message_es: format!("Cantidad de movimiento inválida: {}", quantity),
                    field: Some("quantity".to_string()),
                },
            ),
            AppError::InsufficientStock {
                material,
                available,
                requested,
            } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail {
                    code: "INSUFFICIENT_STOCK".to_string(),
                    message_en: format!(
                        "Insufficient stock of {}: {} available, {} requested",
                        material, available, requested
                    ),
                    message_es: format!(
                        "Stock insuficiente de {}: {} disponible, {} solicitado",
                        material, available, requested
                    ),
                    field: None,
                },
            ),
            AppError::MaterialNotFound(id) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "MATERIAL_NOT_FOUND".to_string(),
                    message_en: format!("Material {} not found", id),
                    message_es: format!("No se encontró el material {}", id),
                    field: None,
                },
            ),
            AppError::OrderNotFound(id) => (
                StatusCode::NOT_FOUND,
                ErrorDetail {
                    code: "ORDER_NOT_FOUND".to_string(),
                    message_en: format!("Order {} not found", id),
                    message_es: format!("No se encontró la orden {}", id),
                    field: None,
                },
            ),
            AppError::MissingProduct(id) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ErrorDetail {
                    code: "MISSING_PRODUCT".to_string(),
                    message_en: format!("Order {} has no product associated", id),
                    message_es: format!("La orden {} no tiene un producto asociado", id),
                    field: None,
                },
            ),
            AppError::AlreadyDelivered(id) => (
                StatusCode::CONFLICT,
                ErrorDetail {
                    code: "ALREADY_DELIVERED".to_string(),
                    message_en: format!("Order {} was already delivered", id),
                    message_es: format!("La orden {} ya fue entregada", id),
                    field: None,
                },
            ),
            AppError::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "DATABASE_ERROR".to_string(),
                    message_en: "A database error occurred".to_string(),
                    message_es: "Ocurrió un error de base de datos".to_string(),
                    field: None,
                },
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message_en: msg.clone(),
                    message_es: "Error interno del servidor".to_string(),
                    field: None,
                },
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail {
                    code: "INTERNAL_ERROR".to_string(),
                    message_en: "An internal server error occurred".to_string(),
                    message_es: "Error interno del servidor".to_string(),
                    field: None,
                },
            ),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        (status, Json(ErrorResponse { error: error_detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
