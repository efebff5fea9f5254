//! Request middleware for the Taller dashboard backend

mod auth;

pub use auth::{auth_middleware, AuthUser, CurrentUser};
