//! Database models for the Taller dashboard backend
//!
//! Re-exports models from the shared crate

pub use shared::models::*;
