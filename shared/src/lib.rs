//! Shared types and models for the Taller business management dashboard
//!
//! This crate contains the domain model and the pure finance layer shared
//! between the backend and any other components of the system.

pub mod finance;
pub mod models;
pub mod types;
pub mod validation;

pub use finance::*;
pub use models::*;
pub use types::*;
pub use validation::*;
