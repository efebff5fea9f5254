//! Business logic services for the Taller dashboard backend

pub mod auth;
pub mod customer;
pub mod expense;
pub mod inventory;
pub mod material;
pub mod note;
pub mod order;
pub mod product;
pub mod reporting;
pub mod sale;

pub use auth::AuthService;
pub use customer::CustomerService;
pub use expense::ExpenseService;
pub use inventory::InventoryService;
pub use material::MaterialService;
pub use note::NoteService;
pub use order::OrderService;
pub use product::ProductService;
pub use reporting::ReportingService;
pub use sale::SaleService;
