//! Pure financial computation layer
//!
//! Everything in this module is a synchronous, total function over in-memory
//! snapshots of the domain collections. No I/O, no hidden state; safe to call
//! concurrently from any number of requests.

mod analysis;
mod costing;
mod health;

pub use analysis::*;
pub use costing::*;
pub use health::*;
