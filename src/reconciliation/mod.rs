//! Reconciliation of internal collections against gateway payment status
//!
//! The orchestrator resolves a collection through the internal stores,
//! queries the gateway, and either finalizes the collection directly
//! (status 50) or files a dispute first (status 10/30).

pub mod orchestrator;
pub mod outcome;

pub use orchestrator::*;
pub use outcome::*;
