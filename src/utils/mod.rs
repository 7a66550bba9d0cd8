//! Utility modules

pub mod journal;
pub mod memory_gateway;
pub mod memory_storage;
pub mod validation;

pub use journal::*;
pub use memory_gateway::*;
pub use memory_storage::*;
pub use validation::*;
