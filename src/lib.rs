//! # Dispute Reconciliation
//!
//! Reconciles internally recorded bill collections against the payment
//! gateway's authoritative status, filing a dispute with the gateway when its
//! status does not yet reflect full acknowledgement.
//!
//! ## Features
//!
//! - **Issue/status mapping**: One static table for issue ids, gateway statuses, labels and dispute types
//! - **Reconciliation workflow**: Linear pipeline with explicit early exits and a single structured result
//! - **Dispute handling**: Disputes filed for pending and waiting statuses, collection finalized only on acceptance
//! - **Collection listing**: Per-branch, per-day collection queries filtered by status
//! - **Storage abstraction**: Stores and gateway clients are traits, with in-memory implementations for testing
//!
//! ## Quick Start
//!
//! ```rust
//! use dispute_reconciliation::{IssueStatusMap, ReconciliationOrchestrator};
//!
//! assert_eq!(IssueStatusMap::status_for(1), Some("50"));
//! assert_eq!(IssueStatusMap::dispute_type_for("10"), Some(10));
//!
//! // Wire your own stores and gateway clients into the orchestrator:
//! // let orchestrator = ReconciliationOrchestrator::new(collections, links, logs, status, dispute);
//! // let result = orchestrator.reconcile(&claim).await?;
//! ```

pub mod issue_status;
pub mod reconciliation;
pub mod settings;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use issue_status::*;
pub use reconciliation::*;
pub use settings::*;
pub use traits::*;
pub use types::*;
