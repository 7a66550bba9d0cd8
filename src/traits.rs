//! Collaborator traits for storage and gateway abstraction

use async_trait::async_trait;

use crate::types::*;

/// Storage abstraction for internal collection records
///
/// Implementations must make `update` conditional: two overlapping
/// reconciliations of the same collection may both reach the update step,
/// and only one of them may report a changed row.
#[async_trait]
pub trait CollectionStore: Send + Sync {
    /// Resolve the collection identified by the caller's fields
    async fn find(&self, key: &CollectionKey) -> ReconcileResult<Option<CollectionRecord>>;

    /// Finalize a collection; returns true iff a record was actually changed
    async fn update(&self, record: &CollectionRecord) -> ReconcileResult<bool>;

    /// List the collections of one branch, client and day with the given statuses
    async fn list(&self, query: &CollectionQuery) -> ReconcileResult<Vec<CollectionRecord>>;
}

/// Lookup of gateway-linked billing metadata
#[async_trait]
pub trait BillLinkStore: Send + Sync {
    /// Get the bill link for a collection
    async fn find_by_collection(&self, collection_id: i64) -> ReconcileResult<Option<BillLink>>;
}

/// Lookup of payment submission logs
#[async_trait]
pub trait PaymentLogStore: Send + Sync {
    /// Get the submission log written for a payer transaction id
    async fn find_by_transaction(
        &self,
        transaction_id: &str,
    ) -> ReconcileResult<Option<SubmissionLog>>;
}

/// Outbound payment status queries
///
/// `Ok(None)` signals a transport failure or timeout. An `Err` is treated the
/// same way by the orchestrator.
#[async_trait]
pub trait PaymentGatewayClient: Send + Sync {
    async fn query_status(
        &self,
        request: &PaymentStatusRequest,
    ) -> ReconcileResult<Option<PaymentStatusResponse>>;
}

/// Outbound dispute filing
///
/// `Ok(None)` signals a transport failure or timeout.
#[async_trait]
pub trait DisputeGatewayClient: Send + Sync {
    async fn file_dispute(
        &self,
        request: &DisputeRequest,
    ) -> ReconcileResult<Option<DisputeResponse>>;
}
