//! Core types and data structures for the reconciliation workflow

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Billers the collection system settles payments for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ClientType {
    /// Rural electrification board
    Breb,
    /// Water supply and sewerage authority
    Wasa,
    /// Dhaka electric supply company
    Desco,
    /// Dhaka power distribution company
    Dpdc,
}

/// Caller's assertion about which gateway status a collection currently has
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueClaim {
    /// Biller the collection belongs to
    pub client_id: i32,
    pub client_type: ClientType,
    /// Issue the caller believes applies (1, 2 or 3)
    pub requested_issue_id: i32,
    /// Collection source/channel identifier
    pub coll_from: String,
    pub bill_number: Option<String>,
    pub branch_code: Option<String>,
}

impl IssueClaim {
    /// Create a claim with the required identifying fields
    pub fn new(
        client_id: i32,
        client_type: ClientType,
        requested_issue_id: i32,
        coll_from: String,
    ) -> Self {
        Self {
            client_id,
            client_type,
            requested_issue_id,
            coll_from,
            bill_number: None,
            branch_code: None,
        }
    }

    /// Attach the bill number used to narrow the collection lookup
    pub fn with_bill_number(mut self, bill_number: String) -> Self {
        self.bill_number = Some(bill_number);
        self
    }

    /// Attach the branch code used to narrow the collection lookup
    pub fn with_branch_code(mut self, branch_code: String) -> Self {
        self.branch_code = Some(branch_code);
        self
    }

    /// Key used to resolve the internal collection record
    pub fn collection_key(&self) -> CollectionKey {
        CollectionKey {
            client_id: self.client_id,
            client_type: self.client_type,
            coll_from: self.coll_from.clone(),
            bill_number: self.bill_number.clone(),
            branch_code: self.branch_code.clone(),
        }
    }
}

/// Identifying fields for a collection record lookup
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionKey {
    pub client_id: i32,
    pub client_type: ClientType,
    pub coll_from: String,
    pub bill_number: Option<String>,
    pub branch_code: Option<String>,
}

/// Filter for listing a branch's collections on a single day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionQuery {
    pub branch_code: String,
    pub client_id: i32,
    /// Collection status ids to include; at least one is required
    pub coll_status_ids: Vec<i32>,
    pub coll_date: NaiveDate,
}

impl CollectionQuery {
    /// Query for collections recorded today (local time)
    pub fn today(branch_code: String, client_id: i32, coll_status_ids: Vec<i32>) -> Self {
        Self::on(
            branch_code,
            client_id,
            coll_status_ids,
            chrono::Local::now().date_naive(),
        )
    }

    /// Query for collections recorded on `coll_date`
    pub fn on(
        branch_code: String,
        client_id: i32,
        coll_status_ids: Vec<i32>,
        coll_date: NaiveDate,
    ) -> Self {
        Self {
            branch_code,
            client_id,
            coll_status_ids,
            coll_date,
        }
    }

    /// Whether `record` falls inside this filter
    pub fn matches(&self, record: &CollectionRecord) -> bool {
        record.branch_code == self.branch_code
            && record.client_id == self.client_id
            && record.coll_date == self.coll_date
            && self.coll_status_ids.contains(&record.coll_status_id)
    }
}

/// Internally recorded bill collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionRecord {
    /// Unique identifier of the collection row
    pub collection_id: i64,
    pub client_id: i32,
    pub bill_number: String,
    pub branch_code: String,
    /// Amount collected from the customer
    pub amount: BigDecimal,
    pub coll_date: NaiveDate,
    /// Internal collection status id
    pub coll_status_id: i32,
    /// Whether the record has already been finalized by a reconciliation
    pub reconciled: bool,
}

impl CollectionRecord {
    /// Create an unreconciled collection record
    pub fn new(
        collection_id: i64,
        client_id: i32,
        bill_number: String,
        branch_code: String,
        amount: BigDecimal,
        coll_date: NaiveDate,
    ) -> Self {
        Self {
            collection_id,
            client_id,
            bill_number,
            branch_code,
            amount,
            coll_date,
            coll_status_id: 1,
            reconciled: false,
        }
    }
}

/// Gateway-linked billing metadata for a collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillLink {
    pub collection_id: i64,
    /// Payer transaction id sent to the gateway at submission
    pub transaction_id: String,
    /// Account identifier (SMS account number) known to the gateway
    pub account_reference: String,
}

/// Log entry written when the original payment was submitted to the gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionLog {
    pub transaction_id: String,
    /// Reference number assigned by the gateway
    pub reference_number: String,
    pub request_id: String,
}

/// Outbound payment status query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatusRequest {
    pub account_reference: String,
    pub channel_id: String,
    pub reference_number: String,
    pub transaction_id: String,
}

/// Gateway reply to a payment status query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatusResponse {
    /// Gateway-level success marker ("000" on success)
    pub response_code: String,
    pub message: Option<String>,
    pub result: Option<PaymentStatus>,
}

/// Current payment status as reported by the gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatus {
    pub account_reference: String,
    pub reference_number: String,
    pub transaction_id: String,
    /// Business status code ("10", "30" or "50")
    pub status_code: String,
    pub message: Option<String>,
}

/// Outbound dispute filing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisputeRequest {
    pub account_reference: String,
    pub channel_id: String,
    pub reference_number: String,
    pub transaction_id: String,
    pub dispute_type: i32,
}

/// Gateway reply to a dispute filing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisputeResponse {
    /// Gateway-reported dispute status (200 accepted, 202 pending review)
    pub status: i32,
    pub data: Option<DisputeData>,
    #[serde(default)]
    pub errors: Option<Vec<DisputeErrorEntry>>,
}

/// Payload of an accepted dispute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisputeData {
    pub message: Option<String>,
}

/// Single error entry returned by the dispute API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisputeErrorEntry {
    pub code: String,
    pub message: String,
}

impl std::fmt::Display for DisputeErrorEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

/// Errors that cross the reconciliation boundary
///
/// Expected business conditions are reported inside a
/// [`ReconciliationResult`](crate::reconciliation::ReconciliationResult).
/// `Validation` is converted into a rejected result before it reaches the
/// caller; the remaining variants are infrastructure faults.
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Gateway error: {0}")]
    Gateway(String),
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<config::ConfigError> for ReconcileError {
    fn from(err: config::ConfigError) -> Self {
        ReconcileError::Config(err.to_string())
    }
}

/// Result type for reconciliation operations
pub type ReconcileResult<T> = Result<T, ReconcileError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collection_key_carries_identifying_fields() {
        let claim = IssueClaim::new(31, ClientType::Breb, 1, "MTB".to_string())
            .with_bill_number("B-1001".to_string())
            .with_branch_code("0502".to_string());

        let key = claim.collection_key();
        assert_eq!(key.client_id, 31);
        assert_eq!(key.coll_from, "MTB");
        assert_eq!(key.bill_number.as_deref(), Some("B-1001"));
        assert_eq!(key.branch_code.as_deref(), Some("0502"));
    }

    #[test]
    fn test_collection_query_matches_every_filter() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let query = CollectionQuery::on("0502".to_string(), 31, vec![1, 4], day);
        let record = CollectionRecord::new(
            1001,
            31,
            "B-1001".to_string(),
            "0502".to_string(),
            BigDecimal::from(1250),
            day,
        );
        assert!(query.matches(&record));

        let mut other_status = record.clone();
        other_status.coll_status_id = 2;
        assert!(!query.matches(&other_status));

        let mut other_day = record.clone();
        other_day.coll_date = day.succ_opt().unwrap();
        assert!(!query.matches(&other_day));

        let mut other_branch = record;
        other_branch.branch_code = "0601".to_string();
        assert!(!query.matches(&other_branch));
    }

    #[test]
    fn test_dispute_response_deserializes_without_errors() {
        let response: DisputeResponse =
            serde_json::from_str(r#"{"status":202,"data":null}"#).unwrap();
        assert_eq!(response.status, 202);
        assert!(response.data.is_none());
        assert!(response.errors.is_none());
    }

    #[test]
    fn test_dispute_error_display() {
        let entry = DisputeErrorEntry {
            code: "E42".to_string(),
            message: "Already disputed".to_string(),
        };
        assert_eq!(entry.to_string(), "[E42] Already disputed");
    }
}
