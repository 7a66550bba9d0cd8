//! Structured result returned by a reconciliation attempt

use serde::{Deserialize, Serialize};

use crate::issue_status::IssueStatusMap;
use crate::types::*;

/// How the caller should treat a reconciliation result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OutcomeKind {
    /// The claim was rejected before any collaborator was contacted
    Rejected,
    /// A gateway call failed or returned nothing
    UpstreamUnavailable,
    /// The workflow reached a business decision (successful or not)
    Completed,
}

/// Comparison of the requested issue against the gateway's actual status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssueMatchInfo {
    pub requested_issue_id: i32,
    pub actual_issue_id: Option<i32>,
    pub is_matched: bool,
    pub actual_status: String,
    pub actual_label: String,
}

/// Payment status echoed back from the gateway
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentStatusInfo {
    pub response_code: String,
    pub account_reference: Option<String>,
    pub reference_number: Option<String>,
    pub transaction_id: Option<String>,
    pub status: Option<String>,
    pub status_label: Option<String>,
    pub message: Option<String>,
}

impl PaymentStatusInfo {
    /// Echo of a gateway reply that carried no usable payload
    pub fn unsuccessful(response: &PaymentStatusResponse) -> Self {
        Self {
            response_code: response.response_code.clone(),
            message: response.message.clone(),
            ..Self::default()
        }
    }

    /// Full echo of a successful status query
    pub fn from_status(response_code: &str, status: &PaymentStatus) -> Self {
        Self {
            response_code: response_code.to_string(),
            account_reference: Some(status.account_reference.clone()),
            reference_number: Some(status.reference_number.clone()),
            transaction_id: Some(status.transaction_id.clone()),
            status: Some(status.status_code.clone()),
            status_label: Some(IssueStatusMap::label_for(&status.status_code).to_string()),
            message: status.message.clone(),
        }
    }
}

/// What happened with the dispute step
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisputeInfo {
    pub attempted: bool,
    pub api_call_succeeded: bool,
    pub dispute_type_sent: Option<i32>,
    pub dispute_type_label: Option<String>,
    pub dispute_status: Option<i32>,
    pub message: Option<String>,
    /// Gateway errors in the order they were returned
    pub errors: Vec<DisputeErrorEntry>,
}

impl DisputeInfo {
    /// Dispute step skipped because the status needs no correction
    pub fn not_attempted() -> Self {
        Self::default()
    }
}

/// What happened with the collection update step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionUpdateInfo {
    pub attempted: bool,
    pub is_successful: bool,
    pub collection_id: i64,
    pub message: String,
}

impl CollectionUpdateInfo {
    /// Update ran; `updated` is whether a record was changed
    pub fn applied(collection_id: i64, updated: bool, success_message: &str) -> Self {
        Self {
            attempted: true,
            is_successful: updated,
            collection_id,
            message: if updated {
                success_message.to_string()
            } else {
                "Collection update failed. Zero rows affected.".to_string()
            },
        }
    }

    /// Update was not attempted
    pub fn skipped(collection_id: i64, reason: String) -> Self {
        Self {
            attempted: false,
            is_successful: false,
            collection_id,
            message: reason,
        }
    }
}

/// The sole artifact returned for a reconciliation attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconciliationResult {
    pub success: bool,
    pub message: String,
    pub outcome: OutcomeKind,
    pub issue_match: Option<IssueMatchInfo>,
    pub payment_status: Option<PaymentStatusInfo>,
    pub dispute: Option<DisputeInfo>,
    pub collection_update: Option<CollectionUpdateInfo>,
}

impl ReconciliationResult {
    /// Claim rejected during validation
    pub fn rejected(message: String) -> Self {
        Self::failure(OutcomeKind::Rejected, message)
    }

    /// Business failure with nothing else to report
    pub fn failed(message: String) -> Self {
        Self::failure(OutcomeKind::Completed, message)
    }

    /// Gateway could not be reached
    pub fn upstream_unavailable(message: String) -> Self {
        Self::failure(OutcomeKind::UpstreamUnavailable, message)
    }

    fn failure(outcome: OutcomeKind, message: String) -> Self {
        Self {
            success: false,
            message,
            outcome,
            issue_match: None,
            payment_status: None,
            dispute: None,
            collection_update: None,
        }
    }

    /// HTTP status the inbound surface should answer with
    pub fn http_status(&self) -> u16 {
        match self.outcome {
            OutcomeKind::Rejected => 400,
            OutcomeKind::UpstreamUnavailable => 502,
            OutcomeKind::Completed => 200,
        }
    }

    /// Whether the gateway was unreachable during this attempt
    pub fn is_upstream_unavailable(&self) -> bool {
        self.outcome == OutcomeKind::UpstreamUnavailable
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(ReconciliationResult::rejected("bad".to_string()).http_status(), 400);
        assert_eq!(
            ReconciliationResult::upstream_unavailable("down".to_string()).http_status(),
            502
        );
        assert_eq!(ReconciliationResult::failed("mismatch".to_string()).http_status(), 200);
    }

    #[test]
    fn test_serializes_with_camel_case_fields() {
        let mut result = ReconciliationResult::failed("Issue mismatch".to_string());
        result.issue_match = Some(IssueMatchInfo {
            requested_issue_id: 2,
            actual_issue_id: Some(3),
            is_matched: false,
            actual_status: "10".to_string(),
            actual_label: "Pending".to_string(),
        });
        result.collection_update = Some(CollectionUpdateInfo::applied(7, false, "ok"));

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["outcome"], "COMPLETED");
        assert_eq!(json["issueMatch"]["requestedIssueId"], 2);
        assert_eq!(json["issueMatch"]["isMatched"], false);
        assert_eq!(json["issueMatch"]["actualLabel"], "Pending");
        assert_eq!(json["collectionUpdate"]["isSuccessful"], false);
        assert_eq!(
            json["collectionUpdate"]["message"],
            "Collection update failed. Zero rows affected."
        );
    }

    #[test]
    fn test_payment_status_echo() {
        let status = PaymentStatus {
            account_reference: "SMS-1".to_string(),
            reference_number: "REF-1".to_string(),
            transaction_id: "TX-1".to_string(),
            status_code: "30".to_string(),
            message: Some("Waiting".to_string()),
        };
        let info = PaymentStatusInfo::from_status("000", &status);
        assert_eq!(info.status.as_deref(), Some("30"));
        assert_eq!(info.status_label.as_deref(), Some("Waiting for Acknowledge"));
    }
}
