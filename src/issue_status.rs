//! Mapping between caller issue ids and gateway payment status codes

/// Gateway status: paid and acknowledged by the biller
pub const STATUS_PAID_ACKNOWLEDGED: &str = "50";
/// Gateway status: paid, waiting for the biller to acknowledge
pub const STATUS_WAITING_FOR_ACKNOWLEDGE: &str = "30";
/// Gateway status: payment still pending
pub const STATUS_PENDING: &str = "10";

/// Dispute type asking the gateway to acknowledge the payment
pub const DISPUTE_ACKNOWLEDGE: i32 = 5;
/// Dispute type asking the gateway to reset the payment
pub const DISPUTE_RESET: i32 = 10;

/// One row of the issue/status table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssueMapping {
    pub issue_id: i32,
    pub status_code: &'static str,
    pub label: &'static str,
    pub dispute_type: Option<i32>,
}

const ISSUE_TABLE: [IssueMapping; 3] = [
    IssueMapping {
        issue_id: 1,
        status_code: STATUS_PAID_ACKNOWLEDGED,
        label: "Paid Acknowledged",
        dispute_type: None,
    },
    IssueMapping {
        issue_id: 2,
        status_code: STATUS_WAITING_FOR_ACKNOWLEDGE,
        label: "Waiting for Acknowledge",
        dispute_type: Some(DISPUTE_ACKNOWLEDGE),
    },
    IssueMapping {
        issue_id: 3,
        status_code: STATUS_PENDING,
        label: "Pending",
        dispute_type: Some(DISPUTE_RESET),
    },
];

/// Static issue/status/dispute-type table
///
/// Every direction of the mapping is answered from the same rows, so issue
/// ids, status codes, labels and dispute types cannot drift apart.
pub struct IssueStatusMap;

impl IssueStatusMap {
    /// All known mappings, ordered by issue id
    pub fn entries() -> &'static [IssueMapping] {
        &ISSUE_TABLE
    }

    /// Gateway status expected for an issue id, `None` if the id is unknown
    pub fn status_for(issue_id: i32) -> Option<&'static str> {
        ISSUE_TABLE
            .iter()
            .find(|m| m.issue_id == issue_id)
            .map(|m| m.status_code)
    }

    /// Issue id corresponding to a gateway status, `None` if unrecognised
    pub fn issue_for(status_code: &str) -> Option<i32> {
        Self::mapping_for(status_code).map(|m| m.issue_id)
    }

    /// Human label for a gateway status
    pub fn label_for(status_code: &str) -> &'static str {
        Self::mapping_for(status_code)
            .map(|m| m.label)
            .unwrap_or("Unknown")
    }

    /// Dispute type to file for a gateway status; only "10" and "30" have one
    pub fn dispute_type_for(status_code: &str) -> Option<i32> {
        Self::mapping_for(status_code).and_then(|m| m.dispute_type)
    }

    /// Human label for a dispute type code
    pub fn dispute_type_label(dispute_type: i32) -> &'static str {
        match dispute_type {
            DISPUTE_ACKNOWLEDGE => "Acknowledge (5)",
            DISPUTE_RESET => "Reset (10)",
            _ => "Unknown",
        }
    }

    fn mapping_for(status_code: &str) -> Option<&'static IssueMapping> {
        ISSUE_TABLE.iter().find(|m| m.status_code == status_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_for_known_issues() {
        assert_eq!(IssueStatusMap::status_for(1), Some("50"));
        assert_eq!(IssueStatusMap::status_for(2), Some("30"));
        assert_eq!(IssueStatusMap::status_for(3), Some("10"));
    }

    #[test]
    fn test_status_for_unknown_issue() {
        assert_eq!(IssueStatusMap::status_for(0), None);
        assert_eq!(IssueStatusMap::status_for(4), None);
        assert_eq!(IssueStatusMap::status_for(-1), None);
    }

    #[test]
    fn test_issue_for_is_inverse_of_status_for() {
        for mapping in IssueStatusMap::entries() {
            let status = IssueStatusMap::status_for(mapping.issue_id).unwrap();
            assert_eq!(IssueStatusMap::issue_for(status), Some(mapping.issue_id));
        }
        assert_eq!(IssueStatusMap::issue_for("99"), None);
        assert_eq!(IssueStatusMap::issue_for(""), None);
    }

    #[test]
    fn test_labels() {
        assert_eq!(IssueStatusMap::label_for("50"), "Paid Acknowledged");
        assert_eq!(IssueStatusMap::label_for("30"), "Waiting for Acknowledge");
        assert_eq!(IssueStatusMap::label_for("10"), "Pending");
        assert_eq!(IssueStatusMap::label_for("20"), "Unknown");
    }

    #[test]
    fn test_dispute_types() {
        assert_eq!(IssueStatusMap::dispute_type_for("50"), None);
        assert_eq!(IssueStatusMap::dispute_type_for("30"), Some(DISPUTE_ACKNOWLEDGE));
        assert_eq!(IssueStatusMap::dispute_type_for("10"), Some(DISPUTE_RESET));
        assert_eq!(IssueStatusMap::dispute_type_for("40"), None);

        assert_eq!(IssueStatusMap::dispute_type_label(5), "Acknowledge (5)");
        assert_eq!(IssueStatusMap::dispute_type_label(10), "Reset (10)");
    }
}
