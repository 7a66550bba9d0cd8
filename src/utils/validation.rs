//! Validation utilities

use crate::issue_status::IssueStatusMap;
use crate::types::*;

/// Validate that the requested issue id is one of the known issues
///
/// Returns the gateway status the issue corresponds to.
pub fn validate_issue_id(issue_id: i32) -> ReconcileResult<&'static str> {
    IssueStatusMap::status_for(issue_id).ok_or_else(|| {
        let valid = IssueStatusMap::entries()
            .iter()
            .map(|m| format!("{} = {} (status {})", m.issue_id, m.label, m.status_code))
            .collect::<Vec<_>>()
            .join(", ");
        ReconcileError::Validation(format!(
            "Invalid IssueId '{}'. Valid values: {}.",
            issue_id, valid
        ))
    })
}

/// Validate that the collection source is present
pub fn validate_coll_from(coll_from: &str) -> ReconcileResult<()> {
    if coll_from.trim().is_empty() {
        return Err(ReconcileError::Validation(
            "CollFrom is required".to_string(),
        ));
    }

    Ok(())
}

/// Validate that the client id refers to a real biller
pub fn validate_client_id(client_id: i32) -> ReconcileResult<()> {
    if client_id <= 0 {
        return Err(ReconcileError::Validation(format!(
            "ClientId must be positive, got {}",
            client_id
        )));
    }

    Ok(())
}

/// Validate a claim before any collaborator is contacted
pub fn validate_claim(claim: &IssueClaim) -> ReconcileResult<&'static str> {
    let expected_status = validate_issue_id(claim.requested_issue_id)?;
    validate_coll_from(&claim.coll_from)?;
    validate_client_id(claim.client_id)?;
    Ok(expected_status)
}

/// Validate a collection listing before the store is queried
pub fn validate_collection_query(query: &CollectionQuery) -> ReconcileResult<()> {
    if query.branch_code.trim().is_empty() {
        return Err(ReconcileError::Validation(
            "BranchCode is required.".to_string(),
        ));
    }

    if query.coll_status_ids.is_empty() {
        return Err(ReconcileError::Validation(
            "At least one CollStatusId must be provided.".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_issue_id_lists_valid_values() {
        let err = validate_issue_id(7).unwrap_err().to_string();
        assert!(err.contains("Invalid IssueId '7'"));
        assert!(err.contains("1 = Paid Acknowledged (status 50)"));
        assert!(err.contains("3 = Pending (status 10)"));
    }

    #[test]
    fn test_claim_validation() {
        let claim = IssueClaim::new(31, ClientType::Breb, 2, "MTB".to_string());
        assert_eq!(validate_claim(&claim).unwrap(), "30");

        let blank = IssueClaim::new(31, ClientType::Breb, 2, " ".to_string());
        match validate_claim(&blank) {
            Err(ReconcileError::Validation(msg)) => assert_eq!(msg, "CollFrom is required"),
            other => panic!("expected validation error, got {:?}", other),
        }

        let no_client = IssueClaim::new(0, ClientType::Breb, 2, "MTB".to_string());
        assert!(validate_claim(&no_client).is_err());
    }

    #[test]
    fn test_collection_query_validation() {
        let query = CollectionQuery::today("0502".to_string(), 31, vec![1]);
        assert!(validate_collection_query(&query).is_ok());

        let blank_branch = CollectionQuery::today("  ".to_string(), 31, vec![1]);
        match validate_collection_query(&blank_branch) {
            Err(ReconcileError::Validation(msg)) => assert_eq!(msg, "BranchCode is required."),
            other => panic!("expected validation error, got {:?}", other),
        }

        let no_status = CollectionQuery::today("0502".to_string(), 31, Vec::new());
        match validate_collection_query(&no_status) {
            Err(ReconcileError::Validation(msg)) => {
                assert_eq!(msg, "At least one CollStatusId must be provided.")
            }
            other => panic!("expected validation error, got {:?}", other),
        }
    }
}
