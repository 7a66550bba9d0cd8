//! Reconciliation orchestrator that coordinates stores and gateway clients

use std::sync::Arc;

use tracing::{debug, error, info, warn, Instrument};
use uuid::Uuid;

use crate::issue_status::{
    IssueStatusMap, STATUS_PAID_ACKNOWLEDGED, STATUS_PENDING, STATUS_WAITING_FOR_ACKNOWLEDGE,
};
use crate::reconciliation::outcome::*;
use crate::settings::ReconcilerConfig;
use crate::traits::*;
use crate::types::*;
use crate::utils::validation::{validate_claim, validate_collection_query};

/// Outcome of a single pipeline step
enum Step<T> {
    /// Carry the value into the next step
    Continue(T),
    /// Stop here and hand this result to the caller
    Done(ReconciliationResult),
}

macro_rules! proceed {
    ($step:expr) => {
        match $step {
            Step::Continue(value) => value,
            Step::Done(result) => return Ok(result),
        }
    };
}

/// Everything resolved from internal storage before the gateway is queried
struct Resolved {
    record: CollectionRecord,
    link: BillLink,
    reference_number: String,
}

/// Main reconciliation system that sequences lookups, gateway calls and the
/// final collection update
pub struct ReconciliationOrchestrator {
    collections: Arc<dyn CollectionStore>,
    bill_links: Arc<dyn BillLinkStore>,
    payment_logs: Arc<dyn PaymentLogStore>,
    payment_gateway: Arc<dyn PaymentGatewayClient>,
    dispute_gateway: Arc<dyn DisputeGatewayClient>,
    config: ReconcilerConfig,
}

impl ReconciliationOrchestrator {
    /// Create a new orchestrator with default settings
    pub fn new(
        collections: Arc<dyn CollectionStore>,
        bill_links: Arc<dyn BillLinkStore>,
        payment_logs: Arc<dyn PaymentLogStore>,
        payment_gateway: Arc<dyn PaymentGatewayClient>,
        dispute_gateway: Arc<dyn DisputeGatewayClient>,
    ) -> Self {
        Self {
            collections,
            bill_links,
            payment_logs,
            payment_gateway,
            dispute_gateway,
            config: ReconcilerConfig::default(),
        }
    }

    /// Replace the settings used for gateway exchanges
    pub fn with_config(mut self, config: ReconcilerConfig) -> Self {
        self.config = config;
        self
    }

    /// List a branch's collections for one client and day
    ///
    /// A blank branch code or an empty status filter is rejected with
    /// `ReconcileError::Validation` before the store is queried.
    pub async fn collections_for_day(
        &self,
        query: &CollectionQuery,
    ) -> ReconcileResult<Vec<CollectionRecord>> {
        validate_collection_query(query)?;

        let records = self.collections.list(query).await?;
        debug!(
            branch_code = %query.branch_code,
            client_id = query.client_id,
            coll_date = %query.coll_date,
            count = records.len(),
            "collections listed"
        );
        Ok(records)
    }

    /// Reconcile a collection against the gateway and finalize it if warranted
    ///
    /// Every expected business condition is reported through the returned
    /// [`ReconciliationResult`]. `Err` is only returned when a store fails,
    /// and no update is attempted after such a failure.
    pub async fn reconcile(&self, claim: &IssueClaim) -> ReconcileResult<ReconciliationResult> {
        let span = tracing::info_span!(
            "reconcile",
            attempt_id = %Uuid::new_v4(),
            client_id = claim.client_id,
            requested_issue_id = claim.requested_issue_id
        );

        async {
            let outcome = self.run(claim).await;
            if let Err(err) = &outcome {
                error!(error = %err, coll_from = %claim.coll_from, "reconciliation aborted");
            }
            outcome
        }
        .instrument(span)
        .await
    }

    async fn run(&self, claim: &IssueClaim) -> ReconcileResult<ReconciliationResult> {
        let expected_status = proceed!(Self::validate(claim));
        debug!(expected_status, "claim validated");

        let resolved = proceed!(self.resolve(claim).await?);

        let status_request = PaymentStatusRequest {
            account_reference: resolved.link.account_reference.clone(),
            channel_id: self.config.channel_id.clone(),
            reference_number: resolved.reference_number.clone(),
            transaction_id: resolved.link.transaction_id.clone(),
        };

        let (response_code, status) = proceed!(self.query_status(&status_request).await);

        let mut result = ReconciliationResult::failed(String::new());
        let issue_match = Self::match_issue(claim.requested_issue_id, &status);
        result.payment_status = Some(PaymentStatusInfo::from_status(&response_code, &status));
        result.issue_match = Some(issue_match.clone());

        if !issue_match.is_matched {
            warn!(
                requested = claim.requested_issue_id,
                actual_status = %issue_match.actual_status,
                actual_label = %issue_match.actual_label,
                collection_id = resolved.record.collection_id,
                "issue mismatch"
            );
            result.message = format!(
                "Issue mismatch: you submitted IssueId={} but the actual payment status is '{}' ({}, IssueId={}). No changes were made.",
                claim.requested_issue_id,
                issue_match.actual_status,
                issue_match.actual_label,
                issue_match
                    .actual_issue_id
                    .map(|id| id.to_string())
                    .unwrap_or_else(|| "unknown".to_string()),
            );
            return Ok(result);
        }

        match status.status_code.as_str() {
            STATUS_PAID_ACKNOWLEDGED => self.finalize_paid(result, &resolved.record).await,
            STATUS_PENDING | STATUS_WAITING_FOR_ACKNOWLEDGE => {
                self.dispute_then_finalize(result, &resolved, &status_request, &status.status_code)
                    .await
            }
            other => {
                result.message = format!(
                    "Unrecognised payment status '{}'. No action taken.",
                    other
                );
                Ok(result)
            }
        }
    }

    fn validate(claim: &IssueClaim) -> Step<&'static str> {
        match validate_claim(claim) {
            Ok(expected_status) => Step::Continue(expected_status),
            Err(err) => {
                debug!(error = %err, "claim rejected");
                let message = match err {
                    ReconcileError::Validation(msg) => msg,
                    other => other.to_string(),
                };
                Step::Done(ReconciliationResult::rejected(message))
            }
        }
    }

    /// Resolve the collection, its bill link and the submission reference
    async fn resolve(&self, claim: &IssueClaim) -> ReconcileResult<Step<Resolved>> {
        let Some(record) = self.collections.find(&claim.collection_key()).await? else {
            warn!(coll_from = %claim.coll_from, "no collection record found");
            return Ok(Step::Done(ReconciliationResult::failed(
                "No collection record found for the given request.".to_string(),
            )));
        };
        let collection_id = record.collection_id;

        let Some(link) = self.bill_links.find_by_collection(collection_id).await? else {
            warn!(collection_id, "no bill link found");
            return Ok(Step::Done(ReconciliationResult::failed(format!(
                "No bill collection record found for CollectionId={}.",
                collection_id
            ))));
        };

        if link.transaction_id.trim().is_empty() {
            warn!(collection_id, "transaction id is blank");
            return Ok(Step::Done(ReconciliationResult::failed(format!(
                "TransactionId is missing for CollectionId={}. Cannot resolve RefNo from the payment submit log.",
                collection_id
            ))));
        }

        let log = self
            .payment_logs
            .find_by_transaction(&link.transaction_id)
            .await?;
        let reference_number = match log {
            Some(log) if !log.reference_number.trim().is_empty() => {
                info!(
                    transaction_id = %link.transaction_id,
                    reference_number = %log.reference_number,
                    request_id = %log.request_id,
                    "reference number resolved"
                );
                log.reference_number
            }
            _ => {
                warn!(
                    transaction_id = %link.transaction_id,
                    collection_id,
                    "submission log missing or reference number blank"
                );
                return Ok(Step::Done(ReconciliationResult::failed(format!(
                    "No PaymentSubmit log found for TransactionId='{}'. RefNo cannot be resolved for CollectionId={}.",
                    link.transaction_id, collection_id
                ))));
            }
        };

        Ok(Step::Continue(Resolved {
            record,
            link,
            reference_number,
        }))
    }

    /// Query the gateway; yields the response code and the status payload
    async fn query_status(&self, request: &PaymentStatusRequest) -> Step<(String, PaymentStatus)> {
        let response = match self.payment_gateway.query_status(request).await {
            Ok(Some(response)) => response,
            Ok(None) => {
                error!(
                    account_reference = %request.account_reference,
                    "payment status query returned no response"
                );
                return Step::Done(ReconciliationResult::upstream_unavailable(
                    "Payment status API call failed or returned no response.".to_string(),
                ));
            }
            Err(err) => {
                error!(
                    account_reference = %request.account_reference,
                    error = %err,
                    "payment status query failed"
                );
                return Step::Done(ReconciliationResult::upstream_unavailable(
                    "Payment status API call failed or returned no response.".to_string(),
                ));
            }
        };

        match response.result.clone() {
            Some(status) if response.response_code == self.config.success_response_code => {
                Step::Continue((response.response_code, status))
            }
            _ => {
                warn!(response_code = %response.response_code, "payment status query unsuccessful");
                let mut result = ReconciliationResult::failed(
                    "Payment status API returned an unsuccessful response.".to_string(),
                );
                result.payment_status = Some(PaymentStatusInfo::unsuccessful(&response));
                Step::Done(result)
            }
        }
    }

    fn match_issue(requested_issue_id: i32, status: &PaymentStatus) -> IssueMatchInfo {
        let actual_issue_id = IssueStatusMap::issue_for(&status.status_code);
        IssueMatchInfo {
            requested_issue_id,
            actual_issue_id,
            is_matched: actual_issue_id == Some(requested_issue_id),
            actual_status: status.status_code.clone(),
            actual_label: IssueStatusMap::label_for(&status.status_code).to_string(),
        }
    }

    /// Status 50: nothing to dispute, finalize the collection directly
    async fn finalize_paid(
        &self,
        mut result: ReconciliationResult,
        record: &CollectionRecord,
    ) -> ReconcileResult<ReconciliationResult> {
        result.dispute = Some(DisputeInfo::not_attempted());

        let updated = self.collections.update(record).await?;
        info!(
            collection_id = record.collection_id,
            updated,
            "paid acknowledged collection update"
        );

        result.collection_update = Some(CollectionUpdateInfo::applied(
            record.collection_id,
            updated,
            "Collection updated successfully.",
        ));
        result.success = updated;
        result.message = if updated {
            "Payment confirmed as Paid Acknowledged. Collection record updated successfully."
                .to_string()
        } else {
            "Payment is Paid Acknowledged but collection update failed.".to_string()
        };

        Ok(result)
    }

    /// Status 10/30: file a dispute and finalize only if the gateway accepts it
    async fn dispute_then_finalize(
        &self,
        mut result: ReconciliationResult,
        resolved: &Resolved,
        status_request: &PaymentStatusRequest,
        status_code: &str,
    ) -> ReconcileResult<ReconciliationResult> {
        let collection_id = resolved.record.collection_id;
        let Some(dispute_type) = IssueStatusMap::dispute_type_for(status_code) else {
            result.message = format!(
                "Unrecognised payment status '{}'. No action taken.",
                status_code
            );
            return Ok(result);
        };
        let dispute_label = IssueStatusMap::dispute_type_label(dispute_type);

        let mut dispute = DisputeInfo {
            attempted: true,
            dispute_type_sent: Some(dispute_type),
            dispute_type_label: Some(dispute_label.to_string()),
            ..DisputeInfo::default()
        };

        let request = DisputeRequest {
            account_reference: status_request.account_reference.clone(),
            channel_id: status_request.channel_id.clone(),
            reference_number: status_request.reference_number.clone(),
            transaction_id: status_request.transaction_id.clone(),
            dispute_type,
        };

        let response = match self.dispute_gateway.file_dispute(&request).await {
            Ok(Some(response)) => Some(response),
            Ok(None) => None,
            Err(err) => {
                error!(collection_id, error = %err, "dispute call failed");
                None
            }
        };

        let Some(response) = response else {
            error!(collection_id, dispute_type, "dispute API returned no response");
            dispute.api_call_succeeded = false;
            dispute.message = Some("Dispute API call failed or returned no response.".to_string());

            result.outcome = OutcomeKind::UpstreamUnavailable;
            result.dispute = Some(dispute);
            result.collection_update = Some(CollectionUpdateInfo::skipped(
                collection_id,
                "Skipped: dispute API call failed.".to_string(),
            ));
            result.message = "Dispute API call failed. Collection was not updated.".to_string();
            return Ok(result);
        };

        let errors = response.errors.clone().unwrap_or_default();
        let error_text = errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");

        dispute.api_call_succeeded = true;
        dispute.dispute_status = Some(response.status);
        dispute.message = Some(
            response
                .data
                .as_ref()
                .and_then(|data| data.message.clone())
                .unwrap_or_else(|| {
                    if error_text.is_empty() {
                        "No message returned.".to_string()
                    } else {
                        error_text.clone()
                    }
                }),
        );
        dispute.errors = errors;
        result.dispute = Some(dispute);

        info!(
            collection_id,
            status_code,
            dispute_type,
            dispute_status = response.status,
            "dispute API responded"
        );

        let accepted =
            response.status == self.config.dispute_accepted_status && response.data.is_some();

        if !accepted {
            warn!(
                collection_id,
                dispute_status = response.status,
                errors = %error_text,
                "dispute not accepted"
            );
            result.collection_update = Some(CollectionUpdateInfo::skipped(
                collection_id,
                format!(
                    "Skipped: dispute API returned status {}. Manual reconciliation may be required.",
                    response.status
                ),
            ));
            result.message = format!(
                "Dispute API returned status {} ({}). Collection was not updated. Manual reconciliation may be required.",
                response.status,
                if error_text.is_empty() {
                    "see dispute details"
                } else {
                    error_text.as_str()
                },
            );
            return Ok(result);
        }

        let updated = self.collections.update(&resolved.record).await?;
        info!(collection_id, updated, "collection update after dispute");

        result.collection_update = Some(CollectionUpdateInfo::applied(
            collection_id,
            updated,
            "Collection updated successfully after dispute.",
        ));
        result.success = updated;
        result.message = if updated {
            format!(
                "Dispute accepted ({}). Collection record updated successfully.",
                dispute_label
            )
        } else {
            format!(
                "Dispute accepted ({}) but collection update failed.",
                dispute_label
            )
        };

        Ok(result)
    }
}
