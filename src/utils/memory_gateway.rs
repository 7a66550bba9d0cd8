//! Scripted gateway clients for testing and development

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::traits::*;
use crate::types::*;
use crate::utils::journal::{Call, CallJournal};

/// What a scripted gateway does when called
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayReply<T> {
    /// Answer with this response
    Respond(T),
    /// Transport failure or timeout
    NoResponse,
    /// Client-side error
    Fail(String),
}

impl<T: Clone> GatewayReply<T> {
    fn resolve(&self) -> ReconcileResult<Option<T>> {
        match self {
            GatewayReply::Respond(response) => Ok(Some(response.clone())),
            GatewayReply::NoResponse => Ok(None),
            GatewayReply::Fail(msg) => Err(ReconcileError::Gateway(msg.clone())),
        }
    }
}

/// Payment gateway that answers every status query with a preset reply
#[derive(Debug, Clone)]
pub struct ScriptedPaymentGateway {
    reply: Arc<RwLock<GatewayReply<PaymentStatusResponse>>>,
    requests: Arc<RwLock<Vec<PaymentStatusRequest>>>,
    journal: CallJournal,
}

impl ScriptedPaymentGateway {
    /// Create a gateway answering with `reply`
    pub fn new(reply: GatewayReply<PaymentStatusResponse>, journal: CallJournal) -> Self {
        Self {
            reply: Arc::new(RwLock::new(reply)),
            requests: Arc::new(RwLock::new(Vec::new())),
            journal,
        }
    }

    /// Gateway reporting `status_code` with a "000" response code
    pub fn reporting(status_code: &str, journal: CallJournal) -> Self {
        Self::new(
            GatewayReply::Respond(PaymentStatusResponse {
                response_code: "000".to_string(),
                message: Some("Success".to_string()),
                result: Some(PaymentStatus {
                    account_reference: String::new(),
                    reference_number: String::new(),
                    transaction_id: String::new(),
                    status_code: status_code.to_string(),
                    message: None,
                }),
            }),
            journal,
        )
    }

    /// Change the reply for subsequent calls
    pub fn set_reply(&self, reply: GatewayReply<PaymentStatusResponse>) -> ReconcileResult<()> {
        *self.reply.write().map_err(poisoned)? = reply;
        Ok(())
    }

    /// Requests received so far
    pub fn requests(&self) -> ReconcileResult<Vec<PaymentStatusRequest>> {
        Ok(self.requests.read().map_err(poisoned)?.clone())
    }
}

#[async_trait]
impl PaymentGatewayClient for ScriptedPaymentGateway {
    async fn query_status(
        &self,
        request: &PaymentStatusRequest,
    ) -> ReconcileResult<Option<PaymentStatusResponse>> {
        self.journal.record(Call::QueryStatus);
        self.requests.write().map_err(poisoned)?.push(request.clone());

        let reply = self.reply.read().map_err(poisoned)?.resolve()?;
        // Echo the identifiers back the way the gateway does
        Ok(reply.map(|mut response| {
            if let Some(status) = response.result.as_mut() {
                if status.account_reference.is_empty() {
                    status.account_reference = request.account_reference.clone();
                }
                if status.reference_number.is_empty() {
                    status.reference_number = request.reference_number.clone();
                }
                if status.transaction_id.is_empty() {
                    status.transaction_id = request.transaction_id.clone();
                }
            }
            response
        }))
    }
}

/// Dispute gateway that answers every filing with a preset reply
#[derive(Debug, Clone)]
pub struct ScriptedDisputeGateway {
    reply: Arc<RwLock<GatewayReply<DisputeResponse>>>,
    requests: Arc<RwLock<Vec<DisputeRequest>>>,
    journal: CallJournal,
}

impl ScriptedDisputeGateway {
    /// Create a gateway answering with `reply`
    pub fn new(reply: GatewayReply<DisputeResponse>, journal: CallJournal) -> Self {
        Self {
            reply: Arc::new(RwLock::new(reply)),
            requests: Arc::new(RwLock::new(Vec::new())),
            journal,
        }
    }

    /// Gateway that accepts every dispute with status 200
    pub fn accepting(journal: CallJournal) -> Self {
        Self::new(
            GatewayReply::Respond(DisputeResponse {
                status: 200,
                data: Some(DisputeData {
                    message: Some("ok".to_string()),
                }),
                errors: None,
            }),
            journal,
        )
    }

    /// Gateway that answers with `status`, no payload and the given errors
    pub fn answering(status: i32, errors: Vec<DisputeErrorEntry>, journal: CallJournal) -> Self {
        Self::new(
            GatewayReply::Respond(DisputeResponse {
                status,
                data: None,
                errors: if errors.is_empty() { None } else { Some(errors) },
            }),
            journal,
        )
    }

    /// Change the reply for subsequent calls
    pub fn set_reply(&self, reply: GatewayReply<DisputeResponse>) -> ReconcileResult<()> {
        *self.reply.write().map_err(poisoned)? = reply;
        Ok(())
    }

    /// Requests received so far
    pub fn requests(&self) -> ReconcileResult<Vec<DisputeRequest>> {
        Ok(self.requests.read().map_err(poisoned)?.clone())
    }
}

#[async_trait]
impl DisputeGatewayClient for ScriptedDisputeGateway {
    async fn file_dispute(
        &self,
        request: &DisputeRequest,
    ) -> ReconcileResult<Option<DisputeResponse>> {
        self.journal.record(Call::FileDispute);
        self.requests.write().map_err(poisoned)?.push(request.clone());
        self.reply.read().map_err(poisoned)?.resolve()
    }
}

fn poisoned<T>(_: T) -> ReconcileError {
    ReconcileError::Gateway("scripted gateway lock poisoned".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_request() -> PaymentStatusRequest {
        PaymentStatusRequest {
            account_reference: "SMS-1".to_string(),
            channel_id: "UTILITY".to_string(),
            reference_number: "REF-1".to_string(),
            transaction_id: "TX-1".to_string(),
        }
    }

    #[tokio::test]
    async fn test_reporting_gateway_echoes_identifiers() {
        let gateway = ScriptedPaymentGateway::reporting("50", CallJournal::new());

        let response = gateway.query_status(&status_request()).await.unwrap().unwrap();
        let status = response.result.unwrap();
        assert_eq!(status.status_code, "50");
        assert_eq!(status.reference_number, "REF-1");
        assert_eq!(gateway.requests().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_scripted_failures() {
        let journal = CallJournal::new();
        let gateway = ScriptedPaymentGateway::new(GatewayReply::NoResponse, journal.clone());
        assert!(gateway.query_status(&status_request()).await.unwrap().is_none());

        gateway
            .set_reply(GatewayReply::Fail("timeout".to_string()))
            .unwrap();
        assert!(gateway.query_status(&status_request()).await.is_err());
        assert_eq!(journal.count(Call::QueryStatus), 2);
    }

    #[tokio::test]
    async fn test_answering_dispute_gateway() {
        let gateway = ScriptedDisputeGateway::answering(202, Vec::new(), CallJournal::new());
        let request = DisputeRequest {
            account_reference: "SMS-1".to_string(),
            channel_id: "UTILITY".to_string(),
            reference_number: "REF-1".to_string(),
            transaction_id: "TX-1".to_string(),
            dispute_type: 10,
        };

        let response = gateway.file_dispute(&request).await.unwrap().unwrap();
        assert_eq!(response.status, 202);
        assert!(response.errors.is_none());
        assert_eq!(gateway.requests().unwrap()[0].dispute_type, 10);
    }
}
