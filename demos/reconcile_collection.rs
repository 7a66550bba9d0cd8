//! Reconcile a few collections against scripted gateway responses

use std::sync::Arc;

use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use dispute_reconciliation::utils::{
    CallJournal, GatewayReply, MemoryStorage, ScriptedDisputeGateway, ScriptedPaymentGateway,
};
use dispute_reconciliation::{
    BillLink, ClientType, CollectionRecord, DisputeErrorEntry, DisputeResponse, IssueClaim,
    ReconcilerConfig, ReconciliationOrchestrator, SubmissionLog,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    println!("🧾 Dispute Reconciliation - Collection Example\n");

    let journal = CallJournal::new();
    let storage = MemoryStorage::with_journal(journal.clone());
    let claim = IssueClaim::new(31, ClientType::Breb, 3, "MTB".to_string())
        .with_branch_code("0502".to_string());

    storage.insert_collection(
        claim.collection_key(),
        CollectionRecord::new(
            1001,
            31,
            "B-1001".to_string(),
            "0502".to_string(),
            BigDecimal::from(1250),
            NaiveDate::from_ymd_opt(2024, 3, 1).ok_or("invalid date")?,
        ),
    )?;
    storage.insert_bill_link(BillLink {
        collection_id: 1001,
        transaction_id: "TX-1001".to_string(),
        account_reference: "SMS-778899".to_string(),
    })?;
    storage.insert_submission_log(SubmissionLog {
        transaction_id: "TX-1001".to_string(),
        reference_number: "REF-5566".to_string(),
        request_id: "REQ-1".to_string(),
    })?;

    let payment_gateway = ScriptedPaymentGateway::reporting("10", journal.clone());
    let dispute_gateway = ScriptedDisputeGateway::new(
        GatewayReply::Respond(DisputeResponse {
            status: 202,
            data: None,
            errors: Some(vec![DisputeErrorEntry {
                code: "MR01".to_string(),
                message: "Queued for manual review".to_string(),
            }]),
        }),
        journal.clone(),
    );

    let orchestrator = ReconciliationOrchestrator::new(
        Arc::new(storage.clone()),
        Arc::new(storage.clone()),
        Arc::new(storage.clone()),
        Arc::new(payment_gateway),
        Arc::new(dispute_gateway.clone()),
    )
    .with_config(ReconcilerConfig::load()?);

    // 1. Gateway puts the dispute under manual review
    println!("📨 Filing dispute for a pending payment...");
    let result = orchestrator.reconcile(&claim).await?;
    println!("  HTTP {} → {}", result.http_status(), result.message);
    println!("{}\n", serde_json::to_string_pretty(&result)?);

    // 2. Gateway accepts the dispute on retry
    println!("🔁 Retrying after the gateway accepted the correction...");
    dispute_gateway.set_reply(GatewayReply::Respond(DisputeResponse {
        status: 200,
        data: Some(dispute_reconciliation::DisputeData {
            message: Some("Payment reset".to_string()),
        }),
        errors: None,
    }))?;
    let result = orchestrator.reconcile(&claim).await?;
    println!("  HTTP {} → {}", result.http_status(), result.message);

    println!("\n📋 Collaborator calls: {:?}", journal.calls());

    Ok(())
}
