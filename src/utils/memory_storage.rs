//! In-memory storage implementation for testing

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::traits::*;
use crate::types::*;
use crate::utils::journal::{Call, CallJournal};

/// In-memory collection, bill link and submission log storage for testing
/// and development
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    collections: Arc<RwLock<HashMap<CollectionKey, CollectionRecord>>>,
    bill_links: Arc<RwLock<HashMap<i64, BillLink>>>,
    submission_logs: Arc<RwLock<HashMap<String, SubmissionLog>>>,
    journal: CallJournal,
}

fn poisoned<T>(_: T) -> ReconcileError {
    ReconcileError::Storage("memory storage lock poisoned".to_string())
}

impl MemoryStorage {
    /// Create a new memory storage instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a storage instance that records its calls in `journal`
    pub fn with_journal(journal: CallJournal) -> Self {
        Self {
            journal,
            ..Self::default()
        }
    }

    /// Call log this storage records into
    pub fn journal(&self) -> &CallJournal {
        &self.journal
    }

    /// Register a collection under the key callers will look it up by
    pub fn insert_collection(
        &self,
        key: CollectionKey,
        record: CollectionRecord,
    ) -> ReconcileResult<()> {
        self.collections
            .write()
            .map_err(poisoned)?
            .insert(key, record);
        Ok(())
    }

    /// Register the bill link of a collection
    pub fn insert_bill_link(&self, link: BillLink) -> ReconcileResult<()> {
        self.bill_links
            .write()
            .map_err(poisoned)?
            .insert(link.collection_id, link);
        Ok(())
    }

    /// Register the submission log written for a transaction
    pub fn insert_submission_log(&self, log: SubmissionLog) -> ReconcileResult<()> {
        self.submission_logs
            .write()
            .map_err(poisoned)?
            .insert(log.transaction_id.clone(), log);
        Ok(())
    }

    /// Current stored state of a collection
    pub fn collection(&self, collection_id: i64) -> ReconcileResult<Option<CollectionRecord>> {
        Ok(self
            .collections
            .read()
            .map_err(poisoned)?
            .values()
            .find(|record| record.collection_id == collection_id)
            .cloned())
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) -> ReconcileResult<()> {
        self.collections.write().map_err(poisoned)?.clear();
        self.bill_links.write().map_err(poisoned)?.clear();
        self.submission_logs.write().map_err(poisoned)?.clear();
        self.journal.clear();
        Ok(())
    }
}

#[async_trait]
impl CollectionStore for MemoryStorage {
    async fn find(&self, key: &CollectionKey) -> ReconcileResult<Option<CollectionRecord>> {
        self.journal.record(Call::FindCollection);
        Ok(self.collections.read().map_err(poisoned)?.get(key).cloned())
    }

    async fn update(&self, record: &CollectionRecord) -> ReconcileResult<bool> {
        self.journal.record(Call::UpdateCollection);
        let mut collections = self.collections.write().map_err(poisoned)?;

        // Conditional update: only an unreconciled row is changed
        let stored = collections
            .values_mut()
            .find(|stored| stored.collection_id == record.collection_id && !stored.reconciled);

        match stored {
            Some(stored) => {
                stored.reconciled = true;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list(&self, query: &CollectionQuery) -> ReconcileResult<Vec<CollectionRecord>> {
        self.journal.record(Call::ListCollections);
        let mut records: Vec<CollectionRecord> = self
            .collections
            .read()
            .map_err(poisoned)?
            .values()
            .filter(|record| query.matches(record))
            .cloned()
            .collect();
        records.sort_by_key(|record| record.collection_id);
        Ok(records)
    }
}

#[async_trait]
impl BillLinkStore for MemoryStorage {
    async fn find_by_collection(&self, collection_id: i64) -> ReconcileResult<Option<BillLink>> {
        self.journal.record(Call::FindBillLink);
        Ok(self
            .bill_links
            .read()
            .map_err(poisoned)?
            .get(&collection_id)
            .cloned())
    }
}

#[async_trait]
impl PaymentLogStore for MemoryStorage {
    async fn find_by_transaction(
        &self,
        transaction_id: &str,
    ) -> ReconcileResult<Option<SubmissionLog>> {
        self.journal.record(Call::FindSubmissionLog);
        Ok(self
            .submission_logs
            .read()
            .map_err(poisoned)?
            .get(transaction_id)
            .cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;

    fn seeded() -> (MemoryStorage, CollectionKey) {
        let storage = MemoryStorage::new();
        let key = IssueClaim::new(31, ClientType::Breb, 1, "MTB".to_string()).collection_key();
        let record = CollectionRecord::new(
            1001,
            31,
            "B-1001".to_string(),
            "0502".to_string(),
            BigDecimal::from(1250),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
        );
        storage.insert_collection(key.clone(), record).unwrap();
        (storage, key)
    }

    #[tokio::test]
    async fn test_update_is_conditional() {
        let (storage, key) = seeded();
        let record = storage.find(&key).await.unwrap().unwrap();

        assert!(storage.update(&record).await.unwrap());
        assert!(!storage.update(&record).await.unwrap());
        assert!(storage.collection(1001).unwrap().unwrap().reconciled);
    }

    #[tokio::test]
    async fn test_update_of_unknown_collection_changes_nothing() {
        let (storage, key) = seeded();
        let mut record = storage.find(&key).await.unwrap().unwrap();
        record.collection_id = 9999;

        assert!(!storage.update(&record).await.unwrap());
        assert_eq!(storage.journal().count(Call::UpdateCollection), 1);
    }

    #[tokio::test]
    async fn test_list_filters_by_query() {
        let (storage, _) = seeded();
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let mut settled = CollectionRecord::new(
            1002,
            31,
            "B-1002".to_string(),
            "0502".to_string(),
            BigDecimal::from(80),
            day,
        );
        settled.coll_status_id = 4;
        let other_key = IssueClaim::new(31, ClientType::Breb, 1, "MTB".to_string())
            .with_bill_number("B-1002".to_string())
            .collection_key();
        storage.insert_collection(other_key, settled).unwrap();

        let both = CollectionQuery::on("0502".to_string(), 31, vec![1, 4], day);
        let ids: Vec<i64> = storage
            .list(&both)
            .await
            .unwrap()
            .iter()
            .map(|record| record.collection_id)
            .collect();
        assert_eq!(ids, vec![1001, 1002]);

        let settled_only = CollectionQuery::on("0502".to_string(), 31, vec![4], day);
        assert_eq!(storage.list(&settled_only).await.unwrap().len(), 1);

        let other_client = CollectionQuery::on("0502".to_string(), 32, vec![1, 4], day);
        assert!(storage.list(&other_client).await.unwrap().is_empty());
        assert_eq!(storage.journal().count(Call::ListCollections), 3);
    }

    #[tokio::test]
    async fn test_lookups() {
        let (storage, _) = seeded();
        storage
            .insert_bill_link(BillLink {
                collection_id: 1001,
                transaction_id: "TX-1".to_string(),
                account_reference: "SMS-1".to_string(),
            })
            .unwrap();
        storage
            .insert_submission_log(SubmissionLog {
                transaction_id: "TX-1".to_string(),
                reference_number: "REF-1".to_string(),
                request_id: "REQ-1".to_string(),
            })
            .unwrap();

        let link = storage.find_by_collection(1001).await.unwrap().unwrap();
        assert_eq!(link.transaction_id, "TX-1");
        assert!(storage.find_by_collection(1).await.unwrap().is_none());

        let log = storage.find_by_transaction("TX-1").await.unwrap().unwrap();
        assert_eq!(log.reference_number, "REF-1");

        storage.clear().unwrap();
        assert!(storage.find_by_transaction("TX-1").await.unwrap().is_none());
    }
}
