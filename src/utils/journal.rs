//! Shared record of collaborator calls, in the order they happened

use std::sync::{Arc, Mutex};

/// Collaborator operations the orchestrator can invoke
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Call {
    FindCollection,
    UpdateCollection,
    ListCollections,
    FindBillLink,
    FindSubmissionLog,
    QueryStatus,
    FileDispute,
}

/// Call log shared between in-memory collaborators
#[derive(Debug, Clone, Default)]
pub struct CallJournal {
    calls: Arc<Mutex<Vec<Call>>>,
}

impl CallJournal {
    /// Create an empty journal
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `call` to the log
    pub fn record(&self, call: Call) {
        // A poisoned journal only loses test bookkeeping
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    /// Snapshot of every call so far
    pub fn calls(&self) -> Vec<Call> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }

    /// Number of times `call` was made
    pub fn count(&self, call: Call) -> usize {
        self.calls().iter().filter(|c| **c == call).count()
    }

    /// Position of the first `call`, if it was made
    pub fn position(&self, call: Call) -> Option<usize> {
        self.calls().iter().position(|c| *c == call)
    }

    /// Whether no call has been made yet
    pub fn is_empty(&self) -> bool {
        self.calls().is_empty()
    }

    /// Clear all entries (useful between sequential invocations)
    pub fn clear(&self) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_journal_preserves_order() {
        let journal = CallJournal::new();
        let shared = journal.clone();

        journal.record(Call::QueryStatus);
        shared.record(Call::FileDispute);
        journal.record(Call::UpdateCollection);

        assert_eq!(
            journal.calls(),
            vec![Call::QueryStatus, Call::FileDispute, Call::UpdateCollection]
        );
        assert_eq!(journal.position(Call::UpdateCollection), Some(2));
        assert_eq!(journal.count(Call::FindCollection), 0);

        journal.clear();
        assert!(shared.is_empty());
    }
}
