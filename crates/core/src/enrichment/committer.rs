//! Batch commit adapter.

use std::sync::Arc;

use log::{debug, error};

use super::model::{CommitResult, StagedMutation};
use super::traits::EnrichmentStore;
use crate::errors::Result;

/// Accumulates staged mutations and flushes them once.
///
/// `commit_all` consumes the committer, so a run can flush at most once.
pub struct BatchCommitter {
    store: Arc<dyn EnrichmentStore>,
    staged: Vec<StagedMutation>,
}

impl BatchCommitter {
    pub fn new(store: Arc<dyn EnrichmentStore>) -> Self {
        Self {
            store,
            staged: Vec::new(),
        }
    }

    pub fn stage(&mut self, mutation: StagedMutation) {
        self.staged.push(mutation);
    }

    pub fn staged(&self) -> &[StagedMutation] {
        &self.staged
    }

    /// Flush all staged mutations as one store operation.
    pub async fn commit_all(self) -> Result<CommitResult> {
        let count = self.staged.len();
        debug!("Committing {} staged mutations", count);
        self.store
            .apply_mutations(self.staged)
            .await
            .inspect_err(|e| error!("Commit of {} staged mutations failed: {}", count, e))
    }
}
