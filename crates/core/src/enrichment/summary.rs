//! Run summary: outcome tallies plus one entry per processed item.

use serde::{Deserialize, Serialize};

use super::model::TargetKey;

/// Per-item outcome recorded in a [`RunSummary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemOutcome {
    Updated,
    Skipped,
    /// The provider throttled the item and it was forfeited. Counted as a skip.
    Throttled,
    Errored,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunEntry {
    pub key: TargetKey,
    pub outcome: ItemOutcome,
    /// Resolved value for updates, reason or error detail otherwise.
    pub detail: String,
}

/// Counts and per-item log of one enrichment run.
///
/// `updated + skipped + errored` equals the number of processed items; it
/// equals `total` whenever the run reached the commit.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub job: String,
    pub total: usize,
    pub updated: usize,
    pub skipped: usize,
    pub errored: usize,
    /// Subset of `skipped` forfeited after provider throttling.
    pub throttled: usize,
    pub external_calls: usize,
    pub credential_refreshes: usize,
    /// Mutations the store reported as applied at commit.
    pub committed: usize,
    pub entries: Vec<RunEntry>,
}

impl RunSummary {
    pub fn new(job: impl Into<String>, total: usize) -> Self {
        Self {
            job: job.into(),
            total,
            ..Self::default()
        }
    }

    pub fn record_updated(&mut self, key: TargetKey, value: impl Into<String>) {
        self.updated += 1;
        self.push(key, ItemOutcome::Updated, value);
    }

    pub fn record_skipped(&mut self, key: TargetKey, reason: impl Into<String>) {
        self.skipped += 1;
        self.push(key, ItemOutcome::Skipped, reason);
    }

    pub fn record_throttled(&mut self, key: TargetKey, reason: impl Into<String>) {
        self.skipped += 1;
        self.throttled += 1;
        self.push(key, ItemOutcome::Throttled, reason);
    }

    pub fn record_errored(&mut self, key: TargetKey, detail: impl Into<String>) {
        self.errored += 1;
        self.push(key, ItemOutcome::Errored, detail);
    }

    /// Items that reached an outcome.
    pub fn processed(&self) -> usize {
        self.updated + self.skipped + self.errored
    }

    /// True once every candidate has an outcome.
    pub fn is_complete(&self) -> bool {
        self.processed() == self.total
    }

    pub fn entries_with(&self, outcome: ItemOutcome) -> impl Iterator<Item = &RunEntry> {
        self.entries.iter().filter(move |e| e.outcome == outcome)
    }

    fn push(&mut self, key: TargetKey, outcome: ItemOutcome, detail: impl Into<String>) {
        self.entries.push(RunEntry {
            key,
            outcome,
            detail: detail.into(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tallies() {
        let mut summary = RunSummary::new("track-ids", 4);
        summary.record_updated(TargetKey::Song(1), "abc");
        summary.record_skipped(TargetKey::Song(2), "no search results");
        summary.record_throttled(TargetKey::Song(3), "rate limited");
        summary.record_errored(TargetKey::Song(4), "HTTP 500");

        assert_eq!(summary.updated, 1);
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.throttled, 1);
        assert_eq!(summary.errored, 1);
        assert_eq!(summary.processed(), 4);
        assert!(summary.is_complete());
        assert_eq!(summary.entries.len(), 4);
        assert_eq!(summary.entries_with(ItemOutcome::Throttled).count(), 1);
    }

    #[test]
    fn test_incomplete_run() {
        let mut summary = RunSummary::new("track-ids", 3);
        summary.record_updated(TargetKey::Song(1), "abc");
        assert!(!summary.is_complete());
    }

    #[test]
    fn test_serializes_camel_case() {
        let summary = RunSummary::new("album-images", 0);
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["externalCalls"], 0);
        assert_eq!(json["credentialRefreshes"], 0);
        assert_eq!(json["job"], "album-images");
    }
}
