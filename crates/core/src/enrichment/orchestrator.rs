//! Enrichment orchestrator - drives one batch run.
//!
//! For each candidate, in store order:
//!
//! ```text
//! CredentialLease (refresh when due) ──fail──> abort, no commit
//!        │
//!        v
//! ChainExecutor ──Found──────> stage mutation, pacing wait
//!               ──NotFound───> skip, pacing wait if a call was made
//!               ──Throttled──> cooldown, forfeit (or retry per policy)
//!               ──Failed─────> record error, continue
//!        │
//!        v (after the last candidate)
//! BatchCommitter::commit_all (exactly once)
//! ```

use std::sync::Arc;

use log::{debug, error, info, warn};
use top2000_catalog::CatalogProvider;

use super::chain::ResolutionChain;
use super::committer::BatchCommitter;
use super::config::EnrichmentConfig;
use super::credential::{Credential, CredentialLease};
use super::errors::EnrichmentError;
use super::executor::{ChainExecution, ChainExecutor, ChainOutcome};
use super::model::{CandidateQuery, EnrichmentTarget, TargetField};
use super::pacer::Pacer;
use super::summary::RunSummary;
use super::traits::EnrichmentStore;

/// A pipeline instantiation: which records, which chain, which field.
#[derive(Debug)]
pub struct EnrichmentJob {
    pub name: &'static str,
    pub query: CandidateQuery,
    pub chain: ResolutionChain,
    pub target_field: TargetField,
}

impl EnrichmentJob {
    pub fn new(name: &'static str, query: CandidateQuery, chain: ResolutionChain) -> Self {
        Self {
            name,
            query,
            chain,
            target_field: query.target_field(),
        }
    }

    pub fn track_ids() -> Self {
        Self::new(
            "track-ids",
            CandidateQuery::SongsMissingTrackId,
            ResolutionChain::track_ids(),
        )
    }

    pub fn artist_photos() -> Self {
        Self::new(
            "artist-photos",
            CandidateQuery::ArtistsMissingPhoto,
            ResolutionChain::artist_photos(),
        )
    }

    pub fn album_images() -> Self {
        Self::new(
            "album-images",
            CandidateQuery::SongsMissingImage,
            ResolutionChain::album_images(),
        )
    }
}

/// Runs enrichment jobs sequentially against one provider and one store.
pub struct EnrichmentOrchestrator {
    provider: Arc<dyn CatalogProvider>,
    store: Arc<dyn EnrichmentStore>,
    pacer: Arc<dyn Pacer>,
    config: EnrichmentConfig,
}

impl EnrichmentOrchestrator {
    pub fn new(
        provider: Arc<dyn CatalogProvider>,
        store: Arc<dyn EnrichmentStore>,
        pacer: Arc<dyn Pacer>,
        config: EnrichmentConfig,
    ) -> Self {
        Self {
            provider,
            store,
            pacer,
            config,
        }
    }

    pub fn config(&self) -> &EnrichmentConfig {
        &self.config
    }

    /// Run `job` over every current candidate and commit once at the end.
    ///
    /// Only a credential failure stops the loop early; in that case nothing
    /// is committed. Item-level failures are recorded in the summary.
    pub async fn run(&self, job: &EnrichmentJob) -> Result<RunSummary, EnrichmentError> {
        let selected = match self.store.select_candidates(job.query) {
            Ok(selected) => selected,
            Err(source) => {
                error!("{}: candidate selection failed: {}", job.name, source);
                return Err(EnrichmentError::CandidateSelection {
                    source,
                    summary: Box::new(RunSummary::new(job.name, 0)),
                });
            }
        };

        let (candidates, already_set): (Vec<_>, Vec<_>) = selected
            .into_iter()
            .partition(EnrichmentTarget::is_candidate);
        if !already_set.is_empty() {
            warn!(
                "{}: ignoring {} records that already have a {}",
                job.name,
                already_set.len(),
                job.target_field
            );
        }

        let mut summary = RunSummary::new(job.name, candidates.len());
        info!("Starting {} for {} records...", job.name, summary.total);

        let mut lease = CredentialLease::new(self.provider.clone(), self.config.refresh_interval);
        let executor = ChainExecutor::new(self.provider.clone());
        let mut committer = BatchCommitter::new(self.store.clone());

        for mut target in candidates {
            let key = target.key;
            let refreshes_before = lease.refresh_count();

            let execution = match lease.current_credential().await {
                Ok(credential) => {
                    self.resolve_item(&executor, &job.chain, &target, credential)
                        .await
                }
                Err(source) => {
                    error!(
                        "{}: aborting at {} after {} items, credential refresh failed: {}",
                        job.name,
                        key,
                        summary.processed(),
                        source
                    );
                    summary.credential_refreshes = refreshes_before;
                    return Err(EnrichmentError::CredentialAcquisition {
                        source,
                        summary: Box::new(summary),
                    });
                }
            };
            lease.record_item();
            summary.external_calls += execution.external_calls;

            match execution.outcome {
                ChainOutcome::Found(value) => {
                    info!("SUCCESS: {} {} = {}", key, job.target_field, value);
                    committer.stage(target.stage(job.target_field, value.clone()));
                    summary.record_updated(key, value);
                    self.pacer.wait_before_call().await;
                }
                ChainOutcome::NotFound { reason } => {
                    info!("SKIPPED: {} ({})", key, reason);
                    summary.record_skipped(key, reason);
                    if execution.external_calls > 0 {
                        self.pacer.wait_before_call().await;
                    }
                }
                ChainOutcome::Throttled { retry_after } => {
                    warn!(
                        "THROTTLED: {} forfeited (retry-after {:?})",
                        key, retry_after
                    );
                    summary.record_throttled(key, "rate limited by provider");
                }
                ChainOutcome::Failed(e) => {
                    warn!("Error processing {}: {}", key, e);
                    summary.record_errored(key, e.to_string());
                }
            }
        }

        summary.credential_refreshes = lease.refresh_count();
        let staged = committer.staged().len();

        match committer.commit_all().await {
            Ok(result) => {
                summary.committed = result.applied;
                info!(
                    "{} complete. Processed {}, updated {}, skipped {} ({} throttled), errored {}. Committed {}/{}.",
                    job.name,
                    summary.total,
                    summary.updated,
                    summary.skipped,
                    summary.throttled,
                    summary.errored,
                    result.applied,
                    staged
                );
                Ok(summary)
            }
            Err(source) => Err(EnrichmentError::Commit {
                source,
                summary: Box::new(summary),
            }),
        }
    }

    /// Run the chain for one item, applying the throttle policy.
    ///
    /// The cooldown runs once per throttled attempt. `external_calls` covers
    /// every attempt.
    async fn resolve_item(
        &self,
        executor: &ChainExecutor,
        chain: &ResolutionChain,
        target: &EnrichmentTarget,
        credential: &Credential,
    ) -> ChainExecution {
        let max_retries = self.config.throttle_policy.max_retries();
        let mut retries = 0;
        let mut external_calls = 0;

        loop {
            let mut execution = executor.resolve(chain, target, credential).await;
            external_calls += execution.external_calls;

            if matches!(execution.outcome, ChainOutcome::Throttled { .. }) {
                self.pacer.on_throttled().await;
                if retries < max_retries {
                    retries += 1;
                    debug!(
                        "Retrying {} after cooldown ({}/{})",
                        target.key, retries, max_retries
                    );
                    continue;
                }
            }

            execution.external_calls = external_calls;
            return execution;
        }
    }
}
