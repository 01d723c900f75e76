//! Resolution chain executor.

use std::sync::Arc;
use std::time::Duration;

use log::debug;
use top2000_catalog::{CatalogError, CatalogProvider, RetryClass};

use super::chain::{ChainValue, LookupRequest, ResolutionChain, SeedFields};
use super::credential::Credential;
use super::model::EnrichmentTarget;

/// Result of running a chain for one target.
#[derive(Debug)]
pub enum ChainOutcome {
    Found(String),
    /// A hop returned nothing, or the input for the next hop was missing.
    NotFound { reason: String },
    /// The provider rejected a call with a rate-limit response.
    Throttled { retry_after: Option<Duration> },
    Failed(CatalogError),
}

#[derive(Debug)]
pub struct ChainExecution {
    pub outcome: ChainOutcome,
    /// Provider round trips made, including the one that failed.
    pub external_calls: usize,
}

impl ChainExecution {
    fn not_found(reason: impl Into<String>, external_calls: usize) -> Self {
        Self {
            outcome: ChainOutcome::NotFound {
                reason: reason.into(),
            },
            external_calls,
        }
    }
}

/// Runs resolution chains against a catalog provider.
pub struct ChainExecutor {
    provider: Arc<dyn CatalogProvider>,
}

impl ChainExecutor {
    pub fn new(provider: Arc<dyn CatalogProvider>) -> Self {
        Self { provider }
    }

    /// Run `chain` for `target`, one round trip per step, no retries.
    pub async fn resolve(
        &self,
        chain: &ResolutionChain,
        target: &EnrichmentTarget,
        credential: &Credential,
    ) -> ChainExecution {
        let mut value = ChainValue::Seed(SeedFields::from_target(target));
        let mut external_calls = 0;

        for step in chain.steps() {
            let Some(request) = step.request(&value) else {
                return ChainExecution::not_found(
                    format!("{}: missing input", step.name()),
                    external_calls,
                );
            };

            external_calls += 1;
            match self.perform(&request, credential.token()).await {
                Ok(Some(next)) => value = next,
                Ok(None) => {
                    return ChainExecution::not_found(
                        format!("{}: no result", step.name()),
                        external_calls,
                    );
                }
                Err(e) => {
                    let outcome = match e.retry_class() {
                        RetryClass::AfterCooldown => match e {
                            CatalogError::RateLimited { retry_after, .. } => {
                                ChainOutcome::Throttled { retry_after }
                            }
                            other => ChainOutcome::Failed(other),
                        },
                        RetryClass::Never => ChainOutcome::Failed(e),
                    };
                    return ChainExecution {
                        outcome,
                        external_calls,
                    };
                }
            }
        }

        match chain.project(&value) {
            Some(found) => ChainExecution {
                outcome: ChainOutcome::Found(found),
                external_calls,
            },
            None => ChainExecution::not_found(
                format!("{}: value missing from result", chain.name()),
                external_calls,
            ),
        }
    }

    async fn perform(
        &self,
        request: &LookupRequest,
        access_token: &str,
    ) -> Result<Option<ChainValue>, CatalogError> {
        debug!("{}: {:?}", self.provider.id(), request);
        match request {
            LookupRequest::SearchTracks(query) => {
                let tracks = self.provider.search_tracks(query, access_token).await?;
                Ok(tracks.into_iter().next().map(ChainValue::Track))
            }
            LookupRequest::Track { id } => Ok(self
                .provider
                .get_track(id, access_token)
                .await?
                .map(ChainValue::Track)),
            LookupRequest::Artist { id } => Ok(self
                .provider
                .get_artist(id, access_token)
                .await?
                .map(ChainValue::Artist)),
        }
    }
}
