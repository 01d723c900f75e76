//! Tests for the enrichment orchestrator.
//!
//! # Contract Points
//!
//! 1. Tally: updated + skipped + errored == total for every completed run
//! 2. Commit: exactly once after the last item, never after a credential failure
//! 3. Chains: a missing hop stops the chain, no later step runs
//! 4. Throttling: one cooldown per throttled attempt, item forfeited by default
//! 5. Credentials: refreshed on the first item and once per refresh interval
//! 6. Pacing: after Found, after NotFound with a call, never after Failed

#[cfg(test)]
mod tests {
    use crate::enrichment::{
        CandidateQuery, CommitResult, EnrichmentConfig, EnrichmentError, EnrichmentJob,
        EnrichmentOrchestrator, EnrichmentStore, EnrichmentTarget, ItemOutcome, Pacer,
        StagedMutation, TargetField, TargetKey, ThrottlePolicy,
    };
    use crate::errors::{DatabaseError, Error, Result};
    use async_trait::async_trait;
    use std::collections::{HashMap, VecDeque};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use top2000_catalog::{
        AccessToken, AlbumRef, Artist, ArtistRef, CatalogError, CatalogProvider, Image, Track,
        TrackQuery,
    };

    // =========================================================================
    // Mock CatalogProvider
    // =========================================================================

    #[derive(Clone)]
    enum Reply<T> {
        Ok(T),
        RateLimited,
        Fail(&'static str),
    }

    impl<T> Reply<T> {
        fn into_result(self) -> std::result::Result<T, CatalogError> {
            match self {
                Reply::Ok(value) => Ok(value),
                Reply::RateLimited => Err(CatalogError::RateLimited {
                    provider: "MOCK".to_string(),
                    retry_after: Some(Duration::from_secs(1)),
                }),
                Reply::Fail(message) => Err(CatalogError::ProviderError {
                    provider: "MOCK".to_string(),
                    message: message.to_string(),
                }),
            }
        }
    }

    /// Pops scripted replies; the last one repeats.
    fn next_reply<T: Clone>(queue: &mut VecDeque<Reply<T>>) -> Option<Reply<T>> {
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }

    #[derive(Default)]
    struct MockProvider {
        tokens: Mutex<VecDeque<Reply<AccessToken>>>,
        searches: Mutex<HashMap<String, VecDeque<Reply<Vec<Track>>>>>,
        tracks: Mutex<HashMap<String, Reply<Option<Track>>>>,
        artists: Mutex<HashMap<String, Reply<Option<Artist>>>>,
        calls: Mutex<Vec<String>>,
    }

    impl MockProvider {
        fn new() -> Self {
            Self::default()
        }

        fn with_tokens(self, tokens: Vec<Reply<AccessToken>>) -> Self {
            *self.tokens.lock().unwrap() = tokens.into();
            self
        }

        fn on_search(self, title: &str, replies: Vec<Reply<Vec<Track>>>) -> Self {
            self.searches
                .lock()
                .unwrap()
                .insert(title.to_string(), replies.into());
            self
        }

        fn on_track(self, id: &str, reply: Reply<Option<Track>>) -> Self {
            self.tracks.lock().unwrap().insert(id.to_string(), reply);
            self
        }

        fn on_artist(self, id: &str, reply: Reply<Option<Artist>>) -> Self {
            self.artists.lock().unwrap().insert(id.to_string(), reply);
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }

        fn count_calls(&self, prefix: &str) -> usize {
            self.calls()
                .iter()
                .filter(|c| c.starts_with(prefix))
                .count()
        }

        fn log(&self, call: String) {
            self.calls.lock().unwrap().push(call);
        }
    }

    #[async_trait]
    impl CatalogProvider for MockProvider {
        fn id(&self) -> &'static str {
            "MOCK"
        }

        async fn request_credential(&self) -> std::result::Result<AccessToken, CatalogError> {
            self.log("token".to_string());
            let mut tokens = self.tokens.lock().unwrap();
            match tokens.pop_front() {
                Some(reply) => reply.into_result(),
                None => Ok(AccessToken::new("token", 3600)),
            }
        }

        async fn search_tracks(
            &self,
            query: &TrackQuery,
            access_token: &str,
        ) -> std::result::Result<Vec<Track>, CatalogError> {
            assert!(!access_token.is_empty());
            self.log(format!("search:{}|{}", query.title, query.artist));
            let mut searches = self.searches.lock().unwrap();
            match searches.get_mut(&query.title).and_then(next_reply) {
                Some(reply) => reply.into_result(),
                None => Ok(Vec::new()),
            }
        }

        async fn get_track(
            &self,
            track_id: &str,
            _access_token: &str,
        ) -> std::result::Result<Option<Track>, CatalogError> {
            self.log(format!("track:{}", track_id));
            match self.tracks.lock().unwrap().get(track_id).cloned() {
                Some(reply) => reply.into_result(),
                None => Ok(None),
            }
        }

        async fn get_artist(
            &self,
            artist_id: &str,
            _access_token: &str,
        ) -> std::result::Result<Option<Artist>, CatalogError> {
            self.log(format!("artist:{}", artist_id));
            match self.artists.lock().unwrap().get(artist_id).cloned() {
                Some(reply) => reply.into_result(),
                None => Ok(None),
            }
        }
    }

    // =========================================================================
    // Mock EnrichmentStore
    // =========================================================================

    #[derive(Default)]
    struct MockStore {
        candidates: Mutex<Vec<EnrichmentTarget>>,
        commits: Mutex<Vec<Vec<StagedMutation>>>,
        fail_on_select: bool,
        fail_on_commit: bool,
    }

    impl MockStore {
        fn with_candidates(candidates: Vec<EnrichmentTarget>) -> Self {
            Self {
                candidates: Mutex::new(candidates),
                ..Self::default()
            }
        }

        fn commits(&self) -> Vec<Vec<StagedMutation>> {
            self.commits.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl EnrichmentStore for MockStore {
        fn select_candidates(&self, _query: CandidateQuery) -> Result<Vec<EnrichmentTarget>> {
            if self.fail_on_select {
                return Err(Error::Database(DatabaseError::QueryFailed(
                    "no such table: songs".to_string(),
                )));
            }
            Ok(self.candidates.lock().unwrap().clone())
        }

        async fn apply_mutations(&self, mutations: Vec<StagedMutation>) -> Result<CommitResult> {
            let applied = mutations.len();
            self.commits.lock().unwrap().push(mutations);
            if self.fail_on_commit {
                return Err(Error::Database(DatabaseError::TransactionFailed(
                    "database is locked".to_string(),
                )));
            }
            Ok(CommitResult { applied })
        }
    }

    // =========================================================================
    // Recording Pacer
    // =========================================================================

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum PacerEvent {
        Wait,
        Cooldown,
    }

    #[derive(Default)]
    struct RecordingPacer {
        events: Mutex<Vec<PacerEvent>>,
    }

    impl RecordingPacer {
        fn events(&self) -> Vec<PacerEvent> {
            self.events.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Pacer for RecordingPacer {
        async fn wait_before_call(&self) {
            self.events.lock().unwrap().push(PacerEvent::Wait);
        }

        async fn on_throttled(&self) {
            self.events.lock().unwrap().push(PacerEvent::Cooldown);
        }
    }

    // =========================================================================
    // Fixtures
    // =========================================================================

    struct Harness {
        provider: Arc<MockProvider>,
        store: Arc<MockStore>,
        pacer: Arc<RecordingPacer>,
        orchestrator: EnrichmentOrchestrator,
    }

    fn harness(provider: MockProvider, store: MockStore, config: EnrichmentConfig) -> Harness {
        let provider = Arc::new(provider);
        let store = Arc::new(store);
        let pacer = Arc::new(RecordingPacer::default());
        let orchestrator =
            EnrichmentOrchestrator::new(provider.clone(), store.clone(), pacer.clone(), config);
        Harness {
            provider,
            store,
            pacer,
            orchestrator,
        }
    }

    fn song(id: i32, title: &str, artist: &str) -> EnrichmentTarget {
        EnrichmentTarget::new(TargetKey::Song(id))
            .with_title(title)
            .with_artist(artist)
    }

    fn track(id: &str, artist_id: &str, image_url: &str) -> Track {
        Track {
            id: Some(id.to_string()),
            name: None,
            artists: vec![ArtistRef {
                id: Some(artist_id.to_string()),
                name: None,
            }],
            album: Some(AlbumRef {
                images: vec![
                    Image {
                        url: format!("{}-small", image_url),
                        height: Some(64),
                        width: Some(64),
                    },
                    Image {
                        url: image_url.to_string(),
                        height: Some(640),
                        width: Some(640),
                    },
                ],
                ..AlbumRef::default()
            }),
        }
    }

    fn artist(id: &str, photo_url: &str) -> Artist {
        Artist {
            id: Some(id.to_string()),
            name: None,
            images: vec![Image {
                url: photo_url.to_string(),
                height: Some(320),
                width: Some(320),
            }],
        }
    }

    // =========================================================================
    // Tally and commit
    // =========================================================================

    #[tokio::test]
    async fn test_found_not_found_failed_tally() {
        let provider = MockProvider::new()
            .on_search("Found", vec![Reply::Ok(vec![track("t1", "a1", "img")])])
            .on_search("Missing", vec![Reply::Ok(vec![])])
            .on_search("Broken", vec![Reply::Fail("HTTP 500")]);
        let store = MockStore::with_candidates(vec![
            song(1, "Found", "A"),
            song(2, "Missing", "B"),
            song(3, "Broken", "C"),
        ]);
        let h = harness(provider, store, EnrichmentConfig::default());

        let summary = h.orchestrator.run(&EnrichmentJob::track_ids()).await.unwrap();

        assert_eq!(summary.total, 3);
        assert_eq!(summary.updated, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.errored, 1);
        assert!(summary.is_complete());
        assert_eq!(summary.committed, 1);
        assert_eq!(summary.external_calls, 3);

        let commits = h.store.commits();
        assert_eq!(commits.len(), 1);
        assert_eq!(
            commits[0],
            vec![StagedMutation {
                key: TargetKey::Song(1),
                field: TargetField::SongTrackId,
                value: "t1".to_string(),
            }]
        );

        let outcomes: Vec<ItemOutcome> = summary.entries.iter().map(|e| e.outcome).collect();
        assert_eq!(
            outcomes,
            vec![
                ItemOutcome::Updated,
                ItemOutcome::Skipped,
                ItemOutcome::Errored
            ]
        );
        assert!(summary.entries[2].detail.contains("HTTP 500"));
    }

    #[tokio::test]
    async fn test_empty_run_still_commits_once() {
        let h = harness(
            MockProvider::new(),
            MockStore::default(),
            EnrichmentConfig::default(),
        );

        let summary = h.orchestrator.run(&EnrichmentJob::track_ids()).await.unwrap();

        assert_eq!(summary.total, 0);
        assert_eq!(h.store.commits(), vec![Vec::<StagedMutation>::new()]);
        assert!(h.provider.calls().is_empty());
    }

    #[tokio::test]
    async fn test_commit_failure_is_surfaced_with_summary() {
        let provider =
            MockProvider::new().on_search("Found", vec![Reply::Ok(vec![track("t1", "a1", "img")])]);
        let store = MockStore {
            fail_on_commit: true,
            ..MockStore::with_candidates(vec![song(1, "Found", "A")])
        };
        let h = harness(provider, store, EnrichmentConfig::default());

        let err = h
            .orchestrator
            .run(&EnrichmentJob::track_ids())
            .await
            .unwrap_err();

        assert!(matches!(err, EnrichmentError::Commit { .. }));
        assert_eq!(err.summary().updated, 1);
        assert!(err.summary().is_complete());
        assert_eq!(h.store.commits().len(), 1);
    }

    #[tokio::test]
    async fn test_candidate_selection_failure() {
        let store = MockStore {
            fail_on_select: true,
            ..MockStore::default()
        };
        let h = harness(MockProvider::new(), store, EnrichmentConfig::default());

        let err = h
            .orchestrator
            .run(&EnrichmentJob::track_ids())
            .await
            .unwrap_err();

        assert!(matches!(err, EnrichmentError::CandidateSelection { .. }));
        assert!(h.provider.calls().is_empty());
        assert!(h.store.commits().is_empty());
    }

    #[tokio::test]
    async fn test_candidates_with_value_are_never_processed() {
        let provider =
            MockProvider::new().on_search("Fresh", vec![Reply::Ok(vec![track("t1", "a1", "img")])]);
        let store = MockStore::with_candidates(vec![
            song(1, "Done", "A").with_current_value("existing"),
            song(2, "Fresh", "B"),
        ]);
        let h = harness(provider, store, EnrichmentConfig::default());

        let summary = h.orchestrator.run(&EnrichmentJob::track_ids()).await.unwrap();

        assert_eq!(summary.total, 1);
        assert_eq!(h.provider.count_calls("search:Done"), 0);
        assert_eq!(h.provider.count_calls("search:Fresh"), 1);
    }

    // =========================================================================
    // Credential lease
    // =========================================================================

    #[tokio::test]
    async fn test_credential_failure_on_first_item_aborts() {
        let provider = MockProvider::new()
            .with_tokens(vec![Reply::Fail("invalid_client")])
            .on_search("Found", vec![Reply::Ok(vec![track("t1", "a1", "img")])]);
        let store = MockStore::with_candidates(vec![song(1, "Found", "A"), song(2, "Found", "B")]);
        let h = harness(provider, store, EnrichmentConfig::default());

        let err = h
            .orchestrator
            .run(&EnrichmentJob::track_ids())
            .await
            .unwrap_err();

        assert!(err.is_credential_failure());
        assert_eq!(err.summary().processed(), 0);
        assert_eq!(err.summary().total, 2);
        assert!(h.store.commits().is_empty());
        assert_eq!(h.provider.calls(), vec!["token".to_string()]);
    }

    #[tokio::test]
    async fn test_credential_failure_mid_run_discards_staged_work() {
        let provider = MockProvider::new()
            .with_tokens(vec![
                Reply::Ok(AccessToken::new("t1", 3600)),
                Reply::Ok(AccessToken::new("t2", 0)),
            ])
            .on_search("Found", vec![Reply::Ok(vec![track("t1", "a1", "img")])]);
        let store = MockStore::with_candidates(vec![
            song(1, "Found", "A"),
            song(2, "Found", "B"),
            song(3, "Found", "C"),
        ]);
        let config = EnrichmentConfig::default().with_refresh_interval(2);
        let h = harness(provider, store, config);

        let err = h
            .orchestrator
            .run(&EnrichmentJob::track_ids())
            .await
            .unwrap_err();

        assert!(err.is_credential_failure());
        assert_eq!(err.summary().updated, 2);
        assert_eq!(err.summary().credential_refreshes, 1);
        assert!(h.store.commits().is_empty());
    }

    #[tokio::test]
    async fn test_single_refresh_below_interval() {
        let store = MockStore::with_candidates((1..=5).map(|i| song(i, "X", "Y")).collect());
        let h = harness(MockProvider::new(), store, EnrichmentConfig::default());

        let summary = h.orchestrator.run(&EnrichmentJob::track_ids()).await.unwrap();

        assert_eq!(h.provider.count_calls("token"), 1);
        assert_eq!(summary.credential_refreshes, 1);
    }

    #[tokio::test]
    async fn test_refresh_across_interval_boundary() {
        let store = MockStore::with_candidates((1..=5).map(|i| song(i, "X", "Y")).collect());
        let config = EnrichmentConfig::default().with_refresh_interval(2);
        let h = harness(MockProvider::new(), store, config);

        let summary = h.orchestrator.run(&EnrichmentJob::track_ids()).await.unwrap();

        // Refreshed before items 1, 3 and 5.
        assert_eq!(h.provider.count_calls("token"), 3);
        assert_eq!(summary.credential_refreshes, 3);
        let calls = h.provider.calls();
        assert_eq!(calls[0], "token");
        assert_eq!(calls[3], "token");
        assert_eq!(calls[6], "token");
    }

    // =========================================================================
    // Chains
    // =========================================================================

    #[tokio::test]
    async fn test_first_hop_not_found_stops_chain() {
        let provider = MockProvider::new().on_search("Song", vec![Reply::Ok(vec![])]);
        let store = MockStore::with_candidates(vec![EnrichmentTarget::new(TargetKey::Artist(1))
            .with_title("Song")
            .with_artist("A")]);
        let h = harness(provider, store, EnrichmentConfig::default());

        let summary = h
            .orchestrator
            .run(&EnrichmentJob::artist_photos())
            .await
            .unwrap();

        assert_eq!(summary.skipped, 1);
        assert_eq!(h.provider.count_calls("artist:"), 0);
        assert_eq!(summary.external_calls, 1);
    }

    #[tokio::test]
    async fn test_artist_photo_two_hops() {
        let provider = MockProvider::new()
            .on_search("Bohemian Rhapsody", vec![Reply::Ok(vec![track("t1", "queen", "cover")])])
            .on_artist("queen", Reply::Ok(Some(artist("queen", "https://img/queen"))));
        let store = MockStore::with_candidates(vec![EnrichmentTarget::new(TargetKey::Artist(7))
            .with_title("Bohemian Rhapsody (Live Aid)")
            .with_artist("Queen")]);
        let h = harness(provider, store, EnrichmentConfig::default());

        let summary = h
            .orchestrator
            .run(&EnrichmentJob::artist_photos())
            .await
            .unwrap();

        assert_eq!(summary.updated, 1);
        assert_eq!(summary.external_calls, 2);
        assert_eq!(
            h.provider.calls(),
            vec![
                "token".to_string(),
                "search:Bohemian Rhapsody|Queen".to_string(),
                "artist:queen".to_string()
            ]
        );
        assert_eq!(
            h.store.commits()[0],
            vec![StagedMutation {
                key: TargetKey::Artist(7),
                field: TargetField::ArtistPhoto,
                value: "https://img/queen".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_artist_without_matched_song_is_skipped_without_calls() {
        let store = MockStore::with_candidates(vec![
            EnrichmentTarget::new(TargetKey::Artist(3)).with_artist("Nobody")
        ]);
        let h = harness(MockProvider::new(), store, EnrichmentConfig::default());

        let summary = h
            .orchestrator
            .run(&EnrichmentJob::artist_photos())
            .await
            .unwrap();

        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.external_calls, 0);
        assert!(h.pacer.events().is_empty());
    }

    #[tokio::test]
    async fn test_album_image_from_known_track_id() {
        let provider = MockProvider::new()
            .on_track("abc", Reply::Ok(Some(track("abc", "a1", "https://img/cover"))));
        let store = MockStore::with_candidates(vec![
            EnrichmentTarget::new(TargetKey::Song(5)).with_external_id("abc"),
            EnrichmentTarget::new(TargetKey::Song(6)).with_external_id("gone"),
        ]);
        let h = harness(provider, store, EnrichmentConfig::default());

        let summary = h
            .orchestrator
            .run(&EnrichmentJob::album_images())
            .await
            .unwrap();

        assert_eq!(summary.updated, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(
            h.store.commits()[0][0].value,
            "https://img/cover".to_string()
        );
        assert_eq!(h.provider.count_calls("track:"), 2);
    }

    #[tokio::test]
    async fn test_search_uses_normalized_inputs() {
        let store = MockStore::with_candidates(vec![song(1, "Song (Live)", "A feat. B")]);
        let h = harness(MockProvider::new(), store, EnrichmentConfig::default());

        h.orchestrator.run(&EnrichmentJob::track_ids()).await.unwrap();

        assert_eq!(h.provider.count_calls("search:Song|A"), 1);
    }

    // =========================================================================
    // Throttling and pacing
    // =========================================================================

    #[tokio::test]
    async fn test_throttled_item_is_forfeited_after_one_cooldown() {
        let provider = MockProvider::new()
            .on_search("One", vec![Reply::Ok(vec![track("t1", "a1", "img")])])
            .on_search("Two", vec![Reply::RateLimited])
            .on_search("Three", vec![Reply::Ok(vec![track("t3", "a3", "img")])]);
        let store = MockStore::with_candidates(vec![
            song(1, "One", "A"),
            song(2, "Two", "B"),
            song(3, "Three", "C"),
        ]);
        let h = harness(provider, store, EnrichmentConfig::default());

        let summary = h.orchestrator.run(&EnrichmentJob::track_ids()).await.unwrap();

        assert_eq!(
            h.pacer.events(),
            vec![PacerEvent::Wait, PacerEvent::Cooldown, PacerEvent::Wait]
        );
        assert_eq!(h.provider.count_calls("search:Two"), 1);
        assert_eq!(summary.updated, 2);
        assert_eq!(summary.skipped, 1);
        assert_eq!(summary.throttled, 1);
        assert!(summary.is_complete());
        assert_eq!(summary.entries[1].outcome, ItemOutcome::Throttled);
    }

    #[tokio::test]
    async fn test_retry_after_cooldown_policy() {
        let provider = MockProvider::new().on_search(
            "Two",
            vec![
                Reply::RateLimited,
                Reply::Ok(vec![track("t2", "a2", "img")]),
            ],
        );
        let store = MockStore::with_candidates(vec![song(2, "Two", "B")]);
        let config = EnrichmentConfig::default()
            .with_throttle_policy(ThrottlePolicy::RetryAfterCooldown { max_retries: 2 });
        let h = harness(provider, store, config);

        let summary = h.orchestrator.run(&EnrichmentJob::track_ids()).await.unwrap();

        assert_eq!(summary.updated, 1);
        assert_eq!(summary.external_calls, 2);
        assert_eq!(
            h.pacer.events(),
            vec![PacerEvent::Cooldown, PacerEvent::Wait]
        );
    }

    #[tokio::test]
    async fn test_retry_policy_gives_up_after_max_retries() {
        let provider = MockProvider::new().on_search("Two", vec![Reply::RateLimited]);
        let store = MockStore::with_candidates(vec![song(2, "Two", "B")]);
        let config = EnrichmentConfig::default()
            .with_throttle_policy(ThrottlePolicy::RetryAfterCooldown { max_retries: 1 });
        let h = harness(provider, store, config);

        let summary = h.orchestrator.run(&EnrichmentJob::track_ids()).await.unwrap();

        assert_eq!(summary.throttled, 1);
        assert_eq!(h.provider.count_calls("search:Two"), 2);
        assert_eq!(
            h.pacer.events(),
            vec![PacerEvent::Cooldown, PacerEvent::Cooldown]
        );
    }

    #[tokio::test]
    async fn test_failed_item_consumes_no_pacing_slot() {
        let provider = MockProvider::new().on_search("Broken", vec![Reply::Fail("boom")]);
        let store = MockStore::with_candidates(vec![song(1, "Broken", "A")]);
        let h = harness(provider, store, EnrichmentConfig::default());

        let summary = h.orchestrator.run(&EnrichmentJob::track_ids()).await.unwrap();

        assert_eq!(summary.errored, 1);
        assert!(h.pacer.events().is_empty());
    }
}
