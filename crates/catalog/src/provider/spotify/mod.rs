//! Spotify catalog provider implementation.
//!
//! This module provides catalog lookups from the Spotify Web API:
//! - Bearer credentials via the client credentials flow (accounts service)
//! - Track search via /search?type=track
//! - Track details via /tracks/{id}
//! - Artist details via /artists/{id}
//!
//! The Web API answers 429 with a `Retry-After` header when the caller is throttled.
//! API documentation: https://developer.spotify.com/documentation/web-api

mod models;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::RETRY_AFTER;
use reqwest::{Client, Response, StatusCode};
use tracing::debug;

use crate::errors::CatalogError;
use crate::models::{AccessToken, Artist, Track, TrackQuery};
use crate::provider::{CatalogProvider, RateLimit};

use models::{ArtistObject, ErrorResponse, SearchResponse, TokenResponse, TrackObject};

pub const DEFAULT_API_BASE_URL: &str = "https://api.spotify.com/v1";
pub const DEFAULT_TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const PROVIDER_ID: &str = "SPOTIFY";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for [`SpotifyProvider`].
#[derive(Clone)]
pub struct SpotifyConfig {
    pub client_id: String,
    pub client_secret: String,
    pub api_base_url: String,
    pub token_url: String,
    pub timeout: Duration,
}

impl SpotifyConfig {
    /// Settings for the public Spotify endpoints.
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            token_url: DEFAULT_TOKEN_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_token_url(mut self, url: impl Into<String>) -> Self {
        self.token_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl std::fmt::Debug for SpotifyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpotifyConfig")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("api_base_url", &self.api_base_url)
            .field("token_url", &self.token_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Spotify Web API catalog provider.
pub struct SpotifyProvider {
    client: Client,
    config: SpotifyConfig,
}

impl SpotifyProvider {
    /// Create a new Spotify provider.
    pub fn new(config: SpotifyConfig) -> Result<Self, CatalogError> {
        if config.client_id.trim().is_empty() || config.client_secret.trim().is_empty() {
            return Err(CatalogError::Configuration(
                "Spotify client id and secret are required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| {
                CatalogError::Configuration(format!("Failed to initialize HTTP client: {}", e))
            })?;

        Ok(Self { client, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.api_base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Make an authenticated GET request to the Web API.
    ///
    /// Returns `Ok(None)` on 404.
    async fn fetch(
        &self,
        path: &str,
        params: &[(&str, &str)],
        access_token: &str,
    ) -> Result<Option<String>, CatalogError> {
        let url = self.endpoint(path);

        debug!("Spotify request: {} with {} params", path, params.len());

        let response = self
            .client
            .get(&url)
            .bearer_auth(access_token)
            .query(params)
            .send()
            .await
            .map_err(map_send_error)?;

        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            debug!("Spotify: {} returned 404", path);
            return Ok(None);
        }

        let response = check_status(response).await?;

        response.text().await.map(Some).map_err(|e| CatalogError::ProviderError {
            provider: PROVIDER_ID.to_string(),
            message: format!("Failed to read response: {}", e),
        })
    }
}

#[async_trait]
impl CatalogProvider for SpotifyProvider {
    fn id(&self) -> &'static str {
        PROVIDER_ID
    }

    fn rate_limit(&self) -> RateLimit {
        // Roughly 4 requests per second keeps a long batch under the rolling window.
        RateLimit {
            min_delay: Duration::from_millis(250),
            throttle_cooldown: Duration::from_secs(5),
        }
    }

    async fn request_credential(&self) -> Result<AccessToken, CatalogError> {
        debug!("Spotify: requesting client credentials token");

        let response = self
            .client
            .post(&self.config.token_url)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(map_send_error)?;

        let body = check_status(response)
            .await?
            .text()
            .await
            .map_err(|e| CatalogError::ProviderError {
                provider: PROVIDER_ID.to_string(),
                message: format!("Failed to read token response: {}", e),
            })?;

        parse_token_body(&body)
    }

    async fn search_tracks(
        &self,
        query: &TrackQuery,
        access_token: &str,
    ) -> Result<Vec<Track>, CatalogError> {
        let q = search_expression(query);
        let limit = query.limit.to_string();
        let params = [("q", q.as_str()), ("type", "track"), ("limit", limit.as_str())];

        match self.fetch("search", &params, access_token).await? {
            Some(body) => {
                let tracks = parse_search_body(&body)?;
                debug!("Spotify: found {} tracks for {}", tracks.len(), q);
                Ok(tracks)
            }
            None => Ok(Vec::new()),
        }
    }

    async fn get_track(
        &self,
        track_id: &str,
        access_token: &str,
    ) -> Result<Option<Track>, CatalogError> {
        let path = format!("tracks/{}", track_id);
        match self.fetch(&path, &[], access_token).await? {
            Some(body) => parse_track_body(&body).map(Some),
            None => Ok(None),
        }
    }

    async fn get_artist(
        &self,
        artist_id: &str,
        access_token: &str,
    ) -> Result<Option<Artist>, CatalogError> {
        let path = format!("artists/{}", artist_id);
        match self.fetch(&path, &[], access_token).await? {
            Some(body) => parse_artist_body(&body).map(Some),
            None => Ok(None),
        }
    }
}

/// Field-filtered search expression, e.g. `track:"Imagine" artist:"John Lennon"`.
fn search_expression(query: &TrackQuery) -> String {
    format!("track:\"{}\" artist:\"{}\"", query.title, query.artist)
}

fn map_send_error(e: reqwest::Error) -> CatalogError {
    if e.is_timeout() {
        CatalogError::Timeout {
            provider: PROVIDER_ID.to_string(),
        }
    } else {
        CatalogError::Network(e)
    }
}

/// Map non-success statuses to errors, passing successful responses through.
async fn check_status(response: Response) -> Result<Response, CatalogError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_retry_after);
        return Err(CatalogError::RateLimited {
            provider: PROVIDER_ID.to_string(),
            retry_after,
        });
    }

    let body = response.text().await.unwrap_or_default();
    let message = error_message(&body).unwrap_or_else(|| format!("HTTP {} - {}", status, body));

    let rejected_client = status == StatusCode::BAD_REQUEST && body.contains("invalid_client");
    if status == StatusCode::UNAUTHORIZED || rejected_client {
        return Err(CatalogError::Unauthorized {
            provider: PROVIDER_ID.to_string(),
            message,
        });
    }

    Err(CatalogError::ProviderError {
        provider: PROVIDER_ID.to_string(),
        message,
    })
}

fn parse_retry_after(value: &str) -> Option<Duration> {
    value.trim().parse::<u64>().ok().map(Duration::from_secs)
}

/// Extract a message from either the Web API (`{"error": {"message": ..}}`)
/// or accounts service (`{"error": "..", "error_description": ..}`) envelope.
fn error_message(body: &str) -> Option<String> {
    if let Ok(parsed) = serde_json::from_str::<ErrorResponse>(body) {
        if let Some(message) = parsed.error.and_then(|e| e.message) {
            return Some(message);
        }
    }
    let value = serde_json::from_str::<serde_json::Value>(body).ok()?;
    value
        .get("error_description")
        .or_else(|| value.get("error"))
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

fn parse_error(what: &str, e: serde_json::Error) -> CatalogError {
    CatalogError::ProviderError {
        provider: PROVIDER_ID.to_string(),
        message: format!("Failed to parse {} response: {}", what, e),
    }
}

fn parse_token_body(body: &str) -> Result<AccessToken, CatalogError> {
    let response: TokenResponse =
        serde_json::from_str(body).map_err(|e| CatalogError::InvalidCredential {
            provider: PROVIDER_ID.to_string(),
            message: format!("Malformed token response: {}", e),
        })?;

    let token = response
        .into_access_token()
        .ok_or_else(|| CatalogError::InvalidCredential {
            provider: PROVIDER_ID.to_string(),
            message: "Missing access_token or expires_in".to_string(),
        })?;

    if !token.is_well_formed() {
        return Err(CatalogError::InvalidCredential {
            provider: PROVIDER_ID.to_string(),
            message: format!(
                "Empty token or non-positive expires_in ({})",
                token.expires_in_seconds
            ),
        });
    }

    Ok(token)
}

fn parse_search_body(body: &str) -> Result<Vec<Track>, CatalogError> {
    let response: SearchResponse =
        serde_json::from_str(body).map_err(|e| parse_error("search", e))?;
    Ok(response
        .tracks
        .map(|page| page.items.into_iter().map(Track::from).collect())
        .unwrap_or_default())
}

fn parse_track_body(body: &str) -> Result<Track, CatalogError> {
    serde_json::from_str::<TrackObject>(body)
        .map(Track::from)
        .map_err(|e| parse_error("track", e))
}

fn parse_artist_body(body: &str) -> Result<Artist, CatalogError> {
    serde_json::from_str::<ArtistObject>(body)
        .map(Artist::from)
        .map_err(|e| parse_error("artist", e))
}
