use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use top2000_core::enrichment::EnrichmentError;

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Enrichment(#[from] EnrichmentError),
}

impl ApiError {
    /// Plain-text body sent to the caller.
    fn body(&self) -> String {
        match self {
            ApiError::Enrichment(EnrichmentError::CredentialAcquisition { source, .. }) => {
                format!(
                    "Fatal Error: Failed to retrieve Spotify Access Token. Details: {}",
                    source
                )
            }
            ApiError::Enrichment(e) => {
                let summary = e.summary();
                format!(
                    "Error: {}. Processed {} of {} records.",
                    e,
                    summary.processed(),
                    summary.total
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!("{}", self);
        (StatusCode::INTERNAL_SERVER_ERROR, self.body()).into_response()
    }
}
