/// Parameters for a title + artist track search.
///
/// Callers normalize the fields before building a query; providers send
/// them as-is.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrackQuery {
    pub title: String,
    pub artist: String,
    /// Maximum number of results requested from the provider
    pub limit: u8,
}

impl TrackQuery {
    /// Create a query that asks for the single best match.
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            artist: artist.into(),
            limit: 1,
        }
    }

    /// Set the result limit.
    pub fn with_limit(mut self, limit: u8) -> Self {
        self.limit = limit.max(1);
        self
    }
}
