use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Bearer credential as issued by a provider's token endpoint.
///
/// The raw token never shows up in `Debug` output.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccessToken {
    /// Opaque bearer token
    pub access_token: String,

    /// Declared validity in seconds, as reported by the provider
    pub expires_in_seconds: i64,
}

impl AccessToken {
    pub fn new(access_token: impl Into<String>, expires_in_seconds: i64) -> Self {
        Self {
            access_token: access_token.into(),
            expires_in_seconds,
        }
    }

    /// Declared validity window, `None` when the provider reported zero or a negative value.
    pub fn validity(&self) -> Option<Duration> {
        u64::try_from(self.expires_in_seconds)
            .ok()
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }

    /// A token is usable when it is non-blank and has a positive validity.
    pub fn is_well_formed(&self) -> bool {
        !self.access_token.trim().is_empty() && self.validity().is_some()
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessToken")
            .field("access_token", &format_args!("<{} chars>", self.access_token.len()))
            .field("expires_in_seconds", &self.expires_in_seconds)
            .finish()
    }
}
