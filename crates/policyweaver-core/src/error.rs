use thiserror::Error;

use crate::api::ClientError;

/// Fatal run errors. None of these are retried; the first one aborts the
/// run before anything is published.
#[derive(Debug, Error)]
pub enum WeaverError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Failed to resolve principal '{id}': {reason}")]
    PrincipalResolution { id: String, reason: String },

    #[error("Failed to resolve {identifier}: {source}")]
    PlatformIdentifier {
        identifier: &'static str,
        #[source]
        source: ClientError,
    },

    #[error("Failed to publish access policies: {0}")]
    Publish(#[source] ClientError),
}

impl WeaverError {
    pub(crate) fn unresolved(id: &str) -> Self {
        WeaverError::PrincipalResolution {
            id: id.to_string(),
            reason: "principal missing from resolved identity map".to_string(),
        }
    }
}
