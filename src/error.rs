//! Crate-wide error types.
//!
//! # Taxonomy
//! - Network: non-success HTTP status or transport failure ([`FetchError`])
//! - Parse: malformed JSON or unexpected document shape ([`FetchError`])
//! - NotFound: missing entity, e.g. an unknown guide id ([`RenderError`])
//! - Render: failure while producing markup ([`RenderError`])
//!
//! Router-level "no such route" is not an error: the router redirects to the
//! default route instead.

use thiserror::Error;

use crate::config::loader::ConfigError;

/// Errors raised while retrieving a category resource.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered with a non-success status.
    #[error("HTTP error fetching {resource}: status {status}")]
    Network { resource: String, status: u16 },

    /// The request never produced a response.
    #[error("transport error fetching {resource}: {source}")]
    Transport {
        resource: String,
        #[source]
        source: reqwest::Error,
    },

    /// The request exceeded the configured timeout.
    #[error("timed out after {secs}s fetching {resource}")]
    Timeout { resource: String, secs: u64 },

    /// Reading a local resource failed.
    #[error("I/O error reading {resource}: {source}")]
    Io {
        resource: String,
        #[source]
        source: std::io::Error,
    },

    /// The body was not valid JSON or did not have the expected structure.
    #[error("malformed data in {resource}: {reason}")]
    Parse { resource: String, reason: String },
}

impl FetchError {
    pub(crate) fn parse(resource: impl Into<String>, reason: impl ToString) -> Self {
        Self::Parse {
            resource: resource.into(),
            reason: reason.to_string(),
        }
    }

    /// True for failures to obtain a response at all or a failing status.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            Self::Network { .. } | Self::Transport { .. } | Self::Timeout { .. } | Self::Io { .. }
        )
    }

    /// True when a body arrived but could not be interpreted.
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}

/// Errors raised while producing markup for a view.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error("{what} not found: {id}")]
    NotFound { what: &'static str, id: String },

    #[error("template error: {0}")]
    Template(String),
}

/// Top-level error for the binary and the HTTP surface.
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias over the crate [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification() {
        let net = FetchError::Network {
            resource: "datasets/dataset-guides.json".into(),
            status: 404,
        };
        assert!(net.is_network());
        assert!(!net.is_parse());

        let parse = FetchError::parse("datasets/dataset-guides.json", "expected an array");
        assert!(parse.is_parse());
        assert_eq!(
            parse.to_string(),
            "malformed data in datasets/dataset-guides.json: expected an array"
        );
    }

    #[test]
    fn test_render_error_wraps_fetch() {
        let err: RenderError = FetchError::Timeout {
            resource: "tips".into(),
            secs: 5,
        }
        .into();
        assert!(matches!(err, RenderError::Fetch(FetchError::Timeout { secs: 5, .. })));
    }
}
