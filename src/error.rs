//! Error taxonomy for the agent
//!
//! Transport and rate-limit errors come from the wire, `CollectionFetch`
//! wraps whichever of those aborted a paginated fetch, `Action` is a single
//! rejected follow/unfollow/reply. Everything else is startup or config.

use thiserror::Error;

use crate::types::RelationKind;

/// Result type for agent operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors from the agent and its remote collaborators
#[derive(Debug, Error)]
pub enum Error {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("rate limited by remote service{}", retry_hint(.retry_after_secs))]
    RateLimited { retry_after_secs: Option<u64> },

    #[error("fetching {kind} aborted after {pages_fetched} page(s): {source}")]
    CollectionFetch {
        kind: RelationKind,
        pages_fetched: usize,
        #[source]
        source: Box<Error>,
    },

    #[error("{action} {target} rejected: {message}")]
    Action {
        action: &'static str,
        target: String,
        message: String,
    },

    #[error("startup failed: {0}")]
    Startup(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl Error {
    /// Wrap an action failure with the action name and target account
    pub fn action(action: &'static str, target: impl Into<String>, cause: impl ToString) -> Self {
        Self::Action {
            action,
            target: target.into(),
            message: cause.to_string(),
        }
    }

    /// Does this error ask us to slow down?
    pub fn is_rate_limit(&self) -> bool {
        match self {
            Self::RateLimited { .. } => true,
            Self::CollectionFetch { source, .. } => source.is_rate_limit(),
            _ => false,
        }
    }

    /// Rate-limit and transport errors, the ones that trigger the poll backoff
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(_) | Self::RateLimited { .. } => true,
            Self::CollectionFetch { source, .. } => source.is_transient(),
            _ => false,
        }
    }
}

fn retry_hint(retry_after_secs: &Option<u64>) -> String {
    match retry_after_secs {
        Some(secs) => format!(", retry after {}s", secs),
        None => String::new(),
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::Transport(e.to_string())
    }
}
