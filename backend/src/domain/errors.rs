//! Error taxonomy for the synchronization core.
//!
//! None of these is fatal to the process: session errors leave the app on
//! the unauthenticated entry screen, load errors leave the previous
//! snapshot untouched, and normalization of malformed optional fields
//! falls back to documented defaults instead of erroring at all.

/// Failure observing the authentication provider's event stream
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Session event stream closed")]
    StreamClosed,
    #[error("Session event stream lagged, skipped {0} events")]
    Lagged(u64),
}

/// A structurally required field that could not be normalized from its remote shape
#[derive(Debug, thiserror::Error)]
#[error("Cannot normalize {field}: {reason}")]
pub struct NormalizationError {
    pub field: &'static str,
    pub reason: String,
}

/// A snapshot load that failed as a whole; no partial result was produced
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Failed to fetch {collection}: {source}")]
    Fetch {
        collection: &'static str,
        #[source]
        source: anyhow::Error,
    },
    #[error(transparent)]
    Normalize(#[from] NormalizationError),
}
