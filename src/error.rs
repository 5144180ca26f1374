// ⚠️ Error taxonomy
// Network-facing failures are typed so call sites can downgrade them.

use thiserror::Error;

/// Failure of an external collaborator call (lookup or finance fetch)
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport failure (DNS, connect, timeout, TLS)
    #[error("request to {service} failed: {message}")]
    Transport { service: String, message: String },

    /// Service answered with a non-success status
    #[error("{service} returned status {status}")]
    Status { service: String, status: u16 },

    /// Service answered, but the body did not have the expected shape
    #[error("malformed {service} payload: {message}")]
    Malformed { service: String, message: String },
}

impl FetchError {
    pub fn malformed(service: &str, message: impl Into<String>) -> Self {
        FetchError::Malformed {
            service: service.to_string(),
            message: message.into(),
        }
    }
}

/// Errors surfaced by the ledger pipeline itself
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The address lookup failed outright. Nothing downstream has input,
    /// so this is the one condition that halts a run.
    #[error("no representative data available for this address: {0}")]
    LookupUnavailable(#[source] FetchError),

    /// A cache store could not write its snapshot to disk
    #[error("could not persist {category} cache to {path}: {source}")]
    CachePersist {
        category: String,
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A cache snapshot could not be encoded as JSON
    #[error("could not encode {category} cache: {source}")]
    CacheEncode {
        category: String,
        #[source]
        source: serde_json::Error,
    },
}
