// 🌐 External collaborators - address lookup and finance fetch
//
// The core only ever sees these traits. HTTP implementations live in
// `http` behind the `http` feature; tests use in-memory fakes.

use log::{debug, info, warn};
use serde_json::Value;

use crate::cache::{address_key, CacheStore};
use crate::error::{FetchError, LedgerError};
use crate::finance::FinanceKind;
use crate::hierarchy::LookupResponse;

#[cfg(feature = "http")]
pub mod http;

#[cfg(feature = "http")]
pub use http::{CivicInfoClient, OpenSecretsClient};

/// Response key echoing the caller's address back; never cached
const NORMALIZED_INPUT_KEY: &str = "normalizedInput";

// ============================================================================
// COLLABORATOR CONTRACTS
// ============================================================================

/// Address → officials lookup
pub trait OfficialsLookup {
    /// Raw response with `offices` and `officials` lists
    fn lookup(&self, address: &str) -> Result<Value, FetchError>;
}

/// Candidate id → finance breakdowns
pub trait FinanceSource {
    /// Raw top-contributor payload. `cycle` of None means the service default.
    fn contributors(&self, candidate_id: &str, cycle: Option<&str>) -> Result<Value, FetchError>;

    /// Raw top-industry payload
    fn industries(&self, candidate_id: &str, cycle: Option<&str>) -> Result<Value, FetchError>;

    fn fetch(&self, kind: FinanceKind, candidate_id: &str, cycle: Option<&str>) -> Result<Value, FetchError> {
        match kind {
            FinanceKind::Contributors => self.contributors(candidate_id, cycle),
            FinanceKind::Industries => self.industries(candidate_id, cycle),
        }
    }
}

// ============================================================================
// CACHED LOOKUP
// ============================================================================

/// Resolve an address to its lookup response, cache first
///
/// Hit → cached response, no external call. Miss → fetch, drop the echoed
/// address, store under the address hash. A failed fetch is the one error
/// that halts a run.
pub fn lookup_officials(
    address: &str,
    store: &mut dyn CacheStore,
    source: &dyn OfficialsLookup,
) -> Result<LookupResponse, LedgerError> {
    let key = address_key(address);

    if let Some(cached) = store.get(&key) {
        match LookupResponse::from_value(cached) {
            Ok(response) => {
                info!("Found lookup response in cache");
                return Ok(response);
            }
            Err(e) => warn!("Cached lookup response unreadable ({}), fetching again", e),
        }
    }

    let mut raw = source.lookup(address).map_err(LedgerError::LookupUnavailable)?;
    if let Value::Object(map) = &mut raw {
        map.remove(NORMALIZED_INPUT_KEY);
    }

    let response = LookupResponse::from_value(&raw).map_err(LedgerError::LookupUnavailable)?;
    debug!(
        "Lookup returned {} offices and {} officials",
        response.offices.len(),
        response.officials.len()
    );

    if let Err(e) = store.put(&key, raw) {
        warn!("Could not cache lookup response: {}", e);
    }

    Ok(response)
}

// ============================================================================
// TESTS
// ============================================================================
