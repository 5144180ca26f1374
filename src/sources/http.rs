// Blocking HTTP clients for the lookup and finance services

use log::debug;
use reqwest::blocking::{Client, RequestBuilder};
use serde_json::Value;
use std::time::Duration;

use super::{FinanceSource, OfficialsLookup};
use crate::error::FetchError;

const USER_AGENT: &str = concat!("civic-ledger/", env!("CARGO_PKG_VERSION"));
const TIMEOUT_SECS: u64 = 30;

fn build_client(service: &str) -> Result<Client, FetchError> {
    Client::builder()
        .timeout(Duration::from_secs(TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| FetchError::Transport {
            service: service.to_string(),
            message: e.to_string(),
        })
}

/// Send a request and decode a JSON body. Non-2xx is an error.
fn send_json(service: &str, request: RequestBuilder) -> Result<Value, FetchError> {
    let response = request.send().map_err(|e| FetchError::Transport {
        service: service.to_string(),
        message: e.to_string(),
    })?;

    let status = response.status();
    debug!("{} answered {}", service, status);
    if !status.is_success() {
        return Err(FetchError::Status {
            service: service.to_string(),
            status: status.as_u16(),
        });
    }

    // Some services answer errors with 200 and a plain-text body
    response
        .json::<Value>()
        .map_err(|e| FetchError::malformed(service, e.to_string()))
}

// ============================================================================
// CIVIC INFO
// ============================================================================

pub struct CivicInfoClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl CivicInfoClient {
    const SERVICE: &'static str = "civic-info";

    pub fn new(base_url: &str, api_key: &str) -> Result<Self, FetchError> {
        Ok(CivicInfoClient {
            http: build_client(Self::SERVICE)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }
}

impl OfficialsLookup for CivicInfoClient {
    fn lookup(&self, address: &str) -> Result<Value, FetchError> {
        let url = format!("{}/representatives", self.base_url);
        let request = self
            .http
            .get(url)
            .query(&[("key", self.api_key.as_str()), ("address", address)]);

        send_json(Self::SERVICE, request)
    }
}

// ============================================================================
// OPENSECRETS
// ============================================================================

pub struct OpenSecretsClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl OpenSecretsClient {
    const SERVICE: &'static str = "opensecrets";

    pub fn new(base_url: &str, api_key: &str) -> Result<Self, FetchError> {
        Ok(OpenSecretsClient {
            http: build_client(Self::SERVICE)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    fn call(&self, method: &str, candidate_id: &str, cycle: Option<&str>) -> Result<Value, FetchError> {
        let mut params = vec![
            ("method", method),
            ("output", "json"),
            ("cid", candidate_id),
            ("apikey", self.api_key.as_str()),
        ];
        if let Some(cycle) = cycle {
            params.push(("cycle", cycle));
        }

        let url = format!("{}/", self.base_url);
        send_json(Self::SERVICE, self.http.get(url).query(&params))
    }
}

impl FinanceSource for OpenSecretsClient {
    fn contributors(&self, candidate_id: &str, cycle: Option<&str>) -> Result<Value, FetchError> {
        self.call("candContrib", candidate_id, cycle)
    }

    fn industries(&self, candidate_id: &str, cycle: Option<&str>) -> Result<Value, FetchError> {
        self.call("candIndustry", candidate_id, cycle)
    }
}
