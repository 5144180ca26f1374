// 💵 Finance Augmenter - contributor / industry breakdowns for tracked officials
//
// Per tracked official and per kind:
//   cache hit  → cached lines, verbatim, no external call
//   cache miss → fetch, transform, put into the store (persists), attach
//   fetch fails → one retry with the fallback cycle, then leave unset

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::cache::{get_typed, CacheCategory, CacheStore};
use crate::entities::TrackedOfficial;
use crate::error::FetchError;
use crate::hierarchy::RepresentativeTree;
use crate::sources::FinanceSource;

const SERVICE: &str = "finance";

// ============================================================================
// FINANCE LINE
// ============================================================================

/// One contributor or industry with its PAC and individual totals (USD)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinanceLine {
    pub name: String,
    pub pacs: i64,
    pub individuals: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<i64>,
}

impl FinanceLine {
    pub fn new(name: &str, pacs: i64, individuals: i64) -> Self {
        FinanceLine {
            name: name.to_string(),
            pacs,
            individuals,
            total: None,
        }
    }

    pub fn with_total(mut self, total: i64) -> Self {
        self.total = Some(total);
        self
    }
}

// ============================================================================
// FINANCE KIND
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FinanceKind {
    Contributors,
    Industries,
}

impl FinanceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FinanceKind::Contributors => "contributors",
            FinanceKind::Industries => "industries",
        }
    }

    /// Store this kind is cached in
    pub fn category(&self) -> CacheCategory {
        match self {
            FinanceKind::Contributors => CacheCategory::Contributor,
            FinanceKind::Industries => CacheCategory::Industry,
        }
    }

    /// (container key, item key) inside `response`
    fn payload_keys(&self) -> (&'static str, &'static str) {
        match self {
            FinanceKind::Contributors => ("contributors", "contributor"),
            FinanceKind::Industries => ("industries", "industry"),
        }
    }

    /// Attribute holding the display name
    fn name_attribute(&self) -> &'static str {
        match self {
            FinanceKind::Contributors => "org_name",
            FinanceKind::Industries => "industry_name",
        }
    }
}

// ============================================================================
// PAYLOAD TRANSFORM
// ============================================================================

/// Turn a raw finance response into ordered lines
///
/// Expected shape:
/// `{"response": {"<container>": {"<item>": [{"@attributes": {...}}, ...]}}}`
/// A single item object in place of the list is accepted.
pub fn parse_finance_payload(kind: FinanceKind, payload: &Value) -> Result<Vec<FinanceLine>, FetchError> {
    let (container, item) = kind.payload_keys();

    let items = payload
        .get("response")
        .and_then(|r| r.get(container))
        .and_then(|c| c.get(item))
        .ok_or_else(|| {
            FetchError::malformed(SERVICE, format!("missing response.{}.{}", container, item))
        })?;

    let items: Vec<&Value> = match items {
        Value::Array(list) => list.iter().collect(),
        Value::Object(_) => vec![items],
        _ => {
            return Err(FetchError::malformed(
                SERVICE,
                format!("response.{}.{} is not a list", container, item),
            ))
        }
    };

    items
        .into_iter()
        .map(|entry| parse_line(kind, entry))
        .collect()
}

fn parse_line(kind: FinanceKind, entry: &Value) -> Result<FinanceLine, FetchError> {
    let attrs = entry
        .get("@attributes")
        .ok_or_else(|| FetchError::malformed(SERVICE, "entry without @attributes"))?;

    let name = attrs
        .get(kind.name_attribute())
        .and_then(Value::as_str)
        .ok_or_else(|| {
            FetchError::malformed(SERVICE, format!("entry without {}", kind.name_attribute()))
        })?;

    let pacs = parse_amount(attrs, "pacs")?
        .ok_or_else(|| FetchError::malformed(SERVICE, format!("{} without pacs", name)))?;
    let individuals = parse_amount(attrs, "indivs")?
        .ok_or_else(|| FetchError::malformed(SERVICE, format!("{} without indivs", name)))?;

    let mut line = FinanceLine::new(name.trim(), pacs, individuals);
    if let Some(total) = parse_amount(attrs, "total")? {
        line = line.with_total(total);
    }
    Ok(line)
}

/// Amounts arrive as numbers or numeric strings ("10800", "10800.00")
fn parse_amount(attrs: &Value, key: &str) -> Result<Option<i64>, FetchError> {
    let raw = match attrs.get(key) {
        None | Some(Value::Null) => return Ok(None),
        Some(raw) => raw,
    };

    let parsed = match raw {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f.round() as i64)),
        Value::String(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().map(|f| f.round() as i64))
        }
        _ => None,
    };

    parsed
        .map(Some)
        .ok_or_else(|| FetchError::malformed(SERVICE, format!("{} is not an amount: {}", key, raw)))
}

// ============================================================================
// AUGMENTER
// ============================================================================

/// Where a breakdown came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinanceOutcome {
    Cached(Vec<FinanceLine>),
    Fetched(Vec<FinanceLine>),
    Failed,
}

impl FinanceOutcome {
    pub fn lines(self) -> Option<Vec<FinanceLine>> {
        match self {
            FinanceOutcome::Cached(lines) | FinanceOutcome::Fetched(lines) => Some(lines),
            FinanceOutcome::Failed => None,
        }
    }
}

/// Counters for one augmentation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AugmentSummary {
    pub officials: usize,
    pub cache_hits: usize,
    pub fetched: usize,
    pub failed: usize,
}

impl AugmentSummary {
    fn record(&mut self, outcome: &FinanceOutcome) {
        match outcome {
            FinanceOutcome::Cached(_) => self.cache_hits += 1,
            FinanceOutcome::Fetched(_) => self.fetched += 1,
            FinanceOutcome::Failed => self.failed += 1,
        }
    }
}

pub struct FinanceAugmenter<'a> {
    source: &'a dyn FinanceSource,

    /// Reporting cycle used for the single retry
    fallback_cycle: String,
}

impl<'a> FinanceAugmenter<'a> {
    pub fn new(source: &'a dyn FinanceSource, fallback_cycle: &str) -> Self {
        FinanceAugmenter {
            source,
            fallback_cycle: fallback_cycle.to_string(),
        }
    }

    /// Attach contributor and industry breakdowns to one tracked official
    pub fn augment(
        &self,
        tracked: &mut TrackedOfficial,
        contributors: &mut dyn CacheStore,
        industries: &mut dyn CacheStore,
    ) -> (FinanceOutcome, FinanceOutcome) {
        let candidate_id = tracked.candidate_id().to_string();

        let contrib = self.breakdown(FinanceKind::Contributors, &candidate_id, contributors);
        tracked.contributors = contrib.clone().lines();

        let industry = self.breakdown(FinanceKind::Industries, &candidate_id, industries);
        tracked.industries = industry.clone().lines();

        (contrib, industry)
    }

    /// Augment every tracked official in the federal bucket, in order
    pub fn augment_tree(
        &self,
        tree: &mut RepresentativeTree,
        contributors: &mut dyn CacheStore,
        industries: &mut dyn CacheStore,
    ) -> AugmentSummary {
        let mut summary = AugmentSummary::default();

        for rep in tree.federal.iter_mut() {
            if let Some(tracked) = rep.as_tracked_mut() {
                let (contrib, industry) = self.augment(tracked, contributors, industries);
                summary.officials += 1;
                summary.record(&contrib);
                summary.record(&industry);
            }
        }

        info!(
            "Finance augmentation: {} officials, {} cache hits, {} fetched, {} failed",
            summary.officials, summary.cache_hits, summary.fetched, summary.failed
        );
        summary
    }

    /// Cache-first breakdown for one candidate id
    pub fn breakdown(
        &self,
        kind: FinanceKind,
        candidate_id: &str,
        store: &mut dyn CacheStore,
    ) -> FinanceOutcome {
        if let Some(lines) = get_typed::<Vec<FinanceLine>>(store, candidate_id) {
            debug!("Found {} for {} in cache", kind.as_str(), candidate_id);
            return FinanceOutcome::Cached(lines);
        }

        let lines = match self.fetch_with_retry(kind, candidate_id) {
            Ok(lines) => lines,
            Err(e) => {
                warn!(
                    "Leaving {} unset for {}: {}",
                    kind.as_str(),
                    candidate_id,
                    e
                );
                return FinanceOutcome::Failed;
            }
        };

        match serde_json::to_value(&lines) {
            Ok(value) => {
                if let Err(e) = store.put(candidate_id, value) {
                    warn!("Fetched {} for {} but could not cache them: {}", kind.as_str(), candidate_id, e);
                }
            }
            Err(e) => warn!("Could not encode {} for {}: {}", kind.as_str(), candidate_id, e),
        }

        FinanceOutcome::Fetched(lines)
    }

    /// One attempt with the default cycle, then one with the fallback cycle
    fn fetch_with_retry(&self, kind: FinanceKind, candidate_id: &str) -> Result<Vec<FinanceLine>, FetchError> {
        match self.fetch_once(kind, candidate_id, None) {
            Ok(lines) => Ok(lines),
            Err(first) => {
                warn!(
                    "Fetching {} for {} failed ({}), retrying with cycle {}",
                    kind.as_str(),
                    candidate_id,
                    first,
                    self.fallback_cycle
                );
                self.fetch_once(kind, candidate_id, Some(&self.fallback_cycle))
            }
        }
    }

    fn fetch_once(&self, kind: FinanceKind, candidate_id: &str, cycle: Option<&str>) -> Result<Vec<FinanceLine>, FetchError> {
        let payload = self.source.fetch(kind, candidate_id, cycle)?;
        parse_finance_payload(kind, &payload)
    }
}

// ============================================================================
// TESTS
// ============================================================================
