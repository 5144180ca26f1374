// 🌳 Representative Hierarchy - federal / state / local tree
//
// Lookup response → flat Officials (office order) → three ordered buckets.
// An official lands in exactly one bucket, chosen by its level alone.
// Officials whose level tag is outside the known set are kept aside in
// `unclassified` instead of disappearing silently.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::entities::{Level, Official, Representative, TrackedOfficial};
use crate::error::FetchError;
use crate::resolver::{Resolution, Resolver};

// ============================================================================
// LOOKUP RESPONSE
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct Office {
    pub name: String,

    #[serde(default)]
    pub levels: Vec<String>,

    #[serde(default, rename = "officialIndices")]
    pub official_indices: Vec<usize>,
}

impl Office {
    /// First level tag, which decides the tier
    pub fn level_tag(&self) -> Option<&str> {
        self.levels.first().map(String::as_str)
    }
}

/// The part of the lookup response the hierarchy needs
#[derive(Debug, Clone, Deserialize)]
pub struct LookupResponse {
    #[serde(default)]
    pub offices: Vec<Office>,

    #[serde(default)]
    pub officials: Vec<Value>,
}

impl LookupResponse {
    pub fn from_value(value: &Value) -> Result<Self, FetchError> {
        serde_json::from_value(value.clone())
            .map_err(|e| FetchError::malformed("civic-info", e.to_string()))
    }

    /// Flatten offices into Officials, in office order then index order
    pub fn officials(&self) -> Vec<Official> {
        let mut officials = Vec::new();

        for office in &self.offices {
            for &index in &office.official_indices {
                match self.officials.get(index) {
                    Some(raw) => officials.push(Official::from_raw(raw, &office.name, office.level_tag())),
                    None => warn!(
                        "Office '{}' points at missing official #{}",
                        office.name, index
                    ),
                }
            }
        }

        officials
    }
}

// ============================================================================
// REPRESENTATIVE TREE
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RepresentativeTree {
    pub federal: Vec<Representative>,
    pub state: Vec<Representative>,
    pub local: Vec<Representative>,

    /// Officials with no recognised level; not part of the output document
    #[serde(skip)]
    pub unclassified: Vec<Official>,
}

/// Counters from promoting federal officials
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromotionSummary {
    pub tracked: usize,
    pub executive: usize,
    pub unmatched: usize,
}

impl RepresentativeTree {
    /// Partition officials into tiers, keeping input order in each tier
    pub fn partition(officials: Vec<Official>) -> Self {
        let mut tree = RepresentativeTree::default();

        for official in officials {
            match official.level() {
                Some(Level::Federal) => tree.federal.push(Representative::Plain(official)),
                Some(Level::State) => tree.state.push(Representative::Plain(official)),
                Some(Level::Local) => tree.local.push(Representative::Plain(official)),
                None => tree.unclassified.push(official),
            }
        }

        if !tree.unclassified.is_empty() {
            warn!(
                "{} officials have an unrecognised level and are left out of the tree",
                tree.unclassified.len()
            );
        }
        info!(
            "Partitioned officials: {} federal, {} state, {} local",
            tree.federal.len(),
            tree.state.len(),
            tree.local.len()
        );

        tree
    }

    /// Build straight from a lookup response
    pub fn from_response(response: &LookupResponse) -> Self {
        Self::partition(response.officials())
    }

    pub fn bucket(&self, level: Level) -> &[Representative] {
        match level {
            Level::Federal => &self.federal,
            Level::State => &self.state,
            Level::Local => &self.local,
        }
    }

    /// Classified officials across all three tiers
    pub fn len(&self) -> usize {
        self.federal.len() + self.state.len() + self.local.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Pair each federal official with its candidate row where one exists
    ///
    /// Executive offices are skipped. Unmatched officials stay Plain.
    pub fn promote_federal(&mut self, resolver: &Resolver) -> PromotionSummary {
        let mut summary = PromotionSummary::default();
        let federal = std::mem::take(&mut self.federal);

        self.federal = federal
            .into_iter()
            .map(|rep| match rep {
                Representative::Plain(official) if official.is_executive() => {
                    summary.executive += 1;
                    Representative::Plain(official)
                }
                Representative::Plain(official) => match resolver.resolve(&official) {
                    Some(Resolution { candidate_id, pass, .. }) => {
                        debug!("Resolved {} → {} via {:?}", official.name(), candidate_id, pass);
                        match TrackedOfficial::new(official.clone(), &candidate_id) {
                            Some(tracked) => {
                                summary.tracked += 1;
                                Representative::Tracked(tracked)
                            }
                            None => {
                                summary.unmatched += 1;
                                Representative::Plain(official)
                            }
                        }
                    }
                    None => {
                        info!("Could not find a candidate record for {}", official.name());
                        summary.unmatched += 1;
                        Representative::Plain(official)
                    }
                },
                tracked => tracked,
            })
            .collect();

        summary
    }
}

// ============================================================================
// TESTS
// ============================================================================
