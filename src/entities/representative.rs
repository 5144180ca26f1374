// 🧑‍⚖️ Representative - an Official, optionally paired with a candidate id
//
// Plain   → any official, never paired
// Tracked → a Federal official paired with a candidate id; may carry
//           contributor / industry breakdowns once fetched

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entities::official::{Level, Official};
use crate::finance::FinanceLine;

/// Shown alongside contributor data for every tracked official
pub const CONTRIBUTOR_NOTICE: &str = "The organizations themselves did not donate, rather the money came from the organization's PAC, its individual members or employees or owners, and those individuals' immediate families";

// ============================================================================
// TRACKED OFFICIAL
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct TrackedOfficial {
    official: Official,
    candidate_id: String,
    pub contributors: Option<Vec<FinanceLine>>,
    pub industries: Option<Vec<FinanceLine>>,
}

impl TrackedOfficial {
    /// Pair an official with a candidate id. Only Federal officials can
    /// be paired; anything else yields None.
    pub fn new(official: Official, candidate_id: &str) -> Option<Self> {
        if !official.is_federal() || candidate_id.trim().is_empty() {
            return None;
        }

        Some(TrackedOfficial {
            official,
            candidate_id: candidate_id.trim().to_string(),
            contributors: None,
            industries: None,
        })
    }

    pub fn official(&self) -> &Official {
        &self.official
    }

    pub fn candidate_id(&self) -> &str {
        &self.candidate_id
    }
}

// ============================================================================
// REPRESENTATIVE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "RepresentativeRecord", try_from = "RepresentativeRecord")]
pub enum Representative {
    Plain(Official),
    Tracked(TrackedOfficial),
}

impl Representative {
    pub fn official(&self) -> &Official {
        match self {
            Representative::Plain(official) => official,
            Representative::Tracked(tracked) => &tracked.official,
        }
    }

    pub fn candidate_id(&self) -> Option<&str> {
        match self {
            Representative::Plain(_) => None,
            Representative::Tracked(tracked) => Some(&tracked.candidate_id),
        }
    }

    pub fn level(&self) -> Option<Level> {
        self.official().level()
    }

    pub fn as_tracked_mut(&mut self) -> Option<&mut TrackedOfficial> {
        match self {
            Representative::Plain(_) => None,
            Representative::Tracked(tracked) => Some(tracked),
        }
    }

    /// One-line summary: "name - role - party"
    pub fn short_info(&self) -> String {
        let official = self.official();
        format!(
            "{} - {} - {}",
            official.name(),
            official.role(),
            official.party_label()
        )
    }

    /// Multi-line detail block
    pub fn full_info(&self) -> String {
        let official = self.official();
        let level = official.level().map(|l| l.as_str()).unwrap_or("Unclassified");
        let rule = "————————————————————";

        let mut lines = vec![
            rule.to_string(),
            "———Information on———".to_string(),
            format!("   {}", official.name()),
            rule.to_string(),
            format!("-Position: {}", official.role()),
            format!("-Party: {}", official.party_label()),
            format!("-Level: {}", level),
            format!("-Address: {}", official.address().as_str()),
            format!("-Phone Number: {}", official.phone().as_str()),
            format!("-Website: {}", official.website().as_str()),
        ];

        if let Representative::Tracked(tracked) = self {
            lines.push(format!("-Candidate ID: {}", tracked.candidate_id));
            lines.push(format!("-Top Donors: {}", availability(&tracked.contributors)));
            lines.push(format!(
                "-Top Contributing Industries: {}",
                availability(&tracked.industries)
            ));
        }

        lines.push(rule.to_string());
        lines.join("\n")
    }
}

impl fmt::Display for Representative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.short_info())
    }
}

fn availability(lines: &Option<Vec<FinanceLine>>) -> &'static str {
    match lines {
        Some(list) if !list.is_empty() => "Available",
        _ => "Not Available",
    }
}

// ============================================================================
// WIRE FORMAT
// ============================================================================

/// Flat JSON shape of a representative in the output document
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RepresentativeRecord {
    #[serde(flatten)]
    official: Official,

    #[serde(default)]
    candidate_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    contributors: Option<Vec<FinanceLine>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    industries: Option<Vec<FinanceLine>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    contributor_notice: Option<String>,
}

impl From<Representative> for RepresentativeRecord {
    fn from(rep: Representative) -> Self {
        match rep {
            Representative::Plain(official) => RepresentativeRecord {
                official,
                candidate_id: None,
                contributors: None,
                industries: None,
                contributor_notice: None,
            },
            Representative::Tracked(tracked) => RepresentativeRecord {
                official: tracked.official,
                candidate_id: Some(tracked.candidate_id),
                contributors: tracked.contributors,
                industries: tracked.industries,
                contributor_notice: Some(CONTRIBUTOR_NOTICE.to_string()),
            },
        }
    }
}

impl TryFrom<RepresentativeRecord> for Representative {
    type Error = String;

    fn try_from(record: RepresentativeRecord) -> Result<Self, Self::Error> {
        match record.candidate_id {
            None => Ok(Representative::Plain(record.official)),
            Some(id) => {
                let name = record.official.name().to_string();
                let mut tracked = TrackedOfficial::new(record.official, &id).ok_or_else(|| {
                    format!("{} has candidate id {} but is not a federal official", name, id)
                })?;
                tracked.contributors = record.contributors;
                tracked.industries = record.industries;
                Ok(Representative::Tracked(tracked))
            }
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
